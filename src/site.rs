//! Page-lifetime wiring of forms to the submission pipeline.
use std::collections::HashMap;
use std::sync::Arc;

use delivery::{LeadSink, WebhookClient};
use tracing::{debug, info};

use crate::analytics::{EventSink, Tracker};
use crate::config::SiteConfig;
use crate::controller::{PageContext, SubmissionContext, SubmissionController, SubmissionReport};
use crate::error::SiteError;
use crate::forms::{KnownForm, resolve_page_form_type};
use crate::presenter::{IconRenderer, ViewPresenter};
use crate::view::FormView;

/// A form adopted by the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedForm {
    pub key: String,
    pub form_type: String,
}

pub struct LeadSiteBuilder {
    config: SiteConfig,
    page: PageContext,
    sink: Option<Arc<dyn LeadSink>>,
    tag_manager: Option<Arc<dyn EventSink>>,
    pixel: Option<Arc<dyn EventSink>>,
    icons: Option<Arc<dyn IconRenderer>>,
}

impl LeadSiteBuilder {
    /// Replaces the webhook client built from `config.webhook`.
    pub fn sink(mut self, sink: Arc<dyn LeadSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn tag_manager(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.tag_manager = Some(sink);
        self
    }

    pub fn pixel(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.pixel = Some(sink);
        self
    }

    pub fn icons(mut self, renderer: Arc<dyn IconRenderer>) -> Self {
        self.icons = Some(renderer);
        self
    }

    pub fn build(self) -> Result<LeadSite, SiteError> {
        self.config.validate()?;

        let sink: Arc<dyn LeadSink> = match self.sink {
            Some(sink) => sink,
            None => Arc::new(WebhookClient::new(&self.config.webhook)?),
        };

        let mut tracker = Tracker::new(self.config.tracking.clone());
        if let Some(tag_manager) = self.tag_manager {
            tracker = tracker.with_tag_manager(tag_manager);
        }
        if let Some(pixel) = self.pixel {
            tracker = tracker.with_pixel(pixel);
        }

        let context = Arc::new(SubmissionContext {
            intake: self.config.intake_config(),
            presentation: Arc::new(self.config.presentation.clone()),
            sink,
            tracker,
            page: self.page,
        });

        Ok(LeadSite {
            context,
            known: self.config.forms.known,
            skip_ids: self.config.forms.skip_ids,
            icons: self.icons,
            forms: HashMap::new(),
            order: Vec::new(),
            anonymous: 0,
        })
    }
}

/// Every form on one page, keyed by id (or a generated key for forms without one).
pub struct LeadSite {
    context: Arc<SubmissionContext>,
    known: Vec<KnownForm>,
    skip_ids: Vec<String>,
    icons: Option<Arc<dyn IconRenderer>>,
    forms: HashMap<String, Arc<SubmissionController>>,
    order: Vec<String>,
    anonymous: usize,
}

impl LeadSite {
    pub fn builder(config: SiteConfig, page: PageContext) -> LeadSiteBuilder {
        LeadSiteBuilder {
            config,
            page,
            sink: None,
            tag_manager: None,
            pixel: None,
            icons: None,
        }
    }

    /// Builds a site posting to the configured webhook.
    pub fn from_config(config: SiteConfig, page: PageContext) -> Result<Self, SiteError> {
        Self::builder(config, page).build()
    }

    /// Adopts a form. Returns `None` for skipped ids.
    ///
    /// Attaching a form under a key that is already registered replaces the
    /// earlier registration.
    pub fn attach(&mut self, view: FormView) -> Option<AttachedForm> {
        let definition = view.definition();
        if let Some(id) = definition.identifier() {
            if self.skip_ids.iter().any(|skip| skip == id) {
                debug!(form = id, "form_skipped");
                return None;
            }
        }

        let form_type = resolve_page_form_type(definition, &self.known, &self.context.page.url);
        let key = match definition.identifier() {
            Some(id) => id.to_string(),
            None => {
                self.anonymous += 1;
                format!("form-{}", self.anonymous)
            }
        };

        let view = Arc::new(view);
        let mut presenter = ViewPresenter::new(view.clone(), self.context.presentation.clone());
        if let Some(icons) = &self.icons {
            presenter = presenter.with_icons(icons.clone());
        }
        let controller = SubmissionController::new(
            key.clone(),
            form_type.clone(),
            view,
            Arc::new(presenter),
            self.context.clone(),
        );

        if self.forms.insert(key.clone(), Arc::new(controller)).is_none() {
            self.order.push(key.clone());
        }
        info!(form = %key, form_type = %form_type, "form_attached");

        Some(AttachedForm { key, form_type })
    }

    pub fn attach_all<I>(&mut self, views: I) -> Vec<AttachedForm>
    where
        I: IntoIterator<Item = FormView>,
    {
        views.into_iter().filter_map(|view| self.attach(view)).collect()
    }

    pub async fn submit(&self, key: &str) -> Result<SubmissionReport, SiteError> {
        self.controller(key)?.submit().await
    }

    /// Types into a field of a registered form.
    pub fn input(&self, key: &str, field: &str, text: &str) -> Result<bool, SiteError> {
        Ok(self.controller(key)?.view().input(field, text))
    }

    pub fn dismiss_error(&self, key: &str) -> Result<(), SiteError> {
        self.controller(key)?.dismiss_error();
        Ok(())
    }

    pub fn controller(&self, key: &str) -> Result<&Arc<SubmissionController>, SiteError> {
        self.forms
            .get(key)
            .ok_or_else(|| SiteError::UnknownForm(key.to_string()))
    }

    /// Registered keys in attachment order.
    pub fn form_keys(&self) -> &[String] {
        &self.order
    }

    pub fn tracker(&self) -> &Tracker {
        &self.context.tracker
    }

    pub fn page(&self) -> &PageContext {
        &self.context.page
    }
}
