//! Lead capture for landing-page forms.
//!
//! This crate ties the pieces together: every form on a page gets a logical
//! type, a [`SubmissionController`] and a [`ViewPresenter`]. On submit the
//! form is snapshotted, normalized and validated by [`intake`], posted by a
//! [`delivery::LeadSink`], and the outcome is rendered back into the form.
//!
//! ```rust,no_run
//! use leadpipe::{FormDefinition, FormView, LeadSite, PageContext, SiteConfig};
//! use intake::{FieldKind, FieldSpec, FormSchema};
//!
//! # async fn run() -> Result<(), leadpipe::SiteError> {
//! let config = SiteConfig::from_file("site.yaml")?;
//! let mut site = LeadSite::from_config(
//!     config,
//!     PageContext::new("https://example.com/sell.html", "Mozilla/5.0"),
//! )?;
//!
//! let schema = FormSchema::new(vec![
//!     FieldSpec::new("full-name", FieldKind::Text).required(),
//!     FieldSpec::new("phone", FieldKind::Tel).required(),
//! ]);
//! site.attach(FormView::new(FormDefinition::new("quickOfferForm", schema, "Get My Offer")));
//!
//! site.input("quickOfferForm", "full-name", "Ada Lovelace")?;
//! site.input("quickOfferForm", "phone", "5551234567")?;
//! let report = site.submit("quickOfferForm").await?;
//! println!("{}: {:?}", report.submission_id, report.outcome);
//! # Ok(())
//! # }
//! ```

pub mod analytics;
pub mod config;
pub mod controller;
mod error;
pub mod forms;
mod outcome;
pub mod presenter;
pub mod site;
pub mod telemetry;
pub mod view;

pub use analytics::{EventData, EventSink, ScrollDepth, Tracker, TrackingSettings};
pub use config::{ConfigLoadError, SiteConfig};
pub use controller::{FormPhase, PageContext, SubmissionController, SubmissionReport};
pub use error::SiteError;
pub use forms::{
    FormDefinition, KnownForm, MODAL_FORM_ID, builtin_known_forms, classify_form_type,
    modal_form_type, resolve_form_type, resolve_page_form_type,
};
pub use outcome::SubmissionOutcome;
pub use presenter::{IconRenderer, PresentationSettings, Presenter, ViewPresenter, format_phone};
pub use site::{AttachedForm, LeadSite, LeadSiteBuilder};
pub use view::{FormView, Panel, PanelKind, SubmitControl};

pub use delivery::{DeliveryConfig, DeliveryError, LeadSink, WebhookClient};
pub use intake::{CanonicalLead, IntakeConfig, RawSubmission, ValidationResult, Violation};
