//! Per-form submission state machine.
//!
//! `Idle -> Submitting -> {Succeeded | Failed} -> Idle`. The phase flag is
//! the re-entrancy guard: a submit that finds the form anywhere but `Idle`
//! is refused before it touches the view or the sink.
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use chrono::Utc;
use delivery::LeadSink;
use futures::FutureExt;
use intake::{IntakeConfig, Provenance, ValidationResult};
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

use crate::analytics::Tracker;
use crate::error::SiteError;
use crate::outcome::SubmissionOutcome;
use crate::presenter::{PresentationSettings, Presenter};
use crate::view::FormView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormPhase {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Where the page was loaded and by what.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContext {
    pub url: String,
    pub user_agent: String,
}

impl PageContext {
    pub fn new(url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user_agent: user_agent.into(),
        }
    }
}

/// Page-lifetime collaborators shared by every form.
pub struct SubmissionContext {
    pub intake: IntakeConfig,
    pub presentation: Arc<PresentationSettings>,
    pub sink: Arc<dyn LeadSink>,
    pub tracker: Tracker,
    pub page: PageContext,
}

/// What one submit did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReport {
    pub submission_id: Uuid,
    pub form_type: String,
    pub outcome: SubmissionOutcome,
    /// Phases visited, starting and ending at `Idle`.
    pub path: Vec<FormPhase>,
}

pub struct SubmissionController {
    form_key: String,
    form_type: String,
    view: Arc<FormView>,
    presenter: Arc<dyn Presenter>,
    context: Arc<SubmissionContext>,
    phase: Mutex<FormPhase>,
}

impl SubmissionController {
    pub fn new(
        form_key: impl Into<String>,
        form_type: impl Into<String>,
        view: Arc<FormView>,
        presenter: Arc<dyn Presenter>,
        context: Arc<SubmissionContext>,
    ) -> Self {
        Self {
            form_key: form_key.into(),
            form_type: form_type.into(),
            view,
            presenter,
            context,
            phase: Mutex::new(FormPhase::Idle),
        }
    }

    pub fn form_key(&self) -> &str {
        &self.form_key
    }

    pub fn form_type(&self) -> &str {
        &self.form_type
    }

    pub fn view(&self) -> &Arc<FormView> {
        &self.view
    }

    pub fn phase(&self) -> FormPhase {
        *self.lock_phase()
    }

    /// Removes a visible error message early.
    pub fn dismiss_error(&self) {
        self.presenter.dismiss_error();
    }

    /// Runs one submission to completion.
    ///
    /// Fails only when a submission for this form is already in flight;
    /// every delivery or validation problem is reported in the outcome.
    pub async fn submit(&self) -> Result<SubmissionReport, SiteError> {
        self.begin()?;

        let submission_id = Uuid::new_v4();
        let span = info_span!(
            "submission",
            form = %self.form_key,
            form_type = %self.form_type,
            %submission_id
        );
        self.run(submission_id).instrument(span).await
    }

    async fn run(&self, submission_id: Uuid) -> Result<SubmissionReport, SiteError> {
        let start = Instant::now();
        let mut path = vec![FormPhase::Idle, FormPhase::Submitting];

        let original_label = self
            .presenter
            .show_loading(&self.context.presentation.submitting_label);
        let restore = RestoreOnExit {
            controller: self,
            original_label,
        };

        let outcome = AssertUnwindSafe(self.process())
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                let reason = panic_message(panic.as_ref());
                error!(reason = %reason, "submission_panicked");
                SubmissionOutcome::TransportFailure(reason)
            });

        if outcome.is_success() {
            self.set_phase(FormPhase::Succeeded);
            path.push(FormPhase::Succeeded);
            self.presenter.clear_fields();
            self.presenter.show_success();
            self.context.tracker.track_conversion(&self.form_type);
        } else {
            self.set_phase(FormPhase::Failed);
            path.push(FormPhase::Failed);
            let message = outcome
                .user_message(&self.context.presentation.generic_error)
                .unwrap_or_else(|| self.context.presentation.generic_error.clone());
            self.presenter.show_error(&message);
        }

        drop(restore);
        path.push(FormPhase::Idle);

        info!(
            form_type = %self.form_type,
            outcome = outcome.kind(),
            elapsed_micros = start.elapsed().as_micros(),
            "submission_complete"
        );

        Ok(SubmissionReport {
            submission_id,
            form_type: self.form_type.clone(),
            outcome,
            path,
        })
    }

    async fn process(&self) -> SubmissionOutcome {
        let raw = self.view.snapshot();
        let intake_cfg = &self.context.intake;

        let lead = intake::normalize(&raw, self.provenance(), intake_cfg);
        if let ValidationResult::Invalid(violations) =
            intake::validate(self.view.schema(), &raw, intake_cfg)
        {
            return SubmissionOutcome::ValidationFailure(violations);
        }

        let result = self.context.sink.deliver(&lead).await;
        if let Err(err) = &result {
            warn!(
                form_type = %self.form_type,
                error = %err,
                "delivery_failure"
            );
        }
        result.into()
    }

    fn provenance(&self) -> Provenance {
        Provenance {
            form_type: self.form_type.clone(),
            source: self.context.intake.source_label.clone(),
            submitted_at: Utc::now(),
            page_url: self.context.page.url.clone(),
            user_agent: self.context.page.user_agent.clone(),
        }
    }

    fn begin(&self) -> Result<(), SiteError> {
        let mut phase = self.lock_phase();
        if *phase != FormPhase::Idle {
            warn!(form = %self.form_key, phase = ?*phase, "submission_in_flight");
            return Err(SiteError::InFlight(self.form_key.clone()));
        }
        *phase = FormPhase::Submitting;
        Ok(())
    }

    fn set_phase(&self, next: FormPhase) {
        *self.lock_phase() = next;
    }

    fn lock_phase(&self) -> MutexGuard<'_, FormPhase> {
        self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Re-enables the submit control and returns the form to `Idle`, however
/// the submission ends.
struct RestoreOnExit<'a> {
    controller: &'a SubmissionController,
    original_label: String,
}

impl Drop for RestoreOnExit<'_> {
    fn drop(&mut self) {
        self.controller
            .presenter
            .restore_submit(&self.original_label);
        self.controller.set_phase(FormPhase::Idle);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "submission panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use delivery::DeliveryError;
    use intake::{CanonicalLead, FieldKind, FieldSpec, FormSchema};

    use super::*;
    use crate::forms::FormDefinition;
    use crate::presenter::ViewPresenter;

    struct Reply(Result<String, DeliveryError>);

    #[async_trait]
    impl LeadSink for Reply {
        async fn deliver(&self, _lead: &CanonicalLead) -> Result<String, DeliveryError> {
            self.0.clone()
        }
    }

    struct Panics;

    #[async_trait]
    impl LeadSink for Panics {
        async fn deliver(&self, _lead: &CanonicalLead) -> Result<String, DeliveryError> {
            panic!("sink exploded");
        }
    }

    fn controller(sink: Arc<dyn LeadSink>) -> SubmissionController {
        let schema = FormSchema::new(vec![
            FieldSpec::new("name", FieldKind::Text).required(),
            FieldSpec::new("email", FieldKind::Email).required(),
        ]);
        let view = Arc::new(FormView::new(FormDefinition::new("contactForm", schema, "Send")));
        let presentation = Arc::new(PresentationSettings::default());
        let presenter = Arc::new(ViewPresenter::new(view.clone(), presentation.clone()));
        let context = Arc::new(SubmissionContext {
            intake: IntakeConfig::default(),
            presentation,
            sink,
            tracker: Tracker::default(),
            page: PageContext::new("https://example.com/contact.html", "unit-test"),
        });
        SubmissionController::new("contactForm", "contact", view, presenter, context)
    }

    fn fill(controller: &SubmissionController) {
        controller.view().input("name", "Ada Lovelace");
        controller.view().input("email", "ada@example.com");
    }

    #[tokio::test]
    async fn validation_failure_skips_delivery() {
        let controller = controller(Arc::new(Panics));
        controller.view().input("email", "not-an-email");

        let report = controller.submit().await.unwrap();
        match &report.outcome {
            SubmissionOutcome::ValidationFailure(violations) => {
                assert_eq!(violations[0].field, "name");
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(controller.phase(), FormPhase::Idle);
        assert_eq!(controller.view().value("email").as_deref(), Some("not-an-email"));
    }

    #[tokio::test]
    async fn panicking_sink_still_restores_control() {
        let controller = controller(Arc::new(Panics));
        fill(&controller);

        let report = controller.submit().await.unwrap();
        assert_eq!(
            report.outcome,
            SubmissionOutcome::TransportFailure("sink exploded".into())
        );
        let control = controller.view().submit_control();
        assert!(control.enabled);
        assert_eq!(control.label, "Send");
        assert_eq!(controller.phase(), FormPhase::Idle);
        assert_eq!(controller.view().error_panels(), 1);
    }

    #[tokio::test]
    async fn success_path_and_fields_cleared() {
        let controller = controller(Arc::new(Reply(Ok("OK".into()))));
        fill(&controller);

        let report = controller.submit().await.unwrap();
        assert_eq!(report.outcome, SubmissionOutcome::Success("OK".into()));
        assert_eq!(report.form_type, "contact");
        assert_eq!(
            report.path,
            vec![
                FormPhase::Idle,
                FormPhase::Submitting,
                FormPhase::Succeeded,
                FormPhase::Idle
            ]
        );
        assert_eq!(controller.view().value("name").as_deref(), Some(""));
    }

    #[test]
    fn begin_refuses_when_not_idle() {
        let controller = controller(Arc::new(Panics));
        controller.begin().unwrap();
        assert!(matches!(controller.begin(), Err(SiteError::InFlight(key)) if key == "contactForm"));
    }
}
