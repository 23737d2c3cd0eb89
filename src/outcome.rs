use delivery::DeliveryError;
use intake::Violation;

/// Result of one submission attempt, as seen by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The sink answered 2xx; carries its body.
    Success(String),
    /// The request never produced an HTTP response.
    TransportFailure(String),
    /// The sink answered with a non-2xx status.
    ApplicationFailure { status: u16, body: String },
    /// Rejected before any network call.
    ValidationFailure(Vec<Violation>),
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Success(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SubmissionOutcome::Success(_) => "success",
            SubmissionOutcome::TransportFailure(_) => "transport_failure",
            SubmissionOutcome::ApplicationFailure { .. } => "application_failure",
            SubmissionOutcome::ValidationFailure(_) => "validation_failure",
        }
    }

    /// Message shown to the user, `None` on success.
    ///
    /// Validation shows the first violation. Application failures show the
    /// sink's status and body when the body has content. Everything else
    /// falls back to `generic`.
    pub fn user_message(&self, generic: &str) -> Option<String> {
        match self {
            SubmissionOutcome::Success(_) => None,
            SubmissionOutcome::ValidationFailure(violations) => Some(
                violations
                    .first()
                    .map(|v| v.message.clone())
                    .unwrap_or_else(|| generic.to_string()),
            ),
            SubmissionOutcome::ApplicationFailure { status, body } if !body.trim().is_empty() => {
                Some(format!("Webhook Error {status}: {}", body.trim()))
            }
            SubmissionOutcome::ApplicationFailure { .. }
            | SubmissionOutcome::TransportFailure(_) => Some(generic.to_string()),
        }
    }
}

impl From<Result<String, DeliveryError>> for SubmissionOutcome {
    fn from(result: Result<String, DeliveryError>) -> Self {
        match result {
            Ok(body) => SubmissionOutcome::Success(body),
            Err(DeliveryError::Application { status, body }) => {
                SubmissionOutcome::ApplicationFailure { status, body }
            }
            Err(DeliveryError::Transport(reason)) | Err(DeliveryError::InvalidConfig(reason)) => {
                SubmissionOutcome::TransportFailure(reason)
            }
        }
    }
}
