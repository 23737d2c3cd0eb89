use thiserror::Error;

use crate::config::ConfigLoadError;

/// Errors raised while wiring or driving a page's forms.
///
/// Delivery and validation problems are not errors here; they arrive as a
/// [`SubmissionOutcome`](crate::SubmissionOutcome) inside the report.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SiteError {
    #[error("no form registered under '{0}'")]
    UnknownForm(String),

    #[error("form '{0}' already has a submission in flight")]
    InFlight(String),

    #[error("site configuration: {0}")]
    Config(#[from] ConfigLoadError),

    #[error("delivery setup: {0}")]
    Delivery(#[from] delivery::DeliveryError),

    #[error("tracing subscriber: {0}")]
    Telemetry(String),
}
