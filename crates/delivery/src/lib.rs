//! Lead delivery to the external webhook sink.
//!
//! A [`LeadSink`] takes a finished [`CanonicalLead`] and reports one of three
//! things: the sink's response body on a 2xx, a transport failure, or the
//! status and body of a rejection. [`WebhookClient`] is the production sink;
//! tests substitute their own implementations.
//!
//! ```rust,no_run
//! use delivery::{DeliveryConfig, LeadSink, WebhookClient};
//! use intake::CanonicalLead;
//!
//! # async fn run() -> Result<(), delivery::DeliveryError> {
//! let client = WebhookClient::new(&DeliveryConfig::new("https://hooks.example.com/leads"))?;
//! let body = client.deliver(&CanonicalLead::default()).await?;
//! println!("sink replied: {body}");
//! # Ok(())
//! # }
//! ```
//!
//! No retries happen here. A failed delivery is reported once and the user
//! resubmits.

use async_trait::async_trait;
use intake::CanonicalLead;

mod config;
mod error;
mod webhook;

pub use config::DeliveryConfig;
pub use error::DeliveryError;
pub use webhook::WebhookClient;

/// Destination for normalized leads.
///
/// Implementations must not retain or forward the lead anywhere other than
/// their one sink.
#[async_trait]
pub trait LeadSink: Send + Sync {
    /// Sends one lead. `Ok` carries the sink's response body, unparsed.
    async fn deliver(&self, lead: &CanonicalLead) -> Result<String, DeliveryError>;
}
