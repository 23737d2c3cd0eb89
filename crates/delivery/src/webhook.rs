use std::time::Instant;

use async_trait::async_trait;
use intake::CanonicalLead;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use tracing::{debug, info, warn};

use crate::{DeliveryConfig, DeliveryError, LeadSink};

/// Posts leads as JSON to the configured webhook.
///
/// One client per page: reqwest pools connections internally, so clones
/// share the pool.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl WebhookClient {
    pub fn new(cfg: &DeliveryConfig) -> Result<Self, DeliveryError> {
        cfg.validate()?;
        let endpoint = cfg.endpoint()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = cfg.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| DeliveryError::InvalidConfig(format!("http client: {e}")))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl LeadSink for WebhookClient {
    async fn deliver(&self, lead: &CanonicalLead) -> Result<String, DeliveryError> {
        let start = Instant::now();

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .json(lead)
            .send()
            .await
            .map_err(|e| {
                warn!(
                    form_type = %lead.form_type,
                    error = %e,
                    elapsed_micros = start.elapsed().as_micros(),
                    "delivery_transport_failure"
                );
                DeliveryError::Transport(e.to_string())
            })?;

        let status = response.status();
        // The body is read on every path; receivers put diagnostics there.
        let body = response
            .text()
            .await
            .map_err(|e| DeliveryError::Transport(format!("failed to read response body: {e}")))?;

        debug!(
            status = status.as_u16(),
            body_len = body.len(),
            "webhook_response"
        );

        if !status.is_success() {
            warn!(
                form_type = %lead.form_type,
                status = status.as_u16(),
                elapsed_micros = start.elapsed().as_micros(),
                "delivery_rejected"
            );
            return Err(DeliveryError::Application {
                status: status.as_u16(),
                body,
            });
        }

        info!(
            form_type = %lead.form_type,
            status = status.as_u16(),
            elapsed_micros = start.elapsed().as_micros(),
            "delivery_success"
        );
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_keeps_parsed_endpoint() {
        let cfg = DeliveryConfig::new("https://hooks.example.com/leads?token=abc");
        let client = WebhookClient::new(&cfg).expect("client builds");
        assert_eq!(client.endpoint().host_str(), Some("hooks.example.com"));
        assert_eq!(client.endpoint().query(), Some("token=abc"));
    }

    #[test]
    fn invalid_endpoint_fails_construction() {
        let cfg = DeliveryConfig::new("not a url");
        assert!(matches!(
            WebhookClient::new(&cfg),
            Err(DeliveryError::InvalidConfig(_))
        ));
    }
}
