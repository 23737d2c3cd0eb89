use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::DeliveryError;

/// Where and how leads are posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Absolute `http`/`https` URL of the webhook sink.
    pub endpoint_url: String,

    /// Whole-request timeout. `None` waits until the transport resolves.
    pub timeout_ms: Option<u64>,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            endpoint_url: "http://127.0.0.1:5678/webhook/leads".to_string(),
            timeout_ms: None,
        }
    }
}

impl DeliveryConfig {
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            ..Default::default()
        }
    }

    /// Parses and checks the endpoint URL.
    pub fn endpoint(&self) -> Result<Url, DeliveryError> {
        let url = Url::parse(self.endpoint_url.trim()).map_err(|e| {
            DeliveryError::InvalidConfig(format!("endpoint_url '{}': {e}", self.endpoint_url))
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(DeliveryError::InvalidConfig(format!(
                "endpoint_url scheme must be http or https, got '{other}'"
            ))),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> Result<(), DeliveryError> {
        self.endpoint()?;
        if self.timeout_ms == Some(0) {
            return Err(DeliveryError::InvalidConfig(
                "timeout_ms must be greater than zero when set".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid_and_untimed() {
        let cfg = DeliveryConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.timeout(), None);
    }

    #[test]
    fn relative_url_rejected() {
        let cfg = DeliveryConfig::new("/webhook/leads");
        assert!(matches!(cfg.validate(), Err(DeliveryError::InvalidConfig(_))));
    }

    #[test]
    fn non_http_scheme_rejected() {
        let cfg = DeliveryConfig::new("ftp://example.com/leads");
        assert!(
            matches!(cfg.validate(), Err(DeliveryError::InvalidConfig(msg)) if msg.contains("scheme"))
        );
    }

    #[test]
    fn zero_timeout_rejected() {
        let cfg = DeliveryConfig {
            timeout_ms: Some(0),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
