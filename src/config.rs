//! YAML site configuration.
//!
//! One file describes everything a page needs to wire its forms: the webhook
//! sink, intake knobs, user-facing strings, the known form table and the
//! tracking defaults. Every section is optional and defaults to the values
//! the site ships with.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "cash offer landing pages"
//!
//! webhook:
//!   endpoint_url: "https://hooks.example.com/webhook/leads"
//!   timeout_ms: 15000
//!
//! intake:
//!   source_label: "Website Form"
//!   sanitize_values: true
//!   address_min_chars: 10
//!   extra_aliases:
//!     - alias: "street_address"
//!       field: "address"
//!
//! presentation:
//!   submitting_label: "Submitting..."
//!   error_dismiss_ms: 8000
//!
//! forms:
//!   skip_ids: ["testForm"]
//!
//! tracking:
//!   location: "Houston, TX"
//!
//! logging:
//!   level: "info"
//!   json: false
//! ```

use std::fs;
use std::path::Path;

use delivery::{DeliveryConfig, DeliveryError};
use intake::{FieldAlias, FieldAliasTable, IntakeConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analytics::TrackingSettings;
use crate::forms::{KnownForm, builtin_known_forms};
use crate::presenter::PresentationSettings;

/// Errors that can occur when loading a site configuration file.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),

    #[error("intake: {0}")]
    Intake(#[from] intake::ConfigError),

    #[error("webhook: {0}")]
    Webhook(#[from] DeliveryError),
}

/// Top-level site configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SiteConfig {
    pub version: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub webhook: DeliveryConfig,

    #[serde(default)]
    pub intake: IntakeSection,

    #[serde(default)]
    pub presentation: PresentationSettings,

    #[serde(default)]
    pub forms: FormsSection,

    #[serde(default)]
    pub tracking: TrackingSettings,

    #[serde(default)]
    pub logging: LoggingSection,
}

impl SiteConfig {
    /// Load a YAML configuration file from the given path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate YAML configuration from a string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: SiteConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.webhook.validate()?;
        self.intake.to_intake_config().validate()?;
        validate_presentation(&self.presentation)?;
        self.forms.validate()?;
        Ok(())
    }

    pub fn intake_config(&self) -> IntakeConfig {
        self.intake.to_intake_config()
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            webhook: DeliveryConfig::default(),
            intake: IntakeSection::default(),
            presentation: PresentationSettings::default(),
            forms: FormsSection::default(),
            tracking: TrackingSettings::default(),
            logging: LoggingSection::default(),
        }
    }
}

/// Intake section. Extra aliases are appended after the built-in table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeSection {
    #[serde(default = "default_source_label")]
    pub source_label: String,

    #[serde(default = "true_value")]
    pub sanitize_values: bool,

    #[serde(default = "default_address_min_chars")]
    pub address_min_chars: usize,

    #[serde(default)]
    pub extra_aliases: Vec<FieldAlias>,
}

impl IntakeSection {
    pub fn to_intake_config(&self) -> IntakeConfig {
        IntakeConfig {
            source_label: self.source_label.clone(),
            sanitize_values: self.sanitize_values,
            address_min_chars: self.address_min_chars,
            aliases: FieldAliasTable::builtin().with_extra(self.extra_aliases.iter().cloned()),
            ..IntakeConfig::default()
        }
    }
}

impl Default for IntakeSection {
    fn default() -> Self {
        Self {
            source_label: default_source_label(),
            sanitize_values: true,
            address_min_chars: default_address_min_chars(),
            extra_aliases: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormsSection {
    #[serde(default = "builtin_known_forms")]
    pub known: Vec<KnownForm>,

    /// Form ids never adopted.
    #[serde(default = "default_skip_ids")]
    pub skip_ids: Vec<String>,
}

impl FormsSection {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        for (index, form) in self.known.iter().enumerate() {
            if form.id.trim().is_empty() {
                return Err(ConfigLoadError::Validation(format!(
                    "forms.known[{index}].id must not be blank"
                )));
            }
            if form.form_type.trim().is_empty() {
                return Err(ConfigLoadError::Validation(format!(
                    "forms.known[{index}].form_type must not be blank"
                )));
            }
            if self.known[..index].iter().any(|other| other.id == form.id) {
                return Err(ConfigLoadError::Validation(format!(
                    "forms.known lists '{}' more than once",
                    form.id
                )));
            }
        }
        Ok(())
    }
}

impl Default for FormsSection {
    fn default() -> Self {
        Self {
            known: builtin_known_forms(),
            skip_ids: default_skip_ids(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn validate_presentation(settings: &PresentationSettings) -> Result<(), ConfigLoadError> {
    if settings.error_dismiss_ms == 0 {
        return Err(ConfigLoadError::Validation(
            "presentation.error_dismiss_ms must be >= 1".to_string(),
        ));
    }
    if settings.submitting_label.trim().is_empty() {
        return Err(ConfigLoadError::Validation(
            "presentation.submitting_label must not be blank".to_string(),
        ));
    }
    if settings.generic_error.trim().is_empty() {
        return Err(ConfigLoadError::Validation(
            "presentation.generic_error must not be blank".to_string(),
        ));
    }
    Ok(())
}

fn default_source_label() -> String {
    "Website Form".to_string()
}

fn default_address_min_chars() -> usize {
    10
}

fn default_skip_ids() -> Vec<String> {
    vec!["testForm".to_string()]
}

fn default_log_level() -> String {
    "info".to_string()
}

fn true_value() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_yaml_uses_defaults() {
        let config = SiteConfig::from_yaml("version: \"1.0\"\n").unwrap();
        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.presentation.error_dismiss_ms, 8_000);
        assert_eq!(config.forms.known.len(), 9);
        assert_eq!(config.forms.skip_ids, vec!["testForm".to_string()]);
    }

    #[test]
    fn extra_aliases_appended_after_builtin() {
        let yaml = r#"
version: "1"
intake:
  extra_aliases:
    - alias: "street_address"
      field: "address"
"#;
        let config = SiteConfig::from_yaml(yaml).unwrap();
        let intake = config.intake_config();
        let builtin = FieldAliasTable::builtin().len();
        assert_eq!(intake.aliases.len(), builtin + 1);
        assert_eq!(
            intake.aliases.resolve("street_address"),
            Some(intake::CanonicalField::Address)
        );
    }

    #[test]
    fn unsupported_version_rejected() {
        let err = SiteConfig::from_yaml("version: \"2.0\"\n").unwrap_err();
        assert!(matches!(err, ConfigLoadError::UnsupportedVersion(v) if v == "2.0"));
    }

    #[test]
    fn bad_webhook_url_rejected() {
        let yaml = "version: \"1.0\"\nwebhook:\n  endpoint_url: \"ftp://example.com\"\n";
        assert!(matches!(
            SiteConfig::from_yaml(yaml),
            Err(ConfigLoadError::Webhook(_))
        ));
    }

    #[test]
    fn alias_shadowing_canonical_rejected() {
        let yaml = r#"
version: "1.0"
intake:
  extra_aliases:
    - alias: "email"
      field: "phone"
"#;
        assert!(matches!(
            SiteConfig::from_yaml(yaml),
            Err(ConfigLoadError::Intake(_))
        ));
    }

    #[test]
    fn zero_dismiss_rejected() {
        let yaml = "version: \"1.0\"\npresentation:\n  error_dismiss_ms: 0\n";
        assert!(matches!(
            SiteConfig::from_yaml(yaml),
            Err(ConfigLoadError::Validation(_))
        ));
    }

    #[test]
    fn duplicate_known_form_rejected() {
        let yaml = r#"
version: "1.0"
forms:
  known:
    - { id: "heroForm", form_type: "hero" }
    - { id: "heroForm", form_type: "bottom" }
"#;
        assert!(matches!(
            SiteConfig::from_yaml(yaml),
            Err(ConfigLoadError::Validation(msg)) if msg.contains("heroForm")
        ));
    }
}
