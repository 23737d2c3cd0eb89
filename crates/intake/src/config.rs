//! Configuration types for the intake stage.
//!
//! [`IntakeConfig`] carries the alias table and the few knobs the normalizer
//! and validator read. It is built once per page and shared read-only by
//! every form, so it is cheap to clone and serializable from YAML or JSON.
//!
//! ```rust
//! use intake::IntakeConfig;
//!
//! let config = IntakeConfig::default();
//! config.validate().expect("defaults are valid");
//! assert_eq!(config.source_label, "Website Form");
//! assert_eq!(config.address_min_chars, 10);
//! ```
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::alias::FieldAliasTable;
use crate::types::CanonicalField;

/// Runtime configuration for normalization and validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Version of the intake configuration.
    ///
    /// Default: `1`
    pub version: u32,

    /// Provenance label stamped on every lead.
    ///
    /// Default: `"Website Form"`
    pub source_label: String,

    /// Trim canonical values and strip control characters other than
    /// newline and tab.
    ///
    /// Default: `true`
    pub sanitize_values: bool,

    /// Minimum character count of a non-blank address.
    ///
    /// Default: `10`
    pub address_min_chars: usize,

    /// Ordered alias table applied by the normalizer.
    ///
    /// Default: [`FieldAliasTable::builtin`]
    pub aliases: FieldAliasTable,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            version: 1,
            source_label: "Website Form".to_string(),
            sanitize_values: true,
            address_min_chars: 10,
            aliases: FieldAliasTable::builtin(),
        }
    }
}

impl IntakeConfig {
    /// Checks the configuration for inconsistencies. Call once at start-up.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 {
            return Err(ConfigError::InvalidVersion);
        }
        if self.source_label.trim().is_empty() {
            return Err(ConfigError::BlankSourceLabel);
        }
        if self.address_min_chars == 0 {
            return Err(ConfigError::ZeroAddressMinimum);
        }
        self.aliases.validate()
    }
}

/// Errors raised when validating an [`IntakeConfig`].
///
/// These are start-up problems, not per-submission failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("intake config version must be at least 1")]
    InvalidVersion,

    #[error("source label must not be blank")]
    BlankSourceLabel,

    #[error("address minimum length must be greater than zero")]
    ZeroAddressMinimum,

    #[error("alias at index {index} is blank")]
    BlankAlias { index: usize },

    #[error("alias '{0}' shadows a canonical field name")]
    AliasShadowsCanonical(String),

    #[error("alias '{alias}' maps to both {first} and {second}")]
    ConflictingAlias {
        alias: String,
        first: CanonicalField,
        second: CanonicalField,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(IntakeConfig::default().validate().is_ok());
    }

    #[test]
    fn blank_source_label_rejected() {
        let cfg = IntakeConfig {
            source_label: "   ".into(),
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::BlankSourceLabel));
    }

    #[test]
    fn zero_values_rejected() {
        let cfg = IntakeConfig {
            version: 0,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidVersion));

        let cfg = IntakeConfig {
            address_min_chars: 0,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroAddressMinimum));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: IntakeConfig =
            serde_json::from_str(r#"{ "source_label": "Landing Page" }"#).unwrap();
        assert_eq!(cfg.source_label, "Landing Page");
        assert_eq!(cfg.address_min_chars, 10);
        assert_eq!(cfg.aliases, FieldAliasTable::builtin());
    }
}
