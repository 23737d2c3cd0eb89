//! Lead Intake Layer
//!
//! This is where form input enters the lead pipeline. We take whatever a page
//! form submitted, map its field names onto one canonical schema, derive the
//! missing name parts, and hand back a [`CanonicalLead`] with a stable shape.
//!
//! ## What we do here
//!
//! - **Resolve aliases** - `first_name`, `first-name`, `firstname` all land in
//!   `firstName`, applied in a fixed table order ([`FieldAliasTable`]).
//! - **Derive names** - `name` from first + last, or first + last split out of
//!   `name`. Never both.
//! - **Default everything** - unset fields are empty strings, never missing.
//! - **Validate** - required fields and email/phone/address formats via
//!   [`Validator`], reporting every violation.
//! - **Log** - structured events via tracing. Lead contents are never logged.
//!
//! ## Example
//!
//! ```
//! use chrono::Utc;
//! use intake::{normalize, IntakeConfig, Provenance, RawSubmission};
//!
//! let raw: RawSubmission = [
//!     ("full-name", "Ada Lovelace"),
//!     ("email", "ada@example.com"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let provenance = Provenance {
//!     form_type: "contact".into(),
//!     source: "Website Form".into(),
//!     submitted_at: Utc::now(),
//!     page_url: "https://example.com/".into(),
//!     user_agent: "doc-test".into(),
//! };
//!
//! let lead = normalize(&raw, provenance, &IntakeConfig::default());
//! assert_eq!(lead.name, "Ada Lovelace");
//! assert_eq!(lead.first_name, "Ada");
//! assert_eq!(lead.last_name, "Lovelace");
//! assert_eq!(lead.phone, "");
//! ```
use std::time::Instant;

use tracing::debug;

mod alias;
mod config;
mod normalize;
mod serde_iso;
mod types;
mod validate;

pub use crate::alias::{FieldAlias, FieldAliasTable};
pub use crate::config::{ConfigError, IntakeConfig};
pub use crate::normalize::{derive_names, sanitize_value, NameDerivation};
pub use crate::types::{CanonicalField, CanonicalLead, Provenance, RawSubmission};
pub use crate::validate::{
    is_valid_email, is_valid_phone, FieldKind, FieldSpec, FormSchema, ValidationResult,
    Validator, Violation, ADDRESS_MESSAGE, EMAIL_MESSAGE, PHONE_MESSAGE, REQUIRED_MESSAGE,
};

/// Normalize a raw submission into a canonical lead.
///
/// Pure apart from logging: the result depends only on `raw`, the alias
/// table in `cfg`, and the supplied `provenance`.
pub fn normalize(raw: &RawSubmission, provenance: Provenance, cfg: &IntakeConfig) -> CanonicalLead {
    let start = Instant::now();
    let mut lead = CanonicalLead::with_provenance(provenance);
    let derivation = normalize::apply_fields(raw, cfg, &mut lead);

    debug!(
        form_type = %lead.form_type,
        raw_fields = raw.len(),
        name_derivation = derivation.as_str(),
        elapsed_micros = start.elapsed().as_micros(),
        "normalize_success"
    );
    lead
}

/// Validate a raw submission against the form's declared fields.
pub fn validate(schema: &FormSchema, raw: &RawSubmission, cfg: &IntakeConfig) -> ValidationResult {
    let result = Validator::new(cfg).validate(schema, raw);
    if let ValidationResult::Invalid(violations) = &result {
        debug!(
            violations = violations.len(),
            first_field = %violations[0].field,
            "validation_failure"
        );
    }
    result
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDate, Utc};

    use super::*;

    fn fixed_timestamp() -> DateTime<Utc> {
        let Some(date) = NaiveDate::from_ymd_opt(2024, 1, 1) else {
            panic!("invalid date components");
        };
        let Some(date_time) = date.and_hms_opt(0, 0, 0) else {
            panic!("invalid time components");
        };
        DateTime::<Utc>::from_naive_utc_and_offset(date_time, Utc)
    }

    fn provenance() -> Provenance {
        Provenance {
            form_type: "hero".into(),
            source: "Website Form".into(),
            submitted_at: fixed_timestamp(),
            page_url: "https://example.com/sell".into(),
            user_agent: "unit-test".into(),
        }
    }

    #[test]
    fn provenance_copied_onto_lead() {
        let raw = RawSubmission::new();
        let lead = normalize(&raw, provenance(), &IntakeConfig::default());
        assert_eq!(lead.form_type, "hero");
        assert_eq!(lead.source, "Website Form");
        assert_eq!(lead.submitted_at, fixed_timestamp());
        assert_eq!(lead.page_url, "https://example.com/sell");
        assert_eq!(lead.user_agent, "unit-test");
    }

    #[test]
    fn unknown_fields_dropped_and_defaults_empty() {
        let raw: RawSubmission = [("utm_campaign", "spring"), ("email", "x@y.io")]
            .into_iter()
            .collect();
        let lead = normalize(&raw, provenance(), &IntakeConfig::default());
        let json = serde_json::to_value(&lead).unwrap();
        assert!(json.get("utm_campaign").is_none());
        assert_eq!(json["email"], "x@y.io");
        assert_eq!(json["beds"], "");
        assert_eq!(json["submittedAt"], "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn full_offer_form_maps_every_alias_family() {
        let raw: RawSubmission = [
            ("firstname", "Grace"),
            ("lastname", "Hopper"),
            ("propertyaddress", "1 Navy Yard Arlington VA"),
            ("bedrooms", "3"),
            ("bathrooms", "2"),
            ("property-condition", "Needs work"),
            ("when-to-sell", "ASAP"),
            ("propertyType", "Single Family"),
        ]
        .into_iter()
        .collect();

        let lead = normalize(&raw, provenance(), &IntakeConfig::default());
        assert_eq!(lead.name, "Grace Hopper");
        assert_eq!(lead.address, "1 Navy Yard Arlington VA");
        assert_eq!(lead.beds, "3");
        assert_eq!(lead.baths, "2");
        assert_eq!(lead.condition, "Needs work");
        assert_eq!(lead.timeframe, "ASAP");
        assert_eq!(lead.property_type, "Single Family");
    }

    #[test]
    fn sanitize_can_be_disabled() {
        let raw: RawSubmission = [("message", "  spaced  ")].into_iter().collect();
        let cfg = IntakeConfig {
            sanitize_values: false,
            ..Default::default()
        };
        let lead = normalize(&raw, provenance(), &cfg);
        assert_eq!(lead.message, "  spaced  ");
    }

    #[test]
    fn validate_wrapper_reports_required() {
        let schema = FormSchema::new(vec![FieldSpec::new("phone", FieldKind::Tel).required()]);
        let res = validate(&schema, &RawSubmission::new(), &IntakeConfig::default());
        assert_eq!(res.first_message(), Some(REQUIRED_MESSAGE));
    }
}
