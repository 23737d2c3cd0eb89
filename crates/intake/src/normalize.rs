//! Field normalization: raw form entries → canonical lead attributes.
//!
//! # Flow
//!
//! ```text
//! RawSubmission
//!        │
//!        ▼
//! ┌──────────────────────────────┐
//! │ 1. Copy canonical names      │
//! │ 2. Apply aliases (in order)  │
//! │ 3. message ← subject         │
//! │ 4. Sanitize values           │
//! │ 5. Derive name / first+last  │
//! └──────────────────────────────┘
//!        │
//!        ▼
//! CanonicalLead
//! ```
use crate::config::IntakeConfig;
use crate::types::{CanonicalField, CanonicalLead, RawSubmission};

/// Raw field read as the message body when no `message` was supplied.
const MESSAGE_FALLBACK_FIELD: &str = "subject";

/// Which name derivation ran for a submission. At most one ever does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameDerivation {
    /// `name` was built from first and last name.
    Composed,
    /// First and last name were split out of `name`.
    Split,
    /// Nothing to derive.
    Unchanged,
}

impl NameDerivation {
    pub fn as_str(self) -> &'static str {
        match self {
            NameDerivation::Composed => "composed",
            NameDerivation::Split => "split",
            NameDerivation::Unchanged => "unchanged",
        }
    }
}

/// Fills the user-supplied attributes of `lead` from `raw`.
pub(crate) fn apply_fields(
    raw: &RawSubmission,
    cfg: &IntakeConfig,
    lead: &mut CanonicalLead,
) -> NameDerivation {
    for field in CanonicalField::ALL {
        if let Some(value) = raw.get(field.as_str()) {
            *lead.field_mut(field) = value.to_string();
        }
    }

    // Later entries overwrite earlier ones; the table order is the contract.
    for entry in cfg.aliases.iter() {
        if let Some(value) = raw.get_non_empty(&entry.alias) {
            *lead.field_mut(entry.field) = value.to_string();
        }
    }

    if lead.message.is_empty() {
        if let Some(subject) = raw.get_non_empty(MESSAGE_FALLBACK_FIELD) {
            lead.message = subject.to_string();
        }
    }

    if cfg.sanitize_values {
        for field in CanonicalField::ALL {
            let slot = lead.field_mut(field);
            *slot = sanitize_value(slot);
        }
    }

    derive_names(lead)
}

/// Makes `name` and `firstName`/`lastName` agree. See [`NameDerivation`].
pub fn derive_names(lead: &mut CanonicalLead) -> NameDerivation {
    let name_blank = is_blank(&lead.name);
    let first_blank = is_blank(&lead.first_name);
    let last_blank = is_blank(&lead.last_name);

    if name_blank && (!first_blank || !last_blank) {
        let joined = format!("{} {}", lead.first_name.trim(), lead.last_name.trim());
        lead.name = joined.trim().to_string();
        NameDerivation::Composed
    } else if !name_blank && first_blank && last_blank {
        let mut tokens = lead.name.split_whitespace();
        lead.first_name = tokens.next().unwrap_or_default().to_string();
        lead.last_name = tokens.collect::<Vec<_>>().join(" ");
        NameDerivation::Split
    } else {
        NameDerivation::Unchanged
    }
}

/// Trims edges and drops control characters, keeping newlines and tabs so
/// multi-line messages survive.
pub fn sanitize_value(value: &str) -> String {
    let kept: String = value
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect();
    kept.trim().to_string()
}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
