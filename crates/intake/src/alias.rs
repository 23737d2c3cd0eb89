//! Field alias table: alternate form field spellings → canonical fields.
//!
//! Pages built over time name the same input differently (`first-name`,
//! `firstname`, `first_name`, ...). The table maps each known spelling to a
//! [`CanonicalField`].
//!
//! # Application order
//!
//! Aliases are applied in table order. When a submission carries two aliases
//! for the same canonical field (say `firstname` and `first_name`), the one
//! that appears later in the table wins. Extra aliases from configuration are
//! appended after the built-in entries, so they win over built-ins.
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::types::CanonicalField;

const BUILTIN_ALIASES: &[(&str, CanonicalField)] = &[
    ("first-name", CanonicalField::FirstName),
    ("firstname", CanonicalField::FirstName),
    ("first_name", CanonicalField::FirstName),
    ("last-name", CanonicalField::LastName),
    ("lastname", CanonicalField::LastName),
    ("last_name", CanonicalField::LastName),
    ("full-name", CanonicalField::Name),
    ("fullname", CanonicalField::Name),
    ("full_name", CanonicalField::Name),
    ("property-address", CanonicalField::Address),
    ("property_address", CanonicalField::Address),
    ("propertyaddress", CanonicalField::Address),
    ("bedrooms", CanonicalField::Beds),
    ("bathrooms", CanonicalField::Baths),
    ("property-condition", CanonicalField::Condition),
    ("property_condition", CanonicalField::Condition),
    ("when-to-sell", CanonicalField::Timeframe),
    ("selling-timeframe", CanonicalField::Timeframe),
    ("timeline", CanonicalField::Timeframe),
];

/// One alternate spelling and the canonical field it feeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAlias {
    pub alias: String,
    pub field: CanonicalField,
}

/// Ordered, immutable alias table. See the module docs for ordering rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldAliasTable {
    entries: Vec<FieldAlias>,
}

impl FieldAliasTable {
    /// The table every known page layout is covered by.
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_ALIASES
                .iter()
                .map(|(alias, field)| FieldAlias {
                    alias: (*alias).to_string(),
                    field: *field,
                })
                .collect(),
        }
    }

    /// Returns a copy with `extra` appended after the existing entries.
    pub fn with_extra<I>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = FieldAlias>,
    {
        let mut entries = self.entries.clone();
        entries.extend(extra);
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldAlias> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves a raw field name: canonical names map to themselves, known
    /// aliases to their target. The first matching alias entry is returned.
    pub fn resolve(&self, raw_name: &str) -> Option<CanonicalField> {
        CanonicalField::from_name(raw_name).or_else(|| {
            self.entries
                .iter()
                .find(|entry| entry.alias == raw_name)
                .map(|entry| entry.field)
        })
    }

    /// Rejects blank aliases, aliases that shadow a canonical name, and one
    /// spelling mapped to two different fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (idx, entry) in self.entries.iter().enumerate() {
            if entry.alias.trim().is_empty() {
                return Err(ConfigError::BlankAlias { index: idx });
            }
            if CanonicalField::from_name(&entry.alias).is_some() {
                return Err(ConfigError::AliasShadowsCanonical(entry.alias.clone()));
            }
            let conflict = self.entries[..idx]
                .iter()
                .find(|earlier| earlier.alias == entry.alias && earlier.field != entry.field);
            if let Some(earlier) = conflict {
                return Err(ConfigError::ConflictingAlias {
                    alias: entry.alias.clone(),
                    first: earlier.field,
                    second: entry.field,
                });
            }
        }
        Ok(())
    }
}

impl Default for FieldAliasTable {
    fn default() -> Self {
        Self::builtin()
    }
}
