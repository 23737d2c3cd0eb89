//! Core data model types for the intake crate.
//!
//! These types represent what a form hands us at submit time and the
//! normalized lead record that flows on to delivery.
//!
//! # Type Hierarchy
//!
//! ```text
//! RawSubmission
//! └── fields: [(name, value)]       (form order, last write per name wins)
//!
//!         ↓ normalize()
//!
//! CanonicalLead
//! ├── firstName / lastName / name   (derived, see normalize)
//! ├── email / phone / address
//! ├── beds / baths / condition / timeframe / propertyType
//! ├── message
//! └── provenance
//!     ├── formType
//!     ├── source                    ("Website Form")
//!     ├── submittedAt               (ISO-8601, millisecond precision)
//!     ├── pageUrl
//!     └── userAgent
//! ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Field values read from a form at the moment of submission.
///
/// Keeps insertion order. Writing an existing name replaces its value in
/// place, which matches how a form's entries collapse into one object.
///
/// ```rust
/// use intake::RawSubmission;
///
/// let raw: RawSubmission = [("first_name", "Ada"), ("email", "ada@example.com")]
///     .into_iter()
///     .collect();
///
/// assert_eq!(raw.get("first_name"), Some("Ada"));
/// assert_eq!(raw.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSubmission {
    fields: Vec<(String, String)>,
}

impl RawSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`, replacing any earlier value for the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the value for `name` only when it is present and non-empty.
    pub fn get_non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|value| !value.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawSubmission
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut raw = RawSubmission::new();
        for (name, value) in iter {
            raw.insert(name, value);
        }
        raw
    }
}

/// The user-supplied attributes of a [`CanonicalLead`].
///
/// `as_str` yields the canonical (wire) name of each field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CanonicalField {
    FirstName,
    LastName,
    Name,
    Email,
    Phone,
    Address,
    Beds,
    Baths,
    Condition,
    Timeframe,
    PropertyType,
    Message,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 12] = [
        CanonicalField::FirstName,
        CanonicalField::LastName,
        CanonicalField::Name,
        CanonicalField::Email,
        CanonicalField::Phone,
        CanonicalField::Address,
        CanonicalField::Beds,
        CanonicalField::Baths,
        CanonicalField::Condition,
        CanonicalField::Timeframe,
        CanonicalField::PropertyType,
        CanonicalField::Message,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalField::FirstName => "firstName",
            CanonicalField::LastName => "lastName",
            CanonicalField::Name => "name",
            CanonicalField::Email => "email",
            CanonicalField::Phone => "phone",
            CanonicalField::Address => "address",
            CanonicalField::Beds => "beds",
            CanonicalField::Baths => "baths",
            CanonicalField::Condition => "condition",
            CanonicalField::Timeframe => "timeframe",
            CanonicalField::PropertyType => "propertyType",
            CanonicalField::Message => "message",
        }
    }

    /// Looks up a field by its canonical name. Aliases are not resolved here.
    pub fn from_name(name: &str) -> Option<CanonicalField> {
        CanonicalField::ALL
            .into_iter()
            .find(|field| field.as_str() == name)
    }
}

impl std::fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Context describing where a lead came from. Not typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    /// Logical form type, e.g. `contact` or `callback-widget`.
    pub form_type: String,
    /// Source label; the default config uses `"Website Form"`.
    pub source: String,
    pub submitted_at: DateTime<Utc>,
    pub page_url: String,
    pub user_agent: String,
}

/// The normalized lead record delivered to the webhook.
///
/// Every attribute is a plain string; unset fields are empty so the
/// serialized payload always has the same shape.
///
/// ```rust
/// use intake::CanonicalLead;
///
/// let lead = CanonicalLead::default();
/// let json = serde_json::to_value(&lead).unwrap();
/// assert_eq!(json["firstName"], "");
/// assert_eq!(json["propertyType"], "");
/// assert!(json["submittedAt"].as_str().unwrap().ends_with('Z'));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalLead {
    pub first_name: String,
    pub last_name: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub beds: String,
    pub baths: String,
    pub condition: String,
    pub timeframe: String,
    pub property_type: String,
    pub message: String,
    pub form_type: String,
    pub source: String,
    #[serde(with = "crate::serde_iso")]
    pub submitted_at: DateTime<Utc>,
    pub page_url: String,
    pub user_agent: String,
}

impl CanonicalLead {
    /// Builds an empty lead carrying only provenance.
    pub fn with_provenance(provenance: Provenance) -> Self {
        let Provenance {
            form_type,
            source,
            submitted_at,
            page_url,
            user_agent,
        } = provenance;
        Self {
            form_type,
            source,
            submitted_at,
            page_url,
            user_agent,
            ..Default::default()
        }
    }

    pub fn field(&self, field: CanonicalField) -> &str {
        match field {
            CanonicalField::FirstName => &self.first_name,
            CanonicalField::LastName => &self.last_name,
            CanonicalField::Name => &self.name,
            CanonicalField::Email => &self.email,
            CanonicalField::Phone => &self.phone,
            CanonicalField::Address => &self.address,
            CanonicalField::Beds => &self.beds,
            CanonicalField::Baths => &self.baths,
            CanonicalField::Condition => &self.condition,
            CanonicalField::Timeframe => &self.timeframe,
            CanonicalField::PropertyType => &self.property_type,
            CanonicalField::Message => &self.message,
        }
    }

    pub fn field_mut(&mut self, field: CanonicalField) -> &mut String {
        match field {
            CanonicalField::FirstName => &mut self.first_name,
            CanonicalField::LastName => &mut self.last_name,
            CanonicalField::Name => &mut self.name,
            CanonicalField::Email => &mut self.email,
            CanonicalField::Phone => &mut self.phone,
            CanonicalField::Address => &mut self.address,
            CanonicalField::Beds => &mut self.beds,
            CanonicalField::Baths => &mut self.baths,
            CanonicalField::Condition => &mut self.condition,
            CanonicalField::Timeframe => &mut self.timeframe,
            CanonicalField::PropertyType => &mut self.property_type,
            CanonicalField::Message => &mut self.message,
        }
    }
}
