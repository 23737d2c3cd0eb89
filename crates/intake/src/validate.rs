//! Format and presence checks run before a lead leaves the page.
//!
//! Rules, in reporting order:
//!
//! | Rule     | Applies to                         | Message                               |
//! |----------|------------------------------------|---------------------------------------|
//! | required | every field marked required        | `This field is required.`             |
//! | email    | first email field, when non-blank  | `Please enter a valid email address.` |
//! | phone    | first tel field, when non-blank    | `Please enter a valid phone number.`  |
//! | address  | first address field, when non-blank| `Please enter a complete address.`    |
//!
//! Every rule is evaluated; [`ValidationResult::Invalid`] lists all violations.
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::alias::FieldAliasTable;
use crate::config::IntakeConfig;
use crate::normalize::is_blank;
use crate::types::{CanonicalField, RawSubmission};

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const EMAIL_MESSAGE: &str = "Please enter a valid email address.";
pub const PHONE_MESSAGE: &str = "Please enter a valid phone number.";
pub const ADDRESS_MESSAGE: &str = "Please enter a complete address.";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(\d{3}\) \d{3}-\d{4}$").expect("valid phone pattern"));

/// Input kinds the validator distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    Email,
    Tel,
    Number,
    Select,
    TextArea,
    Hidden,
}

/// One input of a form as declared by the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// The declared inputs of a form, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormSchema {
    fields: Vec<FieldSpec>,
}

impl FormSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    fn first_of_kind(&self, kind: FieldKind) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.kind == kind)
    }
}

impl FromIterator<FieldSpec> for FormSchema {
    fn from_iter<I: IntoIterator<Item = FieldSpec>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A single failed rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationResult {
    Valid,
    Invalid(Vec<Violation>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn violations(&self) -> &[Violation] {
        match self {
            ValidationResult::Valid => &[],
            ValidationResult::Invalid(violations) => violations,
        }
    }

    /// The message shown to the user when validation fails.
    pub fn first_message(&self) -> Option<&str> {
        self.violations().first().map(|v| v.message.as_str())
    }
}

/// Runs the rules against a form's declared fields and current values.
#[derive(Debug, Clone)]
pub struct Validator<'a> {
    aliases: &'a FieldAliasTable,
    address_min_chars: usize,
}

impl<'a> Validator<'a> {
    pub fn new(cfg: &'a IntakeConfig) -> Self {
        Self {
            aliases: &cfg.aliases,
            address_min_chars: cfg.address_min_chars,
        }
    }

    pub fn validate(&self, schema: &FormSchema, raw: &RawSubmission) -> ValidationResult {
        let value_of = |spec: &FieldSpec| raw.get(&spec.name).unwrap_or_default();
        let mut violations = Vec::new();

        for spec in schema.fields().iter().filter(|spec| spec.required) {
            if is_blank(value_of(spec)) {
                violations.push(Violation::new(&spec.name, REQUIRED_MESSAGE));
            }
        }

        if let Some(spec) = schema.first_of_kind(FieldKind::Email) {
            let value = value_of(spec);
            if !is_blank(value) && !is_valid_email(value) {
                violations.push(Violation::new(&spec.name, EMAIL_MESSAGE));
            }
        }

        if let Some(spec) = schema.first_of_kind(FieldKind::Tel) {
            let value = value_of(spec);
            if !is_blank(value) && !is_valid_phone(value) {
                violations.push(Violation::new(&spec.name, PHONE_MESSAGE));
            }
        }

        let address = schema
            .fields()
            .iter()
            .find(|spec| self.aliases.resolve(&spec.name) == Some(CanonicalField::Address));
        if let Some(spec) = address {
            let value = value_of(spec).trim();
            if !value.is_empty() && value.chars().count() < self.address_min_chars {
                violations.push(Violation::new(&spec.name, ADDRESS_MESSAGE));
            }
        }

        if violations.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(violations)
        }
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// True only for the fully formatted `(XXX) XXX-XXXX` shape.
pub fn is_valid_phone(value: &str) -> bool {
    PHONE_RE.is_match(value)
}
