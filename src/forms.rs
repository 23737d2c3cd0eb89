//! Form definitions and form-type inference.
//!
//! Every adopted form carries one logical type (`hero`, `contact`,
//! `callback-widget`, ...). Known form ids have a default type; any other
//! form gets one inferred by [`classify_form_type`]. An explicit per-form
//! override always wins.
use intake::FormSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_FORM_TYPE: &str = "website";

/// Id of the offer modal form built for each page.
pub const MODAL_FORM_ID: &str = "detailedOfferForm";

/// Class name patterns checked in order when a form has no override or id.
const CLASS_PATTERNS: &[(&str, &str)] = &[
    ("modal-form", "modal"),
    ("contact-form", "contact"),
    ("bottom-offer-form", "bottom"),
    ("offer-form", "hero"),
];

const BUILTIN_KNOWN_FORMS: &[(&str, &str)] = &[
    ("quickOfferForm", "hero"),
    ("heroForm", "testimonials"),
    ("detailedOfferForm", "modal"),
    ("bottomOfferForm", "bottom"),
    ("offerFormSticky", "cash-offer"),
    ("contactForm", "contact"),
    ("stopForeclosureForm", "foreclosure-guide"),
    ("howItWorksForm", "how-it-works"),
    ("callbackForm", "callback-widget"),
];

/// A form id the site always wires, with its default type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownForm {
    pub id: String,
    pub form_type: String,
}

pub fn builtin_known_forms() -> Vec<KnownForm> {
    BUILTIN_KNOWN_FORMS
        .iter()
        .map(|(id, form_type)| KnownForm {
            id: (*id).to_string(),
            form_type: (*form_type).to_string(),
        })
        .collect()
}

/// A form as declared by the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDefinition {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    /// Explicit type override carried by the form element.
    #[serde(default)]
    pub declared_type: Option<String>,
    pub fields: FormSchema,
    pub submit_label: String,
}

impl FormDefinition {
    pub fn new(id: impl Into<String>, fields: FormSchema, submit_label: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            classes: Vec::new(),
            declared_type: None,
            fields,
            submit_label: submit_label.into(),
        }
    }

    pub fn with_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes = classes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_declared_type(mut self, form_type: impl Into<String>) -> Self {
        self.declared_type = Some(form_type.into());
        self
    }

    pub fn without_id(mut self) -> Self {
        self.id = None;
        self
    }

    /// Id with blank values treated as absent.
    pub fn identifier(&self) -> Option<&str> {
        non_blank(self.id.as_deref())
    }
}

/// Infers a form type: explicit override > identifier > class pattern > `website`.
///
/// ```rust
/// use leadpipe::classify_form_type;
///
/// let classes = vec!["offer-form".to_string()];
/// assert_eq!(classify_form_type(None, None, &classes), "hero");
/// assert_eq!(classify_form_type(Some("sidebarForm"), None, &classes), "sidebarForm");
/// assert_eq!(classify_form_type(Some("sidebarForm"), Some("promo"), &classes), "promo");
/// assert_eq!(classify_form_type(None, None, &[]), "website");
/// ```
pub fn classify_form_type(
    identifier: Option<&str>,
    declared_type: Option<&str>,
    classes: &[String],
) -> String {
    if let Some(declared) = non_blank(declared_type) {
        return declared.to_string();
    }
    if let Some(id) = non_blank(identifier) {
        return id.to_string();
    }
    CLASS_PATTERNS
        .iter()
        .find(|(class, _)| classes.iter().any(|c| c == class))
        .map(|(_, form_type)| (*form_type).to_string())
        .unwrap_or_else(|| DEFAULT_FORM_TYPE.to_string())
}

/// Resolves the type a form is registered with, consulting the known table first.
pub fn resolve_form_type(definition: &FormDefinition, known: &[KnownForm]) -> String {
    let declared = non_blank(definition.declared_type.as_deref());
    let known_type = definition
        .identifier()
        .and_then(|id| known.iter().find(|k| k.id == id));

    match (declared, known_type) {
        (Some(declared), _) => declared.to_string(),
        (None, Some(known)) => known.form_type.clone(),
        (None, None) => classify_form_type(definition.identifier(), None, &definition.classes),
    }
}

/// [`resolve_form_type`] for a form on `page_url`.
///
/// The offer modal has no fixed type: unless it declares one it is typed
/// after the page it was opened on.
pub fn resolve_page_form_type(
    definition: &FormDefinition,
    known: &[KnownForm],
    page_url: &str,
) -> String {
    let undeclared = non_blank(definition.declared_type.as_deref()).is_none();
    if undeclared && definition.identifier() == Some(MODAL_FORM_ID) {
        return modal_form_type(page_url);
    }
    resolve_form_type(definition, known)
}

/// Type used by the offer modal built for a page: `modal-{slug}`.
///
/// The slug is the last path segment without `.html`; the site root maps to
/// `index` and a bare `.html` segment to `home`.
pub fn modal_form_type(page_url: &str) -> String {
    format!("modal-{}", page_slug(page_url))
}

fn page_slug(page_url: &str) -> String {
    let after_scheme = page_url
        .split_once("://")
        .map_or(page_url, |(_, rest)| rest);
    let path = match after_scheme.find('/') {
        Some(idx) if page_url.contains("://") => &after_scheme[idx..],
        Some(_) => after_scheme,
        None if page_url.contains("://") => "/",
        None => after_scheme,
    };
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segment = path.rsplit('/').next().unwrap_or_default();
    let segment = if segment.is_empty() { "index.html" } else { segment };
    let slug = segment.replacen(".html", "", 1);
    if slug.is_empty() {
        "home".to_string()
    } else {
        slug
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
