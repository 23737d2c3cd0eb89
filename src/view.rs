//! In-memory form state.
//!
//! A [`FormView`] holds what a rendered form shows: field values, the submit
//! control, container styling and any transient message panels. The
//! presentation adapter is the only writer of everything except field
//! values; user input goes through [`FormView::input`].
use std::sync::{Mutex, MutexGuard, PoisonError};

use intake::{FieldKind, FormSchema, RawSubmission};

use crate::forms::FormDefinition;
use crate::presenter::format_phone;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitControl {
    pub enabled: bool,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContainerStyle {
    #[default]
    Default,
    /// Background, border and padding removed after a successful submission.
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    InsideForm,
    AfterForm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelKind {
    Success {
        icon: String,
        title: String,
        subtitle: String,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PanelId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub id: PanelId,
    pub kind: PanelKind,
    pub placement: Placement,
}

impl Panel {
    pub fn is_error(&self) -> bool {
        matches!(self.kind, PanelKind::Error { .. })
    }

    pub fn is_success(&self) -> bool {
        matches!(self.kind, PanelKind::Success { .. })
    }
}

#[derive(Debug)]
struct ViewState {
    values: Vec<(String, String)>,
    submit: SubmitControl,
    container: ContainerStyle,
    children_hidden: bool,
    panels: Vec<Panel>,
    next_panel: u64,
}

/// One rendered form.
#[derive(Debug)]
pub struct FormView {
    definition: FormDefinition,
    state: Mutex<ViewState>,
}

impl FormView {
    pub fn new(definition: FormDefinition) -> Self {
        // Inputs sharing a name (radio groups) hold one value.
        let mut values: Vec<(String, String)> = Vec::new();
        for spec in definition.fields.fields() {
            if spec.name.is_empty() || values.iter().any(|(name, _)| *name == spec.name) {
                continue;
            }
            values.push((spec.name.clone(), String::new()));
        }
        let submit = SubmitControl {
            enabled: true,
            label: definition.submit_label.clone(),
        };
        Self {
            definition,
            state: Mutex::new(ViewState {
                values,
                submit,
                container: ContainerStyle::Default,
                children_hidden: false,
                panels: Vec::new(),
                next_panel: 0,
            }),
        }
    }

    pub fn definition(&self) -> &FormDefinition {
        &self.definition
    }

    pub fn schema(&self) -> &FormSchema {
        &self.definition.fields
    }

    /// Types text into a field. Tel fields are reformatted on every input.
    ///
    /// Returns `false` when the form has no such field.
    pub fn input(&self, field: &str, text: &str) -> bool {
        let formatted = match self.schema().field(field).map(|spec| spec.kind) {
            Some(FieldKind::Tel) => format_phone(text),
            Some(_) => text.to_string(),
            None => return false,
        };
        self.set_value(field, formatted)
    }

    /// Sets a field value verbatim, bypassing input formatting.
    pub fn set_value(&self, field: &str, value: impl Into<String>) -> bool {
        let mut state = self.state();
        match state.values.iter_mut().find(|(name, _)| name == field) {
            Some((_, slot)) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    pub fn value(&self, field: &str) -> Option<String> {
        self.state()
            .values
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.clone())
    }

    /// Fresh snapshot of every named field, empty values included.
    pub fn snapshot(&self) -> RawSubmission {
        self.state()
            .values
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    pub fn submit_control(&self) -> SubmitControl {
        self.state().submit.clone()
    }

    pub fn container(&self) -> ContainerStyle {
        self.state().container
    }

    pub fn children_hidden(&self) -> bool {
        self.state().children_hidden
    }

    pub fn panels(&self) -> Vec<Panel> {
        self.state().panels.clone()
    }

    pub fn error_panels(&self) -> usize {
        self.state().panels.iter().filter(|p| p.is_error()).count()
    }

    pub fn success_panels(&self) -> usize {
        self.state().panels.iter().filter(|p| p.is_success()).count()
    }

    pub(crate) fn set_submit(&self, enabled: bool, label: &str) {
        let mut state = self.state();
        state.submit.enabled = enabled;
        state.submit.label = label.to_string();
    }

    pub(crate) fn clear_values(&self) {
        for (_, value) in self.state().values.iter_mut() {
            value.clear();
        }
    }

    pub(crate) fn mark_completed(&self) {
        let mut state = self.state();
        state.container = ContainerStyle::Neutral;
        state.children_hidden = true;
    }

    pub(crate) fn append_panel(&self, kind: PanelKind, placement: Placement) -> PanelId {
        let mut state = self.state();
        let id = PanelId(state.next_panel);
        state.next_panel += 1;
        state.panels.push(Panel {
            id,
            kind,
            placement,
        });
        id
    }

    pub(crate) fn remove_panel(&self, id: PanelId) -> bool {
        let mut state = self.state();
        let before = state.panels.len();
        state.panels.retain(|panel| panel.id != id);
        state.panels.len() != before
    }

    pub(crate) fn clear_panels(&self) {
        self.state().panels.clear();
    }

    fn state(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
