//! Presentation adapter: turns submission outcomes into view changes.
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

use crate::view::{FormView, PanelId, PanelKind, Placement};

pub const SUCCESS_ICON: &str = "check-circle";

/// User-visible strings and timings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationSettings {
    /// Label shown on the submit control while a delivery is pending.
    pub submitting_label: String,
    /// Error panels are removed after this long unless dismissed sooner.
    pub error_dismiss_ms: u64,
    pub success_title: String,
    pub success_subtitle: String,
    /// Shown for transport failures and body-less rejections.
    pub generic_error: String,
}

impl Default for PresentationSettings {
    fn default() -> Self {
        Self {
            submitting_label: "Submitting...".to_string(),
            error_dismiss_ms: 8_000,
            success_title: "We received your submission!".to_string(),
            success_subtitle: "Thanks! We will contact you shortly.".to_string(),
            generic_error: "There was an error submitting your information. Please try again."
                .to_string(),
        }
    }
}

impl PresentationSettings {
    pub fn error_dismiss(&self) -> Duration {
        Duration::from_millis(self.error_dismiss_ms)
    }
}

/// Re-renders icon markup after panels are inserted.
pub trait IconRenderer: Send + Sync {
    fn render_icons(&self);
}

/// What the submission controller asks of the page.
pub trait Presenter: Send + Sync {
    /// Disables the submit control and shows `label`. Returns the label it replaced.
    fn show_loading(&self, label: &str) -> String;
    /// Re-enables the submit control with its original label.
    fn restore_submit(&self, original_label: &str);
    fn clear_fields(&self);
    fn show_success(&self);
    fn show_error(&self, message: &str);
    /// Removes the error message before its timer fires.
    fn dismiss_error(&self);
}

/// [`Presenter`] over an in-memory [`FormView`].
pub struct ViewPresenter {
    view: Arc<FormView>,
    settings: Arc<PresentationSettings>,
    icons: Option<Arc<dyn IconRenderer>>,
    pending_dismiss: Mutex<Option<AbortHandle>>,
}

impl ViewPresenter {
    pub fn new(view: Arc<FormView>, settings: Arc<PresentationSettings>) -> Self {
        Self {
            view,
            settings,
            icons: None,
            pending_dismiss: Mutex::new(None),
        }
    }

    pub fn with_icons(mut self, icons: Arc<dyn IconRenderer>) -> Self {
        self.icons = Some(icons);
        self
    }

    pub fn view(&self) -> &Arc<FormView> {
        &self.view
    }

    /// Clears transient messages for this form and any timer attached to them.
    fn clear_messages(&self) {
        self.cancel_dismiss();
        self.view.clear_panels();
    }

    fn cancel_dismiss(&self) {
        let pending = self
            .pending_dismiss
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = pending {
            handle.abort();
        }
    }

    fn schedule_dismiss(&self, panel: PanelId) {
        let Ok(runtime) = Handle::try_current() else {
            warn!("no async runtime; error panel will stay until dismissed");
            return;
        };
        let view = Arc::clone(&self.view);
        let delay = self.settings.error_dismiss();
        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if view.remove_panel(panel) {
                debug!("error_auto_dismissed");
            }
        });
        *self
            .pending_dismiss
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(task.abort_handle());
    }

    fn render_icons(&self) {
        if let Some(icons) = &self.icons {
            icons.render_icons();
        }
    }
}

impl Presenter for ViewPresenter {
    fn show_loading(&self, label: &str) -> String {
        let original = self.view.submit_control().label;
        self.view.set_submit(false, label);
        original
    }

    fn restore_submit(&self, original_label: &str) {
        self.view.set_submit(true, original_label);
    }

    fn clear_fields(&self) {
        self.view.clear_values();
    }

    fn show_success(&self) {
        self.clear_messages();
        self.view.mark_completed();
        self.view.append_panel(
            PanelKind::Success {
                icon: SUCCESS_ICON.to_string(),
                title: self.settings.success_title.clone(),
                subtitle: self.settings.success_subtitle.clone(),
            },
            Placement::InsideForm,
        );
        self.render_icons();
    }

    fn show_error(&self, message: &str) {
        self.clear_messages();
        let panel = self.view.append_panel(
            PanelKind::Error {
                message: message.to_string(),
            },
            Placement::AfterForm,
        );
        self.schedule_dismiss(panel);
    }

    fn dismiss_error(&self) {
        self.cancel_dismiss();
        for panel in self.view.panels().iter().filter(|p| p.is_error()) {
            self.view.remove_panel(panel.id);
        }
    }
}

impl Drop for ViewPresenter {
    fn drop(&mut self) {
        self.cancel_dismiss();
    }
}

/// Formats typed phone input as `(DDD) DDD-DDDD`.
///
/// Non-digits are dropped and anything past ten digits is cut before
/// formatting, so partial input renders as `(DDD` or `(DDD) DDD`.
///
/// ```rust
/// use leadpipe::format_phone;
///
/// assert_eq!(format_phone("5551234567"), "(555) 123-4567");
/// assert_eq!(format_phone("555123"), "(555) 123");
/// assert_eq!(format_phone(""), "");
/// ```
pub fn format_phone(input: &str) -> String {
    let digits: String = input
        .chars()
        .filter(char::is_ascii_digit)
        .take(10)
        .collect();

    match digits.len() {
        0 => String::new(),
        1..=3 => format!("({digits}"),
        4..=6 => format!("({}) {}", &digits[..3], &digits[3..]),
        _ => format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..]),
    }
}
