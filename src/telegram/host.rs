//! Seams to the environment the Mini-App runs in
//!
//! The browser, the Telegram client and the page document are all
//! external collaborators. They are reached only through the traits in
//! this module, so the handshake and the navigation table can be driven
//! by a real WebView binding, by the CLI, or by tests.

use serde::Serialize;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::error::AppError;
use crate::telegram::init_data::InitData;
use crate::telegram::navigation::Route;

/// Text of the in-flight indicator
pub const SENDING_TEXT: &str = "Sending...";

/// Default success text when the backend reply has no `message`
pub const DEFAULT_SUCCESS_TEXT: &str = "User info sent";

/// Parameters of Telegram's `showPopup`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Popup {
    pub title: String,
    pub message: String,
    pub buttons: Vec<PopupButton>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopupButton {
    #[serde(rename = "type")]
    pub kind: PopupButtonKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PopupButtonKind {
    Close,
}

impl Popup {
    /// Popup with a single close button
    pub fn closable(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            buttons: vec![PopupButton {
                kind: PopupButtonKind::Close,
            }],
        }
    }
}

/// Optional popup capability of the host
pub trait PopupHost: Send + Sync {
    fn show_popup(&self, popup: &Popup);
}

/// The Telegram client hosting the page
pub trait HostEnvironment: Send + Sync {
    /// `initDataUnsafe`, or `None` when the page is not opened inside Telegram
    fn init_data(&self) -> Option<InitData>;

    /// Popup capability, when the client supports it
    fn popup(&self) -> Option<&dyn PopupHost> {
        None
    }

    /// Fallback notification (`window.alert`)
    fn alert(&self, message: &str);
}

/// Handle of an element attached to the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u64);

/// The page document
pub trait Document: Send + Sync {
    /// Whether a control with this id exists
    fn has_control(&self, id: &str) -> bool;

    /// Inserts a text element right after the control `after`
    fn attach_text(&self, after: &str, text: &str) -> ElementId;

    fn remove(&self, element: ElementId);
}

/// Full-page navigation (`window.location.href = ...`)
pub trait Navigator: Send + Sync {
    fn redirect(&self, route: Route);
}

/// Indicator element that is removed from the document when dropped
pub struct IndicatorGuard<'a> {
    document: &'a dyn Document,
    element: ElementId,
}

impl<'a> IndicatorGuard<'a> {
    pub fn attach(document: &'a dyn Document, after: &str, text: &str) -> Self {
        let element = document.attach_text(after, text);
        log::debug!("Indicator {:?} attached after #{}", element, after);
        Self { document, element }
    }
}

impl Drop for IndicatorGuard<'_> {
    fn drop(&mut self) {
        self.document.remove(self.element);
        log::debug!("Indicator {:?} removed", self.element);
    }
}

/// Shows `popup` through the host popup, or its message through `alert`
fn notify(host: &dyn HostEnvironment, popup: Popup) {
    match host.popup() {
        Some(popups) => popups.show_popup(&popup),
        None => host.alert(&popup.message),
    }
}

pub fn show_success(host: &dyn HostEnvironment, message: &str) {
    notify(host, Popup::closable("Success", message));
}

pub fn show_error(host: &dyn HostEnvironment, error: &AppError) {
    log::warn!("Surfacing error to user: {}", error);
    notify(host, Popup::closable("Error", error.to_string()));
}

/// Host used by the CLI: init data comes from a file, popups and the
/// document are rendered to the terminal.
pub struct TerminalHost {
    init_data: Option<InitData>,
    controls: HashSet<String>,
    next_element: AtomicU64,
}

impl TerminalHost {
    pub fn new(init_data: Option<InitData>) -> Self {
        Self {
            init_data,
            controls: HashSet::new(),
            next_element: AtomicU64::new(1),
        }
    }

    /// Declares controls present on the rendered page
    #[must_use]
    pub fn with_controls<I, S>(mut self, controls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.controls.extend(controls.into_iter().map(Into::into));
        self
    }
}

impl PopupHost for TerminalHost {
    fn show_popup(&self, popup: &Popup) {
        println!("[{}] {}", popup.title, popup.message);
    }
}

impl HostEnvironment for TerminalHost {
    fn init_data(&self) -> Option<InitData> {
        self.init_data.clone()
    }

    fn popup(&self) -> Option<&dyn PopupHost> {
        Some(self)
    }

    fn alert(&self, message: &str) {
        println!("{}", message);
    }
}

impl Document for TerminalHost {
    fn has_control(&self, id: &str) -> bool {
        self.controls.contains(id)
    }

    fn attach_text(&self, after: &str, text: &str) -> ElementId {
        log::info!("{} (#{})", text, after);
        ElementId(self.next_element.fetch_add(1, Ordering::Relaxed))
    }

    fn remove(&self, _element: ElementId) {}
}

impl Navigator for TerminalHost {
    fn redirect(&self, route: Route) {
        println!("-> {}", route);
    }
}
