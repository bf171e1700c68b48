//! Button → route table of the Mini-App pages
//!
//! Every page binds a handful of controls to full-page redirects. On the
//! home page the registration and open buttons can alternatively run the
//! authenticated submission (see [`ClickMode`]).

use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

use crate::core::error::{AppError, AppResult};
use crate::telegram::host::{self, Document, HostEnvironment, Navigator, DEFAULT_SUCCESS_TEXT};
use crate::telegram::submit::AuthClient;
use crate::telegram::webapp_auth::PayloadScope;

/// Controls addressed by DOM id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr, EnumIter)]
pub enum Control {
    #[strum(serialize = "reg-btn")]
    Reg,
    #[strum(serialize = "open-btn")]
    Open,
    #[strum(serialize = "profile-btn")]
    Profile,
    #[strum(serialize = "hackathon-btn")]
    Hackathon,
    #[strum(serialize = "back-btn")]
    Back,
}

/// Redirect targets, opaque to this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr)]
pub enum Route {
    #[strum(serialize = "/reg")]
    Reg,
    #[strum(serialize = "/hackathon")]
    Hackathon,
    #[strum(serialize = "/profile")]
    Profile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Page {
    Home,
    Profile,
    RegForm,
}

impl Page {
    /// Controls of this page and where they lead
    pub fn bindings(self) -> &'static [(Control, Route)] {
        match self {
            Page::Home => &[(Control::Reg, Route::Reg), (Control::Open, Route::Hackathon)],
            Page::Profile => &[
                (Control::Profile, Route::Profile),
                (Control::Hackathon, Route::Hackathon),
                (Control::Reg, Route::Reg),
            ],
            Page::RegForm => &[(Control::Reg, Route::Profile), (Control::Back, Route::Hackathon)],
        }
    }
}

/// What the home page's registration/open buttons do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClickMode {
    #[default]
    Navigate,
    AuthOnClick,
}

impl ClickMode {
    pub fn from_flag(auth_on_click: bool) -> Self {
        if auth_on_click {
            ClickMode::AuthOnClick
        } else {
            ClickMode::Navigate
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    Navigate(Route),
    SubmitAuth,
}

/// Result of a click, after it has been surfaced to the user
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    Redirected(Route),
    /// Submission succeeded; backend reply
    Submitted(Value),
    /// Submission failed; the message shown to the user
    Failed(String),
    /// Control is not bound on this page
    Ignored,
}

/// Collaborators a click may reach
pub struct ClickContext<'a> {
    pub host: &'a dyn HostEnvironment,
    pub document: &'a dyn Document,
    pub navigator: &'a dyn Navigator,
    pub client: &'a AuthClient,
    pub scope: PayloadScope,
}

/// Listeners of one page, wired against a document
#[derive(Debug, Clone)]
pub struct PageController {
    page: Page,
    actions: Vec<(Control, ClickAction)>,
}

impl PageController {
    /// Resolves every binding of `page` against `document`
    ///
    /// # Errors
    /// `MissingControl` for the first bound control absent from the document.
    pub fn wire(page: Page, document: &dyn Document, mode: ClickMode) -> AppResult<Self> {
        let mut actions = Vec::with_capacity(page.bindings().len());

        for &(control, route) in page.bindings() {
            if !document.has_control(control.as_ref()) {
                return Err(AppError::MissingControl {
                    page: page.to_string(),
                    control: control.to_string(),
                });
            }

            let action = match (page, control, mode) {
                (Page::Home, Control::Reg | Control::Open, ClickMode::AuthOnClick) => ClickAction::SubmitAuth,
                _ => ClickAction::Navigate(route),
            };
            actions.push((control, action));
        }

        log::debug!("Wired {} controls on the {} page", actions.len(), page);
        Ok(Self { page, actions })
    }

    pub fn action(&self, control: Control) -> Option<ClickAction> {
        self.actions
            .iter()
            .find(|(bound, _)| *bound == control)
            .map(|(_, action)| *action)
    }

    /// Runs the listener bound to `control`
    ///
    /// Submission errors are shown to the user and reported as
    /// [`ClickOutcome::Failed`]; the user may simply click again.
    pub async fn click(&self, control: Control, ctx: &ClickContext<'_>) -> ClickOutcome {
        match self.action(control) {
            None => {
                log::debug!("#{} is not bound on the {} page", control, self.page);
                ClickOutcome::Ignored
            }
            Some(ClickAction::Navigate(route)) => {
                log::info!("#{} -> {}", control, route);
                ctx.navigator.redirect(route);
                ClickOutcome::Redirected(route)
            }
            Some(ClickAction::SubmitAuth) => {
                match ctx
                    .client
                    .send_user_info(ctx.host, ctx.document, control.as_ref(), ctx.scope)
                    .await
                {
                    Ok(reply) => {
                        let message = reply
                            .get("message")
                            .and_then(Value::as_str)
                            .filter(|m| !m.is_empty())
                            .unwrap_or(DEFAULT_SUCCESS_TEXT);
                        host::show_success(ctx.host, message);
                        ClickOutcome::Submitted(reply)
                    }
                    Err(e) => {
                        host::show_error(ctx.host, &e);
                        ClickOutcome::Failed(e.to_string())
                    }
                }
            }
        }
    }
}

/// Every control id any page binds
pub fn known_controls() -> impl Iterator<Item = Control> {
    Control::iter()
}
