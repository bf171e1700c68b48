//! Telegram Mini-App integration: init data, the `tma` handshake and page wiring

pub mod host;
pub mod init_data;
pub mod navigation;
pub mod submit;
pub mod verify;
pub mod webapp;
pub mod webapp_auth;

// Re-exports for convenience
pub use host::{Document, HostEnvironment, Navigator, TerminalHost};
pub use init_data::{InitData, UserId};
pub use navigation::{ClickContext, ClickMode, ClickOutcome, Control, Page, PageController, Route};
pub use submit::AuthClient;
pub use webapp::{create_auth_router, run_auth_server, AuthState};
pub use webapp_auth::{build_authorization_header, PayloadScope};
