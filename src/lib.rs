//! minihack - Telegram Mini-App front-end logic for the hackathon platform
//!
//! This library provides the pieces of the Mini-App that carry logic:
//! the button-to-route table of each page and the `tma` init-data
//! handshake that authenticates the user against the backend, together
//! with the backend's verification of that header.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors and logging
//! - `telegram`: init data, header builder, submitter, navigation, verification

pub mod cli;
pub mod core;
pub mod telegram;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppResult};
pub use telegram::{build_authorization_header, AuthClient, InitData, PayloadScope};
