use thiserror::Error;

use crate::telegram::verify::VerifyError;

/// Centralized error types for the Mini-App logic
///
/// Everything the handshake, the submitter and the navigation table can
/// fail with ends up here, so a single popup path can surface it.
///
/// # Example
///
/// ```no_run
/// use minihack::core::error::AppError;
///
/// fn handle_error(err: AppError) {
///     eprintln!("Error: {}", err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Page was not opened inside a Telegram client (no init data source)
    #[error("This action is only available inside a Telegram WebApp")]
    NotInHostEnvironment,

    /// Init data has no `user` object with an `id`
    #[error("Init data does not contain user.id")]
    MissingUser,

    /// `user.id` is a number but not an integer Telegram could issue
    #[error("Invalid user.id in init data: {0}")]
    InvalidUserId(String),

    /// Backend answered with a non-2xx status
    #[error("{message}")]
    RequestFailed { status: u16, message: String },

    /// A control the page binds to is absent from the document
    #[error("Control #{control} is missing on the {page} page")]
    MissingControl { page: String, control: String },

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server-side header verification errors
    #[error("Authorization error: {0}")]
    Verify(#[from] VerifyError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// HTTP status of a failed backend request, if that is what this is
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::RequestFailed { status, .. } => Some(*status),
            AppError::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
