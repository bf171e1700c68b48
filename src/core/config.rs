use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

use crate::telegram::webapp_auth::PayloadScope;

/// Backend base URL the submitter posts to
/// Read from MINIHACK_BACKEND_URL environment variable
/// Default: http://localhost:8000
pub static BACKEND_URL: Lazy<String> =
    Lazy::new(|| env::var("MINIHACK_BACKEND_URL").unwrap_or_else(|_| "http://localhost:8000".to_string()));

/// Bot token used to verify init data on the server side
/// Read from BOT_TOKEN or TMA environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TMA"))
        .unwrap_or_else(|_| String::new())
});

/// Front-end origin allowed by CORS on the auth endpoint
/// Read from FRONT_SITE environment variable
pub static FRONT_SITE: Lazy<Option<String>> = Lazy::new(|| env::var("FRONT_SITE").ok().filter(|s| !s.is_empty()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: minihack.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "minihack.log".to_string()));

/// Which init data entries go into the transmitted `tma` payload
/// Read from MINIHACK_PAYLOAD_SCOPE (`all` | `exclude-hash`)
/// Default: all
pub static PAYLOAD_SCOPE: Lazy<PayloadScope> = Lazy::new(|| {
    env::var("MINIHACK_PAYLOAD_SCOPE")
        .ok()
        .and_then(|raw| parse_payload_scope(&raw))
        .unwrap_or_default()
});

/// Home page buttons run the auth submission instead of redirecting
/// Read from MINIHACK_AUTH_ON_CLICK
/// Default: false
pub static AUTH_ON_CLICK: Lazy<bool> = Lazy::new(|| {
    env::var("MINIHACK_AUTH_ON_CLICK")
        .ok()
        .and_then(|raw| parse_bool(&raw))
        .unwrap_or(false)
});

/// Server configuration
pub mod server {
    use super::*;

    /// Port of the auth endpoint
    /// Read from MINIHACK_PORT
    /// Default: 8000
    pub static PORT: Lazy<u16> = Lazy::new(|| {
        env::var("MINIHACK_PORT")
            .ok()
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(8000)
    });

    /// Origin of the local front-end dev server, always allowed by CORS
    pub const DEV_ORIGIN: &str = "http://localhost:5173";
}

/// Init data verification configuration
pub mod init_data {
    use super::*;

    /// Default max age of signed init data, in hours
    pub const DEFAULT_MAX_AGE_HOURS: u64 = 2000;

    /// Read from INIT_DATA_MAX_AGE_HOURS
    pub static MAX_AGE_HOURS: Lazy<u64> = Lazy::new(|| {
        env::var("INIT_DATA_MAX_AGE_HOURS")
            .ok()
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(DEFAULT_MAX_AGE_HOURS)
    });

    /// Max age duration
    pub fn max_age() -> Duration {
        max_age_from_hours(*MAX_AGE_HOURS)
    }

    /// Hours to a duration, saturating on huge values
    pub fn max_age_from_hours(hours: u64) -> Duration {
        Duration::from_secs(hours.saturating_mul(3600))
    }
}

/// Network configuration
pub mod network {
    use super::*;

    /// Optional request timeout for the submitter, in seconds.
    /// Unset means the HTTP client's defaults apply.
    pub static TIMEOUT_SECS: Lazy<Option<u64>> = Lazy::new(|| {
        env::var("MINIHACK_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.trim().parse().ok())
            .filter(|secs| *secs > 0)
    });

    /// Timeout duration, if configured
    pub fn timeout() -> Option<Duration> {
        TIMEOUT_SECS.map(Duration::from_secs)
    }
}

/// Parses a payload scope name (`all`, `exclude-hash`)
pub fn parse_payload_scope(raw: &str) -> Option<PayloadScope> {
    raw.trim().to_ascii_lowercase().parse().ok()
}

/// Parses common truthy/falsy spellings
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
