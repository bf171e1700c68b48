//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - A configuration summary logged at startup

use anyhow::Result;
use simplelog::*;
use std::fs::File;

use crate::core::config;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to initialize logger
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs the effective configuration at startup
///
/// The bot token is never printed, only whether it is set.
pub fn log_configuration() {
    log::info!("Backend URL: {}", *config::BACKEND_URL);
    log::info!("Payload scope: {}", *config::PAYLOAD_SCOPE);
    log::info!("Auth on click: {}", *config::AUTH_ON_CLICK);
    log::info!("Init data max age: {}h", *config::init_data::MAX_AGE_HOURS);

    if config::BOT_TOKEN.is_empty() {
        log::warn!("BOT_TOKEN is not set - server-side verification will reject every request");
    } else {
        log::info!("BOT_TOKEN: set");
    }

    match config::network::timeout() {
        Some(timeout) => log::info!("HTTP timeout: {:?}", timeout),
        None => log::info!("HTTP timeout: client default"),
    }
}
