use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::core::error::AppResult;
use crate::telegram::init_data::InitData;
use crate::telegram::navigation::{Control, Page};
use crate::telegram::webapp_auth::PayloadScope;

#[derive(Parser)]
#[command(name = "minihack")]
#[command(author, version, about = "Telegram Mini-App auth handshake and page navigation", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the tma Authorization header for init data
    Sign {
        /// Init data as a JSON object (initDataUnsafe)
        init_data: PathBuf,

        /// Entries placed in the payload: all | exclude-hash
        #[arg(long)]
        scope: Option<PayloadScope>,
    },

    /// Sign init data and POST the user to the backend /auth/ endpoint
    Submit {
        /// Init data as a JSON object; omitted means "not inside Telegram"
        init_data: Option<PathBuf>,

        /// Backend base URL (overrides MINIHACK_BACKEND_URL)
        #[arg(long)]
        backend: Option<String>,

        #[arg(long)]
        scope: Option<PayloadScope>,
    },

    /// Verify a tma Authorization header with BOT_TOKEN
    Verify {
        /// Full header value, e.g. "tma query_id=...&hash=..."
        header: String,
    },

    /// Run the /auth/ endpoint
    Serve {
        /// Port to listen on (overrides MINIHACK_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Click a control on a page and print what happens
    Click {
        /// home | profile | reg-form
        page: Page,

        /// reg-btn | open-btn | profile-btn | hackathon-btn | back-btn
        control: Control,

        /// Init data used when the click submits
        #[arg(long)]
        init_data: Option<PathBuf>,

        /// Home page buttons submit instead of redirecting
        #[arg(long)]
        auth_on_click: bool,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Reads init data from a JSON file; no path means no host init data
pub fn load_init_data(path: Option<&Path>) -> AppResult<Option<InitData>> {
    match path {
        None => Ok(None),
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            Ok(Some(InitData::from_json_str(&raw)?))
        }
    }
}
