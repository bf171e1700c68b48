use anyhow::Result;
use dotenvy::dotenv;

use minihack::cli::{load_init_data, Cli, Commands};
use minihack::core::{config, init_logger, log_configuration};
use minihack::telegram::host::show_error;
use minihack::telegram::navigation::{known_controls, ClickContext, ClickMode, PageController};
use minihack::telegram::{verify, webapp, webapp_auth, AuthClient, AuthState, TerminalHost};

/// Entry point: parses CLI arguments and dispatches to the subcommand
///
/// # Errors
/// Returns an error if logging cannot be initialized or the subcommand fails.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env if present, before any config is read
    let _ = dotenv();

    init_logger(&config::LOG_FILE_PATH)?;
    log_configuration();

    match cli.command {
        Commands::Sign { init_data, scope } => {
            let scope = scope.unwrap_or(*config::PAYLOAD_SCOPE);
            let host = TerminalHost::new(load_init_data(Some(&init_data))?);
            let header = webapp_auth::authorization_header_from_host(&host, scope)?;
            println!("{}", header);
            Ok(())
        }
        Commands::Submit {
            init_data,
            backend,
            scope,
        } => {
            let scope = scope.unwrap_or(*config::PAYLOAD_SCOPE);
            let client = match backend {
                Some(url) => AuthClient::with_timeout(url, config::network::timeout())?,
                None => AuthClient::from_env()?,
            };
            let host = TerminalHost::new(load_init_data(init_data.as_deref())?).with_controls(["reg-btn"]);

            match client.send_user_info(&host, &host, "reg-btn", scope).await {
                Ok(reply) => {
                    println!("{}", serde_json::to_string_pretty(&reply)?);
                    Ok(())
                }
                Err(e) => {
                    show_error(&host, &e);
                    Err(e.into())
                }
            }
        }
        Commands::Verify { header } => {
            let verified =
                verify::verify_authorization(&header, &config::BOT_TOKEN, config::init_data::max_age())?;
            println!("user_id={} auth_date={}", verified.user_id, verified.auth_date);
            println!("{}", serde_json::to_string_pretty(&verified.user)?);
            Ok(())
        }
        Commands::Serve { port } => {
            let port = port.unwrap_or(*config::server::PORT);
            webapp::run_auth_server(port, AuthState::from_env(), config::FRONT_SITE.as_deref()).await
        }
        Commands::Click {
            page,
            control,
            init_data,
            auth_on_click,
        } => {
            let host = TerminalHost::new(load_init_data(init_data.as_deref())?)
                .with_controls(known_controls().map(|c| c.to_string()));
            let mode = ClickMode::from_flag(auth_on_click || *config::AUTH_ON_CLICK);
            let controller = PageController::wire(page, &host, mode)?;
            let client = AuthClient::from_env()?;

            let ctx = ClickContext {
                host: &host,
                document: &host,
                navigator: &host,
                client: &client,
                scope: *config::PAYLOAD_SCOPE,
            };
            let outcome = controller.click(control, &ctx).await;
            log::info!("Click #{} on {}: {:?}", control, page, outcome);
            Ok(())
        }
    }
}
