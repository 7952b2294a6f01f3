use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info, warn};

use staffmail::mail::QueueTransport;
use staffmail::web::WebServer;
use staffmail::{Config, Database};

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = staffmail::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        staffmail::logging::init_console_only(&config.logging.level);
    }

    info!("staffmail - staff mail API");

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return ExitCode::FAILURE;
    }

    let db = match Database::open_with_busy_timeout(
        &config.database.path,
        config.database.max_connections,
        config.database_busy_timeout(),
    )
    .await
    {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to open database {}: {}", config.database.path, e);
            return ExitCode::FAILURE;
        }
    };

    let transport = match QueueTransport::new(&config.transport) {
        Ok(transport) => transport,
        Err(e) => {
            error!("Failed to create mail transport: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if !transport.is_enabled() {
        warn!("Mail transport disabled, resends will fail");
    }

    let server = match WebServer::new(&config, Arc::new(db), Arc::new(transport)) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to configure web server: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Server configured on {}", server.addr());
    if let Err(e) = server.run().await {
        error!("Web server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
