//! `mdpd`, the material delivery plan store server.
//!
//! Usage:
//!   mdpd -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/mdp/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod bootstrap;
mod config;
mod routes;

use clap::Parser;
use mdp_core::Module;
use tracing::info;

use config::ServerConfig;

/// Material delivery plan store server.
#[derive(Parser, Debug)]
#[command(name = "mdpd", about = "Material delivery plan store server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address (overrides default 0.0.0.0:8080).
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load server configuration.
    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;

    // Verify configuration is valid.
    bootstrap::verify_config(&server_config)?;
    let schemas = bootstrap::build_schemas(&server_config)?;

    // Initialize storage.
    let service_config = server_config.service_config(&cli.listen);
    let store = bootstrap::open_store(server_config.storage.backend, &service_config)?;

    let gateway = mdp_gateway::GatewayModule::new(store, schemas);
    info!("Gateway module initialized");

    let module_routes = vec![(gateway.name(), gateway.routes())];
    let app = routes::build_router(module_routes);

    // Start server.
    let listener = tokio::net::TcpListener::bind(&service_config.listen).await?;
    info!("mdpd listening on {}", service_config.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
