//! anketa-web - survey intake, review and export service
//!
//! Startup order: CLI arguments, TOML config, tracing, root folder,
//! database, then the HTTP listener.

use std::path::PathBuf;

use anketa_common::config::{resolve_root_folder, RootFolder, TomlConfig};
use anketa_common::db::init_database;
use anketa_web::{build_router, AppState};
use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "anketa-web", version, about = "Survey intake and export service")]
struct Args {
    /// Folder holding anketa.db (overrides ANKETA_ROOT_FOLDER and the config file)
    #[arg(long)]
    root_folder: Option<PathBuf>,

    /// Path to config.toml
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Listen port (overrides [server] port)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = TomlConfig::load_or_default(args.config.as_deref());
    if let Some(port) = args.port {
        config.server.port = port;
    }

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting anketa-web v{}", env!("CARGO_PKG_VERSION"));

    let root_folder = RootFolder::new(resolve_root_folder(args.root_folder.as_deref(), &config));
    root_folder.ensure_exists()?;

    let db_path = root_folder.database_path();
    info!("Database path: {}", db_path.display());

    let pool = match init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Database ready");
            pool
        }
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    let state = AppState::new(pool, config.export.options());
    let app = build_router(state);

    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("anketa-web listening on http://{}", address);
    info!("Health check: http://{}/health", address);

    axum::serve(listener, app).await?;

    Ok(())
}
