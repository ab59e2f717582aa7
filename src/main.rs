//! Recipe Book API
//! Mission: Serve recipes to registered users behind JWT authentication

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use recipebook_backend::{create_router, AppState, Config, Database};
use std::net::SocketAddr;
use std::path::Path;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment and logging
    load_env();
    init_tracing();

    let config = Config::parse();
    config.validate().context("Invalid configuration")?;

    info!("🚀 Recipe Book API starting");

    // Refuse to serve traffic without a working store.
    let db = Database::connect(&config.db_connection_string)
        .context("Failed to connect to the database")?;
    info!("📊 Database connected");

    let state = AppState::new(&config, db);
    info!(
        "🔐 Tokens valid for {}h, bcrypt cost {}",
        state.jwt_handler.expiration_hours(),
        state.hasher.cost()
    );

    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("🎯 API server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}

/// Initialize tracing with an env-driven filter
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "recipebook_backend=debug,recipebook=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_env() {
    // 1) Standard dotenv search (cwd + parents)
    let _ = dotenv();

    // 2) Also try the crate's own .env when launched from elsewhere
    let manifest_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if manifest_env.exists() {
        let _ = dotenv::from_path(&manifest_env);
    }
}
