//! imuvpn - account, device provisioning and checkout API for imuVPN

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use imuvpn::{config::Args, server, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    // Initialize tracing/logging
    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("imuvpn={},info", log_level).into()),
        )
        .with(args.log_json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!args.log_json).then(tracing_subscriber::fmt::layer))
        .init();

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("======================================");
    info!("  imuVPN API");
    info!("======================================");
    info!("Node ID: {}", args.node_id);
    info!("Listen: {}", args.listen);
    info!("Profile domain: {}", args.profile_domain);
    info!("Checkout provider: {}", args.stripe.stripe_api_base);
    info!(
        "Version: {} ({})",
        env!("CARGO_PKG_VERSION"),
        option_env!("GIT_COMMIT_SHORT").unwrap_or("unknown")
    );
    info!("======================================");

    if args.admin_key().is_none() {
        warn!("ADMIN_KEY not set - admin metrics will deny every request");
    }
    if args.stripe_secret_key().is_none() {
        warn!("STRIPE_SECRET_KEY not set - checkout will fail with config_error");
    }

    let state = Arc::new(AppState::new(args)?);
    server::run(state).await?;

    Ok(())
}
