//! Cart Checkout Server
//!
//! Validates shopping-cart checkouts, reconciles the claimed total against
//! server-side pricing, and hands back a payment authorization from the
//! payment processor.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use checkout_core::gateway::{PaymentProcessor, StripeProcessor};
use clap::Parser;
use config::{ConfigLoader, PROCESSOR_SECRET_ENV, get_processor_secret};
use server::{build_router, run_server};
use shutdown::spawn_config_reload_handler;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

/// Cart Checkout - payment authorization service
#[derive(Parser, Debug)]
#[command(name = "checkout-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./checkout-config.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Override the payment processor API base URL
    #[arg(long, env = "STRIPE_API_BASE")]
    processor_api_base: Option<Url>,

    /// Emit logs as JSON lines
    #[arg(long, default_value = "false")]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing
    init_tracing(args.log_json);

    tracing::info!("Starting checkout-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = Arc::new(ConfigLoader::new(
        &args.config,
        args.listen,
        args.processor_api_base.clone(),
    ));
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    let listen_addr = loaded_config.listen;
    tracing::info!("Configuration loaded from {:?}", args.config);

    // Build the payment processor client once; it is shared by all requests
    let processor: Option<Arc<dyn PaymentProcessor>> = match get_processor_secret() {
        Some(secret_key) => {
            let stripe_config = loaded_config.processor.into_stripe_config(secret_key);
            tracing::info!(api_base = %stripe_config.api_base, "Payment processor configured");
            Some(Arc::new(StripeProcessor::new(stripe_config)))
        }
        None => {
            tracing::warn!(
                "{} is not set; payment authorization requests will fail",
                PROCESSOR_SECRET_ENV
            );
            None
        }
    };

    // Create application state
    let state = AppState::new(processor, loaded_config.policy);

    // Spawn config reload handler (listens for SIGHUP)
    let shutdown_notify = spawn_config_reload_handler(state.clone(), config_loader);

    // Build the router
    let router = build_router(state);

    // Run the server
    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    // Signal the config reload handler to stop
    shutdown_notify.notify_one();
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "info";

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
