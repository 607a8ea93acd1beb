mod error;
mod api;
mod cin7;
mod orders;
mod retry;
mod sync;
mod server;
mod bootstrap;
mod middleware;
mod config;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tracing::info;

// Initialize logging and tracing
fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,tower_http=debug,order_dispatch_sync=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration (also reads .env)
    let config = crate::config::Config::from_env()?;

    init_tracing();

    info!("🚀 Starting Shopify → Cin7 dispatch sync");

    let bind_address = config.bind_address.clone();
    let state = bootstrap::initialize_app_state(config)?;

    let app = server::create_app(state);

    server::run_server(app, &bind_address).await?;

    Ok(())
}
