use axum::{
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

use crate::{
    api::handler::{health_check, sync_orders, AppState},
    middleware::require_api_key,
};

pub fn create_app(state: AppState) -> Router {
    info!("⚙️ Setting up HTTP routes...");

    // Order webhooks, all behind the shared-secret check
    let webhooks = Router::new()
        .route("/shopify-orders", post(sync_orders))
        .route("/shopify-orders/", post(sync_orders))
        .route("/webhook", post(sync_orders))
        .route("/webhook/", post(sync_orders))
        .route_layer(from_fn_with_state(state.clone(), require_api_key));

    let app = Router::new()
        .route("/health", get(health_check))
        .merge(webhooks)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.config.request_timeout,
        ))
        // Add request tracing
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("✓ HTTP routes configured");
    app
}

pub async fn run_server(app: Router, bind_address: &str) -> Result<(), Box<dyn std::error::Error>> {
    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    info!("🌐 Server listening on: {}", bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}
