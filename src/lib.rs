//! # Segment Builder
//!
//! Server half of the segment builder. It hosts the compiled Leptos UI and a
//! single relay route that forwards saved segments to a webhook, so the
//! webhook URL never has to be shipped to the browser.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use segment_builder::config::Settings;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Load configuration
//!     let settings = Settings::new()?;
//!
//!     // Server will start on configured host:port
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Domain**: relay wire types and the outbound [`domain::RelayPort`]
//! - **Adapters**: HTTP handlers (relay, health, metrics, UI assets)
//! - **Config**: file + CLI settings with live reload

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;

use crate::adapters::health_handler::HealthHandler;
use crate::adapters::metrics_handler::{MetricsCollector, MetricsHandler};
use crate::adapters::relay_handler::{self, RelayState};
use crate::domain::RelayPort;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Creates the Axum application router with all endpoints configured.
///
/// # Arguments
///
/// * `settings` - Live application settings
/// * `relay` - Outbound webhook relay
/// * `metrics` - Shared metrics collector
///
/// # Returns
///
/// Configured Axum Router
pub async fn create_app(
    settings: Arc<RwLock<crate::config::Settings>>,
    relay: Arc<dyn RelayPort>,
    metrics: Arc<MetricsCollector>,
) -> Router {
    let health_handler = Arc::new(HealthHandler::new(settings.clone()));
    let metrics_handler = Arc::new(MetricsHandler::new(metrics.clone()));

    let public_router = Router::new()
        .route("/health", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.health().await }
            }
        }))
        .route("/health/ready", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.ready().await }
            }
        }))
        .route("/health/live", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.live().await }
            }
        }))
        .route("/metrics", get({
            let handler = metrics_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.metrics().await }
            }
        }));

    let mut api_router = Router::new()
        .route("/save-segment", post(relay_handler::save_segment))
        .with_state(RelayState { relay, metrics });

    // Rate limiting only guards the relay; health and assets stay open
    let settings_read = settings.read().await;
    if let Some(rate_limit) = &settings_read.rate_limit {
        if rate_limit.enabled {
            let limiter = crate::adapters::rate_limit::create_limiter(
                rate_limit.requests_per_second,
                rate_limit.burst_size,
            );

            api_router = api_router.layer(axum::middleware::from_fn_with_state(
                limiter,
                crate::adapters::rate_limit::rate_limit_middleware,
            ));
        }
    }

    public_router
        .nest("/api", api_router)
        // UI endpoint (catch-all for SPA)
        .fallback(crate::adapters::ui_handler::UIHandler::serve)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
}
