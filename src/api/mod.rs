//! Webhook API.
//!
//! Lets the front-end report positions directly, for deployments where the
//! chain listener is off or lagging, and exposes tracked positions and stats.

mod error;
mod handlers;
pub mod models;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::app::{AppState, OrderRouter};
use crate::port::PriceOracle;

pub use error::ApiError;

/// Shared handler state.
#[derive(Clone)]
pub struct ApiContext {
    pub state: Arc<AppState>,
    pub router: Arc<OrderRouter>,
    pub oracle: Arc<dyn PriceOracle>,
}

pub fn router(ctx: ApiContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/position/opened", post(handlers::position_opened))
        .route("/api/position/closed", post(handlers::position_closed))
        .route("/api/positions", get(handlers::positions))
        .route("/api/stats", get(handlers::stats))
        .route("/health", get(handlers::health))
        .with_state(ctx)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
