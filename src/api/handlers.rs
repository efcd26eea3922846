//! Webhook route handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::info;

use super::error::ApiError;
use super::models::{
    ClosedResponse, HealthResponse, MessageResponse, PositionClosedRequest,
    PositionOpenedRequest, PositionView, PositionsResponse, StatsResponse,
};
use super::ApiContext;
use crate::app::RouteOutcome;
use crate::domain::PositionId;

/// POST /api/position/opened
pub async fn position_opened(
    State(ctx): State<ApiContext>,
    body: Result<Json<PositionOpenedRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(request) = body?;
    info!(position_id = request.position_id, market = %request.market_id, "Webhook: position opened");

    match ctx.router.route(request.into()).await? {
        RouteOutcome::SpotFailed { reason } => Err(ApiError::BadGateway(reason)),
        RouteOutcome::Duplicate => Ok(Json(MessageResponse::success("Position already routed"))),
        _ => Ok(Json(MessageResponse::success("Position recorded"))),
    }
}

/// POST /api/position/closed
pub async fn position_closed(
    State(ctx): State<ApiContext>,
    body: Result<Json<PositionClosedRequest>, JsonRejection>,
) -> Result<Json<ClosedResponse>, ApiError> {
    let Json(request) = body?;
    let removed = ctx.state.untrack(PositionId::new(request.position_id)).is_some();
    info!(position_id = request.position_id, removed, "Webhook: position closed");

    Ok(Json(ClosedResponse {
        status: "success",
        removed,
    }))
}

/// GET /api/positions
pub async fn positions(State(ctx): State<ApiContext>) -> Json<PositionsResponse> {
    let policy = ctx.state.policy();
    let positions = ctx
        .state
        .positions()
        .iter()
        .map(|position| PositionView::new(position, policy.liquidation_price(position)))
        .collect();

    Json(PositionsResponse {
        status: "success",
        positions,
    })
}

/// GET /api/stats
pub async fn stats(State(ctx): State<ApiContext>) -> Json<StatsResponse> {
    let active = ctx.state.positions().len();
    Json(StatsResponse {
        status: "success",
        agent: ctx.state.stats().snapshot(active),
        oracle: ctx.oracle.stats(),
        latest_bridge_tx: ctx.state.latest_bridge_tx(),
    })
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
