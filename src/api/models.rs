//! Webhook request and response bodies.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::app::StatsSnapshot;
use crate::domain::{ExecutionRoute, MarketId, Position, PositionId, Price, Side};
use crate::port::{OracleStats, PositionOpened};

/// `POST /api/position/opened`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionOpenedRequest {
    pub position_id: u64,
    pub market_id: String,
    pub is_long_yes: bool,
    pub entry_price: Decimal,
    pub collateral: Decimal,
    pub leverage: u32,
    #[serde(default)]
    pub trader: Option<String>,
}

impl From<PositionOpenedRequest> for PositionOpened {
    fn from(request: PositionOpenedRequest) -> Self {
        Self {
            position_id: PositionId::new(request.position_id),
            market_id: MarketId::new(request.market_id),
            is_long_yes: request.is_long_yes,
            entry_price: request.entry_price,
            collateral: request.collateral,
            leverage: request.leverage,
            trader: request.trader,
            block_number: 0,
            tx_hash: None,
        }
    }
}

/// `POST /api/position/closed`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionClosedRequest {
    pub position_id: u64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub status: &'static str,
    pub message: String,
}

impl MessageResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClosedResponse {
    pub status: &'static str,
    pub removed: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionView {
    pub position_id: PositionId,
    pub market_id: MarketId,
    pub side: Side,
    pub entry_price: Price,
    pub collateral: Decimal,
    pub leverage: u32,
    pub route: ExecutionRoute,
    pub trader: Option<String>,
    pub opened_at: DateTime<Utc>,
    pub liquidation_price: Option<Price>,
}

impl PositionView {
    pub fn new(position: &Position, liquidation_price: Option<Price>) -> Self {
        Self {
            position_id: position.id(),
            market_id: position.market_id().clone(),
            side: position.side(),
            entry_price: position.entry_price(),
            collateral: position.collateral(),
            leverage: position.leverage(),
            route: position.route(),
            trader: position.trader().map(str::to_string),
            opened_at: position.opened_at(),
            liquidation_price,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PositionsResponse {
    pub status: &'static str,
    pub positions: Vec<PositionView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub status: &'static str,
    pub agent: StatsSnapshot,
    pub oracle: OracleStats,
    pub latest_bridge_tx: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
