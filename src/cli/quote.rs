//! One-shot oracle quote command.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::app::{build_oracle, AppState};
use crate::cli::{load_config, output, QuoteArgs};
use crate::domain::{LiquidationPolicy, MarketId};
use crate::error::Result;

/// Fetch and print one quote.
pub async fn execute(args: &QuoteArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let state = Arc::new(AppState::new(LiquidationPolicy::new(
        config.liquidation.threshold,
    )?));
    let oracle = build_oracle(&config, &state)?;

    let quote = match oracle.quote(&MarketId::new(args.market.clone())).await {
        Ok(quote) => quote,
        Err(e) => {
            output::error(&format!("No quote for '{}': {e}", args.market));
            return Err(e);
        }
    };

    let hundred = Decimal::ONE_HUNDRED;
    output::section(&quote.question);
    output::field("Market", &quote.market_id);
    output::field("YES", format!("{:.2}", quote.yes_price * hundred));
    output::field("NO", format!("{:.2}", quote.no_price() * hundred));
    output::field("Volume", quote.volume);
    output::field("Liquidity", quote.liquidity);
    output::field("Source", format!("{:?}", quote.source).to_lowercase());
    if quote.is_simulated() {
        output::warning("Live data unavailable; price is simulated");
    }
    Ok(())
}
