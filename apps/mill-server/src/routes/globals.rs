//! The ledger singleton, exposed as `/api/globals`.
//!
//! ```text
//! PATCH /api/globals
//! { "capital_delta": "1000.00", "cash_delta": "300.00" }
//!
//!   capital_delta ─► add_capital
//!   cash_delta    ─► move_capital_to_cash
//!   sales_delta   ─► record_sale
//!   inventory_delta (+) receive / (−) consume
//! ```
//!
//! All deltas apply together or not at all.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use mill_core::{Ledger, LedgerAdjustment};
use tracing::debug;

use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::AppState;

async fn get_globals(State(state): State<AppState>) -> ApiResult<Json<Ledger>> {
    Ok(Json(state.db.ledger().get().await?))
}

async fn adjust_globals(
    State(state): State<AppState>,
    ApiJson(adjustment): ApiJson<LedgerAdjustment>,
) -> ApiResult<Json<Ledger>> {
    if adjustment.is_empty() {
        debug!("Empty ledger adjustment, returning snapshot");
        return Ok(Json(state.db.ledger().get().await?));
    }
    Ok(Json(state.db.ledger().adjust(&adjustment).await?))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/globals", get(get_globals).patch(adjust_globals))
}
