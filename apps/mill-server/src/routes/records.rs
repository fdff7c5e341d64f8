//! Expense, production and miscellaneous-cost routes.
//!
//! Each record is created once and never edited: its ledger effect is
//! applied at creation.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use mill_core::{
    Expense, MiscellaneousCost, NewExpense, NewMiscellaneousCost, NewProduction, Production,
};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiQuery};
use crate::AppState;

// =============================================================================
// Expenses
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ExpenseQuery {
    #[serde(default)]
    pub purchase_id: Option<String>,
}

async fn list_expenses(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ExpenseQuery>,
) -> ApiResult<Json<Vec<Expense>>> {
    let expenses = state
        .db
        .expenses()
        .list(query.purchase_id.as_deref())
        .await?;
    Ok(Json(expenses))
}

async fn create_expense(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NewExpense>,
) -> ApiResult<(StatusCode, Json<Expense>)> {
    let expense = state.db.expenses().create(&request).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

async fn get_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Expense>> {
    state
        .db
        .expenses()
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Expense", id))
}

// =============================================================================
// Productions
// =============================================================================

async fn list_productions(State(state): State<AppState>) -> ApiResult<Json<Vec<Production>>> {
    Ok(Json(state.db.productions().list().await?))
}

async fn create_production(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NewProduction>,
) -> ApiResult<(StatusCode, Json<Production>)> {
    let production = state.db.productions().create(&request).await?;
    Ok((StatusCode::CREATED, Json(production)))
}

async fn get_production(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Production>> {
    state
        .db
        .productions()
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Production", id))
}

// =============================================================================
// Miscellaneous costs
// =============================================================================

async fn list_misc_costs(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<MiscellaneousCost>>> {
    Ok(Json(state.db.misc_costs().list().await?))
}

async fn create_misc_cost(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NewMiscellaneousCost>,
) -> ApiResult<(StatusCode, Json<MiscellaneousCost>)> {
    let cost = state.db.misc_costs().create(&request).await?;
    Ok((StatusCode::CREATED, Json(cost)))
}

async fn get_misc_cost(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MiscellaneousCost>> {
    state
        .db
        .misc_costs()
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("MiscellaneousCost", id))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route("/expenses/{id}", get(get_expense))
        .route("/productions", get(list_productions).post(create_production))
        .route("/productions/{id}", get(get_production))
        .route(
            "/miscellaneous-costs",
            get(list_misc_costs).post(create_misc_cost),
        )
        .route("/miscellaneous-costs/{id}", get(get_misc_cost))
}
