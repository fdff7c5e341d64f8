//! Munji purchase routes.
//!
//! ```text
//! GET /api/purchases?from_date=2024-03-01&to_date=2024-03-31
//!                   &payment_type=Cash&category_id=…&supplier_id=…
//!                   &page=2&per_page=50
//! ```

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use mill_core::{payment_choices, NewPurchase, Page, PageRequest, PaymentChoice, Purchase, PurchaseFilter};

use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiQuery};
use crate::AppState;

async fn list_purchases(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<PurchaseFilter>,
    ApiQuery(page): ApiQuery<PageRequest>,
) -> ApiResult<Json<Page<Purchase>>> {
    Ok(Json(state.db.purchases().list(&filter, page).await?))
}

async fn create_purchase(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NewPurchase>,
) -> ApiResult<(StatusCode, Json<Purchase>)> {
    let purchase = state.db.purchases().create(&request).await?;
    Ok((StatusCode::CREATED, Json(purchase)))
}

async fn get_purchase(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Purchase>> {
    state
        .db
        .purchases()
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Purchase", id))
}

async fn update_purchase(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<NewPurchase>,
) -> ApiResult<Json<Purchase>> {
    Ok(Json(state.db.purchases().update(&id, &request).await?))
}

async fn delete_purchase(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.purchases().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_payment_choices() -> Json<Vec<PaymentChoice>> {
    Json(payment_choices())
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payment-choices", get(list_payment_choices))
        .route("/purchases", get(list_purchases).post(create_purchase))
        .route(
            "/purchases/{id}",
            get(get_purchase).put(update_purchase).delete(delete_purchase),
        )
}
