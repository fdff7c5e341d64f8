//! Supplier and category routes, shared through [`CatalogEntity`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use mill_db::{CatalogEntity, CatalogRepository};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::AppState;

/// Body of create and rename requests.
#[derive(Debug, Deserialize)]
pub struct CatalogRequest {
    pub name: String,
}

/// A catalog record the API can serve.
pub trait Entry: CatalogEntity + Serialize + Sync + 'static {}

impl<T: CatalogEntity + Serialize + Sync + 'static> Entry for T {}

fn repository<T: Entry>(state: &AppState) -> CatalogRepository<T> {
    CatalogRepository::new(state.db.pool().clone())
}

async fn list<T: Entry>(State(state): State<AppState>) -> ApiResult<Json<Vec<T>>> {
    Ok(Json(repository::<T>(&state).list().await?))
}

async fn create<T: Entry>(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CatalogRequest>,
) -> ApiResult<(StatusCode, Json<T>)> {
    let entry = repository::<T>(&state).create(&body.name).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn get_one<T: Entry>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<T>> {
    repository::<T>(&state)
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(T::ENTITY, id))
}

async fn rename<T: Entry>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<CatalogRequest>,
) -> ApiResult<Json<T>> {
    Ok(Json(repository::<T>(&state).rename(&id, &body.name).await?))
}

async fn delete<T: Entry>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    repository::<T>(&state).delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `{base}` and `{base}/{id}` for one catalog table.
pub fn routes<T: Entry>(base: &str) -> Router<AppState> {
    Router::new()
        .route(base, get(list::<T>).post(create::<T>))
        .route(
            &format!("{base}/{{id}}"),
            get(get_one::<T>).put(rename::<T>).delete(delete::<T>),
        )
}
