//! # API Routes
//!
//! ```text
//! GET  /health
//! GET  /api/payment-choices
//! GET|POST   /api/suppliers             GET|PUT|DELETE /api/suppliers/{id}
//! GET|POST   /api/categories            GET|PUT|DELETE /api/categories/{id}
//! GET|POST   /api/purchases             GET|PUT|DELETE /api/purchases/{id}
//! GET|POST   /api/expenses              GET /api/expenses/{id}
//! GET|POST   /api/productions           GET /api/productions/{id}
//! GET|POST   /api/miscellaneous-costs   GET /api/miscellaneous-costs/{id}
//! GET|PATCH  /api/globals
//! ```
//!
//! Handlers are thin: decode, call one repository method, encode.

use axum::Router;
use mill_core::{Category, Supplier};

use crate::AppState;

pub mod catalog;
pub mod globals;
pub mod health;
pub mod purchases;
pub mod records;

/// Routes mounted under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(catalog::routes::<Supplier>("/suppliers"))
        .merge(catalog::routes::<Category>("/categories"))
        .merge(purchases::routes())
        .merge(records::routes())
        .merge(globals::routes())
}
