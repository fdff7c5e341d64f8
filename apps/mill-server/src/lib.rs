//! # Mill Ledger Server
//!
//! JSON API over the mill ledger.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          mill-server                                    │
//! │                                                                         │
//! │  Client ───► axum Router ───► routes/* ───► mill-db repositories       │
//! │                  │                               │                      │
//! │             TraceLayer                           ▼                      │
//! │                                          SQLite (one tx per write)      │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  catalog       │  │  purchases     │  │  records                   ││
//! │  │ • suppliers    │  │ • CRUD         │  │ • expenses                 ││
//! │  │ • categories   │  │ • filter/page  │  │ • productions              ││
//! │  │                │  │ • choices      │  │ • miscellaneous costs      ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │  ┌────────────────┐  ┌────────────────┐                                │
//! │  │  globals       │  │  health        │                                │
//! │  │ • snapshot     │  │ • db ping      │                                │
//! │  │ • adjust       │  │                │                                │
//! │  └────────────────┘  └────────────────┘                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config`]: defaults, `mill.toml`, then `MILL_*` environment variables.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;

use axum::Router;
use mill_db::Database;
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use error::ApiError;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}

/// Builds the full router with tracing applied.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::routes())
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
