//! # Pagecraft Server
//!
//! Page persistence service for the page builder.
//!
//! ```text
//! editor session ──save──► PagesClient ──HTTP──► /api/pages ──► PageStore
//!                                                                 │
//!                                             data dir (one JSON file per page)
//! ```
//!
//! Writes are versioned: a `PUT` carrying `version` only applies when it
//! matches the stored version (409 otherwise); without `version` the last
//! write wins.

pub mod api;
pub mod client;
pub mod config;
pub mod record;
pub mod store;

pub use api::{ApiError, AppState};
pub use client::{save_session, ClientError, PageDraft, PagesClient};
pub use config::ServerConfig;
pub use record::{NewPage, PageRecord, PageRevision, PageStatus, PageUpdate};
pub use store::{PageStore, StoreError};

use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Full HTTP application: page routes plus tracing and CORS layers
pub fn app(store: Arc<PageStore>, config: &ServerConfig) -> Router {
    let router = api::router(store).layer(TraceLayer::new_for_http());
    if config.cors_permissive {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
