pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use tower_http::limit::RequestBodyLimitLayer;

use crate::candidates::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/candidates",
            get(handlers::handle_list).post(handlers::handle_create),
        )
        .route(
            "/api/candidates/:id",
            get(handlers::handle_fetch).delete(handlers::handle_delete),
        )
        .route("/api/candidates/:id/cv", get(handlers::handle_download_cv))
        // Uploads are bounded by the configured limit instead of axum's 2 MiB default.
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .with_state(state)
}
