use axum::Router;
use axum::routing::{get, post};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{health_handler, query_handler, root_handler};
use super::server::AppState;

/// Routes: `GET /`, `POST /query`, `GET /health`.
pub fn build_router(state: AppState, max_body_size: usize) -> Router {
    let query = Router::new()
        .route("/query", post(query_handler))
        .layer(RequestBodyLimitLayer::new(max_body_size));

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .merge(query)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
