use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// API Router Module
///
/// JSON endpoints, nested under `/api`. The guard's exclusion filter skips this whole
/// tree, so no session lookup happens for these requests.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/roles/{role}/permissions", get(handlers::role_permissions))
        .route("/config", get(handlers::app_config))
}
