use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// Account pages. They rely on the route guard to redirect visitors without a session
/// to `/login?redirect=<path>` before the handler runs.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        .route("/dashboard", get(handlers::dashboard_page))
        .route("/profile", get(handlers::profile_page))
}
