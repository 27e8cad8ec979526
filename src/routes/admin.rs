use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// Back-office pages, nested under `/admin`. The guard only establishes that a session
/// exists; per-role capabilities come from the permission table
/// (`GET /api/roles/{role}/permissions`) and are enforced by the back-office UI.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::admin_page))
        // GET /admin/{section}
        // users, products, orders, inventory, settings.
        .route("/{section}", get(handlers::admin_section_page))
}
