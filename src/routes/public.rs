use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Storefront pages, the auth pages and operational endpoints. None of these need a
/// session; the auth pages are bounced to the dashboard by the guard when one exists.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Load balancer check; never touches the identity provider beyond the guard.
        .route("/health", get(|| async { "ok" }))
        .route("/", get(handlers::home))
        // GET /products, /products/{slug}
        // Catalog pages. Product slugs are validated against the catalog slug format.
        .route("/products", get(handlers::products_page))
        .route("/products/{slug}", get(handlers::product_detail_page))
        // Auth pages: only reachable without a session.
        .route("/login", get(handlers::login_page))
        .route("/register", get(handlers::register_page))
        .route("/reset-password", get(handlers::reset_password_page))
        // GET /test-supabase
        // Connection diagnostic for the hosted provider.
        .route("/test-supabase", get(handlers::test_supabase))
}
