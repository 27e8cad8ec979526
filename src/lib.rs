use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    middleware,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core services: configuration, identity provider access and request gating.
pub mod config;
pub mod cookies;
pub mod guard;
pub mod session;
pub mod supabase;

// Domain scaffolding shared with the frontend.
pub mod constants;
pub mod models;
pub mod permissions;
pub mod validation;

pub mod error;
pub mod handlers;

// Module for routing segregation (Public, Authenticated, Admin, API).
pub mod routes;
use routes::{admin, api, authenticated, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use guard::{GuardConfig, GuardDecision, GuardState, RouteGuard};
pub use session::{MockSessionProvider, SessionProvider, SessionState, SupabaseSessionProvider};
pub use supabase::{MockConnectionProbe, ProbeState, SupabaseRestProbe};

/// ApiDoc
///
/// OpenAPI document aggregated from the `#[utoipa::path]` handlers, served at
/// `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::home, handlers::products_page, handlers::product_detail_page,
        handlers::login_page, handlers::register_page, handlers::reset_password_page,
        handlers::test_supabase, handlers::dashboard_page, handlers::profile_page,
        handlers::admin_page, handlers::admin_section_page, handlers::role_permissions,
        handlers::app_config,
    ),
    components(
        schemas(
            handlers::PageInfo, handlers::AppInfo, constants::AppMetadata,
            supabase::ConnectionReport, supabase::ConnectionStatus,
            supabase::EnvironmentCheck, permissions::RolePermissions, permissions::Permission,
            models::UserRole, models::UserType, models::UserProfile, models::CompanyProfile,
            models::Product, models::ProductVariant, models::ProductImage, models::Category,
            models::ProductWithDetails, models::Pagination,
        )
    ),
    tags(
        (name = "nursery-portal", description = "Nursery Management System")
    )
)]
struct ApiDoc;

/// AppState
///
/// Single immutable container for everything a request may need. Cloned per request;
/// every member is an `Arc` or plain configuration.
#[derive(Clone)]
pub struct AppState {
    /// Identity provider access used by the route guard.
    pub sessions: SessionState,
    /// Database round-trip behind `/test-supabase`.
    pub probe: ProbeState,
    /// Route tables and decision logic.
    pub guard: GuardState,
    /// The loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for SessionState {
    fn from_ref(app_state: &AppState) -> SessionState {
        app_state.sessions.clone()
    }
}

impl FromRef<AppState> for ProbeState {
    fn from_ref(app_state: &AppState) -> ProbeState {
        app_state.probe.clone()
    }
}

impl FromRef<AppState> for GuardState {
    fn from_ref(app_state: &AppState) -> GuardState {
        app_state.guard.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the routing structure, wraps it in the route guard, and applies the
/// observability and CORS layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(authenticated::authenticated_routes())
        .nest("/admin", admin::admin_routes())
        .nest("/api", api::api_routes())
        // Route Guard: sees every request (fallback included) and decides by path prefix.
        .layer(middleware::from_fn_with_state(
            state.clone(),
            guard::route_guard,
        ))
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(
                    x_request_id.clone(),
                    MakeRequestUuid,
                ))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for `TraceLayer`, carrying the request id so every log line of a request,
/// guard decisions included, can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
