use crate::{
    AppState,
    config::{AppConfig, Env},
    constants::{APP_CONFIG, AppMetadata, routes},
    error::{AppError, AppResult},
    models::{ApiResponse, UserRole},
    permissions::RolePermissions,
    supabase::{ConnectionReport, EnvironmentCheck},
    validation,
};
use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

// --- Response Schemas ---

/// PageInfo
///
/// Descriptor returned by page routes; the UI renders the page identified by `path`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq)]
#[ts(export)]
pub struct PageInfo {
    pub title: String,
    pub path: String,
}

/// AppInfo
///
/// Static metadata plus the runtime settings the frontend needs.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppInfo {
    #[serde(flatten)]
    pub metadata: AppMetadata,
    pub site_url: String,
    /// `local` or `production`.
    #[schema(value_type = String)]
    pub environment: &'static str,
}

fn page(title: &str, path: impl Into<String>) -> Json<ApiResponse<PageInfo>> {
    Json(ApiResponse::ok(PageInfo {
        title: title.to_string(),
        path: path.into(),
    }))
}

const ADMIN_SECTIONS: [(&str, &str); 5] = [
    ("users", "Manage Users"),
    ("products", "Manage Products"),
    ("orders", "Manage Orders"),
    ("inventory", "Manage Inventory"),
    ("settings", "Settings"),
];

// --- Public Pages ---

/// home
///
/// [Public Route] Storefront landing page.
#[utoipa::path(get, path = "/", responses((status = 200, description = "Landing page")))]
pub async fn home() -> Json<ApiResponse<PageInfo>> {
    page(APP_CONFIG.name, routes::HOME)
}

#[utoipa::path(get, path = "/products", responses((status = 200, description = "Catalog page")))]
pub async fn products_page() -> Json<ApiResponse<PageInfo>> {
    page("Products", routes::PRODUCTS)
}

/// product_detail_page
///
/// [Public Route] Product page by slug. Slugs outside the catalog format are rejected
/// before any lookup happens.
#[utoipa::path(
    get,
    path = "/products/{slug}",
    responses(
        (status = 200, description = "Product page"),
        (status = 422, description = "Malformed slug")
    )
)]
pub async fn product_detail_page(Path(slug): Path<String>) -> AppResult<Json<ApiResponse<PageInfo>>> {
    validation::validate_slug(&slug)?;
    Ok(page("Product", routes::product_detail(&slug)))
}

#[utoipa::path(get, path = "/login", responses((status = 200, description = "Sign-in page")))]
pub async fn login_page() -> Json<ApiResponse<PageInfo>> {
    page("Sign in", "/login")
}

#[utoipa::path(get, path = "/register", responses((status = 200, description = "Sign-up page")))]
pub async fn register_page() -> Json<ApiResponse<PageInfo>> {
    page("Create account", "/register")
}

#[utoipa::path(
    get,
    path = "/reset-password",
    responses((status = 200, description = "Password reset page"))
)]
pub async fn reset_password_page() -> Json<ApiResponse<PageInfo>> {
    page("Reset password", "/reset-password")
}

/// test_supabase
///
/// [Public Route] Connection diagnostic: checks the provider settings are present and
/// that the REST gateway answers. A missing `profiles` table still counts as connected.
#[utoipa::path(
    get,
    path = "/test-supabase",
    responses((status = 200, description = "Connection report", body = ConnectionReport))
)]
pub async fn test_supabase(State(state): State<AppState>) -> Json<ApiResponse<ConnectionReport>> {
    let outcome = state.probe.probe().await;
    Json(ApiResponse::ok(ConnectionReport {
        status: outcome.status,
        message: outcome.message,
        environment: EnvironmentCheck::from_env(),
    }))
}

// --- Account Pages (guarded) ---

#[utoipa::path(get, path = "/dashboard", responses((status = 200, description = "Dashboard")))]
pub async fn dashboard_page() -> Json<ApiResponse<PageInfo>> {
    page("Dashboard", routes::DASHBOARD)
}

#[utoipa::path(get, path = "/profile", responses((status = 200, description = "Profile page")))]
pub async fn profile_page() -> Json<ApiResponse<PageInfo>> {
    page("Profile", "/profile")
}

#[utoipa::path(get, path = "/admin", responses((status = 200, description = "Back office")))]
pub async fn admin_page() -> Json<ApiResponse<PageInfo>> {
    page("Administration", routes::ADMIN)
}

/// admin_section_page
///
/// [Guarded Route] One of the back-office sections listed in the route table.
#[utoipa::path(
    get,
    path = "/admin/{section}",
    responses(
        (status = 200, description = "Back-office section"),
        (status = 404, description = "Unknown section")
    )
)]
pub async fn admin_section_page(Path(section): Path<String>) -> AppResult<Json<ApiResponse<PageInfo>>> {
    let (_, title) = ADMIN_SECTIONS
        .iter()
        .find(|(name, _)| *name == section)
        .ok_or_else(|| AppError::NotFound(format!("admin section {section}")))?;
    Ok(page(title, format!("{}/{}", routes::ADMIN, section)))
}

// --- API ---

/// role_permissions
///
/// [API Route] Permission row for a role, e.g. `/api/roles/sales_staff/permissions`.
#[utoipa::path(
    get,
    path = "/api/roles/{role}/permissions",
    responses(
        (status = 200, description = "Permission row", body = RolePermissions),
        (status = 404, description = "Unknown role")
    )
)]
pub async fn role_permissions(Path(role): Path<String>) -> AppResult<Json<ApiResponse<RolePermissions>>> {
    let role: UserRole = role
        .parse()
        .map_err(|e: crate::models::UnknownRole| AppError::NotFound(e.to_string()))?;
    Ok(Json(ApiResponse::ok(role.permissions())))
}

#[utoipa::path(
    get,
    path = "/api/config",
    responses((status = 200, description = "Application metadata", body = AppInfo))
)]
pub async fn app_config(State(config): State<AppConfig>) -> Json<ApiResponse<AppInfo>> {
    let environment = match config.env {
        Env::Local => "local",
        Env::Production => "production",
    };
    Json(ApiResponse::ok(AppInfo {
        metadata: APP_CONFIG,
        site_url: config.site_url,
        environment,
    }))
}
