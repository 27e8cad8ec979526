use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use nursery_portal::{
    AppConfig, AppState, MockConnectionProbe, MockSessionProvider, RouteGuard, create_router,
    cookies::{CookieMutation, CookieOptions},
    session::SessionState,
    supabase::ProbeState,
};
use std::sync::Arc;
use tower::util::ServiceExt;

fn app(sessions: MockSessionProvider) -> Router {
    let state = AppState {
        sessions: Arc::new(sessions) as SessionState,
        probe: Arc::new(MockConnectionProbe::healthy()) as ProbeState,
        guard: Arc::new(RouteGuard::default()),
        config: AppConfig::default(),
    };
    create_router(state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::COOKIE, "sb-localhost-auth-token=base64-e30")
        .body(Body::empty())
        .unwrap()
}

fn location(response: &axum::response::Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

fn set_cookies(response: &axum::response::Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok().map(str::to_string))
        .collect()
}

fn refreshed_cookie() -> CookieMutation {
    CookieMutation::set("sb-localhost-auth-token", "base64-refreshed", CookieOptions::default())
}

#[tokio::test]
async fn test_protected_route_without_session_redirects_to_login() {
    let response = app(MockSessionProvider::new_anonymous())
        .oneshot(get("/dashboard"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), Some("/login?redirect=%2Fdashboard"));
}

#[tokio::test]
async fn test_nested_protected_route_keeps_full_path() {
    let response = app(MockSessionProvider::new_anonymous())
        .oneshot(get("/admin/users?tab=pending"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    // Only the path is carried over, as the login flow expects.
    assert_eq!(location(&response), Some("/login?redirect=%2Fadmin%2Fusers"));
}

#[tokio::test]
async fn test_protected_route_with_session_is_served() {
    let response = app(MockSessionProvider::new_authenticated())
        .oneshot(get("/dashboard"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["path"], "/dashboard");
}

#[tokio::test]
async fn test_auth_route_with_session_redirects_to_landing() {
    for path in ["/login", "/register", "/reset-password"] {
        let response = app(MockSessionProvider::new_authenticated())
            .oneshot(get(path))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{path}");
        assert_eq!(location(&response), Some("/dashboard"), "{path}");
    }
}

#[tokio::test]
async fn test_auth_route_without_session_is_served() {
    let response = app(MockSessionProvider::new_anonymous())
        .oneshot(get("/login"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(location(&response), None);
}

#[tokio::test]
async fn test_unclassified_route_passes_without_session() {
    let response = app(MockSessionProvider::new_anonymous())
        .oneshot(get("/products/rose-bush"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(location(&response), None);
}

#[tokio::test]
async fn test_excluded_paths_never_reach_the_provider() {
    let sessions = MockSessionProvider::new_failing();
    let app = app(sessions.clone());

    let response = app
        .clone()
        .oneshot(get("/api/roles/sales_staff/permissions"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Unrouted, but still excluded: the 404 comes from the router, not a redirect.
    for path in ["/api/orders", "/_next/static/app.js", "/_next/image", "/favicon.ico"] {
        let response = app.clone().oneshot(get(path)).await.unwrap();
        assert_eq!(location(&response), None, "{path}");
    }

    assert_eq!(sessions.calls(), 0);
}

#[tokio::test]
async fn test_guarded_paths_consult_the_provider_once() {
    let sessions = MockSessionProvider::new_authenticated();
    let response = app(sessions.clone()).oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(sessions.calls(), 1);
}

#[tokio::test]
async fn test_provider_failure_fails_closed() {
    let response = app(MockSessionProvider::new_failing())
        .oneshot(get("/profile"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), Some("/login?redirect=%2Fprofile"));

    // Public pages stay reachable while the provider is down.
    let response = app(MockSessionProvider::new_failing())
        .oneshot(get("/products"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_refreshed_cookies_survive_pass_through() {
    let sessions = MockSessionProvider::new_authenticated().with_cookies(vec![refreshed_cookie()]);
    let response = app(sessions).oneshot(get("/dashboard")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("sb-localhost-auth-token=base64-refreshed"));
}

#[tokio::test]
async fn test_refreshed_cookies_survive_redirects() {
    let sessions = MockSessionProvider::new_authenticated().with_cookies(vec![refreshed_cookie()]);
    let response = app(sessions).oneshot(get("/login")).await.unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(set_cookies(&response).len(), 1);

    // A rejected refresh clears the cookie and still redirects to login.
    let cleared = CookieMutation::remove("sb-localhost-auth-token", &CookieOptions::default());
    let sessions = MockSessionProvider::new_anonymous().with_cookies(vec![cleared]);
    let response = app(sessions).oneshot(get("/dashboard")).await.unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].contains("Max-Age=0"));
}

#[tokio::test]
async fn test_decision_is_stable_across_repeated_requests() {
    let app = app(MockSessionProvider::new_anonymous());
    let first = app.clone().oneshot(get("/dashboard")).await.unwrap();
    let second = app.oneshot(get("/dashboard")).await.unwrap();

    assert_eq!(first.status(), second.status());
    assert_eq!(location(&first), location(&second));
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let response = app(MockSessionProvider::new_anonymous())
        .oneshot(get("/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}
