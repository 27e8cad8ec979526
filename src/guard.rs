//! Route guard: session-aware gating of page routes.
//!
//! Every request that survives the exclusion filter is classified against two prefix
//! tables. Protected pages need a session, auth pages (login, register, reset) need
//! the absence of one. Cookies written by the session provider while resolving the
//! session are attached to the outbound response whichever way the decision goes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use crate::{cookies::apply_mutations, session::SessionState};

/// GuardConfig
///
/// Immutable route tables, injected once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    /// Prefixes that require a session.
    pub protected_prefixes: Vec<String>,
    /// Prefixes reserved for visitors without a session.
    pub auth_prefixes: Vec<String>,
    /// Prefixes (relative to the leading `/`) that never reach the guard.
    pub excluded_prefixes: Vec<String>,
    /// Where unauthenticated visitors of protected pages are sent.
    pub login_path: String,
    /// Where signed-in visitors of auth pages are sent.
    pub landing_path: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            protected_prefixes: to_strings(&["/dashboard", "/admin", "/profile"]),
            auth_prefixes: to_strings(&["/login", "/register", "/reset-password"]),
            excluded_prefixes: to_strings(&["api", "_next/static", "_next/image", "favicon.ico"]),
            login_path: "/login".to_string(),
            landing_path: "/dashboard".to_string(),
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// The three possible outcomes for a guarded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    RedirectToLogin { location: String },
    RedirectToLanding { location: String },
    PassThrough,
}

impl GuardDecision {
    pub fn location(&self) -> Option<&str> {
        match self {
            GuardDecision::RedirectToLogin { location }
            | GuardDecision::RedirectToLanding { location } => Some(location),
            GuardDecision::PassThrough => None,
        }
    }
}

/// RouteGuard
///
/// Pure classification and decision logic. Holds no per-request state, so a single
/// instance is shared by every request behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct RouteGuard {
    config: GuardConfig,
}

/// GuardState
///
/// The concrete type used to share the guard across the application state.
pub type GuardState = Arc<RouteGuard>;

impl RouteGuard {
    pub fn new(config: GuardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Static assets, framework internals and API routes skip the guard entirely.
    pub fn is_excluded(&self, path: &str) -> bool {
        let rest = path.strip_prefix('/').unwrap_or(path);
        self.config
            .excluded_prefixes
            .iter()
            .any(|prefix| rest.starts_with(prefix.as_str()))
    }

    /// Plain, case-sensitive prefix test: `/administrator` is protected by `/admin`.
    pub fn is_protected(&self, path: &str) -> bool {
        self.config
            .protected_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    pub fn is_auth_route(&self, path: &str) -> bool {
        self.config
            .auth_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// decide
    ///
    /// Evaluated in fixed order; the protected-route rule short-circuits.
    pub fn decide(&self, path: &str, session_present: bool) -> GuardDecision {
        if self.is_protected(path) && !session_present {
            return GuardDecision::RedirectToLogin {
                location: self.login_location(path),
            };
        }

        if self.is_auth_route(path) && session_present {
            return GuardDecision::RedirectToLanding {
                location: self.config.landing_path.clone(),
            };
        }

        GuardDecision::PassThrough
    }

    /// `<login>?redirect=<path>` so the login flow can send the visitor back.
    fn login_location(&self, path: &str) -> String {
        format!(
            "{}?redirect={}",
            self.config.login_path,
            urlencoding::encode(path)
        )
    }
}

/// route_guard
///
/// Middleware wiring the guard into the router.
///
/// 1. Excluded paths go straight to the inner service; the session provider is not asked.
/// 2. The session provider resolves (and possibly refreshes) the session.
/// 3. The decision is applied, and any cookie writes from step 2 ride along on the
///    response, redirect or not.
///
/// A provider failure is treated as "no session" (fail-closed): protected pages then
/// redirect to login instead of being served without authentication.
pub async fn route_guard(
    State(guard): State<GuardState>,
    State(sessions): State<SessionState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    if guard.is_excluded(&path) {
        return next.run(request).await;
    }

    let resolution = match sessions.resolve(request.headers()).await {
        Ok(resolution) => resolution,
        Err(e) => {
            tracing::warn!(path = %path, error = %e, "session resolution failed, treating as signed out");
            Default::default()
        }
    };

    let decision = guard.decide(&path, resolution.session_present);
    tracing::debug!(
        path = %path,
        session = resolution.session_present,
        decision = ?decision,
        "route guard decision"
    );

    let mut response = match decision {
        GuardDecision::RedirectToLogin { location } | GuardDecision::RedirectToLanding { location } => {
            Redirect::temporary(&location).into_response()
        }
        GuardDecision::PassThrough => next.run(request).await,
    };

    apply_mutations(response.headers_mut(), &resolution.cookies);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard() -> RouteGuard {
        RouteGuard::default()
    }

    #[test]
    fn protected_without_session_redirects_to_login() {
        assert_eq!(
            guard().decide("/dashboard", false),
            GuardDecision::RedirectToLogin {
                location: "/login?redirect=%2Fdashboard".to_string()
            }
        );
        assert_eq!(
            guard().decide("/admin/users", false).location(),
            Some("/login?redirect=%2Fadmin%2Fusers")
        );
    }

    #[test]
    fn protected_with_session_passes() {
        for path in ["/dashboard", "/admin", "/profile/settings"] {
            assert_eq!(guard().decide(path, true), GuardDecision::PassThrough);
        }
    }

    #[test]
    fn auth_route_with_session_redirects_to_landing() {
        for path in ["/login", "/register", "/reset-password", "/login/callback"] {
            assert_eq!(
                guard().decide(path, true),
                GuardDecision::RedirectToLanding {
                    location: "/dashboard".to_string()
                }
            );
        }
    }

    #[test]
    fn auth_route_without_session_passes() {
        assert_eq!(guard().decide("/login", false), GuardDecision::PassThrough);
    }

    #[test]
    fn unclassified_paths_pass_either_way() {
        for path in ["/", "/products/rose-bush", "/cart", "/Dashboard"] {
            assert_eq!(guard().decide(path, false), GuardDecision::PassThrough);
            assert_eq!(guard().decide(path, true), GuardDecision::PassThrough);
        }
    }

    #[test]
    fn prefix_matching_is_not_segment_aware() {
        assert!(guard().is_protected("/administrator"));
        assert!(guard().is_auth_route("/registered-trademarks"));
    }

    #[test]
    fn protected_rule_wins_when_sets_overlap() {
        let guard = RouteGuard::new(GuardConfig {
            protected_prefixes: to_strings(&["/account"]),
            auth_prefixes: to_strings(&["/account/login"]),
            ..GuardConfig::default()
        });
        assert!(matches!(
            guard.decide("/account/login", false),
            GuardDecision::RedirectToLogin { .. }
        ));
        assert!(matches!(
            guard.decide("/account/login", true),
            GuardDecision::RedirectToLanding { .. }
        ));
    }

    #[test]
    fn decision_is_idempotent() {
        let guard = guard();
        for (path, session) in [("/dashboard", false), ("/login", true), ("/products", false)] {
            assert_eq!(guard.decide(path, session), guard.decide(path, session));
        }
    }

    #[test]
    fn exclusion_filter() {
        let guard = guard();
        for path in [
            "/api/orders",
            "/_next/static/chunks/app.js",
            "/_next/image",
            "/favicon.ico",
        ] {
            assert!(guard.is_excluded(path), "{path} should be excluded");
        }
        for path in ["/", "/dashboard", "/products/api", "/_next/data/x.json"] {
            assert!(!guard.is_excluded(path), "{path} should be guarded");
        }
    }

    #[test]
    fn custom_login_path_is_used() {
        let guard = RouteGuard::new(GuardConfig {
            login_path: "/auth/login".to_string(),
            ..GuardConfig::default()
        });
        assert_eq!(
            guard.decide("/profile", false).location(),
            Some("/auth/login?redirect=%2Fprofile")
        );
    }
}
