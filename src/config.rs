use reqwest::Url;
use std::env;
use thiserror::Error;

/// AppConfig
///
/// Holds the application's entire configuration state. Immutable once loaded and shared
/// with the router through `FromRef`, so the route guard, the session provider and the
/// handlers all observe the same Supabase project.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Selects the log format.
    pub env: Env,
    // Base URL of the hosted Supabase project (e.g. https://abcd.supabase.co).
    pub supabase_url: String,
    // Public anon key sent as `apikey` on every call to the auth and REST gateways.
    pub supabase_anon_key: String,
    // Optional secret used to verify access tokens locally.
    pub jwt_secret: Option<String>,
    // Public origin of the site, used to decide whether session cookies are `Secure`.
    pub site_url: String,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
}

/// Env
///
/// Defines the runtime context: pretty logs locally, JSON logs in production.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Env {
    Local,
    Production,
}

/// ConfigError
///
/// Raised by `AppConfig::try_load` when the identity provider cannot be configured.
/// The server must never start in this state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("{var} is not a valid URL: {reason}")]
    InvalidUrl { var: &'static str, reason: String },
}

const DEFAULT_SITE_URL: &str = "http://localhost:3000";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

impl Default for AppConfig {
    /// Safe, non-panicking instance for test state scaffolding.
    fn default() -> Self {
        Self {
            env: Env::Local,
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            jwt_secret: None,
            site_url: DEFAULT_SITE_URL.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

/// Reads the first non-empty variable among `names`.
///
/// The frontend build exposed the same values under `NEXT_PUBLIC_*`, so both spellings
/// are accepted and the unprefixed one wins.
fn first_var(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

impl AppConfig {
    /// load
    ///
    /// Startup entry point. Implements the **fail-fast** principle.
    ///
    /// # Panics
    /// Panics when the Supabase connection parameters are missing or invalid, so the
    /// process refuses to serve any request with a misconfigured identity provider.
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(config) => config,
            Err(e) => panic!("FATAL: {e}"),
        }
    }

    /// try_load
    ///
    /// Non-panicking variant of `load`, reading everything from the environment.
    pub fn try_load() -> Result<Self, ConfigError> {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let supabase_url = first_var(&["SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"])
            .ok_or(ConfigError::Missing("SUPABASE_URL"))?;
        Url::parse(&supabase_url).map_err(|e| ConfigError::InvalidUrl {
            var: "SUPABASE_URL",
            reason: e.to_string(),
        })?;

        let supabase_anon_key = first_var(&["SUPABASE_ANON_KEY", "NEXT_PUBLIC_SUPABASE_ANON_KEY"])
            .ok_or(ConfigError::Missing("SUPABASE_ANON_KEY"))?;

        // Opt-in in every environment: without it, stored sessions are trusted on expiry.
        let jwt_secret = first_var(&["SUPABASE_JWT_SECRET"]);

        let site_url = first_var(&["SITE_URL", "NEXT_PUBLIC_SITE_URL"])
            .unwrap_or_else(|| DEFAULT_SITE_URL.to_string());
        Url::parse(&site_url).map_err(|e| ConfigError::InvalidUrl {
            var: "SITE_URL",
            reason: e.to_string(),
        })?;

        let bind_addr = first_var(&["BIND_ADDR"]).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        Ok(Self {
            env,
            supabase_url: supabase_url.trim_end_matches('/').to_string(),
            supabase_anon_key,
            jwt_secret,
            site_url,
            bind_addr,
        })
    }

    /// Name of the cookie the Supabase SSR client stores the session under:
    /// `sb-<project-ref>-auth-token`, where the project ref is the first host label.
    pub fn auth_cookie_name(&self) -> String {
        let project_ref = Url::parse(&self.supabase_url)
            .ok()
            .and_then(|url| url.host_str().map(|host| host.to_string()))
            .and_then(|host| host.split('.').next().map(str::to_string))
            .unwrap_or_default();
        format!("sb-{project_ref}-auth-token")
    }

    /// Session cookies are only marked `Secure` when the site itself is served over https.
    pub fn secure_cookies(&self) -> bool {
        self.site_url.starts_with("https://")
    }
}
