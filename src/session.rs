use async_trait::async_trait;
use axum::http::HeaderMap;
use base64::{
    Engine,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use thiserror::Error;

use crate::{
    config::AppConfig,
    cookies::{CookieMutation, CookieOptions, request_cookies},
};

/// Cookies longer than this are split into `name.0`, `name.1`, ...
pub const MAX_CHUNK_SIZE: usize = 3180;
/// Access tokens this close to expiry are refreshed pre-emptively.
pub const EXPIRY_MARGIN_SECS: i64 = 10;
const BASE64_PREFIX: &str = "base64-";

/// URL-safe alphabet, written without padding and read with or without it.
const BASE64URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// SessionResolution
///
/// Everything the route guard learns from the identity provider: whether a valid
/// session exists, and which cookies must be written back to keep it alive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionResolution {
    pub session_present: bool,
    pub cookies: Vec<CookieMutation>,
}

impl SessionResolution {
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn present() -> Self {
        Self {
            session_present: true,
            cookies: Vec::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("identity provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("identity provider returned status {status}")]
    Provider { status: u16 },

    #[error("could not encode refreshed session: {0}")]
    Encoding(#[from] serde_json::Error),
}

// 1. SessionProvider Contract
/// SessionProvider
///
/// The single capability the route guard consumes. Implementations recover the session
/// from the inbound cookies, refresh it when needed, and report the cookie writes that
/// the refresh requires. The guard never inspects the session itself.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn resolve(&self, headers: &HeaderMap) -> Result<SessionResolution, SessionError>;
}

/// SessionState
///
/// The concrete type used to share the session provider across the application state.
pub type SessionState = Arc<dyn SessionProvider>;

/// StoredSession
///
/// JSON document the Supabase clients keep in the auth cookie. Unknown fields are
/// ignored; `user` is carried through untouched so the browser client keeps working.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredSession {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<serde_json::Value>,
}

/// Claims checked when a JWT secret is configured.
#[derive(Debug, Deserialize)]
struct AccessClaims {
    #[allow(dead_code)]
    sub: String,
    #[allow(dead_code)]
    exp: usize,
}

#[derive(Debug, PartialEq, Eq)]
enum TokenState {
    Valid,
    Expired,
    Invalid,
}

// 2. The Real Implementation (Supabase GoTrue)
/// SupabaseSessionProvider
///
/// Reads the session the Supabase SSR client stores in `sb-<ref>-auth-token`, and
/// exchanges the refresh token at `/auth/v1/token` once the access token is stale.
#[derive(Clone)]
pub struct SupabaseSessionProvider {
    http: reqwest::Client,
    auth_url: String,
    anon_key: String,
    cookie_name: String,
    jwt_secret: Option<String>,
    cookie_options: CookieOptions,
}

impl SupabaseSessionProvider {
    /// new
    ///
    /// Builds the provider from the loaded configuration. The HTTP client carries the
    /// only timeout on the session round-trip.
    pub fn new(config: &AppConfig) -> Result<Self, SessionError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            auth_url: format!("{}/auth/v1", config.supabase_url),
            anon_key: config.supabase_anon_key.clone(),
            cookie_name: config.auth_cookie_name(),
            jwt_secret: config.jwt_secret.clone(),
            cookie_options: CookieOptions {
                secure: config.secure_cookies(),
                ..CookieOptions::default()
            },
        })
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    fn token_state(&self, session: &StoredSession) -> TokenState {
        let now = Utc::now().timestamp();

        match session.expires_at {
            Some(expires_at) if expires_at > now + EXPIRY_MARGIN_SECS => {}
            _ => return TokenState::Expired,
        }

        let Some(secret) = &self.jwt_secret else {
            return TokenState::Valid;
        };

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_audience(&["authenticated"]);

        let key = DecodingKey::from_secret(secret.as_bytes());
        match decode::<AccessClaims>(&session.access_token, &key, &validation) {
            Ok(_) => TokenState::Valid,
            Err(e) => match e.kind() {
                ErrorKind::ExpiredSignature => TokenState::Expired,
                _ => {
                    tracing::debug!(error = %e, "access token rejected");
                    TokenState::Invalid
                }
            },
        }
    }

    async fn refresh(
        &self,
        refresh_token: &str,
        existing: &HashMap<String, String>,
    ) -> Result<SessionResolution, SessionError> {
        let response = self
            .http
            .post(format!("{}/token?grant_type=refresh_token", self.auth_url))
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let mut session = response.json::<StoredSession>().await?;
            if session.expires_at.is_none() {
                session.expires_at = session
                    .expires_in
                    .map(|expires_in| Utc::now().timestamp() + expires_in);
            }

            let value = encode_session(&session)?;
            tracing::debug!("session refreshed");
            return Ok(SessionResolution {
                session_present: true,
                cookies: self.write_cookies(&value, existing),
            });
        }

        if status.is_client_error() {
            // Revoked or reused refresh token: the session is gone for good.
            tracing::debug!(status = status.as_u16(), "refresh token rejected");
            return Ok(SessionResolution {
                session_present: false,
                cookies: self.clear_cookies(existing),
            });
        }

        Err(SessionError::Provider {
            status: status.as_u16(),
        })
    }

    /// Cookie writes storing `value`, chunked when needed, expiring any chunk layout
    /// left over from the previous session.
    fn write_cookies(&self, value: &str, existing: &HashMap<String, String>) -> Vec<CookieMutation> {
        let chunks = split_chunks(value, MAX_CHUNK_SIZE);
        let mut mutations = Vec::new();

        if chunks.len() == 1 {
            mutations.push(CookieMutation::set(
                &self.cookie_name,
                value,
                self.cookie_options.clone(),
            ));
            for name in existing_cookie_names(existing, &self.cookie_name) {
                if name != self.cookie_name {
                    mutations.push(CookieMutation::remove(name, &self.cookie_options));
                }
            }
            return mutations;
        }

        for (index, chunk) in chunks.iter().enumerate() {
            mutations.push(CookieMutation::set(
                format!("{}.{}", self.cookie_name, index),
                chunk.as_str(),
                self.cookie_options.clone(),
            ));
        }
        for name in existing_cookie_names(existing, &self.cookie_name) {
            let stale = match chunk_index(&name, &self.cookie_name) {
                Some(index) => index >= chunks.len(),
                None => true,
            };
            if stale {
                mutations.push(CookieMutation::remove(name, &self.cookie_options));
            }
        }
        mutations
    }

    fn clear_cookies(&self, existing: &HashMap<String, String>) -> Vec<CookieMutation> {
        existing_cookie_names(existing, &self.cookie_name)
            .into_iter()
            .map(|name| CookieMutation::remove(name, &self.cookie_options))
            .collect()
    }
}

#[async_trait]
impl SessionProvider for SupabaseSessionProvider {
    async fn resolve(&self, headers: &HeaderMap) -> Result<SessionResolution, SessionError> {
        let cookies = request_cookies(headers);

        let Some(raw) = read_chunked(&cookies, &self.cookie_name) else {
            return Ok(SessionResolution::absent());
        };
        let Some(session) = decode_session(&raw) else {
            tracing::debug!(cookie = %self.cookie_name, "unreadable session cookie");
            return Ok(SessionResolution::absent());
        };

        match self.token_state(&session) {
            TokenState::Valid => Ok(SessionResolution::present()),
            TokenState::Invalid => Ok(SessionResolution {
                session_present: false,
                cookies: self.clear_cookies(&cookies),
            }),
            TokenState::Expired => self.refresh(&session.refresh_token, &cookies).await,
        }
    }
}

/// Reassemble the session cookie, either stored whole or as `name.0`, `name.1`, ...
pub(crate) fn read_chunked(cookies: &HashMap<String, String>, name: &str) -> Option<String> {
    if let Some(value) = cookies.get(name) {
        return Some(value.clone());
    }

    let mut value = String::new();
    let mut index = 0;
    while let Some(chunk) = cookies.get(&format!("{name}.{index}")) {
        value.push_str(chunk);
        index += 1;
    }
    (index > 0).then_some(value)
}

pub fn decode_session(raw: &str) -> Option<StoredSession> {
    let raw = urlencoding::decode(raw).ok()?;
    let json = match raw.strip_prefix(BASE64_PREFIX) {
        Some(encoded) => String::from_utf8(BASE64URL.decode(encoded).ok()?).ok()?,
        None => raw.to_string(),
    };
    serde_json::from_str(&json).ok()
}

pub fn encode_session(session: &StoredSession) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(session)?;
    Ok(format!("{BASE64_PREFIX}{}", BASE64URL.encode(json)))
}

fn split_chunks(value: &str, size: usize) -> Vec<String> {
    let chars: Vec<char> = value.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars.chunks(size).map(|chunk| chunk.iter().collect()).collect()
}

fn chunk_index(cookie: &str, name: &str) -> Option<usize> {
    cookie
        .strip_prefix(name)?
        .strip_prefix('.')?
        .parse()
        .ok()
}

/// Names of the session cookie and all its chunks present on the request.
fn existing_cookie_names(cookies: &HashMap<String, String>, name: &str) -> Vec<String> {
    let mut names: Vec<String> = cookies
        .keys()
        .filter(|cookie| *cookie == name || chunk_index(cookie, name).is_some())
        .cloned()
        .collect();
    names.sort();
    names
}

// 3. The Mock Implementation (For Tests)
/// MockSessionProvider
///
/// Deterministic stand-in used by the guard tests. Counts how often it was asked, so
/// tests can prove that excluded paths never reach the provider.
#[derive(Clone, Default)]
pub struct MockSessionProvider {
    pub session_present: bool,
    /// When true, every resolution fails as if the provider were down.
    pub should_fail: bool,
    /// Cookie writes reported with every successful resolution.
    pub cookies: Vec<CookieMutation>,
    calls: Arc<AtomicUsize>,
}

impl MockSessionProvider {
    pub fn new_anonymous() -> Self {
        Self::default()
    }

    pub fn new_authenticated() -> Self {
        Self {
            session_present: true,
            ..Self::default()
        }
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn with_cookies(mut self, cookies: Vec<CookieMutation>) -> Self {
        self.cookies = cookies;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionProvider for MockSessionProvider {
    async fn resolve(&self, _headers: &HeaderMap) -> Result<SessionResolution, SessionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.should_fail {
            return Err(SessionError::Provider { status: 503 });
        }

        Ok(SessionResolution {
            session_present: self.session_present,
            cookies: self.cookies.clone(),
        })
    }
}
