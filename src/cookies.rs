//! Cookie plumbing shared by the session provider and the route guard.
//!
//! Inbound cookies are read as plain name/value pairs; outbound changes are expressed
//! as `CookieMutation`s and rendered into `Set-Cookie` headers on whatever response
//! the guard ends up returning.

use axum::http::{
    HeaderMap, HeaderValue,
    header::{self, InvalidHeaderValue},
};
use std::collections::HashMap;

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Attributes attached to an outbound cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieOptions {
    pub path: String,
    pub max_age_secs: Option<i64>,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
}

/// 400 days, the longest lifetime browsers honour.
pub const SESSION_COOKIE_MAX_AGE: i64 = 400 * 24 * 60 * 60;

impl Default for CookieOptions {
    /// Defaults of the Supabase SSR client: readable by the browser client, site-wide.
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            max_age_secs: Some(SESSION_COOKIE_MAX_AGE),
            http_only: false,
            secure: false,
            same_site: SameSite::Lax,
        }
    }
}

/// A single cookie write (or removal) produced while resolving a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieMutation {
    pub name: String,
    pub value: String,
    pub options: CookieOptions,
}

impl CookieMutation {
    pub fn set(name: impl Into<String>, value: impl Into<String>, options: CookieOptions) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            options,
        }
    }

    /// Expires the cookie immediately, keeping the path so the browser drops the right one.
    pub fn remove(name: impl Into<String>, options: &CookieOptions) -> Self {
        Self {
            name: name.into(),
            value: String::new(),
            options: CookieOptions {
                max_age_secs: Some(0),
                ..options.clone()
            },
        }
    }

    pub fn is_removal(&self) -> bool {
        self.options.max_age_secs == Some(0)
    }

    /// Build Set-Cookie header value
    pub fn to_set_cookie(&self) -> String {
        let mut cookie = format!("{}={}", self.name, self.value);

        cookie.push_str(&format!("; Path={}", self.options.path));
        if let Some(max_age) = self.options.max_age_secs {
            cookie.push_str(&format!("; Max-Age={}", max_age));
        }
        if self.options.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.options.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str(&format!("; SameSite={}", self.options.same_site.as_str()));

        cookie
    }

    pub fn to_header_value(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        HeaderValue::from_str(&self.to_set_cookie())
    }
}

/// Collect every cookie sent with the request.
///
/// Multiple `Cookie` headers are merged; on duplicate names the first occurrence wins,
/// matching how browsers order the most specific cookie first.
pub fn request_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    let mut cookies = HashMap::new();
    for value in headers.get_all(header::COOKIE) {
        let Ok(value) = value.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=') {
                cookies
                    .entry(name.trim().to_string())
                    .or_insert_with(|| value.trim().to_string());
            }
        }
    }
    cookies
}

/// Append `Set-Cookie` headers for each mutation, skipping values that are not valid
/// header text.
pub fn apply_mutations(headers: &mut HeaderMap, mutations: &[CookieMutation]) {
    for mutation in mutations {
        match mutation.to_header_value() {
            Ok(value) => {
                headers.append(header::SET_COOKIE, value);
            }
            Err(e) => {
                tracing::warn!(cookie = %mutation.name, error = %e, "dropping unrenderable cookie");
            }
        }
    }
}
