use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{env, sync::Arc, time::Duration};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::config::AppConfig;

/// Shown when the database answers but the schema has not been migrated yet.
pub const SCHEMA_PENDING_NOTE: &str =
    "Connection successful! Database schema not yet created (expected).";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Success,
    Error,
}

/// Whether the provider settings are visible in the process environment, under
/// either spelling.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentCheck {
    pub supabase_url: bool,
    pub supabase_anon_key: bool,
}

impl EnvironmentCheck {
    pub fn from_env() -> Self {
        let is_set = |names: &[&str]| {
            names
                .iter()
                .any(|name| env::var(name).is_ok_and(|value| !value.trim().is_empty()))
        };
        Self {
            supabase_url: is_set(&["SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"]),
            supabase_anon_key: is_set(&["SUPABASE_ANON_KEY", "NEXT_PUBLIC_SUPABASE_ANON_KEY"]),
        }
    }
}

/// ConnectionReport
///
/// Result of the `/test-supabase` diagnostic.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionReport {
    pub status: ConnectionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub environment: EnvironmentCheck,
}

/// The part of the probe outcome that depends on the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub status: ConnectionStatus,
    pub message: Option<String>,
}

impl ProbeOutcome {
    pub fn success(message: Option<String>) -> Self {
        Self {
            status: ConnectionStatus::Success,
            message,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ConnectionStatus::Error,
            message: Some(message.into()),
        }
    }
}

/// ConnectionProbe
///
/// Contract for the database round-trip behind the connection test page.
#[async_trait]
pub trait ConnectionProbe: Send + Sync {
    async fn probe(&self) -> ProbeOutcome;
}

pub type ProbeState = Arc<dyn ConnectionProbe>;

#[derive(Deserialize)]
struct RestError {
    message: Option<String>,
}

/// Classify a PostgREST error message.
///
/// A missing relation still proves the gateway, the key and the database all answered.
pub fn classify_rest_error(message: &str) -> ProbeOutcome {
    if message.contains("relation") && message.contains("does not exist") {
        ProbeOutcome::success(Some(SCHEMA_PENDING_NOTE.to_string()))
    } else {
        ProbeOutcome::error(message)
    }
}

/// SupabaseRestProbe
///
/// Reads at most one row from `profiles` through the REST gateway with the anon key.
#[derive(Clone)]
pub struct SupabaseRestProbe {
    http: reqwest::Client,
    rest_url: String,
    anon_key: String,
}

impl SupabaseRestProbe {
    pub fn new(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            rest_url: format!("{}/rest/v1", config.supabase_url),
            anon_key: config.supabase_anon_key.clone(),
        })
    }
}

#[async_trait]
impl ConnectionProbe for SupabaseRestProbe {
    async fn probe(&self) -> ProbeOutcome {
        let response = match self
            .http
            .get(format!("{}/profiles?select=*&limit=1", self.rest_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "supabase probe failed");
                return ProbeOutcome::error(e.to_string());
            }
        };

        let status = response.status();
        if status.is_success() {
            return ProbeOutcome::success(None);
        }

        let message = match response.json::<RestError>().await {
            Ok(RestError {
                message: Some(message),
            }) => message,
            _ => format!("unexpected status {}", status.as_u16()),
        };
        classify_rest_error(&message)
    }
}

/// MockConnectionProbe
///
/// Returns a canned outcome, for handler tests.
#[derive(Clone)]
pub struct MockConnectionProbe {
    pub outcome: ProbeOutcome,
}

impl MockConnectionProbe {
    pub fn new(outcome: ProbeOutcome) -> Self {
        Self { outcome }
    }

    pub fn healthy() -> Self {
        Self::new(ProbeOutcome::success(None))
    }
}

#[async_trait]
impl ConnectionProbe for MockConnectionProbe {
    async fn probe(&self) -> ProbeOutcome {
        self.outcome.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_relation_counts_as_connected() {
        let outcome = classify_rest_error(r#"relation "public.profiles" does not exist"#);
        assert_eq!(outcome.status, ConnectionStatus::Success);
        assert_eq!(outcome.message.as_deref(), Some(SCHEMA_PENDING_NOTE));
    }

    #[test]
    fn other_errors_are_reported() {
        let outcome = classify_rest_error("Invalid API key");
        assert_eq!(outcome, ProbeOutcome::error("Invalid API key"));
    }
}
