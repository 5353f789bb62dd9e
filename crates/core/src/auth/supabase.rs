use anyhow::{Context, Result};
use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;

use crate::auth::{decide, Access, AuthenticatedUser, SessionGate};
use crate::config::Settings;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const USER_PATH: &str = "/auth/v1/user";

/// Session verifier backed by the hosted identity provider. Tokens are minted
/// by the provider's own login UI; this client only checks them against the
/// user endpoint.
#[derive(Debug, Clone)]
pub struct SupabaseGate {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseGate {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings.require_supabase_url()?.to_string();
        let anon_key = settings.require_supabase_anon_key()?.to_string();

        let timeout_secs = std::env::var("SUPABASE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build identity provider http client")?;

        Ok(Self {
            http,
            base_url,
            anon_key,
        })
    }

    fn user_url(&self) -> String {
        format!("{}{USER_PATH}", self.base_url.trim_end_matches('/'))
    }

    /// Ok(None) means the token is invalid or expired; Err is reserved for
    /// transport and contract failures.
    async fn verify_token(&self, token: &str) -> Result<Option<AuthenticatedUser>> {
        let res = self
            .http
            .get(self.user_url())
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await
            .context("identity provider request failed")?;

        let status = res.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Ok(None);
        }

        let text = res
            .text()
            .await
            .context("failed to read identity provider response")?;

        if !status.is_success() {
            anyhow::bail!("identity provider HTTP {status}: {text}");
        }

        let body = serde_json::from_str::<Value>(&text)
            .with_context(|| format!("identity provider response is not valid JSON: {text}"))?;

        parse_user(&body).map(Some)
    }
}

#[async_trait::async_trait]
impl SessionGate for SupabaseGate {
    async fn authorize(&self, path: &str, bearer_token: Option<&str>) -> Result<Access> {
        let session = match bearer_token {
            Some(token) if !token.trim().is_empty() => self.verify_token(token.trim()).await?,
            _ => None,
        };

        if session.is_none() && bearer_token.is_some() {
            tracing::debug!(path, "bearer token rejected by identity provider");
        }

        Ok(decide(path, session))
    }
}

fn parse_user(body: &Value) -> Result<AuthenticatedUser> {
    let id = body
        .get("id")
        .and_then(Value::as_str)
        .context("identity provider response missing user id")?;
    let id = Uuid::parse_str(id).context("identity provider user id is not a UUID")?;

    let email = body
        .get("email")
        .and_then(Value::as_str)
        .map(str::to_string)
        .filter(|s| !s.is_empty());

    Ok(AuthenticatedUser { id, email })
}
