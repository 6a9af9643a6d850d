//! Authenticated APIC session.
//!
//! Thin wrapper over reqwest: logs in via `aaaLogin`, then stamps the
//! `APIC-Cookie` token onto every subsequent request. The handle is created
//! once at process start and passed into the lookup and committer; there is
//! no ambient session state.

use crate::config::ApicConfig;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};
use useg_common::{Result, UsegError};

/// Authenticated session with one APIC controller.
pub struct ApicSession {
    base_url: String,
    client: reqwest::Client,
    token: RwLock<Option<String>>,
}

impl ApicSession {
    /// Build the HTTP client from config; does not talk to the controller
    /// until [`login`](Self::login).
    pub fn new(config: &ApicConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.insecure)
            .build()?;

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            client,
            token: RwLock::new(None),
        })
    }

    /// Authenticate with the controller and store the session token.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let url = format!("{}/api/aaaLogin.json", self.base_url);
        let body = json!({
            "aaaUser": { "attributes": { "name": username, "pwd": password } }
        });

        let response = self.client.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(UsegError::Auth(format!(
                "controller returned {}",
                response.status()
            )));
        }

        let value: Value = response.json().await?;
        let token = value["imdata"][0]["aaaLogin"]["attributes"]["token"]
            .as_str()
            .ok_or_else(|| UsegError::Auth("no token in aaaLogin response".to_string()))?
            .to_string();

        *self.token.write().await = Some(token);
        info!(url = %self.base_url, "authenticated with APIC");
        Ok(())
    }

    async fn cookie(&self) -> Result<String> {
        let token = self.token.read().await;
        let token = token
            .as_ref()
            .ok_or_else(|| UsegError::Auth("not logged in".to_string()))?;
        Ok(format!("APIC-Cookie={token}"))
    }

    /// Authenticated GET of an `/api/...` path, decoded as JSON.
    pub(crate) async fn get_json(&self, path: &str) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::COOKIE, self.cookie().await?)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(UsegError::Malformed(format!(
                "GET {path} returned {}",
                response.status()
            )));
        }
        Ok(response.json().await?)
    }

    /// Authenticated POST of a JSON body; returns the raw response for the
    /// caller to interpret (the committer parses rejections itself).
    pub(crate) async fn post_json(&self, path: &str, body: &Value) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {url}");

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::COOKIE, self.cookie().await?)
            .json(body)
            .send()
            .await?;
        Ok(response)
    }
}
