//! Transactional commit of a desired-state tree.
//!
//! The whole tenant subtree goes up in one configuration request against the
//! policy universe root; the controller accepts or rejects it atomically.
//! Rejections come back as a structured error object and are surfaced
//! verbatim.

use crate::session::ApicSession;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};
use useg_common::{Result, UsegError};
use useg_model::ConfigTree;

/// Single-shot, all-or-nothing submission of a config tree.
#[async_trait]
pub trait Committer: Send + Sync {
    async fn commit(&self, tree: &ConfigTree) -> Result<()>;
}

/// APIC-backed committer.
pub struct ApicCommitter {
    session: Arc<ApicSession>,
}

impl ApicCommitter {
    pub fn new(session: Arc<ApicSession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Committer for ApicCommitter {
    async fn commit(&self, tree: &ConfigTree) -> Result<()> {
        let payload = tree.to_payload();
        let response = self.session.post_json("/api/mo/uni.json", &payload).await?;

        let status = response.status();
        if status.is_success() {
            info!(tenant = %tree.tenant.name, "configuration committed");
            return Ok(());
        }

        let body: Value = response.json().await.unwrap_or_default();
        let (code, text) = rejection(&body, status.as_str());
        warn!(tenant = %tree.tenant.name, code = %code, text = %text, "fabric rejected commit");
        Err(UsegError::Commit { code, text })
    }
}

/// Pull code/text out of an APIC error response, falling back to the HTTP
/// status when the body is not the expected shape.
fn rejection(body: &Value, status: &str) -> (String, String) {
    let attrs = &body["imdata"][0]["error"]["attributes"];
    let code = attrs["code"].as_str().unwrap_or(status).to_string();
    let text = attrs["text"]
        .as_str()
        .unwrap_or("no error detail from controller")
        .to_string();
    (code, text)
}
