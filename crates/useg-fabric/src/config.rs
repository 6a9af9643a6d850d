//! APIC connection settings.

use serde::{Deserialize, Serialize};

/// Connection settings for the fabric controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApicConfig {
    /// Controller base URL, e.g. `https://apic.lab.example.com`.
    pub url: String,
    pub username: String,
    pub password: String,
    /// Per-request deadline; expiry is fatal to the invocation.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Skip TLS certificate verification (lab controllers with self-signed
    /// certificates).
    #[serde(default)]
    pub insecure: bool,
}

fn default_timeout_secs() -> u64 {
    30
}
