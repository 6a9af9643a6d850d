//! CLI configuration file.
//!
//! TOML at `~/.useg/config.toml` (or `--config`):
//!
//! ```toml
//! data_dir = "/etc/useg"
//!
//! [apic]
//! url = "https://apic.lab.example.com"
//! username = "admin"
//! password = "secret"
//!
//! [appdynamics]          # optional; needed only for live analytics
//! url = "https://company.saas.appdynamics.com"
//! token = "..."
//! ```

use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use useg_appflow::AppDynamicsConfig;
use useg_fabric::ApicConfig;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub apic: ApicConfig,
    /// Analytics controller; without it only the static flow files work.
    pub appdynamics: Option<AppDynamicsConfig>,
    /// Directory holding `app_mapping.json` and `tier_relationship.json`.
    /// Defaults to the current directory.
    pub data_dir: Option<PathBuf>,
}

impl Config {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_path().context("cannot find home directory")?,
        };
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".useg").join("config.toml"))
}
