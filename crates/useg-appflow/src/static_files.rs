//! Static pre-configured flow data.
//!
//! The manual alternative to live analytics: `app_mapping.json` holds the
//! tier → endpoints map, `tier_relationship.json` the tier → contract →
//! directions graph, both in a configurable data directory.

use std::path::{Path, PathBuf};
use tracing::debug;
use useg_common::{RelationshipGraph, Result, TierMapping};

pub const APP_MAPPING_FILE: &str = "app_mapping.json";
pub const TIER_RELATIONSHIP_FILE: &str = "tier_relationship.json";

/// Reads flow data from JSON files on disk.
pub struct StaticFlowSource {
    data_dir: PathBuf,
}

impl StaticFlowSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn tier_mapping(&self) -> Result<TierMapping> {
        self.read_json(APP_MAPPING_FILE)
    }

    pub fn relationship_graph(&self) -> Result<RelationshipGraph> {
        self.read_json(TIER_RELATIONSHIP_FILE)
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, file: &str) -> Result<T> {
        let path = self.data_dir.join(file);
        debug!(path = %path.display(), "reading static flow data");
        let text = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
