//! AppDynamics flow-map client.
//!
//! Pulls the monitored application's flow map from the analytics controller
//! and normalizes it into the shapes the builder consumes: observed tiers
//! with their node IPs, and one contract per observed tier-to-tier call
//! (the calling tier consumes it, the called tier provides it).

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};
use useg_common::{Direction, RelationshipGraph, Result, TierMapping, UsegError};

/// Analytics controller settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AppDynamicsConfig {
    /// Controller base URL, e.g. `https://company.saas.appdynamics.com`.
    pub url: String,
    /// API bearer token.
    pub token: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// REST client for the analytics controller.
pub struct AppDynamicsClient {
    base_url: String,
    token: String,
    client: Client,
}

impl AppDynamicsClient {
    pub fn new(config: &AppDynamicsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            client,
        })
    }

    async fn flow_map(&self, application: &str) -> Result<FlowMap> {
        let url = format!(
            "{}/controller/rest/applications/{application}/flowmap?output=JSON",
            self.base_url
        );
        debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(UsegError::Malformed(format!(
                "analytics controller returned {} for application {application}",
                response.status()
            )));
        }
        Ok(response.json().await?)
    }

    /// Observed tier → node-IP mapping for the application.
    pub async fn tier_mapping(&self, application: &str) -> Result<TierMapping> {
        let flow_map = self.flow_map(application).await?;
        let mapping = mapping_of(&flow_map);
        info!(
            application,
            tiers = mapping.len(),
            endpoints = mapping.endpoint_count(),
            "loaded tier mapping from analytics"
        );
        Ok(mapping)
    }

    /// Relationship graph derived from the observed tier-to-tier calls.
    pub async fn relationship_graph(&self, application: &str) -> Result<RelationshipGraph> {
        let flow_map = self.flow_map(application).await?;
        Ok(graph_of(&flow_map))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlowMap {
    #[serde(default)]
    tiers: Vec<TierNode>,
    #[serde(default)]
    calls: Vec<TierCall>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TierNode {
    name: String,
    #[serde(default)]
    ip_addresses: Vec<String>,
}

/// One observed call between tiers, caller to callee.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TierCall {
    source: String,
    target: String,
}

fn mapping_of(flow_map: &FlowMap) -> TierMapping {
    flow_map
        .tiers
        .iter()
        .map(|tier| (tier.name.clone(), tier.ip_addresses.clone()))
        .collect()
}

/// Each observed call becomes one contract, named `{source}2{target}`:
/// the caller consumes it, the callee provides it.
fn graph_of(flow_map: &FlowMap) -> RelationshipGraph {
    let mut graph = RelationshipGraph::new();
    for call in &flow_map.calls {
        let contract = format!("{}2{}", call.source, call.target);
        graph.add(&call.source, &contract, Direction::Consume);
        graph.add(&call.target, &contract, Direction::Provide);
    }
    graph
}
