//! The dual-source loader seam.

use crate::appdynamics::AppDynamicsClient;
use crate::static_files::StaticFlowSource;
use async_trait::async_trait;
use tracing::info;
use useg_common::{RelationshipGraph, Result, TierMapping, UsegError};

/// Supplies the builder's two data inputs. `application == None` selects the
/// static pre-configured files; a name selects live analytics. Either path
/// returns the same shapes.
#[async_trait]
pub trait FlowProvider: Send + Sync {
    async fn tier_mapping(&self, application: Option<&str>) -> Result<TierMapping>;
    async fn relationship_graph(&self, application: Option<&str>) -> Result<RelationshipGraph>;
}

/// Static files plus an optional analytics client.
pub struct FlowLoader {
    static_source: StaticFlowSource,
    analytics: Option<AppDynamicsClient>,
}

impl FlowLoader {
    pub fn new(static_source: StaticFlowSource, analytics: Option<AppDynamicsClient>) -> Self {
        Self {
            static_source,
            analytics,
        }
    }

    fn analytics(&self) -> Result<&AppDynamicsClient> {
        self.analytics.as_ref().ok_or_else(|| {
            UsegError::Validation(
                "an application name was given but no analytics controller is configured"
                    .to_string(),
            )
        })
    }
}

#[async_trait]
impl FlowProvider for FlowLoader {
    async fn tier_mapping(&self, application: Option<&str>) -> Result<TierMapping> {
        match application {
            Some(app) => self.analytics()?.tier_mapping(app).await,
            None => {
                info!("no application name; using static tier mapping");
                self.static_source.tier_mapping()
            }
        }
    }

    async fn relationship_graph(&self, application: Option<&str>) -> Result<RelationshipGraph> {
        match application {
            Some(app) => self.analytics()?.relationship_graph(app).await,
            None => self.static_source.relationship_graph(),
        }
    }
}
