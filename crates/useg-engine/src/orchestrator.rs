//! The one-shot segmentation flow.
//!
//! Linear sequence per invocation: resolve → load → build → commit. Any
//! failure stops the flow before the next step; in particular nothing is
//! built, let alone submitted, when the identity tuple does not resolve.

use crate::builder::{build_tree, BuildInput};
use chrono::Utc;
use tracing::info;
use useg_appflow::FlowProvider;
use useg_common::{EpgIdentity, Result, UsegError};
use useg_fabric::{Committer, FabricLookup};

/// Summary of an applied segmentation, for callers that want to render one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentationReport {
    pub tiers: usize,
    pub endpoints: usize,
    pub contract_refs: usize,
}

/// Wires lookup, flow data and commit around the builder.
pub struct MicroSegmenter<L, C, F> {
    lookup: L,
    committer: C,
    flows: F,
}

impl<L, C, F> MicroSegmenter<L, C, F>
where
    L: FabricLookup,
    C: Committer,
    F: FlowProvider,
{
    pub fn new(lookup: L, committer: C, flows: F) -> Self {
        Self {
            lookup,
            committer,
            flows,
        }
    }

    /// Micro-segment the addressed base EPG.
    pub async fn segment(&self, identity: &EpgIdentity) -> Result<SegmentationReport> {
        if !self.lookup.exists(identity).await? {
            return Err(UsegError::Resolution(format!(
                "base EPG {} not found on the fabric",
                identity.epg_dn()
            )));
        }

        let bridge_domain = self.lookup.bridge_domain_of(identity).await?;
        let vmm_domain = self.lookup.vmm_domain_of(identity).await?;

        let application = identity.application.as_deref();
        let mapping = self.flows.tier_mapping(application).await?;
        let graph = self.flows.relationship_graph(application).await?;

        let tree = build_tree(BuildInput {
            identity,
            mapping: &mapping,
            graph: &graph,
            bridge_domain: &bridge_domain,
            vmm_domain: vmm_domain.as_deref(),
            segmented_at: Utc::now(),
        })?;

        let report = SegmentationReport {
            tiers: tree.tenant.profile.tiers.len(),
            endpoints: mapping.endpoint_count(),
            contract_refs: tree
                .tenant
                .profile
                .tiers
                .iter()
                .map(|t| t.contracts.len())
                .sum(),
        };

        self.committer.commit(&tree).await?;
        info!(
            epg = %identity.epg_dn(),
            tiers = report.tiers,
            endpoints = report.endpoints,
            "EPG micro-segmented"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use useg_common::{Direction, RelationshipGraph, TierMapping};
    use useg_model::ConfigTree;

    struct FakeLookup {
        exists: bool,
        bridge_domain: Option<String>,
        vmm_domain: Option<String>,
    }

    #[async_trait]
    impl FabricLookup for FakeLookup {
        async fn exists(&self, _identity: &EpgIdentity) -> Result<bool> {
            Ok(self.exists)
        }

        async fn bridge_domain_of(&self, identity: &EpgIdentity) -> Result<String> {
            self.bridge_domain.clone().ok_or_else(|| {
                UsegError::Resolution(format!(
                    "EPG {} has no bridge-domain binding",
                    identity.epg_dn()
                ))
            })
        }

        async fn vmm_domain_of(&self, _identity: &EpgIdentity) -> Result<Option<String>> {
            Ok(self.vmm_domain.clone())
        }
    }

    #[derive(Default)]
    struct RecordingCommitter {
        committed: Mutex<Vec<ConfigTree>>,
    }

    #[async_trait]
    impl Committer for RecordingCommitter {
        async fn commit(&self, tree: &ConfigTree) -> Result<()> {
            self.committed.lock().unwrap().push(tree.clone());
            Ok(())
        }
    }

    struct FakeFlows {
        mapping: TierMapping,
        graph: RelationshipGraph,
    }

    #[async_trait]
    impl FlowProvider for FakeFlows {
        async fn tier_mapping(&self, _application: Option<&str>) -> Result<TierMapping> {
            Ok(self.mapping.clone())
        }

        async fn relationship_graph(&self, _application: Option<&str>) -> Result<RelationshipGraph> {
            Ok(self.graph.clone())
        }
    }

    fn scenario_flows() -> FakeFlows {
        let mapping: TierMapping = [
            ("web".to_string(), vec!["10.0.0.1".to_string(), "10.0.0.2".to_string()]),
            ("db".to_string(), vec!["10.0.0.3".to_string()]),
        ]
        .into_iter()
        .collect();

        let mut graph = RelationshipGraph::new();
        graph.add("web", "ctr1", Direction::Provide);
        graph.add("db", "ctr1", Direction::Consume);

        FakeFlows { mapping, graph }
    }

    fn identity() -> EpgIdentity {
        EpgIdentity::new("T1", "P1", "Base", "")
    }

    #[tokio::test]
    async fn test_happy_path_commits_once() {
        let segmenter = MicroSegmenter::new(
            FakeLookup {
                exists: true,
                bridge_domain: Some("BD1".to_string()),
                vmm_domain: None,
            },
            RecordingCommitter::default(),
            scenario_flows(),
        );

        let report = segmenter.segment(&identity()).await.unwrap();
        assert_eq!(
            report,
            SegmentationReport {
                tiers: 2,
                endpoints: 3,
                contract_refs: 2,
            }
        );

        let committed = segmenter.committer.committed.lock().unwrap();
        assert_eq!(committed.len(), 1);
        let tree = &committed[0];
        assert_eq!(tree.tenant.name, "T1");
        assert_eq!(tree.tenant.profile.tiers[0].name, "web");
        assert!(tree.tenant.profile.base.vmm.is_none());
    }

    #[tokio::test]
    async fn test_missing_epg_commits_nothing() {
        let segmenter = MicroSegmenter::new(
            FakeLookup {
                exists: false,
                bridge_domain: Some("BD1".to_string()),
                vmm_domain: None,
            },
            RecordingCommitter::default(),
            scenario_flows(),
        );

        let err = segmenter.segment(&identity()).await.unwrap_err();
        assert!(matches!(err, UsegError::Resolution(_)));
        assert!(segmenter.committer.committed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_bridge_domain_is_fatal() {
        let segmenter = MicroSegmenter::new(
            FakeLookup {
                exists: true,
                bridge_domain: None,
                vmm_domain: None,
            },
            RecordingCommitter::default(),
            scenario_flows(),
        );

        let err = segmenter.segment(&identity()).await.unwrap_err();
        assert!(matches!(err, UsegError::Resolution(_)));
        assert!(segmenter.committer.committed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_mapping_commits_nothing() {
        let segmenter = MicroSegmenter::new(
            FakeLookup {
                exists: true,
                bridge_domain: Some("BD1".to_string()),
                vmm_domain: None,
            },
            RecordingCommitter::default(),
            FakeFlows {
                mapping: TierMapping::default(),
                graph: RelationshipGraph::new(),
            },
        );

        let err = segmenter.segment(&identity()).await.unwrap_err();
        assert!(matches!(err, UsegError::Validation(_)));
        assert!(segmenter.committer.committed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_commit_rejection_is_surfaced() {
        struct RejectingCommitter;

        #[async_trait]
        impl Committer for RejectingCommitter {
            async fn commit(&self, _tree: &ConfigTree) -> Result<()> {
                Err(UsegError::Commit {
                    code: "102".to_string(),
                    text: "invalid dn".to_string(),
                })
            }
        }

        let segmenter = MicroSegmenter::new(
            FakeLookup {
                exists: true,
                bridge_domain: Some("BD1".to_string()),
                vmm_domain: None,
            },
            RejectingCommitter,
            scenario_flows(),
        );

        let err = segmenter.segment(&identity()).await.unwrap_err();
        assert!(matches!(err, UsegError::Commit { .. }));
    }
}
