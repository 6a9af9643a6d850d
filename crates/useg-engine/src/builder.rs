//! Desired-state tree construction.
//!
//! Pure function of its inputs: no network, no clock reads (the segmentation
//! timestamp is an input), so identical inputs always produce an identical
//! tree. Structurally invalid input is refused outright; the builder never
//! emits a partial tree.

use chrono::{DateTime, Utc};
use ipnetwork::IpNetwork;
use tracing::warn;
use useg_common::{Direction, EpgIdentity, RelationshipGraph, Result, TierMapping, UsegError};
use useg_model::{
    AppProfile, BaseEpg, ConfigTree, ContractRef, ContractRole, MatchCriterion, Tenant, TierEpg,
    VmmBinding,
};

/// Everything the builder needs; all resolution and loading has already
/// happened by the time this is assembled.
pub struct BuildInput<'a> {
    pub identity: &'a EpgIdentity,
    pub mapping: &'a TierMapping,
    pub graph: &'a RelationshipGraph,
    pub bridge_domain: &'a str,
    /// VMM domain DN of the base EPG; `None` for on-prem-only EPGs, in which
    /// case no EPG in the tree gets a VMM binding.
    pub vmm_domain: Option<&'a str>,
    pub segmented_at: DateTime<Utc>,
}

/// Build the full replacement tree for the targeted profile.
pub fn build_tree(input: BuildInput<'_>) -> Result<ConfigTree> {
    if input.mapping.is_empty() {
        return Err(UsegError::Validation(
            "tier mapping is empty; segmenting would leave the base EPG with no replacement"
                .to_string(),
        ));
    }

    let tiers = input
        .mapping
        .iter()
        .map(|tier| build_tier(&input, &tier.name, &tier.endpoints))
        .collect::<Result<Vec<_>>>()?;

    let base = BaseEpg {
        name: input.identity.epg.clone(),
        descr: format!(
            "Base EPG micro-segmented by useg at {}",
            input.segmented_at.format("%Y-%m-%d %H:%M:%S")
        ),
        bridge_domain: input.bridge_domain.to_string(),
        vmm: input.vmm_domain.map(VmmBinding::for_base),
    };

    Ok(ConfigTree {
        tenant: Tenant {
            name: input.identity.tenant.clone(),
            profile: AppProfile {
                name: input.identity.app_profile.clone(),
                descr: "This application profile has been micro-segmented by useg".to_string(),
                base,
                tiers,
            },
        },
    })
}

fn build_tier(input: &BuildInput<'_>, name: &str, endpoints: &[String]) -> Result<TierEpg> {
    if name.is_empty() {
        return Err(UsegError::Validation("tier with empty name".to_string()));
    }
    for endpoint in endpoints {
        if endpoint.is_empty() {
            return Err(UsegError::Validation(format!(
                "tier {name} contains an empty endpoint identifier"
            )));
        }
        if endpoint.parse::<IpNetwork>().is_err() {
            warn!(tier = name, endpoint = %endpoint, "endpoint is not a valid IP literal");
        }
    }

    Ok(TierEpg {
        name: name.to_string(),
        descr: "Micro-EPG created by useg".to_string(),
        bridge_domain: input.bridge_domain.to_string(),
        vmm: input.vmm_domain.map(VmmBinding::for_tier),
        criterion: MatchCriterion::over_endpoints(endpoints.iter().cloned()),
        contracts: contracts_for(input.graph, name),
    })
}

/// Contract references for one tier. A tier absent from the graph is
/// isolated and gets none; a contract carrying both directions yields both a
/// consumer and a provider reference.
fn contracts_for(graph: &RelationshipGraph, tier: &str) -> Vec<ContractRef> {
    let Some(contracts) = graph.contracts_for(tier) else {
        return Vec::new();
    };

    let mut refs = Vec::new();
    for (contract, directions) in contracts {
        if directions.contains(&Direction::Consume) {
            refs.push(ContractRef {
                contract: contract.clone(),
                role: ContractRole::Consumer,
            });
        }
        if directions.contains(&Direction::Provide) {
            refs.push(ContractRef {
                contract: contract.clone(),
                role: ContractRole::Provider,
            });
        }
    }
    refs
}
