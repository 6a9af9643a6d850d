//! Node types of the desired-state tree.
//!
//! Structure mirrors the fabric's containment rules:
//! Tenant → AppProfile → { BaseEpg, TierEpg* }, with bindings and match
//! criteria as children of the EPGs. Only the targeted profile is rebuilt;
//! sibling profiles of the tenant are untouched by the commit.

/// Root of one micro-segmentation change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigTree {
    pub tenant: Tenant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tenant {
    pub name: String,
    /// The one profile this change rewrites.
    pub profile: AppProfile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppProfile {
    pub name: String,
    pub descr: String,
    pub base: BaseEpg,
    pub tiers: Vec<TierEpg>,
}

/// The flat EPG being segmented. It keeps its bridge domain and virtual
/// domain binding but stops enforcing policy itself; the tier EPGs take over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseEpg {
    pub name: String,
    pub descr: String,
    pub bridge_domain: String,
    pub vmm: Option<VmmBinding>,
}

/// One attribute-matched micro-EPG covering a single application tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierEpg {
    pub name: String,
    pub descr: String,
    pub bridge_domain: String,
    pub vmm: Option<VmmBinding>,
    pub criterion: MatchCriterion,
    pub contracts: Vec<ContractRef>,
}

/// VMM domain attachment of an EPG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmmBinding {
    /// Target DN of the VMM domain, copied from the base EPG's binding.
    pub domain_dn: String,
    pub class_pref: ClassPreference,
    /// Port-group hardening; attached on the base EPG's binding only.
    pub security: Option<SecurityPolicy>,
}

impl VmmBinding {
    /// Binding for the base EPG: micro-segmentation class preference plus
    /// the hardened port-group security policy.
    pub fn for_base(domain_dn: impl Into<String>) -> Self {
        Self {
            domain_dn: domain_dn.into(),
            class_pref: ClassPreference::Useg,
            security: Some(SecurityPolicy::hardened()),
        }
    }

    /// Binding for a tier EPG: encapsulation-based class preference, no
    /// embedded security policy.
    pub fn for_tier(domain_dn: impl Into<String>) -> Self {
        Self {
            domain_dn: domain_dn.into(),
            class_pref: ClassPreference::Encap,
            security: None,
        }
    }
}

/// How the VMM integration classifies traffic into the EPG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassPreference {
    /// Micro-segmentation classification (base EPG).
    Useg,
    /// Encapsulation-based classification (tier EPGs, which do the actual
    /// traffic discrimination).
    Encap,
}

impl ClassPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassPreference::Useg => "useg",
            ClassPreference::Encap => "encap",
        }
    }
}

/// Virtual switch port-group security settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityPolicy {
    pub allow_promiscuous: Stance,
    pub forged_transmits: Stance,
    pub mac_changes: Stance,
}

impl SecurityPolicy {
    /// The segmentation hardening defaults: reject everything.
    pub fn hardened() -> Self {
        Self {
            allow_promiscuous: Stance::Reject,
            forged_transmits: Stance::Reject,
            mac_changes: Stance::Reject,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stance {
    Accept,
    Reject,
}

impl Stance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stance::Accept => "accept",
            Stance::Reject => "reject",
        }
    }
}

/// The attribute-match criterion of a tier EPG: match any one of the IP
/// attributes below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCriterion {
    pub name: String,
    pub ip_attributes: Vec<IpAttribute>,
}

impl MatchCriterion {
    /// Criterion over a tier's endpoint list. Attribute names are the
    /// sequence `0..n`, scoped to this criterion.
    pub fn over_endpoints<I, S>(endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: "default".to_string(),
            ip_attributes: endpoints
                .into_iter()
                .enumerate()
                .map(|(seq, ip)| IpAttribute {
                    name: seq.to_string(),
                    ip: ip.into(),
                })
                .collect(),
        }
    }
}

/// One IP-literal match attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpAttribute {
    /// Sequential name, unique within the owning criterion only.
    pub name: String,
    pub ip: String,
}

/// A directional contract reference on a tier EPG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractRef {
    pub contract: String,
    pub role: ContractRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractRole {
    Consumer,
    Provider,
}
