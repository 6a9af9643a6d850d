//! Typed ACI configuration tree.
//!
//! Every node kind the micro-segmentation flow emits is an explicit struct
//! with a fixed field set; there is no free-form attribute bag anywhere, so a
//! missing or mistyped required field is a compile error rather than a
//! silently wrong fabric object.
//!
//! The tree is built once, never mutated, and serialized to the APIC JSON
//! wire form by [`payload`].

pub mod payload;
pub mod tree;

pub use tree::{
    AppProfile, BaseEpg, ClassPreference, ConfigTree, ContractRef, ContractRole, IpAttribute,
    MatchCriterion, SecurityPolicy, Stance, Tenant, TierEpg, VmmBinding,
};
