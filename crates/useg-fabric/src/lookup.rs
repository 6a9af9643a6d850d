//! Read-only fabric resolution.
//!
//! Resolves the identity tuple before anything is built: existence of the
//! base EPG, its bridge-domain binding (required) and its VMM domain binding
//! (optional; on-prem-only EPGs legitimately have none). Also carries the
//! name-list queries scripted callers use to discover tenants, profiles and
//! EPGs.

use crate::session::ApicSession;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use useg_common::{EpgIdentity, Result, UsegError};

/// Read-only resolution the segmentation flow needs from the fabric.
#[async_trait]
pub trait FabricLookup: Send + Sync {
    /// Whether the addressed base EPG exists at all.
    async fn exists(&self, identity: &EpgIdentity) -> Result<bool>;

    /// Bridge-domain name bound to the base EPG. A group with no bridge
    /// domain cannot be segmented, so absence is a resolution failure.
    async fn bridge_domain_of(&self, identity: &EpgIdentity) -> Result<String>;

    /// Target DN of the base EPG's VMM domain binding, if any.
    async fn vmm_domain_of(&self, identity: &EpgIdentity) -> Result<Option<String>>;
}

/// APIC-backed lookup.
pub struct ApicLookup {
    session: Arc<ApicSession>,
}

impl ApicLookup {
    pub fn new(session: Arc<ApicSession>) -> Self {
        Self { session }
    }

    async fn epg_children(&self, identity: &EpgIdentity, class: &str) -> Result<Vec<Value>> {
        let path = format!(
            "/api/mo/{}.json?query-target=children&target-subtree-class={class}",
            identity.epg_dn()
        );
        let value = self.session.get_json(&path).await?;
        Ok(imdata(&value))
    }

    /// All tenant names on the fabric.
    pub async fn tenants(&self) -> Result<Vec<String>> {
        let value = self.session.get_json("/api/class/fvTenant.json").await?;
        Ok(names_of(&imdata(&value), "fvTenant"))
    }

    /// Application profile names under a tenant.
    pub async fn app_profiles(&self, tenant: &str) -> Result<Vec<String>> {
        let path = format!(
            "/api/mo/uni/tn-{tenant}.json?query-target=children&target-subtree-class=fvAp"
        );
        let value = self.session.get_json(&path).await?;
        Ok(names_of(&imdata(&value), "fvAp"))
    }

    /// EPG names under a tenant's application profile.
    pub async fn epgs(&self, tenant: &str, profile: &str) -> Result<Vec<String>> {
        let path = format!(
            "/api/mo/uni/tn-{tenant}/ap-{profile}.json?query-target=children&target-subtree-class=fvAEPg"
        );
        let value = self.session.get_json(&path).await?;
        Ok(names_of(&imdata(&value), "fvAEPg"))
    }
}

#[async_trait]
impl FabricLookup for ApicLookup {
    async fn exists(&self, identity: &EpgIdentity) -> Result<bool> {
        let path = format!("/api/mo/{}.json", identity.epg_dn());
        let value = self.session.get_json(&path).await?;
        let found = !imdata(&value).is_empty();
        debug!(dn = %identity.epg_dn(), found, "existence check");
        Ok(found)
    }

    async fn bridge_domain_of(&self, identity: &EpgIdentity) -> Result<String> {
        let children = self.epg_children(identity, "fvRsBd").await?;
        children
            .first()
            .and_then(|mo| attribute(mo, "fvRsBd", "tnFvBDName"))
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                UsegError::Resolution(format!(
                    "EPG {} has no bridge-domain binding",
                    identity.epg_dn()
                ))
            })
    }

    async fn vmm_domain_of(&self, identity: &EpgIdentity) -> Result<Option<String>> {
        let children = self.epg_children(identity, "fvRsDomAtt").await?;
        Ok(children
            .first()
            .and_then(|mo| attribute(mo, "fvRsDomAtt", "tDn"))
            .filter(|dn| !dn.is_empty()))
    }
}

/// The `imdata` object list of an APIC query response.
fn imdata(value: &Value) -> Vec<Value> {
    value["imdata"].as_array().cloned().unwrap_or_default()
}

/// One attribute of a managed object returned by a query.
fn attribute(mo: &Value, class: &str, attr: &str) -> Option<String> {
    mo[class]["attributes"][attr].as_str().map(str::to_string)
}

fn names_of(mos: &[Value], class: &str) -> Vec<String> {
    mos.iter()
        .filter_map(|mo| attribute(mo, class, "name"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_imdata_extraction() {
        let value = json!({
            "totalCount": "1",
            "imdata": [
                { "fvRsBd": { "attributes": { "tnFvBDName": "BD1" } } }
            ]
        });
        let mos = imdata(&value);
        assert_eq!(mos.len(), 1);
        assert_eq!(
            attribute(&mos[0], "fvRsBd", "tnFvBDName").as_deref(),
            Some("BD1")
        );
    }

    #[test]
    fn test_imdata_missing_is_empty() {
        assert!(imdata(&json!({"totalCount": "0"})).is_empty());
    }

    #[test]
    fn test_names_of() {
        let mos = vec![
            json!({ "fvTenant": { "attributes": { "name": "T1" } } }),
            json!({ "fvTenant": { "attributes": { "name": "T2" } } }),
        ];
        assert_eq!(names_of(&mos, "fvTenant"), vec!["T1", "T2"]);
    }
}
