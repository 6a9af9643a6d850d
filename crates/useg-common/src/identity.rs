//! The identity tuple addressing a base EPG.

use serde::{Deserialize, Serialize};

/// Names the base EPG to micro-segment plus the monitored application that
/// drives the segmentation.
///
/// All four fields are opaque names; uniqueness is the fabric's business, not
/// ours. An empty application name means "use the static pre-configured flow
/// data" rather than live analytics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpgIdentity {
    pub tenant: String,
    pub app_profile: String,
    pub epg: String,
    /// Monitored application driving tier/relationship data; `None` selects
    /// the static fallback files.
    pub application: Option<String>,
}

impl EpgIdentity {
    /// Build an identity tuple. An empty `application` string is normalized
    /// to `None`.
    pub fn new(
        tenant: impl Into<String>,
        app_profile: impl Into<String>,
        epg: impl Into<String>,
        application: impl Into<String>,
    ) -> Self {
        let application = application.into();
        Self {
            tenant: tenant.into(),
            app_profile: app_profile.into(),
            epg: epg.into(),
            application: (!application.is_empty()).then_some(application),
        }
    }

    /// Distinguished name of the base EPG on the fabric.
    pub fn epg_dn(&self) -> String {
        format!(
            "uni/tn-{}/ap-{}/epg-{}",
            self.tenant, self.app_profile, self.epg
        )
    }

    /// Distinguished name of the owning application profile.
    pub fn profile_dn(&self) -> String {
        format!("uni/tn-{}/ap-{}", self.tenant, self.app_profile)
    }
}
