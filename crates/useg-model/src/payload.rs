//! APIC JSON wire form.
//!
//! The controller expects each managed object as
//! `{"<class>": {"attributes": {…}, "children": […]}}`. Tree nodes map onto
//! the fv/vmm classes: fvTenant, fvAp, fvAEPg, fvRsDomAtt, vmmSecP, fvRsBd,
//! fvRsCustQosPol, fvCrtrn, fvIpAttr, fvRsCons, fvRsProv.

use crate::tree::{
    AppProfile, BaseEpg, ConfigTree, ContractRef, ContractRole, MatchCriterion, TierEpg,
    VmmBinding,
};
use serde_json::{json, Value};

impl ConfigTree {
    /// Serialize the tree into the single-request body posted to the
    /// controller's `uni` root.
    pub fn to_payload(&self) -> Value {
        json!({
            "fvTenant": {
                "attributes": { "name": self.tenant.name },
                "children": [ profile(&self.tenant.profile) ],
            }
        })
    }
}

fn profile(ap: &AppProfile) -> Value {
    let mut children = vec![base_epg(&ap.base)];
    children.extend(ap.tiers.iter().map(tier_epg));

    json!({
        "fvAp": {
            "attributes": {
                "name": ap.name,
                "descr": ap.descr,
            },
            "children": children,
        }
    })
}

fn base_epg(epg: &BaseEpg) -> Value {
    let mut children = Vec::new();
    if let Some(vmm) = &epg.vmm {
        children.push(vmm_binding(vmm));
    }
    children.push(bridge_domain(&epg.bridge_domain));

    json!({
        "fvAEPg": {
            "attributes": {
                "name": epg.name,
                "descr": epg.descr,
                "pcEnfPref": "unenforced",
                "prefGrMemb": "exclude",
                "shutdown": "no",
            },
            "children": children,
        }
    })
}

fn tier_epg(epg: &TierEpg) -> Value {
    let mut children = Vec::new();
    if let Some(vmm) = &epg.vmm {
        children.push(vmm_binding(vmm));
    }
    children.push(qos_placeholder());
    children.push(bridge_domain(&epg.bridge_domain));
    children.push(criterion(&epg.criterion));
    children.extend(epg.contracts.iter().map(contract_ref));

    json!({
        "fvAEPg": {
            "attributes": {
                "name": epg.name,
                "descr": epg.descr,
                "isAttrBasedEPg": "yes",
                "matchT": "AtleastOne",
                "pcEnfPref": "unenforced",
                "prefGrMemb": "exclude",
                "floodOnEncap": "disabled",
                "hasMcastSource": "no",
                "prio": "unspecified",
                "shutdown": "no",
            },
            "children": children,
        }
    })
}

fn vmm_binding(vmm: &VmmBinding) -> Value {
    let attrs = json!({
        "tDn": vmm.domain_dn,
        "classPref": vmm.class_pref.as_str(),
        "bindingType": "none",
        "encap": "unknown",
        "encapMode": "auto",
        "instrImedcy": "immediate",
        "resImedcy": "immediate",
        "netflowPref": "disabled",
    });

    let children: Vec<Value> = match &vmm.security {
        Some(sec) => vec![json!({
            "vmmSecP": {
                "attributes": {
                    "allowPromiscuous": sec.allow_promiscuous.as_str(),
                    "forgedTransmits": sec.forged_transmits.as_str(),
                    "macChanges": sec.mac_changes.as_str(),
                }
            }
        })],
        None => vec![],
    };

    json!({
        "fvRsDomAtt": {
            "attributes": attrs,
            "children": children,
        }
    })
}

fn bridge_domain(bd: &str) -> Value {
    json!({
        "fvRsBd": {
            "attributes": { "tnFvBDName": bd }
        }
    })
}

fn qos_placeholder() -> Value {
    // Reserved for future QoS tuning; always present, always unset.
    json!({
        "fvRsCustQosPol": {
            "attributes": { "tnQosCustomPolName": "" }
        }
    })
}

fn criterion(crtrn: &MatchCriterion) -> Value {
    let attrs: Vec<Value> = crtrn
        .ip_attributes
        .iter()
        .map(|attr| {
            json!({
                "fvIpAttr": {
                    "attributes": {
                        "name": attr.name,
                        "ip": attr.ip,
                        "usefvSubnet": "no",
                    }
                }
            })
        })
        .collect();

    json!({
        "fvCrtrn": {
            "attributes": {
                "name": crtrn.name,
                "match": "any",
                "prec": "0",
            },
            "children": attrs,
        }
    })
}

fn contract_ref(ctr: &ContractRef) -> Value {
    match ctr.role {
        ContractRole::Consumer => json!({
            "fvRsCons": {
                "attributes": {
                    "tnVzBrCPName": ctr.contract,
                    "intent": "install",
                    "prio": "unspecified",
                }
            }
        }),
        ContractRole::Provider => json!({
            "fvRsProv": {
                "attributes": {
                    "tnVzBrCPName": ctr.contract,
                    "intent": "install",
                    "matchT": "AtleastOne",
                    "prio": "unspecified",
                }
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::*;

    fn sample_tree(vmm: bool) -> ConfigTree {
        let domain = "uni/vmmp-VMware/dom-DVS1";
        ConfigTree {
            tenant: Tenant {
                name: "T1".to_string(),
                profile: AppProfile {
                    name: "P1".to_string(),
                    descr: "segmented".to_string(),
                    base: BaseEpg {
                        name: "Base".to_string(),
                        descr: "base".to_string(),
                        bridge_domain: "BD1".to_string(),
                        vmm: vmm.then(|| VmmBinding::for_base(domain)),
                    },
                    tiers: vec![TierEpg {
                        name: "web".to_string(),
                        descr: "tier".to_string(),
                        bridge_domain: "BD1".to_string(),
                        vmm: vmm.then(|| VmmBinding::for_tier(domain)),
                        criterion: MatchCriterion::over_endpoints(["10.0.0.1", "10.0.0.2"]),
                        contracts: vec![ContractRef {
                            contract: "ctr1".to_string(),
                            role: ContractRole::Provider,
                        }],
                    }],
                },
            },
        }
    }

    fn collect_classes(value: &serde_json::Value, out: &mut Vec<String>) {
        match value {
            serde_json::Value::Object(obj) => {
                for (key, inner) in obj {
                    if inner.is_object() && inner.get("attributes").is_some() {
                        out.push(key.clone());
                    }
                    collect_classes(inner, out);
                }
            }
            serde_json::Value::Array(arr) => {
                for item in arr {
                    collect_classes(item, out);
                }
            }
            _ => {}
        }
    }

    #[test]
    fn test_payload_nesting() {
        let payload = sample_tree(false).to_payload();
        let tenant = &payload["fvTenant"];
        assert_eq!(tenant["attributes"]["name"], "T1");

        let ap = &tenant["children"][0]["fvAp"];
        assert_eq!(ap["attributes"]["name"], "P1");

        // Base EPG first, then tiers.
        let base = &ap["children"][0]["fvAEPg"];
        assert_eq!(base["attributes"]["name"], "Base");
        assert_eq!(base["attributes"]["pcEnfPref"], "unenforced");
        assert_eq!(base["attributes"]["prefGrMemb"], "exclude");
        assert!(base["attributes"].get("isAttrBasedEPg").is_none());

        let web = &ap["children"][1]["fvAEPg"];
        assert_eq!(web["attributes"]["isAttrBasedEPg"], "yes");
        assert_eq!(web["attributes"]["matchT"], "AtleastOne");
    }

    #[test]
    fn test_tier_children_shape() {
        let payload = sample_tree(true).to_payload();
        let web = &payload["fvTenant"]["children"][0]["fvAp"]["children"][1]["fvAEPg"];
        let children = web["children"].as_array().unwrap();

        // binding, qos placeholder, bd, criterion, one provider ref
        assert_eq!(children.len(), 5);
        assert_eq!(
            children[0]["fvRsDomAtt"]["attributes"]["classPref"],
            "encap"
        );
        assert_eq!(
            children[1]["fvRsCustQosPol"]["attributes"]["tnQosCustomPolName"],
            ""
        );
        assert_eq!(children[2]["fvRsBd"]["attributes"]["tnFvBDName"], "BD1");

        let crtrn = &children[3]["fvCrtrn"];
        assert_eq!(crtrn["attributes"]["match"], "any");
        let ips = crtrn["children"].as_array().unwrap();
        assert_eq!(ips[0]["fvIpAttr"]["attributes"]["name"], "0");
        assert_eq!(ips[1]["fvIpAttr"]["attributes"]["name"], "1");
        assert_eq!(ips[1]["fvIpAttr"]["attributes"]["usefvSubnet"], "no");

        let prov = &children[4]["fvRsProv"]["attributes"];
        assert_eq!(prov["tnVzBrCPName"], "ctr1");
        assert_eq!(prov["matchT"], "AtleastOne");
    }

    #[test]
    fn test_base_binding_carries_hardened_security() {
        let payload = sample_tree(true).to_payload();
        let base = &payload["fvTenant"]["children"][0]["fvAp"]["children"][0]["fvAEPg"];
        let binding = &base["children"][0]["fvRsDomAtt"];
        assert_eq!(binding["attributes"]["classPref"], "useg");

        let sec = &binding["children"][0]["vmmSecP"]["attributes"];
        assert_eq!(sec["allowPromiscuous"], "reject");
        assert_eq!(sec["forgedTransmits"], "reject");
        assert_eq!(sec["macChanges"], "reject");
    }

    #[test]
    fn test_no_vmm_binding_anywhere_when_absent() {
        let payload = sample_tree(false).to_payload();
        let mut classes = Vec::new();
        collect_classes(&payload, &mut classes);
        assert!(!classes.iter().any(|c| c == "fvRsDomAtt"));
        assert!(!classes.iter().any(|c| c == "vmmSecP"));
    }
}
