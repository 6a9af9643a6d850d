//! Application-flow shapes fed into the tree builder.
//!
//! `TierMapping` is ordered: tier groups are created in the order the
//! analytics (or the static file) listed them, so rebuilding from identical
//! input yields an identical tree. `RelationshipGraph` keys contracts in a
//! `BTreeMap` for the same reason.

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// One application tier and the endpoints analytics observed in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierFlow {
    pub name: String,
    /// IP literals. Duplicates within a tier are harmless; overlap across
    /// tiers is allowed by design of the upstream analytics.
    pub endpoints: Vec<String>,
}

/// Ordered tier → endpoints mapping.
///
/// Wire/file form is a JSON object (`{"web": ["10.0.0.1", …], …}`); entry
/// order is preserved and duplicate tier names are rejected at decode time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TierMapping(Vec<TierFlow>);

impl TierMapping {
    pub fn new(tiers: Vec<TierFlow>) -> Self {
        Self(tiers)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TierFlow> {
        self.0.iter()
    }

    /// Total endpoint count across all tiers.
    pub fn endpoint_count(&self) -> usize {
        self.0.iter().map(|t| t.endpoints.len()).sum()
    }
}

impl FromIterator<(String, Vec<String>)> for TierMapping {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, endpoints)| TierFlow { name, endpoints })
                .collect(),
        )
    }
}

impl Serialize for TierMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for tier in &self.0 {
            map.serialize_entry(&tier.name, &tier.endpoints)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TierMapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MappingVisitor;

        impl<'de> Visitor<'de> for MappingVisitor {
            type Value = TierMapping;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of tier name to list of IP addresses")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut tiers: Vec<TierFlow> = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, endpoints)) = access.next_entry::<String, Vec<String>>()? {
                    if tiers.iter().any(|t| t.name == name) {
                        return Err(de::Error::custom(format!("duplicate tier name: {name}")));
                    }
                    tiers.push(TierFlow { name, endpoints });
                }
                Ok(TierMapping(tiers))
            }
        }

        deserializer.deserialize_map(MappingVisitor)
    }
}

/// Direction of a tier's relationship to a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Consume,
    Provide,
}

/// Tier → contract → directions.
///
/// A tier absent from the graph is simply isolated. A contract may carry both
/// directions for the same tier; the builder emits a consumer and a provider
/// reference in that case rather than second-guessing the analytics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationshipGraph(HashMap<String, BTreeMap<String, Vec<Direction>>>);

impl RelationshipGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one directional relationship, deduplicating directions.
    pub fn add(&mut self, tier: &str, contract: &str, direction: Direction) {
        let directions = self
            .0
            .entry(tier.to_string())
            .or_default()
            .entry(contract.to_string())
            .or_default();
        if !directions.contains(&direction) {
            directions.push(direction);
        }
    }

    /// Contracts for a tier, keyed in lexical order. `None` means the tier
    /// has no relationships at all.
    pub fn contracts_for(&self, tier: &str) -> Option<&BTreeMap<String, Vec<Direction>>> {
        self.0.get(tier)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_mapping_preserves_order() {
        let json = r#"{"web": ["10.0.0.1", "10.0.0.2"], "app": ["10.0.1.1"], "db": ["10.0.2.1"]}"#;
        let mapping: TierMapping = serde_json::from_str(json).unwrap();
        let names: Vec<_> = mapping.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["web", "app", "db"]);
        assert_eq!(mapping.endpoint_count(), 4);
    }

    #[test]
    fn test_tier_mapping_rejects_duplicates() {
        let json = r#"{"web": ["10.0.0.1"], "web": ["10.0.0.2"]}"#;
        assert!(serde_json::from_str::<TierMapping>(json).is_err());
    }

    #[test]
    fn test_relationship_graph_decode() {
        let json = r#"{"web": {"web2app": ["consume"]}, "app": {"web2app": ["provide", "consume"]}}"#;
        let graph: RelationshipGraph = serde_json::from_str(json).unwrap();

        let web = graph.contracts_for("web").unwrap();
        assert_eq!(web["web2app"], vec![Direction::Consume]);

        let app = graph.contracts_for("app").unwrap();
        assert_eq!(app["web2app"], vec![Direction::Provide, Direction::Consume]);

        assert!(graph.contracts_for("db").is_none());
    }

    #[test]
    fn test_relationship_graph_add_dedups() {
        let mut graph = RelationshipGraph::new();
        graph.add("web", "c1", Direction::Consume);
        graph.add("web", "c1", Direction::Consume);
        graph.add("web", "c1", Direction::Provide);
        assert_eq!(
            graph.contracts_for("web").unwrap()["c1"],
            vec![Direction::Consume, Direction::Provide]
        );
    }
}
