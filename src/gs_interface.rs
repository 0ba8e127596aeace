use std::fmt;
use std::str::FromStr;

use hashbrown::HashMap;
use indexmap::IndexMap;

// all node identities are opaque strings, unique within a run
pub type NodeId = String;

/// Current informed flag per node, in node creation order
pub type InformedStateMap = IndexMap<NodeId, bool>;

/// Neighbor ids per node, derived from the (undirected) links of a graph
pub type NeighborMap = HashMap<NodeId, Vec<NodeId>>;

/// Placeholder weight carried on every generated link
pub const LINK_VALUE: f64 = 1.0;

/// Default bound on the number of entries in a partial view
pub const DEFAULT_VIEW_SIZE: usize = 30;

pub type GossipResult<T> = Result<T, GossipError>;

/// Errors raised when a caller violates a configuration contract
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GossipError {
    /// A parameter is outside its legal domain; nothing was computed
    #[error("invalid configuration: {parameter} {reason}")]
    InvalidConfiguration {
        parameter: &'static str,
        reason: String,
    },
}

impl GossipError {
    pub fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        GossipError::InvalidConfiguration {
            parameter,
            reason: reason.into(),
        }
    }
}

/// Checks that a probability-like parameter lies in [0, 1] (NaN rejected)
pub fn check_unit_interval(parameter: &'static str, value: f64) -> GossipResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(GossipError::invalid(
            parameter,
            format!("must be within [0, 1], got {}", value),
        ))
    }
}

// ============================================================================
// Graph
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub informed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub source: NodeId,
    pub target: NodeId,
    pub value: f64,
}

/// Weighted candidate edge, only used while building a spanning tree
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: f64,
}

/// A connected topology: nodes in creation order, links with the spanning
/// tree first followed by any extra edges in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphData {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

impl GraphData {
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    /// Build the undirected neighbor lists. Every node gets an entry, even
    /// when it has no links.
    pub fn neighbor_map(&self) -> NeighborMap {
        let mut neighbors: NeighborMap = self
            .nodes
            .iter()
            .map(|n| (n.id.clone(), Vec::new()))
            .collect();

        for link in &self.links {
            neighbors
                .entry(link.source.clone())
                .or_default()
                .push(link.target.clone());
            neighbors
                .entry(link.target.clone())
                .or_default()
                .push(link.source.clone());
        }

        neighbors
    }

    /// Seed a state map from the static flags on the nodes
    pub fn initial_states(&self) -> InformedStateMap {
        self.nodes
            .iter()
            .map(|n| (n.id.clone(), n.informed))
            .collect()
    }
}

// ============================================================================
// Gossip protocol
// ============================================================================

/// Gossip discipline applied on each successful exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Informed initiator informs the chosen neighbor
    #[default]
    Push,
    /// Initiator becomes informed if the chosen neighbor is
    Pull,
    /// If either side is informed, both end up informed
    #[serde(rename = "pushpull")]
    PushPull,
}

impl Protocol {
    pub const ALL: [Protocol; 3] = [Protocol::Push, Protocol::Pull, Protocol::PushPull];

    pub fn tag(&self) -> &'static str {
        match self {
            Protocol::Push => "push",
            Protocol::Pull => "pull",
            Protocol::PushPull => "pushpull",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.tag())
    }
}

impl FromStr for Protocol {
    type Err = GossipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "push" => Ok(Protocol::Push),
            "pull" => Ok(Protocol::Pull),
            "pushpull" => Ok(Protocol::PushPull),
            other => Err(GossipError::invalid(
                "protocol",
                format!("'{}' is not one of push, pull, pushpull", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_with_isolated() -> GraphData {
        GraphData {
            nodes: ["A", "B", "C", "D"]
                .iter()
                .map(|id| Node {
                    id: id.to_string(),
                    informed: *id == "A",
                })
                .collect(),
            links: vec![
                Link { source: "A".into(), target: "B".into(), value: LINK_VALUE },
                Link { source: "B".into(), target: "C".into(), value: LINK_VALUE },
                Link { source: "C".into(), target: "A".into(), value: LINK_VALUE },
            ],
        }
    }

    #[test]
    fn test_protocol_tags() {
        for protocol in Protocol::ALL {
            assert_eq!(protocol.tag().parse::<Protocol>(), Ok(protocol));
            assert_eq!(protocol.to_string(), protocol.tag());
        }
    }

    #[test]
    fn test_unknown_protocol_rejected() {
        let result = "flood".parse::<Protocol>();
        assert!(matches!(
            result,
            Err(GossipError::InvalidConfiguration { parameter: "protocol", .. })
        ));
    }

    #[test]
    fn test_protocol_from_yaml() {
        let protocol: Protocol = serde_yaml::from_str("pushpull").unwrap();
        assert_eq!(protocol, Protocol::PushPull);
        assert!(serde_yaml::from_str::<Protocol>("gossip").is_err());
    }

    #[test]
    fn test_unit_interval_check() {
        assert!(check_unit_interval("mix_ratio", 0.0).is_ok());
        assert!(check_unit_interval("mix_ratio", 1.0).is_ok());
        assert!(check_unit_interval("mix_ratio", -0.01).is_err());
        assert!(check_unit_interval("mix_ratio", 1.5).is_err());
        assert!(check_unit_interval("mix_ratio", f64::NAN).is_err());
    }

    #[test]
    fn test_neighbor_map_is_undirected() {
        let graph = triangle_with_isolated();
        let neighbors = graph.neighbor_map();

        assert_eq!(neighbors.len(), 4);
        assert_eq!(neighbors["A"], vec!["B".to_string(), "C".to_string()]);
        assert_eq!(neighbors["B"], vec!["A".to_string(), "C".to_string()]);
        assert_eq!(neighbors["C"], vec!["B".to_string(), "A".to_string()]);
        assert!(neighbors["D"].is_empty(), "Isolated node keeps an empty entry");
    }

    #[test]
    fn test_initial_states_follow_node_order() {
        let graph = triangle_with_isolated();
        let states = graph.initial_states();

        let ids: Vec<&str> = states.keys().map(|k| k.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C", "D"]);
        assert_eq!(states["A"], true);
        assert_eq!(states["D"], false);
    }
}
