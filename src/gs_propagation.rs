//! Epidemic state propagation over a fixed topology
//!
//! One call runs `num_exchanges` sweeps. In every sweep each node, in list
//! order, contacts one random neighbor and, if the mixing gate lets the
//! exchange through, applies the gossip rule of the selected [`Protocol`].
//! Writes made earlier in a sweep are visible to later nodes of the same
//! sweep.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::gs_interface::{
    check_unit_interval, GossipResult, InformedStateMap, NeighborMap, Node, Protocol,
};

/// Parameters for a propagation step
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct PropagationConfig {
    /// Gossip discipline (default: push)
    pub protocol: Protocol,

    /// Probability that an attempted exchange takes effect (default: 0.3)
    pub mix_ratio: f64,

    /// Full sweeps over all nodes per step (default: 3)
    pub num_exchanges: usize,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            protocol: Protocol::Push,
            mix_ratio: 0.3,
            num_exchanges: 3,
        }
    }
}

impl PropagationConfig {
    pub fn validate(&self) -> GossipResult<()> {
        check_unit_interval("mix_ratio", self.mix_ratio)
    }
}

/// Advance the informed states by one step and return the new map.
///
/// Nodes without neighbors are skipped. Missing state entries read as
/// uninformed. The input map is left untouched.
pub fn propagation_step<R: Rng + ?Sized>(
    nodes: &[Node],
    neighbors: &NeighborMap,
    current: &InformedStateMap,
    config: &PropagationConfig,
    rng: &mut R,
) -> GossipResult<InformedStateMap> {
    config.validate()?;

    let mut states = current.clone();
    let mut newly_informed = 0usize;

    for _ in 0..config.num_exchanges {
        for node in nodes {
            let neighbor = match neighbors.get(&node.id).and_then(|n| n.choose(rng)) {
                Some(neighbor) => neighbor,
                None => continue,
            };

            let node_informed = states.get(&node.id).copied().unwrap_or(false);
            let neighbor_informed = states.get(neighbor).copied().unwrap_or(false);

            if rng.gen::<f64>() >= config.mix_ratio {
                continue;
            }

            match config.protocol {
                Protocol::Push => {
                    if node_informed {
                        newly_informed += inform(&mut states, neighbor);
                    }
                }
                Protocol::Pull => {
                    if neighbor_informed {
                        newly_informed += inform(&mut states, &node.id);
                    }
                }
                Protocol::PushPull => {
                    if node_informed || neighbor_informed {
                        newly_informed += inform(&mut states, &node.id);
                        newly_informed += inform(&mut states, neighbor);
                    }
                }
            }
        }
    }

    log::trace!(
        "{} step: {} sweeps, {} newly informed",
        config.protocol,
        config.num_exchanges,
        newly_informed
    );

    Ok(states)
}

// mark informed, returns 1 if the flag changed
fn inform(states: &mut InformedStateMap, id: &str) -> usize {
    match states.get_mut(id) {
        Some(flag) if *flag => 0,
        Some(flag) => {
            *flag = true;
            1
        }
        None => {
            states.insert(id.to_string(), true);
            1
        }
    }
}
