//! Configuration for the epidemic simulator

use gossip_rust::gs_interface::{check_unit_interval, GossipError, GossipResult};
use gossip_rust::{PeerSamplingConfig, PropagationConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Configuration for an epidemic simulation
#[derive(Debug, Clone)]
pub struct EpidemicSimConfig {
    /// Maximum number of propagation steps
    pub rounds: usize,

    /// Number of nodes in the generated graph
    pub node_count: usize,

    /// Share of the non-tree pairs that get an extra edge (0.0 - 1.0)
    pub density: f64,

    /// Random seed (None = generate random)
    pub seed: Option<[u8; 32]>,

    /// Protocol, mix ratio and sweeps per step
    pub propagation: PropagationConfig,

    /// Peer sampling overlay run next to the graph (None = disabled)
    pub overlay: Option<PeerSamplingConfig>,

    /// End the run early once every node is informed
    pub stop_at_full_coverage: bool,
}

impl Default for EpidemicSimConfig {
    fn default() -> Self {
        Self {
            rounds: 100,
            node_count: 10,
            density: 0.0,
            seed: None,
            propagation: PropagationConfig::default(),
            overlay: None,
            stop_at_full_coverage: true,
        }
    }
}

impl EpidemicSimConfig {
    /// Get or generate seed
    pub fn resolve_seed(&self) -> [u8; 32] {
        self.seed.unwrap_or_else(|| {
            let mut temp_rng = StdRng::from_entropy();
            let mut seed = [0u8; 32];
            use rand::RngCore;
            temp_rng.fill_bytes(&mut seed);
            seed
        })
    }

    /// Reject configurations the library would refuse mid-run
    pub fn validate(&self) -> GossipResult<()> {
        if self.node_count == 0 {
            return Err(GossipError::invalid("node_count", "must be greater than zero"));
        }
        if self.rounds == 0 {
            return Err(GossipError::invalid("rounds", "must be greater than zero"));
        }
        check_unit_interval("density", self.density)?;
        if let Some(ref overlay) = self.overlay {
            if overlay.max_size == 0 {
                return Err(GossipError::invalid("max_size", "must be greater than zero"));
            }
        }
        self.propagation.validate()
    }
}
