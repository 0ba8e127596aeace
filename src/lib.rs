//! # gossipRust - Epidemic Gossip Spread
//!
//! A Rust implementation of epidemic (gossip) information dissemination over
//! in-memory peer graphs. Nodes start uninformed except for one; every round
//! they contact random neighbors using push, pull or push-pull gossip until the
//! "informed" flag has spread across the network.
//!
//! ## Core Components
//!
//! - **Graph generation**: random spanning tree (Kruskal over random weights)
//!   plus extra random edges up to a target density
//! - **Propagation step**: advances informed states over a fixed topology
//! - **PeerSamplingService**: bounded, aging partial view per node, merged on
//!   pairwise exchange
//! - **Metrics**: informed percentage and per-round propagation series
//!
//! ## Usage
//!
//! Every stochastic operation takes the random source as a parameter, so a
//! seeded `StdRng` replays a run exactly.
//!
//! ```no_run
//! use gossip_rust::{generate_initial_graph, propagation_step, PropagationConfig, Protocol};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut rng = StdRng::from_seed([7u8; 32]);
//! let graph = generate_initial_graph(10, 0.2, &mut rng)?;
//! let neighbors = graph.neighbor_map();
//! let config = PropagationConfig { protocol: Protocol::PushPull, ..Default::default() };
//!
//! let mut states = graph.initial_states();
//! for _ in 0..20 {
//!     states = propagation_step(&graph.nodes, &neighbors, &states, &config, &mut rng)?;
//! }
//! # Ok::<(), gossip_rust::GossipError>(())
//! ```
//!
//! ## Testing and Simulation
//!
//! For repeated runs with configuration files, see the `simulator/` directory.
//! It drives rounds of the propagation step (optionally alongside a peer
//! sampling overlay) and reports coverage over time.

// Core modules
pub mod gs_interface;
pub mod gs_disjoint_set;
pub mod gs_mst;
pub mod gs_graph;
pub mod gs_propagation;
pub mod gs_peer_sampling;
pub mod gs_metrics;

// Re-export commonly used types
pub use gs_interface::{
    Edge, GossipError, GossipResult, GraphData, InformedStateMap, Link, NeighborMap, Node,
    NodeId, Protocol,
};
pub use gs_graph::{generate_initial_graph, node_id_for_index};
pub use gs_metrics::{informed_count, informed_percentage, PropagationSeries};
pub use gs_mst::generate_mst;
pub use gs_peer_sampling::{
    PartialView, PeerNode, PeerSamplingConfig, PeerSamplingService, SelfAddressing,
};
pub use gs_propagation::{propagation_step, PropagationConfig};
