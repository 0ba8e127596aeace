//! Epidemic simulation runner

use super::config::EpidemicSimConfig;
use super::stats::{OverlayStats, SimResult};
use gossip_rust::gs_interface::GossipResult;
use gossip_rust::{
    generate_initial_graph, propagation_step, GraphData, InformedStateMap, NeighborMap,
    PeerSamplingConfig, PeerSamplingService, PropagationSeries,
};
use hashbrown::HashMap;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Peer sampling services, one per graph node
struct Overlay {
    services: Vec<PeerSamplingService>,
    index: HashMap<String, usize>,
    // informed flag per node, spread only over overlay exchanges
    states: InformedStateMap,
    coverage: PropagationSeries,
    self_entry_coverage: PropagationSeries,
    exchanges: usize,
    fallback_exchanges: usize,
}

/// Epidemic simulation runner
pub struct EpidemicRunner {
    config: EpidemicSimConfig,
    rng: StdRng,
    seed: [u8; 32],

    graph: GraphData,
    neighbors: NeighborMap,
    states: InformedStateMap,

    overlay: Option<Overlay>,

    // Metrics
    current_round: usize,
    coverage: PropagationSeries,
}

impl EpidemicRunner {
    /// Create a runner and generate its graph
    pub fn new(config: EpidemicSimConfig) -> GossipResult<Self> {
        config.validate()?;

        let seed = config.resolve_seed();
        let mut rng = StdRng::from_seed(seed);

        let graph = generate_initial_graph(config.node_count, config.density, &mut rng)?;
        let neighbors = graph.neighbor_map();
        let states = graph.initial_states();

        let overlay = match config.overlay {
            Some(ref view_config) => Some(Self::build_overlay(&graph, view_config)?),
            None => None,
        };

        Ok(Self {
            config,
            rng,
            seed,
            graph,
            neighbors,
            states,
            overlay,
            current_round: 0,
            coverage: PropagationSeries::new(),
        })
    }

    fn build_overlay(graph: &GraphData, view_config: &PeerSamplingConfig) -> GossipResult<Overlay> {
        let mut services = Vec::with_capacity(graph.nodes.len());
        let mut index = HashMap::new();

        for (i, node) in graph.nodes.iter().enumerate() {
            services.push(PeerSamplingService::with_config(
                node.id.clone(),
                node.informed,
                view_config.clone(),
            )?);
            index.insert(node.id.clone(), i);
        }

        Ok(Overlay {
            services,
            index,
            states: graph.initial_states(),
            coverage: PropagationSeries::new(),
            self_entry_coverage: PropagationSeries::new(),
            exchanges: 0,
            fallback_exchanges: 0,
        })
    }

    /// Main simulation loop
    pub fn run(mut self) -> GossipResult<SimResult> {
        info!(
            "Starting epidemic simulation: {} nodes, {} links, {}",
            self.graph.nodes.len(),
            self.graph.links.len(),
            self.config.propagation.protocol
        );

        self.collect_metrics();

        for round in 0..self.config.rounds {
            self.current_round = round + 1;

            // 1. Propagate over the fixed graph
            self.step_graph()?;

            // 2. Gossip over the overlay
            self.step_overlay();

            // 3. Collect metrics
            let informed = self.collect_metrics();

            if round % 10 == 0 {
                debug!("Round {}/{}: {:.1}% informed", round, self.config.rounds, informed);
            }

            if self.config.stop_at_full_coverage && informed >= 100.0 {
                info!("Full coverage after {} rounds", self.current_round);
                break;
            }
        }

        Ok(self.build_result())
    }

    fn step_graph(&mut self) -> GossipResult<()> {
        self.states = propagation_step(
            &self.graph.nodes,
            &self.neighbors,
            &self.states,
            &self.config.propagation,
            &mut self.rng,
        )?;
        Ok(())
    }

    /// One overlay round: every service picks a partner from its view, both
    /// merge the other's view and an informed side informs the other.
    ///
    /// A service whose draw yields no other known service exchanges with a
    /// random graph neighbor instead. Without that the overlay could never
    /// grow beyond the groups formed by the first round's exchanges.
    fn step_overlay(&mut self) {
        let overlay = match self.overlay {
            Some(ref mut overlay) => overlay,
            None => return,
        };

        for i in 0..overlay.services.len() {
            let own_id = overlay.services[i].local_id().clone();

            let selected = overlay.services[i]
                .select_peer(&mut self.rng)
                .filter(|peer| peer.id != own_id)
                .and_then(|peer| overlay.index.get(&peer.id).copied());

            let partner = match selected {
                Some(j) => Some(j),
                None => {
                    let neighbor = self
                        .neighbors
                        .get(&own_id)
                        .and_then(|n| n.choose(&mut self.rng));
                    let found = neighbor.and_then(|id| overlay.index.get(id).copied());
                    if found.is_some() {
                        overlay.fallback_exchanges += 1;
                    }
                    found
                }
            };

            let j = match partner {
                Some(j) if j != i => j,
                _ => continue,
            };

            let view_i = overlay.services[i].partial_view().clone();
            let view_j = overlay.services[j].partial_view().clone();
            overlay.services[i].exchange_views(&view_j);
            overlay.services[j].exchange_views(&view_i);
            overlay.exchanges += 1;

            let partner_id = overlay.services[j].local_id().clone();
            let informed_i = overlay.states.get(&own_id).copied().unwrap_or(false);
            let informed_j = overlay.states.get(&partner_id).copied().unwrap_or(false);
            if informed_i || informed_j {
                overlay.states.insert(own_id, true);
                overlay.states.insert(partner_id, true);
                overlay.services[i].update_informed(true);
                overlay.services[j].update_informed(true);
            }
        }
    }

    fn collect_metrics(&mut self) -> f64 {
        if let Some(ref mut overlay) = self.overlay {
            overlay.coverage.record(&self.graph, &overlay.states);

            let reported: InformedStateMap = overlay
                .services
                .iter()
                .map(|s| (s.local_id().clone(), s.is_informed()))
                .collect();
            overlay.self_entry_coverage.record(&self.graph, &reported);
        }

        self.coverage.record(&self.graph, &self.states)
    }

    fn build_result(self) -> SimResult {
        let overlay = self.overlay.map(|overlay| {
            let sizes: Vec<usize> = overlay
                .services
                .iter()
                .map(|s| s.partial_view().len())
                .collect();
            let min = sizes.iter().copied().min().unwrap_or(0);
            let max = sizes.iter().copied().max().unwrap_or(0);
            let avg = if sizes.is_empty() {
                0.0
            } else {
                sizes.iter().sum::<usize>() as f64 / sizes.len() as f64
            };
            let self_evicted = overlay
                .services
                .iter()
                .filter(|s| !s.partial_view().contains(s.local_id()))
                .count();

            OverlayStats {
                exchanges: overlay.exchanges,
                fallback_exchanges: overlay.fallback_exchanges,
                view_size: (min, max, avg),
                self_evicted,
                coverage: overlay.coverage,
                self_entry_coverage: overlay.self_entry_coverage,
            }
        });

        SimResult {
            seed_used: self.seed,
            rounds_completed: self.current_round,
            protocol: self.config.propagation.protocol,
            node_count: self.graph.nodes.len(),
            link_count: self.graph.links.len(),
            coverage: self.coverage,
            overlay,
        }
    }
}
