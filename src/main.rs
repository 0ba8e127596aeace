use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use simple_logger::SimpleLogger;

use gossip_rust::{
    generate_initial_graph, propagation_step, GossipResult, PropagationConfig, PropagationSeries,
    Protocol,
};

fn main() -> GossipResult<()> {
    SimpleLogger::new().init().unwrap();

    info!("starting");

    let rounds = 100;
    let node_count = 200;
    let density = 0.02;
    let mut seed = [0u8; 32];
    rand::thread_rng().fill(&mut seed);

    let mut rng = StdRng::from_seed(seed);

    let graph = generate_initial_graph(node_count, density, &mut rng)?;
    let neighbors = graph.neighbor_map();
    info!("graph: {} nodes, {} links", graph.nodes.len(), graph.links.len());

    for protocol in Protocol::ALL {
        let config = PropagationConfig {
            protocol,
            ..Default::default()
        };

        let mut states = graph.initial_states();
        let mut series = PropagationSeries::new();
        series.record(&graph, &states);

        for i in 0..rounds {
            states = propagation_step(&graph.nodes, &neighbors, &states, &config, &mut rng)?;
            let informed = series.record(&graph, &states);

            if i % 10 == 0 {
                info!("{} {}: {:.1}% informed", protocol, i, informed);
            }
            if informed >= 100.0 {
                break;
            }
        }

        match series.rounds_to_full_coverage() {
            Some(round) => info!("{}: full coverage after {} rounds", protocol, round),
            None => info!(
                "{}: {:.1}% after {} rounds",
                protocol,
                series.last().unwrap_or(0.0),
                rounds
            ),
        }
    }

    info!("let seed = {:?};", seed);

    Ok(())
}
