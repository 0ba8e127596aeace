//! Epidemic Simulation Example
//!
//! Run with: cargo run --example epidemic_sim

mod epidemic;

use epidemic::{EpidemicRunner, EpidemicSimConfig};
use gossip_rust::{PeerSamplingConfig, PropagationConfig, Protocol, SelfAddressing};
use log::info;
use simple_logger::SimpleLogger;

fn main() {
    SimpleLogger::new().init().unwrap();

    println!("╔════════════════════════════════════════════════════════╗");
    println!("║        Epidemic Gossip Simulator                       ║");
    println!("╚════════════════════════════════════════════════════════╝\n");

    info!("Setting up epidemic simulation...");

    // Configure simulation
    let config = EpidemicSimConfig {
        rounds: 200,
        node_count: 60,
        density: 0.05,
        seed: Some([42u8; 32]), // fixed for reproducible output

        propagation: PropagationConfig {
            protocol: Protocol::PushPull,
            mix_ratio: 0.3,
            num_exchanges: 3,
        },

        overlay: Some(PeerSamplingConfig {
            max_size: 12,
            self_addressing: SelfAddressing::Pinned,
        }),

        stop_at_full_coverage: true,
    };

    info!("Configuration:");
    info!("  Nodes: {}", config.node_count);
    info!("  Density: {}", config.density);
    info!("  Protocol: {}", config.propagation.protocol);
    info!("  Mix ratio: {}", config.propagation.mix_ratio);
    info!("  Exchanges per round: {}", config.propagation.num_exchanges);
    info!("");

    info!("Starting simulation...");

    let runner = EpidemicRunner::new(config).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    let result = runner.run().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    // Display results
    result.print_summary();

    info!("✓ Simulation complete!");
}
