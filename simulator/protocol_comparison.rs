//! Protocol Comparison
//!
//! Runs push, pull and push-pull on the same graph (same seed) several times
//! and compares how many rounds each needs for full coverage.
//!
//! Run with: cargo run --example protocol_comparison

mod epidemic;

use epidemic::{EpidemicRunner, EpidemicSimConfig};
use gossip_rust::{PropagationConfig, Protocol};
use log::info;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use simple_logger::SimpleLogger;

const RUNS: usize = 10;

fn main() {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()
        .unwrap();

    println!("\n╔════════════════════════════════════════════════════════╗");
    println!("║  PROTOCOL COMPARISON                                   ║");
    println!("╚════════════════════════════════════════════════════════╝\n");

    let mut seed_rng = StdRng::from_entropy();
    let seeds: Vec<[u8; 32]> = (0..RUNS)
        .map(|_| {
            let mut seed = [0u8; 32];
            seed_rng.fill_bytes(&mut seed);
            seed
        })
        .collect();

    println!(
        "{:<10} {:>8} {:>8} {:>8} {:>10}",
        "protocol", "min", "max", "avg", "unfinished"
    );

    for protocol in Protocol::ALL {
        let mut finished: Vec<usize> = Vec::new();

        for seed in &seeds {
            let config = EpidemicSimConfig {
                rounds: 300,
                node_count: 100,
                density: 0.02,
                seed: Some(*seed),
                propagation: PropagationConfig {
                    protocol,
                    ..Default::default()
                },
                ..Default::default()
            };

            let result = EpidemicRunner::new(config)
                .and_then(|runner| runner.run())
                .unwrap_or_else(|e| {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                });

            if let Some(rounds) = result.rounds_to_full_coverage() {
                finished.push(rounds);
            }
        }

        let unfinished = RUNS - finished.len();
        if finished.is_empty() {
            println!("{:<10} {:>8} {:>8} {:>8} {:>10}", protocol, "-", "-", "-", unfinished);
            continue;
        }

        let min = finished.iter().min().unwrap();
        let max = finished.iter().max().unwrap();
        let avg = finished.iter().sum::<usize>() as f64 / finished.len() as f64;
        println!(
            "{:<10} {:>8} {:>8} {:>8.1} {:>10}",
            protocol, min, max, avg, unfinished
        );
    }

    info!("✓ Comparison complete!");
}
