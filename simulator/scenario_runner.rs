// Scenario Runner - Load and execute scenario YAML files
//
// Usage:
//   cargo run --bin scenario_runner scenarios/push_sparse.yaml
//   cargo run --bin scenario_runner scenarios/  (runs all .yaml files in directory)
//   cargo run --bin scenario_runner scenarios/push_sparse.yaml --seed 0x1234...

mod epidemic;

use epidemic::{EpidemicRunner, EpidemicSimConfig};
use gossip_rust::{PeerSamplingConfig, PropagationConfig};
use simple_logger::SimpleLogger;
use std::env;
use std::fs;
use std::path::Path;

/// Scenario file format
#[derive(Debug, serde::Deserialize)]
struct ScenarioFile {
    /// Scenario metadata
    #[serde(default)]
    meta: ScenarioMeta,

    /// Configuration overrides
    config: ScenarioConfig,
}

#[derive(Debug, Default, serde::Deserialize)]
struct ScenarioMeta {
    name: Option<String>,
    description: Option<String>,
    hypothesis: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct ScenarioConfig {
    // Core settings
    #[serde(default = "default_rounds")]
    rounds: usize,

    #[serde(default = "default_node_count")]
    node_count: usize,

    #[serde(default)]
    density: f64,

    #[serde(default = "default_stop_at_full_coverage")]
    stop_at_full_coverage: bool,

    // Protocol, mix ratio, exchanges (missing fields use library defaults)
    #[serde(default)]
    propagation: PropagationConfig,

    // Peer sampling overlay (optional)
    #[serde(default)]
    overlay: Option<PeerSamplingConfig>,
}

fn default_rounds() -> usize {
    100
}

fn default_node_count() -> usize {
    10
}

fn default_stop_at_full_coverage() -> bool {
    true
}

fn main() {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()
        .unwrap();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <scenario.yaml | directory/> [--seed SEED_HEX]", args[0]);
        eprintln!("\nExamples:");
        eprintln!("  {} scenarios/push_sparse.yaml", args[0]);
        eprintln!("  {} scenarios/", args[0]);
        eprintln!("  {} scenarios/push_sparse.yaml --seed 0x123456...", args[0]);
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);

    // Parse optional seed
    let seed: Option<[u8; 32]> = if args.len() >= 4 && args[2] == "--seed" {
        Some(parse_seed_hex(&args[3]))
    } else {
        None
    };

    if path.is_file() {
        run_scenario_file(path, seed);
    } else if path.is_dir() {
        run_scenario_directory(path, seed);
    } else {
        eprintln!("Error: Path does not exist: {}", path.display());
        std::process::exit(1);
    }
}

fn run_scenario_directory(dir: &Path, seed: Option<[u8; 32]>) {
    let mut scenarios = Vec::new();

    // Find all .yaml files
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("yaml") ||
               path.extension().and_then(|s| s.to_str()) == Some("yml") {
                scenarios.push(path);
            }
        }
    }

    scenarios.sort();

    if scenarios.is_empty() {
        eprintln!("No .yaml files found in {}", dir.display());
        std::process::exit(1);
    }

    println!("\n╔════════════════════════════════════════════════════════╗");
    println!("║  SCENARIO RUNNER - Multiple Scenarios                 ║");
    println!("╚════════════════════════════════════════════════════════╝\n");
    println!("Found {} scenario(s) to run\n", scenarios.len());

    for (i, scenario_path) in scenarios.iter().enumerate() {
        println!("\n{}/{} Running: {}\n", i + 1, scenarios.len(), scenario_path.display());
        run_scenario_file(scenario_path, seed);
    }

    println!("\n╔════════════════════════════════════════════════════════╗");
    println!("║  All scenarios complete!                               ║");
    println!("╚════════════════════════════════════════════════════════╝\n");
}

fn run_scenario_file(path: &Path, seed: Option<[u8; 32]>) {
    println!("Loading scenario from: {}", path.display());

    // Load and parse YAML
    let yaml_content = fs::read_to_string(path)
        .unwrap_or_else(|e| {
            eprintln!("Failed to read {}: {}", path.display(), e);
            std::process::exit(1);
        });

    let scenario: ScenarioFile = serde_yaml::from_str(&yaml_content)
        .unwrap_or_else(|e| {
            eprintln!("Failed to parse {}: {}", path.display(), e);
            std::process::exit(1);
        });

    // Print scenario header
    println!("\n╔════════════════════════════════════════════════════════╗");
    match scenario.meta.name {
        Some(ref name) => {
            println!("║  {}  {}", name, " ".repeat(54_usize.saturating_sub(name.len())));
        }
        None => {
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("unnamed");
            println!("║  Scenario: {}  ", stem);
        }
    }
    println!("╚════════════════════════════════════════════════════════╝\n");

    if let Some(ref desc) = scenario.meta.description {
        println!("{}\n", desc);
    }

    if let Some(ref hypothesis) = scenario.meta.hypothesis {
        println!("Hypothesis:");
        println!("  {}\n", hypothesis);
    }

    // Build configuration
    let config = EpidemicSimConfig {
        rounds: scenario.config.rounds,
        node_count: scenario.config.node_count,
        density: scenario.config.density,
        seed,
        propagation: scenario.config.propagation,
        overlay: scenario.config.overlay,
        stop_at_full_coverage: scenario.config.stop_at_full_coverage,
    };

    println!("Configuration:");
    println!("  Rounds: {}", config.rounds);
    println!("  Nodes: {}", config.node_count);
    println!("  Density: {}", config.density);
    println!("  Protocol: {}", config.propagation.protocol);
    println!("  Mix ratio: {}", config.propagation.mix_ratio);
    println!("  Exchanges per round: {}", config.propagation.num_exchanges);
    if let Some(ref overlay) = config.overlay {
        println!(
            "  Overlay: max view {} ({:?})",
            overlay.max_size, overlay.self_addressing
        );
    }
    println!("\nStarting simulation...\n");

    // Run simulation
    let result = EpidemicRunner::new(config)
        .and_then(|runner| runner.run())
        .unwrap_or_else(|e| {
            eprintln!("Error in {}: {}", path.display(), e);
            std::process::exit(1);
        });

    // Print results
    result.print_summary();

    println!("\n✓ Scenario complete!\n");
}

fn parse_seed_hex(hex: &str) -> [u8; 32] {
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    let mut seed = [0u8; 32];

    for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
        if i >= 32 {
            break;
        }
        let byte = std::str::from_utf8(chunk)
            .ok()
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .unwrap_or_else(|| {
                eprintln!("Invalid hex seed: {}", hex);
                std::process::exit(1);
            });
        seed[i] = byte;
    }

    seed
}
