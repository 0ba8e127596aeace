//! Statistics and results for the epidemic simulator

use gossip_rust::{PropagationSeries, Protocol};

/// Simulation result
#[derive(Debug)]
pub struct SimResult {
    /// Seed used for the simulation
    pub seed_used: [u8; 32],

    /// Number of propagation steps executed
    pub rounds_completed: usize,

    /// Protocol the run used
    pub protocol: Protocol,

    /// Graph size
    pub node_count: usize,
    pub link_count: usize,

    /// Informed percentage, index 0 = before the first step
    pub coverage: PropagationSeries,

    /// Overlay statistics (None if the overlay was disabled)
    pub overlay: Option<OverlayStats>,
}

impl SimResult {
    pub fn rounds_to_full_coverage(&self) -> Option<usize> {
        self.coverage.rounds_to_full_coverage()
    }

    /// Print a summary of the simulation results
    pub fn print_summary(&self) {
        println!("\n╔════════════════════════════════════════════════════════╗");
        println!("║        Epidemic Simulation Results                     ║");
        println!("╚════════════════════════════════════════════════════════╝\n");

        println!("Configuration:");
        println!("  Seed: {:?}", self.seed_used);
        println!("  Protocol: {}", self.protocol);
        println!("  Nodes: {}, links: {}", self.node_count, self.link_count);
        println!("  Rounds: {}\n", self.rounds_completed);

        println!("Coverage:");
        println!("  Final: {:.1}%", self.coverage.last().unwrap_or(0.0));
        for percent in [50.0, 90.0] {
            match self.coverage.rounds_to_reach(percent) {
                Some(round) => println!("  {:>3.0}% reached at round {}", percent, round),
                None => println!("  {:>3.0}% not reached", percent),
            }
        }
        match self.rounds_to_full_coverage() {
            Some(round) => println!("  Full coverage at round {}", round),
            None => println!("  Full coverage not reached"),
        }
        println!("  Series: {}", format_series(self.coverage.samples()));
        println!();

        if let Some(ref overlay) = self.overlay {
            println!("Peer Sampling Overlay:");
            println!("  Exchanges: {}", overlay.exchanges);
            println!("  Graph neighbor fallbacks: {}", overlay.fallback_exchanges);
            println!(
                "  View size: min={}, max={}, avg={:.1}",
                overlay.view_size.0, overlay.view_size.1, overlay.view_size.2
            );
            println!("  Own entry evicted: {} nodes", overlay.self_evicted);
            println!("  Informed: {:.1}%", overlay.coverage.last().unwrap_or(0.0));
            match overlay.coverage.rounds_to_full_coverage() {
                Some(round) => println!("  Full coverage at round {}", round),
                None => println!("  Full coverage not reached"),
            }
            println!(
                "  Informed (self entry): {:.1}%",
                overlay.self_entry_coverage.last().unwrap_or(0.0)
            );
            println!();
        }
    }
}

/// Peer sampling overlay statistics
#[derive(Debug, Default)]
pub struct OverlayStats {
    /// Pairwise view exchanges performed
    pub exchanges: usize,

    /// Exchanges with a graph neighbor because the view offered no other peer
    pub fallback_exchanges: usize,

    /// Final view sizes (min, max, average)
    pub view_size: (usize, usize, f64),

    /// Services whose own entry is no longer in their view
    pub self_evicted: usize,

    /// Informed share spread over overlay exchanges, per round
    pub coverage: PropagationSeries,

    /// Share of services whose self entry reports informed, per round
    pub self_entry_coverage: PropagationSeries,
}

fn format_series(samples: &[f64]) -> String {
    const SHOWN: usize = 12;
    let mut parts: Vec<String> = samples
        .iter()
        .take(SHOWN)
        .map(|v| format!("{:.0}", v))
        .collect();
    if samples.len() > SHOWN {
        parts.push(format!("... ({} more)", samples.len() - SHOWN));
    }
    parts.join(" ")
}
