//! Epidemic simulator module
//!
//! This module drives repeated propagation steps over a generated random
//! graph. It focuses on:
//! - Coverage over time for push, pull and push-pull gossip
//! - Reproducible runs from a fixed seed
//! - An optional peer sampling overlay running alongside the fixed topology

pub mod config;
pub mod runner;
pub mod stats;

pub use config::EpidemicSimConfig;
pub use runner::EpidemicRunner;
pub use stats::{OverlayStats, SimResult};
