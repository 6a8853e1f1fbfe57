//! Q-MAS Core - Multi-Layer Swarm Foraging Simulator
//!
//! Point agents forage in a bounded 2-D arena with obstacles, hazards, and
//! three tiers of targets. Each agent blends four behavioral layers
//! (repulsion, signal attraction, a private scent trail, and a short-horizon
//! motion oracle) every timestep; the swarm loop drives them epoch by epoch.

pub mod core;
pub mod environment;
pub mod experiment;
pub mod swarm;

pub use crate::core::config::{
    ArenaConfig, BehaviorConfig, CommsSchedule, ExperimentConfig, LayerWeights, SimulationConfig,
    SwarmConfig, TierValues,
};
pub use crate::core::error::{ConfigError, SimError, SimResult};
pub use crate::core::math::Vec2;
pub use environment::{Collision, Environment, Tier, TierCounts};
pub use experiment::Experiment;
pub use swarm::{Agent, EpochResult, Phase, Swarm};

/// Initialize tracing for the library.
pub fn setup_logging(level: Option<String>) {
    let filter = level.unwrap_or_else(|| "info".to_string());
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
