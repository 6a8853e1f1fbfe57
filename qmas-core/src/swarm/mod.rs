//! Swarm Engine
//!
//! Agents, their private scent fields, the neighbor query, and the epoch loop.

pub mod agent;
pub mod pheromone;
pub mod spatial;
pub mod swarm_engine;

pub use agent::{Agent, LayerForces, Phase, SignalSource};
pub use pheromone::{Cell, PheromoneField};
pub use swarm_engine::{EpochResult, Swarm};
