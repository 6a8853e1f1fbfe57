//! Swarm Engine
//!
//! Owns the agent population and drives one epoch at a time against a shared
//! [`Environment`]. Agents are updated in index order; each neighbor query
//! sees the positions already written earlier in the same timestep.

use super::agent::{Agent, SignalSource};
use super::spatial::neighbor_positions_into;
use crate::core::config::{BehaviorConfig, SwarmConfig};
use crate::core::error::ConfigError;
use crate::core::math::Vec2;
use crate::core::rng::uniform_point;
use crate::environment::{Environment, TierCounts};
use rand::seq::index::sample;
use rand::Rng;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Aggregate outcome of one epoch.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EpochResult {
    /// 1-based count of epochs this swarm has run.
    pub epoch: usize,
    #[serde(flatten)]
    pub counts: TierCounts,
    /// Weighted value of `counts`.
    pub total: u64,
    pub elapsed: Duration,
    pub comms_active: bool,
}

pub struct Swarm {
    agents: Vec<Agent>,
    leaders: Vec<usize>,
    guardians: Vec<usize>,
    config: SwarmConfig,
    behavior: BehaviorConfig,
    arena_size: f64,
    epochs_run: usize,
    // Reused per agent per timestep.
    neighbors: Vec<Vec2>,
}

impl Swarm {
    /// Spawn `config.agent_count` agents uniformly in
    /// `[spawn_margin, size - spawn_margin)` and draw the leader and
    /// guardian subsets.
    pub fn new<R: Rng + ?Sized>(
        config: &SwarmConfig,
        behavior: &BehaviorConfig,
        arena_size: f64,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        config.validate(arena_size)?;
        behavior.validate(arena_size)?;

        let (lo, hi) = (config.spawn_margin, arena_size - config.spawn_margin);
        let positions: Vec<Vec2> = (0..config.agent_count)
            .map(|_| uniform_point(&mut *rng, lo, hi))
            .collect();
        let swarm = Self::with_positions(config, behavior, arena_size, &positions, rng)?;

        info!(
            "🐝 [Swarm] Spawned {} agents ({} leaders, {} guardians)",
            swarm.agents.len(),
            swarm.leaders.len(),
            swarm.guardians.len()
        );
        Ok(swarm)
    }

    /// Build from explicit spawn positions. Leader and guardian subsets are
    /// still sampled from `rng`.
    pub fn with_positions<R: Rng + ?Sized>(
        config: &SwarmConfig,
        behavior: &BehaviorConfig,
        arena_size: f64,
        positions: &[Vec2],
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        config.validate(arena_size)?;
        behavior.validate(arena_size)?;

        let agents: Vec<Agent> = positions
            .iter()
            .enumerate()
            .map(|(id, &p)| Agent::new(id, p, arena_size, behavior))
            .collect();

        let n = agents.len();
        if config.leader_count > n || config.guardian_count > n {
            warn!(
                "⚠️ [Swarm] {} agents cannot fill {} leaders / {} guardians; subsets truncated",
                n, config.leader_count, config.guardian_count
            );
        }
        let leaders = pick_subset(rng, n, config.leader_count);
        let guardians = pick_subset(rng, n, config.guardian_count);

        Ok(Swarm {
            agents,
            leaders,
            guardians,
            config: config.clone(),
            behavior: behavior.clone(),
            arena_size,
            epochs_run: 0,
            neighbors: Vec::new(),
        })
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn leaders(&self) -> &[usize] {
        &self.leaders
    }

    pub fn guardians(&self) -> &[usize] {
        &self.guardians
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn arena_size(&self) -> f64 {
        self.arena_size
    }

    pub fn epochs_run(&self) -> usize {
        self.epochs_run
    }

    /// Sum of every agent's lifetime success.
    pub fn lifetime_success(&self) -> u64 {
        self.agents.iter().map(Agent::success_count).sum()
    }

    /// Reset targets and every agent's epoch-scoped state.
    pub fn reset_for_epoch<R: Rng + ?Sized>(&mut self, env: &mut Environment, rng: &mut R) {
        env.reset_targets(rng);
        for agent in &mut self.agents {
            agent.reset();
        }
    }

    /// Run one full epoch of `timesteps` ticks.
    pub fn run_epoch<R: Rng + ?Sized>(
        &mut self,
        env: &mut Environment,
        timesteps: usize,
        comms_active: bool,
        rng: &mut R,
    ) -> EpochResult {
        self.reset_for_epoch(env, rng);
        self.epochs_run += 1;
        let started = Instant::now();

        // No agent broadcasts yet; the signal layer always sees an empty list.
        let signals: &[SignalSource] = &[];
        let mut counts = TierCounts::default();

        for t in 0..timesteps {
            env.advance_dynamic_obstacles();

            for i in 0..self.agents.len() {
                neighbor_positions_into(
                    &self.agents,
                    i,
                    self.config.neighbor_radius,
                    &mut self.neighbors,
                );
                let picked = self.agents[i].update(
                    env,
                    &self.neighbors,
                    signals,
                    comms_active,
                    &self.behavior,
                    rng,
                );
                for c in picked {
                    counts.add(c.tier);
                }
            }

            if t % self.config.leader_interval == 0 {
                self.apply_leader_cohesion();
            }
            if t % self.config.guardian_interval == 0 {
                self.apply_guardian_boost();
            }
        }

        let result = EpochResult {
            epoch: self.epochs_run,
            counts,
            total: counts.total_value(env.tier_values()),
            elapsed: started.elapsed(),
            comms_active,
        };

        info!(
            "📊 [Swarm] Epoch {} | comms {} | regular {} golden {} mega {} | total {} | {:?}",
            result.epoch,
            if comms_active { "ON" } else { "OFF" },
            counts.regular,
            counts.golden,
            counts.mega,
            result.total,
            result.elapsed
        );
        debug!(
            "[Swarm] Remaining after epoch {}: {:?}",
            result.epoch,
            env.remaining_counts()
        );
        result
    }

    /// Pull each leader's velocity toward the leader centroid by
    /// `cohesion_gain` of its offset.
    pub fn apply_leader_cohesion(&mut self) {
        let agents = &self.agents;
        let Some(centroid) = Vec2::centroid(self.leaders.iter().map(|&i| agents[i].position()))
        else {
            return;
        };
        let gain = self.config.cohesion_gain;
        for &i in &self.leaders {
            let offset = centroid - self.agents[i].position();
            self.agents[i].nudge_velocity(offset * gain);
        }
    }

    /// Scale every guardian's velocity by `guardian_boost`.
    pub fn apply_guardian_boost(&mut self) {
        let boost = self.config.guardian_boost;
        for &i in &self.guardians {
            self.agents[i].scale_velocity(boost);
        }
    }
}

/// `min(count, n)` distinct indices below `n`.
fn pick_subset<R: Rng + ?Sized>(rng: &mut R, n: usize, count: usize) -> Vec<usize> {
    let amount = count.min(n);
    if amount == 0 {
        return Vec::new();
    }
    sample(rng, n, amount).into_vec()
}
