//! Foraging Agent
//!
//! Each agent blends four behavioral layers into one steering force:
//! repulsion from nearby agents, attraction to signal sources, its own
//! pheromone trail and a short-horizon motion extrapolator. The blend
//! weights depend on whether the agent is exploring or returning.

use super::pheromone::PheromoneField;
use crate::core::config::{BehaviorConfig, LayerWeights};
use crate::core::math::Vec2;
use crate::core::rng::gaussian_vec;
use crate::environment::{Collected, Collision, Environment};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Behavioral mode gating the blend weights and trail writes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Exploring,
    Returning,
}

/// A point that attracts agents when communications are on.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignalSource {
    pub position: Vec2,
    pub value: f64,
}

/// Raw output of each layer before blending.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayerForces {
    pub repulsion: Vec2,
    pub signal: Vec2,
    pub trail: Vec2,
    pub oracle: Vec2,
}

impl LayerForces {
    pub fn blend(&self, w: &LayerWeights) -> Vec2 {
        self.repulsion * w.repulsion
            + self.signal * w.signal
            + self.trail * w.trail
            + self.oracle * w.oracle
    }
}

#[derive(Clone, Debug)]
pub struct Agent {
    id: usize,
    position: Vec2,
    start: Vec2,
    velocity: Vec2,
    phase: Phase,
    /// Lifetime value collected; never reset.
    success_count: u64,
    epoch_success: u64,
    trajectory: Vec<Vec2>,
    /// Most recent positions, oldest first.
    neural_buffer: VecDeque<Vec2>,
    /// Private trail memory; survives epoch resets.
    field: PheromoneField,
    last_forces: LayerForces,
    last_target_force: Vec2,
}

impl Agent {
    pub fn new(id: usize, position: Vec2, arena_size: f64, behavior: &BehaviorConfig) -> Self {
        Agent {
            id,
            position,
            start: position,
            velocity: Vec2::ZERO,
            phase: Phase::Exploring,
            success_count: 0,
            epoch_success: 0,
            trajectory: vec![position],
            neural_buffer: VecDeque::with_capacity(behavior.buffer_len + 1),
            field: PheromoneField::new(arena_size, behavior),
            last_forces: LayerForces::default(),
            last_target_force: Vec2::ZERO,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn start_position(&self) -> Vec2 {
        self.start
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn success_count(&self) -> u64 {
        self.success_count
    }

    pub fn epoch_success(&self) -> u64 {
        self.epoch_success
    }

    pub fn trajectory(&self) -> &[Vec2] {
        &self.trajectory
    }

    pub fn neural_buffer(&self) -> &VecDeque<Vec2> {
        &self.neural_buffer
    }

    pub fn field(&self) -> &PheromoneField {
        &self.field
    }

    /// Layer outputs from the most recent update.
    pub fn last_forces(&self) -> LayerForces {
        self.last_forces
    }

    /// Blended force from the most recent update.
    pub fn last_target_force(&self) -> Vec2 {
        self.last_target_force
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Add directly to velocity, bypassing the blend.
    pub fn nudge_velocity(&mut self, delta: Vec2) {
        self.velocity += delta;
    }

    pub fn scale_velocity(&mut self, k: f64) {
        self.velocity *= k;
    }

    /// Clear epoch-scoped state. The pheromone field and lifetime count persist.
    pub fn reset(&mut self) {
        self.position = self.start;
        self.velocity = Vec2::ZERO;
        self.phase = Phase::Exploring;
        self.epoch_success = 0;
        self.trajectory.clear();
        self.trajectory.push(self.start);
        self.neural_buffer.clear();
        self.last_forces = LayerForces::default();
        self.last_target_force = Vec2::ZERO;
    }

    // ── Layers ──────────────────────────────────────────────────────────────

    /// Push away from the neighbor centroid, mixed with isotropic noise.
    pub fn repulsion<R: Rng + ?Sized>(
        &self,
        neighbors: &[Vec2],
        b: &BehaviorConfig,
        rng: &mut R,
    ) -> Vec2 {
        let Some(center) = Vec2::centroid(neighbors.iter().copied()) else {
            return gaussian_vec(rng, b.repulsion_sigma_alone);
        };
        let away = match (self.position - center).normalized() {
            Some(dir) => dir * b.repulsion_magnitude,
            None => Vec2::ZERO,
        };
        let noise = gaussian_vec(rng, b.repulsion_sigma);
        away * b.repulsion_blend + noise * (1.0 - b.repulsion_blend)
    }

    /// Inverse-square pull toward the first few signal sources.
    pub fn signal(&self, sources: &[SignalSource], comms_active: bool, b: &BehaviorConfig) -> Vec2 {
        if !comms_active || sources.is_empty() {
            return Vec2::ZERO;
        }
        let mut force = Vec2::ZERO;
        for src in sources.iter().take(b.signal_max_sources) {
            let offset = src.position - self.position;
            let r = offset.norm();
            if !(r >= b.signal_min_distance) {
                continue;
            }
            let magnitude = src.value / (r * r + 1.0) * b.signal_gain;
            force += offset * (magnitude / r);
        }
        force.clip(-b.signal_cap, b.signal_cap)
    }

    /// Write (when returning with a success), read the gradient, then age the field.
    pub fn trail(&mut self, b: &BehaviorConfig) -> Vec2 {
        let cell = self.field.cell_of(self.position);
        if self.phase == Phase::Returning && self.epoch_success > 0 {
            self.field.deposit(cell, b.trail_deposit);
        }
        let force = self.field.gradient_at(cell);
        self.field.decay();
        force
    }

    /// Extrapolate recent motion. Fires only with comms off, and then only
    /// with the configured probability.
    pub fn oracle<R: Rng + ?Sized>(
        &self,
        comms_active: bool,
        b: &BehaviorConfig,
        rng: &mut R,
    ) -> Vec2 {
        if comms_active || !(rng.gen::<f64>() < b.oracle_probability) {
            return Vec2::ZERO;
        }
        let window = b.oracle_window;
        if self.neural_buffer.len() < window || window < 2 {
            return gaussian_vec(rng, b.oracle_sigma_cold);
        }
        let recent: Vec<Vec2> = self
            .neural_buffer
            .iter()
            .skip(self.neural_buffer.len() - window)
            .copied()
            .collect();
        let steps = recent.windows(2).map(|w| w[1] - w[0]);
        let avg = Vec2::centroid(steps).unwrap_or(Vec2::ZERO);
        avg * b.oracle_gain + gaussian_vec(rng, b.oracle_sigma)
    }

    // ── Update ──────────────────────────────────────────────────────────────

    /// Advance one timestep. Returns whatever was picked up at the new position.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        env: &mut Environment,
        neighbors: &[Vec2],
        signals: &[SignalSource],
        comms_active: bool,
        b: &BehaviorConfig,
        rng: &mut R,
    ) -> Vec<Collected> {
        self.neural_buffer.push_back(self.position);
        while self.neural_buffer.len() > b.buffer_len {
            self.neural_buffer.pop_front();
        }

        let forces = LayerForces {
            repulsion: self.repulsion(neighbors, b, rng),
            signal: self.signal(signals, comms_active, b),
            trail: self.trail(b),
            oracle: self.oracle(comms_active, b, rng),
        };
        let weights = match self.phase {
            Phase::Returning => &b.weights_returning,
            Phase::Exploring => &b.weights_exploring,
        };
        let target = forces.blend(weights);
        self.last_forces = forces;
        self.last_target_force = target;

        self.velocity =
            (self.velocity * b.inertia + target * b.force_gain).clip(-b.max_speed, b.max_speed);

        // Single resolution pass; the bounced position is not re-checked.
        let mut next = self.position + self.velocity;
        match env.classify_collision(next) {
            Collision::Blocked => {
                self.velocity *= -b.obstacle_damping;
                next = self.position + self.velocity;
            }
            Collision::Hazard => {
                self.velocity *= -b.hazard_amplification;
                next = self.position + self.velocity;
            }
            Collision::Clear => {}
        }

        self.position = next.clip(b.bounds_margin, env.size() - b.bounds_margin);
        self.trajectory.push(self.position);

        let collected = env.collect(self.position);
        for c in &collected {
            self.success_count += c.value;
            self.epoch_success += c.value;
            self.phase = Phase::Returning;
        }

        if self.phase == Phase::Returning && self.trajectory.len() > b.return_timeout {
            self.phase = Phase::Exploring;
        }

        collected
    }
}
