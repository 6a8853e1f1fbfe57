use super::error::{ConfigError, SimResult};
use serde::{Deserialize, Serialize};

/// Point value per target tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierValues {
    pub regular: u64,
    pub golden: u64,
    pub mega: u64,
}

impl Default for TierValues {
    fn default() -> Self {
        TierValues {
            regular: 1,
            golden: 10,
            mega: 100,
        }
    }
}

/// Arena layout and population sizes.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Side length of the square arena.
    pub size: f64,
    pub static_obstacles: usize,
    /// Radius range `[lo, hi)` for static obstacles.
    pub static_radius: (f64, f64),
    pub dynamic_obstacles: usize,
    /// Per-axis speed bound; initial velocities are drawn from `[-s, s)`.
    pub dynamic_speed: f64,
    pub dynamic_radius: (f64, f64),
    pub hazards: usize,
    pub hazard_radius: (f64, f64),
    pub regular_targets: usize,
    pub golden_targets: usize,
    pub mega_targets: usize,
    /// Targets are placed in `[margin, size - margin)` per axis.
    pub target_margin: f64,
    pub tier_values: TierValues,
    /// Pickup distance (strict `<`).
    pub collect_radius: f64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        ArenaConfig {
            size: 500.0,
            static_obstacles: 50,
            static_radius: (5.0, 15.0),
            dynamic_obstacles: 20,
            dynamic_speed: 2.0,
            dynamic_radius: (3.0, 8.0),
            hazards: 30,
            hazard_radius: (10.0, 20.0),
            regular_targets: 800,
            golden_targets: 150,
            mega_targets: 20,
            target_margin: 10.0,
            tier_values: TierValues::default(),
            collect_radius: 12.0,
        }
    }
}

impl ArenaConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.size.is_finite() && self.size > 0.0) {
            return Err(ConfigError::InvalidArenaSize(self.size));
        }
        check_range("static_radius", self.static_radius)?;
        check_range("dynamic_radius", self.dynamic_radius)?;
        check_range("hazard_radius", self.hazard_radius)?;
        check_non_negative("dynamic_speed", self.dynamic_speed)?;
        check_non_negative("collect_radius", self.collect_radius)?;
        check_margin("target", self.target_margin, self.size)?;
        Ok(())
    }
}

/// Per-layer blend weights.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerWeights {
    pub repulsion: f64,
    pub signal: f64,
    pub trail: f64,
    pub oracle: f64,
}

impl LayerWeights {
    pub const RETURNING: LayerWeights = LayerWeights {
        repulsion: 0.2,
        signal: 0.1,
        trail: 0.7,
        oracle: 0.0,
    };

    pub const EXPLORING: LayerWeights = LayerWeights {
        repulsion: 0.4,
        signal: 0.4,
        trail: 0.1,
        oracle: 0.1,
    };

    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        for value in [self.repulsion, self.signal, self.trail, self.oracle] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteParameter { name, value });
            }
        }
        Ok(())
    }
}

/// Force-model constants for a single agent.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Noise when no neighbor is in range.
    pub repulsion_sigma_alone: f64,
    pub repulsion_magnitude: f64,
    /// Share of the away-from-centroid term; the rest goes to noise.
    pub repulsion_blend: f64,
    pub repulsion_sigma: f64,

    pub signal_gain: f64,
    pub signal_cap: f64,
    pub signal_max_sources: usize,
    pub signal_min_distance: f64,

    pub field_resolution: usize,
    pub trail_deposit: f64,
    pub trail_cap: f64,
    pub trail_decay: f64,
    /// Center-cell value at or below which the trail layer stays silent.
    pub trail_gate: f64,
    pub trail_gain: f64,

    pub oracle_probability: f64,
    pub oracle_window: usize,
    pub oracle_gain: f64,
    pub oracle_sigma: f64,
    /// Noise returned while the buffer is still shorter than the window.
    pub oracle_sigma_cold: f64,

    pub weights_returning: LayerWeights,
    pub weights_exploring: LayerWeights,

    pub inertia: f64,
    pub force_gain: f64,
    /// Per-axis velocity bound.
    pub max_speed: f64,
    pub obstacle_damping: f64,
    pub hazard_amplification: f64,
    pub bounds_margin: f64,
    pub buffer_len: usize,
    /// Trajectory length after which a returning agent resumes exploring.
    pub return_timeout: usize,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        BehaviorConfig {
            repulsion_sigma_alone: 8.0,
            repulsion_magnitude: 10.0,
            repulsion_blend: 0.6,
            repulsion_sigma: 5.0,
            signal_gain: 50.0,
            signal_cap: 20.0,
            signal_max_sources: 10,
            signal_min_distance: 1.0,
            field_resolution: 50,
            trail_deposit: 1.0,
            trail_cap: 10.0,
            trail_decay: 0.999,
            trail_gate: 0.1,
            trail_gain: 2.0,
            oracle_probability: 0.4,
            oracle_window: 5,
            oracle_gain: 2.0,
            oracle_sigma: 3.0,
            oracle_sigma_cold: 6.0,
            weights_returning: LayerWeights::RETURNING,
            weights_exploring: LayerWeights::EXPLORING,
            inertia: 0.7,
            force_gain: 0.3,
            max_speed: 15.0,
            obstacle_damping: 0.8,
            hazard_amplification: 1.5,
            bounds_margin: 5.0,
            buffer_len: 20,
            return_timeout: 100,
        }
    }
}

impl BehaviorConfig {
    pub fn validate(&self, arena_size: f64) -> Result<(), ConfigError> {
        for (name, value) in [
            ("repulsion_sigma_alone", self.repulsion_sigma_alone),
            ("repulsion_magnitude", self.repulsion_magnitude),
            ("repulsion_sigma", self.repulsion_sigma),
            ("signal_gain", self.signal_gain),
            ("signal_cap", self.signal_cap),
            ("signal_min_distance", self.signal_min_distance),
            ("trail_deposit", self.trail_deposit),
            ("trail_cap", self.trail_cap),
            ("trail_decay", self.trail_decay),
            ("trail_gate", self.trail_gate),
            ("trail_gain", self.trail_gain),
            ("oracle_gain", self.oracle_gain),
            ("oracle_sigma", self.oracle_sigma),
            ("oracle_sigma_cold", self.oracle_sigma_cold),
            ("max_speed", self.max_speed),
            ("obstacle_damping", self.obstacle_damping),
            ("hazard_amplification", self.hazard_amplification),
        ] {
            check_non_negative(name, value)?;
        }
        for (name, value) in [
            ("repulsion_blend", self.repulsion_blend),
            ("oracle_probability", self.oracle_probability),
        ] {
            check_probability(name, value)?;
        }
        for (name, value) in [("inertia", self.inertia), ("force_gain", self.force_gain)] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteParameter { name, value });
            }
        }
        self.weights_returning.validate("weights_returning")?;
        self.weights_exploring.validate("weights_exploring")?;
        if self.field_resolution == 0 {
            return Err(ConfigError::InvalidFieldResolution);
        }
        check_margin("bounds", self.bounds_margin, arena_size)?;
        Ok(())
    }
}

/// Population and periodic-correction settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    pub agent_count: usize,
    /// Agents spawn in `[margin, size - margin)` per axis.
    pub spawn_margin: f64,
    pub leader_count: usize,
    pub guardian_count: usize,
    pub neighbor_radius: f64,
    pub leader_interval: usize,
    pub cohesion_gain: f64,
    pub guardian_interval: usize,
    pub guardian_boost: f64,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        SwarmConfig {
            agent_count: 100,
            spawn_margin: 20.0,
            leader_count: 5,
            guardian_count: 10,
            neighbor_radius: 60.0,
            leader_interval: 50,
            cohesion_gain: 0.02,
            guardian_interval: 30,
            guardian_boost: 1.1,
        }
    }
}

impl SwarmConfig {
    pub fn validate(&self, arena_size: f64) -> Result<(), ConfigError> {
        check_margin("spawn", self.spawn_margin, arena_size)?;
        check_non_negative("neighbor_radius", self.neighbor_radius)?;
        check_non_negative("guardian_boost", self.guardian_boost)?;
        if !self.cohesion_gain.is_finite() {
            return Err(ConfigError::NonFiniteParameter {
                name: "cohesion_gain",
                value: self.cohesion_gain,
            });
        }
        if self.leader_interval == 0 {
            return Err(ConfigError::ZeroInterval {
                name: "leader_interval",
            });
        }
        if self.guardian_interval == 0 {
            return Err(ConfigError::ZeroInterval {
                name: "guardian_interval",
            });
        }
        Ok(())
    }
}

/// How the communications flag is chosen per epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommsSchedule {
    /// Odd epochs on, even epochs off (1-based).
    #[default]
    Alternating,
    AlwaysOn,
    AlwaysOff,
}

impl CommsSchedule {
    pub fn is_active(self, epoch: usize) -> bool {
        match self {
            CommsSchedule::Alternating => epoch % 2 == 1,
            CommsSchedule::AlwaysOn => true,
            CommsSchedule::AlwaysOff => false,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub epochs: usize,
    pub timesteps: usize,
    pub comms: CommsSchedule,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        ExperimentConfig {
            epochs: 10,
            timesteps: 1200,
            comms: CommsSchedule::Alternating,
        }
    }
}

/// Full set of hyperparameters for one experiment run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub arena: ArenaConfig,
    pub behavior: BehaviorConfig,
    pub swarm: SwarmConfig,
    pub experiment: ExperimentConfig,
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.arena.validate()?;
        self.behavior.validate(self.arena.size)?;
        self.swarm.validate(self.arena.size)?;
        Ok(())
    }

    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> SimResult<Self> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

fn check_range(name: &'static str, (lo, hi): (f64, f64)) -> Result<(), ConfigError> {
    if lo.is_finite() && hi.is_finite() && lo >= 0.0 && lo <= hi {
        Ok(())
    } else {
        Err(ConfigError::InvalidRange { name, lo, hi })
    }
}

fn check_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NegativeParameter { name, value })
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { name, value })
    }
}

fn check_margin(name: &'static str, margin: f64, size: f64) -> Result<(), ConfigError> {
    if margin.is_finite() && margin >= 0.0 && 2.0 * margin < size {
        Ok(())
    } else {
        Err(ConfigError::MarginTooLarge { name, margin, size })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::SimError;

    #[test]
    fn defaults_validate() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_arena() {
        let mut cfg = SimulationConfig::default();
        cfg.arena.size = 0.0;
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidArenaSize(0.0)));
        cfg.arena.size = f64::NAN;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidArenaSize(_))
        ));
    }

    #[test]
    fn rejects_inverted_radius_range() {
        let mut cfg = SimulationConfig::default();
        cfg.arena.hazard_radius = (20.0, 10.0);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidRange {
                name: "hazard_radius",
                ..
            })
        ));
    }

    #[test]
    fn rejects_spawn_margin_wider_than_arena() {
        let mut cfg = SimulationConfig::default();
        cfg.arena.size = 30.0;
        cfg.arena.target_margin = 1.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::MarginTooLarge { name: "spawn", .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_probability() {
        let mut cfg = SimulationConfig::default();
        cfg.behavior.oracle_probability = 1.5;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidProbability { .. })
        ));
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let cfg = SimulationConfig::from_json(r#"{"swarm": {"agent_count": 7}}"#).unwrap();
        assert_eq!(cfg.swarm.agent_count, 7);
        assert_eq!(cfg.swarm.leader_count, 5);
        assert_eq!(cfg.arena.regular_targets, 800);
        assert_eq!(cfg.experiment.comms, CommsSchedule::Alternating);
    }

    #[test]
    fn json_errors_are_reported() {
        assert!(matches!(
            SimulationConfig::from_json("{not json"),
            Err(SimError::Parse(_))
        ));
        assert!(matches!(
            SimulationConfig::from_json(r#"{"behavior": {"field_resolution": 0}}"#),
            Err(SimError::Config(ConfigError::InvalidFieldResolution))
        ));
    }

    #[test]
    fn alternating_schedule_turns_comms_on_for_odd_epochs() {
        let s = CommsSchedule::Alternating;
        assert!(s.is_active(1));
        assert!(!s.is_active(2));
        assert!(s.is_active(3));
    }
}
