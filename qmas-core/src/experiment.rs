//! Experiment driver: one environment, one swarm, many epochs.
//!
//! Each epoch resets the environment and swarm, picks the communications flag
//! from the configured schedule, and records the aggregate result. Export and
//! reporting are left to the caller.

use crate::core::config::SimulationConfig;
use crate::core::error::SimResult;
use crate::environment::Environment;
use crate::swarm::{EpochResult, Swarm};
use rand::Rng;
use tracing::info;

pub struct Experiment<R: Rng> {
    config: SimulationConfig,
    env: Environment,
    swarm: Swarm,
    rng: R,
    results: Vec<EpochResult>,
}

impl<R: Rng> Experiment<R> {
    /// Validate `config` and build the environment and swarm from `rng`.
    pub fn new(config: SimulationConfig, mut rng: R) -> SimResult<Self> {
        config.validate()?;
        let env = Environment::new(&config.arena, &mut rng)?;
        let swarm = Swarm::new(&config.swarm, &config.behavior, config.arena.size, &mut rng)?;
        info!(
            "🧪 [Experiment] {} epochs × {} timesteps, comms {:?}",
            config.experiment.epochs, config.experiment.timesteps, config.experiment.comms
        );
        Ok(Experiment {
            config,
            env,
            swarm,
            rng,
            results: Vec::new(),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn swarm(&self) -> &Swarm {
        &self.swarm
    }

    /// Results recorded so far, in epoch order.
    pub fn results(&self) -> &[EpochResult] {
        &self.results
    }

    /// Run the next epoch. `epoch` is 1-based and only selects the
    /// communications flag.
    pub fn run_epoch(&mut self, epoch: usize) -> &EpochResult {
        let comms = self.config.experiment.comms.is_active(epoch);
        let result = self.swarm.run_epoch(
            &mut self.env,
            self.config.experiment.timesteps,
            comms,
            &mut self.rng,
        );
        self.results.push(result);
        &self.results[self.results.len() - 1]
    }

    /// Run every configured epoch and return all results.
    pub fn run_all(&mut self) -> &[EpochResult] {
        for epoch in 1..=self.config.experiment.epochs {
            self.run_epoch(epoch);
        }
        let total: u64 = self.results.iter().map(|r| r.total).sum();
        info!(
            "🏁 [Experiment] Finished {} epochs, cumulative value {}",
            self.results.len(),
            total
        );
        &self.results
    }

    pub fn into_results(self) -> Vec<EpochResult> {
        self.results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{CommsSchedule, ExperimentConfig, SwarmConfig};
    use crate::core::error::{ConfigError, SimError};
    use crate::core::rng::seeded;

    fn small() -> SimulationConfig {
        SimulationConfig {
            swarm: SwarmConfig {
                agent_count: 10,
                ..SwarmConfig::default()
            },
            experiment: ExperimentConfig {
                epochs: 4,
                timesteps: 20,
                comms: CommsSchedule::Alternating,
            },
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn alternating_schedule_turns_comms_on_in_odd_epochs() {
        let mut exp = Experiment::new(small(), seeded(11)).unwrap();
        let results = exp.run_all();
        let flags: Vec<bool> = results.iter().map(|r| r.comms_active).collect();
        assert_eq!(flags, vec![true, false, true, false]);
        let epochs: Vec<usize> = results.iter().map(|r| r.epoch).collect();
        assert_eq!(epochs, vec![1, 2, 3, 4]);
    }

    #[test]
    fn fixed_schedules() {
        let mut config = small();
        config.experiment.comms = CommsSchedule::AlwaysOff;
        let mut exp = Experiment::new(config, seeded(12)).unwrap();
        assert!(exp.run_all().iter().all(|r| !r.comms_active));
    }

    #[test]
    fn lifetime_success_accumulates_across_epochs() {
        let mut exp = Experiment::new(small(), seeded(13)).unwrap();
        exp.run_all();
        let recorded: u64 = exp.results().iter().map(|r| r.total).sum();
        assert_eq!(exp.swarm().lifetime_success(), recorded);
    }

    #[test]
    fn zero_epochs_is_a_no_op() {
        let mut config = small();
        config.experiment.epochs = 0;
        let mut exp = Experiment::new(config, seeded(14)).unwrap();
        assert!(exp.run_all().is_empty());
    }

    #[test]
    fn invalid_config_fails_at_construction() {
        let mut config = small();
        config.arena.size = -1.0;
        let err = Experiment::new(config, seeded(15)).err();
        assert!(matches!(
            err,
            Some(SimError::Config(ConfigError::InvalidArenaSize(_)))
        ));
    }

    #[test]
    fn results_serialize_with_flat_counts() {
        let mut exp = Experiment::new(small(), seeded(16)).unwrap();
        let r = exp.run_epoch(1).clone();
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["epoch"], 1);
        assert_eq!(json["regular"].as_u64(), Some(r.counts.regular as u64));
        assert_eq!(json["comms_active"], true);
    }
}
