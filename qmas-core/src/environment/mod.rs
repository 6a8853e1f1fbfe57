//! Foraging Arena
//!
//! Continuous square arena with static obstacles, drifting obstacles,
//! hazards and three tiers of collectible targets. Agents only ever touch it
//! through [`Environment::classify_collision`] and [`Environment::collect_at`].

pub mod grid;
pub mod targets;

use crate::core::config::{ArenaConfig, TierValues};
use crate::core::error::ConfigError;
use crate::core::math::Vec2;
use crate::core::rng::{uniform, uniform_point};
use grid::BucketGrid;
use rand::Rng;
use tracing::info;

pub use targets::{Collected, TargetSet, TargetTiers, Tier, TierCounts};

const INDEX_COLS: usize = 20;

/// Fixed circular obstacle or hazard.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Disc {
    pub center: Vec2,
    pub radius: f64,
}

impl Disc {
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.distance(self.center) < self.radius
    }
}

/// Obstacle that drifts and bounces off the arena walls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovingDisc {
    pub center: Vec2,
    pub velocity: Vec2,
    pub radius: f64,
}

/// Outcome of probing a position against the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collision {
    Clear,
    Blocked,
    Hazard,
}

/// Indexed set of fixed discs.
struct DiscLayer {
    discs: Vec<Disc>,
    index: BucketGrid,
}

impl DiscLayer {
    fn new(arena_size: f64, discs: Vec<Disc>) -> Self {
        let mut layer = DiscLayer {
            discs,
            index: BucketGrid::new(arena_size, INDEX_COLS),
        };
        layer.reindex();
        layer
    }

    fn reindex(&mut self) {
        let centers: Vec<Vec2> = self.discs.iter().map(|d| d.center).collect();
        let reach = self.discs.iter().map(|d| d.radius).fold(0.0, f64::max);
        self.index.rebuild(&centers, reach);
    }

    fn push(&mut self, disc: Disc) {
        self.discs.push(disc);
        self.reindex();
    }

    fn hit(&self, p: Vec2) -> bool {
        let mut hit = false;
        self.index.query_radius(p, 0.0, |i| {
            hit = hit || self.discs[i as usize].contains(p);
        });
        hit
    }
}

/// The shared arena. Static layout persists for the whole run; targets are
/// redrawn each epoch and dynamic obstacles move every tick.
pub struct Environment {
    size: f64,
    epoch: u64,
    obstacles: DiscLayer,
    hazards: DiscLayer,
    dynamic: Vec<MovingDisc>,
    targets: TargetTiers,
    /// Per-tier population size used by `reset_targets`.
    target_counts: TierCounts,
    target_margin: f64,
    tier_values: TierValues,
    collect_radius: f64,
    scratch: Vec<u32>,
    hits: Vec<usize>,
}

impl Environment {
    /// Lay out obstacles and hazards uniformly over the arena, then draw the
    /// first set of targets.
    pub fn new<R: Rng + ?Sized>(config: &ArenaConfig, rng: &mut R) -> Result<Self, ConfigError> {
        config.validate()?;
        let size = config.size;

        let draw = |rng: &mut R, n: usize, (lo, hi): (f64, f64)| -> Vec<Disc> {
            (0..n)
                .map(|_| Disc {
                    center: uniform_point(&mut *rng, 0.0, size),
                    radius: uniform(&mut *rng, lo, hi),
                })
                .collect()
        };
        let obstacles = draw(&mut *rng, config.static_obstacles, config.static_radius);
        let dynamic = (0..config.dynamic_obstacles)
            .map(|_| MovingDisc {
                center: uniform_point(&mut *rng, 0.0, size),
                velocity: uniform_point(&mut *rng, -config.dynamic_speed, config.dynamic_speed),
                radius: uniform(&mut *rng, config.dynamic_radius.0, config.dynamic_radius.1),
            })
            .collect();
        let hazards = draw(&mut *rng, config.hazards, config.hazard_radius);

        let mut env = Environment {
            size,
            epoch: 0,
            obstacles: DiscLayer::new(size, obstacles),
            hazards: DiscLayer::new(size, hazards),
            dynamic,
            targets: TargetTiers::new(size),
            target_counts: TierCounts {
                regular: config.regular_targets,
                golden: config.golden_targets,
                mega: config.mega_targets,
            },
            target_margin: config.target_margin,
            tier_values: config.tier_values,
            collect_radius: config.collect_radius,
            scratch: Vec::new(),
            hits: Vec::new(),
        };
        env.reset_targets(rng);

        info!(
            "🗺️ [Environment] {}x{} arena: {} obstacles, {} drifting, {} hazards, targets {}/{}/{}",
            size,
            size,
            env.obstacles.discs.len(),
            env.dynamic.len(),
            env.hazards.discs.len(),
            config.regular_targets,
            config.golden_targets,
            config.mega_targets,
        );
        Ok(env)
    }

    /// Arena with no obstacles, hazards or targets, for hand-placed scenarios.
    pub fn empty(size: f64) -> Result<Self, ConfigError> {
        let config = ArenaConfig {
            size,
            static_obstacles: 0,
            dynamic_obstacles: 0,
            hazards: 0,
            regular_targets: 0,
            golden_targets: 0,
            mega_targets: 0,
            target_margin: 0.0,
            ..ArenaConfig::default()
        };
        let mut rng = rand::rngs::mock::StepRng::new(0, 1);
        Environment::new(&config, &mut rng)
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    /// Number of `reset_targets` calls so far.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn collect_radius(&self) -> f64 {
        self.collect_radius
    }

    pub fn tier_values(&self) -> &TierValues {
        &self.tier_values
    }

    pub fn obstacles(&self) -> &[Disc] {
        &self.obstacles.discs
    }

    pub fn hazards(&self) -> &[Disc] {
        &self.hazards.discs
    }

    pub fn dynamic_obstacles(&self) -> &[MovingDisc] {
        &self.dynamic
    }

    pub fn targets(&self) -> &TargetTiers {
        &self.targets
    }

    pub fn add_static_obstacle(&mut self, center: Vec2, radius: f64) {
        self.obstacles.push(Disc { center, radius });
    }

    pub fn add_hazard(&mut self, center: Vec2, radius: f64) {
        self.hazards.push(Disc { center, radius });
    }

    pub fn add_dynamic_obstacle(&mut self, center: Vec2, velocity: Vec2, radius: f64) {
        self.dynamic.push(MovingDisc {
            center,
            velocity,
            radius,
        });
    }

    /// Drop one uncollected target at `pos`. It is kept until the next
    /// `reset_targets`, which redraws it with the rest of its tier.
    pub fn place_target(&mut self, tier: Tier, pos: Vec2) {
        self.targets.get_mut(tier).push(pos);
        self.target_counts = self.targets.totals();
    }

    /// Integrate drifting obstacles one tick. A center component outside
    /// `[0, size]` flips that velocity component.
    pub fn advance_dynamic_obstacles(&mut self) {
        let size = self.size;
        for obs in &mut self.dynamic {
            obs.center += obs.velocity;
            if obs.center.x < 0.0 || obs.center.x > size {
                obs.velocity.x = -obs.velocity.x;
            }
            if obs.center.y < 0.0 || obs.center.y > size {
                obs.velocity.y = -obs.velocity.y;
            }
        }
    }

    /// Hazards take precedence over obstacles when a point lies in both.
    pub fn classify_collision(&self, pos: Vec2) -> Collision {
        if self.hazards.hit(pos) {
            return Collision::Hazard;
        }
        if self.obstacles.hit(pos)
            || self
                .dynamic
                .iter()
                .any(|d| pos.distance(d.center) < d.radius)
        {
            return Collision::Blocked;
        }
        Collision::Clear
    }

    /// Collect with the configured radius.
    pub fn collect(&mut self, pos: Vec2) -> Vec<Collected> {
        self.collect_at(pos, self.collect_radius)
    }

    /// Mark and return every uncollected target strictly within `radius`.
    /// Results come in tier order, then target order within a tier.
    pub fn collect_at(&mut self, pos: Vec2, radius: f64) -> Vec<Collected> {
        let mut collected = Vec::new();
        for tier in Tier::ALL {
            self.hits.clear();
            self.targets
                .get_mut(tier)
                .take_within(pos, radius, &mut self.scratch, &mut self.hits);
            let value = tier.value(&self.tier_values);
            collected.extend(self.hits.iter().map(|_| Collected { tier, value }));
        }
        collected
    }

    /// Redraw every tier inside the placement margin, clear all flags and
    /// advance the epoch counter.
    pub fn reset_targets<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let lo = self.target_margin;
        let hi = self.size - self.target_margin;
        for tier in Tier::ALL {
            let count = self.target_counts.get(tier);
            self.targets.get_mut(tier).scatter(rng, count, lo, hi);
        }
        self.epoch += 1;
    }

    pub fn remaining_counts(&self) -> TierCounts {
        self.targets.remaining()
    }

    pub fn total_counts(&self) -> TierCounts {
        self.targets.totals()
    }
}
