//! Collectible target tiers.

use super::grid::BucketGrid;
use crate::core::config::TierValues;
use crate::core::math::Vec2;
use crate::core::rng::uniform_point;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::Index;

const INDEX_COLS: usize = 25;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Regular,
    Golden,
    Mega,
}

impl Tier {
    /// Collection order used by `Environment::collect_at`.
    pub const ALL: [Tier; 3] = [Tier::Regular, Tier::Golden, Tier::Mega];

    pub fn value(self, values: &TierValues) -> u64 {
        match self {
            Tier::Regular => values.regular,
            Tier::Golden => values.golden,
            Tier::Mega => values.mega,
        }
    }

    fn slot(self) -> usize {
        match self {
            Tier::Regular => 0,
            Tier::Golden => 1,
            Tier::Mega => 2,
        }
    }
}

/// One target picked up during an update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collected {
    pub tier: Tier,
    pub value: u64,
}

/// Per-tier tallies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub regular: usize,
    pub golden: usize,
    pub mega: usize,
}

impl TierCounts {
    pub fn add(&mut self, tier: Tier) {
        match tier {
            Tier::Regular => self.regular += 1,
            Tier::Golden => self.golden += 1,
            Tier::Mega => self.mega += 1,
        }
    }

    pub fn get(&self, tier: Tier) -> usize {
        match tier {
            Tier::Regular => self.regular,
            Tier::Golden => self.golden,
            Tier::Mega => self.mega,
        }
    }

    /// Weighted sum of the tallies.
    pub fn total_value(&self, values: &TierValues) -> u64 {
        Tier::ALL
            .iter()
            .map(|&t| self.get(t) as u64 * t.value(values))
            .sum()
    }

    pub fn total(&self) -> usize {
        self.regular + self.golden + self.mega
    }
}

/// Positions and collected flags of one tier.
pub struct TargetSet {
    positions: Vec<Vec2>,
    collected: Vec<bool>,
    remaining: usize,
    index: BucketGrid,
}

impl TargetSet {
    pub fn new(arena_size: f64) -> Self {
        TargetSet {
            positions: Vec::new(),
            collected: Vec::new(),
            remaining: 0,
            index: BucketGrid::new(arena_size, INDEX_COLS),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    pub fn is_collected(&self, i: usize) -> bool {
        self.collected[i]
    }

    /// Redraw `count` positions uniformly in `[lo, hi)²` and clear every flag.
    pub fn scatter<R: Rng + ?Sized>(&mut self, rng: &mut R, count: usize, lo: f64, hi: f64) {
        self.positions.clear();
        self.positions
            .extend((0..count).map(|_| uniform_point(&mut *rng, lo, hi)));
        self.collected.clear();
        self.collected.resize(count, false);
        self.remaining = count;
        self.index.rebuild(&self.positions, 0.0);
    }

    /// Append one uncollected target.
    pub fn push(&mut self, pos: Vec2) {
        self.positions.push(pos);
        self.collected.push(false);
        self.remaining += 1;
        self.index.rebuild(&self.positions, 0.0);
    }

    /// Mark every uncollected target strictly within `radius` of `pos`,
    /// appending their indices to `out` in ascending order.
    pub fn take_within(
        &mut self,
        pos: Vec2,
        radius: f64,
        scratch: &mut Vec<u32>,
        out: &mut Vec<usize>,
    ) {
        scratch.clear();
        self.index.query_radius(pos, radius, |i| scratch.push(i));
        scratch.sort_unstable();
        for &i in scratch.iter() {
            let i = i as usize;
            if !self.collected[i] && pos.distance(self.positions[i]) < radius {
                self.collected[i] = true;
                self.remaining -= 1;
                out.push(i);
            }
        }
    }
}

/// The three tier populations, indexable by [`Tier`].
pub struct TargetTiers {
    sets: [TargetSet; 3],
}

impl TargetTiers {
    pub fn new(arena_size: f64) -> Self {
        TargetTiers {
            sets: [
                TargetSet::new(arena_size),
                TargetSet::new(arena_size),
                TargetSet::new(arena_size),
            ],
        }
    }

    pub fn get_mut(&mut self, tier: Tier) -> &mut TargetSet {
        &mut self.sets[tier.slot()]
    }

    pub fn remaining(&self) -> TierCounts {
        TierCounts {
            regular: self[Tier::Regular].remaining(),
            golden: self[Tier::Golden].remaining(),
            mega: self[Tier::Mega].remaining(),
        }
    }

    pub fn totals(&self) -> TierCounts {
        TierCounts {
            regular: self[Tier::Regular].len(),
            golden: self[Tier::Golden].len(),
            mega: self[Tier::Mega].len(),
        }
    }
}

impl Index<Tier> for TargetTiers {
    type Output = TargetSet;

    fn index(&self, tier: Tier) -> &TargetSet {
        &self.sets[tier.slot()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::seeded;

    #[test]
    fn weighted_total_uses_tier_values() {
        let counts = TierCounts {
            regular: 3,
            golden: 2,
            mega: 1,
        };
        assert_eq!(counts.total_value(&TierValues::default()), 3 + 20 + 100);
        assert_eq!(counts.total(), 6);
    }

    #[test]
    fn scatter_clears_flags_and_stays_in_margin() {
        let mut rng = seeded(3);
        let mut set = TargetSet::new(500.0);
        set.scatter(&mut rng, 100, 10.0, 490.0);
        let mut out = Vec::new();
        let mut scratch = Vec::new();
        let first = set.positions()[0];
        set.take_within(first, 1.0, &mut scratch, &mut out);
        assert!(out.contains(&0));
        assert_eq!(set.remaining(), 100 - out.len());

        set.scatter(&mut rng, 100, 10.0, 490.0);
        assert_eq!(set.remaining(), 100);
        assert!((0..100).all(|i| !set.is_collected(i)));
        assert!(set
            .positions()
            .iter()
            .all(|p| p.x >= 10.0 && p.x < 490.0 && p.y >= 10.0 && p.y < 490.0));
    }

    #[test]
    fn take_within_never_collects_twice() {
        let mut set = TargetSet::new(500.0);
        set.push(Vec2::new(50.0, 50.0));
        set.push(Vec2::new(55.0, 50.0));
        set.push(Vec2::new(70.0, 50.0));
        let mut scratch = Vec::new();
        let mut out = Vec::new();
        set.take_within(Vec2::new(50.0, 50.0), 12.0, &mut scratch, &mut out);
        assert_eq!(out, vec![0, 1]);

        out.clear();
        set.take_within(Vec2::new(50.0, 50.0), 12.0, &mut scratch, &mut out);
        assert!(out.is_empty());
        assert_eq!(set.remaining(), 1);
    }

    #[test]
    fn radius_is_strict() {
        let mut set = TargetSet::new(500.0);
        set.push(Vec2::new(112.0, 100.0));
        let mut scratch = Vec::new();
        let mut out = Vec::new();
        set.take_within(Vec2::new(100.0, 100.0), 12.0, &mut scratch, &mut out);
        assert!(out.is_empty());
    }
}
