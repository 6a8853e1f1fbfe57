//! Neighbor Lookup
//!
//! Linear scan over the live population. Agents updated earlier in the same
//! timestep are seen at their new positions, so the query must be issued
//! fresh for every agent rather than from a per-tick snapshot.

use super::agent::Agent;
use crate::core::math::Vec2;

/// Positions of every other agent strictly within `radius` of `agents[idx]`.
pub fn neighbor_positions(agents: &[Agent], idx: usize, radius: f64) -> Vec<Vec2> {
    let mut out = Vec::new();
    neighbor_positions_into(agents, idx, radius, &mut out);
    out
}

/// Same as [`neighbor_positions`], reusing `out`.
pub fn neighbor_positions_into(agents: &[Agent], idx: usize, radius: f64, out: &mut Vec<Vec2>) {
    out.clear();
    let Some(me) = agents.get(idx) else {
        return;
    };
    let p = me.position();
    out.extend(
        agents
            .iter()
            .enumerate()
            .filter(|&(j, other)| j != idx && p.distance(other.position()) < radius)
            .map(|(_, other)| other.position()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::BehaviorConfig;

    fn agents(points: &[(f64, f64)]) -> Vec<Agent> {
        let b = BehaviorConfig::default();
        points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Agent::new(i, Vec2::new(x, y), 500.0, &b))
            .collect()
    }

    #[test]
    fn excludes_self_and_far_agents() {
        let pop = agents(&[(100.0, 100.0), (130.0, 100.0), (300.0, 300.0)]);
        let n = neighbor_positions(&pop, 0, 60.0);
        assert_eq!(n, vec![Vec2::new(130.0, 100.0)]);
    }

    #[test]
    fn radius_is_strict() {
        let pop = agents(&[(100.0, 100.0), (160.0, 100.0)]);
        assert!(neighbor_positions(&pop, 0, 60.0).is_empty());
    }

    #[test]
    fn coincident_agents_are_neighbors() {
        let pop = agents(&[(50.0, 50.0), (50.0, 50.0)]);
        assert_eq!(neighbor_positions(&pop, 1, 60.0).len(), 1);
    }

    #[test]
    fn out_of_range_index_is_empty() {
        let pop = agents(&[(50.0, 50.0)]);
        assert!(neighbor_positions(&pop, 4, 60.0).is_empty());
        assert!(neighbor_positions(&[], 0, 60.0).is_empty());
    }
}
