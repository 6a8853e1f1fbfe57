// grid.rs: dense bucket index over the square arena.
//
// Used for populations that are static within an epoch (obstacles, hazards,
// targets). Rebuild: one O(N) count pass, prefix sum, one scatter pass.
// No per-cell Vec, so no heap fragmentation.

use crate::core::math::Vec2;

pub struct BucketGrid {
    /// `counts[c]` = members in cell c, `offsets[c]` = start of cell c in `data`.
    counts: Vec<u32>,
    offsets: Vec<u32>,
    data: Vec<u32>,
    cols: usize,
    cell_size: f64,
    /// Largest member radius; queries widen by this much.
    reach: f64,
}

impl BucketGrid {
    pub fn new(arena_size: f64, cols: usize) -> Self {
        let cols = cols.max(1);
        let cell_size = if arena_size > 0.0 {
            arena_size / cols as f64
        } else {
            1.0
        };
        BucketGrid {
            counts: vec![0u32; cols * cols],
            offsets: vec![0u32; cols * cols],
            data: Vec::new(),
            cols,
            cell_size,
            reach: 0.0,
        }
    }

    #[inline]
    fn axis_cell(&self, v: f64) -> usize {
        let c = (v / self.cell_size).floor();
        if c.is_nan() || c < 0.0 {
            0
        } else {
            (c as usize).min(self.cols - 1)
        }
    }

    #[inline]
    fn cell_of(&self, p: Vec2) -> usize {
        self.axis_cell(p.y) * self.cols + self.axis_cell(p.x)
    }

    /// Full rebuild from member centers. `reach` is the largest member radius.
    pub fn rebuild(&mut self, centers: &[Vec2], reach: f64) {
        self.reach = reach.max(0.0);
        self.data.clear();
        self.data.resize(centers.len(), 0);

        // ── Pass 1: count ────────────────────────────────────────────────────
        self.counts.iter_mut().for_each(|c| *c = 0);
        for &p in centers {
            let c = self.cell_of(p);
            self.counts[c] += 1;
        }

        // ── Prefix sum → offsets ─────────────────────────────────────────────
        let mut running = 0u32;
        for (offset, count) in self.offsets.iter_mut().zip(self.counts.iter()) {
            *offset = running;
            running += count;
        }

        // ── Pass 2: scatter ──────────────────────────────────────────────────
        self.counts.iter_mut().for_each(|c| *c = 0); // reuse as cursor
        for (i, &p) in centers.iter().enumerate() {
            let c = self.cell_of(p);
            let slot = (self.offsets[c] + self.counts[c]) as usize;
            self.data[slot] = i as u32;
            self.counts[c] += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Visit every member whose cell overlaps the disc of radius `r`
    /// (widened by `reach`) around `q`.
    ///
    /// This is a conservative filter: callers MUST still do the exact
    /// distance test. Visit order is by cell, not by member index.
    #[inline]
    pub fn query_radius<F>(&self, q: Vec2, r: f64, mut callback: F)
    where
        F: FnMut(u32),
    {
        if self.data.is_empty() {
            return;
        }
        let r = r + self.reach;
        let (x0, x1) = (self.axis_cell(q.x - r), self.axis_cell(q.x + r));
        let (y0, y1) = (self.axis_cell(q.y - r), self.axis_cell(q.y + r));

        for cy in y0..=y1 {
            for cx in x0..=x1 {
                let c = cy * self.cols + cx;
                let start = self.offsets[c] as usize;
                let end = start + self.counts[c] as usize;
                for &idx in &self.data[start..end] {
                    callback(idx);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebuild_indexes_every_member_once() {
        let centers: Vec<Vec2> = (0..200)
            .map(|i| Vec2::new((i * 7 % 500) as f64, (i * 13 % 500) as f64))
            .collect();
        let mut grid = BucketGrid::new(500.0, 20);
        grid.rebuild(&centers, 0.0);
        assert_eq!(grid.len(), 200);

        let mut seen = vec![0u32; 200];
        grid.query_radius(Vec2::new(250.0, 250.0), 1000.0, |i| seen[i as usize] += 1);
        assert!(seen.iter().all(|&n| n == 1));
    }

    #[test]
    fn query_finds_members_within_reach() {
        // Member center is 20 away but its radius of 15 overlaps a probe at 12.
        let centers = vec![Vec2::new(100.0, 100.0), Vec2::new(400.0, 400.0)];
        let mut grid = BucketGrid::new(500.0, 50);
        grid.rebuild(&centers, 15.0);

        let mut found = Vec::new();
        grid.query_radius(Vec2::new(120.0, 100.0), 0.0, |i| found.push(i));
        assert!(found.contains(&0));
        assert!(!found.contains(&1));
    }

    #[test]
    fn out_of_arena_probe_is_clamped() {
        let centers = vec![Vec2::new(499.0, 0.5)];
        let mut grid = BucketGrid::new(500.0, 10);
        grid.rebuild(&centers, 0.0);
        let mut found = 0;
        grid.query_radius(Vec2::new(1e6, -1e6), 1.0, |_| found += 1);
        assert_eq!(found, 1);
    }

    #[test]
    fn empty_grid_visits_nothing() {
        let grid = BucketGrid::new(500.0, 10);
        let mut found = 0;
        grid.query_radius(Vec2::new(10.0, 10.0), 100.0, |_| found += 1);
        assert_eq!(found, 0);
        assert!(grid.is_empty());
    }
}
