use crate::core::config::BehaviorConfig;
use crate::core::math::Vec2;

/// Integer cell coordinates inside a [`PheromoneField`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

/// Single-channel scent grid laid uniformly over the arena.
///
/// Each agent owns one of these as a private memory of where it has been
/// successful. Values are capped on deposit and shrink geometrically on every
/// read, so stale trails fade without any global tick.
#[derive(Clone, Debug)]
pub struct PheromoneField {
    data: Box<[f64]>,
    resolution: usize,
    cell_size: f64,
    cap: f64,
    decay: f64,
    gate: f64,
    gain: f64,
}

impl PheromoneField {
    pub fn new(arena_size: f64, behavior: &BehaviorConfig) -> Self {
        let resolution = behavior.field_resolution.max(1);
        Self {
            data: vec![0.0; resolution * resolution].into_boxed_slice(),
            resolution,
            cell_size: arena_size / resolution as f64,
            cap: behavior.trail_cap,
            decay: behavior.trail_decay,
            gate: behavior.trail_gate,
            gain: behavior.trail_gain,
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    #[inline]
    fn index(&self, cell: Cell) -> usize {
        cell.y * self.resolution + cell.x
    }

    /// Cell containing `pos`, clamped into the grid for any input.
    pub fn cell_of(&self, pos: Vec2) -> Cell {
        let max = (self.resolution - 1) as f64;
        let to_cell = |v: f64| {
            let c = (v / self.cell_size).floor();
            // NaN falls through both comparisons of clamp; pin it to 0.
            if c.is_nan() {
                0
            } else {
                c.clamp(0.0, max) as usize
            }
        };
        Cell {
            x: to_cell(pos.x),
            y: to_cell(pos.y),
        }
    }

    pub fn value(&self, cell: Cell) -> f64 {
        self.data[self.index(cell)]
    }

    /// Add `amount` to a cell, saturating at the cap.
    pub fn deposit(&mut self, cell: Cell, amount: f64) {
        let idx = self.index(cell);
        self.data[idx] = (self.data[idx] + amount).min(self.cap);
    }

    /// Step toward the strongest of the eight surrounding cells, scaled by the
    /// center value. Zero when the center is at or below the gate or when no
    /// neighbor holds a positive value.
    pub fn gradient_at(&self, cell: Cell) -> Vec2 {
        let center = self.value(cell);
        if center <= self.gate {
            return Vec2::ZERO;
        }

        let mut best_val = 0.0;
        let mut best_dir = None;
        for dx in -1i64..=1 {
            for dy in -1i64..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = cell.x as i64 + dx;
                let ny = cell.y as i64 + dy;
                if nx < 0 || ny < 0 || nx >= self.resolution as i64 || ny >= self.resolution as i64
                {
                    continue;
                }
                let val = self.value(Cell {
                    x: nx as usize,
                    y: ny as usize,
                });
                if val > best_val {
                    best_val = val;
                    best_dir = Some(Vec2::new(dx as f64, dy as f64));
                }
            }
        }

        match best_dir {
            Some(dir) => dir * (center * self.gain),
            None => Vec2::ZERO,
        }
    }

    /// Age every cell by one read.
    pub fn decay(&mut self) {
        let k = self.decay;
        self.data.iter_mut().for_each(|v| *v *= k);
    }

    pub fn total(&self) -> f64 {
        self.data.iter().sum()
    }
}
