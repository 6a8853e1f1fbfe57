//! Planar vector math used for positions, velocities and forces.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub};

/// Two-component real vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Vec2 { x, y }
    }

    #[inline]
    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn distance(self, other: Vec2) -> f64 {
        (self - other).norm()
    }

    /// Clamp each component independently into `[lo, hi]`.
    #[inline]
    pub fn clip(self, lo: f64, hi: f64) -> Self {
        Vec2::new(self.x.clamp(lo, hi), self.y.clamp(lo, hi))
    }

    /// Rescale to at most `max_len`, leaving shorter vectors untouched.
    pub fn clip_norm(self, max_len: f64) -> Self {
        let len = self.norm();
        if len > max_len && len > 0.0 {
            self * (max_len / len)
        } else {
            self
        }
    }

    /// Unit vector, or `None` when the length is too small to divide by.
    pub fn normalized(self) -> Option<Self> {
        let len = self.norm();
        if len > f64::EPSILON && len.is_finite() {
            Some(self * (1.0 / len))
        } else {
            None
        }
    }

    /// Arithmetic mean of a set of points. Empty input yields `None`.
    pub fn centroid<I: IntoIterator<Item = Vec2>>(points: I) -> Option<Vec2> {
        let mut sum = Vec2::ZERO;
        let mut n = 0usize;
        for p in points {
            sum += p;
            n += 1;
        }
        (n > 0).then(|| sum * (1.0 / n as f64))
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, k: f64) -> Vec2 {
        Vec2::new(self.x * k, self.y * k)
    }
}

impl MulAssign<f64> for Vec2 {
    #[inline]
    fn mul_assign(&mut self, k: f64) {
        self.x *= k;
        self.y *= k;
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl From<[f64; 2]> for Vec2 {
    fn from(v: [f64; 2]) -> Self {
        Vec2::new(v[0], v[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_is_per_component() {
        let v = Vec2::new(30.0, -40.0).clip(-15.0, 15.0);
        assert_eq!(v, Vec2::new(15.0, -15.0));
    }

    #[test]
    fn clip_norm_preserves_direction() {
        let v = Vec2::new(3.0, 4.0).clip_norm(1.0);
        assert!((v.norm() - 1.0).abs() < 1e-12);
        assert!((v.x - 0.6).abs() < 1e-12);
        assert_eq!(Vec2::new(0.1, 0.1).clip_norm(1.0), Vec2::new(0.1, 0.1));
    }

    #[test]
    fn normalized_rejects_zero_length() {
        assert!(Vec2::ZERO.normalized().is_none());
        let u = Vec2::new(0.0, -2.0).normalized().unwrap();
        assert_eq!(u, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn centroid_of_empty_set_is_none() {
        assert!(Vec2::centroid(std::iter::empty()).is_none());
        let c = Vec2::centroid([Vec2::new(0.0, 0.0), Vec2::new(2.0, 4.0)]).unwrap();
        assert_eq!(c, Vec2::new(1.0, 2.0));
    }
}
