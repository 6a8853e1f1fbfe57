//! Shared building blocks: configuration, errors, vector math, randomness.

pub mod config;
pub mod error;
pub mod math;
pub mod rng;
