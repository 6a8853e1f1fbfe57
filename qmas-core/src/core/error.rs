use thiserror::Error;

/// Result type for fallible construction paths.
pub type SimResult<T> = Result<T, SimError>;

/// Rejected tunables. Raised at construction, never mid-epoch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("arena size must be positive and finite, got {0}")]
    InvalidArenaSize(f64),
    #[error("{name} margin {margin} leaves no room in an arena of size {size}")]
    MarginTooLarge {
        name: &'static str,
        margin: f64,
        size: f64,
    },
    #[error("{name} range [{lo}, {hi}) is invalid")]
    InvalidRange { name: &'static str, lo: f64, hi: f64 },
    #[error("field resolution must be at least 1")]
    InvalidFieldResolution,
    #[error("{name} must be non-negative and finite, got {value}")]
    NegativeParameter { name: &'static str, value: f64 },
    #[error("{name} must be finite, got {value}")]
    NonFiniteParameter { name: &'static str, value: f64 },
    #[error("probability {name} must lie in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },
    #[error("{name} must be at least 1")]
    ZeroInterval { name: &'static str },
}

/// Top-level error for the simulation crate.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
