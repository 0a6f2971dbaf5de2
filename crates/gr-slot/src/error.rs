//! Error types for the slot engine

use thiserror::Error;

/// Rejected player actions. None of these alter session state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Insufficient funds: balance {balance}, stake {stake}")]
    InsufficientFunds { balance: u64, stake: u64 },

    #[error("A spin is already in progress")]
    SpinInProgress,

    #[error("Bonus round must be collected first")]
    BonusPending,

    #[error("No spin in progress")]
    NoSpinInProgress,

    #[error("No bonus round to collect")]
    NoBonusPending,

    #[error("Bet {requested} outside allowed range {min}..={max}")]
    BetOutOfRange { requested: i64, min: u64, max: u64 },
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Result type for player actions
pub type GameResult<T> = Result<T, GameError>;
