//! Error types for the Doghouse engine

use thiserror::Error;

use crate::symbols::Symbol;

/// Malformed configuration. Raised once, when an engine or simulator is built.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Symbol weight table is empty or sums to zero")]
    EmptyWeights,

    #[error("Symbol weight table rejected: {0}")]
    Weights(String),

    #[error("Expected {expected} paylines, found {actual}")]
    PaylineCount { expected: usize, actual: usize },

    #[error("Payline {line} has {actual} positions, expected {expected}")]
    PaylineLength {
        line: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Payline {line} points at row {row} on reel {reel}, outside the grid")]
    PaylineRow { line: usize, reel: usize, row: u8 },

    #[error("Paytable defines line pays for non-paying symbol {0}")]
    SpecialSymbolPays(Symbol),

    #[error("Paytable entry for {symbol} uses run length {run}, allowed 3..=5")]
    RunLength { symbol: Symbol, run: u8 },

    #[error("Paytable has no line pays")]
    EmptyPaytable,

    #[error("{table} table has tier at count {count}, expected 3 or more")]
    Tier { table: &'static str, count: u8 },

    #[error("Bet range invalid: min {min}, max {max}, default {default}")]
    BetRange { min: u32, max: u32, default: u32 },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Engine error type
#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Insufficient funds: balance {balance}, total bet {total_bet}")]
    InsufficientFunds { balance: u64, total_bet: u64 },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Result type alias
pub type SlotResult<T> = Result<T, SlotError>;
