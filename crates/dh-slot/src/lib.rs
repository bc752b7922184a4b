//! # dh-slot: Doghouse slot engine
//!
//! Deterministic payout engine for the Doghouse 5×3 slot: weighted grid
//! draws, ten fixed paylines with wild substitution and ×2-per-wild
//! multipliers, scatter pays, and a free spin bonus with sticky wilds.
//!
//! ## Architecture
//!
//! ```text
//! DoghouseEngine (balance, bet, BonusState, injected Rng)
//!     │
//!     ├── GridGenerator (SymbolWeights + sticky overlay)
//!     ├── PayTable::evaluate_lines (Paylines, wild doubling)
//!     └── PayTable::evaluate_scatter (scatter pays, free spin tiers)
//!           │
//!           v
//!     SpinResult
//! ```
//!
//! Configuration (`GameConfig`) is validated once when an engine is built and
//! shared read-only afterwards.

pub mod bonus;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod paytable;
pub mod sim;
pub mod spin;
pub mod symbols;

pub use bonus::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use grid::*;
pub use paytable::*;
pub use sim::*;
pub use spin::*;
pub use symbols::*;
