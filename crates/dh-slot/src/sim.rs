//! Batch spin simulator
//!
//! Runs many independent, seeded sessions in parallel and merges their
//! statistics. Each session owns its own engine, so results depend only on
//! the base seed, never on thread scheduling.

use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::engine::{DoghouseEngine, SessionStats};
use crate::error::SlotResult;

/// Simulation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Number of independent sessions
    pub sessions: u32,
    /// Spin limit per session
    pub spins_per_session: u64,
    /// Base seed; session `i` uses `seed + i`
    pub seed: u64,
    /// Balance each session starts with (None = config default)
    pub starting_balance: Option<u64>,
    /// Bet per line (None = config default)
    pub bet_per_line: Option<u32>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            sessions: 100,
            spins_per_session: 1_000,
            seed: 0,
            starting_balance: None,
            bet_per_line: None,
        }
    }
}

/// Outcome of a single simulated session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub seed: u64,
    pub stats: SessionStats,
    pub final_balance: u64,
    /// Ran out of funds before reaching the spin limit
    pub busted: bool,
}

/// Aggregated simulation report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimReport {
    pub sessions: u32,
    pub busted_sessions: u32,
    pub stats: SessionStats,
    pub rtp: f64,
    pub hit_rate: f64,
    pub average_final_balance: f64,
}

/// Run one session to its spin limit or until it can no longer spin
pub fn run_session(
    config: Arc<GameConfig>,
    sim: &SimConfig,
    seed: u64,
) -> SlotResult<SessionOutcome> {
    let mut engine = DoghouseEngine::seeded(config, seed)?;
    let mut snapshot = engine.snapshot();
    if let Some(balance) = sim.starting_balance {
        snapshot.balance = balance;
    }
    if let Some(bet) = sim.bet_per_line {
        snapshot.bet_per_line = bet;
    }
    engine.restore(&snapshot)?;

    let mut busted = false;
    for _ in 0..sim.spins_per_session {
        if !engine.can_spin() {
            busted = true;
            break;
        }
        engine.spin()?;
    }

    Ok(SessionOutcome {
        seed,
        stats: engine.stats().clone(),
        final_balance: engine.balance(),
        busted,
    })
}

/// Run all sessions in parallel and merge them in seed order
pub fn simulate(config: &GameConfig, sim: &SimConfig) -> SlotResult<SimReport> {
    config.validate()?;
    let config = Arc::new(config.clone());
    log::info!(
        "Simulating {} sessions × {} spins (seed {})",
        sim.sessions,
        sim.spins_per_session,
        sim.seed
    );

    let outcomes: Vec<SessionOutcome> = (0..sim.sessions)
        .into_par_iter()
        .map(|i| run_session(Arc::clone(&config), sim, sim.seed.wrapping_add(u64::from(i))))
        .collect::<SlotResult<_>>()?;

    let mut stats = SessionStats::default();
    for outcome in &outcomes {
        stats.merge(&outcome.stats);
    }
    let busted_sessions = outcomes.iter().filter(|o| o.busted).count() as u32;
    let average_final_balance = if outcomes.is_empty() {
        0.0
    } else {
        outcomes.iter().map(|o| o.final_balance as f64).sum::<f64>() / outcomes.len() as f64
    };

    log::info!(
        "Simulation done: RTP {:.2}%, hit rate {:.2}%, {} busted",
        stats.rtp(),
        stats.hit_rate(),
        busted_sessions
    );

    Ok(SimReport {
        sessions: sim.sessions,
        busted_sessions,
        rtp: stats.rtp(),
        hit_rate: stats.hit_rate(),
        average_final_balance,
        stats,
    })
}
