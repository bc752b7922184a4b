//! Spin result value objects

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::symbols::Symbol;

/// A win on a single payline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineWin {
    /// Payline index (0-based)
    pub line_index: u8,
    /// Symbol the run was scored as
    pub base_symbol: Symbol,
    /// Number of matching symbols from the leftmost reel
    pub run_length: u8,
    /// Wilds inside the run
    pub wild_count: u8,
    /// Paytable multiplier × 2^wild_count
    pub effective_multiplier: u64,
    /// effective_multiplier × bet per line
    pub payout_coins: u64,
    /// Positions of the run (reel, row)
    pub positions: Vec<(u8, u8)>,
}

/// Scatter evaluation for one grid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScatterWin {
    /// Scatters anywhere on the grid
    pub count: u8,
    /// Total bet multiplier (0 below the lowest tier)
    pub multiplier: u32,
    /// multiplier × total bet
    pub payout: u64,
    /// Free spins this count awards
    pub free_spins_awarded: u32,
    /// Positions of scatters
    pub positions: Vec<(u8, u8)>,
}

impl ScatterWin {
    /// Did the scatter count reach a free spin tier?
    pub fn triggers_feature(&self) -> bool {
        self.free_spins_awarded > 0
    }
}

/// Complete outcome of one spin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinResult {
    /// Grid the spin landed on
    pub grid: Grid,
    /// Winning lines, ordered by line index
    pub line_wins: Vec<LineWin>,
    /// Scatters anywhere on the grid
    pub scatter_count: u8,
    /// Scatter win in coins
    pub scatter_payout: u64,
    /// scatter_payout + Σ line payouts
    pub total_payout: u64,
    /// Bet per line in force for this spin
    pub bet_per_line: u32,
    /// Total bet for this spin
    pub total_bet: u64,
    /// Amount taken from the balance (0 on free spins)
    pub debited: u64,
    /// Did this spin run inside a bonus session?
    pub free_spin: bool,
    /// Free spins awarded by this spin's scatters
    pub free_spins_awarded: u32,
}

impl SpinResult {
    pub(crate) fn new(
        grid: Grid,
        line_wins: Vec<LineWin>,
        scatter: &ScatterWin,
        bet_per_line: u32,
        total_bet: u64,
        free_spin: bool,
    ) -> Self {
        let line_total: u64 = line_wins.iter().map(|w| w.payout_coins).sum();
        Self {
            grid,
            line_wins,
            scatter_count: scatter.count,
            scatter_payout: scatter.payout,
            total_payout: line_total + scatter.payout,
            bet_per_line,
            total_bet,
            debited: if free_spin { 0 } else { total_bet },
            free_spin,
            free_spins_awarded: scatter.free_spins_awarded,
        }
    }

    /// Sum of line payouts
    pub fn line_payout(&self) -> u64 {
        self.line_wins.iter().map(|w| w.payout_coins).sum()
    }

    /// Check if this is a winning spin
    pub fn is_win(&self) -> bool {
        self.total_payout > 0
    }

    /// Did this spin award free spins?
    pub fn triggers_feature(&self) -> bool {
        self.free_spins_awarded > 0
    }

    /// Win-to-total-bet ratio
    pub fn win_ratio(&self) -> f64 {
        if self.total_bet > 0 {
            self.total_payout as f64 / self.total_bet as f64
        } else {
            0.0
        }
    }

    /// Lines that won, for highlighting
    pub fn winning_lines(&self) -> impl Iterator<Item = u8> + '_ {
        self.line_wins.iter().map(|w| w.line_index)
    }
}
