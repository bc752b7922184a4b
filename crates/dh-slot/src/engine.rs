//! Doghouse engine: the spin transaction and session ledger

use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::bonus::BonusState;
use crate::config::GameConfig;
use crate::error::{SlotError, SlotResult};
use crate::grid::GridGenerator;
use crate::spin::SpinResult;

/// Session statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    pub base_spins: u64,
    pub free_spins: u64,
    /// Coins actually debited
    pub total_bet: u64,
    pub total_win: u64,
    pub wins: u64,
    /// Bonus sessions started from the base game
    pub features_triggered: u64,
    /// Free spins awarded while a bonus was already running
    pub retriggers: u64,
    pub max_win: u64,
}

impl SessionStats {
    /// Calculate RTP
    pub fn rtp(&self) -> f64 {
        if self.total_bet > 0 {
            (self.total_win as f64 / self.total_bet as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Calculate hit rate
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            (self.wins as f64 / self.total_spins as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Fold another session's stats into this one
    pub fn merge(&mut self, other: &SessionStats) {
        self.total_spins += other.total_spins;
        self.base_spins += other.base_spins;
        self.free_spins += other.free_spins;
        self.total_bet += other.total_bet;
        self.total_win += other.total_win;
        self.wins += other.wins;
        self.features_triggered += other.features_triggered;
        self.retriggers += other.retriggers;
        self.max_win = self.max_win.max(other.max_win);
    }

    fn record(&mut self, result: &SpinResult) {
        self.total_spins += 1;
        if result.free_spin {
            self.free_spins += 1;
        } else {
            self.base_spins += 1;
        }
        self.total_bet += result.debited;
        self.total_win += result.total_payout;
        if result.is_win() {
            self.wins += 1;
        }
        if result.triggers_feature() {
            if result.free_spin {
                self.retriggers += 1;
            } else {
                self.features_triggered += 1;
            }
        }
        self.max_win = self.max_win.max(result.total_payout);
    }
}

/// Resumable engine state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub balance: u64,
    pub bet_per_line: u32,
    pub bonus: BonusState,
}

/// The Doghouse slot engine.
///
/// Owns the balance, the bet, the bonus state and the random source. Every
/// `spin` is one all-or-nothing transaction: either it fails before touching
/// anything, or balance, bonus state and last result are committed together.
pub struct DoghouseEngine<R = ChaCha8Rng> {
    config: Arc<GameConfig>,
    generator: GridGenerator,
    rng: R,
    balance: u64,
    bet_per_line: u32,
    bonus: BonusState,
    last_result: Option<SpinResult>,
    stats: SessionStats,
}

impl DoghouseEngine<ChaCha8Rng> {
    /// Engine with a fixed seed, for reproducible sessions
    pub fn seeded(config: impl Into<Arc<GameConfig>>, seed: u64) -> SlotResult<Self> {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Engine seeded from the operating system
    pub fn from_os_rng(config: impl Into<Arc<GameConfig>>) -> SlotResult<Self> {
        Self::with_rng(config, ChaCha8Rng::from_os_rng())
    }
}

impl<R: Rng> DoghouseEngine<R> {
    /// Create with an explicit random source. Validates the configuration.
    pub fn with_rng(config: impl Into<Arc<GameConfig>>, rng: R) -> SlotResult<Self> {
        let config = config.into();
        config.validate()?;
        let generator = GridGenerator::new(&config.weights)?;

        Ok(Self {
            balance: config.session.starting_balance,
            bet_per_line: config.session.bet_per_line,
            config,
            generator,
            rng,
            bonus: BonusState::default(),
            last_result: None,
            stats: SessionStats::default(),
        })
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ACCESSORS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn bet_per_line(&self) -> u32 {
        self.bet_per_line
    }

    /// Fixed payline count
    pub fn lines(&self) -> usize {
        self.config.paylines.len()
    }

    pub fn total_bet(&self) -> u64 {
        self.config.total_bet(self.bet_per_line)
    }

    pub fn free_spins_remaining(&self) -> u32 {
        self.bonus.free_spins_remaining
    }

    /// Check if currently in free spins
    pub fn in_free_spins(&self) -> bool {
        self.bonus.is_active()
    }

    pub fn bonus_state(&self) -> &BonusState {
        &self.bonus
    }

    pub fn last_result(&self) -> Option<&SpinResult> {
        self.last_result.as_ref()
    }

    pub fn config(&self) -> &Arc<GameConfig> {
        &self.config
    }

    /// Get session stats
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Reset session stats
    pub fn reset_stats(&mut self) {
        self.stats = SessionStats::default();
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // BETTING
    // ═══════════════════════════════════════════════════════════════════════════

    /// Would `spin` be accepted right now?
    pub fn can_spin(&self) -> bool {
        self.bonus.is_active() || self.balance >= self.total_bet()
    }

    /// Move the bet per line by `delta`, clamped to the configured range
    pub fn change_bet(&mut self, delta: i32) {
        let bet = self
            .config
            .session
            .clamp_bet(i64::from(self.bet_per_line) + i64::from(delta));
        if bet != self.bet_per_line {
            log::debug!("Bet per line {} -> {}", self.bet_per_line, bet);
        }
        self.bet_per_line = bet;
    }

    /// Jump to the max-bet preset
    pub fn max_bet(&mut self) {
        let bet = self.config.session.max_bet_preset;
        if bet != self.bet_per_line {
            log::debug!("Bet per line {} -> {} (max bet)", self.bet_per_line, bet);
        }
        self.bet_per_line = bet;
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN EXECUTION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Execute one spin.
    ///
    /// Base-game spins debit the total bet; spins inside a bonus are free. The
    /// spin that just ran always consumes one free spin if any are left after
    /// adding the spins it awarded.
    pub fn spin(&mut self) -> SlotResult<SpinResult> {
        let total_bet = self.total_bet();
        if !self.can_spin() {
            log::warn!(
                "Spin rejected: balance {} below total bet {}",
                self.balance,
                total_bet
            );
            return Err(SlotError::InsufficientFunds {
                balance: self.balance,
                total_bet,
            });
        }

        let free_spin = self.bonus.is_active();
        let mut balance = if free_spin {
            self.balance
        } else {
            self.balance - total_bet
        };
        let mut bonus = self.bonus.clone();

        let grid = self.generator.generate(&mut self.rng, &mut bonus);
        let paytable = &self.config.paytable;
        let line_wins =
            paytable.evaluate_lines(&grid, &self.config.paylines, u64::from(self.bet_per_line));
        let scatter = paytable.evaluate_scatter(&grid, total_bet);
        let result = SpinResult::new(
            grid,
            line_wins,
            &scatter,
            self.bet_per_line,
            total_bet,
            free_spin,
        );

        balance += result.total_payout;
        bonus.award(result.free_spins_awarded);
        bonus.consume();

        self.log_bonus_transition(&result, &bonus);
        log::debug!(
            "Spin: {} lines won, {} scatters, payout {} (free spin: {})",
            result.line_wins.len(),
            result.scatter_count,
            result.total_payout,
            free_spin
        );

        // Commit
        self.balance = balance;
        self.bonus = bonus;
        self.stats.record(&result);
        self.last_result = Some(result.clone());
        Ok(result)
    }

    fn log_bonus_transition(&self, result: &SpinResult, next: &BonusState) {
        if result.triggers_feature() {
            if result.free_spin {
                log::info!(
                    "Free spins retriggered: +{} ({} left)",
                    result.free_spins_awarded,
                    next.free_spins_remaining
                );
            } else {
                log::info!(
                    "Free spins triggered by {} scatters: {} awarded",
                    result.scatter_count,
                    result.free_spins_awarded
                );
            }
        }
        if result.free_spin && !next.is_active() {
            log::info!(
                "Bonus session ended with {} sticky wilds",
                next.sticky_wilds.len()
            );
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SNAPSHOT
    // ═══════════════════════════════════════════════════════════════════════════

    /// Capture balance, bet and bonus state
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            balance: self.balance,
            bet_per_line: self.bet_per_line,
            bonus: self.bonus.clone(),
        }
    }

    /// Resume from a snapshot. Clears the last result.
    pub fn restore(&mut self, snapshot: &EngineSnapshot) -> SlotResult<()> {
        if !self.config.session.bet_in_range(snapshot.bet_per_line) {
            return Err(SlotError::InvalidSnapshot(format!(
                "bet per line {} outside {}..={}",
                snapshot.bet_per_line, self.config.session.min_bet, self.config.session.max_bet
            )));
        }
        if !snapshot.bonus.sticky_wilds.in_bounds() {
            return Err(SlotError::InvalidSnapshot(
                "sticky wild outside the grid".into(),
            ));
        }

        self.balance = snapshot.balance;
        self.bet_per_line = snapshot.bet_per_line;
        self.bonus = snapshot.bonus.clone();
        self.last_result = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::config::SessionConfig;
    use crate::symbols::{Symbol, SymbolWeights};

    fn engine_with(weights: SymbolWeights) -> DoghouseEngine {
        DoghouseEngine::seeded(GameConfig::default().with_weights(weights), 42).unwrap()
    }

    #[test]
    fn test_engine_creation() {
        let engine = DoghouseEngine::seeded(GameConfig::default(), 1).unwrap();
        assert_eq!(engine.balance(), 1000);
        assert_eq!(engine.bet_per_line(), 1);
        assert_eq!(engine.lines(), 10);
        assert_eq!(engine.total_bet(), 10);
        assert_eq!(engine.free_spins_remaining(), 0);
        assert!(engine.last_result().is_none());
        assert!(engine.can_spin());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = GameConfig::default();
        config.paylines.truncate(3);
        assert!(matches!(
            DoghouseEngine::seeded(config, 1),
            Err(SlotError::Config(_))
        ));
    }

    #[test]
    fn test_change_bet_clamps() {
        let mut engine = DoghouseEngine::seeded(GameConfig::default(), 1).unwrap();
        engine.change_bet(-5);
        assert_eq!(engine.bet_per_line(), 1);
        engine.change_bet(4);
        assert_eq!(engine.bet_per_line(), 5);
        assert_eq!(engine.total_bet(), 50);
        engine.change_bet(1_000);
        assert_eq!(engine.bet_per_line(), 100);
        engine.max_bet();
        assert_eq!(engine.bet_per_line(), 10);
        engine.max_bet();
        assert_eq!(engine.bet_per_line(), 10);
        assert_eq!(engine.total_bet(), 100);
    }

    #[test]
    fn test_losing_base_spin_debits() {
        // Collar everywhere pays 20 × 10 lines = 200 per spin at bet 1
        let mut engine = engine_with(SymbolWeights::only(Symbol::Collar));
        let result = engine.spin().unwrap();
        assert_eq!(result.debited, 10);
        assert_eq!(result.line_wins.len(), 10);
        assert_eq!(result.total_payout, 200);
        assert_eq!(engine.balance(), 1000 - 10 + 200);
        assert_eq!(engine.last_result(), Some(&result));
        assert_relative_eq!(result.win_ratio(), 20.0);
        let lines: Vec<u8> = result.winning_lines().collect();
        assert_eq!(lines, (0..10).collect::<Vec<u8>>());
    }

    #[test]
    fn test_insufficient_funds_leaves_state() {
        let config = GameConfig::default().with_session(SessionConfig {
            starting_balance: 5,
            ..Default::default()
        });
        let mut engine = DoghouseEngine::seeded(config, 9).unwrap();
        assert!(!engine.can_spin());

        let err = engine.spin().unwrap_err();
        assert!(matches!(
            err,
            SlotError::InsufficientFunds {
                balance: 5,
                total_bet: 10
            }
        ));
        assert_eq!(engine.balance(), 5);
        assert_eq!(engine.free_spins_remaining(), 0);
        assert!(engine.last_result().is_none());
        assert_eq!(engine.stats().total_spins, 0);
    }

    #[test]
    fn test_free_spin_ignores_balance() {
        let mut engine = engine_with(SymbolWeights::only(Symbol::Bone));
        engine
            .restore(&EngineSnapshot {
                balance: 0,
                bet_per_line: 1,
                bonus: BonusState::with_free_spins(2),
            })
            .unwrap();
        assert!(engine.can_spin());
        assert!(engine.in_free_spins());

        let result = engine.spin().unwrap();
        assert!(result.free_spin);
        assert_eq!(result.debited, 0);
        // Bone ×5 on every line: 12 × 10
        assert_eq!(engine.balance(), 120);
        assert_eq!(engine.free_spins_remaining(), 1);

        engine.spin().unwrap();
        assert!(!engine.in_free_spins());
        assert_eq!(engine.balance(), 240);
    }

    #[test]
    fn test_trigger_spin_consumes_one() {
        // Fifteen scatters: tier-5 rates, 15 free spins
        let mut engine = engine_with(SymbolWeights::only(Symbol::Scatter));
        let result = engine.spin().unwrap();
        assert_eq!(result.scatter_count, 15);
        assert_eq!(result.scatter_payout, 50 * 10);
        assert_eq!(result.free_spins_awarded, 15);
        assert!(result.line_wins.is_empty());
        assert_eq!(engine.free_spins_remaining(), 14);
        assert_eq!(engine.stats().features_triggered, 1);

        // Retrigger inside the bonus adds 15 and consumes one
        let result = engine.spin().unwrap();
        assert!(result.free_spin);
        assert_eq!(engine.free_spins_remaining(), 14 + 15 - 1);
        assert_eq!(engine.stats().retriggers, 1);
    }

    #[test]
    fn test_restore_validation() {
        let mut engine = DoghouseEngine::seeded(GameConfig::default(), 1).unwrap();
        let mut snapshot = engine.snapshot();
        snapshot.bet_per_line = 0;
        assert!(matches!(
            engine.restore(&snapshot),
            Err(SlotError::InvalidSnapshot(_))
        ));

        let mut snapshot = engine.snapshot();
        snapshot.bonus.sticky_wilds.insert(0, 3);
        assert!(engine.restore(&snapshot).is_err());
    }

    #[test]
    fn test_session_stats() {
        let mut engine = DoghouseEngine::seeded(GameConfig::default(), 11111).unwrap();
        for _ in 0..50 {
            engine.spin().unwrap();
        }

        let stats = engine.stats();
        assert_eq!(stats.total_spins, 50);
        assert_eq!(stats.base_spins + stats.free_spins, 50);
        assert_eq!(stats.total_bet, stats.base_spins * 10);
        assert!(stats.hit_rate() <= 100.0);

        engine.reset_stats();
        assert_eq!(engine.stats().total_spins, 0);
    }

    #[test]
    fn test_stats_merge_and_ratios() {
        let mut a = SessionStats {
            total_spins: 4,
            base_spins: 4,
            total_bet: 40,
            total_win: 30,
            wins: 1,
            max_win: 30,
            ..Default::default()
        };
        let b = SessionStats {
            total_spins: 4,
            base_spins: 2,
            free_spins: 2,
            total_bet: 20,
            total_win: 60,
            wins: 3,
            features_triggered: 1,
            max_win: 45,
            ..Default::default()
        };
        a.merge(&b);

        assert_eq!(a.total_spins, 8);
        assert_eq!(a.max_win, 45);
        assert_eq!(a.features_triggered, 1);
        assert_relative_eq!(a.rtp(), 150.0);
        assert_relative_eq!(a.hit_rate(), 50.0);
        assert_relative_eq!(SessionStats::default().rtp(), 0.0);
    }
}
