//! Paytable, paylines and win evaluation

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{REELS, ROWS};
use crate::error::ConfigError;
use crate::grid::Grid;
use crate::spin::{LineWin, ScatterWin};
use crate::symbols::Symbol;

/// Shortest run that can pay
pub const MIN_RUN: u8 = 3;

/// A payline definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payline {
    /// Row positions for each reel (e.g., [1, 0, 0, 0, 1] for a "V" shape)
    pub positions: Vec<u8>,
}

impl Payline {
    pub fn new(positions: &[u8]) -> Self {
        Self {
            positions: positions.to_vec(),
        }
    }

    /// Create a straight line (same row across all reels)
    pub fn straight(row: u8) -> Self {
        Self::new(&[row; REELS])
    }

    /// Grid cells covered by this line, in reel order
    pub fn cells(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.positions
            .iter()
            .enumerate()
            .map(|(reel, &row)| (reel as u8, row))
    }

    fn validate(&self, line: usize) -> Result<(), ConfigError> {
        if self.positions.len() != REELS {
            return Err(ConfigError::PaylineLength {
                line,
                expected: REELS,
                actual: self.positions.len(),
            });
        }
        if let Some((reel, &row)) = self
            .positions
            .iter()
            .enumerate()
            .find(|&(_, &row)| row as usize >= ROWS)
        {
            return Err(ConfigError::PaylineRow { line, reel, row });
        }
        Ok(())
    }
}

/// The ten fixed Doghouse paylines
pub fn standard_10_paylines() -> Vec<Payline> {
    vec![
        Payline::straight(1), // Middle
        Payline::straight(0), // Top
        Payline::straight(2), // Bottom
        // V shapes
        Payline::new(&[0, 1, 2, 1, 0]),
        Payline::new(&[2, 1, 0, 1, 2]),
        // Dips
        Payline::new(&[0, 0, 1, 0, 0]),
        Payline::new(&[2, 2, 1, 2, 2]),
        Payline::new(&[1, 0, 0, 0, 1]),
        Payline::new(&[1, 2, 2, 2, 1]),
        // Diagonal
        Payline::new(&[0, 1, 2, 2, 2]),
    ]
}

/// Validate a payline set against the fixed line count and grid shape
pub fn validate_paylines(paylines: &[Payline], expected: usize) -> Result<(), ConfigError> {
    if paylines.len() != expected {
        return Err(ConfigError::PaylineCount {
            expected,
            actual: paylines.len(),
        });
    }
    for (line, payline) in paylines.iter().enumerate() {
        payline.validate(line)?;
    }
    Ok(())
}

/// Line pays, scatter pays and free spin tiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayTable {
    /// Coin multiplier per base symbol and run length (applies to bet per line)
    pub line_pays: BTreeMap<Symbol, BTreeMap<u8, u32>>,
    /// Scatter count tier → total bet multiplier
    pub scatter_pays: BTreeMap<u8, u32>,
    /// Scatter count tier → free spins awarded
    pub free_spins: BTreeMap<u8, u32>,
}

impl PayTable {
    /// The Doghouse paytable
    pub fn standard() -> Self {
        let line_pays = [
            (Symbol::Dog1, [8, 30, 100]),
            (Symbol::Dog2, [6, 24, 80]),
            (Symbol::Dog3, [5, 18, 60]),
            (Symbol::Dog4, [4, 12, 40]),
            (Symbol::Collar, [3, 8, 20]),
            (Symbol::Bowl, [2, 6, 15]),
            (Symbol::Bone, [2, 5, 12]),
        ]
        .into_iter()
        .map(|(symbol, pays)| (symbol, tiers(pays)))
        .collect();

        Self {
            line_pays,
            scatter_pays: tiers([2, 10, 50]),
            free_spins: tiers([8, 12, 15]),
        }
    }

    /// Multiplier for `run` consecutive `symbol`s, if defined
    pub fn line_pay(&self, symbol: Symbol, run: u8) -> Option<u32> {
        self.line_pays.get(&symbol)?.get(&run).copied()
    }

    /// Base symbol and run length an all-Wild line is scored as:
    /// the highest multiplier at the longest defined run
    pub fn best_line_pay(&self) -> Option<(Symbol, u8, u32)> {
        let max_run = self
            .line_pays
            .values()
            .filter_map(|pays| pays.keys().next_back().copied())
            .max()?;
        let mut best: Option<(Symbol, u8, u32)> = None;
        for (&symbol, pays) in &self.line_pays {
            if let Some(&mult) = pays.get(&max_run) {
                if best.is_none_or(|(_, _, m)| mult > m) {
                    best = Some((symbol, max_run, mult));
                }
            }
        }
        best
    }

    /// Scatter multiplier for a scatter count (highest tier not above it)
    pub fn scatter_multiplier(&self, count: u8) -> u32 {
        tier_lookup(&self.scatter_pays, count)
    }

    /// Free spins awarded for a scatter count (highest tier not above it)
    pub fn free_spins_for(&self, count: u8) -> u32 {
        tier_lookup(&self.free_spins, count)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.line_pays.is_empty() {
            return Err(ConfigError::EmptyPaytable);
        }
        for (&symbol, pays) in &self.line_pays {
            if !symbol.is_paying() {
                return Err(ConfigError::SpecialSymbolPays(symbol));
            }
            if let Some(&run) = pays
                .keys()
                .find(|&&run| run < MIN_RUN || run as usize > REELS)
            {
                return Err(ConfigError::RunLength { symbol, run });
            }
        }
        let tier_tables = [
            ("scatter pay", &self.scatter_pays),
            ("free spin", &self.free_spins),
        ];
        for (table, counts) in tier_tables {
            if let Some(&count) = counts.keys().find(|&&c| c < MIN_RUN) {
                return Err(ConfigError::Tier { table, count });
            }
        }
        Ok(())
    }

    /// Score every payline on a grid
    pub fn evaluate_lines(
        &self,
        grid: &Grid,
        paylines: &[Payline],
        bet_per_line: u64,
    ) -> Vec<LineWin> {
        paylines
            .iter()
            .enumerate()
            .filter_map(|(index, payline)| self.evaluate_line(grid, index, payline, bet_per_line))
            .collect()
    }

    /// Score a single payline, keeping only its best candidate
    pub fn evaluate_line(
        &self,
        grid: &Grid,
        line_index: usize,
        payline: &Payline,
        bet_per_line: u64,
    ) -> Option<LineWin> {
        let symbols: Vec<Symbol> = payline
            .cells()
            .map(|(reel, row)| grid.get(reel as usize, row as usize))
            .collect();
        self.score_symbols(&symbols, bet_per_line)
            .map(|candidate| candidate.into_line_win(line_index, payline))
    }

    /// Best-paying candidate for a left-to-right symbol sequence
    pub(crate) fn score_symbols(&self, symbols: &[Symbol], bet_per_line: u64) -> Option<Candidate> {
        if !symbols.is_empty() && symbols.iter().all(|&s| s == Symbol::Wild) {
            let (base, run, multiplier) = self.best_line_pay()?;
            return Some(Candidate::new(base, run, symbols.len() as u8, multiplier, bet_per_line));
        }

        let mut best: Option<Candidate> = None;
        for &base in self.line_pays.keys() {
            let (run, wilds) = match_run(symbols, base);
            if run < MIN_RUN {
                continue;
            }
            let Some(multiplier) = self.line_pay(base, run) else {
                continue;
            };
            let candidate = Candidate::new(base, run, wilds, multiplier, bet_per_line);
            if candidate.payout > 0 && best.as_ref().is_none_or(|b| candidate.payout > b.payout) {
                best = Some(candidate);
            }
        }
        best
    }

    /// Count scatters anywhere on the grid and price them against the total bet
    pub fn evaluate_scatter(&self, grid: &Grid, total_bet: u64) -> ScatterWin {
        let positions: Vec<(u8, u8)> = grid
            .cells()
            .filter(|&(_, _, symbol)| symbol == Symbol::Scatter)
            .map(|(reel, row, _)| (reel as u8, row as u8))
            .collect();
        let count = positions.len() as u8;
        let multiplier = self.scatter_multiplier(count);

        ScatterWin {
            count,
            multiplier,
            payout: u64::from(multiplier) * total_bet,
            free_spins_awarded: self.free_spins_for(count),
            positions,
        }
    }
}

impl Default for PayTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// A scored line before it is tied to a payline index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Candidate {
    pub base: Symbol,
    pub run: u8,
    pub wilds: u8,
    pub effective_multiplier: u64,
    pub payout: u64,
}

impl Candidate {
    fn new(base: Symbol, run: u8, wilds: u8, multiplier: u32, bet_per_line: u64) -> Self {
        let effective_multiplier = u64::from(multiplier) << wilds;
        Self {
            base,
            run,
            wilds,
            effective_multiplier,
            payout: effective_multiplier * bet_per_line,
        }
    }

    fn into_line_win(self, line_index: usize, payline: &Payline) -> LineWin {
        LineWin {
            line_index: line_index as u8,
            base_symbol: self.base,
            run_length: self.run,
            wild_count: self.wilds,
            effective_multiplier: self.effective_multiplier,
            payout_coins: self.payout,
            positions: payline.cells().take(self.run as usize).collect(),
        }
    }
}

/// Left-aligned run of `base` (Wild substituting) and the Wilds inside it
pub fn match_run(symbols: &[Symbol], base: Symbol) -> (u8, u8) {
    let mut run = 0u8;
    let mut wilds = 0u8;
    for &symbol in symbols {
        if !symbol.matches(base) {
            break;
        }
        run += 1;
        if symbol == Symbol::Wild {
            wilds += 1;
        }
    }
    (run, wilds)
}

fn tiers(values: [u32; 3]) -> BTreeMap<u8, u32> {
    (MIN_RUN..).zip(values).collect()
}

fn tier_lookup(table: &BTreeMap<u8, u32>, count: u8) -> u32 {
    table
        .range(..=count)
        .next_back()
        .map(|(_, &value)| value)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use Symbol::*;

    #[test]
    fn test_payline_straight() {
        assert_eq!(Payline::straight(1).positions, vec![1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_standard_paylines_valid() {
        let lines = standard_10_paylines();
        assert!(validate_paylines(&lines, 10).is_ok());
        assert_eq!(lines[9].positions, vec![0, 1, 2, 2, 2]);
    }

    #[test]
    fn test_payline_validation() {
        let mut lines = standard_10_paylines();
        lines[4] = Payline::new(&[0, 1, 2, 1]);
        assert!(matches!(
            validate_paylines(&lines, 10),
            Err(ConfigError::PaylineLength { line: 4, expected: 5, actual: 4 })
        ));

        lines[4] = Payline::new(&[0, 1, 3, 1, 0]);
        assert!(matches!(
            validate_paylines(&lines, 10),
            Err(ConfigError::PaylineRow { line: 4, reel: 2, row: 3 })
        ));

        lines.pop();
        assert!(matches!(
            validate_paylines(&lines, 10),
            Err(ConfigError::PaylineCount { expected: 10, actual: 9 })
        ));
    }

    #[test]
    fn test_match_run_stops_at_first_miss() {
        assert_eq!(match_run(&[Dog1, Wild, Dog1, Dog1, Collar], Dog1), (4, 1));
        assert_eq!(match_run(&[Wild, Wild, Bowl, Bone, Bone], Bowl), (3, 2));
        assert_eq!(match_run(&[Scatter, Dog1, Dog1, Dog1, Dog1], Dog1), (0, 0));
        assert_eq!(match_run(&[Dog1, Dog1, Scatter, Dog1, Dog1], Dog1), (2, 0));
    }

    #[test]
    fn test_wild_substitution_doubles() {
        let table = PayTable::standard();
        let best = table.score_symbols(&[Dog1, Wild, Dog1, Dog1, Collar], 1).unwrap();
        assert_eq!(best.base, Dog1);
        assert_eq!(best.run, 4);
        assert_eq!(best.wilds, 1);
        assert_eq!(best.effective_multiplier, 60);
        assert_eq!(best.payout, 60);
    }

    #[test]
    fn test_best_candidate_wins() {
        let table = PayTable::standard();
        // Wilds lead into Bone ×5 (12×4 = 48) vs. nothing else qualifying
        let best = table.score_symbols(&[Wild, Wild, Bone, Bone, Bone], 2).unwrap();
        assert_eq!(best.base, Bone);
        assert_eq!(best.run, 5);
        assert_eq!(best.payout, 12 * 4 * 2);

        // Leading wilds only extend into Collar; every other base stops at run 2
        let best = table.score_symbols(&[Wild, Wild, Collar, Collar, Dog2], 1).unwrap();
        assert_eq!(best.base, Collar);
        assert_eq!(best.run, 4);
        assert_eq!(best.payout, 32);
    }

    #[test]
    fn test_short_run_pays_nothing() {
        let table = PayTable::standard();
        assert!(table.score_symbols(&[Dog1, Dog1, Dog2, Dog2, Dog2], 1).is_none());
        assert!(table.score_symbols(&[Scatter, Scatter, Scatter, Scatter, Scatter], 1).is_none());
    }

    #[test]
    fn test_all_wild_line() {
        let table = PayTable::standard();
        assert_eq!(table.best_line_pay(), Some((Dog1, 5, 100)));
        let best = table.score_symbols(&[Wild; 5], 3).unwrap();
        assert_eq!(best.base, Dog1);
        assert_eq!(best.run, 5);
        assert_eq!(best.wilds, 5);
        assert_eq!(best.effective_multiplier, 3200);
        assert_eq!(best.payout, 9600);
    }

    #[test]
    fn test_tier_lookup() {
        let table = PayTable::standard();
        assert_eq!(table.scatter_multiplier(2), 0);
        assert_eq!(table.scatter_multiplier(3), 2);
        assert_eq!(table.scatter_multiplier(4), 10);
        assert_eq!(table.scatter_multiplier(5), 50);
        assert_eq!(table.scatter_multiplier(9), 50);
        assert_eq!(table.free_spins_for(0), 0);
        assert_eq!(table.free_spins_for(3), 8);
        assert_eq!(table.free_spins_for(4), 12);
        assert_eq!(table.free_spins_for(15), 15);
    }

    #[test]
    fn test_paytable_validation() {
        assert!(PayTable::standard().validate().is_ok());

        let mut table = PayTable::standard();
        table.line_pays.insert(Wild, tiers([1, 2, 3]));
        assert!(matches!(table.validate(), Err(ConfigError::SpecialSymbolPays(Wild))));

        let mut table = PayTable::standard();
        table.line_pays.get_mut(&Bone).unwrap().insert(2, 1);
        assert!(matches!(
            table.validate(),
            Err(ConfigError::RunLength { symbol: Bone, run: 2 })
        ));

        let mut table = PayTable::standard();
        table.free_spins.insert(1, 3);
        assert!(matches!(table.validate(), Err(ConfigError::Tier { count: 1, .. })));

        let mut table = PayTable::standard();
        table.line_pays.clear();
        assert!(matches!(table.validate(), Err(ConfigError::EmptyPaytable)));
    }
}
