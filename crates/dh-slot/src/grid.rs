//! Symbol grid and the weighted grid generator

use std::fmt;

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use serde::{Deserialize, Serialize};

use crate::bonus::BonusState;
use crate::config::{REELS, ROWS};
use crate::error::ConfigError;
use crate::symbols::{Symbol, SymbolWeights};

/// A 5×3 grid of symbols, reel-major. Never mutated once a spin produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    reels: [[Symbol; ROWS]; REELS],
}

impl Grid {
    /// Build from reel columns (`reels[reel][row]`)
    pub fn from_reels(reels: [[Symbol; ROWS]; REELS]) -> Self {
        Self { reels }
    }

    /// Build from display rows (`rows[row][reel]`), top row first
    pub fn from_rows(rows: [[Symbol; REELS]; ROWS]) -> Self {
        let mut reels = [[Symbol::Bone; ROWS]; REELS];
        for (row, line) in rows.iter().enumerate() {
            for (reel, &symbol) in line.iter().enumerate() {
                reels[reel][row] = symbol;
            }
        }
        Self { reels }
    }

    /// A grid filled with one symbol
    pub fn filled(symbol: Symbol) -> Self {
        Self {
            reels: [[symbol; ROWS]; REELS],
        }
    }

    /// Symbol at (reel, row)
    pub fn get(&self, reel: usize, row: usize) -> Symbol {
        self.reels[reel][row]
    }

    /// All cells as (reel, row, symbol), reel-major
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Symbol)> + '_ {
        self.reels.iter().enumerate().flat_map(|(reel, column)| {
            column
                .iter()
                .enumerate()
                .map(move |(row, &symbol)| (reel, row, symbol))
        })
    }

    /// How many cells hold `symbol`
    pub fn count(&self, symbol: Symbol) -> usize {
        self.cells().filter(|&(_, _, s)| s == symbol).count()
    }
}

impl fmt::Display for Grid {
    /// ASCII box rendering, one display row per text row
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let border = format!("+{}", "-----+".repeat(REELS));
        writeln!(f, "{border}")?;
        for row in 0..ROWS {
            write!(f, "|")?;
            for reel in 0..REELS {
                write!(f, " {:^3} |", self.get(reel, row).code())?;
            }
            writeln!(f)?;
            writeln!(f, "{border}")?;
        }
        Ok(())
    }
}

/// Draws grids by weighted selection, overlaying sticky wilds
#[derive(Debug, Clone)]
pub struct GridGenerator {
    distribution: WeightedIndex<u32>,
}

impl GridGenerator {
    /// Fails on a zero-sum table or one whose sum overflows `u32`
    pub fn new(weights: &SymbolWeights) -> Result<Self, ConfigError> {
        weights.validate()?;
        let distribution = WeightedIndex::new(weights.as_array())
            .map_err(|e| ConfigError::Weights(e.to_string()))?;
        Ok(Self { distribution })
    }

    /// Draw one symbol
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Symbol {
        Symbol::ALL[self.distribution.sample(rng)]
    }

    /// Produce the grid for one spin.
    ///
    /// A spin that starts outside a bonus clears the sticky set first. Inside a
    /// bonus, sticky cells are forced to Wild without consuming a draw, and
    /// every Wild on the finished grid becomes sticky for the next spin.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, bonus: &mut BonusState) -> Grid {
        let in_bonus = bonus.is_active();
        if !in_bonus {
            bonus.sticky_wilds.clear();
        }

        let mut reels = [[Symbol::Bone; ROWS]; REELS];
        for (reel, column) in reels.iter_mut().enumerate() {
            for (row, cell) in column.iter_mut().enumerate() {
                *cell = if bonus.sticky_wilds.contains(reel, row) {
                    Symbol::Wild
                } else {
                    self.draw(rng)
                };
            }
        }
        let grid = Grid::from_reels(reels);

        if in_bonus {
            for (reel, row, symbol) in grid.cells() {
                if symbol == Symbol::Wild {
                    bonus.sticky_wilds.insert(reel, row);
                }
            }
        }
        grid
    }
}
