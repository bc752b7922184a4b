//! Free spin bonus state and sticky wilds

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::{REELS, ROWS};

/// Grid coordinates pinned to Wild for the rest of a bonus session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StickyWildSet(BTreeSet<(u8, u8)>);

impl StickyWildSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Is (reel, row) pinned?
    pub fn contains(&self, reel: usize, row: usize) -> bool {
        self.0.contains(&(reel as u8, row as u8))
    }

    /// Pin (reel, row); returns true if it was not pinned before
    pub fn insert(&mut self, reel: usize, row: usize) -> bool {
        self.0.insert((reel as u8, row as u8))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pinned (reel, row) pairs in reel-major order
    pub fn iter(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.0.iter().copied()
    }

    /// Every coordinate lies on the grid
    pub fn in_bounds(&self) -> bool {
        self.0
            .iter()
            .all(|&(reel, row)| (reel as usize) < REELS && (row as usize) < ROWS)
    }
}

impl FromIterator<(u8, u8)> for StickyWildSet {
    fn from_iter<I: IntoIterator<Item = (u8, u8)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Remaining free spins and the sticky wilds of the current session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusState {
    pub free_spins_remaining: u32,
    pub sticky_wilds: StickyWildSet,
}

impl BonusState {
    /// Bonus state with `spins` free spins left and no sticky wilds
    pub fn with_free_spins(spins: u32) -> Self {
        Self {
            free_spins_remaining: spins,
            sticky_wilds: StickyWildSet::new(),
        }
    }

    /// Is a bonus session running?
    pub fn is_active(&self) -> bool {
        self.free_spins_remaining > 0
    }

    /// Add spins won during this spin (initial trigger or retrigger)
    pub fn award(&mut self, spins: u32) {
        self.free_spins_remaining = self.free_spins_remaining.saturating_add(spins);
    }

    /// Consume the spin that just ran, if one was available
    pub fn consume(&mut self) {
        self.free_spins_remaining = self.free_spins_remaining.saturating_sub(1);
    }
}
