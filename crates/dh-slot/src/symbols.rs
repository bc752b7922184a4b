//! Symbol definitions and the weight table used for grid draws

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One of the nine Doghouse symbols.
///
/// Declaration order is rank order: `Dog1` pays most, `Bone` least, and the
/// two specials come last. Paytable lookups and tie-breaking rely on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Symbol {
    /// Rottweiler
    #[serde(rename = "D1")]
    Dog1 = 0,
    /// Pug
    #[serde(rename = "D2")]
    Dog2 = 1,
    /// Beagle
    #[serde(rename = "D3")]
    Dog3 = 2,
    /// Shiba
    #[serde(rename = "D4")]
    Dog4 = 3,
    #[serde(rename = "CL")]
    Collar = 4,
    #[serde(rename = "BW")]
    Bowl = 5,
    #[serde(rename = "BN")]
    Bone = 6,
    /// The dog house; substitutes for every paying symbol
    #[serde(rename = "W")]
    Wild = 7,
    /// The paw; pays anywhere on the grid
    #[serde(rename = "S")]
    Scatter = 8,
}

impl Symbol {
    /// All symbols in rank order
    pub const ALL: [Symbol; 9] = [
        Symbol::Dog1,
        Symbol::Dog2,
        Symbol::Dog3,
        Symbol::Dog4,
        Symbol::Collar,
        Symbol::Bowl,
        Symbol::Bone,
        Symbol::Wild,
        Symbol::Scatter,
    ];

    /// Symbols that can form a line win on their own
    pub const PAYING: [Symbol; 7] = [
        Symbol::Dog1,
        Symbol::Dog2,
        Symbol::Dog3,
        Symbol::Dog4,
        Symbol::Collar,
        Symbol::Bowl,
        Symbol::Bone,
    ];

    /// Two-character code used by the console and config files
    pub fn code(self) -> &'static str {
        match self {
            Symbol::Dog1 => "D1",
            Symbol::Dog2 => "D2",
            Symbol::Dog3 => "D3",
            Symbol::Dog4 => "D4",
            Symbol::Collar => "CL",
            Symbol::Bowl => "BW",
            Symbol::Bone => "BN",
            Symbol::Wild => "W",
            Symbol::Scatter => "S",
        }
    }

    /// Human readable name
    pub fn display_name(self) -> &'static str {
        match self {
            Symbol::Dog1 => "Rottweiler",
            Symbol::Dog2 => "Pug",
            Symbol::Dog3 => "Beagle",
            Symbol::Dog4 => "Shiba",
            Symbol::Collar => "Collar",
            Symbol::Bowl => "Bowl",
            Symbol::Bone => "Bone",
            Symbol::Wild => "Dog House (WILD)",
            Symbol::Scatter => "Paw (SCATTER)",
        }
    }

    /// Can this symbol be the base of a line win?
    pub fn is_paying(self) -> bool {
        match self {
            Symbol::Dog1
            | Symbol::Dog2
            | Symbol::Dog3
            | Symbol::Dog4
            | Symbol::Collar
            | Symbol::Bowl
            | Symbol::Bone => true,
            Symbol::Wild | Symbol::Scatter => false,
        }
    }

    /// Does this symbol stand in for `base` on a payline?
    pub fn matches(self, base: Symbol) -> bool {
        match self {
            Symbol::Wild => base.is_paying(),
            Symbol::Scatter => false,
            other => other == base,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Symbol {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Symbol::ALL
            .into_iter()
            .find(|sym| sym.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::Parse(format!("unknown symbol code: {s}")))
    }
}

/// Draw weight per symbol (higher weight = more frequent)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolWeights {
    #[serde(rename = "D1")]
    pub dog1: u32,
    #[serde(rename = "D2")]
    pub dog2: u32,
    #[serde(rename = "D3")]
    pub dog3: u32,
    #[serde(rename = "D4")]
    pub dog4: u32,
    #[serde(rename = "CL")]
    pub collar: u32,
    #[serde(rename = "BW")]
    pub bowl: u32,
    #[serde(rename = "BN")]
    pub bone: u32,
    #[serde(rename = "W")]
    pub wild: u32,
    #[serde(rename = "S")]
    pub scatter: u32,
}

impl SymbolWeights {
    /// Doghouse weights: icons heaviest, Wild and Scatter rarest
    pub fn standard() -> Self {
        Self {
            dog1: 3,
            dog2: 4,
            dog3: 5,
            dog4: 6,
            collar: 8,
            bowl: 9,
            bone: 9,
            wild: 2,
            scatter: 2,
        }
    }

    /// A table where only `symbol` can be drawn
    pub fn only(symbol: Symbol) -> Self {
        let mut weights = Self::zero();
        weights.set(symbol, 1);
        weights
    }

    fn zero() -> Self {
        Self {
            dog1: 0,
            dog2: 0,
            dog3: 0,
            dog4: 0,
            collar: 0,
            bowl: 0,
            bone: 0,
            wild: 0,
            scatter: 0,
        }
    }

    /// Weight of a symbol
    pub fn get(&self, symbol: Symbol) -> u32 {
        match symbol {
            Symbol::Dog1 => self.dog1,
            Symbol::Dog2 => self.dog2,
            Symbol::Dog3 => self.dog3,
            Symbol::Dog4 => self.dog4,
            Symbol::Collar => self.collar,
            Symbol::Bowl => self.bowl,
            Symbol::Bone => self.bone,
            Symbol::Wild => self.wild,
            Symbol::Scatter => self.scatter,
        }
    }

    /// Replace the weight of a symbol
    pub fn set(&mut self, symbol: Symbol, weight: u32) {
        let slot = match symbol {
            Symbol::Dog1 => &mut self.dog1,
            Symbol::Dog2 => &mut self.dog2,
            Symbol::Dog3 => &mut self.dog3,
            Symbol::Dog4 => &mut self.dog4,
            Symbol::Collar => &mut self.collar,
            Symbol::Bowl => &mut self.bowl,
            Symbol::Bone => &mut self.bone,
            Symbol::Wild => &mut self.wild,
            Symbol::Scatter => &mut self.scatter,
        };
        *slot = weight;
    }

    /// Weights in `Symbol::ALL` order
    pub fn as_array(&self) -> [u32; 9] {
        Symbol::ALL.map(|s| self.get(s))
    }

    /// Sum of all weights
    pub fn total(&self) -> u64 {
        self.as_array().iter().map(|&w| u64::from(w)).sum()
    }

    /// Probability of drawing `symbol` on a free cell
    pub fn probability(&self, symbol: Symbol) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        f64::from(self.get(symbol)) / total as f64
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total() == 0 {
            return Err(ConfigError::EmptyWeights);
        }
        Ok(())
    }
}

impl Default for SymbolWeights {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_codes_roundtrip() {
        for sym in Symbol::ALL {
            assert_eq!(sym.code().parse::<Symbol>().unwrap(), sym);
        }
        assert!("XX".parse::<Symbol>().is_err());
    }

    #[test]
    fn test_wild_matches_paying_only() {
        assert!(Symbol::Wild.matches(Symbol::Dog1));
        assert!(Symbol::Wild.matches(Symbol::Bone));
        assert!(!Symbol::Wild.matches(Symbol::Scatter));
        assert!(!Symbol::Scatter.matches(Symbol::Scatter));
        assert!(!Symbol::Collar.matches(Symbol::Bowl));
        assert!(Symbol::Collar.matches(Symbol::Collar));
    }

    #[test]
    fn test_standard_weights() {
        let weights = SymbolWeights::standard();
        assert_eq!(weights.total(), 48);
        assert_eq!(weights.get(Symbol::Wild), 2);
        assert_eq!(weights.get(Symbol::Bone), 9);
        assert!(weights.validate().is_ok());
    }

    #[test]
    fn test_zero_weights_rejected() {
        let mut weights = SymbolWeights::only(Symbol::Dog1);
        weights.set(Symbol::Dog1, 0);
        assert!(matches!(weights.validate(), Err(ConfigError::EmptyWeights)));
    }

    #[test]
    fn test_weights_serialize_by_code() {
        let json = serde_json::to_value(SymbolWeights::standard()).unwrap();
        assert_eq!(json["D1"], 3);
        assert_eq!(json["W"], 2);
        assert_eq!(json["S"], 2);
    }
}
