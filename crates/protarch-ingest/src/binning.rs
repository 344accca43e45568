//! Categorical binning of occupancy fractions

use crate::models::{Category, Occupancy};
use protarch_common::{ProtarchError, Result};
use serde::{Deserialize, Serialize};

/// Breakpoints and the symbol of each bin, least disordered first.
///
/// Bins are left-closed and right-open, except the top bin which also
/// contains the last breakpoint: with the defaults, `[0, 0.7)` is `0`,
/// `[0.7, 0.8)` is `3`, `[0.8, 0.9)` is `2` and `[0.9, 1.0]` is `1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinTable {
    pub breakpoints: Vec<f64>,
    pub symbols: Vec<char>,
}

impl Default for BinTable {
    fn default() -> Self {
        Self {
            breakpoints: vec![0.0, 0.7, 0.8, 0.9, 1.0],
            symbols: vec!['0', '3', '2', '1'],
        }
    }
}

impl BinTable {
    /// Map an occupancy to its category.
    ///
    /// The empty-span sentinel and anything outside the breakpoint range
    /// become [`Category::Undefined`].
    pub fn bin(&self, occupancy: Occupancy) -> Category {
        match occupancy {
            Occupancy::Fraction(value) => self.bin_value(value),
            Occupancy::Empty => Category::Undefined,
        }
    }

    fn bin_value(&self, value: f64) -> Category {
        let edges = &self.breakpoints;
        if edges.len() < 2 {
            return Category::Undefined;
        }
        if !value.is_finite() || value < edges[0] || value > edges[edges.len() - 1] {
            return Category::Undefined;
        }

        // Number of interior breakpoints at or below the value
        let index = edges[1..edges.len() - 1]
            .iter()
            .take_while(|&&edge| value >= edge)
            .count();
        Category::Bin(index)
    }

    /// Symbol of a category; undefined renders as the lowest bin
    pub fn symbol(&self, category: Category) -> char {
        let index = match category {
            Category::Bin(index) => index,
            Category::Undefined => 0,
        };
        self.symbols.get(index).copied().unwrap_or('-')
    }

    /// Convenience: bin and render in one step
    pub fn symbol_for(&self, occupancy: Occupancy) -> char {
        self.symbol(self.bin(occupancy))
    }

    pub fn validate(&self) -> Result<()> {
        if self.breakpoints.len() < 2 {
            return Err(ProtarchError::config("Bin table needs at least two breakpoints"));
        }
        if self.breakpoints.iter().any(|b| !b.is_finite()) {
            return Err(ProtarchError::config("Bin breakpoints must be finite"));
        }
        if self.breakpoints.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ProtarchError::config("Bin breakpoints must be strictly increasing"));
        }
        if self.symbols.len() != self.breakpoints.len() - 1 {
            return Err(ProtarchError::config(format!(
                "Expected {} bin symbols, got {}",
                self.breakpoints.len() - 1,
                self.symbols.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(value: f64) -> char {
        BinTable::default().symbol_for(Occupancy::Fraction(value))
    }

    #[test]
    fn test_bin_edges() {
        assert_eq!(sym(0.0), '0');
        assert_eq!(sym(0.69999), '0');
        assert_eq!(sym(0.7), '3');
        assert_eq!(sym(0.75), '3');
        assert_eq!(sym(0.8), '2');
        assert_eq!(sym(0.9), '1');
        assert_eq!(sym(1.0), '1');
    }

    #[test]
    fn test_sentinel_is_undefined_but_renders_lowest() {
        let bins = BinTable::default();
        assert_eq!(bins.bin(Occupancy::Empty), Category::Undefined);
        assert_eq!(bins.bin(Occupancy::Fraction(0.0)), Category::Bin(0));
        assert_eq!(bins.symbol_for(Occupancy::Empty), '0');
    }

    #[test]
    fn test_out_of_range_is_undefined() {
        let bins = BinTable::default();
        assert_eq!(bins.bin(Occupancy::Fraction(-1.0)), Category::Undefined);
        assert_eq!(bins.bin(Occupancy::Fraction(1.5)), Category::Undefined);
        assert_eq!(bins.bin(Occupancy::Fraction(f64::NAN)), Category::Undefined);
    }

    #[test]
    fn test_validate() {
        assert!(BinTable::default().validate().is_ok());

        let unsorted = BinTable {
            breakpoints: vec![0.0, 0.8, 0.7, 1.0],
            symbols: vec!['a', 'b', 'c'],
        };
        assert!(unsorted.validate().is_err());

        let short = BinTable {
            breakpoints: vec![0.0, 0.5, 1.0],
            symbols: vec!['a'],
        };
        assert!(short.validate().is_err());
    }
}
