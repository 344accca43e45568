//! Architecture strings
//!
//! An architecture is one character per region, in coordinate order, for the
//! regions at least `min_length` residues long:
//!
//! - `_` for N- and C-terminal regions
//! - the bin symbol of the chosen source for linkers (`-` without a value)
//! - the domain's quality label for domains (`-` without a label)

use crate::binning::BinTable;
use crate::models::{AnnotatedRegion, QualityLabels, RegionType};
use serde::{Deserialize, Serialize};

/// Character emitted for terminal regions
pub const TERMINAL_SYMBOL: char = '_';

/// Character emitted when a linker category or domain label is missing
pub const UNDEFINED_SYMBOL: char = '-';

/// One (minimum length, categorical source) combination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureColumn {
    pub min_length: usize,
    pub source: String,
}

impl ArchitectureColumn {
    /// Output column name, e.g. `th50_cat_10`
    pub fn name(&self) -> String {
        format!("{}_cat_{:02}", self.source, self.min_length)
    }
}

/// Column grid: minimum lengths outer, sources inner
pub fn columns(min_lengths: &[usize], sources: &[String]) -> Vec<ArchitectureColumn> {
    min_lengths
        .iter()
        .flat_map(|&min_length| {
            sources.iter().map(move |source| ArchitectureColumn {
                min_length,
                source: source.clone(),
            })
        })
        .collect()
}

/// Encode one protein's regions for one column
pub fn encode(
    regions: &[AnnotatedRegion],
    min_length: usize,
    source: &str,
    bins: &BinTable,
    quality: &QualityLabels,
) -> String {
    regions
        .iter()
        .filter(|r| r.region.len() >= min_length)
        .map(|r| match r.region.kind {
            RegionType::Nter | RegionType::Cter => TERMINAL_SYMBOL,
            RegionType::Link | RegionType::InternalLink => r
                .profile
                .get(source)
                .map(|occupancy| bins.symbol_for(occupancy))
                .unwrap_or(UNDEFINED_SYMBOL),
            RegionType::Domain => quality
                .get(&r.region.name)
                .map(|label| label.symbol())
                .unwrap_or(UNDEFINED_SYMBOL),
        })
        .collect()
}

/// Encode one protein for every column of the grid
pub fn encode_all(
    regions: &[AnnotatedRegion],
    columns: &[ArchitectureColumn],
    bins: &BinTable,
    quality: &QualityLabels,
) -> Vec<String> {
    columns
        .iter()
        .map(|column| encode(regions, column.min_length, &column.source, bins, quality))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FeatureProfile, Occupancy, QualityLabel, Region};

    fn annotated(start: usize, end: usize, name: &str, kind: RegionType, th50: f64) -> AnnotatedRegion {
        let mut profile = FeatureProfile::new();
        profile.insert("th50", Occupancy::Fraction(th50));
        AnnotatedRegion {
            region: Region {
                start,
                end,
                name: name.to_string(),
                kind,
            },
            profile,
        }
    }

    fn protein() -> (Vec<AnnotatedRegion>, QualityLabels) {
        let regions = vec![
            annotated(1, 9, "N-terminus_link_TED01", RegionType::Nter, 1.0),
            annotated(10, 30, "TED01", RegionType::Domain, 0.0),
            annotated(31, 45, "TED01_link_TED02", RegionType::Link, 0.85),
            annotated(46, 80, "TED02", RegionType::Domain, 0.1),
            annotated(81, 85, "TED02_link_TED03", RegionType::Link, 0.95),
            annotated(86, 120, "TED03", RegionType::Domain, 0.0),
            annotated(121, 150, "TED03_link_C-terminus", RegionType::Cter, 0.9),
        ];
        let mut quality = QualityLabels::new();
        quality.insert("TED01".to_string(), QualityLabel::A);
        quality.insert("TED02".to_string(), QualityLabel::Z);
        (regions, quality)
    }

    #[test]
    fn test_encode_all_regions() {
        let (regions, quality) = protein();
        let arch = encode(&regions, 1, "th50", &BinTable::default(), &quality);
        assert_eq!(arch, "_A2Z1-_");
    }

    #[test]
    fn test_short_regions_are_omitted() {
        let (regions, quality) = protein();
        let arch = encode(&regions, 10, "th50", &BinTable::default(), &quality);
        // (1,9) and (81,85) are shorter than 10
        assert_eq!(arch, "A2Z-_");
        assert_eq!(arch.chars().count(), 5);
    }

    #[test]
    fn test_unknown_source_gives_placeholder() {
        let (regions, quality) = protein();
        let arch = encode(&regions, 1, "lite", &BinTable::default(), &quality);
        assert_eq!(arch, "_A-Z--_");
    }

    #[test]
    fn test_internal_link_encodes_like_link() {
        let regions = vec![
            annotated(1, 20, "TED01", RegionType::Domain, 0.0),
            annotated(21, 40, "TED01_link_TED01", RegionType::InternalLink, 0.75),
            annotated(41, 60, "TED01", RegionType::Domain, 0.0),
        ];
        let mut quality = QualityLabels::new();
        quality.insert("TED01".to_string(), QualityLabel::B);

        let arch = encode(&regions, 10, "th50", &BinTable::default(), &quality);
        assert_eq!(arch, "B3B");
    }

    #[test]
    fn test_encode_is_repeatable() {
        let (regions, quality) = protein();
        let bins = BinTable::default();
        let first = encode(&regions, 10, "th50", &bins, &quality);
        let second = encode(&regions, 10, "th50", &bins, &quality);
        assert_eq!(first, second);
    }

    #[test]
    fn test_column_grid_order_and_names() {
        let grid = columns(&[10, 20], &["th50".to_string(), "lite".to_string()]);
        let names: Vec<String> = grid.iter().map(ArchitectureColumn::name).collect();
        assert_eq!(names, vec!["th50_cat_10", "lite_cat_10", "th50_cat_20", "lite_cat_20"]);

        let grid = columns(&[5], &["afd".to_string()]);
        assert_eq!(grid[0].name(), "afd_cat_05");
    }

    #[test]
    fn test_encode_all_matches_grid() {
        let (regions, quality) = protein();
        let grid = columns(&[1, 10], &["th50".to_string()]);
        let archs = encode_all(&regions, &grid, &BinTable::default(), &quality);
        assert_eq!(archs, vec!["_A2Z1-_".to_string(), "A2Z-_".to_string()]);
    }
}
