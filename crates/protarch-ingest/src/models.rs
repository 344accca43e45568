// Protein Region Models
//
// Proteins, domain intervals, synthesized regions and the per-region values
// derived from them. Coordinates are 1-based and inclusive throughout.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Inputs
// ============================================================================

/// A protein with a known residue count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Protein {
    pub acc: String,
    pub length: usize,
}

impl Protein {
    pub fn new(acc: impl Into<String>, length: usize) -> Self {
        Self {
            acc: acc.into(),
            length,
        }
    }
}

/// One contiguous segment of a structural domain.
///
/// A discontinuous domain is several intervals sharing the same `domain_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainInterval {
    pub start: usize,
    pub end: usize,
    pub domain_id: String,
}

impl DomainInterval {
    pub fn new(start: usize, end: usize, domain_id: impl Into<String>) -> Self {
        Self {
            start,
            end,
            domain_id: domain_id.into(),
        }
    }
}

/// Three-level confidence tier assigned to a domain upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QualityLabel {
    /// Highest confidence
    A,
    /// Medium confidence
    B,
    /// Low confidence or unlabeled
    Z,
}

impl QualityLabel {
    pub fn symbol(self) -> char {
        match self {
            QualityLabel::A => 'A',
            QualityLabel::B => 'B',
            QualityLabel::Z => 'Z',
        }
    }
}

impl std::fmt::Display for QualityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl std::str::FromStr for QualityLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" => Ok(QualityLabel::A),
            "B" => Ok(QualityLabel::B),
            "Z" => Ok(QualityLabel::Z),
            other => Err(format!("Invalid quality label: {}", other)),
        }
    }
}

/// Quality labels of one protein's domains, keyed by domain id
pub type QualityLabels = HashMap<String, QualityLabel>;

// ============================================================================
// Regions
// ============================================================================

/// Region type derived once from the region name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionType {
    Domain,
    /// Linker between two distinct domains
    Link,
    /// Linker whose neighbours are segments of the same domain
    InternalLink,
    Nter,
    Cter,
}

impl RegionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegionType::Domain => "domain",
            RegionType::Link => "link",
            RegionType::InternalLink => "internal_link",
            RegionType::Nter => "Nter",
            RegionType::Cter => "Cter",
        }
    }

    /// True for linkers between domains (terminal segments excluded)
    pub fn is_linker(&self) -> bool {
        matches!(self, RegionType::Link | RegionType::InternalLink)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RegionType::Nter | RegionType::Cter)
    }
}

impl std::fmt::Display for RegionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed span of a protein; a protein's regions partition `[1, length]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub start: usize,
    pub end: usize,
    pub name: String,
    pub kind: RegionType,
}

impl Region {
    /// Residue count; zero for an inverted span
    pub fn len(&self) -> usize {
        if self.end < self.start {
            0
        } else {
            self.end - self.start + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Per-region features
// ============================================================================

/// Fraction of positive residues in a region, or the empty-span sentinel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Occupancy {
    Fraction(f64),
    /// No annotation characters could be extracted for the span
    Empty,
}

impl Occupancy {
    /// Sentinel value used in flat output
    pub const SENTINEL: f64 = -1.0;

    /// Numeric value with the sentinel substituted for empty spans
    pub fn value(&self) -> f64 {
        match self {
            Occupancy::Fraction(f) => *f,
            Occupancy::Empty => Self::SENTINEL,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Occupancy::Empty)
    }
}

impl std::fmt::Display for Occupancy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Occupancy::Fraction(v) => write!(f, "{}", v),
            Occupancy::Empty => f.write_str("-1"),
        }
    }
}

/// Occupancy per annotation source, in configured source order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureProfile {
    values: Vec<(String, Occupancy)>,
}

impl FeatureProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source: impl Into<String>, occupancy: Occupancy) {
        let source = source.into();
        match self.values.iter_mut().find(|(name, _)| *name == source) {
            Some(slot) => slot.1 = occupancy,
            None => self.values.push((source, occupancy)),
        }
    }

    pub fn get(&self, source: &str) -> Option<Occupancy> {
        self.values
            .iter()
            .find(|(name, _)| name == source)
            .map(|(_, occupancy)| *occupancy)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Occupancy)> {
        self.values.iter().map(|(name, occupancy)| (name.as_str(), *occupancy))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Ordinal disorder category produced by the binner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Index into the bin table, 0 = least disordered
    Bin(usize),
    /// Sentinel or out-of-range fraction; rendered as the lowest bin
    Undefined,
}

/// A region together with its feature profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedRegion {
    pub region: Region,
    pub profile: FeatureProfile,
}

/// Final per-protein result of the region engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedProtein {
    pub acc: String,
    pub length: usize,
    /// Regions surviving the primary-source filter, in coordinate order
    pub regions: Vec<AnnotatedRegion>,
    pub quality: QualityLabels,
    /// One string per architecture column, in grid order
    pub architectures: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_len() {
        let region = Region {
            start: 10,
            end: 30,
            name: "TED01".to_string(),
            kind: RegionType::Domain,
        };
        assert_eq!(region.len(), 21);

        let inverted = Region {
            start: 5,
            end: 4,
            ..region
        };
        assert_eq!(inverted.len(), 0);
        assert!(inverted.is_empty());
    }

    #[test]
    fn test_quality_label_parse() {
        assert_eq!("A".parse::<QualityLabel>(), Ok(QualityLabel::A));
        assert_eq!(" Z ".parse::<QualityLabel>(), Ok(QualityLabel::Z));
        assert!("C".parse::<QualityLabel>().is_err());
    }

    #[test]
    fn test_occupancy_sentinel_is_distinct_from_zero() {
        assert_eq!(Occupancy::Empty.value(), -1.0);
        assert_eq!(Occupancy::Fraction(0.0).value(), 0.0);
        assert_ne!(Occupancy::Empty, Occupancy::Fraction(0.0));
        assert_eq!(Occupancy::Empty.to_string(), "-1");
        assert_eq!(Occupancy::Fraction(0.6).to_string(), "0.6");
    }

    #[test]
    fn test_feature_profile_keeps_insertion_order() {
        let mut profile = FeatureProfile::new();
        profile.insert("lite", Occupancy::Fraction(0.1));
        profile.insert("th50", Occupancy::Fraction(0.9));
        profile.insert("lite", Occupancy::Fraction(0.2));

        let names: Vec<&str> = profile.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["lite", "th50"]);
        assert_eq!(profile.get("lite"), Some(Occupancy::Fraction(0.2)));
        assert_eq!(profile.get("afd"), None);
    }

    #[test]
    fn test_region_type_strings() {
        assert_eq!(RegionType::InternalLink.to_string(), "internal_link");
        assert!(RegionType::InternalLink.is_linker());
        assert!(!RegionType::Nter.is_linker());
        assert!(RegionType::Cter.is_terminal());
    }
}
