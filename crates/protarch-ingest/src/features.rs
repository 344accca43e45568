//! Per-region occupancy of per-residue annotation strings
//!
//! Each annotation source contributes one residue string per protein (one
//! character per position). A region's occupancy in a source is the share of
//! its positions carrying the source's positive character.

use crate::config::AnnotationSourceConfig;
use crate::error::RegionError;
use crate::models::{FeatureProfile, Occupancy, Protein, Region};
use std::collections::HashMap;
use tracing::trace;

/// Raw residue strings of one protein, keyed by source name
pub type AnnotationRecord = HashMap<String, String>;

/// A residue string checked against its protein's length
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    residues: String,
}

impl Annotation {
    /// Accept a residue string only when it covers the protein exactly
    pub fn new(protein: &Protein, source: &str, residues: String) -> Result<Self, RegionError> {
        // Residue alphabets are ASCII, so byte length is residue count
        if !residues.is_ascii() {
            return Err(RegionError::InvalidAlphabet {
                acc: protein.acc.clone(),
                source_name: source.to_string(),
            });
        }
        if residues.len() != protein.length {
            return Err(RegionError::LengthMismatch {
                acc: protein.acc.clone(),
                source_name: source.to_string(),
                expected: protein.length,
                actual: residues.len(),
            });
        }
        Ok(Self { residues })
    }

    /// Full-length string of a single fill character
    pub fn filled(fill: char, length: usize) -> Self {
        Self {
            residues: std::iter::repeat(fill).take(length).collect(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.residues
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}

/// Occupancy of `positive` over the region's 1-based inclusive span.
///
/// Returns [`Occupancy::Empty`] when no characters can be extracted: an
/// inverted span or a span outside the string.
pub fn aggregate(region: &Region, annotation: &str, positive: char) -> Occupancy {
    if region.start == 0 || region.start > region.end {
        return Occupancy::Empty;
    }

    let Some(span) = annotation.as_bytes().get(region.start - 1..region.end) else {
        return Occupancy::Empty;
    };
    if span.is_empty() {
        return Occupancy::Empty;
    }

    let mut buf = [0u8; 4];
    let positive = positive.encode_utf8(&mut buf).as_bytes();
    let hits = match positive {
        [byte] => span.iter().filter(|&&b| b == *byte).count(),
        _ => 0,
    };

    Occupancy::Fraction(hits as f64 / span.len() as f64)
}

/// Resolved annotations of one protein, in configured source order.
///
/// `None` marks a source with neither a value nor a fill character.
#[derive(Debug, Clone, PartialEq)]
pub struct ProteinAnnotations {
    sources: Vec<(AnnotationSourceConfig, Option<Annotation>)>,
}

impl ProteinAnnotations {
    /// Validate the record's strings and fill the missing ones.
    ///
    /// A string of the wrong length fails the whole protein.
    pub fn resolve(
        protein: &Protein,
        record: Option<&AnnotationRecord>,
        sources: &[AnnotationSourceConfig],
    ) -> Result<Self, RegionError> {
        let mut resolved = Vec::with_capacity(sources.len());

        for source in sources {
            let value = record
                .and_then(|r| r.get(&source.name))
                .filter(|v| !v.is_empty());

            let annotation = match (value, source.fill) {
                (Some(value), _) => Some(Annotation::new(protein, &source.name, value.clone())?),
                (None, Some(fill)) => {
                    trace!(acc = %protein.acc, source = %source.name, "Filling missing annotation");
                    Some(Annotation::filled(fill, protein.length))
                },
                (None, None) => None,
            };

            resolved.push((source.clone(), annotation));
        }

        Ok(Self { sources: resolved })
    }

    /// Occupancy of every source over one region
    pub fn profile(&self, region: &Region) -> FeatureProfile {
        let mut profile = FeatureProfile::new();
        for (source, annotation) in &self.sources {
            let occupancy = match annotation {
                Some(annotation) => aggregate(region, annotation.as_str(), source.positive),
                None => Occupancy::Empty,
            };
            profile.insert(source.name.clone(), occupancy);
        }
        profile
    }
}
