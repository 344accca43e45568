// MobiDB Sequence Features
//
// Renders MobiDB JSON-lines entries into per-residue binary strings, one
// annotation table column per feature.
//
// Input (one JSON object per line):
//   {"acc": "P12345", "length": 154,
//    "prediction-disorder-th_50": {"regions": [[1, 20], [90, 120]]}, ...}
//
// Output columns are `acc` followed by `<feature>_sequence` for every
// feature. A feature absent from an entry is filled from its source's fill
// character when a configured source reads that column.

use crate::config::AnnotationSourceConfig;
use crate::tables::tsv_writer;
use protarch_common::Result;
use serde::Deserialize;
use serde_json::Value;
use serde_jsonlines::JsonLinesReader;
use std::collections::HashMap;
use std::io::{BufRead, Write};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Features extracted from every entry, in output order
pub const DEFAULT_FEATURES: [&str; 6] = [
    "prediction-disorder-mobidb_lite",
    "prediction-disorder-th_50",
    "derived-missing_residues-th_90",
    "prediction-disorder-alphafold",
    "prediction-plddt-alphafold",
    "prediction-low_complexity-mobidb_lite_sub",
];

const BACKGROUND: char = '0';
const FOREGROUND: char = '1';

/// One MobiDB entry; features are kept as raw JSON until rendered
#[derive(Debug, Clone, Deserialize)]
pub struct MobidbEntry {
    pub acc: String,
    pub length: usize,
    #[serde(flatten)]
    pub features: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct FeatureRegions {
    #[serde(default)]
    regions: Option<Vec<(usize, usize)>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    #[error("region {start}-{end} runs past sequence length {length}")]
    OutOfBounds {
        start: usize,
        end: usize,
        length: usize,
    },

    #[error("malformed regions: {0}")]
    Malformed(String),
}

/// Column name for a feature
pub fn column_name(feature: &str) -> String {
    format!("{}_sequence", feature)
}

/// Render regions as a residue string.
///
/// Positions `start..end` (1-based, end excluded) become `1`, everything
/// else `0`. Any position outside `1..=length` is an error.
pub fn regions_to_sequence(
    regions: &[(usize, usize)],
    length: usize,
) -> std::result::Result<String, SequenceError> {
    let mut residues = vec![BACKGROUND; length];
    for &(start, end) in regions {
        for pos in start..end {
            if pos == 0 || pos > length {
                return Err(SequenceError::OutOfBounds { start, end, length });
            }
            residues[pos - 1] = FOREGROUND;
        }
    }
    Ok(residues.into_iter().collect())
}

impl MobidbEntry {
    /// Residue string of one feature; `None` when the entry lacks it
    pub fn sequence(&self, feature: &str) -> Option<std::result::Result<String, SequenceError>> {
        let value = self.features.get(feature)?;
        let parsed: FeatureRegions = match serde_json::from_value(value.clone()) {
            Ok(parsed) => parsed,
            Err(e) => return Some(Err(SequenceError::Malformed(e.to_string()))),
        };
        let regions = parsed.regions.unwrap_or_default();
        Some(regions_to_sequence(&regions, self.length))
    }
}

/// Counters for one conversion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceStats {
    pub entries: usize,
    pub filled: usize,
    pub errors: usize,
    pub skipped: usize,
}

/// Convert MobiDB JSON lines to an annotation table.
///
/// A feature whose regions cannot be rendered is logged, counted and left
/// empty, so the region engine treats it as missing.
pub fn write_sequence_features<R: BufRead, W: Write>(
    reader: R,
    writer: W,
    features: &[String],
    sources: &[AnnotationSourceConfig],
) -> Result<SequenceStats> {
    let fills: HashMap<&str, char> = sources
        .iter()
        .filter_map(|s| s.fill.map(|fill| (s.column.as_str(), fill)))
        .collect();

    let mut out = tsv_writer(writer);
    let mut header = vec!["acc".to_string()];
    header.extend(features.iter().map(|f| column_name(f)));
    out.write_record(&header)?;

    let mut stats = SequenceStats::default();
    for (i, entry) in JsonLinesReader::new(reader).read_all::<MobidbEntry>().enumerate() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(line = i + 1, error = %e, "Skipping MobiDB entry");
                stats.skipped += 1;
                continue;
            },
        };

        let mut row = Vec::with_capacity(features.len() + 1);
        row.push(entry.acc.clone());
        for feature in features {
            let column = column_name(feature);
            let value = match entry.sequence(feature) {
                Some(Ok(sequence)) => sequence,
                Some(Err(e)) => {
                    warn!(acc = %entry.acc, feature = %feature, error = %e, "Cannot render feature");
                    stats.errors += 1;
                    String::new()
                },
                None => match fills.get(column.as_str()) {
                    Some(&fill) => {
                        stats.filled += 1;
                        std::iter::repeat(fill).take(entry.length).collect()
                    },
                    None => String::new(),
                },
            };
            row.push(value);
        }
        out.write_record(&row)?;

        stats.entries += 1;
        if stats.entries % 100_000 == 0 {
            debug!(entries = stats.entries, "MobiDB progress");
        }
    }
    out.flush()?;

    info!(
        entries = stats.entries,
        filled = stats.filled,
        errors = stats.errors,
        skipped = stats.skipped,
        "Wrote sequence features"
    );
    Ok(stats)
}
