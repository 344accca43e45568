// Pipeline Configuration
//
// Options for region features and architecture encoding. Loaded from an
// optional TOML file, overlaid with PROTARCH_* environment variables, then
// with command-line flags.

use crate::binning::BinTable;
use crate::quality::QualityThresholds;
use protarch_common::{ProtarchError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::path::Path;

// ============================================================================
// Defaults
// ============================================================================

/// Minimum region lengths of the reference architecture grid.
pub const DEFAULT_MIN_LENGTHS: [usize; 2] = [10, 20];

/// Sources whose categories are encoded into architectures.
pub const DEFAULT_CATEGORICAL_SOURCES: [&str; 2] = ["th50", "lite"];

/// Regions with an empty span in this source are dropped before encoding.
pub const DEFAULT_PRIMARY_SOURCE: &str = "th50";

/// Shortest linker written to the linker table.
pub const DEFAULT_LINKER_MIN_LENGTH: usize = 10;

/// Residue character counted as positive in every default source.
pub const DEFAULT_POSITIVE: char = '1';

fn default_positive() -> char {
    DEFAULT_POSITIVE
}

/// One per-residue annotation source and its fill rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationSourceConfig {
    /// Short name used in output columns (e.g. "th50")
    pub name: String,

    /// Column holding the residue string in the annotation table
    pub column: String,

    /// Character used to build a full-length string when the value is
    /// missing; `None` leaves the source undefined for that protein
    #[serde(default)]
    pub fill: Option<char>,

    /// Character counted as a positive residue
    #[serde(default = "default_positive")]
    pub positive: char,
}

impl AnnotationSourceConfig {
    pub fn new(name: &str, column: &str, fill: Option<char>) -> Self {
        Self {
            name: name.to_string(),
            column: column.to_string(),
            fill,
            positive: DEFAULT_POSITIVE,
        }
    }
}

/// The reference pipeline's five sources
pub fn default_sources() -> Vec<AnnotationSourceConfig> {
    vec![
        AnnotationSourceConfig::new("lite", "prediction-disorder-mobidb_lite_sequence", Some('0')),
        AnnotationSourceConfig::new("th50", "prediction-disorder-th_50_sequence", Some('0')),
        AnnotationSourceConfig::new("afd", "prediction-disorder-alphafold_sequence", Some('0')),
        AnnotationSourceConfig::new(
            "lcd",
            "prediction-low_complexity-mobidb_lite_sub_sequence",
            Some('0'),
        ),
        AnnotationSourceConfig::new("pdbd", "derived-missing_residues-th_90_sequence", Some('-')),
    ]
}

/// Region engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Minimum region lengths, one architecture column set per value
    pub min_lengths: Vec<usize>,

    /// Sources whose categories fill linker positions of architectures
    pub categorical_sources: Vec<String>,

    /// Source whose empty spans exclude a region
    pub primary_source: String,

    /// Annotation sources, in output order
    pub sources: Vec<AnnotationSourceConfig>,

    /// Occupancy breakpoints and category symbols
    pub bins: BinTable,

    /// Quality label thresholds for domains without a precomputed label
    pub quality: QualityThresholds,

    /// Exclude proteins that have no annotation table row
    pub require_annotation_record: bool,

    /// Shortest linker written to the linker table
    pub linker_min_length: usize,

    /// Worker threads; `None` lets rayon decide
    pub threads: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_lengths: DEFAULT_MIN_LENGTHS.to_vec(),
            categorical_sources: DEFAULT_CATEGORICAL_SOURCES.iter().map(|s| s.to_string()).collect(),
            primary_source: DEFAULT_PRIMARY_SOURCE.to_string(),
            sources: default_sources(),
            bins: BinTable::default(),
            quality: QualityThresholds::default(),
            require_annotation_record: true,
            linker_min_length: DEFAULT_LINKER_MIN_LENGTH,
            threads: None,
        }
    }
}

impl PipelineConfig {
    /// Load a TOML configuration file; unspecified keys keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| ProtarchError::config(format!("{}: {}", path.display(), e)))
    }

    /// Overlay environment variables
    ///
    /// Environment variables:
    /// - PROTARCH_MIN_LENGTHS (comma separated, e.g. "10,20")
    /// - PROTARCH_CATEGORICAL_SOURCES (comma separated, e.g. "th50,lite")
    /// - PROTARCH_PRIMARY_SOURCE
    /// - PROTARCH_THREADS
    pub fn apply_env(mut self) -> Result<Self> {
        if let Ok(value) = env::var("PROTARCH_MIN_LENGTHS") {
            self.min_lengths = parse_lengths(&value)?;
        }

        if let Ok(value) = env::var("PROTARCH_CATEGORICAL_SOURCES") {
            self.categorical_sources = split_list(&value);
        }

        if let Ok(value) = env::var("PROTARCH_PRIMARY_SOURCE") {
            self.primary_source = value.trim().to_string();
        }

        if let Ok(value) = env::var("PROTARCH_THREADS") {
            let threads = value
                .trim()
                .parse()
                .map_err(|_| ProtarchError::config(format!("Invalid PROTARCH_THREADS: {}", value)))?;
            self.threads = Some(threads);
        }

        Ok(self)
    }

    /// Look up a source by short name
    pub fn source(&self, name: &str) -> Option<&AnnotationSourceConfig> {
        self.sources.iter().find(|s| s.name == name)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.min_lengths.is_empty() {
            return Err(ProtarchError::config("At least one minimum length is required"));
        }

        if self.min_lengths.contains(&0) {
            return Err(ProtarchError::config("Minimum lengths must be greater than 0"));
        }

        if self.categorical_sources.is_empty() {
            return Err(ProtarchError::config("At least one categorical source is required"));
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            if !seen.insert(source.name.as_str()) {
                return Err(ProtarchError::config(format!(
                    "Duplicate annotation source: {}",
                    source.name
                )));
            }
            if !source.positive.is_ascii() || source.fill.is_some_and(|c| !c.is_ascii()) {
                return Err(ProtarchError::config(format!(
                    "Source {} must use ASCII residue characters",
                    source.name
                )));
            }
        }

        if self.source(&self.primary_source).is_none() {
            return Err(ProtarchError::config(format!(
                "Unknown primary source: {}",
                self.primary_source
            )));
        }

        for name in &self.categorical_sources {
            if self.source(name).is_none() {
                return Err(ProtarchError::config(format!("Unknown categorical source: {}", name)));
            }
        }

        if self.threads == Some(0) {
            return Err(ProtarchError::config("Thread count must be greater than 0"));
        }

        self.bins.validate()
    }
}

/// Parse a comma separated list of lengths
pub fn parse_lengths(value: &str) -> Result<Vec<usize>> {
    split_list(value)
        .iter()
        .map(|item| {
            item.parse::<usize>()
                .map_err(|_| ProtarchError::config(format!("Invalid minimum length: {}", item)))
        })
        .collect()
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
