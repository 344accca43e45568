//! Per-protein error taxonomy
//!
//! These errors never abort a batch. Interval-level problems drop the
//! offending interval; everything else excludes the protein from output with
//! the error as the reported reason.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegionError {
    #[error("{acc}: malformed interval {start}-{end} for protein of length {length}")]
    MalformedInterval {
        acc: String,
        start: usize,
        end: usize,
        length: usize,
    },

    #[error("{acc}: interval {start}-{end} lies inside the preceding domain")]
    OverlappingInterval { acc: String, start: usize, end: usize },

    #[error("{acc}: annotation '{source_name}' has {actual} residues, protein has {expected}")]
    LengthMismatch {
        acc: String,
        source_name: String,
        expected: usize,
        actual: usize,
    },

    #[error("{acc}: annotation '{source_name}' contains non-ASCII characters")]
    InvalidAlphabet { acc: String, source_name: String },

    #[error("{acc}: unreadable domain row at line {line}: {message}")]
    UnreadableInterval {
        acc: String,
        line: usize,
        message: String,
    },

    #[error("{acc}: not present in the protein table")]
    UnknownProtein { acc: String },

    #[error("{acc}: no record in the annotation table")]
    NoAnnotationRecord { acc: String },

    #[error("{acc}: no region has a defined '{source_name}' fraction")]
    EmptyPrimary { acc: String, source_name: String },

    #[error("{acc}: regions do not partition 1..={length}: {message}")]
    PartitionViolation {
        acc: String,
        length: usize,
        message: String,
    },
}

impl RegionError {
    /// Accession the error belongs to
    pub fn acc(&self) -> &str {
        match self {
            RegionError::MalformedInterval { acc, .. }
            | RegionError::OverlappingInterval { acc, .. }
            | RegionError::LengthMismatch { acc, .. }
            | RegionError::InvalidAlphabet { acc, .. }
            | RegionError::UnreadableInterval { acc, .. }
            | RegionError::UnknownProtein { acc }
            | RegionError::NoAnnotationRecord { acc }
            | RegionError::EmptyPrimary { acc, .. }
            | RegionError::PartitionViolation { acc, .. } => acc,
        }
    }

    /// Interval-level errors drop one interval; the protein is still processed
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RegionError::MalformedInterval { .. }
                | RegionError::OverlappingInterval { .. }
                | RegionError::UnreadableInterval { .. }
        )
    }

    /// Short machine-friendly reason code for the rejection report
    pub fn code(&self) -> &'static str {
        match self {
            RegionError::MalformedInterval { .. } | RegionError::UnreadableInterval { .. } => {
                "malformed_interval"
            },
            RegionError::OverlappingInterval { .. } => "overlapping_interval",
            RegionError::LengthMismatch { .. } => "length_mismatch",
            RegionError::InvalidAlphabet { .. } => "invalid_alphabet",
            RegionError::UnknownProtein { .. } => "unknown_protein",
            RegionError::NoAnnotationRecord { .. } => "no_annotation_record",
            RegionError::EmptyPrimary { .. } => "empty_primary",
            RegionError::PartitionViolation { .. } => "partition_violation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_errors_are_recoverable() {
        let err = RegionError::MalformedInterval {
            acc: "P12345".to_string(),
            start: 30,
            end: 10,
            length: 100,
        };
        assert!(err.is_recoverable());
        assert_eq!(err.acc(), "P12345");
        assert_eq!(err.code(), "malformed_interval");
    }

    #[test]
    fn test_length_mismatch_is_fatal_for_protein() {
        let err = RegionError::LengthMismatch {
            acc: "Q9Y6K9".to_string(),
            source_name: "th50".to_string(),
            expected: 120,
            actual: 118,
        };
        assert!(!err.is_recoverable());
        assert_eq!(
            err.to_string(),
            "Q9Y6K9: annotation 'th50' has 118 residues, protein has 120"
        );
    }

    #[test]
    fn test_unreadable_row_reports_as_malformed_interval() {
        let err = RegionError::UnreadableInterval {
            acc: "P12345".to_string(),
            line: 3,
            message: "invalid digit".to_string(),
        };
        assert!(err.is_recoverable());
        assert_eq!(err.code(), "malformed_interval");
    }
}
