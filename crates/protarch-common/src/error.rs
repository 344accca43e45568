//! Error types for protarch

use thiserror::Error;

/// Result type alias for batch-level operations
pub type Result<T> = std::result::Result<T, ProtarchError>;

/// Batch-level error type.
///
/// Anything reported through this type aborts the run: the inputs could not
/// be read or the configuration is unusable. Problems confined to a single
/// protein are reported separately and never surface here.
#[derive(Error, Debug)]
pub enum ProtarchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Table error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Missing column '{column}' in {table}")]
    MissingColumn { table: String, column: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ProtarchError {
    /// Create a parse error for a 1-based input line
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Create a missing column error
    pub fn missing_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message() {
        let err = ProtarchError::parse(12, "length is not a number");
        assert_eq!(err.to_string(), "Parse error at line 12: length is not a number");
    }

    #[test]
    fn test_missing_column_message() {
        let err = ProtarchError::missing_column("domain table", "dom_start");
        assert_eq!(err.to_string(), "Missing column 'dom_start' in domain table");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "proteins.tsv");
        let err: ProtarchError = io.into();
        assert!(matches!(err, ProtarchError::Io(_)));
    }
}
