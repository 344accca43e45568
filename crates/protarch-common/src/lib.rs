//! Protarch Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error handling and logging for the protarch workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`ProtarchError`] and the [`Result`] alias used for
//!   batch-level failures (unreadable tables, bad configuration)
//! - **Logging**: `tracing` subscriber setup shared by every binary
//!
//! # Example
//!
//! ```no_run
//! use protarch_common::{ProtarchError, Result};
//!
//! fn read_table(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path).map_err(ProtarchError::from)
//! }
//! ```

pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{ProtarchError, Result};
