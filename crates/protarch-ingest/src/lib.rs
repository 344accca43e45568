//! Protarch Region Engine
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Decomposes proteins into domain and linker regions and summarizes each
//! protein as architecture strings.
//!
//! # Overview
//!
//! - **Partitioning**: fill the gaps around domain intervals so regions cover
//!   every residue exactly once ([`partition`])
//! - **Classification**: derive the region type from its name ([`classify`])
//! - **Features**: per-region occupancy of per-residue annotations ([`features`])
//! - **Binning**: occupancy fractions to ordinal categories ([`binning`])
//! - **Architectures**: one character per region, per length threshold and
//!   source ([`architecture`])
//! - **Inputs**: TED boundaries ([`ted`]), MobiDB entries ([`mobidb`]) and
//!   domain quality labels ([`quality`])
//!
//! # Example
//!
//! ```
//! use protarch_ingest::config::PipelineConfig;
//! use protarch_ingest::features::AnnotationRecord;
//! use protarch_ingest::models::{DomainInterval, Protein, QualityLabels};
//! use protarch_ingest::pipeline::Pipeline;
//!
//! let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
//! let protein = Protein::new("P12345", 40);
//! let mut record = AnnotationRecord::new();
//! record.insert("th50".to_string(), "1".repeat(40));
//!
//! let outcome = pipeline.process_protein(
//!     &protein,
//!     vec![DomainInterval::new(11, 30, "TED01")],
//!     Some(&record),
//!     QualityLabels::new(),
//! );
//! let processed = outcome.result.unwrap();
//! assert_eq!(processed.architectures[0], "_-_");
//! ```

pub mod architecture;
pub mod binning;
pub mod classify;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod features;
pub mod linkers;
pub mod mobidb;
pub mod models;
pub mod partition;
pub mod pipeline;
pub mod progress;
pub mod quality;
pub mod tables;
pub mod ted;

// Re-export commonly used types
pub use cli::{Cli, Commands};
pub use config::PipelineConfig;
pub use error::RegionError;
pub use pipeline::{Pipeline, PipelineInputs, PipelineOutput};
