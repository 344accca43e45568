// Region Pipeline
//
// Runs the region engine over every protein of the protein table:
//
//   domain intervals -> partition -> feature profiles -> primary-source
//   filter -> architecture strings
//
// Proteins are independent; the batch is spread over a rayon pool and the
// results are sorted by accession so output does not depend on scheduling.
// A protein that fails is excluded with its reason; it never aborts the run.

use crate::architecture::{self, ArchitectureColumn};
use crate::config::PipelineConfig;
use crate::error::RegionError;
use crate::features::{AnnotationRecord, ProteinAnnotations};
use crate::models::{AnnotatedRegion, DomainInterval, ProcessedProtein, Protein, QualityLabels};
use crate::partition::partition;
use crate::progress;
use crate::tables::{DomainTable, ProteinTable};
use protarch_common::{ProtarchError, Result};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Everything the engine reads, keyed by accession
#[derive(Debug, Clone, Default)]
pub struct PipelineInputs {
    pub proteins: ProteinTable,
    pub domains: DomainTable,
    pub annotations: HashMap<String, AnnotationRecord>,
}

/// Result of one protein: the processed protein or the reason it was
/// excluded, plus any intervals dropped along the way
#[derive(Debug, Clone, PartialEq)]
pub struct ProteinOutcome {
    pub result: std::result::Result<ProcessedProtein, RegionError>,
    pub dropped_intervals: Vec<RegionError>,
}

/// Batch counters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineStats {
    pub proteins_total: usize,
    pub proteins_processed: usize,
    pub proteins_rejected: usize,
    pub regions_written: usize,
    pub intervals_dropped: usize,
    pub unknown_proteins: usize,
    pub rejections_by_reason: BTreeMap<&'static str, usize>,
    pub duration_seconds: f64,
}

/// Sorted results of a batch run
#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    pub proteins: Vec<ProcessedProtein>,
    /// Excluded proteins and dropped intervals, sorted by accession
    pub rejections: Vec<RegionError>,
    pub stats: PipelineStats,
}

pub struct Pipeline {
    config: PipelineConfig,
    columns: Vec<ArchitectureColumn>,
    show_progress: bool,
}

impl Pipeline {
    /// Create a pipeline; the configuration is validated up front
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let columns = architecture::columns(&config.min_lengths, &config.categorical_sources);
        Ok(Self {
            config,
            columns,
            show_progress: false,
        })
    }

    /// Draw a progress bar on stderr while running
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Architecture columns in output order
    pub fn columns(&self) -> &[ArchitectureColumn] {
        &self.columns
    }

    /// Run the engine for one protein
    pub fn process_protein(
        &self,
        protein: &Protein,
        intervals: Vec<DomainInterval>,
        record: Option<&AnnotationRecord>,
        quality: QualityLabels,
    ) -> ProteinOutcome {
        let mut dropped_intervals = Vec::new();
        let result = self.process_inner(protein, intervals, record, quality, &mut dropped_intervals);
        ProteinOutcome {
            result,
            dropped_intervals,
        }
    }

    fn process_inner(
        &self,
        protein: &Protein,
        intervals: Vec<DomainInterval>,
        record: Option<&AnnotationRecord>,
        quality: QualityLabels,
        dropped: &mut Vec<RegionError>,
    ) -> std::result::Result<ProcessedProtein, RegionError> {
        if self.config.require_annotation_record && record.is_none() {
            return Err(RegionError::NoAnnotationRecord {
                acc: protein.acc.clone(),
            });
        }

        let partition = partition(protein, intervals)?;
        for rejected in &partition.rejected {
            warn!(acc = %protein.acc, reason = rejected.code(), "{}", rejected);
        }
        dropped.extend(partition.rejected);

        let annotations = ProteinAnnotations::resolve(protein, record, &self.config.sources)?;

        let primary = self.config.primary_source.as_str();
        let total = partition.regions.len();
        let regions: Vec<AnnotatedRegion> = partition
            .regions
            .into_iter()
            .map(|region| AnnotatedRegion {
                profile: annotations.profile(&region),
                region,
            })
            .filter(|r| r.profile.get(primary).is_some_and(|o| !o.is_empty()))
            .collect();

        if regions.is_empty() {
            return Err(RegionError::EmptyPrimary {
                acc: protein.acc.clone(),
                source_name: primary.to_string(),
            });
        }
        if regions.len() < total {
            debug!(
                acc = %protein.acc,
                dropped = total - regions.len(),
                "Dropped regions without a primary fraction"
            );
        }

        let architectures =
            architecture::encode_all(&regions, &self.columns, &self.config.bins, &quality);

        Ok(ProcessedProtein {
            acc: protein.acc.clone(),
            length: protein.length,
            regions,
            quality,
            architectures,
        })
    }

    fn thread_pool(&self) -> Result<rayon::ThreadPool> {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(threads) = self.config.threads {
            builder = builder.num_threads(threads);
        }
        builder
            .build()
            .map_err(|e| ProtarchError::config(format!("Failed to build thread pool: {}", e)))
    }

    /// Process every protein of the protein table
    pub fn run(&self, inputs: &PipelineInputs) -> Result<PipelineOutput> {
        let start_time = Instant::now();
        let proteins: Vec<&Protein> = inputs.proteins.iter().collect();

        info!(
            proteins = proteins.len(),
            columns = self.columns.len(),
            "Starting region pipeline"
        );

        let pb = progress::create_progress_bar(proteins.len() as u64, "Building regions", self.show_progress);
        let pool = self.thread_pool()?;

        let mut outcomes: Vec<(String, ProteinOutcome)> = pool.install(|| {
            proteins
                .par_iter()
                .map(|protein| {
                    let outcome = self.process_protein(
                        protein,
                        inputs.domains.intervals_for(&protein.acc),
                        inputs.annotations.get(&protein.acc),
                        inputs.domains.quality_for(&protein.acc),
                    );
                    pb.inc(1);
                    (protein.acc.clone(), outcome)
                })
                .collect()
        });
        pb.finish_and_clear();

        outcomes.sort_by(|a, b| a.0.cmp(&b.0));

        let mut output = PipelineOutput::default();
        output.stats.proteins_total = proteins.len();

        for (_, outcome) in outcomes {
            output.stats.intervals_dropped += outcome.dropped_intervals.len();
            output.rejections.extend(outcome.dropped_intervals);

            match outcome.result {
                Ok(protein) => {
                    output.stats.proteins_processed += 1;
                    output.stats.regions_written += protein.regions.len();
                    output.proteins.push(protein);
                },
                Err(e) => {
                    debug!(acc = e.acc(), reason = e.code(), "Excluded protein");
                    output.stats.proteins_rejected += 1;
                    output.rejections.push(e);
                },
            }
        }

        output.stats.intervals_dropped += inputs.domains.rejected.len();
        output.rejections.extend(inputs.domains.rejected.iter().cloned());

        let mut unknown: Vec<&String> = inputs
            .domains
            .intervals
            .keys()
            .filter(|acc| !inputs.proteins.contains(acc))
            .collect();
        unknown.sort();
        for acc in unknown {
            warn!(acc = %acc, "Domain intervals for a protein missing from the protein table");
            output.stats.unknown_proteins += 1;
            output.rejections.push(RegionError::UnknownProtein { acc: acc.clone() });
        }

        output.rejections.sort_by(|a, b| a.acc().cmp(b.acc()));
        for rejection in &output.rejections {
            *output.stats.rejections_by_reason.entry(rejection.code()).or_default() += 1;
        }
        output.stats.duration_seconds = start_time.elapsed().as_secs_f64();

        info!(
            processed = output.stats.proteins_processed,
            rejected = output.stats.proteins_rejected,
            regions = output.stats.regions_written,
            intervals_dropped = output.stats.intervals_dropped,
            unknown = output.stats.unknown_proteins,
            "Region pipeline complete in {:.2}s",
            output.stats.duration_seconds
        );

        Ok(output)
    }
}

// ============================================================================
// Tests
// ============================================================================
