// Command Implementations
//
// Each subcommand loads its inputs, runs the blocking work off the async
// runtime and reports a short summary on stdout. Diagnostics go through
// tracing.

use crate::cli::RunArgs;
use crate::config::PipelineConfig;
use crate::mobidb::{self, DEFAULT_FEATURES};
use crate::pipeline::{Pipeline, PipelineInputs, PipelineOutput};
use crate::quality::{self, QualityThresholds};
use crate::tables::{self, open_input};
use crate::ted;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Output file names of the `run` command
pub const REGIONS_FILE: &str = "regions.tsv";
pub const ARCHITECTURES_FILE: &str = "architectures.tsv";
pub const LINKERS_FILE: &str = "linkers.tsv";
pub const REJECTIONS_FILE: &str = "rejections.tsv";

/// Defaults, then the config file, then PROTARCH_* variables
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    let config = match path {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    Ok(config.apply_env()?)
}

/// Command-line flags take precedence over every other layer
pub fn apply_run_args(mut config: PipelineConfig, args: &RunArgs) -> PipelineConfig {
    if !args.min_lengths.is_empty() {
        config.min_lengths = args.min_lengths.clone();
    }
    if !args.categorical_sources.is_empty() {
        config.categorical_sources = args.categorical_sources.clone();
    }
    if let Some(ref primary) = args.primary_source {
        config.primary_source = primary.clone();
    }
    if args.threads.is_some() {
        config.threads = args.threads;
    }
    if args.allow_missing_annotations {
        config.require_annotation_record = false;
    }
    config
}

async fn blocking<T, F>(task: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> protarch_common::Result<T> + Send + 'static,
{
    Ok(tokio::task::spawn_blocking(task)
        .await
        .context("Blocking task failed")??)
}

/// Load the three input tables concurrently
pub async fn load_inputs(args: &RunArgs, config: &PipelineConfig) -> Result<PipelineInputs> {
    let proteins_path = args.proteins.clone();
    let domains_path = args.domains.clone();
    let annotations_path = args.annotations.clone();
    let thresholds = config.quality.clone();
    let sources = config.sources.clone();

    let (proteins, domains, annotations) = tokio::try_join!(
        blocking(move || tables::read_proteins_file(&proteins_path)),
        blocking(move || tables::read_domains_file(&domains_path, &thresholds)),
        blocking(move || tables::read_annotations_file(&annotations_path, &sources)),
    )?;

    Ok(PipelineInputs {
        proteins,
        domains,
        annotations,
    })
}

fn output_path(dir: &Path, name: &str, gzip: bool) -> PathBuf {
    if gzip {
        dir.join(format!("{}.gz", name))
    } else {
        dir.join(name)
    }
}

/// Write the four output tables of a run
pub fn write_outputs(
    dir: &Path,
    gzip: bool,
    pipeline: &Pipeline,
    output: &PipelineOutput,
) -> Result<()> {
    let config = pipeline.config();

    let path = output_path(dir, REGIONS_FILE, gzip);
    let rows = tables::write_file(&path, |out| tables::write_regions(out, &output.proteins, config))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), rows, "Wrote regions");

    let path = output_path(dir, ARCHITECTURES_FILE, gzip);
    let rows = tables::write_file(&path, |out| {
        tables::write_architectures(out, &output.proteins, pipeline.columns())
    })
    .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), rows, "Wrote architectures");

    let path = output_path(dir, LINKERS_FILE, gzip);
    let rows = tables::write_file(&path, |out| {
        tables::write_linkers(out, &output.proteins, pipeline.columns(), config)
    })
    .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), rows, "Wrote linkers");

    let path = output_path(dir, REJECTIONS_FILE, gzip);
    let rows = tables::write_file(&path, |out| tables::write_rejections(out, &output.rejections))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), rows, "Wrote rejections");

    Ok(())
}

/// `protarch run`
pub async fn run(config_path: Option<&Path>, args: &RunArgs) -> Result<()> {
    let config = apply_run_args(load_config(config_path)?, args);
    let pipeline = Arc::new(
        Pipeline::new(config)
            .context("Invalid pipeline configuration")?
            .with_progress(args.progress),
    );

    let inputs = Arc::new(load_inputs(args, pipeline.config()).await?);

    let output = {
        let pipeline = Arc::clone(&pipeline);
        let inputs = Arc::clone(&inputs);
        blocking(move || pipeline.run(&inputs)).await?
    };

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;
    write_outputs(&args.output_dir, args.gzip, &pipeline, &output)?;

    let stats = &output.stats;
    println!(
        "Processed {} of {} proteins ({} regions); {} rejected, {} intervals dropped, {} unknown accessions",
        stats.proteins_processed,
        stats.proteins_total,
        stats.regions_written,
        stats.proteins_rejected,
        stats.intervals_dropped,
        stats.unknown_proteins
    );
    for (reason, count) in &stats.rejections_by_reason {
        println!("  {}: {}", reason, count);
    }
    Ok(())
}

/// `protarch quality`
pub async fn quality(
    config_path: Option<&Path>,
    domains: PathBuf,
    qscores: PathBuf,
    summary: Option<PathBuf>,
    output: PathBuf,
) -> Result<()> {
    let thresholds: QualityThresholds = load_config(config_path)?.quality;

    let stats = blocking(move || {
        let scores = quality::read_qscores(open_input(&qscores)?)?;
        let labels = match summary {
            Some(path) => quality::read_cath_labels(open_input(&path)?)?,
            None => HashMap::new(),
        };
        tables::write_file(&output, |out| {
            quality::annotate_domains(open_input(&domains)?, out, &scores, &labels, &thresholds)
        })
    })
    .await?;

    let mut labels: Vec<_> = stats.by_label.iter().collect();
    labels.sort();
    println!(
        "Labelled {} domains ({} without qscore)",
        stats.written, stats.without_qscore
    );
    for (label, count) in labels {
        println!("  {}: {}", label, count);
    }
    Ok(())
}

/// `protarch parse-ted`
pub async fn parse_ted(boundaries: PathBuf, proteins: Option<PathBuf>, output: PathBuf) -> Result<()> {
    let stats = blocking(move || {
        let proteins = proteins
            .map(|path| tables::read_proteins_file(&path))
            .transpose()?;
        tables::write_file(&output, |out| {
            ted::convert_boundaries(open_input(&boundaries)?, out, proteins.as_ref())
        })
    })
    .await?;

    println!(
        "Wrote {} domain segments from {} records ({} filtered, {} skipped)",
        stats.segments, stats.records, stats.filtered, stats.skipped
    );
    Ok(())
}

/// `protarch sequence-features`
pub async fn sequence_features(
    config_path: Option<&Path>,
    mobidb_path: PathBuf,
    features: Vec<String>,
    output: PathBuf,
) -> Result<()> {
    let sources = load_config(config_path)?.sources;
    let features = if features.is_empty() {
        DEFAULT_FEATURES.iter().map(|f| f.to_string()).collect()
    } else {
        features
    };

    let stats = blocking(move || {
        tables::write_file(&output, |out| {
            mobidb::write_sequence_features(
                BufReader::new(open_input(&mobidb_path)?),
                out,
                &features,
                &sources,
            )
        })
    })
    .await?;

    println!(
        "Wrote {} entries ({} features filled, {} render errors, {} skipped lines)",
        stats.entries, stats.filled, stats.errors, stats.skipped
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn args() -> RunArgs {
        RunArgs {
            proteins: PathBuf::from("p.tsv"),
            domains: PathBuf::from("d.tsv"),
            annotations: PathBuf::from("a.tsv"),
            output_dir: PathBuf::from("."),
            min_lengths: Vec::new(),
            categorical_sources: Vec::new(),
            primary_source: None,
            threads: None,
            allow_missing_annotations: false,
            gzip: false,
            progress: false,
        }
    }

    #[test]
    fn test_run_args_override_config() {
        let mut run_args = args();
        run_args.min_lengths = vec![30];
        run_args.threads = Some(4);
        run_args.allow_missing_annotations = true;

        let config = apply_run_args(PipelineConfig::default(), &run_args);
        assert_eq!(config.min_lengths, vec![30]);
        assert_eq!(config.categorical_sources, vec!["th50", "lite"]);
        assert_eq!(config.threads, Some(4));
        assert!(!config.require_annotation_record);
    }

    #[test]
    fn test_empty_flags_keep_config() {
        let config = apply_run_args(PipelineConfig::default(), &args());
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_output_path() {
        let dir = Path::new("out");
        assert_eq!(output_path(dir, REGIONS_FILE, false), PathBuf::from("out/regions.tsv"));
        assert_eq!(output_path(dir, REGIONS_FILE, true), PathBuf::from("out/regions.tsv.gz"));
    }
}
