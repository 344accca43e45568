// Tabular Inputs and Outputs
//
// Tab-separated readers for the protein, domain and annotation tables and
// writers for the region, architecture, linker and rejection tables.
//
// File Formats:
// 1. Protein table - accession first, length last, optional header
//    Example: P12345\treviewed\tKIN1_HUMAN\tKinase 1\tHomo sapiens\t154
//
// 2. Domain table - header with acc, dom_start, dom_end, tednum
//    (optional qcat, qscore, cath_label)
//    Example: P12345\t10\t100\tTED01\tA
//
// 3. Annotation table - header with acc and one residue-string column per source
//
// Inputs ending in .gz are decompressed on the fly; outputs ending in .gz
// are compressed.

use crate::architecture::ArchitectureColumn;
use crate::config::{AnnotationSourceConfig, PipelineConfig};
use crate::error::RegionError;
use crate::features::AnnotationRecord;
use crate::models::{AnnotatedRegion, DomainInterval, ProcessedProtein, Protein, QualityLabels};
use crate::quality::{assign, QualityThresholds};
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use protarch_common::{ProtarchError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info, warn};

// ============================================================================
// Plumbing
// ============================================================================

fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Open a file for reading, decompressing `.gz` inputs
pub fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path)?;
    if is_gzip(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Output file, compressed when its path ends in `.gz`.
///
/// Must be closed with [`OutputFile::finish`]; dropping it discards any
/// error raised while writing the gzip trailer or the last buffer.
pub enum OutputFile {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl OutputFile {
    /// Write the gzip trailer and flush everything to the file
    pub fn finish(self) -> Result<()> {
        let buffered = match self {
            OutputFile::Plain(writer) => writer,
            OutputFile::Gzip(encoder) => encoder.finish()?,
        };
        buffered.into_inner().map_err(|e| e.into_error())?;
        Ok(())
    }
}

impl Write for OutputFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            OutputFile::Plain(writer) => writer.write(buf),
            OutputFile::Gzip(encoder) => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            OutputFile::Plain(writer) => writer.flush(),
            OutputFile::Gzip(encoder) => encoder.flush(),
        }
    }
}

/// Create a file for writing, compressing `.gz` outputs
pub fn create_output(path: &Path) -> Result<OutputFile> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = BufWriter::new(File::create(path)?);
    if is_gzip(path) {
        Ok(OutputFile::Gzip(GzEncoder::new(file, Compression::default())))
    } else {
        Ok(OutputFile::Plain(file))
    }
}

/// Create `path`, fill it with `write` and finish it
pub fn write_file<T, F>(path: &Path, write: F) -> Result<T>
where
    F: FnOnce(&mut OutputFile) -> Result<T>,
{
    let mut out = create_output(path)?;
    let written = write(&mut out)?;
    out.finish()?;
    Ok(written)
}

/// Tab-separated reader without quote handling
pub fn tsv_reader<R: Read>(reader: R, has_headers: bool) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(has_headers)
        .flexible(true)
        .quoting(false)
        .from_reader(reader)
}

/// Tab-separated writer that never quotes
pub fn tsv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer)
}

/// Index of a required header column
pub fn column_index(headers: &csv::StringRecord, table: &str, column: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| ProtarchError::missing_column(table, column))
}

fn line_of(record: &csv::StringRecord, fallback: usize) -> usize {
    record
        .position()
        .map(|p| p.line() as usize)
        .unwrap_or(fallback)
}

// ============================================================================
// Protein table
// ============================================================================

/// Proteins in file order with an accession index
#[derive(Debug, Clone, Default)]
pub struct ProteinTable {
    proteins: Vec<Protein>,
    index: HashMap<String, usize>,
}

impl ProteinTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a protein; a repeated accession keeps the first entry
    pub fn insert(&mut self, protein: Protein) -> bool {
        if self.index.contains_key(&protein.acc) {
            return false;
        }
        self.index.insert(protein.acc.clone(), self.proteins.len());
        self.proteins.push(protein);
        true
    }

    pub fn get(&self, acc: &str) -> Option<&Protein> {
        self.index.get(acc).map(|&i| &self.proteins[i])
    }

    pub fn contains(&self, acc: &str) -> bool {
        self.index.contains_key(acc)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Protein> {
        self.proteins.iter()
    }

    pub fn len(&self) -> usize {
        self.proteins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proteins.is_empty()
    }
}

impl FromIterator<Protein> for ProteinTable {
    fn from_iter<I: IntoIterator<Item = Protein>>(iter: I) -> Self {
        let mut table = Self::new();
        for protein in iter {
            table.insert(protein);
        }
        table
    }
}

/// Parse a protein table: accession in the first column, length in the last
pub fn read_proteins<R: Read>(reader: R) -> Result<ProteinTable> {
    let mut table = ProteinTable::new();
    let mut rows = tsv_reader(reader, false);

    for (i, result) in rows.records().enumerate() {
        let record = result?;
        let line = line_of(&record, i + 1);

        let (Some(acc), Some(length)) = (record.get(0), record.iter().last()) else {
            continue;
        };
        let acc = acc.trim();
        if acc.is_empty() || acc.starts_with('#') {
            continue;
        }

        match length.trim().parse::<usize>() {
            Ok(length) if length > 0 => {
                if !table.insert(Protein::new(acc, length)) {
                    warn!(acc, line, "Duplicate accession in protein table; keeping first");
                }
            },
            // A non-numeric length on the first line is a header
            Err(_) if i == 0 => debug!(line, "Skipping protein table header"),
            _ => warn!(acc, line, length, "Skipping protein with invalid length"),
        }
    }

    info!(proteins = table.len(), "Loaded protein table");
    Ok(table)
}

pub fn read_proteins_file(path: &Path) -> Result<ProteinTable> {
    read_proteins(open_input(path)?)
}

// ============================================================================
// Domain table
// ============================================================================

#[derive(Debug, Deserialize)]
struct DomainRow {
    acc: String,
    dom_start: usize,
    dom_end: usize,
    tednum: String,
    #[serde(default)]
    qcat: Option<String>,
    #[serde(default)]
    qscore: Option<f64>,
    #[serde(default)]
    cath_label: Option<String>,
}

/// Domain intervals and quality labels grouped by accession
#[derive(Debug, Clone, Default)]
pub struct DomainTable {
    pub intervals: HashMap<String, Vec<DomainInterval>>,
    pub quality: HashMap<String, QualityLabels>,
    /// Rows whose bounds could not be read
    pub rejected: Vec<RegionError>,
}

impl DomainTable {
    pub fn intervals_for(&self, acc: &str) -> Vec<DomainInterval> {
        self.intervals.get(acc).cloned().unwrap_or_default()
    }

    pub fn quality_for(&self, acc: &str) -> QualityLabels {
        self.quality.get(acc).cloned().unwrap_or_default()
    }

    pub fn interval_count(&self) -> usize {
        self.intervals.values().map(Vec::len).sum()
    }
}

/// Parse a domain table.
///
/// Quality labels come from the `qcat` column when the table has one;
/// otherwise they are derived from `qscore` and `cath_label` when a `qscore`
/// column exists; otherwise domains carry no label.
pub fn read_domains<R: Read>(reader: R, thresholds: &QualityThresholds) -> Result<DomainTable> {
    const TABLE: &str = "domain table";

    let mut rows = tsv_reader(reader, true);
    let headers = rows.headers()?.clone();
    let acc_idx = column_index(&headers, TABLE, "acc")?;
    for column in ["dom_start", "dom_end", "tednum"] {
        column_index(&headers, TABLE, column)?;
    }
    let has_qcat = headers.iter().any(|h| h == "qcat");
    let has_qscore = headers.iter().any(|h| h == "qscore");

    let mut table = DomainTable::default();
    let mut skipped = 0usize;

    for (i, result) in rows.records().enumerate() {
        let record = result?;
        let line = line_of(&record, i + 2);

        let row: DomainRow = match record.deserialize(Some(&headers)) {
            Ok(row) => row,
            Err(e) => {
                warn!(line, error = %e, "Skipping domain row");
                skipped += 1;
                if let Some(acc) = record.get(acc_idx).map(str::trim).filter(|a| !a.is_empty()) {
                    table.rejected.push(RegionError::UnreadableInterval {
                        acc: acc.to_string(),
                        line,
                        message: e.to_string(),
                    });
                }
                continue;
            },
        };

        let label = if has_qcat {
            row.qcat.as_deref().and_then(|q| q.parse().ok())
        } else if has_qscore {
            Some(assign(row.cath_label.as_deref(), row.qscore, thresholds))
        } else {
            None
        };
        if let Some(label) = label {
            table
                .quality
                .entry(row.acc.clone())
                .or_default()
                .insert(row.tednum.clone(), label);
        }

        table
            .intervals
            .entry(row.acc)
            .or_default()
            .push(DomainInterval::new(row.dom_start, row.dom_end, row.tednum));
    }

    info!(
        proteins = table.intervals.len(),
        intervals = table.interval_count(),
        skipped,
        "Loaded domain table"
    );
    Ok(table)
}

pub fn read_domains_file(path: &Path, thresholds: &QualityThresholds) -> Result<DomainTable> {
    read_domains(open_input(path)?, thresholds)
}

// ============================================================================
// Annotation table
// ============================================================================

/// Parse an annotation table into per-accession records keyed by source name.
///
/// A configured column absent from the header leaves that source missing for
/// every protein.
pub fn read_annotations<R: Read>(
    reader: R,
    sources: &[AnnotationSourceConfig],
) -> Result<HashMap<String, AnnotationRecord>> {
    let mut rows = tsv_reader(reader, true);
    let headers = rows.headers()?.clone();
    let acc_idx = column_index(&headers, "annotation table", "acc")?;

    let mut columns = Vec::with_capacity(sources.len());
    for source in sources {
        match headers.iter().position(|h| h == source.column) {
            Some(idx) => columns.push((source.name.as_str(), idx)),
            None => warn!(source = %source.name, column = %source.column, "Annotation column not found"),
        }
    }

    let mut records = HashMap::new();
    for result in rows.records() {
        let record = result?;
        let Some(acc) = record.get(acc_idx).map(str::trim).filter(|a| !a.is_empty()) else {
            continue;
        };

        let mut values = AnnotationRecord::new();
        for &(name, idx) in &columns {
            if let Some(value) = record.get(idx).map(str::trim).filter(|v| !v.is_empty()) {
                values.insert(name.to_string(), value.to_string());
            }
        }
        records.insert(acc.to_string(), values);
    }

    info!(proteins = records.len(), "Loaded annotation table");
    Ok(records)
}

pub fn read_annotations_file(
    path: &Path,
    sources: &[AnnotationSourceConfig],
) -> Result<HashMap<String, AnnotationRecord>> {
    read_annotations(open_input(path)?, sources)
}

// ============================================================================
// Writers
// ============================================================================

fn region_fields(
    acc: &str,
    region: &AnnotatedRegion,
    config: &PipelineConfig,
    quality: &QualityLabels,
) -> Vec<String> {
    let r = &region.region;
    let mut fields = vec![
        acc.to_string(),
        r.name.clone(),
        r.start.to_string(),
        r.end.to_string(),
        r.len().to_string(),
        r.kind.to_string(),
    ];

    for source in &config.sources {
        fields.push(
            region
                .profile
                .get(&source.name)
                .map(|o| o.to_string())
                .unwrap_or_default(),
        );
    }
    for name in &config.categorical_sources {
        fields.push(
            region
                .profile
                .get(name)
                .map(|o| config.bins.symbol_for(o).to_string())
                .unwrap_or_default(),
        );
    }

    let label = if r.kind.is_linker() || r.kind.is_terminal() {
        String::new()
    } else {
        quality.get(&r.name).map(|l| l.to_string()).unwrap_or_default()
    };
    fields.push(label);
    fields
}

fn region_header(config: &PipelineConfig) -> Vec<String> {
    let mut header: Vec<String> = ["acc", "feature", "start", "end", "length", "type"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    header.extend(config.sources.iter().map(|s| format!("{}_dc", s.name)));
    header.extend(config.categorical_sources.iter().map(|s| format!("{}_cat", s)));
    header.push("qcat".to_string());
    header
}

/// One row per region with occupancies, categories and domain labels
pub fn write_regions<W: Write>(
    writer: W,
    proteins: &[ProcessedProtein],
    config: &PipelineConfig,
) -> Result<usize> {
    let mut out = tsv_writer(writer);
    out.write_record(region_header(config))?;

    let mut rows = 0;
    for protein in proteins {
        for region in &protein.regions {
            out.write_record(region_fields(&protein.acc, region, config, &protein.quality))?;
            rows += 1;
        }
    }
    out.flush()?;
    Ok(rows)
}

/// One row per protein with one architecture string per column
pub fn write_architectures<W: Write>(
    writer: W,
    proteins: &[ProcessedProtein],
    columns: &[ArchitectureColumn],
) -> Result<usize> {
    let mut out = tsv_writer(writer);

    let mut header = vec!["acc".to_string()];
    header.extend(columns.iter().map(ArchitectureColumn::name));
    out.write_record(&header)?;

    for protein in proteins {
        let mut row = Vec::with_capacity(columns.len() + 1);
        row.push(protein.acc.as_str());
        row.extend(protein.architectures.iter().map(String::as_str));
        out.write_record(&row)?;
    }
    out.flush()?;
    Ok(proteins.len())
}

/// Linkers between domains at least `linker_min_length` long, with the
/// architectures of their protein
pub fn write_linkers<W: Write>(
    writer: W,
    proteins: &[ProcessedProtein],
    columns: &[ArchitectureColumn],
    config: &PipelineConfig,
) -> Result<usize> {
    let mut out = tsv_writer(writer);

    let mut header = region_header(config);
    header.extend(columns.iter().map(ArchitectureColumn::name));
    out.write_record(&header)?;

    let mut rows = 0;
    for protein in proteins {
        for region in crate::linkers::linkers(&protein.regions, config.linker_min_length) {
            let mut fields = region_fields(&protein.acc, region, config, &protein.quality);
            fields.extend(protein.architectures.iter().cloned());
            out.write_record(&fields)?;
            rows += 1;
        }
    }
    out.flush()?;
    Ok(rows)
}

/// One row per excluded protein or dropped interval
pub fn write_rejections<W: Write>(writer: W, rejections: &[RegionError]) -> Result<usize> {
    let mut out = tsv_writer(writer);
    out.write_record(["acc", "reason", "detail"])?;
    for rejection in rejections {
        let detail = rejection.to_string();
        out.write_record([rejection.acc(), rejection.code(), detail.as_str()])?;
    }
    out.flush()?;
    Ok(rejections.len())
}
