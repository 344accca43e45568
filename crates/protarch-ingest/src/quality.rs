//! Domain quality labels from CATH granularity and quality score

use crate::models::QualityLabel;
use crate::tables::{column_index, tsv_reader, tsv_writer};
use protarch_common::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{Read, Write};
use tracing::{info, warn};

/// Thresholds for the three quality tiers.
///
/// Levels count the dot-separated parts of a CATH label, so "3.40.50.300"
/// has 4 levels and "3.40.50" has 3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityThresholds {
    pub high_min_qscore: f64,
    pub high_cath_levels: usize,
    pub medium_min_qscore: f64,
    pub medium_min_cath_levels: usize,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            high_min_qscore: 0.75,
            high_cath_levels: 4,
            medium_min_qscore: 0.7,
            medium_min_cath_levels: 3,
        }
    }
}

fn cath_levels(label: &str) -> usize {
    label.matches('.').count() + 1
}

/// Assign a label; missing inputs are low quality.
///
/// A: exactly `high_cath_levels` levels and qscore >= `high_min_qscore`.
/// B: at least `medium_min_cath_levels` levels and qscore >= `medium_min_qscore`.
/// Z: anything else.
pub fn assign(
    cath_label: Option<&str>,
    qscore: Option<f64>,
    thresholds: &QualityThresholds,
) -> QualityLabel {
    let (Some(label), Some(qscore)) = (cath_label.map(str::trim), qscore) else {
        return QualityLabel::Z;
    };
    if label.is_empty() || qscore.is_nan() {
        return QualityLabel::Z;
    }

    let levels = cath_levels(label);
    if levels == thresholds.high_cath_levels && qscore >= thresholds.high_min_qscore {
        QualityLabel::A
    } else if levels >= thresholds.medium_min_cath_levels && qscore >= thresholds.medium_min_qscore {
        QualityLabel::B
    } else {
        QualityLabel::Z
    }
}

// ============================================================================
// Domain table annotation
// ============================================================================

/// Load `tid\tqscore` pairs (no header)
pub fn read_qscores<R: Read>(reader: R) -> Result<HashMap<String, f64>> {
    let mut scores = HashMap::new();
    for (i, result) in tsv_reader(reader, false).records().enumerate() {
        let record = result?;
        let (Some(tid), Some(score)) = (record.get(0), record.get(1)) else {
            continue;
        };
        match score.trim().parse::<f64>() {
            Ok(score) => {
                scores.insert(tid.trim().to_string(), score);
            },
            Err(_) => warn!(line = i + 1, tid, score, "Skipping invalid qscore"),
        }
    }
    Ok(scores)
}

/// Load CATH labels from a domain summary with `ted_id` and `cath_label` columns
pub fn read_cath_labels<R: Read>(reader: R) -> Result<HashMap<String, String>> {
    const TABLE: &str = "domain summary";

    let mut rows = tsv_reader(reader, true);
    let headers = rows.headers()?.clone();
    let id_idx = column_index(&headers, TABLE, "ted_id")?;
    let label_idx = column_index(&headers, TABLE, "cath_label")?;

    let mut labels = HashMap::new();
    for result in rows.records() {
        let record = result?;
        if let (Some(id), Some(label)) = (record.get(id_idx), record.get(label_idx)) {
            let label = label.trim();
            // "-" marks an unclassified domain
            if !label.is_empty() && label != "-" {
                labels.insert(id.trim().to_string(), label.to_string());
            }
        }
    }
    Ok(labels)
}

/// Counters for one annotated domain table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QualityStats {
    pub written: usize,
    pub without_qscore: usize,
    pub by_label: HashMap<QualityLabel, usize>,
}

/// Append `qscore`, `cath_label` and `qcat` columns to a domain table.
///
/// Rows are matched on `tid`; rows without a qscore are dropped.
pub fn annotate_domains<R: Read, W: Write>(
    domains: R,
    writer: W,
    qscores: &HashMap<String, f64>,
    cath_labels: &HashMap<String, String>,
    thresholds: &QualityThresholds,
) -> Result<QualityStats> {
    let mut rows = tsv_reader(domains, true);
    let headers = rows.headers()?.clone();
    let tid_idx = column_index(&headers, "domain table", "tid")?;

    let mut out = tsv_writer(writer);
    let mut header: Vec<&str> = headers.iter().collect();
    header.extend(["qscore", "cath_label", "qcat"]);
    out.write_record(&header)?;

    let mut stats = QualityStats::default();
    for result in rows.records() {
        let record = result?;
        let tid = record.get(tid_idx).map(str::trim).unwrap_or_default();

        let Some(&qscore) = qscores.get(tid) else {
            stats.without_qscore += 1;
            continue;
        };
        let cath_label = cath_labels.get(tid).map(String::as_str);
        let label = assign(cath_label, Some(qscore), thresholds);

        let qscore = qscore.to_string();
        let label_text = label.to_string();
        let mut fields: Vec<&str> = record.iter().collect();
        fields.extend([qscore.as_str(), cath_label.unwrap_or_default(), label_text.as_str()]);
        out.write_record(&fields)?;

        stats.written += 1;
        *stats.by_label.entry(label).or_default() += 1;
    }
    out.flush()?;

    info!(
        written = stats.written,
        without_qscore = stats.without_qscore,
        "Assigned domain quality labels"
    );
    Ok(stats)
}
