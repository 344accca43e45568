// TED Domain Boundary Parser
//
// Converts consensus domain boundary records into domain table rows.
//
// Input (tab-separated, no header):
//   tid                          positions     level
//   AF-P12345-F1-model_v4_TED01  10-30_45-80   high
//
// Every `_`-separated segment of `positions` becomes one row sharing the
// domain id, so discontinuous domains yield several rows. Segments whose
// start is not below their end are dropped.

use crate::models::DomainInterval;
use crate::tables::{tsv_reader, tsv_writer, ProteinTable};
use protarch_common::{ProtarchError, Result};
use std::io::{Read, Write};
use tracing::{debug, info, warn};

/// Output header; readable by the domain table reader
pub const DOMAIN_COLUMNS: [&str; 7] = [
    "tid",
    "positions",
    "level",
    "acc",
    "tednum",
    "dom_start",
    "dom_end",
];

/// One domain segment of a boundary record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TedSegment {
    pub tid: String,
    pub positions: String,
    pub level: String,
    pub acc: String,
    pub interval: DomainInterval,
}

impl TedSegment {
    fn fields(&self) -> [String; 7] {
        [
            self.tid.clone(),
            self.positions.clone(),
            self.level.clone(),
            self.acc.clone(),
            self.interval.domain_id.clone(),
            self.interval.start.to_string(),
            self.interval.end.to_string(),
        ]
    }
}

/// Split a TED domain id into (accession, domain number)
///
/// `AF-P12345-F1-model_v4_TED01` gives `("P12345", "TED01")`.
pub fn parse_tid(tid: &str) -> Option<(&str, &str)> {
    let acc = tid.split('-').nth(1).filter(|a| !a.is_empty())?;
    let tednum = tid.rsplit('_').next().filter(|t| !t.is_empty() && *t != tid)?;
    Some((acc, tednum))
}

fn parse_segment(segment: &str) -> Option<(usize, usize)> {
    let (start, end) = segment.split_once('-')?;
    Some((start.trim().parse().ok()?, end.trim().parse().ok()?))
}

/// Parse one boundary record into its segments
pub fn parse_record(line: usize, tid: &str, positions: &str, level: &str) -> Result<Vec<TedSegment>> {
    let (acc, tednum) = parse_tid(tid)
        .ok_or_else(|| ProtarchError::parse(line, format!("Invalid TED id: {}", tid)))?;

    let mut segments = Vec::new();
    for segment in positions.split('_').filter(|s| !s.is_empty()) {
        let (start, end) = parse_segment(segment).ok_or_else(|| {
            ProtarchError::parse(line, format!("Invalid segment '{}' in {}", segment, tid))
        })?;

        if start >= end {
            debug!(tid, segment, "Dropping empty segment");
            continue;
        }

        segments.push(TedSegment {
            tid: tid.to_string(),
            positions: segment.to_string(),
            level: level.to_string(),
            acc: acc.to_string(),
            interval: DomainInterval::new(start, end, tednum),
        });
    }
    Ok(segments)
}

/// Counters for one boundary file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TedStats {
    pub records: usize,
    pub segments: usize,
    pub filtered: usize,
    pub skipped: usize,
}

/// Stream boundary records into a domain table.
///
/// With `proteins` set, records of other accessions are left out.
pub fn convert_boundaries<R: Read, W: Write>(
    reader: R,
    writer: W,
    proteins: Option<&ProteinTable>,
) -> Result<TedStats> {
    let mut rows = tsv_reader(reader, false);
    let mut out = tsv_writer(writer);
    out.write_record(DOMAIN_COLUMNS)?;

    let mut stats = TedStats::default();
    for (i, result) in rows.records().enumerate() {
        let record = result?;
        let line = i + 1;

        let (Some(tid), Some(positions)) = (record.get(0), record.get(1)) else {
            warn!(line, "Skipping short boundary record");
            stats.skipped += 1;
            continue;
        };
        let level = record.get(2).unwrap_or_default();
        stats.records += 1;

        let segments = match parse_record(line, tid.trim(), positions.trim(), level.trim()) {
            Ok(segments) => segments,
            Err(e) => {
                warn!(error = %e, "Skipping boundary record");
                stats.skipped += 1;
                continue;
            },
        };

        for segment in segments {
            if proteins.is_some_and(|p| !p.contains(&segment.acc)) {
                stats.filtered += 1;
                continue;
            }
            out.write_record(segment.fields())?;
            stats.segments += 1;
        }

        if stats.records % 1_000_000 == 0 {
            debug!(records = stats.records, segments = stats.segments, "Boundary progress");
        }
    }
    out.flush()?;

    info!(
        records = stats.records,
        segments = stats.segments,
        filtered = stats.filtered,
        skipped = stats.skipped,
        "Converted TED boundaries"
    );
    Ok(stats)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::models::Protein;
    use crate::quality::QualityThresholds;
    use crate::tables::read_domains;

    #[test]
    fn test_parse_tid() {
        assert_eq!(parse_tid("AF-P12345-F1-model_v4_TED01"), Some(("P12345", "TED01")));
        assert_eq!(parse_tid("AF-A0A024RBG1-F1-model_v4_TED12"), Some(("A0A024RBG1", "TED12")));
        assert_eq!(parse_tid("garbage"), None);
    }

    #[test]
    fn test_discontinuous_domain() {
        let segments = parse_record(1, "AF-P12345-F1-model_v4_TED02", "10-30_45-80", "high").unwrap();

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].interval, DomainInterval::new(10, 30, "TED02"));
        assert_eq!(segments[1].interval, DomainInterval::new(45, 80, "TED02"));
        assert_eq!(segments[1].positions, "45-80");
        assert_eq!(segments[0].acc, "P12345");
    }

    #[test]
    fn test_drops_empty_segments() {
        let segments = parse_record(1, "AF-P12345-F1-model_v4_TED01", "40-40_50-45_60-70", "").unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].interval.start, 60);
    }

    #[test]
    fn test_invalid_segment_is_error() {
        assert!(parse_record(1, "AF-P12345-F1-model_v4_TED01", "10to30", "high").is_err());
    }

    #[test]
    fn test_convert_filters_and_reads_back() {
        let input = "AF-P12345-F1-model_v4_TED01\t10-30\thigh\n\
                     AF-P12345-F1-model_v4_TED02\t45-60_70-90\thigh\n\
                     AF-Q00000-F1-model_v4_TED01\t1-50\thigh\n\
                     broken\n";
        let proteins: ProteinTable = vec![Protein::new("P12345", 120)].into_iter().collect();

        let mut buf = Vec::new();
        let stats = convert_boundaries(input.as_bytes(), &mut buf, Some(&proteins)).unwrap();

        assert_eq!(stats.records, 3);
        assert_eq!(stats.segments, 3);
        assert_eq!(stats.filtered, 1);
        assert_eq!(stats.skipped, 1);

        let domains = read_domains(buf.as_slice(), &QualityThresholds::default()).unwrap();
        assert_eq!(
            domains.intervals_for("P12345"),
            vec![
                DomainInterval::new(10, 30, "TED01"),
                DomainInterval::new(45, 60, "TED02"),
                DomainInterval::new(70, 90, "TED02"),
            ]
        );
        assert!(domains.quality_for("P12345").is_empty());
    }
}
