//! Gap-filling partitioner
//!
//! Turns a protein's domain intervals into an ordered list of regions that
//! covers `[1, length]` exactly: every gap before, between and after the
//! domains becomes a synthesized linker named after its two neighbours.

use crate::classify::{classify, linker_name, C_TERMINUS, N_TERMINUS};
use crate::error::RegionError;
use crate::models::{DomainInterval, Protein, Region};
use tracing::{debug, trace};

/// Regions of one protein plus the intervals dropped on the way
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub regions: Vec<Region>,
    pub rejected: Vec<RegionError>,
}

/// Sorted, validated intervals ready for gap filling
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedIntervals {
    pub intervals: Vec<DomainInterval>,
    pub rejected: Vec<RegionError>,
}

/// Sort intervals by (start, end, id) and drop the ones that would break the
/// partition.
///
/// Rejected: `start >= end`, `start < 1`, `end > length`, and intervals that
/// lie entirely inside the previous kept interval. An interval that only
/// shares its leading residues with the previous one is clipped to begin
/// right after it.
pub fn normalize(acc: &str, length: usize, mut intervals: Vec<DomainInterval>) -> NormalizedIntervals {
    intervals.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then(a.end.cmp(&b.end))
            .then_with(|| a.domain_id.cmp(&b.domain_id))
    });

    let mut kept = Vec::with_capacity(intervals.len());
    let mut rejected = Vec::new();
    let mut last_end = 0usize;

    for mut interval in intervals {
        if interval.start < 1 || interval.start >= interval.end || interval.end > length {
            rejected.push(RegionError::MalformedInterval {
                acc: acc.to_string(),
                start: interval.start,
                end: interval.end,
                length,
            });
            continue;
        }

        if interval.start <= last_end {
            if interval.end <= last_end {
                rejected.push(RegionError::OverlappingInterval {
                    acc: acc.to_string(),
                    start: interval.start,
                    end: interval.end,
                });
                continue;
            }
            debug!(
                acc,
                domain = %interval.domain_id,
                from = interval.start,
                to = last_end + 1,
                "Clipping interval overlapping the previous domain"
            );
            interval.start = last_end + 1;
        }

        last_end = interval.end;
        kept.push(interval);
    }

    NormalizedIntervals {
        intervals: kept,
        rejected,
    }
}

/// Fill the gaps around sorted, non-overlapping intervals.
///
/// The caller guarantees the ordering; use [`partition`] for raw input.
pub fn fill_gaps(length: usize, intervals: &[DomainInterval]) -> Vec<Region> {
    let mut regions = Vec::with_capacity(intervals.len() * 2 + 1);
    let mut last_end = 0usize;
    let mut last_name: Option<&str> = None;

    for interval in intervals {
        if interval.start > last_end + 1 {
            let name = linker_name(last_name.unwrap_or(N_TERMINUS), &interval.domain_id);
            regions.push(region(last_end + 1, interval.start - 1, name));
        }

        regions.push(region(interval.start, interval.end, interval.domain_id.clone()));
        last_end = interval.end;
        last_name = Some(&interval.domain_id);
    }

    if last_end < length {
        let name = linker_name(last_name.unwrap_or(N_TERMINUS), C_TERMINUS);
        regions.push(region(last_end + 1, length, name));
    }

    regions
}

fn region(start: usize, end: usize, name: String) -> Region {
    let kind = classify(&name);
    trace!(start, end, name = %name, kind = %kind, "Region");
    Region {
        start,
        end,
        name,
        kind,
    }
}

/// Check that regions are contiguous and cover exactly `1..=length`
pub fn verify_partition(acc: &str, length: usize, regions: &[Region]) -> Result<(), RegionError> {
    let violation = |message: String| RegionError::PartitionViolation {
        acc: acc.to_string(),
        length,
        message,
    };

    let (first, last) = match (regions.first(), regions.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(violation("no regions".to_string())),
    };

    if first.start != 1 {
        return Err(violation(format!("first region starts at {}", first.start)));
    }
    if last.end != length {
        return Err(violation(format!("last region ends at {}", last.end)));
    }

    for region in regions {
        if region.start > region.end {
            return Err(violation(format!("inverted region {}-{}", region.start, region.end)));
        }
    }
    for pair in regions.windows(2) {
        if pair[1].start != pair[0].end + 1 {
            return Err(violation(format!(
                "gap or overlap between {}-{} and {}-{}",
                pair[0].start, pair[0].end, pair[1].start, pair[1].end
            )));
        }
    }

    Ok(())
}

/// Normalize, fill gaps and verify one protein's region list
pub fn partition(protein: &Protein, intervals: Vec<DomainInterval>) -> Result<Partition, RegionError> {
    let normalized = normalize(&protein.acc, protein.length, intervals);
    let regions = fill_gaps(protein.length, &normalized.intervals);
    verify_partition(&protein.acc, protein.length, &regions)?;

    Ok(Partition {
        regions,
        rejected: normalized.rejected,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::models::RegionType;
    use proptest::prelude::*;

    fn spans(regions: &[Region]) -> Vec<(usize, usize)> {
        regions.iter().map(|r| (r.start, r.end)).collect()
    }

    #[test]
    fn test_zero_domains_single_region() {
        let protein = Protein::new("P00001", 120);
        let partition = partition(&protein, Vec::new()).unwrap();

        assert_eq!(spans(&partition.regions), vec![(1, 120)]);
        assert_eq!(partition.regions[0].name, "N-terminus_link_C-terminus");
        assert_eq!(partition.regions[0].kind, RegionType::Nter);
    }

    #[test]
    fn test_boundary_flush_domain() {
        let protein = Protein::new("P00002", 50);
        let partition = partition(&protein, vec![DomainInterval::new(1, 50, "TED01")]).unwrap();

        assert_eq!(partition.regions.len(), 1);
        assert_eq!(partition.regions[0].kind, RegionType::Domain);
        assert_eq!(spans(&partition.regions), vec![(1, 50)]);
    }

    #[test]
    fn test_two_domains_with_gaps() {
        let protein = Protein::new("P00003", 100);
        let intervals = vec![
            DomainInterval::new(40, 60, "TED02"),
            DomainInterval::new(10, 30, "TED01"),
        ];
        let partition = partition(&protein, intervals).unwrap();

        assert_eq!(
            spans(&partition.regions),
            vec![(1, 9), (10, 30), (31, 39), (40, 60), (61, 100)]
        );
        let names: Vec<&str> = partition.regions.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "N-terminus_link_TED01",
                "TED01",
                "TED01_link_TED02",
                "TED02",
                "TED02_link_C-terminus"
            ]
        );
        let kinds: Vec<RegionType> = partition.regions.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RegionType::Nter,
                RegionType::Domain,
                RegionType::Link,
                RegionType::Domain,
                RegionType::Cter
            ]
        );
    }

    #[test]
    fn test_discontinuous_domain_gives_internal_link() {
        let protein = Protein::new("P00004", 100);
        let intervals = vec![
            DomainInterval::new(10, 30, "TED01"),
            DomainInterval::new(40, 60, "TED01"),
        ];
        let partition = partition(&protein, intervals).unwrap();

        assert_eq!(partition.regions[2].name, "TED01_link_TED01");
        assert_eq!(partition.regions[2].kind, RegionType::InternalLink);
    }

    #[test]
    fn test_adjacent_domains_have_no_linker() {
        let protein = Protein::new("P00005", 60);
        let intervals = vec![
            DomainInterval::new(1, 30, "TED01"),
            DomainInterval::new(31, 60, "TED02"),
        ];
        let partition = partition(&protein, intervals).unwrap();

        assert_eq!(spans(&partition.regions), vec![(1, 30), (31, 60)]);
    }

    #[test]
    fn test_single_residue_gap_becomes_linker() {
        let protein = Protein::new("P00006", 61);
        let intervals = vec![
            DomainInterval::new(2, 30, "TED01"),
            DomainInterval::new(32, 60, "TED02"),
        ];
        let partition = partition(&protein, intervals).unwrap();

        assert_eq!(
            spans(&partition.regions),
            vec![(1, 1), (2, 30), (31, 31), (32, 60), (61, 61)]
        );
    }

    #[test]
    fn test_malformed_intervals_are_rejected() {
        let protein = Protein::new("P00007", 100);
        let intervals = vec![
            DomainInterval::new(30, 30, "TED01"),
            DomainInterval::new(50, 20, "TED02"),
            DomainInterval::new(0, 10, "TED03"),
            DomainInterval::new(90, 101, "TED04"),
            DomainInterval::new(40, 60, "TED05"),
        ];
        let partition = partition(&protein, intervals).unwrap();

        assert_eq!(partition.rejected.len(), 4);
        assert!(partition.rejected.iter().all(RegionError::is_recoverable));
        assert_eq!(spans(&partition.regions), vec![(1, 39), (40, 60), (61, 100)]);
    }

    #[test]
    fn test_boundary_overlap_is_clipped() {
        let protein = Protein::new("P00008", 100);
        let intervals = vec![
            DomainInterval::new(10, 30, "TED01"),
            DomainInterval::new(30, 50, "TED02"),
            DomainInterval::new(35, 45, "TED03"),
        ];
        let partition = partition(&protein, intervals).unwrap();

        assert_eq!(spans(&partition.regions), vec![(1, 9), (10, 30), (31, 50), (51, 100)]);
        assert_eq!(partition.rejected.len(), 1);
        assert!(matches!(
            partition.rejected[0],
            RegionError::OverlappingInterval { start: 35, end: 45, .. }
        ));
    }

    #[test]
    fn test_verify_partition_detects_gap() {
        let regions = vec![
            Region {
                start: 1,
                end: 10,
                name: "TED01".to_string(),
                kind: RegionType::Domain,
            },
            Region {
                start: 12,
                end: 20,
                name: "TED02".to_string(),
                kind: RegionType::Domain,
            },
        ];
        let err = verify_partition("P00009", 20, &regions).unwrap_err();
        assert_eq!(err.code(), "partition_violation");
    }

    #[test]
    fn test_verify_partition_rejects_empty() {
        assert!(verify_partition("P00010", 10, &[]).is_err());
    }

    fn arb_case() -> impl Strategy<Value = (usize, Vec<DomainInterval>)> {
        (1usize..400).prop_flat_map(|length| {
            let interval = (0usize..length + 5, 0usize..60, 0u8..4).prop_map(|(start, span, id)| {
                DomainInterval::new(start, start + span, format!("TED{:02}", id))
            });
            (Just(length), proptest::collection::vec(interval, 0..8))
        })
    }

    proptest! {
        #[test]
        fn prop_partition_is_complete((length, intervals) in arb_case()) {
            let protein = Protein::new("PROP", length);
            let partition = partition(&protein, intervals).unwrap();

            let total: usize = partition.regions.iter().map(Region::len).sum();
            prop_assert_eq!(total, length);
            prop_assert_eq!(partition.regions.first().map(|r| r.start), Some(1));
            prop_assert_eq!(partition.regions.last().map(|r| r.end), Some(length));
            for pair in partition.regions.windows(2) {
                prop_assert_eq!(pair[1].start, pair[0].end + 1);
            }
        }

        #[test]
        fn prop_partition_is_deterministic((length, intervals) in arb_case()) {
            let protein = Protein::new("PROP", length);
            let mut reversed = intervals.clone();
            reversed.reverse();

            let first = partition(&protein, intervals).unwrap();
            let second = partition(&protein, reversed).unwrap();
            prop_assert_eq!(first.regions, second.regions);
        }
    }
}
