//! Linker selection for the linker table

use crate::models::AnnotatedRegion;

/// Inter- and intra-domain linkers at least `min_length` residues long.
///
/// Terminal regions are not linkers even though they border a domain.
pub fn linkers(
    regions: &[AnnotatedRegion],
    min_length: usize,
) -> impl Iterator<Item = &AnnotatedRegion> {
    regions
        .iter()
        .filter(move |r| r.region.kind.is_linker() && r.region.len() >= min_length)
}
