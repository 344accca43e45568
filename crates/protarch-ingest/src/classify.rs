//! Region type classification from region names
//!
//! Synthesized regions are named `{left}_link_{right}`, where each side is a
//! domain id or one of the terminus markers. The type is derived once here
//! and carried on the region afterwards.

use crate::models::RegionType;

/// Left-hand marker of a region touching the protein start
pub const N_TERMINUS: &str = "N-terminus";

/// Right-hand marker of a region touching the protein end
pub const C_TERMINUS: &str = "C-terminus";

/// Token joining the two identities of a linker name
pub const LINK_DELIMITER: &str = "_link_";

/// Build the name of a synthesized linker
pub fn linker_name(left: &str, right: &str) -> String {
    format!("{}{}{}", left, LINK_DELIMITER, right)
}

/// Classify a region by name.
///
/// Checked in order: N-terminus marker, C-terminus marker, linker token,
/// otherwise a domain. A linker whose two identities are equal (the gap
/// inside a discontinuous domain) is an internal link. A name that contains
/// "link" but does not split into two identities is a source name and
/// classifies as a domain.
pub fn classify(name: &str) -> RegionType {
    if name.contains(N_TERMINUS) {
        return RegionType::Nter;
    }
    if name.contains(C_TERMINUS) {
        return RegionType::Cter;
    }
    if !name.contains("link") {
        return RegionType::Domain;
    }

    match name.split_once(LINK_DELIMITER) {
        Some((left, right)) if !left.is_empty() && !right.is_empty() => {
            if left == right {
                RegionType::InternalLink
            } else {
                RegionType::Link
            }
        },
        _ => RegionType::Domain,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminus_markers_take_priority() {
        assert_eq!(classify("N-terminus_link_TED01"), RegionType::Nter);
        assert_eq!(classify("TED03_link_C-terminus"), RegionType::Cter);
        // Both markers present: N-terminus wins
        assert_eq!(classify("N-terminus_link_C-terminus"), RegionType::Nter);
    }

    #[test]
    fn test_link_between_distinct_domains() {
        assert_eq!(classify("TED01_link_TED02"), RegionType::Link);
        assert_eq!(classify("1_link_2"), RegionType::Link);
    }

    #[test]
    fn test_internal_link_within_one_domain() {
        assert_eq!(classify("TED02_link_TED02"), RegionType::InternalLink);
    }

    #[test]
    fn test_identity_comparison_is_case_sensitive() {
        assert_eq!(classify("ted01_link_TED01"), RegionType::Link);
    }

    #[test]
    fn test_plain_domain_names() {
        assert_eq!(classify("TED01"), RegionType::Domain);
        assert_eq!(classify("01"), RegionType::Domain);
        assert_eq!(classify("blinker"), RegionType::Domain);
    }

    #[test]
    fn test_linker_name_round_trips_through_classify() {
        assert_eq!(linker_name("TED01", "TED02"), "TED01_link_TED02");
        assert_eq!(classify(&linker_name(N_TERMINUS, "TED01")), RegionType::Nter);
        assert_eq!(classify(&linker_name("TED04", C_TERMINUS)), RegionType::Cter);
    }
}
