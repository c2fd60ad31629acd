//! Relation text parsing.
//!
//! Source rows deliver multi-valued fields as pipe-delimited text
//! (`"A | B | C"`). These helpers are tolerant of missing and empty values:
//! `None`, empty strings, and blank segments all collapse to nothing rather
//! than failing a build.

use once_cell::sync::Lazy;
use regex_lite::Regex;

static REQUIRED_LEVEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)must be level\s*(\d+)").expect("valid regex"));

/// Splits a pipe-delimited field into an ordered list of trimmed segments.
///
/// Empty segments are dropped; insertion order is source order.
///
/// # Examples
///
/// ```
/// use questtree_domain::split_relations;
///
/// assert_eq!(split_relations(Some("A | B | C")), vec!["A", "B", "C"]);
/// assert_eq!(split_relations(Some(" | A ||")), vec!["A"]);
/// assert!(split_relations(None).is_empty());
/// ```
pub fn split_relations(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(text) => text
            .split('|')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}

/// Splits a comma-delimited location field into trimmed map names.
///
/// Quests may list several maps (`"Customs, Woods"`); a missing field yields
/// an empty list, which the filter layer treats as "unknown".
pub fn split_locations(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(text) => text
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}

/// Scans requirement lines for a "must be level N" clause (case-insensitive)
/// and returns the first match.
pub fn parse_required_level(requirements: &[String]) -> Option<u32> {
    for req in requirements {
        if let Some(caps) = REQUIRED_LEVEL_RE.captures(req) {
            if let Some(level) = caps.get(1).and_then(|m| m.as_str().parse().ok()) {
                return Some(level);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_relations_preserves_order() {
        let parsed = split_relations(Some("Debut | Checking | Shootout Picnic"));
        assert_eq!(parsed, vec!["Debut", "Checking", "Shootout Picnic"]);
    }

    #[test]
    fn test_split_relations_drops_empty_segments() {
        assert_eq!(split_relations(Some("|| A |  | B |")), vec!["A", "B"]);
        assert!(split_relations(Some("")).is_empty());
        assert!(split_relations(Some("   ")).is_empty());
        assert!(split_relations(None).is_empty());
    }

    #[test]
    fn test_split_locations() {
        assert_eq!(
            split_locations(Some("Customs, Woods,Factory")),
            vec!["Customs", "Woods", "Factory"]
        );
        assert!(split_locations(None).is_empty());
    }

    #[test]
    fn test_parse_required_level_first_match_wins() {
        let reqs = vec![
            "Must have completed Debut".to_string(),
            "Must be level 10 to start this quest".to_string(),
            "Must be level 99".to_string(),
        ];
        assert_eq!(parse_required_level(&reqs), Some(10));
    }

    #[test]
    fn test_parse_required_level_case_insensitive() {
        let reqs = vec!["MUST BE LEVEL 5".to_string()];
        assert_eq!(parse_required_level(&reqs), Some(5));
    }

    #[test]
    fn test_parse_required_level_absent() {
        let reqs = vec!["Must have completed Debut".to_string()];
        assert_eq!(parse_required_level(&reqs), None);
    }
}
