//! Search Palette Matching
//!
//! Ranks the current role's navigation entries against a typed query.

use wastewise_client::models::Role;

use crate::routes::{nav_for, RouteDescriptor};

pub const MAX_RESULTS: usize = 8;

/// Query chars appear in order in the target (case-insensitive)
pub fn fuzzy_match(query: &str, target: &str) -> bool {
    let target = target.to_lowercase();
    let mut target_chars = target.chars();
    query
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .all(|q| target_chars.any(|t| t == q))
}

/// Lower is better; `None` means no match
fn rank(query: &str, entry: &RouteDescriptor) -> Option<u8> {
    let label = entry.label.to_lowercase();
    if label.starts_with(query) {
        Some(0)
    } else if label.split_whitespace().any(|word| word.starts_with(query)) {
        Some(1)
    } else if fuzzy_match(query, entry.label) || fuzzy_match(query, entry.path) {
        Some(2)
    } else {
        None
    }
}

/// Navigation entries for `role` matching `query`, best first
pub fn search(role: Role, query: &str) -> Vec<&'static RouteDescriptor> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    let mut hits: Vec<(u8, usize, &'static RouteDescriptor)> = nav_for(role)
        .iter()
        .enumerate()
        .filter_map(|(order, entry)| rank(&query, entry).map(|score| (score, order, entry)))
        .collect();
    hits.sort_by_key(|(score, order, _)| (*score, *order));
    hits.into_iter().take(MAX_RESULTS).map(|(_, _, entry)| entry).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(hits: Vec<&RouteDescriptor>) -> Vec<&'static str> {
        hits.into_iter().map(|h| h.label).collect()
    }

    #[test]
    fn test_fuzzy_match() {
        assert!(fuzzy_match("vbn", "Virtual Bins"));
        assert!(fuzzy_match("RWD", "reward rates"));
        assert!(!fuzzy_match("zz", "Zones"));
        assert!(fuzzy_match("", "anything"));
    }

    #[test]
    fn test_prefix_ranks_before_word_and_fuzzy() {
        let hits = labels(search(Role::Admin, "bi"));
        // both prefix matches, in table order
        assert_eq!(hits[0], "Bins");
        assert_eq!(hits[1], "Billing Plans");
        assert!(hits.contains(&"Virtual Bins"));
    }

    #[test]
    fn test_results_are_scoped_to_role() {
        assert!(search(Role::Citizen, "users").is_empty());
        assert_eq!(labels(search(Role::Crew, "exc")), vec!["Exceptions"]);
    }

    #[test]
    fn test_empty_query_and_cap() {
        assert!(search(Role::Admin, "   ").is_empty());
        assert!(search(Role::Admin, "a").len() <= MAX_RESULTS);
    }
}
