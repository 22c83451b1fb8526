//! Path stage of request matching.

use std::collections::BTreeSet;

use crate::task::PathPattern;
use crate::trace::NetworkEvent;

/// Checks the observed path against a pattern, recording why it fails.
pub(super) fn check(event: &NetworkEvent, pattern: &PathPattern, errors: &mut Vec<String>) -> bool {
    match pattern {
        PathPattern::Wildcard { pattern, regex } => {
            if regex.is_match(&event.path) {
                return true;
            }
            errors.push(format!("path {} does not match pattern {pattern}", event.path));
            false
        }
        PathPattern::WithQuery { pattern, base, query } => {
            if event.base_path() != base {
                if event.path == *pattern {
                    return true;
                }
                errors.push(format!("path {} does not match expected {pattern}", event.path));
                return false;
            }
            let before = errors.len();
            for (key, expected) in query {
                match event.query.get(key) {
                    None => errors.push(format!("query parameter '{key}' missing from {}", event.path)),
                    Some(observed) if folded(observed) != folded(expected) => errors.push(format!(
                        "query parameter '{key}' has values {observed:?}, expected {expected:?}"
                    )),
                    Some(_) => {}
                }
            }
            errors.len() == before
        }
        PathPattern::Exact(expected) => {
            if event.path == *expected || event.base_path() == expected {
                return true;
            }
            errors.push(format!("path {} does not match expected {expected}", event.path));
            false
        }
    }
}

/// Query values as a case-insensitive set.
fn folded(values: &[String]) -> BTreeSet<String> {
    values.iter().map(|v| v.to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn event(url: &str) -> NetworkEvent {
        NetworkEvent::from_url(0, "GET", url, Map::new()).unwrap()
    }

    fn check_path(url: &str, pattern: &str) -> (bool, Vec<String>) {
        let mut errors = Vec::new();
        let ok = check(&event(url), &PathPattern::parse(pattern).unwrap(), &mut errors);
        (ok, errors)
    }

    #[test]
    fn exact_path_matches_with_or_without_undeclared_query() {
        assert!(check_path("/courses/5/pages", "/courses/5/pages").0);
        assert!(check_path("/courses/5/pages?page=2", "/courses/5/pages").0);
        let (ok, errors) = check_path("/courses/6/pages", "/courses/5/pages");
        assert!(!ok);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn query_values_compare_case_insensitively() {
        assert!(check_path("/courses/5/users?q=hello", "/courses/5/users?q=Hello").0);
    }

    #[test]
    fn query_values_compare_as_sets() {
        assert!(check_path("/c?include[]=b&include[]=a", "/c?include[]=a&include[]=b").0);
        assert!(!check_path("/c?include[]=a", "/c?include[]=a&include[]=b").0);
    }

    #[test]
    fn extra_observed_query_keys_are_allowed() {
        assert!(check_path("/c/users?q=ann&per_page=50", "/c/users?q=ann").0);
    }

    #[test]
    fn missing_query_key_is_reported() {
        let (ok, errors) = check_path("/c/users?per_page=50", "/c/users?q=ann");
        assert!(!ok);
        assert!(errors[0].contains("'q' missing"));
    }

    #[test]
    fn different_prefix_with_query_fails() {
        let (ok, errors) = check_path("/c/groups?q=ann", "/c/users?q=ann");
        assert!(!ok);
        assert!(errors[0].contains("/c/users?q=ann"));
    }

    #[test]
    fn wildcard_matches_any_segment() {
        assert!(check_path("/api/77/grades", "/api/[[ANY]]/grades").0);
        assert!(!check_path("/other/77/grades", "/api/[[ANY]]/grades").0);
    }

    #[test]
    fn wildcard_is_a_substring_search() {
        assert!(check_path("/api/v1/courses/5/quizzes/9", "/courses/[[ANY]]/quizzes").0);
    }
}
