//! Query-string helpers shared by ground-truth paths and observed events.

use std::collections::BTreeMap;

/// Multi-valued query parameters, keyed by parameter name.
///
/// Values keep their order of appearance.
pub type QueryMap = BTreeMap<String, Vec<String>>;

/// Parses a form-urlencoded query string into a [`QueryMap`].
///
/// Percent-escapes and `+` are decoded. Blank values are kept.
#[must_use]
pub fn parse_query(query: &str) -> QueryMap {
    let mut map = QueryMap::new();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        map.entry(key.into_owned()).or_default().push(value.into_owned());
    }
    map
}

/// Splits `path?query` into the path and the optional query.
#[must_use]
pub fn split_path(path: &str) -> (&str, Option<&str>) {
    match path.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (path, None),
    }
}
