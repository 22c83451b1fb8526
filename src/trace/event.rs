//! The canonical network event shared by all capture formats.

use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

use crate::error::{EvalError, Result};
use crate::query::{parse_query, split_path, QueryMap};

/// One observed HTTP request, independent of capture source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkEvent {
    /// HTTP method as captured.
    pub method: String,
    /// URL path, with `?query` appended when the request had a query string.
    pub path: String,
    /// Parsed query parameters.
    pub query: QueryMap,
    /// Decoded request body; empty when the request had none.
    pub body: Map<String, Value>,
}

impl NetworkEvent {
    /// Builds an event from a captured method, URL, and decoded body.
    ///
    /// Absolute and root-relative URLs are both accepted.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::MalformedTrace`] if the URL cannot be parsed.
    pub fn from_url(
        index: usize,
        method: &str,
        url: &str,
        body: Map<String, Value>,
    ) -> Result<Self> {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse("http://localhost/")
                .and_then(|base| base.join(url))
                .map_err(|e| malformed(index, format!("invalid url '{url}': {e}")))?,
            Err(e) => return Err(malformed(index, format!("invalid url '{url}': {e}"))),
        };

        let (path, query) = match parsed.query().filter(|q| !q.is_empty()) {
            Some(q) => (format!("{}?{q}", parsed.path()), parse_query(q)),
            None => (parsed.path().to_string(), QueryMap::new()),
        };

        Ok(Self { method: method.to_string(), path, query, body })
    }

    /// The path without its query string.
    #[must_use]
    pub fn base_path(&self) -> &str {
        split_path(&self.path).0
    }
}

pub(crate) fn malformed(index: usize, reason: impl Into<String>) -> EvalError {
    EvalError::MalformedTrace { index, reason: reason.into() }
}

/// Decodes a form-urlencoded body.
///
/// Keys seen once map to a string; repeated keys map to an array of strings.
#[must_use]
pub fn form_body(text: &str) -> Map<String, Value> {
    parse_query(text)
        .into_iter()
        .map(|(key, mut values)| {
            let value = if values.len() == 1 {
                Value::String(values.remove(0))
            } else {
                Value::Array(values.into_iter().map(Value::String).collect())
            };
            (key, value)
        })
        .collect()
}

/// Decodes a JSON body, which must be an object.
///
/// # Errors
///
/// Returns [`EvalError::MalformedBody`] if the text is not a JSON object.
pub fn json_body(url: &str, text: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(EvalError::MalformedBody {
            url: url.to_string(),
            reason: format!("expected a JSON object, found {}", kind_of(&other)),
        }),
        Err(e) => Err(EvalError::MalformedBody { url: url.to_string(), reason: e.to_string() }),
    }
}

/// Human-readable name of a JSON value's shape.
#[must_use]
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absolute_url_without_query() {
        let event =
            NetworkEvent::from_url(0, "POST", "http://localhost:8088/courses/5/pages", Map::new())
                .unwrap();
        assert_eq!(event.path, "/courses/5/pages");
        assert!(event.query.is_empty());
        assert_eq!(event.base_path(), "/courses/5/pages");
    }

    #[test]
    fn query_is_appended_and_parsed() {
        let event = NetworkEvent::from_url(
            0,
            "GET",
            "http://localhost:8088/api/v1/courses/5/users?search_term=Ann&per_page=50",
            Map::new(),
        )
        .unwrap();
        assert_eq!(event.path, "/api/v1/courses/5/users?search_term=Ann&per_page=50");
        assert_eq!(event.base_path(), "/api/v1/courses/5/users");
        assert_eq!(event.query["search_term"], vec!["Ann"]);
    }

    #[test]
    fn relative_url_is_accepted() {
        let event = NetworkEvent::from_url(3, "GET", "/courses/5?x=1", Map::new()).unwrap();
        assert_eq!(event.path, "/courses/5?x=1");
    }

    #[test]
    fn empty_query_is_dropped() {
        let event = NetworkEvent::from_url(0, "GET", "http://h/courses?", Map::new()).unwrap();
        assert_eq!(event.path, "/courses");
    }

    #[test]
    fn invalid_url_is_malformed() {
        let err = NetworkEvent::from_url(4, "GET", "http://[bad", Map::new()).unwrap_err();
        assert!(matches!(err, EvalError::MalformedTrace { index: 4, .. }));
    }

    #[test]
    fn form_body_collapses_single_values() {
        let body = form_body("wiki_page%5Btitle%5D=Syllabus&tags=a&tags=b");
        assert_eq!(Value::Object(body), json!({"wiki_page[title]": "Syllabus", "tags": ["a", "b"]}));
    }

    #[test]
    fn json_body_must_be_object() {
        assert!(json_body("/x", "{\"a\": 1}").is_ok());
        assert!(matches!(json_body("/x", "[1, 2]"), Err(EvalError::MalformedBody { .. })));
        assert!(matches!(json_body("/x", "{oops"), Err(EvalError::MalformedBody { .. })));
    }
}
