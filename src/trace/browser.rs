//! Browser-automation network capture (WebVoyager network logs).
//!
//! The capture is a JSON array of DevTools-protocol records. Requests live
//! under `params.request`:
//!
//! ```json
//! {"method": "Network.requestWillBeSent",
//!  "params": {"request": {"method": "POST", "url": "...", "headers": {...}, "postData": "..."}}}
//! ```

use serde_json::{Map, Value};

use super::event::{form_body, json_body, malformed, NetworkEvent};
use crate::error::{EvalError, Result};

/// Normalizes browser capture records into canonical events.
///
/// Records without a `params.request` object are not requests and are skipped.
///
/// # Errors
///
/// Returns an error for a request missing its method or URL, a body with an
/// unsupported content type, or a body that cannot be decoded.
pub fn normalize(records: &[Value]) -> Result<Vec<NetworkEvent>> {
    let mut events = Vec::new();
    for (index, record) in records.iter().enumerate() {
        let Some(request) = record.pointer("/params/request").and_then(Value::as_object) else {
            continue;
        };
        let method = request
            .get("method")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed(index, "request has no method"))?;
        let url = request
            .get("url")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed(index, "request has no url"))?;

        let body = match request.get("postData").and_then(Value::as_str) {
            Some(data) if !data.is_empty() => decode_body(url, content_type(request), data)?,
            _ => Map::new(),
        };

        events.push(NetworkEvent::from_url(index, method, url, body)?);
    }
    Ok(events)
}

/// Looks up the request's content type, whatever the header capitalization.
fn content_type(request: &Map<String, Value>) -> Option<&str> {
    let headers = request.get("headers")?.as_object()?;
    ["Content-Type", "content-type"]
        .iter()
        .find_map(|name| headers.get(*name))
        .or_else(|| {
            headers.iter().find(|(k, _)| k.eq_ignore_ascii_case("content-type")).map(|(_, v)| v)
        })
        .and_then(Value::as_str)
}

fn decode_body(url: &str, content_type: Option<&str>, data: &str) -> Result<Map<String, Value>> {
    let mime = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|m| m.trim().to_ascii_lowercase())
        .unwrap_or_default();

    match mime.as_str() {
        "application/json" => json_body(url, data),
        "application/x-www-form-urlencoded" => Ok(form_body(data)),
        _ => Err(EvalError::UnsupportedContentType {
            content_type: content_type.unwrap_or("<none>").to_string(),
            url: url.to_string(),
        }),
    }
}
