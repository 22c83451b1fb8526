//! Execution event-log capture (OdoBotNL).
//!
//! The log is an array of tagged events, or an object holding that array under
//! `events`. Network requests carry the `NETWORK_EVENT` tag and keep their
//! details under `eventDetails`; the request body is a JSON-encoded string.

use serde_json::{Map, Value};

use super::event::{json_body, malformed, NetworkEvent};
use crate::error::Result;

/// Event tag marking a captured network request.
pub const NETWORK_EVENT: &str = "NETWORK_EVENT";

/// Normalizes an execution event log into canonical events.
///
/// # Errors
///
/// Returns an error if the document holds no event array, a network event
/// lacks its method or URL, or a request body is not a JSON object.
pub fn normalize(document: &Value) -> Result<Vec<NetworkEvent>> {
    let records = match document {
        Value::Array(records) => records,
        Value::Object(obj) => obj
            .get("events")
            .and_then(Value::as_array)
            .ok_or_else(|| malformed(0, "event log object has no 'events' array"))?,
        _ => return Err(malformed(0, "event log is neither an array nor an object")),
    };

    let mut events = Vec::new();
    for (index, record) in records.iter().enumerate() {
        let tag = record.get("eventType").or_else(|| record.get("type")).and_then(Value::as_str);
        if tag != Some(NETWORK_EVENT) {
            continue;
        }
        let details = record
            .get("eventDetails")
            .and_then(Value::as_object)
            .ok_or_else(|| malformed(index, "network event has no eventDetails"))?;
        let method = details
            .get("method")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed(index, "network event has no method"))?;
        let url = details
            .get("url")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed(index, "network event has no url"))?;

        let body = match details.get("requestBody") {
            Some(Value::String(raw)) if !is_empty_body(raw) => json_body(url, raw)?,
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };

        events.push(NetworkEvent::from_url(index, method, url, body)?);
    }
    Ok(events)
}

fn is_empty_body(raw: &str) -> bool {
    let raw = raw.trim();
    raw.is_empty() || raw == "null"
}
