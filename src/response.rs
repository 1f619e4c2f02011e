//! Standard response envelope helpers.

use axum::{http::StatusCode, Json};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    pub metadata: Metadata,
}

#[derive(Serialize)]
pub struct Metadata {
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    pub timestamp: String,
}

impl Metadata {
    /// `timestamp` is always set by the envelope; a caller-supplied one is dropped.
    pub fn with_extra(mut extra: Map<String, Value>) -> Self {
        extra.remove("timestamp");
        Metadata {
            extra,
            timestamp: now_timestamp(),
        }
    }
}

pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn envelope<T: Serialize>(data: T, extra: Map<String, Value>) -> Envelope<T> {
    Envelope {
        success: true,
        data,
        metadata: Metadata::with_extra(extra),
    }
}

pub fn success_created<T: Serialize>(data: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::CREATED, Json(envelope(data, Map::new())))
}

pub fn success_ok<T: Serialize>(data: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::OK, Json(envelope(data, Map::new())))
}

pub fn success_many<T: Serialize>(data: Vec<T>) -> (StatusCode, Json<Envelope<Vec<T>>>) {
    let mut extra = Map::new();
    extra.insert("count".into(), Value::from(data.len() as u64));
    (StatusCode::OK, Json(envelope(data, extra)))
}

pub fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub fn error_envelope(code: &str, message: String, details: Option<Value>) -> Value {
    let mut error = serde_json::json!({
        "code": code,
        "message": message,
    });
    if let Some(details) = details {
        error["details"] = details;
    }
    serde_json::json!({
        "success": false,
        "error": error,
        "timestamp": now_timestamp(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_has_success_data_and_timestamp() {
        let v = serde_json::to_value(envelope(serde_json::json!({"id": 1}), Map::new())).unwrap();
        assert_eq!(v["success"], true);
        assert_eq!(v["data"]["id"], 1);
        let ts = v["metadata"]["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
    }

    #[test]
    fn extra_metadata_cannot_override_timestamp() {
        let mut extra = Map::new();
        extra.insert("timestamp".into(), Value::from("yesterday"));
        extra.insert("count".into(), Value::from(3));
        let v = serde_json::to_value(envelope(Vec::<u8>::new(), extra)).unwrap();
        assert_eq!(v["metadata"]["count"], 3);
        assert_ne!(v["metadata"]["timestamp"], "yesterday");
    }

    #[test]
    fn error_envelope_omits_absent_details() {
        let v = error_envelope("UNAUTHORIZED", "nope".into(), None);
        assert_eq!(v["success"], false);
        assert_eq!(v["error"]["code"], "UNAUTHORIZED");
        assert!(v["error"].get("details").is_none());
        assert!(v["timestamp"].is_string());
    }
}
