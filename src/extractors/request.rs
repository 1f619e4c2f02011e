//! Wire-level request for the CRUD pipeline: headers plus the raw parameter sources.

use crate::error::{AppError, FieldViolation};
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::{HeaderMap, StatusCode},
};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::convert::Infallible;

/// Why the body could not be turned into a parameter object.
#[derive(Clone, Debug, PartialEq)]
pub enum BodyError {
    Invalid(FieldViolation),
    TooLarge,
}

impl From<BodyError> for AppError {
    fn from(e: BodyError) -> Self {
        match e {
            BodyError::Invalid(violation) => AppError::Validation(vec![violation]),
            BodyError::TooLarge => AppError::PayloadTooLarge,
        }
    }
}

/// Everything the pipeline needs from an HTTP request. Body problems are kept, not rejected, so
/// that credential checks still run first.
#[derive(Debug)]
pub struct CrudRequest {
    pub headers: HeaderMap,
    pub path: HashMap<String, String>,
    pub query: HashMap<String, String>,
    pub body: Result<Map<String, Value>, BodyError>,
}

impl CrudRequest {
    /// Path, then query, then body merged into one bag; later sources override earlier ones.
    pub fn params(&self) -> Result<Map<String, Value>, AppError> {
        let body = self.body.as_ref().map_err(|e| AppError::from(e.clone()))?;
        let mut bag = Map::new();
        for (k, v) in self.path.iter().chain(self.query.iter()) {
            bag.insert(k.clone(), Value::String(v.clone()));
        }
        for (k, v) in body {
            bag.insert(k.clone(), v.clone());
        }
        Ok(bag)
    }
}

#[async_trait]
impl<S> FromRequest<S> for CrudRequest
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();
        let path = Path::<HashMap<String, String>>::from_request_parts(&mut parts, state)
            .await
            .map(|Path(p)| p)
            .unwrap_or_default();
        let query = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
            .map(|Query(q)| q)
            .unwrap_or_default();
        let headers = parts.headers.clone();
        let body = match Bytes::from_request(Request::from_parts(parts, body), state).await {
            Ok(bytes) => parse_body(&bytes),
            Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => Err(BodyError::TooLarge),
            Err(rejection) => Err(BodyError::Invalid(FieldViolation::new("body", rejection.body_text()))),
        };
        Ok(CrudRequest {
            headers,
            path,
            query,
            body,
        })
    }
}

fn parse_body(bytes: &[u8]) -> Result<Map<String, Value>, BodyError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(m)) => Ok(m),
        Ok(_) => Err(BodyError::Invalid(FieldViolation::new("body", "body must be a JSON object"))),
        Err(e) => Err(BodyError::Invalid(FieldViolation::new("body", format!("malformed JSON: {}", e)))),
    }
}
