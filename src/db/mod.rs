//! Stored-procedure access. Every data-access function names one procedure, passes the flat
//! parameter object and declares how many rows it expects back.

pub mod postgres;
pub mod product;
pub mod stock_movement;

use crate::error::AppError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

pub use postgres::PgProcedures;

/// Cardinality hint for a procedure call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpectedReturn {
    Single,
    Multiple,
    None,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ProcedureOutput {
    Single(Value),
    Multiple(Vec<Value>),
    None,
}

/// The database as seen by this service: named procedures taking one parameter object.
#[async_trait]
pub trait Procedures: Send + Sync {
    /// `Single` with no row must fail with [`AppError::NotFound`].
    async fn call(
        &self,
        procedure: &str,
        params: &Map<String, Value>,
        expected: ExpectedReturn,
    ) -> Result<ProcedureOutput, AppError>;

    /// Connectivity check behind `GET /ready`.
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

pub async fn call_single<T: DeserializeOwned>(
    db: &dyn Procedures,
    procedure: &str,
    params: &Map<String, Value>,
) -> Result<T, AppError> {
    match db.call(procedure, params, ExpectedReturn::Single).await? {
        ProcedureOutput::Single(row) => decode(procedure, row),
        other => Err(cardinality_mismatch(procedure, ExpectedReturn::Single, &other)),
    }
}

pub async fn call_multiple<T: DeserializeOwned>(
    db: &dyn Procedures,
    procedure: &str,
    params: &Map<String, Value>,
) -> Result<Vec<T>, AppError> {
    match db.call(procedure, params, ExpectedReturn::Multiple).await? {
        ProcedureOutput::Multiple(rows) => rows.into_iter().map(|r| decode(procedure, r)).collect(),
        other => Err(cardinality_mismatch(procedure, ExpectedReturn::Multiple, &other)),
    }
}

pub async fn call_none(db: &dyn Procedures, procedure: &str, params: &Map<String, Value>) -> Result<(), AppError> {
    match db.call(procedure, params, ExpectedReturn::None).await? {
        ProcedureOutput::None => Ok(()),
        other => Err(cardinality_mismatch(procedure, ExpectedReturn::None, &other)),
    }
}

fn decode<T: DeserializeOwned>(procedure: &str, row: Value) -> Result<T, AppError> {
    serde_json::from_value(row).map_err(|e| AppError::Unexpected(format!("{} returned an unexpected row: {}", procedure, e)))
}

fn cardinality_mismatch(procedure: &str, expected: ExpectedReturn, got: &ProcedureOutput) -> AppError {
    AppError::Unexpected(format!("{} expected {:?} result, got {:?}", procedure, expected, got))
}

/// `schema.name` or `name`, identifiers only. Procedure names are interpolated into SQL.
pub fn is_valid_procedure_name(name: &str) -> bool {
    let mut parts = name.split('.');
    let ok = |p: &str| {
        let mut chars = p.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    };
    match (parts.next(), parts.next(), parts.next()) {
        (Some(a), None, None) => ok(a),
        (Some(a), Some(b), None) => ok(a) && ok(b),
        _ => false,
    }
}
