//! PostgreSQL binding: each procedure takes the parameter object as a single `jsonb` argument.

use crate::case::object_keys_to_camel_case;
use crate::db::{is_valid_procedure_name, ExpectedReturn, ProcedureOutput, Procedures};
use crate::error::AppError;
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::PgPool;

/// SQLSTATE raised by procedures for a missing row (`no_data_found`).
const NO_DATA_FOUND: &str = "P0002";

#[derive(Clone)]
pub struct PgProcedures {
    pool: PgPool,
}

impl PgProcedures {
    pub fn new(pool: PgPool) -> Self {
        PgProcedures { pool }
    }
}

#[async_trait]
impl Procedures for PgProcedures {
    async fn call(
        &self,
        procedure: &str,
        params: &Map<String, Value>,
        expected: ExpectedReturn,
    ) -> Result<ProcedureOutput, AppError> {
        if !is_valid_procedure_name(procedure) {
            return Err(AppError::Unexpected(format!("invalid procedure name: {}", procedure)));
        }
        tracing::debug!(procedure, ?expected, "procedure call");
        let arg = Json(Value::Object(params.clone()));
        match expected {
            ExpectedReturn::Single => {
                let sql = format!("SELECT * FROM {}($1)", procedure);
                let row = sqlx::query(&sql)
                    .bind(arg)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| map_db_error(procedure, e))?
                    .ok_or_else(|| AppError::NotFound(procedure.to_string()))?;
                Ok(ProcedureOutput::Single(row_to_json(&row)))
            }
            ExpectedReturn::Multiple => {
                let sql = format!("SELECT * FROM {}($1)", procedure);
                let rows = sqlx::query(&sql)
                    .bind(arg)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(|e| map_db_error(procedure, e))?;
                Ok(ProcedureOutput::Multiple(rows.iter().map(row_to_json).collect()))
            }
            ExpectedReturn::None => {
                let sql = format!("CALL {}($1)", procedure);
                sqlx::query(&sql)
                    .bind(arg)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| map_db_error(procedure, e))?;
                Ok(ProcedureOutput::None)
            }
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

fn map_db_error(procedure: &str, e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.code().as_deref() == Some(NO_DATA_FOUND) {
            tracing::debug!(procedure, message = db.message(), "procedure reported no data");
            return AppError::NotFound(procedure.to_string());
        }
    }
    tracing::debug!(procedure, error = %e, "procedure failed");
    AppError::Db(e)
}

fn row_to_json(row: &sqlx::postgres::PgRow) -> Value {
    use sqlx::Column;
    use sqlx::Row;
    let mut map = Map::new();
    for col in row.columns() {
        let name = col.name();
        map.insert(name.to_string(), cell_to_value(row, name));
    }
    object_keys_to_camel_case(&mut map);
    Value::Object(map)
}

fn cell_to_value(row: &sqlx::postgres::PgRow, name: &str) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i16>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f32>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n as f64) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(d)) = row.try_get::<Option<sqlx::types::BigDecimal>, _>(name) {
        if let Some(n) = d.to_string().parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(name) {
        return Value::Bool(b);
    }
    if let Ok(Some(u)) = row.try_get::<Option<uuid::Uuid>, _>(name) {
        return Value::String(u.to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name) {
        return Value::String(d.to_rfc3339_opts(chrono::SecondsFormat::Millis, true));
    }
    // Naive timestamps are stored in UTC.
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDateTime>, _>(name) {
        return Value::String(d.and_utc().to_rfc3339_opts(chrono::SecondsFormat::Millis, true));
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDate>, _>(name) {
        return Value::String(d.format("%Y-%m-%d").to_string());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    if let Ok(Some(j)) = row.try_get::<Option<Value>, _>(name) {
        return j;
    }
    Value::Null
}
