//! Stock movement procedures. Stock arithmetic and locking happen inside the database.

use crate::db::{call_multiple, call_none, Procedures};
use crate::error::AppError;
use crate::model::StockMovement;
use serde_json::{Map, Value};

pub const MOVEMENT_CREATE_ENTRY: &str = "functional.sp_stock_movement_create_entry";
pub const MOVEMENT_CREATE_EXIT: &str = "functional.sp_stock_movement_create_exit";
pub const MOVEMENT_CREATE_ADJUSTMENT: &str = "functional.sp_stock_movement_create_adjustment";
pub const MOVEMENT_LIST: &str = "functional.sp_stock_movement_list";

pub async fn create_entry(db: &dyn Procedures, params: &Map<String, Value>) -> Result<(), AppError> {
    call_none(db, MOVEMENT_CREATE_ENTRY, params).await
}

pub async fn create_exit(db: &dyn Procedures, params: &Map<String, Value>) -> Result<(), AppError> {
    call_none(db, MOVEMENT_CREATE_EXIT, params).await
}

pub async fn create_adjustment(db: &dyn Procedures, params: &Map<String, Value>) -> Result<(), AppError> {
    call_none(db, MOVEMENT_CREATE_ADJUSTMENT, params).await
}

pub async fn list_movements(db: &dyn Procedures, params: &Map<String, Value>) -> Result<Vec<StockMovement>, AppError> {
    call_multiple(db, MOVEMENT_LIST, params).await
}
