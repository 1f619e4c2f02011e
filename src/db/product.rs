//! Product procedures.

use crate::db::{call_multiple, call_none, call_single, Procedures};
use crate::error::AppError;
use crate::model::Product;
use serde_json::{Map, Value};

pub const PRODUCT_CREATE: &str = "functional.sp_product_create";
pub const PRODUCT_LIST: &str = "functional.sp_product_list";
pub const PRODUCT_GET: &str = "functional.sp_product_get";
pub const PRODUCT_UPDATE: &str = "functional.sp_product_update";
pub const PRODUCT_DELETE: &str = "functional.sp_product_delete";

pub async fn product_create(db: &dyn Procedures, params: &Map<String, Value>) -> Result<Product, AppError> {
    call_single(db, PRODUCT_CREATE, params).await
}

pub async fn product_list(db: &dyn Procedures, params: &Map<String, Value>) -> Result<Vec<Product>, AppError> {
    call_multiple(db, PRODUCT_LIST, params).await
}

pub async fn product_get(db: &dyn Procedures, params: &Map<String, Value>) -> Result<Product, AppError> {
    call_single(db, PRODUCT_GET, params).await
}

pub async fn product_update(db: &dyn Procedures, params: &Map<String, Value>) -> Result<Product, AppError> {
    call_single(db, PRODUCT_UPDATE, params).await
}

pub async fn product_delete(db: &dyn Procedures, params: &Map<String, Value>) -> Result<(), AppError> {
    call_none(db, PRODUCT_DELETE, params).await
}
