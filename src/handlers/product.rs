//! Product handlers: create, list, get, update, delete.

use crate::db::product as data;
use crate::error::AppError;
use crate::extractors::CrudRequest;
use crate::model::{ProductCreateParams, ProductDeleteParams, ProductGetParams, ProductListParams, ProductUpdateParams};
use crate::response::{no_content, success_created, success_many, success_ok};
use crate::service::{CrudController, Permission, Securable, SecurityRule};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};

const SECURABLE: Securable = Securable::Product;

fn controller(state: &AppState, permission: Permission) -> CrudController<'_> {
    CrudController::new(&state.security, vec![SecurityRule::new(SECURABLE, permission)])
}

/// POST /product
pub async fn create(State(state): State<AppState>, req: CrudRequest) -> Result<impl IntoResponse, AppError> {
    let validated = controller(&state, Permission::Create).create::<ProductCreateParams>(&req).await?;
    let product = data::product_create(state.procedures.as_ref(), &validated.call_params()?).await?;
    tracing::info!(id_product = product.id_product, code = %product.code, "product created");
    Ok(success_created(product))
}

/// GET /product
pub async fn list(State(state): State<AppState>, req: CrudRequest) -> Result<impl IntoResponse, AppError> {
    let validated = controller(&state, Permission::Read).list::<ProductListParams>(&req).await?;
    let products = data::product_list(state.procedures.as_ref(), &validated.call_params()?).await?;
    Ok(success_many(products))
}

/// GET /product/:id
pub async fn get(State(state): State<AppState>, req: CrudRequest) -> Result<impl IntoResponse, AppError> {
    let validated = controller(&state, Permission::Read).read::<ProductGetParams>(&req).await?;
    let product = data::product_get(state.procedures.as_ref(), &validated.call_params()?).await?;
    Ok(success_ok(product))
}

/// PUT /product/:id
pub async fn update(State(state): State<AppState>, req: CrudRequest) -> Result<impl IntoResponse, AppError> {
    let validated = controller(&state, Permission::Update).update::<ProductUpdateParams>(&req).await?;
    let product = data::product_update(state.procedures.as_ref(), &validated.call_params()?).await?;
    Ok(success_ok(product))
}

/// DELETE /product/:id
pub async fn delete(State(state): State<AppState>, req: CrudRequest) -> Result<impl IntoResponse, AppError> {
    let validated = controller(&state, Permission::Delete).delete::<ProductDeleteParams>(&req).await?;
    data::product_delete(state.procedures.as_ref(), &validated.call_params()?).await?;
    tracing::info!(id_product = validated.params.id, "product deleted");
    Ok(no_content())
}
