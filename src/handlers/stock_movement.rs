//! Stock movement handlers. Entry, exit and adjustment answer 204: their procedures return nothing.

use crate::db::stock_movement as data;
use crate::error::AppError;
use crate::extractors::CrudRequest;
use crate::model::{AdjustmentCreateParams, EntryCreateParams, ExitCreateParams, MovementListParams};
use crate::response::{no_content, success_many};
use crate::service::{CrudController, Permission, Securable, SecurityRule};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};

const SECURABLE: Securable = Securable::StockMovement;

fn controller(state: &AppState, permission: Permission) -> CrudController<'_> {
    CrudController::new(&state.security, vec![SecurityRule::new(SECURABLE, permission)])
}

/// POST /stock-movement/entry
pub async fn create_entry(State(state): State<AppState>, req: CrudRequest) -> Result<impl IntoResponse, AppError> {
    let validated = controller(&state, Permission::Create).create::<EntryCreateParams>(&req).await?;
    data::create_entry(state.procedures.as_ref(), &validated.call_params()?).await?;
    tracing::info!(id_product = validated.params.id_product, quantity = validated.params.quantity, "stock entry");
    Ok(no_content())
}

/// POST /stock-movement/exit
pub async fn create_exit(State(state): State<AppState>, req: CrudRequest) -> Result<impl IntoResponse, AppError> {
    let validated = controller(&state, Permission::Create).create::<ExitCreateParams>(&req).await?;
    data::create_exit(state.procedures.as_ref(), &validated.call_params()?).await?;
    tracing::info!(id_product = validated.params.id_product, quantity = validated.params.quantity, "stock exit");
    Ok(no_content())
}

/// POST /stock-movement/adjustment
pub async fn create_adjustment(State(state): State<AppState>, req: CrudRequest) -> Result<impl IntoResponse, AppError> {
    let validated = controller(&state, Permission::Create).create::<AdjustmentCreateParams>(&req).await?;
    data::create_adjustment(state.procedures.as_ref(), &validated.call_params()?).await?;
    tracing::info!(
        id_product = validated.params.id_product,
        new_quantity = validated.params.new_quantity,
        "stock adjustment"
    );
    Ok(no_content())
}

/// GET /stock-movement
pub async fn list(State(state): State<AppState>, req: CrudRequest) -> Result<impl IntoResponse, AppError> {
    let validated = controller(&state, Permission::Read).list::<MovementListParams>(&req).await?;
    let movements = data::list_movements(state.procedures.as_ref(), &validated.call_params()?).await?;
    Ok(success_many(movements))
}
