//! Resource types and per-operation request schemas.

pub mod product;
pub mod stock_movement;

pub use product::{
    Product, ProductCreateParams, ProductDeleteParams, ProductGetParams, ProductListParams, ProductUpdateParams,
    StockStatus,
};
pub use stock_movement::{
    AdjustmentCreateParams, EntryCreateParams, ExitCreateParams, MovementKind, MovementListParams, StockMovement,
};
