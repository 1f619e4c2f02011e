//! HTTP handlers for products and stock movements.

pub mod product;
pub mod stock_movement;
