//! Authenticated resource routes. The table is fixed at startup.

use crate::handlers::{product, stock_movement};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn internal_routes(state: AppState) -> Router {
    Router::new()
        .route("/product", post(product::create).get(product::list))
        .route(
            "/product/:id",
            get(product::get).put(product::update).delete(product::delete),
        )
        .route("/stock-movement", get(stock_movement::list))
        .route("/stock-movement/entry", post(stock_movement::create_entry))
        .route("/stock-movement/exit", post(stock_movement::create_exit))
        .route("/stock-movement/adjustment", post(stock_movement::create_adjustment))
        .with_state(state)
}

/// Public endpoints. None are exposed yet.
pub fn external_routes() -> Router {
    Router::new()
}
