//! Shared application state for all routes. Nothing in it is mutated after startup.

use crate::db::Procedures;
use crate::service::Security;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub procedures: Arc<dyn Procedures>,
    pub security: Security,
}
