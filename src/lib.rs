//! StockBox: inventory REST backend. Products and stock movements over stored procedures,
//! behind one authenticate-then-validate pipeline.

pub mod case;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod schema;
pub mod service;
pub mod state;

pub use config::{AppConfig, Environment};
pub use db::{ExpectedReturn, PgProcedures, ProcedureOutput, Procedures};
pub use error::{AppError, ConfigError, FieldViolation};
pub use response::{error_envelope, success_created, success_many, success_ok};
pub use routes::{api_router, app};
pub use service::{Authorizer, CredentialOnly, CredentialPolicy, CrudController, Security, ValidatedRequest};
pub use state::AppState;
