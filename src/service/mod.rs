//! Request pipeline: credential resolution, authorization and schema validation.

pub mod authorizer;
pub mod controller;
pub mod credential;
pub mod validation;

pub use authorizer::{Authorizer, CredentialOnly, Permission, Securable, SecurityRule};
pub use controller::{CrudController, Operation, Security, ValidatedRequest};
pub use credential::{Credential, CredentialPolicy, ACCOUNT_ID_HEADER, USER_ID_HEADER};
pub use validation::RequestValidator;
