//! CrudController: the shared authenticate-then-validate step in front of every resource handler.

use crate::error::AppError;
use crate::extractors::CrudRequest;
use crate::schema::RequestSchema;
use crate::service::authorizer::{Authorizer, SecurityRule};
use crate::service::credential::{Credential, CredentialPolicy};
use crate::service::validation::RequestValidator;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Credential policy and authorizer shared by all handlers.
#[derive(Clone)]
pub struct Security {
    pub policy: CredentialPolicy,
    pub authorizer: Arc<dyn Authorizer>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    List,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::List => "list",
        };
        f.write_str(s)
    }
}

/// Output of the pipeline: who is calling and the typed parameters they sent.
#[derive(Clone, Debug)]
pub struct ValidatedRequest<T> {
    pub credential: Credential,
    pub params: T,
}

impl<T: Serialize> ValidatedRequest<T> {
    /// Credential and params flattened into one object. On a key collision the params value wins.
    pub fn call_params(&self) -> Result<Map<String, Value>, AppError> {
        let mut out = to_object(&self.credential)?;
        out.extend(to_object(&self.params)?);
        Ok(out)
    }
}

fn to_object<S: Serialize>(v: &S) -> Result<Map<String, Value>, AppError> {
    match serde_json::to_value(v).map_err(|e| AppError::Unexpected(e.to_string()))? {
        Value::Object(m) => Ok(m),
        other => Err(AppError::Unexpected(format!("expected object parameters, got {}", other))),
    }
}

pub struct CrudController<'a> {
    security: &'a Security,
    rules: Vec<SecurityRule>,
}

impl<'a> CrudController<'a> {
    pub fn new(security: &'a Security, rules: Vec<SecurityRule>) -> Self {
        CrudController { security, rules }
    }

    pub async fn create<T: RequestSchema>(&self, req: &CrudRequest) -> Result<ValidatedRequest<T>, AppError> {
        self.authorize_and_validate(Operation::Create, req).await
    }

    pub async fn read<T: RequestSchema>(&self, req: &CrudRequest) -> Result<ValidatedRequest<T>, AppError> {
        self.authorize_and_validate(Operation::Read, req).await
    }

    pub async fn update<T: RequestSchema>(&self, req: &CrudRequest) -> Result<ValidatedRequest<T>, AppError> {
        self.authorize_and_validate(Operation::Update, req).await
    }

    pub async fn delete<T: RequestSchema>(&self, req: &CrudRequest) -> Result<ValidatedRequest<T>, AppError> {
        self.authorize_and_validate(Operation::Delete, req).await
    }

    pub async fn list<T: RequestSchema>(&self, req: &CrudRequest) -> Result<ValidatedRequest<T>, AppError> {
        self.authorize_and_validate(Operation::List, req).await
    }

    /// Credential first, then the authorizer, then parameter validation. A request with neither
    /// identity nor valid parameters is reported as unauthorized.
    pub async fn authorize_and_validate<T: RequestSchema>(
        &self,
        operation: Operation,
        req: &CrudRequest,
    ) -> Result<ValidatedRequest<T>, AppError> {
        let credential = self.security.policy.resolve(&req.headers).map_err(|e| {
            tracing::debug!(%operation, "credential rejected");
            e
        })?;
        self.security.authorizer.authorize(&credential, &self.rules).await?;
        let bag = req.params()?;
        let params = RequestValidator::validate_into::<T>(&bag).map_err(|e| {
            tracing::debug!(%operation, error = %e, "parameters rejected");
            e
        })?;
        Ok(ValidatedRequest { credential, params })
    }
}
