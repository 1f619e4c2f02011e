//! Security rules declared per operation and the collaborator that enforces them.

use crate::error::AppError;
use crate::service::credential::Credential;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

/// Resource category a permission is checked against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Securable {
    Product,
    StockMovement,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    Create,
    Read,
    Update,
    Delete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SecurityRule {
    pub securable: Securable,
    pub permission: Permission,
}

impl SecurityRule {
    pub const fn new(securable: Securable, permission: Permission) -> Self {
        SecurityRule { securable, permission }
    }
}

impl fmt::Display for SecurityRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:{:?}", self.securable, self.permission)
    }
}

/// Decides whether a resolved credential satisfies an operation's rules.
#[async_trait]
pub trait Authorizer: Send + Sync {
    async fn authorize(&self, credential: &Credential, rules: &[SecurityRule]) -> Result<(), AppError>;
}

/// Accepts any resolved credential. Permission storage is not wired in yet, so rules are only logged.
#[derive(Clone, Copy, Debug, Default)]
pub struct CredentialOnly;

#[async_trait]
impl Authorizer for CredentialOnly {
    async fn authorize(&self, credential: &Credential, rules: &[SecurityRule]) -> Result<(), AppError> {
        tracing::trace!(
            id_account = credential.id_account,
            id_user = credential.id_user,
            rules = ?rules,
            "security rules not enforced"
        );
        Ok(())
    }
}
