//! Caller identity from request headers.

use crate::error::AppError;
use axum::http::HeaderMap;
use serde::Serialize;

pub const ACCOUNT_ID_HEADER: &str = "x-account-id";
pub const USER_ID_HEADER: &str = "x-user-id";

/// Account and user the request acts on behalf of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub id_account: i64,
    pub id_user: i64,
}

/// What to do when the identity headers are absent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CredentialPolicy {
    /// Missing headers are rejected.
    #[default]
    Strict,
    /// Missing headers are replaced by a fixed credential. Development only; see `AppConfig`.
    DevelopmentFallback(Credential),
}

impl CredentialPolicy {
    pub fn resolve(&self, headers: &HeaderMap) -> Result<Credential, AppError> {
        let account = header_id(headers, ACCOUNT_ID_HEADER);
        let user = header_id(headers, USER_ID_HEADER);
        let (account, user) = match (self, account, user) {
            (_, Some(a), Some(u)) => (Some(a), Some(u)),
            (CredentialPolicy::DevelopmentFallback(fallback), a, u) => {
                tracing::warn!(
                    id_account = fallback.id_account,
                    id_user = fallback.id_user,
                    "identity headers missing, using development credential"
                );
                (a.or(Some(fallback.id_account)), u.or(Some(fallback.id_user)))
            }
            (CredentialPolicy::Strict, a, u) => (a, u),
        };
        match (account, user) {
            (Some(id_account), Some(id_user)) if id_account > 0 && id_user > 0 => Ok(Credential { id_account, id_user }),
            _ => Err(AppError::Unauthorized),
        }
    }
}

/// Header value parsed as an integer id. Absent, blank and non-numeric values are `None`.
fn header_id(headers: &HeaderMap, name: &str) -> Option<i64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<i64>().ok())
}
