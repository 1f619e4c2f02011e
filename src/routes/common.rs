//! Unauthenticated service routes: liveness, stored-procedure readiness, build info.

use crate::routes::API_PREFIX;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};

/// Resource collections served under the internal API.
const RESOURCES: &[&str] = &["product", "stock-movement"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum Availability {
    Up,
    Down,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Readiness {
    status: Availability,
    stored_procedures: Availability,
}

async fn health() -> Json<Value> {
    Json(json!({ "status": Availability::Up }))
}

/// 503 until the procedure backend answers its ping.
async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Readiness>) {
    let procedures = match state.procedures.ping().await {
        Ok(()) => Availability::Up,
        Err(e) => {
            tracing::warn!(error = %e, "stored procedures unreachable");
            Availability::Down
        }
    };
    let code = if procedures == Availability::Up {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        code,
        Json(Readiness {
            status: procedures,
            stored_procedures: procedures,
        }),
    )
}

async fn version() -> Json<Value> {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "api": format!("{}/internal", API_PREFIX),
        "resources": RESOURCES,
    }))
}

pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ExpectedReturn, ProcedureOutput, Procedures};
    use crate::error::AppError;
    use crate::service::{CredentialOnly, Security};
    use async_trait::async_trait;
    use serde_json::Map;
    use std::sync::Arc;

    struct Offline;

    #[async_trait]
    impl Procedures for Offline {
        async fn call(&self, _: &str, _: &Map<String, Value>, _: ExpectedReturn) -> Result<ProcedureOutput, AppError> {
            Err(AppError::Unexpected("offline".into()))
        }

        async fn ping(&self) -> Result<(), AppError> {
            Err(AppError::Unexpected("offline".into()))
        }
    }

    #[tokio::test]
    async fn ready_is_503_while_procedures_are_down() {
        let state = AppState {
            procedures: Arc::new(Offline),
            security: Security {
                policy: Default::default(),
                authorizer: Arc::new(CredentialOnly),
            },
        };
        let (code, Json(body)) = ready(State(state)).await;
        assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, Availability::Down);
        assert_eq!(body.stored_procedures, Availability::Down);
    }
}
