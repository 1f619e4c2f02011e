#![allow(dead_code)]

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue};
use axum_test::{TestRequest, TestServer};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use stockbox::{
    app, AppConfig, AppError, AppState, CredentialOnly, CredentialPolicy, ExpectedReturn, ProcedureOutput, Procedures,
    Security,
};

/// Caller identity used by the tests: account 1, user 2.
pub fn authed(req: TestRequest) -> TestRequest {
    req.add_header(HeaderName::from_static("x-account-id"), HeaderValue::from_static("1"))
        .add_header(HeaderName::from_static("x-user-id"), HeaderValue::from_static("2"))
}

#[derive(Clone, Debug)]
pub struct Call {
    pub procedure: String,
    pub params: Map<String, Value>,
    pub expected: ExpectedReturn,
}

#[derive(Clone, Debug)]
pub enum Reply {
    Output(ProcedureOutput),
    NotFound,
    Fail(String),
}

/// In-memory database: records every call and answers with canned replies.
#[derive(Default)]
pub struct RecordingProcedures {
    calls: Mutex<Vec<Call>>,
    replies: Mutex<HashMap<String, Reply>>,
}

impl RecordingProcedures {
    pub fn reply(&self, procedure: &str, reply: Reply) {
        self.replies.lock().unwrap().insert(procedure.to_string(), reply);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Procedures for RecordingProcedures {
    async fn call(
        &self,
        procedure: &str,
        params: &Map<String, Value>,
        expected: ExpectedReturn,
    ) -> Result<ProcedureOutput, AppError> {
        self.calls.lock().unwrap().push(Call {
            procedure: procedure.to_string(),
            params: params.clone(),
            expected,
        });
        let reply = self.replies.lock().unwrap().get(procedure).cloned();
        match reply {
            Some(Reply::Output(out)) => Ok(out),
            Some(Reply::NotFound) => Err(AppError::NotFound(procedure.to_string())),
            Some(Reply::Fail(msg)) => Err(AppError::Unexpected(msg)),
            None => match expected {
                ExpectedReturn::Single => Err(AppError::NotFound(procedure.to_string())),
                ExpectedReturn::Multiple => Ok(ProcedureOutput::Multiple(Vec::new())),
                ExpectedReturn::None => Ok(ProcedureOutput::None),
            },
        }
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub db: Arc<RecordingProcedures>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_policy(CredentialPolicy::Strict)
    }

    pub fn with_policy(policy: CredentialPolicy) -> Self {
        let db = Arc::new(RecordingProcedures::default());
        let state = AppState {
            procedures: db.clone(),
            security: Security {
                policy,
                authorizer: Arc::new(CredentialOnly),
            },
        };
        let server = TestServer::new(app(state, &AppConfig::default())).unwrap();
        TestApp { server, db }
    }
}

pub fn product_row(id_product: i64, code: &str) -> Value {
    json!({
        "idProduct": id_product,
        "idAccount": 1,
        "idCategory": 1,
        "categoryName": "Hardware",
        "idUnitOfMeasure": 1,
        "unitOfMeasureName": "Unit",
        "code": code,
        "name": "Widget",
        "description": null,
        "minimumStock": 5,
        "dateCreated": "2024-05-01T10:00:00.000Z",
        "currentStock": 0,
        "stockStatus": "ZERO"
    })
}

pub fn movement_row(id: i64, kind: &str) -> Value {
    json!({
        "idStockMovement": id,
        "idAccount": 1,
        "idUser": 2,
        "idProduct": 1,
        "productName": "Widget",
        "productCode": "ABC123",
        "idSupplier": null,
        "supplierName": null,
        "type": kind,
        "quantity": 3,
        "quantityBefore": 10,
        "movementDate": "2024-05-02T08:30:00.000Z",
        "reason": "sale",
        "referenceDocument": null,
        "destination": null,
        "lot": null,
        "expirationDate": null
    })
}

pub fn without_timestamp(mut v: Value) -> Value {
    if let Some(meta) = v.get_mut("metadata").and_then(Value::as_object_mut) {
        meta.remove("timestamp");
    }
    v
}
