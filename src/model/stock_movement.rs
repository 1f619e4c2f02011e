//! Stock movements: history rows and the entry, exit, adjustment and list parameters.

use crate::schema::{date_range, FieldRule, RequestSchema, Schema};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::OnceLock;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    Register,
    Entry,
    Exit,
    Adjustment,
    Delete,
}

/// Wire spellings of [`MovementKind`].
pub const MOVEMENT_KINDS: &[&str] = &["REGISTER", "ENTRY", "EXIT", "ADJUSTMENT", "DELETE"];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id_stock_movement: i64,
    pub id_account: i64,
    pub id_user: i64,
    pub id_product: i64,
    pub product_name: String,
    pub product_code: String,
    #[serde(default)]
    pub id_supplier: Option<i64>,
    #[serde(default)]
    pub supplier_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: MovementKind,
    pub quantity: f64,
    #[serde(default)]
    pub quantity_before: Option<f64>,
    pub movement_date: DateTime<Utc>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub reference_document: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub lot: Option<String>,
    #[serde(default)]
    pub expiration_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryCreateParams {
    pub id_product: i64,
    pub quantity: f64,
    #[serde(default)]
    pub id_supplier: Option<i64>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub reference_document: Option<String>,
    #[serde(default)]
    pub lot: Option<String>,
    #[serde(default)]
    pub expiration_date: Option<NaiveDate>,
}

impl RequestSchema for EntryCreateParams {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::new()
                .field("idProduct", FieldRule::foreign_key())
                .field("quantity", FieldRule::number().exclusive_minimum(0.0))
                .field("idSupplier", FieldRule::foreign_key().optional().nullable())
                .field("reason", FieldRule::string().max_length(200).optional().nullable())
                .field("referenceDocument", FieldRule::string().max_length(50).optional().nullable())
                .field("lot", FieldRule::string().max_length(30).optional().nullable())
                .field("expirationDate", FieldRule::date().future().optional().nullable())
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitCreateParams {
    pub id_product: i64,
    pub quantity: f64,
    pub reason: String,
    pub allow_negative_stock: bool,
    #[serde(default)]
    pub reference_document: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub lot: Option<String>,
}

impl RequestSchema for ExitCreateParams {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::new()
                .field("idProduct", FieldRule::foreign_key())
                .field("quantity", FieldRule::number().exclusive_minimum(0.0))
                .field("reason", FieldRule::string().min_length(1).max_length(200))
                .field("allowNegativeStock", FieldRule::boolean().default(json!(false)))
                .field("referenceDocument", FieldRule::string().max_length(50).optional().nullable())
                .field("destination", FieldRule::string().max_length(100).optional().nullable())
                .field("lot", FieldRule::string().max_length(30).optional().nullable())
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentCreateParams {
    pub id_product: i64,
    pub new_quantity: f64,
    pub reason: String,
    #[serde(default)]
    pub lot: Option<String>,
}

impl RequestSchema for AdjustmentCreateParams {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::new()
                .field("idProduct", FieldRule::foreign_key())
                .field("newQuantity", FieldRule::number().minimum(0.0))
                .field("reason", FieldRule::string().min_length(10).max_length(500))
                .field("lot", FieldRule::string().max_length(30).optional().nullable())
        })
    }
}

/// Filters for the movement history. Absent filters are not sent to the procedure, so an absent
/// `idUser` leaves the caller's own id in place.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementListParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_product: Option<i64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<MovementKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_user: Option<i64>,
}

impl RequestSchema for MovementListParams {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::new()
                .field("idProduct", FieldRule::foreign_key().optional().nullable())
                .field("type", FieldRule::one_of(MOVEMENT_KINDS).optional().nullable())
                .field("startDate", FieldRule::date().optional().nullable())
                .field("endDate", FieldRule::date().optional().nullable())
                .field("idUser", FieldRule::foreign_key().optional().nullable())
                .refine(date_range("startDate", "endDate"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::RequestValidator;
    use serde_json::{Map, Value};

    fn bag(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn exit_defaults_allow_negative_stock() {
        let p: ExitCreateParams =
            RequestValidator::validate_into(&bag(json!({"idProduct": 1, "quantity": "2", "reason": "sale"}))).unwrap();
        assert!(!p.allow_negative_stock);
        assert_eq!(p.quantity, 2.0);
    }

    #[test]
    fn exit_requires_reason() {
        assert!(RequestValidator::validate_into::<ExitCreateParams>(&bag(json!({"idProduct": 1, "quantity": 1}))).is_err());
        assert!(
            RequestValidator::validate_into::<ExitCreateParams>(&bag(json!({"idProduct": 1, "quantity": 1, "reason": ""})))
                .is_err()
        );
    }

    #[test]
    fn adjustment_allows_zero_target() {
        let p: AdjustmentCreateParams = RequestValidator::validate_into(&bag(json!({
            "idProduct": 3, "newQuantity": 0, "reason": "inventory count"
        })))
        .unwrap();
        assert_eq!(p.new_quantity, 0.0);
        assert!(RequestValidator::validate_into::<AdjustmentCreateParams>(&bag(json!({
            "idProduct": 3, "newQuantity": -1, "reason": "inventory count"
        })))
        .is_err());
    }

    #[test]
    fn entry_rejects_past_expiration() {
        assert!(RequestValidator::validate_into::<EntryCreateParams>(&bag(json!({
            "idProduct": 1, "quantity": 5, "expirationDate": "2000-01-01"
        })))
        .is_err());
    }

    #[test]
    fn list_filters_parse_from_query_strings() {
        let p: MovementListParams = RequestValidator::validate_into(&bag(json!({
            "idProduct": "7", "type": "EXIT", "startDate": "2024-01-01", "endDate": "2024-01-31"
        })))
        .unwrap();
        assert_eq!(p.id_product, Some(7));
        assert_eq!(p.kind, Some(MovementKind::Exit));
        let v = serde_json::to_value(&p).unwrap();
        assert!(v.get("idUser").is_none());
        assert_eq!(v["type"], "EXIT");
        assert_eq!(v["startDate"], "2024-01-01");
    }
}
