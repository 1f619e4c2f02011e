//! Products: row shape returned by the procedures and the parameters of each operation.

use crate::schema::{FieldRule, RequestSchema, Schema};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::OnceLock;

/// Classification of current stock against the minimum-stock threshold, computed by the database.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    Normal,
    Low,
    Critical,
    Zero,
    Negative,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id_product: i64,
    pub id_account: i64,
    pub id_category: i64,
    pub category_name: String,
    pub id_unit_of_measure: i64,
    pub unit_of_measure_name: String,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub minimum_stock: f64,
    pub date_created: DateTime<Utc>,
    pub current_stock: f64,
    pub stock_status: StockStatus,
}

const CODE_PATTERN: &str = "^[A-Z0-9]+$";
const CODE_MESSAGE: &str = "must contain only uppercase letters and digits";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreateParams {
    pub id_category: i64,
    pub id_unit_of_measure: i64,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub minimum_stock: f64,
}

impl RequestSchema for ProductCreateParams {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::new()
                .field("idCategory", FieldRule::foreign_key())
                .field("idUnitOfMeasure", FieldRule::foreign_key())
                .field(
                    "code",
                    FieldRule::string()
                        .min_length(3)
                        .max_length(20)
                        .pattern(CODE_PATTERN, CODE_MESSAGE),
                )
                .field("name", FieldRule::string().min_length(3).max_length(100))
                .field("description", FieldRule::string().max_length(500).optional().nullable())
                .field("minimumStock", FieldRule::number().minimum(0.0).default(json!(0)))
        })
    }
}

/// Product id travels as `id` in the path and as `idProduct` to the procedure.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdateParams {
    #[serde(rename(serialize = "idProduct", deserialize = "id"))]
    pub id: i64,
    pub id_category: i64,
    pub id_unit_of_measure: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub minimum_stock: f64,
}

impl RequestSchema for ProductUpdateParams {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::new()
                .field("id", FieldRule::foreign_key())
                .field("idCategory", FieldRule::foreign_key())
                .field("idUnitOfMeasure", FieldRule::foreign_key())
                .field("name", FieldRule::string().min_length(3).max_length(100))
                .field("description", FieldRule::string().max_length(500).optional().nullable())
                .field("minimumStock", FieldRule::number().minimum(0.0))
        })
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_category: Option<i64>,
}

impl RequestSchema for ProductListParams {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::new()
                .field("searchTerm", FieldRule::string().optional().nullable())
                .field("idCategory", FieldRule::foreign_key().optional().nullable())
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProductGetParams {
    #[serde(rename(serialize = "idProduct", deserialize = "id"))]
    pub id: i64,
}

impl RequestSchema for ProductGetParams {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| Schema::new().field("id", FieldRule::foreign_key()))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProductDeleteParams {
    #[serde(rename(serialize = "idProduct", deserialize = "id"))]
    pub id: i64,
    pub reason: String,
}

impl RequestSchema for ProductDeleteParams {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::new()
                .field("id", FieldRule::foreign_key())
                .field("reason", FieldRule::string().min_length(10).max_length(500))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::service::RequestValidator;
    use serde_json::{Map, Value};

    fn bag(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    fn violated_paths(err: AppError) -> Vec<String> {
        match err {
            AppError::Validation(v) => v.into_iter().map(|f| f.path).collect(),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn create_fills_minimum_stock_default() {
        let p: ProductCreateParams = RequestValidator::validate_into(&bag(json!({
            "idCategory": 1, "idUnitOfMeasure": "2", "code": "ABC123", "name": "Widget"
        })))
        .unwrap();
        assert_eq!(p.id_unit_of_measure, 2);
        assert_eq!(p.minimum_stock, 0.0);
        assert_eq!(p.description, None);
    }

    #[test]
    fn create_rejects_lowercase_code() {
        let err = RequestValidator::validate_into::<ProductCreateParams>(&bag(json!({
            "idCategory": 1, "idUnitOfMeasure": 1, "code": "abc-123", "name": "Widget"
        })))
        .unwrap_err();
        assert_eq!(violated_paths(err), vec!["code"]);
    }

    #[test]
    fn update_requires_minimum_stock() {
        let err = RequestValidator::validate_into::<ProductUpdateParams>(&bag(json!({
            "id": "4", "idCategory": 1, "idUnitOfMeasure": 1, "name": "Widget"
        })))
        .unwrap_err();
        assert_eq!(violated_paths(err), vec!["minimumStock"]);
    }

    #[test]
    fn path_id_serializes_as_id_product() {
        let p: ProductDeleteParams =
            RequestValidator::validate_into(&bag(json!({"id": "8", "reason": "damaged in transit"}))).unwrap();
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v, json!({"idProduct": 8, "reason": "damaged in transit"}));
    }

    #[test]
    fn delete_reason_needs_ten_characters() {
        let err = RequestValidator::validate_into::<ProductDeleteParams>(&bag(json!({"id": 1, "reason": "too short"})))
            .unwrap_err();
        assert_eq!(violated_paths(err), vec!["reason"]);
    }

    #[test]
    fn product_row_deserializes() {
        let p: Product = serde_json::from_value(json!({
            "idProduct": 1, "idAccount": 1, "idCategory": 2, "categoryName": "Tools",
            "idUnitOfMeasure": 3, "unitOfMeasureName": "Unit", "code": "ABC123", "name": "Widget",
            "description": null, "minimumStock": 5, "dateCreated": "2024-05-01T10:00:00.000Z",
            "currentStock": 2.5, "stockStatus": "LOW"
        }))
        .unwrap();
        assert_eq!(p.stock_status, StockStatus::Low);
        assert_eq!(p.current_stock, 2.5);
    }
}
