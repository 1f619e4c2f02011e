mod common;

use chrono::{Duration, NaiveDate};
use common::{authed, TestApp};
use proptest::prelude::*;
use serde_json::{json, Map, Value};
use stockbox::model::{ExitCreateParams, MovementListParams, ProductCreateParams};
use stockbox::service::RequestValidator;
use stockbox::AppError;

fn bag(v: Value) -> Map<String, Value> {
    match v {
        Value::Object(m) => m,
        _ => unreachable!(),
    }
}

fn violated(err: &AppError, field: &str) -> bool {
    matches!(err, AppError::Validation(v) if v.iter().any(|f| f.path == field))
}

fn product_with_code(code: &str) -> Map<String, Value> {
    bag(json!({"idCategory": 1, "idUnitOfMeasure": 1, "code": code, "name": "Widget", "minimumStock": 5}))
}

fn date(offset: i64) -> String {
    let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (base + Duration::days(offset)).format("%Y-%m-%d").to_string()
}

proptest! {
    #[test]
    fn valid_codes_pass(code in "[A-Z0-9]{3,20}") {
        let p: ProductCreateParams = RequestValidator::validate_into(&product_with_code(&code)).unwrap();
        prop_assert_eq!(p.code, code);
    }

    #[test]
    fn codes_with_foreign_characters_fail(prefix in "[A-Z0-9]{1,8}", bad in "[a-z\\- _!]", suffix in "[A-Z0-9]{1,8}") {
        let code = format!("{}{}{}", prefix, bad, suffix);
        let err = RequestValidator::validate_into::<ProductCreateParams>(&product_with_code(&code)).unwrap_err();
        prop_assert!(violated(&err, "code"));
    }

    #[test]
    fn codes_with_wrong_length_fail(code in prop_oneof!["[A-Z0-9]{0,2}", "[A-Z0-9]{21,30}"]) {
        let err = RequestValidator::validate_into::<ProductCreateParams>(&product_with_code(&code)).unwrap_err();
        prop_assert!(violated(&err, "code"));
    }

    #[test]
    fn non_positive_exit_quantity_fails(quantity in -1_000_000.0f64..=0.0) {
        let err = RequestValidator::validate_into::<ExitCreateParams>(&bag(json!({
            "idProduct": 1, "quantity": quantity, "reason": "sale"
        }))).unwrap_err();
        prop_assert!(violated(&err, "quantity"));
    }

    #[test]
    fn date_range_order(start in 0i64..3650, end in 0i64..3650) {
        let result = RequestValidator::validate_into::<MovementListParams>(&bag(json!({
            "startDate": date(start), "endDate": date(end)
        })));
        prop_assert_eq!(result.is_ok(), end >= start);
    }

    #[test]
    fn one_sided_date_range_passes(day in 0i64..3650, use_start in any::<bool>()) {
        let key = if use_start { "startDate" } else { "endDate" };
        let mut params = Map::new();
        params.insert(key.to_string(), Value::String(date(day)));
        prop_assert!(RequestValidator::validate_into::<MovementListParams>(&params).is_ok());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn positive_exit_reaches_database_once(quantity in 0.001f64..10_000.0, id_product in 1i64..100_000) {
        tokio::runtime::Runtime::new().unwrap().block_on(async {
            let app = TestApp::new();
            let response = authed(app.server.post("/api/v1/internal/stock-movement/exit"))
                .json(&json!({"idProduct": id_product, "quantity": quantity, "reason": "sale"}))
                .await;
            prop_assert_eq!(response.status_code().as_u16(), 204);
            let calls = app.db.calls();
            prop_assert_eq!(calls.len(), 1);
            prop_assert_eq!(&calls[0].params["idProduct"], &json!(id_product));
            prop_assert_eq!(&calls[0].params["idAccount"], &json!(1));
            Ok(())
        })?;
    }
}
