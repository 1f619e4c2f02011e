//! Column names come back from PostgreSQL in snake_case; the API speaks camelCase.

use serde_json::{Map, Value};

/// "id_product" -> "idProduct". Already camelCase input is returned unchanged.
pub fn to_camel_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut capitalize_next = false;
    for c in s.chars() {
        if c == '_' {
            capitalize_next = !out.is_empty();
        } else if capitalize_next {
            out.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert all keys of a JSON object to camelCase (in place).
pub fn object_keys_to_camel_case(obj: &mut Map<String, Value>) {
    let keys: Vec<String> = obj.keys().cloned().collect();
    for k in keys {
        let camel = to_camel_case(&k);
        if camel != k {
            if let Some(v) = obj.remove(&k) {
                obj.insert(camel, v);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn snake_to_camel() {
        assert_eq!(to_camel_case("id_unit_of_measure"), "idUnitOfMeasure");
        assert_eq!(to_camel_case("stockStatus"), "stockStatus");
        assert_eq!(to_camel_case("_private"), "private");
    }

    #[test]
    fn object_keys() {
        let mut m = match json!({"current_stock": 4, "code": "A1"}) {
            Value::Object(m) => m,
            _ => unreachable!(),
        };
        object_keys_to_camel_case(&mut m);
        assert_eq!(m["currentStock"], 4);
        assert_eq!(m["code"], "A1");
    }
}
