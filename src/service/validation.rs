//! Request validation against declarative schemas.

use crate::error::{AppError, FieldViolation};
use crate::schema::{FieldKind, FieldRule, RequestSchema, Schema};
use chrono::{NaiveDate, Utc};
use serde_json::{Map, Number, Value};

pub struct RequestValidator;

impl RequestValidator {
    /// Validate `bag` and deserialize it into `T`. Either every field passes or nothing is returned.
    pub fn validate_into<T: RequestSchema>(bag: &Map<String, Value>) -> Result<T, AppError> {
        let clean = Self::validate(bag, T::schema()).map_err(AppError::Validation)?;
        serde_json::from_value(Value::Object(clean))
            .map_err(|e| AppError::Validation(vec![FieldViolation::new("", e.to_string())]))
    }

    /// Check every declared field, coerce values to their declared kind and fill defaults.
    /// Undeclared keys are dropped. All violations are reported, not just the first.
    pub fn validate(bag: &Map<String, Value>, schema: &Schema) -> Result<Map<String, Value>, Vec<FieldViolation>> {
        let mut out = Map::new();
        let mut violations = Vec::new();
        for (name, rule) in &schema.fields {
            match bag.get(*name) {
                None => {
                    if let Some(default) = &rule.default {
                        out.insert((*name).to_string(), default.clone());
                    } else if rule.required {
                        violations.push(FieldViolation::new(*name, "is required"));
                    }
                }
                Some(Value::Null) => {
                    if rule.nullable {
                        out.insert((*name).to_string(), Value::Null);
                    } else {
                        violations.push(FieldViolation::new(
                            *name,
                            format!("expected {}, received null", rule.kind.describe()),
                        ));
                    }
                }
                Some(v) => match validate_field(name, v, rule) {
                    Ok(coerced) => {
                        out.insert((*name).to_string(), coerced);
                    }
                    Err(mut errs) => violations.append(&mut errs),
                },
            }
        }
        if !violations.is_empty() {
            return Err(violations);
        }
        for check in &schema.refinements {
            if let Some(v) = check(&out) {
                violations.push(v);
            }
        }
        if violations.is_empty() {
            Ok(out)
        } else {
            Err(violations)
        }
    }
}

fn validate_field(col: &str, v: &Value, rule: &FieldRule) -> Result<Value, Vec<FieldViolation>> {
    let coerced = coerce(v, &rule.kind).map_err(|message| vec![FieldViolation::new(col, message)])?;
    let mut errs = Vec::new();
    if let Some(s) = coerced.as_str() {
        let len = s.chars().count();
        if let Some(min) = rule.min_length {
            if len < min {
                errs.push(FieldViolation::new(col, format!("must be at least {} characters", min)));
            }
        }
        if let Some(max) = rule.max_length {
            if len > max {
                errs.push(FieldViolation::new(col, format!("must be at most {} characters", max)));
            }
        }
        if let Some(pattern) = &rule.pattern {
            match pattern.regex() {
                Some(re) if re.is_match(s) => {}
                Some(_) => errs.push(FieldViolation::new(col, pattern.message)),
                None => errs.push(FieldViolation::new(col, "invalid pattern")),
            }
        }
    }
    if let Some(n) = coerced.as_f64() {
        if let Some(min) = rule.minimum {
            if n < min {
                errs.push(FieldViolation::new(col, format!("must be greater than or equal to {}", min)));
            }
        }
        if let Some(min) = rule.exclusive_minimum {
            if n <= min {
                errs.push(FieldViolation::new(col, format!("must be greater than {}", min)));
            }
        }
        if let Some(max) = rule.maximum {
            if n > max {
                errs.push(FieldViolation::new(col, format!("must be less than or equal to {}", max)));
            }
        }
    }
    if rule.future && rule.kind == FieldKind::Date {
        let today = Utc::now().date_naive();
        let is_future = coerced
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            .map(|d| d > today)
            .unwrap_or(false);
        if !is_future {
            errs.push(FieldViolation::new(col, "must be a future date"));
        }
    }
    if errs.is_empty() {
        Ok(coerced)
    } else {
        Err(errs)
    }
}

/// Convert a raw value to the declared kind. Query and path values arrive as strings, so numeric
/// and boolean kinds accept their string spellings.
fn coerce(v: &Value, kind: &FieldKind) -> Result<Value, String> {
    match kind {
        FieldKind::Integer => as_integer(v).map(|n| Value::Number(Number::from(n))),
        FieldKind::Number => {
            if let Some(n) = v.as_i64() {
                return Ok(Value::Number(Number::from(n)));
            }
            let n = as_number(v).ok_or_else(|| format!("expected number, received {}", type_name(v)))?;
            if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                return Ok(Value::Number(Number::from(n as i64)));
            }
            Number::from_f64(n)
                .map(Value::Number)
                .ok_or_else(|| "expected finite number".to_string())
        }
        FieldKind::String => match v {
            Value::String(_) => Ok(v.clone()),
            other => Err(format!("expected string, received {}", type_name(other))),
        },
        FieldKind::Boolean => match v {
            Value::Bool(_) => Ok(v.clone()),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(Value::Bool(true)),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(Value::Bool(false)),
            other => Err(format!("expected boolean, received {}", type_name(other))),
        },
        FieldKind::Date => {
            let s = v
                .as_str()
                .ok_or_else(|| format!("expected string, received {}", type_name(v)))?;
            let d = parse_iso_date(s).ok_or_else(|| "invalid date, expected YYYY-MM-DD".to_string())?;
            Ok(Value::String(d.format("%Y-%m-%d").to_string()))
        }
        FieldKind::Enum(allowed) => match v.as_str() {
            Some(s) if allowed.contains(&s) => Ok(v.clone()),
            _ => Err(format!("must be one of: {}", allowed.join(", "))),
        },
    }
}

/// Integers are read exactly. A float is accepted only when it is integral and inside the `i64`
/// range, so `"5.0"` passes and `1e20` does not.
fn as_integer(v: &Value) -> Result<i64, String> {
    if let Some(n) = v.as_i64() {
        return Ok(n);
    }
    if let Value::String(s) = v {
        if let Ok(n) = s.trim().parse::<i64>() {
            return Ok(n);
        }
    }
    let n = as_number(v).ok_or_else(|| format!("expected number, received {}", type_name(v)))?;
    // 2^63 is exactly representable; i64::MAX is not.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if n.fract() != 0.0 || n < -LIMIT || n >= LIMIT {
        return Err("expected integer".into());
    }
    Ok(n as i64)
}

/// Strict calendar date: exactly `YYYY-MM-DD`, zero-padded, no surrounding whitespace.
fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let shape_ok = s.len() == 10
        && s.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn as_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let t = s.trim();
            if t.is_empty() {
                None
            } else {
                t.parse::<f64>().ok().filter(|n| n.is_finite())
            }
        }
        _ => None,
    }
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
