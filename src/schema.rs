//! Declarative request schemas. A schema lists the accepted fields of one operation and the
//! rules each field must satisfy; the struct implementing [`RequestSchema`] is the typed shape
//! the validated parameters deserialize into.

use crate::error::FieldViolation;
use regex::Regex;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// Typed request parameters with their validation schema.
pub trait RequestSchema: DeserializeOwned + Serialize + Send + 'static {
    fn schema() -> &'static Schema;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Number,
    String,
    Boolean,
    /// Calendar date, `YYYY-MM-DD`.
    Date,
    Enum(&'static [&'static str]),
}

impl FieldKind {
    pub fn describe(&self) -> &'static str {
        match self {
            FieldKind::Integer => "integer",
            FieldKind::Number => "number",
            FieldKind::String => "string",
            FieldKind::Boolean => "boolean",
            FieldKind::Date => "date",
            FieldKind::Enum(_) => "enum",
        }
    }
}

pub struct Pattern {
    pub source: &'static str,
    pub message: &'static str,
    compiled: OnceLock<Option<Regex>>,
}

impl Pattern {
    pub fn regex(&self) -> Option<&Regex> {
        self.compiled
            .get_or_init(|| Regex::new(self.source).ok())
            .as_ref()
    }
}

/// Rules for one field. Fields are required and non-null unless stated otherwise.
pub struct FieldRule {
    pub kind: FieldKind,
    pub required: bool,
    pub nullable: bool,
    pub default: Option<Value>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Pattern>,
    pub minimum: Option<f64>,
    pub exclusive_minimum: Option<f64>,
    pub maximum: Option<f64>,
    /// Dates only: must fall strictly after today (UTC).
    pub future: bool,
}

impl FieldRule {
    pub fn of(kind: FieldKind) -> Self {
        FieldRule {
            kind,
            required: true,
            nullable: false,
            default: None,
            min_length: None,
            max_length: None,
            pattern: None,
            minimum: None,
            exclusive_minimum: None,
            maximum: None,
            future: false,
        }
    }

    pub fn integer() -> Self {
        Self::of(FieldKind::Integer)
    }

    pub fn number() -> Self {
        Self::of(FieldKind::Number)
    }

    pub fn string() -> Self {
        Self::of(FieldKind::String)
    }

    pub fn boolean() -> Self {
        Self::of(FieldKind::Boolean)
    }

    pub fn date() -> Self {
        Self::of(FieldKind::Date)
    }

    pub fn one_of(values: &'static [&'static str]) -> Self {
        Self::of(FieldKind::Enum(values))
    }

    /// Positive integer reference to another record.
    pub fn foreign_key() -> Self {
        Self::integer().exclusive_minimum(0.0)
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Value used when the field is absent. Implies optional.
    pub fn default(mut self, value: Value) -> Self {
        self.required = false;
        self.default = Some(value);
        self
    }

    pub fn min_length(mut self, n: usize) -> Self {
        self.min_length = Some(n);
        self
    }

    pub fn max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    pub fn pattern(mut self, source: &'static str, message: &'static str) -> Self {
        self.pattern = Some(Pattern {
            source,
            message,
            compiled: OnceLock::new(),
        });
        self
    }

    pub fn minimum(mut self, n: f64) -> Self {
        self.minimum = Some(n);
        self
    }

    pub fn exclusive_minimum(mut self, n: f64) -> Self {
        self.exclusive_minimum = Some(n);
        self
    }

    pub fn maximum(mut self, n: f64) -> Self {
        self.maximum = Some(n);
        self
    }

    pub fn future(mut self) -> Self {
        self.future = true;
        self
    }
}

/// Cross-field check, run only when every field passed on its own.
pub type Refinement = Box<dyn Fn(&Map<String, Value>) -> Option<FieldViolation> + Send + Sync>;

#[derive(Default)]
pub struct Schema {
    pub fields: Vec<(&'static str, FieldRule)>,
    pub refinements: Vec<Refinement>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &'static str, rule: FieldRule) -> Self {
        self.fields.push((name, rule));
        self
    }

    pub fn refine<F>(mut self, check: F) -> Self
    where
        F: Fn(&Map<String, Value>) -> Option<FieldViolation> + Send + Sync + 'static,
    {
        self.refinements.push(Box::new(check));
        self
    }

    pub fn rule(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|(n, _)| *n == name).map(|(_, r)| r)
    }
}

/// `endDate >= startDate` when both are present. Dates are already normalised to `YYYY-MM-DD`,
/// so string order is calendar order.
pub fn date_range(
    start: &'static str,
    end: &'static str,
) -> impl Fn(&Map<String, Value>) -> Option<FieldViolation> + Send + Sync + 'static {
    move |params| {
        let s = params.get(start).and_then(Value::as_str)?;
        let e = params.get(end).and_then(Value::as_str)?;
        (e < s).then(|| FieldViolation::new(end, format!("{} must be on or after {}", end, start)))
    }
}
