use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::error::CoreError;
use crate::ids::ReferentialId;
use crate::pmfm::{Pmfm, PmfmType};

#[derive(Debug, Clone)]
pub enum PmfmValue {
    Numeric(f64),
    Qualitative(ReferentialId),
    Text(String),
    Boolean(bool),
    Date(DateTime<Utc>),
}

impl PartialEq for PmfmValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Numeric(a), Self::Numeric(b)) => a.total_cmp(b).is_eq(),
            (Self::Qualitative(a), Self::Qualitative(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            _ => false,
        }
    }
}

impl PmfmValue {
    /// Numeric reading of the value. NaN counts as absent.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PmfmValue::Numeric(n) if !n.is_nan() => Some(*n),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            PmfmValue::Numeric(n) => n.is_nan(),
            PmfmValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Coerce a loosely-typed wire value. When `pmfm` is known its declared
    /// type decides; otherwise the JSON type does. `null` yields `None`.
    pub fn from_wire(value: &Value, pmfm: Option<&Pmfm>) -> Result<Option<Self>, CoreError> {
        if value.is_null() {
            return Ok(None);
        }
        let Some(pmfm) = pmfm else {
            return Self::infer(value);
        };
        let invalid = || {
            CoreError::InvalidData(format!(
                "pmfm {}: cannot read {value} as {:?}",
                pmfm.id, pmfm.pmfm_type
            ))
        };
        match pmfm.pmfm_type {
            PmfmType::QualitativeValue => {
                let raw = value.get("id").unwrap_or(value);
                let parsed = match raw {
                    Value::Number(n) => n.as_i64().and_then(qualitative).map(Some),
                    Value::String(s) if s.trim().is_empty() => Some(None),
                    Value::String(s) => s
                        .parse::<ReferentialId>()
                        .ok()
                        .map(|id| Some(Self::Qualitative(id))),
                    _ => None,
                };
                parsed.ok_or_else(invalid)
            }
            PmfmType::Integer | PmfmType::Double => match value {
                Value::Number(n) => n.as_f64().map(|n| Some(Self::Numeric(n))).ok_or_else(invalid),
                Value::String(s) if s.trim().is_empty() => Ok(None),
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .map(|n| Some(Self::Numeric(n)))
                    .map_err(|_| invalid()),
                _ => Err(invalid()),
            },
            PmfmType::String => match value {
                Value::String(s) => Ok(Some(Self::Text(s.clone()))),
                Value::Number(n) => Ok(Some(Self::Text(n.to_string()))),
                _ => Err(invalid()),
            },
            PmfmType::Boolean => match value {
                Value::Bool(b) => Ok(Some(Self::Boolean(*b))),
                Value::Number(n) => match n.as_f64() {
                    Some(v) if v == 1.0 => Ok(Some(Self::Boolean(true))),
                    Some(v) if v == 0.0 => Ok(Some(Self::Boolean(false))),
                    _ => Err(invalid()),
                },
                Value::String(s) => match s.trim() {
                    "true" | "1" => Ok(Some(Self::Boolean(true))),
                    "false" | "0" => Ok(Some(Self::Boolean(false))),
                    "" => Ok(None),
                    _ => Err(invalid()),
                },
                _ => Err(invalid()),
            },
            PmfmType::Date => match value {
                Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
                    .map(|d| Some(Self::Date(d.with_timezone(&Utc))))
                    .map_err(|_| invalid()),
                _ => Err(invalid()),
            },
        }
    }

    fn infer(value: &Value) -> Result<Option<Self>, CoreError> {
        let unsupported =
            || CoreError::InvalidData(format!("unsupported measurement value: {value}"));
        match value {
            Value::Number(n) => Ok(n.as_f64().map(Self::Numeric)),
            Value::String(s) => Ok(Some(Self::Text(s.clone()))),
            Value::Bool(b) => Ok(Some(Self::Boolean(*b))),
            Value::Object(map) => map
                .get("id")
                .and_then(Value::as_i64)
                .and_then(qualitative)
                .map(Some)
                .ok_or_else(unsupported),
            _ => Err(unsupported()),
        }
    }

    pub fn to_wire(&self) -> Value {
        match self {
            PmfmValue::Numeric(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            PmfmValue::Qualitative(id) => json!({ "id": id.value() }),
            PmfmValue::Text(s) => Value::String(s.clone()),
            PmfmValue::Boolean(b) => json!(if *b { 1 } else { 0 }),
            PmfmValue::Date(d) => Value::String(d.to_rfc3339_opts(SecondsFormat::Millis, true)),
        }
    }
}

/// Qualitative value ids are `i32` referential ids; wider ids are invalid.
fn qualitative(id: i64) -> Option<PmfmValue> {
    i32::try_from(id)
        .ok()
        .map(|id| PmfmValue::Qualitative(ReferentialId::new(id)))
}
