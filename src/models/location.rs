use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::database::{SqlValue, StoreError};

/// A stored row of `ubicaciones_piedras`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoneLocation {
    pub id: i64,
    pub latitud: f64,
    pub longitud: f64,
    pub timestamp: String,
}

/// Insert parameters taken from a POST body. `id` is never read from the client.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLocation {
    pub latitud: SqlValue,
    pub longitud: SqlValue,
    /// Bound as-is; the TEXT column affinity turns a REAL `5` into `"5.0"`.
    pub timestamp: SqlValue,
}

impl NewLocation {
    pub fn from_json(body: &Value) -> Result<Self, StoreError> {
        Self::from_json_at(body, Utc::now())
    }

    /// Builds the parameters, substituting `now` when `timestamp` is absent or falsy.
    /// A body that is not an object is read as one without fields.
    /// Arrays and objects in any field fail with [`StoreError::UnsupportedValue`].
    pub fn from_json_at(body: &Value, now: DateTime<Utc>) -> Result<Self, StoreError> {
        let timestamp = match field(body, "timestamp") {
            v if is_falsy(v) => SqlValue::Text(iso_timestamp(now)),
            other => SqlValue::try_from(other)?,
        };

        Ok(Self {
            latitud: SqlValue::try_from(field(body, "latitud"))?,
            longitud: SqlValue::try_from(field(body, "longitud"))?,
            timestamp,
        })
    }
}

/// `YYYY-MM-DDTHH:MM:SS.mmmZ`
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn field<'a>(body: &'a Value, name: &str) -> &'a Value {
    body.get(name).unwrap_or(&Value::Null)
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
