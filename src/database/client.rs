use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// One result row: column name to value, in the order the store returned the columns.
pub type Row = Map<String, Value>;

/// Errors raised by a store backend. The display text is the backend's own message.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Connection(String),

    #[error("{0}")]
    Query(String),

    #[error("Unsupported type of value")]
    UnsupportedValue,
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Query(err.to_string())
    }
}

impl From<libsql::Error> for StoreError {
    fn from(err: libsql::Error) -> Self {
        StoreError::Query(err.to_string())
    }
}

/// Positional statement parameter
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl TryFrom<&Value> for SqlValue {
    type Error = StoreError;

    /// JSON numbers always bind as REAL; arrays and objects have no parameter form.
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(SqlValue::Null),
            Value::Bool(b) => Ok(SqlValue::Integer(i64::from(*b))),
            Value::Number(n) => n.as_f64().map(SqlValue::Real).ok_or(StoreError::UnsupportedValue),
            Value::String(s) => Ok(SqlValue::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => Err(StoreError::UnsupportedValue),
        }
    }
}

/// A live connection able to run statements against the store.
#[async_trait]
pub trait SqlClient: Send + Sync {
    /// Run a statement that returns no rows; yields the number of rows affected.
    async fn execute(&self, sql: &str, params: Vec<SqlValue>) -> Result<u64, StoreError>;

    /// Run a query and collect every row.
    async fn query(&self, sql: &str, params: Vec<SqlValue>) -> Result<Vec<Row>, StoreError>;
}

/// Factory for per-request connections, built once from configuration.
#[async_trait]
pub trait Store: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn SqlClient>, StoreError>;

    /// Human readable description for startup logs
    fn summary(&self) -> String;
}
