use async_trait::async_trait;
use serde_json::{Number, Value};

use super::client::{Row, SqlClient, SqlValue, Store, StoreError};

/// Remote libSQL (Turso) database addressed by URL and auth token.
pub struct LibSqlStore {
    url: String,
    db: libsql::Database,
}

impl LibSqlStore {
    pub async fn open(url: String, auth_token: String) -> Result<Self, StoreError> {
        let db = libsql::Builder::new_remote(url.clone(), auth_token)
            .build()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Self { url, db })
    }
}

#[async_trait]
impl Store for LibSqlStore {
    async fn connect(&self) -> Result<Box<dyn SqlClient>, StoreError> {
        let inner = self
            .db
            .connect()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Box::new(LibSqlConnection { inner }))
    }

    fn summary(&self) -> String {
        format!("libSQL at {}", self.url)
    }
}

/// An open connection to a libSQL server.
pub struct LibSqlConnection {
    inner: libsql::Connection,
}

#[async_trait]
impl SqlClient for LibSqlConnection {
    async fn execute(&self, sql: &str, params: Vec<SqlValue>) -> Result<u64, StoreError> {
        Ok(self.inner.execute(sql, convert_parameters(params)).await?)
    }

    async fn query(&self, sql: &str, params: Vec<SqlValue>) -> Result<Vec<Row>, StoreError> {
        let rows = self.inner.query(sql, convert_parameters(params)).await?;
        convert_rows(rows).await
    }
}

async fn convert_rows(mut rows: libsql::Rows) -> Result<Vec<Row>, StoreError> {
    let columns: Vec<String> = (0..rows.column_count())
        .map(|index| rows.column_name(index).unwrap_or("").to_owned())
        .collect();

    let mut result = vec![];
    while let Some(row) = rows.next().await? {
        let mut mapped = Row::new();
        for (index, name) in (0..).zip(columns.iter()) {
            mapped.insert(name.clone(), convert_value(row.get_value(index)?));
        }
        result.push(mapped);
    }

    Ok(result)
}

fn convert_value(v: libsql::Value) -> Value {
    use libsql::Value as L;

    match v {
        L::Null => Value::Null,
        L::Integer(i) => Value::from(i),
        L::Real(r) => Number::from_f64(r).map(Value::Number).unwrap_or(Value::Null),
        L::Text(t) => Value::String(t),
        L::Blob(b) => Value::Array(b.into_iter().map(Value::from).collect()),
    }
}

fn convert_parameters(parameters: Vec<SqlValue>) -> Vec<libsql::Value> {
    use libsql::Value as L;

    parameters
        .into_iter()
        .map(|v| match v {
            SqlValue::Null => L::Null,
            SqlValue::Integer(i) => L::Integer(i),
            SqlValue::Real(r) => L::Real(r),
            SqlValue::Text(t) => L::Text(t),
        })
        .collect()
}
