use std::str::FromStr;

use async_trait::async_trait;
use serde_json::{Number, Value};
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row as _, TypeInfo, ValueRef};

use super::client::{Row, SqlClient, SqlValue, Store, StoreError};

/// Local SQLite database behind an sqlx pool. Used for development and tests.
pub struct SqliteStore {
    url: String,
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn open(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| StoreError::Connection(e.to_string()))?
            .create_if_missing(true);

        // Every connection to an in-memory database sees its own empty database,
        // so keep exactly one alive for the lifetime of the pool.
        let mut pool_options = SqlitePoolOptions::new();
        if url.contains(":memory:") {
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self {
            url: url.to_string(),
            pool,
        })
    }

    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::open("sqlite::memory:").await
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn connect(&self) -> Result<Box<dyn SqlClient>, StoreError> {
        Ok(Box::new(SqliteClient {
            pool: self.pool.clone(),
        }))
    }

    fn summary(&self) -> String {
        format!("SQLite at {}", self.url)
    }
}

pub struct SqliteClient {
    pool: SqlitePool,
}

#[async_trait]
impl SqlClient for SqliteClient {
    async fn execute(&self, sql: &str, params: Vec<SqlValue>) -> Result<u64, StoreError> {
        let result = bind_all(sqlx::query(sql), params)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn query(&self, sql: &str, params: Vec<SqlValue>) -> Result<Vec<Row>, StoreError> {
        let rows = bind_all(sqlx::query(sql), params)
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(convert_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::from)
    }
}

fn bind_all<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: Vec<SqlValue>,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            SqlValue::Null => query.bind(None::<String>),
            SqlValue::Integer(i) => query.bind(i),
            SqlValue::Real(r) => query.bind(r),
            SqlValue::Text(t) => query.bind(t),
        };
    }
    query
}

fn convert_row(row: &SqliteRow) -> Result<Row, sqlx::Error> {
    let mut mapped = Row::new();

    for column in row.columns() {
        let index = column.ordinal();
        let raw = row.try_get_raw(index)?;

        // Storage class of the value itself, not the declared column type
        let value = if raw.is_null() {
            Value::Null
        } else {
            match raw.type_info().name() {
                "INTEGER" => Value::from(row.try_get_unchecked::<i64, _>(index)?),
                "REAL" => Number::from_f64(row.try_get_unchecked::<f64, _>(index)?)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
                "BLOB" => Value::Array(
                    row.try_get_unchecked::<Vec<u8>, _>(index)?
                        .into_iter()
                        .map(Value::from)
                        .collect(),
                ),
                _ => Value::String(row.try_get_unchecked::<String, _>(index)?),
            }
        };

        mapped.insert(column.name().to_owned(), value);
    }

    Ok(mapped)
}
