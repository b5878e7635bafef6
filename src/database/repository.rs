use crate::models::NewLocation;

use super::client::{Row, SqlClient, StoreError};

const CREATE_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS ubicaciones_piedras (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      latitud REAL NOT NULL,
      longitud REAL NOT NULL,
      timestamp TEXT NOT NULL
    );";

const INSERT_SQL: &str =
    "INSERT INTO ubicaciones_piedras (latitud, longitud, timestamp) VALUES (?, ?, ?);";

const SELECT_ALL_SQL: &str = "SELECT * FROM ubicaciones_piedras;";

/// Statements over the `ubicaciones_piedras` table for a single connection.
pub struct LocationRepository<'a> {
    client: &'a dyn SqlClient,
}

impl<'a> LocationRepository<'a> {
    pub fn new(client: &'a dyn SqlClient) -> Self {
        Self { client }
    }

    /// Idempotent; safe to run on every request.
    pub async fn ensure_table(&self) -> Result<(), StoreError> {
        self.client.execute(CREATE_TABLE_SQL, vec![]).await?;
        Ok(())
    }

    pub async fn insert(&self, location: NewLocation) -> Result<(), StoreError> {
        let params = vec![location.latitud, location.longitud, location.timestamp];
        self.client.execute(INSERT_SQL, params).await?;
        Ok(())
    }

    pub async fn select_all(&self) -> Result<Vec<Row>, StoreError> {
        self.client.query(SELECT_ALL_SQL, vec![]).await
    }
}
