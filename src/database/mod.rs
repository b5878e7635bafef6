pub mod client;
pub mod repository;
pub mod sqlite;
pub mod turso;

pub use client::{Row, SqlClient, SqlValue, Store, StoreError};
pub use repository::LocationRepository;
pub use sqlite::SqliteStore;
pub use turso::LibSqlStore;
