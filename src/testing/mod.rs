use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;

use crate::database::{Row, SqlClient, SqlValue, Store, StoreError};

/// Which step of a request the scripted store should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Nothing,
    Connect,
    CreateTable,
    Insert,
    Select,
}

/// Store double that records statements and fails on demand
pub struct ScriptedStore {
    fail_at: FailAt,
    connects: Arc<AtomicUsize>,
    statements: Arc<Mutex<Vec<String>>>,
}

impl ScriptedStore {
    pub fn failing_at(fail_at: FailAt) -> Self {
        Self {
            fail_at,
            connects: Arc::new(AtomicUsize::new(0)),
            statements: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn connect_counter(&self) -> Arc<AtomicUsize> {
        self.connects.clone()
    }

    pub fn statement_log(&self) -> Arc<Mutex<Vec<String>>> {
        self.statements.clone()
    }
}

#[async_trait]
impl Store for ScriptedStore {
    async fn connect(&self) -> Result<Box<dyn SqlClient>, StoreError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.fail_at == FailAt::Connect {
            return Err(StoreError::Connection("scripted failure".into()));
        }
        Ok(Box::new(ScriptedClient {
            fail_at: self.fail_at,
            statements: self.statements.clone(),
        }))
    }

    fn summary(&self) -> String {
        format!("scripted store failing at {:?}", self.fail_at)
    }
}

struct ScriptedClient {
    fail_at: FailAt,
    statements: Arc<Mutex<Vec<String>>>,
}

impl ScriptedClient {
    fn run(&self, sql: &str) -> Result<(), StoreError> {
        self.statements.lock().unwrap().push(sql.to_string());

        let failing = match self.fail_at {
            FailAt::CreateTable => sql.contains("CREATE TABLE"),
            FailAt::Insert => sql.starts_with("INSERT"),
            FailAt::Select => sql.starts_with("SELECT"),
            FailAt::Nothing | FailAt::Connect => false,
        };
        if failing {
            return Err(StoreError::Query("scripted failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl SqlClient for ScriptedClient {
    async fn execute(&self, sql: &str, _params: Vec<SqlValue>) -> Result<u64, StoreError> {
        self.run(sql)?;
        Ok(1)
    }

    async fn query(&self, sql: &str, _params: Vec<SqlValue>) -> Result<Vec<Row>, StoreError> {
        self.run(sql)?;
        Ok(vec![])
    }
}

pub fn request(method: Method, uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(body.into())
        .unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
