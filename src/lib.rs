use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod models;

#[cfg(test)]
pub mod testing;

use database::Store;

/// Shared per-process state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(store: impl Store + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

impl From<Box<dyn Store>> for AppState {
    fn from(store: Box<dyn Store>) -> Self {
        Self {
            store: Arc::from(store),
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .fallback(handlers::handle)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
