use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::Value;
use tracing::{debug, info};

use crate::database::LocationRepository;
use crate::error::ApiError;
use crate::models::NewLocation;
use crate::AppState;

/// Any method, any path. The body is only read by POST.
pub async fn handle(State(state): State<AppState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    if parts.method == Method::OPTIONS {
        return preflight().into_response();
    }

    match dispatch(&state, &parts.method, body).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

/// CORS preflight; answered without touching the store
pub fn preflight() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "*"),
            (header::ACCESS_CONTROL_MAX_AGE, "86400"),
        ],
    )
}

async fn dispatch(state: &AppState, method: &Method, body: Body) -> Result<Response, ApiError> {
    let client = state
        .store
        .connect()
        .await
        .map_err(ApiError::schema_initialization)?;
    let repository = LocationRepository::new(client.as_ref());

    // Runs ahead of the method check, so unsupported methods still create the table
    repository
        .ensure_table()
        .await
        .map_err(ApiError::schema_initialization)?;

    match *method {
        Method::POST => insert(&repository, body).await.map(IntoResponse::into_response),
        Method::GET => list(&repository).await.map(IntoResponse::into_response),
        _ => Err(ApiError::MethodNotAllowed),
    }
}

/// Decodes like a browser `Response.json()`: lossy UTF-8, leading BOM dropped.
async fn read_json(body: Body) -> Result<Value, ApiError> {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.map_err(|e| {
        debug!("Failed to read POST body: {}", e);
        ApiError::InvalidJson
    })?;
    let text = String::from_utf8_lossy(&bytes);
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    serde_json::from_str(text).map_err(|e| {
        debug!("Rejected POST body: {}", e);
        ApiError::InvalidJson
    })
}

/// POST - record one location
async fn insert(repository: &LocationRepository<'_>, body: Body) -> Result<&'static str, ApiError> {
    let payload = read_json(body).await?;

    let location = NewLocation::from_json(&payload).map_err(ApiError::persistence)?;
    info!(
        latitud = ?location.latitud,
        longitud = ?location.longitud,
        timestamp = ?location.timestamp,
        "Inserting location"
    );

    repository
        .insert(location)
        .await
        .map_err(ApiError::persistence)?;

    Ok("Data inserted successfully!")
}

/// GET - every stored row as a JSON array
async fn list(repository: &LocationRepository<'_>) -> Result<Json<Vec<crate::database::Row>>, ApiError> {
    let rows = repository.select_all().await.map_err(ApiError::retrieval)?;
    debug!(count = rows.len(), "Listed locations");
    Ok(Json(rows))
}
