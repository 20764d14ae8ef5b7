use axum::{
    body::Body,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use billbridge_core::stored_file::CreateStoredFile;
use billbridge_service::{FileCabinet, ServiceError};

use super::{to_error, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/files", post(register_file))
        .route("/api/files/{id}", get(get_file))
        .route("/api/files/{id}/content", get(download_content))
}

async fn register_file(
    State(state): State<AppState>,
    Json(input): Json<CreateStoredFile>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    state
        .service
        .register_file(&input)
        .await
        .map(|f| (StatusCode::CREATED, Json(json!(f))))
        .map_err(to_error)
}

async fn get_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state
        .service
        .load_file(&id)
        .await
        .map(|f| Json(json!(f)))
        .map_err(to_error)
}

async fn download_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, (StatusCode, Json<Value>)> {
    let file = state.service.load_file(&id).await.map_err(to_error)?;
    let content = state.service.read_content(&id).await.map_err(to_error)?;

    Response::builder()
        .header("Content-Type", "application/octet-stream")
        .header(
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", file.filename),
        )
        .body(Body::from(content))
        .map_err(|e| to_error(ServiceError::Internal(format!("response: {e}"))))
}
