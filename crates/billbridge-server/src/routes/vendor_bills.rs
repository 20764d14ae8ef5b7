use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use billbridge_core::vendor_bill::{CreateVendorBill, UpdateVendorBill};
use billbridge_service::{FileCabinet, RecordSearch, RecordStore};

use super::{to_error, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/vendor-bills",
            get(list_vendor_bills).post(create_vendor_bill),
        )
        .route(
            "/api/vendor-bills/{id}",
            get(get_vendor_bill).put(update_vendor_bill),
        )
        .route("/api/vendor-bills/{id}/files", get(list_attachments))
        .route("/api/vendor-bills/{id}/files/{file_id}", post(attach_file))
}

#[derive(Debug, Deserialize)]
struct BillQuery {
    work_order_number: Option<String>,
}

async fn list_vendor_bills(
    State(state): State<AppState>,
    Query(q): Query<BillQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let bills = match q.work_order_number {
        Some(work_order_number) => state
            .service
            .search_vendor_bills(&work_order_number)
            .await
            .map_err(to_error)?,
        None => state.service.list_vendor_bills().await.map_err(to_error)?,
    };
    Ok(Json(json!(bills)))
}

async fn get_vendor_bill(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state
        .service
        .load_vendor_bill(&id)
        .await
        .map(|b| Json(json!(b)))
        .map_err(to_error)
}

async fn create_vendor_bill(
    State(state): State<AppState>,
    Json(input): Json<CreateVendorBill>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    state
        .service
        .create_vendor_bill(&input)
        .await
        .map(|b| (StatusCode::CREATED, Json(json!(b))))
        .map_err(to_error)
}

async fn update_vendor_bill(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateVendorBill>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state
        .service
        .update_vendor_bill(&id, &input)
        .await
        .map(|b| Json(json!(b)))
        .map_err(to_error)
}

async fn list_attachments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state
        .service
        .list_attachments(&id)
        .await
        .map(|a| Json(json!(a)))
        .map_err(to_error)
}

async fn attach_file(
    State(state): State<AppState>,
    Path((id, file_id)): Path<(String, String)>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    // Resolve both sides first so a dangling id surfaces as 404 rather
    // than a foreign-key failure.
    let bill = state.service.load_vendor_bill(&id).await.map_err(to_error)?;
    let file = state.service.load_file(&file_id).await.map_err(to_error)?;
    state
        .service
        .attach_file(&bill.id, &file.id)
        .await
        .map(|a| (StatusCode::CREATED, Json(json!(a))))
        .map_err(to_error)
}
