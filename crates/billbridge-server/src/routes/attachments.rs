use axum::{extract::State, routing::post, Json, Router};
use serde_json::{json, Value};

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/attachments/batch", post(attach_batch))
}

/// The integration entry point. The outcome array IS the response, so this
/// always answers 200 at the HTTP level, including the single-element
/// 500-outcome shape produced when the batch aborts.
async fn attach_batch(State(state): State<AppState>, Json(payload): Json<Value>) -> Json<Value> {
    let outcomes = state.processor.process(&payload).await;
    Json(json!(outcomes))
}
