pub mod attachments;
pub mod files;
pub mod health;
pub mod vendor_bills;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::{middleware, Json, Router};
use serde_json::{json, Value};

use billbridge_service::{BatchAttachmentProcessor, LocalService, ServiceError};

use crate::auth::{auth_middleware, AuthConfig};

pub struct InnerAppState {
    pub service: Arc<LocalService>,
    pub processor: BatchAttachmentProcessor,
    pub auth: Option<Arc<AuthConfig>>,
}

pub type AppState = Arc<InnerAppState>;

pub fn build_router(service: Arc<LocalService>, auth: Option<Arc<AuthConfig>>) -> Router {
    let processor = BatchAttachmentProcessor::from_platform(service.clone());
    let state: AppState = Arc::new(InnerAppState {
        service,
        processor,
        auth,
    });

    let public = Router::new().merge(health::routes());

    let protected = Router::new()
        .merge(vendor_bills::routes())
        .merge(files::routes())
        .merge(attachments::routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    public.merge(protected).with_state(state)
}

pub(crate) fn to_error(e: ServiceError) -> (StatusCode, Json<Value>) {
    let (status, msg) = match &e {
        ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
        ServiceError::InvalidInput(_) => (StatusCode::BAD_REQUEST, e.to_string()),
        ServiceError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": msg })))
}
