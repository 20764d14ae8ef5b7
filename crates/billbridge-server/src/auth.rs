use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::routes::AppState;

/// Authentication configuration.
pub struct AuthConfig {
    /// SHA-256 hash of the `BILLBRIDGE_API_KEY` env var.
    pub env_key_hash: String,
}

/// SHA-256 hash a raw key, returning the hex-encoded digest.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Generate a new API key: `bb_` + 43 chars of base62-encoded random bytes.
pub fn generate_api_key() -> String {
    use rand::Rng;
    const BASE62: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    let random_part: String = (0..43)
        .map(|_| {
            let idx = rng.gen_range(0..BASE62.len());
            BASE62[idx] as char
        })
        .collect();
    format!("bb_{random_part}")
}

/// Axum middleware that enforces authentication.
///
/// If `auth` is `None` in the AppState, all requests pass through (open
/// access). Otherwise, requires a valid `Authorization: Bearer <token>`
/// header.
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let auth = match &state.auth {
        Some(auth) => auth,
        None => return next.run(request).await,
    };

    let token = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let token = match token {
        Some(t) => t,
        None => return unauthorized(),
    };

    // Constant-time comparison via hash equality
    if constant_time_eq(&sha256_hex(token), &auth.env_key_hash) {
        next.run(request).await
    } else {
        unauthorized()
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "missing or invalid API key" })),
    )
        .into_response()
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes()
        .iter()
        .zip(b.as_bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// Build an `Option<AuthConfig>` from the environment.
///
/// Returns `None` (open access) when `BILLBRIDGE_API_KEY` is not set.
pub fn build_auth_config() -> Option<Arc<AuthConfig>> {
    let env_key = std::env::var("BILLBRIDGE_API_KEY").ok();
    build_auth_config_with_key(env_key.as_deref())
}

/// Build auth config from an explicit key value (testable without env
/// mutation).
pub fn build_auth_config_with_key(env_key: Option<&str>) -> Option<Arc<AuthConfig>> {
    env_key.filter(|k| !k.is_empty()).map(|k| {
        Arc::new(AuthConfig {
            env_key_hash: sha256_hex(k),
        })
    })
}
