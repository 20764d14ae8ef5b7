use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use billbridge_service::LocalService;
use billbridge_store::StoreConfig;

fn test_service() -> Arc<LocalService> {
    let db = billbridge_db::Db::open_in_memory().unwrap();
    let store_config = StoreConfig {
        endpoint_url: None,
        region: None,
        bucket: None,
        access_key_id: None,
        secret_access_key: None,
        local_data_dir: Some(
            tempfile::tempdir()
                .unwrap()
                .keep()
                .to_string_lossy()
                .to_string(),
        ),
    };
    let store = billbridge_store::create_store(&store_config).unwrap();
    Arc::new(LocalService::new(db, store))
}

/// Build a test router with in-memory SQLite, temp local store, no auth.
pub fn test_router() -> Router {
    crate::routes::build_router(test_service(), None)
}

/// Build a test router with auth enabled, returning (router, api_key).
pub fn test_router_with_auth() -> (Router, String) {
    let api_key = crate::auth::generate_api_key();
    let auth = crate::auth::build_auth_config_with_key(Some(&api_key));
    let router = crate::routes::build_router(test_service(), auth);
    (router, api_key)
}

/// A running test server with base_url and background task handle.
pub struct TestServer {
    pub base_url: String,
    _handle: tokio::task::JoinHandle<()>,
}

async fn spawn(app: Router) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{addr}");
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    TestServer {
        base_url,
        _handle: handle,
    }
}

/// Spawn an axum test server on a random port. Returns the TestServer
/// with the `base_url` (e.g. "http://127.0.0.1:12345").
pub async fn spawn_test_server() -> TestServer {
    spawn(test_router()).await
}

/// Spawn a test server with auth enabled, returning (server, api_key).
pub async fn spawn_test_server_with_auth() -> (TestServer, String) {
    let (router, api_key) = test_router_with_auth();
    (spawn(router).await, api_key)
}
