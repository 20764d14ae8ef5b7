pub mod auth;
mod routes;
#[cfg(feature = "test-helpers")]
pub mod test_helpers;

use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;

use billbridge_db::Db;
use billbridge_service::LocalService;
use billbridge_store::ObjectStore;

use auth::AuthConfig;

pub async fn serve(
    listener: TcpListener,
    db: Db,
    store: Arc<dyn ObjectStore>,
    auth: Option<Arc<AuthConfig>>,
) -> Result<()> {
    let service = Arc::new(LocalService::new(db, store));
    let app = routes::build_router(service, auth);
    axum::serve(listener, app).await?;
    Ok(())
}
