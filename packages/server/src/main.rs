use std::sync::Arc;

use anyhow::Context;
use common::storage::ObjectStore;
use common::storage::filesystem::FilesystemObjectStore;
use common::storage::s3::{S3ObjectStore, S3Settings};
use tracing::info;

use server::config::{AppConfig, StorageBackend, StorageConfig};
use server::identity::GoogleIdentityVerifier;
use server::state::AppState;

async fn init_object_store(storage: &StorageConfig) -> anyhow::Result<Arc<dyn ObjectStore>> {
    match storage.backend {
        StorageBackend::Filesystem => {
            let store = FilesystemObjectStore::new(storage.root.clone())
                .await
                .context("Failed to initialize filesystem object store")?;
            info!(root = %storage.root.display(), "Using filesystem object store");
            Ok(Arc::new(store))
        }
        StorageBackend::S3 => {
            let store = S3ObjectStore::new(&S3Settings {
                bucket: storage.bucket.clone(),
                region: storage.s3.region.clone(),
                endpoint: storage.s3.endpoint.clone(),
                access_key: storage.s3.access_key.clone(),
                secret_key: storage.s3.secret_key.clone(),
                path_style: storage.s3.path_style,
            })
            .context("Failed to initialize S3 object store")?;
            info!(bucket = %storage.bucket, "Using S3 object store");
            Ok(Arc::new(store))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let config = AppConfig::load().context("Failed to load config")?;

    let db = common::database::init_db(&config.database.url)
        .await
        .context("Failed to initialize database")?;
    info!("Database connected and schema synced");

    let objects = init_object_store(&config.storage).await?;

    if config.auth.google_client_id.is_empty() {
        tracing::warn!("auth.google_client_id is not set, Google sign-in will be unavailable");
    }
    let identity = Arc::new(GoogleIdentityVerifier::new(
        config.auth.google_client_id.clone(),
    ));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        db,
        config: Arc::new(config),
        objects,
        identity,
    };

    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
