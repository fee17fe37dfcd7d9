use std::time::Duration;

use sea_orm::sea_query::Index;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::{info, warn};

use crate::entity::{content_keyword, content_metadata};

/// Connect to the database and sync the schema of every entity in this crate.
pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    opt.max_connections(50)
        .min_connections(2)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(false);

    let db = Database::connect(opt).await?;
    sync_schema(&db).await?;

    Ok(db)
}

/// Create or update tables for all entities, then ensure lookup indexes.
pub async fn sync_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.get_schema_registry("common::entity::*")
        .sync(db)
        .await?;
    ensure_indexes(db).await
}

/// Ensure composite lookup indexes exist.
///
/// Schema sync only covers single-column uniqueness, so the indexes backing
/// the owner-scoped search queries are created here.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();

    let indexes = [
        // WHERE category = ? AND user_id = ? AND original_file_name = ?
        (
            "idx_content_metadata_owner_name",
            Index::create()
                .if_not_exists()
                .name("idx_content_metadata_owner_name")
                .table(content_metadata::Entity)
                .col(content_metadata::Column::Category)
                .col(content_metadata::Column::UserId)
                .col(content_metadata::Column::OriginalFileName)
                .to_owned(),
        ),
        // WHERE keyword = ?
        (
            "idx_content_keyword_keyword",
            Index::create()
                .if_not_exists()
                .name("idx_content_keyword_keyword")
                .table(content_keyword::Entity)
                .col(content_keyword::Column::Keyword)
                .to_owned(),
        ),
    ];

    for (name, stmt) in indexes {
        match db.execute_raw(backend.build(&stmt)).await {
            Ok(_) => info!("Ensured index {name} exists"),
            Err(e) => warn!("Failed to create index {name}: {e}"),
        }
    }

    Ok(())
}
