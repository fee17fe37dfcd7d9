//! Metadata search index.
//!
//! Content metadata is partitioned by [`Category`]. All read queries are
//! scoped to a single owner (email) and a single partition, matching the
//! shape of the per-category queries the API issues.

use std::collections::BTreeSet;

use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};

use crate::category::Category;
use crate::entity::{content_keyword, content_metadata};

/// A metadata document produced by the ingestion pipeline.
#[derive(Clone, Debug)]
pub struct NewMetadata {
    pub id: String,
    pub category: Category,
    pub owner_email: String,
    pub original_file_name: String,
    pub gcs_path: String,
    pub keywords: Vec<String>,
}

/// Insert a metadata record and its keyword index rows atomically.
pub async fn insert_record(
    db: &DatabaseConnection,
    record: NewMetadata,
) -> Result<content_metadata::Model, DbErr> {
    let txn = db.begin().await?;

    let model = content_metadata::ActiveModel {
        id: Set(record.id.clone()),
        category: Set(record.category.as_str().to_string()),
        user_id: Set(record.owner_email),
        original_file_name: Set(record.original_file_name),
        gcs_path: Set(record.gcs_path),
        summary_content: Set(serde_json::Value::from(record.keywords.clone())),
        created_at: Set(chrono::Utc::now()),
    };
    content_metadata::Entity::insert(model)
        .exec_without_returning(&txn)
        .await?;

    let distinct: BTreeSet<String> = record.keywords.into_iter().collect();
    if !distinct.is_empty() {
        let rows = distinct.into_iter().map(|keyword| content_keyword::ActiveModel {
            metadata_id: Set(record.id.clone()),
            keyword: Set(keyword),
        });
        content_keyword::Entity::insert_many(rows)
            .exec_without_returning(&txn)
            .await?;
    }

    let saved = content_metadata::Entity::find_by_id(record.id)
        .one(&txn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound("content_metadata missing after insert".into()))?;

    txn.commit().await?;
    Ok(saved)
}

/// Records in `category` owned by `owner` whose original filename equals `file_name`.
pub async fn find_by_filename<C: ConnectionTrait>(
    db: &C,
    category: Category,
    owner: &str,
    file_name: &str,
) -> Result<Vec<content_metadata::Model>, DbErr> {
    content_metadata::Entity::find()
        .filter(content_metadata::Column::Category.eq(category.as_str()))
        .filter(content_metadata::Column::UserId.eq(owner))
        .filter(content_metadata::Column::OriginalFileName.eq(file_name))
        .order_by_asc(content_metadata::Column::CreatedAt)
        .order_by_asc(content_metadata::Column::Id)
        .all(db)
        .await
}

/// Records in `category` owned by `owner` whose keyword list contains `keyword`.
pub async fn find_by_keyword<C: ConnectionTrait>(
    db: &C,
    category: Category,
    owner: &str,
    keyword: &str,
) -> Result<Vec<content_metadata::Model>, DbErr> {
    let with_keyword = Query::select()
        .column(content_keyword::Column::MetadataId)
        .from(content_keyword::Entity)
        .and_where(content_keyword::Column::Keyword.eq(keyword))
        .to_owned();

    content_metadata::Entity::find()
        .filter(content_metadata::Column::Category.eq(category.as_str()))
        .filter(content_metadata::Column::UserId.eq(owner))
        .filter(content_metadata::Column::Id.in_subquery(with_keyword))
        .order_by_asc(content_metadata::Column::CreatedAt)
        .order_by_asc(content_metadata::Column::Id)
        .all(db)
        .await
}

/// The oldest record owned by `owner` named `file_name`, searching categories in order.
pub async fn find_first_by_filename<C: ConnectionTrait>(
    db: &C,
    owner: &str,
    file_name: &str,
) -> Result<Option<content_metadata::Model>, DbErr> {
    for category in Category::ALL {
        let found = find_by_filename(db, category, owner, file_name).await?;
        if let Some(first) = found.into_iter().next() {
            return Ok(Some(first));
        }
    }
    Ok(None)
}

/// Delete a metadata record and its keyword index rows.
///
/// Returns `false` if no record with `id` existed.
pub async fn delete_record(db: &DatabaseConnection, id: &str) -> Result<bool, DbErr> {
    let txn = db.begin().await?;

    content_keyword::Entity::delete_many()
        .filter(content_keyword::Column::MetadataId.eq(id))
        .exec(&txn)
        .await?;
    let result = content_metadata::Entity::delete_by_id(id.to_string())
        .exec(&txn)
        .await?;

    txn.commit().await?;
    Ok(result.rows_affected > 0)
}
