//! Per-user keyword-count partition.
//!
//! Counts are derived data: the aggregator replaces a user's whole set in one
//! transaction, and the API only reads them.

use std::collections::BTreeMap;

use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use crate::entity::keyword_count;

/// Storage key for a keyword. `/` is structurally significant in document
/// paths, so it is replaced.
pub fn sanitize_key(keyword: &str) -> String {
    keyword.replace('/', "_")
}

/// The `limit` most frequent keywords for a user, highest count first.
///
/// Ties are broken alphabetically so the order is stable between requests.
pub async fn top_counts<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    limit: u64,
) -> Result<Vec<keyword_count::Model>, DbErr> {
    keyword_count::Entity::find()
        .filter(keyword_count::Column::UserId.eq(user_id))
        .order_by_desc(keyword_count::Column::Count)
        .order_by_asc(keyword_count::Column::Keyword)
        .limit(limit)
        .all(db)
        .await
}

/// Every stored count for a user, in key order.
pub async fn all_counts<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> Result<Vec<keyword_count::Model>, DbErr> {
    keyword_count::Entity::find()
        .filter(keyword_count::Column::UserId.eq(user_id))
        .order_by_asc(keyword_count::Column::KeywordKey)
        .all(db)
        .await
}

/// Atomically replace a user's keyword counts with `counts`.
///
/// Keywords whose sanitized keys collide are merged by summing their counts;
/// the first keyword seen keeps the record. Entries with a non-positive
/// count are dropped.
pub async fn replace_counts(
    db: &DatabaseConnection,
    user_id: Uuid,
    counts: &[(String, i64)],
) -> Result<usize, DbErr> {
    let mut merged: BTreeMap<String, (String, i64)> = BTreeMap::new();
    for (keyword, count) in counts.iter().filter(|(_, count)| *count > 0) {
        merged
            .entry(sanitize_key(keyword))
            .and_modify(|entry| entry.1 += count)
            .or_insert_with(|| (keyword.clone(), *count));
    }

    let txn = db.begin().await?;

    keyword_count::Entity::delete_many()
        .filter(keyword_count::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;

    let written = merged.len();
    if !merged.is_empty() {
        let rows = merged
            .into_iter()
            .map(|(key, (keyword, count))| keyword_count::ActiveModel {
                user_id: Set(user_id),
                keyword_key: Set(key),
                keyword: Set(keyword),
                count: Set(count),
            });
        keyword_count::Entity::insert_many(rows)
            .exec_without_returning(&txn)
            .await?;
    }

    txn.commit().await?;
    Ok(written)
}
