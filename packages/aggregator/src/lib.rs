//! Offline keyword aggregation.
//!
//! Scans every metadata partition, counts keyword occurrences per owner and
//! replaces each owner's keyword-count records. Every run recomputes from the
//! full corpus, so running it twice without intervening changes leaves the
//! same records behind.

pub mod config;

use std::collections::BTreeMap;

use common::Category;
use common::entity::content_metadata;
use common::{credentials, keywords};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use tracing::{info, warn};

/// Keyword occurrences per owner email.
pub type OwnerCounts = BTreeMap<String, BTreeMap<String, i64>>;

/// Totals of one aggregation run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AggregationReport {
    pub files_scanned: u64,
    pub owners: usize,
    pub owners_written: usize,
    pub owners_skipped: usize,
    pub keywords_written: usize,
}

/// Count keyword occurrences per owner over all four partitions.
pub async fn scan_metadata(
    db: &DatabaseConnection,
    page_size: u64,
) -> Result<(OwnerCounts, u64), DbErr> {
    let mut counts = OwnerCounts::new();
    let mut files_scanned = 0;

    for category in Category::ALL {
        let mut pages = content_metadata::Entity::find()
            .filter(content_metadata::Column::Category.eq(category.as_str()))
            .order_by_asc(content_metadata::Column::Id)
            .paginate(db, page_size.max(1));

        while let Some(page) = pages.fetch_and_next().await? {
            for record in page {
                files_scanned += 1;
                let owner = counts.entry(record.user_id.clone()).or_default();
                for keyword in record.keywords() {
                    if keyword.trim().is_empty() {
                        continue;
                    }
                    *owner.entry(keyword).or_default() += 1;
                }
            }
        }
        info!(%category, files_scanned, "Partition scanned");
    }

    Ok((counts, files_scanned))
}

/// Run one full aggregation pass.
pub async fn aggregate_keywords(
    db: &DatabaseConnection,
    page_size: u64,
) -> Result<AggregationReport, DbErr> {
    let (counts, files_scanned) = scan_metadata(db, page_size).await?;

    let mut report = AggregationReport {
        files_scanned,
        owners: counts.len(),
        ..Default::default()
    };

    for (owner, owner_counts) in counts {
        let Some(user) = credentials::find_by_email(db, &owner).await? else {
            warn!(%owner, "No user record for metadata owner, skipping");
            report.owners_skipped += 1;
            continue;
        };

        let entries: Vec<(String, i64)> = owner_counts.into_iter().collect();
        let written = keywords::replace_counts(db, user.id, &entries).await?;
        info!(%owner, user_id = %user.id, keywords = written, "Keyword counts written");

        report.owners_written += 1;
        report.keywords_written += written;
    }

    Ok(report)
}
