use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Enriched metadata for one stored file.
///
/// Rows are produced by the external ingestion pipeline; this service only
/// reads and deletes them.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "content_metadata")]
pub struct Model {
    /// Opaque document ID assigned by the ingestion pipeline.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// One of `images`, `videos`, `audios`, `others`.
    pub category: String,

    /// Owner's email.
    pub user_id: String,

    pub original_file_name: String,

    /// Location of the blob, e.g. `gs://{bucket}/{email}/images/cat.png`.
    pub gcs_path: String,

    /// Extracted keywords, stored as a JSON array of strings.
    #[sea_orm(column_type = "JsonBinary")]
    pub summary_content: serde_json::Value,

    pub created_at: DateTimeUtc,
}

impl Model {
    /// Keywords as strings, ignoring any non-string array members.
    pub fn keywords(&self) -> Vec<String> {
        match &self.summary_content {
            serde_json::Value::Array(items) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
