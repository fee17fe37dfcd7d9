use common::entity::{content_metadata, keyword_count};
use serde::{Deserialize, Serialize};

/// Generic `{success, message}` acknowledgement.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "File 'cat.png' deleted successfully.")]
    pub message: String,
}

/// Result of a multi-file upload.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "2 file(s) uploaded successfully.")]
    pub message: String,
    /// Final stored filenames, in upload order.
    #[schema(example = json!(["photo.jpg", "photo(1).jpg"]))]
    pub uploaded_files: Vec<String>,
}

/// Query parameters for file search.
#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Exact filename or keyword to look for. Trimmed and lowercased.
    #[serde(default, rename = "searchQuery")]
    #[param(example = "sunset")]
    pub search_query: Option<String>,
}

/// Enriched metadata as produced by the ingestion pipeline.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedMetadata {
    /// Owner's email.
    #[schema(example = "alice@example.com")]
    pub user_id: String,
    #[schema(example = "sunset.jpg")]
    pub original_file_name: String,
    /// Extracted keywords.
    #[schema(example = json!(["sunset", "beach"]))]
    pub summary_content: Vec<String>,
    #[schema(example = "gs://media-bucket/alice@example.com/images/sunset.jpg")]
    pub gcs_path: String,
}

/// A metadata record matching a search.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: String,
    #[schema(example = "images")]
    pub category: String,
    pub enriched_metadata: EnrichedMetadata,
    /// Public URL of the stored file, when its blob path belongs to the configured bucket.
    #[schema(example = "https://storage.googleapis.com/media-bucket/alice@example.com/images/sunset.jpg")]
    pub public_url: Option<String>,
}

impl SearchResult {
    pub fn new(model: content_metadata::Model, public_url: Option<String>) -> Self {
        let summary_content = model.keywords();
        Self {
            id: model.id,
            category: model.category,
            enriched_metadata: EnrichedMetadata {
                user_id: model.user_id,
                original_file_name: model.original_file_name,
                summary_content,
                gcs_path: model.gcs_path,
            },
            public_url,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SearchResponse {
    #[schema(example = true)]
    pub success: bool,
    pub results: Vec<SearchResult>,
    #[schema(example = 1)]
    pub count: usize,
}

/// One search suggestion.
#[derive(Serialize, utoipa::ToSchema)]
pub struct KeywordEntry {
    #[schema(example = "sunset")]
    pub name: String,
    #[schema(example = 7)]
    pub count: i64,
}

impl From<keyword_count::Model> for KeywordEntry {
    fn from(model: keyword_count::Model) -> Self {
        Self {
            name: model.keyword,
            count: model.count,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct FrequentKeywordsResponse {
    #[schema(example = true)]
    pub success: bool,
    pub keywords: Vec<KeywordEntry>,
}

#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DownloadSingleRequest {
    #[schema(example = "https://storage.googleapis.com/media-bucket/alice@example.com/images/sunset.jpg")]
    #[serde(default)]
    pub file_url: Option<String>,
    /// Filename the client wants the attachment saved as.
    #[schema(example = "sunset.jpg")]
    #[serde(default)]
    pub original_file_name: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DownloadSelectedRequest {
    #[serde(default)]
    pub file_urls: Vec<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct DeleteFileRequest {
    #[schema(example = "sunset.jpg")]
    #[serde(default)]
    pub filename: Option<String>,
}
