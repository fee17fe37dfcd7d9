use crate::config::StorageConfig;

/// Object key of a stored blob path.
///
/// Paths are either `{scheme}://{bucket}/{key}` (as written by the ingestion
/// pipeline) or bare keys. Returns `None` for a URI that names another bucket.
pub fn object_key_from_path<'a>(path: &'a str, bucket: &str) -> Option<&'a str> {
    let key = match path.split_once("://") {
        Some((_, rest)) => rest.strip_prefix(bucket)?.strip_prefix('/')?,
        None => path,
    };
    (!key.is_empty()).then_some(key)
}

/// Public retrieval URL for an object key.
pub fn public_url(storage: &StorageConfig, key: &str) -> String {
    format!("{}{}", storage.public_prefix(), key)
}

/// Object key addressed by a public URL, if the URL belongs to the configured bucket.
pub fn key_from_public_url<'a>(storage: &StorageConfig, url: &'a str) -> Option<&'a str> {
    url.trim()
        .strip_prefix(storage.public_prefix().as_str())
        .filter(|key| !key.is_empty())
}
