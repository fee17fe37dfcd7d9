use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::error::StorageError;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Metadata returned alongside an object's content.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectInfo {
    /// Declared content type, if the backend knows one.
    pub content_type: Option<String>,
    /// Size in bytes.
    pub size: u64,
}

/// Key-addressed object storage.
///
/// Keys are `/`-separated relative paths. A key ending in `/` denotes an
/// empty folder placeholder.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store bytes under `key`, replacing any existing object.
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> Result<(), StorageError>;

    /// Retrieve an object as a streaming async reader.
    async fn get_stream(&self, key: &str) -> Result<(BoxReader, ObjectInfo), StorageError>;

    /// Retrieve all bytes of an object.
    async fn get(&self, key: &str) -> Result<(Vec<u8>, ObjectInfo), StorageError> {
        let (mut reader, info) = self.get_stream(key).await?;
        let mut buf = Vec::with_capacity(info.size as usize);
        reader.read_to_end(&mut buf).await?;
        Ok((buf, info))
    }

    /// Check whether an object (or folder placeholder) exists.
    async fn exists(&self, key: &str) -> Result<bool, StorageError>;

    /// Delete an object.
    ///
    /// Returns `true` if the object was deleted, `false` if it did not exist.
    async fn delete(&self, key: &str) -> Result<bool, StorageError>;
}

/// Rejects keys that are empty, absolute, or contain `.`/`..` segments.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let invalid = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.contains('\0')
        || key
            .trim_end_matches('/')
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if invalid {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
