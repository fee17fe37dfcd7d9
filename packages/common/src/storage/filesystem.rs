use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::BufReader;

use super::error::StorageError;
use super::traits::{BoxReader, ObjectInfo, ObjectStore, validate_key};

const TMP_DIR: &str = ".tmp";
const META_DIR: &str = ".meta";

/// Filesystem-backed object store.
///
/// Object keys map directly onto relative paths below `base_path`, so a
/// namespace key such as `alice@example.com/images/cat.png` is stored at
/// `{base_path}/alice@example.com/images/cat.png`. Keys ending in `/` are
/// represented as directories.
///
/// The declared content type of each object is kept in a mirror tree under
/// `{base_path}/.meta`. Objects without one fall back to a guess from the
/// key's extension.
pub struct FilesystemObjectStore {
    base_path: PathBuf,
}

impl FilesystemObjectStore {
    /// Create a new filesystem object store.
    pub async fn new(base_path: PathBuf) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(TMP_DIR)).await?;
        fs::create_dir_all(base_path.join(META_DIR)).await?;
        Ok(Self { base_path })
    }

    fn object_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        let top = key.split('/').next().unwrap_or(key);
        if top == TMP_DIR || top == META_DIR {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.base_path.join(key.trim_end_matches('/')))
    }

    /// Sidecar holding the declared content type of `key`.
    fn meta_path(&self, key: &str) -> PathBuf {
        self.base_path.join(META_DIR).join(key)
    }

    async fn stored_content_type(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.meta_path(key)).await {
            Ok(content_type) => {
                let content_type = content_type.trim();
                Ok((!content_type.is_empty()).then(|| content_type.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(TMP_DIR)
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl ObjectStore for FilesystemObjectStore {
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> Result<(), StorageError> {
        let path = self.object_path(key)?;

        if key.ends_with('/') {
            fs::create_dir_all(&path).await?;
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let meta_path = self.meta_path(key);
        if let Some(parent) = meta_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = self.temp_path();
        let temp_meta = self.temp_path();
        let result = async {
            fs::write(&temp_path, data).await?;
            fs::write(&temp_meta, content_type.trim()).await?;
            fs::rename(&temp_meta, &meta_path).await?;
            fs::rename(&temp_path, &path).await
        }
        .await;

        if let Err(e) = result {
            let _ = fs::remove_file(&temp_path).await;
            let _ = fs::remove_file(&temp_meta).await;
            return Err(e.into());
        }

        Ok(())
    }

    async fn get_stream(&self, key: &str) -> Result<(BoxReader, ObjectInfo), StorageError> {
        let path = self.object_path(key)?;
        let meta = match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => meta,
            Ok(_) => return Err(StorageError::NotFound(key.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(key.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let file = fs::File::open(&path).await?;
        let content_type = match self.stored_content_type(key).await? {
            Some(content_type) => content_type,
            None => mime_guess::from_path(&path).first_or_octet_stream().to_string(),
        };
        let info = ObjectInfo {
            content_type: Some(content_type),
            size: meta.len(),
        };
        Ok((Box::new(BufReader::new(file)), info))
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.object_path(key)?;
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_dir() == key.ends_with('/')),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.object_path(key)?;
        let result = if key.ends_with('/') {
            fs::remove_dir(&path).await
        } else {
            match fs::remove_file(self.meta_path(key)).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
            fs::remove_file(&path).await
        };
        match result {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
