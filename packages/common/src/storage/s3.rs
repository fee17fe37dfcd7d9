use std::io::Cursor;

use async_trait::async_trait;
use s3::Bucket;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::region::Region;

use super::error::StorageError;
use super::traits::{BoxReader, ObjectInfo, ObjectStore, validate_key};

/// Connection settings for an S3-compatible object service.
#[derive(Clone, Debug)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint (e.g. `https://storage.googleapis.com` or a MinIO URL).
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub path_style: bool,
}

/// Object store backed by an S3-compatible bucket.
pub struct S3ObjectStore {
    bucket: Box<Bucket>,
}

impl S3ObjectStore {
    pub fn new(settings: &S3Settings) -> Result<Self, StorageError> {
        let region = match &settings.endpoint {
            Some(endpoint) => Region::Custom {
                region: settings.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => settings.region.parse().map_err(backend_error)?,
        };

        let credentials = match (&settings.access_key, &settings.secret_key) {
            (Some(access), Some(secret)) => {
                Credentials::new(Some(access), Some(secret), None, None, None)
            }
            _ => Credentials::default(),
        }
        .map_err(|e| StorageError::Backend {
            status: None,
            message: format!("invalid credentials: {e}"),
        })?;

        let mut bucket = Bucket::new(&settings.bucket, region, credentials).map_err(backend_error)?;
        if settings.path_style {
            bucket = bucket.with_path_style();
        }

        Ok(Self { bucket })
    }
}

fn backend_error(err: impl std::fmt::Display) -> StorageError {
    StorageError::Backend {
        status: None,
        message: err.to_string(),
    }
}

fn check_status(key: &str, status: u16, body: &[u8]) -> Result<(), StorageError> {
    match status {
        200..=299 => Ok(()),
        404 => Err(StorageError::NotFound(key.to_string())),
        _ => Err(StorageError::Backend {
            status: Some(status),
            message: String::from_utf8_lossy(body).into_owned(),
        }),
    }
}

impl From<S3Error> for StorageError {
    fn from(err: S3Error) -> Self {
        match err {
            S3Error::HttpFailWithBody(status, body) => StorageError::Backend {
                status: Some(status),
                message: body,
            },
            other => backend_error(other),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let response = self
            .bucket
            .put_object_with_content_type(key, data, content_type)
            .await?;
        check_status(key, response.status_code(), response.as_slice())
    }

    async fn get_stream(&self, key: &str) -> Result<(BoxReader, ObjectInfo), StorageError> {
        validate_key(key)?;
        if key.ends_with('/') {
            return Err(StorageError::NotFound(key.to_string()));
        }

        let response = self.bucket.get_object(key).await?;
        check_status(key, response.status_code(), response.as_slice())?;

        let content_type = response
            .headers()
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .map(|(_, value)| value.clone());
        let data = response.as_slice().to_vec();
        let info = ObjectInfo {
            content_type,
            size: data.len() as u64,
        };

        Ok((Box::new(Cursor::new(data)), info))
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        validate_key(key)?;
        let (_, status) = self.bucket.head_object(key).await?;
        match status {
            200..=299 => Ok(true),
            404 => Ok(false),
            _ => Err(StorageError::Backend {
                status: Some(status),
                message: format!("HEAD {key} failed"),
            }),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        if !self.exists(key).await? {
            return Ok(false);
        }
        let response = self.bucket.delete_object(key).await?;
        check_status(key, response.status_code(), response.as_slice())?;
        Ok(true)
    }
}
