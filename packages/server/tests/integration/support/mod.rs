use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use common::Category;
use common::metadata::{self, NewMetadata};
use common::storage::filesystem::FilesystemObjectStore;
use reqwest::Client;
use reqwest::header::HeaderMap;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::Value;
use tempfile::TempDir;

use server::config::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, S3Config, SearchConfig, ServerConfig,
    StorageBackend, StorageConfig, UploadConfig,
};
use server::identity::{ExternalIdentity, IdentityError, IdentityVerifier};
use server::state::AppState;

pub const BUCKET: &str = "test-bucket";
pub const PUBLIC_BASE: &str = "https://storage.test";
pub const JWT_SECRET: &str = "test-secret-for-integration-tests";
pub const INDEX_HTML: &str = "<!doctype html><title>app</title>";

pub mod routes {
    pub const GOOGLE_LOGIN: &str = "/auth/google_login";
    pub const EMAIL_LOGIN: &str = "/auth/email_login";
    pub const EMAIL_SIGNUP: &str = "/auth/email_signup";
    pub const UPLOAD: &str = "/upload_files";
    pub const FREQUENT_KEYWORDS: &str = "/frequent_keywords";
    pub const DOWNLOAD_SINGLE: &str = "/download_single_file";
    pub const DOWNLOAD_SELECTED: &str = "/download_selected_files";
    pub const DELETE: &str = "/delete_file";

    pub fn search(query: &str) -> String {
        format!("/search_files?searchQuery={query}")
    }
}

/// Identity provider stand-in: each known token maps to a fixed identity.
#[derive(Default)]
pub struct StaticIdentityVerifier {
    identities: HashMap<String, ExternalIdentity>,
}

impl StaticIdentityVerifier {
    pub fn with(mut self, token: &str, identity: ExternalIdentity) -> Self {
        self.identities.insert(token.to_string(), identity);
        self
    }
}

#[async_trait]
impl IdentityVerifier for StaticIdentityVerifier {
    async fn verify(&self, token: &str) -> Result<ExternalIdentity, IdentityError> {
        self.identities
            .get(token)
            .cloned()
            .ok_or_else(|| IdentityError::Rejected("unknown test token".into()))
    }
}

pub fn google_identity(subject: &str, email: &str) -> ExternalIdentity {
    ExternalIdentity {
        subject: subject.to_string(),
        email: email.to_string(),
        name: Some("Google User".to_string()),
        picture: Some(format!("https://pictures.test/{subject}.png")),
    }
}

/// A running test server.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    pub objects: Arc<FilesystemObjectStore>,
    pub objects_root: PathBuf,
    _tmp: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    pub headers: HeaderMap,
    /// Raw response body.
    pub bytes: Vec<u8>,
    /// Response body as (lossy) text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_identities(StaticIdentityVerifier::default()).await
    }

    pub async fn spawn_with_identities(identity: StaticIdentityVerifier) -> Self {
        let tmp = tempfile::tempdir().expect("Failed to create temp dir");

        let static_dir = tmp.path().join("frontend");
        std::fs::create_dir_all(static_dir.join("static")).expect("Failed to create static dir");
        std::fs::write(static_dir.join("index.html"), INDEX_HTML).expect("write index.html");
        std::fs::write(static_dir.join("static/app.js"), "console.log(1);").expect("write app.js");

        let objects_root = tmp.path().join("objects");
        let objects = Arc::new(
            FilesystemObjectStore::new(objects_root.clone())
                .await
                .expect("Failed to create object store"),
        );

        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opts)
            .await
            .expect("Failed to connect to test database");
        common::database::sync_schema(&db)
            .await
            .expect("Failed to sync schema");

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                static_dir,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
            },
            auth: AuthConfig {
                jwt_secret: JWT_SECRET.to_string(),
                token_ttl_hours: 24,
                google_client_id: "test-client".to_string(),
            },
            storage: StorageConfig {
                backend: StorageBackend::Filesystem,
                bucket: BUCKET.to_string(),
                public_url_base: PUBLIC_BASE.to_string(),
                root: objects_root.clone(),
                s3: S3Config::default(),
            },
            upload: UploadConfig {
                max_body_bytes: 16 * 1024 * 1024,
                max_name_probes: 5,
            },
            search: SearchConfig {
                frequent_keywords_limit: 12,
            },
        };

        let state = AppState {
            db: db.clone(),
            config: Arc::new(app_config),
            objects: objects.clone(),
            identity: Arc::new(identity),
        };

        let app = server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            objects,
            objects_root,
            _tmp: tmp,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn delete_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    /// Upload `(file name, MIME type, bytes)` triples as repeated `file` parts.
    pub async fn upload_with_token(
        &self,
        files: &[(&str, &str, &[u8])],
        token: &str,
    ) -> TestResponse {
        let mut form = reqwest::multipart::Form::new().percent_encode_noop();
        for (name, mime, bytes) in files {
            let part = reqwest::multipart::Part::bytes(bytes.to_vec())
                .file_name(name.to_string())
                .mime_str(mime)
                .expect("Failed to set MIME type");
            form = form.part("file", part);
        }
        self.upload_form_with_token(form, token).await
    }

    pub async fn upload_form_with_token(
        &self,
        form: reqwest::multipart::Form,
        token: &str,
    ) -> TestResponse {
        let res = self
            .client
            .post(self.url(routes::UPLOAD))
            .header("Authorization", format!("Bearer {token}"))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart upload request");

        TestResponse::from_response(res).await
    }

    /// Sign up with email and password, returning the access token.
    pub async fn create_authenticated_user(&self, email: &str, password: &str) -> String {
        let res = self
            .post_without_token(
                routes::EMAIL_SIGNUP,
                &serde_json::json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(res.status, 201, "Signup failed: {}", res.text);
        res.token()
    }

    /// Public URL of an object key in the test bucket.
    pub fn public_url(&self, key: &str) -> String {
        format!("{PUBLIC_BASE}/{BUCKET}/{key}")
    }

    /// Store an object and index it the way the ingestion pipeline would.
    pub async fn ingest(
        &self,
        owner: &str,
        category: Category,
        file_name: &str,
        keywords: &[&str],
    ) -> String {
        let key = format!("{owner}/{}/{file_name}", category.as_str());
        common::storage::ObjectStore::put(
            self.objects.as_ref(),
            &key,
            file_name.as_bytes(),
            "application/octet-stream",
        )
        .await
        .expect("Failed to store object");

        let id = uuid::Uuid::new_v4().to_string();
        metadata::insert_record(
            &self.db,
            NewMetadata {
                id: id.clone(),
                category,
                owner_email: owner.to_string(),
                original_file_name: file_name.to_string(),
                gcs_path: format!("gs://{BUCKET}/{key}"),
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
            },
        )
        .await
        .expect("Failed to insert metadata");
        id
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let headers = res.headers().clone();
        let bytes = res.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        Self {
            status,
            headers,
            bytes,
            text,
            body,
        }
    }

    pub fn token(&self) -> String {
        self.body["access_token"]
            .as_str()
            .expect("response body should contain 'access_token'")
            .to_string()
    }

    pub fn code(&self) -> &str {
        self.body["code"].as_str().unwrap_or_default()
    }

    pub fn header(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }
}
