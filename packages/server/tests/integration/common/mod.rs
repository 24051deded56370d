use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use ::common::storage::filesystem::FilesystemImageStore;
use reqwest::Client;
use serde_json::Value;
use tempfile::TempDir;

use mercari_server::config::{
    AppConfig, CorsConfig, DatabaseConfig, RepositoryBackend, ServerConfig, StorageConfig,
};
use mercari_server::repository::{
    InMemoryItemRepository, Item, ItemRepository, NewItem, RepositoryError, RepositoryResult,
};
use mercari_server::state::AppState;

/// Bytes of the default image placed in every test image directory.
pub const DEFAULT_IMAGE_BYTES: &[u8] = b"DEFAULT_JPEG_BYTES";

pub mod routes {
    pub const HELLO: &str = "/hello";
    pub const ITEMS: &str = "/items";

    pub fn item(id: impl std::fmt::Display) -> String {
        format!("/items/{id}")
    }

    pub fn search(keyword: &str) -> String {
        format!("/items/search?keyword={keyword}")
    }

    pub fn image(filename: &str) -> String {
        format!("/images/{filename}")
    }
}

/// A running test server.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub items: Arc<dyn ItemRepository>,
    pub config: AppConfig,
    _dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

/// Binary response for image assertions.
pub struct BytesResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Repository whose every call fails as if the backing store were down.
pub struct BrokenRepository;

#[async_trait]
impl ItemRepository for BrokenRepository {
    async fn insert(&self, item: NewItem) -> RepositoryResult<Item> {
        item.validate()?;
        Err(RepositoryError::Storage("disk I/O error".into()))
    }

    async fn list(&self) -> RepositoryResult<Vec<Item>> {
        Err(RepositoryError::Storage("disk I/O error".into()))
    }

    async fn find_by_id(&self, _id: i64) -> RepositoryResult<Item> {
        Err(RepositoryError::Storage("disk I/O error".into()))
    }

    async fn search_by_name(&self, _keyword: &str) -> RepositoryResult<Vec<Item>> {
        Err(RepositoryError::Storage("disk I/O error".into()))
    }
}

fn test_config(dir: &Path, backend: RepositoryBackend) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors: CorsConfig {
                allow_origins: vec!["http://localhost:3000".to_string()],
                max_age: 3600,
            },
        },
        storage: StorageConfig {
            backend,
            items_file: dir.join("items.json"),
            database: DatabaseConfig {
                url: format!("sqlite://{}?mode=rwc", dir.join("mercari.sqlite3").display()),
            },
            images_dir: dir.join("images"),
            default_image: "default.jpg".to_string(),
            max_image_size: 1024 * 1024,
        },
    }
}

impl TestApp {
    /// Spawn against a fresh in-memory repository.
    pub async fn spawn() -> Self {
        Self::spawn_with_repository(Arc::new(InMemoryItemRepository::new())).await
    }

    pub async fn spawn_with_repository(items: Arc<dyn ItemRepository>) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = test_config(dir.path(), RepositoryBackend::Json);

        let images = FilesystemImageStore::new(
            config.storage.images_dir.clone(),
            config.storage.max_image_size,
        )
        .await
        .expect("Failed to create image store");

        let state = AppState {
            items,
            images: Arc::new(images),
            config,
        };
        let app = Self::serve(state, dir).await;
        app.write_default_image(DEFAULT_IMAGE_BYTES);
        app
    }

    /// Spawn with the repository selected by configuration, exactly as the
    /// binary does.
    pub async fn spawn_with_backend(backend: RepositoryBackend) -> Self {
        let app = Self::spawn_fresh(backend).await;
        app.write_default_image(DEFAULT_IMAGE_BYTES);
        app
    }

    /// Like [`spawn_with_backend`](Self::spawn_with_backend), but the image
    /// directory keeps whatever startup put there.
    pub async fn spawn_fresh(backend: RepositoryBackend) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = test_config(dir.path(), backend);
        let state = AppState::from_config(config)
            .await
            .expect("Failed to build app state");
        Self::serve(state, dir).await
    }

    async fn serve(state: AppState, dir: TempDir) -> Self {
        let items = state.items.clone();
        let config = state.config.clone();
        let app = mercari_server::build_router(state);

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
            items,
            config,
            _dir: dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn images_dir(&self) -> &PathBuf {
        &self.config.storage.images_dir
    }

    pub fn write_default_image(&self, bytes: &[u8]) {
        std::fs::write(
            self.images_dir().join(&self.config.storage.default_image),
            bytes,
        )
        .expect("Failed to write default image");
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_bytes(&self, path: &str) -> BytesResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        let status = res.status().as_u16();
        let content_type = res
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = res.bytes().await.expect("Failed to read body").to_vec();

        BytesResponse {
            status,
            content_type,
            bytes,
        }
    }

    /// `application/x-www-form-urlencoded` POST.
    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .form(fields)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    /// `multipart/form-data` POST with an optional `image` file part.
    pub async fn post_multipart(
        &self,
        path: &str,
        fields: &[(&str, &str)],
        image: Option<(&str, Vec<u8>)>,
    ) -> TestResponse {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in fields {
            form = form.text(name.to_string(), value.to_string());
        }
        if let Some((file_name, bytes)) = image {
            let part = reqwest::multipart::Part::bytes(bytes)
                .file_name(file_name.to_string())
                .mime_str("image/jpeg")
                .expect("Failed to set MIME type");
            form = form.part("image", part);
        }

        let res = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    /// Add an item through the API and return its stored record.
    pub async fn add_item(&self, name: &str, category: &str) -> Item {
        let res = self
            .post_form(routes::ITEMS, &[("name", name), ("category", category)])
            .await;
        assert_eq!(res.status, 200, "add_item failed: {}", res.text);

        self.items
            .list()
            .await
            .expect("Failed to list items")
            .into_iter()
            .rev()
            .find(|item| item.name == name)
            .expect("added item missing from repository")
    }

    /// Regular files (not directories) in the image directory.
    pub fn stored_image_files(&self) -> Vec<String> {
        std::fs::read_dir(self.images_dir())
            .expect("Failed to read image dir")
            .filter_map(|entry| {
                let entry = entry.ok()?;
                if !entry.file_type().ok()?.is_file() {
                    return None;
                }
                Some(entry.file_name().to_string_lossy().into_owned())
            })
            .collect()
    }
}

impl TestResponse {
    async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    /// Names in an `{"items": [...]}` body, in order.
    pub fn item_names(&self) -> Vec<String> {
        self.body["items"]
            .as_array()
            .unwrap_or_else(|| panic!("no items array in {}", self.text))
            .iter()
            .map(|item| item["name"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}
