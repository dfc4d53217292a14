//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory DB, a temporary photo
//! directory, and a full [`AppContext`]. The [`TestHarness::with_server`]
//! constructor starts Axum on a random port for HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;

use kennel_core::config::Config;
use kennel_core::DogId;
use kennel_db::models::PhotoWithDog;
use kennel_db::pool::{init_memory_pool, DbPool};
use kennel_server::context::AppContext;
use kennel_server::router::build_router;
use tempfile::TempDir;

/// JPEG start-of-image marker followed by filler bytes.
pub const JPEG_BYTES: &[u8] = b"\xFF\xD8\xFF\xE0\x00\x10JFIF\x00fake-jpeg-body";
/// PNG signature followed by filler bytes.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-png-body";

/// Test harness wrapping a fully-constructed [`AppContext`] backed by an
/// in-memory database and a throwaway storage directory.
pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
    _storage: TempDir,
}

impl TestHarness {
    /// Create a new harness with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new harness with a custom configuration. The storage
    /// directory is always replaced with a temporary one.
    pub fn with_config(mut config: Config) -> Self {
        let storage = tempfile::tempdir().expect("failed to create storage dir");
        config.photos.storage_dir = storage.path().join("photos");

        let db = init_memory_pool().expect("failed to create in-memory pool");
        let ctx = AppContext::new(config, db.clone());

        Self {
            ctx,
            db,
            _storage: storage,
        }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::with_server_config(Config::default()).await
    }

    /// Start an Axum server with custom config on a random port.
    pub async fn with_server_config(config: Config) -> (Self, SocketAddr) {
        let harness = Self::with_config(config);
        let app = build_router(harness.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    /// Get a database connection from the pool.
    pub fn conn(&self) -> kennel_db::pool::PooledConnection {
        kennel_db::pool::get_conn(&self.db).expect("failed to get db connection")
    }

    /// Register a dog and return its ID.
    pub fn create_dog(&self, name: &str) -> DogId {
        kennel_db::queries::dogs::create_dog(&self.conn(), name)
            .expect("failed to create dog")
            .id
    }

    /// Every photo record currently stored.
    pub fn photos(&self) -> Vec<PhotoWithDog> {
        kennel_db::queries::photos::list_photos_with_dogs(&self.conn())
            .expect("failed to list photos")
    }

    pub fn storage_dir(&self) -> PathBuf {
        self.ctx.config.photos.storage_dir.clone()
    }

    /// Names of the files in the storage directory, sorted.
    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = match std::fs::read_dir(self.storage_dir()) {
            Ok(rd) => rd
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }
}

/// HTTP client that does not follow redirects, so 303 answers are visible.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("failed to build client")
}

/// A complete create submission for `dog_id` with the given image part.
pub fn photo_form(
    dog_id: DogId,
    file: Option<(&str, &str, &'static [u8])>,
) -> reqwest::multipart::Form {
    let form = reqwest::multipart::Form::new()
        .text("date_taken", "2024-05-18")
        .text("location", "Ponte de Lima")
        .text("dog_id", dog_id.to_string());
    match file {
        Some((name, mime, data)) => form.part("photo", image_part(name, mime, data)),
        None => form,
    }
}

pub fn image_part(name: &str, mime: &str, data: &'static [u8]) -> reqwest::multipart::Part {
    reqwest::multipart::Part::bytes(data)
        .file_name(name.to_string())
        .mime_str(mime)
        .expect("valid mime")
}

/// Create a photo through the API and return the stored record.
pub async fn upload_photo(addr: SocketAddr, h: &TestHarness, dog_id: DogId) -> PhotoWithDog {
    let before = h.photos().len();
    let resp = client()
        .post(format!("http://{addr}/api/photos/create"))
        .multipart(photo_form(dog_id, Some(("rex.jpg", "image/jpeg", JPEG_BYTES))))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 303);

    let photos = h.photos();
    assert_eq!(photos.len(), before + 1);
    photos.into_iter().last().unwrap()
}
