//! End-to-end tests for the Recicla Contigo client.
//!
//! Each test runs the real client stack (HTTP client, file-backed storage,
//! workflow) against an `httpmock` server standing in for both the backend
//! and the reverse geocoder.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p recicla-integration-tests
//! ```

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::path::PathBuf;
use std::sync::Arc;

use httpmock::MockServer;
use recicla_client::notice::NoticeLog;
use recicla_client::{ApiClient, FileStore, SessionStore};
use recicla_core::Coordinates;
use serde_json::{Value, json};
use tempfile::TempDir;
use url::Url;

/// A spot in Pachacútec, Ventanilla.
pub const PACHACUTEC: Coordinates = Coordinates::new(-11.87, -77.13);

pub struct TestContext {
    pub server: MockServer,
    pub dir: TempDir,
    pub api: ApiClient,
    pub storage: Arc<FileStore>,
    pub session: SessionStore,
    pub notices: Arc<NoticeLog>,
}

impl TestContext {
    pub async fn new() -> Self {
        let server = MockServer::start_async().await;
        let dir = tempfile::tempdir().expect("Failed to create data dir");
        let storage = Arc::new(
            FileStore::open(dir.path().join("data"))
                .await
                .expect("Failed to open store"),
        );
        let session = SessionStore::load(storage.clone())
            .await
            .expect("Failed to load session");
        let api = ApiClient::new(Self::url(&server), None).expect("Failed to build client");
        Self {
            server,
            dir,
            api,
            storage,
            session,
            notices: Arc::new(NoticeLog::new()),
        }
    }

    pub fn url(server: &MockServer) -> Url {
        Url::parse(&server.base_url()).expect("Mock server URL")
    }

    /// Open the same data directory again, as a fresh process would.
    pub async fn reopen(&self) -> (Arc<FileStore>, SessionStore) {
        let storage = Arc::new(
            FileStore::open(self.dir.path().join("data"))
                .await
                .expect("Failed to reopen store"),
        );
        let session = SessionStore::load(storage.clone())
            .await
            .expect("Failed to reload session");
        (storage, session)
    }

    /// Write a solid PNG of the given size and return its path.
    pub fn photo_file(&self, width: u32, height: u32) -> PathBuf {
        let path = self.dir.path().join(format!("photo-{width}x{height}.png"));
        image::RgbImage::from_pixel(width, height, image::Rgb([34, 139, 34]))
            .save(&path)
            .expect("Failed to write photo");
        path
    }
}

/// A user as the backend serialises it.
pub fn user_json(points: u32) -> Value {
    json!({
        "id": "u1",
        "nombre": "Ana Torres",
        "email": "ana@mail.pe",
        "puntos": points,
        "reportes_enviados": 0,
        "logros": []
    })
}

/// Registration and login response body.
pub fn auth_json(token: &str, points: u32) -> Value {
    json!({
        "message": "Login exitoso",
        "token": token,
        "user_id": "u1",
        "usuario": user_json(points)
    })
}
