//! Test helpers: build AppState and router for integration tests.
//!
//! The registry is the in-memory `RecordStore`; the signer, object storage
//! and identity provider are recording fakes, so no external service is needed.

pub mod auth;
pub mod fakes;

use axum_test::TestServer;
use filegate_api::constants;
use filegate_api::setup::routes;
use filegate_api::state::AppState;
use filegate_core::{Config, LogFormat};
use filegate_core::config::FileGateConfig;
use filegate_db::MemoryRecordStore;
use std::sync::Arc;

use fakes::{RecordingSigner, RecordingStorage, StaticIdentityResolver};

/// Largest upload the test config accepts.
pub const TEST_MAX_FILE_SIZE_BYTES: u64 = 100 * 1024 * 1024;

/// API path prefix for tests (e.g. `/api`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

pub fn test_config() -> Config {
    Config(Box::new(FileGateConfig {
        server_port: 0,
        environment: "test".to_string(),
        cors_origins: vec!["*".to_string()],
        database_url: "postgres://unused@localhost/filegate".to_string(),
        db_max_connections: 1,
        db_timeout_seconds: 1,
        max_file_size_bytes: TEST_MAX_FILE_SIZE_BYTES,
        allowed_content_types: vec!["application/pdf".to_string(), "audio/mpeg".to_string()],
        upload_url_expiry_secs: 3600,
        download_url_expiry_secs: 3600,
        s3_endpoint: Some("https://storage.test".to_string()),
        s3_bucket: "filegate-test".to_string(),
        s3_region: "auto".to_string(),
        s3_access_key_id: "test-access-key".to_string(),
        s3_secret_access_key: "test-secret-key".to_string(),
        identity_url: "https://identity.test".to_string(),
        identity_service_key: "test-service-key".to_string(),
        identity_timeout_secs: 1,
        request_timeout_secs: 30,
        log_format: LogFormat::Compact,
    }))
}

/// Test application: server plus handles on every fake behind it.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<MemoryRecordStore>,
    pub signer: Arc<RecordingSigner>,
    pub storage: Arc<RecordingStorage>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// Setup a test app with an empty registry and the two test tenants.
pub async fn setup_test_app() -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryRecordStore::new());
    let signer = Arc::new(RecordingSigner::new(config.s3_bucket()));
    let storage = Arc::new(RecordingStorage::default());
    let identity = Arc::new(StaticIdentityResolver::with_test_users());

    let state = Arc::new(AppState {
        config: config.clone(),
        files: store.clone(),
        signer: signer.clone(),
        storage: storage.clone(),
        identity,
    });

    let app = routes::setup_routes(&config, state).expect("Failed to build routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        store,
        signer,
        storage,
    }
}
