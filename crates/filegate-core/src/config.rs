//! Configuration module
//!
//! Settings are read once at startup from the process environment (optionally
//! seeded from a `.env` file) and then shared read-only through `AppState`.

use std::env;
use std::time::Duration;

// Common constants
const SERVER_PORT: u16 = 3000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_FILE_SIZE_MB: u64 = 100;
const ALLOWED_CONTENT_TYPES: &str = "application/pdf,audio/mpeg";
const URL_EXPIRY_SECS: u64 = 3600;
const S3_REGION: &str = "auto";
const IDENTITY_TIMEOUT_SECS: u64 = 10;
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Log output format for the tracing subscriber
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn from_env_value(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Raw settings backing [`Config`].
#[derive(Clone, Debug)]
pub struct FileGateConfig {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    // Upload intent policy
    pub max_file_size_bytes: u64,
    pub allowed_content_types: Vec<String>,
    pub upload_url_expiry_secs: u64,
    pub download_url_expiry_secs: u64,
    // Object storage (S3-compatible, e.g. R2)
    pub s3_endpoint: Option<String>,
    pub s3_bucket: String,
    pub s3_region: String,
    pub s3_access_key_id: String,
    pub s3_secret_access_key: String,
    // Identity provider
    pub identity_url: String,
    pub identity_service_key: String,
    pub identity_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub log_format: LogFormat,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<FileGateConfig>);

impl Config {
    fn inner(&self) -> &FileGateConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_env(&self.inner().environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = FileGateConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.inner().server_port
    }

    pub fn environment(&self) -> &str {
        &self.inner().environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().cors_origins
    }

    pub fn database_url(&self) -> &str {
        &self.inner().database_url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().db_timeout_seconds
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.inner().max_file_size_bytes
    }

    pub fn allowed_content_types(&self) -> &[String] {
        &self.inner().allowed_content_types
    }

    pub fn upload_url_expiry(&self) -> Duration {
        Duration::from_secs(self.inner().upload_url_expiry_secs)
    }

    pub fn download_url_expiry(&self) -> Duration {
        Duration::from_secs(self.inner().download_url_expiry_secs)
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn s3_bucket(&self) -> &str {
        &self.inner().s3_bucket
    }

    pub fn s3_region(&self) -> &str {
        &self.inner().s3_region
    }

    pub fn s3_access_key_id(&self) -> &str {
        &self.inner().s3_access_key_id
    }

    pub fn s3_secret_access_key(&self) -> &str {
        &self.inner().s3_secret_access_key
    }

    pub fn identity_url(&self) -> &str {
        &self.inner().identity_url
    }

    pub fn identity_service_key(&self) -> &str {
        &self.inner().identity_service_key
    }

    pub fn identity_timeout(&self) -> Duration {
        Duration::from_secs(self.inner().identity_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.inner().request_timeout_secs)
    }

    pub fn log_format(&self) -> LogFormat {
        self.inner().log_format
    }
}

fn is_production_env(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn mb_to_bytes(mb: u64) -> Result<u64, anyhow::Error> {
    mb.checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("MAX_FILE_SIZE_MB is too large: {}", mb))
}

fn required(name: &str) -> String {
    env::var(name).unwrap_or_default()
}

impl FileGateConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production_env(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
            .parse::<u64>()
            .unwrap_or(MAX_FILE_SIZE_MB);

        let allowed_content_types = parse_list(
            &env::var("ALLOWED_CONTENT_TYPES").unwrap_or_else(|_| ALLOWED_CONTENT_TYPES.to_string()),
        );

        let s3_endpoint = env::var("S3_ENDPOINT").ok().filter(|s| !s.trim().is_empty());

        Ok(FileGateConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .unwrap_or(SERVER_PORT),
            environment,
            cors_origins,
            database_url: required("DATABASE_URL"),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            max_file_size_bytes: mb_to_bytes(max_file_size_mb)?,
            allowed_content_types,
            upload_url_expiry_secs: env::var("UPLOAD_URL_EXPIRY_SECONDS")
                .unwrap_or_else(|_| URL_EXPIRY_SECS.to_string())
                .parse()
                .unwrap_or(URL_EXPIRY_SECS),
            download_url_expiry_secs: env::var("DOWNLOAD_URL_EXPIRY_SECONDS")
                .unwrap_or_else(|_| URL_EXPIRY_SECS.to_string())
                .parse()
                .unwrap_or(URL_EXPIRY_SECS),
            s3_endpoint,
            s3_bucket: required("S3_BUCKET"),
            s3_region: env::var("S3_REGION").unwrap_or_else(|_| S3_REGION.to_string()),
            s3_access_key_id: required("S3_ACCESS_KEY_ID"),
            s3_secret_access_key: required("S3_SECRET_ACCESS_KEY"),
            identity_url: required("IDENTITY_URL"),
            identity_service_key: required("IDENTITY_SERVICE_KEY"),
            identity_timeout_secs: env::var("IDENTITY_TIMEOUT_SECS")
                .unwrap_or_else(|_| IDENTITY_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(IDENTITY_TIMEOUT_SECS),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| REQUEST_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(REQUEST_TIMEOUT_SECS),
            log_format: LogFormat::from_env_value(
                &env::var("LOG_FORMAT").unwrap_or_else(|_| "compact".to_string()),
            ),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.database_url.starts_with("postgres://")
            && !self.database_url.starts_with("postgresql://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.s3_bucket.trim().is_empty() {
            return Err(anyhow::anyhow!("S3_BUCKET must be set"));
        }

        if self.s3_access_key_id.is_empty() || self.s3_secret_access_key.is_empty() {
            return Err(anyhow::anyhow!(
                "S3_ACCESS_KEY_ID and S3_SECRET_ACCESS_KEY must be set to sign storage URLs"
            ));
        }

        if self.identity_url.trim().is_empty() || self.identity_service_key.is_empty() {
            return Err(anyhow::anyhow!(
                "IDENTITY_URL and IDENTITY_SERVICE_KEY must be set"
            ));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }

        if self.allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!(
                "ALLOWED_CONTENT_TYPES must list at least one content type"
            ));
        }

        if self.upload_url_expiry_secs == 0 || self.download_url_expiry_secs == 0 {
            return Err(anyhow::anyhow!(
                "UPLOAD_URL_EXPIRY_SECONDS and DOWNLOAD_URL_EXPIRY_SECONDS must be greater than 0"
            ));
        }

        Ok(())
    }
}
