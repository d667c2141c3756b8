// src/config/env.rs
// DOCUMENTATION: Environment variable management
// PURPOSE: Load and validate configuration from .env files

use dotenv::dotenv;
use std::env;

/// Application configuration loaded from environment variables
/// DOCUMENTATION: Centralizes all configuration in one struct
/// Load with Config::from_env() at application startup
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection string
    /// Format: sqlite://path/to/file.db (or sqlite::memory: for tests)
    pub database_url: String,

    /// Server bind address (e.g., "127.0.0.1")
    pub server_address: String,

    /// Server listen port (default 8080)
    pub server_port: u16,

    /// Environment: development, staging, production
    pub environment: String,

    /// Log level: debug, info, warn, error
    pub log_level: String,

    /// Public base URL recorded in photo addresses
    /// (e.g., "https://photos.example.org", no trailing slash)
    pub public_base_url: String,

    /// Root directory of the stored photo tree
    pub photos_dir: String,

    /// Target width for the compressed variants (pixels)
    pub target_width: u32,

    /// JPEG quality used for stored variants (1-100)
    pub jpeg_quality: u8,

    /// Byte cap the compressed variant is re-encoded down to
    pub max_compressed_bytes: u64,

    /// Total multipart upload limit in bytes
    pub max_upload_bytes: usize,

    /// Whether the review workflow endpoints are mounted
    pub review_workflow: bool,

    /// Maximum connections in database pool
    pub db_max_connections: u32,

    /// Connection timeout in seconds
    pub db_connection_timeout: u64,
}

impl Config {
    /// Load configuration from environment variables
    /// DOCUMENTATION: Reads from .env or process environment
    /// Called once at application startup
    pub fn from_env() -> Self {
        // Load .env file if it exists
        dotenv().ok();

        Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://photodesk.db".to_string()),

            server_address: env::var("SERVER_ADDRESS").unwrap_or_else(|_| "127.0.0.1".to_string()),

            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),

            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8080".to_string())
                .trim_end_matches('/')
                .to_string(),

            photos_dir: env::var("PHOTOS_DIR").unwrap_or_else(|_| "./photos".to_string()),

            target_width: env::var("TARGET_WIDTH")
                .unwrap_or_else(|_| "1920".to_string())
                .parse()
                .unwrap_or(1920),

            jpeg_quality: env::var("JPEG_QUALITY")
                .unwrap_or_else(|_| "90".to_string())
                .parse()
                .unwrap_or(90),

            max_compressed_bytes: env::var("MAX_COMPRESSED_BYTES")
                .unwrap_or_else(|_| "2000000".to_string())
                .parse()
                .unwrap_or(2_000_000),

            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| "52428800".to_string())
                .parse()
                .unwrap_or(52_428_800),

            review_workflow: env::var("REVIEW_WORKFLOW")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),

            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),

            db_connection_timeout: env::var("DB_CONNECTION_TIMEOUT")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
        }
    }

    /// Validate critical configuration
    /// DOCUMENTATION: Ensures application can start safely
    pub fn validate(&self) -> Result<(), String> {
        if self.database_url.is_empty() {
            return Err("DATABASE_URL is required".to_string());
        }

        if self.public_base_url.is_empty() {
            return Err("PUBLIC_BASE_URL is required".to_string());
        }

        if self.target_width == 0 {
            return Err("TARGET_WIDTH must be at least 1".to_string());
        }

        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err("JPEG_QUALITY must be between 1 and 100".to_string());
        }

        if !self.review_workflow {
            log::warn!("Review workflow disabled - only upload/getall/delete will be mounted");
        }

        Ok(())
    }
}
