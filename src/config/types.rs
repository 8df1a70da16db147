use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub thumbnail: ThumbnailConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// SQLite file holding photos, collections and memberships
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("gallery.db")
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ThumbnailConfig {
    /// Target width in pixels (minimum 64)
    #[serde(default = "default_width")]
    pub width: u32,

    /// AVIF quality, 0-100
    #[serde(default = "default_quality")]
    pub quality: u8,

    /// Encoder effort, 0 (fastest) to 9 (slowest)
    #[serde(default = "default_effort")]
    pub effort: u8,

    /// Directory next to the sources that receives thumbnails
    #[serde(default = "default_dir_name")]
    pub dir_name: String,
}

fn default_width() -> u32 {
    1000
}
fn default_quality() -> u8 {
    75
}
fn default_effort() -> u8 {
    4
}
fn default_dir_name() -> String {
    "thumbnails".to_string()
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            quality: default_quality(),
            effort: default_effort(),
            dir_name: default_dir_name(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Base URL of the object endpoint (overridden by `AWS_ENDPOINT_URL`)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Bucket name (overridden by `S3_BUCKET_NAME`)
    #[serde(default)]
    pub bucket: Option<String>,

    /// Bearer token sent with uploads (overridden by `STORAGE_TOKEN`)
    #[serde(default)]
    pub token: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    60
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            bucket: None,
            token: None,
            timeout_secs: default_timeout(),
        }
    }
}
