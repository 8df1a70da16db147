mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable overriding `database.path`.
pub const ENV_DATABASE: &str = "GALLERY_DATABASE";
/// Environment variable overriding `storage.endpoint`.
pub const ENV_ENDPOINT: &str = "AWS_ENDPOINT_URL";
/// Environment variable overriding `storage.bucket`.
pub const ENV_BUCKET: &str = "S3_BUCKET_NAME";
/// Environment variable overriding `storage.token`.
pub const ENV_TOKEN: &str = "STORAGE_TOKEN";

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = ["./gallery.toml", "~/.config/gallery/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Apply overrides from the process environment (including a loaded `.env`).
pub fn apply_env_overrides(config: &mut Config) {
    apply_overrides(config, |key| std::env::var(key).ok());
}

/// Apply overrides looked up through `lookup`. Empty values are ignored.
pub fn apply_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(path) = get(ENV_DATABASE) {
        config.database.path = PathBuf::from(path);
    }
    if let Some(endpoint) = get(ENV_ENDPOINT) {
        config.storage.endpoint = Some(endpoint);
    }
    if let Some(bucket) = get(ENV_BUCKET) {
        config.storage.bucket = Some(bucket);
    }
    if let Some(token) = get(ENV_TOKEN) {
        config.storage.token = Some(token);
    }
}

/// Database path with `~` expanded.
pub fn database_path(config: &Config) -> String {
    shellexpand::tilde(&config.database.path.to_string_lossy()).into_owned()
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.database.path.as_os_str().is_empty() {
        anyhow::bail!("Database path cannot be empty");
    }

    let dir_name = config.thumbnail.dir_name.trim();
    if dir_name.is_empty() {
        anyhow::bail!("Thumbnail directory name cannot be empty");
    }
    if dir_name.contains(['/', '\\']) {
        anyhow::bail!(
            "Thumbnail directory name must be a single path component: {}",
            dir_name
        );
    }

    if config.thumbnail.quality > 100 {
        tracing::warn!(
            "Thumbnail quality {} is above 100 and will be clamped",
            config.thumbnail.quality
        );
    }
    if config.thumbnail.effort > 9 {
        tracing::warn!(
            "Thumbnail effort {} is above 9 and will be clamped",
            config.thumbnail.effort
        );
    }

    if config.storage.timeout_secs == 0 {
        anyhow::bail!("Storage timeout cannot be 0");
    }

    Ok(())
}
