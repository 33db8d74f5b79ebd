mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

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

    let default_paths = [
        "./vidport.toml",
        "./config.toml",
        "~/.config/vidport/config.toml",
        "/etc/vidport/config.toml",
    ];

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

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    let base = config.api.base_url.trim();
    if base.is_empty() {
        anyhow::bail!("api.base_url cannot be empty");
    }
    url::Url::parse(base).with_context(|| format!("api.base_url is not a valid URL: {}", base))?;
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        anyhow::bail!("api.base_url must use http or https: {}", base);
    }

    if config.api.timeout_secs == 0 {
        anyhow::bail!("api.timeout_secs cannot be 0");
    }

    if config.upload.chunk_size == 0 {
        anyhow::bail!("upload.chunk_size cannot be 0");
    }

    if config.playback.manifest_mime.trim().is_empty() {
        anyhow::bail!("playback.manifest_mime cannot be empty");
    }

    if config.playback.ready_timeout_secs == Some(0) {
        tracing::warn!("playback.ready_timeout_secs is 0; every attach will time out");
    }

    Ok(())
}
