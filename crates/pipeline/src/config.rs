//! Configuration for the pipeline and its adapters.
//!
//! # Security
//!
//! - Config file permission validation on Unix systems
//! - Rejects world-readable files containing an API token
//! - Warns about tokens stored in config files

use std::path::Path;

use serde::{Deserialize, Serialize};
use thoughts_llm::InferenceConfig;
use thoughts_store::StoreConfig;
use tracing::warn;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThoughtsConfig {
    /// Remote model endpoints and retry policy
    pub inference: InferenceConfig,

    /// Thresholds of the note processor
    pub processing: ProcessingConfig,

    /// Note storage backend
    pub store: StoreConfig,

    /// HTTP adapter
    pub server: ServerConfig,
}

/// Thresholds deciding when the remote model is consulted.
///
/// Lengths are counted in characters of the trimmed note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Notes up to this length are their own summary
    pub summary_threshold_chars: usize,

    /// Notes must be longer than this to be classified remotely
    pub category_min_chars: usize,

    /// Prefix length of the local fallback summary
    pub fallback_summary_chars: usize,

    pub summary_max_tokens: u32,

    pub category_max_tokens: u32,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            summary_threshold_chars: 50,
            category_min_chars: 10,
            fallback_summary_chars: 40,
            summary_max_tokens: 30,
            category_max_tokens: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 8080,
        }
    }
}

impl ThoughtsConfig {
    /// Load configuration from a TOML file.
    ///
    /// On Unix the file must be a regular file, must not be world-writable,
    /// and must not be world-readable if it carries an API token.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();

        #[cfg(unix)]
        validate_config_file_permissions(path)?;

        let config = Self::from_file_unchecked(path)?;

        if config.inference.api_token.is_some() {
            warn!(
                "API token found in config file '{}'. Prefer the HF_TOKEN environment variable.",
                path.display()
            );
        }

        Ok(config)
    }

    /// Load configuration from a TOML file without permission checks.
    pub fn from_file_unchecked(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

#[cfg(unix)]
fn validate_config_file_permissions(path: &Path) -> anyhow::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = std::fs::symlink_metadata(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e))?;

    if !metadata.is_file() {
        anyhow::bail!(
            "Config path '{}' is not a regular file. Symlinks and directories are not allowed.",
            path.display()
        );
    }

    let permission_bits = metadata.permissions().mode() & 0o777;

    if permission_bits & 0o002 != 0 {
        anyhow::bail!(
            "Config file '{}' is world-writable (mode {:04o}). Fix with: chmod o-w {}",
            path.display(),
            permission_bits,
            path.display()
        );
    }

    let content = std::fs::read_to_string(path)?;
    let has_token = content.contains("api_token");

    if has_token && permission_bits & 0o004 != 0 {
        anyhow::bail!(
            "Config file '{}' contains an API token but is world-readable (mode {:04o}). \
             Fix with: chmod 600 {}",
            path.display(),
            permission_bits,
            path.display()
        );
    }

    Ok(())
}
