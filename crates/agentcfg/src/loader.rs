//! Configuration loading: discovery, secrets overlay, typed parse.
//!
//! Responsibilities:
//! - Find `mcp_agent.config.yaml` by walking upward from a start directory
//!   (or use an explicit override path).
//! - Deep-merge a sibling `mcp_agent.secrets.yaml` over the config document;
//!   the secrets side wins key-by-key.
//! - Parse into typed [`Settings`] and validate. `${VAR}` references pass
//!   through untouched; see `placeholders` for the resolution stage.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::merge::merge_yaml;
use crate::schema::Settings;
use crate::schema::settings_from_value;

pub const CONFIG_FILE_NAME: &str = "mcp_agent.config.yaml";
pub const SECRETS_FILE_NAME: &str = "mcp_agent.secrets.yaml";

pub(crate) const MAX_CONFIG_BYTES: u64 = 4 * 1024 * 1024;

/// Walk from `start_dir` upward and return the first directory containing
/// [`CONFIG_FILE_NAME`], as the full config path.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    let mut dir = Some(start_dir);
    while let Some(d) = dir {
        let candidate = d.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = d.parent();
    }
    None
}

/// Load, overlay, parse, and validate settings.
///
/// With `override_path` the file is read directly (missing file is an error);
/// otherwise discovery walks upward from `start_dir`. Either way, a
/// [`SECRETS_FILE_NAME`] sibling of the chosen config is merged over it
/// before parsing.
pub async fn load_settings(
    start_dir: &Path,
    override_path: Option<PathBuf>,
) -> Result<Settings, ConfigError> {
    let config_path = match override_path {
        Some(path) => {
            if path.is_absolute() {
                path
            } else {
                start_dir.join(path)
            }
        }
        None => find_config(start_dir).ok_or_else(|| ConfigError::NotFound {
            name: CONFIG_FILE_NAME,
            start: start_dir.to_path_buf(),
        })?,
    };
    tracing::debug!("loading config from {}", config_path.display());

    let base = read_yaml(&config_path).await?;

    let secrets_path = config_path
        .parent()
        .map(|dir| dir.join(SECRETS_FILE_NAME))
        .filter(|p| p.is_file());
    let merged = match secrets_path {
        Some(secrets_path) => {
            tracing::debug!("merging secrets from {}", secrets_path.display());
            let secrets = read_yaml(&secrets_path).await?;
            if secrets.is_null() {
                // Empty secrets file is a no-op rather than a wipe.
                base
            } else {
                merge_yaml(base, secrets)
            }
        }
        None => base,
    };

    let settings = settings_from_value(merged, &format!("parse {}", config_path.display()))?;
    settings.validate()?;
    tracing::info!(
        "loaded settings from {} ({} mcp server(s))",
        config_path.display(),
        settings.mcp.servers.len()
    );
    Ok(settings)
}

async fn read_yaml(path: &Path) -> Result<serde_yaml::Value, ConfigError> {
    let meta = tokio::fs::metadata(path)
        .await
        .map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    if meta.len() > MAX_CONFIG_BYTES {
        return Err(ConfigError::TooLarge {
            path: path.to_path_buf(),
            len: meta.len(),
            max: MAX_CONFIG_BYTES,
        });
    }
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Yaml {
        context: format!("parse {}", path.display()),
        source,
    })
}
