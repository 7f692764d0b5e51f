use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while locating, parsing, validating, or resolving a
/// configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config not found: no {name} in {start} or any parent directory")]
    NotFound { name: &'static str, start: PathBuf },

    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config too large: {len} bytes (max {max}): {path}")]
    TooLarge { path: PathBuf, len: u64, max: u64 },

    #[error("{context}: {source}")]
    Yaml {
        context: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{0}")]
    Invalid(String),

    #[error("env[{key}]: {source}")]
    Placeholder {
        key: String,
        #[source]
        source: PlaceholderError,
    },
}

/// Errors from `${VAR}` reference handling.
///
/// `Unterminated` and `InvalidName` are structural and also surface during
/// validation; `Unresolved` can only occur at the resolution stage.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaceholderError {
    #[error("unterminated placeholder (missing `}}`)")]
    Unterminated,

    #[error("invalid placeholder name: {name}")]
    InvalidName { name: String },

    #[error("unresolved placeholder: ${{{name}}}")]
    Unresolved { name: String },
}
