//! Validation rules applied after parsing (and after the secrets overlay).

use crate::error::ConfigError;
use crate::placeholders;

use super::{LogSink, LoggerSettings, McpServerSettings, Settings};

impl Settings {
    /// Check the whole document. Errors name the offending section or server.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logger.validate()?;
        for (name, server) in &self.mcp.servers {
            server.validate(name)?;
        }
        Ok(())
    }
}

impl LoggerSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid(
                "logger: batch_size must be >= 1".to_string(),
            ));
        }
        // The queue must hold at least one full batch.
        if self.max_queue_size < self.batch_size {
            return Err(ConfigError::Invalid(format!(
                "logger: max_queue_size ({}) must be >= batch_size ({})",
                self.max_queue_size, self.batch_size
            )));
        }
        match self.sink {
            LogSink::Http => {
                if self
                    .http_endpoint
                    .as_deref()
                    .is_none_or(|e| e.trim().is_empty())
                {
                    return Err(ConfigError::Invalid(
                        "logger: type=http requires http_endpoint".to_string(),
                    ));
                }
            }
            LogSink::File => {
                if self.path.as_deref().is_none_or(|p| p.trim().is_empty()) {
                    return Err(ConfigError::Invalid(
                        "logger: type=file requires path".to_string(),
                    ));
                }
            }
            LogSink::None | LogSink::Console => {}
        }
        Ok(())
    }
}

impl McpServerSettings {
    pub fn validate(&self, name: &str) -> Result<(), ConfigError> {
        if self.command.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "mcp server {name}: command must not be empty"
            )));
        }
        for (idx, arg) in self.args.iter().enumerate() {
            if arg.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "mcp server {name}: args[{idx}] must not be empty"
                )));
            }
        }
        if let Some(env) = self.env.as_ref() {
            for (key, value) in env {
                if key.trim().is_empty() {
                    return Err(ConfigError::Invalid(format!(
                        "mcp server {name}: env key must not be empty"
                    )));
                }
                // References that could never resolve are caught here rather
                // than at spawn time.
                if let Err(e) = placeholders::check(value) {
                    return Err(ConfigError::Invalid(format!(
                        "mcp server {name}: env[{key}]: {e}"
                    )));
                }
            }
        }
        Ok(())
    }
}
