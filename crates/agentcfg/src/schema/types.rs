use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Concurrency runtime the host framework runs agent tasks on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionEngine {
    #[default]
    Asyncio,
    Temporal,
}

/// Destination for framework log events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSink {
    None,
    #[default]
    Console,
    File,
    Http,
}

/// Verbosity threshold for framework log events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

/// Logger section: sink selection plus batching/queue parameters consumed by
/// the host framework's log transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerSettings {
    #[serde(rename = "type")]
    pub sink: LogSink,
    pub level: LogLevel,
    pub batch_size: usize,
    /// Seconds between forced flushes of a partial batch.
    pub flush_interval: u64,
    pub max_queue_size: usize,
    pub http_endpoint: Option<String>,
    pub http_headers: Option<BTreeMap<String, String>>,
    /// Seconds before an HTTP sink request is abandoned.
    pub http_timeout: u64,
    pub progress_display: bool,
    /// Destination file for `type: file`.
    pub path: Option<String>,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            sink: LogSink::default(),
            level: LogLevel::default(),
            batch_size: 100,
            flush_interval: 2,
            max_queue_size: 2048,
            http_endpoint: None,
            http_headers: None,
            http_timeout: 5,
            progress_display: true,
            path: None,
        }
    }
}

/// One tool-provider process: launch command, arguments, and environment.
///
/// `env` values may carry `${VAR}` references; they are stored verbatim and
/// only substituted by the resolution stage (see `placeholders`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct McpServerSettings {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: Option<BTreeMap<String, String>>,
}

/// MCP server registry, keyed by server name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct McpSettings {
    pub servers: BTreeMap<String, McpServerSettings>,
}

/// OpenAI provider section. The API key normally arrives via the secrets
/// overlay rather than the config document itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpenAiSettings {
    pub default_model: String,
    pub api_key: Option<String>,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            default_model: "gpt-4o".to_string(),
            api_key: None,
        }
    }
}

/// Anthropic provider section; secrets-only in practice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnthropicSettings {
    pub api_key: Option<String>,
}

/// Root of the configuration document. Every section is defaultable, so an
/// empty document loads to the documented defaults; unknown keys and type
/// mismatches are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub execution_engine: ExecutionEngine,
    pub logger: LoggerSettings,
    pub mcp: McpSettings,
    pub openai: OpenAiSettings,
    pub anthropic: AnthropicSettings,
}

impl Settings {
    /// Parse a settings document. No I/O, no `${VAR}` substitution.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let value: serde_yaml::Value = serde_yaml::from_str(s).map_err(|source| {
            ConfigError::Yaml {
                context: "parse settings document".to_string(),
                source,
            }
        })?;
        settings_from_value(value, "parse settings document")
    }

    /// Re-serialize to YAML. Parsing the output yields an equal `Settings`.
    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|source| ConfigError::Yaml {
            context: "serialize settings document".to_string(),
            source,
        })
    }
}

/// Convert an already-parsed YAML document into typed settings. An empty
/// document (`null`) maps to the defaults.
pub(crate) fn settings_from_value(
    value: serde_yaml::Value,
    context: &str,
) -> Result<Settings, ConfigError> {
    if value.is_null() {
        return Ok(Settings::default());
    }
    serde_yaml::from_value(value).map_err(|source| ConfigError::Yaml {
        context: context.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_DOC: &str = r#"
execution_engine: asyncio
logger:
  type: http
  level: warning
  batch_size: 50
  flush_interval: 3
  max_queue_size: 512
  http_endpoint: https://logs.example.com/ingest
  http_headers:
    Authorization: Bearer ${LOG_TOKEN}
  http_timeout: 10
  progress_display: false
mcp:
  servers:
    fetch:
      command: uvx
      args: ["mcp-server-fetch"]
    filesystem:
      command: npx
      args: ["-y", "@modelcontextprotocol/server-filesystem"]
      env:
        FS_TOKEN: ${FS_TOKEN}
openai:
  default_model: gpt-4o
"#;

    #[test]
    fn empty_document_loads_defaults() {
        let s = Settings::from_yaml_str("").expect("parse ok");
        assert_eq!(s, Settings::default());
        assert_eq!(s.execution_engine, ExecutionEngine::Asyncio);
        assert_eq!(s.logger.sink, LogSink::Console);
        assert_eq!(s.logger.level, LogLevel::Info);
        assert_eq!(s.logger.batch_size, 100);
        assert_eq!(s.logger.flush_interval, 2);
        assert_eq!(s.logger.max_queue_size, 2048);
        assert_eq!(s.logger.http_timeout, 5);
        assert!(s.logger.progress_display);
        assert!(s.mcp.servers.is_empty());
        assert_eq!(s.openai.default_model, "gpt-4o");
    }

    #[test]
    fn full_document_parses() {
        let s = Settings::from_yaml_str(FULL_DOC).expect("parse ok");
        assert_eq!(s.logger.sink, LogSink::Http);
        assert_eq!(s.logger.level, LogLevel::Warning);
        assert_eq!(s.logger.batch_size, 50);
        assert!(!s.logger.progress_display);
        assert_eq!(s.mcp.servers.len(), 2);
        let fetch = s.mcp.servers.get("fetch").expect("fetch present");
        assert_eq!(fetch.command, "uvx");
        assert_eq!(fetch.args, vec!["mcp-server-fetch".to_string()]);
        assert!(fetch.env.is_none());
    }

    #[test]
    fn parse_serialize_parse_round_trips() {
        let first = Settings::from_yaml_str(FULL_DOC).expect("parse ok");
        let rendered = first.to_yaml_string().expect("serialize ok");
        let second = Settings::from_yaml_str(&rendered).expect("reparse ok");
        assert_eq!(first, second);
    }

    #[test]
    fn env_references_survive_parsing_verbatim() {
        let s = Settings::from_yaml_str(FULL_DOC).expect("parse ok");
        let fs = s.mcp.servers.get("filesystem").expect("filesystem present");
        let env = fs.env.as_ref().expect("env present");
        assert_eq!(env.get("FS_TOKEN").map(String::as_str), Some("${FS_TOKEN}"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Settings::from_yaml_str("looger:\n  level: info\n").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("looger"), "err={msg}");
    }

    #[test]
    fn type_mismatch_is_rejected() {
        let err = Settings::from_yaml_str("logger:\n  batch_size: plenty\n").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("parse settings document"), "err={msg}");
    }

    #[test]
    fn missing_command_is_rejected() {
        let doc = "mcp:\n  servers:\n    fetch:\n      args: [\"x\"]\n";
        let err = Settings::from_yaml_str(doc).unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("command"), "err={msg}");
    }

    #[test]
    fn enum_wire_values() {
        let s =
            Settings::from_yaml_str("execution_engine: temporal\nlogger:\n  type: none\n  level: error\n")
                .expect("parse ok");
        assert_eq!(s.execution_engine, ExecutionEngine::Temporal);
        assert_eq!(s.logger.sink, LogSink::None);
        assert_eq!(s.logger.level, LogLevel::Error);
    }
}
