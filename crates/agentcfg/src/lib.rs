//! Typed configuration for MCP agent frameworks.
//!
//! Loads `mcp_agent.config.yaml` (with an optional `mcp_agent.secrets.yaml`
//! overlay) into a validated [`Settings`] tree: execution engine selection,
//! logger parameters, the MCP server registry, and model defaults. `${VAR}`
//! references in server environments are kept verbatim through parsing and
//! substituted on demand by the `placeholders` stage.

pub mod error;
pub mod loader;
pub mod merge;
pub mod placeholders;
pub mod schema;

pub use error::{ConfigError, PlaceholderError};
pub use loader::{CONFIG_FILE_NAME, SECRETS_FILE_NAME, find_config, load_settings};
pub use schema::{
    AnthropicSettings, ExecutionEngine, LogLevel, LogSink, LoggerSettings, McpServerSettings,
    McpSettings, OpenAiSettings, Settings,
};
