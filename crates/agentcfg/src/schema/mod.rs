//! Typed model of the agent framework configuration document.

mod types;
mod validate;

pub use types::{
    AnthropicSettings, ExecutionEngine, LogLevel, LogSink, LoggerSettings, McpServerSettings,
    McpSettings, OpenAiSettings, Settings,
};

pub(crate) use types::settings_from_value;
