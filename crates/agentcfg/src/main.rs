use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use env_flags::env_flags;

use agentcfg::{Settings, load_settings};

fn init_tracing() {
    env_flags! {
        /// Tracing filter, e.g. "info", "debug", or targets format.
        RUST_LOG: &str = "info";
        /// JSON formatting for logs
        TRACING_JSON: bool = false;
        /// Compact single-line formatting for logs (ignored if TRACING_JSON=true)
        TRACING_COMPACT: bool = true;
        /// Pretty formatting for logs (ignored if TRACING_JSON=true)
        TRACING_PRETTY: bool = false;
    }

    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, prelude::*};

    let filter =
        EnvFilter::try_new((*RUST_LOG).to_string()).unwrap_or_else(|_| EnvFilter::new("info"));
    // Always write logs to stderr so stdout stays clean for command output.
    let base = tracing_subscriber::fmt::layer()
        .with_file(false)
        .with_line_number(false)
        .with_target(true)
        .with_ansi(true)
        .with_writer(std::io::stderr);
    let reg = tracing_subscriber::registry().with(filter);
    if *TRACING_JSON {
        let _ = reg.with(base.json()).try_init();
    } else if *TRACING_COMPACT {
        let _ = reg.with(base.compact()).try_init();
    } else if *TRACING_PRETTY {
        let _ = reg.with(base.pretty()).try_init();
    } else {
        let _ = reg.with(base).try_init();
    }
}

#[derive(Parser)]
#[command(name = "agentcfg")]
#[command(about = "Inspect and validate agent framework configuration")]
struct Cli {
    /// Start directory for config discovery (default: current directory).
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Override config path (absolute or relative to --dir).
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load the configuration and report whether it is valid.
    Validate {
        /// Also check that every ${VAR} reference resolves in this environment.
        #[arg(long, default_value_t = false)]
        resolve: bool,
    },
    /// Print the effective (secrets-merged) configuration.
    Show {
        /// JSON output (default: YAML).
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Print API keys instead of masking them.
        ///
        /// WARNING: Only use this where the output stays private.
        #[arg(long, default_value_t = false)]
        show_secrets: bool,
    },
    /// List configured MCP servers.
    Servers {
        /// Show full launch arguments.
        ///
        /// WARNING: This may leak secrets if you put tokens in args.
        #[arg(long, default_value_t = false)]
        show_args: bool,
    },
}

fn redact(settings: &mut Settings) {
    if settings.openai.api_key.is_some() {
        settings.openai.api_key = Some("<redacted>".to_string());
    }
    if settings.anthropic.api_key.is_some() {
        settings.anthropic.api_key = Some("<redacted>".to_string());
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    env_flags! {
        /// Explicit config path; overrides discovery when set (and --config is absent).
        MCP_AGENT_CONFIG: &str = "";
    }

    let cli = Cli::parse();
    let start_dir = match cli.dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("resolve current directory")?,
    };
    let override_path = cli.config.or_else(|| {
        if (*MCP_AGENT_CONFIG).is_empty() {
            None
        } else {
            Some(PathBuf::from((*MCP_AGENT_CONFIG).to_string()))
        }
    });

    let settings = load_settings(&start_dir, override_path).await?;

    match cli.command {
        Command::Validate { resolve } => {
            println!(
                "ok: engine={:?} logger={:?}/{:?} servers={}",
                settings.execution_engine,
                settings.logger.sink,
                settings.logger.level,
                settings.mcp.servers.len()
            );
            if resolve {
                let resolved = settings.resolve_placeholders()?;
                println!("ok: all ${{VAR}} references resolve ({} server(s))", resolved.len());
            }
        }
        Command::Show { json, show_secrets } => {
            let mut shown = settings;
            if !show_secrets {
                redact(&mut shown);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&shown)?);
            } else {
                print!("{}", shown.to_yaml_string()?);
            }
        }
        Command::Servers { show_args } => {
            if settings.mcp.servers.is_empty() {
                println!("no mcp servers configured");
            }
            for (name, server) in &settings.mcp.servers {
                let env_keys = server
                    .env
                    .as_ref()
                    .map(|env| env.keys().cloned().collect::<Vec<_>>().join(", "))
                    .unwrap_or_default();
                if show_args {
                    println!(
                        "{name}: command={} args=[{}] env=[{env_keys}]",
                        server.command,
                        server.args.join(", ")
                    );
                } else {
                    println!(
                        "{name}: command={} ({} arg(s)) env=[{env_keys}]",
                        server.command,
                        server.args.len()
                    );
                }
            }
        }
    }
    Ok(())
}
