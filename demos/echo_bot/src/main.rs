//! Echo Bot Example
//!
//! A console bot: each line on stdin is one Bot API update as JSON, and every
//! outbound `sendMessage` call is printed to stdout instead of being sent.
//!
//! # Usage
//!
//! ```bash
//! echo '{"update_id":1,"message":{"message_id":1,"from":{"id":7,"first_name":"Grace"},"chat":{"id":7,"type":"private"},"date":0,"text":"/echo hi"}}' \
//!     | cargo run --package echo-bot
//! ```

use std::any::Any;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use serde_json::{Value, json};
use tgcmd::core::{ApiError, ApiResult};
use tgcmd::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};

// ============================================================================
// Transport
// ============================================================================

/// Prints outbound messages instead of calling the Bot API.
#[derive(Default)]
struct ConsoleBot {
    next_message_id: AtomicI64,
}

#[async_trait]
impl Bot for ConsoleBot {
    fn id(&self) -> &str {
        "console"
    }

    async fn call_api(&self, method: &str, params: Value) -> ApiResult<Value> {
        if method != SendMessage::METHOD {
            return Err(ApiError::Other(format!("unsupported method: {method}")));
        }
        let request: SendMessage = serde_json::from_value(params)?;
        println!("[chat {}] {}", request.chat_id, request.text);

        let message_id = self.next_message_id.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(json!({ "message_id": message_id }))
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

// ============================================================================
// Commands
// ============================================================================

async fn echo(args: Args) -> Option<String> {
    (!args.is_empty()).then(|| args.rest())
}

async fn whoami(user: User, source: DispatchSource) -> String {
    let handle = user
        .username
        .as_deref()
        .map(|u| format!(" (@{u})"))
        .unwrap_or_default();
    format!(
        "{}{handle}, id {}, via {}",
        user.full_name(),
        user.id,
        source.kind()
    )
}

async fn add(args: Args) -> CommandResult<String> {
    let mut total: i64 = 0;
    for index in 0..args.len() {
        let n = args.parse::<i64>(index)?;
        total = total.checked_add(n).ok_or("sum overflows i64")?;
    }
    Ok(total.to_string())
}

async fn help(Sender(actor): Sender<Arc<TelegramActor>>) -> String {
    actor
        .command_handler()
        .engine()
        .commands()
        .iter()
        .map(|c| format!("/{} - {}", c.name(), c.about().unwrap_or("")))
        .collect::<Vec<_>>()
        .join("\n")
}

fn register_commands(handler: &TelegramHandler) {
    handler
        .command(
            ExecutableCommand::new("echo").description("Repeat the arguments"),
            echo,
        )
        .command(
            ExecutableCommand::new("whoami").description("Show who you are"),
            whoami,
        )
        .command(ExecutableCommand::new("add").description("Sum integers"), add)
        .command(ExecutableCommand::new("help").description("List commands"), help);
}

// ============================================================================
// Main
// ============================================================================

#[derive(Parser, Debug)]
#[command(about = "Feed Bot API updates on stdin to a tgcmd handler")]
struct Cli {
    /// Configuration file (defaults to ./tgcmd.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Configuration profile
    #[arg(short, long)]
    profile: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder = TgcmdRuntime::builder();
    if let Some(path) = &cli.config {
        builder = builder.config_file(path);
    }
    if let Some(profile) = &cli.profile {
        builder = builder.profile(profile);
    }
    let runtime = builder.build()?;
    runtime.init_logging()?;

    let handler = runtime.create_handler(Arc::new(ConsoleBot::default()));
    register_commands(&handler);

    info!("Reading updates from stdin, one JSON object per line");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match runtime.handle_update_json(&handler, &line).await {
            Ok(outcome) => debug!(?outcome, "Update processed"),
            Err(e) => warn!(error = %e, "Skipping update"),
        }
    }

    runtime.shutdown();
    Ok(())
}
