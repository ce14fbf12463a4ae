//! parley CLI: a text front end for the turn loop.
//!
//! Reads one message per line from stdin (or a single `--message`), streams
//! the answer to stdout, and persists the transcript under
//! `CHAT_HISTORY_DIR`. `/reset` clears history and `/quit` exits.

use std::io::Write;

use clap::Parser;
use parley::{
    ParleyConfig, TurnCallbacks, build_chat_service, builtin_tools, user_message,
};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(
    name = "parley",
    about = "Streaming chat with transparent tool calling",
    version
)]
struct Cli {
    /// Send a single message instead of entering interactive mode
    #[arg(short, long)]
    message: Option<String>,

    /// Override LLM_SERVER (openai, ollama, grok, volcengine, gemini, m5stack)
    #[arg(long)]
    provider: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn write_stdout(text: &str) {
    let mut stdout = std::io::stdout().lock();
    if stdout.write_all(text.as_bytes()).and_then(|()| stdout.flush()).is_err() {
        tracing::debug!("stdout closed");
    }
}

fn streaming_callbacks() -> TurnCallbacks {
    TurnCallbacks::new(write_stdout, |_| write_stdout("\n")).with_tool_invocation(
        |name, result| {
            if result.is_none() {
                tracing::info!(tool = name, "calling tool");
            }
        },
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = match cli.provider.as_deref() {
        Some(provider) => ParleyConfig::from_env_with(&[("LLM_SERVER", provider)])?,
        None => ParleyConfig::from_env()?,
    };

    let service = build_chat_service(&config, builtin_tools())?;
    let callbacks = streaming_callbacks();

    if let Some(message) = cli.message {
        service.run_turn(vec![user_message(message)], &callbacks).await?;
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    write_stdout("> ");
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => {}
            "/quit" | "/exit" => break,
            "/reset" => {
                service.reset_history().await;
                write_stdout("history cleared\n");
            }
            text => {
                if let Err(error) = service.run_turn(vec![user_message(text)], &callbacks).await {
                    tracing::error!(error = %error, "turn failed");
                }
            }
        }
        write_stdout("> ");
    }

    Ok(())
}
