mod command;
mod render;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use pathway_core::model::SessionState;
use services::{Action, AiConfig, Clock, GeminiClient, InteractionHandler, TextCapability};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::command::{Command, HELP};

const DEFAULT_LOG_FILTER: &str = "pathway=info,services=info";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidTimeout { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidTimeout { raw } => write!(f, "invalid --timeout value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p pathway -- [--model <name>] [--timeout <secs>]");
    eprintln!();
    eprintln!("Environment (a .env file in the working directory is read too):");
    eprintln!("  GEMINI_API_KEY            required for AI features");
    eprintln!("  PATHWAY_AI_BASE_URL       default {}", services::ai::DEFAULT_BASE_URL);
    eprintln!("  PATHWAY_AI_MODEL          default {}", services::ai::DEFAULT_MODEL);
    eprintln!("  PATHWAY_AI_TIMEOUT_SECS   default 60");
    eprintln!("  RUST_LOG                  default {DEFAULT_LOG_FILTER}");
}

/// Command-line overrides applied on top of the environment config.
#[derive(Debug, Default)]
struct Args {
    model: Option<String>,
    timeout: Option<Duration>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--model" => parsed.model = Some(require_value(args, "--model")?),
                "--timeout" => {
                    let value = require_value(args, "--timeout")?;
                    let secs: u64 = value
                        .parse()
                        .ok()
                        .filter(|secs| *secs > 0)
                        .ok_or(ArgsError::InvalidTimeout { raw: value.clone() })?;
                    parsed.timeout = Some(Duration::from_secs(secs));
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(parsed)
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Build the capability from the environment, or a disabled one when the key is missing.
fn build_capability(args: &Args) -> Result<TextCapability, Box<dyn std::error::Error>> {
    let mut config = match AiConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(error = %err, "text generation disabled");
            eprintln!("warning: {err}; learning paths, questions and quizzes are disabled");
            return Ok(TextCapability::disabled());
        }
    };
    if let Some(model) = &args.model {
        config.model.clone_from(model);
    }
    if let Some(timeout) = args.timeout {
        config.timeout = timeout;
    }

    let client = GeminiClient::new(config)?;
    tracing::info!(model = client.model(), "text generation enabled");
    Ok(TextCapability::new(Arc::new(client)))
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; the process environment still applies.
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse(&mut std::env::args().skip(1)).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let handler = InteractionHandler::new(build_capability(&args)?, Clock::system());
    let mut state = SessionState::new();
    tracing::info!(ai_enabled = handler.ai_enabled(), "session started");

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let welcome = handler.handle(&mut state, Action::Refresh).await;
    stdout
        .write_all(format!("{}\n{HELP}\n", render::full(&welcome)).as_bytes())
        .await?;

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let output = match command::parse(&line, &state) {
            Ok(None) => continue,
            Ok(Some(Command::Quit)) => break,
            Ok(Some(Command::Help)) => format!("{HELP}\n"),
            Ok(Some(Command::Show)) => {
                render::full(&handler.handle(&mut state, Action::Refresh).await)
            }
            Ok(Some(Command::Answer(raw))) => {
                let answer = command::resolve_answer(&raw, &state);
                render::after_action(
                    &handler
                        .handle(&mut state, Action::SubmitAnswer { answer })
                        .await,
                )
            }
            Ok(Some(Command::Run(action))) => {
                render::after_action(&handler.handle(&mut state, action).await)
            }
            Err(err) => format!("[error] {err}\n"),
        };
        stdout.write_all(output.as_bytes()).await?;
    }

    tracing::info!("session ended");
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
