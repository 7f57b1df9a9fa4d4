//! huginn: send one prompt through the gateway from a shell.
//!
//! Uses the same environment as an application embedding the library (`GROQ_API_KEY_*`,
//! `UPSTASH_REDIS_REST_*`, `HUGINN_*`), so it exercises the real cache and
//! key rotation.

use std::io::{self, IsTerminal, Read};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use serde_json::Value;
use tracing::error;

use huginn::extract::{extract_json_array, extract_json_object};
use huginn::{ChatRequest, Gateway, Huginn, Message, SMART_MODEL};

/// Huginn gateway CLI
#[derive(Parser)]
#[command(name = "huginn")]
#[command(version = huginn::PKG_VERSION)]
#[command(about = "Send a prompt through the caching, key-rotating LLM gateway")]
struct Args {
    /// User message (or omit to read from stdin)
    message: Option<String>,

    /// Model to use
    #[arg(short, long, env = "HUGINN_MODEL", default_value = SMART_MODEL)]
    model: String,

    /// Optional system prompt sent before the user message
    #[arg(short, long)]
    system: Option<String>,

    /// Cache TTL in seconds (0 disables caching)
    #[arg(long, default_value_t = 0)]
    ttl: u64,

    /// Sampling temperature
    #[arg(long, default_value_t = huginn::types::DEFAULT_TEMPERATURE)]
    temperature: f32,

    /// Maximum completion tokens
    #[arg(long, default_value_t = huginn::types::DEFAULT_MAX_TOKENS)]
    max_tokens: u32,

    /// Ignore any cached answer and store a fresh one
    #[arg(long)]
    refresh: bool,

    /// Recover JSON of this shape from the completion and pretty-print it
    #[arg(long, value_enum)]
    extract: Option<Shape>,

    /// Print the cache key for this request and exit without calling the service
    #[arg(long)]
    print_key: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Shape {
    Object,
    Array,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let message = match args.message {
        Some(m) => m,
        None => read_stdin()?,
    };

    let mut messages = Vec::new();
    if let Some(system) = args.system {
        messages.push(Message::system(system));
    }
    messages.push(Message::user(message));

    let request = ChatRequest::new(args.model, messages)
        .temperature(args.temperature)
        .max_tokens(args.max_tokens)
        .ttl(args.ttl)
        .refresh(args.refresh);

    let gateway = Huginn::from_env()?;

    if args.print_key {
        println!("{}", gateway.fingerprint_policy().cache_key(&request));
        return Ok(());
    }

    let text = gateway.invoke(&request).await.map_err(|e| {
        error!(error = %e, "generation failed");
        e.public_message()
    })?;

    match args.extract {
        None => println!("{text}"),
        Some(Shape::Object) => {
            let obj = extract_json_object(&text)?;
            println!("{}", serde_json::to_string_pretty(&Value::Object(obj))?);
        }
        Some(Shape::Array) => {
            let arr = extract_json_array(&text)?;
            println!("{}", serde_json::to_string_pretty(&Value::Array(arr))?);
        }
    }
    Ok(())
}

fn read_stdin() -> io::Result<String> {
    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "no message given and stdin is a terminal",
        ));
    }
    let mut buf = String::new();
    stdin.read_to_string(&mut buf)?;
    Ok(buf.trim().to_string())
}
