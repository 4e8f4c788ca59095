//! llmscope CLI
//!
//! Command-line interface for the llmscope chart service.
//!
//! # Usage
//!
//! ```bash
//! llmscope --help
//! llmscope health
//! llmscope view summary --trace-id 7f3c...
//! llmscope view latency --user-id alice --format apex
//! llmscope info --watch 5
//! ```

#![deny(unsafe_code)]

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// llmscope CLI - LLM trace chart series from the command line
#[derive(Parser)]
#[command(name = "llmscope")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// API server URL
    #[arg(
        short,
        long,
        env = "LLMSCOPE_API_URL",
        default_value = "http://localhost:8080"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check API server health
    Health,

    /// Print one chart view of a trace
    View {
        /// View to render
        #[arg(value_enum)]
        view: View,

        #[command(flatten)]
        filter: FilterArgs,

        /// Output shape
        #[arg(long, value_enum, default_value_t = Format::Raw)]
        format: Format,
    },

    /// List recent traces with their name, user and session
    Info {
        #[command(flatten)]
        filter: FilterArgs,

        /// Poll every N seconds until interrupted
        #[arg(long, value_name = "SECS")]
        watch: Option<u64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum View {
    Latency,
    Time,
    Token,
    Call,
    Summary,
    SummaryLatency,
    SummaryToken,
}

impl View {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Latency => "latency",
            Self::Time => "time",
            Self::Token => "token",
            Self::Call => "call",
            Self::Summary => "summary",
            Self::SummaryLatency => "summary-latency",
            Self::SummaryToken => "summary-token",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Raw,
    Apex,
}

/// Trace selection filters.
#[derive(Debug, Default, Args, Serialize)]
#[serde(rename_all = "camelCase")]
struct FilterArgs {
    /// Exact trace id
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,

    /// Trace name
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    /// User id
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,

    /// Session id
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    session_id: Option<String>,
}

struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get(&self, path: &str, filter: Option<&FilterArgs>, format: Format) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "GET");

        let mut request = self.client.get(&url);
        if let Some(filter) = filter {
            request = request.query(filter);
        }
        if format == Format::Apex {
            request = request.query(&[("format", "apex")]);
        }

        let resp = request
            .send()
            .await
            .with_context(|| format!("Failed to reach {url}"))?;

        let status = resp.status();
        let body: Value = resp.json().await.context("Response was not JSON")?;

        if !status.is_success() {
            let message = body["message"].as_str().unwrap_or("request failed");
            anyhow::bail!("{status}: {message}");
        }

        Ok(body)
    }

    async fn health(&self) -> Result<Value> {
        self.get("/health", None, Format::Raw).await
    }

    async fn view(&self, view: View, filter: &FilterArgs, format: Format) -> Result<Value> {
        self.get(&format!("/langfuse/{}", view.as_str()), Some(filter), format)
            .await
    }

    async fn info(&self, filter: &FilterArgs) -> Result<Value> {
        self.get("/langfuse/info", Some(filter), Format::Raw).await
    }
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn watch_info(client: &ApiClient, filter: &FilterArgs, secs: u64) -> Result<()> {
    let mut interval = tokio::time::interval(Duration::from_secs(secs.max(1)));

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match client.info(filter).await {
                    Ok(info) => print_json(&info)?,
                    Err(e) => tracing::warn!(error = %e, "Polling info failed"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                return Ok(());
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let client = ApiClient::new(&cli.api_url)?;

    match cli.command {
        Some(Commands::Health) => {
            let health = client.health().await?;
            print_json(&health)?;
        }
        Some(Commands::View {
            view,
            filter,
            format,
        }) => {
            let payload = client.view(view, &filter, format).await?;
            print_json(&payload)?;
        }
        Some(Commands::Info {
            filter,
            watch: Some(secs),
        }) => watch_info(&client, &filter, secs).await?,
        Some(Commands::Info {
            filter,
            watch: None,
        }) => {
            let info = client.info(&filter).await?;
            print_json(&info)?;
        }
        None => {
            println!("llmscope CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for usage information");
        }
    }

    Ok(())
}
