use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use wordcloud_core::{KeywordConfig, KeywordEntry, DEFAULT_MAX_FEATURES};
use wordcloud_local::{extract_main_text, LocalFetcher};
use wordcloud_server::config::{self, DEFAULT_BIND, DEFAULT_FETCH_TIMEOUT_MS, DEFAULT_MAX_BYTES};
use wordcloud_server::observability::{init_logging, LogConfig};
use wordcloud_server::{build_router, AppState, ServerConfig};

/// Exit status when the input has too little text to score.
const EXIT_INSUFFICIENT_TEXT: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "wordcloud")]
#[command(about = "Extract an article's main text and rank its keywords (HTTP API + CLI)", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API (`GET /health`, `POST /analyze`).
    Serve(ServeCmd),
    /// Fetch a URL, extract its main text and print ranked keywords.
    Analyze(AnalyzeCmd),
    /// Rank keywords of plain text read from a file or stdin.
    Keywords(KeywordsCmd),
    /// Print the main (paragraph) text of HTML read from a file or stdin.
    Extract(ExtractCmd),
    /// Print version info.
    Version(VersionCmd),
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Json,
    Text,
}

#[derive(clap::Args, Debug)]
struct FetchArgs {
    /// Per-request fetch timeout in milliseconds.
    #[arg(long, env = "WORDCLOUD_FETCH_TIMEOUT_MS", default_value_t = DEFAULT_FETCH_TIMEOUT_MS)]
    fetch_timeout_ms: u64,
    /// Hard cap on downloaded body bytes.
    #[arg(long, env = "WORDCLOUD_MAX_BYTES", default_value_t = DEFAULT_MAX_BYTES)]
    max_bytes: u64,
}

#[derive(clap::Args, Debug)]
struct ServeCmd {
    /// Address to listen on.
    #[arg(long, env = "WORDCLOUD_BIND", default_value = DEFAULT_BIND)]
    bind: SocketAddr,
    /// Maximum number of keywords per response.
    #[arg(long, env = "WORDCLOUD_MAX_FEATURES", default_value_t = DEFAULT_MAX_FEATURES)]
    max_features: usize,
    #[command(flatten)]
    fetch: FetchArgs,
}

#[derive(clap::Args, Debug)]
struct AnalyzeCmd {
    /// Article URL (http/https).
    #[arg(long)]
    url: String,
    /// Maximum number of keywords.
    #[arg(long, env = "WORDCLOUD_MAX_FEATURES", default_value_t = DEFAULT_MAX_FEATURES)]
    max_features: usize,
    #[command(flatten)]
    fetch: FetchArgs,
    /// Output format.
    #[arg(long = "output", alias = "format", value_enum, default_value_t = OutputFormat::Json)]
    output: OutputFormat,
}

#[derive(clap::Args, Debug)]
struct KeywordsCmd {
    /// Text file to score (default: stdin).
    #[arg(long)]
    file: Option<PathBuf>,
    /// Maximum number of keywords.
    #[arg(long, env = "WORDCLOUD_MAX_FEATURES", default_value_t = DEFAULT_MAX_FEATURES)]
    max_features: usize,
    /// Output format.
    #[arg(long = "output", alias = "format", value_enum, default_value_t = OutputFormat::Json)]
    output: OutputFormat,
}

#[derive(clap::Args, Debug)]
struct ExtractCmd {
    /// HTML file to read (default: stdin).
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct VersionCmd {
    /// Output format.
    #[arg(long = "output", alias = "format", value_enum, default_value_t = OutputFormat::Json)]
    output: OutputFormat,
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(p) => std::fs::read_to_string(p).with_context(|| format!("read {}", p.display())),
        None => {
            let mut s = String::new();
            std::io::stdin()
                .read_to_string(&mut s)
                .context("read stdin")?;
            Ok(s)
        }
    }
}

fn print_words(words: &[KeywordEntry]) {
    for w in words {
        println!("{:.4}\t{}", w.weight, w.term);
    }
}

async fn serve(args: ServeCmd) -> Result<()> {
    let cfg = ServerConfig {
        bind: args.bind,
        fetch_timeout_ms: args.fetch.fetch_timeout_ms,
        max_bytes: args.fetch.max_bytes,
        max_features: args.max_features,
    };
    let fetcher = LocalFetcher::with_timeout(Duration::from_millis(cfg.fetch_timeout_ms))?;
    let app = build_router(AppState::new(Arc::new(fetcher), cfg.clone()));

    let listener = tokio::net::TcpListener::bind(cfg.bind)
        .await
        .with_context(|| format!("bind {}", cfg.bind))?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await
        .context("server error")?;
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve(args) => serve(args).await?,
        Commands::Analyze(args) => {
            let fetcher =
                LocalFetcher::with_timeout(Duration::from_millis(args.fetch.fetch_timeout_ms))?;
            let cfg = ServerConfig {
                fetch_timeout_ms: args.fetch.fetch_timeout_ms,
                max_bytes: args.fetch.max_bytes,
                max_features: args.max_features,
                ..ServerConfig::default()
            };
            let a = wordcloud_local::analyze(&fetcher, &args.url, &cfg.analyze_config()).await?;
            match args.output {
                OutputFormat::Text => print_words(&a.words),
                OutputFormat::Json => {
                    let v = serde_json::json!({
                        "schema_version": 1,
                        "kind": "analyze",
                        "ok": true,
                        "url": a.url,
                        "final_url": a.final_url,
                        "truncated": a.truncated,
                        "text_chars": a.text_chars,
                        "words": a.words,
                    });
                    println!("{v}");
                }
            }
        }
        Commands::Keywords(args) => {
            let text = read_input(args.file.as_ref())?;
            let words = wordcloud_local::analyze_text(
                &text,
                &KeywordConfig {
                    max_features: args.max_features,
                },
            )?;
            match args.output {
                OutputFormat::Text => print_words(&words),
                OutputFormat::Json => {
                    let v = serde_json::json!({
                        "schema_version": 1,
                        "kind": "keywords",
                        "ok": true,
                        "words": words,
                    });
                    println!("{v}");
                }
            }
        }
        Commands::Extract(args) => {
            let html = read_input(args.file.as_ref())?;
            println!("{}", extract_main_text(&html));
        }
        Commands::Version(args) => {
            let v = serde_json::json!({
                "schema_version": 1,
                "kind": "version",
                "ok": true,
                "name": "wordcloud",
                "version": env!("CARGO_PKG_VERSION"),
            });
            match args.output {
                OutputFormat::Text => println!("wordcloud {}", env!("CARGO_PKG_VERSION")),
                OutputFormat::Json => println!("{v}"),
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Runs before clap so `env = "WORDCLOUD_*"` fallbacks can see file-provided values.
    config::load_env_file();
    init_logging(LogConfig::from_env())?;

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        if let Some(err) = e.downcast_ref::<wordcloud_core::Error>() {
            tracing::debug!(code = err.code(), "command failed");
            if matches!(err, wordcloud_core::Error::InsufficientText) {
                eprintln!("error: not enough text to analyze");
                std::process::exit(EXIT_INSUFFICIENT_TEXT);
            }
        }
        return Err(e);
    }
    Ok(())
}
