use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use minirag_vector_store::{
    normalize_host, AnyEmbedder, EmbeddingMode, RagConfig, VectorStore, DEFAULT_TOP_N,
};
use report::QueryReport;
use std::path::PathBuf;

mod chunks;
mod report;

#[derive(Parser)]
#[command(name = "minirag")]
#[command(about = "In-memory retrieval for RAG experiments", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Override embedding backend in this process
    #[arg(long, global = true, value_enum)]
    embed_mode: Option<EmbedMode>,

    /// Override embedding model id (EMBEDDING_MODEL)
    #[arg(long, global = true)]
    embedding_model: Option<String>,

    /// Override generation model id (LANGUAGE_MODEL)
    #[arg(long, global = true)]
    language_model: Option<String>,

    /// Embedding service base URL (OLLAMA_HOST)
    #[arg(long, global = true)]
    ollama_host: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Embed chunks into a fresh store and retrieve the best matches for a query
    Query(QueryArgs),

    /// Show the resolved configuration
    Config(ConfigArgs),
}

#[derive(Args)]
struct QueryArgs {
    /// Query text
    query: String,

    /// File with one chunk per line (repeatable)
    #[arg(long = "chunks-file")]
    chunks_files: Vec<PathBuf>,

    /// Inline chunk, added after file chunks (repeatable)
    #[arg(long = "chunk")]
    chunks: Vec<String>,

    /// Number of results to return
    #[arg(long, default_value_t = DEFAULT_TOP_N, value_parser = parse_top_n)]
    top_n: usize,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ConfigArgs {
    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Copy, Clone, ValueEnum)]
enum EmbedMode {
    Ollama,
    Stub,
}

impl EmbedMode {
    const fn as_domain(self) -> EmbeddingMode {
        match self {
            EmbedMode::Ollama => EmbeddingMode::Ollama,
            EmbedMode::Stub => EmbeddingMode::Stub,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();

    let dotenv = dotenvy::dotenv();

    let json_output = match &cli.command {
        Commands::Query(args) => args.json,
        Commands::Config(args) => args.json,
    };
    if json_output {
        cli.quiet = true;
    }
    init_logging(cli.verbose, cli.quiet);

    match dotenv {
        Ok(path) => log::debug!("Loaded environment from {}", path.display()),
        Err(err) if err.not_found() => {}
        Err(err) => return Err(err).context("Failed to load .env file"),
    }

    let config = resolve_config(&cli)?;
    log::debug!("Resolved configuration: {config:?}");

    match cli.command {
        Commands::Query(args) => run_query(args, &config, cli.quiet).await?,
        Commands::Config(args) => report::print_config(&config, args.json)?,
    }

    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    // HTTP stack is noisy at debug level
    if !verbose {
        builder.filter_module("reqwest", log::LevelFilter::Warn);
        builder.filter_module("hyper", log::LevelFilter::Warn);
    }
    builder.target(env_logger::Target::Stderr).init();
}

/// Environment first, then command-line overrides.
fn resolve_config(cli: &Cli) -> Result<RagConfig> {
    let mut config = RagConfig::from_env().context("Invalid configuration in environment")?;
    if let Some(mode) = cli.embed_mode {
        config.embedding_mode = mode.as_domain();
    }
    if let Some(model) = &cli.embedding_model {
        config.embedding_model.clone_from(model);
    }
    if let Some(model) = &cli.language_model {
        config.language_model.clone_from(model);
    }
    if let Some(host) = &cli.ollama_host {
        config.ollama_host = normalize_host(host);
    }
    Ok(config)
}

/// Rejects zero up front so no chunk is embedded for a query that cannot run.
fn parse_top_n(raw: &str) -> std::result::Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

async fn run_query(args: QueryArgs, config: &RagConfig, quiet: bool) -> Result<()> {
    let chunks = chunks::collect(&args.chunks_files, &args.chunks)?;
    let embedder = AnyEmbedder::from_config(config).context("Failed to build embedder")?;
    let mut store = VectorStore::new(embedder);

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(chunks.len() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%)")?
            .progress_chars("━━╸"),
    );

    for (i, chunk) in chunks.into_iter().enumerate() {
        store
            .insert(chunk)
            .await
            .with_context(|| format!("Failed to add chunk #{}", i + 1))?;
        pb.inc(1);
    }
    pb.finish_and_clear();
    log::info!("Added {} chunks to the database", store.len());

    let results = store
        .query(&args.query, args.top_n)
        .await
        .context("Retrieval failed")?;

    report::print_query(
        &QueryReport {
            query: &args.query,
            top_n: args.top_n,
            embedding_model: &config.embedding_model,
            records: store.len(),
            results: &results,
        },
        args.json,
    )
}
