//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing::info;

use semagent_completion::CompletionClient;
use semagent_core::Agent;
use semagent_search::SearchClient;
use semagent_shared::{AppConfig, config_file_path, init_config, load_config, load_config_from};
use semagent_taxonomy::TaxonomyStore;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Semagent — SKOS + RAG question answering.
#[derive(Parser)]
#[command(
    name = "semagent",
    version,
    about = "Answer questions by combining a SKOS taxonomy, document search, and an LLM.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to a config file (defaults to ~/.semagent/semagent.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Start the HTTP question-answering server.
    Serve {
        /// Socket address to bind (overrides config).
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Answer a single question and print the result.
    Ask {
        /// The question to answer.
        question: String,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Create a default config file.
    Init,
    /// Print the config file path.
    Path,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = [
        "semagent_server",
        "semagent_core",
        "semagent_taxonomy",
        "semagent_search",
        "semagent_completion",
    ]
    .map(|krate| format!("{krate}={level}"))
    .join(",");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    match cli.command {
        Command::Serve { bind } => cmd_serve(&config, bind.as_deref()).await,
        Command::Ask { question } => cmd_ask(&config, &question).await,
        Command::Config { action } => cmd_config(action),
    }
}

/// Construct the agent with all service handles resolved and validated.
///
/// Missing endpoints or credentials fail here, before any request is
/// accepted.
fn build_agent(config: &AppConfig) -> Result<Arc<Agent>> {
    let taxonomy_path = config.taxonomy.resolve_path();
    let taxonomy = Arc::new(TaxonomyStore::load(&taxonomy_path)?);

    let search = SearchClient::new(&config.search.resolve()?)?;
    let completion = CompletionClient::new(&config.completion.resolve()?)?;

    Ok(Arc::new(Agent::new(
        taxonomy,
        Arc::new(search),
        Arc::new(completion),
    )))
}

async fn cmd_serve(config: &AppConfig, bind: Option<&str>) -> Result<()> {
    let agent = build_agent(config)?;
    let bind = bind.unwrap_or(&config.server.bind);

    info!(%bind, "starting HTTP server");
    routes_serve(bind, agent).await
}

async fn routes_serve(bind: &str, agent: Arc<Agent>) -> Result<()> {
    let app = crate::routes::router(agent);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn cmd_ask(config: &AppConfig, question: &str) -> Result<()> {
    let agent = build_agent(config)?;
    let answer = agent.answer(question).await?;
    println!("{answer}");
    Ok(())
}

fn cmd_config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = init_config()?;
            println!("{}", path.display());
        }
        ConfigAction::Path => {
            println!("{}", config_file_path()?.display());
        }
    }
    Ok(())
}
