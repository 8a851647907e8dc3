//! Semagent — SKOS-aware question-answering service.
//!
//! Loads a SKOS taxonomy at startup and answers questions over HTTP by
//! combining concept matching, document search, and an LLM completion.

mod commands;
mod routes;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
