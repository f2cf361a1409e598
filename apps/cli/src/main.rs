//! Pagesmith CLI: generate and publish one question page per run.
//!
//! Asks a generative API for a fresh question, renders it as a standalone
//! HTML page, links it from the site index, rebuilds the sitemap, and
//! announces it in a chat.

mod commands;

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
