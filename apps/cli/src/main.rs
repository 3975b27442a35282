//! answerfill CLI: fill question templates from answer documents.
//!
//! Extracts answers from text files, web pages, PDFs, DOCX files, and
//! images, then writes them into a Markdown question template.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
