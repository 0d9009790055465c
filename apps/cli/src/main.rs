//! CourseGen CLI — AI-assisted course generation tool.
//!
//! Generates structured course documents from a topic, difficulty,
//! audience, and learning goals, with optional web-search enhancement.

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
