use anyhow::Result;
use clap::Parser;

use dre_analyzer::{
    app::load_config,
    cli::{handle_command, Cli},
    utils::init_logger,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_logger(cli.verbose);

    // Load configuration (defaults, config files, then DRE_* environment)
    let config = load_config(cli.config.as_deref())?;

    handle_command(cli.command, config).await
}
