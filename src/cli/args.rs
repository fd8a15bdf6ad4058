use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dre-analyzer")]
#[command(version)]
#[command(about = "AI analysis of income statements (DRE) for small Brazilian businesses", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API
    Serve {
        /// Address to bind (overrides server.bind)
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Analyse a statement file (raw text, or a JSON request body)
    Analyze {
        /// Statement file; `.json` files use the HTTP request format
        file: PathBuf,

        /// Model to try first
        #[arg(short, long)]
        model: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        output_format: OutputFormat,
    },
    /// List active models from the provider
    Models,
    /// Initialize configuration
    Init,
    /// Check configuration and reference documents
    Status,
    /// Show version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Styled terminal output
    Text,
    /// JSON structured output
    Json,
    /// The model's Markdown, unmodified
    Markdown,
    /// Escaped HTML fragment
    Html,
}
