use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::{
    analysis::AnalysisResult,
    app::{get_config_dir, init_config, AppState, Config},
    prompt::DreInput,
    render::to_terminal,
    server::{parse_analyze_request, serve},
};

use super::{Commands, OutputFormat};

/// Handle CLI subcommands
pub async fn handle_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Serve { bind } => serve(config, bind).await,
        Commands::Analyze {
            file,
            model,
            output_format,
        } => analyze_file(&file, model.as_deref(), output_format, config).await,
        Commands::Models => list_models(config).await,
        Commands::Init => {
            println!("Initializing dre-analyzer configuration...");
            match init_config()? {
                Some(path) => println!("Configuration written to {}", path.display()),
                None => println!("Configuration already exists, left untouched"),
            }
            Ok(())
        }
        Commands::Status => {
            show_status(&config);
            Ok(())
        }
        Commands::Version => {
            show_version();
            Ok(())
        }
    }
}

/// Read a statement file: JSON files follow the HTTP request body, anything
/// else is taken as raw statement text
pub fn read_statement(path: &Path) -> Result<(DreInput, Option<String>)> {
    let raw = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        let request = parse_analyze_request(&raw)
            .with_context(|| format!("Invalid request body in {}", path.display()))?;
        Ok((request.input, request.model))
    } else {
        let text = String::from_utf8(raw)
            .with_context(|| format!("{} is not valid UTF-8", path.display()))?;
        Ok((DreInput::Text(text), None))
    }
}

async fn analyze_file(
    path: &Path,
    model: Option<&str>,
    format: OutputFormat,
    config: Config,
) -> Result<()> {
    let (input, file_model) = read_statement(path)?;
    let state = AppState::from_config(config)?;
    let model = model.map(str::to_string).or(file_model);

    let result = state
        .analyzer
        .analyze(&input, model.as_deref())
        .await
        .map_err(|e| anyhow::anyhow!("{}: {}", e.user_message(), e))?;

    println!("{}", format_result(&result, format)?);
    Ok(())
}

/// Render an analysis in the requested output format
pub fn format_result(result: &AnalysisResult, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(result)?,
        OutputFormat::Markdown => result.analysis.clone(),
        OutputFormat::Html => result.html.clone(),
        OutputFormat::Text => {
            let mut out = to_terminal(result.nodes.iter().cloned());
            out.push_str(&format!(
                "\n\n{} {} | {} {}{}",
                "model:".dimmed(),
                result.model,
                "context:".dimmed(),
                result.context_source,
                if result.context_truncated { " (compacted)" } else { "" },
            ));
            out
        }
    })
}

/// List active models
pub async fn list_models(config: Config) -> Result<()> {
    let state = AppState::from_config(config)?;
    let models = state
        .analyzer
        .gateway()
        .list_models()
        .await
        .map_err(|e| anyhow::anyhow!("{}: {}", e.user_message(), e))?;

    println!("Available models:");
    let primary = state.analyzer.primary_model();
    for model in models {
        if model == primary {
            println!("  • {} {}", model.green(), "(primary)".dimmed());
        } else {
            println!("  • {}", model.green());
        }
    }
    Ok(())
}

/// Show version information
pub fn show_version() {
    println!("dre-analyzer v{}", env!("CARGO_PKG_VERSION"));
    println!("   AI analysis of income statements for small Brazilian businesses");
}

/// Show configuration and reference document status
fn show_status(config: &Config) {
    println!("dre-analyzer Status:");
    println!();

    let llm = &config.llm;
    match llm.base_url() {
        Ok(url) => println!("  [OK] API base URL: {url}"),
        Err(_) => println!("  [ERROR] API base URL: not set (llm.api_base_url)"),
    }
    match llm.default_model() {
        Ok(model) => println!("  [OK] Default model: {model}"),
        Err(_) => println!("  [ERROR] Default model: not set (llm.default_model)"),
    }
    if let Some(model) = llm.model.as_deref().filter(|m| !m.trim().is_empty()) {
        println!("  [OK] Primary model: {model}");
    }
    if llm.resolve_api_key().is_some() {
        println!("  [OK] API key: Set");
    } else {
        println!("  [ERROR] API key: missing (llm.api_key or ${})", llm.api_key_env);
    }

    println!("\n  Reference documents:");
    let ctx = &config.context;
    let primary_ok = ctx.primary_path.is_file();
    print_path("Primary context", &ctx.primary_path, primary_ok, "ERROR");
    let fallback_level = if primary_ok { "WARNING" } else { "ERROR" };
    print_path(
        "Chart of accounts",
        &ctx.chart_of_accounts_path,
        ctx.chart_of_accounts_path.is_file(),
        fallback_level,
    );
    print_path(
        "Transcripts",
        &ctx.transcripts_path,
        ctx.transcripts_path.is_file(),
        fallback_level,
    );

    if let Ok(dir) = get_config_dir() {
        let config_path = dir.join("config.toml");
        if config_path.exists() {
            println!("\n  [OK] Configuration: {}", config_path.display());
        } else {
            println!("\n  [WARNING] Configuration: Not found (run `dre-analyzer init`)");
        }
    }
    println!();
}

fn print_path(label: &str, path: &Path, exists: bool, missing_level: &str) {
    if exists {
        println!("    [OK] {label}: {}", path.display());
    } else {
        println!("    [{missing_level}] {label}: {} not found", path.display());
    }
}
