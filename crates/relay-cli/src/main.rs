//! Relay CLI - chat with a model that can read, list and edit files
//!
//! Wires stdin, a colored console sink, the genai-backed inference client and
//! the standard tool registry into one agent loop.

mod output;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

use relay_core::config::{Config, ConfigManager};
use relay_core::provider::{ProviderType, create_provider};
use relay_core::session::{AgentLoop, LineInput};
use relay_core::tools::standard_tool_registry;

use output::ConsoleOutput;

#[derive(Parser)]
#[command(name = "relay")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Chat with a model that can read, list and edit files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Workspace directory the tools are confined to (defaults to config, then ".")
    #[arg(short, long)]
    workspace: Option<PathBuf>,

    /// LLM Provider (anthropic, openai, gemini, etc.) - defaults to config setting
    #[arg(short, long)]
    provider: Option<String>,

    /// Model to use (defaults to config, then the provider's default)
    #[arg(short, long)]
    model: Option<String>,

    /// Config file to use instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat mode
    Chat,

    /// Show available tools
    Tools,

    /// Show or create the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init,
}

/// Provider, model and workspace after applying CLI > config > default
#[derive(Debug, PartialEq)]
struct Settings {
    provider_type: ProviderType,
    model: String,
    workspace: PathBuf,
}

fn resolve_settings(cli: &Cli, config: &Config) -> anyhow::Result<Settings> {
    let configured_provider = config.provider.provider_type()?;
    let provider_type = match cli.provider.as_deref() {
        Some(name) => name.parse::<ProviderType>().map_err(anyhow::Error::msg)?,
        None => configured_provider,
    };

    // A configured model only applies to the configured provider
    let configured_model = config
        .provider
        .model
        .clone()
        .filter(|_| provider_type == configured_provider);
    let model = cli
        .model
        .clone()
        .or(configured_model)
        .unwrap_or_else(|| provider_type.default_model().to_string());

    let workspace = cli
        .workspace
        .clone()
        .or_else(|| config.general.workspace_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    Ok(Settings {
        provider_type,
        model,
        workspace: absolute_workspace(&workspace),
    })
}

/// Use dunce::canonicalize to avoid UNC path prefix on Windows (\\?\)
fn absolute_workspace(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        }
    })
}

/// Logs go to stderr so they never mix with the chat transcript
fn init_logging(verbose: bool, config_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("info,relay_core=debug")
        } else {
            EnvFilter::new(config_level)
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ConfigManager> {
    Ok(match path {
        Some(path) => ConfigManager::with_path(path.to_path_buf())?,
        None => ConfigManager::new()?,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{}", style(format!("Error: {:#}", e)).red());
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_manager = load_config(cli.config.as_deref())?;
    init_logging(cli.verbose, &config_manager.config().general.log_level);

    match cli.command {
        Some(Commands::Config(ConfigCommands::Show)) => show_config(&config_manager),
        Some(Commands::Config(ConfigCommands::Init)) => init_config(&config_manager),
        Some(Commands::Tools) => {
            let settings = resolve_settings(&cli, config_manager.config())?;
            show_tools(&settings.workspace)
        }
        Some(Commands::Chat) | None => {
            let settings = resolve_settings(&cli, config_manager.config())?;
            run_chat(&config_manager, settings).await
        }
    }
}

async fn run_chat(config_manager: &ConfigManager, settings: Settings) -> anyhow::Result<()> {
    let provider_config = &config_manager.config().provider;

    // The configured key belongs to the configured provider only
    let api_key = if provider_config.provider_type().ok() == Some(settings.provider_type) {
        provider_config.get_api_key()
    } else {
        settings
            .provider_type
            .api_key_env()
            .and_then(|env| std::env::var(env).ok())
            .filter(|key| !key.is_empty())
    };

    if api_key.is_none() && settings.provider_type.api_key_env().is_some() {
        show_setup_instructions(settings.provider_type, config_manager.config_path());
        return Ok(());
    }

    let registry = Arc::new(standard_tool_registry(&settings.workspace)?);
    let client = create_provider(
        settings.provider_type,
        api_key.as_deref(),
        Some(&settings.model),
        provider_config.max_tokens,
        provider_config.system_prompt.as_deref(),
    );

    tracing::info!(
        provider = %settings.provider_type,
        model = %settings.model,
        workspace = %settings.workspace.display(),
        "Starting chat"
    );

    println!(
        "{}",
        style(format!("Chat with {} (ctrl+c to quit)", settings.model)).bold()
    );

    let mut agent = AgentLoop::new(
        Arc::new(client),
        registry,
        Box::new(LineInput::stdin()),
        Box::new(ConsoleOutput::new(settings.provider_type.assistant_label())),
    );
    agent.run().await?;

    // Input ended without a newline after the prompt
    println!();
    Ok(())
}

fn show_tools(workspace: &Path) -> anyhow::Result<()> {
    let registry = standard_tool_registry(workspace)?;

    println!("{}", style("Available Tools:").bold());
    println!();
    for def in registry.definitions() {
        let summary = def.description.lines().next().unwrap_or_default();
        println!("  {:<12} {}", style(&def.name).cyan(), summary);
    }
    println!();
    println!("  Workspace: {}", style(workspace.display()).green());
    Ok(())
}

fn show_config(config_manager: &ConfigManager) -> anyhow::Result<()> {
    let path = config_manager.config_path();
    let origin = if path.exists() { "" } else { " (not created, showing defaults)" };

    println!("{}", style("Configuration:").bold());
    println!("  File: {}{}", style(path.display()).cyan(), style(origin).dim());
    println!();
    print!("{}", config_manager.config().redacted().to_toml()?);
    Ok(())
}

fn init_config(config_manager: &ConfigManager) -> anyhow::Result<()> {
    let path = config_manager.config_path();
    if path.exists() {
        println!(
            "{} {}",
            style("Config already exists:").yellow(),
            style(path.display()).cyan()
        );
        return Ok(());
    }

    ConfigManager::with_path(path.to_path_buf())?.save()?;
    println!("{} {}", style("Wrote").green(), style(path.display()).cyan());
    Ok(())
}

fn show_setup_instructions(provider_type: ProviderType, config_path: &Path) {
    let env_var = provider_type.api_key_env().unwrap_or("API_KEY");

    println!("{}", style("Setup Required").bold().yellow());
    println!(
        "No API key configured for {}. Please set one up before using Relay.",
        provider_type
    );
    println!();

    println!("{}", style("Option 1: Environment Variable (Quick)").bold());
    println!("  export {}=\"your-api-key-here\"", style(env_var).cyan());
    println!();

    println!("{}", style("Option 2: Config File (Persistent)").bold());
    println!("  Edit: {}", style(config_path.display()).cyan());
    println!();
    println!("  {}", style("─".repeat(50)).dim());
    println!(
        r#"  [provider]
  provider_type = "{}"
  api_key = "your-api-key-here""#,
        provider_type
    );
    println!("  {}", style("─".repeat(50)).dim());
    println!();
    println!("{}", style("After configuring, run 'relay' again to start.").dim());
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("relay").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults_come_from_config() {
        let config = Config::default();
        let settings = resolve_settings(&cli(&[]), &config).unwrap();

        assert_eq!(settings.provider_type, ProviderType::Anthropic);
        assert_eq!(settings.model, "claude-3-5-haiku-latest");
        assert!(settings.workspace.is_absolute());
    }

    #[test]
    fn test_cli_flags_win() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.provider.model = Some("from-config".into());
        config.general.workspace_dir = Some(PathBuf::from("/does/not/matter"));

        let workspace = dir.path().to_string_lossy().to_string();
        let settings = resolve_settings(
            &cli(&["--model", "from-cli", "--workspace", &workspace]),
            &config,
        )
        .unwrap();

        assert_eq!(settings.model, "from-cli");
        assert_eq!(settings.workspace, dunce::canonicalize(dir.path()).unwrap());
    }

    #[test]
    fn test_provider_switch_drops_configured_model() {
        let mut config = Config::default();
        config.provider.model = Some("claude-special".into());

        let settings = resolve_settings(&cli(&["--provider", "openai"]), &config).unwrap();
        assert_eq!(settings.provider_type, ProviderType::OpenAI);
        assert_eq!(settings.model, "gpt-4o-mini");
    }

    #[test]
    fn test_unknown_provider_is_an_error() {
        let config = Config::default();
        assert!(resolve_settings(&cli(&["--provider", "nope"]), &config).is_err());
    }

    #[test]
    fn test_subcommands_parse() {
        assert!(matches!(
            cli(&["config", "show"]).command,
            Some(Commands::Config(ConfigCommands::Show))
        ));
        assert!(matches!(cli(&["tools"]).command, Some(Commands::Tools)));
        assert!(cli(&["--verbose"]).command.is_none());
    }
}
