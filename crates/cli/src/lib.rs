pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use larder_core::config::{AppConfig, ConfigOverrides, LoadOptions};

#[derive(Debug, Parser)]
#[command(
    name = "larder",
    about = "Larder ingredient substitution CLI",
    long_about = "Evaluate substitution and cost-saving suggestions for catalog products and recipes.",
    after_help = "Examples:\n  larder suggest --catalog catalog.json --inventory inventory.json --recipe recipe.json\n  larder suggest --catalog catalog.json --product prod-42 --json\n  larder rules\n  larder config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(long, global = true, help = "Path to a larder.toml config file")]
    config: Option<PathBuf>,

    #[arg(long, global = true, help = "Path to a TOML rule book asset")]
    rules: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Produce substitution suggestions for a recipe or a single product")]
    Suggest {
        #[arg(long, help = "Catalog snapshot (JSON array of products)")]
        catalog: PathBuf,
        #[arg(long, help = "Inventory snapshot (JSON array of stock lines)")]
        inventory: Option<PathBuf>,
        #[arg(long, help = "Recipe to evaluate (JSON)", conflicts_with = "product")]
        recipe: Option<PathBuf>,
        #[arg(long, help = "Single product id to evaluate", conflicts_with = "recipe")]
        product: Option<String>,
        #[arg(long, help = "Use rule-book cost estimates instead of live prices")]
        static_pricing: bool,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "List the active substitution rule book")]
    Rules,
    #[command(about = "Inspect effective configuration values with redaction")]
    Config,
}

fn init_logging(config: &AppConfig) {
    use larder_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config.clone(),
        require_file: cli.config.is_some(),
        overrides: ConfigOverrides { rules_path: cli.rules.clone(), ..ConfigOverrides::default() },
    };

    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("configuration error: {error}");
            return ExitCode::from(2);
        }
    };

    init_logging(&config);

    let result = match cli.command {
        Command::Suggest { catalog, inventory, recipe, product, static_pricing, json } => {
            commands::suggest::run(&config, commands::suggest::SuggestArgs {
                catalog,
                inventory,
                recipe,
                product,
                static_pricing,
                json,
            })
            .await
        }
        Command::Rules => commands::rules::run(&config),
        Command::Config => commands::config::run(&config),
    };

    match result {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
