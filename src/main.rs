//! supreme-tuning: command-line front end for the tuning dataset.
//!
//! Prints JSON to stdout; logs go to stderr (`RUST_LOG` controls the level).

mod cli;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{AppConfig, Cli, Commands};
use supreme_tuning::data::Database;
use supreme_tuning::TuningService;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "supreme_tuning=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse_args();
    let config = AppConfig::from_cli(cli.data_dir);
    let service = TuningService::open(&config.data_dir);

    match cli.command {
        Commands::Brands => print_json(&service.list_brands()?),
        Commands::Models { brand } => print_json(&service.list_models(&brand)?),
        Commands::Engines { brand, model } => print_json(&service.list_engines(&brand, &model)?),
        Commands::Stages {
            brand,
            model,
            engine,
        } => print_json(&service.list_stages(&brand, &model, &engine)?),
        Commands::Power {
            brand,
            model,
            engine,
            stage,
        } => print_json(&service.get_power_data(&brand, &model, &engine, &stage)?),
        Commands::Dump => print_json(&service.get_full_dataset()?),
        Commands::Replace { file } => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read dataset file: {file:?}"))?;
            let db = Database::from_json(&json)?;
            let outcome = service.replace_dataset(&db)?;
            info!(backup = %outcome.backup, "Data saved successfully");
            print_json(&outcome)
        }
        Commands::Backups => print_json(&service.list_backups()?),
        Commands::Backup => print_json(&serde_json::json!({ "backup": service.create_backup()? })),
        Commands::Restore { id } => {
            let safety = service.restore_backup(&id)?;
            print_json(&serde_json::json!({ "restored": id, "backup": safety }))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
