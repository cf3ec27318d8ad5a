//! Command-line interface argument parsing for supreme-tuning.
//!
//! Query commands mirror the public lookup endpoints:
//! - `supreme-tuning brands`
//! - `supreme-tuning power --brand bmw --model m5f90 --engine s63b44t4 --stage 1`
//!
//! Admin commands work on the whole dataset and its backups.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Environment variable overriding the default data directory
pub const DATA_DIR_ENV: &str = "SUPREME_TUNING_DIR";

/// Look up tuning stages, gains and compliance notes.
#[derive(Parser, Debug)]
#[command(name = "supreme-tuning")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding supreme-tuning.json and its backups/
    /// Defaults to $SUPREME_TUNING_DIR, then the platform data directory
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all brands
    Brands,

    /// List the models of a brand
    Models {
        #[arg(short, long)]
        brand: String,
    },

    /// List the engines of a model
    Engines {
        #[arg(short, long)]
        brand: String,
        #[arg(short, long)]
        model: String,
    },

    /// List the tuning stages of an engine
    Stages {
        #[arg(short, long)]
        brand: String,
        #[arg(short, long)]
        model: String,
        #[arg(short, long)]
        engine: String,
    },

    /// Show stock/tuned figures, gains and notes for one stage
    Power {
        #[arg(short, long)]
        brand: String,
        #[arg(short, long)]
        model: String,
        #[arg(short, long)]
        engine: String,
        #[arg(short, long)]
        stage: String,
    },

    /// Print the full dataset
    Dump,

    /// Replace the dataset with a JSON file (the current one is backed up first)
    Replace {
        /// Path to the replacement dataset
        file: PathBuf,
    },

    /// List backups, most recent first
    Backups,

    /// Back up the current dataset
    Backup,

    /// Restore a backup (the current dataset is backed up first)
    Restore {
        /// Backup id as shown by `backups`
        id: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
}

impl AppConfig {
    pub fn from_cli(data_dir: Option<String>) -> Self {
        Self::resolve(data_dir, std::env::var(DATA_DIR_ENV).ok())
    }

    /// Flag first, then environment, then the platform data directory
    fn resolve(flag: Option<String>, env: Option<String>) -> Self {
        let data_dir = flag
            .or(env)
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("supreme-tuning")
            });

        AppConfig { data_dir }
    }
}
