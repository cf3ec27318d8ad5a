//! Data layer for the tuning dataset.
//!
//! Holds the serde models, write-time validation and the JSON document store
//! with its backup directory.

mod models;
mod storage;
mod validate;

#[cfg(test)]
pub(crate) mod fixtures;

pub use models::{
    BackupInfo, Brand, BrandSummary, Database, Engine, EngineSummary, Model, ModelSummary, Stage,
    StageSummary, DEFAULT_MONTH,
};
pub use storage::{DatasetStore, BACKUP_DIR, DATASET_FILE};
pub use validate::validate_database;
