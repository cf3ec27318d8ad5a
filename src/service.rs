//! Query and admin operations over the tuning dataset.
//!
//! `TuningService` is what a transport layer calls into: the listing
//! endpoints, the annotated power lookup, and the privileged dataset and
//! backup operations.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::{
    BackupInfo, BrandSummary, Database, DatasetStore, EngineSummary, ModelSummary, StageSummary,
};
use crate::error::Result;
use crate::gains::Gains;
use crate::resolve::{resolve, resolve_stage, Resolved, ResolvedStage};
use crate::rules::annotate;

/// Horsepower and torque pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Figures {
    pub hp: i64,
    pub nm: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Power {
    pub stock: Figures,
    pub tuned: Figures,
    pub gains: Gains,
}

/// Annotated power data for one brand/model/engine/stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerReport {
    pub brand_id: String,
    pub brand: String,
    pub model_id: String,
    pub model: String,
    pub model_year: i32,
    pub engine_id: String,
    pub engine: String,
    pub stage: String,
    pub power: Power,
    /// Stored stage notes followed by rule-generated notes
    pub notes: Vec<String>,
}

impl PowerReport {
    /// Build the report for a resolved stage, running gains and rules
    pub fn from_resolved(resolved: &ResolvedStage<'_>) -> Self {
        let ResolvedStage {
            brand,
            model,
            engine,
            stage,
        } = *resolved;

        let mut notes = stage.notes.clone();
        notes.extend(annotate(&brand.name, model, engine));

        PowerReport {
            brand_id: brand.id.clone(),
            brand: brand.name.clone(),
            model_id: model.id.clone(),
            model: model.name.clone(),
            model_year: model.year,
            engine_id: engine.id.clone(),
            engine: engine.name.clone(),
            stage: stage.stage.clone(),
            power: Power {
                stock: Figures {
                    hp: stage.stock_hp,
                    nm: stage.stock_nm,
                },
                tuned: Figures {
                    hp: stage.tuned_hp,
                    nm: stage.tuned_nm,
                },
                gains: Gains::for_stage(stage),
            },
            notes,
        }
    }
}

/// Result of a dataset replacement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveOutcome {
    /// Backup holding the dataset as it was before the save
    pub backup: String,
}

pub struct TuningService {
    store: DatasetStore,
}

impl TuningService {
    /// Create a service over an existing store
    pub fn new(store: DatasetStore) -> Self {
        TuningService { store }
    }

    /// Service over the standard layout inside a data directory
    pub fn open(data_dir: impl AsRef<Path>) -> Self {
        Self::new(DatasetStore::open(data_dir))
    }

    /// The underlying dataset store
    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    /// All brands, in dataset order
    pub fn list_brands(&self) -> Result<Vec<BrandSummary>> {
        let db = self.store.read()?;
        Ok(db.brands.iter().map(BrandSummary::from).collect())
    }

    /// Models of a brand
    pub fn list_models(&self, brand: &str) -> Result<Vec<ModelSummary>> {
        let db = self.store.read()?;
        let Resolved::Models(brand) = resolve(&db, &[brand])? else {
            unreachable!("a one-segment path resolves to a brand");
        };
        Ok(brand.models.iter().map(ModelSummary::from).collect())
    }

    /// Engines of a model; fails at the first missing level
    pub fn list_engines(&self, brand: &str, model: &str) -> Result<Vec<EngineSummary>> {
        let db = self.store.read()?;
        let Resolved::Engines { model, .. } = resolve(&db, &[brand, model])? else {
            unreachable!("a two-segment path resolves to a model");
        };
        Ok(model.engines.iter().map(EngineSummary::from).collect())
    }

    /// Stage figures of an engine, without notes
    pub fn list_stages(&self, brand: &str, model: &str, engine: &str) -> Result<Vec<StageSummary>> {
        let db = self.store.read()?;
        let Resolved::Stages { engine, .. } = resolve(&db, &[brand, model, engine])? else {
            unreachable!("a three-segment path resolves to an engine");
        };
        Ok(engine.stages.iter().map(StageSummary::from).collect())
    }

    /// Stage figures, gains and compliance notes for a full path
    pub fn get_power_data(
        &self,
        brand: &str,
        model: &str,
        engine: &str,
        stage: &str,
    ) -> Result<PowerReport> {
        let db = self.store.read()?;
        let resolved = resolve_stage(&db, brand, model, engine, stage)?;
        let report = PowerReport::from_resolved(&resolved);
        debug!(brand, model, engine, stage, notes = report.notes.len(), "Power data resolved");
        Ok(report)
    }

    /// The whole dataset, for admin editing
    pub fn get_full_dataset(&self) -> Result<Database> {
        self.store.read()
    }

    /// Back up the current dataset, then replace it with `db`
    pub fn replace_dataset(&self, db: &Database) -> Result<SaveOutcome> {
        let backup = self.store.replace_dataset(db)?;
        Ok(SaveOutcome { backup })
    }

    /// Backups, most recently modified first
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>> {
        self.store.list_backups()
    }

    /// Snapshot the current dataset and return the backup id
    pub fn create_backup(&self) -> Result<String> {
        self.store.create_backup()
    }

    /// Restore a backup; the returned id is the backup of the replaced state
    pub fn restore_backup(&self, id: &str) -> Result<String> {
        self.store.restore_from_backup(id)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::data::fixtures::sample_database;
    use crate::error::{Error, Level};
    use crate::rules::{CPC_UPGRADE_NOTE, ECU_UNLOCK_NOTE};

    fn service() -> (TempDir, TuningService) {
        let dir = TempDir::new().unwrap();
        let service = TuningService::open(dir.path());
        service.store().write(&sample_database()).unwrap();
        (dir, service)
    }

    #[test]
    fn test_listings() {
        let (_dir, service) = service();

        let brands = service.list_brands().unwrap();
        assert_eq!(
            brands.iter().map(|b| b.id.as_str()).collect::<Vec<_>>(),
            vec!["bmw", "mercedes"]
        );

        let models = service.list_models("bmw").unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].year, 2021);

        let engines = service.list_engines("mercedes", "c63w205").unwrap();
        assert_eq!(engines[0].name, "M177 4.0 V8 Biturbo");

        let stages = service.list_stages("bmw", "m5f90", "s63b44t4").unwrap();
        assert_eq!(
            stages.iter().map(|s| s.stage.as_str()).collect::<Vec<_>>(),
            vec!["1", "2"]
        );
    }

    #[test]
    fn test_listings_of_childless_entries_are_empty() {
        let dir = TempDir::new().unwrap();
        let service = TuningService::open(dir.path());
        let db = Database::from_json(
            r#"{"brands": [{"id": "audi", "name": "Audi", "models": [
                {"id": "rs6", "name": "RS6 C8", "year": 2020, "engines": [
                    {"id": "ea825", "name": "EA825"}
                ]},
                {"id": "rs3", "name": "RS3 8Y", "year": 2021}
            ]}, {"id": "seat", "name": "SEAT"}]}"#,
        )
        .unwrap();
        service.store().write(&db).unwrap();

        assert!(service.list_models("seat").unwrap().is_empty());
        assert!(service.list_engines("audi", "rs3").unwrap().is_empty());
        assert!(service.list_stages("audi", "rs6", "ea825").unwrap().is_empty());
        assert_eq!(service.list_models("audi").unwrap().len(), 2);
    }

    #[test]
    fn test_listings_report_missing_level() {
        let (_dir, service) = service();
        assert!(matches!(
            service.list_models("audi"),
            Err(Error::NotFound(Level::Brand))
        ));
        assert!(matches!(
            service.list_engines("bmw", "m3"),
            Err(Error::NotFound(Level::Model))
        ));
        assert!(matches!(
            service.list_stages("bmw", "m5f90", "b58"),
            Err(Error::NotFound(Level::Engine))
        ));
    }

    #[test]
    fn test_power_data_for_bmw() {
        let (_dir, service) = service();
        let report = service
            .get_power_data("bmw", "m5f90", "s63b44t4", "1")
            .unwrap();

        assert_eq!(report.brand, "BMW");
        assert_eq!(report.model, "M5 F90");
        assert_eq!(report.model_year, 2021);
        assert_eq!(report.power.stock, Figures { hp: 600, nm: 750 });
        assert_eq!(report.power.gains.hp, 120);
        assert_eq!(report.power.gains.hp_percent, Some(20.0));
        assert_eq!(report.power.gains.nm, 150);
        assert_eq!(report.power.gains.nm_percent, Some(20.0));
        assert_eq!(report.notes, vec![ECU_UNLOCK_NOTE.to_string()]);
    }

    #[test]
    fn test_stored_notes_come_first() {
        let (_dir, service) = service();
        let report = service
            .get_power_data("bmw", "m5f90", "s63b44t4", "2")
            .unwrap();
        assert_eq!(
            report.notes,
            vec![
                "Requires upgraded downpipes".to_string(),
                ECU_UNLOCK_NOTE.to_string()
            ]
        );
    }

    #[test]
    fn test_power_data_for_mercedes() {
        let (_dir, service) = service();
        let report = service
            .get_power_data("mercedes", "c63w205", "m177", "1")
            .unwrap();
        assert_eq!(report.notes, vec![CPC_UPGRADE_NOTE.to_string()]);
    }

    #[test]
    fn test_power_data_missing_engine() {
        let (_dir, service) = service();
        let err = service
            .get_power_data("bmw", "m5f90", "n63", "1")
            .unwrap_err();
        assert_eq!(err.missing_level(), Some(Level::Engine));
    }

    #[test]
    fn test_power_report_json_shape() {
        let (_dir, service) = service();
        let report = service
            .get_power_data("bmw", "m5f90", "s63b44t4", "1")
            .unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["modelYear"], 2021);
        assert_eq!(json["power"]["tuned"]["hp"], 720);
        assert_eq!(json["power"]["gains"]["hpPercent"], 20.0);
        assert!(json["notes"].is_array());
    }

    #[test]
    fn test_replace_dataset_returns_backup() {
        let (_dir, service) = service();
        let outcome = service.replace_dataset(&Database::default()).unwrap();
        assert!(service.list_brands().unwrap().is_empty());

        let backups = service.list_backups().unwrap();
        assert_eq!(backups.len(), 1);
        assert_eq!(backups[0].id, outcome.backup);

        service.restore_backup(&outcome.backup).unwrap();
        assert_eq!(service.get_full_dataset().unwrap(), sample_database());
        assert_eq!(service.list_backups().unwrap().len(), 2);
    }
}
