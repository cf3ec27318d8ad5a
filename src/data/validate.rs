//! Checks applied to a dataset before it is allowed onto disk.
//!
//! Lookups resolve by first match, so a duplicate id would silently shadow
//! its twin. Writes reject duplicates within each parent scope instead.

use std::collections::HashSet;

use super::models::Database;
use crate::{Error, Result};

/// Validate ids, stage labels and build months for a whole dataset
pub fn validate_database(db: &Database) -> Result<()> {
    let mut brand_ids = HashSet::new();

    for brand in &db.brands {
        require_id("brand", &brand.id)?;
        if !brand_ids.insert(brand.id.as_str()) {
            return Err(duplicate("brand id", &brand.id, "dataset"));
        }

        let mut model_ids = HashSet::new();
        for model in &brand.models {
            require_id("model", &model.id)?;
            if !model_ids.insert(model.id.as_str()) {
                return Err(duplicate("model id", &model.id, &brand.id));
            }
            if let Some(month) = model.month {
                if !(1..=12).contains(&month) {
                    return Err(Error::Validation(format!(
                        "model '{}' has month {month}, expected 1-12",
                        model.id
                    )));
                }
            }

            let mut engine_ids = HashSet::new();
            for engine in &model.engines {
                require_id("engine", &engine.id)?;
                if !engine_ids.insert(engine.id.as_str()) {
                    return Err(duplicate("engine id", &engine.id, &model.id));
                }

                let mut labels = HashSet::new();
                for stage in &engine.stages {
                    require_id("stage", &stage.stage)?;
                    if !labels.insert(stage.stage.as_str()) {
                        return Err(duplicate("stage", &stage.stage, &engine.id));
                    }
                }
            }
        }
    }

    Ok(())
}

fn require_id(what: &str, id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::Validation(format!("{what} id must not be empty")));
    }
    Ok(())
}

fn duplicate(what: &str, id: &str, scope: &str) -> Error {
    Error::Validation(format!("duplicate {what} '{id}' in '{scope}'"))
}
