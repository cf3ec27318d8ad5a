//! Navigation of the brand → model → engine → stage hierarchy.
//!
//! A lookup path is a prefix of `[brand, model, engine, stage]`. Segments are
//! resolved strictly in that order; the first id that cannot be found is
//! reported by level. A shorter path resolves to the parent whose children
//! the caller wants listed.

use crate::data::{Brand, Database, Engine, Model, Stage};
use crate::error::{Error, Level, Result};

/// Fully resolved path down to a single stage
#[derive(Debug, Clone, Copy)]
pub struct ResolvedStage<'a> {
    pub brand: &'a Brand,
    pub model: &'a Model,
    pub engine: &'a Engine,
    pub stage: &'a Stage,
}

/// Outcome of resolving a path prefix
#[derive(Debug, Clone, Copy)]
pub enum Resolved<'a> {
    /// Empty path: every brand
    Brands(&'a [Brand]),
    /// Brand resolved, its models are next
    Models(&'a Brand),
    Engines {
        brand: &'a Brand,
        model: &'a Model,
    },
    Stages {
        brand: &'a Brand,
        model: &'a Model,
        engine: &'a Engine,
    },
    Stage(ResolvedStage<'a>),
}

/// Resolve a path prefix against the dataset
pub fn resolve<'a>(db: &'a Database, path: &[&str]) -> Result<Resolved<'a>> {
    if path.len() > Level::ALL.len() {
        return Err(Error::Validation(format!(
            "lookup path has {} segments, at most {} allowed",
            path.len(),
            Level::ALL.len()
        )));
    }
    for (segment, level) in path.iter().zip(Level::ALL) {
        if segment.is_empty() {
            return Err(Error::Validation(format!("{level} parameter is required")));
        }
    }

    let Some(brand_id) = path.first() else {
        return Ok(Resolved::Brands(&db.brands));
    };
    let brand = db
        .find_brand(brand_id)
        .ok_or(Error::NotFound(Level::Brand))?;

    let Some(model_id) = path.get(1) else {
        return Ok(Resolved::Models(brand));
    };
    let model = brand
        .find_model(model_id)
        .ok_or(Error::NotFound(Level::Model))?;

    let Some(engine_id) = path.get(2) else {
        return Ok(Resolved::Engines { brand, model });
    };
    let engine = model
        .find_engine(engine_id)
        .ok_or(Error::NotFound(Level::Engine))?;

    let Some(label) = path.get(3) else {
        return Ok(Resolved::Stages {
            brand,
            model,
            engine,
        });
    };
    let stage = engine
        .find_stage(label)
        .ok_or(Error::NotFound(Level::Stage))?;

    Ok(Resolved::Stage(ResolvedStage {
        brand,
        model,
        engine,
        stage,
    }))
}

/// Resolve a complete four-level path
pub fn resolve_stage<'a>(
    db: &'a Database,
    brand: &str,
    model: &str,
    engine: &str,
    stage: &str,
) -> Result<ResolvedStage<'a>> {
    match resolve(db, &[brand, model, engine, stage])? {
        Resolved::Stage(resolved) => Ok(resolved),
        // A four-segment path that resolved always reaches a stage
        _ => Err(Error::NotFound(Level::Stage)),
    }
}
