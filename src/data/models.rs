//! Data models for the brand → model → engine → stage tuning dataset.
//!
//! Field names follow the persisted JSON document, so the serde attributes
//! here are the on-disk schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Month assumed when a model does not record one
pub const DEFAULT_MONTH: u32 = 1;

/// The whole tuning dataset, persisted as a single document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    pub brands: Vec<Brand>,
}

impl Database {
    /// Parse a dataset submitted by a caller. Shape errors are the caller's
    /// fault, so they surface as validation failures.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            crate::Error::Validation(format!(
                "Invalid data structure. Expected {{ brands: [] }}: {e}"
            ))
        })
    }

    /// First brand with this id
    pub fn find_brand(&self, id: &str) -> Option<&Brand> {
        self.brands.iter().find(|b| b.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub models: Vec<Model>,
}

impl Brand {
    /// First model of this brand with the given id
    pub fn find_model(&self, id: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.id == id)
    }
}

/// A vehicle model, dated by build year and (optionally) month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    pub name: String,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(default)]
    pub engines: Vec<Engine>,
}

impl Model {
    /// Build month, defaulting to January when the dataset has none
    pub fn effective_month(&self) -> u32 {
        self.month.unwrap_or(DEFAULT_MONTH)
    }

    /// First engine of this model with the given id
    pub fn find_engine(&self, id: &str) -> Option<&Engine> {
        self.engines.iter().find(|e| e.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engine {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub stages: Vec<Stage>,
}

impl Engine {
    /// Stage lookup is by label, first match wins
    pub fn find_stage(&self, label: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.stage == label)
    }
}

/// Stock and tuned figures for one tuning stage of an engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub stage: String,
    #[serde(rename = "stockHP")]
    pub stock_hp: i64,
    #[serde(rename = "stockNM")]
    pub stock_nm: i64,
    #[serde(rename = "tunedHP")]
    pub tuned_hp: i64,
    #[serde(rename = "tunedNM")]
    pub tuned_nm: i64,
    #[serde(default)]
    pub notes: Vec<String>,
}

/// Brand entry as returned by brand listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandSummary {
    pub id: String,
    pub name: String,
}

impl From<&Brand> for BrandSummary {
    fn from(b: &Brand) -> Self {
        BrandSummary {
            id: b.id.clone(),
            name: b.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub id: String,
    pub name: String,
    pub year: i32,
}

impl From<&Model> for ModelSummary {
    fn from(m: &Model) -> Self {
        ModelSummary {
            id: m.id.clone(),
            name: m.name.clone(),
            year: m.year,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSummary {
    pub id: String,
    pub name: String,
}

impl From<&Engine> for EngineSummary {
    fn from(e: &Engine) -> Self {
        EngineSummary {
            id: e.id.clone(),
            name: e.name.clone(),
        }
    }
}

/// Stage figures without the stored notes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSummary {
    pub stage: String,
    #[serde(rename = "stockHP")]
    pub stock_hp: i64,
    #[serde(rename = "stockNM")]
    pub stock_nm: i64,
    #[serde(rename = "tunedHP")]
    pub tuned_hp: i64,
    #[serde(rename = "tunedNM")]
    pub tuned_nm: i64,
}

impl From<&Stage> for StageSummary {
    fn from(s: &Stage) -> Self {
        StageSummary {
            stage: s.stage.clone(),
            stock_hp: s.stock_hp,
            stock_nm: s.stock_nm,
            tuned_hp: s.tuned_hp,
            tuned_nm: s.tuned_nm,
        }
    }
}

/// Metadata for one backup document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupInfo {
    pub id: String,
    pub size: u64,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}
