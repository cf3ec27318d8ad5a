//! supreme-tuning: stage lookup for vehicle performance tuning.
//!
//! Resolves tuning stages through the brand → model → engine → stage
//! hierarchy, computes power and torque gains, and attaches compliance notes
//! (ECU unlock, CPC upgrade). The dataset is a single JSON document with an
//! automatic backup taken before every save and every restore.

pub mod data;
pub mod error;
pub mod gains;
pub mod resolve;
pub mod rules;
pub mod service;

pub use error::{Error, ErrorKind, Level, Result};
pub use gains::Gains;
pub use service::{PowerReport, SaveOutcome, TuningService};
