//! Deterministic decision pipeline turning raw environmental-sensor
//! readings for a plant into an irrigation and fertilization
//! recommendation.
//!
//! One [`PipelineManager`] per request, parameterized only by plant
//! type; the pipeline performs no I/O and holds no state between
//! invocations.

pub mod error;
pub mod models;
pub mod pipeline;

pub use error::{PlantOpsError, Result};
pub use models::{PlantType, Report, SensorSnapshot};
pub use pipeline::PipelineManager;
