pub mod actions;
pub mod anomaly;
pub mod cleaner;
pub mod estimator;
pub mod features;
pub mod manager;

pub use manager::PipelineManager;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{CleanedData, Estimation, Features, SensorSnapshot, Suggestions};

/// Identifier of a pipeline stage, used in stage results and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Cleaning,
    FeatureEngineering,
    Estimation,
    AnomalyDetection,
    ActionGeneration,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Cleaning => "cleaning",
            PipelineStage::FeatureEngineering => "feature_engineering",
            PipelineStage::Estimation => "estimation",
            PipelineStage::AnomalyDetection => "anomaly_detection",
            PipelineStage::ActionGeneration => "action_generation",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mutable data carrier threaded through every stage of a single run.
///
/// Single-writer invariant: each `Option` field is written by exactly
/// one stage and only read afterwards. `warnings` is append-only.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    /// Original input, immutable after ingestion
    pub raw: SensorSnapshot,
    /// Written by the cleaning stage
    pub cleaned: Option<CleanedData>,
    /// Written by the feature engineering stage
    pub features: Option<Features>,
    /// Written by the estimation stage
    pub estimation: Option<Estimation>,
    /// Written by the action generation stage
    pub suggestions: Option<Suggestions>,
    /// Advisory warnings accumulated across stages
    pub warnings: Vec<String>,
}

impl PipelineContext {
    pub fn new(raw: SensorSnapshot) -> Self {
        Self {
            raw,
            cleaned: None,
            features: None,
            estimation: None,
            suggestions: None,
            warnings: Vec::new(),
        }
    }
}

/// A unit of work in the pipeline. Stages read earlier context fields
/// and write exactly one of their own; timing and error bookkeeping
/// live in the manager.
pub trait Stage: Send + Sync {
    /// Human-readable name for logs and stage results
    fn name(&self) -> &'static str;

    /// Declared stage identifier
    fn stage(&self) -> PipelineStage;

    fn execute(&self, ctx: &mut PipelineContext) -> Result<()>;
}
