use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::estimation::Estimation;
use super::features::Features;
use super::sensor::CleanedData;
use super::suggestion::{FertilizerEstimate, FrequencyEstimate, Priority, Suggestions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStatus {
    Success,
    Error,
}

impl PipelineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStatus::Success => "success",
            PipelineStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Completed,
    Failed,
}

/// Per-stage execution bookkeeping collected by the manager.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageResult {
    pub stage: String,
    pub name: String,
    pub status: StageStatus,
    pub duration_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Flat irrigation suggestion for the response-shaping layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrrigationSuggestion {
    pub should_water: bool,
    pub water_amount_liters: f64,
    pub decision: String,
    pub description: String,
    pub timing: String,
    pub priority: Priority,
    pub frequency_estimation: FrequencyEstimate,
    pub fertilizer_estimation: FertilizerEstimate,
}

/// Intermediate results retained for diagnostics. Partial on failed
/// runs: every field the pipeline got to write is kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportDetails {
    pub cleaned_data: Option<CleanedData>,
    pub features: Option<Features>,
    pub estimation: Option<Estimation>,
    pub anomalies: Vec<String>,
    pub full_suggestions: Option<Suggestions>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMetadata {
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub stage_results: Vec<StageResult>,
}

/// Final pipeline report, one per run. Never mutated after return.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub status: PipelineStatus,
    pub suggestion: Option<IrrigationSuggestion>,
    pub details: ReportDetails,
    pub metadata: ReportMetadata,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.status == PipelineStatus::Success
    }
}
