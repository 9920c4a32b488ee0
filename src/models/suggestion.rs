use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::estimation::IrrigationDecision;
use super::features::DayPhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Primary irrigation action derived from the estimation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MainAction {
    /// "irrigate" or "do_not_irrigate"
    pub action: String,
    pub decision: IrrigationDecision,
    pub water_amount_ml: f64,
    /// mL / 1000, rounded to 2 decimals
    pub water_amount_liters: f64,
    pub reasoning: String,
    pub confidence: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecondaryAction {
    #[serde(rename = "type")]
    pub kind: String,
    pub action: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingAdvice {
    pub suggested_time: String,
    pub next_window: DateTime<Utc>,
    pub current_phase: DayPhase,
    pub ideal_hours: Vec<String>,
}

/// Suggested watering cadence, bucketed into labeled bands.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyEstimate {
    /// ALTA / MEDIA-ALTA / MEDIA / BASSA
    pub label: String,
    pub detail: String,
    pub icon: String,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FertilizerEstimate {
    /// "Ogni N giorni"
    pub frequency: String,
    /// Feeding interval in days, after soil modulation
    pub interval_days: u32,
    /// Suggested product type
    #[serde(rename = "type")]
    pub product: String,
    pub reasoning: String,
}

/// Final structured recommendation, written once by the action
/// generation stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestions {
    pub main_action: MainAction,
    pub secondary_actions: Vec<SecondaryAction>,
    pub timing: TimingAdvice,
    pub frequency_estimation: FrequencyEstimate,
    pub fertilizer_estimation: FertilizerEstimate,
    pub notes: Vec<String>,
    pub priority: Priority,
    pub generated_at: DateTime<Utc>,
}
