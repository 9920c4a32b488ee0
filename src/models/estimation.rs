use serde::{Deserialize, Serialize};

/// Irrigation decision bands, ordered from none to heavy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IrrigationDecision {
    DoNotWater,
    WaterLight,
    WaterModerate,
    WaterHeavy,
}

impl IrrigationDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            IrrigationDecision::DoNotWater => "do_not_water",
            IrrigationDecision::WaterLight => "water_light",
            IrrigationDecision::WaterModerate => "water_moderate",
            IrrigationDecision::WaterHeavy => "water_heavy",
        }
    }
}

impl std::fmt::Display for IrrigationDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output of the estimation stage, written once into the context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimation {
    pub should_water: bool,
    pub decision: IrrigationDecision,
    /// Whole milliliters; always 0 when the decision is do_not_water
    pub water_amount_ml: f64,
    /// Fixed per-strategy confidence score
    pub confidence: f64,
    /// Human-readable reasoning, suffixed with the soil name
    pub reasoning: String,
    /// Resolved strategy tag
    pub plant_type: String,
}
