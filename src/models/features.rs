use serde::{Deserialize, Serialize};

/// Phase of the day, derived from the local clock hour. Only morning
/// and evening matter for irrigation timing advice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPhase {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl DayPhase {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=10 => DayPhase::Morning,
            11..=16 => DayPhase::Afternoon,
            17..=21 => DayPhase::Evening,
            _ => DayPhase::Night,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DayPhase::Morning => "morning",
            DayPhase::Afternoon => "afternoon",
            DayPhase::Evening => "evening",
            DayPhase::Night => "night",
        }
    }
}

impl std::fmt::Display for DayPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Derived signals computed by the feature engineering stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Features {
    /// Evapotranspiration proxy in mm/day
    pub evapotranspiration: f64,
    /// Vapor pressure deficit in kPa (Tetens-based)
    pub vpd: f64,
    /// Soil water retention factor (sandy <1, loam ≈1, clay >1)
    pub soil_retention_factor: f64,
    pub soil_behavior: String,
    pub day_phase: DayPhase,
    /// 0-100, combines moisture deficit, ET0 demand and heat excess
    pub water_stress_index: f64,
    /// 0-10, coarse bucket of the stress index
    pub irrigation_urgency: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_phase_hour_mapping() {
        assert_eq!(DayPhase::from_hour(5), DayPhase::Morning);
        assert_eq!(DayPhase::from_hour(10), DayPhase::Morning);
        assert_eq!(DayPhase::from_hour(11), DayPhase::Afternoon);
        assert_eq!(DayPhase::from_hour(16), DayPhase::Afternoon);
        assert_eq!(DayPhase::from_hour(17), DayPhase::Evening);
        assert_eq!(DayPhase::from_hour(21), DayPhase::Evening);
        assert_eq!(DayPhase::from_hour(22), DayPhase::Night);
        assert_eq!(DayPhase::from_hour(0), DayPhase::Night);
    }
}
