use chrono::{Local, Timelike};

use super::{PipelineContext, PipelineStage, Stage};
use crate::error::{PlantOpsError, Result};
use crate::models::{CleanedData, DayPhase, Features};

/// Stage 2: derives physically-motivated secondary quantities from the
/// cleaned sensor data.
pub struct FeatureEngineer;

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Evapotranspiration proxy in mm/day. Not a full Penman-Monteith;
/// monotonic in the right directions: hotter, brighter and drier air
/// all increase the value.
pub fn evapotranspiration_proxy(temperature: f64, humidity: f64, light: f64) -> f64 {
    let thermal = (temperature - 5.0).max(0.0) * 0.09;
    let radiant = (light / 25_000.0).min(4.0);
    let dryness = (1.0 - humidity / 100.0).max(0.05);
    round2((thermal + radiant) * (0.4 + dryness))
}

/// Vapor pressure deficit in kPa, Tetens saturation curve.
pub fn vapor_pressure_deficit(temperature: f64, humidity: f64) -> f64 {
    let svp = 0.6108 * (17.27 * temperature / (temperature + 237.3)).exp();
    round2(svp * (1.0 - humidity / 100.0).max(0.0))
}

/// Water stress index in [0, 100]: moisture deficit plus atmospheric
/// demand and heat excess, relieved by recent rainfall.
pub fn water_stress_index(soil_moisture: f64, et0: f64, rainfall: f64, temperature: f64) -> f64 {
    let deficit = (100.0 - soil_moisture) * 0.6;
    let demand = et0 * 6.0;
    let heat = (temperature - 30.0).max(0.0) * 1.5;
    let relief = (rainfall * 2.0).min(30.0);
    round2((deficit + demand + heat - relief).clamp(0.0, 100.0))
}

/// Irrigation urgency in [0, 10], coarse bucket of the stress index.
pub fn irrigation_urgency(stress_index: f64) -> f64 {
    (stress_index / 10.0).round().clamp(0.0, 10.0)
}

impl FeatureEngineer {
    fn derive(cleaned: &CleanedData, hour: u32) -> Features {
        let et0 =
            evapotranspiration_proxy(cleaned.temperature, cleaned.humidity, cleaned.light);
        let stress = water_stress_index(
            cleaned.soil_moisture,
            et0,
            cleaned.rainfall,
            cleaned.temperature,
        );

        Features {
            evapotranspiration: et0,
            vpd: vapor_pressure_deficit(cleaned.temperature, cleaned.humidity),
            soil_retention_factor: cleaned.soil_kind.swrf(),
            soil_behavior: cleaned.soil_kind.behavior().to_string(),
            day_phase: DayPhase::from_hour(hour),
            water_stress_index: stress,
            irrigation_urgency: irrigation_urgency(stress),
        }
    }
}

impl Stage for FeatureEngineer {
    fn name(&self) -> &'static str {
        "Feature Engineer"
    }

    fn stage(&self) -> PipelineStage {
        PipelineStage::FeatureEngineering
    }

    fn execute(&self, ctx: &mut PipelineContext) -> Result<()> {
        let cleaned = ctx.cleaned.as_ref().ok_or(PlantOpsError::MissingUpstream {
            stage: "feature_engineering",
            field: "cleaned_data",
        })?;

        ctx.features = Some(Self::derive(cleaned, Local::now().hour()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SoilKind;

    fn cleaned(temperature: f64, humidity: f64, light: f64, moisture: f64) -> CleanedData {
        CleanedData {
            temperature,
            humidity,
            rainfall: 0.0,
            light,
            soil_moisture: moisture,
            soil: "universale".to_string(),
            soil_kind: SoilKind::Loam,
            plant_type: "generic".to_string(),
        }
    }

    #[test]
    fn et0_increases_with_heat_light_and_dry_air() {
        let base = evapotranspiration_proxy(20.0, 50.0, 10_000.0);
        assert!(evapotranspiration_proxy(30.0, 50.0, 10_000.0) > base);
        assert!(evapotranspiration_proxy(20.0, 50.0, 50_000.0) > base);
        assert!(evapotranspiration_proxy(20.0, 20.0, 10_000.0) > base);
        assert!(evapotranspiration_proxy(20.0, 90.0, 10_000.0) < base);
    }

    #[test]
    fn stress_index_stays_in_bounds() {
        assert_eq!(water_stress_index(100.0, 0.0, 50.0, 10.0), 0.0);
        assert_eq!(water_stress_index(0.0, 10.0, 0.0, 45.0), 100.0);
        let mid = water_stress_index(50.0, 1.5, 0.0, 25.0);
        assert!(mid > 0.0 && mid < 100.0);
    }

    #[test]
    fn rainfall_relieves_stress() {
        let dry = water_stress_index(40.0, 2.0, 0.0, 25.0);
        let wet = water_stress_index(40.0, 2.0, 10.0, 25.0);
        assert!(wet < dry);
    }

    #[test]
    fn urgency_buckets_stress() {
        assert_eq!(irrigation_urgency(0.0), 0.0);
        assert_eq!(irrigation_urgency(47.0), 5.0);
        assert_eq!(irrigation_urgency(100.0), 10.0);
    }

    #[test]
    fn derives_soil_features_from_soil_kind() {
        let mut data = cleaned(20.0, 50.0, 10_000.0, 50.0);
        data.soil = "sabbioso".to_string();
        data.soil_kind = SoilKind::Sandy;
        let features = FeatureEngineer::derive(&data, 8);
        assert_eq!(features.soil_retention_factor, 0.7);
        assert_eq!(features.soil_behavior, SoilKind::Sandy.behavior());
        assert_eq!(features.day_phase, DayPhase::Morning);
    }

    #[test]
    fn fails_fast_without_cleaned_data() {
        let mut ctx = PipelineContext::new(Default::default());
        let err = FeatureEngineer.execute(&mut ctx).unwrap_err();
        assert!(err.is_validation());
    }
}
