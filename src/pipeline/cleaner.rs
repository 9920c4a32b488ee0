use super::{PipelineContext, PipelineStage, Stage};
use crate::error::Result;
use crate::models::{CleanedData, PlantType, SoilKind};

/// Stage 1: validates and normalizes raw sensor fields.
///
/// Missing readings are replaced by the caller-facing defaults,
/// implausible ones clamped to sensor-plausible ranges. The free-text
/// soil descriptor is lower-cased and classified.
pub struct DataCleaner {
    plant_type: PlantType,
}

/// Default values applied when a reading is absent, matching the
/// fallback snapshot the original caller assembles without weather.
const DEFAULT_TEMPERATURE: f64 = 20.0;
const DEFAULT_HUMIDITY: f64 = 50.0;
const DEFAULT_RAINFALL: f64 = 0.0;
const DEFAULT_LIGHT: f64 = 10_000.0;
const DEFAULT_SOIL_MOISTURE: f64 = 50.0;
const DEFAULT_SOIL: &str = "universale";

impl DataCleaner {
    pub fn new(plant_type: PlantType) -> Self {
        Self { plant_type }
    }

    fn repair(value: Option<f64>, default: f64, min: f64, max: f64) -> f64 {
        match value {
            Some(v) if v.is_finite() => v.clamp(min, max),
            _ => default,
        }
    }
}

impl Stage for DataCleaner {
    fn name(&self) -> &'static str {
        "Data Cleaner"
    }

    fn stage(&self) -> PipelineStage {
        PipelineStage::Cleaning
    }

    fn execute(&self, ctx: &mut PipelineContext) -> Result<()> {
        let raw = &ctx.raw;

        let soil = raw
            .soil
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SOIL.to_string());

        let cleaned = CleanedData {
            temperature: Self::repair(raw.temperature, DEFAULT_TEMPERATURE, -30.0, 60.0),
            humidity: Self::repair(raw.humidity, DEFAULT_HUMIDITY, 0.0, 100.0),
            rainfall: Self::repair(raw.rainfall, DEFAULT_RAINFALL, 0.0, 500.0),
            light: Self::repair(raw.light, DEFAULT_LIGHT, 0.0, 150_000.0),
            soil_moisture: Self::repair(raw.soil_moisture, DEFAULT_SOIL_MOISTURE, 0.0, 100.0),
            soil_kind: SoilKind::classify(&soil),
            soil,
            plant_type: self.plant_type.as_str().to_string(),
        };

        ctx.cleaned = Some(cleaned);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SensorSnapshot;

    fn run(snapshot: SensorSnapshot) -> CleanedData {
        let mut ctx = PipelineContext::new(snapshot);
        DataCleaner::new(PlantType::Generic)
            .execute(&mut ctx)
            .unwrap();
        ctx.cleaned.unwrap()
    }

    #[test]
    fn empty_snapshot_gets_documented_defaults() {
        let cleaned = run(SensorSnapshot::default());
        assert_eq!(cleaned.temperature, 20.0);
        assert_eq!(cleaned.humidity, 50.0);
        assert_eq!(cleaned.rainfall, 0.0);
        assert_eq!(cleaned.light, 10_000.0);
        assert_eq!(cleaned.soil_moisture, 50.0);
        assert_eq!(cleaned.soil, "universale");
        assert_eq!(cleaned.soil_kind, SoilKind::Loam);
        assert_eq!(cleaned.plant_type, "generic");
    }

    #[test]
    fn implausible_values_are_clamped() {
        let cleaned = run(SensorSnapshot {
            temperature: Some(120.0),
            humidity: Some(-5.0),
            rainfall: Some(9000.0),
            light: Some(1e9),
            soil_moisture: Some(250.0),
            ..Default::default()
        });
        assert_eq!(cleaned.temperature, 60.0);
        assert_eq!(cleaned.humidity, 0.0);
        assert_eq!(cleaned.rainfall, 500.0);
        assert_eq!(cleaned.light, 150_000.0);
        assert_eq!(cleaned.soil_moisture, 100.0);
    }

    #[test]
    fn non_finite_values_fall_back_to_defaults() {
        let cleaned = run(SensorSnapshot {
            temperature: Some(f64::NAN),
            humidity: Some(f64::INFINITY),
            ..Default::default()
        });
        assert_eq!(cleaned.temperature, 20.0);
        assert_eq!(cleaned.humidity, 50.0);
    }

    #[test]
    fn soil_descriptor_is_normalized_and_classified() {
        let cleaned = run(SensorSnapshot {
            soil: Some("  Argilloso Pesante ".to_string()),
            ..Default::default()
        });
        assert_eq!(cleaned.soil, "argilloso pesante");
        assert_eq!(cleaned.soil_kind, SoilKind::Clay);
    }
}
