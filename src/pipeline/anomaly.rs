use super::{PipelineContext, PipelineStage, Stage};
use crate::error::{PlantOpsError, Result};

/// Stage 4: scans cleaned data and features for out-of-bound or
/// contradictory readings. Advisory only; anomalies append warnings
/// and never fail the run.
pub struct AnomalyDetector;

impl Stage for AnomalyDetector {
    fn name(&self) -> &'static str {
        "Anomaly Detector"
    }

    fn stage(&self) -> PipelineStage {
        PipelineStage::AnomalyDetection
    }

    fn execute(&self, ctx: &mut PipelineContext) -> Result<()> {
        let cleaned = ctx.cleaned.as_ref().ok_or(PlantOpsError::MissingUpstream {
            stage: "anomaly_detection",
            field: "cleaned_data",
        })?;
        let features = ctx.features.as_ref().ok_or(PlantOpsError::MissingUpstream {
            stage: "anomaly_detection",
            field: "features",
        })?;

        let mut warnings = Vec::new();

        if cleaned.temperature > 40.0 {
            warnings.push(format!(
                "Temperatura estrema rilevata ({:.1}°C): rischio stress termico.",
                cleaned.temperature
            ));
        }
        if cleaned.temperature < 0.0 {
            warnings.push(format!(
                "Temperatura sotto zero ({:.1}°C): rischio gelata.",
                cleaned.temperature
            ));
        }
        if cleaned.rainfall > 10.0 && cleaned.soil_moisture < 15.0 {
            warnings.push(format!(
                "Pioggia rilevata ({:.1} mm) ma suolo molto secco ({:.1}%): possibile sensore di umidità guasto.",
                cleaned.rainfall, cleaned.soil_moisture
            ));
        }
        if cleaned.soil_moisture > 95.0 && cleaned.humidity < 20.0 {
            warnings.push(format!(
                "Suolo saturo ({:.1}%) con aria molto secca ({:.1}%): lettura sospetta.",
                cleaned.soil_moisture, cleaned.humidity
            ));
        }
        if cleaned.light > 100_000.0 {
            warnings.push(format!(
                "Luminosità fuori scala ({:.0} lux): verificare il sensore.",
                cleaned.light
            ));
        }
        if features.vpd > 2.5 {
            warnings.push(format!(
                "Deficit di pressione di vapore elevato ({:.2} kPa): traspirazione accelerata.",
                features.vpd
            ));
        }
        if features.water_stress_index >= 80.0 {
            warnings.push(format!(
                "Indice di stress idrico critico ({:.0}/100).",
                features.water_stress_index
            ));
        }

        ctx.warnings.extend(warnings);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CleanedData, DayPhase, Features, SoilKind};

    fn context(temperature: f64, rainfall: f64, moisture: f64) -> PipelineContext {
        let mut ctx = PipelineContext::new(Default::default());
        ctx.cleaned = Some(CleanedData {
            temperature,
            humidity: 50.0,
            rainfall,
            light: 10_000.0,
            soil_moisture: moisture,
            soil: "universale".to_string(),
            soil_kind: SoilKind::Loam,
            plant_type: "generic".to_string(),
        });
        ctx.features = Some(Features {
            evapotranspiration: 1.5,
            vpd: 1.0,
            soil_retention_factor: 1.0,
            soil_behavior: SoilKind::Loam.behavior().to_string(),
            day_phase: DayPhase::Morning,
            water_stress_index: 40.0,
            irrigation_urgency: 4.0,
        });
        ctx
    }

    #[test]
    fn nominal_conditions_produce_no_warnings() {
        let mut ctx = context(22.0, 0.0, 50.0);
        AnomalyDetector.execute(&mut ctx).unwrap();
        assert!(ctx.warnings.is_empty());
    }

    #[test]
    fn extreme_heat_is_flagged() {
        let mut ctx = context(43.0, 0.0, 50.0);
        AnomalyDetector.execute(&mut ctx).unwrap();
        assert!(ctx.warnings.iter().any(|w| w.contains("Temperatura estrema")));
    }

    #[test]
    fn rain_with_dry_soil_suggests_sensor_fault() {
        let mut ctx = context(22.0, 15.0, 10.0);
        AnomalyDetector.execute(&mut ctx).unwrap();
        assert!(ctx.warnings.iter().any(|w| w.contains("sensore")));
    }

    #[test]
    fn anomalies_never_fail_the_stage() {
        // Wildly anomalous but structurally valid data still returns Ok
        let mut ctx = context(59.0, 400.0, 0.0);
        ctx.features.as_mut().unwrap().water_stress_index = 95.0;
        assert!(AnomalyDetector.execute(&mut ctx).is_ok());
        assert!(!ctx.warnings.is_empty());
    }

    #[test]
    fn warnings_are_appended_not_replaced() {
        let mut ctx = context(43.0, 0.0, 50.0);
        ctx.warnings.push("preesistente".to_string());
        AnomalyDetector.execute(&mut ctx).unwrap();
        assert_eq!(ctx.warnings[0], "preesistente");
        assert!(ctx.warnings.len() > 1);
    }
}
