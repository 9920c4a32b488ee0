use std::time::Instant;

use chrono::Utc;
use tracing::{debug, warn};

use super::actions::ActionGenerator;
use super::anomaly::AnomalyDetector;
use super::cleaner::DataCleaner;
use super::estimator::IrrigationEstimator;
use super::features::FeatureEngineer;
use super::{PipelineContext, Stage};
use crate::error::Result;
use crate::models::{
    IrrigationSuggestion, PipelineStatus, PlantType, Report, ReportDetails, ReportMetadata,
    SensorSnapshot, StageResult, StageStatus,
};

/// Orchestrates the fixed stage sequence for one plant type and
/// assembles the final report. Built fresh per request; holds no state
/// across invocations.
pub struct PipelineManager {
    plant_type: PlantType,
    stages: Vec<Box<dyn Stage>>,
}

impl PipelineManager {
    pub fn new(plant_type: PlantType) -> Self {
        let stages: Vec<Box<dyn Stage>> = vec![
            Box::new(DataCleaner::new(plant_type)),
            Box::new(FeatureEngineer),
            Box::new(IrrigationEstimator::new(plant_type)),
            Box::new(AnomalyDetector),
            Box::new(ActionGenerator),
        ];

        Self { plant_type, stages }
    }

    pub fn plant_type(&self) -> PlantType {
        self.plant_type
    }

    /// Run the full stage chain over one sensor snapshot.
    ///
    /// Stage failures never propagate: the run short-circuits, the
    /// triggering error lands in `metadata.errors` and partial details
    /// are retained for diagnostics.
    pub fn process(&self, raw: SensorSnapshot) -> Report {
        let started_at = Utc::now();
        let mut ctx = PipelineContext::new(raw);
        let mut stage_results = Vec::with_capacity(self.stages.len());
        let mut errors = Vec::new();

        for stage in &self.stages {
            let clock = Instant::now();
            let outcome = stage.execute(&mut ctx);
            let duration_ms = clock.elapsed().as_secs_f64() * 1000.0;

            match outcome {
                Ok(()) => {
                    debug!(stage = stage.stage().as_str(), duration_ms, "stage completed");
                    stage_results.push(StageResult {
                        stage: stage.stage().as_str().to_string(),
                        name: stage.name().to_string(),
                        status: StageStatus::Completed,
                        duration_ms,
                        error: None,
                    });
                }
                Err(e) => {
                    warn!(stage = stage.stage().as_str(), error = %e, "stage failed, aborting run");
                    stage_results.push(StageResult {
                        stage: stage.stage().as_str().to_string(),
                        name: stage.name().to_string(),
                        status: StageStatus::Failed,
                        duration_ms,
                        error: Some(e.to_string()),
                    });
                    errors.push(e.to_string());
                    break;
                }
            }
        }

        let status = if errors.is_empty() {
            PipelineStatus::Success
        } else {
            PipelineStatus::Error
        };

        let suggestion = ctx.suggestions.as_ref().map(|s| IrrigationSuggestion {
            should_water: s.main_action.action == "irrigate",
            water_amount_liters: s.main_action.water_amount_liters,
            decision: s.main_action.decision.as_str().to_string(),
            description: s.main_action.description.clone(),
            timing: s.timing.suggested_time.clone(),
            priority: s.priority,
            frequency_estimation: s.frequency_estimation.clone(),
            fertilizer_estimation: s.fertilizer_estimation.clone(),
        });

        Report {
            status,
            suggestion,
            details: ReportDetails {
                cleaned_data: ctx.cleaned,
                features: ctx.features,
                estimation: ctx.estimation,
                anomalies: ctx.warnings.clone(),
                full_suggestions: ctx.suggestions,
            },
            metadata: ReportMetadata {
                started_at,
                completed_at: Utc::now(),
                errors,
                warnings: ctx.warnings,
                stage_results,
            },
        }
    }

    /// Parse a JSON sensor snapshot and run the pipeline. Parse
    /// failures surface as validation errors for the caller to map to
    /// a bad request.
    pub fn process_json(&self, json: &str) -> Result<Report> {
        let raw: SensorSnapshot = serde_json::from_str(json)?;
        Ok(self.process(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IrrigationDecision;

    fn snapshot(moisture: f64, soil: &str) -> SensorSnapshot {
        SensorSnapshot {
            temperature: Some(24.0),
            humidity: Some(55.0),
            rainfall: Some(0.0),
            light: Some(20_000.0),
            soil_moisture: Some(moisture),
            soil: Some(soil.to_string()),
            plant_type: Some("pomodoro".to_string()),
            species: Some("Pomodoro San Marzano".to_string()),
        }
    }

    #[test]
    fn successful_run_fills_every_detail_field() {
        let manager = PipelineManager::new(PlantType::Tomato);
        let report = manager.process(snapshot(40.0, "argilloso"));

        assert!(report.is_success());
        assert!(report.details.cleaned_data.is_some());
        assert!(report.details.features.is_some());
        assert!(report.details.estimation.is_some());
        assert!(report.details.full_suggestions.is_some());
        assert!(report.metadata.errors.is_empty());
        assert_eq!(report.metadata.stage_results.len(), 5);
        assert!(report
            .metadata
            .stage_results
            .iter()
            .all(|r| r.status == StageStatus::Completed));
    }

    #[test]
    fn tomato_on_dry_clay_waters_heavily() {
        let manager = PipelineManager::new(PlantType::Tomato);
        let report = manager.process(snapshot(40.0, "argilloso"));

        let estimation = report.details.estimation.as_ref().unwrap();
        assert_eq!(estimation.decision, IrrigationDecision::WaterHeavy);
        assert_eq!(estimation.water_amount_ml, 2940.0);

        let suggestion = report.suggestion.as_ref().unwrap();
        assert!(suggestion.should_water);
        assert_eq!(suggestion.decision, "water_heavy");
        assert_eq!(suggestion.water_amount_liters, 2.94);
    }

    #[test]
    fn liters_round_trip_matches_milliliters() {
        let manager = PipelineManager::new(PlantType::Lettuce);
        let report = manager.process(snapshot(55.0, "sabbioso"));

        let ml = report.details.estimation.as_ref().unwrap().water_amount_ml;
        let liters = report.suggestion.as_ref().unwrap().water_amount_liters;
        assert_eq!(liters, (ml / 1000.0 * 100.0).round() / 100.0);
    }

    #[test]
    fn wet_clay_triggers_stagnation_do_not_water() {
        let manager = PipelineManager::new(PlantType::Tomato);
        let report = manager.process(snapshot(80.0, "argilloso"));

        let estimation = report.details.estimation.as_ref().unwrap();
        assert_eq!(estimation.decision, IrrigationDecision::DoNotWater);
        assert_eq!(estimation.water_amount_ml, 0.0);
        assert!(estimation.reasoning.contains("ristagno"));
        assert!(!report.suggestion.as_ref().unwrap().should_water);
    }

    #[test]
    fn unknown_plant_runs_generic_strategy_without_error() {
        let manager = PipelineManager::new(PlantType::resolve("orchid"));
        let report = manager.process(SensorSnapshot {
            plant_type: Some("orchid".to_string()),
            ..Default::default()
        });

        assert!(report.is_success());
        let suggestion = report.suggestion.as_ref().unwrap();
        assert_eq!(suggestion.fertilizer_estimation.interval_days, 21);
        assert_eq!(
            report.details.estimation.as_ref().unwrap().plant_type,
            "generic"
        );
    }

    #[test]
    fn identical_input_yields_identical_decisions() {
        let manager = PipelineManager::new(PlantType::Basil);
        let a = manager.process(snapshot(48.0, "universale"));
        let b = PipelineManager::new(PlantType::Basil).process(snapshot(48.0, "universale"));

        assert_eq!(a.details.cleaned_data, b.details.cleaned_data);
        assert_eq!(a.details.features, b.details.features);
        assert_eq!(a.details.estimation, b.details.estimation);
        assert_eq!(a.suggestion, b.suggestion);
    }

    #[test]
    fn stage_failure_short_circuits_and_keeps_partial_details() {
        // A chain missing the cleaner violates the estimator's
        // upstream contract on the second stage.
        let manager = PipelineManager {
            plant_type: PlantType::Tomato,
            stages: vec![
                Box::new(FeatureEngineer),
                Box::new(IrrigationEstimator::new(PlantType::Tomato)),
            ],
        };
        let report = manager.process(snapshot(40.0, "universale"));

        assert_eq!(report.status, PipelineStatus::Error);
        assert!(report.suggestion.is_none());
        assert!(report.details.cleaned_data.is_none());
        assert_eq!(report.metadata.stage_results.len(), 1);
        assert_eq!(report.metadata.stage_results[0].status, StageStatus::Failed);
        assert_eq!(report.metadata.errors.len(), 1);
        assert!(report.metadata.errors[0].contains("cleaned_data"));
    }

    #[test]
    fn process_json_accepts_lenient_numerics_and_rejects_garbage() {
        let manager = PipelineManager::new(PlantType::Generic);

        let report = manager
            .process_json(r#"{"temperature": "23.5", "soil_moisture": 40, "soil": "sabbioso"}"#)
            .unwrap();
        assert!(report.is_success());

        let err = manager.process_json(r#"{"temperature": "molto caldo"}"#).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn anomalies_surface_in_report_and_notes() {
        let mut snap = snapshot(40.0, "universale");
        snap.temperature = Some(43.0);
        let report = PipelineManager::new(PlantType::Tomato).process(snap);

        assert!(report.is_success());
        assert!(!report.details.anomalies.is_empty());
        assert_eq!(report.details.anomalies, report.metadata.warnings);
        let notes = &report.details.full_suggestions.as_ref().unwrap().notes;
        assert_eq!(notes, &report.metadata.warnings);
    }
}
