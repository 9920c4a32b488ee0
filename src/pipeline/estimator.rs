use super::{PipelineContext, PipelineStage, Stage};
use crate::error::{PlantOpsError, Result};
use crate::models::{CleanedData, Estimation, Features, IrrigationDecision, PlantType};

/// Per-plant irrigation strategy. Every strategy classifies soil
/// moisture into one of four ordered bands, with a stagnation override
/// for water-retaining soils, then scales the base volume by the soil
/// water retention factor.
pub trait IrrigationStrategy: Send + Sync {
    fn plant_type(&self) -> PlantType;

    fn estimate(&self, cleaned: &CleanedData, features: &Features) -> Estimation;
}

/// Volume modulator applied on top of SWRF when the decision is to
/// water at all.
const VOLUME_MODULATOR: f64 = 1.05;

/// SWRF above which a very moist soil risks waterlogging.
const STAGNATION_SWRF: f64 = 1.25;

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn build_estimation(
    decision: IrrigationDecision,
    base_amount: f64,
    swrf: f64,
    reasoning: String,
    confidence: f64,
    soil: &str,
    plant_type: &str,
) -> Estimation {
    let water_amount_ml = if decision == IrrigationDecision::DoNotWater {
        0.0
    } else {
        (base_amount * swrf * VOLUME_MODULATOR).round()
    };

    Estimation {
        should_water: decision != IrrigationDecision::DoNotWater,
        decision,
        water_amount_ml,
        confidence,
        reasoning: format!("{} (Terreno: {})", reasoning, capitalize(soil)),
        plant_type: plant_type.to_string(),
    }
}

/// Tomatoes: optimal range 70-80%, heavy drinkers.
pub struct TomatoStrategy;

impl IrrigationStrategy for TomatoStrategy {
    fn plant_type(&self) -> PlantType {
        PlantType::Tomato
    }

    fn estimate(&self, cleaned: &CleanedData, features: &Features) -> Estimation {
        let moisture = cleaned.soil_moisture;
        let swrf = features.soil_retention_factor;

        let (decision, base, reasoning) = if moisture < 50.0 {
            (
                IrrigationDecision::WaterHeavy,
                2000.0,
                "Suolo troppo secco per pomodori.".to_string(),
            )
        } else if moisture < 60.0 {
            (
                IrrigationDecision::WaterModerate,
                1500.0,
                "Suolo sotto ottimale per pomodori. Irrigazione moderata.".to_string(),
            )
        } else if moisture < 70.0 {
            (
                IrrigationDecision::WaterLight,
                1000.0,
                "Suolo leggermente secco. Irrigazione leggera.".to_string(),
            )
        } else if moisture > 75.0 && swrf > STAGNATION_SWRF {
            (
                IrrigationDecision::DoNotWater,
                0.0,
                format!(
                    "Suolo molto umido ({:.1}%) e {}. Rischio ristagno idrico!",
                    moisture, cleaned.soil
                ),
            )
        } else {
            (
                IrrigationDecision::DoNotWater,
                0.0,
                "Suolo sufficientemente umido. Non irrigare.".to_string(),
            )
        };

        build_estimation(decision, base, swrf, reasoning, 0.85, &cleaned.soil, "tomato")
    }
}

/// Lettuce: needs constantly moist soil (70-85%).
pub struct LettuceStrategy;

impl IrrigationStrategy for LettuceStrategy {
    fn plant_type(&self) -> PlantType {
        PlantType::Lettuce
    }

    fn estimate(&self, cleaned: &CleanedData, features: &Features) -> Estimation {
        let moisture = cleaned.soil_moisture;
        let swrf = features.soil_retention_factor;

        let (decision, base, reasoning) = if moisture < 60.0 {
            (
                IrrigationDecision::WaterHeavy,
                1800.0,
                "Lattuga necessita suolo molto umido. Irrigare abbondantemente.".to_string(),
            )
        } else if moisture < 70.0 {
            (
                IrrigationDecision::WaterModerate,
                1200.0,
                "Suolo sotto ottimale per lattuga.".to_string(),
            )
        } else if moisture < 80.0 {
            (
                IrrigationDecision::WaterLight,
                800.0,
                "Mantenimento umidità per lattuga.".to_string(),
            )
        } else if moisture > 85.0 && swrf > STAGNATION_SWRF {
            (
                IrrigationDecision::DoNotWater,
                0.0,
                format!(
                    "Suolo saturo ({:.1}%) e {}. Rischio ristagno.",
                    moisture, cleaned.soil
                ),
            )
        } else {
            (
                IrrigationDecision::DoNotWater,
                0.0,
                "Suolo ottimale per lattuga.".to_string(),
            )
        };

        build_estimation(decision, base, swrf, reasoning, 0.80, &cleaned.soil, "lettuce")
    }
}

/// Basil: moderately moist soil (55-70%), sensitive to fungus.
pub struct BasilStrategy;

impl IrrigationStrategy for BasilStrategy {
    fn plant_type(&self) -> PlantType {
        PlantType::Basil
    }

    fn estimate(&self, cleaned: &CleanedData, features: &Features) -> Estimation {
        let moisture = cleaned.soil_moisture;
        let swrf = features.soil_retention_factor;

        let (decision, base, reasoning) = if moisture < 45.0 {
            (
                IrrigationDecision::WaterHeavy,
                1500.0,
                "Basilico richiede irrigazione urgente.".to_string(),
            )
        } else if moisture < 55.0 {
            (
                IrrigationDecision::WaterModerate,
                1000.0,
                "Suolo sotto ottimale per basilico.".to_string(),
            )
        } else if moisture < 65.0 {
            (
                IrrigationDecision::WaterLight,
                700.0,
                "Leggera irrigazione per basilico.".to_string(),
            )
        } else if moisture > 75.0 && swrf > STAGNATION_SWRF {
            (
                IrrigationDecision::DoNotWater,
                0.0,
                format!(
                    "Suolo troppo umido ({:.1}%) e {}. Rischio funghi/ristagno.",
                    moisture, cleaned.soil
                ),
            )
        } else {
            (
                IrrigationDecision::DoNotWater,
                0.0,
                "Suolo adeguato per basilico.".to_string(),
            )
        };

        build_estimation(decision, base, swrf, reasoning, 0.78, &cleaned.soil, "basil")
    }
}

/// Fallback strategy driven by urgency and stress index rather than
/// plant-specific moisture bands. Also covers pepper, cucumber,
/// potato, peach and grape.
pub struct GenericStrategy;

impl IrrigationStrategy for GenericStrategy {
    fn plant_type(&self) -> PlantType {
        PlantType::Generic
    }

    fn estimate(&self, cleaned: &CleanedData, features: &Features) -> Estimation {
        let moisture = cleaned.soil_moisture;
        let urgency = features.irrigation_urgency;
        let stress = features.water_stress_index;
        let swrf = features.soil_retention_factor;

        let (decision, base, reasoning) = if urgency >= 8.0 || stress >= 70.0 {
            (
                IrrigationDecision::WaterHeavy,
                2000.0,
                "Alto stress idrico rilevato.".to_string(),
            )
        } else if urgency >= 5.0 || stress >= 50.0 {
            (
                IrrigationDecision::WaterModerate,
                1500.0,
                "Stress idrico moderato.".to_string(),
            )
        } else if urgency >= 3.0 || stress >= 30.0 {
            if swrf < 0.95 {
                (
                    IrrigationDecision::WaterLight,
                    800.0,
                    "Stress idrico dovuto a bassa ritenzione del suolo (Sabbia).".to_string(),
                )
            } else {
                (
                    IrrigationDecision::WaterLight,
                    1000.0,
                    "Leggero stress idrico.".to_string(),
                )
            }
        } else if swrf < 0.95 && urgency >= 2.0 {
            // Sandy soils stress plants earlier: light band starts at
            // urgency 2 instead of 3
            (
                IrrigationDecision::WaterLight,
                800.0,
                "Stress idrico dovuto a bassa ritenzione del suolo (Sabbia).".to_string(),
            )
        } else if moisture > 70.0 && swrf > STAGNATION_SWRF {
            (
                IrrigationDecision::DoNotWater,
                0.0,
                format!(
                    "Suolo umido ({:.1}%) e {}. Rischio ristagno.",
                    moisture, cleaned.soil
                ),
            )
        } else {
            (
                IrrigationDecision::DoNotWater,
                0.0,
                "Condizioni idriche adeguate.".to_string(),
            )
        };

        build_estimation(
            decision,
            base,
            swrf,
            reasoning,
            0.70,
            &cleaned.soil,
            &cleaned.plant_type,
        )
    }
}

/// Resolve a plant type to its strategy. Exhaustive over the closed
/// set; everything without a dedicated strategy shares the generic one.
pub fn strategy_for(plant_type: PlantType) -> Box<dyn IrrigationStrategy> {
    match plant_type {
        PlantType::Tomato => Box::new(TomatoStrategy),
        PlantType::Lettuce => Box::new(LettuceStrategy),
        PlantType::Basil => Box::new(BasilStrategy),
        PlantType::Pepper
        | PlantType::Cucumber
        | PlantType::Potato
        | PlantType::Peach
        | PlantType::Grape
        | PlantType::Generic => Box::new(GenericStrategy),
    }
}

/// Stage 3: strategy-dispatch rule engine producing the watering
/// decision.
pub struct IrrigationEstimator {
    strategy: Box<dyn IrrigationStrategy>,
}

impl IrrigationEstimator {
    pub fn new(plant_type: PlantType) -> Self {
        Self {
            strategy: strategy_for(plant_type),
        }
    }
}

impl Stage for IrrigationEstimator {
    fn name(&self) -> &'static str {
        "Irrigation Estimator"
    }

    fn stage(&self) -> PipelineStage {
        PipelineStage::Estimation
    }

    fn execute(&self, ctx: &mut PipelineContext) -> Result<()> {
        let cleaned = ctx.cleaned.as_ref().ok_or(PlantOpsError::MissingUpstream {
            stage: "estimation",
            field: "cleaned_data",
        })?;
        let features = ctx.features.as_ref().ok_or(PlantOpsError::MissingUpstream {
            stage: "estimation",
            field: "features",
        })?;

        ctx.estimation = Some(self.strategy.estimate(cleaned, features));
        Ok(())
    }
}
