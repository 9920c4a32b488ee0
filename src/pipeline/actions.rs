use chrono::Utc;

use super::{PipelineContext, PipelineStage, Stage};
use crate::error::{PlantOpsError, Result};
use crate::models::{
    CleanedData, DayPhase, Estimation, Features, FertilizerEstimate, FrequencyEstimate,
    MainAction, Priority, SecondaryAction, SoilKind, Suggestions, TimingAdvice,
};

/// Stage 5: synthesizes the final user-facing recommendation from the
/// accumulated context. Five independent facets, all pure functions of
/// the context at this point.
pub struct ActionGenerator;

/// Bilingual keyword lists for fertilizer-demand classification.
const HIGH_FEEDERS: &[&str] = &[
    "tomato", "pomodoro", "pepper", "peperone", "cucumber", "cetriolo", "zucchini", "zucchina",
    "eggplant", "melanzana", "potato", "patata", "rose", "rosa", "citrus", "limone", "arancio",
];

const LOW_FEEDERS: &[&str] = &[
    "basil", "basilico", "lettuce", "lattuga", "salad", "insalata", "succulent", "grassa",
    "cactus", "herb", "aromatica", "prezzemolo", "rosmarino", "salvia",
];

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn main_action(estimation: &Estimation) -> MainAction {
    let liters = estimation.water_amount_ml / 1000.0;
    let description = if estimation.should_water {
        format!("Consigliata irrigazione di circa {:.1} litri.", liters)
    } else {
        "Non irrigare. Il livello di umidità è sufficiente.".to_string()
    };

    MainAction {
        action: if estimation.should_water {
            "irrigate".to_string()
        } else {
            "do_not_irrigate".to_string()
        },
        decision: estimation.decision,
        water_amount_ml: estimation.water_amount_ml,
        water_amount_liters: round2(liters),
        reasoning: estimation.reasoning.clone(),
        confidence: estimation.confidence,
        description,
    }
}

fn secondary_actions(cleaned: &CleanedData) -> Vec<SecondaryAction> {
    let mut actions = Vec::new();
    if cleaned.temperature > 30.0 {
        actions.push(SecondaryAction {
            kind: "preventive".to_string(),
            action: "Ombreggiare".to_string(),
            reason: "Caldo estremo".to_string(),
        });
    }
    actions
}

fn timing(features: &Features) -> TimingAdvice {
    let suggested_time = match features.day_phase {
        DayPhase::Morning => "ora (mattino)",
        DayPhase::Evening => "ora (sera)",
        _ => "domani mattina o stasera",
    };

    TimingAdvice {
        suggested_time: suggested_time.to_string(),
        next_window: Utc::now(),
        current_phase: features.day_phase,
        ideal_hours: vec!["06:00-09:00".to_string()],
    }
}

fn frequency(features: &Features) -> FrequencyEstimate {
    let et0 = features.evapotranspiration;
    let swrf = features.soil_retention_factor;

    let base_days = if et0 > 0.0 { (4.0 / et0).max(1.0) } else { 7.0 };
    let adjusted_days = base_days * swrf;

    let (label, detail) = if adjusted_days <= 1.5 {
        ("ALTA", "Ogni 1-2 giorni")
    } else if adjusted_days <= 3.0 {
        ("MEDIA-ALTA", "Ogni 2-3 giorni")
    } else if adjusted_days <= 5.0 {
        ("MEDIA", "Ogni 3-5 giorni")
    } else {
        ("BASSA", "Settimanale")
    };

    FrequencyEstimate {
        label: label.to_string(),
        detail: detail.to_string(),
        icon: label.to_lowercase(),
        reasoning: format!(
            "Frequenza basata su ET0 ({} mm/g) e Ritenzione Suolo ({}x).",
            et0, swrf
        ),
    }
}

fn fertilizer(ctx: &PipelineContext, cleaned: &CleanedData) -> FertilizerEstimate {
    // Prefer the raw plant_type; fall back to species when the caller
    // only resolved a generic strategy tag.
    let mut plant_input = ctx
        .raw
        .plant_type
        .as_deref()
        .unwrap_or("generic")
        .to_lowercase();
    if plant_input == "generic" {
        if let Some(species) = ctx.raw.species.as_deref() {
            plant_input = species.to_lowercase();
        }
    }

    let is_high_feeder = HIGH_FEEDERS.iter().any(|p| plant_input.contains(p));
    let is_low_feeder = LOW_FEEDERS.iter().any(|p| plant_input.contains(p));

    let (product, base_days, plant_desc) = if is_high_feeder {
        (
            "NPK Ricco (es. 20-20-20) o Stallatico",
            14u32,
            "Pianta esigente (High Feeder).",
        )
    } else if is_low_feeder {
        (
            "Bilanciato Leggero (es. 5-5-5)",
            30,
            "Pianta poco esigente (Low Feeder).",
        )
    } else {
        ("Universale NPK", 21, "Fabbisogno standard.")
    };

    let (interval_days, reasoning) = match cleaned.soil_kind {
        SoilKind::Sandy => (
            // Nutrients leach faster: shorter interval, 7-day floor
            ((base_days as f64 * 0.7) as u32).max(7),
            format!(
                "{} Terreno SABBIOSO: alto dilavamento. Dosi ridotte ma frequenti.",
                plant_desc
            ),
        ),
        SoilKind::Clay => (
            (base_days as f64 * 1.4) as u32,
            format!(
                "{} Terreno ARGILLOSO: trattiene i sali. Concimare più raramente.",
                plant_desc
            ),
        ),
        SoilKind::Loam | SoilKind::Other => (
            base_days,
            format!("{} Terreno equilibrato: frequenza standard.", plant_desc),
        ),
    };

    FertilizerEstimate {
        frequency: format!("Ogni {} giorni", interval_days),
        interval_days,
        product: product.to_string(),
        reasoning,
    }
}

fn priority(features: &Features) -> Priority {
    if features.irrigation_urgency >= 8.0 {
        Priority::Urgent
    } else if features.irrigation_urgency >= 5.0 {
        Priority::High
    } else {
        Priority::Medium
    }
}

impl Stage for ActionGenerator {
    fn name(&self) -> &'static str {
        "Action Generator"
    }

    fn stage(&self) -> PipelineStage {
        PipelineStage::ActionGeneration
    }

    fn execute(&self, ctx: &mut PipelineContext) -> Result<()> {
        let estimation = ctx.estimation.as_ref().ok_or(PlantOpsError::MissingUpstream {
            stage: "action_generation",
            field: "estimation",
        })?;
        let cleaned = ctx.cleaned.as_ref().ok_or(PlantOpsError::MissingUpstream {
            stage: "action_generation",
            field: "cleaned_data",
        })?;
        let features = ctx.features.as_ref().ok_or(PlantOpsError::MissingUpstream {
            stage: "action_generation",
            field: "features",
        })?;

        let suggestions = Suggestions {
            main_action: main_action(estimation),
            secondary_actions: secondary_actions(cleaned),
            timing: timing(features),
            frequency_estimation: frequency(features),
            fertilizer_estimation: fertilizer(ctx, cleaned),
            notes: ctx.warnings.clone(),
            priority: priority(features),
            generated_at: Utc::now(),
        };

        ctx.suggestions = Some(suggestions);
        Ok(())
    }
}
