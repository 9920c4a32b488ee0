use serde::{Deserialize, Deserializer, Serialize};

use super::soil::SoilKind;

/// Raw sensor snapshot as supplied by the caller, typically assembled
/// from a persisted plant record plus a live weather lookup.
///
/// Numeric fields are coerced leniently: plain numbers, numeric
/// strings and null are all accepted. A string that does not parse as
/// a number is a structural error and rejects the whole snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SensorSnapshot {
    /// Air temperature in °C
    #[serde(default, deserialize_with = "lenient_f64")]
    pub temperature: Option<f64>,
    /// Relative humidity in %
    #[serde(default, deserialize_with = "lenient_f64")]
    pub humidity: Option<f64>,
    /// Rainfall over the last 24h in mm
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rainfall: Option<f64>,
    /// Illuminance in lux
    #[serde(default, deserialize_with = "lenient_f64")]
    pub light: Option<f64>,
    /// Soil moisture in %
    #[serde(default, deserialize_with = "lenient_f64")]
    pub soil_moisture: Option<f64>,
    /// Free-text soil descriptor ("sabbioso", "argilloso", ...)
    #[serde(default)]
    pub soil: Option<String>,
    /// Free-text plant type, used for fertilizer classification
    #[serde(default)]
    pub plant_type: Option<String>,
    /// Free-text species, fallback when plant_type is absent/generic
    #[serde(default)]
    pub species: Option<String>,
}

fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => Ok(n.as_f64()),
        Some(serde_json::Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed.parse::<f64>().map(Some).map_err(|_| {
                D::Error::custom(format!("non-numeric sensor value '{}'", trimmed))
            })
        }
        Some(other) => Err(D::Error::custom(format!(
            "expected a number, got {}",
            other
        ))),
    }
}

/// Normalized sensor data produced by the cleaning stage. Every field
/// is a finite value; missing inputs were replaced by documented
/// defaults, implausible ones clamped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanedData {
    pub temperature: f64,
    pub humidity: f64,
    pub rainfall: f64,
    pub light: f64,
    pub soil_moisture: f64,
    /// Lower-cased soil descriptor, "universale" when absent
    pub soil: String,
    pub soil_kind: SoilKind,
    /// Strategy tag the pipeline was built for
    pub plant_type: String,
}
