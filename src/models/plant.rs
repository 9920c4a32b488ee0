use serde::{Deserialize, Serialize};

/// Closed set of plant types the strategy registry knows about.
/// Unknown identifiers resolve to `Generic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlantType {
    Tomato,
    Lettuce,
    Basil,
    Pepper,
    Cucumber,
    Potato,
    Peach,
    Grape,
    Generic,
}

impl PlantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlantType::Tomato => "tomato",
            PlantType::Lettuce => "lettuce",
            PlantType::Basil => "basil",
            PlantType::Pepper => "pepper",
            PlantType::Cucumber => "cucumber",
            PlantType::Potato => "potato",
            PlantType::Peach => "peach",
            PlantType::Grape => "grape",
            PlantType::Generic => "generic",
        }
    }

    /// Resolve a free-text species or plant-type string to a strategy
    /// key. Case-insensitive substring matching over Italian and
    /// English names, defaulting to `Generic`.
    pub fn resolve(input: &str) -> Self {
        let s = input.to_lowercase();
        if s.contains("pomodoro") || s.contains("tomato") {
            PlantType::Tomato
        } else if s.contains("lattuga") || s.contains("lettuce") {
            PlantType::Lettuce
        } else if s.contains("basilico") || s.contains("basil") {
            PlantType::Basil
        } else if s.contains("peperone") || s.contains("pepper") {
            PlantType::Pepper
        } else if s.contains("cetriolo") || s.contains("cucumber") {
            PlantType::Cucumber
        } else if s.contains("patata") || s.contains("potato") {
            PlantType::Potato
        } else if s.contains("pesca") || s.contains("pesco") || s.contains("peach") {
            PlantType::Peach
        } else if s.contains("uva") || s.contains("vite") || s.contains("grape") {
            PlantType::Grape
        } else {
            PlantType::Generic
        }
    }
}

impl std::fmt::Display for PlantType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for PlantType {
    fn default() -> Self {
        PlantType::Generic
    }
}
