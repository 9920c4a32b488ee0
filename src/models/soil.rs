use serde::{Deserialize, Serialize};

/// Canonical soil class derived from the free-text descriptor supplied
/// by the caller. Drives the soil water retention factor (SWRF) used
/// throughout the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoilKind {
    Sandy,
    Clay,
    Loam,
    Other,
}

impl SoilKind {
    /// Classify a lower-cased soil descriptor by keyword.
    /// Descriptors are bilingual (Italian/English) free text.
    pub fn classify(descriptor: &str) -> Self {
        let d = descriptor.to_lowercase();
        if d.contains("sabbi") || d.contains("sand") {
            SoilKind::Sandy
        } else if d.contains("argill") || d.contains("clay") {
            SoilKind::Clay
        } else if d.contains("universale") || d.contains("franco") || d.contains("loam") {
            SoilKind::Loam
        } else {
            SoilKind::Other
        }
    }

    /// Soil water retention factor: multiplicative scalar applied to
    /// irrigation volumes and frequency. Sandy drains fast (<1.0),
    /// clay retains water (>1.0), loam is the reference.
    pub fn swrf(&self) -> f64 {
        match self {
            SoilKind::Sandy => 0.7,
            SoilKind::Clay => 1.4,
            SoilKind::Loam => 1.0,
            SoilKind::Other => 1.0,
        }
    }

    /// Qualitative behavior descriptor shown in the feature block.
    pub fn behavior(&self) -> &'static str {
        match self {
            SoilKind::Sandy => "Drenaggio rapido, bassa ritenzione idrica",
            SoilKind::Clay => "Drenaggio lento, alta ritenzione idrica",
            SoilKind::Loam => "Ritenzione equilibrata",
            SoilKind::Other => "Comportamento non classificato",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SoilKind::Sandy => "sandy",
            SoilKind::Clay => "clay",
            SoilKind::Loam => "loam",
            SoilKind::Other => "other",
        }
    }
}

impl std::fmt::Display for SoilKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_bilingual_keywords() {
        assert_eq!(SoilKind::classify("sabbioso"), SoilKind::Sandy);
        assert_eq!(SoilKind::classify("terreno con sabbia"), SoilKind::Sandy);
        assert_eq!(SoilKind::classify("Sandy loam"), SoilKind::Sandy);
        assert_eq!(SoilKind::classify("argilloso"), SoilKind::Clay);
        assert_eq!(SoilKind::classify("argilla pesante"), SoilKind::Clay);
        assert_eq!(SoilKind::classify("clay"), SoilKind::Clay);
        assert_eq!(SoilKind::classify("universale"), SoilKind::Loam);
        assert_eq!(SoilKind::classify("franco limoso"), SoilKind::Loam);
        assert_eq!(SoilKind::classify("torboso"), SoilKind::Other);
    }

    #[test]
    fn swrf_ordering() {
        // sandy < loam < clay, unknown falls back to neutral
        assert!(SoilKind::Sandy.swrf() < SoilKind::Loam.swrf());
        assert!(SoilKind::Loam.swrf() < SoilKind::Clay.swrf());
        assert_eq!(SoilKind::Other.swrf(), 1.0);
    }

    #[test]
    fn swrf_tested_values() {
        assert_eq!(SoilKind::classify("argilloso").swrf(), 1.4);
        assert_eq!(SoilKind::classify("sabbioso").swrf(), 0.7);
        assert_eq!(SoilKind::classify("universale").swrf(), 1.0);
    }
}
