//! Core data models for Metrica
//!
//! `ScoreResult` is the document written to `score.json` and consumed by the
//! reporters.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Letter grade for a final score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
}

impl Grade {
    /// Grade band for a final score. Bands are closed below: 90.0 is an A.
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 90.0 => Grade::A,
            s if s >= 80.0 => Grade::B,
            s if s >= 70.0 => Grade::C,
            s if s >= 60.0 => Grade::D,
            _ => Grade::E,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bounds of the product-quality rating
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingScale {
    pub min: u8,
    pub max: u8,
}

impl Default for RatingScale {
    fn default() -> Self {
        Self { min: 1, max: 10 }
    }
}

/// 1-10 product-quality rating
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductQuality {
    pub rating: f64,
    #[serde(default)]
    pub scale: RatingScale,
}

/// Full result of a scoring run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub repo: String,
    pub commit: String,
    pub generated_at: DateTime<Utc>,
    /// Dimension key → score, in configuration order
    pub scores: IndexMap<String, f64>,
    pub final_score: f64,
    pub product_quality: ProductQuality,
    pub grade: Grade,
    #[serde(default)]
    pub notes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> ScoreResult {
        ScoreResult {
            repo: "billing".into(),
            commit: "abc123".into(),
            generated_at: Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap(),
            scores: [
                ("velocity".to_string(), 42.0),
                ("security".to_string(), 100.0),
                ("bus_factor".to_string(), 37.5),
            ]
            .into_iter()
            .collect(),
            final_score: 61.25,
            product_quality: ProductQuality {
                rating: 10.0,
                scale: RatingScale::default(),
            },
            grade: Grade::D,
            notes: vec!["Lowest scoring dimension: bus_factor (37.5/100). Needs improvement.".into()],
        }
    }

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(Grade::from_score(90.0), Grade::A);
        assert_eq!(Grade::from_score(89.999), Grade::B);
        assert_eq!(Grade::from_score(80.0), Grade::B);
        assert_eq!(Grade::from_score(70.0), Grade::C);
        assert_eq!(Grade::from_score(60.0), Grade::D);
        assert_eq!(Grade::from_score(59.99), Grade::E);
        assert_eq!(Grade::from_score(150.0), Grade::A);
    }

    #[test]
    fn test_score_result_json_shape() {
        let json = serde_json::to_value(sample()).expect("serialize");

        assert_eq!(json["grade"], "D");
        assert_eq!(json["product_quality"]["scale"]["min"], 1);
        assert_eq!(json["product_quality"]["scale"]["max"], 10);
        assert_eq!(json["generated_at"], "2025-06-30T12:00:00Z");

        assert_eq!(json["scores"]["bus_factor"], 37.5);
    }

    #[test]
    fn test_score_json_keeps_dimension_order() {
        let text = serde_json::to_string_pretty(&sample()).expect("serialize");
        let velocity = text.find("\"velocity\"").expect("velocity");
        let security = text.find("\"security\"").expect("security");
        let bus_factor = text.find("\"bus_factor\"").expect("bus_factor");
        assert!(velocity < security && security < bus_factor);
    }

    #[test]
    fn test_score_result_roundtrips_through_score_json() {
        let result = sample();
        let text = serde_json::to_string_pretty(&result).expect("serialize");
        let back: ScoreResult = serde_json::from_str(&text).expect("deserialize");
        assert_eq!(back, result);
    }
}
