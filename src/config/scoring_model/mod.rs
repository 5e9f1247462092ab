//! Scoring model definition
//!
//! The scoring model is an external, versioned document describing how raw
//! evidence becomes a score. It is loaded once per run and never mutated.
//!
//! # Format
//!
//! ```json
//! {
//!   "name": "VC-Ready Engineering Score",
//!   "version": "1.0.0",
//!   "scale": { "min": 0, "max": 100 },
//!   "final_score_weights": { "security": 0.6, "bus_factor": 0.4 },
//!   "dimensions": [
//!     {
//!       "key": "security",
//!       "metrics": [
//!         {
//!           "key": "critical_cves_open",
//!           "metric_weight": 1.0,
//!           "source": { "path": "security/deps-sca.json", "field": "critical_open" },
//!           "normalization": {
//!             "type": "thresholds",
//!             "direction": "lower_is_better",
//!             "thresholds": [ { "lte": 0, "score": 100 }, { "lte": 3, "score": 40 } ]
//!           }
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! The same structure may be written as TOML, and either format may wrap the
//! model in a top-level `scoring_model` key.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use tracing::warn;

/// Reference model wiring every built-in estimation heuristic; written by `metrica init`.
pub const REFERENCE_MODEL_JSON: &str = include_str!("../metrica.reference.json");

/// A complete scoring model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringModel {
    #[serde(default = "default_model_name")]
    pub name: String,

    #[serde(default = "default_model_version")]
    pub version: String,

    /// Range of dimension and metric scores (always 0-100 in practice)
    #[serde(default)]
    pub scale: Scale,

    /// Dimension key → weight in the final score. Not required to sum to 1.
    #[serde(default)]
    pub final_score_weights: BTreeMap<String, f64>,

    /// Dimensions, scored in this order
    #[serde(default)]
    pub dimensions: Vec<Dimension>,
}

fn default_model_name() -> String {
    "VC-Ready Engineering Score".to_string()
}

fn default_model_version() -> String {
    "1.0.0".to_string()
}

impl Default for ScoringModel {
    /// Embedded fallback: the standard seven weights and no dimensions.
    fn default() -> Self {
        let final_score_weights = [
            ("velocity", 0.2),
            ("stability", 0.15),
            ("scalability", 0.15),
            ("security", 0.15),
            ("maintainability", 0.15),
            ("bus_factor", 0.1),
            ("governance", 0.1),
        ]
        .into_iter()
        .map(|(k, w)| (k.to_string(), w))
        .collect();

        Self {
            name: default_model_name(),
            version: default_model_version(),
            scale: Scale::default(),
            final_score_weights,
            dimensions: Vec::new(),
        }
    }
}

/// Score range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    #[serde(default)]
    pub min: f64,
    #[serde(default = "default_scale_max")]
    pub max: f64,
}

fn default_scale_max() -> f64 {
    100.0
}

impl Default for Scale {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: default_scale_max(),
        }
    }
}

/// One axis of engineering quality
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    #[serde(default)]
    pub key: String,

    /// Human-readable label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub metrics: Vec<MetricDef>,
}

impl Dimension {
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.key)
    }

    /// Sum of all metric weights
    pub fn total_weight(&self) -> f64 {
        self.metrics.iter().map(|m| m.metric_weight).sum()
    }
}

/// One measurable quantity feeding a dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDef {
    #[serde(default)]
    pub key: String,

    #[serde(default)]
    pub metric_weight: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<MetricSource>,

    #[serde(default, deserialize_with = "lenient_normalization")]
    pub normalization: NormalizationSpec,
}

/// Where a metric value lives inside the evidence pack
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSource {
    /// Pack-relative document path
    #[serde(default)]
    pub path: Option<String>,
    /// Field name, possibly dotted (`summary.critical`)
    #[serde(default)]
    pub field: Option<String>,
}

impl MetricSource {
    pub fn new(path: &str, field: &str) -> Self {
        Self {
            path: Some(path.to_string()),
            field: Some(field.to_string()),
        }
    }

    /// `(path, field)` when both are present and non-empty
    pub fn parts(&self) -> Option<(&str, &str)> {
        let path = self.path.as_deref().filter(|p| !p.is_empty())?;
        let field = self.field.as_deref().filter(|f| !f.is_empty())?;
        Some((path, field))
    }
}

/// How a raw metric value maps onto a 0-100 sub-score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NormalizationSpec {
    /// Step ladder of `lte`/`gte` bounds, optionally interpolated
    Thresholds {
        #[serde(default)]
        thresholds: Vec<ThresholdPoint>,
        #[serde(default)]
        direction: Direction,
        #[serde(default)]
        interpolate_between_points: bool,
    },
    Boolean {
        #[serde(default = "default_true_score")]
        true_score: f64,
        #[serde(default)]
        false_score: f64,
    },
    /// Stringified value → score
    Mapping {
        #[serde(default)]
        mapping: BTreeMap<String, f64>,
    },
    /// Unrecognized policy; always scores 0
    #[default]
    #[serde(other)]
    Unknown,
}

fn default_true_score() -> f64 {
    100.0
}

/// One rung of a threshold ladder
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lte: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gte: Option<f64>,
    #[serde(default)]
    pub score: f64,
}

impl ThresholdPoint {
    pub fn lte(bound: f64, score: f64) -> Self {
        Self {
            lte: Some(bound),
            gte: None,
            score,
        }
    }

    pub fn gte(bound: f64, score: f64) -> Self {
        Self {
            lte: None,
            gte: Some(bound),
            score,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    HigherIsBetter,
    LowerIsBetter,
}

/// A malformed normalization block degrades to [`NormalizationSpec::Unknown`]
/// instead of rejecting the whole model.
fn lenient_normalization<'de, D>(deserializer: D) -> Result<NormalizationSpec, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw.clone()).unwrap_or_else(|e| {
        warn!("Unusable normalization {}: {}; scoring it as 0", raw, e);
        NormalizationSpec::Unknown
    }))
}

/// Structural problems in a model. They never change scores, but a dimension
/// without a weight silently contributes nothing to the final score.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelWarning {
    WeightWithoutDimension(String),
    DimensionWithoutWeight(String),
    DuplicateDimension(String),
    EmptyDimension(String),
    ZeroMetricWeights(String),
    NegativeMetricWeight { dimension: String, metric: String },
    NegativeFinalWeight(String),
    /// Position of a dimension without a `key`
    MissingDimensionKey(usize),
    MissingMetricKey(String),
}

impl fmt::Display for ModelWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelWarning::WeightWithoutDimension(key) => write!(
                f,
                "final_score_weights has '{key}' but no dimension with that key"
            ),
            ModelWarning::DimensionWithoutWeight(key) => write!(
                f,
                "dimension '{key}' has no entry in final_score_weights and contributes nothing"
            ),
            ModelWarning::DuplicateDimension(key) => {
                write!(f, "dimension '{key}' is defined more than once")
            }
            ModelWarning::EmptyDimension(key) => {
                write!(f, "dimension '{key}' has no metrics and always scores 0")
            }
            ModelWarning::ZeroMetricWeights(key) => write!(
                f,
                "metric weights in dimension '{key}' sum to 0; it always scores 0"
            ),
            ModelWarning::NegativeMetricWeight { dimension, metric } => {
                write!(f, "metric '{dimension}.{metric}' has a negative weight")
            }
            ModelWarning::NegativeFinalWeight(key) => {
                write!(f, "final score weight for '{key}' is negative")
            }
            ModelWarning::MissingDimensionKey(index) => write!(
                f,
                "dimension #{} has no key and contributes nothing",
                index + 1
            ),
            ModelWarning::MissingMetricKey(dimension) => write!(
                f,
                "dimension '{dimension}' has a metric without a key; it can only score from its source"
            ),
        }
    }
}

impl ScoringModel {
    /// Parse the embedded reference model
    pub fn reference() -> Result<Self, serde_json::Error> {
        serde_json::from_str(REFERENCE_MODEL_JSON)
    }

    /// Weight of a dimension in the final score (0 when unlisted)
    pub fn weight_for(&self, dimension: &str) -> f64 {
        self.final_score_weights
            .get(dimension)
            .copied()
            .unwrap_or(0.0)
    }

    pub fn dimension(&self, key: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.key == key)
    }

    /// Check weights and dimensions for structural problems
    pub fn validate(&self) -> Vec<ModelWarning> {
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        for (index, dimension) in self.dimensions.iter().enumerate() {
            if dimension.key.is_empty() {
                warnings.push(ModelWarning::MissingDimensionKey(index));
                continue;
            }
            if !seen.insert(dimension.key.as_str()) {
                warnings.push(ModelWarning::DuplicateDimension(dimension.key.clone()));
                continue;
            }
            if !self.final_score_weights.contains_key(&dimension.key) {
                warnings.push(ModelWarning::DimensionWithoutWeight(dimension.key.clone()));
            }
            if dimension.metrics.is_empty() {
                warnings.push(ModelWarning::EmptyDimension(dimension.key.clone()));
                continue;
            }
            for metric in &dimension.metrics {
                if metric.key.is_empty() {
                    warnings.push(ModelWarning::MissingMetricKey(dimension.key.clone()));
                }
                if metric.metric_weight < 0.0 {
                    warnings.push(ModelWarning::NegativeMetricWeight {
                        dimension: dimension.key.clone(),
                        metric: metric.key.clone(),
                    });
                }
            }
            if dimension.total_weight() == 0.0 {
                warnings.push(ModelWarning::ZeroMetricWeights(dimension.key.clone()));
            }
        }

        for (key, weight) in &self.final_score_weights {
            if !seen.contains(key.as_str()) {
                warnings.push(ModelWarning::WeightWithoutDimension(key.clone()));
            }
            if *weight < 0.0 {
                warnings.push(ModelWarning::NegativeFinalWeight(key.clone()));
            }
        }

        warnings
    }
}

#[cfg(test)]
mod tests;
