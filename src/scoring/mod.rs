//! Evidence-pack scoring
//!
//! Turns the artifacts in an evidence pack into per-dimension scores, a final
//! score, a 1-10 product-quality rating and a letter grade.
//!
//! # Scoring Formula
//!
//! ```text
//! metric     = normalize(resolve(source) ?? estimate(dimension, metric))   ∈ [0, 100]
//! dimension  = clamp(Σ metric × metric_weight / Σ metric_weight, 0, 100)
//! final      = Σ dimension × final_score_weights[dimension]              (not renormalized)
//! rating     = 1 + avg(maintainability, security, scalability) / 100 × 9
//! ```
//!
//! # Value Resolution
//!
//! - **Evidence**: `(path, field)` read from the pack, through the remap table
//!   for collector fields that changed name or are computed
//! - **Alternatives**: renamed evidence files tried when the primary is unreadable
//! - **Estimation**: heuristics over commit cadence, stack and file presence
//! - **Missing**: contributes nothing; a dimension with no values scores 0
//!
//! # Grades
//!
//! - A: ≥ 90
//! - B: ≥ 80
//! - C: ≥ 70
//! - D: ≥ 60
//! - E: below 60

mod aggregate;
mod engine;
mod estimator;
mod normalize;
mod resolver;

pub use aggregate::{
    assessment_notes, final_score, grade_for, product_quality_rating, round_to, QUALITY_DIMENSIONS,
};
pub use engine::{DimensionBreakdown, MetricOutcome, ScoringEngine, ValueOrigin};
pub use estimator::{has_heuristic, ValueEstimator};
pub use normalize::{clamp_score, mapping_key, normalize, normalize_thresholds};
pub use resolver::{alternative_paths, remap_rule, ComputedFn, MetricResolver, RemapRule};
