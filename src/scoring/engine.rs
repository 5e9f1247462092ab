//! Scoring engine
//!
//! Walks the configured dimensions in order, resolving each metric from the
//! evidence pack (falling back to estimation), normalizing it and combining
//! the weighted sub-scores. Evidence problems never surface as errors.

use super::aggregate::{assessment_notes, final_score, grade_for, product_quality_rating, round_to};
use super::estimator::ValueEstimator;
use super::normalize::{clamp_score, normalize};
use super::resolver::MetricResolver;
use crate::config::{Dimension, MetricDef, ScoringModel};
use crate::evidence::{EvidenceContext, EvidenceStore};
use crate::models::{ProductQuality, RatingScale, ScoreResult};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Where a metric's value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueOrigin {
    Evidence,
    Estimated,
    Missing,
}

/// One metric's contribution to its dimension
#[derive(Debug, Clone)]
pub struct MetricOutcome {
    pub key: String,
    pub value: Option<Value>,
    pub origin: ValueOrigin,
    /// Normalized 0-100 sub-score
    pub score: f64,
    /// `metric_weight / total dimension weight`
    pub share: f64,
}

/// Per-metric view of a dimension score
#[derive(Debug, Clone)]
pub struct DimensionBreakdown {
    pub key: String,
    pub score: f64,
    pub metrics: Vec<MetricOutcome>,
}

impl DimensionBreakdown {
    fn empty(key: &str) -> Self {
        Self {
            key: key.to_string(),
            score: 0.0,
            metrics: Vec::new(),
        }
    }

    /// Metrics whose value had to be estimated
    pub fn estimated(&self) -> impl Iterator<Item = &MetricOutcome> {
        self.metrics
            .iter()
            .filter(|m| m.origin == ValueOrigin::Estimated)
    }
}

/// Computes a [`ScoreResult`] from an evidence pack and a scoring model
pub struct ScoringEngine<'a> {
    model: &'a ScoringModel,
    store: &'a EvidenceStore,
    context: EvidenceContext,
    now: DateTime<Utc>,
}

impl<'a> ScoringEngine<'a> {
    /// Engine evaluated at the current time, with context loaded from the pack
    pub fn new(model: &'a ScoringModel, store: &'a EvidenceStore) -> Self {
        Self {
            model,
            store,
            context: EvidenceContext::load(store),
            now: Utc::now(),
        }
    }

    /// Pin the evaluation instant used for time windows and `generated_at`
    pub fn with_evaluation_time(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn context(&self) -> &EvidenceContext {
        &self.context
    }

    /// Resolve a metric from evidence, else estimate it
    pub fn resolve_metric(&self, dimension: &str, metric: &MetricDef) -> (Option<Value>, ValueOrigin) {
        if let Some(value) = MetricResolver::new(self.store, self.now).resolve(metric) {
            return (Some(value), ValueOrigin::Evidence);
        }
        match ValueEstimator::new(self.store, &self.context, self.now).estimate(dimension, &metric.key)
        {
            Some(value) => (Some(value), ValueOrigin::Estimated),
            None => (None, ValueOrigin::Missing),
        }
    }

    /// Score a single dimension with its per-metric breakdown.
    ///
    /// Metrics with no value at all contribute nothing but keep their share of
    /// the weight. A dimension where nothing resolved scores 0.
    pub fn breakdown(&self, dimension: &Dimension) -> DimensionBreakdown {
        let total_weight = dimension.total_weight();
        if dimension.metrics.is_empty() || total_weight == 0.0 {
            return DimensionBreakdown::empty(&dimension.key);
        }

        let metrics: Vec<MetricOutcome> = dimension
            .metrics
            .iter()
            .map(|metric| {
                let (value, origin) = self.resolve_metric(&dimension.key, metric);
                let score = normalize(value.as_ref(), &metric.normalization);
                MetricOutcome {
                    key: metric.key.clone(),
                    value,
                    origin,
                    score,
                    share: metric.metric_weight / total_weight,
                }
            })
            .collect();

        let score = if metrics.iter().all(|m| m.origin == ValueOrigin::Missing) {
            0.0
        } else {
            clamp_score(
                metrics
                    .iter()
                    .filter(|m| m.origin != ValueOrigin::Missing)
                    .map(|m| m.score * m.share)
                    .sum(),
            )
        };

        DimensionBreakdown {
            key: dimension.key.clone(),
            score,
            metrics,
        }
    }

    /// Score a single dimension, in `[0, 100]`
    pub fn score_dimension(&self, dimension: &Dimension) -> f64 {
        self.breakdown(dimension).score
    }

    /// Score every configured dimension and aggregate
    pub fn calculate(&self, repo: &str, commit: &str) -> ScoreResult {
        for warning in self.model.validate() {
            warn!("Scoring model: {}", warning);
        }

        let mut scores: IndexMap<String, f64> = IndexMap::new();
        for dimension in self.model.dimensions.iter().filter(|d| !d.key.is_empty()) {
            let breakdown = self.breakdown(dimension);
            let estimated: Vec<&str> = breakdown.estimated().map(|m| m.key.as_str()).collect();
            if !estimated.is_empty() {
                debug!("{}: estimated {}", dimension.key, estimated.join(", "));
            }
            debug!("Dimension {} = {:.2}", dimension.key, breakdown.score);
            scores.insert(dimension.key.clone(), breakdown.score);
        }

        let raw_final = final_score(&scores, |key| self.model.weight_for(key));
        let grade = grade_for(raw_final);
        let notes = assessment_notes(&scores, raw_final);
        let rating = product_quality_rating(&scores);

        info!("Final score {:.2} ({})", raw_final, grade);

        ScoreResult {
            repo: repo.to_string(),
            commit: commit.to_string(),
            generated_at: self.now,
            scores,
            final_score: round_to(raw_final, 2),
            product_quality: ProductQuality {
                rating,
                scale: RatingScale::default(),
            },
            grade,
            notes,
        }
    }
}
