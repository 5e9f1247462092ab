//! Configuration module for Metrica
//!
//! This module handles:
//! - The scoring model (`metrica.json` / `metrica.toml`): dimensions, metrics,
//!   normalization policies and final-score weights
//! - Discovery over an explicit, ordered list of candidate files
//! - The embedded default and reference models
//! - Model validation warnings

mod loader;
mod scoring_model;

pub use loader::{
    candidate_paths, load_model_file, load_scoring_model, parse_model_str, ConfigError,
    LoadedModel, ModelFormat, ModelSource,
};
pub use scoring_model::{
    Dimension, Direction, MetricDef, MetricSource, ModelWarning, NormalizationSpec, Scale,
    ScoringModel, ThresholdPoint, REFERENCE_MODEL_JSON,
};
