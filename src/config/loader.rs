//! Scoring model discovery and parsing
//!
//! Discovery walks an explicit, ordered list of candidate files. The first
//! candidate that exists and parses wins; anything else falls through to the
//! embedded default. Callers decide the candidate list (see [`candidate_paths`]);
//! nothing here looks at the process working directory on its own.

use super::ScoringModel;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Top-level key some documents wrap the model in
const WRAPPER_KEY: &str = "scoring_model";

/// Base file name searched for during discovery
const MODEL_FILE_STEM: &str = "metrica";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON scoring model: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML scoring model: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unsupported scoring model format: {} (expected .json or .toml)", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Document syntax of a scoring model file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    Json,
    Toml,
}

impl ModelFormat {
    /// Format implied by a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(ModelFormat::Json),
            "toml" => Some(ModelFormat::Toml),
            _ => None,
        }
    }
}

/// Where the active model came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    File(PathBuf),
    Embedded,
}

impl std::fmt::Display for ModelSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelSource::File(path) => write!(f, "{}", path.display()),
            ModelSource::Embedded => write!(f, "built-in default"),
        }
    }
}

/// A model plus its provenance
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub model: ScoringModel,
    pub source: ModelSource,
}

/// Standard discovery order for a pack: next to the pack, then the working directory.
///
/// An explicit path replaces discovery entirely.
pub fn candidate_paths(
    explicit: Option<&Path>,
    evidence_root: &Path,
    working_dir: &Path,
) -> Vec<PathBuf> {
    if let Some(path) = explicit {
        return vec![path.to_path_buf()];
    }

    let mut candidates = Vec::new();
    let mut push_dir = |dir: &Path| {
        for ext in ["json", "toml"] {
            let candidate = dir.join(format!("{MODEL_FILE_STEM}.{ext}"));
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
    };
    if let Some(parent) = evidence_root.parent() {
        push_dir(parent);
    }
    push_dir(working_dir);
    candidates
}

/// Load the first usable model among `candidates`, else the embedded default.
pub fn load_scoring_model(candidates: &[PathBuf]) -> LoadedModel {
    for path in candidates {
        if !path.exists() {
            continue;
        }
        match load_model_file(path) {
            Ok(model) => {
                debug!(
                    "Loaded scoring model '{}' v{} from {}",
                    model.name,
                    model.version,
                    path.display()
                );
                return LoadedModel {
                    model,
                    source: ModelSource::File(path.clone()),
                };
            }
            Err(e) => {
                warn!("Failed to load {}: {}", path.display(), e);
            }
        }
    }

    debug!("No scoring model found, using built-in default");
    LoadedModel {
        model: ScoringModel::default(),
        source: ModelSource::Embedded,
    }
}

/// Load a single model file, choosing the parser by extension
pub fn load_model_file(path: &Path) -> Result<ScoringModel, ConfigError> {
    let format =
        ModelFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat(path.into()))?;
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_model_str(&content, format)
}

/// Parse a model document, unwrapping a top-level `scoring_model` key if present
pub fn parse_model_str(content: &str, format: ModelFormat) -> Result<ScoringModel, ConfigError> {
    let document: Value = match format {
        ModelFormat::Json => serde_json::from_str(content)?,
        ModelFormat::Toml => toml::from_str(content)?,
    };
    let model = match document {
        Value::Object(mut map) if map.contains_key(WRAPPER_KEY) => map
            .remove(WRAPPER_KEY)
            .unwrap_or(Value::Null),
        other => other,
    };
    Ok(serde_json::from_value(model)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "name": "Minimal",
        "final_score_weights": {"security": 1.0},
        "dimensions": [{"key": "security", "metrics": []}]
    }"#;

    #[test]
    fn test_parse_bare_and_wrapped_json() {
        let bare = parse_model_str(MINIMAL, ModelFormat::Json).expect("bare model");
        assert_eq!(bare.name, "Minimal");

        let wrapped = format!(r#"{{"scoring_model": {MINIMAL}}}"#);
        let wrapped = parse_model_str(&wrapped, ModelFormat::Json).expect("wrapped model");
        assert_eq!(wrapped, bare);
    }

    #[test]
    fn test_parse_wrapped_toml() {
        let content = r#"
[scoring_model]
name = "Wrapped"

[scoring_model.final_score_weights]
velocity = 1.0
"#;
        let model = parse_model_str(content, ModelFormat::Toml).expect("wrapped toml");
        assert_eq!(model.name, "Wrapped");
        assert_eq!(model.weight_for("velocity"), 1.0);
    }

    #[test]
    fn test_parse_errors_are_typed() {
        assert!(matches!(
            parse_model_str("{ nope", ModelFormat::Json),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            parse_model_str("= nope", ModelFormat::Toml),
            Err(ConfigError::Toml(_))
        ));
        // Structurally wrong: dimensions must be a list
        assert!(parse_model_str(r#"{"dimensions": 3}"#, ModelFormat::Json).is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("metrica.yaml");
        std::fs::write(&path, MINIMAL).expect("write model");

        assert!(matches!(
            load_model_file(&path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_first_usable_candidate_wins() {
        let dir = tempfile::tempdir().expect("temp dir");
        let broken = dir.path().join("broken.json");
        let good = dir.path().join("good.json");
        let later = dir.path().join("later.json");
        std::fs::write(&broken, "{ not json").expect("write broken");
        std::fs::write(&good, MINIMAL).expect("write good");
        std::fs::write(&later, r#"{"name": "Later"}"#).expect("write later");

        let candidates = vec![dir.path().join("missing.json"), broken, good.clone(), later];
        let loaded = load_scoring_model(&candidates);

        assert_eq!(loaded.model.name, "Minimal");
        assert_eq!(loaded.source, ModelSource::File(good));
    }

    #[test]
    fn test_no_usable_candidate_falls_back_to_default() {
        let dir = tempfile::tempdir().expect("temp dir");
        let broken = dir.path().join("metrica.json");
        std::fs::write(&broken, "[1, 2").expect("write broken");

        let loaded = load_scoring_model(&[broken, dir.path().join("metrica.toml")]);
        assert_eq!(loaded.source, ModelSource::Embedded);
        assert_eq!(loaded.model, ScoringModel::default());

        let loaded = load_scoring_model(&[]);
        assert_eq!(loaded.source, ModelSource::Embedded);
    }

    #[test]
    fn test_candidate_paths_order() {
        let candidates = candidate_paths(
            None,
            Path::new("/repo/out"),
            Path::new("/work"),
        );
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/repo/metrica.json"),
                PathBuf::from("/repo/metrica.toml"),
                PathBuf::from("/work/metrica.json"),
                PathBuf::from("/work/metrica.toml"),
            ]
        );

        let deduped = candidate_paths(None, Path::new("/repo/out"), Path::new("/repo"));
        assert_eq!(deduped.len(), 2);

        let explicit = candidate_paths(
            Some(Path::new("custom.toml")),
            Path::new("/repo/out"),
            Path::new("/work"),
        );
        assert_eq!(explicit, vec![PathBuf::from("custom.toml")]);
    }
}
