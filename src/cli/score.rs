//! Score command - score an evidence pack and publish score.json

use super::DEFAULT_EVIDENCE_DIR;
use crate::config::{candidate_paths, load_scoring_model};
use crate::evidence::{paths, EvidenceStore};
use crate::models::ScoreResult;
use crate::reporters::{self, render_json};
use crate::scoring::ScoringEngine;
use anyhow::{Context, Result};
use console::style;
use std::path::{Path, PathBuf};
use tracing::info;

const UNKNOWN: &str = "unknown";

/// Options collected from the command line
#[derive(Debug, Clone)]
pub struct ScoreOptions {
    pub evidence_dir: PathBuf,
    pub config: Option<PathBuf>,
    pub repo_name: Option<String>,
    pub commit_sha: Option<String>,
    pub format: String,
    pub output: Option<PathBuf>,
    pub write_score: bool,
}

/// Run the score command
pub fn run(options: ScoreOptions) -> Result<()> {
    let result = compute(&options).context("scoring unavailable")?;

    if options.write_score {
        let score_path = options.evidence_dir.join(paths::SCORE);
        write_score(&result, &score_path)
            .with_context(|| format!("Failed to write {}", score_path.display()))?;
        info!("Wrote {}", score_path.display());
    }

    let rendered = reporters::report(&result, &options.format)?;
    match &options.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            eprintln!(
                "{} Report written to {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

fn compute(options: &ScoreOptions) -> Result<ScoreResult> {
    let evidence_dir = &options.evidence_dir;
    if !evidence_dir.is_dir() {
        anyhow::bail!(
            "evidence pack not found: {} (collectors write it to <repo>/{})",
            evidence_dir.display(),
            DEFAULT_EVIDENCE_DIR
        );
    }

    let working_dir = std::env::current_dir().context("Cannot determine working directory")?;
    let candidates = candidate_paths(options.config.as_deref(), evidence_dir, &working_dir);
    if let Some(explicit) = &options.config {
        if !explicit.is_file() {
            anyhow::bail!("scoring model not found: {}", explicit.display());
        }
    }
    let loaded = load_scoring_model(&candidates);
    info!("Using scoring model from {}", loaded.source);

    let store = EvidenceStore::new(evidence_dir);
    let engine = ScoringEngine::new(&loaded.model, &store);

    let facts = &engine.context().facts;
    let repo = pick_identity(options.repo_name.as_deref(), facts.name.as_deref());
    let commit = pick_identity(options.commit_sha.as_deref(), facts.commit_sha.as_deref());

    Ok(engine.calculate(&repo, &commit))
}

/// First non-blank of the explicit value and the recorded fact, else "unknown"
fn pick_identity(explicit: Option<&str>, recorded: Option<&str>) -> String {
    [explicit, recorded]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or(UNKNOWN)
        .to_string()
}

/// Write score.json via a sibling temp file so a failed write never leaves a partial document
fn write_score(result: &ScoreResult, path: &Path) -> Result<()> {
    let json = render_json(result)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json.as_bytes())?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}
