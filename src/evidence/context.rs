//! Collateral repository facts used by the value estimator.
//!
//! These come from the stack detector, repo facts collector and line counter.
//! They are loaded once per run; anything missing falls back to an empty default.

use super::{paths, EvidenceStore};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Frameworks treated as a "modern stack" signal by the velocity heuristics.
pub const MODERN_FRAMEWORKS: &[&str] = &["NestJS", "Next.js", "FastAPI"];

/// Tech stack summary (`summary.json` → `tech_stack`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StackInfo {
    #[serde(default)]
    pub primary_language: Option<String>,
    #[serde(default)]
    pub frameworks: Vec<String>,
    #[serde(default)]
    pub has_typescript: bool,
}

impl StackInfo {
    pub fn has_framework(&self, name: &str) -> bool {
        self.frameworks.iter().any(|f| f == name)
    }

    /// Any of [`MODERN_FRAMEWORKS`] present
    pub fn is_modern(&self) -> bool {
        MODERN_FRAMEWORKS.iter().any(|f| self.has_framework(f))
    }
}

/// Repository identity (`repo_facts.json`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepoFacts {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub commit_sha: Option<String>,
}

/// File-count summary (`metrics/cloc.json`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CodeMetrics {
    #[serde(default)]
    pub files: u64,
}

/// Everything the estimator may consult besides the scored documents themselves.
#[derive(Debug, Clone, Default)]
pub struct EvidenceContext {
    pub stack: StackInfo,
    pub facts: RepoFacts,
    pub metrics: CodeMetrics,
    /// Analyzed repository checkout, used for ADR directory checks
    pub repo_root: PathBuf,
}

impl EvidenceContext {
    /// Load context documents from the pack.
    ///
    /// The repository root defaults to the pack's parent directory, which is
    /// where collectors place the pack (`<repo>/out`).
    pub fn load(store: &EvidenceStore) -> Self {
        let stack = store
            .document(paths::SUMMARY)
            .and_then(|summary| summary.get("tech_stack").cloned())
            .and_then(|stack| parse_section::<StackInfo>(stack, "tech_stack"))
            .unwrap_or_default();
        let facts = store
            .document(paths::REPO_FACTS)
            .and_then(|doc| parse_section::<RepoFacts>(doc, paths::REPO_FACTS))
            .unwrap_or_default();
        let metrics = store
            .document(paths::CLOC)
            .and_then(|doc| parse_section::<CodeMetrics>(doc, paths::CLOC))
            .unwrap_or_default();

        debug!(
            "Evidence context: frameworks={:?}, typescript={}, files={}",
            stack.frameworks, stack.has_typescript, metrics.files
        );

        Self {
            stack,
            facts,
            metrics,
            repo_root: default_repo_root(store.root()),
        }
    }

    /// Override the repository checkout location
    pub fn with_repo_root(mut self, repo_root: impl Into<PathBuf>) -> Self {
        self.repo_root = repo_root.into();
        self
    }
}

fn parse_section<T: DeserializeOwned>(value: serde_json::Value, label: &str) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            debug!("Ignoring unexpected {} shape: {}", label, e);
            None
        }
    }
}

fn default_repo_root(evidence_root: &Path) -> PathBuf {
    match evidence_root.parent() {
        Some(parent) if parent.as_os_str().is_empty() => PathBuf::from("."),
        Some(parent) => parent.to_path_buf(),
        None => evidence_root.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_context_documents() {
        let dir = tempfile::tempdir().expect("temp dir");
        let pack = dir.path().join("out");
        std::fs::create_dir_all(pack.join("metrics")).expect("create pack");
        std::fs::write(
            pack.join("summary.json"),
            r#"{"tech_stack": {"primary_language": "TypeScript", "frameworks": ["NestJS"], "has_typescript": true}}"#,
        )
        .expect("write summary");
        std::fs::write(
            pack.join("repo_facts.json"),
            r#"{"name": "billing-worker", "commit_sha": "abc123", "branch": "main"}"#,
        )
        .expect("write facts");
        std::fs::write(pack.join("metrics/cloc.json"), r#"{"files": 42, "lines": 9000}"#)
            .expect("write cloc");

        let ctx = EvidenceContext::load(&EvidenceStore::new(&pack));

        assert!(ctx.stack.has_framework("NestJS"));
        assert!(ctx.stack.is_modern());
        assert!(ctx.stack.has_typescript);
        assert_eq!(ctx.facts.name.as_deref(), Some("billing-worker"));
        assert_eq!(ctx.metrics.files, 42);
        assert_eq!(ctx.repo_root, dir.path());
    }

    #[test]
    fn test_empty_pack_gives_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let ctx = EvidenceContext::load(&EvidenceStore::new(dir.path()));

        assert!(ctx.stack.frameworks.is_empty());
        assert!(!ctx.stack.is_modern());
        assert!(ctx.facts.name.is_none());
        assert_eq!(ctx.metrics.files, 0);
    }

    #[test]
    fn test_malformed_section_gives_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(
            dir.path().join("summary.json"),
            r#"{"tech_stack": {"frameworks": "Express"}}"#,
        )
        .expect("write summary");

        let ctx = EvidenceContext::load(&EvidenceStore::new(dir.path()));
        assert!(ctx.stack.frameworks.is_empty());
    }

    #[test]
    fn test_default_repo_root() {
        assert_eq!(default_repo_root(Path::new("/repo/out")), PathBuf::from("/repo"));
        assert_eq!(default_repo_root(Path::new("out")), PathBuf::from("."));
        assert_eq!(default_repo_root(Path::new("/")), PathBuf::from("/"));
    }
}
