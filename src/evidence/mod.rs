//! Evidence pack access
//!
//! An evidence pack is a directory of JSON (and a few Markdown) documents
//! written by upstream collectors: tech stack, dependency inventory, commit
//! history, security scan, coverage. The scorer only ever reads it.
//!
//! Reads are forgiving by contract. A missing file, a document that is not
//! valid JSON, or a field path that does not resolve all come back as `None`
//! rather than an error, so a missing scanner degrades the score instead of
//! aborting the run.

mod context;
mod store;

pub use context::{CodeMetrics, EvidenceContext, RepoFacts, StackInfo, MODERN_FRAMEWORKS};
pub use store::{lookup_field, EvidenceStore};

/// Well-known document locations inside an evidence pack.
pub mod paths {
    pub const COMMITS: &str = "change/commits.json";
    pub const DEPS_SCA: &str = "security/deps-sca.json";
    pub const SECRETS: &str = "security/secrets.json";
    pub const COVERAGE: &str = "quality/coverage-summary.json";
    pub const DEPENDENCIES: &str = "dependencies.json";
    pub const BUILD: &str = "build/build.json";
    pub const README_ENRICHED: &str = "docs/README.enriched.md";
    pub const RUNBOOK: &str = "docs/runbook.md";
    pub const SUMMARY: &str = "summary.json";
    pub const REPO_FACTS: &str = "repo_facts.json";
    pub const CLOC: &str = "metrics/cloc.json";
    /// Terminal artifact written by the scorer itself.
    pub const SCORE: &str = "score.json";
}
