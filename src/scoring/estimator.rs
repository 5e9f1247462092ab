//! Heuristic metric estimation
//!
//! When a metric has no authoritative value, a heuristic derives a plausible
//! one from collateral evidence already in the pack: commit cadence, the
//! detected framework list, typing signals and the presence of known files.
//! Each heuristic has its own hard-coded default, so estimation only comes
//! back empty for metrics the table does not know.

use crate::evidence::{paths, EvidenceContext, EvidenceStore};
use crate::history::CommitHistory;
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use tracing::debug;

/// Dependency name fragments that indicate background job processing
const ASYNC_DEPENDENCY_KEYWORDS: &[&str] =
    &["bull", "bullmq", "rabbitmq", "redis", "queue", "celery", "kafka"];

/// Repository name fragments that indicate a worker-style service
const ASYNC_REPO_KEYWORDS: &[&str] = &["scheduler", "worker", "queue", "job"];

/// Directories, relative to the repository root, that hold decision records
const ADR_DIRS: &[&str] = &["docs/adr", "adr", "docs/decisions"];

/// Newest commits inspected for feature work
const FEATURE_SAMPLE: usize = 20;
const FEATURE_CAP: usize = 12;

/// Window used to approximate deploy frequency from commit cadence
const DEPLOY_WINDOW_DAYS: i64 = 30;

type Heuristic = fn(&ValueEstimator<'_>) -> Option<Value>;

/// `(dimension, metric)` → heuristic
const HEURISTICS: &[(&str, &str, Heuristic)] = &[
    ("velocity", "deploys_per_month", deploys_per_month),
    ("velocity", "lead_time_pr_to_prod_hours", lead_time_hours),
    ("velocity", "features_shipped_per_month", features_shipped),
    ("stability", "change_failure_rate_pct", change_failure_rate),
    ("stability", "mttr_minutes", mttr_minutes),
    ("stability", "prod_incidents_last_30d", prod_incidents),
    ("scalability", "stateless_services_pct", stateless_services),
    ("scalability", "async_processing_present", async_processing),
    ("scalability", "autoscaling_configured", autoscaling),
    ("security", "critical_cves_open", critical_cves),
    ("security", "secrets_detected", secrets_detected),
    ("maintainability", "coverage_core_pct", coverage),
    ("bus_factor", "top1_author_share_pct", top1_author_share),
    ("bus_factor", "active_maintainers_count", active_maintainers),
    ("governance", "ci_cd_present", build_published),
    ("governance", "onboarding_docs_present", onboarding_docs),
    ("governance", "runbooks_present", runbooks),
    ("governance", "adrs_present", adrs),
    ("governance", "evidence_per_build_published", build_published),
];

/// Whether a heuristic exists for `(dimension, metric)`
pub fn has_heuristic(dimension: &str, metric: &str) -> bool {
    lookup(dimension, metric).is_some()
}

fn lookup(dimension: &str, metric: &str) -> Option<Heuristic> {
    HEURISTICS
        .iter()
        .find(|(d, m, _)| *d == dimension && *m == metric)
        .map(|(_, _, heuristic)| *heuristic)
}

/// Derives substitute metric values from collateral evidence
pub struct ValueEstimator<'a> {
    store: &'a EvidenceStore,
    context: &'a EvidenceContext,
    now: DateTime<Utc>,
}

impl<'a> ValueEstimator<'a> {
    pub fn new(store: &'a EvidenceStore, context: &'a EvidenceContext, now: DateTime<Utc>) -> Self {
        Self {
            store,
            context,
            now,
        }
    }

    /// Estimated value for a metric, `None` when no heuristic applies
    pub fn estimate(&self, dimension: &str, metric: &str) -> Option<Value> {
        let heuristic = lookup(dimension, metric)?;
        let value = heuristic(self)?;
        debug!("Estimated {}.{} = {}", dimension, metric, value);
        Some(value)
    }

    /// Commit sample, empty when the document has no `recent_commits`.
    /// `None` only when the document is missing or malformed.
    fn commit_history(&self) -> Option<CommitHistory> {
        self.store
            .document(paths::COMMITS)
            .map(|doc| CommitHistory::from_document(&doc).unwrap_or_default())
    }

    fn is_modern(&self) -> bool {
        self.context.stack.is_modern()
    }

    fn has_typescript(&self) -> bool {
        self.context.stack.has_typescript
    }

    fn uses(&self, framework: &str) -> bool {
        self.context.stack.has_framework(framework)
    }

    fn read_or_zero(&self, path: &str, field: &str) -> Value {
        self.store.read(path, field).unwrap_or_else(|| json!(0))
    }
}

// velocity

fn deploys_per_month(est: &ValueEstimator<'_>) -> Option<Value> {
    let recent = est
        .commit_history()
        .filter(|history| !history.is_empty())
        .map(|history| history.commits_since(est.now - Duration::days(DEPLOY_WINDOW_DAYS)))
        .unwrap_or(0);

    let deploys = match recent {
        n if n >= 20 && est.is_modern() => 10,
        n if n >= 10 => 4,
        n if n >= 5 => 1,
        _ if est.is_modern() => 4,
        _ => 0,
    };
    Some(json!(deploys))
}

fn lead_time_hours(est: &ValueEstimator<'_>) -> Option<Value> {
    let hours = match (est.is_modern(), est.has_typescript()) {
        (true, true) => 24,
        (true, false) => 48,
        _ => 96,
    };
    Some(json!(hours))
}

fn features_shipped(est: &ValueEstimator<'_>) -> Option<Value> {
    let features = est
        .commit_history()
        .filter(|history| !history.is_empty())
        .map(|history| history.feature_commits(FEATURE_SAMPLE, FEATURE_CAP))
        .unwrap_or(2);
    Some(json!(features))
}

// stability

fn change_failure_rate(est: &ValueEstimator<'_>) -> Option<Value> {
    let rate = if est.uses("NestJS") && est.has_typescript() {
        5
    } else if est.has_typescript() {
        10
    } else {
        15
    };
    Some(json!(rate))
}

fn mttr_minutes(est: &ValueEstimator<'_>) -> Option<Value> {
    Some(json!(if est.uses("NestJS") { 60 } else { 120 }))
}

fn prod_incidents(_: &ValueEstimator<'_>) -> Option<Value> {
    Some(json!(0))
}

// scalability

fn stateless_services(est: &ValueEstimator<'_>) -> Option<Value> {
    let pct = if est.uses("NestJS") {
        if est.context.metrics.files > 20 {
            90
        } else {
            75
        }
    } else if est.uses("Express") {
        70
    } else {
        60
    };
    Some(json!(pct))
}

fn async_processing(est: &ValueEstimator<'_>) -> Option<Value> {
    let dependency_names = est
        .store
        .document(paths::DEPENDENCIES)
        .and_then(|doc| doc.get("dependencies").and_then(Value::as_array).cloned())
        .unwrap_or_default()
        .iter()
        .filter_map(|dep| dep.get("name").and_then(Value::as_str))
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ");
    if ASYNC_DEPENDENCY_KEYWORDS
        .iter()
        .any(|kw| dependency_names.contains(kw))
    {
        return Some(json!(true));
    }

    let repo_name = est
        .context
        .facts
        .name
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();
    let worker_like = ASYNC_REPO_KEYWORDS.iter().any(|kw| repo_name.contains(kw));
    Some(json!(worker_like))
}

fn autoscaling(_: &ValueEstimator<'_>) -> Option<Value> {
    Some(json!(false))
}

// security

fn critical_cves(est: &ValueEstimator<'_>) -> Option<Value> {
    Some(est.read_or_zero(paths::DEPS_SCA, "summary.critical"))
}

fn secrets_detected(est: &ValueEstimator<'_>) -> Option<Value> {
    Some(est.read_or_zero(paths::SECRETS, "secrets_found"))
}

// maintainability

fn coverage(est: &ValueEstimator<'_>) -> Option<Value> {
    Some(est.read_or_zero(paths::COVERAGE, "lines"))
}

// bus factor

fn top1_author_share(est: &ValueEstimator<'_>) -> Option<Value> {
    est.commit_history()
        .map(|history| json!(history.top1_author_share_pct()))
}

fn active_maintainers(est: &ValueEstimator<'_>) -> Option<Value> {
    est.commit_history()
        .map(|history| json!(history.active_maintainers_90d(est.now)))
}

// governance

fn build_published(est: &ValueEstimator<'_>) -> Option<Value> {
    Some(json!(est.store.exists(paths::BUILD)))
}

fn onboarding_docs(est: &ValueEstimator<'_>) -> Option<Value> {
    Some(json!(est.store.exists(paths::README_ENRICHED)))
}

fn runbooks(est: &ValueEstimator<'_>) -> Option<Value> {
    Some(json!(est.store.exists(paths::RUNBOOK)))
}

fn adrs(est: &ValueEstimator<'_>) -> Option<Value> {
    let repo_root = &est.context.repo_root;
    Some(json!(ADR_DIRS.iter().any(|dir| repo_root.join(dir).exists())))
}
