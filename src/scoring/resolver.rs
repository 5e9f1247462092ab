//! Metric value resolution
//!
//! Maps a metric's `(path, field)` source onto collector output. Collector
//! field names do not always match the scoring model, so a static remap table
//! either renames the field or substitutes a computed statistic. When the
//! primary document cannot be read, known alternative document paths are
//! tried before giving up.

use crate::config::MetricDef;
use crate::evidence::{lookup_field, paths, EvidenceStore};
use crate::history::CommitHistory;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tracing::debug;

/// Statistic computed from a whole evidence document
pub type ComputedFn = fn(&Value, DateTime<Utc>) -> Value;

/// How a requested field is read from its document
#[derive(Clone, Copy)]
pub enum RemapRule<'a> {
    /// Read the requested field as-is
    Direct(&'a str),
    /// Collector writes it under another name
    Renamed(&'a str),
    /// Derived from the whole document
    Computed(ComputedFn),
}

impl std::fmt::Debug for RemapRule<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemapRule::Direct(field) => f.debug_tuple("Direct").field(field).finish(),
            RemapRule::Renamed(field) => f.debug_tuple("Renamed").field(field).finish(),
            RemapRule::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

enum RemapTarget {
    Field(&'static str),
    Computed(ComputedFn),
}

struct RemapEntry {
    path: &'static str,
    field: &'static str,
    target: RemapTarget,
}

const REMAP_TABLE: &[RemapEntry] = &[
    RemapEntry {
        path: paths::DEPS_SCA,
        field: "critical_open",
        target: RemapTarget::Field("summary.critical"),
    },
    RemapEntry {
        path: paths::DEPS_SCA,
        field: "high_open",
        target: RemapTarget::Field("summary.high"),
    },
    RemapEntry {
        path: paths::DEPS_SCA,
        field: "medium_open",
        target: RemapTarget::Field("summary.medium"),
    },
    RemapEntry {
        path: paths::COMMITS,
        field: "contributors.top1_share_pct",
        target: RemapTarget::Computed(top1_share_pct),
    },
    RemapEntry {
        path: paths::COMMITS,
        field: "contributors.active_maintainers_90d",
        target: RemapTarget::Computed(active_maintainers_90d),
    },
    RemapEntry {
        path: paths::COVERAGE,
        field: "core_modules_coverage_pct",
        target: RemapTarget::Field("lines"),
    },
];

/// Alternative document locations for renamed evidence files
const ALTERNATIVE_PATHS: &[(&str, &[&str])] = &[
    (paths::DEPS_SCA, &["security/security.json"]),
    ("quality/sonar.json", &["quality/quality.json"]),
    (paths::COMMITS, &["change/history.json"]),
];

/// Remap rule for a `(path, field)` source
pub fn remap_rule<'a>(path: &str, field: &'a str) -> RemapRule<'a> {
    REMAP_TABLE
        .iter()
        .find(|entry| entry.path == path && entry.field == field)
        .map(|entry| match entry.target {
            RemapTarget::Field(renamed) => RemapRule::Renamed(renamed),
            RemapTarget::Computed(func) => RemapRule::Computed(func),
        })
        .unwrap_or(RemapRule::Direct(field))
}

/// Alternative locations tried when `path` cannot be read
pub fn alternative_paths(path: &str) -> &'static [&'static str] {
    ALTERNATIVE_PATHS
        .iter()
        .find(|(primary, _)| *primary == path)
        .map(|(_, alternatives)| *alternatives)
        .unwrap_or(&[])
}

fn top1_share_pct(doc: &Value, _now: DateTime<Utc>) -> Value {
    let share = CommitHistory::from_document(doc)
        .map(|history| history.top1_author_share_pct())
        .unwrap_or(0.0);
    json!(share)
}

fn active_maintainers_90d(doc: &Value, now: DateTime<Utc>) -> Value {
    let count = CommitHistory::from_document(doc)
        .map(|history| history.active_maintainers_90d(now))
        .unwrap_or(0);
    json!(count)
}

/// Reads metric values from the evidence pack
pub struct MetricResolver<'a> {
    store: &'a EvidenceStore,
    now: DateTime<Utc>,
}

impl<'a> MetricResolver<'a> {
    pub fn new(store: &'a EvidenceStore, now: DateTime<Utc>) -> Self {
        Self { store, now }
    }

    /// Authoritative value for a metric, or `None`. Never fails.
    pub fn resolve(&self, metric: &MetricDef) -> Option<Value> {
        let (path, field) = metric.source.as_ref()?.parts()?;

        match self.store.document(path) {
            Some(doc) => self.resolve_in(&doc, path, field),
            None => self.resolve_alternative(path, field),
        }
    }

    fn resolve_in(&self, doc: &Value, path: &str, field: &str) -> Option<Value> {
        match remap_rule(path, field) {
            RemapRule::Direct(field) => lookup_field(doc, field).cloned(),
            RemapRule::Renamed(renamed) => {
                debug!("Remapped {}:{} -> {}", path, field, renamed);
                lookup_field(doc, renamed).cloned()
            }
            RemapRule::Computed(func) => {
                let value = func(doc, self.now);
                debug!("Computed {}:{} = {}", path, field, value);
                Some(value)
            }
        }
    }

    /// Plain dotted lookup in each alternative document; no remapping
    fn resolve_alternative(&self, path: &str, field: &str) -> Option<Value> {
        alternative_paths(path).iter().find_map(|alt| {
            let value = self.store.read(alt, field)?;
            debug!("Resolved {}:{} from alternative {}", path, field, alt);
            Some(value)
        })
    }
}
