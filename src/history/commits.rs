//! Commit sample parsing and authorship statistics.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Trailing window for `active_maintainers_90d`
pub const ACTIVE_MAINTAINER_WINDOW_DAYS: i64 = 90;

/// Message fragments that mark a commit as shipping a feature
pub const FEATURE_KEYWORDS: &[&str] = &["feat", "feature", "new", "add", "implement"];

const UNKNOWN_AUTHOR: &str = "unknown";

/// A single commit from the collector's recent-commit sample.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitRecord {
    pub message: String,
    /// Author email, `"unknown"` when the collector could not record one
    pub author_email: String,
    /// Raw ISO-8601 timestamp as written by the collector
    pub date: Option<String>,
}

impl CommitRecord {
    fn from_value(value: &Value) -> Self {
        let text = |v: Option<&Value>| v.and_then(Value::as_str).map(str::to_string);
        let author = value.get("author");

        Self {
            message: text(value.get("message")).unwrap_or_default(),
            author_email: text(author.and_then(|a| a.get("email")))
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            date: text(value.get("date")),
        }
    }

    /// Parsed commit timestamp, `None` when absent or malformed
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.date.as_deref().and_then(parse_commit_date)
    }

    fn is_feature(&self) -> bool {
        let message = self.message.to_lowercase();
        FEATURE_KEYWORDS.iter().any(|kw| message.contains(kw))
    }
}

/// The bounded commit sample recorded in an evidence pack (newest first).
#[derive(Debug, Clone, Default)]
pub struct CommitHistory {
    commits: Vec<CommitRecord>,
}

impl CommitHistory {
    pub fn new(commits: Vec<CommitRecord>) -> Self {
        Self { commits }
    }

    /// Build from a `change/commits.json` document.
    ///
    /// Returns `None` when the document has no `recent_commits` list.
    pub fn from_document(doc: &Value) -> Option<Self> {
        let commits = doc.get("recent_commits")?.as_array()?;
        Some(Self::new(commits.iter().map(CommitRecord::from_value).collect()))
    }

    pub fn commits(&self) -> &[CommitRecord] {
        &self.commits
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// Percentage of the sample authored by the single most frequent email.
    ///
    /// Rounded to two decimals; `0.0` for an empty sample.
    pub fn top1_author_share_pct(&self) -> f64 {
        if self.commits.is_empty() {
            return 0.0;
        }

        let mut per_author: HashMap<&str, usize> = HashMap::new();
        for commit in &self.commits {
            *per_author.entry(commit.author_email.as_str()).or_default() += 1;
        }
        let top = per_author.values().copied().max().unwrap_or(0);

        round2(top as f64 / self.commits.len() as f64 * 100.0)
    }

    /// Distinct author emails with a commit inside the trailing window.
    ///
    /// Commits whose timestamp is missing or unparseable are skipped.
    pub fn active_maintainers(&self, now: DateTime<Utc>, window: Duration) -> usize {
        let cutoff = now - window;
        self.commits
            .iter()
            .filter(|c| c.timestamp().is_some_and(|ts| ts >= cutoff))
            .map(|c| c.author_email.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// [`active_maintainers`](Self::active_maintainers) over the standard 90-day window
    pub fn active_maintainers_90d(&self, now: DateTime<Utc>) -> usize {
        self.active_maintainers(now, Duration::days(ACTIVE_MAINTAINER_WINDOW_DAYS))
    }

    /// Commits with a parseable timestamp at or after `since`
    pub fn commits_since(&self, since: DateTime<Utc>) -> usize {
        self.commits
            .iter()
            .filter(|c| c.timestamp().is_some_and(|ts| ts >= since))
            .count()
    }

    /// Feature commits among the newest `sample` commits, capped at `cap`
    pub fn feature_commits(&self, sample: usize, cap: usize) -> usize {
        self.commits
            .iter()
            .take(sample)
            .filter(|c| c.is_feature())
            .count()
            .min(cap)
    }
}

/// Parse an ISO-8601 commit timestamp.
///
/// Accepts RFC 3339 (including a trailing `Z`), a space instead of `T`, and
/// timestamps or bare dates without an offset, which are taken as UTC.
pub fn parse_commit_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z"] {
        if let Ok(dt) = DateTime::<FixedOffset>::parse_from_str(raw, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap()
    }

    fn commit(email: &str, date: &str, message: &str) -> CommitRecord {
        CommitRecord {
            message: message.to_string(),
            author_email: email.to_string(),
            date: Some(date.to_string()),
        }
    }

    #[test]
    fn test_top1_share_empty_sample() {
        assert_eq!(CommitHistory::default().top1_author_share_pct(), 0.0);
    }

    #[test]
    fn test_top1_share_single_author() {
        let history = CommitHistory::new(vec![
            commit("a@co", "2025-06-01T10:00:00Z", "one"),
            commit("a@co", "2025-06-02T10:00:00Z", "two"),
            commit("a@co", "2025-06-03T10:00:00Z", "three"),
        ]);
        assert_eq!(history.top1_author_share_pct(), 100.0);
    }

    #[test]
    fn test_top1_share_two_of_three() {
        let history = CommitHistory::new(vec![
            commit("x@co", "2025-06-01T10:00:00Z", "a"),
            commit("y@co", "2025-06-02T10:00:00Z", "b"),
            commit("x@co", "2025-06-03T10:00:00Z", "c"),
        ]);
        assert_eq!(history.top1_author_share_pct(), 66.67);
    }

    #[test]
    fn test_active_maintainers_window() {
        let history = CommitHistory::new(vec![
            commit("x@co", "2025-06-20T10:00:00Z", "recent"),
            commit("y@co", "2025-04-15T10:00:00+02:00", "inside window"),
            commit("z@co", "2024-01-01T00:00:00Z", "stale"),
        ]);
        assert_eq!(history.active_maintainers_90d(now()), 2);
    }

    #[test]
    fn test_active_maintainers_skips_malformed_dates() {
        let mut history = vec![
            commit("x@co", "2025-06-20T10:00:00Z", "ok"),
            commit("y@co", "last tuesday", "bad date"),
        ];
        history.push(CommitRecord {
            date: None,
            ..commit("z@co", "", "no date")
        });
        assert_eq!(CommitHistory::new(history).active_maintainers_90d(now()), 1);
    }

    #[test]
    fn test_active_maintainers_order_independent() {
        let commits = vec![
            commit("x@co", "2025-06-20T10:00:00Z", "a"),
            commit("y@co", "2025-05-20T10:00:00Z", "b"),
            commit("x@co", "2025-05-01T10:00:00Z", "c"),
            commit("z@co", "2023-05-01T10:00:00Z", "d"),
        ];
        let mut reversed = commits.clone();
        reversed.reverse();

        assert_eq!(
            CommitHistory::new(commits).active_maintainers_90d(now()),
            CommitHistory::new(reversed).active_maintainers_90d(now())
        );
    }

    #[test]
    fn test_naive_timestamp_is_utc() {
        let parsed = parse_commit_date("2025-06-01T08:30:00").expect("naive timestamp");
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 6, 1, 8, 30, 0).unwrap());

        let offset = parse_commit_date("2025-06-01T10:30:00+02:00").expect("offset timestamp");
        assert_eq!(offset, parsed);

        let spaced = parse_commit_date("2025-06-01 08:30:00").expect("space separator");
        assert_eq!(spaced, parsed);

        assert!(parse_commit_date("").is_none());
        assert!(parse_commit_date("June 1st").is_none());
    }

    #[test]
    fn test_commits_since() {
        let history = CommitHistory::new(vec![
            commit("x@co", "2025-06-29T10:00:00Z", "a"),
            commit("x@co", "2025-06-10T10:00:00Z", "b"),
            commit("x@co", "2025-05-01T10:00:00Z", "c"),
            commit("x@co", "garbage", "d"),
        ]);
        assert_eq!(history.commits_since(now() - Duration::days(30)), 2);
    }

    #[test]
    fn test_feature_commits_sample_and_cap() {
        let mut commits: Vec<CommitRecord> = (0..15)
            .map(|i| commit("x@co", "2025-06-01T00:00:00Z", &format!("feat: thing {i}")))
            .collect();
        commits.push(commit("x@co", "2025-06-01T00:00:00Z", "fix: typo"));
        let history = CommitHistory::new(commits);
        assert_eq!(history.feature_commits(20, 12), 12);

        let history = CommitHistory::new(vec![
            commit("x@co", "2025-06-01T00:00:00Z", "Add login page"),
            commit("x@co", "2025-06-01T00:00:00Z", "fix crash"),
            commit("x@co", "2025-06-01T00:00:00Z", "Implement retries"),
        ]);
        assert_eq!(history.feature_commits(20, 12), 2);
    }

    #[test]
    fn test_from_document() {
        let doc = json!({
            "total_commits": 2,
            "recent_commits": [
                {"sha": "a1", "message": "init", "author": {"name": "X", "email": "x@co"}, "date": "2025-06-01T00:00:00Z"},
                {"sha": "b2", "message": "more", "author": {}, "date": null}
            ]
        });
        let history = CommitHistory::from_document(&doc).expect("recent_commits present");
        assert_eq!(history.len(), 2);
        assert_eq!(history.commits()[0].author_email, "x@co");
        assert_eq!(history.commits()[1].author_email, "unknown");
        assert!(history.commits()[1].timestamp().is_none());

        assert!(CommitHistory::from_document(&json!({"tags": []})).is_none());
    }
}
