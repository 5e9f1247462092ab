//! Change history statistics
//!
//! Derived authorship and cadence figures computed from the collector's
//! `change/commits.json` document: top-1 author share (bus factor), active
//! maintainers over a trailing window, commit counts since a date, and
//! feature-commit counts.
//!
//! All functions are pure; the evaluation instant is passed in explicitly.

mod commits;

pub use commits::{
    parse_commit_date, CommitHistory, CommitRecord, ACTIVE_MAINTAINER_WINDOW_DAYS,
    FEATURE_KEYWORDS,
};
