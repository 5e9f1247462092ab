//! Metrica - engineering-quality scoring for repository evidence packs
//!
//! Reads the JSON artifacts collectors leave in an evidence pack, resolves
//! each configured metric (estimating it when a scanner did not run),
//! normalizes it to 0-100 and aggregates dimensions into a final score,
//! product-quality rating and grade.
//!
//! ```no_run
//! use metrica::config::ScoringModel;
//! use metrica::evidence::EvidenceStore;
//! use metrica::scoring::ScoringEngine;
//!
//! let model = ScoringModel::reference().expect("embedded model");
//! let store = EvidenceStore::new("out");
//! let result = ScoringEngine::new(&model, &store).calculate("my-repo", "abc123");
//! println!("{} ({})", result.final_score, result.grade);
//! ```

pub mod cli;
pub mod config;
pub mod evidence;
pub mod history;
pub mod models;
pub mod reporters;
pub mod scoring;
