//! JSON reporter
//!
//! Outputs the ScoreResult as pretty-printed JSON. This is also the
//! `score.json` document written into the evidence pack.

use crate::models::ScoreResult;
use anyhow::Result;

/// Render result as JSON
pub fn render(result: &ScoreResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}
