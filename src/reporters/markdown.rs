//! Markdown reporter for GitHub-flavored Markdown output
//!
//! Suitable for pull request comments and pipeline summaries.

use super::score_status;
use crate::models::{Grade, ScoreResult};
use anyhow::Result;

/// Render result as GitHub-flavored Markdown
pub fn render(result: &ScoreResult) -> Result<String> {
    let mut md = String::new();

    md.push_str(&render_header(result));
    md.push('\n');
    md.push_str(&render_dimensions(result));
    md.push('\n');
    md.push_str(&render_notes(result));
    md.push('\n');
    md.push_str(&render_footer(result));

    Ok(md)
}

fn render_header(result: &ScoreResult) -> String {
    let grade_emoji = match result.grade {
        Grade::A => "🏆",
        Grade::B => "⭐",
        Grade::C => "⚠️",
        Grade::D => "❌",
        Grade::E => "💀",
    };

    format!(
        r#"# {} Engineering Score: {}

**Grade: {}** | **Score: {:.2}/100** | **Product quality: {:.1}/{}**

Commit: `{}`
"#,
        grade_emoji,
        result.repo,
        result.grade,
        result.final_score,
        result.product_quality.rating,
        result.product_quality.scale.max,
        result.commit
    )
}

fn render_dimensions(result: &ScoreResult) -> String {
    let mut md = String::from("## Dimensions\n\n");
    if result.scores.is_empty() {
        md.push_str("_No dimensions configured._\n");
        return md;
    }

    md.push_str("| Dimension | Score | Status |\n");
    md.push_str("|-----------|-------|--------|\n");
    for (key, score) in &result.scores {
        md.push_str(&format!(
            "| {} | {:.1}/100 | {} |\n",
            key,
            score,
            score_status(*score)
        ));
    }
    md
}

fn render_notes(result: &ScoreResult) -> String {
    let mut md = String::from("## Notes\n\n");
    if result.notes.is_empty() {
        md.push_str("_None._\n");
    }
    for note in &result.notes {
        md.push_str(&format!("- {note}\n"));
    }
    md
}

fn render_footer(result: &ScoreResult) -> String {
    format!(
        "---\n\n_Generated by metrica on {}_\n",
        result.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}
