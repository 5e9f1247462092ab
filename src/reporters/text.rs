//! Text (terminal) reporter with colors and formatting

use super::score_status;
use crate::models::{Grade, ScoreResult};
use anyhow::Result;
use console::{style, StyledObject};

const BAR_WIDTH: usize = 20;

fn grade_style(grade: Grade) -> StyledObject<Grade> {
    let styled = style(grade).bold();
    match grade {
        Grade::A | Grade::B => styled.green(),
        Grade::C => styled.yellow(),
        Grade::D | Grade::E => styled.red(),
    }
}

fn score_style(score: f64) -> StyledObject<String> {
    let styled = style(format!("{score:>5.1}"));
    match score {
        s if s >= 80.0 => styled.green(),
        s if s >= 60.0 => styled.yellow(),
        _ => styled.red(),
    }
}

fn score_bar(score: f64) -> String {
    let filled = ((score.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// Render result as formatted terminal output
pub fn render(result: &ScoreResult) -> Result<String> {
    let mut out = String::new();

    // Header
    out.push_str(&format!("\n{}\n", style("Metrica Engineering Score").bold()));
    out.push_str(&format!(
        "{}\n",
        style("──────────────────────────────────────").dim()
    ));
    out.push_str(&format!(
        "Repo: {}  Commit: {}\n",
        style(&result.repo).cyan(),
        style(&result.commit).dim()
    ));
    out.push_str(&format!(
        "Score: {}  Grade: {}  Product quality: {:.1}/{}\n\n",
        style(format!("{:.2}/100", result.final_score)).bold(),
        grade_style(result.grade),
        result.product_quality.rating,
        result.product_quality.scale.max
    ));

    // Dimension scores
    out.push_str(&format!("{}\n", style("DIMENSIONS").bold()));
    if result.scores.is_empty() {
        out.push_str(&format!("  {}\n", style("No dimensions configured").dim()));
    }
    let width = result
        .scores
        .keys()
        .map(|key| key.chars().count())
        .max()
        .unwrap_or(0);
    for (key, score) in &result.scores {
        out.push_str(&format!(
            "  {:<width$}  {}  {}  {}\n",
            key,
            score_style(*score),
            style(score_bar(*score)).dim(),
            score_status(*score),
        ));
    }

    // Notes
    if !result.notes.is_empty() {
        out.push_str(&format!("\n{}\n", style("NOTES").bold()));
        for note in &result.notes {
            out.push_str(&format!("  • {note}\n"));
        }
    }

    out.push_str(&format!(
        "\n{}\n",
        style(format!(
            "Generated {}",
            result.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ))
        .dim()
    ));

    Ok(out)
}
