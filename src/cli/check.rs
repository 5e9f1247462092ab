//! Check command - show the active scoring model and its validation warnings

use super::DEFAULT_EVIDENCE_DIR;
use crate::config::{candidate_paths, load_scoring_model, LoadedModel, ModelSource};
use crate::scoring::has_heuristic;
use anyhow::{Context, Result};
use console::style;
use std::io::Write;
use std::path::Path;

/// Run the check command. Exits with status 1 when the model has warnings.
pub fn run(evidence_dir: Option<&Path>, config: Option<&Path>) -> Result<()> {
    let working_dir = std::env::current_dir().context("Cannot determine working directory")?;
    let evidence_root = evidence_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| working_dir.join(DEFAULT_EVIDENCE_DIR));
    let candidates = candidate_paths(config, &evidence_root, &working_dir);
    let loaded = load_scoring_model(&candidates);

    if let (Some(explicit), ModelSource::Embedded) = (config, &loaded.source) {
        anyhow::bail!("could not load scoring model {}", explicit.display());
    }

    print!("{}", render(&loaded, &candidates));

    if !loaded.model.validate().is_empty() {
        std::io::stdout().flush()?;
        std::process::exit(1);
    }
    Ok(())
}

fn render(loaded: &LoadedModel, candidates: &[std::path::PathBuf]) -> String {
    let model = &loaded.model;
    let mut out = String::new();

    out.push_str(&format!(
        "\n{} {} v{}\n",
        style("Scoring model").bold(),
        style(&model.name).cyan(),
        model.version
    ));
    out.push_str(&format!("Source: {}\n", loaded.source));
    if loaded.source == ModelSource::Embedded {
        out.push_str(&format!("{}\n", style("Searched:").dim()));
        for candidate in candidates {
            out.push_str(&format!("  {}\n", style(candidate.display()).dim()));
        }
    }

    out.push_str(&format!("\n{}\n", style("DIMENSIONS").bold()));
    if model.dimensions.is_empty() {
        out.push_str(&format!(
            "  {}\n",
            style("none configured (every score will be 0)").yellow()
        ));
    }
    for dimension in &model.dimensions {
        out.push_str(&format!(
            "  {} {}  weight {:.2}  metrics {}\n",
            style(&dimension.key).bold(),
            style(format!("({})", dimension.label())).dim(),
            model.weight_for(&dimension.key),
            dimension.metrics.len()
        ));
        for metric in &dimension.metrics {
            let source = metric
                .source
                .as_ref()
                .and_then(|s| s.parts())
                .map(|(path, field)| format!("{path}:{field}"));
            let estimated = has_heuristic(&dimension.key, &metric.key);
            let origin = match (source, estimated) {
                (Some(source), true) => format!("{source} (estimated if missing)"),
                (Some(source), false) => source,
                (None, true) => "estimated".to_string(),
                (None, false) => style("no source, never scores").yellow().to_string(),
            };
            out.push_str(&format!(
                "    - {:<32} {:>5.2}  {}\n",
                metric.key, metric.metric_weight, origin
            ));
        }
    }

    let warnings = model.validate();
    if warnings.is_empty() {
        out.push_str(&format!("\n{} No problems found\n", style("✓").green()));
    } else {
        out.push_str(&format!(
            "\n{} ({})\n",
            style("WARNINGS").bold().yellow(),
            warnings.len()
        ));
        for warning in &warnings {
            out.push_str(&format!("  {} {}\n", style("!").yellow(), warning));
        }
    }

    out
}
