//! Init command - write the reference scoring model

use crate::config::REFERENCE_MODEL_JSON;
use anyhow::{Context, Result};
use console::style;
use std::path::Path;

const MODEL_FILE: &str = "metrica.json";

/// Run the init command
pub fn run(dir: &Path, force: bool) -> Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("Path is not a directory: {}", dir.display());
    }

    let target = dir.join(MODEL_FILE);
    if target.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            target.display()
        );
    }

    std::fs::write(&target, REFERENCE_MODEL_JSON)
        .with_context(|| format!("Failed to write {}", target.display()))?;

    println!(
        "{} Created {}",
        style("✓").green(),
        style(target.display()).cyan()
    );
    println!(
        "\nEdit dimensions and weights, then run {}",
        style("metrica check").bold()
    );
    Ok(())
}
