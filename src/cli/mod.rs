//! CLI command definitions and handlers

mod check;
mod init;
mod score;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Directory collectors write the evidence pack into, relative to the repository
pub const DEFAULT_EVIDENCE_DIR: &str = "out";

/// Metrica - engineering-quality scoring for evidence packs
#[derive(Parser, Debug)]
#[command(name = "metrica")]
#[command(
    version,
    about = "Score a repository evidence pack across configurable engineering dimensions",
    long_about = "Metrica reads the JSON artifacts collected for a repository (commit history, \
dependency scans, coverage, build metadata), scores each configured dimension from 0 to 100, \
and combines them into a weighted final score, a 1-10 product-quality rating and an A-E grade.\n\n\
Missing scanner output is estimated from the rest of the pack instead of scoring zero.",
    after_help = "\
Examples:
  metrica score out                          Score ./out and write out/score.json
  metrica score out --format json --no-write Print the result without writing it
  metrica check                              Validate the discovered scoring model
  metrica init                               Write the reference metrica.json"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace); RUST_LOG overrides it
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score an evidence pack and write score.json into it
    #[command(after_help = "\
Examples:
  metrica score out                                  Text report, writes out/score.json
  metrica score out --config team.toml               Use a specific scoring model
  metrica score out --format markdown -o score.md    Markdown report to a file
  metrica score out --repo-name api --commit-sha abc Override repository identity")]
    Score {
        /// Evidence pack directory
        evidence_dir: PathBuf,

        /// Scoring model file (.json or .toml); skips discovery
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Repository name recorded in the result
        #[arg(long, env = "BUILD_REPOSITORY_NAME")]
        repo_name: Option<String>,

        /// Commit recorded in the result
        #[arg(long, env = "BUILD_SOURCEVERSION")]
        commit_sha: Option<String>,

        /// Output format: text, json, markdown (or md)
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json", "markdown", "md"])]
        format: String,

        /// Write the report to a file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Do not write score.json into the evidence pack
        #[arg(long)]
        no_write: bool,
    },

    /// Show which scoring model would be used and validate it
    Check {
        /// Evidence pack directory used for model discovery
        evidence_dir: Option<PathBuf>,

        /// Scoring model file (.json or .toml); skips discovery
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },

    /// Write the reference scoring model as metrica.json
    Init {
        /// Target directory
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Overwrite an existing metrica.json
        #[arg(long)]
        force: bool,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Score {
            evidence_dir,
            config,
            repo_name,
            commit_sha,
            format,
            output,
            no_write,
        } => score::run(score::ScoreOptions {
            evidence_dir,
            config,
            repo_name,
            commit_sha,
            format,
            output,
            write_score: !no_write,
        }),

        Commands::Check {
            evidence_dir,
            config,
        } => check::run(evidence_dir.as_deref(), config.as_deref()),

        Commands::Init { dir, force } => init::run(&dir, force),
    }
}
