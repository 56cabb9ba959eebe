//! Check command implementation
//!
//! Probe-only drift report: classifies every declared dependency without
//! performing any network operation or touching the working trees.

use std::path::Path;

use colored::Colorize;

use depsync_core::{CheckResult, CheckState, Manifest, Synchronizer};
use depsync_git::GitVcs;

use crate::error::Result;

/// Run the check command
pub fn run_check(manifest: &Path, root: &Path, json: bool) -> Result<()> {
    let set = Manifest::load(manifest)?.into_set()?;

    if set.is_empty() {
        if json {
            println!("[]");
        } else {
            println!(
                "{} No dependencies declared. Nothing to check.",
                "OK".green().bold()
            );
        }
        return Ok(());
    }

    if !json {
        println!(
            "{} Checking {} dependencies...",
            "=>".blue().bold(),
            set.len()
        );
    }

    let synchronizer = Synchronizer::new(root, GitVcs::new());
    let results = synchronizer.check(&set);

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    for result in &results {
        print_result(result);
    }

    if results.iter().all(CheckResult::is_satisfied) {
        println!(
            "{} All dependencies are at their pinned revisions. No drift detected.",
            "OK".green().bold()
        );
    } else {
        println!();
        println!("Run {} to update.", "depsync sync".cyan());
    }
    Ok(())
}

fn print_result(result: &CheckResult) {
    match &result.state {
        CheckState::Satisfied => {
            println!(
                "   {} {} at pinned revision",
                "OK".green(),
                result.name.cyan()
            );
        }
        CheckState::Stale { current } => {
            println!(
                "   {} {} checked out at {}",
                "STALE".yellow().bold(),
                result.name.cyan(),
                short_revision(current)
            );
        }
        CheckState::Missing => {
            println!(
                "   {} {} not fetched yet",
                "MISSING".yellow().bold(),
                result.name.cyan()
            );
        }
        CheckState::Conflict => {
            println!(
                "   {} {} path occupied by non-checkout content",
                "CONFLICT".red().bold(),
                result.name.cyan()
            );
        }
    }
}

fn short_revision(revision: &str) -> &str {
    revision.get(..12).unwrap_or(revision)
}
