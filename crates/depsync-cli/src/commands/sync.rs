//! Sync command implementation

use std::path::Path;

use colored::Colorize;

use depsync_core::{
    CancelToken, Manifest, SyncOptions, SyncOutcome, SyncResult, Synchronizer,
};
use depsync_git::GitVcs;

use crate::error::{CliError, Result};

/// Run the sync command
///
/// Brings every dependency declared in the manifest to its pinned revision
/// under `root`. Exits non-zero (via the returned error) if any record
/// failed; per-record failures never stop the remaining records.
pub fn run_sync(manifest: &Path, root: &Path, force: bool, jobs: usize, json: bool) -> Result<()> {
    let set = Manifest::load(manifest)?.into_set()?;

    if set.is_empty() {
        if json {
            println!("[]");
        } else {
            println!(
                "{} No dependencies declared. Nothing to do.",
                "OK".green().bold()
            );
        }
        return Ok(());
    }

    if !json {
        println!(
            "{} Synchronizing {} dependencies...",
            "=>".blue().bold(),
            set.len()
        );
    }

    let cancel = CancelToken::new();
    let options = SyncOptions {
        force,
        jobs,
        cancel: cancel.clone(),
    };
    let synchronizer = Synchronizer::with_options(root, GitVcs::with_cancel(cancel), options);
    let results = synchronizer.sync(&set);

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for result in &results {
            print_result(result);
        }
    }

    let failed = results.iter().filter(|r| r.is_failure()).count();
    if failed > 0 {
        if !json {
            println!();
            println!(
                "{} {} of {} dependencies failed.",
                "ERROR".red().bold(),
                failed,
                results.len()
            );
        }
        return Err(CliError::user(format!(
            "{} of {} dependencies failed to synchronize",
            failed,
            results.len()
        )));
    }

    if !json {
        println!(
            "{} All dependencies are at their pinned revisions.",
            "OK".green().bold()
        );
    }
    Ok(())
}

fn print_result(result: &SyncResult) {
    match &result.outcome {
        SyncOutcome::AlreadySatisfied => {
            println!(
                "   {} {} already at pinned revision",
                "OK".green(),
                result.name.cyan()
            );
        }
        SyncOutcome::Synced => {
            println!(
                "   {} {} fetched and checked out",
                "OK".green(),
                result.name.cyan()
            );
        }
        SyncOutcome::Failed { kind, message } => {
            println!(
                "   {} {} {}: {}",
                "!".red(),
                result.name.cyan(),
                kind,
                message
            );
        }
    }
}
