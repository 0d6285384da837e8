use super::open_session;
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use formcraft_blocks::Registry;
use formcraft_editor::{Mutation, MutationOutcome};
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Form name or path
    pub form: String,

    /// JSON file holding a list of mutations
    pub mutations: String,

    /// Print the result instead of saving it
    #[arg(long)]
    pub dry_run: bool,
}

pub fn apply(args: ApplyArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut session = open_session(&config, cwd, &args.form, Registry::builtin())?;

    let mutations = read_mutations(&cwd.join(&args.mutations))?;
    let outcomes = session.apply_batch(&mutations)?;

    for (mutation, outcome) in mutations.iter().zip(&outcomes) {
        match outcome {
            MutationOutcome::Applied { block_id } => {
                println!("  {} {} {}", "✓".green(), mutation.name(), block_id.dimmed())
            }
            MutationOutcome::NoOp => {
                println!("  {} {} (no change)", "-".dimmed(), mutation.name())
            }
        }
    }

    if args.dry_run {
        println!("{}", session.document().to_json(true)?);
    } else if session.document().is_dirty() {
        session.document_mut().save(config.pretty)?;
        println!(
            "{} Saved version {}",
            "✅".green(),
            session.version()
        );
    }
    Ok(())
}

fn read_mutations(path: &Path) -> Result<Vec<Mutation>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mutations = serde_json::from_str(&content)
        .with_context(|| format!("Invalid mutation list in {}", path.display()))?;
    Ok(mutations)
}
