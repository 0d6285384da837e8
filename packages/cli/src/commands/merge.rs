use super::open_session;
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use formcraft_blocks::Registry;
use formcraft_editor::GenerationOutcome;
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct MergeArgs {
    /// Form name or path
    pub form: String,

    /// File holding the collaborator's answer
    pub answer: String,

    /// Request text the answer was generated for
    #[arg(short, long, default_value = "merge generated blocks")]
    pub request: String,

    /// Write the request context for the collaborator and exit
    #[arg(long)]
    pub print_request: bool,
}

pub fn merge(args: MergeArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut session = open_session(&config, cwd, &args.form, Registry::builtin())?;

    let (ticket, request) = session.begin_generation(&args.request)?;
    if args.print_request {
        println!("{}", request.to_json()?);
        return Ok(());
    }

    let answer_path = cwd.join(&args.answer);
    let answer = fs::read_to_string(&answer_path)
        .with_context(|| format!("Failed to read {}", answer_path.display()))?;

    match session.complete_generation(ticket, Ok(answer))? {
        GenerationOutcome::Merged { action, added } => {
            for id in &added {
                println!("  {} {}", "✓".green(), id);
            }
            session.document_mut().save(config.pretty)?;
            println!(
                "{} {} merged {} blocks",
                "✅".green(),
                action.as_str(),
                added.len()
            );
        }
        GenerationOutcome::Discarded => {
            println!("{}", "⚠️  Answer discarded".yellow());
        }
    }
    Ok(())
}
