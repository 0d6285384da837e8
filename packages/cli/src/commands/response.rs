use super::open_session;
use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use formcraft_blocks::Registry;
use formcraft_editor::{describe_response, validate_submission, Submission};
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct ResponseArgs {
    /// Form name or path
    pub form: String,

    /// JSON object of submitted values keyed by block id
    pub submission: String,
}

pub fn response(args: ResponseArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let registry = Registry::builtin();
    let session = open_session(&config, cwd, &args.form, registry)?;

    let path = cwd.join(&args.submission);
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let values: Submission = serde_json::from_str(&content)
        .with_context(|| format!("Submission must be a JSON object: {}", path.display()))?;

    println!("{}", describe_response(session.form(), &values));

    let errors = validate_submission(session.form(), registry, &values);
    if errors.is_empty() {
        return Ok(());
    }

    println!();
    for (id, message) in &errors {
        let label = session
            .form()
            .find(id)
            .and_then(|block| block.label())
            .unwrap_or(id.as_str());
        eprintln!("  {} {} - {}", "✗".red(), label, message.red());
    }
    Err(anyhow!("{} required fields are missing", errors.len()))
}
