use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use formcraft_blocks::{FormDocument, IdGenerator, Registry};
use formcraft_editor::Document;
use std::path::Path;

#[derive(Debug, Args)]
pub struct NewArgs {
    /// File name of the form, without extension
    pub form: String,

    /// Title shown in the form's heading
    #[arg(short, long, default_value = "")]
    pub name: String,

    /// Description paragraph under the title
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Overwrite an existing form
    #[arg(short, long)]
    pub force: bool,
}

pub fn new(args: NewArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let path = config
        .get_forms_dir(cwd)
        .join(format!("{}.json", args.form));

    if path.exists() && !args.force {
        return Err(anyhow!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ));
    }

    let mut ids = IdGenerator::new(&args.form);
    let form = FormDocument::seed(&args.name, &args.description, Registry::builtin(), &mut ids);
    let mut document = Document::create(&path, form);
    document.save(config.pretty)?;

    println!("  {} Created {}", "✓".green(), path.display());
    Ok(())
}
