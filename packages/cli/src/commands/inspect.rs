use super::open_session;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use formcraft_blocks::{BlockInstance, Registry};
use std::path::Path;

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Form name or path
    pub form: String,

    /// Print the stored JSON instead of the tree
    #[arg(long)]
    pub json: bool,
}

pub fn inspect(args: InspectArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let session = open_session(&config, cwd, &args.form, Registry::builtin())?;

    if args.json {
        println!("{}", session.document().to_json(true)?);
        return Ok(());
    }

    let form = session.form();
    println!(
        "{} {} ({} blocks)",
        "📋".bright_blue(),
        session.document().form_id.bold(),
        form.block_count()
    );
    for block in &form.blocks {
        print_block(block, 1);
        for child in block.children() {
            print_block(child, 2);
        }
    }
    Ok(())
}

fn print_block(block: &BlockInstance, depth: usize) {
    let indent = "  ".repeat(depth);
    let lock = if block.is_locked { " 🔒" } else { "" };
    let label = block.label().unwrap_or_default();
    println!(
        "{}{} {} {}{}",
        indent,
        block.block_type.to_string().cyan(),
        block.id.dimmed(),
        label,
        lock
    );
}
