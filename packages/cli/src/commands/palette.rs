use anyhow::Result;
use clap::Args;
use colored::Colorize;
use formcraft_blocks::{BlockCategory, Registry};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Args)]
pub struct PaletteArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PaletteItem {
    block_type: String,
    category: String,
    label: &'static str,
    icon: &'static str,
}

const CATEGORIES: [BlockCategory; 3] = [
    BlockCategory::Layout,
    BlockCategory::Field,
    BlockCategory::Content,
];

pub fn palette(args: PaletteArgs, _cwd: &Path) -> Result<()> {
    let registry = Registry::builtin();
    let items: Vec<PaletteItem> = CATEGORIES
        .iter()
        .flat_map(|category| registry.list_by_category(*category))
        .map(|definition| {
            let entry = definition.palette();
            PaletteItem {
                block_type: definition.block_type().to_string(),
                category: definition.category().to_string(),
                label: entry.label,
                icon: entry.icon,
            }
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    let mut current = String::new();
    for item in &items {
        if item.category != current {
            println!("{}", item.category.bright_blue().bold());
            current = item.category.clone();
        }
        println!(
            "  {:<12} {} {}",
            item.block_type.cyan(),
            item.label,
            format!("({})", item.icon).dimmed()
        );
    }
    Ok(())
}
