use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory for form files
    #[arg(short = 'd', long, default_value = "forms")]
    pub forms_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!(
        "{}",
        "📝 Initializing Formcraft project...".bright_blue().bold()
    );

    let config = Config {
        forms_dir: args.forms_dir.clone(),
        ..Config::default()
    };

    let forms_dir = config.get_forms_dir(cwd);
    if !forms_dir.exists() {
        fs::create_dir_all(&forms_dir)?;
        println!("  {} Created {}/", "✓".green(), args.forms_dir);
    }

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: formcraft new contact --name \"Contact us\"");
    println!("  2. Run: formcraft preview contact");

    Ok(())
}
