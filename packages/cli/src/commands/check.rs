use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use formcraft_blocks::{
    deserialize, migrate_duplicate_ids, serialize, serialize_pretty, DeserializeError, IdGenerator,
    Registry,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Directory to check (defaults to the configured forms directory)
    pub path: Option<String>,

    /// Rename blocks with duplicate ids and save the repaired forms
    #[arg(long)]
    pub repair: bool,
}

pub fn check(args: CheckArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let dir = match &args.path {
        Some(path) => cwd.join(path),
        None => config.get_forms_dir(cwd),
    };

    if !dir.exists() {
        return Err(anyhow!("Forms directory does not exist: {:?}", dir));
    }

    println!("{}", "🔍 Checking forms...".bright_blue().bold());

    let files = find_form_files(&dir);
    debug!(dir = %dir.display(), count = files.len(), "discovered form files");
    if files.is_empty() {
        println!("{}", "⚠️  No form files found".yellow());
        return Ok(());
    }

    let registry = Registry::builtin();
    let mut error_count = 0;

    for file in &files {
        let relative_path = file.strip_prefix(&dir).unwrap_or(file);
        match check_file(file, &args, &config, registry) {
            Ok(0) => println!("  {} {}", "✓".green(), relative_path.display()),
            Ok(repaired) => println!(
                "  {} {} - renamed {} blocks",
                "✓".green(),
                relative_path.display(),
                repaired
            ),
            Err(e) => {
                error_count += 1;
                eprintln!(
                    "  {} {} - {}",
                    "✗".red(),
                    relative_path.display(),
                    e.to_string().red()
                );
            }
        }
    }

    println!();
    if error_count == 0 {
        println!("{} {} forms are valid", "✅".green(), files.len());
        Ok(())
    } else {
        Err(anyhow!("{} of {} forms are invalid", error_count, files.len()))
    }
}

/// Returns how many blocks were renamed
fn check_file(file: &Path, args: &CheckArgs, config: &Config, registry: &Registry) -> Result<usize> {
    let content = fs::read_to_string(file)?;

    match deserialize(&content, registry) {
        Ok(_) => Ok(0),
        Err(DeserializeError::DuplicateId(_)) if args.repair => {
            let seed = file
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            let mut ids = IdGenerator::new(&seed);
            let (doc, repaired) = migrate_duplicate_ids(&content, registry, &mut ids)?;
            let output = if config.pretty {
                serialize_pretty(&doc)?
            } else {
                serialize(&doc)?
            };
            fs::write(file, output)?;
            Ok(repaired)
        }
        Err(err) => Err(err.into()),
    }
}

fn find_form_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|path| path.extension().map(|ext| ext == "json").unwrap_or(false))
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_form_files_recurses() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("archive")).unwrap();
        fs::write(dir.path().join("a.json"), "[]").unwrap();
        fs::write(dir.path().join("archive").join("b.json"), "[]").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let files = find_form_files(dir.path());
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_repair_renames_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("dup.json");
        fs::write(
            &file,
            r#"[{"id":"a","blockType":"Heading","attributes":{"label":"One"}},
                {"id":"a","blockType":"Heading","attributes":{"label":"Two"}}]"#,
        )
        .unwrap();

        let config = Config::default();
        let registry = Registry::builtin();
        let plain = CheckArgs {
            path: None,
            repair: false,
        };
        assert!(check_file(&file, &plain, &config, registry).is_err());

        let repair = CheckArgs {
            path: None,
            repair: true,
        };
        assert_eq!(check_file(&file, &repair, &config, registry).unwrap(), 1);
        assert_eq!(check_file(&file, &plain, &config, registry).unwrap(), 0);
    }
}
