use formcraft_blocks::render::html::HtmlOptions;
use formcraft_editor::SessionOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "formcraft.config.json";

/// Formcraft configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding form files
    #[serde(default = "default_forms_dir")]
    pub forms_dir: String,

    /// Theme colour of rendered previews
    #[serde(default = "default_primary_color")]
    pub primary_color: String,

    #[serde(default = "default_background_color")]
    pub background_color: String,

    /// Undo steps kept per editing session
    #[serde(default = "default_undo_levels")]
    pub undo_levels: usize,

    /// Pretty-print saved forms
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_forms_dir() -> String {
    "forms".to_string()
}

fn default_primary_color() -> String {
    "#673ab7".to_string()
}

fn default_background_color() -> String {
    "#e6f3ff".to_string()
}

fn default_undo_levels() -> usize {
    100
}

fn default_pretty() -> bool {
    true
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to the forms directory
    pub fn get_forms_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.forms_dir)
    }

    /// Resolve a form argument: an existing path, or a name inside the
    /// forms directory
    pub fn resolve_form(&self, cwd: &Path, form: &str) -> PathBuf {
        let direct = cwd.join(form);
        if direct.exists() {
            return direct;
        }
        let file = if form.ends_with(".json") {
            form.to_string()
        } else {
            format!("{}.json", form)
        };
        self.get_forms_dir(cwd).join(file)
    }

    pub fn html_options(&self, title: &str) -> HtmlOptions {
        HtmlOptions {
            title: title.to_string(),
            primary_color: self.primary_color.clone(),
            background_color: self.background_color.clone(),
            ..HtmlOptions::default()
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            undo_levels: self.undo_levels,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            forms_dir: default_forms_dir(),
            primary_color: default_primary_color(),
            background_color: default_background_color(),
            undo_levels: default_undo_levels(),
            pretty: default_pretty(),
        }
    }
}
