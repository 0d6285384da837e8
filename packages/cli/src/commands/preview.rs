use super::open_session;
use crate::config::Config;
use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;
use formcraft_blocks::render::html::{render_html, render_page};
use formcraft_blocks::Registry;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PreviewView {
    /// Builder canvas
    Canvas,
    /// Live submission form
    Form,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Form name or path
    pub form: String,

    /// Which view to render
    #[arg(long, value_enum, default_value = "form")]
    pub view: PreviewView,

    /// Select a block (highlighted on the canvas)
    #[arg(long)]
    pub select: Option<String>,

    /// Output file (stdout when absent)
    #[arg(short, long)]
    pub out: Option<String>,

    /// Emit only the form markup, without the page shell
    #[arg(long)]
    pub fragment: bool,
}

pub fn preview(args: PreviewArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut session = open_session(&config, cwd, &args.form, Registry::builtin())?;
    if let Some(id) = &args.select {
        session.select(Some(id.as_str()))?;
    }

    let nodes = match args.view {
        PreviewView::Canvas => session.canvas(),
        PreviewView::Form => session.live_form().view(&BTreeMap::new()),
    };

    let options = config.html_options(&session.document().form_id);
    let html = if args.fragment {
        render_html(&nodes, &options)
    } else {
        render_page(&nodes, &options)
    };

    match &args.out {
        Some(out) => {
            let path = cwd.join(out);
            fs::write(&path, html)?;
            println!("  {} {}", "✓".green(), path.display());
        }
        None => print!("{}", html),
    }
    Ok(())
}
