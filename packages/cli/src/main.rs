mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    apply, check, init, inspect, merge, new, palette, preview, response, ApplyArgs, CheckArgs,
    InitArgs, InspectArgs, MergeArgs, NewArgs, PaletteArgs, PreviewArgs, ResponseArgs,
};
use tracing_subscriber::EnvFilter;

/// Formcraft CLI - build and inspect block-based forms
#[derive(Parser, Debug)]
#[command(name = "formcraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new Formcraft project
    Init(InitArgs),

    /// Create a form from the default seed
    New(NewArgs),

    /// Print a form's block tree
    Inspect(InspectArgs),

    /// Validate every form file
    Check(CheckArgs),

    /// Apply a list of mutations to a form
    Apply(ApplyArgs),

    /// Merge a generated-blocks answer into a form
    Merge(MergeArgs),

    /// Render a form as HTML
    Preview(PreviewArgs),

    /// Label and validate a submitted response
    Response(ResponseArgs),

    /// List the available block types
    Palette(PaletteArgs),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::New(args) => new(args, &cwd),
        Command::Inspect(args) => inspect(args, &cwd),
        Command::Check(args) => check(args, &cwd),
        Command::Apply(args) => apply(args, &cwd),
        Command::Merge(args) => merge(args, &cwd),
        Command::Preview(args) => preview(args, &cwd),
        Command::Response(args) => response(args, &cwd),
        Command::Palette(args) => palette(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
