pub mod apply;
pub mod check;
pub mod init;
pub mod inspect;
pub mod merge;
pub mod new;
pub mod palette;
pub mod preview;
pub mod response;

pub use apply::{apply, ApplyArgs};
pub use check::{check, CheckArgs};
pub use init::{init, InitArgs};
pub use inspect::{inspect, InspectArgs};
pub use merge::{merge, MergeArgs};
pub use new::{new, NewArgs};
pub use palette::{palette, PaletteArgs};
pub use preview::{preview, PreviewArgs};
pub use response::{response, ResponseArgs};

use crate::config::Config;
use anyhow::{Context, Result};
use formcraft_blocks::Registry;
use formcraft_editor::{Document, EditSession};
use std::path::Path;
use tracing::debug;

/// Load a form named on the command line into an editing session
pub(crate) fn open_session<'r>(
    config: &Config,
    cwd: &Path,
    form: &str,
    registry: &'r Registry,
) -> Result<EditSession<'r>> {
    let path = config.resolve_form(cwd, form);
    debug!(path = %path.display(), "opening form");
    let document = Document::load(&path, registry)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(EditSession::with_options(
        "cli",
        document,
        registry,
        config.session_options(),
    ))
}
