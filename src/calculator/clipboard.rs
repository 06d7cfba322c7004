//! Copying results to the system clipboard.

use anyhow::{Context, Result};
use arboard::Clipboard;

/// Copy `text` to the system clipboard.
///
/// Fails when no clipboard is reachable, e.g. on a headless session.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new().context("Failed to access clipboard")?;

    clipboard
        .set_text(text.to_string())
        .context("Failed to copy to clipboard")?;

    tracing::debug!(text, "copied result to clipboard");
    Ok(())
}
