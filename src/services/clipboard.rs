//! Clipboard operations.

use anyhow::{Context, Result};

/// Copy the exported schedule text to the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("Clipboard unavailable")?;
    clipboard
        .set_text(text)
        .context("Failed to copy schedule to clipboard")?;
    Ok(())
}
