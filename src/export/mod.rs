//! # Transcript Export
//!
//! Turns the conversation into a downloadable PDF. Both halves are pure:
//! [`sanitize`] normalizes text and [`pdf::export`] builds the document in
//! memory. [`write_transcript`] is the only function that touches the disk.

pub mod pdf;
pub mod sanitize;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::inference::Message;

pub use pdf::export;
pub use sanitize::sanitize;

pub const EXPORT_FILE_NAME: &str = "chat_history.pdf";
pub const PDF_MIME: &str = "application/pdf";

#[derive(Debug)]
pub enum ExportError {
    /// The PDF writer rejected the document.
    Pdf(lopdf::Error),
    /// Writing the finished file failed.
    Io(std::io::Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Pdf(e) => write!(f, "PDF error: {e}"),
            ExportError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<lopdf::Error> for ExportError {
    fn from(e: lopdf::Error) -> Self {
        ExportError::Pdf(e)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Io(e)
    }
}

/// Exports the conversation to `dir/chat_history.pdf` and returns the path.
pub fn write_transcript(messages: &[Message], dir: &Path) -> Result<PathBuf, ExportError> {
    let bytes = export(messages)?;
    fs::create_dir_all(dir)?;
    let path = dir.join(EXPORT_FILE_NAME);
    fs::write(&path, &bytes)?;
    info!(
        "Exported {} bytes ({}) to {}",
        bytes.len(),
        PDF_MIME,
        path.display()
    );
    Ok(path)
}
