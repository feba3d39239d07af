//! Export pipeline: document snapshot → bytes → file on disk.
//!
//! Building and writing happen off the UI thread; the outcome travels back
//! over a channel so the shell can surface success or failure.

pub mod docx;
pub mod fonts;
pub mod layout;
pub mod pdf;
pub mod raster;

use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use thiserror::Error;

use crate::core::document::Document;

/// Target file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Docx,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Pdf => "pdf",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Docx => "DOCX",
            Self::Pdf => "PDF",
        }
    }
}

/// Errors from building or writing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not build the document package: {0}")]
    DocxBuild(String),
    #[error("could not render page {page}: {reason}")]
    PageRender { page: usize, reason: String },
    #[error("could not encode a page image: {0}")]
    ImageEncode(#[from] image::ImageError),
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Everything one export needs, snapshotted at invocation time.
pub struct ExportRequest {
    pub document: Document,
    pub format: ExportFormat,
    pub path: PathBuf,
}

/// Result of one export attempt, reported back to the UI thread.
pub struct ExportOutcome {
    pub format: ExportFormat,
    pub path: PathBuf,
    pub result: Result<(), ExportError>,
}

/// Suggested output filename: the title verbatim plus the extension. The
/// title is not sanitized; the save dialog is the place to adjust it.
pub fn suggested_file_name(title: &str, format: ExportFormat) -> String {
    format!("{title}.{}", format.extension())
}

/// Build the export bytes for `request` without touching the filesystem.
pub fn build(request: &ExportRequest) -> Result<Vec<u8>, ExportError> {
    match request.format {
        ExportFormat::Docx => docx::build_docx(&request.document),
        ExportFormat::Pdf => pdf::build_pdf(&request.document, &fonts::FontCatalog::system()),
    }
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    std::fs::write(path, bytes).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Run an export on a worker thread. The outcome is sent over `tx`;
/// `notify` runs afterwards so the UI can request a repaint. Concurrent
/// exports are not guarded against: each call owns its own snapshot and
/// worker.
pub fn spawn(
    request: ExportRequest,
    tx: Sender<ExportOutcome>,
    notify: impl FnOnce() + Send + 'static,
) {
    std::thread::spawn(move || {
        tracing::info!(
            format = request.format.label(),
            path = %request.path.display(),
            "starting export"
        );
        let result = build(&request).and_then(|bytes| write_bytes(&request.path, &bytes));
        match &result {
            Ok(()) => tracing::info!(path = %request.path.display(), "export finished"),
            Err(e) => tracing::error!(error = %e, "export failed"),
        }
        let _ = tx.send(ExportOutcome {
            format: request.format,
            path: request.path,
            result,
        });
        notify();
    });
}
