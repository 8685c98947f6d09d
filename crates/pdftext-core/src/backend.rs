use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to open PDF: {0}")]
    Open(String),
    #[error("document is encrypted")]
    Encrypted,
    #[error("failed to extract text from page {page}: {message}")]
    Page { page: usize, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for PDF text extraction backends.
///
/// Implementors wrap an external PDF library and hand back an open
/// [`PdfDocument`]. Rendering the output file and writing it live in
/// [`crate::extract()`].
pub trait PdfBackend: Send + Sync {
    /// Short name used in logs and on the command line.
    fn name(&self) -> &'static str;

    /// Open the PDF at `path` for reading.
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>, BackendError>;
}

/// An opened PDF document.
///
/// The handle is released when the box is dropped, on every exit path.
pub trait PdfDocument {
    fn page_count(&self) -> usize;

    /// Extract the text of one page. `index` is 0-based.
    fn page_text(&self, index: usize) -> Result<String, BackendError>;

    /// Extract the full text of the document in one call.
    ///
    /// Backends with their own layout reconstruction override this; the
    /// default joins the page texts.
    fn text(&self) -> Result<String, BackendError> {
        let mut pages = Vec::with_capacity(self.page_count());
        for index in 0..self.page_count() {
            pages.push(self.page_text(index)?);
        }
        Ok(pages.join("\n"))
    }
}
