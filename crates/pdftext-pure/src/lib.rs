use std::any::Any;
use std::cell::OnceCell;
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use gag::Gag;
use pdftext_core::{BackendError, PdfBackend, PdfDocument};

/// `pdf-extract` implementation of [`PdfBackend`].
///
/// Pure Rust, no system libraries. Opening only parses the document
/// structure (with `lopdf`) to count pages. Page texts are extracted on the
/// first `page_text` call; the whole-document text comes from pdf-extract's
/// own layout pass over the full file and never touches the page pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct PureBackend;

impl PureBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for PureBackend {
    fn name(&self) -> &'static str {
        "pure"
    }

    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>, BackendError> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(BackendError::NotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };

        let page_count = guarded("lopdf", || {
            lopdf::Document::load_mem(&bytes).map(|doc| doc.get_pages().len())
        })?;

        tracing::debug!(path = %path.display(), pages = page_count, "opened with pdf-extract");

        Ok(Box::new(PureDocument {
            bytes,
            page_count,
            pages: OnceCell::new(),
        }))
    }
}

struct PureDocument {
    bytes: Vec<u8>,
    page_count: usize,
    pages: OnceCell<Vec<String>>,
}

impl PureDocument {
    fn pages(&self) -> Result<&[String], BackendError> {
        if let Some(pages) = self.pages.get() {
            return Ok(pages);
        }
        let pages = guarded("pdf-extract", || {
            pdf_extract::extract_text_from_mem_by_pages(&self.bytes)
        })?;
        Ok(self.pages.get_or_init(|| pages))
    }
}

impl PdfDocument for PureDocument {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn page_text(&self, index: usize) -> Result<String, BackendError> {
        self.pages()?
            .get(index)
            .cloned()
            .ok_or_else(|| BackendError::Page {
                page: index + 1,
                message: "page index out of range".into(),
            })
    }

    fn text(&self) -> Result<String, BackendError> {
        guarded("pdf-extract", || pdf_extract::extract_text_from_mem(&self.bytes))
    }
}

/// Run a parser call with stdout/stderr silenced, turning both its errors
/// and its panics into [`BackendError::Open`].
///
/// pdf-extract prints diagnostics with `println!` and panics on some
/// malformed fonts; neither may reach the terminal or unwind past the
/// backend.
fn guarded<T, E, F>(library: &str, f: F) -> Result<T, BackendError>
where
    E: Display,
    F: FnOnce() -> Result<T, E>,
{
    let outcome = {
        let _gag_out = Gag::stdout().ok();
        let _gag_err = Gag::stderr().ok();
        panic::catch_unwind(AssertUnwindSafe(f))
    };
    match outcome {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(BackendError::Open(e.to_string())),
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::warn!(library, message, "parser panicked");
            Err(BackendError::Open(format!("{library} failed: {message}")))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_not_found() {
        let err = PureBackend::new()
            .open(Path::new("/nonexistent/file.pdf"))
            .err()
            .unwrap();
        assert!(matches!(err, BackendError::NotFound(_)));
    }

    #[test]
    fn out_of_range_page_reports_one_based_number() {
        let doc = PureDocument {
            bytes: Vec::new(),
            page_count: 1,
            pages: OnceCell::from(vec!["only".to_string()]),
        };
        assert_eq!(doc.page_text(0).unwrap(), "only");
        assert!(matches!(
            doc.page_text(1),
            Err(BackendError::Page { page: 2, .. })
        ));
    }

    #[test]
    fn panics_become_open_errors() {
        let result: Result<(), BackendError> =
            guarded("pdf-extract", || -> Result<(), String> { panic!("bad font") });
        match result {
            Err(BackendError::Open(message)) => assert!(message.contains("bad font")),
            other => panic!("expected Open error, got {other:?}"),
        }
    }

    #[test]
    fn formatted_panic_payloads_keep_their_message() {
        let result: Result<(), BackendError> = guarded("pdf-extract", || -> Result<(), String> {
            panic!("glyph {} missing", 7)
        });
        assert!(matches!(result, Err(BackendError::Open(m)) if m.contains("glyph 7 missing")));
    }

    #[test]
    fn library_errors_become_open_errors() {
        let result: Result<(), BackendError> =
            guarded("lopdf", || Err::<(), _>("no trailer".to_string()));
        assert!(matches!(result, Err(BackendError::Open(m)) if m == "no trailer"));
    }
}
