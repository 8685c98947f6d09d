//! Mock backend for testing.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{BackendError, PdfBackend, PdfDocument};

/// One scripted page of a [`MockBackend`] document.
#[derive(Clone, Debug)]
pub enum MockPage {
    /// The page extracts to this text.
    Text(String),
    /// Extracting the page fails with this message.
    Fail(String),
}

/// A hand-rolled backend implementing [`PdfBackend`] for tests.
///
/// Every opened document serves the same scripted pages. Opens and page
/// reads are counted so tests can assert how far a run got.
pub struct MockBackend {
    pages: Vec<MockPage>,
    open_error: Option<String>,
    open_count: AtomicUsize,
    pages_read: Arc<AtomicUsize>,
}

impl MockBackend {
    pub fn new(pages: Vec<MockPage>) -> Self {
        Self {
            pages,
            open_error: None,
            open_count: AtomicUsize::new(0),
            pages_read: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A document whose pages all extract successfully.
    pub fn with_pages(texts: &[&str]) -> Self {
        Self::new(
            texts
                .iter()
                .map(|t| MockPage::Text(t.to_string()))
                .collect(),
        )
    }

    /// A backend that cannot open anything.
    pub fn failing_open(message: &str) -> Self {
        Self {
            open_error: Some(message.to_string()),
            ..Self::new(Vec::new())
        }
    }

    pub fn open_count(&self) -> usize {
        self.open_count.load(Ordering::SeqCst)
    }

    /// Number of `page_text` calls across all opened documents.
    pub fn pages_read(&self) -> usize {
        self.pages_read.load(Ordering::SeqCst)
    }
}

impl PdfBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn open(&self, _path: &Path) -> Result<Box<dyn PdfDocument>, BackendError> {
        self.open_count.fetch_add(1, Ordering::SeqCst);
        if let Some(ref msg) = self.open_error {
            return Err(BackendError::Open(msg.clone()));
        }
        Ok(Box::new(MockDocument {
            pages: self.pages.clone(),
            pages_read: Arc::clone(&self.pages_read),
        }))
    }
}

struct MockDocument {
    pages: Vec<MockPage>,
    pages_read: Arc<AtomicUsize>,
}

impl PdfDocument for MockDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<String, BackendError> {
        self.pages_read.fetch_add(1, Ordering::SeqCst);
        match self.pages.get(index) {
            Some(MockPage::Text(text)) => Ok(text.clone()),
            Some(MockPage::Fail(msg)) => Err(BackendError::Page {
                page: index + 1,
                message: msg.clone(),
            }),
            None => Err(BackendError::Page {
                page: index + 1,
                message: "page out of range".into(),
            }),
        }
    }
}
