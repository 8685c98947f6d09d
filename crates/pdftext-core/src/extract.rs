use std::io::Write;
use std::path::{Path, PathBuf};

use crate::render::render_pages;
use crate::{ExtractedPage, ExtractionError, PdfBackend, PdfDocument, Strategy};

/// Number of pages in the source document.
pub type PageCount = usize;

/// Where to read from, where to write to, and how to render.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub source_path: PathBuf,
    pub dest_path: PathBuf,
    pub strategy: Strategy,
}

/// Progress events emitted during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractProgress {
    /// The source was opened and has `pages` pages.
    Opened { pages: usize },
    /// Page `number` (1-based) of `total` was extracted. Per-page strategy only.
    Page { number: usize, total: usize },
    /// The output file was written.
    Written { path: PathBuf, bytes: u64 },
}

/// Extract the text of `options.source_path` and write it to `options.dest_path`.
///
/// The run is all-or-nothing: the output is rendered in memory, written to a
/// temporary file next to the destination and renamed into place only once
/// everything succeeded. A failed run leaves the destination untouched.
pub fn extract<F>(
    options: &ExtractOptions,
    backend: &dyn PdfBackend,
    mut progress: F,
) -> Result<PageCount, ExtractionError>
where
    F: FnMut(ExtractProgress),
{
    let source = options.source_path.as_path();
    if !source.is_file() {
        return Err(ExtractionError::NotFound(source.to_path_buf()));
    }

    tracing::debug!(
        path = %source.display(),
        backend = backend.name(),
        strategy = %options.strategy,
        "opening document"
    );
    let document = backend.open(source)?;
    let page_count = document.page_count();
    progress(ExtractProgress::Opened { pages: page_count });

    let output = match options.strategy {
        Strategy::PerPage => {
            let pages = extract_pages(document.as_ref(), &mut progress)?;
            render_pages(&pages)
        }
        Strategy::WholeDocument => document.text()?,
    };
    drop(document);

    let bytes = write_atomically(&options.dest_path, output.as_bytes())?;
    tracing::info!(
        path = %options.dest_path.display(),
        pages = page_count,
        bytes,
        "wrote extracted text"
    );
    progress(ExtractProgress::Written {
        path: options.dest_path.clone(),
        bytes,
    });

    Ok(page_count)
}

/// Extract every page in order. The first failing page aborts the run.
pub fn extract_pages<F>(
    document: &dyn PdfDocument,
    progress: &mut F,
) -> Result<Vec<ExtractedPage>, ExtractionError>
where
    F: FnMut(ExtractProgress),
{
    let total = document.page_count();
    let mut pages = Vec::with_capacity(total);
    for index in 0..total {
        let number = index + 1;
        let text = document.page_text(index)?;
        tracing::debug!(page = number, chars = text.chars().count(), "extracted page");
        pages.push(ExtractedPage { number, text });
        progress(ExtractProgress::Page { number, total });
    }
    Ok(pages)
}

fn write_atomically(dest: &Path, contents: &[u8]) -> Result<u64, ExtractionError> {
    let dir = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.flush()?;

    // NamedTempFile is created 0600; match what a plain create would give.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))?;
    }

    tmp.persist(dest).map_err(|e| ExtractionError::from(e.error))?;
    Ok(contents.len() as u64)
}
