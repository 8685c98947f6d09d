//! Output formats for the two extraction strategies.

use crate::ExtractedPage;

/// Width of the `=` separator lines in per-page output.
pub const SEPARATOR_WIDTH: usize = 80;

pub fn separator() -> String {
    "=".repeat(SEPARATOR_WIDTH)
}

/// Header written before any page content.
pub fn render_header(total_pages: usize) -> String {
    format!("Total Pages: {}\n{}\n\n", total_pages, separator())
}

/// One page section: marker line, the page text, a closing separator.
pub fn render_page(page: &ExtractedPage) -> String {
    format!(
        "\n--- PAGE {} ---\n{}\n{}\n",
        page.number,
        page.text,
        separator()
    )
}

/// Per-page output: header with the page count, then every page in order.
pub fn render_pages(pages: &[ExtractedPage]) -> String {
    let mut out = render_header(pages.len());
    for page in pages {
        out.push_str(&render_page(page));
    }
    out
}
