//! Tiny PDF writer for tests.
//!
//! Produces a well-formed PDF (correct xref offsets) with one Helvetica text
//! run per line, so real backends can be exercised without binary fixtures
//! checked into the tree.

use std::path::Path;

/// Build a PDF with one page per entry of `pages`. Lines within an entry are
/// separated by `\n`.
pub fn sample_pdf(pages: &[&str]) -> Vec<u8> {
    build_pdf(pages, false)
}

/// Like [`sample_pdf`], but with a standard security handler (RC4, 40-bit)
/// whose user password is not empty. Readers must ask for a password before
/// they can decrypt anything.
pub fn encrypted_sample_pdf(pages: &[&str]) -> Vec<u8> {
    build_pdf(pages, true)
}

fn build_pdf(pages: &[&str], encrypted: bool) -> Vec<u8> {
    let page_count = pages.len();
    let mut objects: Vec<String> = Vec::with_capacity(3 + page_count * 2);

    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());

    let kids: Vec<String> = (0..page_count)
        .map(|i| format!("{} 0 R", page_object_id(i)))
        .collect();
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        page_count
    ));

    objects.push(
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    );

    for (i, text) in pages.iter().enumerate() {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            page_object_id(i) + 1
        ));
        let content = content_stream(text);
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            content.len(),
            content
        ));
    }

    if encrypted {
        // /O and /U are not derived from the empty password, so opening
        // without one fails authentication.
        objects.push(format!(
            "<< /Filter /Standard /V 1 /R 2 /Length 40 /P -44 /O <{}> /U <{}> >>",
            "5a".repeat(32),
            "c3".repeat(32)
        ));
    }

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
    }

    let xref_offset = out.len();
    out.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
    out.push_str("0000000000 65535 f \n");
    for offset in offsets {
        out.push_str(&format!("{:010} 00000 n \n", offset));
    }
    let encrypt = if encrypted {
        format!(
            " /Encrypt {} 0 R /ID [<{id}> <{id}>]",
            objects.len(),
            id = "0123456789abcdef".repeat(2)
        )
    } else {
        String::new()
    };
    out.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R{} >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        encrypt,
        xref_offset
    ));

    out.into_bytes()
}

/// Write [`sample_pdf`] output to `path`.
pub fn write_sample_pdf(path: &Path, pages: &[&str]) -> std::io::Result<()> {
    std::fs::write(path, sample_pdf(pages))
}

/// [`sample_pdf`] with every occurrence of `from` replaced by `to`, for
/// documents that are structurally sound but carry a broken resource.
pub fn patched_sample_pdf(pages: &[&str], from: &str, to: &str) -> Vec<u8> {
    assert_eq!(from.len(), to.len(), "patch must keep xref offsets valid");
    let pdf = String::from_utf8(sample_pdf(pages)).unwrap_or_default();
    pdf.replace(from, to).into_bytes()
}

fn page_object_id(index: usize) -> usize {
    4 + index * 2
}

fn content_stream(text: &str) -> String {
    let mut ops = vec![
        "BT".to_string(),
        "/F1 18 Tf".to_string(),
        "24 TL".to_string(),
        "72 720 Td".to_string(),
    ];
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            ops.push("T*".to_string());
        }
        ops.push(format!("({}) Tj", escape(line)));
    }
    ops.push("ET".to_string());
    ops.join("\n")
}

fn escape(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for c in line.chars() {
        if matches!(c, '(' | ')' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
