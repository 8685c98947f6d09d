use pdftext_core::fixture::{encrypted_sample_pdf, write_sample_pdf};
use pdftext_core::{BackendError, ExtractOptions, ExtractionError, PdfBackend, Strategy, extract};
use pdftext_mupdf::MupdfBackend;

#[test]
fn reads_pages_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("three.pdf");
    write_sample_pdf(&pdf, &["Alpha", "Beta", "Gamma"]).unwrap();

    let doc = MupdfBackend::new().open(&pdf).unwrap();

    assert_eq!(doc.page_count(), 3);
    assert!(doc.page_text(0).unwrap().contains("Alpha"));
    assert!(doc.page_text(1).unwrap().contains("Beta"));
    assert!(doc.page_text(2).unwrap().contains("Gamma"));
}

#[test]
fn out_of_range_page_is_a_page_error() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("one.pdf");
    write_sample_pdf(&pdf, &["Alpha"]).unwrap();

    let doc = MupdfBackend::new().open(&pdf).unwrap();

    assert!(matches!(
        doc.page_text(5),
        Err(BackendError::Page { page: 6, .. })
    ));
}

#[test]
fn per_page_output_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let source_path = dir.path().join("criteria.pdf");
    write_sample_pdf(&source_path, &["Alpha", "Beta", "Gamma"]).unwrap();
    let opts = ExtractOptions {
        source_path,
        dest_path: dir.path().join("criteria.txt"),
        strategy: Strategy::PerPage,
    };

    let pages = extract(&opts, &MupdfBackend::new(), |_| {}).unwrap();
    let out = std::fs::read_to_string(&opts.dest_path).unwrap();

    assert_eq!(pages, 3);
    assert!(out.starts_with("Total Pages: 3\n"));
    assert_eq!(out.matches("--- PAGE").count(), 3);
    let order = ["PAGE 1", "Alpha", "PAGE 2", "Beta", "PAGE 3", "Gamma"];
    let positions: Vec<usize> = order.iter().map(|s| out.find(s).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn whole_document_keeps_all_words() {
    let dir = tempfile::tempdir().unwrap();
    let source_path = dir.path().join("criteria.pdf");
    write_sample_pdf(&source_path, &["Grade seven\nTwo years", "Grade eight"]).unwrap();
    let opts = ExtractOptions {
        source_path,
        dest_path: dir.path().join("whole.txt"),
        strategy: Strategy::WholeDocument,
    };

    extract(&opts, &MupdfBackend::new(), |_| {}).unwrap();
    let out = std::fs::read_to_string(&opts.dest_path).unwrap();

    for word in ["Grade", "seven", "Two", "years", "eight"] {
        assert!(out.contains(word), "missing {word}");
    }
    assert!(!out.contains("Total Pages"));
}

#[test]
fn garbage_file_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let source_path = dir.path().join("fake.pdf");
    std::fs::write(&source_path, b"this is not a pdf at all").unwrap();
    let opts = ExtractOptions {
        source_path,
        dest_path: dir.path().join("out.txt"),
        strategy: Strategy::PerPage,
    };

    let err = extract(&opts, &MupdfBackend::new(), |_| {}).unwrap_err();

    assert!(matches!(err, ExtractionError::MalformedDocument(_)));
    assert!(!opts.dest_path.exists());
}

#[test]
fn password_protected_document_is_permission_denied() {
    let dir = tempfile::tempdir().unwrap();
    let source_path = dir.path().join("locked.pdf");
    std::fs::write(&source_path, encrypted_sample_pdf(&["Secret"])).unwrap();
    let opts = ExtractOptions {
        source_path,
        dest_path: dir.path().join("locked.txt"),
        strategy: Strategy::PerPage,
    };

    assert!(matches!(
        MupdfBackend::new().open(&opts.source_path).err(),
        Some(BackendError::Encrypted)
    ));
    let err = extract(&opts, &MupdfBackend::new(), |_| {}).unwrap_err();

    assert!(matches!(err, ExtractionError::PermissionDenied(_)));
    assert!(!opts.dest_path.exists());
}
