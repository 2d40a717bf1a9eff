use duplicata::fonts;
use duplicata::{InvoiceRecord, Party, PdfBuilder};
use sha2::{Digest, Sha256};

const SKIP_HINT: &str =
    "bundled fonts missing. Set DUPLICATA_FONTS_DIR or copy assets/fonts next to the binary.";

fn sample_record() -> InvoiceRecord {
    InvoiceRecord {
        creditor: Party::new("ACME LTDA")
            .with_doc("12.345.678/0001-99")
            .with_locality("São Paulo", "SP", "01000-000"),
        debtor: Party::new("JOAO SILVA").with_doc("123.456.789-00"),
        number: "55".into(),
        invoice_number: "NF-0099".into(),
        issue_date: "2024-12-01".into(),
        due_date: "2024-12-31".into(),
        value: "999,90".into(),
        payment_place: "São Paulo/SP".into(),
    }
}

fn render_sample_pdf() -> Option<Vec<u8>> {
    if !fonts::default_fonts_available() {
        return None;
    }

    let output = PdfBuilder::new()
        .render(&sample_record())
        .expect("render sample duplicata");
    assert_eq!(output.file_name, "duplicata-55.pdf");

    Some(output.bytes)
}

/// Metadata that changes between runs, as (opening marker, closing marker).
const VOLATILE: &[(&[u8], &[u8])] = &[
    (b"/CreationDate(", b")"),
    (b"/ModDate(", b")"),
    (b"/Producer(", b")"),
    (b"/ID[", b"]"),
    (b"<xmp:CreateDate>", b"</xmp:CreateDate>"),
    (b"<xmp:ModifyDate>", b"</xmp:ModifyDate>"),
    (b"<xmp:MetadataDate>", b"</xmp:MetadataDate>"),
    (b"<xmpMM:DocumentID>", b"</xmpMM:DocumentID>"),
    (b"<xmpMM:InstanceID>", b"</xmpMM:InstanceID>"),
    (b"<xmpMM:VersionID>", b"</xmpMM:VersionID>"),
];

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|offset| from + offset)
}

/// Overwrites everything between each pair of markers with `0`, keeping
/// delimiters and whitespace so offsets stay valid.
fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    let mut data = bytes.to_vec();
    for (open, close) in VOLATILE {
        let mut cursor = 0;
        while let Some(start) = find(&data, open, cursor) {
            let body = start + open.len();
            let Some(end) = find(&data, close, body) else {
                break;
            };
            for byte in &mut data[body..end] {
                if !byte.is_ascii_whitespace() && !matches!(*byte, b'<' | b'>' | b'/') {
                    *byte = b'0';
                }
            }
            cursor = end + close.len();
        }
    }
    data
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    let normalized = scrub_pdf(bytes);
    let digest = Sha256::digest(&normalized);
    digest.into()
}

#[test]
fn renders_a_single_page() {
    let Some(bytes) = render_sample_pdf() else {
        eprintln!("Skipping renders_a_single_page: {}", SKIP_HINT);
        return;
    };
    assert!(bytes.starts_with(b"%PDF"), "output should be a PDF");

    let document = lopdf::Document::load_mem(&bytes).expect("parse rendered PDF");
    assert_eq!(document.get_pages().len(), 1, "a duplicata fits on one page");
}

#[test]
fn rendering_is_deterministic() {
    let (Some(bytes_a), Some(bytes_b)) = (render_sample_pdf(), render_sample_pdf()) else {
        eprintln!("Skipping rendering_is_deterministic: {}", SKIP_HINT);
        return;
    };

    assert_eq!(bytes_a.len(), bytes_b.len(), "PDF sizes should match");
    assert_eq!(
        normalized_hash(&bytes_a),
        normalized_hash(&bytes_b),
        "PDF renders must be deterministic after metadata normalization"
    );
}

#[test]
fn generate_writes_into_the_output_directory() {
    if !fonts::default_fonts_available() {
        eprintln!(
            "Skipping generate_writes_into_the_output_directory: {}",
            SKIP_HINT
        );
        return;
    }
    let dir = tempfile::tempdir().expect("create temp dir");
    let mut record = sample_record();
    record.number = "12/2024".into();

    let path = PdfBuilder::new()
        .with_output_dir(dir.path().join("out"))
        .generate(&record)
        .expect("generate duplicata");

    assert_eq!(path, dir.path().join("out").join("duplicata-12-2024.pdf"));
    let written = std::fs::read(&path).expect("read written PDF");
    assert!(written.starts_with(b"%PDF"));
}
