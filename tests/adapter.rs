//! Integration tests for the conversion adapter.
//!
//! Engine behaviour is exercised through injected fake converters
//! (`ConversionOptions::converter`), so these tests run without a pdfium
//! library or a pdftohtml binary installed. Input validation, the buffer
//! ceiling, error classification and file persistence are all covered
//! end to end.

use async_trait::async_trait;
use pdf2html::{
    convert, convert_sync, convert_to_file, ConversionOptions, ConvertError, Converter,
    DocumentInput, HtmlSink,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

// ── Test helpers ─────────────────────────────────────────────────────────────

const PAGE_HTML: &str =
    "<div class=\"page\" id=\"page-1\">\n<pre>Hello from page one</pre>\n</div>\n";

/// Minimal byte string that passes input validation.
const PDF_BYTES: &[u8] = b"%PDF-1.4\n1 0 obj\n<< >>\nendobj\ntrailer\n<< >>\n%%EOF\n";

/// Write a fixture PDF into `dir` and return its path.
fn pdf_fixture(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("fixture.pdf");
    std::fs::write(&path, PDF_BYTES).unwrap();
    path
}

/// Engine that emits a fixed HTML fragment.
struct StaticHtml(&'static str);

#[async_trait]
impl Converter for StaticHtml {
    fn name(&self) -> &'static str {
        "static"
    }
    async fn run(
        &self,
        _pdf: &Path,
        _options: &ConversionOptions,
        out: &mut HtmlSink,
    ) -> Result<(), ConvertError> {
        out.push_str(self.0)
    }
}

/// Engine that emits `repeats` copies of `chunk`, stopping on sink errors
/// the way a well-behaved engine must.
struct Spammer {
    chunk: &'static [u8],
    repeats: usize,
}

#[async_trait]
impl Converter for Spammer {
    fn name(&self) -> &'static str {
        "spammer"
    }
    async fn run(
        &self,
        _pdf: &Path,
        _options: &ConversionOptions,
        out: &mut HtmlSink,
    ) -> Result<(), ConvertError> {
        for _ in 0..self.repeats {
            out.write(self.chunk)?;
        }
        Ok(())
    }
}

/// Engine that emits raw, non-UTF-8 bytes.
struct RawBytes(&'static [u8]);

#[async_trait]
impl Converter for RawBytes {
    fn name(&self) -> &'static str {
        "raw"
    }
    async fn run(
        &self,
        _pdf: &Path,
        _options: &ConversionOptions,
        out: &mut HtmlSink,
    ) -> Result<(), ConvertError> {
        out.write(self.0)
    }
}

fn options_with(converter: Arc<dyn Converter>) -> ConversionOptions {
    ConversionOptions::builder()
        .converter(converter)
        .build()
        .unwrap()
}

// ── Happy path ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn convert_returns_html_with_markup() {
    let dir = TempDir::new().unwrap();
    let pdf = pdf_fixture(&dir);
    let options = options_with(Arc::new(StaticHtml(PAGE_HTML)));

    let html = convert(DocumentInput::path(&pdf), &options).await.unwrap();
    assert!(!html.trim().is_empty());
    assert!(html.contains("<div"));
    assert!(html.contains("<pre>"));
    assert!(html.ends_with('\n'));
}

#[tokio::test]
async fn convert_accepts_buffer_input() {
    let options = options_with(Arc::new(StaticHtml(PAGE_HTML)));
    let html = convert(DocumentInput::bytes(PDF_BYTES.to_vec()), &options)
        .await
        .unwrap();
    assert!(html.contains("Hello from page one"));
}

#[tokio::test]
async fn convert_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let pdf = pdf_fixture(&dir);
    let options = options_with(Arc::new(StaticHtml(PAGE_HTML)));

    let first = convert(DocumentInput::path(&pdf), &options).await.unwrap();
    let second = convert(DocumentInput::path(&pdf), &options).await.unwrap();
    assert_eq!(first, second);
}

#[test]
fn convert_sync_matches_async() {
    let options = options_with(Arc::new(StaticHtml(PAGE_HTML)));
    let html = convert_sync(DocumentInput::bytes(PDF_BYTES.to_vec()), &options).unwrap();
    assert!(html.contains("Hello from page one"));
}

// ── Input classification ─────────────────────────────────────────────────────

#[tokio::test]
async fn missing_path_fails_with_input_not_found() {
    let options = ConversionOptions::default();
    let err = convert(DocumentInput::path("/no/such/file.pdf"), &options)
        .await
        .unwrap_err();
    assert!(matches!(err, ConvertError::InputNotFound { .. }));
}

#[tokio::test]
async fn input_is_validated_before_engine_resolution() {
    // Even with an unknown engine configured, a bad path reports the
    // input problem, not the engine problem.
    let options = ConversionOptions::builder()
        .engine_name("no-such-engine")
        .build()
        .unwrap();
    let err = convert(DocumentInput::path("/no/such/file.pdf"), &options)
        .await
        .unwrap_err();
    assert!(matches!(err, ConvertError::InputNotFound { .. }));
}

#[tokio::test]
async fn empty_buffer_is_rejected() {
    let options = options_with(Arc::new(StaticHtml(PAGE_HTML)));
    let err = convert(DocumentInput::bytes(Vec::new()), &options)
        .await
        .unwrap_err();
    assert!(matches!(err, ConvertError::EmptyInput));
}

#[tokio::test]
async fn non_pdf_buffer_is_rejected() {
    let options = options_with(Arc::new(StaticHtml(PAGE_HTML)));
    let err = convert(DocumentInput::bytes(b"<html>nope</html>".to_vec()), &options)
        .await
        .unwrap_err();
    assert!(matches!(err, ConvertError::NotAPdf { .. }));
}

#[tokio::test]
async fn unknown_engine_name_fails_with_converter_unavailable() {
    let options = ConversionOptions::builder()
        .engine_name("ghostscript")
        .build()
        .unwrap();
    let err = convert(DocumentInput::bytes(PDF_BYTES.to_vec()), &options)
        .await
        .unwrap_err();
    assert!(matches!(err, ConvertError::ConverterUnavailable { .. }));
}

// ── Buffer ceiling ───────────────────────────────────────────────────────────

#[tokio::test]
async fn output_over_max_buffer_fails() {
    // 2 MiB of output against a 1 MiB ceiling.
    let spammer = Arc::new(Spammer {
        chunk: &[b'x'; 1024],
        repeats: 2048,
    });
    let options = ConversionOptions::builder()
        .converter(spammer)
        .max_buffer(1024 * 1024)
        .build()
        .unwrap();

    let err = convert(DocumentInput::bytes(PDF_BYTES.to_vec()), &options)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ConvertError::OutputTooLarge {
            limit_bytes: 1_048_576
        }
    ));
}

#[tokio::test]
async fn output_under_max_buffer_succeeds() {
    let spammer = Arc::new(Spammer {
        chunk: b"<p>x</p>\n",
        repeats: 100,
    });
    let options = ConversionOptions::builder()
        .converter(spammer)
        .max_buffer(1024 * 1024)
        .build()
        .unwrap();

    let html = convert(DocumentInput::bytes(PDF_BYTES.to_vec()), &options)
        .await
        .unwrap();
    assert!(html.len() < 1024 * 1024);
    assert!(html.contains("<p>x</p>"));
}

#[tokio::test]
async fn oversized_output_leaves_no_file_behind() {
    let dir = TempDir::new().unwrap();
    let pdf = pdf_fixture(&dir);
    let out_path = dir.path().join("out.html");

    let spammer = Arc::new(Spammer {
        chunk: &[b'y'; 1024],
        repeats: 64,
    });
    let options = ConversionOptions::builder()
        .converter(spammer)
        .max_buffer(1024)
        .build()
        .unwrap();

    let err = convert_to_file(DocumentInput::path(&pdf), &out_path, &options)
        .await
        .unwrap_err();
    assert!(matches!(err, ConvertError::OutputTooLarge { .. }));
    assert!(!out_path.exists());
    assert!(!out_path.with_extension("html.tmp").exists());
}

// ── Engine output validation ─────────────────────────────────────────────────

#[tokio::test]
async fn invalid_utf8_output_is_conversion_failed() {
    let options = options_with(Arc::new(RawBytes(&[0xff, 0xfe, 0xfd])));
    let err = convert(DocumentInput::bytes(PDF_BYTES.to_vec()), &options)
        .await
        .unwrap_err();
    assert!(matches!(err, ConvertError::ConversionFailed { .. }));
}

#[tokio::test]
async fn empty_engine_output_is_conversion_failed() {
    let options = options_with(Arc::new(StaticHtml("")));
    let err = convert(DocumentInput::bytes(PDF_BYTES.to_vec()), &options)
        .await
        .unwrap_err();
    match err {
        ConvertError::ConversionFailed { detail, .. } => {
            assert!(detail.contains("no output"), "got: {detail}")
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// ── File persistence ─────────────────────────────────────────────────────────

#[tokio::test]
async fn convert_to_file_writes_atomically() {
    let dir = TempDir::new().unwrap();
    let pdf = pdf_fixture(&dir);
    let out_path = dir.path().join("nested").join("out.html");
    let options = options_with(Arc::new(StaticHtml(PAGE_HTML)));

    let bytes = convert_to_file(DocumentInput::path(&pdf), &out_path, &options)
        .await
        .unwrap();

    let written = std::fs::read_to_string(&out_path).unwrap();
    assert_eq!(bytes, written.len() as u64);
    assert!(written.contains("Hello from page one"));
    assert!(written.ends_with('\n'));
    assert!(!out_path.with_extension("html.tmp").exists());
}
