//! In-process engine: text extraction via pdfium, HTML assembly in Rust.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async
//! contexts. `tokio::task::spawn_blocking` moves the work onto a thread
//! pool designed for blocking operations, preventing the Tokio worker
//! threads from stalling during CPU-heavy extraction.
//!
//! ## Output shape
//!
//! One `<div class="page" id="page-N">` per page, the page text escaped
//! inside `<pre>` so whitespace and line breaks survive, optionally
//! wrapped in a standalone shell with embedded CSS. With
//! `ConversionOptions::embed_images`, images found on a page are
//! PNG-encoded and inlined as base64 data URIs after the page text.
//! Deterministic for a given document, which is what makes `convert`
//! idempotent.

use crate::error::ConvertError;
use crate::metadata::DocumentMetadata;
use crate::options::ConversionOptions;
use crate::sink::HtmlSink;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info, warn};

/// Standalone document header; the `{title}` placeholder is substituted.
const HTML_HEADER: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body { font-family: Arial, sans-serif; line-height: 1.6; margin: 20px; }
.page { margin-bottom: 20px; border-bottom: 1px solid #ddd; padding: 15px; }
pre { white-space: pre-wrap; font-family: inherit; }
.image-container { text-align: center; margin: 10px 0; }
.image-container img { max-width: 100%; height: auto; }
</style>
</head>
<body>
"#;

const HTML_FOOTER: &str = "</body>\n</html>\n";

/// Converter backed by the pdfium shared library.
#[derive(Debug, Default)]
pub struct PdfiumConverter;

impl PdfiumConverter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl super::Converter for PdfiumConverter {
    fn name(&self) -> &'static str {
        "pdfium"
    }

    async fn run(
        &self,
        pdf: &Path,
        options: &ConversionOptions,
        out: &mut HtmlSink,
    ) -> Result<(), ConvertError> {
        let path = pdf.to_path_buf();
        let password = options.password.clone();
        let include_styles = options.include_styles;
        let embed_images = options.embed_images;
        let limit = out.limit().saturating_sub(out.len());

        let produced = tokio::task::spawn_blocking(move || {
            convert_blocking(&path, password.as_deref(), include_styles, embed_images, limit)
        })
        .await
        .map_err(|e| ConvertError::Internal(format!("Conversion task panicked: {e}")))??;

        out.write(produced.as_bytes())
    }
}

/// True when the pdfium shared library can be bound on this host.
pub(crate) fn is_available() -> bool {
    bind().is_ok()
}

/// Bind the pdfium library: explicit `PDFIUM_LIB_PATH`, then the current
/// directory, then the system library path.
fn bind() -> Result<Pdfium, ConvertError> {
    let from_env = std::env::var("PDFIUM_LIB_PATH").ok().and_then(|dir| {
        Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir)).ok()
    });

    let bindings = match from_env {
        Some(b) => b,
        None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| ConvertError::ConverterUnavailable {
                engine: "pdfium".to_string(),
                hint: format!(
                    "Failed to bind the pdfium shared library: {e:?}\n\
                     Set PDFIUM_LIB_PATH=/path/to/dir containing libpdfium, or install\n\
                     a pdfium build from bblanchon/pdfium-binaries."
                ),
            })?,
    };

    Ok(Pdfium::new(bindings))
}

/// Blocking implementation of the conversion.
fn convert_blocking(
    pdf_path: &Path,
    password: Option<&str>,
    include_styles: bool,
    embed_images: bool,
    limit: usize,
) -> Result<HtmlSink, ConvertError> {
    let pdfium = bind()?;
    let document = load_document(&pdfium, pdf_path, password)?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);

    let mut sink = HtmlSink::new(limit);

    if include_styles {
        let title = document_title(&document, pdf_path);
        sink.push_str(&HTML_HEADER.replace("{title}", &escape_text(&title)))?;
    }

    for (idx, page) in pages.iter().enumerate() {
        let text = page
            .text()
            .map(|t| t.all())
            .map_err(|e| ConvertError::ConversionFailed {
                engine: "pdfium".to_string(),
                detail: format!("text extraction failed on page {}: {:?}", idx + 1, e),
            })?;

        sink.push_str(&format!("<div class=\"page\" id=\"page-{}\">\n", idx + 1))?;
        sink.push_str("<pre>")?;
        sink.push_str(&escape_text(&text))?;
        sink.push_str("</pre>\n")?;

        if embed_images {
            embed_page_images(&document, &page, idx + 1, &mut sink)?;
        }

        sink.push_str("</div>\n")?;

        debug!("Extracted page {} ({} chars)", idx + 1, text.len());
    }

    if include_styles {
        sink.push_str(HTML_FOOTER)?;
    }

    Ok(sink)
}

/// Open the document, classifying load failures.
///
/// pdfium reports password problems and structural corruption through the
/// same error type; both are properties of the document, so both map to
/// [`ConvertError::ConversionFailed`] — with a password hint where the
/// error text makes the cause clear.
fn load_document<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, ConvertError> {
    pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
        let err_str = format!("{e:?}");
        let detail = if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                "wrong password".to_string()
            } else {
                "document is encrypted and requires a password (set ConversionOptions::password)"
                    .to_string()
            }
        } else {
            format!("cannot parse document: {err_str}")
        };
        ConvertError::ConversionFailed {
            engine: "pdfium".to_string(),
            detail,
        }
    })
}

/// Inline every image object on `page` as a base64 PNG data URI.
///
/// A document can carry image streams pdfium fails to decode (exotic
/// colour spaces, broken JPX data). One bad image should not fail the
/// whole conversion, so decode errors are logged and the image skipped.
/// Sink errors still abort: the ceiling applies to images too.
fn embed_page_images(
    document: &PdfDocument<'_>,
    page: &PdfPage<'_>,
    page_no: usize,
    sink: &mut HtmlSink,
) -> Result<(), ConvertError> {
    let mut image_no = 0;
    for object in page.objects().iter() {
        let Some(image_object) = object.as_image_object() else {
            continue;
        };
        image_no += 1;

        let img = match image_object.get_processed_image(document) {
            Ok(img) => img,
            Err(e) => {
                warn!(
                    "Skipping image {} on page {}: {:?}",
                    image_no, page_no, e
                );
                continue;
            }
        };

        let data_uri = match png_data_uri(&img) {
            Ok(uri) => uri,
            Err(e) => {
                warn!(
                    "Skipping image {} on page {}: PNG encoding failed: {}",
                    image_no, page_no, e
                );
                continue;
            }
        };

        sink.push_str("<div class=\"image-container\">\n")?;
        sink.push_str(&format!(
            "<img src=\"{}\" alt=\"Page {} image {}\" width=\"{}\" height=\"{}\">\n",
            data_uri,
            page_no,
            image_no,
            img.width(),
            img.height()
        ))?;
        sink.push_str("</div>\n")?;

        debug!("Embedded image {} on page {}", image_no, page_no);
    }
    Ok(())
}

/// Encode an image as a PNG data URI. PNG keeps the embedding lossless
/// regardless of how the image was stored in the PDF.
fn png_data_uri(img: &DynamicImage) -> Result<String, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(&buf)))
}

/// Document title for the HTML shell: metadata title, else the file stem.
fn document_title(document: &PdfDocument<'_>, pdf_path: &Path) -> String {
    document
        .metadata()
        .get(PdfDocumentMetadataTagType::Title)
        .map(|t| t.value().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| {
            pdf_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "Converted document".to_string())
        })
}

/// Extract document metadata without converting content.
pub(crate) async fn extract_metadata(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<DocumentMetadata, ConvertError> {
    let path = pdf_path.to_path_buf();
    let pwd = password.map(str::to_string);

    tokio::task::spawn_blocking(move || {
        let pdfium = bind()?;
        let document = load_document(&pdfium, &path, pwd.as_deref())?;
        Ok(describe_document(&document))
    })
    .await
    .map_err(|e| ConvertError::Internal(format!("Metadata extraction panicked: {e}")))?
}

/// Collect the properties pdfium exposes for an open document, dropping
/// tags that are present but empty.
fn describe_document(document: &PdfDocument<'_>) -> DocumentMetadata {
    let tags = document.metadata();
    let text_tag = |tag: PdfDocumentMetadataTagType| {
        tags.get(tag)
            .map(|t| t.value().to_string())
            .filter(|v| !v.is_empty())
    };

    DocumentMetadata {
        title: text_tag(PdfDocumentMetadataTagType::Title),
        author: text_tag(PdfDocumentMetadataTagType::Author),
        subject: text_tag(PdfDocumentMetadataTagType::Subject),
        creator: text_tag(PdfDocumentMetadataTagType::Creator),
        producer: text_tag(PdfDocumentMetadataTagType::Producer),
        creation_date: text_tag(PdfDocumentMetadataTagType::CreationDate),
        modification_date: text_tag(PdfDocumentMetadataTagType::ModificationDate),
        page_count: document.pages().len() as usize,
        pdf_version: format!("{:?}", document.version()),
    }
}

/// Escape the three characters with meaning inside an HTML text node.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}
