//! Converter engines: the seam between the adapter and the software that
//! actually parses PDF and produces HTML.
//!
//! Each engine is an opaque collaborator behind the [`Converter`] trait:
//! bytes in (as a file path), HTML out (into a bounded sink), failures
//! classified. Swapping engines never changes caller code.
//!
//! Two engines ship with the crate:
//!
//! 1. [`pdfium::PdfiumConverter`] — in-process, binds the pdfium shared
//!    library and builds page-per-`<div>` HTML from extracted text.
//! 2. [`poppler::PopplerConverter`] — out-of-process, shells out to
//!    poppler's `pdftohtml` binary and collects its stdout.

use crate::error::ConvertError;
use crate::options::ConversionOptions;
use crate::sink::HtmlSink;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

pub mod pdfium;
pub mod poppler;

pub use pdfium::PdfiumConverter;
pub use poppler::PopplerConverter;

/// A PDF-to-HTML converter engine.
///
/// Implementations must be stateless across calls (the adapter permits
/// concurrent conversions against one engine instance) and must write
/// every byte of output through the provided [`HtmlSink`] so the
/// `max_buffer` ceiling is enforced during accumulation, not after.
#[async_trait]
pub trait Converter: Send + Sync {
    /// Short engine identifier used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Convert the PDF at `pdf` into HTML, writing output into `out`.
    ///
    /// `out` is freshly created for this call with the caller's
    /// `max_buffer`; a sink error means the ceiling was crossed and the
    /// engine must abort immediately, releasing any external resources
    /// (child processes included).
    async fn run(
        &self,
        pdf: &Path,
        options: &ConversionOptions,
        out: &mut HtmlSink,
    ) -> Result<(), ConvertError>;
}

/// Resolve the converter engine, from most-specific to least-specific.
///
/// 1. **Pre-built engine** (`options.converter`) — the caller constructed
///    the engine entirely; we use it as-is. Useful in tests or when the
///    caller wraps an engine in middleware.
/// 2. **Named engine** (`options.engine_name`) — "pdfium" or "pdftohtml".
/// 3. **Environment** (`PDF2HTML_ENGINE`) — engine chosen at the
///    execution-environment level (Makefile, shell script, CI).
/// 4. **Auto-detection** — pdfium if its shared library binds, else
///    `pdftohtml` if the binary is on PATH, else
///    [`ConvertError::ConverterUnavailable`] with setup hints.
pub(crate) fn resolve_converter(
    options: &ConversionOptions,
) -> Result<Arc<dyn Converter>, ConvertError> {
    if let Some(ref converter) = options.converter {
        return Ok(Arc::clone(converter));
    }

    if let Some(ref name) = options.engine_name {
        return create_engine(name);
    }

    if let Ok(name) = std::env::var("PDF2HTML_ENGINE") {
        if !name.is_empty() {
            return create_engine(&name);
        }
    }

    if pdfium::is_available() {
        debug!("Auto-detected engine: pdfium");
        return Ok(Arc::new(PdfiumConverter::new()));
    }
    if poppler::is_available() {
        debug!("Auto-detected engine: pdftohtml");
        return Ok(Arc::new(PopplerConverter::new()));
    }

    Err(ConvertError::ConverterUnavailable {
        engine: "auto".to_string(),
        hint: "No converter engine could be auto-detected.\n\
               Install the pdfium shared library (set PDFIUM_LIB_PATH to an existing copy)\n\
               or poppler-utils (provides the pdftohtml binary), or name an engine\n\
               explicitly via ConversionOptions or PDF2HTML_ENGINE."
            .to_string(),
    })
}

/// Instantiate a named engine.
fn create_engine(name: &str) -> Result<Arc<dyn Converter>, ConvertError> {
    match name.trim().to_ascii_lowercase().as_str() {
        "pdfium" => Ok(Arc::new(PdfiumConverter::new())),
        "pdftohtml" | "poppler" => Ok(Arc::new(PopplerConverter::new())),
        other => Err(ConvertError::ConverterUnavailable {
            engine: other.to_string(),
            hint: "Known engines: pdfium, pdftohtml.".to_string(),
        }),
    }
}
