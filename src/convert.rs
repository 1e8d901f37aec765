//! Conversion entry points.
//!
//! Each call is a single stateless request/response against the resolved
//! engine: resolve the input to a local file, resolve the engine, run it
//! against a fresh bounded sink, post-process, return the HTML. The call
//! suspends the caller's task until the engine finishes or the buffer
//! ceiling aborts it; no state is shared between calls, so callers may
//! convert several documents concurrently if their engine supports it.

use crate::engine;
use crate::error::ConvertError;
use crate::input::{self, DocumentInput};
use crate::metadata::DocumentMetadata;
use crate::options::ConversionOptions;
use crate::postprocess;
use crate::sink::HtmlSink;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Convert a PDF document to HTML.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input` — The source PDF, by path or in-memory buffer
/// * `options` — Conversion options (`max_buffer`, engine selection, …)
///
/// # Returns
/// The complete UTF-8 HTML text. Identical input and options yield
/// byte-identical output.
///
/// # Errors
/// - [`ConvertError::InputNotFound`] — path does not resolve to a readable file
/// - [`ConvertError::OutputTooLarge`] — output would exceed `options.max_buffer`
/// - [`ConvertError::ConversionFailed`] — the engine rejected the document
/// - [`ConvertError::ConverterUnavailable`] — no engine can be invoked
pub async fn convert(
    input: DocumentInput,
    options: &ConversionOptions,
) -> Result<String, ConvertError> {
    let start = Instant::now();

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let resolved = input::resolve(input)?;

    // ── Step 2: Resolve engine ───────────────────────────────────────────
    let converter = engine::resolve_converter(options)?;
    debug!("Converting {} via '{}'", resolved.path().display(), converter.name());

    // ── Step 3: Run the engine against a bounded sink ────────────────────
    let mut sink = HtmlSink::new(options.max_buffer);
    converter.run(resolved.path(), options, &mut sink).await?;
    let html = sink.into_html(converter.name())?;

    // ── Step 4: Post-process ─────────────────────────────────────────────
    let html = postprocess::clean_html(&html);
    if html.trim().is_empty() {
        return Err(ConvertError::ConversionFailed {
            engine: converter.name().to_string(),
            detail: "converter produced no output".to_string(),
        });
    }

    info!(
        "Conversion complete: {} bytes in {}ms",
        html.len(),
        start.elapsed().as_millis()
    );
    Ok(html)
}

/// Convert a PDF and write the HTML directly to a file.
///
/// Uses atomic write (temp file + rename) so a failed conversion never
/// leaves a corrupt or truncated `.html` behind.
///
/// # Returns
/// The number of bytes written.
pub async fn convert_to_file(
    input: DocumentInput,
    output_path: impl AsRef<Path>,
    options: &ConversionOptions,
) -> Result<u64, ConvertError> {
    let html = convert(input, options).await?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ConvertError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }
    }

    let tmp_path = path.with_extension("html.tmp");
    tokio::fs::write(&tmp_path, &html)
        .await
        .map_err(|e| ConvertError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| ConvertError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(html.len() as u64)
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally; do not call from inside
/// an async context.
pub fn convert_sync(
    input: DocumentInput,
    options: &ConversionOptions,
) -> Result<String, ConvertError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ConvertError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(convert(input, options))
}

/// Extract PDF metadata without converting content.
///
/// Uses the pdfium engine regardless of the configured converter.
pub async fn inspect(input: DocumentInput) -> Result<DocumentMetadata, ConvertError> {
    let resolved = input::resolve(input)?;
    engine::pdfium::extract_metadata(resolved.path(), None).await
}
