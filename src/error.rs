//! Error types for the pdf2html library.
//!
//! A single [`ConvertError`] enum covers every failure the adapter can
//! surface. The four variants that matter most to callers map directly to
//! distinct recovery strategies:
//!
//! * [`ConvertError::InputNotFound`] — fix the path.
//! * [`ConvertError::OutputTooLarge`] — raise `max_buffer` or accept the
//!   document cannot be converted within the configured ceiling.
//! * [`ConvertError::ConversionFailed`] — the document itself is the
//!   problem (corrupt, encrypted, unsupported structure); retrying the
//!   same bytes will fail again.
//! * [`ConvertError::ConverterUnavailable`] — the engine is the problem
//!   (missing shared library or binary); install it or pick another engine.
//!
//! All failures surface synchronously from the `convert*` entry points.
//! The library never retries and never returns partial output; retry
//! policy, if desired, belongs to the caller.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf2html library.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input path does not resolve to a readable file.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    InputNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// An in-memory buffer input was empty.
    #[error("Input buffer is empty — a PDF document has at least a header and a trailer.")]
    EmptyInput,

    /// The byte source was readable but does not start with the PDF magic.
    #[error("Input is not a valid PDF: {origin}\nFirst bytes: {magic:?}")]
    NotAPdf { origin: String, magic: [u8; 4] },

    // ── Conversion errors ─────────────────────────────────────────────────
    /// Collected HTML output would exceed the configured `max_buffer`.
    ///
    /// The in-flight conversion is aborted and the partial buffer released
    /// as soon as the ceiling is crossed; nothing keeps accumulating.
    #[error(
        "Conversion output exceeds the configured limit of {limit_bytes} bytes.\n\
         Raise it with ConversionOptions::builder().max_buffer(..) or --max-buffer."
    )]
    OutputTooLarge { limit_bytes: usize },

    /// The engine reported an internal error (malformed or encrypted PDF,
    /// unsupported structure, non-zero exit, invalid output encoding).
    #[error("Conversion failed in engine '{engine}': {detail}")]
    ConversionFailed { engine: String, detail: String },

    /// The engine cannot be invoked at all (missing dependency/runtime).
    #[error("Converter engine '{engine}' is unavailable.\n{hint}")]
    ConverterUnavailable { engine: String, hint: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output HTML file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Options errors ────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_not_found_display() {
        let e = ConvertError::InputNotFound {
            path: PathBuf::from("/tmp/missing.pdf"),
        };
        assert!(e.to_string().contains("/tmp/missing.pdf"));
    }

    #[test]
    fn output_too_large_display() {
        let e = ConvertError::OutputTooLarge {
            limit_bytes: 1_048_576,
        };
        let msg = e.to_string();
        assert!(msg.contains("1048576"), "got: {msg}");
        assert!(msg.contains("max_buffer"));
    }

    #[test]
    fn conversion_failed_display() {
        let e = ConvertError::ConversionFailed {
            engine: "pdfium".into(),
            detail: "document is encrypted".into(),
        };
        assert!(e.to_string().contains("pdfium"));
        assert!(e.to_string().contains("encrypted"));
    }

    #[test]
    fn converter_unavailable_display() {
        let e = ConvertError::ConverterUnavailable {
            engine: "pdftohtml".into(),
            hint: "Install poppler-utils.".into(),
        };
        assert!(e.to_string().contains("pdftohtml"));
        assert!(e.to_string().contains("poppler-utils"));
    }

    #[test]
    fn not_a_pdf_display() {
        let e = ConvertError::NotAPdf {
            origin: "in-memory buffer".into(),
            magic: *b"<htm",
        };
        assert!(e.to_string().contains("in-memory buffer"));
    }
}
