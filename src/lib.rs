//! # pdf2html
//!
//! Convert PDF documents to standalone HTML.
//!
//! ## Why this crate?
//!
//! Every PDF-to-HTML pipeline ends up wrapping some external converter —
//! a shared library here, a command-line binary there — and every wrapper
//! grows the same three problems: unbounded output buffers, ad-hoc error
//! strings, and caller code welded to one engine. This crate is that
//! wrapper done once: a stable [`Converter`] seam with one adapter per
//! engine, a byte ceiling enforced *while* output accumulates, and a
//! classified error for every way a conversion can fail.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF (path or buffer)
//!  │
//!  ├─ 1. Input    validate magic bytes, spill buffers to a temp file
//!  ├─ 2. Engine   pdfium (in-process) or pdftohtml (subprocess)
//!  ├─ 3. Sink     bounded collection, aborts past max_buffer
//!  ├─ 4. Polish   deterministic cleanup (line endings, invisible chars)
//!  └─ 5. Output   UTF-8 HTML string, persisted by the caller
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2html::{convert, ConversionOptions, DocumentInput};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = ConversionOptions::default();
//!     let html = convert(DocumentInput::path("document.pdf"), &options).await?;
//!     std::fs::write("document.html", &html)?;
//!     Ok(())
//! }
//! ```
//!
//! Buffer inputs work the same way:
//!
//! ```rust,no_run
//! # use pdf2html::{convert, ConversionOptions, DocumentInput};
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("document.pdf")?;
//! let options = ConversionOptions::builder()
//!     .max_buffer(10 * 1024 * 1024)
//!     .build()?;
//! let html = convert(DocumentInput::bytes(bytes), &options).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2html` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2html = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod convert;
pub mod engine;
pub mod error;
pub mod input;
pub mod metadata;
pub mod options;
pub mod postprocess;
pub mod sink;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use convert::{convert, convert_sync, convert_to_file, inspect};
pub use engine::{Converter, PdfiumConverter, PopplerConverter};
pub use error::ConvertError;
pub use input::DocumentInput;
pub use metadata::DocumentMetadata;
pub use options::{ConversionOptions, ConversionOptionsBuilder, DEFAULT_MAX_BUFFER};
pub use sink::HtmlSink;
