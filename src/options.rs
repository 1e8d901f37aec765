//! Configuration types for PDF-to-HTML conversion.
//!
//! All conversion behaviour is controlled through [`ConversionOptions`],
//! built via its [`ConversionOptionsBuilder`]. Keeping every knob in one
//! struct makes it trivial to share options across calls and threads —
//! the adapter itself holds no state between conversions.

use crate::engine::Converter;
use crate::error::ConvertError;
use std::fmt;
use std::sync::Arc;

/// Default ceiling on collected HTML output: 64 MiB.
///
/// Text-dominated documents produce far less; a ceiling this size only
/// triggers on pathological inputs (embedded-resource dumps, decompression
/// bombs) where failing fast is the point.
pub const DEFAULT_MAX_BUFFER: usize = 64 * 1024 * 1024;

/// Options for a single PDF-to-HTML conversion.
///
/// Built via [`ConversionOptions::builder()`] or
/// [`ConversionOptions::default()`].
///
/// # Example
/// ```rust
/// use pdf2html::ConversionOptions;
///
/// let options = ConversionOptions::builder()
///     .max_buffer(10 * 1024 * 1024)
///     .engine_name("pdfium")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionOptions {
    /// Byte ceiling on collected conversion output. Default: [`DEFAULT_MAX_BUFFER`].
    ///
    /// Crossing the ceiling aborts the in-flight conversion with
    /// [`ConvertError::OutputTooLarge`] and releases the partial buffer;
    /// output never keeps accumulating past this bound.
    pub max_buffer: usize,

    /// Named engine ("pdfium", "pdftohtml"). If None along with
    /// `converter`, the engine is auto-detected.
    pub engine_name: Option<String>,

    /// Pre-constructed converter engine. Takes precedence over
    /// `engine_name`. Useful in tests or when the caller needs custom
    /// middleware around an engine.
    pub converter: Option<Arc<dyn Converter>>,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Emit the standalone HTML shell (doctype, charset, embedded CSS)
    /// around the page markup. Default: true. When false the library
    /// engine emits only the per-page fragments, for callers embedding
    /// the result in their own document.
    pub include_styles: bool,

    /// Inline page images as base64 PNG data URIs. Default: false.
    ///
    /// Off by default because embedded images dominate output size and
    /// push conversions towards the `max_buffer` ceiling. Only the
    /// pdfium engine honours this; `pdftohtml` handles images itself.
    pub embed_images: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            max_buffer: DEFAULT_MAX_BUFFER,
            engine_name: None,
            converter: None,
            password: None,
            include_styles: true,
            embed_images: false,
        }
    }
}

impl fmt::Debug for ConversionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionOptions")
            .field("max_buffer", &self.max_buffer)
            .field("engine_name", &self.engine_name)
            .field("converter", &self.converter.as_ref().map(|c| c.name()))
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("include_styles", &self.include_styles)
            .field("embed_images", &self.embed_images)
            .finish()
    }
}

impl ConversionOptions {
    /// Create a new builder for `ConversionOptions`.
    pub fn builder() -> ConversionOptionsBuilder {
        ConversionOptionsBuilder {
            options: Self::default(),
        }
    }
}

/// Builder for [`ConversionOptions`].
#[derive(Debug)]
pub struct ConversionOptionsBuilder {
    options: ConversionOptions,
}

impl ConversionOptionsBuilder {
    pub fn max_buffer(mut self, bytes: usize) -> Self {
        self.options.max_buffer = bytes;
        self
    }

    pub fn engine_name(mut self, name: impl Into<String>) -> Self {
        self.options.engine_name = Some(name.into());
        self
    }

    pub fn converter(mut self, converter: Arc<dyn Converter>) -> Self {
        self.options.converter = Some(converter);
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.options.password = Some(pwd.into());
        self
    }

    pub fn include_styles(mut self, v: bool) -> Self {
        self.options.include_styles = v;
        self
    }

    pub fn embed_images(mut self, v: bool) -> Self {
        self.options.embed_images = v;
        self
    }

    /// Build the options, validating constraints.
    pub fn build(self) -> Result<ConversionOptions, ConvertError> {
        if self.options.max_buffer == 0 {
            return Err(ConvertError::InvalidOptions(
                "max_buffer must be a positive number of bytes".into(),
            ));
        }
        Ok(self.options)
    }
}
