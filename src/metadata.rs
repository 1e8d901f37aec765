//! Document metadata extracted without converting content.

use serde::{Deserialize, Serialize};

/// PDF document properties, as reported by the pdfium engine.
///
/// All string fields are `None` when the document does not carry the
/// corresponding entry (most PDFs in the wild set only a few).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
    /// Total number of pages in the document.
    pub page_count: usize,
    /// PDF format version, e.g. "Pdf17".
    pub pdf_version: String,
}
