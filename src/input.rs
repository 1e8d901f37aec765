//! Input resolution: normalise a path or byte buffer to a local file.
//!
//! ## Why write buffers to a temp file?
//!
//! Both engines need a file-system path: pdfium streams from disk and
//! `pdftohtml` is a subprocess that takes a file argument. Writing a
//! buffer input to a [`tempfile::NamedTempFile`] gives the engine a path
//! while ensuring cleanup happens automatically when `ResolvedInput` is
//! dropped, even if the process panics. We validate the PDF magic bytes
//! (`%PDF`) before handing anything to an engine so callers get a
//! meaningful error rather than an engine crash.

use crate::error::ConvertError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// The caller-supplied reference to the source PDF.
///
/// Exactly one representation is supplied per call; the enum makes the
/// two shapes mutually exclusive by construction.
#[derive(Debug, Clone)]
pub enum DocumentInput {
    /// Filesystem path to an existing PDF file.
    Path(PathBuf),
    /// Raw PDF bytes held in memory.
    Bytes(Vec<u8>),
}

impl DocumentInput {
    /// Input referencing a file on disk.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        DocumentInput::Path(path.into())
    }

    /// Input holding the document bytes in memory.
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        DocumentInput::Bytes(bytes.into())
    }
}

impl From<PathBuf> for DocumentInput {
    fn from(p: PathBuf) -> Self {
        DocumentInput::Path(p)
    }
}

impl From<&Path> for DocumentInput {
    fn from(p: &Path) -> Self {
        DocumentInput::Path(p.to_path_buf())
    }
}

impl From<Vec<u8>> for DocumentInput {
    fn from(b: Vec<u8>) -> Self {
        DocumentInput::Bytes(b)
    }
}

/// The resolved input — a local path, plus the temp file keeping buffer
/// inputs alive until conversion completes.
#[derive(Debug)]
pub(crate) enum ResolvedInput {
    /// Input was already a local file.
    Local(PathBuf),
    /// Input was a buffer; bytes written to a managed temp file.
    Buffered { path: PathBuf, _file: NamedTempFile },
}

impl ResolvedInput {
    /// Path to the PDF file regardless of how it was resolved.
    pub(crate) fn path(&self) -> &Path {
        match self {
            ResolvedInput::Local(p) => p,
            ResolvedInput::Buffered { path, .. } => path,
        }
    }
}

/// Normalise a [`DocumentInput`] to a local file the engine can open.
pub(crate) fn resolve(input: DocumentInput) -> Result<ResolvedInput, ConvertError> {
    match input {
        DocumentInput::Path(path) => resolve_path(path),
        DocumentInput::Bytes(bytes) => resolve_bytes(&bytes),
    }
}

/// Validate existence, readability and PDF magic bytes of a path input.
fn resolve_path(path: PathBuf) -> Result<ResolvedInput, ConvertError> {
    if !path.exists() {
        return Err(ConvertError::InputNotFound { path });
    }

    match std::fs::File::open(&path) {
        Ok(mut f) => {
            use std::io::Read;
            // Files shorter than the magic fail the check with a
            // zero-padded prefix, same as short buffers.
            let mut magic = [0u8; 4];
            let mut filled = 0;
            while filled < magic.len() {
                match f.read(&mut magic[filled..]) {
                    Ok(0) => break,
                    Ok(n) => filled += n,
                    Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                    Err(_) => break,
                }
            }
            if &magic != b"%PDF" {
                return Err(ConvertError::NotAPdf {
                    origin: path.display().to_string(),
                    magic,
                });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ConvertError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(ConvertError::InputNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(ResolvedInput::Local(path))
}

/// Validate a buffer input and spill it to a managed temp file.
fn resolve_bytes(bytes: &[u8]) -> Result<ResolvedInput, ConvertError> {
    if bytes.is_empty() {
        return Err(ConvertError::EmptyInput);
    }

    let mut magic = [0u8; 4];
    let n = bytes.len().min(4);
    magic[..n].copy_from_slice(&bytes[..n]);
    if &magic != b"%PDF" {
        return Err(ConvertError::NotAPdf {
            origin: "in-memory buffer".to_string(),
            magic,
        });
    }

    let mut file = NamedTempFile::new()
        .map_err(|e| ConvertError::Internal(format!("tempfile: {e}")))?;
    file.write_all(bytes)
        .map_err(|e| ConvertError::Internal(format!("tempfile write: {e}")))?;
    file.flush()
        .map_err(|e| ConvertError::Internal(format!("tempfile flush: {e}")))?;

    let path = file.path().to_path_buf();
    debug!("Spilled {} buffer bytes to {}", bytes.len(), path.display());
    Ok(ResolvedInput::Buffered { path, _file: file })
}
