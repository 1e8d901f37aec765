//! Out-of-process engine: poppler's `pdftohtml` binary.
//!
//! ## Why a subprocess engine at all?
//!
//! `pdftohtml` produces richer HTML (positioned text, links) than plain
//! text extraction, and shelling out keeps any crash in the converter out
//! of this process. The contract with the binary is deliberately thin:
//! send a file path in, collect stdout, respect the buffer ceiling, and
//! surface a non-zero exit as a classified failure.
//!
//! ## Bounding the output
//!
//! stdout is read in chunks straight into the caller's [`HtmlSink`].
//! The moment a chunk would cross the ceiling the child is killed — we
//! never wait for a runaway converter to finish producing output we
//! already know we will not keep.

use crate::error::ConvertError;
use crate::options::ConversionOptions;
use crate::sink::HtmlSink;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, warn};

const BINARY: &str = "pdftohtml";

/// Converter that shells out to poppler's `pdftohtml`.
#[derive(Debug, Default)]
pub struct PopplerConverter;

impl PopplerConverter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl super::Converter for PopplerConverter {
    fn name(&self) -> &'static str {
        "pdftohtml"
    }

    async fn run(
        &self,
        pdf: &Path,
        options: &ConversionOptions,
        out: &mut HtmlSink,
    ) -> Result<(), ConvertError> {
        let mut cmd = Command::new(BINARY);
        // -s: single document, -i: ignore images, -q: no progress chatter,
        // -stdout: write the HTML to stdout instead of a sibling file.
        cmd.arg("-s").arg("-i").arg("-q").arg("-stdout");
        if let Some(ref pwd) = options.password {
            cmd.arg("-upw").arg(pwd);
        }
        cmd.arg(pdf)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConvertError::ConverterUnavailable {
                    engine: BINARY.to_string(),
                    hint: "The pdftohtml binary was not found on PATH.\n\
                           Install poppler-utils (apt install poppler-utils / brew install poppler)."
                        .to_string(),
                }
            } else {
                ConvertError::Internal(format!("failed to spawn {BINARY}: {e}"))
            }
        })?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| ConvertError::Internal("child stdout not captured".into()))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ConvertError::Internal("child stderr not captured".into()))?;

        // Drain stderr on a separate task so a chatty converter cannot
        // deadlock against a full pipe while we read stdout.
        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            let _ = stderr.read_to_end(&mut buf).await;
            buf
        });

        let mut chunk = [0u8; 8192];
        loop {
            let n = stdout
                .read(&mut chunk)
                .await
                .map_err(|e| ConvertError::Internal(format!("reading {BINARY} stdout: {e}")))?;
            if n == 0 {
                break;
            }
            if let Err(overflow) = out.write(&chunk[..n]) {
                warn!("Output ceiling crossed, killing {BINARY}");
                child.start_kill().ok();
                child.wait().await.ok();
                stderr_task.abort();
                return Err(overflow);
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| ConvertError::Internal(format!("waiting for {BINARY}: {e}")))?;
        let stderr_bytes = stderr_task.await.unwrap_or_default();

        if !status.success() {
            let detail = String::from_utf8_lossy(&stderr_bytes).trim().to_string();
            return Err(ConvertError::ConversionFailed {
                engine: BINARY.to_string(),
                detail: if detail.is_empty() {
                    format!("exited with {status}")
                } else {
                    format!("exited with {status}: {detail}")
                },
            });
        }

        debug!("{BINARY} produced {} bytes", out.len());
        Ok(())
    }
}

/// True when the `pdftohtml` binary can be invoked on this host.
pub(crate) fn is_available() -> bool {
    std::process::Command::new(BINARY)
        .arg("-v")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}
