//! Bounded output collection.
//!
//! ## Why a bounded writer instead of a size check?
//!
//! The output ceiling (`max_buffer`) has to stop accumulation *while* the
//! engine is still producing output, not after. A post-hoc `html.len()`
//! check would let a pathological document balloon memory to an arbitrary
//! size before failing. [`HtmlSink`] refuses the first write that would
//! cross the ceiling, releases the partial buffer immediately, and the
//! engines treat that error as an instruction to abort (the subprocess
//! engine kills its child process on the spot).

use crate::error::ConvertError;

/// A byte sink with a hard ceiling, filled by converter engines.
///
/// Created once per conversion with the caller's `max_buffer`, handed to
/// the engine, and consumed with [`HtmlSink::into_html`] on success.
#[derive(Debug)]
pub struct HtmlSink {
    buf: Vec<u8>,
    limit: usize,
}

impl HtmlSink {
    /// Create an empty sink that accepts at most `limit` bytes.
    pub fn new(limit: usize) -> Self {
        Self {
            buf: Vec::new(),
            limit,
        }
    }

    /// The configured byte ceiling.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Bytes collected so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Append raw bytes, failing with [`ConvertError::OutputTooLarge`] if
    /// the ceiling would be crossed.
    ///
    /// On failure the partial buffer is dropped; the sink is unusable for
    /// further output and the conversion must be aborted.
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), ConvertError> {
        if self.buf.len().saturating_add(bytes.len()) > self.limit {
            // Release the partial buffer rather than holding limit-sized
            // memory for an error path nobody will read.
            self.buf = Vec::new();
            return Err(ConvertError::OutputTooLarge {
                limit_bytes: self.limit,
            });
        }
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Append a string fragment. See [`HtmlSink::write`].
    pub fn push_str(&mut self, s: &str) -> Result<(), ConvertError> {
        self.write(s.as_bytes())
    }

    /// View the collected bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the sink, validating the collected bytes as UTF-8.
    ///
    /// Engines that shell out collect raw subprocess bytes; a converter
    /// emitting a non-UTF-8 encoding is a conversion failure, not a panic.
    pub fn into_html(self, engine: &str) -> Result<String, ConvertError> {
        String::from_utf8(self.buf).map_err(|e| ConvertError::ConversionFailed {
            engine: engine.to_string(),
            detail: format!("output is not valid UTF-8: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_within_limit() {
        let mut sink = HtmlSink::new(16);
        sink.write(b"<p>hi</p>").unwrap();
        sink.push_str("\n").unwrap();
        assert_eq!(sink.len(), 10);
        assert_eq!(sink.into_html("test").unwrap(), "<p>hi</p>\n");
    }

    #[test]
    fn rejects_write_crossing_limit() {
        let mut sink = HtmlSink::new(8);
        sink.write(b"12345678").unwrap();
        let err = sink.write(b"9").unwrap_err();
        assert!(matches!(
            err,
            ConvertError::OutputTooLarge { limit_bytes: 8 }
        ));
    }

    #[test]
    fn releases_partial_buffer_on_overflow() {
        let mut sink = HtmlSink::new(4);
        sink.write(b"1234").unwrap();
        assert!(sink.write(b"5").is_err());
        assert!(sink.is_empty());
    }

    #[test]
    fn exact_fit_is_allowed() {
        let mut sink = HtmlSink::new(4);
        sink.write(b"1234").unwrap();
        assert_eq!(sink.len(), 4);
    }

    #[test]
    fn zero_limit_rejects_any_write() {
        let mut sink = HtmlSink::new(0);
        assert!(sink.write(b"x").is_err());
        assert!(sink.write(b"").is_ok());
    }

    #[test]
    fn invalid_utf8_is_conversion_failed() {
        let mut sink = HtmlSink::new(16);
        sink.write(&[0xff, 0xfe, 0x00]).unwrap();
        let err = sink.into_html("pdftohtml").unwrap_err();
        match err {
            ConvertError::ConversionFailed { engine, .. } => assert_eq!(engine, "pdftohtml"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
