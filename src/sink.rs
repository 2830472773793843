//! Byte sink abstraction for encoder output.
//!
//! The encoder is write-once and forward-only: it only ever appends bytes.
//! Callers that want the result in memory pass a `Vec<u8>`; callers that
//! stream to a file or socket wrap any [`std::io::Write`] in [`IoSink`].

use crate::error::{Error, Result};
use std::io::Write;

/// Destination for encoded JPEG bytes.
///
/// A failed `append` aborts the encode; bytes already delivered to the
/// sink are considered partial output and should be discarded.
pub trait Sink {
    /// Append `bytes` to the output.
    fn append(&mut self, bytes: &[u8]) -> Result<()>;
}

impl Sink for Vec<u8> {
    #[inline]
    fn append(&mut self, bytes: &[u8]) -> Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

/// Adapter exposing any [`std::io::Write`] as a [`Sink`].
///
/// Write errors are reported as [`Error::Sink`].
#[derive(Debug)]
pub struct IoSink<W: Write>(pub W);

impl<W: Write> IoSink<W> {
    /// Consume the adapter and return the inner writer.
    pub fn into_inner(self) -> W {
        self.0
    }
}

impl<W: Write> Sink for IoSink<W> {
    #[inline]
    fn append(&mut self, bytes: &[u8]) -> Result<()> {
        self.0
            .write_all(bytes)
            .map_err(|e| Error::Sink(e.to_string()))
    }
}
