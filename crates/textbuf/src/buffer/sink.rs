//! Formatting sinks for the two-phase formatted append.
//!
//! [`CountingSink`] is the measuring side: a [`fmt::Write`] that stores
//! nothing and accumulates only the byte count the rendered output would
//! occupy. [`BoundedSink`] is the committing side: it renders into a fixed
//! slice, truncating rather than failing when the output outgrows the
//! space, and reports how many bytes actually landed.

use std::fmt;

/// Measures rendered output size without storing any of it.
#[derive(Debug, Default)]
pub(crate) struct CountingSink {
    count: usize,
}

impl CountingSink {
    /// Total bytes the rendered output would occupy.
    pub(crate) fn count(&self) -> usize {
        self.count
    }
}

impl fmt::Write for CountingSink {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.count = self.count.saturating_add(s.len());
        Ok(())
    }
}

/// Renders into a fixed destination slice.
///
/// Overflow is not an error at this layer: excess bytes are dropped and the
/// sink records that truncation happened, mirroring a bounded render that
/// reports the shortfall instead of aborting mid-write.
#[derive(Debug)]
pub(crate) struct BoundedSink<'a> {
    dest: &'a mut [u8],
    written: usize,
    truncated: bool,
}

impl<'a> BoundedSink<'a> {
    pub(crate) fn new(dest: &'a mut [u8]) -> Self {
        Self {
            dest,
            written: 0,
            truncated: false,
        }
    }

    /// Bytes actually written into the destination slice.
    pub(crate) fn written(&self) -> usize {
        self.written
    }

    /// Whether any rendered bytes were dropped for lack of space.
    pub(crate) fn truncated(&self) -> bool {
        self.truncated
    }
}

impl fmt::Write for BoundedSink<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = s.as_bytes();
        let room = self.dest.len() - self.written;
        let take = bytes.len().min(room);
        self.dest[self.written..self.written + take].copy_from_slice(&bytes[..take]);
        self.written += take;
        if take < bytes.len() {
            self.truncated = true;
        }
        Ok(())
    }
}
