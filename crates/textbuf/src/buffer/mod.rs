//! Extensible, always NUL-terminated accumulation buffer.
//!
//! [`Buffer`] safely saves text of arbitrary length built up in small
//! pieces. The content is kept terminated at all times, so a terminated
//! view of it is available after every operation, and growth preserves
//! every previously written byte.
//!
//! # Growth
//!
//! Storage is lazy: a fresh buffer owns nothing until the first append or
//! explicit pre-size forces an allocation. Every allocation reserves one
//! byte beyond the content capacity for the terminator, and capacity only
//! ever grows over a buffer's lifetime. The minimum allocation step is the
//! buffer's growth quantum, a per-instance policy value that defaults to
//! [`DEFAULT_GROWTH_QUANTUM`]; tests use a quantum of 1 to exercise every
//! reallocation path.
//!
//! # Formatted appends
//!
//! [`Buffer::append_fmt`] uses a measure-then-commit protocol: the
//! arguments are first rendered into a counting sink to learn the expanded
//! size, capacity is secured up front, and only then is the output rendered
//! directly into the spare region. A formatting failure in either phase
//! leaves the buffer observably unchanged.
//!
//! # Usage
//!
//! ```rust
//! use textbuf::Buffer;
//!
//! let mut buf = Buffer::new();
//! buf.append("count: ")?;
//! buf.append_fmt(format_args!("{}", 42))?;
//!
//! assert_eq!(buf.as_bytes(), b"count: 42");
//! buf.clear();
//! assert!(buf.is_empty());
//! # Ok::<(), textbuf::Error>(())
//! ```

mod sink;

use std::fmt;

use crate::error::{Error, Result};
use sink::{BoundedSink, CountingSink};

/// Default minimum allocation increment, in bytes.
///
/// There is nothing magic about this size. It is just big enough to avoid
/// most resizing. Override it per instance with [`Buffer::with_quantum`].
pub const DEFAULT_GROWTH_QUANTUM: usize = 16;

/// Terminated view returned before the first allocation: zero content
/// bytes followed by the terminator.
const EMPTY_WITH_NUL: &[u8] = &[0];

/// An extensible byte buffer whose content is always NUL-terminated.
///
/// The buffer accumulates content through the append operations and hands
/// it back through [`as_bytes`](Buffer::as_bytes),
/// [`as_bytes_with_nul`](Buffer::as_bytes_with_nul), and
/// [`copy_out`](Buffer::copy_out). Whenever storage exists, the byte at
/// offset [`len`](Buffer::len) is the terminator, and
/// [`capacity`](Buffer::capacity) never decreases.
///
/// A single context owns the buffer at a time; there is no internal
/// synchronization.
#[derive(Debug)]
pub struct Buffer {
    /// Backing storage; `None` until the first allocating operation.
    storage: Option<Box<[u8]>>,
    /// Content bytes currently stored, excluding the terminator.
    length: usize,
    /// Minimum allocation increment for this instance, at least 1.
    quantum: usize,
}

impl Buffer {
    /// Creates an empty buffer with the default growth quantum.
    ///
    /// No storage is allocated until the first append or pre-size.
    #[must_use]
    pub fn new() -> Self {
        Self::with_quantum(DEFAULT_GROWTH_QUANTUM)
    }

    /// Creates an empty buffer with an explicit growth quantum.
    ///
    /// The quantum is the minimum allocation step applied whenever storage
    /// is materialized or grown. It can be quite small but must not be
    /// zero; zero is clamped to 1.
    #[must_use]
    pub fn with_quantum(quantum: usize) -> Self {
        Self {
            storage: None,
            length: 0,
            quantum: quantum.max(1),
        }
    }

    /// Content length in bytes, excluding the terminator.
    #[must_use]
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the buffer holds no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Total allocated bytes, including the terminator slot.
    ///
    /// Zero until the first allocating operation; never decreases
    /// afterwards. Exposed for diagnostics and tests.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.as_ref().map_or(0, |storage| storage.len())
    }

    /// The minimum allocation increment configured for this buffer.
    #[must_use]
    pub fn quantum(&self) -> usize {
        self.quantum
    }

    /// Read-only view of the content, terminator excluded.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self.storage.as_ref() {
            Some(storage) => &storage[..self.length],
            None => &[],
        }
    }

    /// The content plus its trailing terminator.
    ///
    /// Never absent: before the first allocation this is a single
    /// terminator byte, so callers always observe a terminated sequence.
    #[must_use]
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        match self.storage.as_ref() {
            Some(storage) => &storage[..=self.length],
            None => EMPTY_WITH_NUL,
        }
    }

    /// Detaches an owned copy of the content plus terminator.
    ///
    /// Returns `None` when the buffer is empty. Ownership of the copy
    /// transfers fully to the caller; mutating this buffer afterwards does
    /// not affect it.
    pub fn copy_out(&self) -> Result<Option<Box<[u8]>>> {
        if self.length == 0 {
            return Ok(None);
        }
        let size = self.length + 1;
        let mut copy = Vec::new();
        copy.try_reserve_exact(size)
            .map_err(|_| Error::Allocation { requested: size })?;
        copy.extend_from_slice(self.as_bytes_with_nul());
        Ok(Some(copy.into_boxed_slice()))
    }

    /// Empties the content, keeping the allocation.
    ///
    /// Capacity is never reduced by clearing; a cleared buffer refills
    /// without reallocating.
    pub fn clear(&mut self) {
        self.length = 0;
        if let Some(storage) = self.storage.as_mut() {
            storage[0] = 0;
        }
    }

    /// Releases the storage and returns to the freshly constructed state.
    ///
    /// The growth quantum is retained. Safe to call on a buffer that never
    /// allocated, and repeatedly.
    pub fn reset(&mut self) {
        self.storage = None;
        self.length = 0;
    }

    /// Ensures total capacity is at least `min_total` bytes, terminator
    /// slot included. Content is unaffected.
    ///
    /// This is a pre-sizing hook for callers about to issue a burst of
    /// writes; correctness never depends on calling it.
    pub fn force_capacity(&mut self, min_total: usize) -> Result<()> {
        let capacity = self.capacity();
        if capacity < min_total {
            self.grow(min_total - capacity)?;
        }
        Ok(())
    }

    /// Appends raw bytes, trusting the slice length as-is.
    ///
    /// This is the single mutation primitive; every other append funnels
    /// through it. Zero bytes in `bytes` are stored verbatim and will make
    /// the terminated view end early for C-style consumers.
    pub fn append_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure_room(bytes.len())?;
        let offset = self.length;
        if let Some(storage) = self.storage.as_mut() {
            storage[offset..offset + bytes.len()].copy_from_slice(bytes);
            storage[offset + bytes.len()] = 0;
        }
        self.length = offset + bytes.len();
        Ok(())
    }

    /// Appends a string slice. Empty input is a no-op.
    pub fn append(&mut self, s: &str) -> Result<()> {
        if s.is_empty() {
            return Ok(());
        }
        self.append_bytes(s.as_bytes())
    }

    /// Appends a terminator-delimited byte sequence.
    ///
    /// The content length is discovered from the sequence itself: the bytes
    /// up to the first zero, or the whole slice when none is present.
    /// Zero-length content is a no-op.
    pub fn append_nul_terminated(&mut self, bytes: &[u8]) -> Result<()> {
        let content = content_prefix(bytes);
        if content.is_empty() {
            return Ok(());
        }
        self.append_bytes(content)
    }

    /// Appends exactly `claimed` bytes, defending against a bad claim.
    ///
    /// The true content length is recomputed from the sequence (up to its
    /// first zero byte, never past the end of the slice). A claim larger
    /// than the true length is a caller contract violation: a diagnostic is
    /// emitted and the append clamps to the true prefix. The buffer remains
    /// valid either way.
    pub fn append_bounded(&mut self, bytes: &[u8], claimed: usize) -> Result<()> {
        let content = content_prefix(bytes);
        if content.len() < claimed {
            tracing::warn!(
                "bounded append claimed {} bytes but content ends at {}",
                claimed,
                content.len()
            );
            return self.append_bytes(content);
        }
        self.append_bytes(&bytes[..claimed])
    }

    /// Measures the fully expanded size of `args`, in bytes, without
    /// touching any buffer.
    ///
    /// This is the first half of the two-phase formatted append. It renders
    /// into a counting sink, so no scratch storage is assumed to be large
    /// enough for the output. A formatting failure surfaces as
    /// [`Error::Format`].
    pub fn measure_fmt(args: fmt::Arguments<'_>) -> Result<usize> {
        let mut probe = CountingSink::default();
        fmt::write(&mut probe, args).map_err(|_| Error::Format)?;
        Ok(probe.count())
    }

    /// Appends formatted arguments using the measure-then-commit protocol.
    ///
    /// The arguments are measured first via [`measure_fmt`](Self::measure_fmt),
    /// capacity is secured for the whole expansion plus terminator, and the
    /// same arguments are then rendered directly into the spare region.
    ///
    /// A formatting failure in either phase leaves the buffer observably
    /// unchanged and returns [`Error::Format`]. Should the committed render
    /// produce more bytes than were measured, the length advances only by
    /// the bytes that actually fit.
    pub fn append_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<()> {
        let measured = Self::measure_fmt(args)?;
        let total = self.length.saturating_add(measured).saturating_add(1);
        self.force_capacity(total)?;

        let offset = self.length;
        let capacity = self.capacity();
        if let Some(storage) = self.storage.as_mut() {
            // Render a second time, into the content region this time. The
            // terminator slot at capacity - 1 stays out of the sink's reach.
            let mut sink = BoundedSink::new(&mut storage[offset..capacity - 1]);
            let rendered = fmt::write(&mut sink, args);
            let written = sink.written();
            let truncated = sink.truncated();
            if rendered.is_err() {
                // The render may have scribbled past `length`; restoring the
                // terminator there makes that invisible.
                storage[offset] = 0;
                return Err(Error::Format);
            }
            if truncated {
                tracing::warn!(
                    "formatted append measured {} bytes but only {} fit",
                    measured,
                    written
                );
            }
            self.length = offset + written;
            storage[self.length] = 0;
        }
        Ok(())
    }

    /// First allocation: `max(min_len, quantum)` content bytes plus the
    /// terminator slot, zeroed, with `length` reset to 0.
    fn init(&mut self, min_len: usize) -> Result<()> {
        if self.storage.is_some() {
            return Ok(());
        }
        let size = min_len.max(self.quantum).saturating_add(1);
        self.storage = Some(allocate(size)?);
        self.length = 0;
        Ok(())
    }

    /// Reallocates to `max(capacity + extra, quantum)` bytes, preserving
    /// the content bytes and the terminator. Capacity never shrinks, and
    /// `extra` of zero is harmless.
    fn grow(&mut self, extra: usize) -> Result<()> {
        let capacity = self.capacity();
        let new_size = capacity.saturating_add(extra).max(self.quantum);
        if new_size <= capacity {
            return Ok(());
        }
        let mut region = allocate(new_size)?;
        if let Some(old) = self.storage.as_ref() {
            region[..=self.length].copy_from_slice(&old[..=self.length]);
        }
        self.storage = Some(region);
        Ok(())
    }

    /// Makes room for `needed` more content bytes plus the terminator.
    fn ensure_room(&mut self, needed: usize) -> Result<()> {
        if self.storage.is_none() {
            self.init(needed)?;
        }
        if self.capacity() - self.length <= needed {
            self.grow(needed)?;
        }
        Ok(())
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Streaming writes funnel through the raw append primitive, so
/// `write!(buf, ...)` composes with the rest of the API. Failures collapse
/// to [`fmt::Error`]; use [`Buffer::append_fmt`] to keep the error detail.
impl fmt::Write for Buffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append_bytes(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

/// Lossy UTF-8 rendering of the content, for diagnostics.
impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        String::from_utf8_lossy(self.as_bytes()).fmt(f)
    }
}

/// Allocates a zeroed region of exactly `size` bytes, reporting failure to
/// the caller instead of aborting.
fn allocate(size: usize) -> Result<Box<[u8]>> {
    let mut region = Vec::new();
    region
        .try_reserve_exact(size)
        .map_err(|_| Error::Allocation { requested: size })?;
    region.resize(size, 0);
    Ok(region.into_boxed_slice())
}

/// Bytes of `input` up to, not including, the first zero byte.
fn content_prefix(input: &[u8]) -> &[u8] {
    let end = input.iter().position(|&b| b == 0).unwrap_or(input.len());
    &input[..end]
}
