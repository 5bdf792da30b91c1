//! # textbuf
//!
//! An extensible, always NUL-terminated text accumulation buffer.
//!
//! [`Buffer`] collects text incrementally, in arbitrarily small pieces,
//! without the caller having to predict the final size. The accumulated
//! content is available at all times as a terminated byte sequence, and
//! appends never disturb previously written bytes, even across internal
//! reallocation.
//!
//! ## Modules
//!
//! - [`buffer`] - The extensible buffer, its growth policy, and append operations
//! - [`error`] - Crate-wide error and result types
//!
//! ## Quick Start
//!
//! ```rust
//! use textbuf::Buffer;
//!
//! let mut buf = Buffer::new();
//! buf.append("passed: ")?;
//! buf.append_fmt(format_args!("{} of {}", 3, 7))?;
//!
//! assert_eq!(buf.as_bytes(), b"passed: 3 of 7");
//! assert_eq!(buf.as_bytes_with_nul().last(), Some(&0));
//! # Ok::<(), textbuf::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod buffer;
pub mod error;

// Re-export commonly used types at crate root
pub use buffer::{Buffer, DEFAULT_GROWTH_QUANTUM};
pub use error::{Error, Result};
