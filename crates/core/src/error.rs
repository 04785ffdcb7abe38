//! Shared error types

use thiserror::Error;

/// Error raised when reading data from a library item fails.
///
/// Read failures are expected at runtime (missing files, corrupt tags,
/// unreachable media stores) and are always recoverable at the binding
/// layer: the displayable default stays on screen.
#[derive(Debug, Error)]
pub enum LibraryReadError {
    /// The underlying data could not be read
    #[error("library data unavailable: {0}")]
    Unavailable(String),

    /// An I/O error occurred while reading artwork
    #[error("artwork I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Artwork bytes could not be decoded into a bitmap
    #[error("artwork decode failed: {0}")]
    Decode(String),
}
