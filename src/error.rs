//! Crate error type

use thiserror::Error;

/// Everything that can go wrong in the generator or the copy path.
///
/// None of these are fatal: picker errors indicate a programming mistake,
/// clipboard errors are recovered or surfaced as a transient label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Tried to pick from a pool with no entries
    #[error("cannot pick from an empty pool")]
    EmptyPool,

    /// Integer range with `min > max`
    #[error("invalid range: min {min} is greater than max {max}")]
    InvalidRange { min: i32, max: i32 },

    /// The async clipboard API rejected the write
    #[error("clipboard write denied: {0}")]
    ClipboardDenied(String),

    /// Both the clipboard API and the selection fallback failed
    #[error("copy failed: {0}")]
    CopyFailed(String),
}

/// Result type for the crate.
pub type Result<T> = std::result::Result<T, Error>;
