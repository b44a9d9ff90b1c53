//! Crate-level error types.

use std::fmt;

/// Errors produced by the swipedeck crate.
///
/// Runtime engine paths never error: boundary conditions (empty item
/// list, out-of-range offsets, missing pressed item) are handled by
/// clamping or background fallback, and activation failure is an
/// ordinary `false` return. Only the configuration I/O surface uses
/// this type.
#[derive(Debug)]
pub enum SwipedeckError {
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for SwipedeckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for SwipedeckError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::OptionsParse(_) => None,
        }
    }
}

impl From<std::io::Error> for SwipedeckError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
