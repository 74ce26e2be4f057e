//! Error types for reading and writing recordings.

use std::fmt;
use std::io;

/// Fatal errors that prevent a recording from being loaded or written.
///
/// Everything recoverable (bad magic, count mismatches, malformed
/// records) is reported through [`LoadWarning`](crate::LoadWarning)
/// instead.
#[derive(Debug)]
pub enum FormatError {
    /// An I/O error occurred during read or write.
    Io(io::Error),
    /// Fewer than [`HEADER_SIZE`](crate::HEADER_SIZE) bytes were available.
    HeaderTooShort {
        /// Number of bytes actually available.
        found: usize,
    },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::HeaderTooShort { found } => write!(
                f,
                "recording header too short: got {found} of {} bytes",
                crate::HEADER_SIZE
            ),
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FormatError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn header_too_short_message_names_both_sizes() {
        let msg = FormatError::HeaderTooShort { found: 12 }.to_string();
        assert!(msg.contains("12"));
        assert!(msg.contains("168"));
    }

    #[test]
    fn io_error_exposes_source() {
        let err = FormatError::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(err.source().is_some());
        assert!(FormatError::HeaderTooShort { found: 0 }.source().is_none());
    }
}
