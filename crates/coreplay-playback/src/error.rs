//! Error type for running a scheduler.

use std::fmt;

use crate::sink::SinkError;

/// Errors from running a scheduler. Construction reports
/// [`ConfigError`](crate::ConfigError) directly.
#[derive(Debug)]
pub enum PlaybackError {
    /// The frame sink failed; the export stopped at `frame`.
    Sink {
        /// Index of the frame that could not be captured.
        frame: u64,
        /// Underlying failure.
        source: SinkError,
    },
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sink { frame, source } => write!(f, "frame {frame}: {source}"),
        }
    }
}

impl std::error::Error for PlaybackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Sink { source, .. } => Some(source),
        }
    }
}
