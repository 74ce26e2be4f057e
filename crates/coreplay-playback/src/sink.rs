//! Frame sinks for export.

use std::fmt;
use std::io;

use coreplay_replay::ReplayView;

/// Consumer of exported frames.
///
/// [`capture`](Self::capture) is called exactly once per export tick,
/// after the tick's events are applied and markers decayed. The view
/// borrows the scheduler, so a sink must copy whatever it keeps.
pub trait FrameSink {
    /// Record one frame.
    fn capture(&mut self, view: &ReplayView<'_>) -> Result<(), SinkError>;

    /// Called once after the last frame. Flush and close here.
    fn finish(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn capture(&mut self, view: &ReplayView<'_>) -> Result<(), SinkError> {
        (**self).capture(view)
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        (**self).finish()
    }
}

/// Sink that discards every frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn capture(&mut self, _view: &ReplayView<'_>) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Failure reported by a [`FrameSink`].
#[derive(Debug)]
pub enum SinkError {
    /// Writing the frame failed.
    Io(io::Error),
    /// The sink refused the frame.
    Rejected {
        /// Why.
        reason: String,
    },
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "frame sink I/O error: {e}"),
            Self::Rejected { reason } => write!(f, "frame rejected: {reason}"),
        }
    }
}

impl std::error::Error for SinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Rejected { .. } => None,
        }
    }
}

impl From<io::Error> for SinkError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
