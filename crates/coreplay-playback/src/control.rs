//! Control messages and cancellation.
//!
//! A UI or another thread talks to a scheduler through a
//! [`ControlHandle`]; the scheduler drains its [`ControlReceiver`] at the
//! start of every tick. The channel is bounded, so a stalled scheduler
//! pushes back on senders instead of queueing without limit.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, TrySendError};

/// Default control channel capacity.
pub const DEFAULT_CONTROL_CAPACITY: usize = 64;

/// A playback command.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Control {
    /// Resume automatic advancement.
    Play,
    /// Stop automatic advancement.
    Pause,
    /// Toggle between playing and paused.
    TogglePlay,
    /// Apply one event.
    StepForward,
    /// Go back one event.
    StepBack,
    /// Return to the start.
    Reset,
    /// Apply every remaining event.
    JumpToEnd,
    /// Move the cursor to an event index.
    Seek(usize),
    /// Double the rate.
    SpeedUp,
    /// Halve the rate.
    SpeedDown,
    /// Set the rate in events per second. Non-positive values are ignored.
    SetRate(f64),
}

/// Sending side of the control channel. Cheap to clone.
#[derive(Clone, Debug)]
pub struct ControlHandle {
    tx: Sender<Control>,
}

impl ControlHandle {
    /// Queue a command without blocking.
    pub fn send(&self, control: Control) -> Result<(), ControlError> {
        self.tx.try_send(control).map_err(|e| match e {
            TrySendError::Full(_) => ControlError::Full,
            TrySendError::Disconnected(_) => ControlError::Disconnected,
        })
    }
}

/// Receiving side of the control channel, owned by a scheduler.
#[derive(Debug)]
pub struct ControlReceiver {
    rx: Receiver<Control>,
}

impl ControlReceiver {
    /// Take every queued command.
    pub fn drain(&self) -> Vec<Control> {
        self.rx.try_iter().collect()
    }
}

/// Create a bounded control channel.
pub fn control_channel(capacity: usize) -> (ControlHandle, ControlReceiver) {
    let (tx, rx) = crossbeam_channel::bounded(capacity);
    (ControlHandle { tx }, ControlReceiver { rx })
}

/// Why a control message was not queued.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlError {
    /// The channel is at capacity.
    Full,
    /// The scheduler has been dropped.
    Disconnected,
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "control channel full"),
            Self::Disconnected => write!(f, "scheduler is gone"),
        }
    }
}

impl std::error::Error for ControlError {}

/// Shared cancellation flag, checked at tick boundaries.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// A token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
