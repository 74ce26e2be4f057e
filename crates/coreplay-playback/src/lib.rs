//! Playback scheduling for Coreplay.
//!
//! Drives a [`Replay`](coreplay_replay::Replay) under one of two time
//! disciplines:
//!
//! - [`InteractivePlayer`]: wall-clock paced, controllable (play/pause,
//!   stepping, seeking, speed changes), pauses itself at the end
//! - [`Exporter`]: frame-locked, hands exactly one frame per tick to a
//!   [`FrameSink`], then holds the terminal state for a settle period
//!
//! Both share the same per-tick order: drain control messages, apply the
//! events that are due, resolve if at the end, decay markers, and (export
//! only) capture a frame. Control messages from other threads arrive over
//! a bounded channel ([`control_channel`]); cancellation is a shared
//! atomic flag ([`CancelToken`]) checked at every tick boundary.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod clock;
pub mod config;
pub mod control;
pub mod error;
pub mod export;
pub mod interactive;
pub mod metrics;
pub mod pacing;
pub mod sink;
pub mod speed;

mod transport;

pub use clock::{Clock, SystemClock};
pub use config::{ConfigError, ExportConfig, InteractiveConfig};
pub use control::{
    control_channel, CancelToken, Control, ControlError, ControlHandle, ControlReceiver,
    DEFAULT_CONTROL_CAPACITY,
};
pub use error::PlaybackError;
pub use export::{default_export_name, ExportReport, Exporter};
pub use interactive::InteractivePlayer;
pub use metrics::TickMetrics;
pub use pacing::{Pacing, PacingPolicy};
pub use sink::{FrameSink, NullSink, SinkError};
pub use speed::{auto_speed, effective_rate, events_per_tick, speed_down, speed_up};
