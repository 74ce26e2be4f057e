//! Replay state machine and outcome resolution for Coreplay.
//!
//! Rebuilds a picture of the arena from a recording's event stream, one
//! event at a time, and decides who won once the stream is exhausted.
//!
//! # Architecture
//!
//! - [`ArenaState`] holds derived state: cell ownership, the execution
//!   trail, and decaying activity markers
//! - [`ReplayState`] is the pure transition core: `apply`, `reset`, `decay`
//! - [`resolve`] / [`judge`] decide the outcome from terminal state
//! - [`Replay`] binds a recording to a state and owns cursor movement
//!   (forward, backward, seek, jump to end)
//! - [`ReplayView`] is the read-only snapshot handed to renderers
//!
//! Nothing here knows about time. Pacing lives in `coreplay-playback`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod config;
pub mod outcome;
pub mod session;
pub mod state;

pub use arena::{Access, Activity, ActivityMark, ArenaState, Ownership, TrailMark};
pub use config::{ConfigError, ReplayConfig};
pub use outcome::{judge, resolve, BattleOutcome, Verdict, VerdictBasis};
pub use session::{Replay, ReplayView};
pub use state::{ReplayCursor, ReplayState};
