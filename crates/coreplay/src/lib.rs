//! Coreplay: replay and export engine for Core War battle recordings.
//!
//! This is the facade crate that re-exports the public API of the Coreplay
//! sub-crates and ships the `coreplay` command-line tool.
//!
//! # Quick start
//!
//! ```rust
//! use std::io::Cursor;
//! use coreplay::prelude::*;
//!
//! let header = RecordHeader::new(8000, "Imp", "Dwarf", 0, 4000);
//! let mut writer = RecordingWriter::new(Cursor::new(Vec::new()), &header).unwrap();
//! writer.write_event(&Event::new(1, 0, EventKind::Execute, WarriorId::FIRST, 0)).unwrap();
//! writer.write_event(&Event::new(1, 0, EventKind::WarriorEliminated, WarriorId::SECOND, 0)).unwrap();
//! let bytes = writer.finish().unwrap().into_inner();
//!
//! let recording = Recording::from_bytes(&bytes).unwrap();
//! let mut replay = Replay::from_recording(recording, ReplayConfig::default()).unwrap();
//! replay.jump_to_end();
//! assert_eq!(replay.resolve(), BattleOutcome::Warrior1Wins);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`format`] | `coreplay-format` | Recording layout, reader, writer, inspection |
//! | [`replay`] | `coreplay-replay` | Arena state, replay session, outcome resolution |
//! | [`playback`] | `coreplay-playback` | Interactive and export schedulers |
//! | [`text`] | this crate | Plain-text frame sink |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Recording format, reader and writer (`coreplay-format`).
pub use coreplay_format as format;

/// Replay state machine and outcome resolution (`coreplay-replay`).
pub use coreplay_replay as replay;

/// Playback scheduling (`coreplay-playback`).
pub use coreplay_playback as playback;

pub mod text;

/// Common imports for typical Coreplay usage.
pub mod prelude {
    // Format
    pub use coreplay_format::{
        Event, EventKind, FormatError, InspectReport, LoadWarning, RecordHeader, Recording,
        RecordingWriter, WarriorId,
    };

    // Replay
    pub use coreplay_replay::{BattleOutcome, Replay, ReplayConfig, ReplayView, Verdict};

    // Playback
    pub use coreplay_playback::{
        CancelToken, Control, ExportConfig, Exporter, FrameSink, InteractiveConfig,
        InteractivePlayer, PlaybackError, TickMetrics,
    };

    pub use crate::text::TextFrameSink;
}
