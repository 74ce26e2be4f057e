//! Binary recording format, reader and validator for Coreplay.
//!
//! A recording is the event log written by a pMARS build with
//! visualization recording enabled. It is append-only and fixed-layout:
//!
//! ```text
//! [Header: 168 bytes] [Event 0: 16 bytes] [Event 1: 16 bytes] ... [Event N-1]
//! ```
//!
//! All integers are little-endian.
//!
//! # Architecture
//!
//! - [`RecordReader`] streams validated events from any `Read` source
//! - [`Recording`] materializes a whole log plus its load statistics
//! - [`RecordingWriter`] encodes logs (fixtures and tooling only)
//! - [`InspectReport`] summarizes a loaded recording
//!
//! Malformed records never abort a read. They are dropped, counted in
//! [`ReadStats`], and surfaced as [`LoadWarning`]s. The only fatal
//! condition is a header shorter than [`HEADER_SIZE`] bytes.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod inspect;
pub mod reader;
pub mod types;
pub mod writer;

pub use error::FormatError;
pub use inspect::InspectReport;
pub use reader::{
    expected_file_size, Events, InvalidCounts, LoadWarning, ReadStats, RecordReader, Recording,
};
pub use types::{Event, EventKind, RawEvent, RecordDefect, RecordHeader, WarriorId};
pub use writer::RecordingWriter;

/// Magic tag at the start of every recording.
pub const MAGIC: [u8; 8] = *b"PMARSREC";

/// Format version written by this crate.
///
/// Readers accept any version; the layout has not changed since v1.
pub const FORMAT_VERSION: u32 = 1;

/// Size of the fixed header in bytes.
pub const HEADER_SIZE: usize = 168;

/// Size of one event record in bytes.
pub const EVENT_SIZE: usize = 16;

/// Size of each NUL-padded warrior name field in the header.
pub const NAME_SIZE: usize = 64;
