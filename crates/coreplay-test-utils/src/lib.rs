//! Test fixtures for Coreplay development.
//!
//! - [`RecordingBuilder`]: byte-exact recordings, including malformed ones
//! - [`random_events`]: seeded, reproducible event streams
//! - [`ManualClock`]: a [`Clock`] that only moves when told to
//! - [`CollectingSink`]: a [`FrameSink`] that keeps a summary of every frame

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{random_events, RandomEvents};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use coreplay_format::{Event, RawEvent, RecordHeader, Recording, RecordingWriter, WarriorId};
use coreplay_playback::{Clock, FrameSink, SinkError};
use coreplay_replay::{BattleOutcome, ReplayView};

/// Builds recordings byte by byte.
///
/// The declared event count defaults to the number of records added;
/// override it with [`declared`](Self::declared) to produce mismatches.
#[derive(Clone, Debug)]
pub struct RecordingBuilder {
    header: RecordHeader,
    records: Vec<RawEvent>,
    trailing: Vec<u8>,
    declared: Option<u32>,
}

impl RecordingBuilder {
    /// Two warriors, "Imp" at 0 and "Dwarf" at `core_size / 2`.
    pub fn new(core_size: u32) -> Self {
        Self {
            header: RecordHeader::new(core_size, "Imp", "Dwarf", 0, core_size / 2),
            records: Vec::new(),
            trailing: Vec::new(),
            declared: None,
        }
    }

    pub fn names(mut self, first: &str, second: &str) -> Self {
        self.header.warrior1_name = first.to_owned();
        self.header.warrior2_name = second.to_owned();
        self
    }

    pub fn starts(mut self, first: u32, second: u32) -> Self {
        self.header.warrior1_start = first;
        self.header.warrior2_start = second;
        self
    }

    pub fn total_cycles(mut self, cycles: u32) -> Self {
        self.header.total_cycles = cycles;
        self
    }

    pub fn magic(mut self, magic: [u8; 8]) -> Self {
        self.header.magic = magic;
        self
    }

    pub fn event(mut self, event: Event) -> Self {
        self.records.push(event.to_raw());
        self
    }

    pub fn events(mut self, events: impl IntoIterator<Item = Event>) -> Self {
        self.records.extend(events.into_iter().map(|e| e.to_raw()));
        self
    }

    /// Append a record verbatim, valid or not.
    pub fn raw(mut self, raw: RawEvent) -> Self {
        self.records.push(raw);
        self
    }

    /// Bytes appended after the last record.
    pub fn trailing(mut self, bytes: &[u8]) -> Self {
        self.trailing.extend_from_slice(bytes);
        self
    }

    /// Override the declared event count.
    pub fn declared(mut self, count: u32) -> Self {
        self.declared = Some(count);
        self
    }

    /// Header as it will be written.
    pub fn header(&self) -> RecordHeader {
        let mut header = self.header.clone();
        header.total_events = self
            .declared
            .unwrap_or(self.records.len() as u32);
        header
    }

    /// Encoded recording. Writing into a `Vec` cannot fail.
    pub fn bytes(&self) -> Vec<u8> {
        let mut writer =
            RecordingWriter::new(Vec::new(), &self.header()).expect("in-memory write");
        for raw in &self.records {
            writer.write_raw(raw).expect("in-memory write");
        }
        writer.write_bytes(&self.trailing).expect("in-memory write");
        writer.into_inner()
    }

    /// Encode and load back through the reader.
    pub fn recording(&self) -> Recording {
        Recording::from_bytes(&self.bytes()).expect("builder output has a full header")
    }
}

/// A [`Clock`] advanced by hand. Clones share the same reading.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.nanos
            .fetch_add(by.as_nanos() as u64, Ordering::SeqCst);
    }

    pub fn set(&self, at: Duration) {
        self.nanos.store(at.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

/// What a [`CollectingSink`] keeps from each frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSummary {
    pub position: usize,
    pub cycle: u32,
    pub owned: [usize; 2],
    pub trail_len: usize,
    pub activity_len: usize,
    pub outcome: BattleOutcome,
}

impl FrameSummary {
    pub fn of(view: &ReplayView<'_>) -> Self {
        Self {
            position: view.cursor.position(),
            cycle: view.cursor.cycle(),
            owned: WarriorId::BOTH.map(|w| view.arena.owned_by(w)),
            trail_len: view.arena.trail().len(),
            activity_len: view.arena.activity().len(),
            outcome: view.outcome,
        }
    }
}

/// Sink that records a [`FrameSummary`] per frame and can be told to
/// fail on a given frame.
#[derive(Clone, Debug, Default)]
pub struct CollectingSink {
    pub frames: Vec<FrameSummary>,
    pub finished: bool,
    fail_at: Option<usize>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the frame with this index.
    pub fn failing_at(frame: usize) -> Self {
        Self {
            fail_at: Some(frame),
            ..Self::default()
        }
    }
}

impl FrameSink for CollectingSink {
    fn capture(&mut self, view: &ReplayView<'_>) -> Result<(), SinkError> {
        if self.fail_at == Some(self.frames.len()) {
            return Err(SinkError::Rejected {
                reason: format!("frame {} rejected by fixture", self.frames.len()),
            });
        }
        self.frames.push(FrameSummary::of(view));
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.finished = true;
        Ok(())
    }
}
