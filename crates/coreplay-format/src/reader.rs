//! Recording reader and validator.
//!
//! [`RecordReader`] reads the header on construction and then streams
//! validated events from any `Read` source. Invalid records are skipped
//! and counted; a short tail ends the stream. [`Recording`] drives a
//! reader to completion and keeps everything in memory.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::{debug, info, trace, warn};

use crate::codec::{decode_event, decode_header, read_full};
use crate::error::FormatError;
use crate::types::{Event, RecordDefect, RecordHeader};
use crate::{EVENT_SIZE, HEADER_SIZE};

/// File size implied by a declared event count.
pub fn expected_file_size(total_events: u32) -> u64 {
    HEADER_SIZE as u64 + u64::from(total_events) * EVENT_SIZE as u64
}

// ── Statistics and warnings ─────────────────────────────────────

/// Per-reason counts of dropped records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InvalidCounts {
    /// Records with `address >= core_size`.
    pub address_out_of_range: u64,
    /// Records with a warrior id other than 0 or 1.
    pub bad_warrior: u64,
    /// Records with an unknown event kind.
    pub unknown_kind: u64,
}

impl InvalidCounts {
    fn record(&mut self, defect: &RecordDefect) {
        match defect {
            RecordDefect::AddressOutOfRange { .. } => self.address_out_of_range += 1,
            RecordDefect::InvalidWarrior { .. } => self.bad_warrior += 1,
            RecordDefect::UnknownKind { .. } => self.unknown_kind += 1,
        }
    }

    /// Total dropped records.
    pub fn total(&self) -> u64 {
        self.address_out_of_range + self.bad_warrior + self.unknown_kind
    }
}

/// Integrity statistics gathered while reading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReadStats {
    /// Bytes consumed from the source, header included.
    pub bytes_read: u64,
    /// Valid events delivered.
    pub events_read: u64,
    /// Records dropped, by reason.
    pub invalid: InvalidCounts,
    /// Bytes after the last complete record (0 for a clean end).
    pub trailing_bytes: usize,
}

impl ReadStats {
    /// Complete 16-byte records seen, valid or not.
    pub fn records_seen(&self) -> u64 {
        self.events_read + self.invalid.total()
    }
}

/// A recoverable anomaly found while loading a recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadWarning {
    /// The magic tag is not `PMARSREC`.
    MagicMismatch {
        /// The tag actually found.
        found: [u8; 8],
    },
    /// The header's declared event count differs from the records present.
    EventCountMismatch {
        /// Count from the header.
        declared: u32,
        /// Complete records found in the stream.
        found: u64,
    },
    /// The file size differs from `168 + declared * 16`.
    FileSizeMismatch {
        /// Size implied by the header.
        expected: u64,
        /// Actual size.
        actual: u64,
    },
    /// The stream ended partway through a record.
    TruncatedTail {
        /// Bytes in the incomplete record.
        bytes: usize,
    },
    /// Some records failed validation and were dropped.
    InvalidRecords {
        /// Per-reason counts.
        counts: InvalidCounts,
    },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MagicMismatch { found } => write!(
                f,
                "unexpected magic {:?} (expected \"PMARSREC\")",
                String::from_utf8_lossy(found)
            ),
            Self::EventCountMismatch { declared, found } => {
                write!(f, "header declares {declared} events but {found} records are present")
            }
            Self::FileSizeMismatch { expected, actual } => {
                write!(f, "file size {actual} bytes, header implies {expected}")
            }
            Self::TruncatedTail { bytes } => {
                write!(f, "ignored {bytes} trailing bytes of an incomplete record")
            }
            Self::InvalidRecords { counts } => write!(
                f,
                "dropped {} invalid records ({} bad address, {} bad warrior, {} unknown kind)",
                counts.total(),
                counts.address_out_of_range,
                counts.bad_warrior,
                counts.unknown_kind
            ),
        }
    }
}

// ── RecordReader ────────────────────────────────────────────────

/// Streams validated events from a byte source.
///
/// Generic over `R: Read` so tests can use `&[u8]` and production
/// code can use `BufReader<File>`.
pub struct RecordReader<R: Read> {
    reader: R,
    header: RecordHeader,
    stats: ReadStats,
    warnings: Vec<LoadWarning>,
    done: bool,
}

impl<R: Read> RecordReader<R> {
    /// Read the header.
    ///
    /// Fails only when fewer than 168 bytes are available or the source
    /// errors. A wrong magic tag is recorded as a warning.
    pub fn open(mut reader: R) -> Result<Self, FormatError> {
        let mut buf = [0u8; HEADER_SIZE];
        let found = read_full(&mut reader, &mut buf)?;
        if found < HEADER_SIZE {
            return Err(FormatError::HeaderTooShort { found });
        }
        let header = decode_header(&buf);
        debug!(
            version = header.version,
            core_size = header.core_size,
            declared_events = header.total_events,
            "recording header: {} vs {}",
            header.warrior1_name,
            header.warrior2_name
        );

        let mut this = Self {
            reader,
            stats: ReadStats {
                bytes_read: HEADER_SIZE as u64,
                ..ReadStats::default()
            },
            warnings: Vec::new(),
            done: false,
            header,
        };
        if !this.header.magic_ok() {
            this.warn(LoadWarning::MagicMismatch {
                found: this.header.magic,
            });
        }
        Ok(this)
    }

    /// Parsed header.
    pub fn header(&self) -> &RecordHeader {
        &self.header
    }

    /// Statistics so far.
    pub fn stats(&self) -> &ReadStats {
        &self.stats
    }

    /// Warnings raised so far. Count and tail warnings appear once the
    /// stream is exhausted.
    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    /// Whether the stream has ended.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Read the next valid event, skipping invalid ones.
    ///
    /// Returns `Ok(None)` once the source is exhausted or the remaining
    /// bytes cannot form a full record.
    pub fn next_event(&mut self) -> Result<Option<Event>, FormatError> {
        while !self.done {
            let mut buf = [0u8; EVENT_SIZE];
            let filled = match read_full(&mut self.reader, &mut buf) {
                Ok(n) => n,
                Err(e) => {
                    self.done = true;
                    return Err(e);
                }
            };
            self.stats.bytes_read += filled as u64;
            if filled < EVENT_SIZE {
                self.end_of_stream(filled);
                return Ok(None);
            }

            match decode_event(&buf).validate(self.header.core_size) {
                Ok(event) => {
                    self.stats.events_read += 1;
                    return Ok(Some(event));
                }
                Err(defect) => {
                    trace!(record = self.stats.records_seen(), %defect, "dropping record");
                    self.stats.invalid.record(&defect);
                }
            }
        }
        Ok(None)
    }

    /// Borrowing iterator over the remaining events.
    pub fn events(&mut self) -> Events<'_, R> {
        Events { reader: self }
    }

    /// Consume the reader, returning the header, statistics and warnings.
    pub fn into_parts(self) -> (RecordHeader, ReadStats, Vec<LoadWarning>) {
        (self.header, self.stats, self.warnings)
    }

    fn end_of_stream(&mut self, trailing: usize) {
        self.done = true;
        self.stats.trailing_bytes = trailing;
        if trailing > 0 {
            self.warn(LoadWarning::TruncatedTail { bytes: trailing });
        }
        if self.stats.invalid.total() > 0 {
            self.warn(LoadWarning::InvalidRecords {
                counts: self.stats.invalid,
            });
        }
        let found = self.stats.records_seen();
        if found != u64::from(self.header.total_events) {
            self.warn(LoadWarning::EventCountMismatch {
                declared: self.header.total_events,
                found,
            });
        }
    }

    fn warn(&mut self, warning: LoadWarning) {
        warn!(%warning, "recording anomaly");
        self.warnings.push(warning);
    }
}

/// Iterator adapter over a reader's remaining events.
pub struct Events<'a, R: Read> {
    reader: &'a mut RecordReader<R>,
}

impl<R: Read> Iterator for Events<'_, R> {
    type Item = Result<Event, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next_event().transpose()
    }
}

// ── Recording ───────────────────────────────────────────────────

/// A fully loaded recording: header, valid events, and load report.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
/// use coreplay_format::{Event, EventKind, RecordHeader, Recording, RecordingWriter, WarriorId};
///
/// let header = RecordHeader::new(100, "A", "B", 0, 50);
/// let mut writer = RecordingWriter::new(Cursor::new(Vec::new()), &header).unwrap();
/// writer.write_event(&Event::new(1, 0, EventKind::Execute, WarriorId::FIRST, 0)).unwrap();
/// let bytes = writer.finish().unwrap().into_inner();
///
/// let recording = Recording::from_bytes(&bytes).unwrap();
/// assert_eq!(recording.len(), 1);
/// assert!(recording.warnings().is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct Recording {
    header: RecordHeader,
    events: Vec<Event>,
    stats: ReadStats,
    warnings: Vec<LoadWarning>,
}

impl Recording {
    /// Read a whole recording from a stream.
    pub fn read<R: Read>(reader: R) -> Result<Self, FormatError> {
        let mut reader = RecordReader::open(reader)?;
        let mut events = Vec::with_capacity(reader.header().total_events.min(1 << 20) as usize);
        for event in reader.events() {
            events.push(event?);
        }
        let (header, stats, warnings) = reader.into_parts();
        info!(
            events = stats.events_read,
            invalid = stats.invalid.total(),
            warnings = warnings.len(),
            "loaded recording"
        );
        Ok(Self {
            header,
            events,
            stats,
            warnings,
        })
    }

    /// Read a recording held in memory, checking its size against the header.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        let mut recording = Self::read(bytes)?;
        recording.check_size(bytes.len() as u64);
        Ok(recording)
    }

    /// Read a recording file, checking its size against the header.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FormatError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let actual = file.metadata()?.len();
        debug!(path = %path.display(), bytes = actual, "opening recording");
        let mut recording = Self::read(BufReader::new(file))?;
        recording.check_size(actual);
        Ok(recording)
    }

    fn check_size(&mut self, actual: u64) {
        let expected = self.header.expected_file_size();
        if expected != actual {
            let warning = LoadWarning::FileSizeMismatch { expected, actual };
            warn!(%warning, "recording anomaly");
            self.warnings.push(warning);
        }
    }

    /// The header.
    pub fn header(&self) -> &RecordHeader {
        &self.header
    }

    /// All valid events in log order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of valid events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no valid events were read.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Load statistics.
    pub fn stats(&self) -> &ReadStats {
        &self.stats
    }

    /// Load warnings, in the order they were raised.
    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    /// Consume the recording, keeping the header and events.
    pub fn into_parts(self) -> (RecordHeader, Vec<Event>) {
        (self.header, self.events)
    }
}
