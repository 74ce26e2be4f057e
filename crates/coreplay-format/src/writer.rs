//! Recording writer.
//!
//! Coreplay only consumes recordings in normal use; [`RecordingWriter`]
//! exists so fixtures, benchmarks and conversion tools can produce
//! byte-exact logs. The header is written immediately on construction,
//! and [`finish`](RecordingWriter::finish) rewrites the declared event
//! count once the total is known, the same way the simulator does at
//! close.

use std::io::{Seek, SeekFrom, Write};

use crate::codec::{encode_event, encode_header};
use crate::error::FormatError;
use crate::types::{Event, RawEvent, RecordHeader};

/// Byte offset of the declared event count within the header.
const TOTAL_EVENTS_OFFSET: u64 = 20;

/// Writes a recording to a byte stream.
pub struct RecordingWriter<W: Write> {
    writer: W,
    events_written: u32,
}

impl<W: Write> RecordingWriter<W> {
    /// Create a writer, immediately writing `header` as given.
    pub fn new(mut writer: W, header: &RecordHeader) -> Result<Self, FormatError> {
        encode_header(&mut writer, header)?;
        Ok(Self {
            writer,
            events_written: 0,
        })
    }

    /// Append a validated event.
    pub fn write_event(&mut self, event: &Event) -> Result<(), FormatError> {
        self.write_raw(&event.to_raw())
    }

    /// Append a record verbatim, valid or not (useful for testing).
    pub fn write_raw(&mut self, event: &RawEvent) -> Result<(), FormatError> {
        encode_event(&mut self.writer, event)?;
        self.events_written = self.events_written.saturating_add(1);
        Ok(())
    }

    /// Append arbitrary bytes, e.g. a torn trailing record.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), FormatError> {
        self.writer.write_all(bytes)?;
        Ok(())
    }

    /// Number of records written so far.
    pub fn events_written(&self) -> u32 {
        self.events_written
    }

    /// Consume the writer without touching the header.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Seek> RecordingWriter<W> {
    /// Patch the declared event count to the number of records written,
    /// flush, and return the sink positioned at its end.
    pub fn finish(mut self) -> Result<W, FormatError> {
        let end = self.writer.stream_position()?;
        self.writer.seek(SeekFrom::Start(TOTAL_EVENTS_OFFSET))?;
        self.writer.write_all(&self.events_written.to_le_bytes())?;
        self.writer.seek(SeekFrom::Start(end))?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}
