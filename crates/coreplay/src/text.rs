//! A frame sink that writes one summary line per frame.

use std::io::Write;

use coreplay_format::WarriorId;
use coreplay_playback::{FrameSink, SinkError};
use coreplay_replay::ReplayView;

/// Writes a header line, then one line per frame:
///
/// ```text
/// frame 12: event 60/400 cycle 31 | cells 14/9 | trail 30 | active 22 | undetermined
/// ```
#[derive(Debug)]
pub struct TextFrameSink<W: Write> {
    out: W,
    frames: u64,
}

impl<W: Write> TextFrameSink<W> {
    /// Sink writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out, frames: 0 }
    }

    /// Frames written so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FrameSink for TextFrameSink<W> {
    fn capture(&mut self, view: &ReplayView<'_>) -> Result<(), SinkError> {
        if self.frames == 0 {
            writeln!(
                self.out,
                "# {} vs {} (core {}, {} events)",
                view.header.warrior1_name,
                view.header.warrior2_name,
                view.header.core_size,
                view.total_events
            )?;
        }
        let [first, second] = WarriorId::BOTH.map(|w| view.arena.owned_by(w));
        writeln!(
            self.out,
            "frame {}: event {}/{} cycle {} | cells {}/{} | trail {} | active {} | {}",
            self.frames,
            view.cursor.position(),
            view.total_events,
            view.cursor.cycle(),
            first,
            second,
            view.arena.trail().len(),
            view.arena.activity().len(),
            view.outcome
        )?;
        self.frames += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.out.flush()?;
        Ok(())
    }
}
