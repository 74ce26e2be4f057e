//! Frame-locked export.
//!
//! Every tick applies `max(1, floor(rate / fps))` events and hands exactly
//! one frame to the sink. Once the last event is applied the terminal
//! state is held for `settle_seconds * fps` further ticks, then the
//! export completes. Export runs as fast as the sink accepts frames; the
//! frame index is the only time base.

use std::path::{Path, PathBuf};
use std::time::Duration;

use coreplay_format::{RecordHeader, WarriorId};
use coreplay_replay::{BattleOutcome, Replay, ReplayView};
use tracing::{debug, info};

use crate::config::{ConfigError, ExportConfig};
use crate::control::{CancelToken, ControlReceiver};
use crate::error::PlaybackError;
use crate::metrics::TickMetrics;
use crate::pacing::{Pacing, PacingPolicy};
use crate::sink::FrameSink;
use crate::speed::effective_rate;
use crate::transport::Transport;

/// Summary of a finished (or cancelled) export.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportReport {
    /// Frames handed to the sink.
    pub frames: u64,
    /// Of those, frames of the held terminal state.
    pub settle_frames: u64,
    /// Rate used, in events per second.
    pub rate: f64,
    /// Events applied per frame.
    pub events_per_frame: usize,
    /// Outcome at the last frame.
    pub outcome: BattleOutcome,
    /// Whether the export stopped early on cancellation.
    pub cancelled: bool,
}

/// Export scheduler.
#[derive(Debug)]
pub struct Exporter {
    transport: Transport,
    config: ExportConfig,
    settle_ticks: u64,
    end_seen: bool,
    settled: u64,
}

impl Exporter {
    /// Create an exporter. A `target_duration` in the config overrides the
    /// configured rate via auto-speed.
    pub fn new(replay: Replay, config: ExportConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rate = effective_rate(
            config.rate,
            replay.len(),
            config.target_duration,
            config.settle_seconds,
        );
        let policy = PacingPolicy::FrameLocked { fps: config.fps };
        let transport = Transport::new(replay, policy, rate);
        if let Some(target) = config.target_duration {
            info!(
                target_secs = target,
                events = transport.replay.len(),
                rate,
                "export auto-speed"
            );
        }
        Ok(Self {
            transport,
            settle_ticks: config.settle_ticks(),
            config,
            end_seen: false,
            settled: 0,
        })
    }

    /// Attach a control channel, drained at the start of every tick.
    pub fn with_control(mut self, control: ControlReceiver) -> Self {
        self.transport.set_control(control);
        self
    }

    /// Share an existing cancel token.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.transport.cancel = cancel;
        self
    }

    /// Token that stops this export at the next tick boundary.
    pub fn cancel_token(&self) -> CancelToken {
        self.transport.cancel.clone()
    }

    /// Rate in events per second.
    pub fn rate(&self) -> f64 {
        self.transport.rate()
    }

    /// Events applied per frame.
    pub fn events_per_frame(&self) -> usize {
        match self.transport.pacing() {
            Pacing::Batched { per_tick } => *per_tick,
            Pacing::Gated { .. } => 1,
        }
    }

    /// Configuration the exporter was built with.
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// The underlying replay.
    pub fn replay(&self) -> &Replay {
        &self.transport.replay
    }

    /// Snapshot of the current state.
    pub fn view(&self) -> ReplayView<'_> {
        self.transport.replay.view()
    }

    /// Metrics from the most recent tick.
    pub fn metrics(&self) -> &TickMetrics {
        &self.transport.metrics
    }

    /// Whether the last event is applied and the settle period is over.
    pub fn is_finished(&self) -> bool {
        self.end_seen && self.settled >= self.settle_ticks
    }

    /// Run one tick and capture its frame.
    ///
    /// Returns `Ok(None)` once finished or cancelled, without capturing.
    pub fn tick<S: FrameSink + ?Sized>(
        &mut self,
        sink: &mut S,
    ) -> Result<Option<TickMetrics>, PlaybackError> {
        if self.is_finished() {
            return Ok(None);
        }
        let frame = Duration::from_secs_f64(
            self.transport.metrics.frames_captured as f64 / f64::from(self.config.fps),
        );
        if self.transport.tick(frame).is_none() {
            return Ok(None);
        }
        if self.transport.replay.is_at_end() {
            if self.end_seen {
                self.settled += 1;
            } else {
                self.end_seen = true;
            }
        } else if self.end_seen {
            // A reset or backward seek left the end; the settle restarts.
            self.end_seen = false;
            self.settled = 0;
        }

        let index = self.transport.metrics.frames_captured;
        sink.capture(&self.transport.replay.view())
            .map_err(|source| PlaybackError::Sink {
                frame: index,
                source,
            })?;
        self.transport.metrics.frames_captured += 1;
        Ok(Some(self.transport.metrics.clone()))
    }

    /// Tick until finished or cancelled, then finish the sink.
    pub fn run<S: FrameSink + ?Sized>(&mut self, sink: &mut S) -> Result<ExportReport, PlaybackError> {
        info!(
            fps = self.config.fps,
            rate = self.rate(),
            events_per_frame = self.events_per_frame(),
            events = self.transport.replay.len(),
            "export started"
        );
        while self.tick(sink)?.is_some() {}

        let frames = self.transport.metrics.frames_captured;
        sink.finish().map_err(|source| PlaybackError::Sink {
            frame: frames,
            source,
        })?;

        let report = ExportReport {
            frames,
            settle_frames: self.settled,
            rate: self.rate(),
            events_per_frame: self.events_per_frame(),
            outcome: self.transport.replay.outcome(),
            cancelled: !self.is_finished(),
        };
        if report.cancelled {
            info!(frames, position = self.transport.replay.position(), "export cancelled");
        } else {
            info!(frames, outcome = %report.outcome, "export complete");
        }
        debug!(?report, "export report");
        Ok(report)
    }
}

/// Default output path for an export of `recording`:
/// `<dir>/<stem>_<name1>_vs_<name2>.frames`, or `<dir>/<stem>_battle.frames`
/// when both names are empty.
pub fn default_export_name(recording: &Path, header: &RecordHeader) -> PathBuf {
    let stem = recording
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "recording".to_owned());
    let [first, second] = WarriorId::BOTH.map(|w| sanitize(header.name(w)));
    let file = if first.is_empty() && second.is_empty() {
        format!("{stem}_battle.frames")
    } else {
        format!("{stem}_{first}_vs_{second}.frames")
    };
    recording.with_file_name(file)
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{control_channel, Control};
    use crate::sink::{NullSink, SinkError};
    use coreplay_format::{Event, EventKind};
    use coreplay_replay::ReplayConfig;

    fn replay(n: u32, names: (&str, &str)) -> Replay {
        let header = RecordHeader::new(100, names.0, names.1, 0, 50);
        let events = (0..n)
            .map(|i| Event::new(i, 1, EventKind::Execute, WarriorId::SECOND, 0))
            .collect();
        Replay::new(header, events, ReplayConfig::default()).unwrap()
    }

    struct Counting(u64);

    impl FrameSink for Counting {
        fn capture(&mut self, _view: &ReplayView<'_>) -> Result<(), SinkError> {
            self.0 += 1;
            Ok(())
        }
    }

    struct FailAt(u64, u64);

    impl FrameSink for FailAt {
        fn capture(&mut self, _view: &ReplayView<'_>) -> Result<(), SinkError> {
            if self.0 == self.1 {
                return Err(SinkError::Rejected {
                    reason: "disk full".into(),
                });
            }
            self.0 += 1;
            Ok(())
        }
    }

    #[test]
    fn frame_count_is_play_plus_settle() {
        let mut exporter = Exporter::new(replay(10, ("a", "b")), ExportConfig::default()).unwrap();
        let mut sink = Counting(0);
        let report = exporter.run(&mut sink).unwrap();

        assert_eq!(report.events_per_frame, 1);
        assert_eq!(report.frames, 10 + 90);
        assert_eq!(report.settle_frames, 90);
        assert_eq!(sink.0, 100);
        assert_eq!(report.outcome, BattleOutcome::Warrior2Wins);
        assert!(!report.cancelled);
        assert!(exporter.tick(&mut sink).unwrap().is_none());
    }

    #[test]
    fn empty_log_still_exports_terminal_frames() {
        let cfg = ExportConfig {
            settle_seconds: 1.0,
            fps: 10,
            ..ExportConfig::default()
        };
        let report = Exporter::new(replay(0, ("a", "b")), cfg)
            .unwrap()
            .run(&mut NullSink)
            .unwrap();
        assert_eq!(report.frames, 11);
        assert_eq!(report.outcome, BattleOutcome::Draw);
    }

    #[test]
    fn reset_during_settle_restarts_settle() {
        let (handle, rx) = control_channel(4);
        let mut exporter = Exporter::new(replay(10, ("a", "b")), ExportConfig::default())
            .unwrap()
            .with_control(rx);
        let mut sink = Counting(0);
        for _ in 0..20 {
            exporter.tick(&mut sink).unwrap();
        }
        assert!(exporter.replay().is_at_end());

        handle.send(Control::Reset).unwrap();
        handle.send(Control::Play).unwrap();
        let m = exporter.tick(&mut sink).unwrap().unwrap();
        assert_eq!(m.position, 1);
        assert!(!exporter.is_finished());

        let report = exporter.run(&mut sink).unwrap();
        assert_eq!(report.settle_frames, 90);
        assert_eq!(report.frames, 20 + 10 + 90);
        assert!(!report.cancelled);
    }

    #[test]
    fn cancellation_stops_between_frames() {
        let mut exporter = Exporter::new(replay(50, ("a", "b")), ExportConfig::default()).unwrap();
        let cancel = exporter.cancel_token();
        let mut sink = Counting(0);
        for _ in 0..5 {
            exporter.tick(&mut sink).unwrap();
        }
        cancel.cancel();
        let report = exporter.run(&mut sink).unwrap();
        assert!(report.cancelled);
        assert_eq!(report.frames, 5);
        assert_eq!(exporter.replay().position(), 5);
    }

    #[test]
    fn sink_failure_reports_frame_index() {
        let mut exporter = Exporter::new(replay(10, ("a", "b")), ExportConfig::default()).unwrap();
        match exporter.run(&mut FailAt(0, 3)) {
            Err(PlaybackError::Sink { frame, .. }) => assert_eq!(frame, 3),
            other => panic!("expected sink error, got {other:?}"),
        }
    }

    #[test]
    fn auto_speed_uses_settle_period() {
        let cfg = ExportConfig {
            target_duration: Some(13.0),
            ..ExportConfig::default()
        };
        let exporter = Exporter::new(replay(3000, ("a", "b")), cfg).unwrap();
        assert_eq!(exporter.rate(), 300.0);
        assert_eq!(exporter.events_per_frame(), 10);
    }

    #[test]
    fn default_name_sanitizes_warriors() {
        let r = replay(0, ("Mice v2", "a/b"));
        let path = default_export_name(Path::new("out/battle.rec"), r.header());
        assert_eq!(path, PathBuf::from("out/battle_Mice_v2_vs_a_b.frames"));

        let r = replay(0, ("", ""));
        let path = default_export_name(Path::new("x.rec"), r.header());
        assert_eq!(path, PathBuf::from("x_battle.frames"));
    }
}
