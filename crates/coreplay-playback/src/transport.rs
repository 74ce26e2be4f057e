//! State shared by both schedulers: the replay, play/pause, rate,
//! pacing, control intake and cancellation.

use std::time::{Duration, Instant};

use coreplay_replay::Replay;
use tracing::debug;

use crate::control::{CancelToken, Control, ControlReceiver};
use crate::metrics::TickMetrics;
use crate::pacing::{Pacing, PacingPolicy};
use crate::speed::{speed_down, speed_up, MAX_MANUAL_RATE, MIN_RATE};

#[derive(Debug)]
pub(crate) struct Transport {
    pub(crate) replay: Replay,
    policy: PacingPolicy,
    rate: f64,
    pacing: Pacing,
    pub(crate) playing: bool,
    control: Option<ControlReceiver>,
    pub(crate) cancel: CancelToken,
    pub(crate) metrics: TickMetrics,
}

impl Transport {
    pub(crate) fn new(replay: Replay, policy: PacingPolicy, rate: f64) -> Self {
        Self {
            replay,
            policy,
            rate,
            pacing: policy.pacing(rate),
            playing: true,
            control: None,
            cancel: CancelToken::new(),
            metrics: TickMetrics::default(),
        }
    }

    pub(crate) fn set_control(&mut self, control: ControlReceiver) {
        self.control = Some(control);
    }

    pub(crate) fn rate(&self) -> f64 {
        self.rate
    }

    pub(crate) fn pacing(&self) -> &Pacing {
        &self.pacing
    }

    /// Non-positive and non-finite rates are ignored; others are clamped
    /// to `[MIN_RATE, MAX_MANUAL_RATE]`.
    pub(crate) fn set_rate(&mut self, rate: f64) {
        if !(rate.is_finite() && rate > 0.0) {
            debug!(rate, "ignoring invalid rate");
            return;
        }
        self.rate = rate.clamp(MIN_RATE, MAX_MANUAL_RATE);
        self.pacing = self.policy.pacing(rate);
        debug!(rate = self.rate, pacing = ?self.pacing, "rate changed");
    }

    pub(crate) fn handle(&mut self, control: Control) {
        match control {
            Control::Play => self.playing = true,
            Control::Pause => self.playing = false,
            Control::TogglePlay => self.playing = !self.playing,
            Control::StepForward => {
                self.replay.step_forward();
            }
            Control::StepBack => {
                self.replay.step_back();
            }
            Control::Reset => self.replay.reset(),
            Control::JumpToEnd => {
                self.replay.jump_to_end();
            }
            Control::Seek(target) => self.replay.seek(target),
            Control::SpeedUp => self.set_rate(speed_up(self.rate)),
            Control::SpeedDown => self.set_rate(speed_down(self.rate)),
            Control::SetRate(rate) => self.set_rate(rate),
        }
        self.metrics.controls_handled += 1;
    }

    /// One tick: drain controls, apply due events, resolve at the end,
    /// decay. Returns `None` without touching state once cancelled.
    pub(crate) fn tick(&mut self, now: Duration) -> Option<&TickMetrics> {
        if self.cancel.is_cancelled() {
            return None;
        }
        let started = Instant::now();

        if let Some(rx) = &self.control {
            for control in rx.drain() {
                self.handle(control);
            }
        }

        let mut applied = 0;
        if self.playing {
            let due = self.pacing.due(now);
            applied = self.replay.advance(due);
            if self.replay.is_at_end() {
                self.playing = false;
            }
        }

        if self.replay.is_at_end() {
            self.replay.resolve();
        }
        self.replay.decay();

        self.metrics.events_applied = applied;
        self.metrics.position = self.replay.position();
        self.metrics.total_ticks += 1;
        self.metrics.tick_us = started.elapsed().as_micros() as u64;
        Some(&self.metrics)
    }
}
