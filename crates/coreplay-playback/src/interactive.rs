//! Wall-clock paced playback for a live viewer.

use std::ops::ControlFlow;
use std::time::{Duration, Instant};

use coreplay_replay::{Replay, ReplayView};
use tracing::info;

use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigError, InteractiveConfig};
use crate::control::{CancelToken, Control, ControlReceiver};
use crate::metrics::TickMetrics;
use crate::pacing::{Pacing, PacingPolicy};
use crate::speed::{effective_rate, SETTLE_SECONDS};
use crate::transport::Transport;

/// Interactive scheduler.
///
/// The caller (or [`run`](Self::run)) invokes [`tick`](Self::tick) at
/// roughly `tick_rate_hz`. At rates up to the batch threshold each tick
/// applies at most one event, gated on the [`Clock`]; above it each tick
/// applies `max(1, floor(rate / tick_rate_hz))` events. Playback starts
/// in the playing state and pauses itself at the end.
#[derive(Debug)]
pub struct InteractivePlayer<C: Clock = SystemClock> {
    transport: Transport,
    config: InteractiveConfig,
    clock: C,
}

impl InteractivePlayer<SystemClock> {
    /// Player driven by the system clock.
    pub fn with_system_clock(
        replay: Replay,
        config: InteractiveConfig,
    ) -> Result<Self, ConfigError> {
        Self::new(replay, config, SystemClock::new())
    }
}

impl<C: Clock> InteractivePlayer<C> {
    /// Create a player. A `target_duration` in the config overrides the
    /// configured rate via auto-speed.
    pub fn new(replay: Replay, config: InteractiveConfig, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        let rate = effective_rate(
            config.rate,
            replay.len(),
            config.target_duration,
            SETTLE_SECONDS,
        );
        if let Some(target) = config.target_duration {
            info!(
                target_secs = target,
                events = replay.len(),
                rate,
                "interactive auto-speed"
            );
        }
        let policy = PacingPolicy::Interactive {
            tick_rate_hz: config.tick_rate_hz,
            batch_threshold: config.batch_threshold,
        };
        Ok(Self {
            transport: Transport::new(replay, policy, rate),
            config,
            clock,
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

    /// Token that stops this player at the next tick boundary.
    pub fn cancel_token(&self) -> CancelToken {
        self.transport.cancel.clone()
    }

    /// Whether the player has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.transport.cancel.is_cancelled()
    }

    /// Advance one tick. Does nothing once cancelled.
    pub fn tick(&mut self) -> TickMetrics {
        let now = self.clock.now();
        match self.transport.tick(now) {
            Some(metrics) => metrics.clone(),
            None => self.transport.metrics.clone(),
        }
    }

    /// Apply a control message immediately, outside the tick cycle.
    pub fn handle(&mut self, control: Control) {
        self.transport.handle(control);
    }

    /// Whether automatic advancement is on.
    pub fn is_playing(&self) -> bool {
        self.transport.playing
    }

    /// Current rate in events per second.
    pub fn rate(&self) -> f64 {
        self.transport.rate()
    }

    /// Current pacing.
    pub fn pacing(&self) -> &Pacing {
        self.transport.pacing()
    }

    /// Configuration the player was built with.
    pub fn config(&self) -> &InteractiveConfig {
        &self.config
    }

    /// The underlying replay.
    pub fn replay(&self) -> &Replay {
        &self.transport.replay
    }

    /// Snapshot for rendering. Borrows the player until dropped.
    pub fn view(&self) -> ReplayView<'_> {
        self.transport.replay.view()
    }

    /// Metrics from the most recent tick.
    pub fn metrics(&self) -> &TickMetrics {
        &self.transport.metrics
    }

    /// Consume the player, returning the replay.
    pub fn into_replay(self) -> Replay {
        self.transport.replay
    }

    /// Tick at `tick_rate_hz`, sleeping out each tick's remaining budget,
    /// until cancelled or `frame` breaks. `frame` sees the view after
    /// every tick.
    pub fn run<F>(&mut self, mut frame: F) -> TickMetrics
    where
        F: FnMut(&ReplayView<'_>, &TickMetrics) -> ControlFlow<()>,
    {
        let budget = Duration::from_secs_f64(1.0 / self.config.tick_rate_hz);
        while !self.is_cancelled() {
            let started = Instant::now();
            let metrics = self.tick();
            if frame(&self.view(), &metrics).is_break() {
                break;
            }
            if let Some(remaining) = budget.checked_sub(started.elapsed()) {
                std::thread::sleep(remaining);
            }
        }
        self.transport.metrics.clone()
    }
}
