//! How many events are due on a tick.
//!
//! A [`PacingPolicy`] is fixed for the lifetime of a scheduler; it turns
//! the current rate into a [`Pacing`], which is rebuilt whenever the rate
//! changes.

use std::time::Duration;

use crate::speed::events_per_tick;

/// Per-tick event budget.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Pacing {
    /// One event whenever at least `interval` has passed since the last
    /// one was due.
    Gated {
        /// Minimum time between events (`1 / rate`).
        interval: Duration,
        /// Clock reading when the last event was due.
        last: Option<Duration>,
    },
    /// A fixed number of events every tick.
    Batched {
        /// Events per tick.
        per_tick: usize,
    },
}

impl Pacing {
    /// Events due at clock reading `now`.
    pub fn due(&mut self, now: Duration) -> usize {
        match self {
            Self::Gated { interval, last } => match last {
                Some(t) if now.saturating_sub(*t) < *interval => 0,
                _ => {
                    *last = Some(now);
                    1
                }
            },
            Self::Batched { per_tick } => *per_tick,
        }
    }
}

/// Scheduler-specific mapping from rate to [`Pacing`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PacingPolicy {
    /// Wall-clock gating up to `batch_threshold`, batches above it.
    Interactive {
        /// Ticks per second.
        tick_rate_hz: f64,
        /// Highest gated rate.
        batch_threshold: f64,
    },
    /// Always batched, one tick per frame.
    FrameLocked {
        /// Frames per second.
        fps: u32,
    },
}

impl PacingPolicy {
    /// Pacing for `rate` events per second. A rate so low that its
    /// interval overflows a `Duration` never releases an event.
    pub fn pacing(&self, rate: f64) -> Pacing {
        match *self {
            Self::Interactive {
                tick_rate_hz,
                batch_threshold,
            } => {
                if rate <= batch_threshold {
                    Pacing::Gated {
                        interval: Duration::try_from_secs_f64(1.0 / rate)
                            .unwrap_or(Duration::MAX),
                        last: None,
                    }
                } else {
                    Pacing::Batched {
                        per_tick: events_per_tick(rate, tick_rate_hz),
                    }
                }
            }
            Self::FrameLocked { fps } => Pacing::Batched {
                per_tick: events_per_tick(rate, f64::from(fps)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERACTIVE: PacingPolicy = PacingPolicy::Interactive {
        tick_rate_hz: 60.0,
        batch_threshold: 1000.0,
    };

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn gated_releases_one_event_per_interval() {
        let mut p = INTERACTIVE.pacing(10.0);
        assert_eq!(p.due(ms(0)), 1);
        assert_eq!(p.due(ms(50)), 0);
        assert_eq!(p.due(ms(99)), 0);
        assert_eq!(p.due(ms(100)), 1);
        // Long stall still yields a single event.
        assert_eq!(p.due(ms(5000)), 1);
    }

    #[test]
    fn threshold_is_inclusive_for_gating() {
        assert!(matches!(INTERACTIVE.pacing(1000.0), Pacing::Gated { .. }));
        assert_eq!(
            INTERACTIVE.pacing(1200.0),
            Pacing::Batched { per_tick: 20 }
        );
    }

    #[test]
    fn vanishing_rate_saturates_interval() {
        let mut p = INTERACTIVE.pacing(1e-20);
        assert_eq!(
            p,
            Pacing::Gated {
                interval: Duration::MAX,
                last: None
            }
        );
        assert_eq!(p.due(ms(0)), 1);
        assert_eq!(p.due(Duration::from_secs(1 << 40)), 0);
    }

    #[test]
    fn frame_locked_batches() {
        let policy = PacingPolicy::FrameLocked { fps: 30 };
        let mut p = policy.pacing(50.0);
        assert_eq!(p.due(ms(0)), 1);
        assert_eq!(policy.pacing(300.0), Pacing::Batched { per_tick: 10 });
    }
}
