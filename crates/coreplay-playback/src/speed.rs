//! Rate arithmetic: auto-speed, batch sizes, manual speed changes.

/// Slowest rate the scheduler will run at, in events per second.
pub const MIN_RATE: f64 = 0.1;

/// Upper clamp for auto-derived rates.
pub const MAX_AUTO_RATE: f64 = 50_000.0;

/// Upper bound for manual speed-ups.
pub const MAX_MANUAL_RATE: f64 = 1e16;

/// Seconds reserved at the end of a timed playback for the terminal state.
pub const SETTLE_SECONDS: f64 = 3.0;

/// Rate that plays `event_count` events in `target_duration` seconds,
/// leaving `settle_seconds` for the terminal state.
///
/// The playing window is never shorter than one second, and the result is
/// clamped to `[MIN_RATE, MAX_AUTO_RATE]`. Returns `None` for an empty log.
///
/// ```
/// use coreplay_playback::auto_speed;
///
/// let rate = auto_speed(1000, 10.0, 3.0).unwrap();
/// assert!((rate - 142.857).abs() < 1e-3);
/// ```
pub fn auto_speed(event_count: usize, target_duration: f64, settle_seconds: f64) -> Option<f64> {
    if event_count == 0 {
        return None;
    }
    let window = (target_duration - settle_seconds).max(1.0);
    Some((event_count as f64 / window).clamp(MIN_RATE, MAX_AUTO_RATE))
}

/// The configured rate, replaced by [`auto_speed`] when a target is set
/// and the log is not empty.
pub fn effective_rate(
    configured: f64,
    event_count: usize,
    target_duration: Option<f64>,
    settle_seconds: f64,
) -> f64 {
    target_duration
        .and_then(|target| auto_speed(event_count, target, settle_seconds))
        .unwrap_or(configured)
}

/// Events applied per tick in batched mode: `max(1, floor(rate / tick_rate))`.
pub fn events_per_tick(rate: f64, tick_rate: f64) -> usize {
    // Float-to-int casts saturate; NaN maps to 0 and is lifted to 1.
    ((rate / tick_rate).floor() as usize).max(1)
}

/// Double the rate.
pub fn speed_up(rate: f64) -> f64 {
    (rate * 2.0).min(MAX_MANUAL_RATE)
}

/// Halve the rate, never below [`MIN_RATE`].
pub fn speed_down(rate: f64) -> f64 {
    (rate / 2.0).max(MIN_RATE)
}
