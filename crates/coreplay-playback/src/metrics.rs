//! Per-tick playback metrics.

/// Counters collected during a single scheduler tick.
///
/// Cumulative fields carry over between ticks; the rest describe the most
/// recent tick only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickMetrics {
    /// Events applied by pacing this tick. Manual steps are not counted.
    pub events_applied: usize,
    /// Cursor position after the tick.
    pub position: usize,
    /// Wall-clock time spent in the tick, in microseconds.
    pub tick_us: u64,
    /// Cumulative number of ticks run.
    pub total_ticks: u64,
    /// Cumulative number of control messages handled.
    pub controls_handled: u64,
    /// Cumulative number of frames handed to a sink.
    pub frames_captured: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = TickMetrics::default();
        assert_eq!(m.events_applied, 0);
        assert_eq!(m.position, 0);
        assert_eq!(m.tick_us, 0);
        assert_eq!(m.total_ticks, 0);
        assert_eq!(m.controls_handled, 0);
        assert_eq!(m.frames_captured, 0);
    }
}
