//! A recording bound to replay state.
//!
//! [`Replay`] owns the validated event list and is the only place the
//! cursor moves. Forward movement applies events; backward movement
//! resets and re-applies from the start, so the arena always matches the
//! cursor. That costs O(n) per backward step, which is fine for logs
//! that fit in memory.

use coreplay_format::{Event, RecordHeader, Recording};
use tracing::{debug, info};

use crate::arena::ArenaState;
use crate::config::{ConfigError, ReplayConfig};
use crate::outcome::{judge, BattleOutcome, Verdict};
use crate::state::{ReplayCursor, ReplayState};

/// Read-only snapshot of replay state for renderers and frame sinks.
///
/// Borrows the [`Replay`], so it cannot outlive the tick that produced
/// it and cannot coexist with a mutation.
#[derive(Clone, Copy, Debug)]
pub struct ReplayView<'a> {
    /// Recording header (names, start positions, core size).
    pub header: &'a RecordHeader,
    /// Derived arena state.
    pub arena: &'a ArenaState,
    /// Cursor: position, cycle, eliminations.
    pub cursor: &'a ReplayCursor,
    /// Total number of events in the recording.
    pub total_events: usize,
    /// Outcome, once the cursor has reached the end and it was resolved.
    pub outcome: BattleOutcome,
}

impl ReplayView<'_> {
    /// Fraction of events applied, in `[0, 1]`. An empty log is complete.
    pub fn progress(&self) -> f64 {
        if self.total_events == 0 {
            1.0
        } else {
            self.cursor.position() as f64 / self.total_events as f64
        }
    }
}

/// Replay session over one recording.
#[derive(Clone, Debug)]
pub struct Replay {
    header: RecordHeader,
    events: Vec<Event>,
    state: ReplayState,
    verdict: Option<Verdict>,
}

impl Replay {
    /// Bind events to a fresh state seeded from the header's start positions.
    pub fn new(
        header: RecordHeader,
        events: Vec<Event>,
        config: ReplayConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = ReplayState::new(config, [header.warrior1_start, header.warrior2_start]);
        Ok(Self {
            header,
            events,
            state,
            verdict: None,
        })
    }

    /// Consume a loaded recording.
    pub fn from_recording(recording: Recording, config: ReplayConfig) -> Result<Self, ConfigError> {
        let (header, events) = recording.into_parts();
        Self::new(header, events, config)
    }

    /// Recording header.
    pub fn header(&self) -> &RecordHeader {
        &self.header
    }

    /// All events.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the recording has no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Index of the next event to apply.
    pub fn position(&self) -> usize {
        self.state.cursor().position()
    }

    /// Whether every event has been applied.
    pub fn is_at_end(&self) -> bool {
        self.position() >= self.events.len()
    }

    /// Current state.
    pub fn state(&self) -> &ReplayState {
        &self.state
    }

    /// Apply the next event. Returns `false` (and does nothing) at the end.
    pub fn step_forward(&mut self) -> bool {
        match self.events.get(self.position()) {
            Some(event) => {
                self.state.apply(event);
                true
            }
            None => false,
        }
    }

    /// Apply up to `n` events. Returns how many were applied.
    pub fn advance(&mut self, n: usize) -> usize {
        let mut applied = 0;
        while applied < n && self.step_forward() {
            applied += 1;
        }
        applied
    }

    /// Move back one event, rebuilding state. Returns `false` at the start.
    pub fn step_back(&mut self) -> bool {
        match self.position().checked_sub(1) {
            Some(target) => {
                self.seek(target);
                true
            }
            None => false,
        }
    }

    /// Move the cursor to `target` (clamped to the event count).
    ///
    /// Seeking backward resets and replays from the start; decay is not
    /// replayed, so markers for the most recent events come back fresh.
    pub fn seek(&mut self, target: usize) {
        let target = target.min(self.events.len());
        if target < self.position() {
            debug!(from = self.position(), to = target, "rebuilding replay state");
            self.reset();
        }
        let remaining = target - self.position();
        self.advance(remaining);
    }

    /// Apply every remaining event. Returns how many were applied.
    pub fn jump_to_end(&mut self) -> usize {
        let remaining = self.events.len() - self.position();
        self.advance(remaining)
    }

    /// Back to the start: derived state cleared, start positions seeded,
    /// outcome forgotten.
    pub fn reset(&mut self) {
        self.state.reset();
        self.verdict = None;
    }

    /// Fade activity markers by one tick.
    pub fn decay(&mut self) {
        self.state.decay();
    }

    /// Resolve the outcome if the cursor is at the end.
    ///
    /// The first decided verdict is cached and returned unchanged until
    /// the next reset.
    pub fn resolve(&mut self) -> BattleOutcome {
        if let Some(verdict) = &self.verdict {
            return verdict.outcome;
        }
        let verdict = judge(self.state.cursor(), &self.events);
        if verdict.outcome.is_decided() {
            info!(
                outcome = %verdict.outcome,
                basis = ?verdict.basis,
                cycle = self.state.cursor().cycle(),
                "battle resolved"
            );
            self.verdict = Some(verdict);
        }
        verdict.outcome
    }

    /// The cached verdict, if the battle has been resolved.
    pub fn verdict(&self) -> Option<&Verdict> {
        self.verdict.as_ref()
    }

    /// Cached outcome, or `Undetermined`.
    pub fn outcome(&self) -> BattleOutcome {
        self.verdict
            .map_or(BattleOutcome::Undetermined, |v| v.outcome)
    }

    /// Read-only snapshot for rendering.
    pub fn view(&self) -> ReplayView<'_> {
        ReplayView {
            header: &self.header,
            arena: self.state.arena(),
            cursor: self.state.cursor(),
            total_events: self.events.len(),
            outcome: self.outcome(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coreplay_format::{EventKind, WarriorId};

    const W0: WarriorId = WarriorId::FIRST;
    const W1: WarriorId = WarriorId::SECOND;

    fn replay(events: Vec<Event>) -> Replay {
        let header = RecordHeader::new(100, "Imp", "Dwarf", 0, 50);
        Replay::new(header, events, ReplayConfig::default()).unwrap()
    }

    fn events() -> Vec<Event> {
        vec![
            Event::new(1, 0, EventKind::CycleBoundary, W0, 1),
            Event::new(1, 1, EventKind::Execute, W0, 0),
            Event::new(1, 2, EventKind::Write, W0, 0),
            Event::new(2, 51, EventKind::Execute, W1, 0),
            Event::new(2, 0, EventKind::WarriorEliminated, W1, 0),
        ]
    }

    #[test]
    fn rejects_invalid_config() {
        let header = RecordHeader::new(100, "a", "b", 0, 50);
        let cfg = ReplayConfig {
            trail_capacity: 0,
            ..ReplayConfig::default()
        };
        assert!(Replay::new(header, vec![], cfg).is_err());
    }

    #[test]
    fn step_forward_stops_at_end() {
        let mut r = replay(events());
        assert_eq!(r.advance(100), 5);
        assert!(r.is_at_end());
        assert!(!r.step_forward());
        assert_eq!(r.position(), 5);
    }

    #[test]
    fn step_back_rebuilds_state() {
        let mut r = replay(events());
        r.advance(3);
        let mut expected = replay(events());
        expected.advance(2);

        assert!(r.step_back());
        assert_eq!(r.position(), 2);
        assert_eq!(r.state(), expected.state());
        assert!(r.state().arena().activity_at(2).is_some());
    }

    #[test]
    fn step_back_at_start_is_noop() {
        let mut r = replay(events());
        assert!(!r.step_back());
        assert_eq!(r.position(), 0);
    }

    #[test]
    fn seek_clamps_and_moves_both_ways() {
        let mut r = replay(events());
        r.seek(99);
        assert!(r.is_at_end());
        r.seek(1);
        assert_eq!(r.position(), 1);
        assert_eq!(r.state().cursor().cycle(), 1);
        assert!(r.state().arena().trail().is_empty());
    }

    #[test]
    fn resolve_caches_until_reset() {
        let mut r = replay(events());
        assert_eq!(r.resolve(), BattleOutcome::Undetermined);
        assert!(r.verdict().is_none());

        r.jump_to_end();
        assert_eq!(r.resolve(), BattleOutcome::Warrior1Wins);
        assert_eq!(r.view().outcome, BattleOutcome::Warrior1Wins);

        r.reset();
        assert_eq!(r.outcome(), BattleOutcome::Undetermined);
        assert_eq!(r.position(), 0);
    }

    #[test]
    fn stepping_back_from_end_forgets_outcome() {
        let mut r = replay(events());
        r.jump_to_end();
        r.resolve();
        r.step_back();
        assert_eq!(r.outcome(), BattleOutcome::Undetermined);
    }

    #[test]
    fn view_reports_progress() {
        let mut r = replay(events());
        r.advance(2);
        let view = r.view();
        assert_eq!(view.total_events, 5);
        assert!((view.progress() - 0.4).abs() < 1e-9);
        assert_eq!(replay(vec![]).view().progress(), 1.0);
    }
}
