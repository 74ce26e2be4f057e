//! The pure transition core: apply one event, reset, decay.
//!
//! [`ReplayState`] never looks at a clock and never reads ahead in the
//! event list. It is driven one event at a time by
//! [`Replay`](crate::Replay), which in turn is driven by a scheduler.

use coreplay_format::{Event, EventKind, WarriorId};

use crate::arena::{Access, Activity, ArenaState};
use crate::config::ReplayConfig;

/// Position within the event list plus the facts carried by events
/// that do not touch the arena.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplayCursor {
    position: usize,
    cycle: u32,
    eliminated: [bool; 2],
}

impl ReplayCursor {
    /// Index of the next event to apply.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Cycle from the most recent cycle-boundary event.
    pub fn cycle(&self) -> u32 {
        self.cycle
    }

    /// Whether `warrior` has been signaled as eliminated.
    pub fn is_eliminated(&self, warrior: WarriorId) -> bool {
        self.eliminated[warrior.index()]
    }

    /// Eliminated warriors in id order.
    pub fn eliminated(&self) -> impl Iterator<Item = WarriorId> + '_ {
        WarriorId::BOTH
            .into_iter()
            .filter(|w| self.is_eliminated(*w))
    }

    /// Number of eliminated warriors (0, 1 or 2).
    pub fn eliminated_count(&self) -> usize {
        self.eliminated.iter().filter(|&&e| e).count()
    }
}

/// Arena state plus cursor, mutated only by [`apply`](Self::apply) and
/// [`reset`](Self::reset) (and faded by [`decay`](Self::decay)).
#[derive(Clone, Debug, PartialEq)]
pub struct ReplayState {
    config: ReplayConfig,
    starts: [u32; 2],
    arena: ArenaState,
    cursor: ReplayCursor,
}

impl ReplayState {
    /// Fresh state with both start positions seeded.
    ///
    /// `starts` holds the load addresses of the first and second warrior.
    /// The config is assumed valid; see [`ReplayConfig::validate`].
    pub fn new(config: ReplayConfig, starts: [u32; 2]) -> Self {
        let mut state = Self {
            config,
            starts,
            arena: ArenaState::new(),
            cursor: ReplayCursor::default(),
        };
        state.reset();
        state
    }

    /// Clear all derived state and re-seed the start positions.
    pub fn reset(&mut self) {
        self.arena.clear();
        self.cursor = ReplayCursor::default();
        for warrior in WarriorId::BOTH {
            self.arena
                .claim(self.starts[warrior.index()], warrior, Access::Start);
        }
    }

    /// Apply one event and advance the cursor past it. Never fails.
    pub fn apply(&mut self, event: &Event) {
        let address = u32::from(event.address);
        match event.kind {
            EventKind::Execute => {
                self.arena.claim(address, event.warrior, Access::Exec);
                self.arena.push_trail(address, self.config.trail_capacity);
            }
            EventKind::Write => {
                self.arena.claim(address, event.warrior, Access::Write);
                self.arena.mark(address, Activity::Write);
            }
            EventKind::Read | EventKind::Decrement | EventKind::Increment => {
                if let Some(activity) = Activity::from_kind(event.kind) {
                    self.arena.mark(address, activity);
                }
            }
            EventKind::WarriorEliminated => {
                self.cursor.eliminated[event.warrior.index()] = true;
            }
            EventKind::CycleBoundary => self.cursor.cycle = event.cycle,
            EventKind::Spawn | EventKind::ProcessTerminate | EventKind::TaskQueuePush => {}
        }
        self.cursor.position += 1;
    }

    /// Fade every marker by one tick.
    pub fn decay(&mut self) {
        self.arena
            .decay(self.config.damping, self.config.decay_floor);
    }

    /// Derived arena state.
    pub fn arena(&self) -> &ArenaState {
        &self.arena
    }

    /// Cursor.
    pub fn cursor(&self) -> &ReplayCursor {
        &self.cursor
    }

    /// Configuration in use.
    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Ownership;

    const W0: WarriorId = WarriorId::FIRST;
    const W1: WarriorId = WarriorId::SECOND;

    fn state() -> ReplayState {
        ReplayState::new(ReplayConfig::default(), [0, 50])
    }

    fn ev(kind: EventKind, address: u16, warrior: WarriorId) -> Event {
        Event::new(1, address, kind, warrior, 0)
    }

    #[test]
    fn new_state_seeds_start_positions() {
        let s = state();
        assert_eq!(s.arena().ownership().len(), 2);
        assert_eq!(
            s.arena().owner(50),
            Some(&Ownership {
                owner: W1,
                access: Access::Start
            })
        );
        assert_eq!(s.cursor().position(), 0);
    }

    #[test]
    fn execute_claims_and_extends_trail() {
        let mut s = state();
        s.apply(&ev(EventKind::Execute, 5, W0));
        assert_eq!(s.arena().owner(5).unwrap().access, Access::Exec);
        assert_eq!(s.arena().trail().back().unwrap().address, 5);
        assert!(s.arena().activity().is_empty());
        assert_eq!(s.cursor().position(), 1);
    }

    #[test]
    fn write_claims_and_marks_activity() {
        let mut s = state();
        s.apply(&ev(EventKind::Write, 9, W1));
        assert_eq!(s.arena().owner(9).unwrap().owner, W1);
        assert_eq!(s.arena().activity_at(9).unwrap().activity, Activity::Write);
    }

    #[test]
    fn read_marks_activity_without_claiming() {
        let mut s = state();
        s.apply(&ev(EventKind::Read, 9, W1));
        s.apply(&ev(EventKind::Increment, 10, W1));
        assert!(s.arena().owner(9).is_none());
        assert_eq!(s.arena().activity_at(9).unwrap().activity, Activity::Read);
        assert_eq!(
            s.arena().activity_at(10).unwrap().activity,
            Activity::Increment
        );
    }

    #[test]
    fn informational_kinds_only_advance_cursor() {
        let mut s = state();
        let before = s.arena().clone();
        for kind in [
            EventKind::Spawn,
            EventKind::ProcessTerminate,
            EventKind::TaskQueuePush,
        ] {
            s.apply(&ev(kind, 3, W0));
        }
        assert_eq!(s.arena(), &before);
        assert_eq!(s.cursor().position(), 3);
    }

    #[test]
    fn elimination_is_idempotent() {
        let mut s = state();
        s.apply(&ev(EventKind::WarriorEliminated, 0, W1));
        s.apply(&ev(EventKind::WarriorEliminated, 0, W1));
        assert_eq!(s.cursor().eliminated_count(), 1);
        assert!(s.cursor().is_eliminated(W1));
        assert_eq!(s.cursor().eliminated().collect::<Vec<_>>(), vec![W1]);
    }

    #[test]
    fn cycle_boundary_sets_cycle() {
        let mut s = state();
        s.apply(&Event::new(42, 0, EventKind::CycleBoundary, W0, 42));
        assert_eq!(s.cursor().cycle(), 42);
    }

    #[test]
    fn double_reset_equals_single_reset() {
        let mut s = state();
        s.apply(&ev(EventKind::Execute, 5, W0));
        s.apply(&ev(EventKind::WarriorEliminated, 0, W0));
        s.reset();
        let once = s.clone();
        s.reset();
        assert_eq!(s, once);
        assert_eq!(s.arena().ownership().len(), 2);
        assert!(s.arena().trail().is_empty());
        assert_eq!(s.cursor(), &ReplayCursor::default());
    }

    #[test]
    fn shared_start_address_keeps_second_warrior() {
        let s = ReplayState::new(ReplayConfig::default(), [7, 7]);
        assert_eq!(s.arena().ownership().len(), 1);
        assert_eq!(s.arena().owner(7).unwrap().owner, W1);
    }
}
