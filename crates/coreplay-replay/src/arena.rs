//! Derived arena state: ownership, execution trail, activity markers.
//!
//! Only [`ReplayState`](crate::ReplayState) mutates an [`ArenaState`];
//! renderers get it read-only through [`ReplayView`](crate::ReplayView).
//! Maps are insertion-ordered so two replays of the same log produce
//! identical iteration order.

use std::collections::VecDeque;

use coreplay_format::{EventKind, WarriorId};
use indexmap::IndexMap;

/// How a cell came to be owned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Access {
    /// Seeded from a warrior's load address on reset.
    Start,
    /// Last claimed by executing an instruction there.
    Exec,
    /// Last claimed by writing to it.
    Write,
}

/// Owner of a cell and how it was last claimed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ownership {
    /// Warrior that last claimed the cell.
    pub owner: WarriorId,
    /// How it was claimed.
    pub access: Access,
}

/// Kind of transient memory activity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Activity {
    /// Cell was read.
    Read,
    /// Cell was written.
    Write,
    /// Cell was decremented.
    Decrement,
    /// Cell was incremented.
    Increment,
}

impl Activity {
    /// The activity an event kind leaves behind, if any.
    pub fn from_kind(kind: EventKind) -> Option<Self> {
        match kind {
            EventKind::Read => Some(Self::Read),
            EventKind::Write => Some(Self::Write),
            EventKind::Decrement => Some(Self::Decrement),
            EventKind::Increment => Some(Self::Increment),
            _ => None,
        }
    }
}

/// A fading activity marker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActivityMark {
    /// What happened.
    pub activity: Activity,
    /// Freshness in `[0, 1]`; 1.0 when set.
    pub decay: f32,
}

/// One entry of the execution trail.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailMark {
    /// Executed address.
    pub address: u32,
    /// Freshness in `[0, 1]`; 1.0 when pushed.
    pub decay: f32,
}

/// Everything derived from the events applied so far.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArenaState {
    ownership: IndexMap<u32, Ownership>,
    trail: VecDeque<TrailMark>,
    activity: IndexMap<u32, ActivityMark>,
}

impl ArenaState {
    /// Empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all derived state.
    pub fn clear(&mut self) {
        self.ownership.clear();
        self.trail.clear();
        self.activity.clear();
    }

    /// Record that `owner` claimed `address`.
    pub fn claim(&mut self, address: u32, owner: WarriorId, access: Access) {
        self.ownership.insert(address, Ownership { owner, access });
    }

    /// Set a fresh activity marker, replacing any older one at `address`.
    pub fn mark(&mut self, address: u32, activity: Activity) {
        self.activity.insert(
            address,
            ActivityMark {
                activity,
                decay: 1.0,
            },
        );
    }

    /// Push a fresh trail entry, evicting the oldest beyond `capacity`.
    pub fn push_trail(&mut self, address: u32, capacity: usize) {
        self.trail.push_back(TrailMark {
            address,
            decay: 1.0,
        });
        while self.trail.len() > capacity {
            self.trail.pop_front();
        }
    }

    /// Damp every marker and drop those that fall below `floor`.
    pub fn decay(&mut self, damping: f32, floor: f32) {
        self.activity.retain(|_, mark| {
            mark.decay *= damping;
            mark.decay >= floor
        });
        self.trail.retain_mut(|mark| {
            mark.decay *= damping;
            mark.decay >= floor
        });
    }

    /// Ownership of one cell, if it was ever claimed.
    pub fn owner(&self, address: u32) -> Option<&Ownership> {
        self.ownership.get(&address)
    }

    /// All claimed cells, in first-claim order.
    pub fn ownership(&self) -> &IndexMap<u32, Ownership> {
        &self.ownership
    }

    /// Number of cells currently owned by `warrior`.
    pub fn owned_by(&self, warrior: WarriorId) -> usize {
        self.ownership
            .values()
            .filter(|o| o.owner == warrior)
            .count()
    }

    /// Execution trail, oldest first.
    pub fn trail(&self) -> &VecDeque<TrailMark> {
        &self.trail
    }

    /// Activity marker at one cell.
    pub fn activity_at(&self, address: u32) -> Option<&ActivityMark> {
        self.activity.get(&address)
    }

    /// All live activity markers.
    pub fn activity(&self) -> &IndexMap<u32, ActivityMark> {
        &self.activity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trail_evicts_oldest_first() {
        let mut arena = ArenaState::new();
        for addr in 0..5 {
            arena.push_trail(addr, 3);
        }
        let addrs: Vec<_> = arena.trail().iter().map(|m| m.address).collect();
        assert_eq!(addrs, vec![2, 3, 4]);
    }

    #[test]
    fn decay_removes_markers_below_floor() {
        let mut arena = ArenaState::new();
        arena.mark(7, Activity::Read);
        arena.push_trail(7, 30);

        // 0.8^10 ≈ 0.107, 0.8^11 ≈ 0.086
        for _ in 0..10 {
            arena.decay(0.8, 0.1);
        }
        assert!(arena.activity_at(7).is_some());
        assert_eq!(arena.trail().len(), 1);

        arena.decay(0.8, 0.1);
        assert!(arena.activity_at(7).is_none());
        assert!(arena.trail().is_empty());
    }

    #[test]
    fn remarking_refreshes_decay() {
        let mut arena = ArenaState::new();
        arena.mark(3, Activity::Read);
        arena.decay(0.5, 0.1);
        arena.mark(3, Activity::Increment);
        let mark = arena.activity_at(3).unwrap();
        assert_eq!(mark.activity, Activity::Increment);
        assert_eq!(mark.decay, 1.0);
    }

    #[test]
    fn claim_overwrites_owner_and_counts() {
        let mut arena = ArenaState::new();
        arena.claim(1, WarriorId::FIRST, Access::Start);
        arena.claim(2, WarriorId::FIRST, Access::Exec);
        arena.claim(1, WarriorId::SECOND, Access::Write);
        assert_eq!(arena.owned_by(WarriorId::FIRST), 1);
        assert_eq!(arena.owned_by(WarriorId::SECOND), 1);
        assert_eq!(
            arena.owner(1),
            Some(&Ownership {
                owner: WarriorId::SECOND,
                access: Access::Write
            })
        );
    }

    #[test]
    fn activity_kinds_map_from_events() {
        assert_eq!(Activity::from_kind(EventKind::Read), Some(Activity::Read));
        assert_eq!(
            Activity::from_kind(EventKind::Decrement),
            Some(Activity::Decrement)
        );
        assert_eq!(Activity::from_kind(EventKind::Execute), None);
        assert_eq!(Activity::from_kind(EventKind::Spawn), None);
    }
}
