//! Seeded random event streams.
//!
//! Streams are well-formed for the given core size (every record passes
//! validation) and reproducible: the same parameters always produce the
//! same events.

use coreplay_format::{Event, EventKind, WarriorId};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Parameters for a random stream.
#[derive(Clone, Debug)]
pub struct RandomEvents {
    pub seed: u64,
    pub count: usize,
    pub core_size: u32,
    /// Append a final elimination of this warrior (counted in `count`).
    pub eliminate: Option<WarriorId>,
}

impl RandomEvents {
    pub fn new(seed: u64, count: usize, core_size: u32) -> Self {
        Self {
            seed,
            count,
            core_size,
            eliminate: None,
        }
    }

    pub fn eliminating(mut self, warrior: WarriorId) -> Self {
        self.eliminate = Some(warrior);
        self
    }

    pub fn generate(&self) -> Vec<Event> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let address_limit = self.core_size.clamp(1, u32::from(u16::MAX) + 1);
        let body = match self.eliminate {
            Some(_) => self.count.saturating_sub(1),
            None => self.count,
        };

        let mut cycle = 0u32;
        let mut events = Vec::with_capacity(self.count);
        for i in 0..body {
            if i > 0 && rng.gen_bool(0.1) {
                cycle += 1;
                events.push(Event::new(
                    cycle,
                    0,
                    EventKind::CycleBoundary,
                    WarriorId::FIRST,
                    cycle,
                ));
                continue;
            }
            let warrior = if rng.gen_bool(0.5) {
                WarriorId::FIRST
            } else {
                WarriorId::SECOND
            };
            let address = rng.gen_range(0..address_limit) as u16;
            let (kind, data) = match rng.gen_range(0..100u32) {
                0..=39 => (EventKind::Execute, rng.gen_range(0..20u32)),
                40..=59 => (EventKind::Read, 0),
                60..=79 => (EventKind::Write, rng.gen::<u32>()),
                80..=84 => (EventKind::Decrement, 0),
                85..=89 => (EventKind::Increment, 0),
                90..=93 => (EventKind::Spawn, rng.gen_range(1..64u32)),
                94..=96 => (EventKind::ProcessTerminate, rng.gen_range(0..64u32)),
                _ => (EventKind::TaskQueuePush, 0),
            };
            events.push(Event::new(cycle, address, kind, warrior, data));
        }
        if let Some(warrior) = self.eliminate {
            if self.count > 0 {
                events.push(Event::new(
                    cycle,
                    0,
                    EventKind::WarriorEliminated,
                    warrior,
                    0,
                ));
            }
        }
        events
    }
}

/// `count` random events for a core of `core_size` cells.
pub fn random_events(seed: u64, count: usize, core_size: u32) -> Vec<Event> {
    RandomEvents::new(seed, count, core_size).generate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        assert_eq!(random_events(7, 500, 8000), random_events(7, 500, 8000));
        assert_ne!(random_events(7, 500, 8000), random_events(8, 500, 8000));
    }

    #[test]
    fn events_are_valid_for_core() {
        let events = random_events(1, 2000, 100);
        assert_eq!(events.len(), 2000);
        for e in &events {
            assert!(e.to_raw().validate(100).is_ok());
        }
    }

    #[test]
    fn elimination_is_last() {
        let events = RandomEvents::new(3, 10, 8000)
            .eliminating(WarriorId::SECOND)
            .generate();
        assert_eq!(events.len(), 10);
        let last = events.last().unwrap();
        assert_eq!(last.kind, EventKind::WarriorEliminated);
        assert_eq!(last.warrior, WarriorId::SECOND);
        assert_eq!(
            events
                .iter()
                .filter(|e| e.kind == EventKind::WarriorEliminated)
                .count(),
            1
        );
    }
}
