//! Benchmark profiles for Coreplay.
//!
//! - [`REFERENCE`]: standard 8000-cell core, 100K events
//! - [`STRESS`]: 55440-cell core, 1M events
//! - [`recording_bytes`] / [`replay`]: deterministic inputs for a profile

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use coreplay_format::{Recording, WarriorId};
use coreplay_replay::{Replay, ReplayConfig};
use coreplay_test_utils::{RandomEvents, RecordingBuilder};

/// Size of a benchmark recording.
#[derive(Clone, Copy, Debug)]
pub struct Profile {
    /// Core size in cells.
    pub core_size: u32,
    /// Number of events, final elimination included.
    pub events: usize,
}

/// A typical tournament battle.
pub const REFERENCE: Profile = Profile {
    core_size: 8000,
    events: 100_000,
};

/// A long battle on a large core.
pub const STRESS: Profile = Profile {
    core_size: 55_440,
    events: 1_000_000,
};

/// Encoded recording for `profile`, ending with the second warrior's
/// elimination.
pub fn recording_bytes(profile: Profile, seed: u64) -> Vec<u8> {
    let events = RandomEvents::new(seed, profile.events, profile.core_size)
        .eliminating(WarriorId::SECOND)
        .generate();
    RecordingBuilder::new(profile.core_size)
        .names("Bench A", "Bench B")
        .events(events)
        .bytes()
}

/// A fresh replay of `profile` with the default configuration.
pub fn replay(profile: Profile, seed: u64) -> Replay {
    let recording = Recording::from_bytes(&recording_bytes(profile, seed))
        .expect("benchmark recording must decode");
    Replay::from_recording(recording, ReplayConfig::default())
        .expect("default replay config is valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use coreplay_replay::BattleOutcome;

    #[test]
    fn reference_recording_is_clean() {
        let bytes = recording_bytes(REFERENCE, 42);
        let rec = Recording::from_bytes(&bytes).unwrap();
        assert_eq!(rec.len(), REFERENCE.events);
        assert!(rec.warnings().is_empty());
    }

    #[test]
    fn reference_replay_resolves() {
        let mut r = replay(REFERENCE, 42);
        r.jump_to_end();
        assert_eq!(r.resolve(), BattleOutcome::Warrior1Wins);
    }

    #[test]
    fn profiles_are_deterministic() {
        assert_eq!(recording_bytes(REFERENCE, 7), recording_bytes(REFERENCE, 7));
    }
}
