//! Rate and cadence properties across the operating band.

use std::time::Duration;

use coreplay_playback::{
    events_per_tick, speed::MAX_MANUAL_RATE, speed::MIN_RATE, Control, ExportConfig, Exporter,
    InteractiveConfig, InteractivePlayer, NullSink, Pacing, PacingPolicy,
};
use coreplay_replay::{Replay, ReplayConfig};
use coreplay_test_utils::{random_events, ManualClock, RecordingBuilder};
use proptest::prelude::*;

const CORE: u32 = 8000;

fn replay(seed: u64, n: usize) -> Replay {
    let rec = RecordingBuilder::new(CORE)
        .events(random_events(seed, n, CORE))
        .recording();
    Replay::from_recording(rec, ReplayConfig::default()).unwrap()
}

proptest! {
    #[test]
    fn batch_size_is_at_least_one(
        rate in 1e-300f64..1e300,
        tick_rate in 1.0f64..1000.0,
    ) {
        let n = events_per_tick(rate, tick_rate);
        prop_assert!(n >= 1);
        if rate >= tick_rate {
            prop_assert_eq!(n, (rate / tick_rate).floor() as usize);
        }
    }

    #[test]
    fn gated_pacing_never_exceeds_rate(
        rate in MIN_RATE..1000.0,
        step_us in 1u64..50_000,
        ticks in 1u64..400,
    ) {
        let policy = PacingPolicy::Interactive { tick_rate_hz: 60.0, batch_threshold: 1000.0 };
        let mut pacing = policy.pacing(rate);
        let interval = match pacing {
            Pacing::Gated { interval, .. } => interval,
            Pacing::Batched { .. } => return Err(TestCaseError::fail("expected gated pacing")),
        };
        let mut released = 0u128;
        for i in 0..ticks {
            released += pacing.due(Duration::from_micros(step_us * i)) as u128;
        }
        let elapsed = Duration::from_micros(step_us * (ticks - 1));
        // Releases are at least one interval apart; the first is immediate.
        prop_assert!(released >= 1);
        prop_assert!((released - 1) * interval.as_nanos() <= elapsed.as_nanos());
    }

    #[test]
    fn export_frames_are_play_plus_settle(
        seed in any::<u64>(),
        n in 0usize..200,
        fps in 1u32..60,
        rate in MIN_RATE..5000.0,
        settle in 0.0f64..2.0,
    ) {
        let config = ExportConfig { fps, rate, settle_seconds: settle, target_duration: None };
        let settle_ticks = config.settle_ticks();
        let per_frame = events_per_tick(rate, f64::from(fps));
        let play = n.div_ceil(per_frame).max(1) as u64;

        let report = Exporter::new(replay(seed, n), config)
            .unwrap()
            .run(&mut NullSink)
            .unwrap();
        prop_assert_eq!(report.events_per_frame, per_frame);
        prop_assert_eq!(report.settle_frames, settle_ticks);
        prop_assert_eq!(report.frames, play + settle_ticks);
        prop_assert!(report.outcome.is_decided());
    }

    #[test]
    fn set_rate_stays_in_band(rate in 1e-300f64..1e300) {
        let mut player =
            InteractivePlayer::new(replay(1, 20), InteractiveConfig::default(), ManualClock::new())
                .unwrap();
        player.handle(Control::SetRate(rate));
        prop_assert!((MIN_RATE..=MAX_MANUAL_RATE).contains(&player.rate()));
        player.tick();
    }
}
