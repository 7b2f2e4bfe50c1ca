use proptest::prelude::*;

use slice_rush::sim::{Clock, ComboTracker, EffectTargets, PowerUpEngine, PowerUpKind, PowerUpTick};
use slice_rush::tuning::{PowerUpTuning, SpawnerConfig};
use slice_rush::{Services, Session, TickInput, Tuning, tick};

fn session_with_multiplier(multiplier: f32) -> Session {
    let tuning = Tuning {
        seed: Some(7),
        power_ups: PowerUpTuning {
            score_multiplier: multiplier,
            ..Default::default()
        },
        ..Default::default()
    };
    Session::new(tuning, Services::headless())
}

#[test]
fn fractional_multiplier_rounds_to_nearest() {
    let mut session = session_with_multiplier(1.5);
    session.activate_score_multiplier(5.0);
    // 3 * 1.5 = 4.5
    assert_eq!(session.increase_score(3), 5);
    // Combo bonus first: 3 * 2 * 1.5 = 9
    assert_eq!(session.increase_score(3), 9);
    assert_eq!(session.score(), 14);
}

#[test]
fn multiplier_ignored_when_power_up_inactive() {
    let mut session = session_with_multiplier(1.5);
    assert_eq!(session.increase_score(3), 3);
}

fn session() -> Session {
    let tuning = Tuning {
        seed: Some(7),
        ..Default::default()
    };
    Session::new(tuning, Services::headless())
}

proptest! {
    #[test]
    fn combo_bonus_is_capped(points in 0u32..10_000, slices in 1usize..12) {
        let mut session = session();
        let mut last = 0;
        for _ in 0..slices {
            last = session.increase_score(points);
        }
        let bonus = slices.min(5) as u64;
        prop_assert_eq!(last, points as u64 * bonus);
    }

    #[test]
    fn slices_outside_window_score_base_points(points in 0u32..10_000, slices in 1usize..5) {
        let mut session = session();
        let idle = TickInput::default();
        for _ in 0..slices {
            prop_assert_eq!(session.increase_score(points), points as u64);
            // 1.125s of play, past the combo window
            for _ in 0..9 {
                tick(&mut session, &idle, 0.125);
            }
        }
        prop_assert_eq!(session.score(), points as u64 * slices as u64);
    }

    #[test]
    fn multiplier_doubles_after_combo(points in 0u32..10_000, slices in 1usize..8) {
        let mut session = session();
        session.activate_score_multiplier(5.0);
        let mut total = 0;
        for i in 1..=slices {
            let awarded = session.increase_score(points);
            prop_assert_eq!(awarded, points as u64 * i.min(5) as u64 * 2);
            total += awarded;
        }
        prop_assert_eq!(session.score(), total);
    }

    #[test]
    fn fractional_multiplier_matches_rounded_product(
        points in 0u32..10_000,
        multiplier in 1.0f32..3.0,
    ) {
        let mut session = session_with_multiplier(multiplier);
        session.activate_score_multiplier(5.0);
        let expected = (points as f64 * multiplier as f64).round() as u64;
        prop_assert_eq!(session.increase_score(points), expected);
        prop_assert_eq!(session.score(), expected);
    }

    #[test]
    fn streak_resets_exactly_once(dts in prop::collection::vec(0.0f32..0.2, 1..200)) {
        let mut combo = ComboTracker::new(1.0);
        combo.register_slice(0.0);
        combo.register_slice(0.0);
        let mut clock = Clock::new();
        let mut resets = 0;
        for dt in dts {
            clock.advance(dt);
            if combo.tick(&clock) {
                resets += 1;
            }
        }
        prop_assert!(resets <= 1);
        if resets == 1 {
            prop_assert_eq!(combo.count(), 0);
        }
    }

    #[test]
    fn bar_stays_in_unit_range(
        duration in -1.0f32..10.0,
        frames in prop::collection::vec((0.0f32..0.5, any::<bool>()), 1..100),
    ) {
        let mut engine = PowerUpEngine::new(PowerUpTuning::default());
        let mut clock = Clock::new();
        let mut scale = 1.0;
        let mut spawner = SpawnerConfig::default();
        {
            let mut targets = EffectTargets { time_scale: &mut scale, spawner: &mut spawner };
            engine.activate(PowerUpKind::SlowMotion, duration, &mut targets);
        }
        for (dt, paused) in frames {
            clock.advance(dt);
            let mut targets = EffectTargets { time_scale: &mut scale, spawner: &mut spawner };
            let result = engine.tick(&clock, paused, &mut targets);
            let bar = engine.bar();
            prop_assert!((0.0..=1.0).contains(&bar), "bar {}", bar);
            if let PowerUpTick::Progress(fill) = result {
                prop_assert!((0.0..=1.0).contains(&fill));
            }
        }
    }

    #[test]
    fn cancel_always_restores(
        first in prop::sample::select(PowerUpKind::ALL.to_vec()),
        second in prop::sample::select(PowerUpKind::ALL.to_vec()),
    ) {
        let mut engine = PowerUpEngine::new(PowerUpTuning::default());
        let mut scale = 1.0;
        let mut spawner = SpawnerConfig::default();
        let mut targets = EffectTargets { time_scale: &mut scale, spawner: &mut spawner };
        engine.activate(first, 5.0, &mut targets);
        engine.activate(second, 5.0, &mut targets);
        engine.cancel(&mut targets);
        prop_assert_eq!(scale, 1.0);
        prop_assert_eq!(spawner, SpawnerConfig::default());
        prop_assert_eq!(engine.score_multiplier(), 1.0);
    }
}
