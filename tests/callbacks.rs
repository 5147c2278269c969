use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use glam::Vec3A;
use pitchsim::sim::{Arena, ArenaConfig, BallState, BoostPadConfig, CarConfig, CarControls, GameMode};
use pitchsim::{ArenaError, Team};

fn seeded(game_mode: GameMode) -> Arena {
    let config = ArenaConfig {
        rng_seed: Some(0),
        ..Default::default()
    };
    Arena::new_with_config(game_mode, config, 120).unwrap()
}

#[test]
fn setting_a_callback_returns_the_previous_one() {
    let arena = seeded(GameMode::Soccar);

    let prev = arena
        .set_goal_score_callback(Box::new(|_, _, _| Ok(())), Box::new(1u8))
        .unwrap();
    assert!(prev.is_none());

    let prev = arena
        .set_goal_score_callback(Box::new(|_, _, _| Ok(())), Box::new("second"))
        .unwrap();
    let (_, data) = prev.expect("first callback should be returned");
    assert_eq!(*data.downcast::<u8>().unwrap(), 1);
}

#[test]
fn goal_callback_rejected_without_goals() {
    let arena = seeded(GameMode::TheVoid);
    let result = arena.set_goal_score_callback(Box::new(|_, _, _| Ok(())), Box::new(()));
    assert!(matches!(result, Err(ArenaError::InvalidConfiguration(_))));
}

#[test]
fn boost_pickup_callback_rejected_without_pads() {
    for game_mode in [GameMode::TheVoid, GameMode::Dropshot] {
        let arena = seeded(game_mode);
        let result = arena.set_boost_pickup_callback(Box::new(|_, _, _| Ok(())), Box::new(()));
        assert!(matches!(result, Err(ArenaError::InvalidConfiguration(_))));
    }
}

#[test]
fn goal_callback_fires_and_score_increments() {
    let mut arena = seeded(GameMode::Soccar);

    let goals = Arc::new(AtomicU32::new(0));
    let counter = goals.clone();
    arena
        .set_goal_score_callback(
            Box::new(move |_, team, _| {
                assert_eq!(team, Team::Blue);
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
            Box::new(()),
        )
        .unwrap();

    // Fire the ball into the orange net.
    let mut ball = BallState::default();
    ball.phys.pos = Vec3A::new(0.0, 5000.0, 300.0);
    ball.phys.vel = Vec3A::new(0.0, 4000.0, 0.0);
    arena.set_ball_state(ball);
    arena.step(30).unwrap();

    assert_eq!(goals.load(Ordering::SeqCst), 1);
    assert_eq!(arena.blue_score(), 1);
    assert_eq!(arena.orange_score(), 0);

    // The latch keeps a ball sitting in the goal from scoring again.
    arena.step(30).unwrap();
    assert_eq!(arena.blue_score(), 1);
}

#[test]
fn demo_fires_bump_and_demo_callbacks_once() {
    let mut arena = seeded(GameMode::Soccar);
    let orange = arena.add_car(Team::Orange, CarConfig::BREAKOUT);
    let blue = arena.add_car(Team::Blue, CarConfig::HYBRID);

    let mut orange_state = *arena.get_car(orange).unwrap().get_state();
    orange_state.phys.pos = Vec3A::new(0.0, 0.0, 17.0);
    arena.set_car_state(orange, &orange_state).unwrap();

    let mut blue_state = *arena.get_car(blue).unwrap().get_state();
    blue_state.phys.pos = Vec3A::new(-300.0, 0.0, 17.0);
    blue_state.phys.vel = Vec3A::new(2300.0, 0.0, 0.0);
    blue_state.boost = 100.0;
    arena.set_car_state(blue, &blue_state).unwrap();
    arena
        .set_car_controls(
            blue,
            CarControls {
                throttle: 1.0,
                boost: true,
                ..Default::default()
            },
        )
        .unwrap();

    let demos = Arc::new(AtomicU32::new(0));
    let demo_counter = demos.clone();
    arena.set_car_demo_callback(
        Box::new(move |arena, bumper, victim, _| {
            assert!(arena.get_car(victim).unwrap().get_state().is_demoed);
            assert!(bumper != victim);
            demo_counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }),
        Box::new(()),
    );

    let bumps = Arc::new(AtomicU32::new(0));
    let bump_counter = bumps.clone();
    arena.set_car_bump_callback(
        Box::new(move |_, _, _, is_demo, _| {
            assert!(is_demo);
            bump_counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }),
        Box::new(()),
    );

    arena.step(15).unwrap();

    assert_eq!(demos.load(Ordering::SeqCst), 1);
    assert_eq!(bumps.load(Ordering::SeqCst), 1);
    assert!(arena.get_car(orange).unwrap().get_state().is_demoed);
    assert!(!arena.get_car(blue).unwrap().get_state().is_demoed);
    assert_eq!(arena.get_car_stats(blue).demos, 1);
}

#[test]
fn boost_pickup_callback_fires_on_pad_overlap() {
    let config = ArenaConfig {
        rng_seed: Some(0),
        use_custom_boost_pads: true,
        custom_boost_pads: vec![
            BoostPadConfig {
                pos: Vec3A::new(0.0, 0.0, 73.0),
                is_big: true,
            },
            BoostPadConfig {
                pos: Vec3A::new(2000.0, 2000.0, 73.0),
                is_big: false,
            },
        ],
        ..Default::default()
    };
    let mut arena = Arena::new_with_config(GameMode::Soccar, config, 120).unwrap();

    let id = arena.add_car(Team::Blue, CarConfig::OCTANE);
    let mut state = *arena.get_car(id).unwrap().get_state();
    state.boost = 0.0;
    arena.set_car_state(id, &state).unwrap();

    let pickups = Arc::new(AtomicU32::new(0));
    let counter = pickups.clone();
    arena
        .set_boost_pickup_callback(
            Box::new(move |_, _, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
            Box::new(()),
        )
        .unwrap();

    arena.step(10).unwrap();

    assert_eq!(pickups.load(Ordering::SeqCst), 1);

    let state = arena.get_car(id).unwrap().get_state();
    assert_eq!(state.boost, 100.0);
    assert_eq!(arena.get_car_stats(id).boost_pickups, 1);

    // The pad deactivated with the big-pad cooldown.
    let pad = arena
        .get_boost_pads()
        .iter()
        .find(|pad| pad.config().is_big)
        .unwrap();
    assert!(!pad.get_state().is_active);
    assert!(pad.get_state().cooldown > 9.0);
}

#[test]
fn inactive_pad_reactivates_after_cooldown() {
    let config = ArenaConfig {
        rng_seed: Some(0),
        use_custom_boost_pads: true,
        custom_boost_pads: vec![BoostPadConfig {
            pos: Vec3A::new(0.0, 0.0, 73.0),
            is_big: false,
        }],
        ..Default::default()
    };
    let mut arena = Arena::new_with_config(GameMode::Soccar, config, 120).unwrap();

    let id = arena.add_car(Team::Blue, CarConfig::OCTANE);
    let mut state = *arena.get_car(id).unwrap().get_state();
    state.boost = 0.0;
    arena.set_car_state(id, &state).unwrap();

    arena.step(2).unwrap();
    assert!(!arena.get_boost_pads()[0].get_state().is_active);
    assert!((arena.get_car(id).unwrap().get_state().boost - 12.0).abs() < 1e-3);

    // Drive the car away so the reactivated pad is not retaken.
    let mut away = *arena.get_car(id).unwrap().get_state();
    away.phys.pos = Vec3A::new(1000.0, 1000.0, 17.0);
    arena.set_car_state(id, &away).unwrap();

    // Small pads return after 4 seconds.
    arena.step(4 * 120 + 2).unwrap();
    let pad = &arena.get_boost_pads()[0];
    assert!(pad.get_state().is_active);
    assert_eq!(pad.get_state().cooldown, 0.0);
}

#[test]
fn ball_touch_callback_fires_once_per_tick() {
    let mut arena = seeded(GameMode::Soccar);
    let id = arena.add_car(Team::Blue, CarConfig::OCTANE);

    let touches = Arc::new(AtomicU32::new(0));
    let counter = touches.clone();
    arena.set_ball_touch_callback(
        Box::new(move |arena, car_id, _| {
            assert!(arena.get_car(car_id).unwrap().get_state().ball_hit_info.is_some());
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }),
        Box::new(()),
    );

    let mut ball = BallState::default();
    ball.phys.pos = Vec3A::new(130.0, 0.0, 60.0);
    ball.phys.vel = Vec3A::new(-300.0, 0.0, 0.0);
    arena.set_ball_state(ball);
    arena.step(10).unwrap();

    let count = touches.load(Ordering::SeqCst);
    assert!(count >= 1, "ball touch should have fired");
    assert!(count <= 10, "at most one touch event per tick");
    assert_eq!(arena.get_ball_state().last_hit_car_id, id);
}

#[test]
fn callback_error_stops_the_arena_and_is_reraised() {
    let mut arena = seeded(GameMode::Soccar);
    arena.add_car(Team::Blue, CarConfig::OCTANE);

    arena.set_ball_touch_callback(
        Box::new(|_, _, _| Err("observer failed".into())),
        Box::new(()),
    );

    let mut ball = BallState::default();
    ball.phys.pos = Vec3A::new(130.0, 0.0, 60.0);
    ball.phys.vel = Vec3A::new(-300.0, 0.0, 0.0);
    arena.set_ball_state(ball);

    let result = arena.step(100);
    assert!(matches!(result, Err(ArenaError::CallbackFailure(_))));

    // The loop stopped at the failing tick's boundary.
    assert!(arena.tick_count() < 100);

    // The error was consumed; the arena can be stepped again.
    let tick = arena.tick_count();
    arena.set_ball_touch_callback(Box::new(|_, _, _| Ok(())), Box::new(()));
    arena.step(1).unwrap();
    assert_eq!(arena.tick_count(), tick + 1);
}

#[test]
fn stop_from_a_callback_halts_at_the_tick_boundary() {
    let mut arena = seeded(GameMode::Soccar);
    arena.add_car(Team::Blue, CarConfig::OCTANE);

    arena.set_ball_touch_callback(
        Box::new(|arena, _, _| {
            arena.stop();
            Ok(())
        }),
        Box::new(()),
    );

    let mut ball = BallState::default();
    ball.phys.pos = Vec3A::new(130.0, 0.0, 60.0);
    ball.phys.vel = Vec3A::new(-300.0, 0.0, 0.0);
    arena.set_ball_state(ball);

    arena.step(200).unwrap();
    assert!(arena.tick_count() < 200);
}
