use glam::Vec3A;
use pitchsim::Team;
use pitchsim::sim::{Arena, ArenaConfig, BallState, CarConfig, GameMode};

fn arena_with_cars() -> Arena {
    let config = ArenaConfig {
        rng_seed: Some(1),
        ..Default::default()
    };
    let mut arena = Arena::new_with_config(GameMode::Soccar, config, 120).unwrap();
    arena.add_car(Team::Blue, CarConfig::OCTANE);
    arena.add_car(Team::Orange, CarConfig::OCTANE);
    arena
}

const KICKOFF_SLOTS: [(f32, f32); 5] = [
    (-2048.0, -2560.0),
    (2048.0, -2560.0),
    (-256.0, -3840.0),
    (256.0, -3840.0),
    (0.0, -4608.0),
];

#[test]
fn same_seed_selects_the_same_arrangement() {
    let mut first = arena_with_cars();
    let mut second = arena_with_cars();

    first.reset_to_random_kickoff(Some(1234));
    second.reset_to_random_kickoff(Some(1234));

    for (a, b) in first.get_cars().iter().zip(second.get_cars().iter()) {
        assert_eq!(
            a.get_state().phys.pos.to_array().map(f32::to_bits),
            b.get_state().phys.pos.to_array().map(f32::to_bits)
        );
    }
}

#[test]
fn different_seeds_can_differ() {
    let mut arenas: Vec<Arena> = (0..8u64)
        .map(|seed| {
            let mut arena = arena_with_cars();
            arena.reset_to_random_kickoff(Some(seed));
            arena
        })
        .collect();

    let positions: Vec<[f32; 3]> = arenas
        .iter_mut()
        .map(|arena| arena.get_cars()[0].get_state().phys.pos.to_array())
        .collect();

    assert!(
        positions.iter().any(|pos| pos != &positions[0]),
        "eight seeds should not all pick the same slot"
    );
}

#[test]
fn cars_land_on_kickoff_slots() {
    let mut arena = arena_with_cars();
    arena.reset_to_random_kickoff(Some(7));

    for car in arena.get_cars() {
        let pos = car.get_state().phys.pos;
        let mirror = if car.team == Team::Blue { 1.0 } else { -1.0 };

        let on_slot = KICKOFF_SLOTS.iter().any(|&(x, y)| {
            (pos.x - x * mirror).abs() < 1.0 && (pos.y - y * mirror).abs() < 1.0
        });
        assert!(on_slot, "car at {pos:?} is not on a kickoff slot");
        assert!((pos.z - 17.0).abs() < 0.5);

        let state = car.get_state();
        assert!((state.boost - 100.0 / 3.0).abs() < 1e-3);
        assert!(!state.has_jumped && !state.is_demoed);
        assert_eq!(state.jump_time, 0.0);
    }
}

#[test]
fn kickoff_centers_the_ball_and_keeps_the_clock() {
    let mut arena = arena_with_cars();

    let mut ball = BallState::default();
    ball.phys.pos = Vec3A::new(500.0, 900.0, 400.0);
    ball.phys.vel = Vec3A::new(100.0, 100.0, 100.0);
    arena.set_ball_state(ball);
    arena.step(50).unwrap();

    arena.reset_to_random_kickoff(Some(3));

    let state = arena.get_ball_state();
    assert_eq!(state.phys.pos.x, 0.0);
    assert_eq!(state.phys.pos.y, 0.0);
    assert_eq!(state.phys.vel.to_array(), [0.0, 0.0, 0.0]);

    // The tick counter never resets.
    assert_eq!(arena.tick_count(), 50);
}

#[test]
fn kickoff_clears_scores_stats_and_pads() {
    let mut arena = arena_with_cars();
    let car_id = arena.get_cars()[0].id;

    // Score a goal to have something to clear.
    let mut ball = BallState::default();
    ball.phys.pos = Vec3A::new(0.0, 5100.0, 300.0);
    ball.phys.vel = Vec3A::new(0.0, 5000.0, 0.0);
    arena.set_ball_state(ball);
    arena.step(20).unwrap();
    assert_eq!(arena.blue_score(), 1);

    arena.reset_to_random_kickoff(None);

    assert_eq!(arena.blue_score(), 0);
    assert_eq!(arena.orange_score(), 0);
    assert_eq!(arena.get_car_stats(car_id).goals, 0);
    assert!(arena.get_boost_pads().iter().all(|pad| pad.get_state().is_active));
}

#[test]
fn heatseeker_kickoff_spawns_the_ball_off_center() {
    let config = ArenaConfig {
        rng_seed: Some(4),
        ..Default::default()
    };
    let mut arena = Arena::new_with_config(GameMode::Heatseeker, config, 120).unwrap();
    arena.reset_to_random_kickoff(Some(4));

    let state = arena.get_ball_state();
    assert!((state.phys.pos.x - -1000.0).abs() < 1.0);
    assert!((state.phys.pos.y.abs() - 2220.0).abs() < 1.0);
    assert!(state.phys.vel.z > 0.0);
}
