use glam::Vec3A;
use pitchsim::sim::{Arena, ArenaConfig, BallState, GameMode};
use pitchsim::{ArenaError, Team};

fn arena_with_seed(game_mode: GameMode, seed: u64) -> Arena {
    let config = ArenaConfig {
        rng_seed: Some(seed),
        ..Default::default()
    };
    Arena::new_with_config(game_mode, config, 120).unwrap()
}

#[test]
fn tick_rate_out_of_range_is_rejected() {
    assert!(matches!(
        Arena::new(GameMode::Soccar, 14),
        Err(ArenaError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        Arena::new(GameMode::Soccar, 121),
        Err(ArenaError::InvalidConfiguration(_))
    ));
    assert!(Arena::new(GameMode::Soccar, 15).is_ok());
    assert!(Arena::new(GameMode::Soccar, 120).is_ok());
}

#[test]
fn tick_count_advances_by_step_amount() {
    let mut arena = Arena::new(GameMode::Soccar, 120).unwrap();
    assert_eq!(arena.tick_count(), 0);

    arena.step(1).unwrap();
    assert_eq!(arena.tick_count(), 1);

    arena.step(59).unwrap();
    assert_eq!(arena.tick_count(), 60);
}

/// Empty void arena: one tick applies exactly one tick's gravity
/// integration to the ball and leaves its spin untouched.
#[test]
fn empty_void_step_applies_gravity_only() {
    let mut arena = Arena::new(GameMode::TheVoid, 120).unwrap();
    let tick_time = 1.0 / 120.0;

    let start_z = arena.get_ball_state().phys.pos.z;
    arena.step(1).unwrap();
    assert_eq!(arena.tick_count(), 1);

    let state = arena.get_ball_state();

    // Semi-implicit Euler with the ball's linear drag applied after the
    // gravity increment.
    let expected_vel_z = -650.0 * tick_time * (1.0f32 - 0.03).powf(tick_time);
    let expected_pos_z = start_z + expected_vel_z * tick_time;

    assert!((state.phys.vel.z - expected_vel_z).abs() < 1e-4);
    assert!((state.phys.pos.z - expected_pos_z).abs() < 1e-4);
    assert!(state.phys.ang_vel.length() < 1e-6);
}

#[test]
fn void_ball_falls_forever() {
    let mut arena = Arena::new(GameMode::TheVoid, 120).unwrap();
    arena.step(600).unwrap();
    assert!(arena.get_ball_state().phys.pos.z < -1000.0);
}

/// step(k) then step(1) lands on the same state as step(k + 1).
#[test]
fn step_is_additive() {
    let mut split = arena_with_seed(GameMode::Soccar, 11);
    let mut whole = arena_with_seed(GameMode::Soccar, 11);
    split.add_car(Team::Blue, pitchsim::sim::CarConfig::OCTANE);
    whole.add_car(Team::Blue, pitchsim::sim::CarConfig::OCTANE);

    split.step(40).unwrap();
    split.step(1).unwrap();
    whole.step(41).unwrap();

    let pos_split = split.get_ball_state().phys.pos;
    let pos_whole = whole.get_ball_state().phys.pos;
    assert_eq!(pos_split.to_array().map(f32::to_bits), pos_whole.to_array().map(f32::to_bits));

    let car_split = split.get_cars()[0].get_state().phys.pos;
    let car_whole = whole.get_cars()[0].get_state().phys.pos;
    assert_eq!(car_split.to_array().map(f32::to_bits), car_whole.to_array().map(f32::to_bits));
}

/// Identical construction + identical inputs produce bitwise-identical
/// states.
#[test]
fn stepping_is_deterministic() {
    let run = || {
        let mut arena = arena_with_seed(GameMode::Soccar, 99);
        let id = arena.add_car(Team::Blue, pitchsim::sim::CarConfig::DOMINUS);

        let controls = pitchsim::sim::CarControls {
            throttle: 1.0,
            steer: 0.3,
            boost: true,
            ..Default::default()
        };
        arena.set_car_controls(id, controls).unwrap();
        arena.step(240).unwrap();

        let car = arena.get_car(id).unwrap().get_state().phys;
        let ball = arena.get_ball_state().phys;
        (
            car.pos.to_array().map(f32::to_bits),
            car.vel.to_array().map(f32::to_bits),
            ball.pos.to_array().map(f32::to_bits),
        )
    };

    assert_eq!(run(), run());
}

#[test]
fn ball_speed_stays_capped() {
    let mut arena = Arena::new(GameMode::Soccar, 120).unwrap();

    let mut state = BallState::default();
    state.phys.pos = Vec3A::new(0.0, 0.0, 800.0);
    state.phys.vel = Vec3A::new(9000.0, 0.0, 0.0);
    arena.set_ball_state(state);

    arena.step(1).unwrap();

    let max = arena.mutator_config().ball_max_speed;
    assert!(arena.get_ball_state().phys.vel.length_squared() <= max * max * 1.0001);
}

#[test]
fn boost_pads_are_sorted_by_y_then_x() {
    let arena = Arena::new(GameMode::Soccar, 120).unwrap();
    let pads = arena.get_boost_pads();
    assert_eq!(pads.len(), 34);

    for pair in pads.windows(2) {
        let a = pair[0].config().pos;
        let b = pair[1].config().pos;
        assert!(a.y < b.y || (a.y == b.y && a.x < b.x));
    }

    // Every pad starts active with no cooldown.
    for pad in pads {
        assert!(pad.get_state().is_active);
        assert_eq!(pad.get_state().cooldown, 0.0);
    }
}

#[test]
fn the_void_has_no_pads_or_goals() {
    let arena = Arena::new(GameMode::TheVoid, 120).unwrap();
    assert!(arena.get_boost_pads().is_empty());
    assert!(!arena.is_ball_scored());
}

#[test]
fn removing_a_foreign_car_is_an_invalid_operation() {
    let mut arena = Arena::new(GameMode::Soccar, 120).unwrap();
    assert!(matches!(
        arena.remove_car(42),
        Err(ArenaError::InvalidOperation(_))
    ));

    let id = arena.add_car(Team::Blue, pitchsim::sim::CarConfig::OCTANE);
    arena.remove_car(id).unwrap();
    assert!(matches!(
        arena.remove_car(id),
        Err(ArenaError::InvalidOperation(_))
    ));
}

#[test]
fn car_ids_are_unique_and_nonzero() {
    let mut arena = Arena::new(GameMode::Soccar, 120).unwrap();
    let a = arena.add_car(Team::Blue, pitchsim::sim::CarConfig::OCTANE);
    let b = arena.add_car(Team::Orange, pitchsim::sim::CarConfig::OCTANE);
    arena.remove_car(a).unwrap();
    let c = arena.add_car(Team::Blue, pitchsim::sim::CarConfig::MERC);

    assert!(a > 0 && b > 0 && c > 0);
    assert_ne!(b, c);
    assert_ne!(a, c);
}

#[test]
fn repeated_add_remove_cycles_stay_consistent() {
    let mut arena = arena_with_seed(GameMode::Soccar, 3);

    for round in 0..20 {
        for i in 0..5 {
            let team = if (round + i) % 2 == 0 {
                Team::Blue
            } else {
                Team::Orange
            };
            arena.add_car(team, pitchsim::sim::CarConfig::OCTANE);
        }

        arena.step(2).unwrap();
        arena.remove_all_cars();
        assert_eq!(arena.num_cars(), 0);
    }

    arena.step(2).unwrap();
}

#[test]
fn clone_is_deep_and_independent() {
    let mut arena = arena_with_seed(GameMode::Soccar, 5);
    let id = arena.add_car(Team::Blue, pitchsim::sim::CarConfig::OCTANE);
    arena.step(10).unwrap();

    let mut clone = arena.clone_arena(true);
    assert_eq!(clone.tick_count(), arena.tick_count());
    assert_eq!(clone.num_cars(), 1);
    assert_eq!(clone.blue_score(), arena.blue_score());

    let cloned_pos = clone.get_car(id).unwrap().get_state().phys.pos;
    let original_pos = arena.get_car(id).unwrap().get_state().phys.pos;
    assert_eq!(cloned_pos.to_array(), original_pos.to_array());

    clone.step(10).unwrap();
    assert_eq!(arena.tick_count(), 10);
    assert_eq!(clone.tick_count(), 20);
}

#[test]
fn clone_without_preserved_ids_renumbers_from_one() {
    let mut arena = Arena::new(GameMode::Soccar, 120).unwrap();
    let a = arena.add_car(Team::Blue, pitchsim::sim::CarConfig::OCTANE);
    let _b = arena.add_car(Team::Orange, pitchsim::sim::CarConfig::OCTANE);
    arena.remove_car(a).unwrap();
    let c = arena.add_car(Team::Blue, pitchsim::sim::CarConfig::OCTANE);
    assert!(c > 2);

    let clone = arena.clone_arena(false);
    let ids: Vec<u32> = clone.get_cars().iter().map(|car| car.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn rotation_matrices_stay_orthonormal() {
    let mut arena = arena_with_seed(GameMode::Soccar, 17);
    let id = arena.add_car(Team::Blue, pitchsim::sim::CarConfig::OCTANE);

    let controls = pitchsim::sim::CarControls {
        throttle: 1.0,
        steer: -0.8,
        pitch: 0.4,
        yaw: 0.6,
        jump: true,
        boost: true,
        ..Default::default()
    };
    arena.set_car_controls(id, controls).unwrap();
    arena.step(240).unwrap();

    let rot = arena.get_car(id).unwrap().get_state().phys.rot_mat;
    for axis in [rot.x_axis, rot.y_axis, rot.z_axis] {
        assert!((axis.length() - 1.0).abs() < 1e-4);
    }
    assert!(rot.x_axis.dot(rot.y_axis).abs() < 1e-4);
    assert!(rot.x_axis.dot(rot.z_axis).abs() < 1e-4);
}

#[test]
fn set_game_state_rejects_mode_mismatch() {
    let soccar = Arena::new(GameMode::Soccar, 120).unwrap();
    let mut hoops = Arena::new(GameMode::Hoops, 120).unwrap();

    let state = soccar.get_game_state();
    assert!(matches!(
        hoops.set_game_state(&state),
        Err(ArenaError::InvalidOperation(_))
    ));
}
