use glam::Vec3A;
use pitchsim::Team;
use pitchsim::sim::{Arena, ArenaConfig, CarConfig, CarControls, CarState, GameMode};

fn soccar_arena() -> Arena {
    let config = ArenaConfig {
        rng_seed: Some(0),
        ..Default::default()
    };
    Arena::new_with_config(GameMode::Soccar, config, 120).unwrap()
}

/// A freshly added car rests at the default spawn state.
#[test]
fn added_car_rests_at_spawn() {
    let mut arena = soccar_arena();
    let id = arena.add_car(Team::Blue, CarConfig::OCTANE);

    arena.step(30).unwrap();

    let state = arena.get_car(id).unwrap().get_state();
    assert!(state.phys.pos.x.abs() < 0.5);
    assert!(state.phys.pos.y.abs() < 0.5);
    assert!((state.phys.pos.z - 17.0).abs() < 0.5);
    assert!(state.is_on_ground);
    assert!(!state.has_jumped);
    assert!((state.boost - 100.0 / 3.0).abs() < 1e-3);
}

#[test]
fn ground_sense_follows_wheel_contacts() {
    let mut arena = soccar_arena();
    let id = arena.add_car(Team::Blue, CarConfig::OCTANE);
    arena.step(5).unwrap();

    let state = arena.get_car(id).unwrap().get_state();
    assert!(state.is_on_ground);
    assert!(state.wheels_with_contact.iter().all(|&contact| contact));

    // Lift the car well above the floor; every wheel loses contact.
    let mut airborne = *state;
    airborne.phys.pos = Vec3A::new(0.0, 0.0, 600.0);
    arena.set_car_state(id, &airborne).unwrap();
    arena.step(1).unwrap();

    let state = arena.get_car(id).unwrap().get_state();
    assert!(!state.is_on_ground);
    assert!(state.wheels_with_contact.iter().all(|&contact| !contact));
}

/// Jump fires on the rising edge of the jump input only; holding the
/// button does not re-jump. A second press in the air double-jumps.
#[test]
fn jump_is_edge_triggered_and_double_jump_works() {
    let mut arena = soccar_arena();
    let id = arena.add_car(Team::Blue, CarConfig::OCTANE);
    arena.step(10).unwrap();

    let jump_on = CarControls {
        jump: true,
        ..Default::default()
    };
    arena.set_car_controls(id, jump_on).unwrap();
    arena.step(1).unwrap();

    let state = arena.get_car(id).unwrap().get_state();
    assert!(state.has_jumped);
    assert!(state.is_jumping);

    // Held jump: no new jump event, still the same jump.
    arena.step(1).unwrap();
    let state = arena.get_car(id).unwrap().get_state();
    assert!(state.has_jumped);
    assert!(!state.has_double_jumped);

    // Release, wait in the air, press again: double jump.
    arena.set_car_controls(id, CarControls::default()).unwrap();
    arena.step(20).unwrap();

    let state = arena.get_car(id).unwrap().get_state();
    assert!(!state.is_on_ground);
    assert!(!state.has_double_jumped);

    arena.set_car_controls(id, jump_on).unwrap();
    arena.step(1).unwrap();

    let state = arena.get_car(id).unwrap().get_state();
    assert!(state.has_double_jumped);
    assert!(state.has_jumped);
}

/// A second jump press with a committed stick direction flips instead of
/// double-jumping.
#[test]
fn directional_second_jump_flips() {
    let mut arena = soccar_arena();
    let id = arena.add_car(Team::Blue, CarConfig::OCTANE);
    arena.step(10).unwrap();

    arena
        .set_car_controls(
            id,
            CarControls {
                jump: true,
                ..Default::default()
            },
        )
        .unwrap();
    arena.step(1).unwrap();

    arena.set_car_controls(id, CarControls::default()).unwrap();
    arena.step(20).unwrap();

    // Forward flip: full nose-down pitch plus jump.
    arena
        .set_car_controls(
            id,
            CarControls {
                jump: true,
                pitch: -1.0,
                ..Default::default()
            },
        )
        .unwrap();
    arena.step(1).unwrap();

    let state = arena.get_car(id).unwrap().get_state();
    assert!(state.has_flipped);
    assert!(state.is_flipping);
    assert!(!state.has_double_jumped);
    assert!(state.flip_rel_torque.y > 0.0);

    // The flip ends once the torque window elapses (or on landing).
    arena.step(90).unwrap();
    assert!(!arena.get_car(id).unwrap().get_state().is_flipping);
}

/// Flip state machine invariant: while flipping, the flip timer stays
/// inside the torque window.
#[test]
fn flip_time_stays_below_torque_window_while_flipping() {
    let mut arena = soccar_arena();
    let id = arena.add_car(Team::Blue, CarConfig::OCTANE);
    arena.step(10).unwrap();

    arena
        .set_car_controls(
            id,
            CarControls {
                jump: true,
                ..Default::default()
            },
        )
        .unwrap();
    arena.step(1).unwrap();
    arena.set_car_controls(id, CarControls::default()).unwrap();
    arena.step(15).unwrap();
    arena
        .set_car_controls(
            id,
            CarControls {
                jump: true,
                yaw: 1.0,
                ..Default::default()
            },
        )
        .unwrap();

    for _ in 0..120 {
        arena.step(1).unwrap();
        let state = arena.get_car(id).unwrap().get_state();
        if state.is_flipping {
            assert!(state.flip_time < 0.65);
            assert!(state.has_flipped);
        }
    }
}

#[test]
fn double_jump_implies_jump() {
    let mut arena = soccar_arena();
    let id = arena.add_car(Team::Blue, CarConfig::OCTANE);

    for tick in 0..180 {
        let jump = tick % 30 < 3;
        arena
            .set_car_controls(
                id,
                CarControls {
                    jump,
                    ..Default::default()
                },
            )
            .unwrap();
        arena.step(1).unwrap();

        let state = arena.get_car(id).unwrap().get_state();
        if state.has_double_jumped {
            assert!(state.has_jumped);
        }
    }
}

/// Supersonic entry at 2300 uu/s, hysteresis exit after slowing down.
#[test]
fn supersonic_entry_and_exit() {
    let mut arena = soccar_arena();
    let id = arena.add_car(Team::Blue, CarConfig::OCTANE);
    arena.step(5).unwrap();

    let mut state = *arena.get_car(id).unwrap().get_state();
    state.phys.vel = Vec3A::new(2300.0, 0.0, 17.0);
    arena.set_car_state(id, &state).unwrap();
    arena.step(5).unwrap();

    let state = arena.get_car(id).unwrap().get_state();
    assert!(state.is_supersonic);
    assert!(state.supersonic_time > 0.0);

    let mut slow = *state;
    slow.phys.vel = Vec3A::new(100.0, 0.0, 17.0);
    arena.set_car_state(id, &slow).unwrap();

    // Exit within the maintain window.
    let maintain_ticks = (1.0f32 * 120.0).ceil() as u32;
    arena.step(maintain_ticks).unwrap();
    assert!(!arena.get_car(id).unwrap().get_state().is_supersonic);
}

#[test]
fn boost_drains_while_boosting() {
    let mut arena = soccar_arena();
    let id = arena.add_car(Team::Blue, CarConfig::OCTANE);
    arena.step(5).unwrap();

    let start_boost = arena.get_car(id).unwrap().get_state().boost;
    arena
        .set_car_controls(
            id,
            CarControls {
                throttle: 1.0,
                boost: true,
                ..Default::default()
            },
        )
        .unwrap();
    arena.step(60).unwrap();

    let state = arena.get_car(id).unwrap().get_state();
    let expected = start_boost - 100.0 / 3.0 * 0.5;
    assert!((state.boost - expected).abs() < 0.5);

    // Boosting accelerates the car forward.
    assert!(state.phys.vel.x > 500.0);
}

#[test]
fn throttle_saturates_below_supersonic_without_boost() {
    let mut arena = soccar_arena();
    let id = arena.add_car(Team::Blue, CarConfig::OCTANE);
    arena.step(5).unwrap();

    arena
        .set_car_controls(
            id,
            CarControls {
                throttle: 1.0,
                ..Default::default()
            },
        )
        .unwrap();
    arena.step(600).unwrap();

    let speed = arena.get_car(id).unwrap().get_state().phys.vel.length();
    assert!(speed > 1000.0, "car should reach driving speed, got {speed}");
    assert!(speed < 2200.0, "no-boost top speed must stay subsonic, got {speed}");
}

#[test]
fn handbrake_value_rises_and_falls() {
    let mut arena = soccar_arena();
    let id = arena.add_car(Team::Blue, CarConfig::OCTANE);
    arena.step(5).unwrap();

    arena
        .set_car_controls(
            id,
            CarControls {
                handbrake: true,
                ..Default::default()
            },
        )
        .unwrap();
    arena.step(30).unwrap();
    let risen = arena.get_car(id).unwrap().get_state().handbrake_val;
    assert!(risen > 0.5);

    arena.set_car_controls(id, CarControls::default()).unwrap();
    arena.step(120).unwrap();
    assert_eq!(arena.get_car(id).unwrap().get_state().handbrake_val, 0.0);
}

#[test]
fn demolished_car_freezes_then_respawns_with_default_boost() {
    let mut arena = soccar_arena();
    let id = arena.add_car(Team::Blue, CarConfig::OCTANE);
    arena.step(5).unwrap();

    arena.demolish_car(id).unwrap();
    let state = arena.get_car(id).unwrap().get_state();
    assert!(state.is_demoed);
    assert!((state.demo_respawn_timer - 3.0).abs() < 1e-6);

    let frozen_pos = state.phys.pos;
    arena.step(60).unwrap();
    let state = arena.get_car(id).unwrap().get_state();
    assert!(state.is_demoed);
    assert_eq!(state.phys.pos.to_array(), frozen_pos.to_array());

    // Past the respawn delay the car is back on a respawn slot.
    arena.step(301).unwrap();
    let state = arena.get_car(id).unwrap().get_state();
    assert!(!state.is_demoed);
    assert!((state.boost - 100.0 / 3.0).abs() < 1e-3);
    assert!((state.phys.pos.y - -4608.0).abs() < 1.0);
}

#[test]
fn controls_clamp_coerces_analog_inputs() {
    let controls = CarControls {
        throttle: 3.0,
        steer: -7.5,
        pitch: 1.5,
        yaw: -1.5,
        roll: 0.25,
        ..Default::default()
    }
    .clamp();

    assert_eq!(controls.throttle, 1.0);
    assert_eq!(controls.steer, -1.0);
    assert_eq!(controls.pitch, 1.0);
    assert_eq!(controls.yaw, -1.0);
    assert_eq!(controls.roll, 0.25);
}

#[test]
fn steering_turns_the_car() {
    let mut arena = soccar_arena();
    let id = arena.add_car(Team::Blue, CarConfig::OCTANE);
    arena.step(5).unwrap();

    arena
        .set_car_controls(
            id,
            CarControls {
                throttle: 1.0,
                steer: 1.0,
                ..Default::default()
            },
        )
        .unwrap();
    arena.step(120).unwrap();

    let state = arena.get_car(id).unwrap().get_state();
    // After a second of full-lock throttle the nose is well off +X.
    assert!(state.phys.rot_mat.x_axis.x < 0.95);
    assert!(state.is_on_ground);
}

#[test]
fn set_state_resets_update_counter() {
    let mut arena = soccar_arena();
    let id = arena.add_car(Team::Blue, CarConfig::OCTANE);
    arena.step(25).unwrap();
    assert_eq!(
        arena.get_car(id).unwrap().get_state().tick_count_since_update,
        25
    );

    let state = CarState::default();
    arena.set_car_state(id, &state).unwrap();
    assert_eq!(
        arena.get_car(id).unwrap().get_state().tick_count_since_update,
        0
    );
}
