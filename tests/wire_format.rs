use glam::Vec3A;
use pitchsim::Team;
use pitchsim::sim::{Arena, ArenaConfig, BallState, CarConfig, GameMode, GameState};

fn snapshot_arena() -> Arena {
    let config = ArenaConfig {
        rng_seed: Some(0),
        ..Default::default()
    };
    let mut arena = Arena::new_with_config(GameMode::Soccar, config, 120).unwrap();
    arena.add_car(Team::Blue, CarConfig::OCTANE);
    arena.add_car(Team::Orange, CarConfig::DOMINUS);

    let mut ball = BallState::default();
    ball.phys.pos = Vec3A::new(120.0, -640.0, 250.0);
    ball.phys.vel = Vec3A::new(-75.0, 310.0, 42.0);
    arena.set_ball_state(ball);
    arena.step(30).unwrap();
    arena
}

#[test]
fn header_layout_is_fixed_little_endian() {
    let arena = snapshot_arena();
    let bytes = arena.get_game_state().to_bytes();

    // u64 tick count, f32 tick rate, u8 mode, u32 pads, u32 cars.
    assert_eq!(u64::from_le_bytes(bytes[0..8].try_into().unwrap()), 30);
    let tick_rate = f32::from_le_bytes(bytes[8..12].try_into().unwrap());
    assert!((tick_rate - 120.0).abs() < 1e-3);
    assert_eq!(bytes[12], 0);
    assert_eq!(u32::from_le_bytes(bytes[13..17].try_into().unwrap()), 34);
    assert_eq!(u32::from_le_bytes(bytes[17..21].try_into().unwrap()), 2);

    // Ball block: pos(12) + rotmat(36) + vel(12) + ang vel(12) +
    // heatseeker triple(12) = 84 bytes; then 18 bytes per pad.
    let ball_pos_x = f32::from_le_bytes(bytes[21..25].try_into().unwrap());
    assert_eq!(ball_pos_x, arena.get_ball_state().phys.pos.x);

    let pads_offset = 21 + 84;
    let cars_offset = pads_offset + 34 * 18;
    assert!(bytes.len() > cars_offset);

    // First pad record starts with its is_active byte.
    assert_eq!(bytes[pads_offset], 1);
}

#[test]
fn byte_layout_round_trips() {
    let arena = snapshot_arena();
    let state = arena.get_game_state();

    let parsed = GameState::from_bytes(&state.to_bytes()).unwrap();

    assert_eq!(parsed.tick_count, state.tick_count);
    assert_eq!(parsed.game_mode, state.game_mode);
    assert_eq!(parsed.pads.len(), state.pads.len());
    assert_eq!(parsed.cars.len(), state.cars.len());

    assert_eq!(
        parsed.ball.phys.pos.to_array(),
        state.ball.phys.pos.to_array()
    );
    assert_eq!(
        parsed.ball.phys.vel.to_array(),
        state.ball.phys.vel.to_array()
    );

    for (a, b) in parsed.cars.iter().zip(&state.cars) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.team, b.team);
        assert_eq!(a.state.phys.pos.to_array(), b.state.phys.pos.to_array());
        assert_eq!(a.state.boost, b.state.boost);
        assert_eq!(a.state.is_on_ground, b.state.is_on_ground);
        assert_eq!(a.config.hitbox_size.to_array(), b.config.hitbox_size.to_array());
        assert_eq!(a.config.dodge_deadzone, b.config.dodge_deadzone);
    }

    for (a, b) in parsed.pads.iter().zip(&state.pads) {
        assert_eq!(a.config.pos.to_array(), b.config.pos.to_array());
        assert_eq!(a.config.is_big, b.config.is_big);
        assert_eq!(a.state.is_active, b.state.is_active);
    }
}

#[test]
fn snapshot_persists_to_disk() {
    let arena = snapshot_arena();
    let state = arena.get_game_state();

    let path = std::env::temp_dir().join("pitchsim_snapshot_test.bin");
    state.save(&path).unwrap();
    let loaded = GameState::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.tick_count, state.tick_count);
    assert_eq!(loaded.cars.len(), state.cars.len());
    assert_eq!(
        loaded.ball.phys.pos.to_array(),
        state.ball.phys.pos.to_array()
    );
}

#[test]
fn state_transfer_between_arenas() {
    let source = snapshot_arena();
    let state = source.get_game_state();

    let config = ArenaConfig {
        rng_seed: Some(9),
        ..Default::default()
    };
    let mut target = Arena::new_with_config(GameMode::Soccar, config, 120).unwrap();
    target.add_car(Team::Blue, CarConfig::OCTANE);
    target.add_car(Team::Orange, CarConfig::DOMINUS);

    target.set_game_state(&state).unwrap();

    assert_eq!(
        target.get_ball_state().phys.pos.to_array(),
        state.ball.phys.pos.to_array()
    );
    for (car, info) in target.get_cars().iter().zip(&state.cars) {
        assert_eq!(
            car.get_state().phys.pos.to_array(),
            info.state.phys.pos.to_array()
        );
    }
}
