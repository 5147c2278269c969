use glam::Vec3A;
use pitchsim::Team;
use pitchsim::sim::{
    Arena, ArenaConfig, BallState, CarConfig, GameMode, LinearPieceCurve, TileState,
};

fn seeded(game_mode: GameMode) -> Arena {
    let config = ArenaConfig {
        rng_seed: Some(0),
        ..Default::default()
    };
    Arena::new_with_config(game_mode, config, 120).unwrap()
}

fn park_ball_on_car(arena: &mut Arena, approach_vel: Vec3A) {
    let mut ball = BallState::default();
    ball.phys.pos = Vec3A::new(130.0, 0.0, 60.0);
    ball.phys.vel = approach_vel;
    arena.set_ball_state(ball);
}

#[test]
fn curve_interpolates_and_clamps() {
    let curve = LinearPieceCurve::new([(0.0, 1.0), (1400.0, 0.1), (1410.0, 0.0)]);

    assert_eq!(curve.get_output(-50.0), 1.0);
    assert_eq!(curve.get_output(0.0), 1.0);
    assert_eq!(curve.get_output(1410.0), 0.0);
    assert_eq!(curve.get_output(9999.0), 0.0);

    let mid = curve.get_output(700.0);
    assert!((mid - 0.55).abs() < 1e-4);
}

#[test]
fn degenerate_curve_segment_returns_lower_endpoint() {
    let curve = LinearPieceCurve::new([(1.0, 2.0), (1.0, 5.0), (3.0, 7.0)]);
    assert_eq!(curve.get_output(1.0), 2.0);
    assert_eq!(curve.get_output(0.5), 2.0);
}

#[test]
fn angle_round_trips_through_rotation_matrix() {
    use pitchsim::Angle;

    for (yaw, pitch, roll) in [
        (0.0, 0.0, 0.0),
        (1.2, 0.4, -0.9),
        (-2.5, -0.7, 0.3),
        (3.0, 1.0, 3.0),
    ] {
        let angle = Angle::new(yaw, pitch, roll);
        let back = Angle::from_rot_mat(angle.to_rot_mat());

        let matrix_delta = angle.to_rot_mat() - back.to_rot_mat();
        let max_abs = matrix_delta
            .to_cols_array()
            .iter()
            .fold(0.0f32, |acc, v| acc.max(v.abs()));
        assert!(max_abs < 1e-4, "round trip drifted by {max_abs}");
    }
}

#[test]
fn heatseeker_targets_the_toucher_opponent_net() {
    let mut arena = seeded(GameMode::Heatseeker);
    let blue = arena.add_car(Team::Blue, CarConfig::OCTANE);
    arena.step(5).unwrap();

    assert_eq!(arena.get_ball_state().hs_info.y_target_dir, 0.0);

    park_ball_on_car(&mut arena, Vec3A::new(-500.0, 0.0, 0.0));
    arena.step(5).unwrap();

    let state = arena.get_ball_state();
    assert_eq!(state.last_hit_car_id, blue);
    // A blue touch sends the ball at the orange net (+y).
    assert_eq!(state.hs_info.y_target_dir, 1.0);
}

#[test]
fn heatseeker_ball_accelerates_toward_its_target() {
    let mut arena = seeded(GameMode::Heatseeker);
    arena.add_car(Team::Blue, CarConfig::OCTANE);
    arena.step(5).unwrap();

    park_ball_on_car(&mut arena, Vec3A::new(-500.0, 0.0, 0.0));
    arena.step(5).unwrap();
    assert_eq!(arena.get_ball_state().hs_info.y_target_dir, 1.0);

    arena.step(120).unwrap();
    let state = arena.get_ball_state();
    assert!(
        state.phys.vel.y > 500.0,
        "target-locked ball should fly toward +y, vel = {:?}",
        state.phys.vel
    );
}

#[test]
fn snowday_puck_parameters_apply() {
    let arena = seeded(GameMode::Snowday);
    let mutator = arena.mutator_config();

    assert_eq!(mutator.ball_mass, 50.0);
    assert_eq!(mutator.ball_radius, 114.25);
    assert!(mutator.recharge_boost_enabled);
}

#[test]
fn snowday_puck_hugs_the_ice() {
    let mut arena = seeded(GameMode::Snowday);

    let mut puck = BallState::default();
    puck.phys.pos = Vec3A::new(0.0, 0.0, 114.3);
    puck.phys.vel = Vec3A::new(800.0, 0.0, 0.0);
    arena.set_ball_state(puck);

    arena.step(240).unwrap();

    let state = arena.get_ball_state();
    assert!(
        state.phys.pos.z < 130.0,
        "puck should stay on the ice, z = {}",
        state.phys.pos.z
    );
}

#[test]
fn dropshot_has_no_pads_and_full_spawn_boost() {
    let arena = seeded(GameMode::Dropshot);
    assert!(arena.get_boost_pads().is_empty());
    assert_eq!(arena.mutator_config().car_spawn_boost_amount, 100.0);

    let tiles = arena.get_dropshot_tiles_state().unwrap();
    assert_eq!(tiles.tiles[0].len(), 70);
    assert_eq!(tiles.tiles[1].len(), 70);
    assert!(
        tiles.tiles[0]
            .iter()
            .all(|tile| tile.state == TileState::Full)
    );
}

#[test]
fn dropshot_charge_builds_from_hard_touches() {
    let mut arena = seeded(GameMode::Dropshot);
    arena.add_car(Team::Blue, CarConfig::OCTANE);
    arena.step(5).unwrap();

    // Drive the ball into the car hard enough to charge it.
    let mut ball = BallState::default();
    ball.phys.pos = Vec3A::new(140.0, 0.0, 70.0);
    ball.phys.vel = Vec3A::new(-3000.0, 0.0, 0.0);
    arena.set_ball_state(ball);
    arena.step(5).unwrap();

    let ds = arena.get_ball_state().ds_info;
    assert!(ds.accumulated_hit_force > 0.0);
    assert!(ds.charge_level >= 2);
    // A blue touch arms the orange half.
    assert_eq!(ds.y_target_dir, 1.0);
}

#[test]
fn hoops_uses_its_own_goal_geometry() {
    let mut arena = seeded(GameMode::Hoops);

    // High ball above the rim: not scored.
    let mut ball = BallState::default();
    ball.phys.pos = Vec3A::new(0.0, 3000.0, 800.0);
    arena.set_ball_state(ball);
    assert!(!arena.is_ball_scored());

    // Ball below the score height inside the rim radius.
    let mut ball = BallState::default();
    ball.phys.pos = Vec3A::new(0.0, 3077.0, 100.0);
    arena.set_ball_state(ball);
    assert!(arena.is_ball_scored());
}

#[test]
fn shot_prediction_overestimates_straight_shots() {
    let mut arena = seeded(GameMode::Soccar);

    let mut ball = BallState::default();
    ball.phys.pos = Vec3A::new(0.0, 3000.0, 400.0);
    ball.phys.vel = Vec3A::new(0.0, 3000.0, 0.0);
    arena.set_ball_state(ball);

    assert_eq!(arena.is_ball_probably_going_in(2.0, 0.0), Some(Team::Blue));

    // A shot drifting far wide of the posts is not called.
    let mut wide = BallState::default();
    wide.phys.pos = Vec3A::new(3000.0, 3000.0, 400.0);
    wide.phys.vel = Vec3A::new(500.0, 3000.0, 0.0);
    arena.set_ball_state(wide);
    assert_eq!(arena.is_ball_probably_going_in(2.0, 0.0), None);

    // Too slow to arrive inside the horizon.
    let mut slow = BallState::default();
    slow.phys.pos = Vec3A::new(0.0, 0.0, 400.0);
    slow.phys.vel = Vec3A::new(0.0, 100.0, 0.0);
    arena.set_ball_state(slow);
    assert_eq!(arena.is_ball_probably_going_in(2.0, 0.0), None);
}

#[test]
fn mode_names_are_stable() {
    assert_eq!(GameMode::Soccar.name(), "soccar");
    assert_eq!(GameMode::Hoops.name(), "hoops");
    assert_eq!(GameMode::Heatseeker.name(), "heatseeker");
    assert_eq!(GameMode::Snowday.name(), "snowday");
    assert_eq!(GameMode::Dropshot.name(), "dropshot");
    assert_eq!(GameMode::TheVoid.name(), "void");
}
