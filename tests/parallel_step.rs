use glam::Vec3A;
use pitchsim::parallel::multi_step;
use pitchsim::sim::{Arena, ArenaConfig, BallState, CarConfig, CarControls, GameMode};
use pitchsim::{ArenaError, Team};

fn build_arena(seed: u64) -> Arena {
    let config = ArenaConfig {
        rng_seed: Some(seed),
        ..Default::default()
    };
    let mut arena = Arena::new_with_config(GameMode::Soccar, config, 120).unwrap();

    let id = arena.add_car(Team::Blue, CarConfig::OCTANE);
    arena
        .set_car_controls(
            id,
            CarControls {
                throttle: 1.0,
                steer: 0.1 * seed as f32,
                boost: true,
                ..Default::default()
            },
        )
        .unwrap();

    let mut ball = BallState::default();
    ball.phys.vel = Vec3A::new(100.0 + seed as f32, -50.0, 200.0);
    arena.set_ball_state(ball);

    arena
}

/// Parallel stepping matches sequential stepping bitwise: each arena's
/// work is identical, whichever thread runs it.
#[test]
fn multi_step_matches_sequential() {
    let mut parallel: Vec<Arena> = (0..8).map(build_arena).collect();
    let mut sequential: Vec<Arena> = (0..8).map(build_arena).collect();

    multi_step(&mut parallel, 100).unwrap();
    for arena in &mut sequential {
        arena.step(100).unwrap();
    }

    for (par, seq) in parallel.iter().zip(&sequential) {
        assert_eq!(par.tick_count(), 100);

        let par_ball = par.get_ball_state().phys.pos;
        let seq_ball = seq.get_ball_state().phys.pos;
        assert_eq!(
            par_ball.to_array().map(f32::to_bits),
            seq_ball.to_array().map(f32::to_bits)
        );

        let par_car = par.get_cars()[0].get_state().phys.pos;
        let seq_car = seq.get_cars()[0].get_state().phys.pos;
        assert_eq!(
            par_car.to_array().map(f32::to_bits),
            seq_car.to_array().map(f32::to_bits)
        );
    }
}

#[test]
fn small_batches_run_sequentially() {
    let mut arenas: Vec<Arena> = (0..3).map(build_arena).collect();
    multi_step(&mut arenas, 10).unwrap();

    for arena in &arenas {
        assert_eq!(arena.tick_count(), 10);
    }
}

#[test]
fn empty_batch_is_a_no_op() {
    let mut arenas: Vec<Arena> = Vec::new();
    multi_step(&mut arenas, 100).unwrap();
}

/// A failing callback in one arena surfaces exactly one error; the other
/// arenas keep their full tick advance.
#[test]
fn callback_failure_is_raised_once_others_complete() {
    let mut arenas: Vec<Arena> = (0..6).map(build_arena).collect();

    // Arena 2 gets a ball-touch callback that fails, and a ball parked
    // on the car so it fires immediately.
    arenas[2].set_ball_touch_callback(
        Box::new(|_, _, _| Err("rollout observer failed".into())),
        Box::new(()),
    );
    let mut ball = BallState::default();
    ball.phys.pos = Vec3A::new(130.0, 0.0, 60.0);
    ball.phys.vel = Vec3A::new(-300.0, 0.0, 0.0);
    arenas[2].set_ball_state(ball);

    let result = multi_step(&mut arenas, 50);
    assert!(matches!(result, Err(ArenaError::CallbackFailure(_))));

    for (i, arena) in arenas.iter_mut().enumerate() {
        if i == 2 {
            // Stopped at the failing tick; error already surfaced.
            assert!(arena.tick_count() < 50);
            arena.step(1).unwrap();
        } else {
            assert_eq!(arena.tick_count(), 50);
        }
    }
}
