//! Fixed-layout tensor export for RL consumers.
//!
//! Every call produces the same shapes for the same arena: one ball row
//! of 18 floats, one 26-float row per car in ascending-id order, one
//! float per pad in canonical pad order, plus scores, tick count and the
//! parallel `car_ids`/`car_teams` lists. The inverted variant doubles
//! each ball/car row with the opposing team's frame of reference
//! (x and y negated, z preserved).

use crate::sim::{Arena, CarState, PhysState};

/// Floats per ball row: pos, vel, ang_vel, then the three rotation
/// basis vectors.
pub const BALL_ROW_LEN: usize = 18;
/// Floats per car row: the 18 physics floats plus boost and seven flags.
pub const CAR_ROW_LEN: usize = 26;

/// Snapshot tensors with caller-owned backing buffers. Reuse one across
/// calls via [`Arena::write_gym_state`] to avoid reallocation.
#[derive(Clone, Debug, Default)]
pub struct GymState {
    /// `(18,)` flat, or `(2, 18)` row-major when inverted.
    pub ball: Vec<f32>,
    /// `(N, 26)` flat, or `(N, 2, 26)` row-major when inverted.
    pub cars: Vec<f32>,
    /// `(num_pads,)`: 1.0 for an active pad, else 0.0.
    pub pads: Vec<f32>,
    /// Ascending car ids, parallel to the car rows.
    pub car_ids: Vec<u32>,
    /// Team per car: 0 blue, 1 orange.
    pub car_teams: Vec<u8>,
    pub blue_score: u32,
    pub orange_score: u32,
    pub tick_count: u64,
    /// Whether each ball/car row is doubled with its inverted view.
    pub inverted: bool,
}

fn push_phys_row(out: &mut Vec<f32>, phys: &PhysState) {
    out.extend_from_slice(&phys.pos.to_array());
    out.extend_from_slice(&phys.vel.to_array());
    out.extend_from_slice(&phys.ang_vel.to_array());
    out.extend_from_slice(&phys.rot_mat.x_axis.to_array());
    out.extend_from_slice(&phys.rot_mat.y_axis.to_array());
    out.extend_from_slice(&phys.rot_mat.z_axis.to_array());
}

fn push_car_row(out: &mut Vec<f32>, phys: &PhysState, state: &CarState, ball_touched: bool) {
    push_phys_row(out, phys);
    out.push(state.boost);
    out.push(f32::from(state.is_on_ground));
    out.push(f32::from(state.has_jumped));
    out.push(f32::from(state.has_double_jumped));
    out.push(f32::from(state.has_flipped));
    out.push(f32::from(state.is_demoed));
    out.push(f32::from(state.is_supersonic));
    out.push(f32::from(ball_touched));
}

impl Arena {
    /// Export the current snapshot into a fresh [`GymState`].
    #[must_use]
    pub fn get_gym_state(&mut self, inverted: bool) -> GymState {
        let mut out = GymState::default();
        self.write_gym_state(&mut out, inverted);
        out
    }

    /// Export the current snapshot into a reusable buffer. The call also
    /// advances the touch horizon: `ball_touched` in the car rows means
    /// touched since the previous snapshot call.
    pub fn write_gym_state(&mut self, out: &mut GymState, inverted: bool) {
        out.inverted = inverted;
        out.blue_score = self.blue_score();
        out.orange_score = self.orange_score();
        out.tick_count = self.tick_count();

        out.ball.clear();
        let ball_phys = self.get_ball_state().phys;
        push_phys_row(&mut out.ball, &ball_phys);
        if inverted {
            push_phys_row(&mut out.ball, &ball_phys.get_inverted_y());
        }

        out.cars.clear();
        out.car_ids.clear();
        out.car_teams.clear();

        let last_snapshot_tick = self.last_snapshot_tick;
        for &id in self.car_ids() {
            let car = &self.cars[&id];
            let state = car.get_state();

            let ball_touched = state
                .ball_hit_info
                .is_some_and(|hit| hit.tick_count_when_hit >= last_snapshot_tick);

            push_car_row(&mut out.cars, &state.phys, state, ball_touched);
            if inverted {
                push_car_row(&mut out.cars, &state.phys.get_inverted_y(), state, ball_touched);
            }

            out.car_ids.push(id);
            out.car_teams.push(car.team as u8);
        }

        out.pads.clear();
        out.pads.extend(
            self.get_boost_pads()
                .iter()
                .map(|pad| f32::from(pad.get_state().is_active)),
        );

        self.last_snapshot_tick = self.tick_count();
    }
}
