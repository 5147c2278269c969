use glam::{Affine3A, Mat3A, Vec3A};

use super::{GameMode, MutatorConfig, PhysState, UserInfoType};
use crate::consts::{self, dropshot, heatseeker, snowday};
use crate::dynamics::{DynamicsWorld, RigidBody, RigidBodyConstructionInfo, Shape};

#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeatseekerInfo {
    /// Which net the ball seeks: -1 blue side, +1 orange side, 0 none.
    pub y_target_dir: f32,
    pub cur_target_speed: f32,
    pub time_since_hit: f32,
}

impl Default for HeatseekerInfo {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl HeatseekerInfo {
    pub const DEFAULT: Self = Self {
        y_target_dir: 0.0,
        cur_target_speed: heatseeker::INITIAL_TARGET_SPEED,
        time_since_hit: 0.0,
    };
}

#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropshotInfo {
    /// Damage radius control: 1 breaks 1 tile, 2 breaks 7, 3 breaks 19.
    pub charge_level: i32,
    /// Accumulated approach speed; resets when a tile is damaged.
    pub accumulated_hit_force: f32,
    /// Which half the ball can damage (0 none, -1 blue, +1 orange).
    pub y_target_dir: f32,
    pub has_damaged: bool,
    /// Only valid if `has_damaged`.
    pub last_damage_tick: u64,
}

impl Default for DropshotInfo {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl DropshotInfo {
    pub const DEFAULT: Self = Self {
        charge_level: 1,
        accumulated_hit_force: 0.0,
        y_target_dir: 0.0,
        has_damaged: false,
        last_damage_tick: 0,
    };
}

#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BallState {
    pub phys: PhysState,
    /// Id of the car that last touched the ball; 0 means untouched.
    pub last_hit_car_id: u32,
    pub hs_info: HeatseekerInfo,
    pub ds_info: DropshotInfo,
}

impl Default for BallState {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl BallState {
    pub const DEFAULT: Self = Self {
        phys: PhysState {
            pos: Vec3A::new(0.0, 0.0, consts::ball::REST_Z),
            rot_mat: Mat3A::IDENTITY,
            vel: Vec3A::ZERO,
            ang_vel: Vec3A::ZERO,
        },
        last_hit_car_id: 0,
        hs_info: HeatseekerInfo::DEFAULT,
        ds_info: DropshotInfo::DEFAULT,
    };
}

pub struct Ball {
    pub(crate) state: BallState,
    pub(crate) rigid_body_idx: usize,
    /// Extra velocity accumulated during dispatch, applied after the
    /// physics step so gameplay never mutates mid-solve.
    pub(crate) velocity_impulse_cache: Vec3A,
    pub(crate) ground_stick_applied: bool,
    /// Kickoff pop countdown for hoops/dropshot.
    pub(crate) launch_countdown: Option<f32>,
}

impl Ball {
    pub(crate) fn new(
        game_mode: GameMode,
        world: &mut DynamicsWorld,
        mutator_config: &MutatorConfig,
        no_rot: bool,
    ) -> Self {
        let shape = Shape::Sphere {
            radius: mutator_config.ball_radius,
        };

        let mut info = RigidBodyConstructionInfo::new(mutator_config.ball_mass, shape);
        info.start_world_transform.translation = Vec3A::new(0.0, 0.0, consts::ball::REST_Z);
        info.linear_damping = mutator_config.ball_drag;
        info.friction = mutator_config.ball_world_friction;
        info.restitution = mutator_config.ball_world_restitution;
        info.no_rot = no_rot && game_mode != GameMode::Snowday;

        let mut body = RigidBody::new(info);
        body.user_index = UserInfoType::Ball as i32;

        let rigid_body_idx = world.add_rigid_body(body);

        Self {
            state: BallState::DEFAULT,
            rigid_body_idx,
            velocity_impulse_cache: Vec3A::ZERO,
            ground_stick_applied: false,
            launch_countdown: None,
        }
    }

    #[must_use]
    pub const fn get_state(&self) -> &BallState {
        &self.state
    }

    pub(crate) fn set_state(&mut self, rb: &mut RigidBody, state: BallState) {
        rb.set_world_transform(Affine3A {
            matrix3: state.phys.rot_mat,
            translation: state.phys.pos,
        });
        rb.linear_velocity = state.phys.vel;
        rb.angular_velocity = state.phys.ang_vel;

        self.velocity_impulse_cache = Vec3A::ZERO;
        self.state = state;
    }

    pub(crate) fn pre_tick_update(&mut self, game_mode: GameMode, rb: &mut RigidBody, tick_time: f32) {
        match game_mode {
            GameMode::Heatseeker => self.heatseeker_tick(rb, tick_time),
            GameMode::Snowday => self.ground_stick_applied = false,
            GameMode::Hoops | GameMode::Dropshot => {
                if let Some(remaining) = &mut self.launch_countdown {
                    *remaining -= tick_time;
                    if *remaining <= 0.0 {
                        rb.linear_velocity.z += dropshot::BALL_LAUNCH_Z_VEL;
                        self.launch_countdown = None;
                    }
                }
            }
            _ => {}
        }
    }

    /// Steer a target-locked heatseeker ball toward the net.
    fn heatseeker_tick(&mut self, rb: &mut RigidBody, tick_time: f32) {
        let hs = &mut self.state.hs_info;
        hs.time_since_hit += tick_time;

        if hs.y_target_dir == 0.0 {
            return;
        }

        let speed = rb.linear_velocity.length();
        if speed < 1e-6 {
            return;
        }

        let pos = rb.world_transform.translation;
        let target = Vec3A::new(
            0.0,
            heatseeker::TARGET_Y * hs.y_target_dir,
            heatseeker::TARGET_Z,
        );
        let to_target = (target - pos).normalize_or_zero();
        if to_target == Vec3A::ZERO {
            return;
        }

        let dir = rb.linear_velocity / speed;

        let cur_yaw = dir.y.atan2(dir.x);
        let target_yaw = to_target.y.atan2(to_target.x);
        let mut yaw_delta = target_yaw - cur_yaw;
        if yaw_delta > core::f32::consts::PI {
            yaw_delta -= core::f32::consts::TAU;
        } else if yaw_delta < -core::f32::consts::PI {
            yaw_delta += core::f32::consts::TAU;
        }

        let cur_pitch = dir.z.clamp(-1.0, 1.0).asin();
        let target_pitch = to_target.z.clamp(-1.0, 1.0).asin();

        let new_yaw = cur_yaw + yaw_delta * (heatseeker::HORIZONTAL_BLEND * tick_time).min(1.0);
        let new_pitch = (cur_pitch
            + (target_pitch - cur_pitch) * (heatseeker::VERTICAL_BLEND * tick_time).min(1.0))
        .clamp(-heatseeker::MAX_TURN_PITCH, heatseeker::MAX_TURN_PITCH);

        let new_speed = speed
            + (hs.cur_target_speed - speed) * (heatseeker::SPEED_BLEND * tick_time).min(1.0);

        let (sin_pitch, cos_pitch) = new_pitch.sin_cos();
        let (sin_yaw, cos_yaw) = new_yaw.sin_cos();
        rb.linear_velocity =
            Vec3A::new(cos_yaw * cos_pitch, sin_yaw * cos_pitch, sin_pitch) * new_speed;
    }

    /// Snowday pucks hug the ice: a grounded, slow-falling puck gets
    /// pressed down once per tick.
    pub(crate) fn snowday_ground_stick(&mut self, rb: &mut RigidBody, mutator: &MutatorConfig) {
        if self.ground_stick_applied {
            return;
        }

        let near_ground = rb.world_transform.translation.z < mutator.ball_radius + 5.0;
        if near_ground && rb.linear_velocity.z.abs() < snowday::PUCK_STICK_VEL_THRESH {
            rb.apply_central_force(Vec3A::new(
                0.0,
                0.0,
                -snowday::PUCK_GROUND_STICK_ACCEL * rb.get_mass(),
            ));
            self.ground_stick_applied = true;
        }
    }

    /// Apply deferred impulses and speed caps, then copy the body state
    /// out for readers.
    pub(crate) fn finish_physics_tick(&mut self, rb: &mut RigidBody, mutator: &MutatorConfig) {
        if self.velocity_impulse_cache != Vec3A::ZERO {
            rb.linear_velocity += self.velocity_impulse_cache;
            self.velocity_impulse_cache = Vec3A::ZERO;
        }

        let max_speed = mutator.ball_max_speed;
        if rb.linear_velocity.length_squared() > max_speed * max_speed {
            rb.linear_velocity = rb.linear_velocity.normalize() * max_speed;
        }

        if rb.angular_velocity.length_squared()
            > consts::ball::MAX_ANG_SPEED * consts::ball::MAX_ANG_SPEED
        {
            rb.angular_velocity = rb.angular_velocity.normalize() * consts::ball::MAX_ANG_SPEED;
        }

        self.state.phys.pos = rb.world_transform.translation;
        self.state.phys.rot_mat = rb.world_transform.matrix3;
        self.state.phys.vel = rb.linear_velocity;
        self.state.phys.ang_vel = rb.angular_velocity;
    }
}
