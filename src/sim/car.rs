use std::f32::consts::PI;

use arrayvec::ArrayVec;
use fastrand::Rng;
use glam::{Affine3A, EulerRot, Mat3A, Vec3A};

use super::{CarConfig, CarControls, CarState, GameMode, MutatorConfig, Team, UserInfoType};
use crate::consts::{
    self, GRAVITY_Z,
    car::{air_control, autoflip, autoroll, boost, drive, flip, jump, supersonic},
    curves, suspension,
};
use crate::dynamics::{DynamicsWorld, RigidBody, RigidBodyConstructionInfo, Shape, Wheel};

/// Per-car match statistics, cleared on kickoff reset and car removal.
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarStats {
    pub goals: u32,
    pub demos: u32,
    pub boost_pickups: u32,
}

pub struct Car {
    pub id: u32,
    pub team: Team,
    config: CarConfig,
    pub(crate) rigid_body_idx: usize,
    pub(crate) wheels: ArrayVec<Wheel, 4>,
    pub(crate) velocity_impulse_cache: Vec3A,
    pub(crate) internal_state: CarState,
    pub(crate) stats: CarStats,
}

impl Car {
    pub(crate) fn new(
        id: u32,
        team: Team,
        world: &mut DynamicsWorld,
        mutator_config: &MutatorConfig,
        config: CarConfig,
    ) -> Self {
        let shape = Shape::Box {
            half_extents: config.hitbox_size * 0.5,
        };

        let mut info = RigidBodyConstructionInfo::new(mutator_config.car_mass, shape);
        info.friction = mutator_config.car_world_friction;
        info.restitution = mutator_config.car_world_restitution;
        info.shape_offset = config.hitbox_pos_offset;

        let mut body = RigidBody::new(info);
        body.user_index = UserInfoType::Car as i32;
        body.user_pointer = u64::from(id);

        let rigid_body_idx = world.add_rigid_body(body);

        let mut wheels = ArrayVec::new();
        for i in 0..4 {
            let front = i < 2;
            let left = i % 2 != 0;

            let pair = if front {
                &config.front_wheels
            } else {
                &config.back_wheels
            };

            let mut connection = pair.connection_point_offset;
            if left {
                connection.y *= -1.0;
            }

            let force_scale = if front {
                suspension::FORCE_SCALE_FRONT
            } else {
                suspension::FORCE_SCALE_BACK
            };

            wheels.push(Wheel::new(
                connection,
                pair.suspension_rest_length,
                pair.wheel_radius,
                force_scale,
            ));
        }

        Self {
            id,
            team,
            config,
            rigid_body_idx,
            wheels,
            velocity_impulse_cache: Vec3A::ZERO,
            internal_state: CarState {
                boost: mutator_config.car_spawn_boost_amount,
                ..Default::default()
            },
            stats: CarStats::default(),
        }
    }

    /// Forward direction as a unit vector.
    #[must_use]
    pub const fn get_forward_dir(&self) -> Vec3A {
        self.internal_state.phys.rot_mat.x_axis
    }

    /// Rightward direction as a unit vector.
    #[must_use]
    pub const fn get_right_dir(&self) -> Vec3A {
        self.internal_state.phys.rot_mat.y_axis
    }

    /// Upward direction as a unit vector.
    #[must_use]
    pub const fn get_up_dir(&self) -> Vec3A {
        self.internal_state.phys.rot_mat.z_axis
    }

    #[must_use]
    pub const fn get_config(&self) -> &CarConfig {
        &self.config
    }

    #[must_use]
    pub const fn get_state(&self) -> &CarState {
        &self.internal_state
    }

    #[must_use]
    pub const fn get_controls(&self) -> &CarControls {
        &self.internal_state.controls
    }

    pub const fn set_controls(&mut self, controls: CarControls) {
        self.internal_state.controls = controls;
    }

    #[must_use]
    pub const fn get_stats(&self) -> &CarStats {
        &self.stats
    }

    pub const fn demolish(&mut self, respawn_delay: f32) {
        self.internal_state.is_demoed = true;
        self.internal_state.demo_respawn_timer = respawn_delay;
    }

    pub(crate) fn set_state(&mut self, rb: &mut RigidBody, state: &CarState) {
        rb.set_world_transform(Affine3A {
            matrix3: state.phys.rot_mat,
            translation: state.phys.pos,
        });
        rb.linear_velocity = state.phys.vel;
        rb.angular_velocity = state.phys.ang_vel;

        self.velocity_impulse_cache = Vec3A::ZERO;
        self.internal_state = *state;
        self.internal_state.tick_count_since_update = 0;
    }

    /// Respawn after demolition: team-side slot, default boost, fresh
    /// state machine.
    pub(crate) fn respawn(
        &mut self,
        rb: &mut RigidBody,
        rng: &mut Rng,
        game_mode: GameMode,
        boost_amount: f32,
    ) {
        let respawn_locations = consts::car::spawn::get_respawn_locations(game_mode);
        let spawn_pos = respawn_locations[rng.usize(0..respawn_locations.len())];

        let yaw = spawn_pos.yaw_ang + if self.team == Team::Blue { 0.0 } else { PI };
        let new_state = CarState {
            phys: super::PhysState {
                pos: Vec3A::new(
                    spawn_pos.x,
                    spawn_pos.y * -self.team.get_y_dir(),
                    consts::car::spawn::SPAWN_Z,
                ),
                rot_mat: Mat3A::from_euler(EulerRot::ZYX, yaw, 0.0, 0.0),
                vel: Vec3A::ZERO,
                ang_vel: Vec3A::ZERO,
            },
            boost: boost_amount,
            ..Default::default()
        };

        self.set_state(rb, &new_state);
    }

    pub(crate) fn pre_tick_update(
        &mut self,
        world: &mut DynamicsWorld,
        rng: &mut Rng,
        game_mode: GameMode,
        tick_time: f32,
        mutator_config: &MutatorConfig,
    ) {
        {
            let rb = &mut world.bodies_mut()[self.rigid_body_idx];

            if self.internal_state.is_demoed {
                self.internal_state.demo_respawn_timer =
                    (self.internal_state.demo_respawn_timer - tick_time).max(0.0);
                if self.internal_state.demo_respawn_timer == 0.0 {
                    self.internal_state.is_demoed = false;
                    self.respawn(rb, rng, game_mode, mutator_config.car_spawn_boost_amount);
                } else {
                    rb.disable_simulation = true;
                    rb.no_contact_response = true;
                    return;
                }
            }

            rb.disable_simulation = false;
            rb.no_contact_response = false;

            self.internal_state.controls = self.internal_state.controls.clamp();
        }

        let jump_pressed =
            self.internal_state.controls.jump && !self.internal_state.prev_controls.jump;

        // Wheel traces feed the tick's ground sense.
        {
            let (bodies, wheels) = (world.bodies(), &mut self.wheels);
            let chassis = &bodies[self.rigid_body_idx];
            for wheel in wheels {
                wheel.update_raycast(world, chassis);
            }
        }

        let mut num_wheels_in_contact = 0u8;
        for (wheel, has_contact) in self
            .wheels
            .iter()
            .zip(&mut self.internal_state.wheels_with_contact)
        {
            *has_contact = wheel.raycast_info.is_in_contact;
            num_wheels_in_contact += u8::from(wheel.raycast_info.is_in_contact);
        }
        self.internal_state.is_on_ground = num_wheels_in_contact >= 3;

        let forward_speed = {
            let rb = &world.bodies()[self.rigid_body_idx];
            rb.linear_velocity.dot(self.get_forward_dir())
        };

        self.update_wheels(world, tick_time, num_wheels_in_contact, forward_speed);

        let rb = &mut world.bodies_mut()[self.rigid_body_idx];
        if self.internal_state.is_on_ground {
            self.internal_state.is_flipping = false;
        } else {
            self.update_air_torque(rb, tick_time, num_wheels_in_contact == 0);
        }

        self.update_jump(rb, tick_time, mutator_config, jump_pressed);
        self.update_auto_flip(rb, tick_time, jump_pressed);
        self.update_double_jump_or_flip(rb, tick_time, mutator_config, jump_pressed, forward_speed);

        if self.internal_state.controls.throttle != 0.0
            && ((0 < num_wheels_in_contact && num_wheels_in_contact < 4)
                || self.internal_state.world_contact.has_contact)
        {
            self.update_auto_roll(rb, tick_time, num_wheels_in_contact);
        }

        self.internal_state.world_contact.has_contact = false;
        self.internal_state.world_contact.contact_normal = Vec3A::ZERO;

        // Suspension and tyre impulses run after the control forces so
        // the wheels react to this tick's engine state.
        let wheel_count = self.wheels.len() as f32;
        for wheel in &self.wheels {
            wheel.apply_suspension(rb, wheel_count, tick_time);
        }
        for wheel in &self.wheels {
            wheel.apply_tyre_impulses(rb, wheel_count, tick_time);
        }

        self.update_boost(rb, tick_time, mutator_config);
    }

    /// Throttle, brake, steering and tyre friction for the grounded car.
    fn update_wheels(
        &mut self,
        world: &mut DynamicsWorld,
        tick_time: f32,
        num_wheels_in_contact: u8,
        forward_speed: f32,
    ) {
        let state = &mut self.internal_state;

        state.handbrake_val += (f32::from(state.controls.handbrake) * 2.0 - 1.0)
            * if state.controls.handbrake {
                drive::POWERSLIDE_RISE_RATE
            } else {
                drive::POWERSLIDE_FALL_RATE
            }
            * tick_time;
        state.handbrake_val = state.handbrake_val.clamp(0.0, 1.0);

        let real_throttle = if state.controls.boost && state.boost > 0.0 {
            1.0
        } else {
            state.controls.throttle
        };

        let abs_forward_speed = forward_speed.abs();
        let mut engine_throttle = real_throttle;
        let mut real_brake = 0.0;

        if !state.controls.handbrake {
            if real_throttle.abs() >= drive::THROTTLE_DEADZONE {
                if abs_forward_speed > drive::STOPPING_FORWARD_VEL
                    && real_throttle.signum() != forward_speed.signum()
                {
                    real_brake = 1.0;
                    if abs_forward_speed > drive::BRAKING_NO_THROTTLE_SPEED_THRESH {
                        engine_throttle = 0.0;
                    }
                }
            } else {
                engine_throttle = 0.0;
                real_brake = if abs_forward_speed < drive::STOPPING_FORWARD_VEL {
                    1.0
                } else {
                    drive::COASTING_BRAKE_FACTOR
                };
            }
        }

        let mut drive_speed_scale = curves::DRIVE_SPEED_TORQUE_FACTOR.get_output(abs_forward_speed);
        if num_wheels_in_contact < 3 {
            drive_speed_scale /= 4.0;
        }

        let per_wheel_engine =
            engine_throttle * drive::ENGINE_ACCEL * drive_speed_scale / self.wheels.len() as f32;
        let per_wheel_brake = real_brake * drive::BRAKE_ACCEL / self.wheels.len() as f32;

        // Steering: the wheel-angle curve turned into a yaw-rate target.
        let mut steer_angle = curves::STEER_ANGLE_FROM_SPEED.get_output(abs_forward_speed);
        if state.handbrake_val != 0.0 {
            steer_angle += (curves::POWERSLIDE_STEER_ANGLE_FROM_SPEED.get_output(abs_forward_speed)
                - steer_angle)
                * state.handbrake_val;
        }
        steer_angle *= state.controls.steer;

        for wheel in &mut self.wheels {
            wheel.engine_force = per_wheel_engine;
            wheel.brake = per_wheel_brake;

            let friction_input = {
                let info = &wheel.raycast_info;
                if !info.is_in_contact {
                    wheel.lat_friction = 1.0;
                    wheel.long_friction = 1.0;
                    continue;
                }
                let rb = &world.bodies()[self.rigid_body_idx];
                let rel = info.contact_point_ws - rb.world_transform.translation;
                let vel_at_point = rb.get_velocity_in_local_point(rel);

                let lat_dir = rb.world_transform.matrix3.y_axis;
                let long_dir = lat_dir.cross(info.contact_normal_ws);

                let lat_speed = vel_at_point.dot(lat_dir).abs();
                if lat_speed > 5.0 {
                    lat_speed / (vel_at_point.dot(long_dir).abs() + lat_speed)
                } else {
                    0.0
                }
            };

            let mut lat_friction = curves::LAT_FRICTION.get_output(friction_input);
            let mut long_friction = 1.0;

            if state.handbrake_val != 0.0 {
                let handbrake_amount = state.handbrake_val;
                let slide_lat = curves::HANDBRAKE_LAT_FRICTION.get_output(friction_input);
                lat_friction *= 1.0 + (slide_lat - 1.0) * handbrake_amount;
                long_friction *= 1.0
                    + (curves::HANDBRAKE_LONG_FRICTION.get_output(friction_input) - 1.0)
                        * handbrake_amount;
            }

            if real_throttle == 0.0 {
                // Contact is not sticky while coasting.
                let non_sticky_scale = curves::NON_STICKY_FRICTION_FACTOR
                    .get_output(wheel.raycast_info.contact_normal_ws.z);
                lat_friction *= non_sticky_scale;
                long_friction *= non_sticky_scale;
            }

            wheel.lat_friction = lat_friction;
            wheel.long_friction = long_friction;
        }

        let rb = &mut world.bodies_mut()[self.rigid_body_idx];

        if num_wheels_in_contact >= 3 {
            let up_dir = self.upwards_dir_from_wheel_contacts(rb);
            let target_yaw_rate = forward_speed * steer_angle.tan() / drive::WHEELBASE;
            let current_yaw_rate = rb.angular_velocity.dot(up_dir);
            let blend = (drive::STEER_YAW_RESPONSE * tick_time).min(1.0);
            rb.angular_velocity += up_dir * ((target_yaw_rate - current_yaw_rate) * blend);
        }

        let wheels_have_contact = num_wheels_in_contact > 0;
        if wheels_have_contact {
            let upwards_dir = self.upwards_dir_from_wheel_contacts(rb);

            let full_stick =
                real_throttle != 0.0 || abs_forward_speed > drive::STOPPING_FORWARD_VEL;
            let mut sticky_force_scale = 0.5;
            if full_stick {
                sticky_force_scale += 1.0 - upwards_dir.z.abs();
            }

            rb.apply_central_force(
                upwards_dir * (sticky_force_scale * GRAVITY_Z * rb.get_mass()),
            );
        }
    }

    fn upwards_dir_from_wheel_contacts(&self, rb: &RigidBody) -> Vec3A {
        let mut sum = Vec3A::ZERO;
        for wheel in &self.wheels {
            if wheel.raycast_info.is_in_contact {
                sum += wheel.raycast_info.contact_normal_ws;
            }
        }

        if sum == Vec3A::ZERO {
            rb.world_transform.matrix3.z_axis
        } else {
            sum.normalize_or_zero()
        }
    }

    fn update_air_torque(&mut self, rb: &mut RigidBody, tick_time: f32, update_air_control: bool) {
        let dir_pitch = -self.get_right_dir();
        let dir_yaw = self.get_up_dir();
        let dir_roll = -self.get_forward_dir();

        let state = &mut self.internal_state;

        if state.is_flipping {
            state.is_flipping = state.has_flipped && state.flip_time < flip::TORQUE_TIME;
        }

        let mut do_air_control = false;
        if state.is_flipping {
            if state.flip_rel_torque == Vec3A::ZERO {
                // Stall flip: keeps air control.
                do_air_control = true;
            } else {
                let mut rel_torque = state.flip_rel_torque;

                let mut pitch_scale = 1.0;
                if rel_torque.y != 0.0
                    && state.controls.pitch != 0.0
                    && rel_torque.y.signum() == state.controls.pitch.signum()
                {
                    pitch_scale = 1.0 - state.controls.pitch.abs().min(1.0);
                    do_air_control = true;
                }
                rel_torque.y *= pitch_scale;

                let world_torque = rb.world_transform.matrix3
                    * (rel_torque * Vec3A::new(flip::TORQUE_X, flip::TORQUE_Y, 0.0));
                rb.angular_velocity += world_torque * tick_time;
            }
        } else {
            do_air_control = true;
        }

        do_air_control &= !state.is_auto_flipping;
        do_air_control &= update_air_control;
        if do_air_control {
            let mut pitch_torque_scale = 1.0;
            let torque = if state.controls.pitch != 0.0
                || state.controls.yaw != 0.0
                || state.controls.roll != 0.0
            {
                if state.is_flipping
                    || (state.has_flipped
                        && state.flip_time < flip::TORQUE_TIME + flip::PITCHLOCK_EXTRA_TIME)
                {
                    pitch_torque_scale = 0.0;
                }

                state.controls.pitch * dir_pitch * pitch_torque_scale * air_control::TORQUE.x
                    + state.controls.yaw * dir_yaw * air_control::TORQUE.y
                    + state.controls.roll * dir_roll * air_control::TORQUE.z
            } else {
                Vec3A::ZERO
            };

            let ang_vel = rb.angular_velocity;

            let damp_pitch = dir_pitch.dot(ang_vel)
                * air_control::DAMPING.x
                * (1.0 - (state.controls.pitch * pitch_torque_scale).abs());
            let damp_yaw =
                dir_yaw.dot(ang_vel) * air_control::DAMPING.y * (1.0 - state.controls.yaw.abs());
            let damp_roll = dir_roll.dot(ang_vel) * air_control::DAMPING.z;

            let damping = dir_pitch * damp_pitch + dir_yaw * damp_yaw + dir_roll * damp_roll;

            rb.angular_velocity += (torque - damping) * tick_time;
        }

        if state.controls.throttle != 0.0 {
            rb.apply_central_force(
                state.phys.rot_mat.x_axis
                    * (state.controls.throttle * drive::THROTTLE_AIR_ACCEL * rb.get_mass()),
            );
        }
    }

    fn update_jump(
        &mut self,
        rb: &mut RigidBody,
        tick_time: f32,
        mutator_config: &MutatorConfig,
        jump_pressed: bool,
    ) {
        let state = &mut self.internal_state;

        if state.is_on_ground && state.is_jumping {
            if state.has_jumped && state.jump_time < jump::MIN_TIME + jump::RESET_TIME_PAD {
                // Still leaving the ground after a minimum-length jump;
                // don't reset it yet.
            } else {
                state.has_jumped = false;
                state.jump_time = 0.0;
            }
        }

        if state.is_jumping {
            state.is_jumping = state.jump_time < jump::MIN_TIME
                || (state.controls.jump && state.jump_time < jump::MAX_TIME);
        } else if state.is_on_ground && jump_pressed {
            state.is_jumping = true;
            state.jump_time = 0.0;

            let jump_start_impulse = state.phys.rot_mat.z_axis
                * (mutator_config.jump_immediate_force * rb.get_mass());
            rb.apply_central_impulse(jump_start_impulse);
        }

        if state.is_jumping {
            state.has_jumped = true;

            let mut hold_accel = mutator_config.jump_accel;
            if state.jump_time < jump::MIN_TIME {
                const JUMP_PRE_MIN_ACCEL_SCALE: f32 = 0.62;
                hold_accel *= JUMP_PRE_MIN_ACCEL_SCALE;
            }

            let up = state.phys.rot_mat.z_axis;
            rb.apply_central_force(up * (hold_accel * rb.get_mass()));
        }

        if state.is_jumping || state.has_jumped {
            state.jump_time += tick_time;
        }
    }

    fn update_auto_flip(&mut self, rb: &mut RigidBody, tick_time: f32, jump_pressed: bool) {
        let state = &mut self.internal_state;

        if jump_pressed
            && state.world_contact.has_contact
            && state.world_contact.contact_normal.z > autoflip::NORM_Z_THRESH
        {
            let (_, _, roll) = state.phys.rot_mat.to_euler(EulerRot::ZYX);
            let abs_roll = roll.abs();
            if abs_roll > autoflip::ROLL_THRESH {
                state.auto_flip_timer = autoflip::TIME * (abs_roll / PI);
                state.auto_flip_torque_scale = roll.signum();
                state.is_auto_flipping = true;

                let down_impulse =
                    -state.phys.rot_mat.z_axis * (autoflip::IMPULSE * rb.get_mass());
                rb.apply_central_impulse(down_impulse);
            }
        }

        if state.is_auto_flipping {
            if state.auto_flip_timer <= 0.0 {
                state.is_auto_flipping = false;
                state.auto_flip_timer = 0.0;
            } else {
                rb.angular_velocity += state.phys.rot_mat.x_axis
                    * (autoflip::TORQUE * state.auto_flip_torque_scale * tick_time);
                state.auto_flip_timer -= tick_time;
            }
        }
    }

    fn update_double_jump_or_flip(
        &mut self,
        rb: &mut RigidBody,
        tick_time: f32,
        mutator_config: &MutatorConfig,
        jump_pressed: bool,
        forward_speed: f32,
    ) {
        let state = &mut self.internal_state;

        if state.is_on_ground {
            state.has_double_jumped = false;
            state.has_flipped = false;
            state.air_time = 0.0;
            state.air_time_since_jump = 0.0;
            state.flip_time = 0.0;
            return;
        }

        let tick_time_scale = tick_time / (1.0 / 120.0);

        state.air_time += tick_time;
        if state.has_jumped && !state.is_jumping {
            state.air_time_since_jump += tick_time;
        } else {
            state.air_time_since_jump = 0.0;
        }

        if jump_pressed && state.air_time_since_jump < jump::DOUBLEJUMP_MAX_DELAY {
            let input_magnitude = state.controls.yaw.abs()
                + state.controls.pitch.abs()
                + state.controls.roll.abs();
            let is_flip_input = input_magnitude >= self.config.dodge_deadzone;

            let can_use = (!state.is_auto_flipping
                && !state.has_double_jumped
                && !state.has_flipped)
                || if is_flip_input {
                    mutator_config.unlimited_flips
                } else {
                    mutator_config.unlimited_double_jumps
                };

            if can_use {
                if is_flip_input {
                    state.flip_time = 0.0;
                    state.has_flipped = true;
                    state.is_flipping = true;

                    let forward_speed_ratio = forward_speed.abs() / consts::car::MAX_SPEED;
                    let mut dodge_dir = Vec3A::new(
                        -state.controls.pitch,
                        state.controls.yaw + state.controls.roll,
                        0.0,
                    );

                    if dodge_dir.x.abs() < 0.1 && dodge_dir.y.abs() < 0.1 {
                        dodge_dir = Vec3A::ZERO;
                    } else {
                        dodge_dir = dodge_dir.normalize();
                    }

                    state.flip_rel_torque =
                        Vec3A::new(-dodge_dir.y, dodge_dir.x, 0.0) / tick_time_scale;

                    if dodge_dir.x.abs() < 0.1 {
                        dodge_dir.x = 0.0;
                    }
                    if dodge_dir.y.abs() < 0.1 {
                        dodge_dir.y = 0.0;
                    }

                    if dodge_dir.length_squared() > f32::EPSILON * f32::EPSILON {
                        let should_dodge_backwards = if forward_speed.abs() < 100.0 {
                            dodge_dir.x.is_sign_negative()
                        } else {
                            dodge_dir.x.signum() != forward_speed.signum()
                        };

                        let max_speed_scale_x = if should_dodge_backwards {
                            flip::BACKWARD_IMPULSE_MAX_SPEED_SCALE
                        } else {
                            flip::FORWARD_IMPULSE_MAX_SPEED_SCALE
                        };

                        let mut initial_dodge_vel = dodge_dir * flip::INITIAL_VEL_SCALE;
                        initial_dodge_vel.x *= ((max_speed_scale_x - 1.0) * forward_speed_ratio) + 1.0;
                        initial_dodge_vel.y *=
                            ((flip::SIDE_IMPULSE_MAX_SPEED_SCALE - 1.0) * forward_speed_ratio) + 1.0;
                        if should_dodge_backwards {
                            initial_dodge_vel.x *= flip::BACKWARD_IMPULSE_SCALE_X;
                        }

                        let forward_dir_2d =
                            state.phys.rot_mat.x_axis.with_z(0.0).normalize_or_zero();
                        let right_dir_2d =
                            Vec3A::new(-forward_dir_2d.y, forward_dir_2d.x, 0.0);
                        let final_delta_vel = initial_dodge_vel.x * forward_dir_2d
                            + initial_dodge_vel.y * right_dir_2d;

                        rb.apply_central_impulse(final_delta_vel * rb.get_mass());
                    }
                } else {
                    let jump_impulse =
                        state.phys.rot_mat.z_axis * (jump::IMMEDIATE_FORCE * rb.get_mass());
                    rb.apply_central_impulse(jump_impulse);
                    state.has_double_jumped = true;
                }
            }
        }

        let state = &mut self.internal_state;
        if state.is_flipping {
            state.flip_time += tick_time;
            if state.flip_time <= flip::TORQUE_TIME
                && state.flip_time >= flip::Z_DAMP_START
                && (rb.linear_velocity.z < 0.0 || state.flip_time < flip::Z_DAMP_END)
            {
                rb.linear_velocity.z *= (1.0 - flip::Z_DAMP_120).powf(tick_time_scale);
            }

            // The flip ends the moment its torque window elapses.
            if state.flip_time >= flip::TORQUE_TIME {
                state.is_flipping = false;
            }
        } else if state.has_flipped {
            state.flip_time += tick_time;
        }
    }

    /// Nose the car back toward the surface it is riding when only some
    /// wheels grip.
    fn update_auto_roll(&mut self, rb: &mut RigidBody, tick_time: f32, num_wheels_in_contact: u8) {
        let ground_up_dir = if num_wheels_in_contact > 0 {
            self.upwards_dir_from_wheel_contacts(rb)
        } else {
            self.internal_state.world_contact.contact_normal
        };
        if ground_up_dir == Vec3A::ZERO {
            return;
        }

        let ground_down_dir = -ground_up_dir;

        let forward_dir = self.get_forward_dir();
        let right_dir = self.get_right_dir();

        let cross_right_dir = ground_up_dir.cross(forward_dir);
        let cross_forward_dir = ground_down_dir.cross(cross_right_dir);

        let right_torque_factor = 1.0 - right_dir.dot(cross_right_dir).clamp(0.0, 1.0);
        let forward_torque_factor = 1.0 - forward_dir.dot(cross_forward_dir).clamp(0.0, 1.0);

        let torque_dir_right = forward_dir * -right_dir.dot(ground_up_dir).signum();
        let torque_dir_forward = right_dir * forward_dir.dot(ground_up_dir).signum();

        let torque =
            torque_dir_right * right_torque_factor + torque_dir_forward * forward_torque_factor;

        rb.apply_central_force(ground_down_dir * (autoroll::FORCE * rb.get_mass()));
        rb.angular_velocity += torque * (autoroll::TORQUE * tick_time);
    }

    fn update_boost(&mut self, rb: &mut RigidBody, tick_time: f32, mutator_config: &MutatorConfig) {
        let state = &mut self.internal_state;

        state.is_boosting = if state.boost > 0.0 {
            state.controls.boost || (state.is_boosting && state.boosting_time < boost::MIN_TIME)
        } else {
            false
        };

        if state.is_boosting {
            state.boosting_time += tick_time;
            state.time_since_boosted = 0.0;
            state.boost -= mutator_config.boost_used_per_second * tick_time;

            let accel = if state.is_on_ground {
                mutator_config.boost_accel_ground
            } else {
                mutator_config.boost_accel_air
            };

            rb.apply_central_force(state.phys.rot_mat.x_axis * (accel * rb.get_mass()));
        } else {
            state.boosting_time = 0.0;
            state.time_since_boosted += tick_time;

            if mutator_config.recharge_boost_enabled
                && state.time_since_boosted >= mutator_config.recharge_boost_delay
            {
                state.boost += mutator_config.recharge_boost_per_second * tick_time;
            }
        }

        state.boost = state.boost.clamp(0.0, mutator_config.car_max_boost_amount);
    }

    pub(crate) fn post_tick_update(&mut self, tick_time: f32, rb: &RigidBody) {
        let state = &mut self.internal_state;

        state.tick_count_since_update += 1;

        if state.is_demoed {
            state.prev_controls = state.controls;
            return;
        }

        state.phys.rot_mat = rb.world_transform.matrix3;

        let speed_squared = rb.linear_velocity.length_squared();
        let supersonic_thresh = if state.is_supersonic
            && state.supersonic_time < supersonic::MAINTAIN_MAX_TIME
        {
            supersonic::MAINTAIN_MIN_SPEED
        } else {
            supersonic::START_SPEED
        };
        state.is_supersonic = speed_squared >= supersonic_thresh * supersonic_thresh;

        if state.is_supersonic {
            state.supersonic_time += tick_time;
        } else {
            state.supersonic_time = 0.0;
        }

        if state.car_contact.cooldown_timer > 0.0 {
            state.car_contact.cooldown_timer -= tick_time;
            if state.car_contact.cooldown_timer <= 0.0 {
                state.car_contact = Default::default();
            }
        }

        state.prev_controls = state.controls;
    }

    /// Apply deferred impulses and speed caps, then copy the body state
    /// out for readers.
    pub(crate) fn finish_physics_tick(&mut self, rb: &mut RigidBody) {
        if self.internal_state.is_demoed {
            return;
        }

        if self.velocity_impulse_cache != Vec3A::ZERO {
            rb.linear_velocity += self.velocity_impulse_cache;
            self.velocity_impulse_cache = Vec3A::ZERO;
        }

        if rb.linear_velocity.length_squared() > consts::car::MAX_SPEED * consts::car::MAX_SPEED {
            rb.linear_velocity = rb.linear_velocity.normalize() * consts::car::MAX_SPEED;
        }

        if rb.angular_velocity.length_squared()
            > consts::car::MAX_ANG_SPEED * consts::car::MAX_ANG_SPEED
        {
            rb.angular_velocity = rb.angular_velocity.normalize() * consts::car::MAX_ANG_SPEED;
        }

        self.internal_state.phys.pos = rb.world_transform.translation;
        self.internal_state.phys.vel = rb.linear_velocity;
        self.internal_state.phys.ang_vel = rb.angular_velocity;
    }
}
