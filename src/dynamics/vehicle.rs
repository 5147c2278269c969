use glam::Vec3A;

use super::rigid_body::RigidBody;
use super::world::DynamicsWorld;
use crate::consts::suspension;

/// Result of one wheel's suspension ray cast.
#[derive(Clone, Copy, Debug, Default)]
pub struct WheelRaycastInfo {
    pub is_in_contact: bool,
    pub hard_point_ws: Vec3A,
    pub wheel_direction_ws: Vec3A,
    pub contact_point_ws: Vec3A,
    pub contact_normal_ws: Vec3A,
    pub suspension_length: f32,
    /// Velocity of the chassis at the contact point along the contact
    /// normal. Negative while compressing.
    pub suspension_rel_velocity: f32,
    pub ground_friction: f32,
}

/// One ray-cast suspension wheel. The chassis applies engine/brake
/// accelerations and friction scales before the impulse pass each tick.
#[derive(Clone, Copy, Debug)]
pub struct Wheel {
    /// Suspension attachment in chassis space.
    pub connection_point_cs: Vec3A,
    pub suspension_rest_length: f32,
    pub radius: f32,
    pub suspension_force_scale: f32,
    /// Engine acceleration along the wheel's forward, uu/s^2.
    pub engine_force: f32,
    /// Braking deceleration opposing rolling velocity, uu/s^2.
    pub brake: f32,
    pub lat_friction: f32,
    pub long_friction: f32,
    pub raycast_info: WheelRaycastInfo,
}

impl Wheel {
    #[must_use]
    pub fn new(
        connection_point_cs: Vec3A,
        suspension_rest_length: f32,
        radius: f32,
        suspension_force_scale: f32,
    ) -> Self {
        Self {
            connection_point_cs,
            suspension_rest_length,
            radius,
            suspension_force_scale,
            engine_force: 0.0,
            brake: 0.0,
            lat_friction: 1.0,
            long_friction: 1.0,
            raycast_info: WheelRaycastInfo::default(),
        }
    }

    /// Ray cast this wheel against the static world and refresh its
    /// suspension state.
    pub fn update_raycast(&mut self, world: &DynamicsWorld, chassis: &RigidBody) {
        let transform = chassis.world_transform;
        let hard_point = transform.transform_point3a(self.connection_point_cs);
        let direction = transform.matrix3 * Vec3A::NEG_Z;

        let ray_length = self.suspension_rest_length + suspension::MAX_TRAVEL + self.radius;
        let target = hard_point + direction * ray_length;

        let info = &mut self.raycast_info;
        info.hard_point_ws = hard_point;
        info.wheel_direction_ws = direction;

        match world.cast_ray(hard_point, target) {
            Some(hit) => {
                info.is_in_contact = true;
                info.contact_point_ws = hit.point;
                info.contact_normal_ws = hit.normal;
                info.ground_friction = hit.friction;
                info.suspension_length = (hit.fraction * ray_length - self.radius)
                    .clamp(0.0, self.suspension_rest_length + suspension::MAX_TRAVEL);

                let rel_pos = hit.point - transform.translation;
                let vel_at_point = chassis.get_velocity_in_local_point(rel_pos);
                info.suspension_rel_velocity = vel_at_point.dot(hit.normal);
            }
            None => {
                info.is_in_contact = false;
                info.contact_point_ws = target;
                info.contact_normal_ws = -direction;
                info.ground_friction = 0.0;
                info.suspension_length = self.suspension_rest_length + suspension::MAX_TRAVEL;
                info.suspension_rel_velocity = 0.0;
            }
        }
    }

    /// Spring + damper impulse along the contact normal.
    pub fn apply_suspension(&self, chassis: &mut RigidBody, wheel_count: f32, dt: f32) {
        let info = &self.raycast_info;
        if !info.is_in_contact {
            return;
        }

        let compression = self.suspension_rest_length - info.suspension_length;
        let damping = if info.suspension_rel_velocity < 0.0 {
            suspension::DAMPING_COMPRESSION
        } else {
            suspension::DAMPING_RELAXATION
        };

        let accel = (compression * suspension::STIFFNESS
            - damping * info.suspension_rel_velocity)
            * self.suspension_force_scale;
        if accel <= 0.0 {
            return;
        }

        let impulse =
            info.contact_normal_ws * (accel * chassis.get_mass() / wheel_count * dt);
        let rel_pos = info.contact_point_ws - chassis.world_transform.translation;
        chassis.apply_impulse(impulse, rel_pos);
    }

    /// Engine, brake and lateral grip impulses in the contact plane.
    ///
    /// The contact offset has its up-component removed before torque is
    /// computed, so tyre forces push the chassis without rolling it over.
    pub fn apply_tyre_impulses(&self, chassis: &mut RigidBody, wheel_count: f32, dt: f32) {
        let info = &self.raycast_info;
        if !info.is_in_contact {
            return;
        }

        let up_dir = chassis.world_transform.matrix3.z_axis;
        let normal = info.contact_normal_ws;

        let mut lat_dir = chassis.world_transform.matrix3.y_axis;
        lat_dir = (lat_dir - normal * lat_dir.dot(normal)).normalize_or_zero();
        let forward_dir = normal.cross(lat_dir).normalize_or_zero();
        if forward_dir == Vec3A::ZERO {
            return;
        }

        let rel_pos = info.contact_point_ws - chassis.world_transform.translation;
        let vel_at_point = chassis.get_velocity_in_local_point(rel_pos);

        let mass_share = chassis.get_mass() / wheel_count;

        // Longitudinal: engine pushes, brake opposes the rolling speed.
        let mut long_accel = self.engine_force;
        if self.brake > 0.0 {
            let rolling_vel = vel_at_point.dot(forward_dir);
            let brake_decel = self.brake.min(rolling_vel.abs() / dt);
            long_accel -= brake_decel * rolling_vel.signum();
        }
        let long_impulse = forward_dir * (long_accel * self.long_friction * mass_share * dt);

        // Lateral: cancel the slip velocity, scaled by grip.
        let lat_vel = vel_at_point.dot(lat_dir);
        let lat_impulse =
            lat_dir * (-lat_vel * suspension::LAT_GRIP * self.lat_friction * mass_share);

        let flat_rel_pos = rel_pos - up_dir * up_dir.dot(rel_pos);
        chassis.apply_impulse(long_impulse + lat_impulse, flat_rel_pos);
    }
}
