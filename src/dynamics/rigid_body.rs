use glam::{Affine3A, Mat3A, Quat, Vec3A};

use super::shapes::Shape;

/// Construction parameters for a [`RigidBody`]. Mass of zero makes the
/// body static.
#[derive(Clone, Copy, Debug)]
pub struct RigidBodyConstructionInfo {
    pub mass: f32,
    pub shape: Shape,
    pub start_world_transform: Affine3A,
    pub linear_damping: f32,
    pub friction: f32,
    pub restitution: f32,
    /// Freeze orientation integration (used for the no-spin ball).
    pub no_rot: bool,
    /// Offset of the collision shape from the center of mass, in body
    /// space (car hitboxes sit above and ahead of the origin).
    pub shape_offset: Vec3A,
}

impl RigidBodyConstructionInfo {
    #[must_use]
    pub fn new(mass: f32, shape: Shape) -> Self {
        Self {
            mass,
            shape,
            start_world_transform: Affine3A::IDENTITY,
            linear_damping: 0.0,
            friction: 0.5,
            restitution: 0.0,
            no_rot: false,
            shape_offset: Vec3A::ZERO,
        }
    }
}

/// A simulated body. Position and orientation live in `world_transform`;
/// forces and torques accumulate between steps and are consumed by
/// velocity integration.
pub struct RigidBody {
    pub world_transform: Affine3A,
    pub linear_velocity: Vec3A,
    pub angular_velocity: Vec3A,
    pub shape: Shape,
    pub friction: f32,
    pub restitution: f32,
    pub linear_damping: f32,
    pub no_rot: bool,
    pub shape_offset: Vec3A,
    /// Skips all contact generation and response (demolished cars).
    pub no_contact_response: bool,
    /// Freezes the body entirely: no integration, no contacts.
    pub disable_simulation: bool,
    /// Which plane groups this body collides with.
    pub plane_mask: u32,
    /// Gameplay tag, opaque to the engine. Zero means untagged.
    pub user_index: i32,
    /// Gameplay id, opaque to the engine.
    pub user_pointer: u64,

    pub(crate) inv_mass: f32,
    pub(crate) inv_inertia_local: Vec3A,
    pub(crate) total_force: Vec3A,
    pub(crate) total_torque: Vec3A,
}

impl RigidBody {
    #[must_use]
    pub fn new(info: RigidBodyConstructionInfo) -> Self {
        let inv_mass = if info.mass > 0.0 { 1.0 / info.mass } else { 0.0 };
        let inertia = info.shape.calculate_local_inertia(info.mass);
        let inv_inertia_local = if info.mass > 0.0 {
            Vec3A::new(1.0 / inertia.x, 1.0 / inertia.y, 1.0 / inertia.z)
        } else {
            Vec3A::ZERO
        };

        Self {
            world_transform: info.start_world_transform,
            linear_velocity: Vec3A::ZERO,
            angular_velocity: Vec3A::ZERO,
            shape: info.shape,
            friction: info.friction,
            restitution: info.restitution,
            linear_damping: info.linear_damping,
            no_rot: info.no_rot,
            shape_offset: info.shape_offset,
            no_contact_response: false,
            disable_simulation: false,
            plane_mask: u32::MAX,
            user_index: 0,
            user_pointer: 0,
            inv_mass,
            inv_inertia_local,
            total_force: Vec3A::ZERO,
            total_torque: Vec3A::ZERO,
        }
    }

    #[must_use]
    pub const fn is_static(&self) -> bool {
        self.inv_mass == 0.0
    }

    #[must_use]
    pub const fn get_mass(&self) -> f32 {
        if self.inv_mass == 0.0 {
            0.0
        } else {
            1.0 / self.inv_mass
        }
    }

    /// World-space inverse inertia tensor, `R * I_local^-1 * R^T`.
    #[must_use]
    pub fn inv_inertia_world(&self) -> Mat3A {
        let rot = self.world_transform.matrix3;
        rot * Mat3A::from_diagonal(self.inv_inertia_local.into()) * rot.transpose()
    }

    pub fn apply_central_force(&mut self, force: Vec3A) {
        self.total_force += force;
    }

    pub fn apply_torque(&mut self, torque: Vec3A) {
        self.total_torque += torque;
    }

    pub fn apply_central_impulse(&mut self, impulse: Vec3A) {
        self.linear_velocity += impulse * self.inv_mass;
    }

    pub fn apply_torque_impulse(&mut self, torque: Vec3A) {
        self.angular_velocity += self.inv_inertia_world() * torque;
    }

    /// Impulse at a point given relative to the body origin.
    pub fn apply_impulse(&mut self, impulse: Vec3A, rel_pos: Vec3A) {
        self.apply_central_impulse(impulse);
        if !self.no_rot {
            self.apply_torque_impulse(rel_pos.cross(impulse));
        }
    }

    /// Velocity of the body surface at a point relative to the origin.
    #[must_use]
    pub fn get_velocity_in_local_point(&self, rel_pos: Vec3A) -> Vec3A {
        self.linear_velocity + self.angular_velocity.cross(rel_pos)
    }

    pub fn set_world_transform(&mut self, transform: Affine3A) {
        self.world_transform = transform;
    }

    #[must_use]
    pub const fn get_world_transform(&self) -> &Affine3A {
        &self.world_transform
    }

    /// World-space center of the collision shape.
    #[must_use]
    pub fn shape_center(&self) -> Vec3A {
        self.world_transform.transform_point3a(self.shape_offset)
    }

    pub(crate) fn integrate_velocities(&mut self, gravity: Vec3A, dt: f32) {
        if self.is_static() || self.disable_simulation {
            return;
        }

        self.linear_velocity += (gravity + self.total_force * self.inv_mass) * dt;
        if self.linear_damping > 0.0 {
            self.linear_velocity *= (1.0 - self.linear_damping).powf(dt);
        }

        self.angular_velocity += (self.inv_inertia_world() * self.total_torque) * dt;

        self.total_force = Vec3A::ZERO;
        self.total_torque = Vec3A::ZERO;
    }

    pub(crate) fn integrate_transform(&mut self, dt: f32) {
        if self.is_static() || self.disable_simulation {
            return;
        }

        self.world_transform.translation += self.linear_velocity * dt;

        if !self.no_rot {
            let w = self.angular_velocity;
            let ang = w.length();
            if ang > 1e-7 {
                let dq = Quat::from_axis_angle((w / ang).into(), ang * dt);
                let rot = Quat::from_mat3a(&self.world_transform.matrix3);
                self.world_transform.matrix3 = Mat3A::from_quat((dq * rot).normalize());
            }
        }
    }
}
