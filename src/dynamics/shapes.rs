use glam::Vec3A;

/// Collision shape of a dynamic body.
#[derive(Clone, Copy, Debug)]
pub enum Shape {
    Sphere { radius: f32 },
    Box { half_extents: Vec3A },
}

impl Shape {
    /// Diagonal of the local inertia tensor for the given mass.
    #[must_use]
    pub fn calculate_local_inertia(&self, mass: f32) -> Vec3A {
        match *self {
            Self::Sphere { radius } => Vec3A::splat(0.4 * mass * radius * radius),
            Self::Box { half_extents } => {
                let d = half_extents * 2.0;
                let sq = d * d;
                Vec3A::new(sq.y + sq.z, sq.x + sq.z, sq.x + sq.y) * (mass / 12.0)
            }
        }
    }

    /// Radius of the bounding sphere, for the broadphase reject test.
    #[must_use]
    pub fn bounding_radius(&self) -> f32 {
        match *self {
            Self::Sphere { radius } => radius,
            Self::Box { half_extents } => half_extents.length(),
        }
    }
}
