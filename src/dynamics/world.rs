use glam::Vec3A;

use super::rigid_body::RigidBody;
use super::shapes::Shape;

/// `user_index` value of untagged parties (static world geometry).
pub const USER_INDEX_NONE: i32 = 0;

/// Penetration under this is left to the impulse solver alone.
const PENETRATION_SLOP: f32 = 0.05;
/// Fraction of remaining penetration corrected positionally per step.
const POSITION_CORRECTION_BETA: f32 = 0.6;

/// An infinite static plane: points `p` with `normal . p + offset >= 0`
/// are outside.
///
/// `group` is a bit tested against each body's `plane_mask`, so callers
/// can make individual planes intangible for individual bodies (the
/// dropshot floor under a broken tile).
#[derive(Clone, Copy, Debug)]
pub struct StaticPlane {
    pub normal: Vec3A,
    pub offset: f32,
    pub friction: f32,
    pub restitution: f32,
    pub group: u32,
}

impl StaticPlane {
    #[must_use]
    pub fn new(point: Vec3A, normal: Vec3A, friction: f32, restitution: f32) -> Self {
        debug_assert!(normal.is_normalized());
        Self {
            normal,
            offset: -normal.dot(point),
            friction,
            restitution,
            group: 1,
        }
    }

    #[must_use]
    pub fn with_group(mut self, group: u32) -> Self {
        self.group = group;
        self
    }

    #[must_use]
    pub fn distance(&self, point: Vec3A) -> f32 {
        self.normal.dot(point) + self.offset
    }
}

/// One recorded narrow-phase contact, reported to the [`ContactSink`]
/// while the solver runs. `normal_world_on_b` points from party B toward
/// party A.
#[derive(Clone, Copy, Debug)]
pub struct ContactInfo {
    pub user_index_a: i32,
    pub user_index_b: i32,
    pub user_pointer_a: u64,
    pub user_pointer_b: u64,
    pub local_point_a: Vec3A,
    pub local_point_b: Vec3A,
    pub normal_world_on_b: Vec3A,
    pub combined_friction: f32,
    pub combined_restitution: f32,
}

/// Receives contact notifications during [`DynamicsWorld::step`]. The
/// sink must only record; world state is mid-solve when it runs.
pub trait ContactSink {
    fn contact_added(&mut self, contact: ContactInfo);
}

/// Resolves the friction/restitution pair for two tagged parties.
/// Returning `None` falls back to multiplying the bodies' own materials.
#[derive(Clone, Copy)]
pub struct MaterialTable {
    pub resolve: fn(i32, i32) -> Option<(f32, f32)>,
}

impl Default for MaterialTable {
    fn default() -> Self {
        Self {
            resolve: |_, _| None,
        }
    }
}

/// Result of a ray cast against the static world.
#[derive(Clone, Copy, Debug)]
pub struct RayHit {
    pub fraction: f32,
    pub point: Vec3A,
    pub normal: Vec3A,
    pub friction: f32,
}

struct Contact {
    a: usize,
    /// `None` = static plane contact.
    b: Option<usize>,
    point: Vec3A,
    /// From B toward A.
    normal: Vec3A,
    depth: f32,
    friction: f32,
    restitution: f32,
}

/// A discrete-step world over static planes and dynamic sphere/box
/// bodies. Bodies are addressed by dense index; removing a body shifts
/// later indices down by one, as the caller's bookkeeping expects.
pub struct DynamicsWorld {
    gravity: Vec3A,
    planes: Vec<StaticPlane>,
    bodies: Vec<RigidBody>,
    materials: MaterialTable,
    contacts: Vec<Contact>,
}

impl DynamicsWorld {
    #[must_use]
    pub fn new(gravity: Vec3A, materials: MaterialTable, initial_body_capacity: usize) -> Self {
        Self {
            gravity,
            planes: Vec::new(),
            bodies: Vec::with_capacity(initial_body_capacity),
            materials,
            contacts: Vec::with_capacity(initial_body_capacity * 4),
        }
    }

    pub fn set_gravity(&mut self, gravity: Vec3A) {
        self.gravity = gravity;
    }

    #[must_use]
    pub const fn gravity(&self) -> Vec3A {
        self.gravity
    }

    pub fn add_static_plane(&mut self, plane: StaticPlane) {
        self.planes.push(plane);
    }

    pub fn add_rigid_body(&mut self, body: RigidBody) -> usize {
        self.bodies.push(body);
        self.bodies.len() - 1
    }

    /// Removes a body; every index greater than `idx` shifts down by one.
    pub fn remove_rigid_body(&mut self, idx: usize) {
        self.bodies.remove(idx);
    }

    #[must_use]
    pub fn bodies(&self) -> &[RigidBody] {
        &self.bodies
    }

    #[must_use]
    pub fn bodies_mut(&mut self) -> &mut [RigidBody] {
        &mut self.bodies
    }

    /// Nearest static-geometry hit along `from -> to`, if any.
    #[must_use]
    pub fn cast_ray(&self, from: Vec3A, to: Vec3A) -> Option<RayHit> {
        let dir = to - from;
        let mut best: Option<RayHit> = None;

        for plane in &self.planes {
            let denom = plane.normal.dot(dir);
            if denom >= -1e-9 {
                // Parallel or approaching from behind.
                continue;
            }

            let start_dist = plane.distance(from);
            if start_dist < 0.0 {
                continue;
            }

            let fraction = start_dist / -denom;
            if fraction > 1.0 {
                continue;
            }

            if best.is_none_or(|hit| fraction < hit.fraction) {
                best = Some(RayHit {
                    fraction,
                    point: from + dir * fraction,
                    normal: plane.normal,
                    friction: plane.friction,
                });
            }
        }

        best
    }

    /// Advances the world by `dt`: velocity integration, contact
    /// generation + notification + impulse response, transform
    /// integration. Contacts reach the sink in body-index order.
    pub fn step(&mut self, dt: f32, sink: &mut dyn ContactSink) {
        let gravity = self.gravity;
        for body in &mut self.bodies {
            body.integrate_velocities(gravity, dt);
        }

        self.generate_contacts();
        self.notify_and_resolve(sink);

        for body in &mut self.bodies {
            body.integrate_transform(dt);
        }
    }

    fn generate_contacts(&mut self) {
        self.contacts.clear();

        for a in 0..self.bodies.len() {
            if self.bodies[a].is_static()
                || self.bodies[a].no_contact_response
                || self.bodies[a].disable_simulation
            {
                continue;
            }

            for plane_idx in 0..self.planes.len() {
                let plane = self.planes[plane_idx];
                if plane.group & self.bodies[a].plane_mask == 0 {
                    continue;
                }
                if let Some((point, depth)) = shape_plane_contact(&self.bodies[a], &plane) {
                    let (friction, restitution) = self.pair_materials_plane(a, &plane);
                    self.contacts.push(Contact {
                        a,
                        b: None,
                        point,
                        normal: plane.normal,
                        depth,
                        friction,
                        restitution,
                    });
                }
            }

            for b in (a + 1)..self.bodies.len() {
                if self.bodies[b].is_static()
                    || self.bodies[b].no_contact_response
                    || self.bodies[b].disable_simulation
                {
                    continue;
                }

                let (body_a, body_b) = (&self.bodies[a], &self.bodies[b]);
                let center_dist =
                    (body_a.shape_center() - body_b.shape_center()).length_squared();
                let reach = body_a.shape.bounding_radius() + body_b.shape.bounding_radius();
                if center_dist > reach * reach {
                    continue;
                }

                if let Some((point, normal, depth)) = shape_shape_contact(body_a, body_b) {
                    let (friction, restitution) = self.pair_materials(a, b);
                    self.contacts.push(Contact {
                        a,
                        b: Some(b),
                        point,
                        normal,
                        depth,
                        friction,
                        restitution,
                    });
                }
            }
        }
    }

    fn pair_materials(&self, a: usize, b: usize) -> (f32, f32) {
        let (body_a, body_b) = (&self.bodies[a], &self.bodies[b]);
        (self.materials.resolve)(body_a.user_index, body_b.user_index).unwrap_or((
            body_a.friction * body_b.friction,
            body_a.restitution * body_b.restitution,
        ))
    }

    fn pair_materials_plane(&self, a: usize, plane: &StaticPlane) -> (f32, f32) {
        let body = &self.bodies[a];
        (self.materials.resolve)(body.user_index, USER_INDEX_NONE).unwrap_or((
            body.friction * plane.friction,
            body.restitution * plane.restitution,
        ))
    }

    fn notify_and_resolve(&mut self, sink: &mut dyn ContactSink) {
        let contacts = std::mem::take(&mut self.contacts);

        for contact in &contacts {
            self.notify(sink, contact);
            self.resolve(contact);
        }

        self.contacts = contacts;
    }

    fn notify(&self, sink: &mut dyn ContactSink, contact: &Contact) {
        let body_a = &self.bodies[contact.a];
        let local_point_a = body_a
            .world_transform
            .inverse()
            .transform_point3a(contact.point);

        let (user_index_b, user_pointer_b, local_point_b) = match contact.b {
            Some(b) => {
                let body_b = &self.bodies[b];
                (
                    body_b.user_index,
                    body_b.user_pointer,
                    body_b
                        .world_transform
                        .inverse()
                        .transform_point3a(contact.point),
                )
            }
            None => (USER_INDEX_NONE, 0, contact.point),
        };

        sink.contact_added(ContactInfo {
            user_index_a: body_a.user_index,
            user_index_b,
            user_pointer_a: body_a.user_pointer,
            user_pointer_b,
            local_point_a,
            local_point_b,
            normal_world_on_b: contact.normal,
            combined_friction: contact.friction,
            combined_restitution: contact.restitution,
        });
    }

    fn resolve(&mut self, contact: &Contact) {
        let n = contact.normal;

        // Split borrows so A and B can both be mutated. Contacts are
        // generated with a < b.
        let (body_a, mut body_b) = match contact.b {
            Some(b) => {
                debug_assert!(contact.a < b);
                let (lo, hi) = self.bodies.split_at_mut(b);
                (&mut lo[contact.a], Some(&mut hi[0]))
            }
            None => (&mut self.bodies[contact.a], None),
        };

        let rel_a = contact.point - body_a.world_transform.translation;
        let rel_b = body_b
            .as_ref()
            .map(|b| contact.point - b.world_transform.translation);

        let vel_a = body_a.get_velocity_in_local_point(rel_a);
        let vel_b = body_b
            .as_deref()
            .zip(rel_b)
            .map_or(Vec3A::ZERO, |(b, r)| b.get_velocity_in_local_point(r));
        let vel_along_normal = (vel_a - vel_b).dot(n);

        if vel_along_normal < 0.0 {
            let mut denom = body_a.inv_mass + angular_term(body_a, rel_a, n);
            if let (Some(b), Some(rb)) = (body_b.as_deref(), rel_b) {
                denom += b.inv_mass + angular_term(b, rb, n);
            }

            if denom > 0.0 {
                let jn = -(1.0 + contact.restitution) * vel_along_normal / denom;
                body_a.apply_impulse(n * jn, rel_a);
                if let (Some(b), Some(rb)) = (body_b.as_deref_mut(), rel_b) {
                    b.apply_impulse(-n * jn, rb);
                }

                let vel_a = body_a.get_velocity_in_local_point(rel_a);
                let vel_b = body_b
                    .as_deref()
                    .zip(rel_b)
                    .map_or(Vec3A::ZERO, |(b, r)| b.get_velocity_in_local_point(r));
                apply_friction(
                    contact,
                    body_a,
                    body_b.as_deref_mut(),
                    rel_a,
                    rel_b,
                    vel_a - vel_b,
                    jn,
                );
            }
        }

        self.correct_position(contact);
    }

    fn correct_position(&mut self, contact: &Contact) {
        let pen = contact.depth - PENETRATION_SLOP;
        if pen <= 0.0 {
            return;
        }

        let correction = contact.normal * (pen * POSITION_CORRECTION_BETA);
        match contact.b {
            Some(b) => {
                let inv_a = self.bodies[contact.a].inv_mass;
                let inv_b = self.bodies[b].inv_mass;
                let total = inv_a + inv_b;
                if total > 0.0 {
                    self.bodies[contact.a].world_transform.translation +=
                        correction * (inv_a / total);
                    self.bodies[b].world_transform.translation -= correction * (inv_b / total);
                }
            }
            None => {
                self.bodies[contact.a].world_transform.translation += correction;
            }
        }
    }
}

fn angular_term(body: &RigidBody, rel: Vec3A, dir: Vec3A) -> f32 {
    if body.no_rot {
        return 0.0;
    }
    let torque_per_impulse = rel.cross(dir);
    (body.inv_inertia_world() * torque_per_impulse)
        .cross(rel)
        .dot(dir)
}

fn apply_friction(
    contact: &Contact,
    body_a: &mut RigidBody,
    body_b: Option<&mut RigidBody>,
    rel_a: Vec3A,
    rel_b: Option<Vec3A>,
    rel_vel: Vec3A,
    normal_impulse: f32,
) {
    let n = contact.normal;
    let tangent_vel = rel_vel - n * rel_vel.dot(n);
    let tangent_speed = tangent_vel.length();
    if tangent_speed < 1e-6 {
        return;
    }

    let t = tangent_vel / tangent_speed;

    let mut denom = body_a.inv_mass + angular_term(body_a, rel_a, t);
    if let (Some(b), Some(rb)) = (body_b.as_deref(), rel_b) {
        denom += b.inv_mass + angular_term(b, rb, t);
    }
    if denom <= 0.0 {
        return;
    }

    let max_friction = contact.friction * normal_impulse;
    let jt = (-tangent_speed / denom).clamp(-max_friction, max_friction);

    body_a.apply_impulse(t * jt, rel_a);
    if let (Some(b), Some(rb)) = (body_b, rel_b) {
        b.apply_impulse(-t * jt, rb);
    }
}

/// Deepest point of a shape below a plane, if penetrating.
fn shape_plane_contact(body: &RigidBody, plane: &StaticPlane) -> Option<(Vec3A, f32)> {
    let center = body.shape_center();
    match body.shape {
        Shape::Sphere { radius } => {
            let dist = plane.distance(center) - radius;
            if dist < 0.0 {
                Some((center - plane.normal * radius, -dist))
            } else {
                None
            }
        }
        Shape::Box { half_extents } => {
            let rot = body.world_transform.matrix3;
            let mut deepest = f32::MAX;
            let mut deepest_point = center;

            for ix in [-1.0f32, 1.0] {
                for iy in [-1.0f32, 1.0] {
                    for iz in [-1.0f32, 1.0] {
                        let corner =
                            center + rot * (half_extents * Vec3A::new(ix, iy, iz));
                        let dist = plane.distance(corner);
                        if dist < deepest {
                            deepest = dist;
                            deepest_point = corner;
                        }
                    }
                }
            }

            if deepest < 0.0 {
                Some((deepest_point, -deepest))
            } else {
                None
            }
        }
    }
}

/// Narrow-phase between two dynamic bodies. Returns
/// `(point, normal_from_b_to_a, depth)`.
fn shape_shape_contact(a: &RigidBody, b: &RigidBody) -> Option<(Vec3A, Vec3A, f32)> {
    match (a.shape, b.shape) {
        (Shape::Sphere { radius: ra }, Shape::Sphere { radius: rb }) => {
            let delta = a.shape_center() - b.shape_center();
            let dist = delta.length();
            let pen = ra + rb - dist;
            if pen > 0.0 && dist > 1e-6 {
                let n = delta / dist;
                Some((b.shape_center() + n * rb, n, pen))
            } else {
                None
            }
        }
        (Shape::Sphere { radius }, Shape::Box { half_extents }) => {
            sphere_box_contact(a.shape_center(), radius, b, half_extents)
        }
        (Shape::Box { half_extents }, Shape::Sphere { radius }) => {
            sphere_box_contact(b.shape_center(), radius, a, half_extents)
                .map(|(point, normal, depth)| (point, -normal, depth))
        }
        (Shape::Box { half_extents: ha }, Shape::Box { half_extents: hb }) => {
            box_box_contact(a, ha, b, hb)
        }
    }
}

/// Sphere vs oriented box; normal points from the box toward the sphere.
fn sphere_box_contact(
    sphere_center: Vec3A,
    radius: f32,
    box_body: &RigidBody,
    half_extents: Vec3A,
) -> Option<(Vec3A, Vec3A, f32)> {
    let inv = box_body.world_transform.inverse();
    let local_center = inv.transform_point3a(sphere_center) - box_body.shape_offset;
    let clamped = local_center.clamp(-half_extents, half_extents);
    let local_delta = local_center - clamped;
    let dist_sq = local_delta.length_squared();

    if dist_sq > radius * radius {
        return None;
    }

    if dist_sq > 1e-9 {
        let dist = dist_sq.sqrt();
        let point = box_body
            .world_transform
            .transform_point3a(clamped + box_body.shape_offset);
        let normal = (sphere_center - point) / dist;
        Some((point, normal, radius - dist))
    } else {
        // Center inside the box: push out along the thinnest face.
        let face_dists = half_extents - local_center.abs();
        let (axis, dist) = if face_dists.x <= face_dists.y && face_dists.x <= face_dists.z {
            (Vec3A::X * local_center.x.signum(), face_dists.x)
        } else if face_dists.y <= face_dists.z {
            (Vec3A::Y * local_center.y.signum(), face_dists.y)
        } else {
            (Vec3A::Z * local_center.z.signum(), face_dists.z)
        };

        let normal = box_body.world_transform.matrix3 * axis;
        Some((sphere_center, normal, radius + dist))
    }
}

/// OBB vs OBB separating-axis test; normal points from B toward A.
fn box_box_contact(
    a: &RigidBody,
    ha: Vec3A,
    b: &RigidBody,
    hb: Vec3A,
) -> Option<(Vec3A, Vec3A, f32)> {
    let rot_a = a.world_transform.matrix3;
    let rot_b = b.world_transform.matrix3;
    let delta = a.shape_center() - b.shape_center();

    let axes_a = [rot_a.x_axis, rot_a.y_axis, rot_a.z_axis];
    let axes_b = [rot_b.x_axis, rot_b.y_axis, rot_b.z_axis];

    let mut min_overlap = f32::MAX;
    let mut min_axis = Vec3A::Z;

    let mut test_axis = |axis: Vec3A| -> bool {
        let len_sq = axis.length_squared();
        if len_sq < 1e-9 {
            return true;
        }
        let axis = axis / len_sq.sqrt();

        let project = |axes: &[Vec3A; 3], he: Vec3A| -> f32 {
            he.x * axes[0].dot(axis).abs()
                + he.y * axes[1].dot(axis).abs()
                + he.z * axes[2].dot(axis).abs()
        };

        let overlap = project(&axes_a, ha) + project(&axes_b, hb) - delta.dot(axis).abs();
        if overlap <= 0.0 {
            return false;
        }
        if overlap < min_overlap {
            min_overlap = overlap;
            min_axis = if delta.dot(axis) >= 0.0 { axis } else { -axis };
        }
        true
    };

    for axis in axes_a {
        if !test_axis(axis) {
            return None;
        }
    }
    for axis in axes_b {
        if !test_axis(axis) {
            return None;
        }
    }
    for ax_a in axes_a {
        for ax_b in axes_b {
            if !test_axis(ax_a.cross(ax_b)) {
                return None;
            }
        }
    }

    // Contact point: midpoint of each center clamped into the other box.
    let clamp_into = |body: &RigidBody, he: Vec3A, p: Vec3A| -> Vec3A {
        let local = body.world_transform.inverse().transform_point3a(p) - body.shape_offset;
        body.world_transform
            .transform_point3a(local.clamp(-he, he) + body.shape_offset)
    };
    let pa = clamp_into(a, ha, b.shape_center());
    let pb = clamp_into(b, hb, a.shape_center());
    let point = (pa + pb) * 0.5;

    Some((point, min_axis, min_overlap))
}
