//! The rigid-body engine the simulation core drives.
//!
//! This module presents the narrow interface the gameplay layer needs —
//! rigid bodies with forces and impulses, a fixed-step world that records
//! contacts through a [`ContactSink`] without dispatching them, and ray
//! casts for wheel suspension. World geometry is composed of static
//! planes; dynamic narrowphase covers sphere/box pairs.
//!
//! Nothing in here knows about gameplay. Contact materials are resolved
//! through a [`MaterialTable`] supplied at construction so the gameplay
//! layer controls friction/restitution pairing without reaching into the
//! solver.

mod rigid_body;
mod shapes;
mod vehicle;
mod world;

pub use rigid_body::{RigidBody, RigidBodyConstructionInfo};
pub use shapes::Shape;
pub use vehicle::{Wheel, WheelRaycastInfo};
pub use world::{
    ContactInfo, ContactSink, DynamicsWorld, MaterialTable, RayHit, StaticPlane, USER_INDEX_NONE,
};
