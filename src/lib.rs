//! Deterministic fixed-tick simulator of arcade car-soccer, built for
//! reinforcement-learning rollout throughput.
//!
//! An [`Arena`](sim::Arena) owns one ball, any number of cars, the boost
//! pads of its game mode, and a rigid-body world. `Arena::step` advances
//! the simulation by whole ticks; gameplay contacts are recorded during
//! the physics step and resolved afterwards into events (ball touches,
//! bumps, demolitions, pickups, goals) that fire user callbacks.
//! [`gym`] exports fixed-layout float tensors for RL consumers, and
//! [`parallel::multi_step`] drives many independent arenas across threads.

pub mod consts;
pub mod dynamics;
pub mod gym;
pub mod parallel;
pub mod sim;
pub mod viser;

mod callbacks;
mod collision_meshes;
mod error;
mod logging;
mod math;

pub use callbacks::{
    BallTouchFn, BoostPickupFn, CallbackData, CallbackError, CallbackResult, CarBumpFn, CarDemoFn,
    GoalScoreFn,
};
pub use collision_meshes::{init, init_from_default, is_initialized};
pub use error::ArenaError;
pub use math::Angle;
pub use sim::{Arena, ArenaConfig, ArenaMemWeightMode, GameMode, Team};

/// Process-wide result alias for arena operations.
pub type Result<T> = std::result::Result<T, ArenaError>;
