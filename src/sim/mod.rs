mod arena;
mod ball;
mod ball_hit_info;
mod boost_pad;
mod boost_pad_grid;
mod car;
mod car_config;
mod car_controls;
mod car_state;
mod contact;
mod dropshot_tiles;
mod game_mode;
mod game_state;
mod linear_piece_curve;
mod mutator_config;
mod team;

pub use arena::{Arena, ArenaConfig, ArenaMemWeightMode};
pub use ball::{Ball, BallState, DropshotInfo, HeatseekerInfo};
pub use ball_hit_info::BallHitInfo;
pub use boost_pad::{BoostPad, BoostPadConfig, BoostPadState};
pub use car::{Car, CarStats};
pub use car_config::{CarConfig, WheelPairConfig};
pub use car_controls::CarControls;
pub use car_state::{CarContact, CarState, WorldContact};
pub use contact::{CollisionRecord, ContactTracker, GameEvent};
pub use dropshot_tiles::{DropshotTile, DropshotTilesState, TileState};
pub use game_mode::GameMode;
pub use game_state::{BoostPadInfo, CarInfo, GameState};
pub use linear_piece_curve::LinearPieceCurve;
pub use mutator_config::{DemoMode, MutatorConfig};
pub use team::Team;

use glam::{Mat3A, Vec3A};

/// Physics-engine `user_index` tags routing contact records to their
/// gameplay handler. Ordering matters: dispatch normalizes records so the
/// lower tag comes first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(i32)]
pub enum UserInfoType {
    None = 0,
    Car = 1,
    Ball = 2,
    DropshotTile = 3,
}

impl From<i32> for UserInfoType {
    fn from(value: i32) -> Self {
        match value {
            1 => Self::Car,
            2 => Self::Ball,
            3 => Self::DropshotTile,
            _ => Self::None,
        }
    }
}

/// Position, orientation and velocities shared by cars and the ball.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhysState {
    pub pos: Vec3A,
    pub rot_mat: Mat3A,
    pub vel: Vec3A,
    pub ang_vel: Vec3A,
}

impl Default for PhysState {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl PhysState {
    pub const DEFAULT: Self = Self {
        pos: Vec3A::ZERO,
        rot_mat: Mat3A::IDENTITY,
        vel: Vec3A::ZERO,
        ang_vel: Vec3A::ZERO,
    };

    /// The same state seen from the opposing team's frame: x and y of
    /// every vector negated, z preserved.
    #[must_use]
    pub fn get_inverted_y(mut self) -> Self {
        const INVERT_SCALE: Vec3A = Vec3A::new(-1.0, -1.0, 1.0);

        self.pos *= INVERT_SCALE;
        self.vel *= INVERT_SCALE;
        self.ang_vel *= INVERT_SCALE;

        for i in 0..3 {
            *self.rot_mat.col_mut(i) *= INVERT_SCALE;
        }

        self
    }
}
