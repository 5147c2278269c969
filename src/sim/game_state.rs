use super::{BallState, BoostPadConfig, BoostPadState, CarConfig, CarState, GameMode, Team};

#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoostPadInfo {
    pub config: BoostPadConfig,
    pub state: BoostPadState,
}

#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarInfo {
    pub id: u32,
    pub team: Team,
    pub state: CarState,
    pub config: CarConfig,
}

/// A complete point-in-time copy of an arena, used for the visualizer
/// wire format, on-disk snapshots, and whole-arena state transfer.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    pub tick_count: u64,
    pub tick_rate: f32,
    pub game_mode: GameMode,
    pub ball: BallState,
    pub pads: Vec<BoostPadInfo>,
    pub cars: Vec<CarInfo>,
}
