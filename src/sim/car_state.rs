use glam::Vec3A;

use super::{BallHitInfo, CarControls, PhysState};
use crate::consts;

/// Contact with another car, for bump/demo cooldown tracking.
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarContact {
    pub other_car_id: u32,
    pub cooldown_timer: f32,
}

/// Contact with static world geometry from the last physics step.
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldContact {
    pub has_contact: bool,
    pub contact_normal: Vec3A,
}

#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarState {
    pub phys: PhysState,
    /// Controls the car will simulate with next tick.
    pub controls: CarControls,
    /// Controls from the previous simulated tick; jump is edge-triggered
    /// against these.
    pub prev_controls: CarControls,
    /// True if at least 3 wheels have contact.
    pub is_on_ground: bool,
    /// Per-wheel contact, front pair first.
    pub wheels_with_contact: [bool; 4],
    /// Whether we jumped to get into the air. Can be false while airborne
    /// after driving off a surface.
    pub has_jumped: bool,
    pub is_jumping: bool,
    /// Time since the jump started, while jumping or airborne from one.
    pub jump_time: f32,
    pub has_double_jumped: bool,
    /// Time airborne since the jump ended; the double-jump/flip window
    /// runs against this.
    pub air_time_since_jump: f32,
    /// Total time spent airborne.
    pub air_time: f32,
    pub has_flipped: bool,
    pub is_flipping: bool,
    pub flip_time: f32,
    /// Relative torque direction of the flip; a forward flip has
    /// positive Y.
    pub flip_rel_torque: Vec3A,
    pub is_auto_flipping: bool,
    pub auto_flip_timer: f32,
    pub auto_flip_torque_scale: f32,
    /// 0 to 100.
    pub boost: f32,
    pub is_boosting: bool,
    /// There is a minimum boosting time, so time spent boosting is state.
    pub boosting_time: f32,
    /// Counts up since boosting stopped; drives recharge-boost delay.
    pub time_since_boosted: f32,
    pub is_supersonic: bool,
    /// Time spent supersonic, checked against the maintain window.
    pub supersonic_time: f32,
    /// Handbrake input has a rise/fall rate, so its value is state.
    pub handbrake_val: f32,
    pub is_demoed: bool,
    pub demo_respawn_timer: f32,
    pub world_contact: WorldContact,
    pub car_contact: CarContact,
    pub ball_hit_info: Option<BallHitInfo>,
    /// Ticks since this state was last written from outside.
    pub tick_count_since_update: u64,
}

impl Default for CarState {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl CarState {
    pub const DEFAULT: Self = Self {
        phys: PhysState {
            pos: Vec3A::new(0.0, 0.0, consts::car::spawn::SPAWN_Z),
            rot_mat: glam::Mat3A::IDENTITY,
            vel: Vec3A::ZERO,
            ang_vel: Vec3A::ZERO,
        },
        controls: CarControls::DEFAULT,
        prev_controls: CarControls::DEFAULT,
        is_on_ground: true,
        wheels_with_contact: [false; 4],
        has_jumped: false,
        is_jumping: false,
        jump_time: 0.0,
        has_double_jumped: false,
        air_time_since_jump: 0.0,
        air_time: 0.0,
        has_flipped: false,
        is_flipping: false,
        flip_time: 0.0,
        flip_rel_torque: Vec3A::ZERO,
        is_auto_flipping: false,
        auto_flip_timer: 0.0,
        auto_flip_torque_scale: 0.0,
        boost: consts::car::boost::SPAWN_AMOUNT,
        is_boosting: false,
        boosting_time: 0.0,
        time_since_boosted: 0.0,
        is_supersonic: false,
        supersonic_time: 0.0,
        handbrake_val: 0.0,
        is_demoed: false,
        demo_respawn_timer: 0.0,
        world_contact: WorldContact {
            has_contact: false,
            contact_normal: Vec3A::ZERO,
        },
        car_contact: CarContact {
            other_car_id: 0,
            cooldown_timer: 0.0,
        },
        ball_hit_info: None,
        tick_count_since_update: 0,
    };

    /// True while the car still has a jump or flip available: on the
    /// ground, or inside the double-jump window after a jump.
    #[must_use]
    pub fn has_flip_or_jump(&self) -> bool {
        self.is_on_ground
            || (self.has_jumped
                && !self.has_double_jumped
                && !self.has_flipped
                && self.air_time_since_jump <= consts::car::jump::DOUBLEJUMP_MAX_DELAY)
    }

    /// Airborne with an unused jump (left the ground without jumping).
    #[must_use]
    pub fn has_flip_reset(&self) -> bool {
        !self.is_on_ground && !self.has_jumped
    }
}
