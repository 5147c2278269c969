use glam::Vec3A;

use super::MutatorConfig;
use crate::consts::boost_pads;

#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoostPadConfig {
    pub pos: Vec3A,
    pub is_big: bool,
}

impl BoostPadConfig {
    pub(crate) fn cooldown(&self, mutator_config: &MutatorConfig) -> f32 {
        if self.is_big {
            mutator_config.boost_pad_cooldown_big
        } else {
            mutator_config.boost_pad_cooldown_small
        }
    }

    pub(crate) fn boost_amount(&self, mutator_config: &MutatorConfig) -> f32 {
        if self.is_big {
            mutator_config.boost_pad_amount_big
        } else {
            mutator_config.boost_pad_amount_small
        }
    }
}

#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoostPadState {
    pub is_active: bool,
    /// Seconds until the pad reactivates. `cooldown > 0` implies
    /// `!is_active`.
    pub cooldown: f32,
}

impl Default for BoostPadState {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl BoostPadState {
    pub const DEFAULT: Self = Self {
        is_active: true,
        cooldown: 0.0,
    };
}

#[derive(Clone, Copy, Debug)]
pub struct BoostPad {
    config: BoostPadConfig,
    pickup_radius: f32,
    pub(crate) state: BoostPadState,
}

impl BoostPad {
    #[must_use]
    pub fn new(config: BoostPadConfig) -> Self {
        let pickup_radius = if config.is_big {
            boost_pads::CYL_RAD_BIG
        } else {
            boost_pads::CYL_RAD_SMALL
        };

        Self {
            config,
            pickup_radius,
            state: BoostPadState::DEFAULT,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &BoostPadConfig {
        &self.config
    }

    #[must_use]
    pub const fn get_state(&self) -> &BoostPadState {
        &self.state
    }

    pub const fn set_state(&mut self, state: BoostPadState) {
        self.state = state;
    }

    pub(crate) const fn reset(&mut self) {
        self.state = BoostPadState::DEFAULT;
    }

    /// Whether a car origin is inside this pad's pickup cylinder.
    #[must_use]
    pub fn contains(&self, car_pos: Vec3A) -> bool {
        let delta = car_pos - self.config.pos;
        let dist_sq_2d = delta.x * delta.x + delta.y * delta.y;
        dist_sq_2d < self.pickup_radius * self.pickup_radius
            && delta.z.abs() <= boost_pads::CYL_HEIGHT
    }
}
