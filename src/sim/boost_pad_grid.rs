use super::{BoostPad, BoostPadConfig};

/// The arena's boost pads in canonical order: lexicographic by (y, x) of
/// the pad position. Snapshot exports and the wire protocol rely on this
/// ordering being stable.
#[derive(Clone, Debug, Default)]
pub(crate) struct BoostPadGrid {
    pads: Vec<BoostPad>,
    max_pad_z: f32,
}

impl BoostPadGrid {
    #[must_use]
    pub fn new(pad_configs: &[BoostPadConfig]) -> Self {
        let mut configs = pad_configs.to_vec();
        configs.sort_by(|a, b| {
            (a.pos.y, a.pos.x)
                .partial_cmp(&(b.pos.y, b.pos.x))
                .expect("pad positions must not be NaN")
        });

        let pads: Vec<BoostPad> = configs.into_iter().map(BoostPad::new).collect();
        let max_pad_z = pads
            .iter()
            .map(|pad| pad.config().pos.z + crate::consts::boost_pads::CYL_HEIGHT)
            .fold(0.0, f32::max);

        Self { pads, max_pad_z }
    }

    #[must_use]
    pub fn pads(&self) -> &[BoostPad] {
        &self.pads
    }

    #[must_use]
    pub fn pads_mut(&mut self) -> &mut [BoostPad] {
        &mut self.pads
    }

    pub fn reset(&mut self) {
        for pad in &mut self.pads {
            pad.reset();
        }
    }

    /// Index of the first active pad whose pickup volume contains
    /// `car_pos`, if any.
    #[must_use]
    pub fn find_pickup(&self, car_pos: glam::Vec3A) -> Option<usize> {
        if self.pads.is_empty() || car_pos.z > self.max_pad_z {
            return None;
        }

        self.pads
            .iter()
            .position(|pad| pad.state.is_active && pad.contains(car_pos))
    }

    /// Decrement cooldowns; pads whose cooldown expires reactivate.
    pub fn tick_cooldowns(&mut self, tick_time: f32) {
        for pad in &mut self.pads {
            if !pad.state.is_active {
                pad.state.cooldown = (pad.state.cooldown - tick_time).max(0.0);
                if pad.state.cooldown == 0.0 {
                    pad.state.is_active = true;
                }
            }
        }
    }
}
