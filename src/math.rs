use glam::{EulerRot, Mat3A};

/// Yaw/pitch/roll in radians.
///
/// The rotation order matches the game's convention: yaw about world Z,
/// then pitch about the carried Y, then roll about the carried X —
/// `EulerRot::ZYX` with the pitch sign flipped so that positive pitch
/// tilts the nose up.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Angle {
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

impl Angle {
    #[must_use]
    pub const fn new(yaw: f32, pitch: f32, roll: f32) -> Self {
        Self { yaw, pitch, roll }
    }

    #[must_use]
    pub fn to_rot_mat(self) -> Mat3A {
        Mat3A::from_euler(EulerRot::ZYX, self.yaw, -self.pitch, self.roll)
    }

    #[must_use]
    pub fn from_rot_mat(mat: Mat3A) -> Self {
        let (yaw, neg_pitch, roll) = mat.to_euler(EulerRot::ZYX);
        Self {
            yaw,
            pitch: -neg_pitch,
            roll,
        }
    }
}
