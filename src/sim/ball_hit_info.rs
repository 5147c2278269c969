use glam::Vec3A;

/// The most recent ball touch recorded for a car.
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BallHitInfo {
    /// Ball position minus car position at the moment of the hit.
    pub relative_pos_on_ball: Vec3A,
    /// World position of the ball when the hit occurred.
    pub ball_pos: Vec3A,
    /// Extra velocity added on top of the base collision response.
    pub extra_hit_vel: Vec3A,
    /// Arena tick count when the hit occurred.
    pub tick_count_when_hit: u64,
    /// Tick count when the last extra impulse was applied. The extra
    /// impulse is never applied on two consecutive ticks.
    pub tick_count_when_extra_impulse_applied: u64,
}
