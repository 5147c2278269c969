//! Every gameplay constant and curve table in one place.
//!
//! All distances are in game units (2 cm), all times in seconds, all
//! angles in radians. The curve tables are fixed data; changing them
//! changes gameplay, not tuning.

/// Downward gravity, uu/s^2.
pub const GRAVITY_Z: f32 = -650.0;

/// Friction/restitution pair used when combining contact materials.
#[derive(Clone, Copy, Debug)]
pub struct MaterialCoefs {
    pub friction: f32,
    pub restitution: f32,
}

pub mod arena {
    pub const EXTENT_X: f32 = 4096.0;
    pub const EXTENT_Y: f32 = 5120.0;
    pub const HEIGHT: f32 = 2048.0;

    pub const EXTENT_X_HOOPS: f32 = 8900.0 / 3.0;
    pub const EXTENT_Y_HOOPS: f32 = 3581.0;
    pub const HEIGHT_HOOPS: f32 = 1820.0;

    pub const HEIGHT_DROPSHOT: f32 = 2024.0;
    pub const FLOOR_HEIGHT_DROPSHOT: f32 = 1.5;
}

pub mod ball {
    use super::MaterialCoefs;
    use crate::GameMode;

    pub const MASS: f32 = 30.0;
    pub const MAX_SPEED: f32 = 6000.0;
    pub const MAX_ANG_SPEED: f32 = 6.0;
    /// Linear damping applied by the world each tick.
    pub const DRAG: f32 = 0.03;

    pub const RADIUS_SOCCAR: f32 = 91.25;
    pub const RADIUS_HOOPS: f32 = 96.383_07;
    pub const RADIUS_DROPSHOT: f32 = 100.256_5;

    /// Resting height of the ball at kickoff.
    pub const REST_Z: f32 = 93.15;

    pub const COEFS: MaterialCoefs = MaterialCoefs {
        friction: 0.35,
        restitution: 0.6,
    };

    #[must_use]
    pub const fn get_radius(game_mode: GameMode) -> f32 {
        match game_mode {
            GameMode::Hoops => RADIUS_HOOPS,
            GameMode::Dropshot => RADIUS_DROPSHOT,
            GameMode::Snowday => crate::consts::snowday::PUCK_RADIUS,
            _ => RADIUS_SOCCAR,
        }
    }

    pub mod car_hit_impulse {
        /// Relative speed above this adds no further extra impulse.
        pub const MAX_DELTA_VEL: f32 = 4600.0;
        pub const Z_SCALE_NORMAL: f32 = 0.35;
        pub const Z_SCALE_HOOPS_GROUND: f32 = 0.55;
        pub const Z_SCALE_HOOPS_NORMAL_Z_THRESH: f32 = 0.75;
        pub const FORWARD_SCALE: f32 = 0.65;
    }
}

pub mod car {
    use super::MaterialCoefs;

    pub const MASS: f32 = 180.0;
    pub const MAX_SPEED: f32 = 2300.0;
    pub const MAX_ANG_SPEED: f32 = 5.5;

    pub const HIT_BALL_COEFS: MaterialCoefs = MaterialCoefs {
        friction: 2.0,
        restitution: 0.0,
    };
    pub const HIT_CAR_COEFS: MaterialCoefs = MaterialCoefs {
        friction: 0.09,
        restitution: 0.1,
    };
    pub const HIT_WORLD_COEFS: MaterialCoefs = MaterialCoefs {
        friction: 0.3,
        restitution: 0.3,
    };

    pub mod drive {
        /// Peak ground engine acceleration at standstill, uu/s^2.
        pub const ENGINE_ACCEL: f32 = 1600.0;
        /// Full braking deceleration, uu/s^2.
        pub const BRAKE_ACCEL: f32 = 3500.0;
        /// Fraction of full brake applied while coasting.
        pub const COASTING_BRAKE_FACTOR: f32 = 0.15;
        /// Below this forward speed the car brakes to a dead stop.
        pub const STOPPING_FORWARD_VEL: f32 = 25.0;
        /// Throttle inputs under this magnitude count as no throttle.
        pub const THROTTLE_DEADZONE: f32 = 0.001;
        /// Above this speed, braking against the velocity zeroes engine
        /// throttle entirely.
        pub const BRAKING_NO_THROTTLE_SPEED_THRESH: f32 = 0.01;
        /// Air throttle acceleration, uu/s^2.
        pub const THROTTLE_AIR_ACCEL: f32 = 200.0 / 3.0;

        pub const POWERSLIDE_RISE_RATE: f32 = 5.0;
        pub const POWERSLIDE_FALL_RATE: f32 = 2.0;

        /// Distance between front and back wheel rows, used to turn the
        /// steering-angle curve into a yaw rate.
        pub const WHEELBASE: f32 = 85.0;
        /// How quickly the yaw rate converges on the steering target, 1/s.
        pub const STEER_YAW_RESPONSE: f32 = 12.0;
    }

    pub mod boost {
        pub const MAX: f32 = 100.0;
        pub const USED_PER_SECOND: f32 = 100.0 / 3.0;
        /// Once started, boosting continues at least this long.
        pub const MIN_TIME: f32 = 0.1;
        pub const ACCEL_GROUND: f32 = 2975.0 / 3.0;
        pub const ACCEL_AIR: f32 = 3175.0 / 3.0;
        pub const SPAWN_AMOUNT: f32 = 100.0 / 3.0;
        pub const RECHARGE_PER_SECOND: f32 = 10.0;
        pub const RECHARGE_DELAY: f32 = 0.25;
    }

    pub mod jump {
        pub const ACCEL: f32 = 4375.0 / 3.0;
        pub const IMMEDIATE_FORCE: f32 = 875.0 / 3.0;
        pub const MIN_TIME: f32 = 0.025;
        pub const MAX_TIME: f32 = 0.2;
        /// Extra grace period before a landed jump is reset, so a
        /// minimum-length jump isn't cancelled while still leaving the
        /// ground.
        pub const RESET_TIME_PAD: f32 = 1.0 / 40.0;
        pub const DOUBLEJUMP_MAX_DELAY: f32 = 1.25;
    }

    pub mod flip {
        pub const TORQUE_TIME: f32 = 0.65;
        pub const PITCHLOCK_EXTRA_TIME: f32 = 0.3;
        pub const TORQUE_X: f32 = 260.0;
        pub const TORQUE_Y: f32 = 224.0;
        pub const INITIAL_VEL_SCALE: f32 = 500.0;
        pub const FORWARD_IMPULSE_MAX_SPEED_SCALE: f32 = 1.0;
        pub const SIDE_IMPULSE_MAX_SPEED_SCALE: f32 = 1.9;
        pub const BACKWARD_IMPULSE_MAX_SPEED_SCALE: f32 = 2.5;
        pub const BACKWARD_IMPULSE_SCALE_X: f32 = 16.0 / 15.0;
        /// Z-velocity damping per 120 Hz tick inside the damp window.
        pub const Z_DAMP_120: f32 = 0.35;
        pub const Z_DAMP_START: f32 = 0.15;
        pub const Z_DAMP_END: f32 = 0.21;
    }

    pub mod air_control {
        use glam::Vec3A;

        /// Angular acceleration per full input, rad/s^2 (pitch, yaw, roll).
        pub const TORQUE: Vec3A = Vec3A::new(12.15, 8.92, 38.34);
        /// Angular damping, 1/s (pitch, yaw, roll). Roll is always damped;
        /// pitch and yaw only against the unused input fraction.
        pub const DAMPING: Vec3A = Vec3A::new(2.8, 1.89, 4.47);
    }

    pub mod supersonic {
        pub const START_SPEED: f32 = 2200.0;
        pub const MAINTAIN_MIN_SPEED: f32 = 2100.0;
        pub const MAINTAIN_MAX_TIME: f32 = 1.0;
    }

    pub mod autoflip {
        /// World contact normal must point this much upward.
        pub const NORM_Z_THRESH: f32 = 0.707_106_77;
        pub const ROLL_THRESH: f32 = 2.8;
        pub const TIME: f32 = 0.4;
        pub const IMPULSE: f32 = 200.0;
        pub const TORQUE: f32 = 50.0;
    }

    pub mod autoroll {
        pub const FORCE: f32 = 100.0;
        pub const TORQUE: f32 = 80.0;
    }

    pub mod bump {
        pub const COOLDOWN_TIME: f32 = 0.25;
        /// Local-space X beyond which a hit counts as a bumper hit.
        pub const MIN_FORWARD_DIST: f32 = 64.5;
    }

    pub mod spawn {
        use crate::GameMode;

        pub const SPAWN_Z: f32 = 17.0;
        pub const RESPAWN_TIME: f32 = 3.0;
        /// Extra Y offset per additional car stacked on a respawn slot.
        pub const EXTRA_OFFSET_Y: f32 = 250.0;

        /// A spawn slot on the blue half; orange mirrors through the
        /// origin.
        #[derive(Clone, Copy, Debug)]
        pub struct SpawnLocation {
            pub x: f32,
            pub y: f32,
            pub yaw_ang: f32,
        }

        const fn loc(x: f32, y: f32, yaw_ang: f32) -> SpawnLocation {
            SpawnLocation { x, y, yaw_ang }
        }

        use core::f32::consts::PI;

        pub const KICKOFF_SOCCAR: [SpawnLocation; 5] = [
            loc(-2048.0, -2560.0, 0.25 * PI),
            loc(2048.0, -2560.0, 0.75 * PI),
            loc(-256.0, -3840.0, 0.5 * PI),
            loc(256.0, -3840.0, 0.5 * PI),
            loc(0.0, -4608.0, 0.5 * PI),
        ];

        pub const KICKOFF_HOOPS: [SpawnLocation; 5] = [
            loc(-1536.0, -3072.0, 0.5 * PI),
            loc(1536.0, -3072.0, 0.5 * PI),
            loc(-256.0, -2816.0, 0.5 * PI),
            loc(256.0, -2816.0, 0.5 * PI),
            loc(0.0, -3200.0, 0.5 * PI),
        ];

        pub const RESPAWN_SOCCAR: [SpawnLocation; 4] = [
            loc(-2304.0, -4608.0, 0.5 * PI),
            loc(-1152.0, -4608.0, 0.5 * PI),
            loc(1152.0, -4608.0, 0.5 * PI),
            loc(2304.0, -4608.0, 0.5 * PI),
        ];

        pub const RESPAWN_HOOPS: [SpawnLocation; 4] = [
            loc(-1920.0, -3072.0, 0.5 * PI),
            loc(-960.0, -3072.0, 0.5 * PI),
            loc(960.0, -3072.0, 0.5 * PI),
            loc(1920.0, -3072.0, 0.5 * PI),
        ];

        #[must_use]
        pub fn get_kickoff_locations(game_mode: GameMode) -> &'static [SpawnLocation] {
            match game_mode {
                GameMode::Hoops => &KICKOFF_HOOPS,
                _ => &KICKOFF_SOCCAR,
            }
        }

        #[must_use]
        pub fn get_respawn_locations(game_mode: GameMode) -> &'static [SpawnLocation] {
            match game_mode {
                GameMode::Hoops => &RESPAWN_HOOPS,
                _ => &RESPAWN_SOCCAR,
            }
        }
    }
}

pub mod suspension {
    /// Restoring acceleration per unit of compression, 1/s^2. Tuned so a
    /// spawned car (sticky downforce included) rests at spawn height.
    pub const STIFFNESS: f32 = 72.0;
    /// Damping against compression velocity while compressing, 1/s.
    pub const DAMPING_COMPRESSION: f32 = 17.0;
    /// Damping while extending, 1/s.
    pub const DAMPING_RELAXATION: f32 = 16.0;
    pub const FORCE_SCALE_FRONT: f32 = 1.0;
    pub const FORCE_SCALE_BACK: f32 = 1.0;
    /// How far past the rest length a wheel can extend before losing
    /// contact.
    pub const MAX_TRAVEL: f32 = 12.0;
    /// Lateral grip impulse fraction resolved per tick.
    pub const LAT_GRIP: f32 = 0.9;
}

pub mod goal {
    /// Ball center Y past this (plus ball radius) counts as a soccar goal.
    pub const SOCCAR_THRESHOLD_Y: f32 = 5121.75;
    /// Soccar goal mouth half-width and height, for shot prediction.
    pub const HALF_WIDTH: f32 = 893.0;
    pub const HEIGHT: f32 = 642.775;
    /// Below this height a hoops ball can be inside a hoop.
    pub const HOOPS_SCORE_THRESHOLD_Z: f32 = 270.0;
    pub const HOOPS_RIM_SCALE_Y: f32 = 0.9;
    pub const HOOPS_RIM_OFFSET_Y: f32 = 2770.0;
    pub const HOOPS_RIM_RADIUS: f32 = 716.0;
}

pub mod boost_pads {
    use crate::GameMode;
    use glam::Vec3A;

    pub const COOLDOWN_BIG: f32 = 10.0;
    pub const COOLDOWN_SMALL: f32 = 4.0;
    pub const BOOST_AMOUNT_BIG: f32 = 100.0;
    pub const BOOST_AMOUNT_SMALL: f32 = 12.0;

    pub const CYL_HEIGHT: f32 = 95.0;
    pub const CYL_RAD_BIG: f32 = 208.0;
    pub const CYL_RAD_SMALL: f32 = 144.0;

    pub const LOCATIONS_BIG_SOCCAR: [Vec3A; 6] = [
        Vec3A::new(-3584.0, 0.0, 73.0),
        Vec3A::new(3584.0, 0.0, 73.0),
        Vec3A::new(-3072.0, -4096.0, 73.0),
        Vec3A::new(3072.0, -4096.0, 73.0),
        Vec3A::new(-3072.0, 4096.0, 73.0),
        Vec3A::new(3072.0, 4096.0, 73.0),
    ];

    pub const LOCATIONS_SMALL_SOCCAR: [Vec3A; 28] = [
        Vec3A::new(0.0, -4240.0, 70.0),
        Vec3A::new(-1792.0, -4184.0, 70.0),
        Vec3A::new(1792.0, -4184.0, 70.0),
        Vec3A::new(-940.0, -3308.0, 70.0),
        Vec3A::new(940.0, -3308.0, 70.0),
        Vec3A::new(0.0, -2816.0, 70.0),
        Vec3A::new(-3584.0, -2484.0, 70.0),
        Vec3A::new(3584.0, -2484.0, 70.0),
        Vec3A::new(-1788.0, -2300.0, 70.0),
        Vec3A::new(1788.0, -2300.0, 70.0),
        Vec3A::new(-2048.0, -1036.0, 70.0),
        Vec3A::new(0.0, -1024.0, 70.0),
        Vec3A::new(2048.0, -1036.0, 70.0),
        Vec3A::new(-1024.0, 0.0, 70.0),
        Vec3A::new(1024.0, 0.0, 70.0),
        Vec3A::new(-2048.0, 1036.0, 70.0),
        Vec3A::new(0.0, 1024.0, 70.0),
        Vec3A::new(2048.0, 1036.0, 70.0),
        Vec3A::new(-1788.0, 2300.0, 70.0),
        Vec3A::new(1788.0, 2300.0, 70.0),
        Vec3A::new(-3584.0, 2484.0, 70.0),
        Vec3A::new(3584.0, 2484.0, 70.0),
        Vec3A::new(0.0, 2816.0, 70.0),
        Vec3A::new(-940.0, 3308.0, 70.0),
        Vec3A::new(940.0, 3308.0, 70.0),
        Vec3A::new(-1792.0, 4184.0, 70.0),
        Vec3A::new(1792.0, 4184.0, 70.0),
        Vec3A::new(0.0, 4240.0, 70.0),
    ];

    pub const LOCATIONS_BIG_HOOPS: [Vec3A; 6] = [
        Vec3A::new(-2176.0, -2944.0, 72.0),
        Vec3A::new(2176.0, -2944.0, 72.0),
        Vec3A::new(-2432.0, 0.0, 72.0),
        Vec3A::new(2432.0, 0.0, 72.0),
        Vec3A::new(-2176.0, 2944.0, 72.0),
        Vec3A::new(2176.0, 2944.0, 72.0),
    ];

    pub const LOCATIONS_SMALL_HOOPS: [Vec3A; 14] = [
        Vec3A::new(0.0, -2816.0, 64.0),
        Vec3A::new(-1280.0, -2304.0, 64.0),
        Vec3A::new(1280.0, -2304.0, 64.0),
        Vec3A::new(-1536.0, -1024.0, 64.0),
        Vec3A::new(1536.0, -1024.0, 64.0),
        Vec3A::new(0.0, -1024.0, 64.0),
        Vec3A::new(-512.0, 0.0, 64.0),
        Vec3A::new(512.0, 0.0, 64.0),
        Vec3A::new(-1536.0, 1024.0, 64.0),
        Vec3A::new(1536.0, 1024.0, 64.0),
        Vec3A::new(0.0, 1024.0, 64.0),
        Vec3A::new(-1280.0, 2304.0, 64.0),
        Vec3A::new(1280.0, 2304.0, 64.0),
        Vec3A::new(0.0, 2816.0, 64.0),
    ];

    #[must_use]
    pub fn get_locations(game_mode: GameMode, big: bool) -> &'static [Vec3A] {
        match (game_mode, big) {
            (GameMode::Hoops, true) => &LOCATIONS_BIG_HOOPS,
            (GameMode::Hoops, false) => &LOCATIONS_SMALL_HOOPS,
            (_, true) => &LOCATIONS_BIG_SOCCAR,
            (_, false) => &LOCATIONS_SMALL_SOCCAR,
        }
    }
}

pub mod heatseeker {
    use glam::Vec3A;

    pub const INITIAL_TARGET_SPEED: f32 = 2900.0;
    pub const TARGET_SPEED_INCREMENT: f32 = 85.0;
    /// Seconds that must pass between touch-driven speedups.
    pub const MIN_SPEEDUP_INTERVAL: f32 = 1.0;
    pub const TARGET_Y: f32 = 5120.0;
    pub const TARGET_Z: f32 = 320.0;
    /// Per-second blend rates toward the target direction.
    pub const HORIZONTAL_BLEND: f32 = 1.45;
    pub const VERTICAL_BLEND: f32 = 0.78;
    pub const SPEED_BLEND: f32 = 0.3;
    pub const MAX_TURN_PITCH: f32 = 7000.0 * core::f32::consts::PI / 32768.0;
    pub const MAX_SPEED: f32 = 4600.0;
    /// Backboard bounces past this |y| flip the target net.
    pub const WALL_BOUNCE_CHANGE_Y_THRESH: f32 = 300.0;
    pub const WALL_BOUNCE_CHANGE_Y_NORMAL: f32 = 0.5;
    pub const WALL_BOUNCE_FORCE_SCALE: f32 = 1.0 / 3.0;
    pub const WALL_BOUNCE_UP_FRAC: f32 = 0.3;

    pub const BALL_START_POS: Vec3A = Vec3A::new(-1000.0, -2220.0, 92.75);
    pub const BALL_START_VEL: Vec3A = Vec3A::new(0.0, -65.0, 650.0);
}

pub mod snowday {
    use super::MaterialCoefs;

    pub const PUCK_RADIUS: f32 = 114.25;
    pub const PUCK_MASS: f32 = 50.0;
    pub const PUCK_COEFS: MaterialCoefs = MaterialCoefs {
        friction: 0.1,
        restitution: 0.3,
    };
    /// Downward acceleration pressing a grounded puck into the ice.
    pub const PUCK_GROUND_STICK_ACCEL: f32 = 500.0;
    /// Vertical speed under which the stick force engages.
    pub const PUCK_STICK_VEL_THRESH: f32 = 20.0;
}

pub mod dropshot {
    /// Minimum approach speed for a hit to charge the ball.
    pub const MIN_CHARGE_HIT_SPEED: f32 = 500.0;
    pub const MIN_ABSORBED_FORCE_FOR_CHARGE: f32 = 2500.0;
    pub const MIN_ABSORBED_FORCE_FOR_SUPERCHARGE: f32 = 11000.0;
    /// Seconds between tile damage applications.
    pub const MIN_DAMAGE_INTERVAL: f32 = 0.1;

    pub const NUM_TILES_PER_TEAM: usize = 70;
    pub const TILES_PER_ROW: usize = 10;
    pub const NUM_ROWS: usize = 7;
    /// Center-to-center spacing within a row.
    pub const TILE_SPACING_X: f32 = 768.0;
    /// Row-to-row spacing.
    pub const TILE_SPACING_Y: f32 = 665.0;
    /// Y of the row nearest midfield.
    pub const FIRST_ROW_Y: f32 = 380.0;

    /// Kickoff ball pop: delay then vertical launch.
    pub const BALL_LAUNCH_DELAY: f32 = 0.26;
    pub const BALL_LAUNCH_Z_VEL: f32 = 985.0;
}

pub mod curves {
    use crate::sim::LinearPieceCurve;

    pub const STEER_ANGLE_FROM_SPEED: LinearPieceCurve<6> = LinearPieceCurve::new([
        (0.0, 0.533_56),
        (500.0, 0.319_30),
        (1000.0, 0.182_03),
        (1500.0, 0.105_70),
        (1750.0, 0.085_07),
        (3000.0, 0.034_54),
    ]);

    pub const POWERSLIDE_STEER_ANGLE_FROM_SPEED: LinearPieceCurve<2> =
        LinearPieceCurve::new([(0.0, 0.392_35), (2500.0, 0.126_10)]);

    pub const DRIVE_SPEED_TORQUE_FACTOR: LinearPieceCurve<3> =
        LinearPieceCurve::new([(0.0, 1.0), (1400.0, 0.1), (1410.0, 0.0)]);

    pub const NON_STICKY_FRICTION_FACTOR: LinearPieceCurve<3> =
        LinearPieceCurve::new([(0.0, 0.1), (0.7075, 0.5), (1.0, 1.0)]);

    pub const LAT_FRICTION: LinearPieceCurve<2> = LinearPieceCurve::new([(0.0, 1.0), (1.0, 0.2)]);

    /// Lateral grip multiplier at full handbrake.
    pub const HANDBRAKE_LAT_FRICTION: LinearPieceCurve<1> = LinearPieceCurve::new([(0.0, 0.1)]);

    pub const HANDBRAKE_LONG_FRICTION: LinearPieceCurve<2> =
        LinearPieceCurve::new([(0.0, 0.7), (1.0, 1.0)]);

    pub const BALL_CAR_EXTRA_IMPULSE_FACTOR: LinearPieceCurve<4> = LinearPieceCurve::new([
        (0.0, 0.65),
        (500.0, 0.65),
        (2300.0, 0.55),
        (4600.0, 0.30),
    ]);

    pub const BUMP_VEL_AMOUNT_GROUND: LinearPieceCurve<3> =
        LinearPieceCurve::new([(0.0, 16.0), (1400.0, 1100.0), (2200.0, 1530.0)]);

    pub const BUMP_VEL_AMOUNT_AIR: LinearPieceCurve<3> =
        LinearPieceCurve::new([(0.0, 16.0), (1400.0, 1390.0), (2200.0, 1945.0)]);

    pub const BUMP_UPWARD_VEL_AMOUNT: LinearPieceCurve<3> =
        LinearPieceCurve::new([(0.0, 10.0), (1400.0, 278.0), (2200.0, 417.0)]);
}
