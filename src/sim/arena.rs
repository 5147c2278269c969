use std::sync::Mutex;

use ahash::AHashMap;
use arrayvec::ArrayVec;
use fastrand::Rng;
use glam::{EulerRot, Mat3A, Vec3A};

use super::boost_pad_grid::BoostPadGrid;
use super::{
    Ball, BallState, BoostPad, BoostPadConfig, BoostPadInfo, BoostPadState, Car, CarConfig,
    CarControls, CarInfo, CarState, CarStats, CollisionRecord, ContactTracker, DemoMode,
    DropshotTilesState, GameEvent, GameMode, GameState, MutatorConfig, PhysState, Team,
    UserInfoType,
};
use crate::callbacks::{
    BallTouchFn, BoostPickupFn, CallbackData, CallbackSlot, CallbackSlots, CarBumpFn, CarDemoFn,
    GoalScoreFn,
};
use crate::consts::{self, boost_pads, curves, dropshot, goal, heatseeker};
use crate::dynamics::{DynamicsWorld, MaterialTable, StaticPlane};
use crate::error::ArenaError;

const MIN_TICK_RATE: u8 = 15;
const MAX_TICK_RATE: u8 = 120;

/// Plane group of the dropshot floor, cleared from the ball's mask when
/// the tile under it has broken away.
const DROPSHOT_FLOOR_GROUP: u32 = 1 << 1;

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub enum ArenaMemWeightMode {
    /// Sized for long-lived arenas with many cars.
    #[default]
    Heavy,
    /// Minimal up-front allocation for massed rollout arenas.
    Light,
}

#[derive(Clone, Debug)]
pub struct ArenaConfig {
    pub mem_weight_mode: ArenaMemWeightMode,
    /// Keep the ball's orientation frozen; the rotation matrix stays
    /// identity and only velocities evolve.
    pub no_ball_rot: bool,
    /// Replace the mode's pad table with `custom_boost_pads`. An empty
    /// custom list falls back to the default table.
    pub use_custom_boost_pads: bool,
    pub custom_boost_pads: Vec<BoostPadConfig>,
    /// Seed for the arena's RNG; `None` draws from entropy.
    pub rng_seed: Option<u64>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            mem_weight_mode: ArenaMemWeightMode::Heavy,
            no_ball_rot: true,
            use_custom_boost_pads: false,
            custom_boost_pads: Vec::new(),
            rng_seed: None,
        }
    }
}

/// Friction/restitution table for tagged contact pairs. Car-world pairs
/// fall through to the bodies' own materials.
fn resolve_pair_materials(tag_a: i32, tag_b: i32) -> Option<(f32, f32)> {
    let (a, b) = (UserInfoType::from(tag_a), UserInfoType::from(tag_b));
    let pair = |x, y| (a == x && b == y) || (a == y && b == x);

    if pair(UserInfoType::Car, UserInfoType::Ball) {
        let coefs = consts::car::HIT_BALL_COEFS;
        Some((coefs.friction, coefs.restitution))
    } else if pair(UserInfoType::Car, UserInfoType::Car) {
        let coefs = consts::car::HIT_CAR_COEFS;
        Some((coefs.friction, coefs.restitution))
    } else {
        None
    }
}

/// The bounded simulation world for one match: one ball, any number of
/// cars, the mode's boost pads, and the rigid-body world they live in.
pub struct Arena {
    game_mode: GameMode,
    config: ArenaConfig,
    mutator_config: MutatorConfig,
    tick_time: f32,
    tick_count: u64,

    pub(crate) world: DynamicsWorld,
    pub(crate) ball: Ball,
    pub(crate) cars: AHashMap<u32, Car>,
    /// Ascending car ids; iteration order for every per-car phase, so
    /// stepping is deterministic regardless of hash state.
    sorted_car_ids: Vec<u32>,
    last_car_id: u32,
    boost_pad_grid: BoostPadGrid,
    dropshot_tiles: Option<DropshotTilesState>,

    contact_tracker: ContactTracker,
    event_queue: Vec<GameEvent>,
    pub(crate) callbacks: Mutex<CallbackSlots>,

    rng: Rng,
    blue_score: u32,
    orange_score: u32,
    ball_scored_latch: bool,
    stop_requested: bool,
    pending_error: Option<ArenaError>,
    pub(crate) last_snapshot_tick: u64,
}

impl Arena {
    /// Build an arena with the default configuration.
    pub fn new(game_mode: GameMode, tick_rate: u8) -> crate::Result<Self> {
        Self::new_with_config(game_mode, ArenaConfig::default(), tick_rate)
    }

    pub fn new_with_config(
        game_mode: GameMode,
        config: ArenaConfig,
        tick_rate: u8,
    ) -> crate::Result<Self> {
        if !(MIN_TICK_RATE..=MAX_TICK_RATE).contains(&tick_rate) {
            return Err(ArenaError::invalid_config(format!(
                "tick rate {tick_rate} outside {MIN_TICK_RATE}..={MAX_TICK_RATE}"
            )));
        }

        for pad in &config.custom_boost_pads {
            if !pad.pos.is_finite() {
                return Err(ArenaError::invalid_config(
                    "custom boost pad position is not finite",
                ));
            }
        }

        let mutator_config = MutatorConfig::new(game_mode);

        let initial_body_capacity = match config.mem_weight_mode {
            ArenaMemWeightMode::Heavy => 8,
            ArenaMemWeightMode::Light => 2,
        };

        let mut world = DynamicsWorld::new(
            mutator_config.gravity,
            MaterialTable {
                resolve: resolve_pair_materials,
            },
            initial_body_capacity,
        );

        if game_mode != GameMode::TheVoid {
            Self::setup_arena_planes(&mut world, game_mode);
        }

        let ball = Ball::new(game_mode, &mut world, &mutator_config, config.no_ball_rot);

        let boost_pad_grid = {
            let mut pad_configs: Vec<BoostPadConfig> = Vec::new();
            if game_mode.has_boost_pads() {
                if config.use_custom_boost_pads && !config.custom_boost_pads.is_empty() {
                    pad_configs.extend_from_slice(&config.custom_boost_pads);
                } else {
                    for &pos in boost_pads::get_locations(game_mode, false) {
                        pad_configs.push(BoostPadConfig { pos, is_big: false });
                    }
                    for &pos in boost_pads::get_locations(game_mode, true) {
                        pad_configs.push(BoostPadConfig { pos, is_big: true });
                    }
                }
            }

            BoostPadGrid::new(&pad_configs)
        };

        let dropshot_tiles =
            (game_mode == GameMode::Dropshot).then(DropshotTilesState::new);

        let rng = config.rng_seed.map_or_else(Rng::new, Rng::with_seed);

        Ok(Self {
            game_mode,
            config,
            mutator_config,
            tick_time: 1.0 / f32::from(tick_rate),
            tick_count: 0,
            world,
            ball,
            cars: AHashMap::with_capacity(6),
            sorted_car_ids: Vec::with_capacity(6),
            last_car_id: 0,
            boost_pad_grid,
            dropshot_tiles,
            contact_tracker: ContactTracker::default(),
            event_queue: Vec::new(),
            callbacks: Mutex::new(CallbackSlots::default()),
            rng,
            blue_score: 0,
            orange_score: 0,
            ball_scored_latch: false,
            stop_requested: false,
            pending_error: None,
            last_snapshot_tick: 0,
        })
    }

    fn setup_arena_planes(world: &mut DynamicsWorld, game_mode: GameMode) {
        debug_assert!(game_mode != GameMode::TheVoid);

        let (extent_x, floor, height) = match game_mode {
            GameMode::Hoops => (
                consts::arena::EXTENT_X_HOOPS,
                0.0,
                consts::arena::HEIGHT_HOOPS,
            ),
            GameMode::Dropshot => (
                consts::arena::EXTENT_X,
                consts::arena::FLOOR_HEIGHT_DROPSHOT,
                consts::arena::HEIGHT_DROPSHOT,
            ),
            _ => (consts::arena::EXTENT_X, 0.0, consts::arena::HEIGHT),
        };

        // The dropshot floor sits in its own plane group so broken tiles
        // can let the ball through.
        let floor_group = if game_mode == GameMode::Dropshot {
            DROPSHOT_FLOOR_GROUP
        } else {
            1
        };
        world.add_static_plane(
            StaticPlane::new(Vec3A::new(0.0, 0.0, floor), Vec3A::Z, 1.0, 1.0)
                .with_group(floor_group),
        );

        let mut add_plane = |pos: Vec3A, normal: Vec3A| {
            world.add_static_plane(StaticPlane::new(pos, normal, 1.0, 1.0));
        };

        // Ceiling.
        add_plane(Vec3A::new(0.0, 0.0, height), Vec3A::NEG_Z);

        // Side walls. Soccar-style modes leave the Y extents open so the
        // ball can cross the goal line.
        add_plane(Vec3A::new(-extent_x, 0.0, height / 2.0), Vec3A::X);
        add_plane(Vec3A::new(extent_x, 0.0, height / 2.0), Vec3A::NEG_X);

        if game_mode == GameMode::Hoops {
            add_plane(
                Vec3A::new(0.0, -consts::arena::EXTENT_Y_HOOPS, height / 2.0),
                Vec3A::Y,
            );
            add_plane(
                Vec3A::new(0.0, consts::arena::EXTENT_Y_HOOPS, height / 2.0),
                Vec3A::NEG_Y,
            );
        }
    }

    #[must_use]
    pub const fn game_mode(&self) -> GameMode {
        self.game_mode
    }

    #[must_use]
    pub const fn get_config(&self) -> &ArenaConfig {
        &self.config
    }

    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick_count
    }

    #[must_use]
    pub const fn tick_time(&self) -> f32 {
        self.tick_time
    }

    #[must_use]
    pub fn get_tick_rate(&self) -> f32 {
        1.0 / self.tick_time
    }

    #[must_use]
    pub const fn mutator_config(&self) -> &MutatorConfig {
        &self.mutator_config
    }

    pub fn set_mutator_config(&mut self, mutator_config: MutatorConfig) {
        self.mutator_config = mutator_config;
        self.world.set_gravity(mutator_config.gravity);

        let rb = &mut self.world.bodies_mut()[self.ball.rigid_body_idx];
        rb.shape = crate::dynamics::Shape::Sphere {
            radius: mutator_config.ball_radius,
        };
        rb.friction = mutator_config.ball_world_friction;
        rb.restitution = mutator_config.ball_world_restitution;
        rb.linear_damping = mutator_config.ball_drag;
    }

    #[must_use]
    pub const fn blue_score(&self) -> u32 {
        self.blue_score
    }

    #[must_use]
    pub const fn orange_score(&self) -> u32 {
        self.orange_score
    }

    #[must_use]
    pub fn get_dropshot_tiles_state(&self) -> Option<&DropshotTilesState> {
        self.dropshot_tiles.as_ref()
    }

    pub fn set_dropshot_tiles_state(&mut self, state: DropshotTilesState) {
        if self.dropshot_tiles.is_some() {
            self.dropshot_tiles = Some(state);
        }
    }

    // ---- cars ----------------------------------------------------------

    /// Add a car; the returned id is unique within this arena and never 0.
    pub fn add_car(&mut self, team: Team, config: CarConfig) -> u32 {
        self.last_car_id += 1;
        let id = self.last_car_id;
        self.insert_car(id, team, config);
        id
    }

    fn insert_car(&mut self, id: u32, team: Team, config: CarConfig) {
        debug_assert!(id > 0 && !self.cars.contains_key(&id));

        let mut car = Car::new(id, team, &mut self.world, &self.mutator_config, config);

        // New cars rest at the default spawn state until placed.
        let spawn_state = *car.get_state();
        car.set_state(
            &mut self.world.bodies_mut()[car.rigid_body_idx],
            &spawn_state,
        );
        self.cars.insert(id, car);

        let pos = self.sorted_car_ids.partition_point(|&other| other < id);
        self.sorted_car_ids.insert(pos, id);
    }

    /// Remove a car. Fails with `InvalidOperation` if the id does not
    /// belong to this arena.
    pub fn remove_car(&mut self, id: u32) -> crate::Result<()> {
        let car = self
            .cars
            .remove(&id)
            .ok_or_else(|| ArenaError::invalid_op(format!("no car with id {id} in this arena")))?;

        self.sorted_car_ids.retain(|&other| other != id);

        // Body removal shifts every later index down by one.
        if car.rigid_body_idx < self.ball.rigid_body_idx {
            self.ball.rigid_body_idx -= 1;
        }
        for other in self.cars.values_mut() {
            if car.rigid_body_idx < other.rigid_body_idx {
                other.rigid_body_idx -= 1;
            }
        }
        self.world.remove_rigid_body(car.rigid_body_idx);

        Ok(())
    }

    pub fn remove_all_cars(&mut self) {
        while let Some(&id) = self.sorted_car_ids.first() {
            self.remove_car(id)
                .expect("sorted_car_ids tracks the car map");
        }
    }

    #[must_use]
    pub fn get_car(&self, id: u32) -> Option<&Car> {
        self.cars.get(&id)
    }

    #[must_use]
    pub fn get_car_mut(&mut self, id: u32) -> Option<&mut Car> {
        self.cars.get_mut(&id)
    }

    /// All cars in ascending-id order.
    #[must_use]
    pub fn get_cars(&self) -> Vec<&Car> {
        self.sorted_car_ids
            .iter()
            .map(|id| &self.cars[id])
            .collect()
    }

    #[must_use]
    pub fn num_cars(&self) -> usize {
        self.cars.len()
    }

    #[must_use]
    pub(crate) fn car_ids(&self) -> &[u32] {
        &self.sorted_car_ids
    }

    pub fn set_car_controls(&mut self, id: u32, controls: CarControls) -> crate::Result<()> {
        self.cars
            .get_mut(&id)
            .ok_or_else(|| ArenaError::invalid_op(format!("no car with id {id} in this arena")))?
            .set_controls(controls);
        Ok(())
    }

    pub fn set_car_state(&mut self, id: u32, state: &CarState) -> crate::Result<()> {
        let car = self
            .cars
            .get_mut(&id)
            .ok_or_else(|| ArenaError::invalid_op(format!("no car with id {id} in this arena")))?;
        car.set_state(&mut self.world.bodies_mut()[car.rigid_body_idx], state);
        Ok(())
    }

    pub fn respawn_car(&mut self, id: u32) -> crate::Result<()> {
        let car = self
            .cars
            .get_mut(&id)
            .ok_or_else(|| ArenaError::invalid_op(format!("no car with id {id} in this arena")))?;
        car.internal_state.is_demoed = false;
        car.respawn(
            &mut self.world.bodies_mut()[car.rigid_body_idx],
            &mut self.rng,
            self.game_mode,
            self.mutator_config.car_spawn_boost_amount,
        );
        Ok(())
    }

    pub fn demolish_car(&mut self, id: u32) -> crate::Result<()> {
        self.cars
            .get_mut(&id)
            .ok_or_else(|| ArenaError::invalid_op(format!("no car with id {id} in this arena")))?
            .demolish(self.mutator_config.respawn_delay);
        Ok(())
    }

    /// Per-car stats; unknown ids read as zeroes.
    #[must_use]
    pub fn get_car_stats(&self, id: u32) -> CarStats {
        self.cars.get(&id).map_or_else(Default::default, |car| car.stats)
    }

    // ---- ball ----------------------------------------------------------

    #[must_use]
    pub const fn get_ball_state(&self) -> &BallState {
        self.ball.get_state()
    }

    pub fn set_ball_state(&mut self, state: BallState) {
        let rb = &mut self.world.bodies_mut()[self.ball.rigid_body_idx];
        self.ball.set_state(rb, state);
        self.ball_scored_latch = false;
    }

    // ---- boost pads ----------------------------------------------------

    /// Pads in canonical (y, x) order.
    #[must_use]
    pub fn get_boost_pads(&self) -> &[BoostPad] {
        self.boost_pad_grid.pads()
    }

    pub fn set_boost_pad_state(&mut self, index: usize, state: BoostPadState) -> crate::Result<()> {
        let pads = self.boost_pad_grid.pads_mut();
        let pad = pads.get_mut(index).ok_or_else(|| {
            ArenaError::invalid_op(format!("boost pad index {index} out of range"))
        })?;
        pad.set_state(state);
        Ok(())
    }

    // ---- callbacks -----------------------------------------------------

    /// Install the goal-score callback, returning the previous one.
    /// Fails on modes without goals.
    pub fn set_goal_score_callback(
        &self,
        func: GoalScoreFn,
        user_data: CallbackData,
    ) -> crate::Result<Option<(GoalScoreFn, CallbackData)>> {
        if !self.game_mode.has_goals() {
            return Err(ArenaError::invalid_config(format!(
                "goal-score callback unsupported in mode {:?}",
                self.game_mode
            )));
        }

        let mut slots = self.callbacks.lock().expect("callback mutex poisoned");
        let prev = slots.goal_score.replace(CallbackSlot::new(func, user_data));
        Ok(prev.map(CallbackSlot::into_parts))
    }

    pub fn set_car_bump_callback(
        &self,
        func: CarBumpFn,
        user_data: CallbackData,
    ) -> Option<(CarBumpFn, CallbackData)> {
        let mut slots = self.callbacks.lock().expect("callback mutex poisoned");
        slots
            .car_bump
            .replace(CallbackSlot::new(func, user_data))
            .map(CallbackSlot::into_parts)
    }

    pub fn set_car_demo_callback(
        &self,
        func: CarDemoFn,
        user_data: CallbackData,
    ) -> Option<(CarDemoFn, CallbackData)> {
        let mut slots = self.callbacks.lock().expect("callback mutex poisoned");
        slots
            .car_demo
            .replace(CallbackSlot::new(func, user_data))
            .map(CallbackSlot::into_parts)
    }

    /// Install the boost-pickup callback, returning the previous one.
    /// Fails on modes without pads.
    pub fn set_boost_pickup_callback(
        &self,
        func: BoostPickupFn,
        user_data: CallbackData,
    ) -> crate::Result<Option<(BoostPickupFn, CallbackData)>> {
        if !self.game_mode.has_boost_pads() {
            return Err(ArenaError::invalid_config(format!(
                "boost-pickup callback unsupported in mode {:?}",
                self.game_mode
            )));
        }

        let mut slots = self.callbacks.lock().expect("callback mutex poisoned");
        let prev = slots
            .boost_pickup
            .replace(CallbackSlot::new(func, user_data));
        Ok(prev.map(CallbackSlot::into_parts))
    }

    pub fn set_ball_touch_callback(
        &self,
        func: BallTouchFn,
        user_data: CallbackData,
    ) -> Option<(BallTouchFn, CallbackData)> {
        let mut slots = self.callbacks.lock().expect("callback mutex poisoned");
        slots
            .ball_touch
            .replace(CallbackSlot::new(func, user_data))
            .map(CallbackSlot::into_parts)
    }

    // ---- stepping ------------------------------------------------------

    /// Request termination at the next tick boundary. The in-flight tick
    /// completes.
    pub fn stop(&mut self) {
        self.stop_requested = true;
    }

    pub(crate) fn store_error(&mut self, error: ArenaError) {
        if self.pending_error.is_none() {
            self.pending_error = Some(error);
        }
    }

    pub(crate) fn take_error(&mut self) -> Option<ArenaError> {
        self.pending_error.take()
    }

    /// Advance the simulation by `ticks` ticks. A stored callback error
    /// is surfaced before any new work; a callback error raised during
    /// stepping stops the arena at the tick boundary and is returned
    /// after the tick's bookkeeping completes.
    pub fn step(&mut self, ticks: u32) -> crate::Result<()> {
        if let Some(error) = self.pending_error.take() {
            return Err(error);
        }

        self.stop_requested = false;

        for _ in 0..ticks {
            self.internal_step();
            if self.stop_requested {
                break;
            }
        }

        match self.pending_error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn internal_step(&mut self) {
        let tick_time = self.tick_time;

        // Phase 1: pre-tick car update.
        for i in 0..self.sorted_car_ids.len() {
            let id = self.sorted_car_ids[i];
            let car = self.cars.get_mut(&id).expect("sorted ids track car map");
            car.pre_tick_update(
                &mut self.world,
                &mut self.rng,
                self.game_mode,
                tick_time,
                &self.mutator_config,
            );
        }

        {
            let ball_rb = &mut self.world.bodies_mut()[self.ball.rigid_body_idx];
            self.ball.pre_tick_update(self.game_mode, ball_rb, tick_time);
        }
        if self.game_mode == GameMode::Snowday {
            let ball_rb = &mut self.world.bodies_mut()[self.ball.rigid_body_idx];
            self.ball.snowday_ground_stick(ball_rb, &self.mutator_config);
        }

        // A broken dropshot tile stops holding the ball up.
        if let Some(tiles) = &self.dropshot_tiles {
            let ball_rb = &mut self.world.bodies_mut()[self.ball.rigid_body_idx];
            if tiles.is_broken_at(ball_rb.world_transform.translation) {
                ball_rb.plane_mask &= !DROPSHOT_FLOOR_GROUP;
            } else {
                ball_rb.plane_mask |= DROPSHOT_FLOOR_GROUP;
            }
        }

        // Phase 2 + 3: clear the tracker, then integrate; contacts are
        // recorded, never dispatched, inside the step.
        self.contact_tracker.clear();
        self.world.step(tick_time, &mut self.contact_tracker);

        // Phase 4: resolve the recorded contacts into gameplay effects.
        let records = std::mem::take(&mut self.contact_tracker.records);
        for record in &records {
            self.process_collision_record(record);
        }
        self.contact_tracker.records = records;
        self.contact_tracker.clear();

        self.process_pad_pickups();

        // Phase 5: post-tick car update.
        for i in 0..self.sorted_car_ids.len() {
            let id = self.sorted_car_ids[i];
            let car = self.cars.get_mut(&id).expect("sorted ids track car map");
            let rb = &mut self.world.bodies_mut()[car.rigid_body_idx];
            car.finish_physics_tick(rb);
            car.post_tick_update(tick_time, rb);
        }

        // Phase 6: ball caps + mode logic + goal detection.
        {
            let ball_rb = &mut self.world.bodies_mut()[self.ball.rigid_body_idx];
            self.ball.finish_physics_tick(ball_rb, &self.mutator_config);
        }
        self.check_goal();

        // Phase 7: pad cooldowns.
        self.boost_pad_grid.tick_cooldowns(tick_time);

        // Phase 8: advance the clock, then run callbacks.
        self.tick_count += 1;
        self.flush_events();
    }

    fn process_collision_record(&mut self, record: &CollisionRecord) {
        match (record.a_tag, record.b_tag) {
            (UserInfoType::Car, UserInfoType::Ball) => {
                self.on_car_ball_collision(record.a_id as u32);
            }
            (UserInfoType::Car, UserInfoType::Car) => {
                self.on_car_car_collision(record.a_id as u32, record.b_id as u32, record);
            }
            (UserInfoType::Car, UserInfoType::None) => {
                if let Some(car) = self.cars.get_mut(&(record.a_id as u32)) {
                    car.internal_state.world_contact.has_contact = true;
                    car.internal_state.world_contact.contact_normal = record.normal_world_on_b;
                }
            }
            (UserInfoType::Ball, UserInfoType::None) => {
                self.on_ball_world_collision(record);
            }
            _ => {}
        }
    }

    /// Record a ball touch for this car, apply the extra hit impulse, and
    /// queue the ball-touch event. Repeat touches within a tick are
    /// silently ignored.
    fn on_car_ball_collision(&mut self, car_id: u32) {
        let tick_count = self.tick_count;
        let Some(car) = self.cars.get_mut(&car_id) else {
            return;
        };

        if car
            .internal_state
            .ball_hit_info
            .is_some_and(|hit| hit.tick_count_when_hit == tick_count)
        {
            return;
        }

        let ball_state = &mut self.ball.state;
        let ball_rb = &self.world.bodies()[self.ball.rigid_body_idx];
        let ball_pos = ball_rb.world_transform.translation;
        let car_rb = &self.world.bodies()[car.rigid_body_idx];
        let car_pos = car_rb.world_transform.translation;

        let mut hit = super::BallHitInfo {
            relative_pos_on_ball: ball_pos - car_pos,
            ball_pos,
            extra_hit_vel: Vec3A::ZERO,
            tick_count_when_hit: tick_count,
            tick_count_when_extra_impulse_applied: 0,
        };

        ball_state.last_hit_car_id = car_id;

        let apply_extra_impulse = match car.internal_state.ball_hit_info {
            Some(old) => {
                hit.tick_count_when_extra_impulse_applied =
                    old.tick_count_when_extra_impulse_applied;
                // The extra impulse is never applied on two consecutive
                // ticks.
                !(old.tick_count_when_extra_impulse_applied <= tick_count
                    && tick_count <= old.tick_count_when_extra_impulse_applied + 1)
            }
            None => true,
        };

        if apply_extra_impulse {
            hit.tick_count_when_extra_impulse_applied = tick_count;

            let rel_pos = ball_pos - car_pos;
            let rel_vel = ball_rb.linear_velocity - car_rb.linear_velocity;
            let rel_speed = rel_vel
                .length()
                .min(consts::ball::car_hit_impulse::MAX_DELTA_VEL);

            if rel_speed > 0.0 {
                use consts::ball::car_hit_impulse as impulse;

                let car_forward = car.internal_state.phys.rot_mat.x_axis;
                let grounded_upright = self.game_mode == GameMode::Hoops
                    && car.internal_state.is_on_ground
                    && car.internal_state.phys.rot_mat.z_axis.z
                        > impulse::Z_SCALE_HOOPS_NORMAL_Z_THRESH;
                let z_scale = if grounded_upright {
                    impulse::Z_SCALE_HOOPS_GROUND
                } else {
                    impulse::Z_SCALE_NORMAL
                };

                let mut hit_dir =
                    (rel_pos * Vec3A::new(1.0, 1.0, z_scale)).normalize_or_zero();
                let forward_adjustment =
                    car_forward * hit_dir.dot(car_forward) * (1.0 - impulse::FORWARD_SCALE);
                hit_dir = (hit_dir - forward_adjustment).normalize_or_zero();

                if hit_dir != Vec3A::ZERO {
                    let added_vel = hit_dir
                        * rel_speed
                        * curves::BALL_CAR_EXTRA_IMPULSE_FACTOR.get_output(rel_speed)
                        * self.mutator_config.ball_hit_extra_force_scale;
                    hit.extra_hit_vel = added_vel;
                    self.ball.velocity_impulse_cache += added_vel;
                }
            }
        }

        car.internal_state.ball_hit_info = Some(hit);

        self.on_ball_hit_mode_effects(car_id);

        let ball_touch_installed = self
            .callbacks
            .lock()
            .expect("callback mutex poisoned")
            .ball_touch
            .is_some();
        if ball_touch_installed {
            self.event_queue.push(GameEvent::BallTouch { car_id });
        }
    }

    /// Heatseeker retargeting and dropshot charging on a ball touch.
    fn on_ball_hit_mode_effects(&mut self, car_id: u32) {
        let Some(car) = self.cars.get(&car_id) else {
            return;
        };
        let ball_state = &mut self.ball.state;

        match self.game_mode {
            GameMode::Heatseeker => {
                let old_dir = ball_state.hs_info.y_target_dir;
                let new_dir = -car.team.get_y_dir();
                let can_increase =
                    ball_state.hs_info.time_since_hit > heatseeker::MIN_SPEEDUP_INTERVAL
                        || old_dir == 0.0;

                ball_state.hs_info.y_target_dir = new_dir;
                if can_increase && old_dir != new_dir {
                    ball_state.hs_info.time_since_hit = 0.0;
                    ball_state.hs_info.cur_target_speed = heatseeker::MAX_SPEED.min(
                        ball_state.hs_info.cur_target_speed + heatseeker::TARGET_SPEED_INCREMENT,
                    );
                }
            }
            GameMode::Dropshot => {
                let car_state = &car.internal_state;
                let dir_from_car =
                    (ball_state.phys.pos - car_state.phys.pos).normalize_or_zero();
                let approach_speed =
                    dir_from_car.dot(car_state.phys.vel - ball_state.phys.vel);

                let ds = &mut ball_state.ds_info;
                if approach_speed >= dropshot::MIN_CHARGE_HIT_SPEED {
                    ds.accumulated_hit_force += approach_speed;

                    if ds.accumulated_hit_force >= dropshot::MIN_ABSORBED_FORCE_FOR_SUPERCHARGE {
                        ds.charge_level = 3;
                    } else if ds.accumulated_hit_force >= dropshot::MIN_ABSORBED_FORCE_FOR_CHARGE {
                        ds.charge_level = 2;
                    }
                }

                if ds.charge_level > 1 {
                    ds.y_target_dir = -car.team.get_y_dir();
                }
            }
            _ => {}
        }
    }

    fn on_car_car_collision(&mut self, car_1_id: u32, car_2_id: u32, record: &CollisionRecord) {
        if car_1_id == car_2_id {
            return;
        }

        {
            let Some(car_1) = self.cars.get(&car_1_id) else {
                return;
            };
            let Some(car_2) = self.cars.get(&car_2_id) else {
                return;
            };
            if car_1.internal_state.is_demoed || car_2.internal_state.is_demoed {
                return;
            }
        }

        // Test the collision from both cars' perspectives.
        for (attacker_id, victim_id, local_point_attacker) in [
            (car_1_id, car_2_id, record.local_a),
            (car_2_id, car_1_id, record.local_b),
        ] {
            let attacker = &self.cars[&attacker_id];
            let victim = &self.cars[&victim_id];
            let attacker_state = &attacker.internal_state;
            let victim_state = &victim.internal_state;

            if attacker_state.car_contact.other_car_id == victim_id
                && attacker_state.car_contact.cooldown_timer > 0.0
            {
                // Within bump cooldown for this pair.
                continue;
            }

            let delta_pos = victim_state.phys.pos - attacker_state.phys.pos;
            if attacker_state.phys.vel.dot(delta_pos) < 0.0 {
                // Moving away from the other car.
                continue;
            }

            let vel_dir = attacker_state.phys.vel.normalize_or_zero();
            let dir_to_victim = delta_pos.normalize_or_zero();

            let speed_towards_victim = attacker_state.phys.vel.dot(dir_to_victim);
            let victim_away_speed = victim_state.phys.vel.dot(vel_dir);
            if speed_towards_victim <= victim_away_speed {
                continue;
            }

            if self.mutator_config.bump_requires_front_hit
                && local_point_attacker.x <= consts::car::bump::MIN_FORWARD_DIST
            {
                continue;
            }

            let mut is_demo = match self.mutator_config.demo_mode {
                DemoMode::OnContact => true,
                DemoMode::Disabled => false,
                DemoMode::Normal => attacker_state.is_supersonic,
            };
            if is_demo && !self.mutator_config.enable_team_demos {
                is_demo = attacker.team != victim.team;
            }

            if is_demo {
                let respawn_delay = self.mutator_config.respawn_delay;
                self.cars
                    .get_mut(&victim_id)
                    .expect("victim id checked above")
                    .demolish(respawn_delay);
                self.cars
                    .get_mut(&attacker_id)
                    .expect("attacker id checked above")
                    .stats
                    .demos += 1;

                self.event_queue.push(GameEvent::CarBump {
                    bumper_id: attacker_id,
                    victim_id,
                    is_demo: true,
                });
                self.event_queue.push(GameEvent::CarDemo {
                    bumper_id: attacker_id,
                    victim_id,
                });
            } else {
                let ground_hit = victim_state.is_on_ground;
                let base_scale = if ground_hit {
                    curves::BUMP_VEL_AMOUNT_GROUND
                } else {
                    curves::BUMP_VEL_AMOUNT_AIR
                }
                .get_output(speed_towards_victim);

                let hit_up_dir = if victim_state.is_on_ground {
                    victim_state.phys.rot_mat.z_axis
                } else {
                    Vec3A::Z
                };

                let upward_force = curves::BUMP_UPWARD_VEL_AMOUNT.get_output(speed_towards_victim)
                    * self.mutator_config.bump_force_scale;
                let bump_impulse = vel_dir * base_scale + hit_up_dir * upward_force;

                self.cars
                    .get_mut(&victim_id)
                    .expect("victim id checked above")
                    .velocity_impulse_cache += bump_impulse;

                self.event_queue.push(GameEvent::CarBump {
                    bumper_id: attacker_id,
                    victim_id,
                    is_demo: false,
                });
            }

            let bump_cooldown_time = self.mutator_config.bump_cooldown_time;
            let attacker = self
                .cars
                .get_mut(&attacker_id)
                .expect("attacker id checked above");
            attacker.internal_state.car_contact = super::CarContact {
                other_car_id: victim_id,
                cooldown_timer: bump_cooldown_time,
            };
        }
    }

    fn on_ball_world_collision(&mut self, record: &CollisionRecord) {
        match self.game_mode {
            GameMode::Heatseeker => {
                // A backboard bounce beyond the target line flips the
                // target net.
                let hs = &mut self.ball.state.hs_info;
                if hs.y_target_dir != 0.0
                    && record.normal_world_on_b.y.abs() > heatseeker::WALL_BOUNCE_CHANGE_Y_NORMAL
                {
                    let ball_y = self.world.bodies()[self.ball.rigid_body_idx]
                        .world_transform
                        .translation
                        .y;
                    if ball_y * hs.y_target_dir
                        > heatseeker::TARGET_Y - heatseeker::WALL_BOUNCE_CHANGE_Y_THRESH
                    {
                        hs.y_target_dir = -hs.y_target_dir;

                        let rb = &mut self.world.bodies_mut()[self.ball.rigid_body_idx];
                        let up_kick = rb.linear_velocity.length()
                            * heatseeker::WALL_BOUNCE_FORCE_SCALE
                            * heatseeker::WALL_BOUNCE_UP_FRAC;
                        rb.linear_velocity.z += up_kick;
                    }
                }
            }
            GameMode::Dropshot => {
                if record.normal_world_on_b.z > 0.9 {
                    self.on_dropshot_floor_hit();
                }
            }
            _ => {}
        }
    }

    /// A charged dropshot ball landing on the open half damages tiles.
    fn on_dropshot_floor_hit(&mut self) {
        let ball_pos = self.world.bodies()[self.ball.rigid_body_idx]
            .world_transform
            .translation;

        let Some(tiles) = &mut self.dropshot_tiles else {
            return;
        };

        let ds = &mut self.ball.state.ds_info;
        if ds.y_target_dir == 0.0 || ball_pos.y * ds.y_target_dir <= 0.0 {
            return;
        }

        let min_interval_ticks =
            (dropshot::MIN_DAMAGE_INTERVAL / self.tick_time).ceil() as u64;
        if ds.has_damaged && self.tick_count < ds.last_damage_tick + min_interval_ticks {
            return;
        }

        let team = if ds.y_target_dir < 0.0 {
            Team::Blue
        } else {
            Team::Orange
        };

        tiles.apply_damage(team, ball_pos, ds.charge_level);
        ds.has_damaged = true;
        ds.last_damage_tick = self.tick_count;
        ds.accumulated_hit_force = 0.0;
        ds.charge_level = 1;
        ds.y_target_dir = 0.0;
    }

    /// Pad-trigger dispatch: active pads give boost to cars inside their
    /// pickup cylinder. Inactive pads ignore the attempt silently.
    fn process_pad_pickups(&mut self) {
        let boost_pickup_installed = self
            .callbacks
            .lock()
            .expect("callback mutex poisoned")
            .boost_pickup
            .is_some();

        for i in 0..self.sorted_car_ids.len() {
            let id = self.sorted_car_ids[i];
            let car = self.cars.get_mut(&id).expect("sorted ids track car map");
            if car.internal_state.is_demoed {
                continue;
            }
            if car.internal_state.boost >= self.mutator_config.car_max_boost_amount {
                continue;
            }

            let car_pos = self.world.bodies()[car.rigid_body_idx]
                .world_transform
                .translation;
            let Some(pad_idx) = self.boost_pad_grid.find_pickup(car_pos) else {
                continue;
            };

            let pad = &mut self.boost_pad_grid.pads_mut()[pad_idx];
            let amount = pad.config().boost_amount(&self.mutator_config);
            let cooldown = pad.config().cooldown(&self.mutator_config);
            pad.state.is_active = false;
            pad.state.cooldown = cooldown;

            car.internal_state.boost = (car.internal_state.boost + amount)
                .min(self.mutator_config.car_max_boost_amount);
            car.stats.boost_pickups += 1;

            if boost_pickup_installed {
                self.event_queue
                    .push(GameEvent::BoostPickup { car_id: id, pad_idx });
            }
        }
    }

    // ---- goals ---------------------------------------------------------

    fn hoops_rim_margin(x: f32, y: f32) -> f32 {
        let dy = y.abs() * goal::HOOPS_RIM_SCALE_Y - goal::HOOPS_RIM_OFFSET_Y;
        x * x + dy * dy - goal::HOOPS_RIM_RADIUS * goal::HOOPS_RIM_RADIUS
    }

    /// Whether the ball is currently inside a goal.
    #[must_use]
    pub fn is_ball_scored(&self) -> bool {
        let ball_pos = self.world.bodies()[self.ball.rigid_body_idx]
            .world_transform
            .translation;

        match self.game_mode {
            GameMode::Soccar | GameMode::Heatseeker | GameMode::Snowday => {
                ball_pos.y.abs()
                    > self.mutator_config.goal_base_threshold_y + self.mutator_config.ball_radius
            }
            GameMode::Hoops => {
                ball_pos.z < goal::HOOPS_SCORE_THRESHOLD_Z
                    && Self::hoops_rim_margin(ball_pos.x, ball_pos.y) < 0.0
            }
            GameMode::Dropshot => ball_pos.z < -self.mutator_config.ball_radius * 1.75,
            GameMode::TheVoid => false,
        }
    }

    /// Straight-line goal prediction over `max_time` seconds. Purposely
    /// overestimates; tighten with a negative `extra_margin`.
    #[must_use]
    pub fn is_ball_probably_going_in(&self, max_time: f32, extra_margin: f32) -> Option<Team> {
        if !self.game_mode.has_soccar_goals() {
            return None;
        }

        let state = self.ball.get_state();
        let (pos, vel) = (state.phys.pos, state.phys.vel);
        if vel.y.abs() < 1e-6 {
            return None;
        }

        let threshold_y =
            self.mutator_config.goal_base_threshold_y + self.mutator_config.ball_radius;
        let target_y = threshold_y * vel.y.signum();
        let time_to_goal = (target_y - pos.y) / vel.y;
        if time_to_goal < 0.0 || time_to_goal > max_time {
            return None;
        }

        let margin = self.mutator_config.ball_radius + extra_margin;
        let x_at_goal = pos.x + vel.x * time_to_goal;
        let z_at_goal = pos.z + vel.z * time_to_goal
            + 0.5 * self.world.gravity().z * time_to_goal * time_to_goal;

        if x_at_goal.abs() < goal::HALF_WIDTH + margin && z_at_goal < goal::HEIGHT + margin {
            Some(if vel.y > 0.0 { Team::Blue } else { Team::Orange })
        } else {
            None
        }
    }

    fn check_goal(&mut self) {
        if !self.game_mode.has_goals() {
            return;
        }

        if !self.is_ball_scored() {
            self.ball_scored_latch = false;
            return;
        }

        if self.ball_scored_latch {
            return;
        }
        self.ball_scored_latch = true;

        let ball_pos = self.ball.get_state().phys.pos;
        let scoring_team = if self.game_mode == GameMode::Dropshot {
            // The floor broke under one half; the other team scored.
            if ball_pos.y > 0.0 { Team::Blue } else { Team::Orange }
        } else if ball_pos.y > 0.0 {
            Team::Blue
        } else {
            Team::Orange
        };

        match scoring_team {
            Team::Blue => self.blue_score += 1,
            Team::Orange => self.orange_score += 1,
        }

        let last_hit = self.ball.get_state().last_hit_car_id;
        if let Some(car) = self.cars.get_mut(&last_hit)
            && car.team == scoring_team
        {
            car.stats.goals += 1;
        }

        let goal_installed = self
            .callbacks
            .lock()
            .expect("callback mutex poisoned")
            .goal_score
            .is_some();
        if goal_installed {
            self.event_queue.push(GameEvent::GoalScore { team: scoring_team });
        }
    }

    // ---- event flushing ------------------------------------------------

    /// Run queued callbacks synchronously. A callback error stops the
    /// arena and drops the rest of this tick's queue.
    fn flush_events(&mut self) {
        if self.event_queue.is_empty() {
            return;
        }

        let events = std::mem::take(&mut self.event_queue);
        for event in events {
            let result = self.dispatch_event(event);
            if let Err(error) = result {
                self.store_error(ArenaError::CallbackFailure(error));
                self.stop();
                break;
            }
        }
    }

    fn dispatch_event(&mut self, event: GameEvent) -> crate::callbacks::CallbackResult {
        macro_rules! with_slot {
            ($slot:ident, |$func:ident, $data:ident| $call:expr) => {{
                let taken = self
                    .callbacks
                    .lock()
                    .expect("callback mutex poisoned")
                    .$slot
                    .take();

                if let Some(slot) = taken {
                    let (mut $func, mut $data) = slot.into_parts();
                    let result = $call;

                    // A callback may have installed a replacement; the
                    // newer one wins.
                    let mut slots = self.callbacks.lock().expect("callback mutex poisoned");
                    if slots.$slot.is_none() {
                        slots.$slot = Some(CallbackSlot::new($func, $data));
                    }
                    result
                } else {
                    Ok(())
                }
            }};
        }

        match event {
            GameEvent::BallTouch { car_id } => {
                with_slot!(ball_touch, |func, data| func(self, car_id, &mut data))
            }
            GameEvent::CarBump {
                bumper_id,
                victim_id,
                is_demo,
            } => with_slot!(car_bump, |func, data| func(
                self, bumper_id, victim_id, is_demo, &mut data
            )),
            GameEvent::CarDemo {
                bumper_id,
                victim_id,
            } => with_slot!(car_demo, |func, data| func(
                self, bumper_id, victim_id, &mut data
            )),
            GameEvent::BoostPickup { car_id, .. } => {
                with_slot!(boost_pickup, |func, data| func(self, car_id, &mut data))
            }
            GameEvent::GoalScore { team } => {
                with_slot!(goal_score, |func, data| func(self, team, &mut data))
            }
        }
    }

    // ---- kickoff / reset ----------------------------------------------

    /// Reset ball and cars to a randomized kickoff arrangement. The same
    /// seed always selects the same arrangement. Scores, per-car stats
    /// and state-machine timers are cleared; the tick counter is not.
    pub fn reset_to_random_kickoff(&mut self, seed: Option<u64>) {
        if let Some(seed) = seed {
            self.rng = Rng::with_seed(seed);
        }

        let kickoff_locs = consts::car::spawn::get_kickoff_locations(self.game_mode);
        let respawn_locs = consts::car::spawn::get_respawn_locations(self.game_mode);

        let mut kickoff_order: ArrayVec<usize, 8> = (0..kickoff_locs.len()).collect();
        self.rng.shuffle(&mut kickoff_order);

        let blue_ids: Vec<u32> = self
            .sorted_car_ids
            .iter()
            .copied()
            .filter(|id| self.cars[id].team == Team::Blue)
            .collect();
        let orange_ids: Vec<u32> = self
            .sorted_car_ids
            .iter()
            .copied()
            .filter(|id| self.cars[id].team == Team::Orange)
            .collect();

        let mut cars_at_respawn_pos = [0usize; 4];
        let kickoff_position_amount = blue_ids.len().max(orange_ids.len());

        for i in 0..kickoff_position_amount {
            let spawn_pos = if i < kickoff_locs.len() {
                kickoff_locs[kickoff_order[i]]
            } else {
                let respawn_idx = (i - kickoff_locs.len()) % respawn_locs.len();
                let mut pos = respawn_locs[respawn_idx];
                pos.y +=
                    consts::car::spawn::EXTRA_OFFSET_Y * cars_at_respawn_pos[respawn_idx] as f32;
                cars_at_respawn_pos[respawn_idx] += 1;
                pos
            };

            for (ids, team) in [(&blue_ids, Team::Blue), (&orange_ids, Team::Orange)] {
                let Some(&car_id) = ids.get(i) else {
                    continue;
                };

                let mirror = if team == Team::Blue { 1.0 } else { -1.0 };
                let yaw = spawn_pos.yaw_ang + if team == Team::Blue { 0.0 } else { core::f32::consts::PI };

                let spawn_state = CarState {
                    phys: PhysState {
                        pos: Vec3A::new(
                            spawn_pos.x * mirror,
                            spawn_pos.y * mirror,
                            consts::car::spawn::SPAWN_Z,
                        ),
                        rot_mat: Mat3A::from_euler(EulerRot::ZYX, yaw, 0.0, 0.0),
                        vel: Vec3A::ZERO,
                        ang_vel: Vec3A::ZERO,
                    },
                    boost: self.mutator_config.car_spawn_boost_amount,
                    is_on_ground: true,
                    ..Default::default()
                };

                let car = self.cars.get_mut(&car_id).expect("team ids track car map");
                car.set_state(&mut self.world.bodies_mut()[car.rigid_body_idx], &spawn_state);
                car.stats = CarStats::default();
            }
        }

        let mut ball_state = BallState::DEFAULT;
        match self.game_mode {
            GameMode::Heatseeker => {
                let y_sign = f32::from(i8::from(self.rng.bool()) * 2 - 1);
                let scale = Vec3A::new(1.0, y_sign, 1.0);
                ball_state.phys.pos = heatseeker::BALL_START_POS * scale;
                ball_state.phys.vel = heatseeker::BALL_START_VEL * scale;
            }
            GameMode::Snowday => {
                ball_state.phys.vel.z = f32::EPSILON;
            }
            GameMode::Hoops | GameMode::Dropshot => {
                self.ball.launch_countdown = Some(dropshot::BALL_LAUNCH_DELAY);
            }
            _ => {}
        }
        self.set_ball_state(ball_state);

        self.boost_pad_grid.reset();
        if let Some(tiles) = &mut self.dropshot_tiles {
            tiles.reset();
        }

        self.blue_score = 0;
        self.orange_score = 0;
        self.ball_scored_latch = false;
    }

    // ---- whole-arena state ---------------------------------------------

    #[must_use]
    pub fn get_game_state(&self) -> GameState {
        GameState {
            tick_count: self.tick_count,
            tick_rate: self.get_tick_rate(),
            game_mode: self.game_mode,
            ball: *self.get_ball_state(),
            pads: self
                .get_boost_pads()
                .iter()
                .map(|pad| BoostPadInfo {
                    config: *pad.config(),
                    state: *pad.get_state(),
                })
                .collect(),
            cars: self
                .sorted_car_ids
                .iter()
                .map(|id| {
                    let car = &self.cars[id];
                    CarInfo {
                        id: car.id,
                        team: car.team,
                        state: *car.get_state(),
                        config: *car.get_config(),
                    }
                })
                .collect(),
        }
    }

    pub fn set_game_state(&mut self, state: &GameState) -> crate::Result<()> {
        if state.game_mode != self.game_mode {
            return Err(ArenaError::invalid_op(format!(
                "game mode mismatch: arena is {:?}, state is {:?}",
                self.game_mode, state.game_mode
            )));
        }

        for car_info in &state.cars {
            self.set_car_state(car_info.id, &car_info.state)?;
        }

        self.set_ball_state(state.ball);

        if state.pads.len() == self.get_boost_pads().len() {
            for (i, pad_info) in state.pads.iter().enumerate() {
                self.set_boost_pad_state(i, pad_info.state)?;
            }
        }

        Ok(())
    }

    /// Deep, independent copy. Callbacks are never copied (closures are
    /// not cloneable). With `preserve_ids` false, cars are renumbered
    /// from 1 in ascending original-id order.
    #[must_use]
    pub fn clone_arena(&self, preserve_ids: bool) -> Self {
        let tick_rate = self.get_tick_rate().round() as u8;
        let mut clone = Self::new_with_config(self.game_mode, self.config.clone(), tick_rate)
            .expect("the source arena validated this configuration");

        clone.set_mutator_config(self.mutator_config);
        clone.tick_count = self.tick_count;
        clone.rng = self.rng.clone();
        clone.blue_score = self.blue_score;
        clone.orange_score = self.orange_score;
        clone.ball_scored_latch = self.ball_scored_latch;
        clone.last_snapshot_tick = self.last_snapshot_tick;
        clone.dropshot_tiles = self.dropshot_tiles.clone();

        for (new_ordinal, &id) in self.sorted_car_ids.iter().enumerate() {
            let car = &self.cars[&id];
            let new_id = if preserve_ids {
                id
            } else {
                new_ordinal as u32 + 1
            };

            clone.insert_car(new_id, car.team, *car.get_config());
            clone.last_car_id = clone.last_car_id.max(new_id);

            let cloned_car = clone
                .cars
                .get_mut(&new_id)
                .expect("car id was just inserted");
            cloned_car.stats = car.stats;
            let state = *car.get_state();
            let rb_idx = cloned_car.rigid_body_idx;
            cloned_car.set_state(&mut clone.world.bodies_mut()[rb_idx], &state);
        }

        let ball_state = *self.get_ball_state();
        let ball_rb_idx = clone.ball.rigid_body_idx;
        clone
            .ball
            .set_state(&mut clone.world.bodies_mut()[ball_rb_idx], ball_state);

        for (i, pad) in self.get_boost_pads().iter().enumerate() {
            clone.boost_pad_grid.pads_mut()[i].set_state(*pad.get_state());
        }

        clone
    }
}
