use glam::Vec3A;

use super::{Team, UserInfoType};
use crate::dynamics::{ContactInfo, ContactSink};

/// One contact captured during the physics step, resolved into gameplay
/// effects only after integration completes.
///
/// Records are normalized so a tagged party sits in the `a` slot, cars
/// before the ball; `should_swap` remembers whether the raw notification
/// had them the other way around.
#[derive(Clone, Copy, Debug)]
pub struct CollisionRecord {
    pub a_tag: UserInfoType,
    pub b_tag: UserInfoType,
    pub a_id: u64,
    pub b_id: u64,
    pub local_a: Vec3A,
    pub local_b: Vec3A,
    pub normal_world_on_b: Vec3A,
    pub combined_friction: f32,
    pub combined_restitution: f32,
    pub should_swap: bool,
}

/// Collects collision records during the rigid-body step. No gameplay
/// state is touched from inside the physics library; the arena drains the
/// records afterwards.
#[derive(Debug, Default)]
pub struct ContactTracker {
    pub records: Vec<CollisionRecord>,
}

impl ContactTracker {
    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn reserve(&mut self, n: usize) {
        self.records.reserve(n);
    }
}

impl ContactSink for ContactTracker {
    fn contact_added(&mut self, contact: ContactInfo) {
        let tag_a = UserInfoType::from(contact.user_index_a);
        let tag_b = UserInfoType::from(contact.user_index_b);

        // Normalize: tagged parties first, cars before the ball.
        let should_swap = if tag_a != UserInfoType::None && tag_b != UserInfoType::None {
            tag_a > tag_b
        } else {
            tag_b != UserInfoType::None
        };

        let record = if should_swap {
            CollisionRecord {
                a_tag: tag_b,
                b_tag: tag_a,
                a_id: contact.user_pointer_b,
                b_id: contact.user_pointer_a,
                local_a: contact.local_point_b,
                local_b: contact.local_point_a,
                normal_world_on_b: contact.normal_world_on_b,
                combined_friction: contact.combined_friction,
                combined_restitution: contact.combined_restitution,
                should_swap: true,
            }
        } else {
            CollisionRecord {
                a_tag: tag_a,
                b_tag: tag_b,
                a_id: contact.user_pointer_a,
                b_id: contact.user_pointer_b,
                local_a: contact.local_point_a,
                local_b: contact.local_point_b,
                normal_world_on_b: contact.normal_world_on_b,
                combined_friction: contact.combined_friction,
                combined_restitution: contact.combined_restitution,
                should_swap: false,
            }
        };

        self.records.push(record);
    }
}

/// Gameplay events produced by contact dispatch and flushed through the
/// callback slots at the end of the tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameEvent {
    BallTouch {
        car_id: u32,
    },
    CarBump {
        bumper_id: u32,
        victim_id: u32,
        is_demo: bool,
    },
    CarDemo {
        bumper_id: u32,
        victim_id: u32,
    },
    BoostPickup {
        car_id: u32,
        pad_idx: usize,
    },
    GoalScore {
        team: Team,
    },
}
