use std::any::Any;

use crate::sim::{Arena, Team};

/// Error type user callbacks may return. A failing callback stops the
/// arena; the error is surfaced from the surrounding `step` call.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;
pub type CallbackResult = Result<(), CallbackError>;

/// Opaque user datum stored alongside a callback and handed back on
/// every invocation.
pub type CallbackData = Box<dyn Any + Send>;

pub type GoalScoreFn = Box<dyn FnMut(&mut Arena, Team, &mut CallbackData) -> CallbackResult + Send>;
/// `(arena, bumper_id, victim_id, is_demo, user_data)`
pub type CarBumpFn =
    Box<dyn FnMut(&mut Arena, u32, u32, bool, &mut CallbackData) -> CallbackResult + Send>;
/// `(arena, bumper_id, victim_id, user_data)`
pub type CarDemoFn =
    Box<dyn FnMut(&mut Arena, u32, u32, &mut CallbackData) -> CallbackResult + Send>;
/// `(arena, car_id, user_data)`
pub type BoostPickupFn =
    Box<dyn FnMut(&mut Arena, u32, &mut CallbackData) -> CallbackResult + Send>;
/// `(arena, car_id, user_data)`
pub type BallTouchFn = Box<dyn FnMut(&mut Arena, u32, &mut CallbackData) -> CallbackResult + Send>;

pub(crate) struct CallbackSlot<F> {
    pub func: F,
    pub user_data: CallbackData,
}

impl<F> CallbackSlot<F> {
    pub fn new(func: F, user_data: CallbackData) -> Self {
        Self { func, user_data }
    }

    pub fn into_parts(self) -> (F, CallbackData) {
        (self.func, self.user_data)
    }
}

/// The arena's named callback slots. Held behind a mutex so set/get is
/// atomic; a slot is taken out while its callback runs so the callback
/// may freely mutate the arena (including replacing callbacks).
#[derive(Default)]
pub(crate) struct CallbackSlots {
    pub goal_score: Option<CallbackSlot<GoalScoreFn>>,
    pub car_bump: Option<CallbackSlot<CarBumpFn>>,
    pub car_demo: Option<CallbackSlot<CarDemoFn>>,
    pub boost_pickup: Option<CallbackSlot<BoostPickupFn>>,
    pub ball_touch: Option<CallbackSlot<BallTouchFn>>,
}
