//! Advance many independent arenas concurrently.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::thread;

use crate::sim::Arena;

/// Below this many arenas, stepping stays on the caller's thread.
pub const PARALLEL_THRESHOLD: usize = 4;

/// Step every arena by `ticks` ticks.
///
/// Each arena is advanced by exactly one worker task that owns it
/// exclusively for the duration; no ordering is defined between arenas.
/// The pool holds `min(arenas.len(), available_parallelism)` threads.
///
/// If callbacks fail, each failing arena's task returns early with the
/// error stored on that arena; after all tasks finish, the first error
/// in input order is returned and the rest stay stored (their next
/// `step` call surfaces them). Arenas that completed keep their ticks.
pub fn multi_step(arenas: &mut [Arena], ticks: u32) -> crate::Result<()> {
    if arenas.len() < PARALLEL_THRESHOLD {
        for arena in arenas.iter_mut() {
            arena.step(ticks)?;
        }
        return Ok(());
    }

    let num_workers = thread::available_parallelism()
        .map_or(1, NonZeroUsize::get)
        .min(arenas.len());

    let queue = Mutex::new(arenas.iter_mut());
    thread::scope(|scope| {
        for _ in 0..num_workers {
            scope.spawn(|| {
                loop {
                    let Some(arena) = queue.lock().expect("arena queue poisoned").next() else {
                        break;
                    };

                    if let Err(error) = arena.step(ticks) {
                        arena.store_error(error);
                    }
                }
            });
        }
    });

    for arena in arenas.iter_mut() {
        if let Some(error) = arena.take_error() {
            return Err(error);
        }
    }

    Ok(())
}
