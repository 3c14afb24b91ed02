//! Timers
//!
//! A [`TimerGuard`] cancels its timer when dropped. [`Debounce`] keeps at
//! most one pending callback per key, so arming a key again always cancels
//! what that key had pending.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Cancels the pending callback on drop
pub struct TimerGuard(#[allow(dead_code)] Box<dyn Any>);

impl TimerGuard {
    pub fn new<T: 'static>(inner: T) -> Self {
        TimerGuard(Box::new(inner))
    }
}

/// Schedules one-shot callbacks
pub trait Timer {
    fn after(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerGuard;

    /// Milliseconds on a monotonic-enough wall clock
    fn now_ms(&self) -> u64;
}

/// `setTimeout` through `gloo-timers`
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTimer;

impl Timer for GlooTimer {
    fn after(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerGuard {
        // Dropping a gloo Timeout clears it
        TimerGuard::new(gloo_timers::callback::Timeout::new(delay_ms, callback))
    }

    fn now_ms(&self) -> u64 {
        js_sys::Date::now() as u64
    }
}

struct Slot {
    key: u64,
    fired: Rc<Cell<bool>>,
    _guard: TimerGuard,
}

/// Persistent pending-timer slots, one per key
pub struct Debounce {
    timer: Rc<dyn Timer>,
    slots: RefCell<Vec<Slot>>,
}

impl Debounce {
    pub fn new(timer: Rc<dyn Timer>) -> Self {
        Self {
            timer,
            slots: RefCell::new(Vec::new()),
        }
    }

    /// Drop whatever `key` has pending
    pub fn cancel(&self, key: u64) {
        self.drop_where(|slot| slot.key == key);
    }

    /// Replace the callback pending under `key` with `callback`
    pub fn arm(&self, key: u64, delay_ms: u32, callback: Box<dyn FnOnce()>) {
        self.drop_where(|slot| slot.key == key || slot.fired.get());
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        let guard = self.timer.after(
            delay_ms,
            Box::new(move || {
                flag.set(true);
                callback();
            }),
        );
        self.slots.borrow_mut().push(Slot {
            key,
            fired,
            _guard: guard,
        });
    }

    /// Callbacks armed and not yet run
    #[cfg(test)]
    pub fn armed(&self) -> usize {
        self.slots.borrow().iter().filter(|slot| !slot.fired.get()).count()
    }

    fn drop_where(&self, matches: impl Fn(&Slot) -> bool) {
        // Guards drop after the borrow ends
        let dropped: Vec<Slot> = {
            let mut slots = self.slots.borrow_mut();
            let (dropped, kept): (Vec<Slot>, Vec<Slot>) = std::mem::take(&mut *slots).into_iter().partition(|slot| matches(slot));
            *slots = kept;
            dropped
        };
        drop(dropped);
    }
}
