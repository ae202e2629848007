use std::cell::RefCell;
use std::collections::HashMap;
#[cfg(test)]
use std::cell::Cell;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

pub type Task = Box<dyn FnOnce()>;

/// One-shot timers. Everything that waits (cooldown expiry, staggered hero
/// reveals, the typewriter) goes through this so tests can drive time by hand.
pub trait Scheduler {
    fn schedule(&self, delay_ms: u32, task: Task) -> TimerId;

    /// Returns false when the timer already fired or was cancelled.
    fn cancel(&self, id: TimerId) -> bool;
}

/// Live handles of pending timers. A handle leaves the map when its timer
/// fires or is cancelled, and is dropped then.
pub struct TimerHandles<H> {
    handles: RefCell<HashMap<TimerId, H>>,
}

impl<H> Default for TimerHandles<H> {
    fn default() -> Self {
        Self {
            handles: RefCell::new(HashMap::new()),
        }
    }
}

impl<H> TimerHandles<H> {
    pub fn insert(&self, id: TimerId, handle: H) {
        self.handles.borrow_mut().insert(id, handle);
    }

    pub fn cancel(&self, id: TimerId) -> bool {
        self.handles.borrow_mut().remove(&id).is_some()
    }

    /// Runs the task of a fired timer, then drops its handle. The task may
    /// schedule new timers.
    pub fn fire(&self, id: TimerId, task: Task) {
        let fired = self.handles.borrow_mut().remove(&id);
        task();
        drop(fired);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.handles.borrow().len()
    }
}

#[cfg(test)]
struct PendingTask {
    id: TimerId,
    due: u64,
    task: Task,
}

/// Simulated clock. Time only moves through `advance`/`advance_to`.
#[cfg(test)]
#[derive(Default)]
pub struct ManualClock {
    now: Cell<u64>,
    next_id: Cell<u64>,
    queue: RefCell<Vec<PendingTask>>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now.get()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn advance(&self, delta_ms: u64) {
        self.advance_to(self.now.get().saturating_add(delta_ms));
    }

    pub fn advance_to(&self, target_ms: u64) {
        if target_ms < self.now.get() {
            return;
        }

        while let Some(next) = self.pop_due(target_ms) {
            self.now.set(next.due);
            (next.task)();
        }

        self.now.set(target_ms);
    }

    // Ids grow monotonically, so ties on `due` resolve in scheduling order.
    fn pop_due(&self, target_ms: u64) -> Option<PendingTask> {
        let mut queue = self.queue.borrow_mut();
        let index = queue
            .iter()
            .enumerate()
            .filter(|(_, pending)| pending.due <= target_ms)
            .min_by_key(|(_, pending)| (pending.due, pending.id))
            .map(|(index, _)| index)?;

        Some(queue.remove(index))
    }
}

#[cfg(test)]
impl Scheduler for ManualClock {
    fn schedule(&self, delay_ms: u32, task: Task) -> TimerId {
        let id = TimerId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        self.queue.borrow_mut().push(PendingTask {
            id,
            due: self.now.get().saturating_add(u64::from(delay_ms)),
            task,
        });

        id
    }

    fn cancel(&self, id: TimerId) -> bool {
        let mut queue = self.queue.borrow_mut();
        let before = queue.len();
        queue.retain(|pending| pending.id != id);
        queue.len() != before
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserScheduler;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::{Scheduler, Task, TimerHandles, TimerId};
    use gloo_timers::callback::Timeout;
    use std::{cell::Cell, rc::Rc};

    /// `setTimeout`-backed scheduler. Dropping a `Timeout` clears it, so the
    /// handles are kept until they fire; cancelling just drops the handle.
    #[derive(Default)]
    pub struct BrowserScheduler {
        next_id: Cell<u64>,
        timeouts: Rc<TimerHandles<Timeout>>,
    }

    impl BrowserScheduler {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl Scheduler for BrowserScheduler {
        fn schedule(&self, delay_ms: u32, task: Task) -> TimerId {
            let id = TimerId(self.next_id.get());
            self.next_id.set(id.0 + 1);

            let timeouts = Rc::clone(&self.timeouts);
            // wasm-bindgen frees a closure dropped during its own call once the call returns.
            let timeout = Timeout::new(delay_ms, move || timeouts.fire(id, task));

            self.timeouts.insert(id, timeout);
            id
        }

        fn cancel(&self, id: TimerId) -> bool {
            self.timeouts.cancel(id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Task) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let make = {
            let log = Rc::clone(&log);
            move |label: &'static str| -> Task {
                let log = Rc::clone(&log);
                Box::new(move || log.borrow_mut().push(label))
            }
        };
        (log, make)
    }

    #[test]
    fn tasks_run_in_due_order_then_scheduling_order() {
        let clock = ManualClock::new();
        let (log, task) = recorder();

        clock.schedule(20, task("late"));
        clock.schedule(10, task("first"));
        clock.schedule(10, task("second"));

        clock.advance(15);
        assert_eq!(*log.borrow(), vec!["first", "second"]);
        assert_eq!(clock.now(), 15);

        clock.advance(5);
        assert_eq!(*log.borrow(), vec!["first", "second", "late"]);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn cancelled_task_never_runs() {
        let clock = ManualClock::new();
        let (log, task) = recorder();

        let id = clock.schedule(5, task("cancelled"));
        assert!(clock.cancel(id));
        assert!(!clock.cancel(id), "second cancel should report nothing pending");

        clock.advance(10);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn task_scheduled_from_a_task_runs_within_the_same_advance() {
        let clock = Rc::new(ManualClock::new());
        let fired_at = Rc::new(Cell::new(None));

        {
            let inner_clock = Rc::clone(&clock);
            let fired_at = Rc::clone(&fired_at);
            clock.schedule(
                10,
                Box::new(move || {
                    let observed = Rc::clone(&inner_clock);
                    inner_clock.schedule(
                        10,
                        Box::new(move || fired_at.set(Some(observed.now()))),
                    );
                }),
            );
        }

        clock.advance(25);
        assert_eq!(fired_at.get(), Some(20));
        assert_eq!(clock.now(), 25);
    }

    struct CountedHandle(Rc<Cell<usize>>);

    impl Drop for CountedHandle {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn fired_handle_is_released_after_its_task() {
        let handles = Rc::new(TimerHandles::default());
        let drops = Rc::new(Cell::new(0));
        handles.insert(TimerId(0), CountedHandle(Rc::clone(&drops)));

        let seen_during_task = Rc::new(Cell::new(None));
        {
            let drops = Rc::clone(&drops);
            let seen_during_task = Rc::clone(&seen_during_task);
            handles.fire(
                TimerId(0),
                Box::new(move || seen_during_task.set(Some(drops.get()))),
            );
        }

        assert_eq!(seen_during_task.get(), Some(0), "handle outlives its task");
        assert_eq!(drops.get(), 1);
        assert_eq!(handles.len(), 0);
    }

    #[test]
    fn task_may_register_a_new_handle_while_firing() {
        let handles = Rc::new(TimerHandles::default());
        let drops = Rc::new(Cell::new(0));
        handles.insert(TimerId(0), CountedHandle(Rc::clone(&drops)));

        {
            let inner = Rc::clone(&handles);
            let drops = Rc::clone(&drops);
            handles.fire(
                TimerId(0),
                Box::new(move || inner.insert(TimerId(1), CountedHandle(drops))),
            );
        }

        assert_eq!(handles.len(), 1);
        assert!(handles.cancel(TimerId(1)));
        assert!(!handles.cancel(TimerId(1)));
        assert_eq!(drops.get(), 2);
    }

    #[test]
    fn advancing_backwards_is_ignored() {
        let clock = ManualClock::new();
        clock.advance_to(50);
        clock.advance_to(10);
        assert_eq!(clock.now(), 50);
    }
}
