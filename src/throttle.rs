use crate::scheduler::Scheduler;
use std::{cell::Cell, rc::Rc};

pub const DEFAULT_THROTTLE_WINDOW_MS: u32 = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateState {
    Idle,
    Cooldown,
}

/// Leading-edge rate limiter: the first caller in a burst gets through and the
/// gate reopens `window_ms` after that call, however many calls were refused.
pub struct CooldownGate {
    state: Rc<Cell<GateState>>,
    window_ms: u32,
    scheduler: Rc<dyn Scheduler>,
}

impl CooldownGate {
    pub fn new(window_ms: u32, scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            state: Rc::new(Cell::new(GateState::Idle)),
            window_ms,
            scheduler,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> GateState {
        self.state.get()
    }

    pub fn try_enter(&self) -> bool {
        if self.state.get() == GateState::Cooldown {
            return false;
        }

        self.state.set(GateState::Cooldown);
        let state = Rc::clone(&self.state);
        self.scheduler.schedule(
            self.window_ms,
            Box::new(move || state.set(GateState::Idle)),
        );

        true
    }
}

/// Wraps `action` so it runs at most once per `window_ms`. Arguments of
/// refused calls are dropped. The gate closes before `action` runs, so a call
/// made from inside `action` is refused too.
pub fn throttle<A, F>(mut action: F, window_ms: u32, scheduler: Rc<dyn Scheduler>) -> impl FnMut(A)
where
    F: FnMut(A),
{
    let gate = CooldownGate::new(window_ms, scheduler);
    move |args: A| {
        if gate.try_enter() {
            action(args);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualClock;
    use std::cell::RefCell;

    fn counting_throttle(
        window_ms: u32,
    ) -> (Rc<ManualClock>, Rc<RefCell<Vec<u64>>>, impl FnMut(u64)) {
        let clock = Rc::new(ManualClock::new());
        let calls = Rc::new(RefCell::new(Vec::new()));
        let guarded = {
            let calls = Rc::clone(&calls);
            throttle(
                move |at: u64| calls.borrow_mut().push(at),
                window_ms,
                clock.clone() as Rc<dyn Scheduler>,
            )
        };
        (clock, calls, guarded)
    }

    #[test]
    fn burst_inside_window_fires_once_then_reopens() {
        let (clock, calls, mut guarded) = counting_throttle(16);

        for at in [0, 5, 10, 20] {
            clock.advance_to(at);
            guarded(at);
        }

        assert_eq!(*calls.borrow(), vec![0, 20]);
    }

    #[test]
    fn calls_spaced_beyond_window_both_fire() {
        let (clock, calls, mut guarded) = counting_throttle(100);

        guarded(0);
        clock.advance_to(101);
        guarded(101);

        assert_eq!(calls.borrow().len(), 2);
    }

    #[test]
    fn gate_reopens_exactly_at_window_boundary() {
        let (clock, calls, mut guarded) = counting_throttle(16);

        guarded(0);
        clock.advance_to(15);
        guarded(15);
        clock.advance_to(16);
        guarded(16);

        assert_eq!(*calls.borrow(), vec![0, 16]);
    }

    #[test]
    fn suppressed_calls_do_not_extend_the_cooldown() {
        let (clock, calls, mut guarded) = counting_throttle(50);

        guarded(0);
        for at in (1..50).step_by(7) {
            clock.advance_to(at);
            guarded(at);
        }
        clock.advance_to(50);
        guarded(50);

        assert_eq!(*calls.borrow(), vec![0, 50]);
    }

    #[test]
    fn gate_reports_cooldown_until_timer_fires() {
        let clock = Rc::new(ManualClock::new());
        let gate = CooldownGate::new(16, clock.clone());

        assert_eq!(gate.state(), GateState::Idle);
        assert!(gate.try_enter());
        assert_eq!(gate.state(), GateState::Cooldown);
        assert!(!gate.try_enter());
        assert_eq!(clock.pending(), 1, "refused calls must not schedule timers");

        clock.advance(16);
        assert_eq!(gate.state(), GateState::Idle);
    }
}
