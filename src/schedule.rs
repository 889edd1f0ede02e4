//! Cancellable timers behind a trait, so the spin lifecycle can run on real browser
//! timers or on a hand-advanced clock.

use crate::config::FRAME_INTERVAL_MS;
use gloo_render::{request_animation_frame, AnimationFrame};
use gloo_timers::callback::Timeout;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;

/// Identifies a scheduled task. Cancelling a finished or unknown handle is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

pub trait Scheduler {
    /// Run `task` once per animation frame until cancelled.
    fn schedule_frames(&mut self, task: Box<dyn FnMut()>) -> TaskHandle;
    /// Run `task` once after `delay_ms`.
    fn schedule_once(&mut self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TaskHandle;
    /// Stop a task. Idempotent.
    fn cancel(&mut self, handle: TaskHandle);
}

/// A `requestAnimationFrame` chain. Each frame requests the next one until dropped.
struct FrameLoop {
    next: Rc<RefCell<Option<AnimationFrame>>>,
    live: Rc<Cell<bool>>,
}

impl FrameLoop {
    fn start(task: Box<dyn FnMut()>) -> Self {
        let frame_loop = Self {
            next: Rc::new(RefCell::new(None)),
            live: Rc::new(Cell::new(true)),
        };
        request_next_frame(
            frame_loop.next.clone(),
            frame_loop.live.clone(),
            Rc::new(RefCell::new(task)),
        );
        frame_loop
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.live.set(false);
        // dropping the pending frame cancels it and frees the chain
        self.next.borrow_mut().take();
    }
}

fn request_next_frame(
    slot: Rc<RefCell<Option<AnimationFrame>>>,
    live: Rc<Cell<bool>>,
    task: Rc<RefCell<Box<dyn FnMut()>>>,
) {
    let frame = {
        let slot = slot.clone();
        request_animation_frame(move |_timestamp| {
            slot.borrow_mut().take();
            if !live.get() {
                return;
            }
            {
                let mut run = task.borrow_mut();
                (*run)();
            }
            // the task may have cancelled its own loop
            if live.get() {
                request_next_frame(slot, live, task);
            }
        })
    };
    *slot.borrow_mut() = Some(frame);
}

// Held only so that dropping them clears the browser timer
#[allow(dead_code)]
enum Timer {
    Frames(FrameLoop),
    Once { timeout: Timeout, fired: Rc<Cell<bool>> },
}

impl Timer {
    fn finished(&self) -> bool {
        match self {
            Timer::Frames(_) => false,
            Timer::Once { fired, .. } => fired.get(),
        }
    }
}

/// Browser timers: animation frames via `gloo-render`, delays via `gloo-timers`.
#[derive(Default)]
pub struct TimerScheduler {
    next_id: u64,
    timers: HashMap<u64, Timer>,
}

impl TimerScheduler {
    fn insert(&mut self, timer: Timer) -> TaskHandle {
        // fired one-shots are dropped here, outside their own callback
        self.timers.retain(|_, timer| !timer.finished());
        self.next_id += 1;
        self.timers.insert(self.next_id, timer);
        TaskHandle(self.next_id)
    }
}

impl Scheduler for TimerScheduler {
    fn schedule_frames(&mut self, task: Box<dyn FnMut()>) -> TaskHandle {
        self.insert(Timer::Frames(FrameLoop::start(task)))
    }

    fn schedule_once(&mut self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TaskHandle {
        let fired = Rc::new(Cell::new(false));
        let timeout = {
            let fired = fired.clone();
            Timeout::new(delay_ms, move || {
                fired.set(true);
                task();
            })
        };
        self.insert(Timer::Once { timeout, fired })
    }

    fn cancel(&mut self, handle: TaskHandle) {
        // dropping the gloo handle clears the browser timer
        self.timers.remove(&handle.0);
    }
}

enum Task {
    Repeating { interval_ms: u64, run: Box<dyn FnMut()> },
    Once(Box<dyn FnOnce()>),
}

#[derive(Default)]
struct ManualClock {
    now_ms: u64,
    next_id: u64,
    // keyed by (due time, id) so ties run in scheduling order
    queue: BTreeMap<(u64, u64), Task>,
    live: HashSet<u64>,
}

impl ManualClock {
    fn push(&mut self, due_ms: u64, task: Task) -> TaskHandle {
        self.next_id += 1;
        self.live.insert(self.next_id);
        self.queue.insert((due_ms, self.next_id), task);
        TaskHandle(self.next_id)
    }

    fn pop_due(&mut self, deadline_ms: u64) -> Option<(u64, u64, Task)> {
        let (&(due, id), _) = self.queue.iter().next()?;
        if due > deadline_ms {
            return None;
        }
        let task = self.queue.remove(&(due, id))?;
        Some((due, id, task))
    }
}

/// Deterministic scheduler driven by [`ManualScheduler::advance`].
///
/// Clones share one clock, so a test can keep a handle while the controller owns
/// another. Tasks may schedule or cancel other tasks (or themselves) while running.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Rc<RefCell<ManualClock>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.borrow().now_ms
    }

    /// Number of tasks still waiting to run.
    pub fn pending(&self) -> usize {
        self.clock.borrow().live.len()
    }

    /// Move the clock forward by `ms`, running every task that falls due, in order.
    pub fn advance(&self, ms: u64) {
        let deadline = self.now_ms() + ms;
        loop {
            // Release the borrow before running the task; it may call back into us.
            let next = self.clock.borrow_mut().pop_due(deadline);
            let Some((due, id, task)) = next else {
                break;
            };
            self.clock.borrow_mut().now_ms = due;

            match task {
                Task::Once(run) => {
                    self.clock.borrow_mut().live.remove(&id);
                    run();
                }
                Task::Repeating { interval_ms, mut run } => {
                    run();
                    let mut clock = self.clock.borrow_mut();
                    if clock.live.contains(&id) {
                        clock
                            .queue
                            .insert((due + interval_ms, id), Task::Repeating { interval_ms, run });
                    }
                }
            }
        }
        self.clock.borrow_mut().now_ms = deadline;
    }
}

impl Scheduler for ManualScheduler {
    /// Frames fall every [`FRAME_INTERVAL_MS`] of manual time.
    fn schedule_frames(&mut self, task: Box<dyn FnMut()>) -> TaskHandle {
        let mut clock = self.clock.borrow_mut();
        // a zero interval would never let the clock move on
        let interval_ms = u64::from(FRAME_INTERVAL_MS.max(1));
        let due = clock.now_ms + interval_ms;
        clock.push(due, Task::Repeating { interval_ms, run: task })
    }

    fn schedule_once(&mut self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TaskHandle {
        let mut clock = self.clock.borrow_mut();
        let due = clock.now_ms + u64::from(delay_ms);
        clock.push(due, Task::Once(task))
    }

    fn cancel(&mut self, handle: TaskHandle) {
        let mut clock = self.clock.borrow_mut();
        if clock.live.remove(&handle.0) {
            clock.queue.retain(|&(_, id), _| id != handle.0);
        }
    }
}
