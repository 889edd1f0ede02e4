//! Spin lifecycle: Idle → Spinning → Resolving → Settled, and back to Idle on close.
//!
//! [`SpinController`] is the single handle the UI holds. It owns the [`WeightStore`],
//! the current phase and rotation, and the injected scheduler and random source.
//! Scheduled callbacks capture a spin token and do nothing once the token has moved
//! on, so a callback that outlives its spin can never touch newer state.

use crate::config::{SPIN_DURATION_MS, SPIN_STEP_DEG};
use crate::random::RandomSource;
use crate::schedule::{Scheduler, TaskHandle};
use crate::store::WeightStore;
use crate::wheel::{build_layout, pick_winner, resolve_spin, SpinOutcome, WheelLayout};
use crate::{Entry, WheelError};
use log::{debug, info};
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinPhase {
    Idle,
    /// Free rotation, no winner chosen yet.
    Spinning,
    /// Winner chosen, wheel easing towards its final rotation.
    Resolving,
    /// Animation finished, winner announced.
    Settled,
}

/// Called after a scheduled callback changed the state, e.g. to re-render.
pub type Observer = Rc<dyn Fn()>;

struct SpinState {
    store: WeightStore,
    phase: SpinPhase,
    rotation: f64,
    token: u64,
    snapshot: Vec<Entry>,
    layout: Option<WheelLayout>,
    outcome: Option<SpinOutcome>,
    animation: Option<TaskHandle>,
    settle: Option<TaskHandle>,
}

impl SpinState {
    fn is_current(&self, token: u64, phase: SpinPhase) -> bool {
        self.token == token && self.phase == phase
    }
}

pub struct SpinController<S: Scheduler> {
    state: Rc<RefCell<SpinState>>,
    scheduler: S,
    rng: Box<dyn RandomSource>,
    observer: Option<Observer>,
}

impl<S: Scheduler> SpinController<S> {
    pub fn new(scheduler: S, rng: impl RandomSource + 'static) -> Self {
        Self {
            state: Rc::new(RefCell::new(SpinState {
                store: WeightStore::new(),
                phase: SpinPhase::Idle,
                rotation: 0.0,
                token: 0,
                snapshot: Vec::new(),
                layout: None,
                outcome: None,
                animation: None,
                settle: None,
            })),
            scheduler,
            rng: Box::new(rng),
            observer: None,
        }
    }

    /// Register the callback run after every timer-driven state change.
    ///
    /// Only scheduled callbacks notify; the caller of a public method already knows
    /// the state changed.
    pub fn set_observer(&mut self, observer: Observer) {
        self.observer = Some(observer);
    }

    pub fn store(&self) -> Ref<'_, WeightStore> {
        Ref::map(self.state.borrow(), |s| &s.store)
    }

    /// Mutable access to the entries. Edits made during a spin do not affect it; the
    /// spin works on the snapshot taken when it started.
    pub fn store_mut(&self) -> RefMut<'_, WeightStore> {
        RefMut::map(self.state.borrow_mut(), |s| &mut s.store)
    }

    pub fn phase(&self) -> SpinPhase {
        self.state.borrow().phase
    }

    /// Current wheel rotation in degrees.
    pub fn rotation(&self) -> f64 {
        self.state.borrow().rotation
    }

    /// Layout of the spin in progress, if any.
    pub fn layout(&self) -> Option<WheelLayout> {
        self.state.borrow().layout.clone()
    }

    /// Outcome once the spin has been stopped.
    pub fn outcome(&self) -> Option<SpinOutcome> {
        self.state.borrow().outcome
    }

    /// The winning entry, available once the wheel has settled.
    pub fn winner(&self) -> Option<Entry> {
        let state = self.state.borrow();
        if state.phase != SpinPhase::Settled {
            return None;
        }
        let index = state.outcome?.winning_index;
        state.snapshot.get(index).cloned()
    }

    /// Start free rotation.
    ///
    /// Fails if the store is empty, unbalanced or has no positive weight. Returns
    /// `Ok(false)` without doing anything if a spin is already in progress.
    pub fn request_spin(&mut self) -> Result<bool, WheelError> {
        let mut state = self.state.borrow_mut();
        if state.phase != SpinPhase::Idle {
            debug!("Spin requested while {:?}; ignored", state.phase);
            return Ok(false);
        }

        state.store.ensure_spinnable()?;
        let snapshot = state.store.entries().to_vec();
        let layout = build_layout(&snapshot)?;

        state.token += 1;
        state.snapshot = snapshot;
        state.layout = Some(layout);
        state.outcome = None;
        state.rotation = 0.0;
        state.phase = SpinPhase::Spinning;

        let token = state.token;
        let frame = {
            let shared = self.state.clone();
            let observer = self.observer.clone();
            move || {
                {
                    let mut state = shared.borrow_mut();
                    if !state.is_current(token, SpinPhase::Spinning) {
                        return;
                    }
                    state.rotation += SPIN_STEP_DEG;
                }
                notify(&observer);
            }
        };
        for stale in [state.animation.take(), state.settle.take()].into_iter().flatten() {
            self.scheduler.cancel(stale);
        }
        state.animation = Some(self.scheduler.schedule_frames(Box::new(frame)));

        info!("Spin started with {} entries", state.snapshot.len());
        Ok(true)
    }

    /// Stop free rotation: draw the winner now and ease towards it.
    ///
    /// Returns `Ok(None)` unless the wheel is currently spinning.
    pub fn request_stop(&mut self) -> Result<Option<SpinOutcome>, WheelError> {
        let mut state = self.state.borrow_mut();
        if state.phase != SpinPhase::Spinning {
            debug!("Stop requested while {:?}; ignored", state.phase);
            return Ok(None);
        }
        let layout = state.layout.as_ref().ok_or(WheelError::EmptyWheel)?;
        let winner = pick_winner(&state.snapshot, self.rng.as_mut())?;
        let outcome = resolve_spin(layout, winner, self.rng.as_mut())?;

        if let Some(animation) = state.animation.take() {
            self.scheduler.cancel(animation);
        }
        state.outcome = Some(outcome);
        state.rotation = outcome.total_rotation;
        state.phase = SpinPhase::Resolving;

        let token = state.token;
        let settle = {
            let shared = self.state.clone();
            let observer = self.observer.clone();
            move || {
                {
                    let mut state = shared.borrow_mut();
                    if !state.is_current(token, SpinPhase::Resolving) {
                        return;
                    }
                    // the handle stays in `settle` until close() releases it
                    state.phase = SpinPhase::Settled;
                    if let Some(winner) = state.snapshot.get(winner) {
                        info!("Wheel settled on '{}'", winner.label);
                    }
                }
                notify(&observer);
            }
        };
        state.settle = Some(
            self.scheduler
                .schedule_once(SPIN_DURATION_MS, Box::new(settle)),
        );

        Ok(Some(outcome))
    }

    /// Back to Idle from any phase: cancel pending timers, then reset the rotation.
    pub fn close(&mut self) {
        let mut state = self.state.borrow_mut();
        if let Some(animation) = state.animation.take() {
            self.scheduler.cancel(animation);
        }
        if let Some(settle) = state.settle.take() {
            self.scheduler.cancel(settle);
        }

        if state.phase != SpinPhase::Idle {
            debug!("Closing wheel from {:?}", state.phase);
        }
        state.token += 1;
        state.phase = SpinPhase::Idle;
        state.rotation = 0.0;
        state.snapshot.clear();
        state.layout = None;
        state.outcome = None;
    }
}

impl<S: Scheduler> Drop for SpinController<S> {
    fn drop(&mut self) {
        self.close();
    }
}

fn notify(observer: &Option<Observer>) {
    if let Some(observer) = observer {
        observer();
    }
}
