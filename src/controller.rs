//! Discrete grid movement with a post-move cooldown.
//!
//! The controller has two states. It starts `Unlocked`; an accepted move
//! takes it to `Locked` and arms a single-shot cooldown, and only that
//! cooldown firing brings it back to `Unlocked`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use log::debug;

use crate::anim::{AnimKey, AnimationSink};
use crate::grid::{Direction, GridBounds, GridPosition};
use crate::input::DirectionInput;
use crate::timer::{Scheduler, schedule_or_fallback};

/// Cooldown after each accepted move.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(150);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveState {
    Unlocked,
    Locked,
}

/// Movement lock shared between the controller and its pending cooldown task.
#[derive(Clone, Debug, Default)]
pub struct MoveLock(Arc<AtomicBool>);

impl MoveLock {
    pub fn is_held(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Take the lock. Returns `false` if it was already held.
    fn acquire(&self) -> bool {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn release(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owns the player's cell, facing and movement lock.
#[derive(Debug)]
pub struct GridController {
    bounds: GridBounds,
    position: GridPosition,
    facing: Direction,
    lock: MoveLock,
    cooldown: Duration,
}

impl GridController {
    /// `start` is clamped into `bounds`.
    pub fn new(bounds: GridBounds, start: GridPosition) -> Self {
        Self {
            bounds,
            position: bounds.clamp(start),
            facing: Direction::Down,
            lock: MoveLock::default(),
            cooldown: DEFAULT_COOLDOWN,
        }
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn position(&self) -> GridPosition { self.position }
    pub fn bounds(&self) -> GridBounds { self.bounds }
    pub fn cooldown(&self) -> Duration { self.cooldown }

    /// Direction of the last accepted move.
    pub fn facing(&self) -> Direction { self.facing }

    pub fn is_locked(&self) -> bool {
        self.lock.is_held()
    }

    pub fn state(&self) -> MoveState {
        if self.is_locked() { MoveState::Locked } else { MoveState::Unlocked }
    }

    /// Pixel centre of the current cell.
    pub fn projected_pixel_position(&self) -> [f32; 2] {
        self.bounds.project(self.position)
    }

    /// Per-frame entry point.
    ///
    /// While locked the input is ignored entirely. Otherwise the first held
    /// direction in left, right, up, down order is attempted; with nothing
    /// held the idle clip is requested. The returned pixel position is
    /// recomputed every call so the sprite never drifts from its cell.
    pub fn tick(
        &mut self,
        input: DirectionInput,
        scheduler: Option<&mut dyn Scheduler>,
        animations: &mut dyn AnimationSink,
    ) -> [f32; 2] {
        if !self.is_locked() {
            match input.selected() {
                Some(direction) => {
                    self.move_toward(direction, scheduler, animations);
                }
                None => animations.play(AnimKey::Turn, true),
            }
        }
        self.projected_pixel_position()
    }

    /// Step one cell towards `direction` and start the cooldown.
    ///
    /// Returns `false` and changes nothing while locked. A step into the
    /// board edge leaves the cell unchanged but still locks.
    pub fn move_toward(
        &mut self,
        direction: Direction,
        scheduler: Option<&mut dyn Scheduler>,
        animations: &mut dyn AnimationSink,
    ) -> bool {
        if !self.lock.acquire() {
            return false;
        }

        self.facing = direction;
        animations.play(AnimKey::for_direction(direction), true);
        let from = self.position;
        self.position = self.bounds.step(from, direction);
        debug!("[controller] {direction:?}: ({}, {}) -> ({}, {})",
            from.x, from.y, self.position.x, self.position.y);

        let lock = self.lock.clone();
        schedule_or_fallback(scheduler, self.cooldown, Box::new(move || {
            lock.release();
            debug!("[controller] cooldown expired");
        }));
        true
    }
}
