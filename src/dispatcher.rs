//! NPC registry and answer evaluation.
//!
//! Each Interactable carries at most one [`Challenge`], registered once and
//! never changed. Activating it asks the question through a [`ModalSurface`];
//! a matching answer removes it for good, anything else leaves it alive for
//! another try.

use log::info;
use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::challenge::Challenge;
use crate::grid::{GridBounds, GridPosition};

// ---------------------------------------------------------------------------
// InteractableId — generational index
// ---------------------------------------------------------------------------

/// Handle to an Interactable. Handles of removed Interactables stay dead
/// even after their slot is reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct InteractableId {
    index: u32,
    generation: u32,
}

impl InteractableId {
    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

/// A clickable NPC.
#[derive(Clone, Debug, PartialEq)]
pub struct Interactable {
    pub id: InteractableId,
    pub cell: GridPosition,
    challenge: Option<Challenge>,
}

impl Interactable {
    pub fn challenge(&self) -> Option<&Challenge> {
        self.challenge.as_ref()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("interactable {0:?} does not exist")]
    Unknown(InteractableId),
    #[error("interactable {0:?} already has a challenge")]
    AlreadyRegistered(InteractableId),
}

/// Result of answering a challenge.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Solved,
    Retry,
}

/// One-way notices shown after an answer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    Success,
    Retry,
}

impl Notification {
    pub fn message(self) -> &'static str {
        match self {
            Notification::Success => "Correct! Well done!",
            Notification::Retry => "Try again!",
        }
    }
}

pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

/// Synchronous question/answer surface.
pub trait ModalSurface: Notifier {
    /// Show `text` and wait for a reply. `None` means the user cancelled.
    fn prompt(&mut self, text: &str) -> Option<String>;
}

struct Slot {
    generation: u32,
    entry: Option<Interactable>,
}

/// Owns every live Interactable.
#[derive(Default)]
pub struct InteractionDispatcher {
    slots: Vec<Slot>,
    free: Vec<u32>,
    // Spawn order, newest last; used to pick the topmost on overlap.
    order: Vec<InteractableId>,
}

impl InteractionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an Interactable at `cell` with no challenge yet.
    pub fn spawn(&mut self, cell: GridPosition) -> InteractableId {
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.generation = slot.generation.wrapping_add(1);
                InteractableId { index, generation: slot.generation }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot { generation: 0, entry: None });
                InteractableId { index, generation: 0 }
            }
        };
        self.slots[id.index as usize].entry = Some(Interactable { id, cell, challenge: None });
        self.order.push(id);
        id
    }

    /// Attach `challenge` to `id`. Allowed exactly once per Interactable.
    pub fn register_challenge(
        &mut self,
        id: InteractableId,
        challenge: Challenge,
    ) -> Result<(), RegistrationError> {
        let entry = self.get_mut(id).ok_or(RegistrationError::Unknown(id))?;
        if entry.challenge.is_some() {
            return Err(RegistrationError::AlreadyRegistered(id));
        }
        entry.challenge = Some(challenge);
        Ok(())
    }

    /// Scatter `count` Interactables on distinct cells at least `margin`
    /// cells from every edge, registering `challenges[i % len]` on the
    /// `i`-th. Fewer are spawned if the area has fewer free cells.
    pub fn populate<R: Rng + ?Sized>(
        &mut self,
        bounds: GridBounds,
        margin: u32,
        challenges: &[Challenge],
        count: usize,
        rng: &mut R,
    ) -> Vec<InteractableId> {
        if challenges.is_empty() {
            return Vec::new();
        }
        let mut cells = bounds.inner_cells(margin);
        cells.shuffle(rng);
        cells.truncate(count);

        let mut spawned = Vec::with_capacity(cells.len());
        for (i, cell) in cells.into_iter().enumerate() {
            let id = self.spawn(cell);
            let challenge = challenges[i % challenges.len()].clone();
            info!("[npc] spawned at ({}, {}): {:?}", cell.x, cell.y, challenge.text);
            // A freshly spawned id is alive and has no challenge yet.
            if self.register_challenge(id, challenge).is_ok() {
                spawned.push(id);
            }
        }
        spawned
    }

    pub fn get(&self, id: InteractableId) -> Option<&Interactable> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.entry.as_ref())
    }

    fn get_mut(&mut self, id: InteractableId) -> Option<&mut Interactable> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.entry.as_mut())
    }

    pub fn is_alive(&self, id: InteractableId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Live Interactables in spawn order.
    pub fn alive(&self) -> impl Iterator<Item = &Interactable> + '_ {
        self.order.iter().filter_map(|id| self.get(*id))
    }

    /// Topmost live Interactable standing on `cell`.
    pub fn interactable_at(&self, cell: GridPosition) -> Option<InteractableId> {
        self.order
            .iter()
            .rev()
            .copied()
            .find(|id| self.get(*id).is_some_and(|e| e.cell == cell))
    }

    /// Topmost live Interactable under the pixel `(px, py)`.
    pub fn hit_test(&self, px: f32, py: f32, bounds: &GridBounds) -> Option<InteractableId> {
        bounds.cell_at(px, py).and_then(|cell| self.interactable_at(cell))
    }

    /// Ask the question of `id` and judge the reply.
    ///
    /// Returns `None` without prompting when `id` is gone or has no
    /// challenge. This is the blocking form; a frame-driven caller that
    /// cannot wait for the reply shows the question itself and later hands
    /// the answer to [`resolve`](Self::resolve), which is the second half of
    /// this call.
    pub fn on_activate<S: ModalSurface + ?Sized>(
        &mut self,
        id: InteractableId,
        surface: &mut S,
    ) -> Option<Outcome> {
        let text = self.get(id)?.challenge()?.text.clone();
        let answer = surface.prompt(&text);
        self.resolve(id, answer.as_deref(), surface)
    }

    /// Judge `answer` for `id`, notify, and remove the Interactable on a match.
    pub fn resolve<N: Notifier + ?Sized>(
        &mut self,
        id: InteractableId,
        answer: Option<&str>,
        notifier: &mut N,
    ) -> Option<Outcome> {
        let solved = self.get(id)?.challenge()?.accepts(answer);
        if solved {
            notifier.notify(Notification::Success);
            self.remove(id);
            info!("[npc] {id:?} solved");
            Some(Outcome::Solved)
        } else {
            notifier.notify(Notification::Retry);
            Some(Outcome::Retry)
        }
    }

    fn remove(&mut self, id: InteractableId) -> Option<Interactable> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let removed = slot.entry.take()?;
        self.free.push(id.index);
        self.order.retain(|o| *o != id);
        Some(removed)
    }
}
