use std::collections::{HashMap, HashSet};
use std::hash::Hash;
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

use crate::grid::Direction;

/// A physical input that can be bound to an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Key(KeyCode),
    Mouse(MouseButton),
}

/// Raw hardware state for a single frame.
#[derive(Debug, Default)]
pub struct InputState {
    pub keys_held: HashSet<KeyCode>,
    pub keys_pressed: HashSet<KeyCode>,

    pub mouse_pos: [f32; 2],
    pub mouse_held: HashSet<MouseButton>,
    pub mouse_pressed: HashSet<MouseButton>,

    pub chars_typed: Vec<char>,
    /// A modal took the keyboard this frame.
    pub key_consumed: bool,
    /// A modal took the mouse this frame.
    pub mouse_consumed: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget edge-triggered state; held keys and buttons persist.
    pub fn clear_frame_state(&mut self) {
        self.keys_pressed.clear();
        self.mouse_pressed.clear();
        self.chars_typed.clear();
        self.key_consumed = false;
        self.mouse_consumed = false;
    }

    pub fn press_key(&mut self, key: KeyCode) {
        if self.keys_held.insert(key) {
            self.keys_pressed.insert(key);
        }
    }

    pub fn release_key(&mut self, key: KeyCode) {
        self.keys_held.remove(&key);
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool { self.keys_held.contains(&key) }
    pub fn is_key_pressed(&self, key: KeyCode) -> bool { self.keys_pressed.contains(&key) }

    pub fn is_mouse_held(&self, button: MouseButton) -> bool { self.mouse_held.contains(&button) }
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool { self.mouse_pressed.contains(&button) }

    /// True if the left button went down this frame and nothing consumed it.
    pub fn left_click(&self) -> bool {
        !self.mouse_consumed && self.is_mouse_pressed(MouseButton::Left)
    }
}

/// Maps logical actions to one or more physical inputs.
#[derive(Debug, Clone)]
pub struct ActionMap<A: Hash + Eq + Copy> {
    bindings: HashMap<A, Vec<InputSource>>,
}

impl<A: Hash + Eq + Copy> ActionMap<A> {
    pub fn new() -> Self {
        Self { bindings: HashMap::new() }
    }

    pub fn bind(&mut self, action: A, source: InputSource) {
        self.bindings.entry(action).or_default().push(source);
    }

    /// Whether the action was triggered this frame.
    pub fn is_pressed(&self, action: A, input: &InputState) -> bool {
        self.bindings.get(&action).is_some_and(|sources| {
            sources.iter().any(|s| match s {
                InputSource::Key(k) => !input.key_consumed && input.is_key_pressed(*k),
                InputSource::Mouse(b) => !input.mouse_consumed && input.is_mouse_pressed(*b),
            })
        })
    }

    /// Whether any bound source is currently held.
    ///
    /// Held queries still honour `key_consumed` for keys: an open prompt
    /// must not let typed letters walk the player around.
    pub fn is_held(&self, action: A, input: &InputState) -> bool {
        self.bindings.get(&action).is_some_and(|sources| {
            sources.iter().any(|s| match s {
                InputSource::Key(k) => !input.key_consumed && input.is_key_held(*k),
                InputSource::Mouse(b) => input.is_mouse_held(*b),
            })
        })
    }
}

impl<A: Hash + Eq + Copy> Default for ActionMap<A> {
    fn default() -> Self { Self::new() }
}

/// Arrow keys plus WASD.
pub fn default_bindings() -> ActionMap<Direction> {
    let mut map = ActionMap::new();
    for (dir, keys) in [
        (Direction::Left, [KeyCode::ArrowLeft, KeyCode::KeyA]),
        (Direction::Right, [KeyCode::ArrowRight, KeyCode::KeyD]),
        (Direction::Up, [KeyCode::ArrowUp, KeyCode::KeyW]),
        (Direction::Down, [KeyCode::ArrowDown, KeyCode::KeyS]),
    ] {
        for key in keys {
            map.bind(dir, InputSource::Key(key));
        }
    }
    map
}

/// Which directions are held this frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectionInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl DirectionInput {
    /// Nothing held.
    pub const NONE: Self = Self { left: false, right: false, up: false, down: false };

    /// Only `direction` held.
    pub fn only(direction: Direction) -> Self {
        let mut input = Self::NONE;
        input.set(direction, true);
        input
    }

    pub fn from_actions(actions: &ActionMap<Direction>, input: &InputState) -> Self {
        let mut snapshot = Self::NONE;
        for dir in Direction::PRIORITY {
            snapshot.set(dir, actions.is_held(dir, input));
        }
        snapshot
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::Up => self.up,
            Direction::Down => self.down,
        }
    }

    pub fn set(&mut self, direction: Direction, held: bool) {
        match direction {
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
        }
    }

    /// First held direction in left, right, up, down order.
    pub fn selected(&self) -> Option<Direction> {
        Direction::PRIORITY.into_iter().find(|d| self.is_held(*d))
    }
}
