//! Sprite-sheet clip playback for the player figure.
//!
//! Clips index into a nine-frame sheet: frames 0–3 walk left, frame 4 faces
//! the camera, frames 5–8 walk right.

use crate::grid::Direction;

/// Names of the clips the player sheet provides.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AnimKey {
    Left,
    Turn,
    Right,
}

impl AnimKey {
    /// Clip shown while stepping in `direction`. Vertical steps have no
    /// dedicated walk cycle and use the facing frame.
    pub fn for_direction(direction: Direction) -> Self {
        match direction {
            Direction::Left => AnimKey::Left,
            Direction::Right => AnimKey::Right,
            Direction::Up | Direction::Down => AnimKey::Turn,
        }
    }
}

/// A run of sheet frames played at a fixed rate.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationClip {
    pub key: AnimKey,
    pub frames: Vec<u32>,
    pub frame_rate: f32,
    /// Loop forever when `true`, hold the last frame otherwise.
    pub looping: bool,
}

impl AnimationClip {
    /// Seconds each frame stays on screen.
    pub fn frame_duration(&self) -> f32 {
        if self.frame_rate > 0.0 { 1.0 / self.frame_rate } else { f32::INFINITY }
    }
}

/// The three clips of the player sheet.
pub fn player_clips() -> Vec<AnimationClip> {
    vec![
        AnimationClip { key: AnimKey::Left, frames: (0..=3).collect(), frame_rate: 10.0, looping: true },
        AnimationClip { key: AnimKey::Turn, frames: vec![4], frame_rate: 20.0, looping: false },
        AnimationClip { key: AnimKey::Right, frames: (5..=8).collect(), frame_rate: 10.0, looping: true },
    ]
}

/// Receiver of animation requests. The controller only ever asks for a clip;
/// how it is shown is up to the implementor.
pub trait AnimationSink {
    fn play(&mut self, key: AnimKey, ignore_if_playing: bool);
}

/// Plays one clip at a time from a fixed clip set.
#[derive(Debug)]
pub struct Animator {
    clips: Vec<AnimationClip>,
    current: usize,
    frame_index: usize,
    elapsed: f32,
    playing: bool,
}

impl Animator {
    /// Start on the first frame of `initial`. Falls back to the first clip
    /// if `initial` is not in `clips`.
    pub fn new(clips: Vec<AnimationClip>, initial: AnimKey) -> Self {
        let current = clips.iter().position(|c| c.key == initial).unwrap_or(0);
        Self { clips, current, frame_index: 0, elapsed: 0.0, playing: false }
    }

    pub fn current_key(&self) -> Option<AnimKey> {
        self.clips.get(self.current).map(|c| c.key)
    }

    /// Sheet frame to draw this frame.
    pub fn current_frame(&self) -> u32 {
        self.clips
            .get(self.current)
            .and_then(|c| c.frames.get(self.frame_index))
            .copied()
            .unwrap_or(0)
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Advance playback by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if !self.playing {
            return;
        }
        let Some(clip) = self.clips.get(self.current) else { return };
        let step = clip.frame_duration();
        let len = clip.frames.len();
        if len == 0 {
            self.playing = false;
            return;
        }

        self.elapsed += dt;
        while self.elapsed >= step {
            self.elapsed -= step;
            if self.frame_index + 1 < len {
                self.frame_index += 1;
            } else if clip.looping {
                self.frame_index = 0;
            } else {
                self.playing = false;
                self.elapsed = 0.0;
                break;
            }
        }
    }
}

impl AnimationSink for Animator {
    fn play(&mut self, key: AnimKey, ignore_if_playing: bool) {
        let Some(index) = self.clips.iter().position(|c| c.key == key) else { return };
        if ignore_if_playing && index == self.current && self.playing {
            return;
        }
        self.current = index;
        self.frame_index = 0;
        self.elapsed = 0.0;
        self.playing = true;
    }
}
