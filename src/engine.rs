use std::sync::Arc;
use std::time::{Duration, Instant};

use log::error;
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
pub use winit::keyboard::KeyCode;
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::input::{InputState, MouseButton};
use crate::renderer::Renderer;
use crate::renderer::canvas::Canvas;
use crate::renderer::font;
use crate::timer::TimerQueue;

// ── Color ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const WHITE: Self = Self([1.0, 1.0, 1.0, 1.0]);
    pub const BLACK: Self = Self([0.0, 0.0, 0.0, 1.0]);

    /// `0xRRGGBB` with the given opacity.
    pub const fn from_hex(rgb: u32, alpha: f32) -> Self {
        Self([
            ((rgb >> 16) & 0xFF) as f32 / 255.0,
            ((rgb >> 8) & 0xFF) as f32 / 255.0,
            (rgb & 0xFF) as f32 / 255.0,
            alpha,
        ])
    }
}

// ── Game trait ──────────────────────────────────────────────────────────────

/// Lifecycle hooks the engine calls into.
pub trait Game {
    /// Once, after the window and renderer exist.
    fn on_enter(&mut self, _engine: &mut Engine) {}
    /// Once per fixed update step.
    fn update(&mut self, engine: &mut Engine);
    /// Once per presented frame.
    fn render(&mut self, engine: &mut Engine);
    /// A mouse button went down at window pixel `(x, y)`. Delivered from the
    /// event handler, between update steps.
    fn on_pointer_down(&mut self, _engine: &mut Engine, _button: MouseButton, _x: f32, _y: f32) {}
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

// ── Engine ──────────────────────────────────────────────────────────────────

pub struct Engine {
    renderer: Renderer,
    /// Scene clock; advanced before every update step.
    pub timers: TimerQueue,
    /// Unified input state (keyboard, mouse, chars).
    pub input: InputState,
    /// World layer, drawn first.
    pub world: Canvas,
    /// Overlay layer, drawn above the world.
    pub ui: Canvas,
    pub clear_color: Color,
    dt: f32,
    tick: u64,
    quit_requested: bool,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    fn new(renderer: Renderer) -> Self {
        Self {
            renderer,
            timers: TimerQueue::new(),
            input: InputState::new(),
            world: Canvas::new(),
            ui: Canvas::new(),
            clear_color: Color::BLACK,
            dt: 0.0,
            tick: 0,
            quit_requested: false,
        }
    }

    /// Seconds covered by the current update step.
    pub fn dt(&self) -> f32 { self.dt }
    pub fn tick(&self) -> u64 { self.tick }

    /// Drawable size in pixels.
    pub fn screen_size(&self) -> (f32, f32) {
        let size = self.renderer.window.inner_size();
        (size.width as f32, size.height as f32)
    }

    pub fn is_key_pressed(&self, key: KeyCode) -> bool { self.input.is_key_pressed(key) }

    /// Signal that the application should exit after the current step.
    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.world.fill_rect(x, y, w, h, color);
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, thickness: f32, color: Color) {
        self.world.stroke_rect(x, y, w, h, thickness, color);
    }

    pub fn draw_text(&mut self, x: f32, y: f32, text: &str, scale: f32, color: Color) {
        self.world.text(x, y, text, scale, color);
    }

    pub fn text_width(&self, text: &str, scale: f32) -> f32 {
        font::text_width(text, scale)
    }

    fn step(&mut self, game: &mut dyn Game, dt: f32) {
        self.dt = dt;
        self.tick += 1;
        self.timers.advance(Duration::from_secs_f32(dt));
        game.update(self);
        // Edges live until an update has seen them, not until the next redraw.
        self.input.clear_frame_state();
    }

    fn present(&mut self, game: &mut dyn Game) {
        self.world.clear();
        self.ui.clear();
        game.render(self);

        match self.renderer.render(self.world.vertices(), self.ui.vertices(), self.clear_color.0) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = self.renderer.window.inner_size();
                self.renderer.resize(size);
            }
            Err(e) => error!("[engine] render error: {e}"),
        }
    }
}

// ── Fixed timestep ──────────────────────────────────────────────────────────

/// Accumulator that turns variable frame times into whole update steps.
///
/// A redraw may owe zero steps (display faster than the update rate) or
/// several (slow frame). Frame time is clamped to 0.25 s so a stall does not
/// trigger a burst of catch-up steps.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    dt: f32,
    accumulator: f32,
}

impl FixedTimestep {
    pub const MAX_FRAME: f32 = 0.25;

    pub fn new(updates_per_second: u32) -> Self {
        Self { dt: 1.0 / updates_per_second.max(1) as f32, accumulator: 0.0 }
    }

    /// Seconds per update step.
    pub fn dt(&self) -> f32 { self.dt }

    /// Add `elapsed` seconds of frame time and return how many steps are due.
    pub fn accumulate(&mut self, elapsed: f32) -> u32 {
        self.accumulator += elapsed.clamp(0.0, Self::MAX_FRAME);
        let mut steps = 0;
        while self.accumulator >= self.dt {
            self.accumulator -= self.dt;
            steps += 1;
        }
        steps
    }
}

// ── EngineBuilder ───────────────────────────────────────────────────────────

pub struct EngineBuilder {
    title: String,
    width: u32,
    height: u32,
    target_ups: u32,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            title: "gridquiz".into(),
            width: 800,
            height: 600,
            target_ups: 60,
        }
    }
}

impl EngineBuilder {
    pub fn with_title(mut self, title: &str) -> Self { self.title = title.into(); self }
    pub fn with_size(mut self, width: u32, height: u32) -> Self { self.width = width; self.height = height; self }
    pub fn with_ups(mut self, ups: u32) -> Self { self.target_ups = ups.max(1); self }

    /// Open the window and drive `game` until the window closes.
    pub fn run(self, game: impl Game + 'static) -> Result<(), EngineError> {
        let event_loop = EventLoop::new()?;
        let mut app = App {
            clock: FixedTimestep::new(self.target_ups),
            config: self,
            game: Box::new(game),
            engine: None,
            last_instant: None,
        };
        event_loop.run_app(&mut app)?;
        Ok(())
    }
}

// ── App (winit ApplicationHandler) ──────────────────────────────────────────

struct App {
    config: EngineBuilder,
    game: Box<dyn Game>,
    engine: Option<Engine>,
    last_instant: Option<Instant>,
    clock: FixedTimestep,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.engine.is_some() {
            return;
        }
        let attributes = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(winit::dpi::PhysicalSize::new(self.config.width, self.config.height))
            .with_resizable(false);
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("[engine] could not create window: {e}");
                event_loop.exit();
                return;
            }
        };
        let renderer = match pollster::block_on(Renderer::new(window)) {
            Ok(renderer) => renderer,
            Err(e) => {
                error!("[engine] could not start renderer: {e}");
                event_loop.exit();
                return;
            }
        };

        let mut engine = Engine::new(renderer);
        self.game.on_enter(&mut engine);
        self.engine = Some(engine);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(engine) = self.engine.as_ref() {
            engine.renderer.window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(engine) = self.engine.as_mut() else { return };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => engine.renderer.resize(size),

            WindowEvent::CursorMoved { position, .. } => {
                engine.input.mouse_pos = [position.x as f32, position.y as f32];
            }

            WindowEvent::MouseInput { button, state, .. } => match state {
                ElementState::Pressed => {
                    if engine.input.mouse_held.insert(button) {
                        engine.input.mouse_pressed.insert(button);
                        let [x, y] = engine.input.mouse_pos;
                        self.game.on_pointer_down(engine, button, x, y);
                    }
                }
                ElementState::Released => {
                    engine.input.mouse_held.remove(&button);
                }
            },

            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let elapsed = match self.last_instant {
                    Some(prev) => now.duration_since(prev).as_secs_f32(),
                    None => self.clock.dt(),
                };
                self.last_instant = Some(now);

                for _ in 0..self.clock.accumulate(elapsed) {
                    engine.step(self.game.as_mut(), self.clock.dt());
                    if engine.quit_requested {
                        event_loop.exit();
                        return;
                    }
                }

                engine.present(self.game.as_mut());
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        text,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => {
                    engine.input.press_key(code);
                    // Printable characters feed text prompts.
                    if let Some(t) = text {
                        engine
                            .input
                            .chars_typed
                            .extend(t.chars().filter(|ch| !ch.is_control()));
                    }
                }
                ElementState::Released => engine.input.release_key(code),
            },

            _ => {}
        }
    }
}
