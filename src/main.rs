use std::process::ExitCode;

use log::{error, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use gridquiz::anim::{AnimKey, Animator, player_clips};
use gridquiz::config::{GameConfig, LaunchOptions};
use gridquiz::controller::GridController;
use gridquiz::dispatcher::{InteractableId, InteractionDispatcher, Outcome};
use gridquiz::engine::{Color, Engine, Game, KeyCode};
use gridquiz::grid::{Direction, GridBounds, GridPosition};
use gridquiz::input::{ActionMap, DirectionInput, MouseButton, default_bindings};
use gridquiz::ui::{Modal, ModalEvent, ModalQueue, PromptBox, PromptResult};

// ── Palette ─────────────────────────────────────────────────────────────────
const BACKDROP:   Color = Color([0.05, 0.07, 0.06, 1.0]);
const TILE:       Color = Color::from_hex(0x90EE90, 0.3);
const NPC_BODY:   Color = Color([0.95, 0.55, 0.20, 1.0]);
const NPC_MARK:   Color = Color([1.00, 0.95, 0.20, 1.0]);
const PLAYER:     Color = Color([0.20, 0.60, 1.00, 1.0]);
const PLAYER_DARK: Color = Color([0.05, 0.20, 0.45, 1.0]);
const HUD_TEXT:   Color = Color([0.75, 0.85, 0.80, 1.0]);

const MAX_ANSWER_CHARS: usize = 32;

struct QuizGame {
    config: GameConfig,
    bounds: GridBounds,
    controller: GridController,
    animator: Animator,
    bindings: ActionMap<Direction>,
    npcs: InteractionDispatcher,
    modals: ModalQueue,
    /// Interactable whose question is currently on screen.
    asking: Option<InteractableId>,
    rng: StdRng,
}

impl QuizGame {
    fn new(config: GameConfig, rng: StdRng) -> Self {
        let bounds = config.bounds();
        let controller = GridController::new(bounds, config.start).with_cooldown(config.cooldown());
        Self {
            bounds,
            controller,
            animator: Animator::new(player_clips(), AnimKey::Turn),
            bindings: default_bindings(),
            npcs: InteractionDispatcher::new(),
            modals: ModalQueue::new(),
            asking: None,
            rng,
            config,
        }
    }

    fn draw_board(&self, engine: &mut Engine) {
        let tile = self.bounds.tile_size as f32;
        for y in 0..self.bounds.height {
            for x in 0..self.bounds.width {
                engine.fill_rect(x as f32 * tile + 1.0, y as f32 * tile + 1.0, tile - 2.0, tile - 2.0, TILE);
            }
        }
    }

    fn draw_npcs(&self, engine: &mut Engine) {
        let tile = self.bounds.tile_size as f32;
        // The question mark blinks about once a second at 60 updates/s.
        let mark = if (engine.tick() / 30) % 2 == 0 { NPC_MARK } else { Color::WHITE };
        for npc in self.npcs.alive() {
            let [cx, cy] = self.bounds.project(npc.cell);
            let r = tile * 0.35;
            engine.fill_rect(cx - r, cy - r, r * 2.0, r * 2.0, NPC_BODY);
            let scale = (tile / 16.0).max(1.0);
            let w = engine.text_width("?", scale);
            engine.draw_text(cx - w / 2.0, cy - 2.5 * scale, "?", scale, mark);
        }
    }

    /// Player figure for the current sheet frame: 0–3 walk left, 4 faces
    /// the camera, 5–8 walk right.
    fn draw_player(&self, engine: &mut Engine, [cx, cy]: [f32; 2]) {
        let tile = self.bounds.tile_size as f32;
        let frame = self.animator.current_frame();
        let body_w = tile * 0.5;
        let body_h = tile * 0.6;
        let top = cy - body_h / 2.0 - tile * 0.1;
        engine.fill_rect(cx - body_w / 2.0, top, body_w, body_h, PLAYER);

        // Eyes sit towards the facing side.
        let eye = (tile / 10.0).max(1.0);
        let eye_y = top + body_h * 0.25;
        match frame {
            0..=3 => engine.fill_rect(cx - body_w / 2.0 + eye, eye_y, eye, eye, PLAYER_DARK),
            5..=8 => engine.fill_rect(cx + body_w / 2.0 - 2.0 * eye, eye_y, eye, eye, PLAYER_DARK),
            _ => {
                engine.fill_rect(cx - body_w / 4.0 - eye / 2.0, eye_y, eye, eye, PLAYER_DARK);
                engine.fill_rect(cx + body_w / 4.0 - eye / 2.0, eye_y, eye, eye, PLAYER_DARK);
            }
        }

        // Legs alternate on odd walk frames.
        let leg_w = body_w / 3.0;
        let leg_h = tile * 0.2;
        let leg_y = top + body_h;
        let (left, right) = match frame {
            4 => (leg_h, leg_h),
            f if f % 2 == 1 => (leg_h * 0.5, leg_h),
            _ => (leg_h, leg_h * 0.5),
        };
        engine.fill_rect(cx - body_w / 2.0, leg_y, leg_w, left, PLAYER_DARK);
        engine.fill_rect(cx + body_w / 2.0 - leg_w, leg_y, leg_w, right, PLAYER_DARK);
    }
}

impl Game for QuizGame {
    fn on_enter(&mut self, engine: &mut Engine) {
        engine.clear_color = BACKDROP;
        let spawned = self.npcs.populate(
            self.bounds,
            self.config.spawn_margin,
            &self.config.challenges,
            self.config.npc_count(),
            &mut self.rng,
        );
        info!("[game] {} NPCs on a {}x{} board", spawned.len(), self.bounds.width, self.bounds.height);
    }

    fn update(&mut self, engine: &mut Engine) {
        let dt = engine.dt();

        if self.modals.is_open() {
            if let Some(ModalEvent::Answered(result)) = self.modals.update(&mut engine.input, dt) {
                if let Some(id) = self.asking.take() {
                    let answer = match &result {
                        PromptResult::Submitted(text) => Some(text.as_str()),
                        PromptResult::Cancelled => None,
                    };
                    if self.npcs.resolve(id, answer, &mut self.modals) == Some(Outcome::Solved)
                        && self.npcs.is_empty()
                    {
                        info!("[game] every question answered");
                    }
                }
            }
            return;
        }

        if engine.is_key_pressed(KeyCode::Escape) {
            engine.request_quit();
            return;
        }

        let held = DirectionInput::from_actions(&self.bindings, &engine.input);
        self.controller.tick(held, Some(&mut engine.timers), &mut self.animator);
        self.animator.update(dt);
    }

    fn on_pointer_down(&mut self, _engine: &mut Engine, button: MouseButton, x: f32, y: f32) {
        if button != MouseButton::Left || self.modals.is_open() {
            return;
        }
        let Some(id) = self.npcs.hit_test(x, y, &self.bounds) else { return };
        // Non-blocking activation: the prompt goes up now and its answer is
        // judged by `resolve` in a later update.
        let Some(challenge) = self.npcs.get(id).and_then(|npc| npc.challenge()) else { return };
        self.modals.push(Modal::Prompt(PromptBox::new(challenge.text.clone(), MAX_ANSWER_CHARS)));
        self.asking = Some(id);
    }

    fn render(&mut self, engine: &mut Engine) {
        self.draw_board(engine);
        self.draw_npcs(engine);
        let pos = self.controller.projected_pixel_position();
        self.draw_player(engine, pos);

        let GridPosition { x, y } = self.controller.position();
        engine.draw_text(6.0, 6.0, &format!("({x}, {y})  {} LEFT", self.npcs.len()), 2.0, HUD_TEXT);

        let (w, h) = engine.screen_size();
        self.modals.draw(&mut engine.ui, w, h);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let options = LaunchOptions::from_args(std::env::args().skip(1))?;
    let config = options.game_config()?;
    let rng = match options.seed {
        Some(seed) => {
            info!("[game] seed {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let (width, height) = config.window_size();
    Engine::builder()
        .with_title(&config.title)
        .with_size(width, height)
        .with_ups(config.updates_per_second)
        .run(QuizGame::new(config, rng))?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
