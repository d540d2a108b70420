//! Modal question and notice boxes.
//!
//! These stand in for a browser's blocking `prompt`/`alert`: while any modal
//! is open it owns the keyboard and the mouse, and the game treats the world
//! as paused. Modals queue up and only the front one receives input.

use std::collections::VecDeque;

use crate::dispatcher::{Notification, Notifier};
use crate::engine::Color;
use crate::input::{InputState, KeyCode};
use crate::renderer::canvas::Canvas;
use crate::renderer::font;

const PANEL_BG: Color = Color([0.06, 0.09, 0.09, 0.96]);
const BORDER: Color = Color([0.25, 0.65, 0.50, 1.0]);
const FIELD_BG: Color = Color([0.10, 0.16, 0.15, 1.0]);
const TEXT: Color = Color([0.85, 0.92, 0.88, 1.0]);
const DIM: Color = Color([0.40, 0.50, 0.48, 1.0]);
const SHADE: Color = Color([0.0, 0.0, 0.0, 0.45]);

/// Font pixels are drawn this many screen pixels wide.
pub const TEXT_SCALE: f32 = 3.0;
const PADDING: f32 = 18.0;

/// Word-wrap `text` so every returned line is at most `max_cols` characters.
/// Words are split on ASCII whitespace; a word longer than `max_cols` is
/// cut into `max_cols`-sized pieces.
pub fn word_wrap(text: &str, max_cols: usize) -> Vec<String> {
    if max_cols == 0 { return vec![]; }
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let space = if current.is_empty() { 0 } else { 1 };
        if !current.is_empty() && current.chars().count() + space + word.chars().count() > max_cols {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() { current.push(' '); }
        current.push_str(word);
        while current.chars().count() > max_cols {
            let head: String = current.chars().take(max_cols).collect();
            let rest: String = current.chars().skip(max_cols).collect();
            lines.push(head);
            current = rest;
        }
    }
    if !current.is_empty() { lines.push(current); }
    lines
}

/// Half-open point-in-rectangle test.
pub fn rect_contains(rx: f32, ry: f32, rw: f32, rh: f32, px: f32, py: f32) -> bool {
    px >= rx && px < rx + rw && py >= ry && py < ry + rh
}

// ── PromptBox ─────────────────────────────────────────────────────────────────

/// How a prompt was closed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PromptResult {
    Submitted(String),
    Cancelled,
}

/// A question with a single-line answer field.
///
/// Printable characters are appended up to `max_chars`, `Backspace` removes
/// the last one, `Enter` submits and `Escape` cancels. The caret blinks at
/// about 1 Hz.
#[derive(Clone, Debug)]
pub struct PromptBox {
    pub question: String,
    pub value: String,
    pub max_chars: usize,
    cursor_blink: f32,
}

impl PromptBox {
    pub fn new(question: impl Into<String>, max_chars: usize) -> Self {
        Self {
            question: question.into(),
            value: String::new(),
            max_chars: max_chars.max(1),
            cursor_blink: 0.0,
        }
    }

    /// Feed one frame of input. Returns `Some` once the prompt is closed.
    pub fn update(&mut self, input: &mut InputState, dt: f32) -> Option<PromptResult> {
        input.key_consumed = true;
        input.mouse_consumed = true;
        self.cursor_blink = (self.cursor_blink + dt) % 1.0;

        for ch in input.chars_typed.drain(..) {
            if self.value.chars().count() < self.max_chars {
                self.value.push(ch);
            }
        }
        if input.is_key_pressed(KeyCode::Backspace) {
            self.value.pop();
        }

        if input.is_key_pressed(KeyCode::Enter) || input.is_key_pressed(KeyCode::NumpadEnter) {
            Some(PromptResult::Submitted(std::mem::take(&mut self.value)))
        } else if input.is_key_pressed(KeyCode::Escape) {
            Some(PromptResult::Cancelled)
        } else {
            None
        }
    }

    fn draw(&self, ui: &mut Canvas, screen_w: f32, screen_h: f32) {
        let char_w = font::ADVANCE as f32 * TEXT_SCALE;
        let line_h = font::LINE_HEIGHT as f32 * TEXT_SCALE;
        let panel_w = (screen_w * 0.8).min(640.0);
        let cols = ((panel_w - PADDING * 2.0) / char_w) as usize;

        let lines = word_wrap(&self.question, cols);
        let field_h = line_h + 8.0;
        let panel_h = PADDING * 2.0 + lines.len() as f32 * line_h + 10.0 + field_h + 6.0 + line_h;
        let x = (screen_w - panel_w) / 2.0;
        let y = (screen_h - panel_h) / 2.0;

        ui.fill_rect(x, y, panel_w, panel_h, PANEL_BG);
        ui.stroke_rect(x, y, panel_w, panel_h, 2.0, BORDER);

        let mut ty = y + PADDING;
        for line in &lines {
            ui.text(x + PADDING, ty, line, TEXT_SCALE, TEXT);
            ty += line_h;
        }

        // Answer field shows the trailing part of the value plus the caret.
        ty += 10.0;
        let field_w = panel_w - PADDING * 2.0;
        ui.fill_rect(x + PADDING, ty, field_w, field_h, FIELD_BG);
        ui.stroke_rect(x + PADDING, ty, field_w, field_h, 1.0, BORDER);
        let visible = ((field_w - 8.0) / char_w) as usize;
        let caret = if self.cursor_blink < 0.5 { "_" } else { " " };
        let count = self.value.chars().count();
        let shown: String = self.value.chars().skip((count + 1).saturating_sub(visible)).collect();
        ui.text(x + PADDING + 4.0, ty + 4.0 + TEXT_SCALE, &(shown + caret), TEXT_SCALE, TEXT);

        ty += field_h + 6.0;
        ui.text(x + PADDING, ty, "[ENTER] ANSWER  [ESC] CANCEL", TEXT_SCALE * 0.67, DIM);
    }
}

// ── AlertBox ──────────────────────────────────────────────────────────────────

/// A one-line notice closed by `Enter`, `Escape`, `Space` or a click.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlertBox {
    pub message: String,
}

impl AlertBox {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    /// Feed one frame of input. Returns `true` once dismissed.
    pub fn update(&mut self, input: &mut InputState) -> bool {
        let clicked = input.left_click();
        input.key_consumed = true;
        input.mouse_consumed = true;
        clicked
            || [KeyCode::Enter, KeyCode::NumpadEnter, KeyCode::Escape, KeyCode::Space]
                .into_iter()
                .any(|k| input.is_key_pressed(k))
    }

    fn draw(&self, ui: &mut Canvas, screen_w: f32, screen_h: f32) {
        let line_h = font::LINE_HEIGHT as f32 * TEXT_SCALE;
        let text_w = font::text_width(&self.message, TEXT_SCALE);
        let panel_w = (text_w + PADDING * 2.0).max(240.0).min(screen_w);
        let panel_h = PADDING * 2.0 + line_h * 2.0;
        let x = (screen_w - panel_w) / 2.0;
        let y = (screen_h - panel_h) / 2.0;

        ui.fill_rect(x, y, panel_w, panel_h, PANEL_BG);
        ui.stroke_rect(x, y, panel_w, panel_h, 2.0, BORDER);
        ui.text_centered(screen_w / 2.0, y + PADDING, &self.message, TEXT_SCALE, TEXT);
        ui.text_centered(screen_w / 2.0, y + PADDING + line_h, "[OK]", TEXT_SCALE * 0.67, DIM);
    }
}

// ── Modal queue ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub enum Modal {
    Prompt(PromptBox),
    Alert(AlertBox),
}

/// What closing the front modal produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalEvent {
    Answered(PromptResult),
    Dismissed,
}

/// FIFO of open modals; only the front one is live.
#[derive(Debug, Default)]
pub struct ModalQueue {
    queue: VecDeque<Modal>,
}

impl ModalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, modal: Modal) {
        self.queue.push_back(modal);
    }

    pub fn is_open(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn front(&self) -> Option<&Modal> {
        self.queue.front()
    }

    /// Route this frame's input to the front modal and pop it if it closed.
    ///
    /// The key or click that closes a modal is spent: the next modal in line
    /// does not see it, even when several update steps share one frame.
    pub fn update(&mut self, input: &mut InputState, dt: f32) -> Option<ModalEvent> {
        let event = match self.queue.front_mut()? {
            Modal::Prompt(prompt) => prompt.update(input, dt).map(ModalEvent::Answered),
            Modal::Alert(alert) => alert.update(input).then_some(ModalEvent::Dismissed),
        };
        if event.is_some() {
            self.queue.pop_front();
            input.keys_pressed.clear();
            input.mouse_pressed.clear();
        }
        event
    }

    /// Dim the screen and draw the front modal.
    pub fn draw(&self, ui: &mut Canvas, screen_w: f32, screen_h: f32) {
        let Some(modal) = self.queue.front() else { return };
        ui.fill_rect(0.0, 0.0, screen_w, screen_h, SHADE);
        match modal {
            Modal::Prompt(prompt) => prompt.draw(ui, screen_w, screen_h),
            Modal::Alert(alert) => alert.draw(ui, screen_w, screen_h),
        }
    }
}

impl Notifier for ModalQueue {
    fn notify(&mut self, notification: Notification) {
        self.push(Modal::Alert(AlertBox::new(notification.message())));
    }
}
