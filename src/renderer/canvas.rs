use crate::engine::Color;

use super::font;
use super::pipeline::{QuadVertex, quad};

/// Immediate-mode list of coloured quads for one layer of one frame.
/// Holds no GPU state.
#[derive(Debug, Default)]
pub struct Canvas {
    vertices: Vec<QuadVertex>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn vertices(&self) -> &[QuadVertex] {
        &self.vertices
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 6
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        self.vertices.extend_from_slice(&quad(x, y, w, h, color.0));
    }

    /// Outline drawn inside `(x, y, w, h)`.
    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, thickness: f32, color: Color) {
        let t = thickness.min(w / 2.0).min(h / 2.0);
        self.fill_rect(x, y, w, t, color);
        self.fill_rect(x, y + h - t, w, t, color);
        self.fill_rect(x, y + t, t, h - 2.0 * t, color);
        self.fill_rect(x + w - t, y + t, t, h - 2.0 * t, color);
    }

    /// Draw `text` in the built-in font, top-left at `(x, y)`.
    pub fn text(&mut self, x: f32, y: f32, text: &str, scale: f32, color: Color) {
        for [rx, ry, rw, rh] in font::layout(text, x, y, scale) {
            self.fill_rect(rx, ry, rw, rh, color);
        }
    }

    /// Draw `text` horizontally centred on `cx`.
    pub fn text_centered(&mut self, cx: f32, y: f32, text: &str, scale: f32, color: Color) {
        let w = font::text_width(text, scale);
        self.text(cx - w / 2.0, y, text, scale, color);
    }
}
