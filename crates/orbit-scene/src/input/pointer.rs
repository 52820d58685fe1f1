use glam::Vec2;
use serde::{Deserialize, Serialize};

/// How raw pointer pixels map to normalized coordinates.
/// Backdrop variants disagree on Y inversion and output scale, so both are configurable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerMapping {
    /// Flip Y so that up is positive.
    pub invert_y: bool,
    /// Multiplier applied after normalization (the hero scene uses 0.5).
    pub scale: f32,
}

impl Default for PointerMapping {
    fn default() -> Self {
        Self { invert_y: true, scale: 1.0 }
    }
}

/// Map pixel coordinates to [-1, 1]². Returns None for a degenerate viewport.
pub fn normalize_pointer(px: f32, py: f32, viewport_width: f32, viewport_height: f32, mapping: &PointerMapping) -> Option<Vec2> {
    if !(viewport_width > 0.0 && viewport_height > 0.0) {
        return None;
    }
    let x = (px / viewport_width) * 2.0 - 1.0;
    let y = (py / viewport_height) * 2.0 - 1.0;
    let y = if mapping.invert_y { -y } else { y };
    let scaled = Vec2::new(x, y) * mapping.scale;
    Some(scaled.clamp(Vec2::splat(-1.0), Vec2::splat(1.0)))
}

/// Latest pointer position in normalized coordinates.
/// One writer (pointer-move events), many readers (every animator, every frame).
/// Owned by a mounted scene and passed to animators explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pos: Vec2,
    mapping: PointerMapping,
    moves: u32,
}

impl PointerState {
    pub fn new(mapping: PointerMapping) -> Self {
        Self { pos: Vec2::ZERO, mapping, moves: 0 }
    }

    /// Apply one pointer-move event. Degenerate viewports leave the state untouched.
    pub fn on_pointer_move(&mut self, px: f32, py: f32, viewport_width: f32, viewport_height: f32) {
        if let Some(pos) = normalize_pointer(px, py, viewport_width, viewport_height, &self.mapping) {
            self.pos = pos;
            self.moves = self.moves.wrapping_add(1);
        }
    }

    /// Back to the centre, as on mount.
    pub fn reset(&mut self) {
        self.pos = Vec2::ZERO;
        self.moves = 0;
    }

    pub fn x(&self) -> f32 {
        self.pos.x
    }

    pub fn y(&self) -> f32 {
        self.pos.y
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    /// Number of accepted pointer-move events since the last reset.
    pub fn moves(&self) -> u32 {
        self.moves
    }
}
