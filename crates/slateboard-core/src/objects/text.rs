//! Text labels.

use super::{
    default_opacity, now_millis, ObjectId, PackedColor, MAX_FONT_SIZE, MIN_FONT_SIZE,
};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Bounds are approximated from character counts, not glyph metrics; the
// renderer owns exact layout.
const CHAR_WIDTH_FACTOR: f64 = 0.6;
const LINE_HEIGHT_FACTOR: f64 = 1.2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Text {
    pub id: ObjectId,
    /// Top-left corner of the text block.
    pub position: Point,
    pub content: String,
    pub font_family: String,
    pub font_size: f64,
    pub color: PackedColor,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub rotation: f64,
    pub timestamp: u64,
}

impl Text {
    pub fn new(
        position: Point,
        content: impl Into<String>,
        font_family: impl Into<String>,
        font_size: f64,
        color: PackedColor,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content: content.into(),
            font_family: font_family.into(),
            font_size,
            color,
            opacity: 1.0,
            rotation: 0.0,
            timestamp: now_millis(),
        }
    }

    /// Approximate bounds: longest line in characters times an average glyph
    /// width, line count times a line height.
    pub fn bounds(&self) -> Rect {
        let lines = self.content.lines().count().max(1);
        let max_chars = self
            .content
            .lines()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0);
        let width = max_chars as f64 * self.font_size * CHAR_WIDTH_FACTOR;
        let height = lines as f64 * self.font_size * LINE_HEIGHT_FACTOR;
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + width,
            self.position.y + height,
        )
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Scaling text scales its font size about the block center; the clamp
    /// means extreme factors leave the center slightly off, which is fine.
    pub fn scale_by(&mut self, factor: f64) {
        let center = self.bounds().center();
        self.font_size = (self.font_size * factor).clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        let b = self.bounds();
        self.position.x = center.x - b.width() / 2.0;
        self.position.y = center.y - b.height() / 2.0;
    }
}
