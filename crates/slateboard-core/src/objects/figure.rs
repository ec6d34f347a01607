//! Closed geometric shapes (the `shape` variant).

use super::{
    default_opacity, now_millis, ObjectId, PackedColor, MAX_STROKE_WIDTH, MIN_STROKE_WIDTH,
};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which closed shape to draw inside the figure's rect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FigureKind {
    #[default]
    Rectangle,
    Ellipse,
    Triangle,
}

/// An axis-aligned shape with an outline color and optional fill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Figure {
    pub id: ObjectId,
    pub rect: Rect,
    pub kind: FigureKind,
    #[serde(default)]
    pub filled: bool,
    pub color: PackedColor,
    pub width: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub rotation: f64,
    pub timestamp: u64,
}

impl Figure {
    pub fn from_corners(
        a: Point,
        b: Point,
        kind: FigureKind,
        filled: bool,
        color: PackedColor,
        width: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            rect: Rect::from_points(a, b),
            kind,
            filled,
            color,
            width,
            opacity: 1.0,
            rotation: 0.0,
            timestamp: now_millis(),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.rect.abs()
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.rect = self.rect + delta;
    }

    pub fn scale_by(&mut self, factor: f64) {
        let center = self.rect.center();
        let half_w = self.rect.width() / 2.0 * factor;
        let half_h = self.rect.height() / 2.0 * factor;
        self.rect = Rect::new(
            center.x - half_w,
            center.y - half_h,
            center.x + half_w,
            center.y + half_h,
        );
        self.width = (self.width * factor).clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH);
    }
}
