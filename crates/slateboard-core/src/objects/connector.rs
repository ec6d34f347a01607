//! Two-point connector geometry, shared by the line, arrow, and ruler
//! variants. The enclosing enum tag decides how the renderer decorates it.

use super::{
    default_opacity, now_millis, scale_about, ObjectId, PackedColor, MAX_STROKE_WIDTH,
    MIN_STROKE_WIDTH,
};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connector {
    pub id: ObjectId,
    pub start: Point,
    pub end: Point,
    pub color: PackedColor,
    pub width: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub rotation: f64,
    pub timestamp: u64,
}

impl Connector {
    pub fn new(start: Point, end: Point, color: PackedColor, width: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            color,
            width,
            opacity: 1.0,
            rotation: 0.0,
            timestamp: now_millis(),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end).inflate(self.width / 2.0, self.width / 2.0)
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }

    pub fn scale_by(&mut self, factor: f64) {
        let center = self.bounds().center();
        self.start = scale_about(self.start, center, factor);
        self.end = scale_about(self.end, center, factor);
        self.width = (self.width * factor).clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH);
    }

    /// Segment length, used by measurement display for the ruler tag.
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }
}
