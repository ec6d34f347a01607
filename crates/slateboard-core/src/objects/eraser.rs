//! Legacy eraser marks.
//!
//! Older documents stored eraser passes as objects painted in the page
//! background color. The variant stays deserializable so those documents
//! still load, but it is excluded from hit-testing and marquee selection.

use super::{
    default_opacity, now_millis, samples_extent, scale_about, ObjectId, Sample, MAX_STROKE_WIDTH,
    MIN_STROKE_WIDTH,
};
use kurbo::{Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Eraser {
    pub id: ObjectId,
    pub points: Vec<Sample>,
    pub width: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub rotation: f64,
    pub timestamp: u64,
}

impl Eraser {
    pub fn new(points: Vec<Sample>, width: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            width,
            opacity: 1.0,
            rotation: 0.0,
            timestamp: now_millis(),
        }
    }

    pub fn bounds(&self) -> Rect {
        if self.points.is_empty() {
            return Rect::ZERO;
        }
        samples_extent(&self.points).inflate(self.width / 2.0, self.width / 2.0)
    }

    pub fn translate(&mut self, delta: Vec2) {
        for s in &mut self.points {
            s.x += delta.x;
            s.y += delta.y;
        }
    }

    pub fn scale_by(&mut self, factor: f64) {
        let center = self.bounds().center();
        for s in &mut self.points {
            let p = scale_about(s.point(), center, factor);
            s.x = p.x;
            s.y = p.y;
        }
        self.width = (self.width * factor).clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH);
    }
}
