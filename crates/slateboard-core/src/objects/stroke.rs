//! Freehand pen stroke.

use super::{
    default_opacity, now_millis, samples_extent, scale_about, ObjectId, PackedColor, Sample,
    MAX_STROKE_WIDTH, MIN_STROKE_WIDTH,
};
use kurbo::{Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A pen or highlighter stroke: an ordered list of pressure samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stroke {
    pub id: ObjectId,
    pub points: Vec<Sample>,
    pub color: PackedColor,
    pub width: f64,
    /// Highlighter strokes render wide and translucent.
    #[serde(default)]
    pub highlighter: bool,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub rotation: f64,
    pub timestamp: u64,
}

impl Stroke {
    pub fn from_samples(
        points: Vec<Sample>,
        color: PackedColor,
        width: f64,
        highlighter: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            color,
            width,
            highlighter,
            opacity: 1.0,
            rotation: 0.0,
            timestamp: now_millis(),
        }
    }

    pub fn add_point(&mut self, sample: Sample) {
        self.points.push(sample);
    }

    /// Sample extent inflated by half the stroke width; empty rect when the
    /// stroke has no samples.
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
