//! Tool selection and the style applied to newly created objects.

use crate::objects::{PackedColor, MAX_FONT_SIZE, MAX_STROKE_WIDTH, MIN_FONT_SIZE, MIN_STROKE_WIDTH};
use serde::{Deserialize, Serialize};

/// Available tools. Drawing tools decide which object variant a completed
/// gesture produces; `Select` and `Laser` never create objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ToolKind {
    #[default]
    Select,
    Pen,
    Highlighter,
    Eraser,
    Line,
    Arrow,
    Ruler,
    Rectangle,
    Ellipse,
    Triangle,
    Text,
    Image,
    Laser,
}

/// Current style settings for new objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolStyle {
    pub color: PackedColor,
    pub width: f64,
    pub opacity: f64,
    pub font_family: String,
    pub font_size: f64,
    pub filled: bool,
}

impl ToolStyle {
    pub fn set_width(&mut self, width: f64) {
        if width.is_finite() {
            self.width = width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH);
        }
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        if opacity.is_finite() {
            self.opacity = opacity.clamp(0.0, 1.0);
        }
    }

    pub fn set_font(&mut self, family: impl Into<String>, size: f64) {
        self.font_family = family.into();
        if size.is_finite() {
            self.font_size = size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        }
    }
}

impl Default for ToolStyle {
    fn default() -> Self {
        Self {
            color: PackedColor::black(),
            width: 3.0,
            opacity: 1.0,
            font_family: "Sans".to_string(),
            font_size: 24.0,
            filled: false,
        }
    }
}
