//! Object model for the whiteboard.
//!
//! Every drawable entity on a page is one [`BoardObject`] variant. Variants
//! share a common capability set (bounds, translate, uniform scale, rotation,
//! opacity, serialization) dispatched exhaustively here.

mod connector;
mod eraser;
mod figure;
mod image;
mod stroke;
mod text;

pub use connector::Connector;
pub use eraser::Eraser;
pub use figure::{Figure, FigureKind};
pub use image::{Image, ImageBytes};
pub use stroke::Stroke;
pub use text::Text;

use crate::error::BoardError;
use kurbo::{Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Unique identifier for board objects.
pub type ObjectId = Uuid;

/// Stroke widths derived from scaling are clamped to this range so malformed
/// remote data cannot produce runaway visual size.
pub const MIN_STROKE_WIDTH: f64 = 0.5;
pub const MAX_STROKE_WIDTH: f64 = 50.0;

/// Font size clamp range, same rationale as stroke width.
pub const MIN_FONT_SIZE: f64 = 8.0;
pub const MAX_FONT_SIZE: f64 = 200.0;

pub(crate) fn default_opacity() -> f64 {
    1.0
}

/// Milliseconds since the Unix epoch, used for immutable creation timestamps.
pub(crate) fn now_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Serializable RGBA color, packed into a single integer on the wire
/// (`0xAARRGGBB`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl PackedColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Pack into `0xAARRGGBB`.
    pub fn to_packed(self) -> u32 {
        (u32::from(self.a) << 24)
            | (u32::from(self.r) << 16)
            | (u32::from(self.g) << 8)
            | u32::from(self.b)
    }

    /// Unpack from `0xAARRGGBB`.
    pub fn from_packed(value: u32) -> Self {
        Self {
            a: (value >> 24) as u8,
            r: (value >> 16) as u8,
            g: (value >> 8) as u8,
            b: value as u8,
        }
    }
}

impl Default for PackedColor {
    fn default() -> Self {
        Self::black()
    }
}

impl Serialize for PackedColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.to_packed())
    }
}

impl<'de> Deserialize<'de> for PackedColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let packed = u32::deserialize(deserializer)?;
        Ok(Self::from_packed(packed))
    }
}

impl From<Color> for PackedColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<PackedColor> for Color {
    fn from(color: PackedColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

fn default_pressure() -> f64 {
    0.5
}

/// One pointer sample in a stroke path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "p", default = "default_pressure")]
    pub pressure: f64,
}

impl Sample {
    pub fn new(x: f64, y: f64, pressure: f64) -> Self {
        Self { x, y, pressure }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Axis-aligned bounds of a sample list, or the zero rect when empty.
pub(crate) fn samples_extent(samples: &[Sample]) -> Rect {
    let mut iter = samples.iter();
    let Some(first) = iter.next() else {
        return Rect::ZERO;
    };
    let mut rect = Rect::new(first.x, first.y, first.x, first.y);
    for s in iter {
        rect = rect.union_pt(s.point());
    }
    rect
}

/// Scale a point about a fixed center.
pub(crate) fn scale_about(p: Point, center: Point, factor: f64) -> Point {
    Point::new(
        center.x + (p.x - center.x) * factor,
        center.y + (p.y - center.y) * factor,
    )
}

/// Rotate a point about a center by `angle` radians (clockwise-positive,
/// matching object rotation).
pub fn rotate_about(p: Point, center: Point, angle: f64) -> Point {
    let (sin, cos) = angle.sin_cos();
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    Point::new(
        center.x + dx * cos - dy * sin,
        center.y + dx * sin + dy * cos,
    )
}

/// Enum wrapper over all object variants. The `type` tag discriminates the
/// wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BoardObject {
    Stroke(Stroke),
    /// Legacy eraser marks; kept deserializable, never a selection target.
    Eraser(Eraser),
    Line(Connector),
    Arrow(Connector),
    Ruler(Connector),
    Shape(Figure),
    Text(Text),
    Image(Image),
}

/// Tags accepted by [`BoardObject::from_json`]; anything else is an
/// [`BoardError::UnknownVariant`].
const KNOWN_TAGS: &[&str] = &[
    "stroke", "eraser", "line", "arrow", "ruler", "shape", "text", "image",
];

impl BoardObject {
    pub fn id(&self) -> ObjectId {
        match self {
            BoardObject::Stroke(o) => o.id,
            BoardObject::Eraser(o) => o.id,
            BoardObject::Line(o) | BoardObject::Arrow(o) | BoardObject::Ruler(o) => o.id,
            BoardObject::Shape(o) => o.id,
            BoardObject::Text(o) => o.id,
            BoardObject::Image(o) => o.id,
        }
    }

    /// Replace the id with a fresh one (duplication / paste).
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        match self {
            BoardObject::Stroke(o) => o.id = new_id,
            BoardObject::Eraser(o) => o.id = new_id,
            BoardObject::Line(o) | BoardObject::Arrow(o) | BoardObject::Ruler(o) => o.id = new_id,
            BoardObject::Shape(o) => o.id = new_id,
            BoardObject::Text(o) => o.id = new_id,
            BoardObject::Image(o) => o.id = new_id,
        }
    }

    /// Bounding rectangle in canvas space, of the un-rotated geometry.
    /// Always finite; degenerate objects report an empty rect.
    pub fn bounds(&self) -> Rect {
        match self {
            BoardObject::Stroke(o) => o.bounds(),
            BoardObject::Eraser(o) => o.bounds(),
            BoardObject::Line(o) | BoardObject::Arrow(o) | BoardObject::Ruler(o) => o.bounds(),
            BoardObject::Shape(o) => o.bounds(),
            BoardObject::Text(o) => o.bounds(),
            BoardObject::Image(o) => o.bounds(),
        }
    }

    /// Apply a delta to every positional field.
    pub fn translate(&mut self, delta: Vec2) {
        match self {
            BoardObject::Stroke(o) => o.translate(delta),
            BoardObject::Eraser(o) => o.translate(delta),
            BoardObject::Line(o) | BoardObject::Arrow(o) | BoardObject::Ruler(o) => {
                o.translate(delta)
            }
            BoardObject::Shape(o) => o.translate(delta),
            BoardObject::Text(o) => o.translate(delta),
            BoardObject::Image(o) => o.translate(delta),
        }
    }

    /// Uniformly scale geometry about the object's own bounds center.
    /// Derived widths and font sizes are clamped to their sane ranges.
    pub fn scale_by(&mut self, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        match self {
            BoardObject::Stroke(o) => o.scale_by(factor),
            BoardObject::Eraser(o) => o.scale_by(factor),
            BoardObject::Line(o) | BoardObject::Arrow(o) | BoardObject::Ruler(o) => {
                o.scale_by(factor)
            }
            BoardObject::Shape(o) => o.scale_by(factor),
            BoardObject::Text(o) => o.scale_by(factor),
            BoardObject::Image(o) => o.scale_by(factor),
        }
    }

    /// Rotation in radians, clockwise about the bounds center.
    pub fn rotation(&self) -> f64 {
        match self {
            BoardObject::Stroke(o) => o.rotation,
            BoardObject::Eraser(o) => o.rotation,
            BoardObject::Line(o) | BoardObject::Arrow(o) | BoardObject::Ruler(o) => o.rotation,
            BoardObject::Shape(o) => o.rotation,
            BoardObject::Text(o) => o.rotation,
            BoardObject::Image(o) => o.rotation,
        }
    }

    pub fn set_rotation(&mut self, rotation: f64) {
        if !rotation.is_finite() {
            return;
        }
        match self {
            BoardObject::Stroke(o) => o.rotation = rotation,
            BoardObject::Eraser(o) => o.rotation = rotation,
            BoardObject::Line(o) | BoardObject::Arrow(o) | BoardObject::Ruler(o) => {
                o.rotation = rotation
            }
            BoardObject::Shape(o) => o.rotation = rotation,
            BoardObject::Text(o) => o.rotation = rotation,
            BoardObject::Image(o) => o.rotation = rotation,
        }
    }

    pub fn opacity(&self) -> f64 {
        match self {
            BoardObject::Stroke(o) => o.opacity,
            BoardObject::Eraser(o) => o.opacity,
            BoardObject::Line(o) | BoardObject::Arrow(o) | BoardObject::Ruler(o) => o.opacity,
            BoardObject::Shape(o) => o.opacity,
            BoardObject::Text(o) => o.opacity,
            BoardObject::Image(o) => o.opacity,
        }
    }

    /// Set opacity, clamped to `[0, 1]`; non-finite input is ignored.
    pub fn set_opacity(&mut self, opacity: f64) {
        if !opacity.is_finite() {
            return;
        }
        let opacity = opacity.clamp(0.0, 1.0);
        match self {
            BoardObject::Stroke(o) => o.opacity = opacity,
            BoardObject::Eraser(o) => o.opacity = opacity,
            BoardObject::Line(o) | BoardObject::Arrow(o) | BoardObject::Ruler(o) => {
                o.opacity = opacity
            }
            BoardObject::Shape(o) => o.opacity = opacity,
            BoardObject::Text(o) => o.opacity = opacity,
            BoardObject::Image(o) => o.opacity = opacity,
        }
    }

    pub fn timestamp(&self) -> u64 {
        match self {
            BoardObject::Stroke(o) => o.timestamp,
            BoardObject::Eraser(o) => o.timestamp,
            BoardObject::Line(o) | BoardObject::Arrow(o) | BoardObject::Ruler(o) => o.timestamp,
            BoardObject::Shape(o) => o.timestamp,
            BoardObject::Text(o) => o.timestamp,
            BoardObject::Image(o) => o.timestamp,
        }
    }

    /// Apply a new primary color to variants that carry one.
    pub fn set_color(&mut self, color: PackedColor) {
        match self {
            BoardObject::Stroke(o) => o.color = color,
            BoardObject::Line(o) | BoardObject::Arrow(o) | BoardObject::Ruler(o) => {
                o.color = color
            }
            BoardObject::Shape(o) => o.color = color,
            BoardObject::Text(o) => o.color = color,
            BoardObject::Eraser(_) | BoardObject::Image(_) => {}
        }
    }

    /// Apply a new stroke width to variants that carry one, clamped.
    pub fn set_width(&mut self, width: f64) {
        if !width.is_finite() {
            return;
        }
        let width = width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH);
        match self {
            BoardObject::Stroke(o) => o.width = width,
            BoardObject::Eraser(o) => o.width = width,
            BoardObject::Line(o) | BoardObject::Arrow(o) | BoardObject::Ruler(o) => {
                o.width = width
            }
            BoardObject::Shape(o) => o.width = width,
            BoardObject::Text(_) | BoardObject::Image(_) => {}
        }
    }

    /// Whether this object can be targeted by selection and marquee.
    /// Legacy eraser marks are never selectable.
    pub fn is_selectable(&self) -> bool {
        !matches!(self, BoardObject::Eraser(_))
    }

    pub fn to_json(&self) -> serde_json::Value {
        // Serialization of the tagged enum cannot fail.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Deserialize one object record, dispatching on its `type` tag.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, BoardError> {
        let tag = value
            .get("type")
            .and_then(|t| t.as_str())
            .ok_or(BoardError::MissingTag)?;
        if !KNOWN_TAGS.contains(&tag) {
            return Err(BoardError::UnknownVariant(tag.to_string()));
        }
        serde_json::from_value(value.clone()).map_err(BoardError::Malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_color_roundtrip() {
        let c = PackedColor::new(0x12, 0x34, 0x56, 0x78);
        assert_eq!(PackedColor::from_packed(c.to_packed()), c);
        assert_eq!(c.to_packed(), 0x7812_3456);
    }

    #[test]
    fn test_packed_color_json_is_integer() {
        let json = serde_json::to_value(PackedColor::black()).unwrap();
        assert_eq!(json, serde_json::json!(0xFF00_0000u32));
    }

    #[test]
    fn test_sample_pressure_default() {
        let s: Sample = serde_json::from_str(r#"{"x":1.0,"y":2.0}"#).unwrap();
        assert!((s.pressure - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_variant_rejected() {
        let value = serde_json::json!({"type": "hologram", "id": "x"});
        match BoardObject::from_json(&value) {
            Err(BoardError::UnknownVariant(tag)) => assert_eq!(tag, "hologram"),
            other => panic!("expected UnknownVariant, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_tag_rejected() {
        let value = serde_json::json!({"id": "x"});
        assert!(matches!(
            BoardObject::from_json(&value),
            Err(BoardError::MissingTag)
        ));
    }

    #[test]
    fn test_object_json_roundtrip_all_variants() {
        let objects = vec![
            BoardObject::Stroke(Stroke::from_samples(
                vec![Sample::new(0.0, 0.0, 1.0), Sample::new(10.0, 5.0, 0.7)],
                PackedColor::black(),
                3.0,
                false,
            )),
            BoardObject::Eraser(Eraser::new(vec![Sample::new(1.0, 1.0, 0.5)], 12.0)),
            BoardObject::Line(Connector::new(
                Point::new(0.0, 0.0),
                Point::new(10.0, 10.0),
                PackedColor::black(),
                2.0,
            )),
            BoardObject::Arrow(Connector::new(
                Point::new(5.0, 0.0),
                Point::new(0.0, 5.0),
                PackedColor::white(),
                2.0,
            )),
            BoardObject::Ruler(Connector::new(
                Point::new(0.0, 0.0),
                Point::new(100.0, 0.0),
                PackedColor::black(),
                1.0,
            )),
            BoardObject::Shape(Figure::from_corners(
                Point::new(0.0, 0.0),
                Point::new(40.0, 30.0),
                FigureKind::Ellipse,
                true,
                PackedColor::black(),
                2.0,
            )),
            BoardObject::Text(Text::new(
                Point::new(10.0, 10.0),
                "hello\nworld",
                "Sans",
                24.0,
                PackedColor::black(),
            )),
            BoardObject::Image(Image::from_url(
                Point::new(0.0, 0.0),
                64.0,
                48.0,
                "https://example.com/a.png",
            )),
        ];

        for obj in objects {
            let value = obj.to_json();
            let back = BoardObject::from_json(&value).unwrap();
            assert_eq!(back.id(), obj.id());
            assert_eq!(back.bounds(), obj.bounds());
            assert!((back.rotation() - obj.rotation()).abs() < 1e-12);
            assert!((back.opacity() - obj.opacity()).abs() < 1e-12);
            assert_eq!(back.timestamp(), obj.timestamp());
        }
    }

    #[test]
    fn test_scale_inverse_restores_bounds() {
        let mut obj = BoardObject::Shape(Figure::from_corners(
            Point::new(10.0, 10.0),
            Point::new(50.0, 40.0),
            FigureKind::Rectangle,
            false,
            PackedColor::black(),
            2.0,
        ));
        let before = obj.bounds();
        obj.scale_by(1.8);
        obj.scale_by(1.0 / 1.8);
        let after = obj.bounds();
        assert!((before.x0 - after.x0).abs() < 1e-9);
        assert!((before.y0 - after.y0).abs() < 1e-9);
        assert!((before.x1 - after.x1).abs() < 1e-9);
        assert!((before.y1 - after.y1).abs() < 1e-9);
    }

    #[test]
    fn test_opacity_clamped() {
        let mut obj = BoardObject::Text(Text::new(
            Point::new(0.0, 0.0),
            "x",
            "Sans",
            24.0,
            PackedColor::black(),
        ));
        obj.set_opacity(3.0);
        assert!((obj.opacity() - 1.0).abs() < f64::EPSILON);
        obj.set_opacity(-1.0);
        assert!(obj.opacity().abs() < f64::EPSILON);
        obj.set_opacity(f64::NAN);
        assert!(obj.opacity().abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_stroke_bounds_are_empty() {
        let stroke = Stroke::from_samples(Vec::new(), PackedColor::black(), 3.0, false);
        assert_eq!(BoardObject::Stroke(stroke).bounds(), Rect::ZERO);
    }
}
