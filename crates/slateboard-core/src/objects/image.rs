//! Embedded raster images.
//!
//! The canonical model stores a remote URL and/or the raw encoded bytes.
//! Decoded bitmaps live in the renderer's cache, keyed by object id, and are
//! never serialized.

use super::{default_opacity, now_millis, ObjectId};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;
use uuid::Uuid;

/// Raw encoded image bytes, treated as immutable once attached. Clones alias
/// the same allocation, keeping object clones (history snapshots, wire
/// payloads) cheap. Serializes as a base64 string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBytes(pub Arc<Vec<u8>>);

impl ImageBytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Arc::new(bytes))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for ImageBytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(self.0.as_slice()))
    }
}

impl<'de> Deserialize<'de> for ImageBytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        let bytes = BASE64
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)?;
        Ok(Self::new(bytes))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub id: ObjectId,
    /// Top-left corner.
    pub position: Point,
    /// Display size; zero until placement or decode sets it.
    pub width: f64,
    pub height: f64,
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ImageBytes>,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub rotation: f64,
    pub timestamp: u64,
}

impl Image {
    pub fn from_url(position: Point, width: f64, height: f64, url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            image_url: Some(url.into()),
            data: None,
            opacity: 1.0,
            rotation: 0.0,
            timestamp: now_millis(),
        }
    }

    pub fn from_bytes(position: Point, width: f64, height: f64, bytes: ImageBytes) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            image_url: None,
            data: Some(bytes),
            opacity: 1.0,
            rotation: 0.0,
            timestamp: now_millis(),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    pub fn scale_by(&mut self, factor: f64) {
        let center = self.bounds().center();
        self.width = (self.width * factor).max(1.0);
        self.height = (self.height * factor).max(1.0);
        self.position.x = center.x - self.width / 2.0;
        self.position.y = center.y - self.height / 2.0;
    }

    /// Adopt the natural size reported by an async decode. Only fills in a
    /// degenerate placement size, so a late decode never clobbers a size the
    /// user already resized; calling again with the same values is a no-op.
    pub fn apply_decoded_size(&mut self, natural_width: f64, natural_height: f64) {
        if self.width <= 1.0 || self.height <= 1.0 {
            self.width = natural_width.max(1.0);
            self.height = natural_height.max(1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_roundtrip_base64() {
        let img = Image::from_bytes(
            Point::ZERO,
            10.0,
            10.0,
            ImageBytes::new(vec![0x89, 0x50, 0x4E, 0x47]),
        );
        let json = serde_json::to_value(&img).unwrap();
        assert_eq!(json["data"], serde_json::json!("iVBORw=="));
        let back: Image = serde_json::from_value(json).unwrap();
        assert_eq!(back.data, img.data);
    }

    #[test]
    fn test_clone_aliases_bytes() {
        let bytes = ImageBytes::new(vec![1, 2, 3]);
        let img = Image::from_bytes(Point::ZERO, 10.0, 10.0, bytes);
        let copy = img.clone();
        let (a, b) = (img.data.unwrap(), copy.data.unwrap());
        assert!(Arc::ptr_eq(&a.0, &b.0));
    }

    #[test]
    fn test_decoded_size_only_fills_placeholder() {
        let mut img = Image::from_url(Point::ZERO, 0.0, 0.0, "https://example.com/a.png");
        img.apply_decoded_size(320.0, 200.0);
        assert!((img.width - 320.0).abs() < 1e-12);

        img.apply_decoded_size(640.0, 400.0);
        assert!((img.width - 320.0).abs() < 1e-12);

        let mut sized = Image::from_url(Point::ZERO, 50.0, 50.0, "https://example.com/b.png");
        sized.apply_decoded_size(320.0, 200.0);
        assert!((sized.width - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_url_field_name() {
        let img = Image::from_url(Point::ZERO, 1.0, 1.0, "https://example.com/c.png");
        let json = serde_json::to_value(&img).unwrap();
        assert!(json.get("imageUrl").is_some());
        assert!(json.get("data").is_none());
    }
}
