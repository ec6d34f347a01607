//! Selection hit-testing and transform handle geometry.
//!
//! All hit tests run in the object's local (un-rotated) space: the canvas
//! point is inverse-rotated about the bounds center before comparison
//! against axis-aligned bounds and handle positions. This keeps rotated
//! objects selectable without rotating their bounds.

use crate::objects::{rotate_about, BoardObject};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Handle tap radius in canvas units.
pub const HANDLE_RADIUS: f64 = 10.0;
/// Extra slop added to every handle's tap radius.
pub const HANDLE_SLOP: f64 = 8.0;
/// Corner handles sit on the bounds inflated by this much.
pub const HANDLE_INFLATE: f64 = 6.0;
/// Distance from the top edge to the rotation handle.
pub const ROTATE_HANDLE_OFFSET: f64 = 30.0;
/// The rotation handle gets a larger tap radius than corners.
pub const ROTATE_HANDLE_RADIUS: f64 = 14.0;
/// Tolerance for body hit-testing during plain selection.
pub const HIT_TOLERANCE: f64 = 6.0;

/// Corner positions on the selection frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    fn position(self, bounds: Rect) -> Point {
        match self {
            Corner::TopLeft => Point::new(bounds.x0, bounds.y0),
            Corner::TopRight => Point::new(bounds.x1, bounds.y0),
            Corner::BottomLeft => Point::new(bounds.x0, bounds.y1),
            Corner::BottomRight => Point::new(bounds.x1, bounds.y1),
        }
    }
}

/// Active manipulation mode for the selected object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragMode {
    #[default]
    None,
    /// Whole-object translation.
    Move,
    /// Uniform corner resize.
    Resize(Corner),
    /// Rotation about the bounds center.
    Rotate,
}

/// Map a canvas point into an object's local space.
pub fn to_local(point: Point, center: Point, rotation: f64) -> Point {
    rotate_about(point, center, -rotation)
}

/// Hit-test the selected object's handles, rotation first (it has the larger
/// radius and sits furthest out), then corners, then the body.
pub fn hit_handle(object: &BoardObject, point: Point) -> DragMode {
    let bounds = object.bounds();
    let center = bounds.center();
    let local = to_local(point, center, object.rotation());

    let rotate_pos = Point::new(center.x, bounds.y0 - ROTATE_HANDLE_OFFSET);
    if local.distance(rotate_pos) <= ROTATE_HANDLE_RADIUS + HANDLE_SLOP {
        return DragMode::Rotate;
    }

    let frame = bounds.inflate(HANDLE_INFLATE, HANDLE_INFLATE);
    for corner in Corner::ALL {
        if local.distance(corner.position(frame)) <= HANDLE_RADIUS + HANDLE_SLOP {
            return DragMode::Resize(corner);
        }
    }

    if bounds.inflate(HIT_TOLERANCE, HIT_TOLERANCE).contains(local) {
        return DragMode::Move;
    }

    DragMode::None
}

/// Local-space body containment test with a tolerance inflation.
pub fn hit_body(object: &BoardObject, point: Point, tolerance: f64) -> bool {
    let bounds = object.bounds();
    let local = to_local(point, bounds.center(), object.rotation());
    bounds.inflate(tolerance, tolerance).contains(local)
}

/// Normalized marquee rectangle from two drag corners.
pub fn marquee_rect(anchor: Point, cursor: Point) -> Rect {
    Rect::from_points(anchor, cursor)
}

/// Indices of selectable objects whose bounds overlap the marquee rect,
/// in z-order.
pub fn objects_in_rect(objects: &[BoardObject], rect: Rect) -> Vec<usize> {
    objects
        .iter()
        .enumerate()
        .filter(|(_, o)| o.is_selectable() && rect.intersect(o.bounds()).area() > 0.0)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{Eraser, Figure, FigureKind, PackedColor, Sample};
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn figure() -> BoardObject {
        BoardObject::Shape(Figure::from_corners(
            Point::new(0.0, 0.0),
            Point::new(100.0, 50.0),
            FigureKind::Rectangle,
            false,
            PackedColor::black(),
            2.0,
        ))
    }

    #[test]
    fn test_hit_body_rotated() {
        // Bounds 0..100 x 0..50, center (50, 25). The point (95, 25) lies
        // inside un-rotated; after rotating the object by pi/2 the right edge
        // sweeps vertical, so the same canvas point maps outside while
        // (50, 70) maps inside.
        let mut obj = figure();
        for theta in [0.0, FRAC_PI_4, FRAC_PI_2, PI] {
            obj.set_rotation(theta);
            let canvas = rotate_about(Point::new(95.0, 25.0), Point::new(50.0, 25.0), theta);
            assert!(
                hit_body(&obj, canvas, 0.0),
                "rotated edge point should hit at theta={theta}"
            );
        }

        obj.set_rotation(FRAC_PI_2);
        assert!(!hit_body(&obj, Point::new(95.0, 25.0), 0.0));
        assert!(hit_body(&obj, Point::new(50.0, 70.0), 0.0));
    }

    #[test]
    fn test_hit_handle_corners_and_rotate() {
        let obj = figure();
        let frame = obj.bounds().inflate(HANDLE_INFLATE, HANDLE_INFLATE);
        assert_eq!(
            hit_handle(&obj, Corner::TopLeft.position(frame)),
            DragMode::Resize(Corner::TopLeft)
        );
        assert_eq!(
            hit_handle(&obj, Corner::BottomRight.position(frame)),
            DragMode::Resize(Corner::BottomRight)
        );
        assert_eq!(
            hit_handle(&obj, Point::new(50.0, -ROTATE_HANDLE_OFFSET)),
            DragMode::Rotate
        );
        assert_eq!(hit_handle(&obj, Point::new(50.0, 25.0)), DragMode::Move);
        assert_eq!(hit_handle(&obj, Point::new(500.0, 500.0)), DragMode::None);
    }

    #[test]
    fn test_hit_handle_follows_rotation() {
        let mut obj = figure();
        obj.set_rotation(FRAC_PI_2);
        // The top-left handle rotates with the frame.
        let frame = obj.bounds().inflate(HANDLE_INFLATE, HANDLE_INFLATE);
        let canvas = rotate_about(
            Corner::TopLeft.position(frame),
            obj.bounds().center(),
            FRAC_PI_2,
        );
        assert_eq!(hit_handle(&obj, canvas), DragMode::Resize(Corner::TopLeft));
    }

    #[test]
    fn test_marquee_skips_erasers() {
        let objects = vec![
            figure(),
            BoardObject::Eraser(Eraser::new(
                vec![Sample::new(10.0, 10.0, 0.5), Sample::new(20.0, 20.0, 0.5)],
                12.0,
            )),
        ];
        let hits = objects_in_rect(&objects, Rect::new(-10.0, -10.0, 200.0, 200.0));
        assert_eq!(hits, vec![0]);
    }

    #[test]
    fn test_marquee_requires_overlap() {
        let objects = vec![figure()];
        assert!(objects_in_rect(&objects, Rect::new(200.0, 200.0, 300.0, 300.0)).is_empty());
        assert_eq!(
            objects_in_rect(&objects, Rect::new(90.0, 40.0, 300.0, 300.0)),
            vec![0]
        );
    }
}
