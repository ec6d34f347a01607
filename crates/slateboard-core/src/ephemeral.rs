//! Ephemeral interaction state: the laser-pointer trail and the
//! frame-batched repaint signal. Nothing here is part of the canonical
//! document or the operation log.

use kurbo::Point;

/// Default laser trail capacity in points.
pub const LASER_TRAIL_CAPACITY: usize = 60;

/// Fixed-capacity ring buffer for the transient laser-pointer trail.
/// Appends are O(1); once full, the oldest point is overwritten in place,
/// so memory stays bounded regardless of how long the laser is held.
#[derive(Debug, Clone)]
pub struct LaserTrail {
    buf: Vec<Point>,
    /// Next write position once the buffer is full.
    head: usize,
    cap: usize,
}

impl LaserTrail {
    pub fn new() -> Self {
        Self::with_capacity(LASER_TRAIL_CAPACITY)
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            buf: Vec::with_capacity(cap.max(1)),
            head: 0,
            cap: cap.max(1),
        }
    }

    pub fn push(&mut self, point: Point) {
        if self.buf.len() < self.cap {
            self.buf.push(point);
        } else {
            self.buf[self.head] = point;
        }
        self.head = (self.head + 1) % self.cap;
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Drop all points but keep the allocation.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.head = 0;
    }

    /// Points from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        let n = self.buf.len();
        let start = if n == self.cap { self.head } else { 0 };
        (0..n).map(move |i| self.buf[(start + i) % n])
    }
}

impl Default for LaserTrail {
    fn default() -> Self {
        Self::new()
    }
}

/// Frame-batched change notification. Any number of `mark` calls within one
/// tick collapse into a single `take`, so repaint cost is independent of
/// pointer-sampling rate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RepaintFlag {
    dirty: bool,
}

impl RepaintFlag {
    pub fn mark(&mut self) {
        self.dirty = true;
    }

    /// Consume the pending repaint request, if any.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trail_overwrites_oldest() {
        let mut trail = LaserTrail::with_capacity(3);
        for i in 0..5 {
            trail.push(Point::new(i as f64, 0.0));
        }
        assert_eq!(trail.len(), 3);
        let xs: Vec<f64> = trail.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_trail_partial_fill_in_order() {
        let mut trail = LaserTrail::with_capacity(60);
        trail.push(Point::new(1.0, 0.0));
        trail.push(Point::new(2.0, 0.0));
        let xs: Vec<f64> = trail.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![1.0, 2.0]);
    }

    #[test]
    fn test_trail_clear_keeps_capacity() {
        let mut trail = LaserTrail::with_capacity(4);
        for i in 0..6 {
            trail.push(Point::new(i as f64, 0.0));
        }
        trail.clear();
        assert!(trail.is_empty());
        trail.push(Point::new(9.0, 9.0));
        assert_eq!(trail.iter().next().unwrap().x, 9.0);
    }

    #[test]
    fn test_repaint_collapses_marks() {
        let mut flag = RepaintFlag::default();
        assert!(!flag.take());
        flag.mark();
        flag.mark();
        flag.mark();
        assert!(flag.take());
        assert!(!flag.take());
    }
}
