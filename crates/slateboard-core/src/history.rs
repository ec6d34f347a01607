//! Per-page undo/redo history.
//!
//! Linear history over full deep-cloned snapshots of a page's object list.
//! Snapshots never alias live objects; the engine replaces the live list
//! with a clone when moving through history.

use crate::objects::BoardObject;

/// Maximum snapshots retained per page. The oldest snapshot is evicted when
/// a commit would exceed this.
pub const MAX_HISTORY: usize = 50;

#[derive(Debug, Clone, Default)]
pub struct PageHistory {
    snapshots: Vec<Vec<BoardObject>>,
    /// Index of the snapshot matching the current live list.
    cursor: usize,
}

impl PageHistory {
    /// History containing a single baseline snapshot.
    pub fn baseline(objects: &[BoardObject]) -> Self {
        Self {
            snapshots: vec![objects.to_vec()],
            cursor: 0,
        }
    }

    /// Drop everything and restart from a single baseline snapshot.
    pub fn reset(&mut self, objects: &[BoardObject]) {
        self.snapshots.clear();
        self.snapshots.push(objects.to_vec());
        self.cursor = 0;
    }

    /// Record a new state. Discards any redo branch beyond the cursor, then
    /// appends a deep clone and advances. Evicts the oldest snapshot past
    /// [`MAX_HISTORY`], shifting the cursor so it still points at the entry
    /// just pushed.
    pub fn commit(&mut self, objects: &[BoardObject]) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(objects.to_vec());
        self.cursor += 1;
        if self.snapshots.len() > MAX_HISTORY {
            self.snapshots.remove(0);
            self.cursor -= 1;
        }
    }

    /// Step back one snapshot; `None` at the boundary.
    pub fn undo(&mut self) -> Option<Vec<BoardObject>> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.snapshots[self.cursor].clone())
    }

    /// Step forward one snapshot; `None` at the boundary.
    pub fn redo(&mut self) -> Option<Vec<BoardObject>> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.snapshots[self.cursor].clone())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Number of retained snapshots.
    pub fn depth(&self) -> usize {
        self.snapshots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{PackedColor, Sample, Stroke};

    fn stroke_at(x: f64) -> BoardObject {
        BoardObject::Stroke(Stroke::from_samples(
            vec![Sample::new(x, 0.0, 1.0), Sample::new(x + 10.0, 10.0, 1.0)],
            PackedColor::black(),
            2.0,
            false,
        ))
    }

    #[test]
    fn test_undo_redo_restores_exact_snapshot() {
        let mut objects = Vec::new();
        let mut history = PageHistory::baseline(&objects);

        objects.push(stroke_at(0.0));
        history.commit(&objects);
        objects.push(stroke_at(20.0));
        history.commit(&objects);

        let ids: Vec<_> = objects.iter().map(|o| o.id()).collect();

        let back = history.undo().unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].id(), ids[0]);

        let forward = history.redo().unwrap();
        assert_eq!(forward.len(), 2);
        assert_eq!(
            forward.iter().map(|o| o.id()).collect::<Vec<_>>(),
            ids
        );
    }

    #[test]
    fn test_boundaries_are_noops() {
        let mut history = PageHistory::baseline(&[]);
        assert!(!history.can_undo());
        assert!(history.undo().is_none());
        assert!(!history.can_redo());
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_commit_truncates_redo_branch() {
        let mut objects = vec![stroke_at(0.0)];
        let mut history = PageHistory::baseline(&[]);
        history.commit(&objects);

        history.undo().unwrap();
        assert!(history.can_redo());

        objects[0] = stroke_at(50.0);
        history.commit(&objects);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_cap_evicts_oldest_without_shifting_current() {
        let mut history = PageHistory::baseline(&[]);
        let mut objects = Vec::new();
        for i in 0..MAX_HISTORY {
            objects.push(stroke_at(i as f64));
            history.commit(&objects);
        }
        assert_eq!(history.depth(), MAX_HISTORY);
        let last_id = objects.last().unwrap().id();

        // The 51st commit drops the baseline, not the current entry.
        objects.push(stroke_at(999.0));
        history.commit(&objects);
        assert_eq!(history.depth(), MAX_HISTORY);

        let back = history.undo().unwrap();
        assert_eq!(back.last().unwrap().id(), last_id);
        assert_eq!(back.len(), MAX_HISTORY);
    }

    #[test]
    fn test_deep_equality_over_sequence() {
        let mut history = PageHistory::baseline(&[]);
        let mut objects = Vec::new();
        let mut states = vec![objects.clone()];
        for i in 0..10 {
            objects.push(stroke_at(i as f64 * 5.0));
            history.commit(&objects);
            states.push(objects.clone());
        }
        for expected in states.iter().rev().skip(1) {
            let snap = history.undo().unwrap();
            let snap_json: Vec<_> = snap.iter().map(|o| o.to_json()).collect();
            let expected_json: Vec<_> = expected.iter().map(|o| o.to_json()).collect();
            assert_eq!(snap_json, expected_json);
        }
    }
}
