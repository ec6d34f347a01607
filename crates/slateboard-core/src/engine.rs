//! The board engine: the public surface consumed by gesture glue, UI, and
//! transport.
//!
//! External input drives the engine through start/update/end lifecycle
//! calls. Completed gestures mutate the document store, push exactly one
//! history commit, and emit one operation record per affected object
//! through the outgoing-op sink. Remote records arrive through
//! [`BoardEngine::apply_remote`] and never touch history.

use crate::document::{Board, PageId};
use crate::ephemeral::{LaserTrail, RepaintFlag};
use crate::error::BoardError;
use crate::objects::{
    BoardObject, Connector, Eraser, Figure, FigureKind, Image, ObjectId, PackedColor, Sample,
    Stroke, Text, MAX_STROKE_WIDTH,
};
use crate::protocol::{BoardOp, OpAction, OpSink};
use crate::selection::{self, DragMode, HIT_TOLERANCE};
use crate::tools::{ToolKind, ToolStyle};
use kurbo::{Point, Rect, Vec2};
use std::collections::BTreeSet;

/// Drags shorter than this produce no shape (accidental taps).
pub const MIN_DRAG_DISTANCE: f64 = 4.0;
/// Per-step resize factor clamp, so one fast pointer frame cannot produce
/// an enormous or negative scale.
pub const MIN_SCALE_STEP: f64 = 0.5;
pub const MAX_SCALE_STEP: f64 = 3.0;
/// Placement offset for duplicated objects.
const DUPLICATE_OFFSET: Vec2 = Vec2::new(12.0, 12.0);
/// Eraser marks are wider than the pen width that spawned them.
const ERASER_WIDTH_FACTOR: f64 = 4.0;
/// Highlighter strokes have a minimum width.
const HIGHLIGHTER_MIN_WIDTH: f64 = 12.0;

pub struct BoardEngine {
    board: Board,
    tool: ToolKind,
    style: ToolStyle,
    /// Index of the single selection in the current page's object list.
    selection: Option<usize>,
    /// Marquee multi-selection; never holds exactly one member.
    multi_selection: BTreeSet<usize>,
    drag: DragMode,
    /// Previous pointer position; refreshed every move event so move deltas
    /// never accumulate rounding error against a stale anchor.
    last_pointer: Point,
    /// Previous pointer angle about the object center during rotation.
    last_angle: f64,
    drag_changed: bool,
    stroke_active: bool,
    pending_points: Vec<Sample>,
    shape_anchor: Option<Point>,
    shape_cursor: Point,
    marquee_anchor: Option<Point>,
    marquee_cursor: Point,
    laser: LaserTrail,
    repaint: RepaintFlag,
    op_sink: Option<OpSink>,
}

impl BoardEngine {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            tool: ToolKind::default(),
            style: ToolStyle::default(),
            selection: None,
            multi_selection: BTreeSet::new(),
            drag: DragMode::None,
            last_pointer: Point::ZERO,
            last_angle: 0.0,
            drag_changed: false,
            stroke_active: false,
            pending_points: Vec::new(),
            shape_anchor: None,
            shape_cursor: Point::ZERO,
            marquee_anchor: None,
            marquee_cursor: Point::ZERO,
            laser: LaserTrail::new(),
            repaint: RepaintFlag::default(),
            op_sink: None,
        }
    }

    // --- Observation (painter-facing) ---

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Objects of the current page, in z-order.
    pub fn objects(&self) -> &[BoardObject] {
        &self.board.current_page().objects
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn multi_selection(&self) -> &BTreeSet<usize> {
        &self.multi_selection
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn style(&self) -> &ToolStyle {
        &self.style
    }

    /// In-progress stroke samples for live preview.
    pub fn pending_stroke(&self) -> &[Sample] {
        if self.stroke_active {
            &self.pending_points
        } else {
            &[]
        }
    }

    /// In-progress shape drag (anchor, cursor) for live preview.
    pub fn shape_drag(&self) -> Option<(Point, Point)> {
        self.shape_anchor.map(|a| (a, self.shape_cursor))
    }

    /// Active marquee rectangle for live preview.
    pub fn marquee(&self) -> Option<Rect> {
        self.marquee_anchor
            .map(|a| selection::marquee_rect(a, self.marquee_cursor))
    }

    pub fn laser(&self) -> &LaserTrail {
        &self.laser
    }

    /// Consume the batched repaint request for this tick.
    pub fn take_repaint(&mut self) -> bool {
        self.repaint.take()
    }

    // --- Transport hookup ---

    /// Install the outgoing-operation callback. This is the engine's only
    /// coupling to a transport.
    pub fn set_op_sink(&mut self, sink: OpSink) {
        self.op_sink = Some(sink);
    }

    fn emit(&mut self, op: BoardOp) {
        if let Some(sink) = self.op_sink.as_mut() {
            sink(op);
        }
    }

    // --- Tool and style ---

    /// Switch tools, cancelling any in-progress interaction.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tool = tool;
        self.stroke_active = false;
        self.pending_points.clear();
        self.shape_anchor = None;
        self.marquee_anchor = None;
        self.drag = DragMode::None;
    }

    /// Set the working color; applies to the live selection when one exists.
    pub fn set_color(&mut self, color: PackedColor) {
        self.style.color = color;
        self.mutate_selected(|obj| obj.set_color(color));
    }

    pub fn set_width(&mut self, width: f64) {
        self.style.set_width(width);
        self.mutate_selected(|obj| obj.set_width(width));
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        self.style.set_opacity(opacity);
        self.mutate_selected(|obj| obj.set_opacity(opacity));
    }

    pub fn set_font(&mut self, family: &str, size: f64) {
        self.style.set_font(family, size);
        let (family, size) = (self.style.font_family.clone(), self.style.font_size);
        self.mutate_selected(move |obj| {
            if let BoardObject::Text(text) = obj {
                text.font_family = family.clone();
                text.font_size = size;
            }
        });
    }

    pub fn set_filled(&mut self, filled: bool) {
        self.style.filled = filled;
        self.mutate_selected(|obj| {
            if let BoardObject::Shape(figure) = obj {
                figure.filled = filled;
            }
        });
    }

    /// Apply a property mutation to the single selection; a property change
    /// is a committing mutation and replicates as a `move` record.
    fn mutate_selected(&mut self, f: impl FnOnce(&mut BoardObject)) {
        self.revalidate_selection();
        let Some(idx) = self.selection else { return };
        let page_id = self.board.current_page().id;
        let payload = {
            let obj = &mut self.board.current_objects()[idx];
            f(obj);
            obj.clone()
        };
        self.commit_current();
        self.emit(BoardOp::moved(page_id, payload));
        self.repaint.mark();
    }

    // --- Stroke lifecycle (pen, highlighter, eraser) ---

    pub fn begin_stroke(&mut self, x: f64, y: f64, pressure: f64) {
        if !matches!(
            self.tool,
            ToolKind::Pen | ToolKind::Highlighter | ToolKind::Eraser
        ) {
            return;
        }
        self.pending_points.clear();
        self.pending_points.push(Sample::new(x, y, pressure));
        self.stroke_active = true;
        self.repaint.mark();
    }

    pub fn update_stroke(&mut self, x: f64, y: f64, pressure: f64) {
        if !self.stroke_active {
            return;
        }
        self.pending_points.push(Sample::new(x, y, pressure));
        self.repaint.mark();
    }

    /// Complete the stroke: one object, one commit, one `add` record.
    pub fn end_stroke(&mut self) {
        if !self.stroke_active {
            return;
        }
        self.stroke_active = false;
        let points = std::mem::take(&mut self.pending_points);
        if points.is_empty() {
            return;
        }
        let obj = match self.tool {
            ToolKind::Eraser => {
                let width = (self.style.width * ERASER_WIDTH_FACTOR).min(MAX_STROKE_WIDTH);
                BoardObject::Eraser(Eraser::new(points, width))
            }
            ToolKind::Highlighter => {
                let width = self.style.width.max(HIGHLIGHTER_MIN_WIDTH);
                let mut stroke = Stroke::from_samples(points, self.style.color, width, true);
                stroke.opacity = self.style.opacity;
                BoardObject::Stroke(stroke)
            }
            _ => {
                let mut stroke =
                    Stroke::from_samples(points, self.style.color, self.style.width, false);
                stroke.opacity = self.style.opacity;
                BoardObject::Stroke(stroke)
            }
        };
        self.push_object(obj);
    }

    // --- Shape lifecycle (figures, line, arrow, ruler) ---

    pub fn begin_shape(&mut self, point: Point) {
        self.shape_anchor = Some(point);
        self.shape_cursor = point;
    }

    pub fn update_shape(&mut self, point: Point) {
        if self.shape_anchor.is_some() {
            self.shape_cursor = point;
            self.repaint.mark();
        }
    }

    /// Complete the drag. Degenerate drags (below [`MIN_DRAG_DISTANCE`]) are
    /// silently ignored.
    pub fn end_shape(&mut self) {
        let Some(start) = self.shape_anchor.take() else {
            return;
        };
        let end = self.shape_cursor;
        if start.distance(end) < MIN_DRAG_DISTANCE {
            self.repaint.mark();
            return;
        }
        let color = self.style.color;
        let width = self.style.width;
        let obj = match self.tool {
            ToolKind::Line => BoardObject::Line(Connector::new(start, end, color, width)),
            ToolKind::Arrow => BoardObject::Arrow(Connector::new(start, end, color, width)),
            ToolKind::Ruler => BoardObject::Ruler(Connector::new(start, end, color, width)),
            ToolKind::Rectangle => BoardObject::Shape(Figure::from_corners(
                start,
                end,
                FigureKind::Rectangle,
                self.style.filled,
                color,
                width,
            )),
            ToolKind::Ellipse => BoardObject::Shape(Figure::from_corners(
                start,
                end,
                FigureKind::Ellipse,
                self.style.filled,
                color,
                width,
            )),
            ToolKind::Triangle => BoardObject::Shape(Figure::from_corners(
                start,
                end,
                FigureKind::Triangle,
                self.style.filled,
                color,
                width,
            )),
            _ => return,
        };
        let mut obj = obj;
        obj.set_opacity(self.style.opacity);
        self.push_object(obj);
    }

    // --- Text and image placement ---

    pub fn add_text(&mut self, position: Point, content: impl Into<String>) {
        let content = content.into();
        if content.trim().is_empty() {
            return;
        }
        let mut text = Text::new(
            position,
            content,
            self.style.font_family.clone(),
            self.style.font_size,
            self.style.color,
        );
        text.opacity = self.style.opacity;
        self.push_object(BoardObject::Text(text));
    }

    pub fn add_image(&mut self, image: Image) {
        self.push_object(BoardObject::Image(image));
    }

    /// Completion sink for the external async image decoder. Idempotently
    /// corrects the owning image's placement size and requests a repaint; a
    /// decode finishing for a deleted object is a safe no-op. Never commits
    /// and never emits an operation.
    pub fn image_decoded(&mut self, id: ObjectId, natural_width: f64, natural_height: f64) {
        for page in self.board.pages_mut() {
            for obj in &mut page.objects {
                if obj.id() == id {
                    if let BoardObject::Image(img) = obj {
                        img.apply_decoded_size(natural_width, natural_height);
                        self.repaint.mark();
                    }
                    return;
                }
            }
        }
        log::debug!("decode completed for missing object {id}, ignoring");
    }

    // --- Selection lifecycle ---

    /// Pointer-down for the select tool. Hits the selected object's handles
    /// first, then falls back to topmost-object selection.
    pub fn select_at(&mut self, point: Point) {
        self.revalidate_selection();
        self.last_pointer = point;
        self.drag_changed = false;

        // A down on any member of the multi-selection starts a shared move;
        // anywhere else dissolves the set.
        if !self.multi_selection.is_empty() {
            let page = self.board.current_page();
            let on_member = self.multi_selection.iter().any(|&i| {
                page.objects
                    .get(i)
                    .is_some_and(|o| selection::hit_body(o, point, HIT_TOLERANCE))
            });
            if on_member {
                self.drag = DragMode::Move;
                return;
            }
            self.multi_selection.clear();
            self.repaint.mark();
        }

        if let Some(idx) = self.selection {
            let obj = &self.board.current_page().objects[idx];
            let mode = selection::hit_handle(obj, point);
            if mode != DragMode::None {
                if mode == DragMode::Rotate {
                    let center = obj.bounds().center();
                    self.last_angle = (point.y - center.y).atan2(point.x - center.x);
                }
                self.drag = mode;
                return;
            }
        }

        let hit = self.board.current_page().top_object_at(point, HIT_TOLERANCE);
        if self.selection != hit {
            self.repaint.mark();
        }
        self.selection = hit;
        self.drag = if hit.is_some() {
            DragMode::Move
        } else {
            DragMode::None
        };
    }

    /// Pointer-move during an active drag. Dispatches on the drag mode; all
    /// math is relative to the previous event, not the down point.
    pub fn move_selected(&mut self, point: Point) {
        if self.drag == DragMode::None {
            return;
        }
        let delta = point - self.last_pointer;

        if !self.multi_selection.is_empty() {
            let objects = self.board.current_objects();
            for &i in &self.multi_selection {
                if let Some(obj) = objects.get_mut(i) {
                    obj.translate(delta);
                }
            }
        } else if let Some(idx) = self.selection {
            let drag = self.drag;
            let last_pointer = self.last_pointer;
            let last_angle = self.last_angle;
            match self.board.current_objects().get_mut(idx) {
                Some(obj) => match drag {
                    DragMode::Move => obj.translate(delta),
                    DragMode::Resize(_) => {
                        let center = obj.bounds().center();
                        let d_prev = last_pointer.distance(center);
                        let d_cur = point.distance(center);
                        if d_prev > 1e-6 {
                            let factor = (d_cur / d_prev).clamp(MIN_SCALE_STEP, MAX_SCALE_STEP);
                            obj.scale_by(factor);
                        }
                    }
                    DragMode::Rotate => {
                        let center = obj.bounds().center();
                        let angle = (point.y - center.y).atan2(point.x - center.x);
                        let rotation = obj.rotation() + (angle - last_angle);
                        obj.set_rotation(rotation);
                        self.last_angle = angle;
                    }
                    DragMode::None => {}
                },
                None => {
                    // Stale index: the object vanished mid-drag.
                    self.selection = None;
                    self.drag = DragMode::None;
                    return;
                }
            }
        } else {
            self.drag = DragMode::None;
            return;
        }

        self.last_pointer = point;
        self.drag_changed = true;
        self.repaint.mark();
    }

    /// Pointer-up: one commit for the whole drag, one `move` record per
    /// affected object.
    pub fn end_drag(&mut self) {
        let had_change = self.drag != DragMode::None && self.drag_changed;
        self.drag = DragMode::None;
        self.drag_changed = false;
        if !had_change {
            return;
        }

        let page_id = self.board.current_page().id;
        let mut payloads = Vec::new();
        let page = self.board.current_page();
        if !self.multi_selection.is_empty() {
            for &i in &self.multi_selection {
                if let Some(obj) = page.objects.get(i) {
                    payloads.push(obj.clone());
                }
            }
        } else if let Some(idx) = self.selection {
            if let Some(obj) = page.objects.get(idx) {
                payloads.push(obj.clone());
            }
        }

        self.commit_current();
        for obj in payloads {
            self.emit(BoardOp::moved(page_id, obj));
        }
    }

    /// Toggle the topmost object at `point` in or out of the multi-selection
    /// set. An existing single selection is promoted into the set on first
    /// use; a set shrinking to one member collapses back to single selection.
    pub fn toggle_at(&mut self, point: Point) {
        self.revalidate_selection();
        let Some(idx) = self.board.current_page().top_object_at(point, HIT_TOLERANCE) else {
            return;
        };
        if self.multi_selection.is_empty() {
            match self.selection {
                Some(s) if s == idx => self.selection = None,
                Some(s) => {
                    self.multi_selection.insert(s);
                    self.multi_selection.insert(idx);
                    self.selection = None;
                    self.collapse_singleton();
                }
                None => self.selection = Some(idx),
            }
        } else {
            if !self.multi_selection.remove(&idx) {
                self.multi_selection.insert(idx);
            }
            self.collapse_singleton();
        }
        self.repaint.mark();
    }

    // --- Marquee lifecycle ---

    pub fn begin_marquee(&mut self, point: Point) {
        self.marquee_anchor = Some(point);
        self.marquee_cursor = point;
    }

    pub fn update_marquee(&mut self, point: Point) {
        if self.marquee_anchor.is_some() {
            self.marquee_cursor = point;
            self.repaint.mark();
        }
    }

    /// Complete the marquee: overlapping selectable objects become the
    /// multi-selection; a single hit demotes to ordinary selection.
    pub fn end_marquee(&mut self) {
        let Some(anchor) = self.marquee_anchor.take() else {
            return;
        };
        let rect = selection::marquee_rect(anchor, self.marquee_cursor);
        let hits = selection::objects_in_rect(&self.board.current_page().objects, rect);
        self.selection = None;
        self.multi_selection.clear();
        match hits.len() {
            0 => {}
            1 => self.selection = Some(hits[0]),
            _ => self.multi_selection.extend(hits),
        }
        self.repaint.mark();
    }

    // --- Selection edits ---

    pub fn delete_selected(&mut self) {
        self.revalidate_selection();
        let mut indices: Vec<usize> = if !self.multi_selection.is_empty() {
            self.multi_selection.iter().copied().collect()
        } else if let Some(idx) = self.selection {
            vec![idx]
        } else {
            return;
        };
        self.selection = None;
        self.multi_selection.clear();

        let page_id = self.board.current_page().id;
        let mut removed_ids = Vec::new();
        {
            let objects = self.board.current_objects();
            indices.sort_unstable_by(|a, b| b.cmp(a));
            for idx in indices {
                if idx < objects.len() {
                    removed_ids.push(objects.remove(idx).id());
                }
            }
        }
        if removed_ids.is_empty() {
            return;
        }
        self.commit_current();
        for id in removed_ids {
            self.emit(BoardOp::delete(page_id, id));
        }
        self.repaint.mark();
    }

    /// Duplicate the selection with fresh ids and a small placement offset;
    /// the duplicates become the new selection.
    pub fn duplicate_selected(&mut self) {
        self.revalidate_selection();
        let indices: Vec<usize> = if !self.multi_selection.is_empty() {
            self.multi_selection.iter().copied().collect()
        } else if let Some(idx) = self.selection {
            vec![idx]
        } else {
            return;
        };

        let page_id = self.board.current_page().id;
        let base = {
            let objects = self.board.current_objects();
            let base = objects.len();
            for &idx in &indices {
                let mut copy = objects[idx].clone();
                copy.regenerate_id();
                copy.translate(DUPLICATE_OFFSET);
                objects.push(copy);
            }
            base
        };

        let count = indices.len();
        self.multi_selection.clear();
        self.selection = None;
        if count == 1 {
            self.selection = Some(base);
        } else {
            self.multi_selection.extend(base..base + count);
        }

        let clones: Vec<BoardObject> = self.board.current_page().objects[base..base + count]
            .iter()
            .cloned()
            .collect();
        self.commit_current();
        for obj in clones {
            self.emit(BoardOp::add(page_id, obj));
        }
        self.repaint.mark();
    }

    /// Raise the single selection to the top of the z-order. Z-order moves
    /// commit locally but do not replicate (the protocol has no reorder
    /// action).
    pub fn bring_selected_to_front(&mut self) {
        self.revalidate_selection();
        let Some(idx) = self.selection else { return };
        let new_idx = {
            let objects = self.board.current_objects();
            if idx + 1 == objects.len() {
                return;
            }
            let obj = objects.remove(idx);
            objects.push(obj);
            objects.len() - 1
        };
        self.selection = Some(new_idx);
        self.commit_current();
        self.repaint.mark();
    }

    /// Lower the single selection to the bottom of the z-order.
    pub fn send_selected_to_back(&mut self) {
        self.revalidate_selection();
        let Some(idx) = self.selection else { return };
        {
            let objects = self.board.current_objects();
            if idx == 0 {
                return;
            }
            let obj = objects.remove(idx);
            objects.insert(0, obj);
        }
        self.selection = Some(0);
        self.commit_current();
        self.repaint.mark();
    }

    // --- History ---

    pub fn undo(&mut self) {
        let page = self.board.current_page_mut();
        if let Some(snapshot) = page.history.undo() {
            page.objects = snapshot;
            self.selection = None;
            self.multi_selection.clear();
            self.drag = DragMode::None;
            self.repaint.mark();
        }
    }

    pub fn redo(&mut self) {
        let page = self.board.current_page_mut();
        if let Some(snapshot) = page.history.redo() {
            page.objects = snapshot;
            self.selection = None;
            self.multi_selection.clear();
            self.drag = DragMode::None;
            self.repaint.mark();
        }
    }

    pub fn can_undo(&self) -> bool {
        self.board.current_page().history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.board.current_page().history.can_redo()
    }

    /// Empty the current page: one commit, one `clear` record.
    pub fn clear_page(&mut self) {
        self.selection = None;
        self.multi_selection.clear();
        let page_id = self.board.current_page().id;
        {
            let objects = self.board.current_objects();
            if objects.is_empty() {
                return;
            }
            objects.clear();
        }
        self.commit_current();
        self.emit(BoardOp::clear(page_id));
        self.repaint.mark();
    }

    // --- Pages ---

    pub fn add_page(&mut self) -> PageId {
        self.selection = None;
        self.multi_selection.clear();
        self.drag = DragMode::None;
        let id = self.board.add_page();
        self.repaint.mark();
        id
    }

    /// Switch pages; out-of-range indices are silently ignored.
    pub fn go_to_page(&mut self, index: usize) {
        if self.board.go_to_page(index) {
            self.selection = None;
            self.multi_selection.clear();
            self.drag = DragMode::None;
            self.repaint.mark();
        }
    }

    // --- Export / import ---

    pub fn export_json(&self) -> Result<String, BoardError> {
        self.board.export_json()
    }

    pub fn import_json(&mut self, json: &str) -> Result<(), BoardError> {
        self.board.import_json(json)?;
        self.selection = None;
        self.multi_selection.clear();
        self.drag = DragMode::None;
        self.laser.clear();
        self.repaint.mark();
        Ok(())
    }

    // --- Remote operations ---

    /// Apply one remote operation record. Unknown page ids fall back to the
    /// current page; absent targets make the whole operation a no-op. Remote
    /// application never pushes a history commit.
    pub fn apply_remote(&mut self, op: BoardOp) {
        let action = op.action;
        let page_idx = match self
            .board
            .pages()
            .iter()
            .position(|p| p.id == op.page_id)
        {
            Some(i) => i,
            None => {
                log::warn!(
                    "remote op for unknown page {}, applying to current page",
                    op.page_id
                );
                self.board.current_index()
            }
        };
        let on_current = page_idx == self.board.current_index();

        let mut removed_at = None;
        {
            let page = self.board.page_at_mut(page_idx);
            match action {
                OpAction::Add => match op.object {
                    Some(obj) => {
                        if page.contains(obj.id()) {
                            log::debug!("remote add for existing object {}, skipping", obj.id());
                        } else {
                            page.objects.push(obj);
                        }
                    }
                    None => log::warn!("remote add without object payload, ignoring"),
                },
                OpAction::Delete => match op.object_id {
                    Some(id) => {
                        if let Some(idx) = page.find_index(id) {
                            page.objects.remove(idx);
                            removed_at = Some(idx);
                        }
                    }
                    None => log::warn!("remote delete without object id, ignoring"),
                },
                OpAction::Move => match op.object {
                    Some(obj) => {
                        if let Some(idx) = page.find_index(obj.id()) {
                            page.objects[idx] = obj;
                        } else {
                            log::debug!("remote move for missing object {}, ignoring", obj.id());
                        }
                    }
                    None => log::warn!("remote move without object payload, ignoring"),
                },
                OpAction::Clear => page.objects.clear(),
            }
        }

        if on_current {
            match action {
                OpAction::Delete => {
                    if let Some(idx) = removed_at {
                        self.adjust_selection_after_remove(idx);
                    }
                }
                OpAction::Clear => {
                    self.selection = None;
                    self.multi_selection.clear();
                    self.drag = DragMode::None;
                }
                _ => self.revalidate_selection(),
            }
        }
        self.repaint.mark();
    }

    // --- Laser pointer ---

    pub fn laser_begin(&mut self, point: Point) {
        self.laser.clear();
        self.laser.push(point);
        self.repaint.mark();
    }

    pub fn laser_update(&mut self, point: Point) {
        self.laser.push(point);
        self.repaint.mark();
    }

    pub fn laser_end(&mut self) {
        self.laser.clear();
        self.repaint.mark();
    }

    // --- Internals ---

    fn push_object(&mut self, obj: BoardObject) {
        let page_id = self.board.current_page().id;
        self.board.current_objects().push(obj.clone());
        self.commit_current();
        self.emit(BoardOp::add(page_id, obj));
        self.repaint.mark();
    }

    fn commit_current(&mut self) {
        let page = self.board.current_page_mut();
        page.history.commit(&page.objects);
    }

    /// Clamp selection state against the current page; out-of-range single
    /// selection is silently cleared, not an error.
    fn revalidate_selection(&mut self) {
        let len = self.board.current_page().objects.len();
        if self.selection.is_some_and(|s| s >= len) {
            self.selection = None;
        }
        self.multi_selection.retain(|&i| i < len);
        self.collapse_singleton();
    }

    fn collapse_singleton(&mut self) {
        if self.multi_selection.len() == 1 {
            self.selection = self.multi_selection.pop_first();
        }
    }

    /// Shift index-based selection after a remote removal at `removed`.
    fn adjust_selection_after_remove(&mut self, removed: usize) {
        self.selection = match self.selection {
            Some(s) if s == removed => None,
            Some(s) if s > removed => Some(s - 1),
            other => other,
        };
        if self.selection.is_none() && self.drag != DragMode::None {
            self.drag = DragMode::None;
        }
        self.multi_selection = self
            .multi_selection
            .iter()
            .filter_map(|&i| {
                use std::cmp::Ordering;
                match i.cmp(&removed) {
                    Ordering::Less => Some(i),
                    Ordering::Equal => None,
                    Ordering::Greater => Some(i - 1),
                }
            })
            .collect();
        self.collapse_singleton();
    }

    #[cfg(test)]
    pub(crate) fn page_history_depth(&self, index: usize) -> usize {
        self.board.pages()[index].history.depth()
    }
}

impl Default for BoardEngine {
    fn default() -> Self {
        Self::new()
    }
}
