//! Document store: ordered pages, each with an ordered object list.

use crate::error::BoardError;
use crate::history::PageHistory;
use crate::objects::{BoardObject, ObjectId};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for pages.
pub type PageId = Uuid;

/// One canvas sheet. The object list index is the z-order: later entries
/// draw on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub objects: Vec<BoardObject>,
    #[serde(skip)]
    pub(crate) history: PageHistory,
}

impl Page {
    pub fn new() -> Self {
        let objects = Vec::new();
        let history = PageHistory::baseline(&objects);
        Self {
            id: Uuid::new_v4(),
            objects,
            history,
        }
    }

    pub fn find_index(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id() == id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.find_index(id).is_some()
    }

    /// Topmost selectable object whose local-space bounds (inflated by
    /// `tolerance`) contain the point.
    pub fn top_object_at(&self, point: Point, tolerance: f64) -> Option<usize> {
        self.objects
            .iter()
            .enumerate()
            .rev()
            .find(|(_, o)| o.is_selectable() && crate::selection::hit_body(o, point, tolerance))
            .map(|(i, _)| i)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

/// The whole document: ordered pages plus the current-page pointer.
#[derive(Debug, Clone)]
pub struct Board {
    pages: Vec<Page>,
    current: usize,
}

impl Board {
    /// A board always holds at least one page.
    pub fn new() -> Self {
        Self {
            pages: vec![Page::new()],
            current: 0,
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_page(&self) -> &Page {
        &self.pages[self.current]
    }

    pub fn current_page_mut(&mut self) -> &mut Page {
        &mut self.pages[self.current]
    }

    /// Mutable view of the active page's object list.
    pub fn current_objects(&mut self) -> &mut Vec<BoardObject> {
        &mut self.pages[self.current].objects
    }

    /// Append a fresh page (with its own baseline history) and switch to it.
    pub fn add_page(&mut self) -> PageId {
        let page = Page::new();
        let id = page.id;
        self.pages.push(page);
        self.current = self.pages.len() - 1;
        id
    }

    /// Switch pages; out-of-range indices are ignored. Returns whether the
    /// current page changed (callers reset selection on `true`).
    pub fn go_to_page(&mut self, index: usize) -> bool {
        if index >= self.pages.len() || index == self.current {
            return false;
        }
        self.current = index;
        true
    }

    pub fn page_by_id_mut(&mut self, id: PageId) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| p.id == id)
    }

    pub(crate) fn page_at_mut(&mut self, index: usize) -> &mut Page {
        &mut self.pages[index]
    }

    pub(crate) fn pages_mut(&mut self) -> &mut [Page] {
        &mut self.pages
    }

    /// Serialize the whole document as a JSON array of pages.
    pub fn export_json(&self) -> Result<String, BoardError> {
        serde_json::to_string(&self.pages).map_err(BoardError::Malformed)
    }

    /// Whole-document replace. Always leaves at least one page, and resets
    /// every page's history to a single baseline snapshot. On error the
    /// board is untouched.
    pub fn import_json(&mut self, json: &str) -> Result<(), BoardError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let records = value.as_array().ok_or_else(|| {
            use serde::de::Error as _;
            BoardError::Malformed(serde_json::Error::custom(
                "expected a top-level array of pages",
            ))
        })?;

        let mut pages = Vec::with_capacity(records.len());
        for record in records {
            let id: PageId = serde_json::from_value(
                record.get("id").cloned().unwrap_or(serde_json::Value::Null),
            )?;
            let mut objects = Vec::new();
            if let Some(items) = record.get("objects").and_then(|o| o.as_array()) {
                for item in items {
                    objects.push(BoardObject::from_json(item)?);
                }
            }
            let history = PageHistory::baseline(&objects);
            pages.push(Page {
                id,
                objects,
                history,
            });
        }

        if pages.is_empty() {
            pages.push(Page::new());
        }
        log::info!("imported document with {} page(s)", pages.len());
        self.pages = pages;
        self.current = 0;
        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
