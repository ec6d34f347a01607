//! Replication protocol records.
//!
//! Every committing local mutation emits one [`BoardOp`]; peers apply the
//! record through [`crate::engine::BoardEngine::apply_remote`]. The core
//! knows nothing about delivery: a single outgoing callback is the only
//! transport coupling.

use crate::document::PageId;
use crate::objects::{BoardObject, ObjectId};
use serde::{Deserialize, Serialize};

/// What a [`BoardOp`] does to its target page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpAction {
    Add,
    Delete,
    Move,
    Clear,
}

/// One replicable operation record.
///
/// `add` and `move` carry the full object payload, `delete` only the object
/// id, `clear` neither. `move` is emitted once per drag (on drag end), not
/// per pointer frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardOp {
    pub action: OpAction,
    pub page_id: PageId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<BoardObject>,
}

impl BoardOp {
    pub fn add(page_id: PageId, object: BoardObject) -> Self {
        Self {
            action: OpAction::Add,
            page_id,
            object_id: Some(object.id()),
            object: Some(object),
        }
    }

    pub fn delete(page_id: PageId, object_id: ObjectId) -> Self {
        Self {
            action: OpAction::Delete,
            page_id,
            object_id: Some(object_id),
            object: None,
        }
    }

    pub fn moved(page_id: PageId, object: BoardObject) -> Self {
        Self {
            action: OpAction::Move,
            page_id,
            object_id: Some(object.id()),
            object: Some(object),
        }
    }

    pub fn clear(page_id: PageId) -> Self {
        Self {
            action: OpAction::Clear,
            page_id,
            object_id: None,
            object: None,
        }
    }
}

/// Outgoing-operation hook handed to the engine by the transport layer.
pub type OpSink = Box<dyn FnMut(BoardOp) + Send>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{PackedColor, Sample, Stroke};
    use uuid::Uuid;

    #[test]
    fn test_wire_shape() {
        let page_id = Uuid::new_v4();
        let op = BoardOp::delete(page_id, Uuid::new_v4());
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["action"], "delete");
        assert!(json.get("pageId").is_some());
        assert!(json.get("objectId").is_some());
        assert!(json.get("object").is_none());

        let clear = serde_json::to_value(BoardOp::clear(page_id)).unwrap();
        assert!(clear.get("objectId").is_none());
        assert!(clear.get("object").is_none());
    }

    #[test]
    fn test_add_roundtrip() {
        let stroke = BoardObject::Stroke(Stroke::from_samples(
            vec![Sample::new(0.0, 0.0, 1.0)],
            PackedColor::black(),
            2.0,
            false,
        ));
        let op = BoardOp::add(Uuid::new_v4(), stroke.clone());
        let json = serde_json::to_string(&op).unwrap();
        let back: BoardOp = serde_json::from_str(&json).unwrap();
        assert_eq!(back.action, OpAction::Add);
        assert_eq!(back.object.unwrap().id(), stroke.id());
    }
}
