//! Slateboard Core Library
//!
//! Platform-agnostic document model, interaction engine, and replication
//! protocol for the Slateboard collaborative whiteboard.

pub mod document;
pub mod engine;
pub mod ephemeral;
pub mod error;
pub mod history;
pub mod objects;
pub mod protocol;
pub mod selection;
pub mod tools;

pub use document::{Board, Page, PageId};
pub use engine::BoardEngine;
pub use ephemeral::{LaserTrail, RepaintFlag, LASER_TRAIL_CAPACITY};
pub use error::BoardError;
pub use history::{PageHistory, MAX_HISTORY};
pub use objects::{
    BoardObject, Connector, Eraser, Figure, FigureKind, Image, ImageBytes, ObjectId, PackedColor,
    Sample, Stroke, Text,
};
pub use protocol::{BoardOp, OpAction, OpSink};
pub use selection::{Corner, DragMode};
pub use tools::{ToolKind, ToolStyle};
