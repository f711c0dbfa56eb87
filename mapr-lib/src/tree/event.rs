//! Tree events

use crate::model::NodePath;

/// Notification sent to every [`Tree::subscribe`](super::Tree::subscribe) receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEvent {
    /// The first level finished loading.
    Loaded,
    /// All nodes were dropped ahead of a reload.
    Refreshed,
    Opened(NodePath),
    Closed(NodePath),
    Selected(NodePath),
    Deselected,
    Focused(NodePath),
}
