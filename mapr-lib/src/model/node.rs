//! Tree nodes

use std::fmt;

use super::NodeKind;
use super::ObjectId;
use super::Payload;

/// One node of the browser tree.
///
/// A node owns its children. Children are empty until the node has been
/// opened once and the loader's response was attached.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    /// Backend identifier, unique among the node's siblings.
    pub id: ObjectId,
    /// Determines icon, allowed children and the load endpoint.
    pub kind: NodeKind,
    /// Display text.
    pub label: String,
    /// The backend object this node was built from.
    pub payload: Payload,
    /// Whether the node may be opened.
    pub has_children: bool,
    /// Children in sorted order.
    pub children: Vec<TreeNode>,
    /// Whether children have been fetched.
    pub loaded: bool,
    /// Whether the node is currently open.
    pub opened: bool,
}

impl TreeNode {
    /// Creates a closed, unloaded node.
    pub fn new(id: impl Into<ObjectId>, kind: NodeKind, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
            payload: Payload::default(),
            has_children: false,
            children: Vec::new(),
            loaded: false,
            opened: false,
        }
    }

    /// The synthetic node the tree hangs its first level from.
    pub fn root() -> Self {
        Self {
            has_children: true,
            ..Self::new("#", NodeKind::Root, "")
        }
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_children(mut self, has_children: bool) -> Self {
        self.has_children = has_children;
        self
    }

    pub fn opened(mut self) -> Self {
        self.opened = true;
        self
    }

    /// `true` for the synthetic root.
    pub fn is_root(&self) -> bool {
        self.kind == NodeKind::Root
    }

    /// Identifier in `kind-id` form, e.g. `screen-42`.
    pub fn qualified_id(&self) -> String {
        format!("{}-{}", self.kind.wire_name(), self.id)
    }

    /// Backend id to send when loading this node's children.
    pub fn backend_id(&self) -> Option<&ObjectId> {
        self.payload.id.as_ref()
    }

    /// Activity counter used for ordering.
    pub fn counter(&self) -> Option<i64> {
        self.payload.counter()
    }

    /// Drops loaded children and marks the node closed.
    pub fn reset(&mut self) {
        self.children.clear();
        self.loaded = false;
        self.opened = false;
    }
}

/// Address of a node: child indices from the root's first level down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// The path of the synthetic root.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn from_indices(indices: impl Into<Vec<usize>>) -> Self {
        Self(indices.into())
    }

    /// Path of the `index`th child of this node.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of levels below the root.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("#");
        }
        let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        write!(f, "#/{}", parts.join("/"))
    }
}
