//! Tree state.

use log::debug;
use log::warn;
use tokio::sync::mpsc;

use super::Comparator;
use super::TreeEvent;
use crate::api::JsonSource;
use crate::api::Loader;
use crate::api::report_failure;
use crate::error::Error;
use crate::model::KindRegistry;
use crate::model::NodePath;
use crate::model::TreeNode;

/// A visible node in the flattened tree.
#[derive(Debug, Clone)]
pub struct FlatNode<'a> {
    pub path: NodePath,
    /// Depth below the root (0 = first level).
    pub depth: usize,
    pub node: &'a TreeNode,
}

/// Headless tree: node set, open/selected/focused state and lazy loading.
///
/// The loader, the comparator and the kind registry are handed in at
/// construction; the tree never reaches for shared configuration.
///
/// # Example
///
/// ```ignore
/// let mut tree = Tree::new(loader, Comparator::new().with_active_user(52), KindRegistry::containers());
/// tree.load_root().await;
/// tree.click(&NodePath::from_indices([0, 1])).await;
/// ```
#[derive(Debug)]
pub struct Tree<S> {
    root: TreeNode,
    loader: Loader<S>,
    comparator: Comparator,
    registry: KindRegistry,
    selected: Option<NodePath>,
    focused: Option<NodePath>,
    subscribers: Vec<mpsc::UnboundedSender<TreeEvent>>,
}

impl<S: JsonSource> Tree<S> {
    pub fn new(loader: Loader<S>, comparator: Comparator, registry: KindRegistry) -> Self {
        Self {
            root: TreeNode::root(),
            loader,
            comparator,
            registry,
            selected: None,
            focused: None,
            subscribers: Vec::new(),
        }
    }

    pub fn loader(&self) -> &Loader<S> {
        &self.loader
    }

    pub fn comparator(&self) -> &Comparator {
        &self.comparator
    }

    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    /// Receives every [`TreeEvent`] from now on.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<TreeEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    fn emit(&mut self, event: TreeEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    // =========================================================================
    // Node access
    // =========================================================================

    /// The synthetic root.
    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    /// First-level nodes.
    pub fn roots(&self) -> &[TreeNode] {
        &self.root.children
    }

    /// Node at `path`; the empty path is the synthetic root.
    pub fn get(&self, path: &NodePath) -> Option<&TreeNode> {
        let mut node = &self.root;
        for &index in path.indices() {
            node = node.children.get(index)?;
        }
        Some(node)
    }

    fn get_mut(&mut self, path: &NodePath) -> Option<&mut TreeNode> {
        let mut node = &mut self.root;
        for &index in path.indices() {
            node = node.children.get_mut(index)?;
        }
        Some(node)
    }

    /// Path of the first child of `parent` accepted by `predicate`. Not recursive.
    pub fn locate_child(
        &self,
        parent: &NodePath,
        predicate: impl Fn(&TreeNode) -> bool,
    ) -> Option<NodePath> {
        self.get(parent)?
            .children
            .iter()
            .position(predicate)
            .map(|index| parent.child(index))
    }

    pub fn selected(&self) -> Option<&NodePath> {
        self.selected.as_ref()
    }

    pub fn selected_node(&self) -> Option<&TreeNode> {
        self.selected.as_ref().and_then(|p| self.get(p))
    }

    pub fn focused(&self) -> Option<&NodePath> {
        self.focused.as_ref()
    }

    /// `true` if the node may be opened.
    pub fn is_parent(&self, path: &NodePath) -> bool {
        self.get(path).is_some_and(|n| n.has_children)
    }

    /// Open nodes flattened in display order.
    pub fn visible(&self) -> Vec<FlatNode<'_>> {
        let mut rows = Vec::new();
        let mut stack: Vec<(NodePath, &TreeNode)> = self
            .root
            .children
            .iter()
            .enumerate()
            .rev()
            .map(|(i, n)| (NodePath::root().child(i), n))
            .collect();

        while let Some((path, node)) = stack.pop() {
            if node.opened {
                for (i, child) in node.children.iter().enumerate().rev() {
                    stack.push((path.child(i), child));
                }
            }
            rows.push(FlatNode {
                depth: path.depth() - 1,
                path,
                node,
            });
        }
        rows
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Loads the first level, then any node the response marks as opened.
    pub async fn load_root(&mut self) {
        if !self.root.loaded {
            self.load_into(&NodePath::root()).await;
            if let Some(root) = self.get_mut(&NodePath::root()) {
                root.opened = true;
            }
        }
        self.emit(TreeEvent::Loaded);
    }

    /// Opens a node, loading its children on first use.
    ///
    /// Returns `false` when the node has no children or the load failed; the
    /// node then stays closed.
    pub async fn open(&mut self, path: &NodePath) -> bool {
        let Some(node) = self.get(path) else {
            return false;
        };
        if !node.has_children {
            return false;
        }
        if !node.loaded && !self.load_into(path).await {
            return false;
        }

        match self.get_mut(path) {
            Some(node) if !node.children.is_empty() => {
                let was_open = std::mem::replace(&mut node.opened, true);
                if !was_open {
                    self.emit(TreeEvent::Opened(path.clone()));
                }
                true
            }
            _ => false,
        }
    }

    /// Closes a node. Loaded children are kept.
    pub fn close(&mut self, path: &NodePath) {
        if path.is_root() {
            return;
        }
        if let Some(node) = self.get_mut(path)
            && node.opened
        {
            node.opened = false;
            self.emit(TreeEvent::Closed(path.clone()));
        }
    }

    /// Closes every node below the root.
    pub fn close_all(&mut self) {
        let mut stack: Vec<&mut TreeNode> = self.root.children.iter_mut().collect();
        while let Some(node) = stack.pop() {
            node.opened = false;
            stack.extend(node.children.iter_mut());
        }
    }

    /// Click-to-expand: opens parents, never selects.
    pub async fn click(&mut self, path: &NodePath) -> bool {
        if self.is_parent(path) {
            self.open(path).await
        } else {
            false
        }
    }

    /// Drops every node and reloads from the root.
    pub async fn refresh(&mut self) {
        self.root.reset();
        self.selected = None;
        self.focused = None;
        self.emit(TreeEvent::Refreshed);
        self.load_root().await;
    }

    /// Loads the children of `path` and of any pre-opened node they bring.
    async fn load_into(&mut self, path: &NodePath) -> bool {
        let mut pending = vec![path.clone()];
        let mut attached_first = false;

        while let Some(current) = pending.pop() {
            let Some(node) = self.get(&current) else {
                continue;
            };
            let request_node = TreeNode {
                children: Vec::new(),
                ..node.clone()
            };

            let generation = self.loader.filter().generation();
            let result = self.loader.try_load(&request_node).await;
            let result = match result {
                Ok(_) if self.loader.filter().generation() != generation => Err(Error::StaleLoad),
                other => other,
            };

            let children = match result {
                Ok(children) => children,
                Err(Error::NoRoute(kind)) => {
                    debug!("Nothing to load for {} node", kind);
                    continue;
                }
                Err(Error::StaleLoad) => {
                    debug!("Discarding stale children of {}", request_node.qualified_id());
                    continue;
                }
                Err(e) => {
                    report_failure(&request_node, &e);
                    continue;
                }
            };

            let opened = self.attach(&current, children);
            if current == *path {
                attached_first = true;
            }
            pending.extend(opened);
        }

        attached_first
    }

    /// Filters, sorts and attaches loaded children. Returns the paths of
    /// children that arrived already opened and still need loading.
    fn attach(&mut self, path: &NodePath, children: Vec<TreeNode>) -> Vec<NodePath> {
        let Some(parent_kind) = self.get(path).map(|n| n.kind) else {
            return Vec::new();
        };

        let mut children: Vec<TreeNode> = children
            .into_iter()
            .filter(|child| {
                let allowed = self.registry.allows(parent_kind, child.kind);
                if !allowed {
                    warn!("Dropping {} under {} node", child.qualified_id(), parent_kind);
                }
                allowed
            })
            .collect();
        self.comparator.sort_siblings(&mut children);

        let opened: Vec<NodePath> = children
            .iter()
            .enumerate()
            .filter(|(_, c)| c.opened && c.has_children && !c.loaded)
            .map(|(i, _)| path.child(i))
            .collect();

        if let Some(parent) = self.get_mut(path) {
            parent.loaded = true;
            if children.is_empty() && !parent.is_root() {
                parent.has_children = false;
                parent.opened = false;
            }
            parent.children = children;
        }

        opened
    }

    // =========================================================================
    // Selection and focus
    // =========================================================================

    /// Selects a single node, replacing any previous selection.
    pub fn select(&mut self, path: &NodePath) -> bool {
        if path.is_root() || self.get(path).is_none() {
            return false;
        }
        self.selected = Some(path.clone());
        self.emit(TreeEvent::Selected(path.clone()));
        true
    }

    pub fn deselect_all(&mut self) {
        if self.selected.take().is_some() {
            self.emit(TreeEvent::Deselected);
        }
    }

    /// Moves input focus to a node.
    pub fn focus(&mut self, path: &NodePath) -> bool {
        if path.is_root() || self.get(path).is_none() {
            return false;
        }
        self.focused = Some(path.clone());
        self.emit(TreeEvent::Focused(path.clone()));
        true
    }
}
