//! `?show=` deep links

use std::fmt;

use log::debug;
use log::info;

use super::Tree;
use crate::api::JsonSource;
use crate::model::NodeKind;
use crate::model::NodePath;
use crate::model::ObjectId;
use crate::model::TreeNode;

/// Name of the URL parameter carrying the deep link.
pub const SHOW_PARAM: &str = "show";

/// The node a deep link points at: a bare id (`42`) or `kind-id` (`screen-42`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowTarget {
    pub kind: Option<NodeKind>,
    pub id: ObjectId,
    raw: String,
}

impl ShowTarget {
    /// Parses a `show` value. Returns `None` for an empty value.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let (kind, id) = match raw.split_once('-') {
            Some((prefix, rest)) if !rest.is_empty() => match NodeKind::from_wire_name(prefix) {
                Some(kind) => (Some(kind), ObjectId::parse(rest)),
                None => (None, ObjectId::parse(raw)),
            },
            _ => (None, ObjectId::parse(raw)),
        };

        Some(Self {
            kind,
            id,
            raw: raw.to_string(),
        })
    }

    /// Reads the `show` parameter from a URL query string.
    pub fn from_query(query: &str) -> Option<Self> {
        url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
            .find(|(key, _)| key == SHOW_PARAM)
            .and_then(|(_, value)| Self::parse(&value))
    }

    /// `true` if `node` is the target.
    pub fn matches(&self, node: &TreeNode) -> bool {
        if node.qualified_id() == self.raw {
            return true;
        }
        node.id == self.id && self.kind.is_none_or(|kind| kind == node.kind)
    }
}

impl fmt::Display for ShowTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Applies a deep link once the first level has loaded.
///
/// Without a target the first root-level node is selected. With one, that
/// node is opened and its immediate children searched; a match is selected,
/// opened and focused. Returns the selected path.
pub async fn resolve_show<S: JsonSource>(
    tree: &mut Tree<S>,
    show: Option<&ShowTarget>,
) -> Option<NodePath> {
    let first = NodePath::root().child(0);
    tree.get(&first)?;

    let Some(show) = show else {
        tree.select(&first);
        return Some(first);
    };

    tree.open(&first).await;
    let Some(path) = tree.locate_child(&first, |node| show.matches(node)) else {
        debug!("Deep link '{}' not found under the first root node", show);
        return None;
    };

    info!("Showing {}", show);
    tree.select(&path);
    tree.open(&path).await;
    tree.focus(&path);
    Some(path)
}
