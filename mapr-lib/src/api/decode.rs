//! Per-kind decoders turning a listing response into tree nodes

use log::debug;
use log::warn;
use serde_json::Value;

use crate::error::ApiError;
use crate::model::NodeKind;
use crate::model::ObjectId;
use crate::model::Payload;
use crate::model::TreeNode;

/// Label given to the orphaned-images container.
pub const ORPHANED_LABEL: &str = "Orphaned Images";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// The key holds a single object.
    One,
    /// The key holds an array of objects.
    Many,
}

struct Decoder {
    key: &'static str,
    kind: NodeKind,
    shape: Shape,
}

/// Response keys in the order their nodes are emitted.
const DECODERS: &[Decoder] = &[
    Decoder { key: "experimenter", kind: NodeKind::Experimenter, shape: Shape::One },
    Decoder { key: "mapannotations", kind: NodeKind::MapAnnotation, shape: Shape::Many },
    Decoder { key: "maps", kind: NodeKind::MapAnnotation, shape: Shape::Many },
    Decoder { key: "projects", kind: NodeKind::Project, shape: Shape::Many },
    Decoder { key: "datasets", kind: NodeKind::Dataset, shape: Shape::Many },
    Decoder { key: "images", kind: NodeKind::Image, shape: Shape::Many },
    Decoder { key: "screens", kind: NodeKind::Screen, shape: Shape::Many },
    Decoder { key: "plates", kind: NodeKind::Plate, shape: Shape::Many },
    Decoder { key: "acquisitions", kind: NodeKind::Acquisition, shape: Shape::Many },
    Decoder { key: "orphaned", kind: NodeKind::Orphaned, shape: Shape::One },
];

/// Decodes every known key of a listing body into nodes.
///
/// Entries that cannot be decoded are skipped with a warning; a body that
/// is not a JSON object is a parse error.
pub fn decode_children(body: &Value) -> Result<Vec<TreeNode>, ApiError> {
    let object = body
        .as_object()
        .ok_or_else(|| ApiError::parse("listing body is not a JSON object"))?;

    let mut nodes = Vec::new();
    let mut matched = false;

    for decoder in DECODERS {
        let Some(value) = object.get(decoder.key) else {
            continue;
        };
        matched = true;

        match (decoder.shape, value) {
            (Shape::One, Value::Object(_)) => {
                nodes.extend(decode_entry(decoder.kind, value));
            }
            (Shape::Many, Value::Array(entries)) => {
                nodes.extend(entries.iter().filter_map(|e| decode_entry(decoder.kind, e)));
            }
            (_, Value::Null) => {}
            _ => warn!("Unexpected shape for '{}' in listing, skipping", decoder.key),
        }
    }

    if !matched {
        debug!("Listing body carried no known kind key");
    }

    Ok(nodes)
}

/// Decodes one backend object as a node of `kind`.
pub fn decode_entry(kind: NodeKind, entry: &Value) -> Option<TreeNode> {
    let payload: Payload = match serde_json::from_value(entry.clone()) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Skipping malformed {} entry: {}", kind, e);
            return None;
        }
    };

    let node = match kind {
        NodeKind::Experimenter => {
            let id = payload.id.clone().unwrap_or(ObjectId::AGGREGATE);
            TreeNode::new(id, kind, payload.full_name())
                .with_children(true)
                .opened()
        }
        NodeKind::Orphaned => {
            let id = payload
                .id
                .clone()
                .unwrap_or_else(|| ObjectId::from(kind.wire_name()));
            TreeNode::new(id, kind, ORPHANED_LABEL).with_children(payload.has_child_count())
        }
        _ => {
            let Some(id) = payload.id.clone() else {
                warn!("Skipping {} entry without an id", kind);
                return None;
            };
            let label = payload.name.clone().unwrap_or_default();
            let has_children = !kind.is_leaf() && payload.has_child_count();
            TreeNode::new(id, kind, label).with_children(has_children)
        }
    };

    Some(node.with_payload(payload))
}
