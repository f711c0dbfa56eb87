//! Node kinds and the type registry

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Semantic category of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// The synthetic root the tree starts from (`#`).
    #[serde(rename = "#")]
    Root,
    Experimenter,
    Project,
    Dataset,
    Image,
    Screen,
    Plate,
    Acquisition,
    Orphaned,
    #[serde(rename = "mapannotation")]
    MapAnnotation,
}

impl NodeKind {
    /// All kinds a backend response can produce.
    pub const ALL: [NodeKind; 9] = [
        NodeKind::Experimenter,
        NodeKind::Project,
        NodeKind::Dataset,
        NodeKind::Image,
        NodeKind::Screen,
        NodeKind::Plate,
        NodeKind::Acquisition,
        NodeKind::Orphaned,
        NodeKind::MapAnnotation,
    ];

    /// The name the backend and the deep-link parameter use for this kind.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Root => "#",
            Self::Experimenter => "experimenter",
            Self::Project => "project",
            Self::Dataset => "dataset",
            Self::Image => "image",
            Self::Screen => "screen",
            Self::Plate => "plate",
            Self::Acquisition => "acquisition",
            Self::Orphaned => "orphaned",
            Self::MapAnnotation => "mapannotation",
        }
    }

    /// Looks a kind up by wire name. `map` and `tag` are accepted for map annotations.
    pub fn from_wire_name(name: &str) -> Option<Self> {
        let kind = match name {
            "#" => Self::Root,
            "experimenter" => Self::Experimenter,
            "project" => Self::Project,
            "dataset" => Self::Dataset,
            "image" => Self::Image,
            "screen" => Self::Screen,
            "plate" => Self::Plate,
            "acquisition" => Self::Acquisition,
            "orphaned" => Self::Orphaned,
            "mapannotation" | "map" | "tag" => Self::MapAnnotation,
            _ => return None,
        };
        Some(kind)
    }

    /// Kinds that never have children, whatever the backend reports.
    pub fn is_leaf(self) -> bool {
        matches!(self, Self::Image | Self::Acquisition)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Icon and allowed children for one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindSpec {
    /// Icon path relative to the static base URL.
    pub icon: Option<String>,
    /// Kinds that may appear as children of this kind.
    pub valid_children: Vec<NodeKind>,
}

impl KindSpec {
    fn new(icon: &str, valid_children: &[NodeKind]) -> Self {
        Self {
            icon: Some(icon.to_string()),
            valid_children: valid_children.to_vec(),
        }
    }

    fn leaf(icon: &str) -> Self {
        Self::new(icon, &[])
    }
}

/// Static declaration of node kinds: icon and valid-children per kind.
///
/// # Example
///
/// ```
/// use mapr_lib::model::{KindRegistry, NodeKind};
///
/// let registry = KindRegistry::containers();
/// assert!(registry.allows(NodeKind::Project, NodeKind::Dataset));
/// assert!(!registry.allows(NodeKind::Image, NodeKind::Dataset));
/// ```
#[derive(Debug, Clone)]
pub struct KindRegistry {
    kinds: HashMap<NodeKind, KindSpec>,
}

impl KindRegistry {
    /// Registry for the project/dataset and screen/plate container tree.
    pub fn containers() -> Self {
        use NodeKind::*;

        let mut kinds = HashMap::new();
        kinds.insert(Root, KindSpec { icon: None, valid_children: vec![Experimenter] });
        kinds.insert(
            Experimenter,
            KindSpec::new("image/icon_user.png", &[Project, Dataset, Screen, Plate, Orphaned]),
        );
        kinds.insert(Project, KindSpec::new("image/folder16.png", &[Dataset]));
        kinds.insert(Dataset, KindSpec::new("image/folder_image16.png", &[Image]));
        kinds.insert(Image, KindSpec::leaf("image/image16.png"));
        kinds.insert(Screen, KindSpec::new("image/folder_screen16.png", &[Plate]));
        kinds.insert(Plate, KindSpec::new("image/folder_plate16.png", &[Acquisition]));
        kinds.insert(Acquisition, KindSpec::leaf("image/image16.png"));
        kinds.insert(Orphaned, KindSpec::new("image/folder_yellow16.png", &[Image]));
        Self { kinds }
    }

    /// Registry for the map-annotation tree: experimenter, annotation value, then containers.
    pub fn mapannotations() -> Self {
        use NodeKind::*;

        let mut registry = Self::containers();
        registry.kinds.insert(
            Experimenter,
            KindSpec::new("image/icon_user.png", &[MapAnnotation]),
        );
        registry.kinds.insert(
            MapAnnotation,
            KindSpec::new("image/left_sidebar_icon_tag.png", &[Screen, Project]),
        );
        registry.kinds.insert(
            Plate,
            KindSpec::new("image/folder_plate16.png", &[Acquisition, Image]),
        );
        registry.kinds.remove(&Orphaned);
        registry
    }

    /// Replaces the map-annotation icon with the per-menu `<label>_icon_16x16.png`.
    pub fn with_menu_icon(mut self, menu: &str) -> Self {
        if menu.is_empty() {
            return self;
        }
        if let Some(spec) = self.kinds.get_mut(&NodeKind::MapAnnotation) {
            spec.icon = Some(format!("image/{}_icon_16x16.png", menu));
        }
        self
    }

    /// Returns the settings for a kind, if it is registered.
    pub fn get(&self, kind: NodeKind) -> Option<&KindSpec> {
        self.kinds.get(&kind)
    }

    /// Returns `true` if the kind is part of this registry.
    pub fn contains(&self, kind: NodeKind) -> bool {
        self.kinds.contains_key(&kind)
    }

    /// Icon path for a kind.
    pub fn icon(&self, kind: NodeKind) -> Option<&str> {
        self.kinds.get(&kind).and_then(|s| s.icon.as_deref())
    }

    /// Icon URL for a kind under the given static base.
    pub fn icon_url(&self, kind: NodeKind, static_base: &str) -> Option<String> {
        self.icon(kind)
            .map(|icon| format!("{}/{}", static_base.trim_end_matches('/'), icon))
    }

    /// Allowed children of a kind; empty for unknown kinds.
    pub fn valid_children(&self, kind: NodeKind) -> &[NodeKind] {
        self.kinds
            .get(&kind)
            .map(|s| s.valid_children.as_slice())
            .unwrap_or(&[])
    }

    /// Returns `true` if `child` may be placed under `parent`.
    pub fn allows(&self, parent: NodeKind, child: NodeKind) -> bool {
        self.valid_children(parent).contains(&child)
    }
}

impl Default for KindRegistry {
    fn default() -> Self {
        Self::containers()
    }
}
