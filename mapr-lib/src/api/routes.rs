//! Node kind to endpoint table

use std::collections::HashMap;

use crate::model::NodeKind;
use crate::model::ObjectId;

/// Where the children of each node kind are fetched from.
///
/// Paths are relative to the server's base URL. Kinds without an entry
/// (images, acquisitions) have nothing to load.
///
/// # Example
///
/// ```
/// use mapr_lib::api::Routes;
/// use mapr_lib::model::NodeKind;
///
/// let routes = Routes::containers("webclient");
/// assert_eq!(routes.children(NodeKind::Project), Some("webclient/api/datasets/"));
/// assert_eq!(routes.children(NodeKind::Image), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    webindex: String,
    children: HashMap<NodeKind, String>,
    /// Query parameters always sent with a kind's request.
    params: HashMap<NodeKind, Vec<(String, String)>>,
    autocomplete: Option<String>,
}

impl Routes {
    /// Creates an empty table; only the experimenter root route is known.
    pub fn new(webindex: impl AsRef<str>) -> Self {
        Self {
            webindex: prefix(webindex.as_ref()),
            children: HashMap::new(),
            params: HashMap::new(),
            autocomplete: None,
        }
    }

    /// Project/dataset/image and screen/plate/acquisition browsing.
    pub fn containers(webindex: impl AsRef<str>) -> Self {
        let web = prefix(webindex.as_ref());
        Self::new(&web)
            .route(NodeKind::Experimenter, format!("{}api/containers/", web))
            .route(NodeKind::Project, format!("{}api/datasets/", web))
            .route(NodeKind::Dataset, format!("{}api/images/", web))
            .route(NodeKind::Orphaned, format!("{}api/images/", web))
            .route(NodeKind::Screen, format!("{}api/plates/", web))
            .route(NodeKind::Plate, format!("{}api/plate_acquisitions/", web))
    }

    /// Experimenter, map-annotation value, screen, plate, acquisition.
    pub fn mapannotations(webindex: impl AsRef<str>, mapindex: impl AsRef<str>) -> Self {
        let web = prefix(webindex.as_ref());
        let map = prefix(mapindex.as_ref());
        Self::new(&web)
            .route(NodeKind::Experimenter, format!("{}api/mapannotations/", map))
            .route(NodeKind::MapAnnotation, format!("{}api/screens/", map))
            .route(NodeKind::Screen, format!("{}api/plates/", web))
            .route(NodeKind::Plate, format!("{}api/plate_acquisitions/", web))
            .with_autocomplete(format!("{}api/autocomplete/", map))
    }

    /// Per-menu endpoints, e.g. `mapr/api/gene/plates/`.
    pub fn mapr(webindex: impl AsRef<str>, mapr_index: impl AsRef<str>, menu: &str) -> Self {
        let web = prefix(webindex.as_ref());
        let api = format!("{}api/{}/", prefix(mapr_index.as_ref()), menu);
        Self::new(&web)
            .route(NodeKind::Experimenter, api.clone())
            .with_param(NodeKind::Experimenter, "orphaned", true)
            .route(NodeKind::MapAnnotation, api.clone())
            .route(NodeKind::Project, format!("{}datasets/", api))
            .route(NodeKind::Dataset, format!("{}images/", api))
            .route(NodeKind::Screen, format!("{}plates/", api))
            .route(NodeKind::Plate, format!("{}images/", api))
            .with_autocomplete(format!(
                "{}api/autocomplete/{}/",
                prefix(mapr_index.as_ref()),
                menu
            ))
    }

    /// Adds or replaces the route for one kind.
    pub fn route(mut self, kind: NodeKind, path: impl Into<String>) -> Self {
        self.children.insert(kind, path.into());
        self
    }

    /// Adds a fixed query parameter to every request for `kind`.
    ///
    /// The mapr value listing returns annotation values only with
    /// `orphaned=true`; without it the same endpoint lists screens and projects.
    pub fn with_param(mut self, kind: NodeKind, key: impl Into<String>, value: impl ToString) -> Self {
        self.params
            .entry(kind)
            .or_default()
            .push((key.into(), value.to_string()));
        self
    }

    /// Fixed query parameters for `kind`.
    pub fn params(&self, kind: NodeKind) -> &[(String, String)] {
        self.params.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sets the autocomplete search endpoint.
    pub fn with_autocomplete(mut self, path: impl Into<String>) -> Self {
        self.autocomplete = Some(path.into());
        self
    }

    /// Endpoint listing the children of `kind`.
    pub fn children(&self, kind: NodeKind) -> Option<&str> {
        self.children.get(&kind).map(String::as_str)
    }

    /// Endpoint for a single experimenter, the first level below the root.
    pub fn experimenter(&self, id: &ObjectId) -> String {
        format!("{}api/experimenters/{}/", self.webindex, id)
    }

    /// Autocomplete endpoint, if the layout has one.
    pub fn autocomplete(&self) -> Option<&str> {
        self.autocomplete.as_deref()
    }
}

/// Normalizes an index prefix to `segment/` with no leading slash.
fn prefix(raw: &str) -> String {
    let trimmed = raw.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}/", trimmed)
    }
}
