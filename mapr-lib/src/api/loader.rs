//! Lazy loading of a node's children

use log::debug;
use log::warn;

use super::ApiRequest;
use super::FilterHandle;
use super::JsonSource;
use super::Routes;
use super::decode::decode_children;
use crate::error::Error;
use crate::model::NodeKind;
use crate::model::ObjectId;
use crate::model::Payload;
use crate::model::TreeNode;

/// Label of the aggregate node shown when no experimenter is selected.
pub const DEFAULT_AGGREGATE_LABEL: &str = "Genes";

/// What loading a node amounts to.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadPlan {
    /// Fetch children from the backend.
    Fetch(ApiRequest),
    /// No request: the "all users" root yields one synthesized node.
    Aggregate(TreeNode),
    /// The kind has no endpoint; the node is not expanded.
    Skip,
}

/// Resolves, fetches and decodes the children of an expanding node.
///
/// The loader reads the active filter from a [`FilterHandle`] on every
/// request and never writes to it.
///
/// # Example
///
/// ```ignore
/// let loader = Loader::new(client, Routes::containers("webclient"))
///     .with_experimenter(Some(52));
///
/// let children = loader.load(&TreeNode::root()).await;
/// ```
#[derive(Debug, Clone)]
pub struct Loader<S> {
    source: S,
    routes: Routes,
    filter: FilterHandle,
    experimenter: Option<ObjectId>,
    aggregate_label: String,
}

impl<S: JsonSource> Loader<S> {
    pub fn new(source: S, routes: Routes) -> Self {
        Self {
            source,
            routes,
            filter: FilterHandle::new(),
            experimenter: None,
            aggregate_label: DEFAULT_AGGREGATE_LABEL.to_string(),
        }
    }

    /// Shares a filter handle, typically with the autocomplete box.
    pub fn with_filter(mut self, filter: FilterHandle) -> Self {
        self.filter = filter;
        self
    }

    /// Selects the experimenter shown under the root. `None` or `-1` means all users.
    pub fn with_experimenter(mut self, id: Option<i64>) -> Self {
        self.experimenter = id.filter(|id| *id != -1).map(ObjectId::Int);
        self
    }

    pub fn with_aggregate_label(mut self, label: impl Into<String>) -> Self {
        self.aggregate_label = label.into();
        self
    }

    pub fn filter(&self) -> &FilterHandle {
        &self.filter
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Decides how `node` is loaded. Depends only on the node's kind, its
    /// backend id and the active filter.
    pub fn plan(&self, node: &TreeNode) -> LoadPlan {
        let mut request = match node.kind {
            NodeKind::Root => match &self.experimenter {
                Some(id) => ApiRequest::new(self.routes.experimenter(id)),
                None => return LoadPlan::Aggregate(self.aggregate_node()),
            },
            kind => match self.routes.children(kind) {
                Some(path) => ApiRequest::new(path),
                None => return LoadPlan::Skip,
            },
        };

        for (key, value) in self.routes.params(node.kind) {
            request.set_param(key, value);
        }

        if node.kind != NodeKind::Experimenter
            && let Some(id) = node.backend_id()
        {
            request.set_param("id", id);
        }

        if let Some(filter) = self.filter.get() {
            filter.apply(&mut request);
        }

        LoadPlan::Fetch(request)
    }

    /// The request that loading `node` would issue, if any.
    pub fn request(&self, node: &TreeNode) -> Option<ApiRequest> {
        match self.plan(node) {
            LoadPlan::Fetch(request) => Some(request),
            _ => None,
        }
    }

    /// Loads children, reporting failures.
    pub async fn try_load(&self, node: &TreeNode) -> Result<Vec<TreeNode>, Error> {
        match self.plan(node) {
            LoadPlan::Aggregate(aggregate) => Ok(vec![aggregate]),
            LoadPlan::Skip => Err(Error::NoRoute(node.kind.wire_name())),
            LoadPlan::Fetch(request) => {
                let body = self.source.get_json(&request).await?;
                let children = decode_children(&body)?;
                debug!(
                    "Loaded {} children for {} from {}",
                    children.len(),
                    node.qualified_id(),
                    request.path
                );
                Ok(children)
            }
        }
    }

    /// Loads children; any failure yields an empty list.
    pub async fn load(&self, node: &TreeNode) -> Vec<TreeNode> {
        match self.try_load(node).await {
            Ok(children) => children,
            Err(Error::NoRoute(kind)) => {
                debug!("Nothing to load for {} node", kind);
                Vec::new()
            }
            Err(e) => {
                report_failure(node, &e);
                Vec::new()
            }
        }
    }

    fn aggregate_node(&self) -> TreeNode {
        TreeNode::new(ObjectId::AGGREGATE, NodeKind::Experimenter, &self.aggregate_label)
            .with_payload(Payload::with_id(ObjectId::AGGREGATE))
            .with_children(true)
            .opened()
    }
}

/// Logs a failed child load of `node` at warn level.
pub(crate) fn report_failure(node: &TreeNode, e: &Error) {
    match e.status_code() {
        Some(status) => warn!(
            "Server answered {} for children of {}: {}",
            status,
            node.qualified_id(),
            e
        ),
        None if e.is_network() => warn!(
            "Server unreachable for children of {}: {}",
            node.qualified_id(),
            e
        ),
        None => warn!("Failed to load children of {}: {}", node.qualified_id(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Filter;
    use crate::model::Payload;

    struct NoSource;

    #[async_trait::async_trait]
    impl JsonSource for NoSource {
        async fn get_json(&self, _request: &ApiRequest) -> Result<serde_json::Value, Error> {
            Err(Error::Session("offline".to_string()))
        }
    }

    fn loader() -> Loader<NoSource> {
        Loader::new(NoSource, Routes::containers("webclient"))
    }

    fn node(id: i64, kind: NodeKind) -> TreeNode {
        TreeNode::new(id, kind, "n").with_payload(Payload::with_id(id))
    }

    #[test]
    fn test_plan_sends_backend_id() {
        let request = loader().request(&node(7, NodeKind::Project)).unwrap();
        assert_eq!(request.path, "webclient/api/datasets/");
        assert_eq!(request.get("id"), Some("7"));
    }

    #[test]
    fn test_experimenter_does_not_send_id() {
        let request = loader().request(&node(3, NodeKind::Experimenter)).unwrap();
        assert_eq!(request.path, "webclient/api/containers/");
        assert_eq!(request.get("id"), None);
    }

    #[test]
    fn test_leaf_kinds_skip() {
        assert_eq!(loader().plan(&node(1, NodeKind::Image)), LoadPlan::Skip);
    }

    #[test]
    fn test_root_with_experimenter() {
        let loader = loader().with_experimenter(Some(52));
        let request = loader.request(&TreeNode::root()).unwrap();
        assert_eq!(request.path, "webclient/api/experimenters/52/");
        assert!(request.query.is_empty());
    }

    #[test]
    fn test_root_all_users_is_aggregate() {
        let loader = loader().with_experimenter(Some(-1));
        match loader.plan(&TreeNode::root()) {
            LoadPlan::Aggregate(node) => {
                assert_eq!(node.label, DEFAULT_AGGREGATE_LABEL);
                assert_eq!(node.kind, NodeKind::Experimenter);
                assert!(node.has_children && node.opened);
            }
            other => panic!("expected aggregate, got {:?}", other),
        }
    }

    #[test]
    fn test_filter_is_merged() {
        let filter = FilterHandle::with_filter(Filter::new("CDC20", false));
        let loader = loader().with_filter(filter);
        let request = loader.request(&node(4, NodeKind::Screen)).unwrap();
        assert_eq!(request.get("id"), Some("4"));
        assert_eq!(request.get("value"), Some("CDC20"));
        assert_eq!(request.get("case_sensitive"), Some("false"));
    }

    #[test]
    fn test_mapr_value_listing_sends_orphaned() {
        let loader = Loader::new(NoSource, Routes::mapr("webclient", "mapr", "gene"))
            .with_filter(FilterHandle::with_filter(Filter::new("CDC20", false)));

        let values = loader.request(&node(-1, NodeKind::Experimenter)).unwrap();
        assert_eq!(values.path, "mapr/api/gene/");
        assert_eq!(values.get("orphaned"), Some("true"));
        assert_eq!(values.get("id"), None);
        assert_eq!(values.get("value"), Some("CDC20"));

        let value = TreeNode::new("CDC20", NodeKind::MapAnnotation, "CDC20")
            .with_payload(Payload::with_id("CDC20"));
        let containers = loader.request(&value).unwrap();
        assert_eq!(containers.path, "mapr/api/gene/");
        assert_eq!(containers.get("id"), Some("CDC20"));
        assert_eq!(containers.get("orphaned"), None);
    }

    #[tokio::test]
    async fn test_failure_degrades_to_empty() {
        assert!(loader().load(&node(7, NodeKind::Project)).await.is_empty());
        assert!(matches!(
            loader().try_load(&node(7, NodeKind::Project)).await,
            Err(Error::Session(_))
        ));
    }
}
