//! Debounced search box driving the tree filter

use std::time::Duration;

use log::debug;
use log::info;
use tokio::time::Instant;

use crate::api::Filter;
use crate::api::FilterHandle;
use crate::api::JsonSource;
use crate::api::Search;
use crate::api::Suggestion;
use crate::tree::Tree;

/// Debounce and length settings for [`Autocomplete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before a search is sent.
    pub delay: Duration,
    /// Minimum number of characters that triggers a search.
    pub min_length: usize,
    pub case_sensitive: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(1),
            min_length: 1,
            case_sensitive: false,
        }
    }
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }
}

/// Whatever shows the contents of the selected node, cleared when a new
/// filter is applied.
pub trait PreviewPanel {
    fn clear(&mut self);
}

impl PreviewPanel for () {
    fn clear(&mut self) {}
}

/// Search box state: current text, pending search and last suggestions.
///
/// Selecting a suggestion writes the shared [`FilterHandle`] the tree's
/// loader reads from, then reloads the tree.
///
/// # Example
///
/// ```ignore
/// let mut search_box = Autocomplete::new(Search::new(client, path), filter.clone());
/// search_box.input("cdc");
/// let suggestions = search_box.poll().await.unwrap_or_default();
/// search_box.select(&suggestions[0], &mut tree, &mut ()).await;
/// ```
#[derive(Debug)]
pub struct Autocomplete<S> {
    search: Search<S>,
    filter: FilterHandle,
    config: SearchConfig,
    text: String,
    deadline: Option<Instant>,
    suggestions: Vec<Suggestion>,
}

impl<S: JsonSource> Autocomplete<S> {
    pub fn new(search: Search<S>, filter: FilterHandle) -> Self {
        Self {
            search,
            filter,
            config: SearchConfig::default(),
            text: String::new(),
            deadline: None,
            suggestions: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.search.set_case_sensitive(config.case_sensitive);
        self.config = config;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn filter(&self) -> &FilterHandle {
        &self.filter
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// `true` while a search is waiting for its deadline.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn set_case_sensitive(&mut self, case_sensitive: bool) {
        self.config.case_sensitive = case_sensitive;
        self.search.set_case_sensitive(case_sensitive);
    }

    /// Replaces the text and restarts the debounce timer.
    pub fn input(&mut self, text: impl Into<String>) {
        self.text = text.into();
        if self.text.chars().count() >= self.config.min_length {
            self.deadline = Some(Instant::now() + self.config.delay);
        } else {
            self.deadline = None;
            self.suggestions.clear();
        }
    }

    /// Clears the text and any pending search.
    pub fn close(&mut self) {
        self.text.clear();
        self.deadline = None;
        self.suggestions.clear();
    }

    /// Waits for the pending deadline and runs the search.
    ///
    /// Returns `None` if nothing is pending. Cancel safe: dropping the
    /// future keeps the search pending.
    pub async fn poll(&mut self) -> Option<&[Suggestion]> {
        let deadline = self.deadline?;
        tokio::time::sleep_until(deadline).await;

        debug!("Searching for '{}'", self.text);
        let suggestions = self.search.search(&self.text).await;
        self.suggestions = suggestions;
        self.deadline = None;
        Some(&self.suggestions)
    }

    /// Applies a suggestion as the tree filter.
    ///
    /// Sentinels are ignored and return `false`. Otherwise the text is
    /// cleared, the tree is deselected and collapsed, the preview emptied,
    /// and the tree reloaded from the root under the new filter.
    pub async fn select<T: JsonSource>(
        &mut self,
        item: &Suggestion,
        tree: &mut Tree<T>,
        preview: &mut impl PreviewPanel,
    ) -> bool {
        let Some(term) = item.term() else {
            return false;
        };

        let filter = Filter::new(term, self.config.case_sensitive);
        self.close();
        tree.deselect_all();
        tree.close_all();
        preview.clear();

        let generation = self.filter.set(filter);
        info!("Filtering tree by '{}' (generation {})", term, generation);
        tree.refresh().await;
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::api::Loader;
    use crate::api::Routes;
    use crate::api::fixture::FixtureSource;
    use crate::api::NO_RESULTS_LABEL;
    use crate::model::KindRegistry;
    use crate::model::NodeKind;
    use crate::model::NodePath;
    use crate::tree::Comparator;

    const AUTOCOMPLETE: &str = "mapr/api/autocomplete/gene/";

    fn source() -> Arc<FixtureSource> {
        Arc::new(
            FixtureSource::new()
                .with(
                    AUTOCOMPLETE,
                    json!([{"label": "CDC20", "value": "CDC20"}, {"label": "CDC42", "value": "CDC42"}]),
                )
                .with_param(
                    "mapr/api/gene/",
                    ("orphaned", "true"),
                    json!({"maps": [{"id": "CDC20", "name": "CDC20", "childCount": 1}]}),
                )
                .with(
                    "mapr/api/gene/",
                    json!({"maps": [], "screens": [{"id": 42, "name": "s", "childCount": 1}]}),
                ),
        )
    }

    fn search_box(source: Arc<FixtureSource>, filter: FilterHandle) -> Autocomplete<Arc<FixtureSource>> {
        Autocomplete::new(Search::new(source, AUTOCOMPLETE), filter)
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_rearms_on_input() {
        let source = source();
        let mut search_box = search_box(source.clone(), FilterHandle::new());

        search_box.input("c");
        tokio::time::advance(Duration::from_millis(600)).await;
        search_box.input("cd");

        let start = Instant::now();
        let suggestions = search_box.poll().await.unwrap();
        assert_eq!(suggestions.len(), 2);
        assert!(start.elapsed() >= Duration::from_millis(1000));

        let requests = source.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].get("value"), Some("cd"));
        assert!(!search_box.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_input_disarms() {
        let mut search_box =
            search_box(source(), FilterHandle::new()).with_config(SearchConfig::new().with_min_length(3));
        search_box.input("cd");
        assert!(!search_box.is_pending());
        assert!(search_box.poll().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_result_is_sentinel() {
        let source = Arc::new(FixtureSource::new().with(AUTOCOMPLETE, json!([])));
        let mut search_box = search_box(source, FilterHandle::new());
        search_box.input("zzz");
        let suggestions = search_box.poll().await.unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].label, NO_RESULTS_LABEL);
        assert!(!suggestions[0].is_selectable());
    }

    #[derive(Default)]
    struct Preview {
        cleared: bool,
    }

    impl PreviewPanel for Preview {
        fn clear(&mut self) {
            self.cleared = true;
        }
    }

    #[tokio::test]
    async fn test_select_applies_filter_and_reloads() {
        let source = source();
        let filter = FilterHandle::new();
        let loader = Loader::new(source.clone(), Routes::mapr("webclient", "mapr", "gene"))
            .with_filter(filter.clone());
        let mut tree = Tree::new(
            loader,
            Comparator::new(),
            KindRegistry::mapannotations().with_menu_icon("gene"),
        );
        tree.load_root().await;
        tree.select(&NodePath::from_indices([0]));

        let mut search_box = search_box(source.clone(), filter.clone());
        search_box.input("cdc");
        let mut preview = Preview::default();

        assert!(!search_box.select(&Suggestion::no_results(), &mut tree, &mut preview).await);
        assert!(filter.get().is_none());

        let item = Suggestion::new("CDC20", "CDC20");
        assert!(search_box.select(&item, &mut tree, &mut preview).await);
        assert_eq!(filter.get(), Some(Filter::new("CDC20", false)));
        assert!(preview.cleared);
        assert_eq!(search_box.text(), "");
        assert_eq!(tree.selected(), None);

        let genes = &tree.roots()[0];
        assert_eq!(genes.label, "Genes");
        assert_eq!(genes.children.len(), 1);
        assert_eq!(genes.children[0].kind, NodeKind::MapAnnotation);
        let last = source.requests().pop().unwrap();
        assert_eq!(last.path, "mapr/api/gene/");
        assert_eq!(last.get("value"), Some("CDC20"));
        assert_eq!(last.get("orphaned"), Some("true"));
    }
}
