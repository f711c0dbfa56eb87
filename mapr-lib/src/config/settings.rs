//! Tree settings

use std::fmt;
use std::str::FromStr;

use super::MenuRegistry;
use crate::api::FilterHandle;
use crate::api::JsonSource;
use crate::api::Loader;
use crate::api::Routes;
use crate::api::SearchScope;
use crate::error::ConfigError;
use crate::model::KindRegistry;
use crate::tree::Comparator;

/// Which tree is browsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Layout {
    /// Projects, datasets, screens and plates per user.
    #[default]
    Containers,
    /// Map annotation values, then the screens and projects carrying them.
    MapAnnotations,
    /// One annotation menu of the mapr app, e.g. genes.
    Mapr,
}

impl Layout {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Containers => "containers",
            Self::MapAnnotations => "mapannotations",
            Self::Mapr => "mapr",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "containers" => Ok(Self::Containers),
            "mapannotations" => Ok(Self::MapAnnotations),
            "mapr" => Ok(Self::Mapr),
            other => Err(format!("unknown layout '{}'", other)),
        }
    }
}

/// Everything needed to assemble a tree for one page.
///
/// # Example
///
/// ```
/// use mapr_lib::config::{Layout, TreeSettings};
///
/// let settings = TreeSettings::default()
///     .with_layout(Layout::Mapr)
///     .with_menu("gene")
///     .with_active_user(52);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSettings {
    pub layout: Layout,
    /// Menu key for the [`Layout::Mapr`] layout.
    pub menu: Option<String>,
    /// Mount point of the webclient app.
    ///
    /// Default: `webclient`
    pub webclient_prefix: String,
    /// Mount point of the mapr app.
    ///
    /// Default: `mapr`
    pub mapr_prefix: String,
    /// Mount point of the map annotations app.
    ///
    /// Default: `mapannotations`
    pub mapannotations_prefix: String,
    /// Label of the aggregate node; the menu label is used when unset.
    pub aggregate_label: Option<String>,
    /// Logged-in user, pinned to the top of the experimenter list.
    pub active_user: Option<i64>,
    /// Experimenter shown under the root; `None` shows all users.
    pub experimenter: Option<i64>,
    /// Active group; `-1` for all groups.
    pub group: i64,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            menu: None,
            webclient_prefix: "webclient".to_string(),
            mapr_prefix: "mapr".to_string(),
            mapannotations_prefix: "mapannotations".to_string(),
            aggregate_label: None,
            active_user: None,
            experimenter: None,
            group: -1,
        }
    }
}

impl TreeSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_menu(mut self, menu: impl Into<String>) -> Self {
        self.menu = Some(menu.into());
        self
    }

    pub fn with_webclient_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.webclient_prefix = prefix.into();
        self
    }

    pub fn with_mapr_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.mapr_prefix = prefix.into();
        self
    }

    pub fn with_aggregate_label(mut self, label: impl Into<String>) -> Self {
        self.aggregate_label = Some(label.into());
        self
    }

    pub fn with_active_user(mut self, id: i64) -> Self {
        self.active_user = Some(id);
        self
    }

    pub fn with_experimenter(mut self, id: Option<i64>) -> Self {
        self.experimenter = id;
        self
    }

    pub fn with_group(mut self, group: i64) -> Self {
        self.group = group;
        self
    }

    fn menu_key<'m>(&self, menus: &'m MenuRegistry) -> Result<Option<&'m str>, ConfigError> {
        match (self.layout, self.menu.as_deref()) {
            (Layout::Mapr, None) => Err(ConfigError::UnknownMenu(String::new())),
            (Layout::Mapr, Some(menu)) => menus.get(menu).map(|m| Some(m.menu.as_str())),
            _ => Ok(None),
        }
    }

    /// Endpoint table for the layout.
    pub fn routes(&self, menus: &MenuRegistry) -> Result<Routes, ConfigError> {
        Ok(match self.layout {
            Layout::Containers => Routes::containers(&self.webclient_prefix),
            Layout::MapAnnotations => {
                Routes::mapannotations(&self.webclient_prefix, &self.mapannotations_prefix)
            }
            Layout::Mapr => {
                let menu = self.menu_key(menus)?.unwrap_or_default();
                Routes::mapr(&self.webclient_prefix, &self.mapr_prefix, menu)
            }
        })
    }

    /// Node kinds for the layout.
    pub fn registry(&self) -> KindRegistry {
        match self.layout {
            Layout::Containers => KindRegistry::containers(),
            Layout::MapAnnotations => KindRegistry::mapannotations(),
            Layout::Mapr => {
                KindRegistry::mapannotations().with_menu_icon(self.menu.as_deref().unwrap_or(""))
            }
        }
    }

    pub fn comparator(&self) -> Comparator {
        match self.active_user {
            Some(id) => Comparator::new().with_active_user(id),
            None => Comparator::new(),
        }
    }

    pub fn search_scope(&self, case_sensitive: bool) -> SearchScope {
        SearchScope {
            case_sensitive,
            experimenter_id: self.experimenter.unwrap_or(-1),
            group: self.group,
        }
    }

    /// A loader for this layout reading `filter`.
    pub fn loader<S: JsonSource>(
        &self,
        source: S,
        filter: FilterHandle,
        menus: &MenuRegistry,
    ) -> Result<Loader<S>, ConfigError> {
        let mut loader = Loader::new(source, self.routes(menus)?)
            .with_filter(filter)
            .with_experimenter(self.experimenter);

        let label = match (&self.aggregate_label, self.menu_key(menus)?) {
            (Some(label), _) => Some(label.clone()),
            (None, Some(menu)) => menus.get(menu).ok().map(|m| format!("{}s", m.label())),
            (None, None) => None,
        };
        if let Some(label) = label {
            loader = loader.with_aggregate_label(label);
        }
        Ok(loader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeKind;

    #[test]
    fn test_layout_names() {
        for layout in [Layout::Containers, Layout::MapAnnotations, Layout::Mapr] {
            assert_eq!(layout.as_str().parse::<Layout>(), Ok(layout));
        }
        assert!("tags".parse::<Layout>().is_err());
    }

    #[test]
    fn test_mapr_needs_known_menu() {
        let menus = MenuRegistry::default();
        let settings = TreeSettings::new().with_layout(Layout::Mapr);
        assert!(matches!(settings.routes(&menus), Err(ConfigError::UnknownMenu(_))));

        let routes = settings.with_menu("gene").routes(&menus).unwrap();
        assert_eq!(routes.children(NodeKind::Screen), Some("mapr/api/gene/plates/"));
        assert_eq!(routes.autocomplete(), Some("mapr/api/autocomplete/gene/"));
    }

    #[test]
    fn test_registry_uses_menu_icon() {
        let registry = TreeSettings::new()
            .with_layout(Layout::Mapr)
            .with_menu("phenotype")
            .registry();
        assert_eq!(
            registry.icon(NodeKind::MapAnnotation),
            Some("image/phenotype_icon_16x16.png")
        );
    }

    #[test]
    fn test_search_scope() {
        let scope = TreeSettings::new().with_group(3).search_scope(true);
        assert_eq!(scope.experimenter_id, -1);
        assert_eq!(scope.group, 3);
        assert!(scope.case_sensitive);
    }
}
