//! Annotation menus

use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ConfigError;

/// One browsable annotation menu, e.g. `gene`.
///
/// Matches one entry of the server's `omeroweb.mapr.config` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuConfig {
    /// URL segment and key, e.g. `gene`.
    pub menu: String,
    pub config: MenuSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuSettings {
    /// Map keys searched by default.
    #[serde(default)]
    pub default: Vec<String>,
    /// Every map key belonging to the menu.
    #[serde(default)]
    pub all: Vec<String>,
    /// Annotation namespaces.
    #[serde(default)]
    pub ns: Vec<String>,
    /// Display label, e.g. `Gene`.
    pub label: String,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub wildcard: Wildcard,
}

/// Wildcard search support for a menu.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wildcard {
    #[serde(default)]
    pub enabled: bool,
    /// Minimum term length before a wildcard search is allowed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl MenuConfig {
    fn stock(menu: &str, label: &str, keys: &[&str], all: &[&str], ns: &str) -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            menu: menu.to_string(),
            config: MenuSettings {
                default: owned(keys),
                all: owned(all),
                ns: vec![ns.to_string()],
                label: label.to_string(),
                ..Default::default()
            },
        }
    }

    pub fn label(&self) -> &str {
        &self.config.label
    }
}

/// Ordered set of menus.
///
/// # Example
///
/// ```
/// use mapr_lib::config::MenuRegistry;
///
/// let menus = MenuRegistry::default();
/// assert_eq!(menus.get("gene").unwrap().label(), "Gene");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuRegistry {
    menus: Vec<MenuConfig>,
}

impl Default for MenuRegistry {
    fn default() -> Self {
        let menu = MenuConfig::stock;
        Self {
            menus: vec![
                menu(
                    "gene",
                    "Gene",
                    &["Gene Symbol"],
                    &["Gene Symbol", "Gene Identifier"],
                    "openmicroscopy.org/mapr/gene",
                ),
                menu(
                    "genesupplementary",
                    "Gene supplementary",
                    &[],
                    &[],
                    "openmicroscopy.org/mapr/gene/supplementary",
                ),
                menu(
                    "sirna",
                    "siRNA",
                    &["siRNA Identifier"],
                    &["siRNA Identifier", "siRNA Pool Identifier"],
                    "openmicroscopy.org/mapr/sirna",
                ),
                menu(
                    "sirnasupplementary",
                    "siRNA supplementary",
                    &[],
                    &[],
                    "openmicroscopy.org/mapr/sirna/supplementary",
                ),
                menu(
                    "phenotype",
                    "Phenotype",
                    &["Phenotype"],
                    &["Phenotype", "Phenotype Term Accession"],
                    "openmicroscopy.org/mapr/phenotype",
                ),
                menu(
                    "compound",
                    "Compound",
                    &["Compound Name"],
                    &["Compound Name"],
                    "openmicroscopy.org/mapr/compound",
                ),
                menu(
                    "compoundsupplementary",
                    "Compound supplementary",
                    &[],
                    &[],
                    "openmicroscopy.org/mapr/compound/supplementary",
                ),
                menu(
                    "organism",
                    "Organism",
                    &["Organism"],
                    &["Organism"],
                    "openmicroscopy.org/mapr/organism",
                ),
                menu(
                    "others",
                    "Others",
                    &["Others"],
                    &["Others"],
                    "openmicroscopy.org/omero/bulk_annotations",
                ),
            ],
        }
    }
}

impl MenuRegistry {
    pub fn new(menus: Vec<MenuConfig>) -> Self {
        Self { menus }
    }

    /// Parses the JSON list form of the menu configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Looks a menu up by its key.
    pub fn get(&self, menu: &str) -> Result<&MenuConfig, ConfigError> {
        self.menus
            .iter()
            .find(|m| m.menu == menu)
            .ok_or_else(|| ConfigError::UnknownMenu(menu.to_string()))
    }

    pub fn menus(&self) -> &[MenuConfig] {
        &self.menus
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.menus.iter().map(|m| m.menu.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_menus() {
        let menus = MenuRegistry::default();
        let names: Vec<&str> = menus.names().collect();
        assert_eq!(names.len(), 9);
        assert_eq!(names[0], "gene");
        assert_eq!(names[8], "others");
        assert_eq!(menus.get("sirna").unwrap().config.default, vec!["siRNA Identifier"]);
    }

    #[test]
    fn test_unknown_menu() {
        assert!(matches!(
            MenuRegistry::default().get("antibody"),
            Err(ConfigError::UnknownMenu(m)) if m == "antibody"
        ));
    }

    #[test]
    fn test_from_json_with_wildcard() {
        let menus = MenuRegistry::from_json(
            r#"[{"menu": "antibody", "config": {
                "all": ["Antibody Name"], "ns": ["openmicroscopy.org/mapr/antibody"],
                "label": "Antibody", "case_sensitive": true,
                "wildcard": {"enabled": true, "limit": 3}
            }}]"#,
        )
        .unwrap();
        let antibody = menus.get("antibody").unwrap();
        assert!(antibody.config.default.is_empty());
        assert!(antibody.config.case_sensitive);
        assert_eq!(antibody.config.wildcard.limit, Some(3));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            MenuRegistry::from_file("/nonexistent/mapr.json"),
            Err(ConfigError::Io { .. })
        ));
    }
}
