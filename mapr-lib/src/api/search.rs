//! Annotation value search for the autocomplete box

use log::debug;
use log::warn;
use serde::Deserialize;
use serde::Deserializer;
use serde_json::Value;

use super::ApiRequest;
use super::JsonSource;
use crate::error::ApiError;
use crate::error::Error;

/// Label of the sentinel shown when a search finds nothing.
pub const NO_RESULTS_LABEL: &str = "No results found.";

/// Label of the sentinel shown when a search fails.
pub const ERROR_LABEL: &str = "Error occurred.";

/// The value half of a suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionValue {
    /// An annotation value that can be applied as a filter.
    Term(String),
    /// The `-1` placeholder; never selectable.
    Sentinel,
}

impl<'de> Deserialize<'de> for SuggestionValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) if n.as_i64() == Some(-1) => Self::Sentinel,
            Value::String(s) if s == "-1" => Self::Sentinel,
            Value::String(s) => Self::Term(s),
            Value::Number(n) => Self::Term(n.to_string()),
            Value::Null => Self::Sentinel,
            other => Self::Term(other.to_string()),
        })
    }
}

/// One entry of the suggestion list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Suggestion {
    pub label: String,
    pub value: SuggestionValue,
}

impl Suggestion {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: SuggestionValue::Term(value.into()),
        }
    }

    pub fn no_results() -> Self {
        Self {
            label: NO_RESULTS_LABEL.to_string(),
            value: SuggestionValue::Sentinel,
        }
    }

    pub fn error() -> Self {
        Self {
            label: ERROR_LABEL.to_string(),
            value: SuggestionValue::Sentinel,
        }
    }

    pub fn is_selectable(&self) -> bool {
        matches!(self.value, SuggestionValue::Term(_))
    }

    /// The filter value, unless this is a sentinel.
    pub fn term(&self) -> Option<&str> {
        match &self.value {
            SuggestionValue::Term(term) => Some(term),
            SuggestionValue::Sentinel => None,
        }
    }
}

/// Parameters sent alongside every search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchScope {
    pub case_sensitive: bool,
    /// Active user; `-1` searches across all users.
    pub experimenter_id: i64,
    /// Active group; `-1` searches across all groups.
    pub group: i64,
}

impl Default for SearchScope {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            experimenter_id: -1,
            group: -1,
        }
    }
}

/// Queries the autocomplete endpoint.
#[derive(Debug, Clone)]
pub struct Search<S> {
    source: S,
    path: String,
    scope: SearchScope,
}

impl<S: JsonSource> Search<S> {
    pub fn new(source: S, path: impl Into<String>) -> Self {
        Self {
            source,
            path: path.into(),
            scope: SearchScope::default(),
        }
    }

    pub fn with_scope(mut self, scope: SearchScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn scope(&self) -> &SearchScope {
        &self.scope
    }

    pub fn set_case_sensitive(&mut self, case_sensitive: bool) {
        self.scope.case_sensitive = case_sensitive;
    }

    /// Builds the request for `term`; the term is lowercased unless the
    /// search is case-sensitive.
    pub fn request(&self, term: &str) -> ApiRequest {
        let value = if self.scope.case_sensitive {
            term.to_string()
        } else {
            term.to_lowercase()
        };
        ApiRequest::new(&self.path)
            .param("value", value)
            .param("query", true)
            .param("case_sensitive", self.scope.case_sensitive)
            .param("experimenter_id", self.scope.experimenter_id)
            .param("group", self.scope.group)
    }

    /// Searches and returns the raw suggestion list.
    pub async fn try_search(&self, term: &str) -> Result<Vec<Suggestion>, Error> {
        let body = self.source.get_json(&self.request(term)).await?;
        serde_json::from_value(body)
            .map_err(|e| ApiError::parse(format!("autocomplete response: {}", e)).into())
    }

    /// Searches and returns a displayable list: an empty result becomes the
    /// "no results" sentinel, a failure the "error" sentinel.
    pub async fn search(&self, term: &str) -> Vec<Suggestion> {
        match self.try_search(term).await {
            Ok(items) if items.is_empty() => {
                debug!("No suggestions for '{}'", term);
                vec![Suggestion::no_results()]
            }
            Ok(items) => items,
            Err(e) => {
                warn!("Autocomplete search for '{}' failed: {}", term, e);
                vec![Suggestion::error()]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::fixture::FixtureSource;

    #[test]
    fn test_sentinel_values() {
        let items: Vec<Suggestion> = serde_json::from_value(json!([
            {"label": "CDC20", "value": "CDC20"},
            {"label": "none", "value": -1},
            {"label": "none", "value": "-1"},
            {"label": "id", "value": 12}
        ]))
        .unwrap();
        assert!(items[0].is_selectable());
        assert!(!items[1].is_selectable());
        assert!(!items[2].is_selectable());
        assert_eq!(items[3].term(), Some("12"));
    }

    #[test]
    fn test_request_lowercases_term() {
        struct Unused;

        #[async_trait::async_trait]
        impl JsonSource for Unused {
            async fn get_json(&self, _request: &ApiRequest) -> Result<Value, Error> {
                unreachable!()
            }
        }

        let search = Search::new(Unused, "mapr/api/autocomplete/gene/").with_scope(SearchScope {
            case_sensitive: false,
            experimenter_id: 4,
            group: 3,
        });
        let request = search.request("CDC");
        assert_eq!(request.get("value"), Some("cdc"));
        assert_eq!(request.get("query"), Some("true"));
        assert_eq!(request.get("experimenter_id"), Some("4"));
        assert_eq!(request.get("group"), Some("3"));

        let mut search = search;
        search.set_case_sensitive(true);
        assert_eq!(search.request("CDC").get("value"), Some("CDC"));
    }

    #[tokio::test]
    async fn test_failed_request_is_error_sentinel() {
        let search = Search::new(FixtureSource::new(), "mapr/api/autocomplete/gene/");
        let suggestions = search.search("cdc").await;
        assert_eq!(suggestions, vec![Suggestion::error()]);
        assert_eq!(suggestions[0].label, ERROR_LABEL);
        assert_eq!(suggestions[0].term(), None);
    }
}
