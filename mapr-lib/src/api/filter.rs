//! Active search filter shared between the search box and the loader

use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;

use log::warn;

use super::ApiRequest;

/// A selected annotation value narrowing which children are requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub value: String,
    pub case_sensitive: bool,
}

impl Filter {
    pub fn new(value: impl Into<String>, case_sensitive: bool) -> Self {
        Self {
            value: value.into(),
            case_sensitive,
        }
    }

    /// Adds `value` and `case_sensitive` to a request.
    pub fn apply(&self, request: &mut ApiRequest) {
        request.set_param("value", &self.value);
        request.set_param("case_sensitive", self.case_sensitive);
    }
}

#[derive(Debug, Default)]
struct FilterState {
    active: Option<Filter>,
    generation: u64,
}

/// Shared, mutable filter state read by a stable loader.
///
/// Every change bumps a generation counter so a load started under an
/// older filter can be recognised when it completes.
#[derive(Debug, Clone, Default)]
pub struct FilterHandle {
    inner: Arc<RwLock<FilterState>>,
}

impl FilterHandle {
    /// Creates a handle with no active filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a handle with an initial filter, e.g. from the page's `value` parameter.
    pub fn with_filter(filter: Filter) -> Self {
        Self {
            inner: Arc::new(RwLock::new(FilterState {
                active: Some(filter),
                generation: 0,
            })),
        }
    }

    /// The active filter, if any.
    pub fn get(&self) -> Option<Filter> {
        self.read().active.clone()
    }

    /// Current generation.
    pub fn generation(&self) -> u64 {
        self.read().generation
    }

    /// The active filter together with the generation it belongs to.
    pub fn snapshot(&self) -> (Option<Filter>, u64) {
        let state = self.read();
        (state.active.clone(), state.generation)
    }

    /// Replaces the active filter and returns the new generation.
    pub fn set(&self, filter: Filter) -> u64 {
        self.replace(Some(filter))
    }

    /// Clears the filter and returns the new generation.
    pub fn clear(&self) -> u64 {
        self.replace(None)
    }

    fn replace(&self, filter: Option<Filter>) -> u64 {
        let mut state = self.write();
        state.active = filter;
        state.generation += 1;
        state.generation
    }

    // The state is two plain fields, so a writer that panicked cannot leave
    // it half-updated.
    fn read(&self) -> RwLockReadGuard<'_, FilterState> {
        self.inner.read().unwrap_or_else(|poisoned| {
            warn!("Filter lock poisoned, recovering");
            PoisonError::into_inner(poisoned)
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, FilterState> {
        self.inner.write().unwrap_or_else(|poisoned| {
            warn!("Filter lock poisoned, recovering");
            PoisonError::into_inner(poisoned)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let handle = FilterHandle::new();
        let other = handle.clone();
        assert_eq!(handle.get(), None);

        let generation = other.set(Filter::new("CDC20", false));
        assert_eq!(generation, 1);
        assert_eq!(handle.get(), Some(Filter::new("CDC20", false)));
        assert_eq!(handle.generation(), 1);

        handle.clear();
        assert_eq!(other.snapshot(), (None, 2));
    }

    #[test]
    fn test_survives_poisoned_lock() {
        let handle = FilterHandle::with_filter(Filter::new("CDC20", false));
        let other = handle.clone();
        let panicked = std::thread::spawn(move || {
            let _guard = other.inner.write().unwrap();
            panic!("writer died");
        })
        .join();
        assert!(panicked.is_err());
        assert!(handle.inner.is_poisoned());

        assert_eq!(handle.snapshot(), (Some(Filter::new("CDC20", false)), 0));
        assert_eq!(handle.set(Filter::new("PAX6", true)), 1);
        assert_eq!(handle.get(), Some(Filter::new("PAX6", true)));
        assert_eq!(handle.generation(), 1);
    }

    #[test]
    fn test_apply_to_request() {
        let mut request = ApiRequest::new("mapr/api/gene/").param("value", "old");
        Filter::new("PAX6", true).apply(&mut request);
        assert_eq!(request.get("value"), Some("PAX6"));
        assert_eq!(request.get("case_sensitive"), Some("true"));
    }
}
