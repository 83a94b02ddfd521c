//! Selector cache shared between scheme instances
//!
//! Parsed selectors are cached by version ordering and raw string. Range
//! selectors capture the comparator in effect when they were parsed, so a
//! scheme only ever sees entries parsed under its own ordering. Clearing on an
//! ordering change releases the entries nobody will look up again.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info};

use crate::version::comparator::VersionOrdering;
use crate::version::error::SelectorError;
use crate::version::scheme::VersionSelectorScheme;
use crate::version::selector::VersionSelector;

/// Concurrent map from ordering and raw selector string to parsed selector.
///
/// Each lookup and insert is atomic on its own; a [`clear`](Self::clear) racing
/// with lookups only causes selectors to be parsed again.
#[derive(Debug, Default)]
pub struct SelectorCache {
    entries: DashMap<(VersionOrdering, String), VersionSelector>,
}

impl SelectorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, ordering: VersionOrdering, selector: &str) -> Option<VersionSelector> {
        self.entries
            .get(&(ordering, selector.to_string()))
            .map(|entry| entry.value().clone())
    }

    pub fn insert(&self, ordering: VersionOrdering, selector: &str, parsed: VersionSelector) {
        self.entries.insert((ordering, selector.to_string()), parsed);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        info!("Clearing {} cached version selectors", self.entries.len());
        self.entries.clear();
    }
}

/// Decorates a scheme with a [`SelectorCache`]. Parse errors are not cached.
pub struct CachingVersionSelectorScheme<S> {
    delegate: S,
    cache: Arc<SelectorCache>,
}

impl<S: VersionSelectorScheme> CachingVersionSelectorScheme<S> {
    pub fn new(delegate: S, cache: Arc<SelectorCache>) -> Self {
        Self { delegate, cache }
    }

    pub fn cache(&self) -> &Arc<SelectorCache> {
        &self.cache
    }
}

impl<S: VersionSelectorScheme> VersionSelectorScheme for CachingVersionSelectorScheme<S> {
    fn ordering(&self) -> VersionOrdering {
        self.delegate.ordering()
    }

    fn parse_selector(&self, selector: &str) -> Result<VersionSelector, SelectorError> {
        let ordering = self.ordering();
        if let Some(cached) = self.cache.get(ordering, selector) {
            debug!("Selector cache hit for '{}' ({:?})", selector, ordering);
            return Ok(cached);
        }
        let parsed = self.delegate.parse_selector(selector)?;
        self.cache.insert(ordering, selector, parsed.clone());
        Ok(parsed)
    }

    fn render_selector(&self, selector: &VersionSelector) -> String {
        self.delegate.render_selector(selector)
    }

    fn complement_for_rejection(
        &self,
        selector: &VersionSelector,
    ) -> Result<VersionSelector, SelectorError> {
        self.delegate.complement_for_rejection(selector)
    }
}
