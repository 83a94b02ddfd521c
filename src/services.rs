//! Wiring of the resolution components from a [`ResolutionConfig`]

use std::sync::Arc;

use tracing::info;

use crate::config::ResolutionConfig;
use crate::documentation::DocumentationRegistry;
use crate::problems::ProblemReporter;
use crate::resolution::handler::ResolutionFailureHandler;
use crate::version::cache::{CachingVersionSelectorScheme, SelectorCache};
use crate::version::comparator::{VersionComparator, VersionOrdering};
use crate::version::scheme::{DefaultVersionSelectorScheme, MavenVersionSelectorScheme, VersionSelectorScheme};

pub struct ResolutionServices {
    comparator: VersionComparator,
    cache: Option<Arc<SelectorCache>>,
    failure_handler: ResolutionFailureHandler,
}

impl ResolutionServices {
    pub fn from_config(config: &ResolutionConfig, problems: Arc<dyn ProblemReporter>) -> Self {
        let documentation = DocumentationRegistry::new(&config.documentation.base_url);
        Self {
            comparator: VersionComparator::new(config.version_ordering),
            cache: config.selector_cache.enabled.then(|| Arc::new(SelectorCache::new())),
            failure_handler: ResolutionFailureHandler::new(documentation, problems),
        }
    }

    pub fn comparator(&self) -> VersionComparator {
        self.comparator
    }

    pub fn selector_cache(&self) -> Option<&Arc<SelectorCache>> {
        self.cache.as_ref()
    }

    pub fn failure_handler(&self) -> &ResolutionFailureHandler {
        &self.failure_handler
    }

    /// The default selector scheme, cached when the selector cache is enabled.
    ///
    /// The scheme captures the version ordering in effect when it is created.
    pub fn version_selector_scheme(&self) -> Box<dyn VersionSelectorScheme> {
        let scheme = DefaultVersionSelectorScheme::new(self.comparator);
        match &self.cache {
            Some(cache) => Box::new(CachingVersionSelectorScheme::new(scheme, Arc::clone(cache))),
            None => Box::new(scheme),
        }
    }

    /// The default scheme with Maven `RELEASE`/`LATEST` keywords on top.
    pub fn maven_version_selector_scheme(&self) -> Box<dyn VersionSelectorScheme> {
        let scheme = DefaultVersionSelectorScheme::new(self.comparator);
        match &self.cache {
            Some(cache) => Box::new(MavenVersionSelectorScheme::new(CachingVersionSelectorScheme::new(
                scheme,
                Arc::clone(cache),
            ))),
            None => Box::new(MavenVersionSelectorScheme::new(scheme)),
        }
    }

    /// Switch the version ordering. Cached selectors are dropped when the
    /// ordering actually changes; schemes handed out earlier keep their own
    /// ordering and only see cache entries parsed under it.
    pub fn set_version_ordering(&mut self, ordering: VersionOrdering) {
        if self.comparator.ordering() == ordering {
            return;
        }
        info!("Switching version ordering to {:?}", ordering);
        self.comparator = VersionComparator::new(ordering);
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelectorCacheConfig;
    use crate::problems::CollectingProblemReporter;
    use crate::version::selector::VersionSelector;

    fn services(config: ResolutionConfig) -> ResolutionServices {
        ResolutionServices::from_config(&config, Arc::new(CollectingProblemReporter::new()))
    }

    #[test]
    fn schemes_share_the_cache() {
        let services = services(ResolutionConfig::default());

        services.version_selector_scheme().parse_selector("[1.0,2.0)").unwrap();
        services.maven_version_selector_scheme().parse_selector("1.5").unwrap();

        assert_eq!(services.selector_cache().map(|c| c.len()), Some(2));
    }

    #[test]
    fn maven_keywords_bypass_the_cache() {
        let services = services(ResolutionConfig::default());

        let release = services.maven_version_selector_scheme().parse_selector("RELEASE").unwrap();

        assert_eq!(release, VersionSelector::MavenRelease);
        assert_eq!(services.selector_cache().map(|c| c.len()), Some(0));
    }

    #[test]
    fn disabled_cache() {
        let services = services(ResolutionConfig {
            selector_cache: SelectorCacheConfig { enabled: false },
            ..ResolutionConfig::default()
        });

        services.version_selector_scheme().parse_selector("1.0").unwrap();

        assert!(services.selector_cache().is_none());
    }

    #[test]
    fn toggling_ordering_clears_cache() {
        let mut services = services(ResolutionConfig::default());
        services.version_selector_scheme().parse_selector("[1.0,2.0)").unwrap();

        services.set_version_ordering(VersionOrdering::Standard);
        assert_eq!(services.selector_cache().map(|c| c.len()), Some(1));

        services.set_version_ordering(VersionOrdering::Extended);
        assert_eq!(services.selector_cache().map(|c| c.len()), Some(0));
        assert_eq!(services.comparator().ordering(), VersionOrdering::Extended);
    }

    #[test]
    fn scheme_from_before_the_toggle_cannot_poison_new_schemes() {
        let mut services = services(ResolutionConfig::default());
        let old = services.version_selector_scheme();

        services.set_version_ordering(VersionOrdering::Extended);
        old.parse_selector("[1.0-rc,1.0]").unwrap();

        // rc < snapshot < final under the extended ordering
        let range = services.version_selector_scheme().parse_selector("[1.0-rc,1.0]").unwrap();
        assert_eq!(range.accept_str("1.0-snapshot"), Ok(true));
        let range = old.parse_selector("[1.0-rc,1.0]").unwrap();
        assert_eq!(range.accept_str("1.0-snapshot"), Ok(false));
    }
}
