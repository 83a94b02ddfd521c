//! Parsing and rendering of version selector strings

use tracing::debug;

use crate::version::comparator::{VersionComparator, VersionOrdering};
use crate::version::error::SelectorError;
use crate::version::selector::{VersionRange, VersionSelector};

/// Status that the Maven `LATEST` alias stands for.
const MAVEN_LATEST_STATUS: &str = "integration";
const MAVEN_RELEASE: &str = "RELEASE";
const MAVEN_LATEST: &str = "LATEST";

/// Turns selector strings into [`VersionSelector`]s and back.
pub trait VersionSelectorScheme: Send + Sync {
    /// Ordering captured by the selectors this scheme parses.
    fn ordering(&self) -> VersionOrdering;

    fn parse_selector(&self, selector: &str) -> Result<VersionSelector, SelectorError>;

    fn render_selector(&self, selector: &VersionSelector) -> String;

    /// Build the selector matching every version that `selector` rejects.
    ///
    /// Only exact selectors and ranges with an upper bound can be complemented.
    fn complement_for_rejection(
        &self,
        selector: &VersionSelector,
    ) -> Result<VersionSelector, SelectorError>;

    /// Parse each selector and combine them into a union, as used for `reject`
    /// lists.
    fn parse_union(&self, selectors: &[&str]) -> Result<VersionSelector, SelectorError> {
        let members = selectors
            .iter()
            .map(|selector| self.parse_selector(selector))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(VersionSelector::Union(members))
    }
}

/// One step of the parse chain: the first rule whose predicate matches builds
/// the selector.
struct SelectorRule {
    name: &'static str,
    matches: fn(&str) -> bool,
    build: fn(&str, VersionComparator) -> Result<VersionSelector, SelectorError>,
}

/// Rules in evaluation order. The exact rule matches everything and must stay
/// last.
static SELECTOR_RULES: &[SelectorRule] = &[
    SelectorRule {
        name: "range",
        matches: VersionRange::looks_like_range,
        build: |selector, comparator| {
            VersionRange::parse(selector, comparator).map(VersionSelector::Range)
        },
    },
    SelectorRule {
        name: "sub-version",
        matches: |selector| selector.ends_with('+'),
        build: |selector, _| Ok(VersionSelector::sub_version(selector)),
    },
    SelectorRule {
        name: "latest",
        matches: |selector| selector.starts_with("latest."),
        build: |selector, _| {
            Ok(VersionSelector::latest(&selector["latest.".len()..]))
        },
    },
    SelectorRule {
        name: "exact",
        matches: |_| true,
        build: |selector, _| Ok(VersionSelector::exact(selector)),
    },
];

/// The native selector syntax: ranges, `+` prefixes, `latest.<status>` and
/// exact versions.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultVersionSelectorScheme {
    comparator: VersionComparator,
}

impl DefaultVersionSelectorScheme {
    pub fn new(comparator: VersionComparator) -> Self {
        Self { comparator }
    }

    pub fn comparator(&self) -> VersionComparator {
        self.comparator
    }
}

impl VersionSelectorScheme for DefaultVersionSelectorScheme {
    fn ordering(&self) -> VersionOrdering {
        self.comparator.ordering()
    }

    fn parse_selector(&self, selector: &str) -> Result<VersionSelector, SelectorError> {
        if selector.is_empty() {
            return Err(SelectorError::Empty);
        }
        let rule = SELECTOR_RULES
            .iter()
            .find(|rule| (rule.matches)(selector))
            .ok_or_else(|| SelectorError::InvalidRange(selector.to_string()))?;
        debug!("Parsing '{}' as {} selector", selector, rule.name);
        (rule.build)(selector, self.comparator)
    }

    fn render_selector(&self, selector: &VersionSelector) -> String {
        selector.selector()
    }

    fn complement_for_rejection(
        &self,
        selector: &VersionSelector,
    ) -> Result<VersionSelector, SelectorError> {
        match selector {
            VersionSelector::Exact(_) => Ok(VersionSelector::Inverse(Box::new(selector.clone()))),
            VersionSelector::Range(range) if range.upper_bound().is_some() => {
                Ok(VersionSelector::Inverse(Box::new(selector.clone())))
            }
            _ => Err(SelectorError::NotRejectable(self.render_selector(selector))),
        }
    }
}

/// Adds the Maven `RELEASE` and `LATEST` keywords on top of a delegate scheme.
pub struct MavenVersionSelectorScheme<S> {
    delegate: S,
}

impl<S: VersionSelectorScheme> MavenVersionSelectorScheme<S> {
    pub fn new(delegate: S) -> Self {
        Self { delegate }
    }
}

impl<S: VersionSelectorScheme> VersionSelectorScheme for MavenVersionSelectorScheme<S> {
    fn ordering(&self) -> VersionOrdering {
        self.delegate.ordering()
    }

    fn parse_selector(&self, selector: &str) -> Result<VersionSelector, SelectorError> {
        match selector {
            MAVEN_RELEASE => Ok(VersionSelector::MavenRelease),
            MAVEN_LATEST => Ok(VersionSelector::latest(MAVEN_LATEST_STATUS)),
            _ => self.delegate.parse_selector(selector),
        }
    }

    fn render_selector(&self, selector: &VersionSelector) -> String {
        match selector {
            VersionSelector::MavenRelease => MAVEN_RELEASE.to_string(),
            VersionSelector::Latest { status } if status == MAVEN_LATEST_STATUS => {
                MAVEN_LATEST.to_string()
            }
            _ => self.delegate.render_selector(selector),
        }
    }

    fn complement_for_rejection(
        &self,
        selector: &VersionSelector,
    ) -> Result<VersionSelector, SelectorError> {
        self.delegate
            .complement_for_rejection(selector)
            .map_err(|_| SelectorError::NotRejectable(self.render_selector(selector)))
    }
}
