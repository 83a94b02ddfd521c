//! Version selectors: the parsed form of a version constraint
//!
//! Supported forms:
//! - `1.2.3` - exact version
//! - `1.2.+` - any version starting with `1.2.`
//! - `[1.0,2.0)`, `]1.0,2.0]`, `[1.0,)`, `(,2.0]`, `[1.0]` - version ranges
//! - `latest.release` - latest version with at least the given status
//! - `RELEASE` / `LATEST` - Maven aliases (see [`MavenVersionSelectorScheme`](super::scheme::MavenVersionSelectorScheme))

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::version::comparator::VersionComparator;
use crate::version::error::SelectorError;
use crate::version::metadata::ComponentMetadata;
use crate::version::parser::Version;

const ANY_NON_SPECIAL: &str = r"[^\s\[\]\(\),]";

static FINITE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    range_regex(&format!(
        r"[\[\]\(]\s*({ANY_NON_SPECIAL}+)\s*,\s*({ANY_NON_SPECIAL}+)\s*[\]\[\)]"
    ))
});
static LOWER_INFINITE_RANGE: LazyLock<Regex> =
    LazyLock::new(|| range_regex(&format!(r"\(\s*,\s*({ANY_NON_SPECIAL}+)\s*[\]\[\)]")));
static UPPER_INFINITE_RANGE: LazyLock<Regex> =
    LazyLock::new(|| range_regex(&format!(r"[\[\]\(]\s*({ANY_NON_SPECIAL}+)\s*,\s*\)")));
static SINGLE_VALUE_RANGE: LazyLock<Regex> =
    LazyLock::new(|| range_regex(&format!(r"\[\s*({ANY_NON_SPECIAL}+)\s*\]")));

/// Timestamped Maven snapshot, e.g. `1.0-20230101.120000-3`
static TIMESTAMPED_SNAPSHOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*-)?[0-9]{8}\.[0-9]{6}-[0-9]+$").expect("snapshot pattern is valid")
});

/// A capture group borrowed from the matched text rather than from `captures`.
fn group<'h>(captures: &regex::Captures<'h>, index: usize) -> Option<&'h str> {
    captures.get(index).map(|m| m.as_str())
}

fn range_regex(pattern: &str) -> Regex {
    Regex::new(&format!("^{pattern}$")).expect("range pattern is valid")
}

/// Whether `version` denotes a Maven snapshot, plain or timestamped.
pub fn is_snapshot_version(version: &str) -> bool {
    version.ends_with("SNAPSHOT") || TIMESTAMPED_SNAPSHOT.is_match(version)
}

/// Bounds of a version range.
///
/// `[` opens inclusively and `]` or `(` exclusively; `]` closes inclusively and
/// `[` or `)` exclusively. The meaning of `]` depends on its position.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionRange {
    source: String,
    lower: Option<Version>,
    lower_inclusive: bool,
    upper: Option<Version>,
    upper_inclusive: bool,
    comparator: VersionComparator,
}

impl VersionRange {
    /// Whether `selector` is written in range syntax.
    pub fn is_range(selector: &str) -> bool {
        FINITE_RANGE.is_match(selector)
            || LOWER_INFINITE_RANGE.is_match(selector)
            || UPPER_INFINITE_RANGE.is_match(selector)
            || SINGLE_VALUE_RANGE.is_match(selector)
    }

    /// Whether `selector` opens like a range, valid or not.
    pub(crate) fn looks_like_range(selector: &str) -> bool {
        selector.starts_with(['[', ']', '('])
    }

    pub fn parse(selector: &str, comparator: VersionComparator) -> Result<Self, SelectorError> {
        let lower_inclusive = selector.starts_with('[');
        let upper_inclusive = selector.ends_with(']');

        let (lower, upper) = if let Some(captures) = FINITE_RANGE.captures(selector) {
            (group(&captures, 1), group(&captures, 2))
        } else if let Some(captures) = LOWER_INFINITE_RANGE.captures(selector) {
            (None, group(&captures, 1))
        } else if let Some(captures) = UPPER_INFINITE_RANGE.captures(selector) {
            (group(&captures, 1), None)
        } else if let Some(captures) = SINGLE_VALUE_RANGE.captures(selector) {
            (group(&captures, 1), group(&captures, 1))
        } else {
            return Err(SelectorError::InvalidRange(selector.to_string()));
        };

        Ok(Self {
            source: selector.to_string(),
            lower: lower.map(Version::parse),
            lower_inclusive: lower.is_some() && lower_inclusive,
            upper: upper.map(Version::parse),
            upper_inclusive: upper.is_some() && upper_inclusive,
            comparator,
        })
    }

    pub fn lower_bound(&self) -> Option<&Version> {
        self.lower.as_ref()
    }

    pub fn upper_bound(&self) -> Option<&Version> {
        self.upper.as_ref()
    }

    pub fn is_lower_inclusive(&self) -> bool {
        self.lower_inclusive
    }

    pub fn is_upper_inclusive(&self) -> bool {
        self.upper_inclusive
    }

    /// A `[v]` range, which admits exactly one version.
    pub fn is_single_value(&self) -> bool {
        self.lower_inclusive && self.upper_inclusive && self.lower == self.upper
    }

    pub fn contains(&self, candidate: &Version) -> bool {
        if let Some(lower) = &self.lower {
            let ord = self.comparator.compare(candidate, lower);
            if !(ord.is_gt() || (self.lower_inclusive && ord.is_eq())) {
                return false;
            }
        }
        if let Some(upper) = &self.upper {
            let ord = self.comparator.compare(candidate, upper);
            if !(ord.is_lt() || (self.upper_inclusive && ord.is_eq())) {
                return false;
            }
        }
        true
    }
}

/// A parsed version constraint.
///
/// Selectors are immutable once built and may be shared freely between threads.
#[derive(Debug, Clone, PartialEq)]
pub enum VersionSelector {
    /// A single literal version
    Exact(Version),
    /// `<prefix>+`: any version whose string starts with the prefix
    SubVersion { prefix: String },
    Range(VersionRange),
    /// `latest.<status>`: any version whose status is at least `status`
    Latest { status: String },
    /// Maven `RELEASE`: any version that is not a snapshot
    MavenRelease,
    /// Logical complement of an exact or upper-bounded range selector
    Inverse(Box<VersionSelector>),
    /// Matches when any member matches
    Union(Vec<VersionSelector>),
}

impl VersionSelector {
    pub fn exact(version: &str) -> Self {
        VersionSelector::Exact(Version::parse(version))
    }

    /// Build a sub-version selector from its full form, e.g. `1.2.+`.
    pub fn sub_version(selector: &str) -> Self {
        let prefix = selector.strip_suffix('+').unwrap_or(selector);
        VersionSelector::SubVersion {
            prefix: prefix.to_string(),
        }
    }

    pub fn latest(status: &str) -> Self {
        VersionSelector::Latest {
            status: status.to_string(),
        }
    }

    /// The selector string as the default scheme renders it.
    pub fn selector(&self) -> String {
        match self {
            VersionSelector::Exact(version) => version.source().to_string(),
            VersionSelector::SubVersion { prefix } => format!("{prefix}+"),
            VersionSelector::Range(range) => range.source.clone(),
            VersionSelector::Latest { status } => format!("latest.{status}"),
            VersionSelector::MavenRelease => "latest.release".to_string(),
            VersionSelector::Inverse(inner) => format!("!({})", inner.selector()),
            VersionSelector::Union(members) => members
                .iter()
                .map(VersionSelector::selector)
                .collect::<Vec<_>>()
                .join(" | "),
        }
    }

    /// Whether the selector can match more than one version.
    pub fn is_dynamic(&self) -> bool {
        match self {
            VersionSelector::Exact(_) => false,
            VersionSelector::SubVersion { .. }
            | VersionSelector::Range(_)
            | VersionSelector::Latest { .. }
            | VersionSelector::MavenRelease => true,
            VersionSelector::Inverse(inner) => inner.is_dynamic(),
            VersionSelector::Union(members) => members.iter().any(VersionSelector::is_dynamic),
        }
    }

    /// Whether component metadata, not just the version string, is needed to
    /// decide acceptance. Callers must then use [`accept_metadata`](Self::accept_metadata).
    pub fn requires_metadata(&self) -> bool {
        match self {
            VersionSelector::Latest { .. } => true,
            VersionSelector::Inverse(inner) => inner.requires_metadata(),
            VersionSelector::Union(members) => {
                members.iter().any(VersionSelector::requires_metadata)
            }
            _ => false,
        }
    }

    /// Whether the selector denotes exactly one version.
    pub fn matches_unique_version(&self) -> bool {
        match self {
            VersionSelector::Exact(_) => true,
            VersionSelector::Range(range) => range.is_single_value(),
            _ => false,
        }
    }

    /// Whether a version already chosen for the module can be checked against
    /// this selector without listing the other available versions.
    pub fn can_short_circuit_when_version_already_preselected(&self) -> bool {
        match self {
            VersionSelector::Exact(_)
            | VersionSelector::SubVersion { .. }
            | VersionSelector::Range(_)
            | VersionSelector::MavenRelease => true,
            VersionSelector::Latest { .. } | VersionSelector::Union(_) => false,
            VersionSelector::Inverse(inner) => {
                inner.can_short_circuit_when_version_already_preselected()
            }
        }
    }

    /// Decide acceptance from the version alone.
    ///
    /// Fails with [`SelectorError::MetadataRequired`] for selectors whose
    /// decision depends on component metadata.
    pub fn accept(&self, candidate: &Version) -> Result<bool, SelectorError> {
        match self {
            VersionSelector::Exact(version) => Ok(version.source() == candidate.source()),
            VersionSelector::SubVersion { prefix } => {
                Ok(candidate.source().starts_with(prefix.as_str()))
            }
            VersionSelector::Range(range) => Ok(range.contains(candidate)),
            VersionSelector::Latest { .. } => {
                Err(SelectorError::MetadataRequired(self.selector()))
            }
            VersionSelector::MavenRelease => Ok(!is_snapshot_version(candidate.source())),
            VersionSelector::Inverse(inner) => inner.accept(candidate).map(|accepted| !accepted),
            VersionSelector::Union(members) => {
                for member in members {
                    if member.accept(candidate)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    pub fn accept_str(&self, candidate: &str) -> Result<bool, SelectorError> {
        self.accept(&Version::parse(candidate))
    }

    /// Decide acceptance using the candidate's full metadata.
    pub fn accept_metadata(&self, candidate: &ComponentMetadata) -> bool {
        match self {
            VersionSelector::Latest { status } => {
                match (candidate.status_rank(status), candidate.status_rank(&candidate.status)) {
                    (Some(requested), Some(actual)) => requested <= actual,
                    _ => false,
                }
            }
            VersionSelector::Inverse(inner) => !inner.accept_metadata(candidate),
            VersionSelector::Union(members) => {
                members.iter().any(|member| member.accept_metadata(candidate))
            }
            // Remaining variants never need metadata
            other => other.accept(&candidate.version).unwrap_or(false),
        }
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.selector())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn range(selector: &str) -> VersionSelector {
        VersionSelector::Range(VersionRange::parse(selector, VersionComparator::default()).unwrap())
    }

    #[rstest]
    #[case("[1.0,2.0)", "1.0", true)]
    #[case("[1.0,2.0)", "1.99", true)]
    #[case("[1.0,2.0)", "2.0", false)]
    #[case("[1.0,2.0)", "0.9", false)]
    #[case("]1.0,2.0]", "1.0", false)]
    #[case("]1.0,2.0]", "2.0", true)]
    #[case("]1.0,2.0]", "1.5", true)]
    #[case("(1.0,2.0[", "2.0", false)]
    #[case("(1.0,2.0[", "1.0.1", true)]
    #[case("[1.0,2.0]", "2.0-rc", true)]
    #[case("[ 1.0 , 2.0 ]", "1.5", true)]
    #[case("[1.0,)", "100.0", true)]
    #[case("[1.0,)", "1.0-beta", false)]
    #[case("]1.0,)", "1.0", false)]
    #[case("(,2.0]", "0.1", true)]
    #[case("(,2.0]", "2.0", true)]
    #[case("(,2.0)", "2.0", false)]
    #[case("(,2.0[", "1.9", true)]
    #[case("[1.0]", "1.0", true)]
    #[case("[1.0]", "1.0.1", false)]
    fn range_accepts_by_bounds(#[case] selector: &str, #[case] candidate: &str, #[case] expected: bool) {
        assert_eq!(range(selector).accept_str(candidate), Ok(expected));
    }

    #[rstest]
    #[case("[1.0,2.0)", Some("1.0"), true, Some("2.0"), false)]
    #[case("]1.0,2.0]", Some("1.0"), false, Some("2.0"), true)]
    #[case("[1.0,)", Some("1.0"), true, None, false)]
    #[case("(,2.0]", None, false, Some("2.0"), true)]
    #[case("[3]", Some("3"), true, Some("3"), true)]
    fn range_parse_extracts_bounds(
        #[case] selector: &str,
        #[case] lower: Option<&str>,
        #[case] lower_inclusive: bool,
        #[case] upper: Option<&str>,
        #[case] upper_inclusive: bool,
    ) {
        let parsed = VersionRange::parse(selector, VersionComparator::default()).unwrap();
        assert_eq!(parsed.lower_bound().map(Version::source), lower);
        assert_eq!(parsed.is_lower_inclusive(), lower_inclusive);
        assert_eq!(parsed.upper_bound().map(Version::source), upper);
        assert_eq!(parsed.is_upper_inclusive(), upper_inclusive);
    }

    #[rstest]
    #[case("[1.0,2.0")]
    #[case("[,]")]
    #[case("(1.0)")]
    #[case("[1.0,2.0,3.0]")]
    fn range_parse_rejects_malformed(#[case] selector: &str) {
        assert_eq!(
            VersionRange::parse(selector, VersionComparator::default()),
            Err(SelectorError::InvalidRange(selector.to_string()))
        );
    }

    #[rstest]
    #[case("1.2.+", "1.2.9", true)]
    #[case("1.2.+", "1.2.0-beta", true)]
    #[case("1.2.+", "1.3.0", false)]
    #[case("1.2.+", "1.20", false)]
    #[case("1.2+", "1.20", true)]
    #[case("+", "anything", true)]
    fn sub_version_matches_prefix(#[case] selector: &str, #[case] candidate: &str, #[case] expected: bool) {
        assert_eq!(VersionSelector::sub_version(selector).accept_str(candidate), Ok(expected));
    }

    #[rstest]
    #[case("1.0-SNAPSHOT", false)]
    #[case("20230101.120000-3", false)]
    #[case("1.0-20230101.120000-3", false)]
    #[case("1.0", true)]
    #[case("1.0-rc-1", true)]
    fn maven_release_excludes_snapshots(#[case] candidate: &str, #[case] expected: bool) {
        assert_eq!(VersionSelector::MavenRelease.accept_str(candidate), Ok(expected));
    }

    #[test]
    fn exact_uses_string_equality() {
        let selector = VersionSelector::exact("1.0");
        assert_eq!(selector.accept_str("1.0"), Ok(true));
        assert_eq!(selector.accept_str("1_0"), Ok(false));
        assert_eq!(selector.accept_str("1.0.0"), Ok(false));
    }

    #[rstest]
    #[case("integration", "integration", true)]
    #[case("integration", "release", true)]
    #[case("release", "milestone", false)]
    #[case("release", "release", true)]
    #[case("unknown", "release", false)]
    #[case("release", "unknown", false)]
    fn latest_compares_status_rank(#[case] requested: &str, #[case] status: &str, #[case] expected: bool) {
        let metadata = ComponentMetadata::with_status("1.0", status);
        assert_eq!(VersionSelector::latest(requested).accept_metadata(&metadata), expected);
    }

    #[test]
    fn latest_requires_metadata_to_accept() {
        let selector = VersionSelector::latest("release");
        assert!(selector.requires_metadata());
        assert_eq!(
            selector.accept_str("1.0"),
            Err(SelectorError::MetadataRequired("latest.release".to_string()))
        );
    }

    #[test]
    fn union_is_logical_or() {
        let union = VersionSelector::Union(vec![VersionSelector::exact("1.0"), VersionSelector::exact("2.0")]);
        assert_eq!(union.accept_str("2.0"), Ok(true));
        assert_eq!(union.accept_str("1.0"), Ok(true));
        assert_eq!(union.accept_str("3.0"), Ok(false));
        assert!(!union.is_dynamic());
        assert!(!union.matches_unique_version());
    }

    #[test]
    fn union_flags_follow_members() {
        let union = VersionSelector::Union(vec![VersionSelector::exact("1.0"), VersionSelector::latest("release")]);
        assert!(union.is_dynamic());
        assert!(union.requires_metadata());
        assert!(union.accept_metadata(&ComponentMetadata::with_status("5.0", "release")));
        assert!(union.accept_metadata(&ComponentMetadata::new("1.0")));
        assert!(!union.accept_metadata(&ComponentMetadata::new("5.0")));
    }

    #[test]
    fn inverse_negates_wrapped() {
        let inverse = VersionSelector::Inverse(Box::new(range("[1.0,2.0)")));
        assert_eq!(inverse.accept_str("1.5"), Ok(false));
        assert_eq!(inverse.accept_str("2.0"), Ok(true));
        assert!(inverse.is_dynamic());
        assert!(!inverse.requires_metadata());
        assert_eq!(inverse.selector(), "!([1.0,2.0))");
    }

    #[rstest]
    #[case(VersionSelector::exact("1.0"), false, false, true, true)]
    #[case(VersionSelector::sub_version("1.+"), true, false, false, true)]
    #[case(range("[1.0,2.0)"), true, false, false, true)]
    #[case(range("[1.0]"), true, false, true, true)]
    #[case(VersionSelector::latest("release"), true, true, false, false)]
    #[case(VersionSelector::MavenRelease, true, false, false, true)]
    fn selector_flags(
        #[case] selector: VersionSelector,
        #[case] dynamic: bool,
        #[case] requires_metadata: bool,
        #[case] unique: bool,
        #[case] short_circuit: bool,
    ) {
        assert_eq!(selector.is_dynamic(), dynamic);
        assert_eq!(selector.requires_metadata(), requires_metadata);
        assert_eq!(selector.matches_unique_version(), unique);
        assert_eq!(selector.can_short_circuit_when_version_already_preselected(), short_circuit);
    }

    #[test]
    fn accept_metadata_falls_back_to_version() {
        let selector = VersionSelector::sub_version("1.+");
        assert!(selector.accept_metadata(&ComponentMetadata::new("1.4")));
        assert!(!selector.accept_metadata(&ComponentMetadata::new("2.0")));
    }
}
