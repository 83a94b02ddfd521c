//! Ordering of free-form versions
//!
//! Parts are compared pairwise. Numeric parts beat string parts, numbers compare
//! as integers, and string parts consult a table of qualifiers with a special
//! meaning before falling back to lexicographic order. When one version is a
//! prefix of the other, an extra numeric part makes the longer version higher
//! (`1.2 < 1.2.1`) while an extra qualifier makes it lower (`1.2-beta < 1.2`).

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::version::parser::Version;

/// Which table of special qualifiers drives the comparison of string parts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VersionOrdering {
    /// `dev` < unknown qualifiers < `rc` < `final`, matched case-sensitively
    #[default]
    Standard,
    /// `dev` < unknown < `rc` < `snapshot` < `final` < `ga` < `release` < `sp`,
    /// matched case-insensitively
    Extended,
}

impl VersionOrdering {
    fn special_meaning(self, part: &str) -> Option<i32> {
        match self {
            VersionOrdering::Standard => match part {
                "dev" => Some(-1),
                "rc" => Some(1),
                "final" => Some(2),
                _ => None,
            },
            VersionOrdering::Extended => match part.to_ascii_lowercase().as_str() {
                "dev" => Some(-1),
                "rc" => Some(1),
                "snapshot" => Some(2),
                "final" => Some(3),
                "ga" => Some(4),
                "release" => Some(5),
                "sp" => Some(6),
                _ => None,
            },
        }
    }
}

/// Total ordering over [`Version`]s used for "latest wins" decisions and range
/// bound checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct VersionComparator {
    ordering: VersionOrdering,
}

impl VersionComparator {
    pub fn new(ordering: VersionOrdering) -> Self {
        Self { ordering }
    }

    pub fn ordering(&self) -> VersionOrdering {
        self.ordering
    }

    pub fn compare(&self, version1: &Version, version2: &Version) -> Ordering {
        if version1 == version2 {
            return Ordering::Equal;
        }

        let parts1 = version1.parts();
        let parts2 = version2.parts();
        let numeric1 = version1.numeric_parts();
        let numeric2 = version2.numeric_parts();

        let common = parts1.len().min(parts2.len());
        for i in 0..common {
            let (part1, part2) = (&parts1[i], &parts2[i]);
            if part1 == part2 {
                continue;
            }
            match (numeric1[i], numeric2[i]) {
                (Some(_), None) => return Ordering::Greater,
                (None, Some(_)) => return Ordering::Less,
                (Some(n1), Some(n2)) => match n1.cmp(&n2) {
                    Ordering::Equal => continue,
                    other => return other,
                },
                (None, None) => return self.compare_qualifiers(part1, part2),
            }
        }

        if parts1.len() > common {
            return if numeric1[common].is_some() {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }
        if parts2.len() > common {
            return if numeric2[common].is_some() {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }
        Ordering::Equal
    }

    /// Compare two raw version strings.
    pub fn compare_str(&self, version1: &str, version2: &str) -> Ordering {
        self.compare(&Version::parse(version1), &Version::parse(version2))
    }

    /// Sort versions ascending; the last element is the "latest".
    pub fn sort(&self, versions: &mut [Version]) {
        versions.sort_by(|a, b| self.compare(a, b));
    }

    pub fn max<'a, I>(&self, versions: I) -> Option<&'a Version>
    where
        I: IntoIterator<Item = &'a Version>,
    {
        versions.into_iter().max_by(|a, b| self.compare(a, b))
    }

    fn compare_qualifiers(&self, part1: &str, part2: &str) -> Ordering {
        let meaning1 = self.ordering.special_meaning(part1);
        let meaning2 = self.ordering.special_meaning(part2);
        match (meaning1, meaning2) {
            (Some(m1), m2) => m1.cmp(&m2.unwrap_or(0)),
            (None, Some(m2)) => 0.cmp(&m2),
            (None, None) => part1.cmp(part2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn compare(a: &str, b: &str) -> Ordering {
        VersionComparator::default().compare_str(a, b)
    }

    #[rstest]
    #[case("1.2.3", "1.2.3-beta", Ordering::Greater)]
    #[case("1.2", "1.2.1", Ordering::Less)]
    #[case("1.2", "1.a", Ordering::Greater)]
    #[case("1.10", "1.9", Ordering::Greater)]
    #[case("1.0-dev", "1.0", Ordering::Less)]
    #[case("1.0-rc", "1.0-whatever", Ordering::Greater)]
    #[case("1.0-final", "1.0-rc", Ordering::Greater)]
    #[case("1.0-dev", "1.0-alpha", Ordering::Less)]
    #[case("1.0-alpha", "1.0-beta", Ordering::Less)]
    #[case("1.0", "1_0", Ordering::Equal)]
    #[case("1.01", "1.1", Ordering::Equal)]
    #[case("1.2.3beta4", "1.2.3-beta-4", Ordering::Equal)]
    #[case("1.0-SNAPSHOT", "1.0", Ordering::Less)]
    fn compare_standard_ordering(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
        assert_eq!(compare(a, b), expected);
    }

    #[rstest]
    #[case("1.0")]
    #[case("1.0-rc-1")]
    #[case("1.0-final")]
    #[case("1.0-dev")]
    #[case("2.0.0.a")]
    #[case("10")]
    #[case("abc")]
    #[case("")]
    fn compare_is_antisymmetric_and_reflexive(#[case] a: &str) {
        let others = ["1.0", "1.0.1", "1.0-rc", "1.0-dev", "1.0-final", "1.0-x", "abc", ""];
        assert_eq!(compare(a, a), Ordering::Equal);
        for b in others {
            assert_eq!(compare(a, b), compare(b, a).reverse(), "{a} vs {b}");
        }
    }

    #[rstest]
    #[case("1.0-SNAPSHOT", "1.0-rc", Ordering::Greater)]
    #[case("1.0-ga", "1.0-final", Ordering::Greater)]
    #[case("1.0-RELEASE", "1.0-GA", Ordering::Greater)]
    #[case("1.0-sp", "1.0-release", Ordering::Greater)]
    #[case("1.0-RC", "1.0-alpha", Ordering::Greater)]
    #[case("1.0-Dev", "1.0-alpha", Ordering::Less)]
    fn compare_extended_ordering(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
        let comparator = VersionComparator::new(VersionOrdering::Extended);
        assert_eq!(comparator.compare_str(a, b), expected);
    }

    #[test]
    fn standard_ordering_is_case_sensitive() {
        // "RC" has no special meaning, so plain string comparison applies
        assert_eq!(compare("1.0-RC", "1.0-alpha"), Ordering::Less);
    }

    #[test]
    fn sort_orders_latest_last() {
        let mut versions: Vec<Version> = ["1.10", "1.2-beta", "1.2", "1.9", "1.2.1"]
            .into_iter()
            .map(Version::parse)
            .collect();
        VersionComparator::default().sort(&mut versions);
        let sorted: Vec<&str> = versions.iter().map(Version::source).collect();
        assert_eq!(sorted, vec!["1.2-beta", "1.2", "1.2.1", "1.9", "1.10"]);
    }

    #[test]
    fn max_returns_latest() {
        let versions: Vec<Version> = ["1.0", "2.0-rc", "1.5"].into_iter().map(Version::parse).collect();
        let latest = VersionComparator::default().max(&versions);
        assert_eq!(latest.map(Version::source), Some("2.0-rc"));
    }
}
