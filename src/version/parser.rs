//! Free-form version string parsing
//!
//! Versions are split into parts on the separators `.`, `_`, `-` and `+`, and on
//! every transition between a run of digits and a run of other characters:
//!
//! - `1.2.3` -> `1`, `2`, `3`
//! - `1.2.3-beta-4` -> `1`, `2`, `3`, `beta`, `4`
//! - `1.2.3beta4` -> `1`, `2`, `3`, `beta`, `4`
//!
//! The portion before the first non-`.` separator (or the first implicit
//! transition) is the *base version*.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A parsed version string.
///
/// Two versions are equal when their source strings are equal. Ordering is a
/// separate relation provided by [`VersionComparator`](super::comparator::VersionComparator),
/// under which `1.0` and `1_0` compare equal without being equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct Version {
    source: String,
    parts: Vec<String>,
    numeric_parts: Vec<Option<i64>>,
    base: Option<Box<Version>>,
}

impl Version {
    /// Parse a version string. Parsing never fails; any string is a version.
    pub fn parse(source: &str) -> Self {
        VersionParser.transform(source)
    }

    fn new(source: String, parts: Vec<String>, base: Option<Version>) -> Self {
        let numeric_parts = parts.iter().map(|part| part.parse::<i64>().ok()).collect();
        Self {
            source,
            parts,
            numeric_parts,
            base: base.map(Box::new),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn numeric_parts(&self) -> &[Option<i64>] {
        &self.numeric_parts
    }

    /// The qualifier-stripped leading portion of this version, or `self` when
    /// the version carries no qualifier.
    pub fn base_version(&self) -> &Version {
        self.base.as_deref().unwrap_or(self)
    }

    pub fn is_qualified(&self) -> bool {
        self.base.is_some()
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl From<String> for Version {
    fn from(source: String) -> Self {
        Version::parse(&source)
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.source
    }
}

/// Splits raw version strings into [`Version`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionParser;

impl VersionParser {
    pub fn transform(&self, original: &str) -> Version {
        let mut parts: Vec<String> = Vec::new();
        let mut digit = false;
        let mut start_part = 0;
        // Number of parts and byte offset that make up the base version.
        let mut end_base = 0;
        let mut end_base_str = 0;

        for (pos, ch) in original.char_indices() {
            if matches!(ch, '.' | '_' | '-' | '+') {
                parts.push(original[start_part..pos].to_string());
                start_part = pos + ch.len_utf8();
                digit = false;
                if ch != '.' && end_base_str == 0 {
                    end_base = parts.len();
                    end_base_str = pos;
                }
            } else if ch.is_ascii_digit() {
                if !digit && pos > start_part {
                    if end_base_str == 0 {
                        end_base = parts.len() + 1;
                        end_base_str = pos;
                    }
                    parts.push(original[start_part..pos].to_string());
                    start_part = pos;
                }
                digit = true;
            } else {
                if digit {
                    if end_base_str == 0 {
                        end_base = parts.len() + 1;
                        end_base_str = pos;
                    }
                    parts.push(original[start_part..pos].to_string());
                    start_part = pos;
                }
                digit = false;
            }
        }
        if original.len() > start_part {
            parts.push(original[start_part..].to_string());
        }

        let base = (end_base_str > 0).then(|| {
            Version::new(
                original[..end_base_str].to_string(),
                parts[..end_base].to_vec(),
                None,
            )
        });
        Version::new(original.to_string(), parts, base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.2.3", &["1", "2", "3"])]
    #[case("1.2.3-beta-4", &["1", "2", "3", "beta", "4"])]
    #[case("1.2.3beta4", &["1", "2", "3", "beta", "4"])]
    #[case("1_2+3", &["1", "2", "3"])]
    #[case("a1b", &["a", "1", "b"])]
    #[case("1..2", &["1", "", "2"])]
    #[case("", &[])]
    fn transform_splits_parts(#[case] source: &str, #[case] expected: &[&str]) {
        let version = VersionParser.transform(source);
        assert_eq!(version.parts(), expected);
    }

    #[test]
    fn numeric_parts_are_none_for_qualifiers() {
        let version = Version::parse("1.10.0-rc2");
        assert_eq!(
            version.numeric_parts(),
            &[Some(1), Some(10), Some(0), None, Some(2)]
        );
    }

    #[test]
    fn numeric_part_overflow_is_not_numeric() {
        let version = Version::parse("1.99999999999999999999");
        assert_eq!(version.numeric_parts()[1], None);
    }

    #[rstest]
    #[case("1.2.3", "1.2.3", false)]
    #[case("1.2.3-beta", "1.2.3", true)]
    #[case("1.2.3beta4", "1.2.3", true)]
    #[case("1.2_3", "1.2", true)]
    #[case("1.2.3.Final", "1.2.3.Final", false)]
    fn base_version_strips_qualifier(
        #[case] source: &str,
        #[case] base: &str,
        #[case] qualified: bool,
    ) {
        let version = Version::parse(source);
        assert_eq!(version.base_version().source(), base);
        assert_eq!(version.is_qualified(), qualified);
        assert!(!version.base_version().is_qualified());
    }

    #[test]
    fn base_version_keeps_leading_parts() {
        let version = Version::parse("2.5-SNAPSHOT");
        assert_eq!(version.base_version().parts(), &["2", "5"]);
    }

    #[test]
    fn equality_is_by_source() {
        assert_eq!(Version::parse("1.0"), Version::parse("1.0"));
        assert_ne!(Version::parse("1.0"), Version::parse("1_0"));
    }
}
