use std::fmt;

use serde::{Deserialize, Serialize};

/// A feature provided by a variant, identified by group and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Capability {
    pub group: String,
    pub name: String,
    pub version: Option<String>,
}

impl Capability {
    pub fn new(group: &str, name: &str, version: Option<&str>) -> Self {
        Self {
            group: group.to_string(),
            name: name.to_string(),
            version: version.map(str::to_string),
        }
    }

    /// Same group and name; versions are not compared.
    pub fn provides(&self, requested: &Capability) -> bool {
        self.group == requested.group && self.name == requested.name
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.name)?;
        if let Some(version) = &self.version {
            write!(f, ":{version}")?;
        }
        Ok(())
    }
}

/// `capability g:n:v` or `capabilities a:b:1, c:d:2`, sorted.
pub fn describe_capabilities(capabilities: &[Capability]) -> String {
    let mut sorted: Vec<String> = capabilities.iter().map(Capability::to_string).collect();
    sorted.sort();
    match sorted.len() {
        0 => "no capabilities".to_string(),
        1 => format!("capability {}", sorted[0]),
        _ => format!("capabilities {}", sorted.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_capabilities_sorts_and_pluralizes() {
        let single = [Capability::new("org", "lib", Some("1.0"))];
        assert_eq!(describe_capabilities(&single), "capability org:lib:1.0");

        let several = [
            Capability::new("org", "lib-test-fixtures", None),
            Capability::new("org", "lib", Some("1.0")),
        ];
        assert_eq!(
            describe_capabilities(&several),
            "capabilities org:lib-test-fixtures, org:lib:1.0"
        );
    }

    #[test]
    fn provides_ignores_version() {
        let provided = Capability::new("org", "lib", Some("1.0"));
        assert!(provided.provides(&Capability::new("org", "lib", None)));
        assert!(!provided.provides(&Capability::new("org", "other", None)));
    }
}
