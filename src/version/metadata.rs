//! Component metadata consulted by status-based selectors

#[cfg(test)]
use mockall::automock;

use serde::{Deserialize, Serialize};

use crate::version::parser::Version;

/// Statuses of the default status scheme, least to most mature.
pub const DEFAULT_STATUS_SCHEME: &[&str] = &["integration", "milestone", "release"];

/// Status assigned to components that do not declare one.
pub const DEFAULT_STATUS: &str = "integration";

/// Metadata of a single component version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMetadata {
    pub version: Version,
    pub status: String,
    pub status_scheme: Vec<String>,
}

impl ComponentMetadata {
    /// Metadata with the default status and status scheme.
    pub fn new(version: &str) -> Self {
        Self::with_status(version, DEFAULT_STATUS)
    }

    pub fn with_status(version: &str, status: &str) -> Self {
        Self {
            version: Version::parse(version),
            status: status.to_string(),
            status_scheme: DEFAULT_STATUS_SCHEME.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_status_scheme(mut self, status_scheme: Vec<String>) -> Self {
        self.status_scheme = status_scheme;
        self
    }

    /// Position of `status` within this component's status scheme.
    pub fn status_rank(&self, status: &str) -> Option<usize> {
        self.status_scheme.iter().position(|s| s == status)
    }
}

/// Supplies metadata for candidate versions of the module being resolved.
///
/// Only consulted for selectors whose `requires_metadata()` is true.
#[cfg_attr(test, automock)]
pub trait ComponentMetadataSupplier: Send + Sync {
    fn metadata_for(&self, version: &str) -> Option<ComponentMetadata>;
}

/// Gives every version the same status and status scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformMetadataSupplier {
    status: String,
    status_scheme: Vec<String>,
}

impl Default for UniformMetadataSupplier {
    fn default() -> Self {
        Self::new(DEFAULT_STATUS)
    }
}

impl UniformMetadataSupplier {
    pub fn new(status: &str) -> Self {
        Self {
            status: status.to_string(),
            status_scheme: DEFAULT_STATUS_SCHEME.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_status_scheme(mut self, status_scheme: Vec<String>) -> Self {
        self.status_scheme = status_scheme;
        self
    }
}

impl ComponentMetadataSupplier for UniformMetadataSupplier {
    fn metadata_for(&self, version: &str) -> Option<ComponentMetadata> {
        Some(ComponentMetadata::with_status(version, &self.status).with_status_scheme(self.status_scheme.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_default_status_scheme() {
        let metadata = ComponentMetadata::new("1.0");
        assert_eq!(metadata.status, "integration");
        assert_eq!(metadata.status_rank("release"), Some(2));
        assert_eq!(metadata.status_rank("gold"), None);
    }

    #[test]
    fn custom_status_scheme_replaces_default() {
        let metadata = ComponentMetadata::with_status("1.0", "gold")
            .with_status_scheme(vec!["bronze".into(), "silver".into(), "gold".into()]);
        assert_eq!(metadata.status_rank("gold"), Some(2));
        assert_eq!(metadata.status_rank("release"), None);
    }
}
