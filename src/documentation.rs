//! Links into the user guide

pub const DEFAULT_DOCUMENTATION_BASE_URL: &str = "https://docs.gradle.org/current/userguide";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentationRegistry {
    base_url: String,
}

impl Default for DocumentationRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_DOCUMENTATION_BASE_URL)
    }
}

impl DocumentationRegistry {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn documentation_for(&self, page: &str, section: &str) -> String {
        format!("{}/{}.html#{}", self.base_url, page, section)
    }

    pub fn documentation_recommendation_for(&self, topic: &str, page: &str, section: &str) -> String {
        format!(
            "See the documentation on {} at {}.",
            topic,
            self.documentation_for(page, section)
        )
    }
}
