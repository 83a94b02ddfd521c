use serde::Serialize;
use thiserror::Error;

use crate::resolution::failure::ResolutionFailureProblemId;

/// User-facing description of a resolution failure.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct VariantSelectionError {
    problem_id: ResolutionFailureProblemId,
    message: String,
    resolutions: Vec<String>,
    documentation_link: String,
}

impl VariantSelectionError {
    pub fn new(problem_id: ResolutionFailureProblemId, message: String, documentation_link: String) -> Self {
        Self {
            problem_id,
            message,
            resolutions: Vec::new(),
            documentation_link,
        }
    }

    pub fn with_resolution(mut self, resolution: impl Into<String>) -> Self {
        self.resolutions.push(resolution.into());
        self
    }

    pub fn problem_id(&self) -> ResolutionFailureProblemId {
        self.problem_id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn resolutions(&self) -> &[String] {
        &self.resolutions
    }

    pub fn documentation_link(&self) -> &str {
        &self.documentation_link
    }
}
