//! Structured problem reporting

use std::sync::{Mutex, PoisonError};

#[cfg(test)]
use mockall::automock;
use serde::Serialize;
use tracing::{error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Advice,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemGroup {
    pub name: &'static str,
    pub display_name: &'static str,
}

pub const VARIANT_RESOLUTION_GROUP: ProblemGroup = ProblemGroup {
    name: "dependency-variant-resolution",
    display_name: "Gradle cannot perform dependency variant resolution",
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemId {
    pub name: String,
    pub display_name: String,
    pub group: ProblemGroup,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub id: ProblemId,
    pub contextual_label: String,
    pub severity: Severity,
    pub documentation_link: Option<String>,
    pub solutions: Vec<String>,
}

#[cfg_attr(test, automock)]
pub trait ProblemReporter: Send + Sync {
    fn report(&self, problem: Problem);
}

/// Emits every problem as a tracing event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProblemReporter;

impl ProblemReporter for TracingProblemReporter {
    fn report(&self, problem: Problem) {
        match problem.severity {
            Severity::Error => error!(
                problem = %problem.id.name,
                group = problem.id.group.name,
                "{}",
                problem.contextual_label
            ),
            Severity::Warning | Severity::Advice => warn!(
                problem = %problem.id.name,
                group = problem.id.group.name,
                "{}",
                problem.contextual_label
            ),
        }
    }
}

/// Keeps reported problems in memory.
#[derive(Debug, Default)]
pub struct CollectingProblemReporter {
    problems: Mutex<Vec<Problem>>,
}

impl CollectingProblemReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn problems(&self) -> Vec<Problem> {
        self.problems.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl ProblemReporter for CollectingProblemReporter {
    fn report(&self, problem: Problem) {
        self.problems.lock().unwrap_or_else(PoisonError::into_inner).push(problem);
    }
}
