//! Candidate shapes seen during graph and artifact variant selection

use serde::{Deserialize, Serialize};

use crate::attributes::attribute::ImmutableAttributes;
use crate::attributes::capability::Capability;

/// Anything that can be assessed against requested attributes.
pub trait CandidateVariant {
    fn display_name(&self) -> String;
    fn attributes(&self) -> &ImmutableAttributes;
    fn capabilities(&self) -> &[Capability];
}

/// A variant of a component in the dependency graph, or a legacy
/// configuration when the component is not variant-aware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphVariant {
    pub name: String,
    pub attributes: ImmutableAttributes,
    pub capabilities: Vec<Capability>,
}

impl GraphVariant {
    pub fn new(name: &str, attributes: ImmutableAttributes) -> Self {
        Self {
            name: name.to_string(),
            attributes,
            capabilities: Vec::new(),
        }
    }

    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.push(capability);
        self
    }
}

impl CandidateVariant for GraphVariant {
    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn attributes(&self) -> &ImmutableAttributes {
        &self.attributes
    }

    fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }
}

/// An artifact set variant of an already resolved component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedVariant {
    pub display_name: String,
    pub attributes: ImmutableAttributes,
    pub capabilities: Vec<Capability>,
}

impl ResolvedVariant {
    pub fn new(display_name: &str, attributes: ImmutableAttributes) -> Self {
        Self {
            display_name: display_name.to_string(),
            attributes,
            capabilities: Vec::new(),
        }
    }
}

impl CandidateVariant for ResolvedVariant {
    fn display_name(&self) -> String {
        self.display_name.clone()
    }

    fn attributes(&self) -> &ImmutableAttributes {
        &self.attributes
    }

    fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }
}

/// A selected variant of a component in the resolved graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeState {
    pub component: String,
    pub variant: String,
    pub attributes: ImmutableAttributes,
    pub capabilities: Vec<Capability>,
}

impl NodeState {
    pub fn new(component: &str, variant: &str, attributes: ImmutableAttributes) -> Self {
        Self {
            component: component.to_string(),
            variant: variant.to_string(),
            attributes,
            capabilities: Vec::new(),
        }
    }

    pub fn name_with_variant(&self) -> String {
        format!("{} variant {}", self.component, self.variant)
    }
}

impl CandidateVariant for NodeState {
    fn display_name(&self) -> String {
        self.name_with_variant()
    }

    fn attributes(&self) -> &ImmutableAttributes {
        &self.attributes
    }

    fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }
}

/// A variant produced by applying a chain of artifact transforms to `root`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformedVariant {
    pub root: ResolvedVariant,
    pub transform_chain: String,
    pub attributes: ImmutableAttributes,
}
