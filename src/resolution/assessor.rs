//! Classification of candidate attributes against requested attributes
//!
//! Every attribute named by either side lands in exactly one bucket:
//!
//! | requested | provided | matcher  | bucket            |
//! |-----------|----------|----------|-------------------|
//! | yes       | yes      | matching | compatible        |
//! | yes       | yes      | not      | incompatible      |
//! | yes       | no       | -        | only on consumer  |
//! | no        | yes      | -        | only on producer  |

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::attributes::attribute::{Attribute, AttributeValue, ImmutableAttributes};
use crate::attributes::capability::Capability;
use crate::attributes::schema::AttributeMatcher;
use crate::resolution::model::{CandidateVariant, GraphVariant, NodeState, ResolvedVariant};

/// One attribute of an assessed candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessedAttribute {
    pub attribute: Attribute,
    pub requested: Option<AttributeValue>,
    pub provided: Option<AttributeValue>,
}

/// The result of assessing one candidate.
///
/// This is plain data: it does not refer back to the assessor or the resolution
/// that produced it, so it can be kept, logged or serialized on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessedCandidate {
    display_name: String,
    attributes: ImmutableAttributes,
    capabilities: Vec<Capability>,
    compatible: Vec<AssessedAttribute>,
    incompatible: Vec<AssessedAttribute>,
    only_on_consumer: Vec<AssessedAttribute>,
    only_on_producer: Vec<AssessedAttribute>,
}

impl AssessedCandidate {
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn attributes(&self) -> &ImmutableAttributes {
        &self.attributes
    }

    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    pub fn compatible_attributes(&self) -> &[AssessedAttribute] {
        &self.compatible
    }

    pub fn incompatible_attributes(&self) -> &[AssessedAttribute] {
        &self.incompatible
    }

    pub fn only_on_consumer_attributes(&self) -> &[AssessedAttribute] {
        &self.only_on_consumer
    }

    pub fn only_on_producer_attributes(&self) -> &[AssessedAttribute] {
        &self.only_on_producer
    }

    /// No attribute present on both sides failed to match.
    pub fn is_compatible(&self) -> bool {
        self.incompatible.is_empty()
    }
}

/// Assesses candidates against one set of requested attributes.
pub struct ResolutionCandidateAssessor<'a> {
    requested: &'a ImmutableAttributes,
    matcher: &'a dyn AttributeMatcher,
}

impl<'a> ResolutionCandidateAssessor<'a> {
    pub fn new(requested: &'a ImmutableAttributes, matcher: &'a dyn AttributeMatcher) -> Self {
        Self { requested, matcher }
    }

    pub fn requested_attributes(&self) -> &ImmutableAttributes {
        self.requested
    }

    pub fn assess_candidate(
        &self,
        name: &str,
        capabilities: &[Capability],
        attributes: &ImmutableAttributes,
    ) -> AssessedCandidate {
        let mut candidate = AssessedCandidate {
            display_name: name.to_string(),
            attributes: attributes.clone(),
            capabilities: capabilities.to_vec(),
            compatible: Vec::new(),
            incompatible: Vec::new(),
            only_on_consumer: Vec::new(),
            only_on_producer: Vec::new(),
        };

        let mut keys: Vec<&Attribute> = self.requested.keys().chain(attributes.keys()).collect();
        // Stable sort: for equal names the requested attribute comes first
        keys.sort_by(|a, b| a.name().cmp(b.name()));

        let mut already_assessed: HashSet<&str> = HashSet::with_capacity(keys.len());
        for attribute in keys {
            if already_assessed.insert(attribute.name()) {
                self.classify(attribute, attributes, &mut candidate);
            }
        }
        candidate
    }

    fn classify(
        &self,
        attribute: &Attribute,
        attributes: &ImmutableAttributes,
        candidate: &mut AssessedCandidate,
    ) {
        let requested = self.requested.find_entry(attribute);
        let provided = attributes.find_entry_by_name(attribute.name()).map(|(_, value)| value);

        match (requested, provided) {
            (Some(requested), Some(provided)) => {
                let assessed = AssessedAttribute {
                    attribute: attribute.clone(),
                    requested: Some(requested.clone()),
                    provided: Some(provided.clone()),
                };
                let coerced_provided = provided.coerce(attribute);
                let coerced_requested = requested.coerce(attribute);
                if self.matcher.is_matching(attribute, &coerced_provided, &coerced_requested) {
                    candidate.compatible.push(assessed);
                } else {
                    candidate.incompatible.push(assessed);
                }
            }
            (Some(requested), None) => candidate.only_on_consumer.push(AssessedAttribute {
                attribute: attribute.clone(),
                requested: Some(requested.clone()),
                provided: None,
            }),
            (None, Some(provided)) => candidate.only_on_producer.push(AssessedAttribute {
                attribute: attribute.clone(),
                requested: None,
                provided: Some(provided.clone()),
            }),
            (None, None) => {}
        }
    }

    /// Assess every candidate, sorted by display name.
    pub fn assess_candidates<C: CandidateVariant>(&self, candidates: &[C]) -> Vec<AssessedCandidate> {
        let mut assessed: Vec<AssessedCandidate> = candidates
            .iter()
            .map(|c| self.assess_candidate(&c.display_name(), c.capabilities(), c.attributes()))
            .collect();
        assessed.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        assessed
    }

    pub fn assess_graph_variants(&self, variants: &[GraphVariant]) -> Vec<AssessedCandidate> {
        self.assess_candidates(variants)
    }

    pub fn assess_resolved_variants(&self, variants: &[ResolvedVariant]) -> Vec<AssessedCandidate> {
        self.assess_candidates(variants)
    }

    pub fn assess_node_states(&self, nodes: &[NodeState]) -> Vec<AssessedCandidate> {
        self.assess_candidates(nodes)
    }
}
