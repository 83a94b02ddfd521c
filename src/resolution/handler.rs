//! Turns resolution failures into reported, user-facing errors
//!
//! ```text
//! failure ──▶ schema describers ──▶ standard describers ──▶ first match
//!                                                             │
//!                          VariantSelectionError ◀── report ◀─┘
//! ```

use std::error::Error;
use std::sync::Arc;

use tracing::debug;

use crate::attributes::attribute::ImmutableAttributes;
use crate::attributes::capability::Capability;
use crate::attributes::schema::AttributesSchema;
use crate::documentation::DocumentationRegistry;
use crate::problems::{Problem, ProblemId, ProblemReporter, Severity, VARIANT_RESOLUTION_GROUP};
use crate::resolution::assessor::ResolutionCandidateAssessor;
use crate::resolution::describer::{DescriberContext, ResolutionFailureDescriberRegistry};
use crate::resolution::error::VariantSelectionError;
use crate::resolution::failure::{
    AmbiguousArtifactTransformsFailure, AmbiguousArtifactsFailure, AmbiguousVariantsFailure,
    ConfigurationDoesNotExistFailure, ConfigurationNotCompatibleFailure, IncompatibleMultipleNodesValidationFailure,
    NoCompatibleArtifactFailure, NoCompatibleVariantsFailure, NoVariantsWithMatchingCapabilitiesFailure,
    ResolutionFailure, TransformationCandidate, UnknownArtifactSelectionFailure,
};
use crate::resolution::model::{GraphVariant, NodeState, ResolvedVariant, TransformedVariant};

pub struct ResolutionFailureHandler {
    describers: ResolutionFailureDescriberRegistry,
    documentation: DocumentationRegistry,
    problems: Arc<dyn ProblemReporter>,
}

impl ResolutionFailureHandler {
    /// A handler using the standard describers.
    pub fn new(documentation: DocumentationRegistry, problems: Arc<dyn ProblemReporter>) -> Self {
        Self::with_describers(ResolutionFailureDescriberRegistry::standard(), documentation, problems)
    }

    pub fn with_describers(
        describers: ResolutionFailureDescriberRegistry,
        documentation: DocumentationRegistry,
        problems: Arc<dyn ProblemReporter>,
    ) -> Self {
        Self {
            describers,
            documentation,
            problems,
        }
    }

    /// Describe `failure` with the first applicable describer, report it and
    /// return the error for the caller to raise.
    ///
    /// # Panics
    ///
    /// When no describer accepts the failure. That means a failure kind was
    /// added without registering a describer for it.
    pub fn describe_failure(&self, schema: &AttributesSchema, failure: ResolutionFailure) -> VariantSelectionError {
        let context = DescriberContext::new(&self.documentation, schema.attribute_describer());
        let (describer, error) = schema
            .failure_describers()
            .describers_for(&failure)
            .iter()
            .chain(self.describers.describers_for(&failure))
            .find_map(|describer| {
                describer
                    .try_describe(&failure, &context)
                    .map(|error| (describer.describer_name(), error))
            })
            .unwrap_or_else(|| {
                panic!(
                    "No describer is registered that can describe resolution failure {}",
                    failure.problem_id()
                )
            });

        debug!(
            problem_id = %failure.problem_id(),
            component = failure.target(),
            describer,
            "Described resolution failure"
        );
        self.report(&error);
        error
    }

    fn report(&self, error: &VariantSelectionError) {
        let problem_id = error.problem_id();
        self.problems.report(Problem {
            id: ProblemId {
                name: problem_id.kebab_name(),
                display_name: problem_id.display_name().to_string(),
                group: VARIANT_RESOLUTION_GROUP,
            },
            contextual_label: error.message().to_string(),
            severity: Severity::Error,
            documentation_link: Some(error.documentation_link().to_string()),
            solutions: error.resolutions().to_vec(),
        });
    }

    // Graph variant selection

    pub fn ambiguous_variants_failure(
        &self,
        schema: &AttributesSchema,
        target: &str,
        requested: &ImmutableAttributes,
        candidates: &[GraphVariant],
    ) -> VariantSelectionError {
        let assessor = ResolutionCandidateAssessor::new(requested, schema);
        let failure = AmbiguousVariantsFailure {
            target: target.to_string(),
            requested_attributes: requested.clone(),
            candidates: assessor.assess_graph_variants(candidates),
        };
        self.describe_failure(schema, failure.into())
    }

    pub fn no_compatible_variants_failure(
        &self,
        schema: &AttributesSchema,
        target: &str,
        requested: &ImmutableAttributes,
        candidates: &[GraphVariant],
    ) -> VariantSelectionError {
        let assessor = ResolutionCandidateAssessor::new(requested, schema);
        let failure = NoCompatibleVariantsFailure {
            target: target.to_string(),
            requested_attributes: requested.clone(),
            candidates: assessor.assess_graph_variants(candidates),
        };
        self.describe_failure(schema, failure.into())
    }

    pub fn configuration_not_compatible_failure(
        &self,
        schema: &AttributesSchema,
        target: &str,
        requested: &ImmutableAttributes,
        configuration: &GraphVariant,
    ) -> VariantSelectionError {
        let assessor = ResolutionCandidateAssessor::new(requested, schema);
        let failure = ConfigurationNotCompatibleFailure {
            target: target.to_string(),
            configuration: configuration.name.clone(),
            requested_attributes: requested.clone(),
            candidates: assessor.assess_graph_variants(std::slice::from_ref(configuration)),
        };
        self.describe_failure(schema, failure.into())
    }

    pub fn configuration_does_not_exist_failure(
        &self,
        schema: &AttributesSchema,
        target: &str,
        configuration: &str,
        declared_by: Option<(&str, &str)>,
    ) -> VariantSelectionError {
        let failure = ConfigurationDoesNotExistFailure {
            target: target.to_string(),
            configuration: configuration.to_string(),
            declared_by: declared_by.map(|(component, configuration)| (component.to_string(), configuration.to_string())),
        };
        self.describe_failure(schema, failure.into())
    }

    pub fn no_variants_with_matching_capabilities_failure(
        &self,
        schema: &AttributesSchema,
        target: &str,
        requested: &ImmutableAttributes,
        requested_capabilities: &[Capability],
        candidates: &[GraphVariant],
    ) -> VariantSelectionError {
        let assessor = ResolutionCandidateAssessor::new(requested, schema);
        let failure = NoVariantsWithMatchingCapabilitiesFailure {
            target: target.to_string(),
            requested_attributes: requested.clone(),
            requested_capabilities: requested_capabilities.to_vec(),
            candidates: assessor.assess_graph_variants(candidates),
        };
        self.describe_failure(schema, failure.into())
    }

    pub fn incompatible_multiple_nodes_validation_failure(
        &self,
        schema: &AttributesSchema,
        target: &str,
        nodes: &[NodeState],
    ) -> VariantSelectionError {
        let requested = ImmutableAttributes::empty();
        let assessor = ResolutionCandidateAssessor::new(&requested, schema);
        let failure = IncompatibleMultipleNodesValidationFailure {
            target: target.to_string(),
            candidates: assessor.assess_node_states(nodes),
        };
        self.describe_failure(schema, failure.into())
    }

    // Artifact variant selection

    pub fn ambiguous_artifacts_failure(
        &self,
        schema: &AttributesSchema,
        target: &str,
        requested: &ImmutableAttributes,
        candidates: &[ResolvedVariant],
    ) -> VariantSelectionError {
        let assessor = ResolutionCandidateAssessor::new(requested, schema);
        let failure = AmbiguousArtifactsFailure {
            target: target.to_string(),
            requested_attributes: requested.clone(),
            candidates: assessor.assess_resolved_variants(candidates),
        };
        self.describe_failure(schema, failure.into())
    }

    pub fn no_compatible_artifact_failure(
        &self,
        schema: &AttributesSchema,
        target: &str,
        requested: &ImmutableAttributes,
        candidates: &[ResolvedVariant],
    ) -> VariantSelectionError {
        let assessor = ResolutionCandidateAssessor::new(requested, schema);
        let failure = NoCompatibleArtifactFailure {
            target: target.to_string(),
            requested_attributes: requested.clone(),
            candidates: assessor.assess_resolved_variants(candidates),
        };
        self.describe_failure(schema, failure.into())
    }

    pub fn ambiguous_artifact_transforms_failure(
        &self,
        schema: &AttributesSchema,
        target: &str,
        requested: &ImmutableAttributes,
        transformed: &[TransformedVariant],
    ) -> VariantSelectionError {
        let failure = AmbiguousArtifactTransformsFailure {
            target: target.to_string(),
            requested_attributes: requested.clone(),
            transformations: transformed
                .iter()
                .map(|variant| TransformationCandidate {
                    source_variant: variant.root.display_name.clone(),
                    source_attributes: variant.root.attributes.clone(),
                    transform_chain: variant.transform_chain.clone(),
                    final_attributes: variant.attributes.clone(),
                })
                .collect(),
        };
        self.describe_failure(schema, failure.into())
    }

    pub fn unknown_artifact_selection_failure(
        &self,
        schema: &AttributesSchema,
        target: &str,
        requested: &ImmutableAttributes,
        cause: &dyn Error,
    ) -> VariantSelectionError {
        let failure = UnknownArtifactSelectionFailure {
            target: target.to_string(),
            requested_attributes: requested.clone(),
            cause: cause.to_string(),
        };
        self.describe_failure(schema, failure.into())
    }
}
