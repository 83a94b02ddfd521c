//! Resolution failures as data
//!
//! A failure records what went wrong during variant or artifact selection
//! without deciding how to present it. Describers turn failures into
//! [`VariantSelectionError`](crate::resolution::error::VariantSelectionError)s.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attributes::attribute::ImmutableAttributes;
use crate::attributes::capability::Capability;
use crate::resolution::assessor::AssessedCandidate;

/// Identifies a failure kind for describer lookup and problem reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolutionFailureProblemId {
    AmbiguousVariants,
    NoCompatibleVariants,
    ConfigurationNotCompatible,
    ConfigurationDoesNotExist,
    NoVariantsWithMatchingCapabilities,
    IncompatibleMultipleNodes,
    AmbiguousArtifacts,
    NoCompatibleArtifact,
    AmbiguousArtifactTransform,
    UnknownArtifactSelection,
}

impl ResolutionFailureProblemId {
    pub const ALL: [ResolutionFailureProblemId; 10] = [
        Self::AmbiguousVariants,
        Self::NoCompatibleVariants,
        Self::ConfigurationNotCompatible,
        Self::ConfigurationDoesNotExist,
        Self::NoVariantsWithMatchingCapabilities,
        Self::IncompatibleMultipleNodes,
        Self::AmbiguousArtifacts,
        Self::NoCompatibleArtifact,
        Self::AmbiguousArtifactTransform,
        Self::UnknownArtifactSelection,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::AmbiguousVariants => "AMBIGUOUS_VARIANTS",
            Self::NoCompatibleVariants => "NO_COMPATIBLE_VARIANTS",
            Self::ConfigurationNotCompatible => "CONFIGURATION_NOT_COMPATIBLE",
            Self::ConfigurationDoesNotExist => "CONFIGURATION_DOES_NOT_EXIST",
            Self::NoVariantsWithMatchingCapabilities => "NO_VARIANTS_WITH_MATCHING_CAPABILITIES",
            Self::IncompatibleMultipleNodes => "INCOMPATIBLE_MULTIPLE_NODES",
            Self::AmbiguousArtifacts => "AMBIGUOUS_ARTIFACTS",
            Self::NoCompatibleArtifact => "NO_COMPATIBLE_ARTIFACT",
            Self::AmbiguousArtifactTransform => "AMBIGUOUS_ARTIFACT_TRANSFORM",
            Self::UnknownArtifactSelection => "UNKNOWN_ARTIFACT_SELECTION",
        }
    }

    /// Problem id name, e.g. `ambiguous-variants`.
    pub fn kebab_name(&self) -> String {
        self.name().to_ascii_lowercase().replace('_', "-")
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::AmbiguousVariants => "Multiple variants exist that would match the request",
            Self::NoCompatibleVariants => "No variants exist that would match the request",
            Self::ConfigurationNotCompatible => "Configuration selected by name is not compatible",
            Self::ConfigurationDoesNotExist => "Configuration selected by name does not exist",
            Self::NoVariantsWithMatchingCapabilities => "No variants exist with capabilities that would match the request",
            Self::IncompatibleMultipleNodes => "Incompatible nodes of a single component were selected",
            Self::AmbiguousArtifacts => "Multiple artifacts exist that would match the request",
            Self::NoCompatibleArtifact => "No artifacts exist that would match the request",
            Self::AmbiguousArtifactTransform => "Multiple artifacts transforms exist that would satisfy the request",
            Self::UnknownArtifactSelection => "Unknown artifact selection failure",
        }
    }

    /// User guide page and section explaining this kind of failure.
    pub fn documentation_section(&self) -> (&'static str, &'static str) {
        match self {
            Self::AmbiguousVariants => ("variant_model", "sub:variant-ambiguity"),
            Self::NoCompatibleVariants => ("variant_model", "sub:variant-no-match"),
            Self::ConfigurationNotCompatible | Self::IncompatibleMultipleNodes => {
                ("variant_model", "sub:variant-incompatible")
            }
            Self::NoVariantsWithMatchingCapabilities => ("component_capabilities", "sec:selecting-between-candidates"),
            Self::AmbiguousArtifactTransform => ("artifact_transforms", "sec:abm-artifact-transforms"),
            Self::ConfigurationDoesNotExist
            | Self::AmbiguousArtifacts
            | Self::NoCompatibleArtifact
            | Self::UnknownArtifactSelection => ("variant_attributes", "sec:abm_algorithm"),
        }
    }
}

impl fmt::Display for ResolutionFailureProblemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// More than one variant of the target matched the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmbiguousVariantsFailure {
    pub target: String,
    pub requested_attributes: ImmutableAttributes,
    /// Every variant that was considered, matching or not.
    pub candidates: Vec<AssessedCandidate>,
}

/// No variant of the target matched the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoCompatibleVariantsFailure {
    pub target: String,
    pub requested_attributes: ImmutableAttributes,
    pub candidates: Vec<AssessedCandidate>,
}

/// A configuration selected by name does not match the consumer attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationNotCompatibleFailure {
    pub target: String,
    pub configuration: String,
    pub requested_attributes: ImmutableAttributes,
    pub candidates: Vec<AssessedCandidate>,
}

/// A configuration selected by name is not declared by the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationDoesNotExistFailure {
    pub target: String,
    pub configuration: String,
    /// Component and configuration that declared the dependency, when known.
    pub declared_by: Option<(String, String)>,
}

/// No variant of the target provides the requested capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoVariantsWithMatchingCapabilitiesFailure {
    pub target: String,
    pub requested_attributes: ImmutableAttributes,
    pub requested_capabilities: Vec<Capability>,
    pub candidates: Vec<AssessedCandidate>,
}

/// Several incompatible variants of one component ended up in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncompatibleMultipleNodesValidationFailure {
    pub target: String,
    pub candidates: Vec<AssessedCandidate>,
}

/// More than one artifact set variant matched the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmbiguousArtifactsFailure {
    pub target: String,
    pub requested_attributes: ImmutableAttributes,
    pub candidates: Vec<AssessedCandidate>,
}

/// No artifact set variant matched the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoCompatibleArtifactFailure {
    pub target: String,
    pub requested_attributes: ImmutableAttributes,
    pub candidates: Vec<AssessedCandidate>,
}

/// A transform chain candidate, flattened so the failure owns no graph state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationCandidate {
    pub source_variant: String,
    pub source_attributes: ImmutableAttributes,
    pub transform_chain: String,
    pub final_attributes: ImmutableAttributes,
}

/// Several transform chains could produce the requested variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmbiguousArtifactTransformsFailure {
    pub target: String,
    pub requested_attributes: ImmutableAttributes,
    pub transformations: Vec<TransformationCandidate>,
}

/// Artifact selection failed for a reason other than matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnknownArtifactSelectionFailure {
    pub target: String,
    pub requested_attributes: ImmutableAttributes,
    pub cause: String,
}

/// A failure variant that describers can be registered for.
pub trait FailureVariant: Send + Sync + Sized + 'static {
    const PROBLEM_ID: ResolutionFailureProblemId;

    fn from_failure(failure: &ResolutionFailure) -> Option<&Self>;
}

macro_rules! resolution_failures {
    ($($variant:ident($failure:ident) => $problem_id:ident),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(tag = "kind", rename_all = "camelCase")]
        pub enum ResolutionFailure {
            $($variant($failure),)*
        }

        impl ResolutionFailure {
            pub fn problem_id(&self) -> ResolutionFailureProblemId {
                match self {
                    $(Self::$variant(_) => ResolutionFailureProblemId::$problem_id,)*
                }
            }

            /// The component or artifact set the request was resolved against.
            pub fn target(&self) -> &str {
                match self {
                    $(Self::$variant(failure) => &failure.target,)*
                }
            }
        }

        $(
            impl FailureVariant for $failure {
                const PROBLEM_ID: ResolutionFailureProblemId = ResolutionFailureProblemId::$problem_id;

                fn from_failure(failure: &ResolutionFailure) -> Option<&Self> {
                    match failure {
                        ResolutionFailure::$variant(inner) => Some(inner),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }
            }

            impl From<$failure> for ResolutionFailure {
                fn from(failure: $failure) -> Self {
                    Self::$variant(failure)
                }
            }
        )*
    };
}

resolution_failures! {
    AmbiguousVariants(AmbiguousVariantsFailure) => AmbiguousVariants,
    NoCompatibleVariants(NoCompatibleVariantsFailure) => NoCompatibleVariants,
    ConfigurationNotCompatible(ConfigurationNotCompatibleFailure) => ConfigurationNotCompatible,
    ConfigurationDoesNotExist(ConfigurationDoesNotExistFailure) => ConfigurationDoesNotExist,
    NoVariantsWithMatchingCapabilities(NoVariantsWithMatchingCapabilitiesFailure) => NoVariantsWithMatchingCapabilities,
    IncompatibleMultipleNodes(IncompatibleMultipleNodesValidationFailure) => IncompatibleMultipleNodes,
    AmbiguousArtifacts(AmbiguousArtifactsFailure) => AmbiguousArtifacts,
    NoCompatibleArtifact(NoCompatibleArtifactFailure) => NoCompatibleArtifact,
    AmbiguousArtifactTransforms(AmbiguousArtifactTransformsFailure) => AmbiguousArtifactTransform,
    UnknownArtifactSelection(UnknownArtifactSelectionFailure) => UnknownArtifactSelection,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ResolutionFailureProblemId::AmbiguousVariants, "ambiguous-variants")]
    #[case(ResolutionFailureProblemId::NoVariantsWithMatchingCapabilities, "no-variants-with-matching-capabilities")]
    #[case(ResolutionFailureProblemId::AmbiguousArtifactTransform, "ambiguous-artifact-transform")]
    fn kebab_name(#[case] id: ResolutionFailureProblemId, #[case] expected: &str) {
        assert_eq!(id.kebab_name(), expected);
    }

    #[test]
    fn problem_id_and_variant_lookup() {
        let failure: ResolutionFailure = ConfigurationDoesNotExistFailure {
            target: "org:lib:1.0".to_string(),
            configuration: "missing".to_string(),
            declared_by: None,
        }
        .into();

        assert_eq!(failure.problem_id(), ResolutionFailureProblemId::ConfigurationDoesNotExist);
        assert_eq!(failure.target(), "org:lib:1.0");
        assert!(ConfigurationDoesNotExistFailure::from_failure(&failure).is_some());
        assert!(AmbiguousVariantsFailure::from_failure(&failure).is_none());
    }

    #[test]
    fn problem_id_serializes_screaming_snake() {
        let json = serde_json::to_string(&ResolutionFailureProblemId::IncompatibleMultipleNodes).unwrap();
        assert_eq!(json, "\"INCOMPATIBLE_MULTIPLE_NODES\"");
    }

    #[test]
    fn failure_serializes_with_kind_tag() {
        let failure = ResolutionFailure::from(UnknownArtifactSelectionFailure {
            target: "org:lib:1.0".to_string(),
            requested_attributes: ImmutableAttributes::empty(),
            cause: "boom".to_string(),
        });
        let value = serde_json::to_value(&failure).unwrap();
        assert_eq!(value["kind"], "unknownArtifactSelection");
        assert_eq!(value["cause"], "boom");
    }
}
