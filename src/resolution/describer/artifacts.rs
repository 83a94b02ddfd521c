//! Describers for artifact variant selection failures

use indexmap::IndexMap;

use crate::resolution::assessor::AssessedCandidate;
use crate::resolution::describer::format::{
    capitalize, describe_requested, format_attribute_matches_for_ambiguity,
    format_attribute_matches_for_incompatibility, format_sorted_attributes,
};
use crate::resolution::describer::{DescriberContext, ResolutionFailureDescriber};
use crate::resolution::error::VariantSelectionError;
use crate::resolution::failure::{
    AmbiguousArtifactTransformsFailure, AmbiguousArtifactsFailure, NoCompatibleArtifactFailure,
    ResolutionFailureProblemId, TransformationCandidate, UnknownArtifactSelectionFailure,
};
use crate::text::TreeFormatter;

pub struct AmbiguousArtifactsFailureDescriber;

impl ResolutionFailureDescriber<AmbiguousArtifactsFailure> for AmbiguousArtifactsFailureDescriber {
    fn describe_failure(&self, failure: &AmbiguousArtifactsFailure, context: &DescriberContext<'_>) -> VariantSelectionError {
        let describer = context.attribute_describer();
        let (matching, discarded): (Vec<&AssessedCandidate>, Vec<&AssessedCandidate>) =
            failure.candidates.iter().partition(|c| c.is_compatible());

        let mut formatter = TreeFormatter::new();
        if failure.requested_attributes.is_empty() {
            formatter.node(&format!("More than one variant of {} matches the consumer attributes", failure.target));
        } else {
            formatter.node(&format!(
                "The consumer was configured to find {}. However we cannot choose between the following variants of {}",
                describe_requested(&failure.requested_attributes, describer),
                failure.target
            ));
        }
        formatter.start_children();
        for candidate in &matching {
            formatter.node(&capitalize(candidate.display_name()));
            format_attribute_matches_for_ambiguity(&mut formatter, candidate, describer);
        }
        formatter.end_children();
        if !discarded.is_empty() {
            formatter.node("The following variants were also considered but didn't match the requested attributes:");
            formatter.start_children();
            for candidate in &discarded {
                formatter.node(&capitalize(candidate.display_name()));
                format_attribute_matches_for_incompatibility(&mut formatter, candidate, describer);
            }
            formatter.end_children();
        }

        context.error(ResolutionFailureProblemId::AmbiguousArtifacts, formatter.into_string())
    }
}

pub struct NoCompatibleArtifactFailureDescriber;

impl ResolutionFailureDescriber<NoCompatibleArtifactFailure> for NoCompatibleArtifactFailureDescriber {
    fn describe_failure(&self, failure: &NoCompatibleArtifactFailure, context: &DescriberContext<'_>) -> VariantSelectionError {
        let mut formatter = TreeFormatter::new();
        formatter.node(&format!("No variants of {} match the consumer attributes", failure.target));
        formatter.start_children();
        for candidate in &failure.candidates {
            formatter.node(&capitalize(candidate.display_name()));
            format_attribute_matches_for_incompatibility(&mut formatter, candidate, context.attribute_describer());
        }
        formatter.end_children();

        context.error(ResolutionFailureProblemId::NoCompatibleArtifact, formatter.into_string())
    }
}

pub struct AmbiguousArtifactTransformsFailureDescriber;

impl ResolutionFailureDescriber<AmbiguousArtifactTransformsFailure> for AmbiguousArtifactTransformsFailureDescriber {
    fn describe_failure(
        &self,
        failure: &AmbiguousArtifactTransformsFailure,
        context: &DescriberContext<'_>,
    ) -> VariantSelectionError {
        let mut by_source: IndexMap<&str, Vec<&TransformationCandidate>> = IndexMap::new();
        for transformation in &failure.transformations {
            by_source
                .entry(transformation.source_variant.as_str())
                .or_default()
                .push(transformation);
        }

        let mut formatter = TreeFormatter::new();
        formatter.node(&format!(
            "Found multiple transforms that can produce a variant of {} with requested attributes",
            failure.target
        ));
        format_sorted_attributes(&mut formatter, &failure.requested_attributes);
        formatter.node("Found the following transforms");
        formatter.start_children();
        for (source, transformations) in &by_source {
            formatter.node(&format!("From '{source}'"));
            formatter.start_children();
            formatter.node("With source attributes");
            if let Some(first) = transformations.first() {
                format_sorted_attributes(&mut formatter, &first.source_attributes);
            }
            formatter.node("Candidate transform(s)");
            formatter.start_children();
            for transformation in transformations {
                formatter.node(&format!(
                    "Transform '{}' producing attributes:",
                    transformation.transform_chain
                ));
                format_sorted_attributes(&mut formatter, &transformation.final_attributes);
            }
            formatter.end_children();
            formatter.end_children();
        }
        formatter.end_children();

        context.error(ResolutionFailureProblemId::AmbiguousArtifactTransform, formatter.into_string())
    }
}

pub struct UnknownArtifactSelectionFailureDescriber;

impl ResolutionFailureDescriber<UnknownArtifactSelectionFailure> for UnknownArtifactSelectionFailureDescriber {
    fn describe_failure(
        &self,
        failure: &UnknownArtifactSelectionFailure,
        context: &DescriberContext<'_>,
    ) -> VariantSelectionError {
        let message = format!(
            "Could not select a variant of {} that matches the consumer attributes: {}",
            failure.target, failure.cause
        );
        context.error(ResolutionFailureProblemId::UnknownArtifactSelection, message)
    }
}
