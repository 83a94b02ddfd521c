//! Describers for graph variant selection failures

use std::collections::BTreeSet;

use crate::attributes::attribute::{Attribute, AttributeKind, AttributeValue};
use crate::attributes::capability::describe_capabilities;
use crate::resolution::assessor::AssessedCandidate;
use crate::resolution::describer::format::{
    capitalize, describe_requested, format_attribute_matches_for_ambiguity, format_attribute_matches_for_incompatibility,
    variant_node,
};
use crate::resolution::describer::{DescriberContext, ResolutionFailureDescriber};
use crate::resolution::error::VariantSelectionError;
use crate::resolution::failure::{
    AmbiguousVariantsFailure, ConfigurationDoesNotExistFailure, ConfigurationNotCompatibleFailure,
    IncompatibleMultipleNodesValidationFailure, NoCompatibleVariantsFailure, NoVariantsWithMatchingCapabilitiesFailure,
    ResolutionFailureProblemId,
};
use crate::text::TreeFormatter;

/// Attribute carrying the JVM version a library targets or a consumer runs.
pub const TARGET_JVM_VERSION_ATTRIBUTE: &str = "org.gradle.jvm.version";

fn incompatible_variants_resolution(context: &DescriberContext<'_>) -> String {
    format!(
        "See the documentation on incompatible variant errors at {}.",
        context
            .documentation()
            .documentation_for("variant_model", "sub:variant-incompatible")
    )
}

pub struct AmbiguousVariantsFailureDescriber;

impl AmbiguousVariantsFailureDescriber {
    /// The single provided attribute, not requested by the consumer, whose
    /// values tell every matching variant apart.
    fn distinguishing_attribute<'a>(matching: &[&'a AssessedCandidate]) -> Option<(&'a str, Vec<(&'a AttributeValue, &'a str)>)> {
        let names: BTreeSet<&str> = matching
            .iter()
            .copied()
            .flat_map(|c| c.only_on_producer_attributes().iter().map(|a| a.attribute.name()))
            .collect();

        let mut distinguishing = names.into_iter().filter_map(|name| {
            let values: Vec<(&AttributeValue, &str)> = matching
                .iter()
                .copied()
                .filter_map(|c| {
                    c.only_on_producer_attributes()
                        .iter()
                        .find(|a| a.attribute.name() == name)
                        .and_then(|a| a.provided.as_ref())
                        .map(|value| (value, c.display_name()))
                })
                .collect();
            let distinct: BTreeSet<String> = values.iter().map(|(value, _)| value.to_string()).collect();
            (values.len() == matching.len() && distinct.len() == values.len()).then_some((name, values))
        });

        let first = distinguishing.next()?;
        distinguishing.next().is_none().then_some(first)
    }
}

impl ResolutionFailureDescriber<AmbiguousVariantsFailure> for AmbiguousVariantsFailureDescriber {
    fn describe_failure(&self, failure: &AmbiguousVariantsFailure, context: &DescriberContext<'_>) -> VariantSelectionError {
        let describer = context.attribute_describer();
        let (matching, discarded): (Vec<&AssessedCandidate>, Vec<&AssessedCandidate>) =
            failure.candidates.iter().partition(|c| c.is_compatible());

        let mut formatter = TreeFormatter::new();
        if failure.requested_attributes.is_empty() {
            formatter.node(&format!("Cannot choose between the following variants of {}", failure.target));
        } else {
            formatter.node(&format!(
                "The consumer was configured to find {}. However we cannot choose between the following variants of {}",
                describe_requested(&failure.requested_attributes, describer),
                failure.target
            ));
        }
        formatter.start_children();
        for candidate in &matching {
            formatter.node(candidate.display_name());
        }
        formatter.end_children();
        formatter.node("All of them match the consumer attributes");
        formatter.start_children();
        for candidate in &matching {
            variant_node(&mut formatter, "Variant", candidate);
            format_attribute_matches_for_ambiguity(&mut formatter, candidate, describer);
        }
        formatter.end_children();
        if !discarded.is_empty() {
            formatter.node("The following variants were also considered but didn't match the requested attributes:");
            formatter.start_children();
            for candidate in &discarded {
                variant_node(&mut formatter, "Variant", candidate);
                format_attribute_matches_for_incompatibility(&mut formatter, candidate, describer);
            }
            formatter.end_children();
        }

        let mut error = context
            .error(ResolutionFailureProblemId::AmbiguousVariants, formatter.into_string())
            .with_resolution(context.documentation().documentation_recommendation_for(
                "ambiguity errors",
                "variant_model",
                "sub:variant-ambiguity",
            ));
        if let Some((name, values)) = Self::distinguishing_attribute(&matching) {
            let mut hint = format!(
                "The only attribute distinguishing these variants is '{name}'. Add this attribute to the consumer's configuration to resolve the ambiguity:"
            );
            for (value, variant) in values {
                hint.push_str(&format!("\n   - Value: '{value}' selects variant: '{variant}'"));
            }
            error = error.with_resolution(hint);
        }
        error
    }
}

pub struct NoCompatibleVariantsFailureDescriber;

impl ResolutionFailureDescriber<NoCompatibleVariantsFailure> for NoCompatibleVariantsFailureDescriber {
    fn describe_failure(&self, failure: &NoCompatibleVariantsFailure, context: &DescriberContext<'_>) -> VariantSelectionError {
        let describer = context.attribute_describer();
        let mut formatter = TreeFormatter::new();
        if failure.requested_attributes.is_empty() {
            formatter.node(&format!("Unable to find a matching variant of {}", failure.target));
        } else {
            formatter.node(&format!(
                "No matching variant of {} was found. The consumer was configured to find {} but:",
                failure.target,
                describe_requested(&failure.requested_attributes, describer)
            ));
        }
        formatter.start_children();
        if failure.candidates.iter().all(|c| c.attributes().is_empty()) {
            formatter.node("None of the variants have attributes.");
        } else {
            for candidate in &failure.candidates {
                variant_node(&mut formatter, "Variant", candidate);
                format_attribute_matches_for_incompatibility(&mut formatter, candidate, describer);
            }
        }
        formatter.end_children();

        context
            .error(ResolutionFailureProblemId::NoCompatibleVariants, formatter.into_string())
            .with_resolution(context.documentation().documentation_recommendation_for(
                "no matching variant errors",
                "variant_model",
                "sub:variant-no-match",
            ))
    }
}

/// Metadata may carry the version as a string.
fn jvm_version(attribute: &Attribute, value: &AttributeValue) -> Option<i64> {
    value
        .coerce(&Attribute::typed(attribute.name(), AttributeKind::Integer))
        .as_integer()
}

/// Explains a failure caused only by every candidate targeting a newer JVM
/// than the consumer runs.
pub struct TargetJvmVersionTooNewFailureDescriber;

impl TargetJvmVersionTooNewFailureDescriber {
    fn requested_jvm_version(failure: &NoCompatibleVariantsFailure) -> Option<i64> {
        failure
            .requested_attributes
            .find_entry_by_name(TARGET_JVM_VERSION_ATTRIBUTE)
            .and_then(|(attribute, value)| jvm_version(attribute, value))
    }

    fn provided_jvm_version(candidate: &AssessedCandidate) -> Option<i64> {
        candidate
            .incompatible_attributes()
            .iter()
            .find(|a| a.attribute.name() == TARGET_JVM_VERSION_ATTRIBUTE)
            .and_then(|a| a.provided.as_ref().and_then(|value| jvm_version(&a.attribute, value)))
    }

    fn minimum_required(failure: &NoCompatibleVariantsFailure) -> Option<i64> {
        failure.candidates.iter().filter_map(Self::provided_jvm_version).min()
    }
}

impl ResolutionFailureDescriber<NoCompatibleVariantsFailure> for TargetJvmVersionTooNewFailureDescriber {
    fn can_describe_failure(&self, failure: &NoCompatibleVariantsFailure) -> bool {
        let Some(requested) = Self::requested_jvm_version(failure) else {
            return false;
        };
        !failure.candidates.is_empty()
            && failure.candidates.iter().all(|candidate| {
                candidate.incompatible_attributes().len() == 1
                    && Self::provided_jvm_version(candidate).is_some_and(|provided| provided > requested)
            })
    }

    fn describe_failure(&self, failure: &NoCompatibleVariantsFailure, context: &DescriberContext<'_>) -> VariantSelectionError {
        let requested = Self::requested_jvm_version(failure).unwrap_or_default();
        let minimum = Self::minimum_required(failure).unwrap_or_default();
        let message = format!(
            "Dependency resolution is looking for a library compatible with JVM runtime version {requested}, but '{}' is only compatible with JVM runtime version {minimum} or newer.",
            failure.target
        );
        context
            .error(ResolutionFailureProblemId::NoCompatibleVariants, message)
            .with_resolution(format!(
                "Change the dependency on '{}' to an earlier version that supports JVM runtime version {requested}.",
                failure.target
            ))
            .with_resolution(format!(
                "Update the consumer to run on JVM runtime version {minimum} or newer."
            ))
    }
}

pub struct ConfigurationNotCompatibleFailureDescriber;

impl ResolutionFailureDescriber<ConfigurationNotCompatibleFailure> for ConfigurationNotCompatibleFailureDescriber {
    fn describe_failure(
        &self,
        failure: &ConfigurationNotCompatibleFailure,
        context: &DescriberContext<'_>,
    ) -> VariantSelectionError {
        let mut formatter = TreeFormatter::new();
        formatter.node(&format!(
            "Configuration '{}' in {} does not match the consumer attributes",
            failure.configuration, failure.target
        ));
        for candidate in &failure.candidates {
            variant_node(&mut formatter, "Configuration", candidate);
            format_attribute_matches_for_incompatibility(&mut formatter, candidate, context.attribute_describer());
        }

        context
            .error(ResolutionFailureProblemId::ConfigurationNotCompatible, formatter.into_string())
            .with_resolution(incompatible_variants_resolution(context))
    }
}

pub struct ConfigurationDoesNotExistFailureDescriber;

impl ResolutionFailureDescriber<ConfigurationDoesNotExistFailure> for ConfigurationDoesNotExistFailureDescriber {
    fn describe_failure(
        &self,
        failure: &ConfigurationDoesNotExistFailure,
        context: &DescriberContext<'_>,
    ) -> VariantSelectionError {
        let message = match &failure.declared_by {
            Some((component, configuration)) => format!(
                "{} declares a dependency from configuration '{}' to configuration '{}' which is not declared in the descriptor for {}.",
                capitalize(component),
                configuration,
                failure.configuration,
                failure.target
            ),
            None => format!(
                "A dependency was declared on configuration '{}' which is not declared in the descriptor for {}.",
                failure.configuration, failure.target
            ),
        };
        context.error(ResolutionFailureProblemId::ConfigurationDoesNotExist, message)
    }
}

pub struct NoVariantsWithMatchingCapabilitiesFailureDescriber;

impl ResolutionFailureDescriber<NoVariantsWithMatchingCapabilitiesFailure>
    for NoVariantsWithMatchingCapabilitiesFailureDescriber
{
    fn describe_failure(
        &self,
        failure: &NoVariantsWithMatchingCapabilitiesFailure,
        context: &DescriberContext<'_>,
    ) -> VariantSelectionError {
        let mut message = format!(
            "Unable to find a variant of {} providing the requested {}:",
            failure.target,
            describe_capabilities(&failure.requested_capabilities)
        );
        for candidate in &failure.candidates {
            message.push_str(&format!(
                "\n   - Variant {} provides {}",
                candidate.display_name(),
                describe_capabilities(candidate.capabilities())
            ));
        }
        context.error(ResolutionFailureProblemId::NoVariantsWithMatchingCapabilities, message)
    }
}

pub struct IncompatibleMultipleNodesValidationFailureDescriber;

impl ResolutionFailureDescriber<IncompatibleMultipleNodesValidationFailure>
    for IncompatibleMultipleNodesValidationFailureDescriber
{
    fn describe_failure(
        &self,
        failure: &IncompatibleMultipleNodesValidationFailure,
        context: &DescriberContext<'_>,
    ) -> VariantSelectionError {
        let mut message = format!("Multiple incompatible variants of {} were selected:", failure.target);
        for candidate in &failure.candidates {
            message.push_str(&format!(
                "\n   - Variant {} has attributes {}",
                candidate.display_name(),
                candidate.attributes()
            ));
        }
        context
            .error(ResolutionFailureProblemId::IncompatibleMultipleNodes, message)
            .with_resolution(incompatible_variants_resolution(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::attribute::ImmutableAttributes;
    use crate::attributes::capability::Capability;
    use crate::attributes::describer::DefaultAttributeDescriber;
    use crate::attributes::schema::{AttributesSchema, OrderedCompatibility};
    use crate::documentation::DocumentationRegistry;
    use crate::resolution::assessor::ResolutionCandidateAssessor;
    use crate::resolution::model::{GraphVariant, NodeState};

    fn describe<F, D: ResolutionFailureDescriber<F>>(describer: &D, failure: &F) -> VariantSelectionError {
        let documentation = DocumentationRegistry::default();
        let context = DescriberContext::new(&documentation, &DefaultAttributeDescriber);
        describer.describe_failure(failure, &context)
    }

    fn jvm(version: i64) -> ImmutableAttributes {
        ImmutableAttributes::empty().with(Attribute::typed(TARGET_JVM_VERSION_ATTRIBUTE, AttributeKind::Integer), version)
    }

    fn jvm_failure(requested: i64, provided: &[i64]) -> NoCompatibleVariantsFailure {
        let requested = jvm(requested);
        let schema = AttributesSchema::new().with_compatibility_rule(TARGET_JVM_VERSION_ATTRIBUTE, OrderedCompatibility);
        let variants: Vec<GraphVariant> = provided
            .iter()
            .map(|v| GraphVariant::new(&format!("jdk{v}"), jvm(*v)))
            .collect();
        let candidates = ResolutionCandidateAssessor::new(&requested, &schema).assess_graph_variants(&variants);
        NoCompatibleVariantsFailure {
            target: "org:lib:2.0".to_string(),
            requested_attributes: requested,
            candidates,
        }
    }

    #[test]
    fn ambiguous_variants_lists_matches_and_discarded() {
        let requested = ImmutableAttributes::of(&[("usage", "api")]);
        let schema = AttributesSchema::new();
        let variants = vec![
            GraphVariant::new("apiElements", ImmutableAttributes::of(&[("usage", "api"), ("flavor", "free")])),
            GraphVariant::new("paidApiElements", ImmutableAttributes::of(&[("usage", "api"), ("flavor", "paid")])),
            GraphVariant::new("runtimeElements", ImmutableAttributes::of(&[("usage", "runtime")])),
        ];
        let failure = AmbiguousVariantsFailure {
            target: "org:lib:1.0".to_string(),
            candidates: ResolutionCandidateAssessor::new(&requested, &schema).assess_graph_variants(&variants),
            requested_attributes: requested,
        };

        let error = describe(&AmbiguousVariantsFailureDescriber, &failure);

        assert_eq!(error.problem_id(), ResolutionFailureProblemId::AmbiguousVariants);
        assert!(error.message().starts_with(
            "The consumer was configured to find attribute 'usage' with value 'api'. However we cannot choose between the following variants of org:lib:1.0:\n  - apiElements\n  - paidApiElements\nAll of them match the consumer attributes:"
        ));
        assert!(error.message().contains("The following variants were also considered but didn't match the requested attributes:\n  - Variant 'runtimeElements'"));
        assert_eq!(error.resolutions().len(), 3);
        assert_eq!(
            error.resolutions()[2],
            "The only attribute distinguishing these variants is 'flavor'. Add this attribute to the consumer's configuration to resolve the ambiguity:\n   - Value: 'free' selects variant: 'apiElements'\n   - Value: 'paid' selects variant: 'paidApiElements'"
        );
    }

    #[test]
    fn ambiguous_variants_without_single_distinguishing_attribute_has_no_hint() {
        let requested = ImmutableAttributes::empty();
        let schema = AttributesSchema::new();
        let variants = vec![
            GraphVariant::new("a", ImmutableAttributes::of(&[("x", "1"), ("y", "1")])),
            GraphVariant::new("b", ImmutableAttributes::of(&[("x", "2"), ("y", "2")])),
        ];
        let failure = AmbiguousVariantsFailure {
            target: "org:lib:1.0".to_string(),
            candidates: ResolutionCandidateAssessor::new(&requested, &schema).assess_graph_variants(&variants),
            requested_attributes: requested,
        };

        let error = describe(&AmbiguousVariantsFailureDescriber, &failure);

        assert!(error.message().starts_with("Cannot choose between the following variants of org:lib:1.0"));
        assert_eq!(error.resolutions().len(), 2);
    }

    #[test]
    fn no_compatible_variants_without_attributes() {
        let failure = NoCompatibleVariantsFailure {
            target: "org:lib:1.0".to_string(),
            requested_attributes: ImmutableAttributes::of(&[("usage", "api")]),
            candidates: Vec::new(),
        };

        let error = describe(&NoCompatibleVariantsFailureDescriber, &failure);

        assert_eq!(
            error.message(),
            "No matching variant of org:lib:1.0 was found. The consumer was configured to find attribute 'usage' with value 'api' but:\n  - None of the variants have attributes."
        );
        assert_eq!(
            error.documentation_link(),
            "https://docs.gradle.org/current/userguide/variant_model.html#sub:variant-no-match"
        );
    }

    #[test]
    fn jvm_describer_accepts_only_jvm_mismatch() {
        assert!(TargetJvmVersionTooNewFailureDescriber.can_describe_failure(&jvm_failure(11, &[17, 21])));
        assert!(!TargetJvmVersionTooNewFailureDescriber.can_describe_failure(&jvm_failure(11, &[])));

        let mut mixed = jvm_failure(11, &[17]);
        mixed.requested_attributes = ImmutableAttributes::of(&[("usage", "api")]);
        assert!(!TargetJvmVersionTooNewFailureDescriber.can_describe_failure(&mixed));
    }

    #[test]
    fn jvm_describer_reports_minimum_version() {
        let error = describe(&TargetJvmVersionTooNewFailureDescriber, &jvm_failure(11, &[21, 17]));

        assert_eq!(
            error.message(),
            "Dependency resolution is looking for a library compatible with JVM runtime version 11, but 'org:lib:2.0' is only compatible with JVM runtime version 17 or newer."
        );
    }

    #[test]
    fn configuration_does_not_exist_messages() {
        let mut failure = ConfigurationDoesNotExistFailure {
            target: "org:lib:1.0".to_string(),
            configuration: "shaded".to_string(),
            declared_by: None,
        };
        assert_eq!(
            describe(&ConfigurationDoesNotExistFailureDescriber, &failure).message(),
            "A dependency was declared on configuration 'shaded' which is not declared in the descriptor for org:lib:1.0."
        );

        failure.declared_by = Some(("project :app".to_string(), "runtimeClasspath".to_string()));
        assert_eq!(
            describe(&ConfigurationDoesNotExistFailureDescriber, &failure).message(),
            "Project :app declares a dependency from configuration 'runtimeClasspath' to configuration 'shaded' which is not declared in the descriptor for org:lib:1.0."
        );
    }

    #[test]
    fn no_matching_capabilities_lists_variants() {
        let requested = ImmutableAttributes::empty();
        let schema = AttributesSchema::new();
        let variants = vec![
            GraphVariant::new("apiElements", ImmutableAttributes::empty())
                .with_capability(Capability::new("org", "lib", Some("1.0"))),
        ];
        let failure = NoVariantsWithMatchingCapabilitiesFailure {
            target: "org:lib:1.0".to_string(),
            requested_capabilities: vec![Capability::new("org", "lib-test-fixtures", None)],
            candidates: ResolutionCandidateAssessor::new(&requested, &schema).assess_graph_variants(&variants),
            requested_attributes: requested,
        };

        assert_eq!(
            describe(&NoVariantsWithMatchingCapabilitiesFailureDescriber, &failure).message(),
            "Unable to find a variant of org:lib:1.0 providing the requested capability org:lib-test-fixtures:\n   - Variant apiElements provides capability org:lib:1.0"
        );
    }

    #[test]
    fn incompatible_nodes_lists_attributes() {
        let requested = ImmutableAttributes::empty();
        let schema = AttributesSchema::new();
        let nodes = vec![
            NodeState::new("org:lib:1.0", "api", ImmutableAttributes::of(&[("usage", "api")])),
            NodeState::new("org:lib:1.0", "runtime", ImmutableAttributes::of(&[("usage", "runtime")])),
        ];
        let failure = IncompatibleMultipleNodesValidationFailure {
            target: "org:lib:1.0".to_string(),
            candidates: ResolutionCandidateAssessor::new(&requested, &schema).assess_node_states(&nodes),
        };

        let error = describe(&IncompatibleMultipleNodesValidationFailureDescriber, &failure);

        assert_eq!(
            error.message(),
            "Multiple incompatible variants of org:lib:1.0 were selected:\n   - Variant org:lib:1.0 variant api has attributes {usage=api}\n   - Variant org:lib:1.0 variant runtime has attributes {usage=runtime}"
        );
        assert_eq!(error.resolutions().len(), 2);
    }
}
