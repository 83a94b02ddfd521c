//! Attribute-based selection of one graph variant

use tracing::debug;

use crate::attributes::attribute::ImmutableAttributes;
use crate::attributes::capability::Capability;
use crate::attributes::schema::AttributesSchema;
use crate::resolution::assessor::{AssessedCandidate, ResolutionCandidateAssessor};
use crate::resolution::failure::{
    AmbiguousVariantsFailure, NoCompatibleVariantsFailure, NoVariantsWithMatchingCapabilitiesFailure,
    ResolutionFailure,
};
use crate::resolution::model::GraphVariant;

pub struct VariantSelector<'a> {
    schema: &'a AttributesSchema,
}

impl<'a> VariantSelector<'a> {
    pub fn new(schema: &'a AttributesSchema) -> Self {
        Self { schema }
    }

    /// Select the single variant of `target` providing every requested
    /// capability and matching every requested attribute it declares.
    ///
    /// Failures are returned as data so callers can inspect them before
    /// handing them to the failure handler.
    pub fn select<'c>(
        &self,
        target: &str,
        requested: &ImmutableAttributes,
        requested_capabilities: &[Capability],
        candidates: &'c [GraphVariant],
    ) -> Result<&'c GraphVariant, ResolutionFailure> {
        let assessor = ResolutionCandidateAssessor::new(requested, self.schema);

        let with_capabilities: Vec<&GraphVariant> = candidates
            .iter()
            .filter(|variant| {
                requested_capabilities
                    .iter()
                    .all(|requested| variant.capabilities.iter().any(|c| c.provides(requested)))
            })
            .collect();
        if with_capabilities.is_empty() && !candidates.is_empty() {
            return Err(NoVariantsWithMatchingCapabilitiesFailure {
                target: target.to_string(),
                requested_attributes: requested.clone(),
                requested_capabilities: requested_capabilities.to_vec(),
                candidates: assessor.assess_graph_variants(candidates),
            }
            .into());
        }

        let mut assessed: Vec<(&GraphVariant, AssessedCandidate)> = with_capabilities
            .into_iter()
            .map(|variant| {
                let candidate = assessor.assess_candidate(&variant.name, &variant.capabilities, &variant.attributes);
                (variant, candidate)
            })
            .collect();
        assessed.sort_by(|a, b| a.1.display_name().cmp(b.1.display_name()));

        let matching: Vec<&GraphVariant> = assessed
            .iter()
            .filter(|(_, candidate)| candidate.is_compatible())
            .map(|(variant, _)| *variant)
            .collect();
        debug!(
            component = target,
            candidates = assessed.len(),
            matching = matching.len(),
            "Selecting variant"
        );

        match matching.as_slice() {
            [selected] => Ok(*selected),
            [] => Err(NoCompatibleVariantsFailure {
                target: target.to_string(),
                requested_attributes: requested.clone(),
                candidates: assessed.into_iter().map(|(_, candidate)| candidate).collect(),
            }
            .into()),
            _ => Err(AmbiguousVariantsFailure {
                target: target.to_string(),
                requested_attributes: requested.clone(),
                candidates: assessed.into_iter().map(|(_, candidate)| candidate).collect(),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolution::failure::ResolutionFailureProblemId;

    fn variants() -> Vec<GraphVariant> {
        vec![
            GraphVariant::new("apiElements", ImmutableAttributes::of(&[("usage", "api")]))
                .with_capability(Capability::new("org", "lib", Some("1.0"))),
            GraphVariant::new("runtimeElements", ImmutableAttributes::of(&[("usage", "runtime")]))
                .with_capability(Capability::new("org", "lib", Some("1.0"))),
            GraphVariant::new("testFixturesApiElements", ImmutableAttributes::of(&[("usage", "api")]))
                .with_capability(Capability::new("org", "lib-test-fixtures", Some("1.0"))),
        ]
    }

    #[test]
    fn selects_single_match() {
        let schema = AttributesSchema::new();
        let candidates = variants();
        let requested = ImmutableAttributes::of(&[("usage", "runtime")]);

        let selected = VariantSelector::new(&schema)
            .select("org:lib:1.0", &requested, &[], &candidates)
            .unwrap();

        assert_eq!(selected.name, "runtimeElements");
    }

    #[test]
    fn capabilities_narrow_the_candidates() {
        let schema = AttributesSchema::new();
        let candidates = variants();
        let requested = ImmutableAttributes::of(&[("usage", "api")]);
        let fixtures = [Capability::new("org", "lib-test-fixtures", None)];

        let selected = VariantSelector::new(&schema)
            .select("org:lib:1.0", &requested, &fixtures, &candidates)
            .unwrap();

        assert_eq!(selected.name, "testFixturesApiElements");
    }

    #[test]
    fn ambiguous_when_several_match() {
        let schema = AttributesSchema::new();
        let candidates = variants();
        let requested = ImmutableAttributes::of(&[("usage", "api")]);

        let failure = VariantSelector::new(&schema)
            .select("org:lib:1.0", &requested, &[], &candidates)
            .unwrap_err();

        assert_eq!(failure.problem_id(), ResolutionFailureProblemId::AmbiguousVariants);
    }

    #[test]
    fn no_compatible_variant() {
        let schema = AttributesSchema::new();
        let candidates = variants();
        let requested = ImmutableAttributes::of(&[("usage", "docs")]);

        let failure = VariantSelector::new(&schema)
            .select("org:lib:1.0", &requested, &[], &candidates)
            .unwrap_err();

        assert_eq!(failure.problem_id(), ResolutionFailureProblemId::NoCompatibleVariants);
        let ResolutionFailure::NoCompatibleVariants(failure) = failure else {
            panic!("unexpected failure kind");
        };
        assert_eq!(failure.candidates.len(), 3);
    }

    #[test]
    fn no_variant_with_capability() {
        let schema = AttributesSchema::new();
        let candidates = variants();
        let missing = [Capability::new("org", "lib-docs", None)];

        let failure = VariantSelector::new(&schema)
            .select("org:lib:1.0", &ImmutableAttributes::empty(), &missing, &candidates)
            .unwrap_err();

        assert_eq!(
            failure.problem_id(),
            ResolutionFailureProblemId::NoVariantsWithMatchingCapabilities
        );
    }
}
