use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::resolution::describer::artifacts::{
    AmbiguousArtifactTransformsFailureDescriber, AmbiguousArtifactsFailureDescriber,
    NoCompatibleArtifactFailureDescriber, UnknownArtifactSelectionFailureDescriber,
};
use crate::resolution::describer::variants::{
    AmbiguousVariantsFailureDescriber, ConfigurationDoesNotExistFailureDescriber,
    ConfigurationNotCompatibleFailureDescriber, IncompatibleMultipleNodesValidationFailureDescriber,
    NoCompatibleVariantsFailureDescriber, NoVariantsWithMatchingCapabilitiesFailureDescriber,
    TargetJvmVersionTooNewFailureDescriber,
};
use crate::resolution::describer::{RegisteredDescriber, ResolutionFailureDescriber, TypedDescriber};
use crate::resolution::failure::{
    AmbiguousArtifactTransformsFailure, AmbiguousArtifactsFailure, AmbiguousVariantsFailure,
    ConfigurationDoesNotExistFailure, ConfigurationNotCompatibleFailure, FailureVariant,
    IncompatibleMultipleNodesValidationFailure, NoCompatibleArtifactFailure, NoCompatibleVariantsFailure,
    NoVariantsWithMatchingCapabilitiesFailure, ResolutionFailure, ResolutionFailureProblemId,
    UnknownArtifactSelectionFailure,
};

/// Ordered describers per failure kind.
#[derive(Clone, Default)]
pub struct ResolutionFailureDescriberRegistry {
    describers: HashMap<ResolutionFailureProblemId, Vec<Arc<dyn RegisteredDescriber>>>,
}

impl fmt::Debug for ResolutionFailureDescriberRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (id, describers) in &self.describers {
            let names: Vec<&str> = describers.iter().map(|d| d.describer_name()).collect();
            map.entry(id, &names);
        }
        map.finish()
    }
}

impl ResolutionFailureDescriberRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in describers. More specific describers come before the
    /// generic one for the same failure kind.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register_describer::<AmbiguousVariantsFailure, _>(AmbiguousVariantsFailureDescriber);
        registry.register_describer::<AmbiguousArtifactTransformsFailure, _>(AmbiguousArtifactTransformsFailureDescriber);
        registry.register_describer::<AmbiguousArtifactsFailure, _>(AmbiguousArtifactsFailureDescriber);
        registry.register_describer::<ConfigurationDoesNotExistFailure, _>(ConfigurationDoesNotExistFailureDescriber);
        registry.register_describer::<ConfigurationNotCompatibleFailure, _>(ConfigurationNotCompatibleFailureDescriber);
        registry.register_describer::<IncompatibleMultipleNodesValidationFailure, _>(
            IncompatibleMultipleNodesValidationFailureDescriber,
        );
        registry.register_describer::<NoCompatibleArtifactFailure, _>(NoCompatibleArtifactFailureDescriber);
        registry.register_describer::<NoCompatibleVariantsFailure, _>(TargetJvmVersionTooNewFailureDescriber);
        registry.register_describer::<NoCompatibleVariantsFailure, _>(NoCompatibleVariantsFailureDescriber);
        registry.register_describer::<NoVariantsWithMatchingCapabilitiesFailure, _>(
            NoVariantsWithMatchingCapabilitiesFailureDescriber,
        );
        registry.register_describer::<UnknownArtifactSelectionFailure, _>(UnknownArtifactSelectionFailureDescriber);
        registry
    }

    /// Append a describer for failures of type `F`; earlier registrations win.
    pub fn register_describer<F, D>(&mut self, describer: D)
    where
        F: FailureVariant,
        D: ResolutionFailureDescriber<F> + 'static,
    {
        let describer: Arc<dyn RegisteredDescriber> = Arc::new(TypedDescriber::<F, D>::new(describer));
        debug!(
            problem_id = %F::PROBLEM_ID,
            describer = describer.describer_name(),
            "Registered resolution failure describer"
        );
        self.describers.entry(F::PROBLEM_ID).or_default().push(describer);
    }

    pub(crate) fn describers_for(&self, failure: &ResolutionFailure) -> &[Arc<dyn RegisteredDescriber>] {
        self.describers
            .get(&failure.problem_id())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn describer_count(&self, problem_id: ResolutionFailureProblemId) -> usize {
        self.describers.get(&problem_id).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.describers.values().all(Vec::is_empty)
    }
}
