//! Failure describers
//!
//! A describer turns one kind of [`ResolutionFailure`] into a
//! [`VariantSelectionError`]. Describers are registered per failure variant in a
//! [`ResolutionFailureDescriberRegistry`]; the first registered describer whose
//! [`can_describe_failure`](ResolutionFailureDescriber::can_describe_failure)
//! accepts the failure wins.

pub mod artifacts;
pub mod format;
pub mod registry;
pub mod variants;

use std::any::type_name;
use std::marker::PhantomData;

use crate::attributes::describer::AttributeDescriber;
use crate::documentation::DocumentationRegistry;
use crate::resolution::error::VariantSelectionError;
use crate::resolution::failure::{FailureVariant, ResolutionFailure, ResolutionFailureProblemId};

pub use registry::ResolutionFailureDescriberRegistry;

/// Everything a describer may need beyond the failure itself.
pub struct DescriberContext<'a> {
    documentation: &'a DocumentationRegistry,
    attribute_describer: &'a dyn AttributeDescriber,
}

impl<'a> DescriberContext<'a> {
    pub fn new(documentation: &'a DocumentationRegistry, attribute_describer: &'a dyn AttributeDescriber) -> Self {
        Self {
            documentation,
            attribute_describer,
        }
    }

    pub fn documentation(&self) -> &DocumentationRegistry {
        self.documentation
    }

    pub fn attribute_describer(&self) -> &dyn AttributeDescriber {
        self.attribute_describer
    }

    /// A new error linked to the documentation section for `problem_id`,
    /// carrying the generic "review the algorithm" resolution.
    pub fn error(&self, problem_id: ResolutionFailureProblemId, message: String) -> VariantSelectionError {
        let (page, section) = problem_id.documentation_section();
        VariantSelectionError::new(problem_id, message, self.documentation.documentation_for(page, section))
            .with_resolution(format!(
                "Review the variant matching algorithm at {}.",
                self.documentation.documentation_for("variant_attributes", "sec:abm_algorithm")
            ))
    }
}

pub trait ResolutionFailureDescriber<F>: Send + Sync {
    fn can_describe_failure(&self, _failure: &F) -> bool {
        true
    }

    fn describe_failure(&self, failure: &F, context: &DescriberContext<'_>) -> VariantSelectionError;
}

/// Type-erased describer stored in a registry.
pub(crate) trait RegisteredDescriber: Send + Sync {
    fn describer_name(&self) -> &'static str;

    /// `None` when the failure is of another variant or the describer declines it.
    fn try_describe(&self, failure: &ResolutionFailure, context: &DescriberContext<'_>) -> Option<VariantSelectionError>;
}

pub(crate) struct TypedDescriber<F, D> {
    describer: D,
    _failure: PhantomData<fn(&F)>,
}

impl<F, D> TypedDescriber<F, D> {
    pub(crate) fn new(describer: D) -> Self {
        Self {
            describer,
            _failure: PhantomData,
        }
    }
}

impl<F, D> RegisteredDescriber for TypedDescriber<F, D>
where
    F: FailureVariant,
    D: ResolutionFailureDescriber<F>,
{
    fn describer_name(&self) -> &'static str {
        type_name::<D>()
    }

    fn try_describe(&self, failure: &ResolutionFailure, context: &DescriberContext<'_>) -> Option<VariantSelectionError> {
        let failure = F::from_failure(failure)?;
        if !self.describer.can_describe_failure(failure) {
            return None;
        }
        Some(self.describer.describe_failure(failure, context))
    }
}
