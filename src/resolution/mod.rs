//! Variant resolution failure assessment and reporting
//!
//! When variant or artifact selection fails, the
//! [`ResolutionCandidateAssessor`] compares every candidate with the request.
//! The result is packaged as a [`ResolutionFailure`] and handed to the
//! [`ResolutionFailureHandler`], which picks a describer, reports a problem
//! and returns a [`VariantSelectionError`].

pub mod assessor;
pub mod describer;
pub mod error;
pub mod failure;
pub mod handler;
pub mod model;
pub mod variant_selector;

pub use assessor::{AssessedAttribute, AssessedCandidate, ResolutionCandidateAssessor};
pub use describer::{DescriberContext, ResolutionFailureDescriber, ResolutionFailureDescriberRegistry};
pub use error::VariantSelectionError;
pub use failure::{FailureVariant, ResolutionFailure, ResolutionFailureProblemId};
pub use handler::ResolutionFailureHandler;
pub use model::{CandidateVariant, GraphVariant, NodeState, ResolvedVariant, TransformedVariant};
pub use variant_selector::VariantSelector;
