//! Attribute model used for variant-aware matching
//!
//! Consumers request a set of [`ImmutableAttributes`]; producers expose
//! variants carrying their own attributes and [`Capability`] set. The
//! [`AttributesSchema`] decides which values are compatible and may carry
//! failure describers that override the built-in ones.

pub mod attribute;
pub mod capability;
pub mod describer;
pub mod schema;

pub use attribute::{Attribute, AttributeKind, AttributeValue, ImmutableAttributes};
pub use capability::Capability;
pub use describer::{AttributeDescriber, DefaultAttributeDescriber};
pub use schema::{AttributeMatcher, AttributesSchema, CompatibilityRule, OrderedCompatibility};
