//! Attribute schema: compatibility rules and schema-specific failure describers

use std::collections::HashMap;
use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

use crate::attributes::attribute::{Attribute, AttributeValue};
use crate::attributes::describer::{AttributeDescriber, DefaultAttributeDescriber};
use crate::resolution::describer::ResolutionFailureDescriber;
use crate::resolution::describer::registry::ResolutionFailureDescriberRegistry;
use crate::resolution::failure::FailureVariant;

/// Decides whether a candidate's attribute value satisfies a requested one.
#[cfg_attr(test, automock)]
pub trait AttributeMatcher: Send + Sync {
    fn is_matching(&self, attribute: &Attribute, candidate: &AttributeValue, requested: &AttributeValue) -> bool;
}

/// Extra compatibility for an attribute when the values are not equal.
pub trait CompatibilityRule: Send + Sync {
    fn is_compatible(&self, producer: &AttributeValue, consumer: &AttributeValue) -> bool;
}

/// Integer values are compatible when the producer's is not greater than the consumer's.
///
/// This is how a library built for Java 11 is usable by a consumer running Java 17.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderedCompatibility;

impl CompatibilityRule for OrderedCompatibility {
    fn is_compatible(&self, producer: &AttributeValue, consumer: &AttributeValue) -> bool {
        match (producer.as_integer(), consumer.as_integer()) {
            (Some(producer), Some(consumer)) => producer <= consumer,
            _ => false,
        }
    }
}

pub struct AttributesSchema {
    rules: HashMap<String, Arc<dyn CompatibilityRule>>,
    failure_describers: ResolutionFailureDescriberRegistry,
    attribute_describer: Arc<dyn AttributeDescriber>,
}

impl Default for AttributesSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributesSchema {
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
            failure_describers: ResolutionFailureDescriberRegistry::empty(),
            attribute_describer: Arc::new(DefaultAttributeDescriber),
        }
    }

    pub fn with_compatibility_rule(mut self, attribute: &str, rule: impl CompatibilityRule + 'static) -> Self {
        self.rules.insert(attribute.to_string(), Arc::new(rule));
        self
    }

    pub fn with_attribute_describer(mut self, describer: impl AttributeDescriber + 'static) -> Self {
        self.attribute_describer = Arc::new(describer);
        self
    }

    /// Register a describer that takes precedence over the built-in ones for
    /// failures resolved against this schema.
    pub fn add_failure_describer<F, D>(&mut self, describer: D)
    where
        F: FailureVariant,
        D: ResolutionFailureDescriber<F> + 'static,
    {
        self.failure_describers.register_describer::<F, D>(describer);
    }

    pub fn failure_describers(&self) -> &ResolutionFailureDescriberRegistry {
        &self.failure_describers
    }

    pub fn attribute_describer(&self) -> &dyn AttributeDescriber {
        self.attribute_describer.as_ref()
    }
}

impl AttributeMatcher for AttributesSchema {
    fn is_matching(&self, attribute: &Attribute, candidate: &AttributeValue, requested: &AttributeValue) -> bool {
        if candidate == requested {
            return true;
        }
        self.rules
            .get(attribute.name())
            .is_some_and(|rule| rule.is_compatible(candidate, requested))
    }
}
