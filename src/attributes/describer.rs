//! Human-readable rendering of attributes in diagnostics

use crate::attributes::attribute::{Attribute, AttributeValue};

/// Renders attributes for failure messages. Schemas may install their own to
/// describe well-known attributes in domain terms.
pub trait AttributeDescriber: Send + Sync {
    fn describe_attribute_set(&self, attributes: &[(&Attribute, &AttributeValue)]) -> String;

    /// An attribute the consumer asked for but the candidate does not declare.
    fn describe_missing_attribute(&self, attribute: &Attribute, requested: &AttributeValue) -> String;

    /// An attribute the candidate declares but the consumer did not ask for.
    fn describe_extra_attribute(&self, attribute: &Attribute, provided: &AttributeValue) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAttributeDescriber;

impl AttributeDescriber for DefaultAttributeDescriber {
    fn describe_attribute_set(&self, attributes: &[(&Attribute, &AttributeValue)]) -> String {
        attributes
            .iter()
            .map(|(attribute, value)| format!("attribute '{}' with value '{}'", attribute.name(), value))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn describe_missing_attribute(&self, attribute: &Attribute, requested: &AttributeValue) -> String {
        format!("attribute '{}' (required '{}')", attribute.name(), requested)
    }

    fn describe_extra_attribute(&self, attribute: &Attribute, provided: &AttributeValue) -> String {
        format!("attribute '{}' with value '{}'", attribute.name(), provided)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_attribute_set_joins_entries() {
        let usage = Attribute::of("usage");
        let category = Attribute::of("category");
        let api = AttributeValue::from("api");
        let library = AttributeValue::from("library");

        assert_eq!(
            DefaultAttributeDescriber.describe_attribute_set(&[(&usage, &api), (&category, &library)]),
            "attribute 'usage' with value 'api', attribute 'category' with value 'library'"
        );
    }

    #[test]
    fn describe_missing_attribute_shows_requirement() {
        assert_eq!(
            DefaultAttributeDescriber
                .describe_missing_attribute(&Attribute::of("usage"), &AttributeValue::from("api")),
            "attribute 'usage' (required 'api')"
        );
    }
}
