//! Shared message formatting for failure describers

use crate::attributes::attribute::{Attribute, AttributeValue, ImmutableAttributes};
use crate::attributes::capability::describe_capabilities;
use crate::attributes::describer::AttributeDescriber;
use crate::resolution::assessor::{AssessedAttribute, AssessedCandidate};
use crate::text::TreeFormatter;

pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn describe_requested(attributes: &ImmutableAttributes, describer: &dyn AttributeDescriber) -> String {
    describer.describe_attribute_set(&attributes.sorted())
}

fn provided_values(attributes: &[AssessedAttribute]) -> Vec<(&Attribute, &AttributeValue)> {
    attributes
        .iter()
        .filter_map(|a| a.provided.as_ref().map(|value| (&a.attribute, value)))
        .collect()
}

fn requested_values(attributes: &[AssessedAttribute]) -> Vec<(&Attribute, &AttributeValue)> {
    attributes
        .iter()
        .filter_map(|a| a.requested.as_ref().map(|value| (&a.attribute, value)))
        .collect()
}

fn missing_lines(candidate: &AssessedCandidate, describer: &dyn AttributeDescriber) -> Vec<(String, String)> {
    candidate
        .only_on_consumer_attributes()
        .iter()
        .filter_map(|a| {
            a.requested.as_ref().map(|value| {
                (
                    a.attribute.name().to_string(),
                    format!(
                        "Doesn't say anything about {}",
                        describer.describe_missing_attribute(&a.attribute, value)
                    ),
                )
            })
        })
        .collect()
}

fn section(formatter: &mut TreeFormatter, title: &str, values: &[String]) {
    if values.is_empty() {
        return;
    }
    if values.len() > 1 {
        formatter.node(&format!("{title}s"));
    } else {
        formatter.node(title);
    }
    formatter.start_children();
    for value in values {
        formatter.node(value);
    }
    formatter.end_children();
}

fn declares_compatible(formatter: &mut TreeFormatter, candidate: &AssessedCandidate, describer: &dyn AttributeDescriber) {
    let compatible = provided_values(candidate.compatible_attributes());
    if !compatible.is_empty() {
        formatter.append(" declares ").append(&describer.describe_attribute_set(&compatible));
    }
}

/// Explain why `candidate` was rejected.
pub fn format_attribute_matches_for_incompatibility(
    formatter: &mut TreeFormatter,
    candidate: &AssessedCandidate,
    describer: &dyn AttributeDescriber,
) {
    declares_compatible(formatter, candidate, describer);
    formatter.start_children();
    let incompatible = candidate.incompatible_attributes();
    if !incompatible.is_empty() {
        formatter.node(&format!(
            "Incompatible because this component declares {} and the consumer needed {}",
            describer.describe_attribute_set(&provided_values(incompatible)),
            describer.describe_attribute_set(&requested_values(incompatible))
        ));
    }
    let others: Vec<String> = missing_lines(candidate, describer).into_iter().map(|(_, line)| line).collect();
    section(formatter, "Other compatible attribute", &others);
    formatter.end_children();
}

/// Explain how a matching `candidate` differs from the other matches.
pub fn format_attribute_matches_for_ambiguity(
    formatter: &mut TreeFormatter,
    candidate: &AssessedCandidate,
    describer: &dyn AttributeDescriber,
) {
    declares_compatible(formatter, candidate, describer);
    let mut unmatched = missing_lines(candidate, describer);
    unmatched.extend(candidate.only_on_producer_attributes().iter().filter_map(|a| {
        a.provided.as_ref().map(|value| {
            (
                a.attribute.name().to_string(),
                format!(
                    "Provides {} but the consumer didn't ask for it",
                    describer.describe_extra_attribute(&a.attribute, value)
                ),
            )
        })
    }));
    unmatched.sort_by(|a, b| a.0.cmp(&b.0));
    let unmatched: Vec<String> = unmatched.into_iter().map(|(_, line)| line).collect();

    formatter.start_children();
    section(formatter, "Unmatched attribute", &unmatched);
    formatter.end_children();
}

/// Start a `Variant 'name' capabilities` node for `candidate`.
pub fn variant_node(formatter: &mut TreeFormatter, label: &str, candidate: &AssessedCandidate) {
    formatter.node(&format!("{} '{}'", label, candidate.display_name()));
    if !candidate.capabilities().is_empty() {
        formatter.append(" ").append(&describe_capabilities(candidate.capabilities()));
    }
}

pub fn format_sorted_attributes(formatter: &mut TreeFormatter, attributes: &ImmutableAttributes) {
    formatter.start_children();
    for (attribute, value) in attributes.sorted() {
        formatter.node(&format!("{} '{}'", attribute.name(), value));
    }
    formatter.end_children();
}
