//! "Latest wins" selection among the available versions of a module

use tracing::{debug, warn};

use crate::version::comparator::VersionComparator;
use crate::version::metadata::{ComponentMetadata, ComponentMetadataSupplier};
use crate::version::parser::Version;
use crate::version::selector::VersionSelector;

/// Outcome of choosing a version for a selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSelection {
    /// Highest candidate accepted by the selector and not rejected
    pub selected: Option<String>,
    /// Candidates accepted by the selector but matched by the reject selector,
    /// latest first
    pub rejected: Vec<String>,
    /// Candidates the selector did not accept, latest first
    pub unmatched: Vec<String>,
}

/// Pick the latest candidate accepted by `selector` and not accepted by `reject`.
///
/// Candidates are visited from latest to oldest. Metadata is requested from
/// `supplier` only for selectors that declare `requires_metadata()`; a candidate
/// whose metadata cannot be supplied is treated as not matching.
pub fn select_best_candidate(
    comparator: VersionComparator,
    selector: &VersionSelector,
    reject: Option<&VersionSelector>,
    candidates: &[String],
    supplier: &dyn ComponentMetadataSupplier,
) -> CandidateSelection {
    let mut versions: Vec<Version> = candidates.iter().map(|c| Version::parse(c)).collect();
    versions.sort_by(|a, b| comparator.compare(b, a));

    let needs_metadata =
        selector.requires_metadata() || reject.is_some_and(VersionSelector::requires_metadata);

    let mut selection = CandidateSelection::default();
    for version in versions {
        let metadata = if needs_metadata {
            debug!("Fetching metadata for candidate {}", version);
            let metadata = supplier.metadata_for(version.source());
            if metadata.is_none() {
                warn!("No metadata available for candidate {}", version);
            }
            metadata
        } else {
            None
        };

        let accepted = accepts(selector, &version, metadata.as_ref());
        if !accepted {
            selection.unmatched.push(version.source().to_string());
            continue;
        }
        if reject.is_some_and(|reject| accepts(reject, &version, metadata.as_ref())) {
            selection.rejected.push(version.source().to_string());
            continue;
        }
        // Older accepted versions are neither rejected nor unmatched
        if selection.selected.is_none() {
            selection.selected = Some(version.source().to_string());
        }
    }
    selection
}

fn accepts(
    selector: &VersionSelector,
    version: &Version,
    metadata: Option<&ComponentMetadata>,
) -> bool {
    if selector.requires_metadata() {
        return metadata.is_some_and(|metadata| selector.accept_metadata(metadata));
    }
    selector.accept(version).unwrap_or(false)
}
