//! Application router topology detection

use crate::models::{Descriptor, Topology};
use tracing::debug;

const APPROUTER_MARKER: &str = "approuter";
const DESTINATION_CONTENT_MARKER: &str = "destination-content";

/// Classify the descriptor's router topology from its module names
///
/// The last module whose name mentions `approuter` or `destination-content`
/// decides; a descriptor with neither is treated as managed.
// TODO: decide whether descriptors carrying both markers should be rejected instead of "last wins".
pub fn resolve_topology(descriptor: &Descriptor) -> Topology {
    let marker = descriptor
        .modules
        .iter()
        .filter(|m| m.name.contains(DESTINATION_CONTENT_MARKER) || m.name.contains(APPROUTER_MARKER))
        .next_back();

    let topology = match marker {
        Some(module) if module.name.contains(APPROUTER_MARKER) => Topology::Standalone,
        _ => Topology::Managed,
    };

    debug!(
        marker = marker.map(|m| m.name.as_str()).unwrap_or("<none>"),
        %topology,
        "resolved approuter topology"
    );
    topology
}

/// Use `explicit` when given, otherwise detect from the descriptor
pub fn resolve_or_detect(descriptor: &Descriptor, explicit: Option<Topology>) -> Topology {
    explicit.unwrap_or_else(|| resolve_topology(descriptor))
}
