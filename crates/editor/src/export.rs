//! Scene snapshot export.
//!
//! The snapshot is the document's node list with live transforms filled in;
//! it is the input for autosave and for external exporters.

use shared::{DocumentFile, Node};

/// Pretty JSON document for a snapshot
pub fn snapshot_json(nodes: &[Node]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&DocumentFile {
        nodes: nodes.to_vec(),
    })
}

/// Per-kind node counts, sorted by kind label
pub fn kind_counts(nodes: &[Node]) -> Vec<(&'static str, usize)> {
    let mut counts: std::collections::BTreeMap<&'static str, usize> = Default::default();
    for node in nodes {
        *counts.entry(node.primitive.node_type().label()).or_default() += 1;
    }
    counts.into_iter().collect()
}
