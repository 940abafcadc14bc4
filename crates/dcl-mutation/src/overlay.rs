//! Edits queued earlier in the same planning pass
//!
//! The snapshot never changes while a batch is planned. [`PendingEdits`]
//! records what earlier requests already queued so later requests observe
//! it: nodes appended to a scope (with their resolutions) and removed ids.

use dcl_document::{NodeId, NodeResolution, ScopeRef};
use std::collections::{HashMap, HashSet};

/// Node appended to a scope by a queued edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingNode {
    /// Planner-assigned id
    pub id: NodeId,
    /// Resolution the node will have once inserted
    pub resolution: NodeResolution,
}

/// Overlay of queued edits over the base snapshot
#[derive(Debug, Clone, Default)]
pub struct PendingEdits {
    inserted: HashMap<ScopeRef, Vec<PendingNode>>,
    removed: HashSet<NodeId>,
}

impl PendingEdits {
    /// Empty overlay
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record nodes appended to `scope`
    pub fn record_insert(&mut self, scope: ScopeRef, nodes: impl IntoIterator<Item = PendingNode>) {
        self.inserted.entry(scope).or_default().extend(nodes);
    }

    /// Record a removed node
    pub fn record_removal(&mut self, id: NodeId) {
        self.removed.insert(id);
    }

    /// Nodes appended to `scope`, in insertion order
    #[must_use]
    pub fn inserted_into(&self, scope: ScopeRef) -> &[PendingNode] {
        self.inserted.get(&scope).map_or(&[][..], Vec::as_slice)
    }

    /// Whether a queued edit removes `id`
    #[inline]
    #[must_use]
    pub fn is_removed(&self, id: NodeId) -> bool {
        self.removed.contains(&id)
    }

    /// Whether nothing is queued
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.inserted.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_inserts_per_scope() {
        let mut pending = PendingEdits::new();
        assert!(pending.is_empty());

        let scope = ScopeRef::Element(NodeId::new(1));
        pending.record_insert(
            scope,
            [PendingNode {
                id: NodeId::new(10),
                resolution: NodeResolution::Unresolved,
            }],
        );
        pending.record_removal(NodeId::new(2));

        assert_eq!(pending.inserted_into(scope).len(), 1);
        assert!(pending.inserted_into(ScopeRef::Root).is_empty());
        assert!(pending.is_removed(NodeId::new(2)));
        assert!(!pending.is_empty());
    }
}
