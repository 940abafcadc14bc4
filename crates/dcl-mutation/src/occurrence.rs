//! Typed member occurrences within a scope
//!
//! Finds the nodes of a scope that resolve to a given typed member. Nodes of
//! the base snapshot come first, in document order, followed by nodes
//! appended by queued edits. Nodes removed by queued edits are skipped.

use crate::member::{TypedFunction, TypedProperty};
use crate::overlay::PendingEdits;
use dcl_document::{NodeId, NodeResolution, ResolvedDocument, ScopeRef};

/// Resolves typed members to their occurrences in a scope
#[derive(Debug, Clone, Copy)]
pub struct MemberOccurrences<'a> {
    document: &'a ResolvedDocument,
    pending: Option<&'a PendingEdits>,
}

impl<'a> MemberOccurrences<'a> {
    /// Occurrences in the base snapshot only
    #[must_use]
    pub fn new(document: &'a ResolvedDocument) -> Self {
        Self {
            document,
            pending: None,
        }
    }

    /// Occurrences in the snapshot overlaid with queued edits
    #[inline]
    #[must_use]
    pub fn with_pending(document: &'a ResolvedDocument, pending: &'a PendingEdits) -> Self {
        Self {
            document,
            pending: Some(pending),
        }
    }

    /// Assignments of `property` in `scope`
    #[must_use]
    pub fn properties(&self, scope: ScopeRef, property: &TypedProperty) -> Vec<NodeId> {
        self.matching(scope, |resolution| property.is_assigned_by(resolution))
    }

    /// Blocks opened by `function` in `scope`
    #[must_use]
    pub fn blocks(&self, scope: ScopeRef, function: &TypedFunction) -> Vec<NodeId> {
        self.matching(scope, |resolution| {
            matches!(resolution, NodeResolution::ConfiguringElement { .. })
                && function.is_invoked_by(resolution)
        })
    }

    fn matching(&self, scope: ScopeRef, predicate: impl Fn(&NodeResolution) -> bool) -> Vec<NodeId> {
        let existing = self
            .document
            .scope_content(scope)
            .unwrap_or_default()
            .iter()
            .map(|node| (node.id(), self.document.resolution(node.id())));
        let pending = self
            .pending
            .map_or(&[][..], |p| p.inserted_into(scope))
            .iter()
            .map(|node| (node.id, &node.resolution));
        let removed = |id: NodeId| self.pending.is_some_and(|p| p.is_removed(id));

        existing
            .chain(pending)
            .filter(|(id, resolution)| !removed(*id) && predicate(*resolution))
            .map(|(id, _)| id)
            .collect()
    }
}
