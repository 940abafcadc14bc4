//! Low-level document edits
//!
//! Provides [`DocumentMutation`], the structural (not text-based) edit
//! instructions produced by planning and consumed by an executor.
//!
//! # Invariants
//! - edits are applied in order
//! - every target id exists at the time its edit is applied, either in the
//!   base document or as a node inserted by an earlier edit
//! - inserted nodes carry fresh ids unique within the edited document

use crate::node::{DocumentNode, NodeId, ValueNode};
use crate::resolution::ScopeRef;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// One structural edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "edit", rename_all = "snake_case")]
pub enum DocumentMutation {
    /// Append nodes at the end of a scope
    InsertNodesToEndOfScope {
        /// Receiving scope
        scope: ScopeRef,
        /// Nodes to append, already keyed
        nodes: Vec<DocumentNode>,
    },

    /// Replace the value of a property assignment
    ReplaceValue {
        /// Property node
        target: NodeId,
        /// New value
        value: ValueNode,
    },

    /// Remove a node and its subtree
    RemoveNode {
        /// Removed node
        target: NodeId,
    },
}

/// Discriminant of a [`DocumentMutation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    /// [`DocumentMutation::InsertNodesToEndOfScope`]
    Insert,
    /// [`DocumentMutation::ReplaceValue`]
    Replace,
    /// [`DocumentMutation::RemoveNode`]
    Remove,
}

impl DocumentMutation {
    /// Edit kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> MutationKind {
        match self {
            Self::InsertNodesToEndOfScope { .. } => MutationKind::Insert,
            Self::ReplaceValue { .. } => MutationKind::Replace,
            Self::RemoveNode { .. } => MutationKind::Remove,
        }
    }

    /// Scope receiving inserted nodes
    #[inline]
    #[must_use]
    pub fn inserted_into(&self) -> Option<ScopeRef> {
        match self {
            Self::InsertNodesToEndOfScope { scope, .. } => Some(*scope),
            Self::ReplaceValue { .. } | Self::RemoveNode { .. } => None,
        }
    }

    /// Existing node the edit targets
    #[inline]
    #[must_use]
    pub fn target(&self) -> Option<NodeId> {
        match self {
            Self::ReplaceValue { target, .. } | Self::RemoveNode { target } => Some(*target),
            Self::InsertNodesToEndOfScope { .. } => None,
        }
    }
}

impl Display for DocumentMutation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsertNodesToEndOfScope { scope, nodes } => {
                let names: Vec<&str> = nodes.iter().filter_map(DocumentNode::name).collect();
                write!(f, "insert [{}] at end of {scope}", names.join(", "))
            }
            Self::ReplaceValue { target, value } => write!(f, "replace value of {target} with {value}"),
            Self::RemoveNode { target } => write!(f, "remove {target}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ElementNode;

    #[test]
    fn kind_and_targets() {
        let insert = DocumentMutation::InsertNodesToEndOfScope {
            scope: ScopeRef::Root,
            nodes: vec![ElementNode::detached("server").into()],
        };
        let replace = DocumentMutation::ReplaceValue {
            target: NodeId::new(3),
            value: ValueNode::int(1),
        };
        let remove = DocumentMutation::RemoveNode { target: NodeId::new(4) };

        assert_eq!(insert.kind(), MutationKind::Insert);
        assert_eq!(insert.inserted_into(), Some(ScopeRef::Root));
        assert_eq!(insert.target(), None);
        assert_eq!(replace.kind(), MutationKind::Replace);
        assert_eq!(replace.target(), Some(NodeId::new(3)));
        assert_eq!(remove.kind(), MutationKind::Remove);
    }

    #[test]
    fn display_describes_edit() {
        let insert = DocumentMutation::InsertNodesToEndOfScope {
            scope: ScopeRef::Element(NodeId::new(2)),
            nodes: vec![ElementNode::detached("tls").into()],
        };
        assert_eq!(insert.to_string(), "insert [tls] at end of #2");
        assert_eq!(
            DocumentMutation::RemoveNode { target: NodeId::new(7) }.to_string(),
            "remove #7"
        );
    }

    #[test]
    fn serde_shape_is_tagged() {
        let remove = DocumentMutation::RemoveNode { target: NodeId::new(7) };
        let json = serde_json::to_value(&remove).unwrap();
        assert_eq!(json, serde_json::json!({ "edit": "remove_node", "target": 7 }));
    }
}
