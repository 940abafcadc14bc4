//! Reference executor for [`DocumentMutation`]s
//!
//! Applies edits to an in-memory copy of a resolved document's tree. The
//! result is a plain [`Document`]; callers re-resolve it to plan again.

use crate::hash::DocumentHash;
use crate::mutation::DocumentMutation;
use crate::node::{Document, DocumentNode, ElementNode, NodeId, PropertyNode};
use crate::resolution::{ResolvedDocument, ScopeRef};

/// Applies edit sequences against a known base snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentEditor;

impl DocumentEditor {
    /// Create editor
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Apply `mutations` in order to the tree of `base`
    ///
    /// # Errors
    /// Returns error if `base_hash` does not match `base`, or if an edit
    /// targets a node that does not exist at that point
    pub fn apply(
        &self,
        base: &ResolvedDocument,
        base_hash: DocumentHash,
        mutations: &[DocumentMutation],
    ) -> Result<Document, EditError> {
        let actual = base.content_hash();
        if base_hash != actual {
            return Err(EditError::BaseMismatch {
                expected: base_hash,
                actual,
            });
        }

        let edited = mutations
            .iter()
            .try_fold(base.document().clone(), |document, mutation| {
                self.apply_single(document, mutation)
            })?;
        tracing::debug!(
            edits = mutations.len(),
            base = %base_hash.short(),
            "applied document mutations"
        );
        Ok(edited)
    }

    fn apply_single(
        &self,
        mut document: Document,
        mutation: &DocumentMutation,
    ) -> Result<Document, EditError> {
        match mutation {
            DocumentMutation::InsertNodesToEndOfScope { scope, nodes } => {
                if let Some(node) = nodes.iter().find(|n| !n.id().is_assigned()) {
                    return Err(EditError::UnassignedNode(node.name().unwrap_or("").to_string()));
                }
                let content = match scope {
                    ScopeRef::Root => &mut document.content,
                    ScopeRef::Element(id) => {
                        &mut find_element_mut(&mut document.content, *id)
                            .ok_or(EditError::ScopeNotFound(*scope))?
                            .content
                    }
                };
                content.extend(nodes.iter().cloned());
            }
            DocumentMutation::ReplaceValue { target, value } => {
                let property = find_property_mut(&mut document.content, *target)
                    .ok_or(EditError::PropertyNotFound(*target))?;
                property.value = value.clone();
            }
            DocumentMutation::RemoveNode { target } => {
                if !remove_node(&mut document.content, *target) {
                    return Err(EditError::NodeNotFound(*target));
                }
            }
        }
        Ok(document)
    }
}

fn find_element_mut(nodes: &mut [DocumentNode], id: NodeId) -> Option<&mut ElementNode> {
    for node in nodes.iter_mut() {
        if let DocumentNode::Element(element) = node {
            if element.id == id {
                return Some(element);
            }
            if let Some(found) = find_element_mut(&mut element.content, id) {
                return Some(found);
            }
        }
    }
    None
}

fn find_property_mut(nodes: &mut [DocumentNode], id: NodeId) -> Option<&mut PropertyNode> {
    for node in nodes.iter_mut() {
        match node {
            DocumentNode::Property(property) if property.id == id => return Some(property),
            DocumentNode::Element(element) => {
                if let Some(found) = find_property_mut(&mut element.content, id) {
                    return Some(found);
                }
            }
            DocumentNode::Property(_) | DocumentNode::Error(_) => {}
        }
    }
    None
}

fn remove_node(nodes: &mut Vec<DocumentNode>, id: NodeId) -> bool {
    if let Some(position) = nodes.iter().position(|n| n.id() == id) {
        nodes.remove(position);
        return true;
    }
    nodes.iter_mut().any(|node| match node {
        DocumentNode::Element(element) => remove_node(&mut element.content, id),
        DocumentNode::Property(_) | DocumentNode::Error(_) => false,
    })
}

/// Errors applying edits
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    /// Edits were planned against another snapshot
    #[error("base hash mismatch: expected {expected}, got {actual}")]
    BaseMismatch {
        /// Hash the edits were planned against
        expected: DocumentHash,
        /// Hash of the supplied document
        actual: DocumentHash,
    },

    /// Insert into a scope that does not exist
    #[error("scope not found: {0}")]
    ScopeNotFound(ScopeRef),

    /// Value replacement on a missing property
    #[error("property not found: {0}")]
    PropertyNotFound(NodeId),

    /// Removal of a missing node
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// Inserted node without an id
    #[error("inserted node '{0}' has no assigned id")]
    UnassignedNode(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DocumentBuilder;
    use crate::node::{IdAllocator, ValueNode};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn base() -> ResolvedDocument {
        let doc = DocumentBuilder::new()
            .element("server", |s| {
                s.property("port", ValueNode::int(80))
                    .property("host", ValueNode::string("localhost"))
            })
            .build();
        ResolvedDocument::new(doc, HashMap::new()).unwrap()
    }

    #[test]
    fn applies_edits_in_order() {
        let base = base();
        let mut ids = IdAllocator::starting_at(base.next_free_id().unwrap());
        let tls = DocumentNode::Element(ElementNode::detached("tls"))
            .with_fresh_ids(&mut ids)
            .unwrap();
        let tls_id = tls.id();

        let edits = vec![
            DocumentMutation::ReplaceValue {
                target: NodeId::new(2),
                value: ValueNode::int(8080),
            },
            DocumentMutation::RemoveNode { target: NodeId::new(3) },
            DocumentMutation::InsertNodesToEndOfScope {
                scope: ScopeRef::Element(NodeId::new(1)),
                nodes: vec![tls],
            },
            DocumentMutation::InsertNodesToEndOfScope {
                scope: ScopeRef::Element(tls_id),
                nodes: vec![DocumentNode::Property(PropertyNode {
                    id: ids.allocate().unwrap(),
                    name: "enabled".into(),
                    value: ValueNode::boolean(true),
                })],
            },
        ];

        let edited = DocumentEditor::new()
            .apply(&base, base.content_hash(), &edits)
            .unwrap();
        assert_eq!(
            edited.render(),
            "server {\n    port = 8080\n    tls {\n        enabled = true\n    }\n}\n"
        );
    }

    #[test]
    fn rejects_foreign_base() {
        let base = base();
        let result = DocumentEditor::new().apply(&base, DocumentHash::compute(b"other"), &[]);
        assert!(matches!(result, Err(EditError::BaseMismatch { .. })));
    }

    #[test]
    fn reports_missing_targets() {
        let base = base();
        let hash = base.content_hash();
        let editor = DocumentEditor::new();

        let remove = [DocumentMutation::RemoveNode { target: NodeId::new(42) }];
        assert!(matches!(
            editor.apply(&base, hash, &remove),
            Err(EditError::NodeNotFound(_))
        ));

        let replace = [DocumentMutation::ReplaceValue {
            target: NodeId::new(1),
            value: ValueNode::int(1),
        }];
        assert!(matches!(
            editor.apply(&base, hash, &replace),
            Err(EditError::PropertyNotFound(_))
        ));

        let insert = [DocumentMutation::InsertNodesToEndOfScope {
            scope: ScopeRef::Element(NodeId::new(2)),
            nodes: vec![],
        }];
        assert!(matches!(
            editor.apply(&base, hash, &insert),
            Err(EditError::ScopeNotFound(_))
        ));
    }

    #[test]
    fn rejects_unkeyed_nodes() {
        let base = base();
        let insert = [DocumentMutation::InsertNodesToEndOfScope {
            scope: ScopeRef::Root,
            nodes: vec![ElementNode::detached("tls").into()],
        }];
        assert!(matches!(
            DocumentEditor::new().apply(&base, base.content_hash(), &insert),
            Err(EditError::UnassignedNode(_))
        ));
    }
}
