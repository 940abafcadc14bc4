//! Resolution metadata and resolved documents
//!
//! A [`ResolvedDocument`] pairs a [`Document`] with a [`NodeResolution`] per
//! node, naming the schema member each node was resolved to. Consumers trust
//! this linkage; it is never re-derived here.

use crate::hash::{DocumentHash, HashError};
use crate::node::{Document, DocumentNode, ElementNode, NodeId};
use crate::path::ElementPath;
use dcl_schema::{AnalysisSchema, DataTypeRef, TypeName};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

/// Scope: the body of an element, or the document's top level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", content = "element", rename_all = "snake_case")]
pub enum ScopeRef {
    /// Top-level content
    Root,
    /// Content of the element with this id
    Element(NodeId),
}

impl Display for ScopeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str("<root>"),
            Self::Element(id) => write!(f, "{id}"),
        }
    }
}

/// Schema binding of a single node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "resolution", rename_all = "snake_case")]
pub enum NodeResolution {
    /// Element invoking an access-and-configure function
    ConfiguringElement {
        /// Type declaring the function
        receiver: TypeName,
        /// Function name
        function: String,
        /// Type configured inside the block
        configured_type: TypeName,
    },

    /// Element invoking an add-and-configure function
    ContainerElement {
        /// Type declaring the function
        receiver: TypeName,
        /// Function name
        function: String,
        /// Type of the created object
        element_type: TypeName,
    },

    /// Property assignment
    PropertyAssignment {
        /// Type declaring the property
        receiver: TypeName,
        /// Property name
        property: String,
        /// Declared value type
        value_type: DataTypeRef,
    },

    /// No binding
    #[default]
    Unresolved,
}

impl NodeResolution {
    /// Type whose members are legal inside this node's block
    #[inline]
    #[must_use]
    pub fn block_type(&self) -> Option<&TypeName> {
        match self {
            Self::ConfiguringElement { configured_type, .. } => Some(configured_type),
            Self::ContainerElement { element_type, .. } => Some(element_type),
            Self::PropertyAssignment { .. } | Self::Unresolved => None,
        }
    }

    /// `(receiver, function)` for element resolutions
    #[inline]
    #[must_use]
    pub fn invoked_function(&self) -> Option<(&TypeName, &str)> {
        match self {
            Self::ConfiguringElement { receiver, function, .. }
            | Self::ContainerElement { receiver, function, .. } => Some((receiver, function)),
            Self::PropertyAssignment { .. } | Self::Unresolved => None,
        }
    }

    /// `(receiver, property)` for property resolutions
    #[inline]
    #[must_use]
    pub fn assigned_property(&self) -> Option<(&TypeName, &str)> {
        match self {
            Self::PropertyAssignment { receiver, property, .. } => Some((receiver, property)),
            Self::ConfiguringElement { .. } | Self::ContainerElement { .. } | Self::Unresolved => {
                None
            }
        }
    }
}

static UNRESOLVED: NodeResolution = NodeResolution::Unresolved;

/// Child-index path from the root to a node
type NodeLocation = Vec<usize>;

/// Document annotated with schema bindings
///
/// # Invariants
/// - immutable after construction
/// - `hash` is the hash of `document`
/// - every element id appears in `element_order` exactly once, in pre-order
/// - `element_positions` maps each element id to its index in `element_order`
#[derive(Debug, Clone)]
pub struct ResolvedDocument {
    document: Document,
    resolutions: HashMap<NodeId, NodeResolution>,
    locations: HashMap<NodeId, NodeLocation>,
    element_order: Vec<NodeId>,
    element_positions: HashMap<NodeId, usize>,
    hash: DocumentHash,
}

impl ResolvedDocument {
    /// Pair a document with its resolutions
    ///
    /// Nodes missing from `resolutions` are treated as unresolved.
    ///
    /// # Errors
    /// Returns error if the document cannot be hashed
    pub fn new(
        document: Document,
        resolutions: HashMap<NodeId, NodeResolution>,
    ) -> Result<Self, HashError> {
        let hash = DocumentHash::of_serializable(&document)?;
        let mut locations = HashMap::new();
        let mut element_order = Vec::new();
        index_nodes(&document.content, &mut Vec::new(), &mut locations, &mut element_order);
        let element_positions = element_order
            .iter()
            .enumerate()
            .map(|(index, &id)| (id, index))
            .collect();

        Ok(Self {
            document,
            resolutions,
            locations,
            element_order,
            element_positions,
            hash,
        })
    }

    /// Underlying document
    #[inline]
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Hash of the document snapshot
    #[inline]
    #[must_use]
    pub fn content_hash(&self) -> DocumentHash {
        self.hash
    }

    /// Resolution of a node; unknown ids are unresolved
    #[inline]
    #[must_use]
    pub fn resolution(&self, id: NodeId) -> &NodeResolution {
        self.resolutions.get(&id).unwrap_or(&UNRESOLVED)
    }

    /// First id above every id in the document
    ///
    /// `None` when the document already holds `u32::MAX`.
    #[inline]
    #[must_use]
    pub fn next_free_id(&self) -> Option<NodeId> {
        self.document.max_id().get().checked_add(1).map(NodeId::new)
    }

    /// Node by id
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&DocumentNode> {
        let location = self.locations.get(&id)?;
        let (last, parents) = location.split_last()?;
        let mut content = &self.document.content;
        for &index in parents {
            content = &content.get(index)?.as_element()?.content;
        }
        content.get(*last)
    }

    /// Element by id
    #[inline]
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<&ElementNode> {
        self.node(id)?.as_element()
    }

    /// Direct content of a scope; `None` if the scope names no element
    #[must_use]
    pub fn scope_content(&self, scope: ScopeRef) -> Option<&[DocumentNode]> {
        match scope {
            ScopeRef::Root => Some(&self.document.content),
            ScopeRef::Element(id) => self.element(id).map(|e| e.content.as_slice()),
        }
    }

    /// Position of a scope in document pre-order; the root comes first
    #[must_use]
    pub fn scope_order(&self, scope: ScopeRef) -> Option<usize> {
        match scope {
            ScopeRef::Root => Some(0),
            ScopeRef::Element(id) => self.element_positions.get(&id).map(|i| i + 1),
        }
    }

    /// All element scopes in document pre-order
    pub fn element_scopes(&self) -> impl Iterator<Item = ScopeRef> + '_ {
        self.element_order.iter().map(|&id| ScopeRef::Element(id))
    }

    /// Type whose members are legal inside a scope
    #[must_use]
    pub fn scope_receiver<'s>(
        &'s self,
        schema: &'s AnalysisSchema,
        scope: ScopeRef,
    ) -> Option<&'s TypeName> {
        match scope {
            ScopeRef::Root => Some(schema.top_level_receiver()),
            ScopeRef::Element(id) => self.resolution(id).block_type(),
        }
    }

    /// Names of the elements enclosing a scope, for diagnostics
    #[must_use]
    pub fn scope_path(&self, scope: ScopeRef) -> ElementPath {
        let ScopeRef::Element(id) = scope else {
            return ElementPath::root();
        };
        let Some(location) = self.locations.get(&id) else {
            return ElementPath::root();
        };

        let mut path = ElementPath::root();
        let mut content = &self.document.content;
        for &index in location {
            let Some(element) = content.get(index).and_then(DocumentNode::as_element) else {
                break;
            };
            path = path.child(element.name.clone());
            content = &element.content;
        }
        path
    }
}

fn index_nodes(
    nodes: &[DocumentNode],
    prefix: &mut Vec<usize>,
    locations: &mut HashMap<NodeId, NodeLocation>,
    element_order: &mut Vec<NodeId>,
) {
    for (index, node) in nodes.iter().enumerate() {
        prefix.push(index);
        locations.insert(node.id(), prefix.clone());
        if let DocumentNode::Element(element) = node {
            element_order.push(element.id);
            index_nodes(&element.content, prefix, locations, element_order);
        }
        prefix.pop();
    }
}
