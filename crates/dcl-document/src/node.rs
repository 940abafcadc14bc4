//! Document tree nodes
//!
//! A [`Document`] is an ordered list of [`DocumentNode`]s: elements with
//! nested content, property assignments, and error placeholders left by
//! the parser. Every node carries a [`NodeId`] unique within its document.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter, Write as _};

/// Identity of a node within one document
///
/// [`NodeId::UNASSIGNED`] marks detached nodes that have not been placed in
/// a document yet; it never identifies a real node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Sentinel for detached nodes
    pub const UNASSIGNED: NodeId = NodeId(0);

    /// Wrap a raw id
    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw value
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Whether this id has been assigned
    #[inline]
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        self.0 != 0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic allocator of fresh [`NodeId`]s
///
/// Once `u32::MAX` has been handed out the allocator is exhausted and
/// every further call to [`allocate`](Self::allocate) returns `None`.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: Option<u32>,
}

impl IdAllocator {
    /// Allocator starting at the first assignable id
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { next: Some(1) }
    }

    /// Allocator whose next id is `first`
    #[inline]
    #[must_use]
    pub fn starting_at(first: NodeId) -> Self {
        Self {
            next: Some(first.0.max(1)),
        }
    }

    /// Allocator with no ids left
    #[inline]
    #[must_use]
    pub fn exhausted() -> Self {
        Self { next: None }
    }

    /// Take the next id; `None` once the id space is used up
    #[inline]
    pub fn allocate(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = id.checked_add(1);
        Some(NodeId(id))
    }

    /// Id the next call to [`allocate`](Self::allocate) returns
    #[inline]
    #[must_use]
    pub fn peek(&self) -> Option<NodeId> {
        self.next.map(NodeId)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Literal scalar value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum LiteralValue {
    /// Integer literal
    Int(i64),
    /// String literal
    String(String),
    /// Boolean literal
    Boolean(bool),
}

impl Display for LiteralValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v:?}"),
            Self::Boolean(v) => write!(f, "{v}"),
        }
    }
}

/// Right-hand side of an assignment or an element argument
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ValueNode {
    /// Literal value
    Literal(LiteralValue),

    /// Call of a value factory, e.g. `file("a.txt")`
    ValueFactory {
        /// Factory name
        name: String,
        /// Arguments
        values: Vec<ValueNode>,
    },

    /// Reference to a named value
    NamedReference(String),
}

impl ValueNode {
    /// Integer literal
    #[inline]
    #[must_use]
    pub fn int(value: i64) -> Self {
        Self::Literal(LiteralValue::Int(value))
    }

    /// String literal
    #[inline]
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(LiteralValue::String(value.into()))
    }

    /// Boolean literal
    #[inline]
    #[must_use]
    pub fn boolean(value: bool) -> Self {
        Self::Literal(LiteralValue::Boolean(value))
    }
}

impl From<LiteralValue> for ValueNode {
    fn from(value: LiteralValue) -> Self {
        Self::Literal(value)
    }
}

impl Display for ValueNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(literal) => write!(f, "{literal}"),
            Self::ValueFactory { name, values } => {
                write!(f, "{name}(")?;
                write_values(f, values)?;
                f.write_str(")")
            }
            Self::NamedReference(name) => f.write_str(name),
        }
    }
}

fn write_values(f: &mut Formatter<'_>, values: &[ValueNode]) -> fmt::Result {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{value}")?;
    }
    Ok(())
}

/// `name = value`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyNode {
    /// Node identity
    pub id: NodeId,
    /// Assigned property name
    pub name: String,
    /// Assigned value
    pub value: ValueNode,
}

impl PropertyNode {
    /// Detached property node
    #[inline]
    #[must_use]
    pub fn detached(name: impl Into<String>, value: ValueNode) -> Self {
        Self {
            id: NodeId::UNASSIGNED,
            name: name.into(),
            value,
        }
    }
}

/// `name(arguments) { content }`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementNode {
    /// Node identity
    pub id: NodeId,
    /// Invoked function name
    pub name: String,
    /// Value arguments
    #[serde(default)]
    pub arguments: Vec<ValueNode>,
    /// Nested content
    #[serde(default)]
    pub content: Vec<DocumentNode>,
}

impl ElementNode {
    /// Detached element without arguments or content
    #[inline]
    #[must_use]
    pub fn detached(name: impl Into<String>) -> Self {
        Self {
            id: NodeId::UNASSIGNED,
            name: name.into(),
            arguments: Vec::new(),
            content: Vec::new(),
        }
    }

    /// Append an argument
    #[inline]
    #[must_use]
    pub fn with_argument(mut self, argument: ValueNode) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Append a detached property assignment
    #[inline]
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: ValueNode) -> Self {
        self.content
            .push(DocumentNode::Property(PropertyNode::detached(name, value)));
        self
    }

    /// Append a nested element
    #[inline]
    #[must_use]
    pub fn with_child(mut self, child: ElementNode) -> Self {
        self.content.push(DocumentNode::Element(child));
        self
    }
}

/// Unparseable source region
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorNode {
    /// Node identity
    pub id: NodeId,
    /// Parser message
    pub message: String,
}

/// Any node of the document tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum DocumentNode {
    /// Element (function invocation with optional block)
    Element(ElementNode),
    /// Property assignment
    Property(PropertyNode),
    /// Parse error placeholder
    Error(ErrorNode),
}

impl DocumentNode {
    /// Node identity
    #[inline]
    #[must_use]
    pub fn id(&self) -> NodeId {
        match self {
            Self::Element(e) => e.id,
            Self::Property(p) => p.id,
            Self::Error(e) => e.id,
        }
    }

    /// Element or property name
    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Element(e) => Some(&e.name),
            Self::Property(p) => Some(&p.name),
            Self::Error(_) => None,
        }
    }

    /// Element view
    #[inline]
    #[must_use]
    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Self::Element(e) => Some(e),
            Self::Property(_) | Self::Error(_) => None,
        }
    }

    /// Deep copy with every node re-keyed from `ids`, in pre-order
    ///
    /// Returns `None` if `ids` runs out before the subtree is keyed.
    #[must_use]
    pub fn with_fresh_ids(&self, ids: &mut IdAllocator) -> Option<Self> {
        let node = match self {
            Self::Element(element) => {
                let id = ids.allocate()?;
                Self::Element(ElementNode {
                    id,
                    name: element.name.clone(),
                    arguments: element.arguments.clone(),
                    content: element
                        .content
                        .iter()
                        .map(|child| child.with_fresh_ids(ids))
                        .collect::<Option<_>>()?,
                })
            }
            Self::Property(property) => Self::Property(PropertyNode {
                id: ids.allocate()?,
                name: property.name.clone(),
                value: property.value.clone(),
            }),
            Self::Error(error) => Self::Error(ErrorNode {
                id: ids.allocate()?,
                message: error.message.clone(),
            }),
        };
        Some(node)
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        let indent = "    ".repeat(depth);
        match self {
            Self::Property(p) => {
                let _ = writeln!(out, "{indent}{} = {}", p.name, p.value);
            }
            Self::Error(e) => {
                let _ = writeln!(out, "{indent}<error: {}>", e.message);
            }
            Self::Element(e) => {
                let args: Vec<String> = e.arguments.iter().map(ToString::to_string).collect();
                let head = if args.is_empty() {
                    e.name.clone()
                } else {
                    format!("{}({})", e.name, args.join(", "))
                };
                if e.content.is_empty() && !args.is_empty() {
                    let _ = writeln!(out, "{indent}{head}");
                } else {
                    let _ = writeln!(out, "{indent}{head} {{");
                    for child in &e.content {
                        child.render_into(out, depth + 1);
                    }
                    let _ = writeln!(out, "{indent}}}");
                }
            }
        }
    }
}

impl From<ElementNode> for DocumentNode {
    fn from(element: ElementNode) -> Self {
        Self::Element(element)
    }
}

impl From<PropertyNode> for DocumentNode {
    fn from(property: PropertyNode) -> Self {
        Self::Property(property)
    }
}

/// Top-level document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Document {
    /// Top-level nodes in source order
    pub content: Vec<DocumentNode>,
}

impl Document {
    /// Document from top-level nodes
    #[inline]
    #[must_use]
    pub fn new(content: Vec<DocumentNode>) -> Self {
        Self { content }
    }

    /// Largest id in use, or [`NodeId::UNASSIGNED`] for an empty document
    #[must_use]
    pub fn max_id(&self) -> NodeId {
        fn walk(nodes: &[DocumentNode], max: &mut NodeId) {
            for node in nodes {
                *max = (*max).max(node.id());
                if let DocumentNode::Element(e) = node {
                    walk(&e.content, max);
                }
            }
        }
        let mut max = NodeId::UNASSIGNED;
        walk(&self.content, &mut max);
        max
    }

    /// Render as indented source text
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for node in &self.content {
            node.render_into(&mut out, 0);
        }
        out
    }
}
