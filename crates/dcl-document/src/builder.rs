//! Fluent construction of documents with assigned node ids
//!
//! ```rust
//! use dcl_document::{DocumentBuilder, ValueNode};
//!
//! let doc = DocumentBuilder::new()
//!     .property("name", ValueNode::string("demo"))
//!     .element("server", |server| server.property("port", ValueNode::int(8080)))
//!     .build();
//!
//! assert_eq!(doc.content.len(), 2);
//! ```

use crate::node::{
    Document, DocumentNode, ElementNode, ErrorNode, IdAllocator, NodeId, PropertyNode, ValueNode,
};

/// Builds a [`Document`], assigning ids in pre-order starting at 1
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    ids: IdAllocator,
    content: Vec<DocumentNode>,
}

impl DocumentBuilder {
    /// Empty builder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-level property assignment
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, value: ValueNode) -> Self {
        let node = property_node(&mut self.ids, name, value);
        self.content.push(node);
        self
    }

    /// Top-level element whose content is filled by `body`
    #[must_use]
    pub fn element(
        mut self,
        name: impl Into<String>,
        body: impl for<'b> FnOnce(ElementBuilder<'b>) -> ElementBuilder<'b>,
    ) -> Self {
        let node = build_element(&mut self.ids, name.into(), Vec::new(), body);
        self.content.push(node);
        self
    }

    /// Top-level element with arguments
    #[must_use]
    pub fn element_with_args(
        mut self,
        name: impl Into<String>,
        arguments: Vec<ValueNode>,
        body: impl for<'b> FnOnce(ElementBuilder<'b>) -> ElementBuilder<'b>,
    ) -> Self {
        let node = build_element(&mut self.ids, name.into(), arguments, body);
        self.content.push(node);
        self
    }

    /// Top-level error placeholder
    #[must_use]
    pub fn error(mut self, message: impl Into<String>) -> Self {
        let node = DocumentNode::Error(ErrorNode {
            id: next_id(&mut self.ids),
            message: message.into(),
        });
        self.content.push(node);
        self
    }

    /// Finish the document
    #[inline]
    #[must_use]
    pub fn build(self) -> Document {
        Document::new(self.content)
    }
}

/// Fills the content of one element
#[derive(Debug)]
pub struct ElementBuilder<'a> {
    ids: &'a mut IdAllocator,
    id: NodeId,
    name: String,
    arguments: Vec<ValueNode>,
    content: Vec<DocumentNode>,
}

impl ElementBuilder<'_> {
    /// Nested property assignment
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, value: ValueNode) -> Self {
        let node = property_node(self.ids, name, value);
        self.content.push(node);
        self
    }

    /// Nested element
    #[must_use]
    pub fn element(
        mut self,
        name: impl Into<String>,
        body: impl for<'b> FnOnce(ElementBuilder<'b>) -> ElementBuilder<'b>,
    ) -> Self {
        let node = build_element(self.ids, name.into(), Vec::new(), body);
        self.content.push(node);
        self
    }

    /// Nested element with arguments
    #[must_use]
    pub fn element_with_args(
        mut self,
        name: impl Into<String>,
        arguments: Vec<ValueNode>,
        body: impl for<'b> FnOnce(ElementBuilder<'b>) -> ElementBuilder<'b>,
    ) -> Self {
        let node = build_element(self.ids, name.into(), arguments, body);
        self.content.push(node);
        self
    }

    fn finish(self) -> DocumentNode {
        DocumentNode::Element(ElementNode {
            id: self.id,
            name: self.name,
            arguments: self.arguments,
            content: self.content,
        })
    }
}

/// Nodes past the end of the id space are left unassigned
fn next_id(ids: &mut IdAllocator) -> NodeId {
    ids.allocate().unwrap_or(NodeId::UNASSIGNED)
}

fn property_node(ids: &mut IdAllocator, name: impl Into<String>, value: ValueNode) -> DocumentNode {
    DocumentNode::Property(PropertyNode {
        id: next_id(ids),
        name: name.into(),
        value,
    })
}

fn build_element(
    ids: &mut IdAllocator,
    name: String,
    arguments: Vec<ValueNode>,
    body: impl for<'b> FnOnce(ElementBuilder<'b>) -> ElementBuilder<'b>,
) -> DocumentNode {
    let id = next_id(ids);
    let builder = ElementBuilder {
        ids,
        id,
        name,
        arguments,
        content: Vec::new(),
    };
    body(builder).finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_pre_order() {
        let doc = DocumentBuilder::new()
            .property("name", ValueNode::string("demo"))
            .element("server", |s| {
                s.property("port", ValueNode::int(1))
                    .element("tls", |t| t.property("enabled", ValueNode::boolean(true)))
            })
            .error("unexpected token")
            .build();

        assert_eq!(doc.content[0].id(), NodeId::new(1));
        let server = doc.content[1].as_element().unwrap();
        assert_eq!(server.id, NodeId::new(2));
        assert_eq!(server.content[0].id(), NodeId::new(3));
        let tls = server.content[1].as_element().unwrap();
        assert_eq!(tls.id, NodeId::new(4));
        assert_eq!(tls.content[0].id(), NodeId::new(5));
        assert_eq!(doc.content[2].id(), NodeId::new(6));
        assert_eq!(doc.max_id(), NodeId::new(6));
    }

    #[test]
    fn element_with_args_keeps_arguments() {
        let doc = DocumentBuilder::new()
            .element_with_args("plugin", vec![ValueNode::string("java")], |p| p)
            .build();
        let plugin = doc.content[0].as_element().unwrap();
        assert_eq!(plugin.arguments, vec![ValueNode::string("java")]);
        assert!(plugin.content.is_empty());
    }
}
