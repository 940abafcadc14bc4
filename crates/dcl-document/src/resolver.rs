//! Reference resolver binding document nodes to schema members
//!
//! Resolution is name-based: an element resolves to the first member
//! function of the enclosing receiver type with a matching name and arity
//! whose semantics open a block; a property resolves to the receiver's
//! property of that name. Content of unresolved elements stays unresolved.

use crate::hash::HashError;
use crate::node::{Document, DocumentNode, ElementNode, NodeId};
use crate::resolution::{NodeResolution, ResolvedDocument};
use dcl_schema::{AnalysisSchema, FunctionSemantics, TypeName};
use std::collections::HashMap;

/// Resolves documents against one schema
#[derive(Debug, Clone, Copy)]
pub struct DocumentResolver<'s> {
    schema: &'s AnalysisSchema,
}

impl<'s> DocumentResolver<'s> {
    /// Resolver for `schema`
    #[inline]
    #[must_use]
    pub fn new(schema: &'s AnalysisSchema) -> Self {
        Self { schema }
    }

    /// Resolve a whole document
    ///
    /// # Errors
    /// Returns error if the document cannot be hashed
    pub fn resolve(&self, document: Document) -> Result<ResolvedDocument, HashError> {
        let mut resolutions = HashMap::new();
        self.resolve_content(
            self.schema.top_level_receiver(),
            &document.content,
            &mut resolutions,
        );
        tracing::debug!(resolved = resolutions.len(), "resolved document");
        ResolvedDocument::new(document, resolutions)
    }

    /// Resolve one node and its content as if placed in a block of `receiver`
    ///
    /// Returns resolutions for the node and every resolved descendant.
    #[must_use]
    pub fn resolve_subtree(
        &self,
        receiver: &TypeName,
        node: &DocumentNode,
    ) -> HashMap<NodeId, NodeResolution> {
        let mut resolutions = HashMap::new();
        self.resolve_content(receiver, std::slice::from_ref(node), &mut resolutions);
        resolutions
    }

    fn resolve_content(
        &self,
        receiver: &TypeName,
        nodes: &[DocumentNode],
        out: &mut HashMap<NodeId, NodeResolution>,
    ) {
        for node in nodes {
            match node {
                DocumentNode::Property(property) => {
                    if let Some(declared) = self.schema.property(receiver, &property.name) {
                        out.insert(
                            property.id,
                            NodeResolution::PropertyAssignment {
                                receiver: receiver.clone(),
                                property: declared.name.clone(),
                                value_type: declared.value_type.clone(),
                            },
                        );
                    }
                }
                DocumentNode::Element(element) => {
                    let resolution = self.resolve_element(receiver, element);
                    if let Some(block_type) = resolution.block_type().cloned() {
                        self.resolve_content(&block_type, &element.content, out);
                    }
                    if resolution != NodeResolution::Unresolved {
                        out.insert(element.id, resolution);
                    }
                }
                DocumentNode::Error(_) => {}
            }
        }
    }

    fn resolve_element(&self, receiver: &TypeName, element: &ElementNode) -> NodeResolution {
        let Some(class) = self.schema.data_class(receiver) else {
            return NodeResolution::Unresolved;
        };

        class
            .functions_named(&element.name)
            .filter(|f| f.parameters.len() == element.arguments.len())
            .find_map(|f| match &f.semantics {
                FunctionSemantics::AccessAndConfigure { accessed_type } => {
                    Some(NodeResolution::ConfiguringElement {
                        receiver: receiver.clone(),
                        function: f.name.clone(),
                        configured_type: accessed_type.clone(),
                    })
                }
                FunctionSemantics::AddAndConfigure { configured_type } => {
                    Some(NodeResolution::ContainerElement {
                        receiver: receiver.clone(),
                        function: f.name.clone(),
                        element_type: configured_type.clone(),
                    })
                }
                FunctionSemantics::Pure { .. } | FunctionSemantics::Builder => None,
            })
            .unwrap_or(NodeResolution::Unresolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DocumentBuilder;
    use crate::node::ValueNode;
    use dcl_schema::{DataClass, DataParameter, DataProperty, DataTypeRef, SchemaFunction};
    use pretty_assertions::assert_eq;

    fn schema() -> AnalysisSchema {
        AnalysisSchema::new(
            "Project",
            [
                DataClass::new("Project")
                    .with_property(DataProperty::new("name", DataTypeRef::String))
                    .with_function(SchemaFunction::configuring("server", "Server"))
                    .with_function(SchemaFunction::adding(
                        "plugin",
                        vec![DataParameter::new("id", DataTypeRef::String)],
                        "Plugin",
                    )),
                DataClass::new("Server")
                    .with_property(DataProperty::new("port", DataTypeRef::Int)),
                DataClass::new("Plugin")
                    .with_property(DataProperty::new("version", DataTypeRef::String)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn resolves_configuring_and_container_elements() {
        let schema = schema();
        let doc = DocumentBuilder::new()
            .property("name", ValueNode::string("demo"))
            .element("server", |s| s.property("port", ValueNode::int(80)))
            .element_with_args("plugin", vec![ValueNode::string("java")], |p| {
                p.property("version", ValueNode::string("1"))
            })
            .build();

        let resolved = DocumentResolver::new(&schema).resolve(doc).unwrap();

        assert_eq!(
            resolved.resolution(NodeId::new(1)),
            &NodeResolution::PropertyAssignment {
                receiver: "Project".into(),
                property: "name".into(),
                value_type: DataTypeRef::String,
            }
        );
        assert_eq!(
            resolved.resolution(NodeId::new(2)),
            &NodeResolution::ConfiguringElement {
                receiver: "Project".into(),
                function: "server".into(),
                configured_type: "Server".into(),
            }
        );
        assert_eq!(
            resolved.resolution(NodeId::new(3)).assigned_property(),
            Some((&TypeName::new("Server"), "port"))
        );
        assert_eq!(
            resolved.resolution(NodeId::new(4)).block_type(),
            Some(&TypeName::new("Plugin"))
        );
        assert!(resolved.resolution(NodeId::new(5)).assigned_property().is_some());
    }

    #[test]
    fn unknown_members_stay_unresolved() {
        let schema = schema();
        let doc = DocumentBuilder::new()
            .property("port", ValueNode::int(80))
            .element("client", |c| c.property("port", ValueNode::int(1)))
            .element("plugin", |p| p)
            .build();

        let resolved = DocumentResolver::new(&schema).resolve(doc).unwrap();
        for id in 1..=4 {
            assert_eq!(resolved.resolution(NodeId::new(id)), &NodeResolution::Unresolved);
        }
    }

    #[test]
    fn resolve_subtree_uses_given_receiver() {
        let schema = schema();
        let node = DocumentBuilder::new()
            .property("port", ValueNode::int(80))
            .build()
            .content
            .remove(0);

        let resolutions = DocumentResolver::new(&schema).resolve_subtree(&"Server".into(), &node);
        assert!(resolutions[&NodeId::new(1)].assigned_property().is_some());
    }
}
