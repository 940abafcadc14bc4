//! Scope locations and the scope locator
//!
//! A [`ScopeLocation`] is a path of [`ScopeLocationElement`]s evaluated from
//! the document's top level. Each element maps the current set of scopes to
//! a new one; the locator returns the final set in document pre-order
//! without duplicates.

use crate::member::TypedFunction;
use dcl_document::{DocumentNode, ElementNode, NodeResolution, ResolvedDocument, ScopeRef};
use dcl_schema::TypeName;
use std::fmt::{self, Display, Formatter};

/// Filter over the direct child elements of a scope
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NestedScopeSelector {
    /// Elements written with this name
    ElementsNamed(String),

    /// Elements whose block configures an object of this type
    ObjectsOfType(TypeName),

    /// Elements invoking this function
    ObjectsConfiguredBy(TypedFunction),
}

impl NestedScopeSelector {
    /// Whether `element` with its `resolution` is selected
    #[must_use]
    pub fn matches(&self, element: &ElementNode, resolution: &NodeResolution) -> bool {
        match self {
            Self::ElementsNamed(name) => &element.name == name,
            Self::ObjectsOfType(type_name) => resolution.block_type() == Some(type_name),
            Self::ObjectsConfiguredBy(function) => function.is_invoked_by(resolution),
        }
    }
}

impl Display for NestedScopeSelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ElementsNamed(name) => f.write_str(name),
            Self::ObjectsOfType(type_name) => write!(f, "<{type_name}>"),
            Self::ObjectsConfiguredBy(function) => write!(f, "{}.{}()", function.owner(), function.name()),
        }
    }
}

/// One step of a [`ScopeLocation`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScopeLocationElement {
    /// Current scopes plus every scope nested in them, at any depth
    InAllNestedScopes,

    /// Direct child element scopes passing the selector
    InNestedScopes(NestedScopeSelector),
}

impl Display for ScopeLocationElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InAllNestedScopes => f.write_str("**"),
            Self::InNestedScopes(selector) => selector.fmt(f),
        }
    }
}

/// Where in a document a mutation applies
///
/// The empty location denotes the top level only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ScopeLocation {
    elements: Vec<ScopeLocationElement>,
}

impl ScopeLocation {
    /// Location from explicit steps
    #[inline]
    #[must_use]
    pub fn new(elements: Vec<ScopeLocationElement>) -> Self {
        Self { elements }
    }

    /// The document's top level
    #[inline]
    #[must_use]
    pub fn from_top_level() -> Self {
        Self::default()
    }

    /// Every scope in the document, the top level included
    #[inline]
    #[must_use]
    pub fn in_any_scope() -> Self {
        Self::from_top_level().also_in_nested_scopes()
    }

    /// Append [`ScopeLocationElement::InAllNestedScopes`]
    #[inline]
    #[must_use]
    pub fn also_in_nested_scopes(mut self) -> Self {
        self.elements.push(ScopeLocationElement::InAllNestedScopes);
        self
    }

    /// Descend into child elements with this name
    #[inline]
    #[must_use]
    pub fn in_elements_named(self, name: impl Into<String>) -> Self {
        self.nested(NestedScopeSelector::ElementsNamed(name.into()))
    }

    /// Descend into child elements configuring this type
    #[inline]
    #[must_use]
    pub fn in_objects_of_type(self, type_name: impl Into<TypeName>) -> Self {
        self.nested(NestedScopeSelector::ObjectsOfType(type_name.into()))
    }

    /// Descend into child elements invoking this function
    #[inline]
    #[must_use]
    pub fn in_objects_configured_by(self, function: TypedFunction) -> Self {
        self.nested(NestedScopeSelector::ObjectsConfiguredBy(function))
    }

    fn nested(mut self, selector: NestedScopeSelector) -> Self {
        self.elements.push(ScopeLocationElement::InNestedScopes(selector));
        self
    }

    /// Steps in evaluation order
    #[inline]
    #[must_use]
    pub fn elements(&self) -> &[ScopeLocationElement] {
        &self.elements
    }
}

impl Display for ScopeLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("top level")?;
        for element in &self.elements {
            write!(f, " > {element}")?;
        }
        Ok(())
    }
}

/// Evaluates [`ScopeLocation`]s against a resolved document
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeLocator;

impl ScopeLocator {
    /// Create locator
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Scopes matched by `location`, in pre-order, without duplicates
    #[must_use]
    pub fn locate(&self, document: &ResolvedDocument, location: &ScopeLocation) -> Vec<ScopeRef> {
        let mut current = vec![ScopeRef::Root];
        for element in location.elements() {
            let mut next = Vec::new();
            for &scope in &current {
                match element {
                    ScopeLocationElement::InAllNestedScopes => {
                        next.push(scope);
                        collect_nested(document, scope, &mut next);
                    }
                    ScopeLocationElement::InNestedScopes(selector) => {
                        next.extend(
                            child_elements(document, scope)
                                .filter(|e| selector.matches(e, document.resolution(e.id)))
                                .map(|e| ScopeRef::Element(e.id)),
                        );
                    }
                }
            }
            next.sort_by_key(|&scope| document.scope_order(scope).unwrap_or(usize::MAX));
            next.dedup();
            if next.is_empty() {
                return next;
            }
            current = next;
        }

        tracing::trace!(%location, matched = current.len(), "located scopes");
        current
    }
}

fn child_elements(
    document: &ResolvedDocument,
    scope: ScopeRef,
) -> impl Iterator<Item = &ElementNode> + '_ {
    document
        .scope_content(scope)
        .unwrap_or_default()
        .iter()
        .filter_map(DocumentNode::as_element)
}

fn collect_nested(document: &ResolvedDocument, scope: ScopeRef, out: &mut Vec<ScopeRef>) {
    for element in child_elements(document, scope) {
        let nested = ScopeRef::Element(element.id);
        out.push(nested);
        collect_nested(document, nested, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcl_document::{DocumentBuilder, NodeId, ValueNode};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    // server(#1) { port(#2) tls(#3) { } }  client(#4) { server(#5) { } }  server(#6)
    fn document() -> ResolvedDocument {
        let doc = DocumentBuilder::new()
            .element("server", |s| s.property("port", ValueNode::int(1)).element("tls", |t| t))
            .element("client", |c| c.element("server", |s| s))
            .element("server", |s| s)
            .build();
        let mut resolutions = HashMap::new();
        for id in [1, 6] {
            resolutions.insert(
                NodeId::new(id),
                NodeResolution::ConfiguringElement {
                    receiver: "Project".into(),
                    function: "server".into(),
                    configured_type: "Server".into(),
                },
            );
        }
        ResolvedDocument::new(doc, resolutions).unwrap()
    }

    fn element(id: u32) -> ScopeRef {
        ScopeRef::Element(NodeId::new(id))
    }

    #[test]
    fn empty_location_is_top_level() {
        let found = ScopeLocator::new().locate(&document(), &ScopeLocation::from_top_level());
        assert_eq!(found, vec![ScopeRef::Root]);
    }

    #[test]
    fn named_children() {
        let location = ScopeLocation::from_top_level().in_elements_named("server");
        let found = ScopeLocator::new().locate(&document(), &location);
        assert_eq!(found, vec![element(1), element(6)]);
    }

    #[test]
    fn any_scope_is_pre_order() {
        let found = ScopeLocator::new().locate(&document(), &ScopeLocation::in_any_scope());
        assert_eq!(
            found,
            vec![ScopeRef::Root, element(1), element(3), element(4), element(5), element(6)]
        );
    }

    #[test]
    fn nested_anywhere_then_named_deduplicates() {
        let location = ScopeLocation::in_any_scope()
            .also_in_nested_scopes()
            .in_elements_named("server");
        let found = ScopeLocator::new().locate(&document(), &location);
        assert_eq!(found, vec![element(1), element(5), element(6)]);
    }

    #[test]
    fn type_selector_uses_resolution() {
        let location = ScopeLocation::in_any_scope().in_objects_of_type("Server");
        let found = ScopeLocator::new().locate(&document(), &location);
        assert_eq!(found, vec![element(1), element(6)]);
    }

    #[test]
    fn unmatched_location_is_empty() {
        let location = ScopeLocation::from_top_level()
            .in_elements_named("missing")
            .also_in_nested_scopes();
        assert!(ScopeLocator::new().locate(&document(), &location).is_empty());
    }

    #[test]
    fn display() {
        let location = ScopeLocation::in_any_scope().in_elements_named("server");
        assert_eq!(location.to_string(), "top level > ** > server");
    }
}
