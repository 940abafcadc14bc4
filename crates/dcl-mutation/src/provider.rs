//! Providers of new value and element nodes
//!
//! A provider is either a constant node or a function of the request's
//! [`MutationArgumentContainer`]. Providers are evaluated at most once per
//! emitted edit and only when an edit is actually emitted.

use crate::arguments::{MutationArgumentContainer, MutationParameter};
use crate::error::ArgumentError;
use dcl_document::{ElementNode, ValueNode};
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// Argument-based value producer
pub type ValueProducer =
    dyn Fn(&MutationArgumentContainer) -> Result<ValueNode, ArgumentError> + Send + Sync;

/// Argument-based element producer
pub type ElementProducer =
    dyn Fn(&MutationArgumentContainer) -> Result<ElementNode, ArgumentError> + Send + Sync;

/// Source of a property value
#[derive(Clone)]
pub enum NewValueNodeProvider {
    /// Fixed value
    Constant(ValueNode),

    /// Value computed from arguments
    ArgumentBased(Arc<ValueProducer>),
}

impl NewValueNodeProvider {
    /// Fixed value
    #[inline]
    #[must_use]
    pub fn constant(value: ValueNode) -> Self {
        Self::Constant(value)
    }

    /// Value computed by `producer`
    #[must_use]
    pub fn argument_based<F>(producer: F) -> Self
    where
        F: Fn(&MutationArgumentContainer) -> Result<ValueNode, ArgumentError> + Send + Sync + 'static,
    {
        Self::ArgumentBased(Arc::new(producer))
    }

    /// Literal value of the argument bound to `parameter`
    #[must_use]
    pub fn from_parameter(parameter: MutationParameter) -> Self {
        Self::argument_based(move |args| args.value_node(&parameter))
    }

    /// Produce the value
    ///
    /// # Errors
    /// Returns error if an argument-based producer fails
    pub fn produce(&self, arguments: &MutationArgumentContainer) -> Result<ValueNode, ArgumentError> {
        match self {
            Self::Constant(value) => Ok(value.clone()),
            Self::ArgumentBased(producer) => producer(arguments),
        }
    }
}

impl Debug for NewValueNodeProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Self::ArgumentBased(_) => f.write_str("ArgumentBased(<fn>)"),
        }
    }
}

impl From<ValueNode> for NewValueNodeProvider {
    fn from(value: ValueNode) -> Self {
        Self::Constant(value)
    }
}

/// Source of a new element
///
/// Produced elements are detached; the planner assigns their ids.
#[derive(Clone)]
pub enum NewElementNodeProvider {
    /// Fixed element
    Constant(ElementNode),

    /// Element computed from arguments
    ArgumentBased(Arc<ElementProducer>),
}

impl NewElementNodeProvider {
    /// Fixed element
    #[inline]
    #[must_use]
    pub fn constant(element: ElementNode) -> Self {
        Self::Constant(element)
    }

    /// Element computed by `producer`
    #[must_use]
    pub fn argument_based<F>(producer: F) -> Self
    where
        F: Fn(&MutationArgumentContainer) -> Result<ElementNode, ArgumentError>
            + Send
            + Sync
            + 'static,
    {
        Self::ArgumentBased(Arc::new(producer))
    }

    /// Produce the element
    ///
    /// # Errors
    /// Returns error if an argument-based producer fails
    pub fn produce(
        &self,
        arguments: &MutationArgumentContainer,
    ) -> Result<ElementNode, ArgumentError> {
        match self {
            Self::Constant(element) => Ok(element.clone()),
            Self::ArgumentBased(producer) => producer(arguments),
        }
    }
}

impl Debug for NewElementNodeProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(element) => f.debug_tuple("Constant").field(&element.name).finish(),
            Self::ArgumentBased(_) => f.write_str("ArgumentBased(<fn>)"),
        }
    }
}

impl From<ElementNode> for NewElementNodeProvider {
    fn from(element: ElementNode) -> Self {
        Self::Constant(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arguments::ParameterKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn constant_ignores_arguments() {
        let provider = NewValueNodeProvider::constant(ValueNode::int(1));
        assert_eq!(
            provider.produce(&MutationArgumentContainer::new()).unwrap(),
            ValueNode::int(1)
        );
    }

    #[test]
    fn parameter_provider_reads_argument() {
        let port = MutationParameter::new("port", "port", ParameterKind::Int);
        let provider = NewValueNodeProvider::from_parameter(port.clone());
        let args = MutationArgumentContainer::new().with_argument(&port, 9000_i64).unwrap();

        assert_eq!(provider.produce(&args).unwrap(), ValueNode::int(9000));
        assert_eq!(
            provider.produce(&MutationArgumentContainer::new()).unwrap_err(),
            ArgumentError::Missing("port".into())
        );
    }

    #[test]
    fn element_provider_builds_from_arguments() {
        let port = MutationParameter::new("port", "port", ParameterKind::Int);
        let provider = NewElementNodeProvider::argument_based(move |args| {
            Ok(ElementNode::detached("listener").with_argument(args.value_node(&port)?))
        });
        let args = MutationArgumentContainer::new()
            .with_argument(&MutationParameter::new("port", "port", ParameterKind::Int), 80_i64)
            .unwrap();

        let element = provider.produce(&args).unwrap();
        assert_eq!(element.arguments, vec![ValueNode::int(80)]);
        assert_eq!(format!("{provider:?}"), "ArgumentBased(<fn>)");
    }
}
