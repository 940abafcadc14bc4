//! Model mutations and requests
//!
//! A [`ModelMutationRequest`] says what to change ([`ModelMutation`]), where
//! ([`ScopeLocation`]), and what to do when the location matches nothing.

use crate::error::MutationRequestError;
use crate::location::ScopeLocation;
use crate::member::{TypedFunction, TypedProperty};
use crate::provider::{NewElementNodeProvider, NewValueNodeProvider};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Behavior when a set targets an already-assigned property
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IfPresentBehavior {
    /// Replace the existing value
    #[default]
    Overwrite,
    /// Report a failure
    FailAndReport,
    /// Leave the document unchanged
    Ignore,
}

/// Behavior when a request's location matches no scope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IfNotFoundBehavior {
    /// Report a failure
    #[default]
    FailAndReport,
    /// Do nothing
    Ignore,
}

/// Access-and-configure function without value parameters
///
/// The only kind of function whose block can be added idempotently.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfiguringFunction(TypedFunction);

impl ConfiguringFunction {
    /// Validate `function`
    ///
    /// # Errors
    /// Returns error if the function is not access-and-configure or
    /// declares value parameters
    pub fn new(function: TypedFunction) -> Result<Self, MutationRequestError> {
        let declared = function.function();
        if !declared.semantics.is_access_and_configure() {
            return Err(MutationRequestError::NotAccessAndConfigure {
                function: function.to_string(),
                semantics: declared.semantics.label(),
            });
        }
        if !declared.parameters.is_empty() {
            return Err(MutationRequestError::HasValueParameters {
                function: function.to_string(),
            });
        }
        Ok(Self(function))
    }

    /// Validated function
    #[inline]
    #[must_use]
    pub fn function(&self) -> &TypedFunction {
        &self.0
    }
}

impl TryFrom<TypedFunction> for ConfiguringFunction {
    type Error = MutationRequestError;

    fn try_from(function: TypedFunction) -> Result<Self, Self::Error> {
        Self::new(function)
    }
}

/// Schema-level change
#[derive(Debug, Clone)]
pub enum ModelMutation {
    /// Assign a property
    SetPropertyValue {
        /// Target property
        property: TypedProperty,
        /// New value
        new_value: NewValueNodeProvider,
        /// Behavior if already assigned
        if_present: IfPresentBehavior,
    },

    /// Append a new element
    AddNewElement {
        /// New element
        new_element: NewElementNodeProvider,
    },

    /// Ensure a configuring block exists
    AddConfiguringBlockIfAbsent {
        /// Function opening the block
        function: ConfiguringFunction,
    },

    /// Remove property assignments
    UnsetProperty {
        /// Target property
        property: TypedProperty,
    },
}

impl ModelMutation {
    /// Set `property`, overwriting an existing assignment
    #[must_use]
    pub fn set_property_value(property: TypedProperty, new_value: impl Into<NewValueNodeProvider>) -> Self {
        Self::SetPropertyValue {
            property,
            new_value: new_value.into(),
            if_present: IfPresentBehavior::default(),
        }
    }

    /// Set `property` with explicit present-behavior
    #[must_use]
    pub fn set_property_value_with(
        property: TypedProperty,
        new_value: impl Into<NewValueNodeProvider>,
        if_present: IfPresentBehavior,
    ) -> Self {
        Self::SetPropertyValue {
            property,
            new_value: new_value.into(),
            if_present,
        }
    }

    /// Append a new element
    #[must_use]
    pub fn add_new_element(new_element: impl Into<NewElementNodeProvider>) -> Self {
        Self::AddNewElement {
            new_element: new_element.into(),
        }
    }

    /// Add a block for `function` unless one exists
    ///
    /// # Errors
    /// See [`ConfiguringFunction::new`]
    pub fn add_configuring_block_if_absent(
        function: TypedFunction,
    ) -> Result<Self, MutationRequestError> {
        Ok(Self::AddConfiguringBlockIfAbsent {
            function: ConfiguringFunction::new(function)?,
        })
    }

    /// Remove assignments of `property`
    #[inline]
    #[must_use]
    pub fn unset_property(property: TypedProperty) -> Self {
        Self::UnsetProperty { property }
    }

    /// Property targeted by property mutations
    #[inline]
    #[must_use]
    pub fn target_property(&self) -> Option<&TypedProperty> {
        match self {
            Self::SetPropertyValue { property, .. } | Self::UnsetProperty { property } => {
                Some(property)
            }
            Self::AddNewElement { .. } | Self::AddConfiguringBlockIfAbsent { .. } => None,
        }
    }
}

impl Display for ModelMutation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetPropertyValue { property, .. } => write!(f, "set `{property}`"),
            Self::AddNewElement { new_element } => match new_element {
                NewElementNodeProvider::Constant(element) => {
                    write!(f, "add element `{}`", element.name)
                }
                NewElementNodeProvider::ArgumentBased(_) => f.write_str("add element"),
            },
            Self::AddConfiguringBlockIfAbsent { function } => {
                write!(f, "add block `{}`", function.function().name())
            }
            Self::UnsetProperty { property } => write!(f, "unset `{property}`"),
        }
    }
}

/// Mutation bound to a location
#[derive(Debug, Clone)]
pub struct ModelMutationRequest {
    /// Where the mutation applies
    pub location: ScopeLocation,
    /// What to change
    pub mutation: ModelMutation,
    /// Behavior when no scope matches
    pub if_not_found: IfNotFoundBehavior,
}

impl ModelMutationRequest {
    /// Request failing and reporting when nothing matches
    #[inline]
    #[must_use]
    pub fn new(location: ScopeLocation, mutation: ModelMutation) -> Self {
        Self {
            location,
            mutation,
            if_not_found: IfNotFoundBehavior::default(),
        }
    }

    /// Override the not-found behavior
    #[inline]
    #[must_use]
    pub fn with_if_not_found(mut self, if_not_found: IfNotFoundBehavior) -> Self {
        self.if_not_found = if_not_found;
        self
    }
}

impl Display for ModelMutationRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.mutation, self.location)
    }
}
