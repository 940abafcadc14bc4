//! Schema members addressed by mutations
//!
//! [`TypedProperty`] and [`TypedFunction`] name a member together with the
//! type that declares it, so two types with a member of the same name are
//! never confused.

use crate::error::MutationRequestError;
use dcl_document::NodeResolution;
use dcl_schema::{AnalysisSchema, DataProperty, SchemaFunction, TypeName};
use std::fmt::{self, Display, Formatter};

/// Property together with its declaring type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypedProperty {
    owner: TypeName,
    property: DataProperty,
}

impl TypedProperty {
    /// Pair a property with its owner
    #[inline]
    #[must_use]
    pub fn new(owner: impl Into<TypeName>, property: DataProperty) -> Self {
        Self {
            owner: owner.into(),
            property,
        }
    }

    /// Look a property up in `schema`
    ///
    /// # Errors
    /// Returns error if the owner type or the property is not declared
    pub fn from_schema(
        schema: &AnalysisSchema,
        owner: impl Into<TypeName>,
        name: &str,
    ) -> Result<Self, MutationRequestError> {
        let owner = owner.into();
        let class = schema
            .data_class(&owner)
            .ok_or_else(|| MutationRequestError::UnknownType(owner.clone()))?;
        let property = class
            .property(name)
            .cloned()
            .ok_or_else(|| MutationRequestError::UnknownProperty {
                owner: owner.clone(),
                name: name.to_string(),
            })?;
        Ok(Self { owner, property })
    }

    /// Declaring type
    #[inline]
    #[must_use]
    pub fn owner(&self) -> &TypeName {
        &self.owner
    }

    /// Schema property
    #[inline]
    #[must_use]
    pub fn property(&self) -> &DataProperty {
        &self.property
    }

    /// Property name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.property.name
    }

    /// Whether a node resolution is an assignment to this property
    #[must_use]
    pub fn is_assigned_by(&self, resolution: &NodeResolution) -> bool {
        resolution
            .assigned_property()
            .is_some_and(|(receiver, name)| receiver == &self.owner && name == self.name())
    }
}

impl Display for TypedProperty {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.property.name)
    }
}

/// Function together with its declaring type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypedFunction {
    owner: TypeName,
    function: SchemaFunction,
}

impl TypedFunction {
    /// Pair a function with its owner
    #[inline]
    #[must_use]
    pub fn new(owner: impl Into<TypeName>, function: SchemaFunction) -> Self {
        Self {
            owner: owner.into(),
            function,
        }
    }

    /// Look a function up in `schema`
    ///
    /// # Errors
    /// Returns error if the owner type or the function is not declared
    pub fn from_schema(
        schema: &AnalysisSchema,
        owner: impl Into<TypeName>,
        name: &str,
    ) -> Result<Self, MutationRequestError> {
        let owner = owner.into();
        if schema.data_class(&owner).is_none() {
            return Err(MutationRequestError::UnknownType(owner));
        }
        let function = schema
            .function(&owner, name)
            .cloned()
            .ok_or_else(|| MutationRequestError::UnknownFunction {
                owner: owner.clone(),
                name: name.to_string(),
            })?;
        Ok(Self { owner, function })
    }

    /// Declaring type
    #[inline]
    #[must_use]
    pub fn owner(&self) -> &TypeName {
        &self.owner
    }

    /// Schema function
    #[inline]
    #[must_use]
    pub fn function(&self) -> &SchemaFunction {
        &self.function
    }

    /// Function name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.function.name
    }

    /// Whether an element resolution invokes this function
    #[must_use]
    pub fn is_invoked_by(&self, resolution: &NodeResolution) -> bool {
        resolution
            .invoked_function()
            .is_some_and(|(receiver, name)| receiver == &self.owner && name == self.name())
    }
}

impl Display for TypedFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.function)
    }
}

/// Either kind of typed member
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypedMember {
    /// Property member
    Property(TypedProperty),
    /// Function member
    Function(TypedFunction),
}

impl TypedMember {
    /// Declaring type
    #[inline]
    #[must_use]
    pub fn owner(&self) -> &TypeName {
        match self {
            Self::Property(p) => p.owner(),
            Self::Function(f) => f.owner(),
        }
    }

    /// Member name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Property(p) => p.name(),
            Self::Function(f) => f.name(),
        }
    }
}

impl From<TypedProperty> for TypedMember {
    fn from(property: TypedProperty) -> Self {
        Self::Property(property)
    }
}

impl From<TypedFunction> for TypedMember {
    fn from(function: TypedFunction) -> Self {
        Self::Function(function)
    }
}

impl Display for TypedMember {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property(p) => p.fmt(f),
            Self::Function(func) => func.fmt(f),
        }
    }
}
