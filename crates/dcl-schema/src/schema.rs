//! Analysis schema: the legal shapes of a declarative document
//!
//! An [`AnalysisSchema`] is an immutable set of [`DataClass`]es plus the
//! top-level receiver type the document root is resolved against.

use crate::error::SchemaError;
use crate::types::{DataTypeRef, TypeName};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Property declared by a data class
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataProperty {
    /// Property name as written in documents
    pub name: String,

    /// Type of assigned values
    pub value_type: DataTypeRef,

    /// Read-only properties cannot be assigned
    #[serde(default)]
    pub read_only: bool,
}

impl DataProperty {
    /// Writable property
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, value_type: DataTypeRef) -> Self {
        Self {
            name: name.into(),
            value_type,
            read_only: false,
        }
    }

    /// Mark as read-only
    #[inline]
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

/// Value parameter of a schema function
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataParameter {
    /// Optional parameter name
    #[serde(default)]
    pub name: Option<String>,

    /// Parameter type
    pub parameter_type: DataTypeRef,
}

impl DataParameter {
    /// Named parameter
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, parameter_type: DataTypeRef) -> Self {
        Self {
            name: Some(name.into()),
            parameter_type,
        }
    }
}

/// What invoking a function does to the model
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FunctionSemantics {
    /// Opens a configuring block over an existing nested object
    AccessAndConfigure {
        /// Type of the accessed object
        accessed_type: TypeName,
    },

    /// Creates a new object and opens a configuring block over it
    AddAndConfigure {
        /// Type of the created object
        configured_type: TypeName,
    },

    /// Returns a value without configuring anything
    Pure {
        /// Returned value type
        return_type: DataTypeRef,
    },

    /// Builder-style call returning its receiver
    Builder,
}

impl FunctionSemantics {
    /// Whether this is access-and-configure semantics
    #[inline]
    #[must_use]
    pub fn is_access_and_configure(&self) -> bool {
        matches!(self, Self::AccessAndConfigure { .. })
    }

    /// Type configured by the function's block, if it opens one
    #[inline]
    #[must_use]
    pub fn configured_type(&self) -> Option<&TypeName> {
        match self {
            Self::AccessAndConfigure { accessed_type } => Some(accessed_type),
            Self::AddAndConfigure { configured_type } => Some(configured_type),
            Self::Pure { .. } | Self::Builder => None,
        }
    }

    /// Short label for diagnostics
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::AccessAndConfigure { .. } => "access-and-configure",
            Self::AddAndConfigure { .. } => "add-and-configure",
            Self::Pure { .. } => "pure",
            Self::Builder => "builder",
        }
    }
}

/// Member function declared by a data class
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaFunction {
    /// Function name as written in documents
    pub name: String,

    /// Value parameters
    #[serde(default)]
    pub parameters: Vec<DataParameter>,

    /// Invocation semantics
    pub semantics: FunctionSemantics,
}

impl SchemaFunction {
    /// Access-and-configure function with no parameters
    #[inline]
    #[must_use]
    pub fn configuring(name: impl Into<String>, accessed_type: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            semantics: FunctionSemantics::AccessAndConfigure {
                accessed_type: accessed_type.into(),
            },
        }
    }

    /// Add-and-configure function
    #[inline]
    #[must_use]
    pub fn adding(
        name: impl Into<String>,
        parameters: Vec<DataParameter>,
        configured_type: impl Into<TypeName>,
    ) -> Self {
        Self {
            name: name.into(),
            parameters,
            semantics: FunctionSemantics::AddAndConfigure {
                configured_type: configured_type.into(),
            },
        }
    }

    /// Pure function
    #[inline]
    #[must_use]
    pub fn pure(
        name: impl Into<String>,
        parameters: Vec<DataParameter>,
        return_type: DataTypeRef,
    ) -> Self {
        Self {
            name: name.into(),
            parameters,
            semantics: FunctionSemantics::Pure { return_type },
        }
    }

    /// Add a value parameter
    #[inline]
    #[must_use]
    pub fn with_parameter(mut self, parameter: DataParameter) -> Self {
        self.parameters.push(parameter);
        self
    }
}

impl Display for SchemaFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match &param.name {
                Some(name) => write!(f, "{name}: {}", param.parameter_type)?,
                None => write!(f, "{}", param.parameter_type)?,
            }
        }
        f.write_str(")")
    }
}

/// Data class: a named type with properties and member functions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataClass {
    /// Fully-qualified name
    pub name: TypeName,

    /// Declared properties
    #[serde(default)]
    pub properties: Vec<DataProperty>,

    /// Declared member functions
    #[serde(default)]
    pub member_functions: Vec<SchemaFunction>,
}

impl DataClass {
    /// Empty class
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
            member_functions: Vec::new(),
        }
    }

    /// Add a property
    #[inline]
    #[must_use]
    pub fn with_property(mut self, property: DataProperty) -> Self {
        self.properties.push(property);
        self
    }

    /// Add a member function
    #[inline]
    #[must_use]
    pub fn with_function(mut self, function: SchemaFunction) -> Self {
        self.member_functions.push(function);
        self
    }

    /// Property by name
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&DataProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Member functions with the given name, in declaration order
    pub fn functions_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a SchemaFunction> {
        self.member_functions.iter().filter(move |f| f.name == name)
    }
}

/// Serialized form of the schema
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawSchema {
    top_level_receiver: TypeName,
    data_classes: Vec<DataClass>,
}

/// Static description of legal document shapes
///
/// # Invariants
/// - the top-level receiver names a declared class
/// - every named type referenced by a property, parameter, or function
///   semantics names a declared class
/// - class names are unique
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSchema", into = "RawSchema")]
pub struct AnalysisSchema {
    top_level_receiver: TypeName,
    data_classes: IndexMap<TypeName, DataClass>,
}

impl AnalysisSchema {
    /// Build and validate a schema
    ///
    /// # Errors
    /// Returns error if class names repeat or a referenced type is undeclared
    pub fn new(
        top_level_receiver: impl Into<TypeName>,
        classes: impl IntoIterator<Item = DataClass>,
    ) -> Result<Self, SchemaError> {
        let mut data_classes = IndexMap::new();
        for class in classes {
            if data_classes.contains_key(&class.name) {
                return Err(SchemaError::DuplicateType(class.name));
            }
            data_classes.insert(class.name.clone(), class);
        }

        let schema = Self {
            top_level_receiver: top_level_receiver.into(),
            data_classes,
        };
        schema.validate()?;
        Ok(schema)
    }

    /// Parse from JSON
    ///
    /// # Errors
    /// Returns error if JSON is malformed or the schema is inconsistent
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_json(&self) -> Result<String, SchemaError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Type the document root is resolved against
    #[inline]
    #[must_use]
    pub fn top_level_receiver(&self) -> &TypeName {
        &self.top_level_receiver
    }

    /// Class by name
    #[inline]
    #[must_use]
    pub fn data_class(&self, name: &TypeName) -> Option<&DataClass> {
        self.data_classes.get(name)
    }

    /// All classes in declaration order
    pub fn data_classes(&self) -> impl Iterator<Item = &DataClass> {
        self.data_classes.values()
    }

    /// Property `name` declared by `owner`
    #[must_use]
    pub fn property(&self, owner: &TypeName, name: &str) -> Option<&DataProperty> {
        self.data_class(owner)?.property(name)
    }

    /// First function `name` declared by `owner`
    #[must_use]
    pub fn function(&self, owner: &TypeName, name: &str) -> Option<&SchemaFunction> {
        self.data_class(owner)?
            .member_functions
            .iter()
            .find(|f| f.name == name)
    }

    fn validate(&self) -> Result<(), SchemaError> {
        if !self.data_classes.contains_key(&self.top_level_receiver) {
            return Err(SchemaError::MissingTopLevelReceiver(
                self.top_level_receiver.clone(),
            ));
        }

        for class in self.data_classes.values() {
            for property in &class.properties {
                self.check_type_ref(&class.name, &property.name, &property.value_type)?;
            }
            for function in &class.member_functions {
                for param in &function.parameters {
                    self.check_type_ref(&class.name, &function.name, &param.parameter_type)?;
                }
                if let Some(configured) = function.semantics.configured_type() {
                    self.check_type_name(&class.name, &function.name, configured)?;
                }
                if let FunctionSemantics::Pure { return_type } = &function.semantics {
                    self.check_type_ref(&class.name, &function.name, return_type)?;
                }
            }
        }
        Ok(())
    }

    fn check_type_ref(
        &self,
        owner: &TypeName,
        member: &str,
        type_ref: &DataTypeRef,
    ) -> Result<(), SchemaError> {
        match type_ref.type_name() {
            Some(name) => self.check_type_name(owner, member, name),
            None => Ok(()),
        }
    }

    fn check_type_name(
        &self,
        owner: &TypeName,
        member: &str,
        name: &TypeName,
    ) -> Result<(), SchemaError> {
        if self.data_classes.contains_key(name) {
            Ok(())
        } else {
            Err(SchemaError::UnknownType {
                referenced_by: format!("{owner}.{member}"),
                name: name.clone(),
            })
        }
    }
}

impl TryFrom<RawSchema> for AnalysisSchema {
    type Error = SchemaError;

    fn try_from(raw: RawSchema) -> Result<Self, Self::Error> {
        Self::new(raw.top_level_receiver, raw.data_classes)
    }
}

impl From<AnalysisSchema> for RawSchema {
    fn from(schema: AnalysisSchema) -> Self {
        Self {
            top_level_receiver: schema.top_level_receiver,
            data_classes: schema.data_classes.into_values().collect(),
        }
    }
}
