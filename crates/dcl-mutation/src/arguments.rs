//! Mutation parameters and their bound arguments
//!
//! A [`MutationArgumentContainer`] carries caller-supplied values that
//! argument-based providers read while producing new nodes.

use crate::error::ArgumentError;
use dcl_document::ValueNode;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Kind of value a parameter accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// Integer
    Int,
    /// String
    String,
    /// Boolean
    Boolean,
}

/// Declared input of a mutation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MutationParameter {
    name: String,
    description: String,
    kind: ParameterKind,
}

impl MutationParameter {
    /// Declare a parameter
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, kind: ParameterKind) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
        }
    }

    /// Parameter name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable description
    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Accepted kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ParameterKind {
        self.kind
    }
}

impl Display for MutationParameter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}", self.name, self.kind)
    }
}

/// Bound argument value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgumentValue {
    /// Integer
    Int(i64),
    /// String
    String(String),
    /// Boolean
    Boolean(bool),
}

impl ArgumentValue {
    /// Kind of this value
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ParameterKind {
        match self {
            Self::Int(_) => ParameterKind::Int,
            Self::String(_) => ParameterKind::String,
            Self::Boolean(_) => ParameterKind::Boolean,
        }
    }

    /// Literal value node
    #[must_use]
    pub fn to_value_node(&self) -> ValueNode {
        match self {
            Self::Int(v) => ValueNode::int(*v),
            Self::String(v) => ValueNode::string(v.clone()),
            Self::Boolean(v) => ValueNode::boolean(*v),
        }
    }
}

impl From<i64> for ArgumentValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for ArgumentValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ArgumentValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for ArgumentValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// Arguments supplied alongside a batch of requests
///
/// Keyed by parameter name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MutationArgumentContainer {
    arguments: IndexMap<String, ArgumentValue>,
}

impl MutationArgumentContainer {
    /// Empty container
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `value` to `parameter`
    ///
    /// # Errors
    /// Returns error if the value kind does not match the parameter kind
    pub fn with_argument(
        mut self,
        parameter: &MutationParameter,
        value: impl Into<ArgumentValue>,
    ) -> Result<Self, ArgumentError> {
        let value = value.into();
        if value.kind() != parameter.kind() {
            return Err(ArgumentError::KindMismatch {
                name: parameter.name().to_string(),
                expected: parameter.kind(),
                actual: value.kind(),
            });
        }
        self.arguments.insert(parameter.name().to_string(), value);
        Ok(self)
    }

    /// Argument bound to `parameter`
    ///
    /// # Errors
    /// Returns error if nothing is bound or the bound kind differs
    pub fn get(&self, parameter: &MutationParameter) -> Result<&ArgumentValue, ArgumentError> {
        let value = self
            .arguments
            .get(parameter.name())
            .ok_or_else(|| ArgumentError::Missing(parameter.name().to_string()))?;
        if value.kind() != parameter.kind() {
            return Err(ArgumentError::KindMismatch {
                name: parameter.name().to_string(),
                expected: parameter.kind(),
                actual: value.kind(),
            });
        }
        Ok(value)
    }

    /// Integer argument
    ///
    /// # Errors
    /// See [`get`](Self::get)
    pub fn int(&self, parameter: &MutationParameter) -> Result<i64, ArgumentError> {
        match self.get(parameter)? {
            ArgumentValue::Int(v) => Ok(*v),
            other => Err(mismatch(parameter, other)),
        }
    }

    /// String argument
    ///
    /// # Errors
    /// See [`get`](Self::get)
    pub fn string(&self, parameter: &MutationParameter) -> Result<&str, ArgumentError> {
        match self.get(parameter)? {
            ArgumentValue::String(v) => Ok(v.as_str()),
            other => Err(mismatch(parameter, other)),
        }
    }

    /// Boolean argument
    ///
    /// # Errors
    /// See [`get`](Self::get)
    pub fn boolean(&self, parameter: &MutationParameter) -> Result<bool, ArgumentError> {
        match self.get(parameter)? {
            ArgumentValue::Boolean(v) => Ok(*v),
            other => Err(mismatch(parameter, other)),
        }
    }

    /// Argument as a literal value node
    ///
    /// # Errors
    /// See [`get`](Self::get)
    pub fn value_node(&self, parameter: &MutationParameter) -> Result<ValueNode, ArgumentError> {
        self.get(parameter).map(ArgumentValue::to_value_node)
    }

    /// Number of bound arguments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    /// Whether no argument is bound
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// Bound `(name, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgumentValue)> {
        self.arguments.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn mismatch(parameter: &MutationParameter, actual: &ArgumentValue) -> ArgumentError {
    ArgumentError::KindMismatch {
        name: parameter.name().to_string(),
        expected: parameter.kind(),
        actual: actual.kind(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn port() -> MutationParameter {
        MutationParameter::new("port", "listening port", ParameterKind::Int)
    }

    #[test]
    fn typed_lookup() {
        let host = MutationParameter::new("host", "host name", ParameterKind::String);
        let args = MutationArgumentContainer::new()
            .with_argument(&port(), 8080_i64)
            .unwrap()
            .with_argument(&host, "example.org")
            .unwrap();

        assert_eq!(args.int(&port()).unwrap(), 8080);
        assert_eq!(args.string(&host).unwrap(), "example.org");
        assert_eq!(args.value_node(&port()).unwrap(), ValueNode::int(8080));
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn missing_argument() {
        let args = MutationArgumentContainer::new();
        assert_eq!(
            args.int(&port()).unwrap_err(),
            ArgumentError::Missing("port".into())
        );
    }

    #[test]
    fn kind_mismatch_on_bind() {
        let err = MutationArgumentContainer::new()
            .with_argument(&port(), "eighty")
            .unwrap_err();
        assert!(matches!(
            err,
            ArgumentError::KindMismatch {
                expected: ParameterKind::Int,
                actual: ParameterKind::String,
                ..
            }
        ));
    }

    #[test]
    fn kind_mismatch_on_lookup() {
        let json = r#"{ "port": "eighty" }"#;
        let args: MutationArgumentContainer = serde_json::from_str(json).unwrap();
        assert!(matches!(
            args.int(&port()),
            Err(ArgumentError::KindMismatch { .. })
        ));
    }
}
