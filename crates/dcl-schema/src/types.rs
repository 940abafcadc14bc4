//! Type references used by the analysis schema
//!
//! Provides [`TypeName`] for naming schema data classes and [`DataTypeRef`]
//! for the value types of properties and parameters.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Fully-qualified name of a schema data class
///
/// Compared by exact string equality; no normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    /// Create a type name
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Name as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Simple name (segment after the last `.`)
    #[inline]
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }
}

impl Display for TypeName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Type of a property value or function parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum DataTypeRef {
    /// 64-bit signed integer
    Int,
    /// UTF-8 string
    String,
    /// Boolean
    Boolean,
    /// No value
    Unit,
    /// Reference to a schema data class
    Named(TypeName),
}

impl DataTypeRef {
    /// Named type reference
    #[inline]
    #[must_use]
    pub fn named(name: impl Into<TypeName>) -> Self {
        Self::Named(name.into())
    }

    /// Referenced class name, if this is not a primitive
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> Option<&TypeName> {
        match self {
            Self::Named(name) => Some(name),
            Self::Int | Self::String | Self::Boolean | Self::Unit => None,
        }
    }
}

impl Display for DataTypeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => f.write_str("Int"),
            Self::String => f.write_str("String"),
            Self::Boolean => f.write_str("Boolean"),
            Self::Unit => f.write_str("Unit"),
            Self::Named(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_name_strips_package() {
        assert_eq!(TypeName::new("com.example.Server").simple_name(), "Server");
        assert_eq!(TypeName::new("Server").simple_name(), "Server");
    }

    #[test]
    fn data_type_ref_serde_shape() {
        let json = serde_json::to_string(&DataTypeRef::named("Tls")).unwrap();
        assert_eq!(json, r#"{"kind":"named","name":"Tls"}"#);

        let int: DataTypeRef = serde_json::from_str(r#"{"kind":"int"}"#).unwrap();
        assert_eq!(int, DataTypeRef::Int);
    }

    #[test]
    fn primitive_has_no_type_name() {
        assert!(DataTypeRef::Boolean.type_name().is_none());
        assert_eq!(
            DataTypeRef::named("Tls").type_name(),
            Some(&TypeName::new("Tls"))
        );
    }
}
