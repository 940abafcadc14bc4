//! Error types for mutation planning
//!
//! Provides error handling for:
//! - Request construction (schema preconditions)
//! - Argument lookup during value evaluation
//! - Planner configuration loading
//!
//! Planning outcomes themselves are never errors; they are reported as
//! [`ModelMutationFailureReason`](crate::ModelMutationFailureReason)s.

use crate::arguments::ParameterKind;
use dcl_schema::TypeName;

/// Malformed mutation request, rejected before any planning happens
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MutationRequestError {
    /// Function does not open a configuring block over an existing object
    #[error("only configuring functions are allowed in add-configuring-block mutations, got {function} with {semantics} semantics")]
    NotAccessAndConfigure {
        /// Offending function
        function: String,
        /// Its semantics label
        semantics: &'static str,
    },

    /// Function declares value parameters
    #[error("only functions with no value parameters are allowed in add-configuring-block mutations, got {function}")]
    HasValueParameters {
        /// Offending function
        function: String,
    },

    /// Owner type is not in the schema
    #[error("type {0} is not declared in the schema")]
    UnknownType(TypeName),

    /// Owner type has no such property
    #[error("{owner} declares no property named '{name}'")]
    UnknownProperty {
        /// Owner type
        owner: TypeName,
        /// Requested property
        name: String,
    },

    /// Owner type has no such function
    #[error("{owner} declares no function named '{name}'")]
    UnknownFunction {
        /// Owner type
        owner: TypeName,
        /// Requested function
        name: String,
    },
}

/// Argument lookup failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    /// No argument bound to the parameter
    #[error("missing argument '{0}'")]
    Missing(String),

    /// Bound argument has the wrong kind
    #[error("argument '{name}' expected {expected:?}, got {actual:?}")]
    KindMismatch {
        /// Parameter name
        name: String,
        /// Declared kind
        expected: ParameterKind,
        /// Supplied kind
        actual: ParameterKind,
    },

    /// Provider-specific evaluation failure
    #[error("{0}")]
    Evaluation(String),
}

/// Planner configuration loading failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Malformed TOML
    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// Malformed JSON
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
}
