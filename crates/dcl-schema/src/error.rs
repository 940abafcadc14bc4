//! Error types for schema construction

use crate::types::TypeName;

/// Errors raised while building or loading an [`AnalysisSchema`](crate::AnalysisSchema)
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Two classes share a name
    #[error("duplicate data class: {0}")]
    DuplicateType(TypeName),

    /// Top-level receiver is not declared
    #[error("top-level receiver type is not declared: {0}")]
    MissingTopLevelReceiver(TypeName),

    /// A member references an undeclared class
    #[error("{referenced_by} references unknown type {name}")]
    UnknownType {
        /// `Owner.member` that holds the reference
        referenced_by: String,
        /// The undeclared name
        name: TypeName,
    },

    /// Malformed JSON
    #[error("invalid schema JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
