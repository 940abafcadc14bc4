//! DCL Mutation Planning
//!
//! Turns schema-aware model mutations into low-level document edits.
//!
//! # Core Concepts
//!
//! - [`ModelMutation`]: what to change, phrased in schema terms
//! - [`ScopeLocation`] / [`ScopeLocator`]: where in the document it applies
//! - [`ModelMutationRequest`]: a mutation bound to a location
//! - [`ModelToDocumentMutationPlanner`]: computes a [`ModelMutationPlan`]
//! - [`ModelMutationPlan`]: ordered [`DocumentMutation`](dcl_document::DocumentMutation)s
//!   plus per-scope [`UnsuccessfulModelMutation`]s
//!
//! # Example
//!
//! ```rust,ignore
//! use dcl_mutation::{
//!     DefaultModelMutationPlanner, ModelMutation, ModelMutationRequest,
//!     ModelToDocumentMutationPlanner, MutationArgumentContainer, ScopeLocation, TypedProperty,
//! };
//!
//! let port = TypedProperty::from_schema(&schema, "Server", "port")?;
//! let request = ModelMutationRequest::new(
//!     ScopeLocation::from_top_level().in_elements_named("server"),
//!     ModelMutation::set_property_value(port, ValueNode::int(8080)),
//! );
//!
//! let plan = DefaultModelMutationPlanner::new().plan_model_mutation(
//!     &schema,
//!     &resolved,
//!     &request,
//!     &MutationArgumentContainer::new(),
//! );
//! for failure in plan.unsuccessful_model_mutations() {
//!     eprintln!("{failure}");
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
mod applier;
mod arguments;
mod config;
mod error;
mod location;
mod member;
mod occurrence;
mod overlay;
mod plan;
mod planner;
mod provider;
mod request;

// Re-exports
pub use arguments::{ArgumentValue, MutationArgumentContainer, MutationParameter, ParameterKind};
pub use config::{OccurrenceSelection, PlannerConfig};
pub use error::{ArgumentError, ConfigError, MutationRequestError};
pub use location::{NestedScopeSelector, ScopeLocation, ScopeLocationElement, ScopeLocator};
pub use member::{TypedFunction, TypedMember, TypedProperty};
pub use occurrence::MemberOccurrences;
pub use overlay::{PendingEdits, PendingNode};
pub use plan::{ModelMutationFailureReason, ModelMutationPlan, UnsuccessfulModelMutation};
pub use planner::{DefaultModelMutationPlanner, ModelToDocumentMutationPlanner};
pub use provider::{ElementProducer, NewElementNodeProvider, NewValueNodeProvider, ValueProducer};
pub use request::{
    ConfiguringFunction, IfNotFoundBehavior, IfPresentBehavior, ModelMutation,
    ModelMutationRequest,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
