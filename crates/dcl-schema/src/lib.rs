//! DCL Schema
//!
//! Static description of the legal shapes of a declarative configuration
//! document.
//!
//! # Overview
//!
//! - [`AnalysisSchema`]: the set of data classes plus the top-level receiver
//! - [`DataClass`]: a type with [`DataProperty`]s and [`SchemaFunction`]s
//! - [`FunctionSemantics`]: whether a function configures, adds, or computes
//!
//! # Example
//!
//! ```rust
//! use dcl_schema::{AnalysisSchema, DataClass, DataProperty, DataTypeRef, SchemaFunction};
//!
//! let schema = AnalysisSchema::new(
//!     "Project",
//!     [
//!         DataClass::new("Project").with_function(SchemaFunction::configuring("server", "Server")),
//!         DataClass::new("Server").with_property(DataProperty::new("port", DataTypeRef::Int)),
//!     ],
//! )
//! .unwrap();
//!
//! assert!(schema.property(&"Server".into(), "port").is_some());
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod schema;
pub mod types;

// Re-exports
pub use error::SchemaError;
pub use schema::{
    AnalysisSchema, DataClass, DataParameter, DataProperty, FunctionSemantics, SchemaFunction,
};
pub use types::{DataTypeRef, TypeName};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
