//! DCL Document
//!
//! Declarative document trees, their schema resolution, and structural
//! edits.
//!
//! # Core Concepts
//!
//! - [`Document`] / [`DocumentNode`]: the tree of elements, properties, and errors
//! - [`ResolvedDocument`]: a document plus a [`NodeResolution`] per node
//! - [`DocumentResolver`]: reference resolver against an [`AnalysisSchema`](dcl_schema::AnalysisSchema)
//! - [`DocumentMutation`]: low-level edit instructions
//! - [`DocumentEditor`]: reference executor applying edits to a snapshot
//! - [`DocumentHash`]: Blake3 digest identifying a snapshot
//!
//! # Example
//!
//! ```rust,ignore
//! use dcl_document::{DocumentBuilder, DocumentResolver, ValueNode};
//!
//! let doc = DocumentBuilder::new()
//!     .element("server", |s| s.property("port", ValueNode::int(8080)))
//!     .build();
//! let resolved = DocumentResolver::new(&schema).resolve(doc)?;
//! println!("snapshot {}", resolved.content_hash().short());
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

// Core modules
mod builder;
mod edit;
mod hash;
mod mutation;
mod node;
mod path;
mod resolution;
mod resolver;

// Re-exports
pub use builder::{DocumentBuilder, ElementBuilder};
pub use edit::{DocumentEditor, EditError};
pub use hash::{DocumentHash, HashError};
pub use mutation::{DocumentMutation, MutationKind};
pub use node::{
    Document, DocumentNode, ElementNode, ErrorNode, IdAllocator, LiteralValue, NodeId,
    PropertyNode, ValueNode,
};
pub use path::{ElementPath, PathError};
pub use resolution::{NodeResolution, ResolvedDocument, ScopeRef};
pub use resolver::DocumentResolver;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
