//! Testing utilities for DCL workspace
//!
//! Shared fixtures: a small project schema, documents written against it,
//! and helpers for planning and executing mutations.

#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc)]

use dcl_document::{
    Document, DocumentBuilder, DocumentEditor, DocumentResolver, ResolvedDocument, ValueNode,
};
use dcl_mutation::{
    DefaultModelMutationPlanner, ModelMutationPlan, ModelMutationRequest,
    ModelToDocumentMutationPlanner, MutationArgumentContainer, PlannerConfig, TypedFunction,
    TypedProperty,
};
use dcl_schema::{
    AnalysisSchema, DataClass, DataParameter, DataProperty, DataTypeRef, SchemaFunction,
};

/// Schema used across tests:
///
/// ```text
/// Project  { name, version; server { }, listener(port) { }, file(path) }
/// Server   { host, port; tls { } }
/// Listener { protocol }
/// Tls      { enabled }
/// ```
pub fn project_schema() -> AnalysisSchema {
    AnalysisSchema::new(
        "Project",
        [
            DataClass::new("Project")
                .with_property(DataProperty::new("name", DataTypeRef::String))
                .with_property(DataProperty::new("version", DataTypeRef::String))
                .with_function(SchemaFunction::configuring("server", "Server"))
                .with_function(SchemaFunction::adding(
                    "listener",
                    vec![DataParameter::new("port", DataTypeRef::Int)],
                    "Listener",
                ))
                .with_function(SchemaFunction::pure(
                    "file",
                    vec![DataParameter::new("path", DataTypeRef::String)],
                    DataTypeRef::String,
                )),
            DataClass::new("Server")
                .with_property(DataProperty::new("host", DataTypeRef::String))
                .with_property(DataProperty::new("port", DataTypeRef::Int))
                .with_function(SchemaFunction::configuring("tls", "Tls")),
            DataClass::new("Listener")
                .with_property(DataProperty::new("protocol", DataTypeRef::String)),
            DataClass::new("Tls").with_property(DataProperty::new("enabled", DataTypeRef::Boolean)),
        ],
    )
    .unwrap()
}

pub fn resolve(schema: &AnalysisSchema, document: Document) -> ResolvedDocument {
    DocumentResolver::new(schema).resolve(document).unwrap()
}

/// `server { }`
pub fn empty_server_document() -> Document {
    DocumentBuilder::new().element("server", |s| s).build()
}

/// Two sibling `server` blocks, the first with a port
pub fn two_servers_document() -> Document {
    DocumentBuilder::new()
        .element("server", |s| s.property("port", ValueNode::int(80)))
        .element("server", |s| s)
        .build()
}

/// A project touching every member of [`project_schema`]
pub fn full_project_document() -> Document {
    DocumentBuilder::new()
        .property("name", ValueNode::string("demo"))
        .element("server", |s| {
            s.property("host", ValueNode::string("localhost"))
                .property("port", ValueNode::int(80))
                .element("tls", |t| t.property("enabled", ValueNode::boolean(false)))
        })
        .element_with_args("listener", vec![ValueNode::int(8080)], |l| {
            l.property("protocol", ValueNode::string("http"))
        })
        .build()
}

pub fn property(schema: &AnalysisSchema, owner: &str, name: &str) -> TypedProperty {
    TypedProperty::from_schema(schema, owner, name).unwrap()
}

pub fn function(schema: &AnalysisSchema, owner: &str, name: &str) -> TypedFunction {
    TypedFunction::from_schema(schema, owner, name).unwrap()
}

pub fn plan(
    schema: &AnalysisSchema,
    document: &ResolvedDocument,
    requests: &[ModelMutationRequest],
) -> ModelMutationPlan {
    plan_with(
        PlannerConfig::default(),
        schema,
        document,
        requests,
        &MutationArgumentContainer::new(),
    )
}

pub fn plan_with(
    config: PlannerConfig,
    schema: &AnalysisSchema,
    document: &ResolvedDocument,
    requests: &[ModelMutationRequest],
    arguments: &MutationArgumentContainer,
) -> ModelMutationPlan {
    DefaultModelMutationPlanner::with_config(config)
        .plan_model_mutations(schema, document, requests, arguments)
}

/// Execute `plan` on `document` and resolve the result
pub fn execute(
    schema: &AnalysisSchema,
    document: &ResolvedDocument,
    plan: &ModelMutationPlan,
) -> ResolvedDocument {
    let edited = DocumentEditor::new()
        .apply(document, plan.base_hash(), plan.document_mutations())
        .unwrap();
    resolve(schema, edited)
}

/// Install a test subscriber honoring `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
