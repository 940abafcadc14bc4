//! Per-scope application of one model mutation
//!
//! [`MutationApplier`] turns a mutation into edits for a single matched
//! scope, or into a failure reason. It reads the snapshot through
//! [`MemberOccurrences`], so edits queued earlier in the pass are observed.

use crate::arguments::MutationArgumentContainer;
use crate::config::{OccurrenceSelection, PlannerConfig};
use crate::member::{TypedFunction, TypedProperty};
use crate::occurrence::MemberOccurrences;
use crate::plan::ModelMutationFailureReason;
use crate::provider::{NewElementNodeProvider, NewValueNodeProvider};
use crate::request::{IfPresentBehavior, ModelMutation};
use dcl_document::{
    DocumentMutation, DocumentNode, ElementNode, IdAllocator, PropertyNode, ResolvedDocument,
    ScopeRef,
};
use dcl_schema::{AnalysisSchema, TypeName};

/// Result of applying a mutation in one scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ApplyOutcome {
    /// Edits to queue
    Edits(Vec<DocumentMutation>),
    /// Nothing to do
    Unchanged,
    /// Mutation cannot be applied here
    Failed(ModelMutationFailureReason),
}

/// Applies mutations against one snapshot
#[derive(Debug, Clone, Copy)]
pub(crate) struct MutationApplier<'a> {
    schema: &'a AnalysisSchema,
    document: &'a ResolvedDocument,
    arguments: &'a MutationArgumentContainer,
    config: &'a PlannerConfig,
}

impl<'a> MutationApplier<'a> {
    pub(crate) fn new(
        schema: &'a AnalysisSchema,
        document: &'a ResolvedDocument,
        arguments: &'a MutationArgumentContainer,
        config: &'a PlannerConfig,
    ) -> Self {
        Self {
            schema,
            document,
            arguments,
            config,
        }
    }

    /// Apply `mutation` in `scope`
    ///
    /// New nodes take their ids from `ids`.
    pub(crate) fn apply(
        &self,
        occurrences: MemberOccurrences<'_>,
        scope: ScopeRef,
        mutation: &ModelMutation,
        ids: &mut IdAllocator,
    ) -> ApplyOutcome {
        match mutation {
            ModelMutation::SetPropertyValue {
                property,
                new_value,
                if_present,
            } => self.set_property(occurrences, scope, property, new_value, *if_present, ids),
            ModelMutation::UnsetProperty { property } => {
                self.unset_property(occurrences, scope, property)
            }
            ModelMutation::AddNewElement { new_element } => {
                self.add_element(scope, new_element, ids)
            }
            ModelMutation::AddConfiguringBlockIfAbsent { function } => {
                self.add_block(occurrences, scope, function.function(), ids)
            }
        }
    }

    fn set_property(
        &self,
        occurrences: MemberOccurrences<'_>,
        scope: ScopeRef,
        property: &TypedProperty,
        new_value: &NewValueNodeProvider,
        if_present: IfPresentBehavior,
        ids: &mut IdAllocator,
    ) -> ApplyOutcome {
        if let Some(reason) = self.receiver_mismatch(scope, property.owner()) {
            return ApplyOutcome::Failed(reason);
        }

        let existing = occurrences.properties(scope, property);
        match (existing.first(), if_present) {
            (None, _) => {
                let value = match new_value.produce(self.arguments) {
                    Ok(value) => value,
                    Err(e) => return evaluation_failed(&e),
                };
                let Some(id) = ids.allocate() else {
                    return ids_exhausted();
                };
                let node = PropertyNode {
                    id,
                    name: property.name().to_string(),
                    value,
                };
                ApplyOutcome::Edits(vec![DocumentMutation::InsertNodesToEndOfScope {
                    scope,
                    nodes: vec![node.into()],
                }])
            }
            (Some(&target), IfPresentBehavior::Overwrite) => {
                match new_value.produce(self.arguments) {
                    Ok(value) => {
                        ApplyOutcome::Edits(vec![DocumentMutation::ReplaceValue { target, value }])
                    }
                    Err(e) => evaluation_failed(&e),
                }
            }
            (Some(_), IfPresentBehavior::FailAndReport) => {
                ApplyOutcome::Failed(ModelMutationFailureReason::TargetAlreadyPresent)
            }
            (Some(_), IfPresentBehavior::Ignore) => ApplyOutcome::Unchanged,
        }
    }

    fn unset_property(
        &self,
        occurrences: MemberOccurrences<'_>,
        scope: ScopeRef,
        property: &TypedProperty,
    ) -> ApplyOutcome {
        if let Some(reason) = self.receiver_mismatch(scope, property.owner()) {
            return ApplyOutcome::Failed(reason);
        }

        let mut existing = occurrences.properties(scope, property);
        if existing.is_empty() {
            return ApplyOutcome::Failed(ModelMutationFailureReason::TargetPropertyNotFound);
        }
        if self.config.unset_occurrences == OccurrenceSelection::First {
            existing.truncate(1);
        }
        ApplyOutcome::Edits(
            existing
                .into_iter()
                .map(|target| DocumentMutation::RemoveNode { target })
                .collect(),
        )
    }

    fn add_element(
        &self,
        scope: ScopeRef,
        new_element: &NewElementNodeProvider,
        ids: &mut IdAllocator,
    ) -> ApplyOutcome {
        match new_element.produce(self.arguments) {
            Ok(element) => match DocumentNode::Element(element).with_fresh_ids(ids) {
                Some(node) => ApplyOutcome::Edits(vec![DocumentMutation::InsertNodesToEndOfScope {
                    scope,
                    nodes: vec![node],
                }]),
                None => ids_exhausted(),
            },
            Err(e) => evaluation_failed(&e),
        }
    }

    fn add_block(
        &self,
        occurrences: MemberOccurrences<'_>,
        scope: ScopeRef,
        function: &TypedFunction,
        ids: &mut IdAllocator,
    ) -> ApplyOutcome {
        if let Some(reason) = self.receiver_mismatch(scope, function.owner()) {
            return ApplyOutcome::Failed(reason);
        }
        if !occurrences.blocks(scope, function).is_empty() {
            return ApplyOutcome::Unchanged;
        }

        let Some(id) = ids.allocate() else {
            return ids_exhausted();
        };
        let mut block = ElementNode::detached(function.name());
        block.id = id;
        ApplyOutcome::Edits(vec![DocumentMutation::InsertNodesToEndOfScope {
            scope,
            nodes: vec![block.into()],
        }])
    }

    fn receiver_mismatch(
        &self,
        scope: ScopeRef,
        owner: &TypeName,
    ) -> Option<ModelMutationFailureReason> {
        let actual = self.document.scope_receiver(self.schema, scope);
        (actual != Some(owner)).then(|| ModelMutationFailureReason::ScopeTypeMismatch {
            expected: owner.clone(),
            actual: actual.cloned(),
        })
    }
}

fn ids_exhausted() -> ApplyOutcome {
    ApplyOutcome::Failed(ModelMutationFailureReason::NodeIdsExhausted)
}

fn evaluation_failed(error: &crate::error::ArgumentError) -> ApplyOutcome {
    ApplyOutcome::Failed(ModelMutationFailureReason::ArgumentEvaluationFailed {
        message: error.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arguments::{MutationParameter, ParameterKind};
    use dcl_document::{DocumentBuilder, DocumentResolver, NodeId, ValueNode};
    use dcl_schema::{DataClass, DataProperty, DataTypeRef, SchemaFunction};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn schema() -> AnalysisSchema {
        AnalysisSchema::new(
            "Project",
            [
                DataClass::new("Project")
                    .with_function(SchemaFunction::configuring("server", "Server")),
                DataClass::new("Server")
                    .with_property(DataProperty::new("port", DataTypeRef::Int))
                    .with_function(SchemaFunction::configuring("tls", "Tls")),
                DataClass::new("Tls"),
            ],
        )
        .unwrap()
    }

    // server(#1) { port(#2) port(#3) tls(#4) }
    fn resolved(schema: &AnalysisSchema) -> ResolvedDocument {
        let doc = DocumentBuilder::new()
            .element("server", |s| {
                s.property("port", ValueNode::int(80))
                    .property("port", ValueNode::int(81))
                    .element("tls", |t| t)
            })
            .build();
        DocumentResolver::new(schema).resolve(doc).unwrap()
    }

    fn port(schema: &AnalysisSchema) -> TypedProperty {
        TypedProperty::from_schema(schema, "Server", "port").unwrap()
    }

    const SERVER: ScopeRef = ScopeRef::Element(NodeId::new(1));

    fn run(
        schema: &AnalysisSchema,
        document: &ResolvedDocument,
        scope: ScopeRef,
        mutation: &ModelMutation,
    ) -> ApplyOutcome {
        run_with(schema, document, &PlannerConfig::default(), scope, mutation)
    }

    fn run_with(
        schema: &AnalysisSchema,
        document: &ResolvedDocument,
        config: &PlannerConfig,
        scope: ScopeRef,
        mutation: &ModelMutation,
    ) -> ApplyOutcome {
        let arguments = MutationArgumentContainer::new();
        let mut ids = document
            .next_free_id()
            .map_or_else(IdAllocator::exhausted, IdAllocator::starting_at);
        MutationApplier::new(schema, document, &arguments, config).apply(
            MemberOccurrences::new(document),
            scope,
            mutation,
            &mut ids,
        )
    }

    #[test]
    fn overwrite_targets_first_occurrence() {
        let schema = schema();
        let document = resolved(&schema);
        let mutation = ModelMutation::set_property_value(port(&schema), ValueNode::int(8080));

        let outcome = run(&schema, &document, SERVER, &mutation);
        assert_eq!(
            outcome,
            ApplyOutcome::Edits(vec![DocumentMutation::ReplaceValue {
                target: NodeId::new(2),
                value: ValueNode::int(8080),
            }])
        );
    }

    #[test]
    fn present_behaviors() {
        let schema = schema();
        let document = resolved(&schema);

        let fail = ModelMutation::set_property_value_with(
            port(&schema),
            ValueNode::int(1),
            IfPresentBehavior::FailAndReport,
        );
        assert_eq!(
            run(&schema, &document, SERVER, &fail),
            ApplyOutcome::Failed(ModelMutationFailureReason::TargetAlreadyPresent)
        );

        let ignore = ModelMutation::set_property_value_with(
            port(&schema),
            ValueNode::int(1),
            IfPresentBehavior::Ignore,
        );
        assert_eq!(
            run(&schema, &document, SERVER, &ignore),
            ApplyOutcome::Unchanged
        );
    }

    #[test]
    fn unset_selection_follows_config() {
        let schema = schema();
        let document = resolved(&schema);
        let mutation = ModelMutation::unset_property(port(&schema));

        let all = run(&schema, &document, SERVER, &mutation);
        assert_eq!(
            all,
            ApplyOutcome::Edits(vec![
                DocumentMutation::RemoveNode { target: NodeId::new(2) },
                DocumentMutation::RemoveNode { target: NodeId::new(3) },
            ])
        );

        let first_only = PlannerConfig::new().with_unset_occurrences(OccurrenceSelection::First);
        let first = run_with(&schema, &document, &first_only, SERVER, &mutation);
        assert_eq!(
            first,
            ApplyOutcome::Edits(vec![DocumentMutation::RemoveNode { target: NodeId::new(2) }])
        );
    }

    #[test]
    fn property_mutation_in_foreign_scope() {
        let schema = schema();
        let document = resolved(&schema);
        let mutation = ModelMutation::unset_property(port(&schema));

        let outcome = run(&schema, &document, ScopeRef::Root, &mutation);
        assert_eq!(
            outcome,
            ApplyOutcome::Failed(ModelMutationFailureReason::ScopeTypeMismatch {
                expected: "Server".into(),
                actual: Some("Project".into()),
            })
        );
    }

    #[test]
    fn existing_block_is_left_alone() {
        let schema = schema();
        let document = resolved(&schema);
        let tls = TypedFunction::from_schema(&schema, "Server", "tls").unwrap();
        let mutation = ModelMutation::add_configuring_block_if_absent(tls).unwrap();

        let outcome = run(&schema, &document, SERVER, &mutation);
        assert_eq!(outcome, ApplyOutcome::Unchanged);
    }

    #[test]
    fn provider_not_evaluated_for_no_op() {
        let schema = schema();
        let document = resolved(&schema);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let provider = NewValueNodeProvider::argument_based(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(ValueNode::int(1))
        });
        let mutation = ModelMutation::set_property_value_with(
            port(&schema),
            provider,
            IfPresentBehavior::Ignore,
        );

        run(&schema, &document, SERVER, &mutation);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn provider_failure_is_reported() {
        let schema = schema();
        let document = resolved(&schema);
        let parameter = MutationParameter::new("name", "element name", ParameterKind::String);
        let provider = NewElementNodeProvider::argument_based(move |args| {
            Ok(ElementNode::detached(args.string(&parameter)?))
        });
        let mutation = ModelMutation::add_new_element(provider);

        let outcome = run(&schema, &document, SERVER, &mutation);
        assert_eq!(
            outcome,
            ApplyOutcome::Failed(ModelMutationFailureReason::ArgumentEvaluationFailed {
                message: "missing argument 'name'".into(),
            })
        );
    }

    #[test]
    fn new_element_gets_fresh_ids() {
        let schema = schema();
        let document = resolved(&schema);
        let element =
            ElementNode::detached("tls").with_property("enabled", ValueNode::boolean(true));
        let mutation = ModelMutation::add_new_element(element);

        let ApplyOutcome::Edits(edits) = run(&schema, &document, SERVER, &mutation) else {
            panic!("expected edits");
        };
        let DocumentMutation::InsertNodesToEndOfScope { nodes, .. } = &edits[0] else {
            panic!("expected insert");
        };
        assert_eq!(nodes[0].id(), NodeId::new(5));
        assert_eq!(nodes[0].as_element().unwrap().content[0].id(), NodeId::new(6));
    }
}
