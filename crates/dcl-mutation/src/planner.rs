//! Planning model mutations as document edits
//!
//! Provides the [`ModelToDocumentMutationPlanner`] trait and its default
//! implementation. Planning is pure: the resolved document is never
//! modified, and the same inputs always produce the same plan.

use crate::applier::{ApplyOutcome, MutationApplier};
use crate::arguments::MutationArgumentContainer;
use crate::config::PlannerConfig;
use crate::location::ScopeLocator;
use crate::occurrence::MemberOccurrences;
use crate::overlay::{PendingEdits, PendingNode};
use crate::plan::{ModelMutationPlan, UnsuccessfulModelMutation};
use crate::request::{IfNotFoundBehavior, ModelMutationRequest};
use dcl_document::{
    DocumentMutation, DocumentResolver, IdAllocator, NodeResolution, ResolvedDocument,
};
use dcl_schema::AnalysisSchema;

/// Turns model mutation requests into a [`ModelMutationPlan`]
///
/// # Invariants
/// - the plan's base hash is the hash of `document`
/// - edits follow request order, then scope pre-order within a request
/// - a request matching no scope yields no edits
pub trait ModelToDocumentMutationPlanner: Send + Sync + std::fmt::Debug {
    /// Plan a single request
    fn plan_model_mutation(
        &self,
        schema: &AnalysisSchema,
        document: &ResolvedDocument,
        request: &ModelMutationRequest,
        arguments: &MutationArgumentContainer,
    ) -> ModelMutationPlan {
        self.plan_model_mutations(schema, document, std::slice::from_ref(request), arguments)
    }

    /// Plan requests in order against one snapshot
    fn plan_model_mutations(
        &self,
        schema: &AnalysisSchema,
        document: &ResolvedDocument,
        requests: &[ModelMutationRequest],
        arguments: &MutationArgumentContainer,
    ) -> ModelMutationPlan;

    /// Planner name (for debugging)
    fn name(&self) -> &'static str;
}

/// Default planner
#[derive(Debug, Clone, Default)]
pub struct DefaultModelMutationPlanner {
    config: PlannerConfig,
}

impl DefaultModelMutationPlanner {
    /// Planner with default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Planner with `config`
    #[inline]
    #[must_use]
    pub fn with_config(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    fn plan_request(
        &self,
        state: &mut PassState<'_>,
        request: &ModelMutationRequest,
        plan: &mut ModelMutationPlan,
    ) {
        let scopes = ScopeLocator::new().locate(state.document, &request.location);
        if scopes.is_empty() {
            match request.if_not_found {
                IfNotFoundBehavior::FailAndReport => {
                    tracing::warn!(location = %request.location, "no scope matched: {}", request.mutation);
                    plan.push_failure(UnsuccessfulModelMutation::unmatched(request.clone()));
                }
                IfNotFoundBehavior::Ignore => {
                    tracing::debug!(location = %request.location, "no scope matched, ignored");
                }
            }
            return;
        }

        let (mut edits, mut failures) = (0_usize, 0_usize);
        for &scope in &scopes {
            let occurrences = if self.config.track_pending_edits {
                MemberOccurrences::with_pending(state.document, &state.pending)
            } else {
                MemberOccurrences::new(state.document)
            };
            let outcome = state
                .applier
                .apply(occurrences, scope, &request.mutation, &mut state.ids);

            match outcome {
                ApplyOutcome::Edits(queued) => {
                    for edit in &queued {
                        tracing::debug!(%scope, "queued {edit}");
                    }
                    if self.config.track_pending_edits {
                        state.record(&queued);
                    }
                    edits += queued.len();
                    plan.push_edits(queued);
                }
                ApplyOutcome::Unchanged => {
                    tracing::debug!(%scope, "already satisfied: {}", request.mutation);
                }
                ApplyOutcome::Failed(reason) => {
                    tracing::debug!(%scope, %reason, "mutation failed in scope");
                    failures += 1;
                    plan.push_failure(UnsuccessfulModelMutation::in_scope(
                        request.clone(),
                        scope,
                        state.document.scope_path(scope),
                        reason,
                    ));
                }
            }
        }

        tracing::info!(
            scopes = scopes.len(),
            edits,
            failures,
            "planned {}",
            request.mutation
        );
    }
}

impl ModelToDocumentMutationPlanner for DefaultModelMutationPlanner {
    fn plan_model_mutations(
        &self,
        schema: &AnalysisSchema,
        document: &ResolvedDocument,
        requests: &[ModelMutationRequest],
        arguments: &MutationArgumentContainer,
    ) -> ModelMutationPlan {
        let mut state = PassState {
            schema,
            document,
            applier: MutationApplier::new(schema, document, arguments, &self.config),
            pending: PendingEdits::new(),
            ids: document
                .next_free_id()
                .map_or_else(IdAllocator::exhausted, IdAllocator::starting_at),
        };

        let mut plan = ModelMutationPlan::empty(document.content_hash());
        for request in requests {
            self.plan_request(&mut state, request, &mut plan);
        }
        plan
    }

    fn name(&self) -> &'static str {
        "default"
    }
}

/// State carried across the requests of one planning pass
struct PassState<'a> {
    schema: &'a AnalysisSchema,
    document: &'a ResolvedDocument,
    applier: MutationApplier<'a>,
    pending: PendingEdits,
    ids: IdAllocator,
}

impl PassState<'_> {
    /// Make queued edits visible to later requests
    fn record(&mut self, edits: &[DocumentMutation]) {
        let resolver = DocumentResolver::new(self.schema);
        for edit in edits {
            match edit {
                DocumentMutation::InsertNodesToEndOfScope { scope, nodes } => {
                    let receiver = self.document.scope_receiver(self.schema, *scope);
                    let pending = nodes.iter().map(|node| PendingNode {
                        id: node.id(),
                        resolution: receiver
                            .and_then(|r| resolver.resolve_subtree(r, node).remove(&node.id()))
                            .unwrap_or(NodeResolution::Unresolved),
                    });
                    self.pending.record_insert(*scope, pending);
                }
                DocumentMutation::RemoveNode { target } => self.pending.record_removal(*target),
                DocumentMutation::ReplaceValue { .. } => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::ScopeLocation;
    use crate::member::{TypedFunction, TypedProperty};
    use crate::plan::ModelMutationFailureReason;
    use crate::request::ModelMutation;
    use dcl_document::{DocumentBuilder, MutationKind, NodeId, ScopeRef, ValueNode};
    use dcl_schema::{DataClass, DataProperty, DataTypeRef, SchemaFunction};
    use pretty_assertions::assert_eq;

    fn schema() -> AnalysisSchema {
        AnalysisSchema::new(
            "Project",
            [
                DataClass::new("Project")
                    .with_function(SchemaFunction::configuring("server", "Server")),
                DataClass::new("Server")
                    .with_property(DataProperty::new("port", DataTypeRef::Int))
                    .with_function(SchemaFunction::configuring("tls", "Tls")),
                DataClass::new("Tls")
                    .with_property(DataProperty::new("enabled", DataTypeRef::Boolean)),
            ],
        )
        .unwrap()
    }

    fn resolve(schema: &AnalysisSchema, builder: DocumentBuilder) -> ResolvedDocument {
        DocumentResolver::new(schema).resolve(builder.build()).unwrap()
    }

    fn in_servers() -> ScopeLocation {
        ScopeLocation::from_top_level().in_elements_named("server")
    }

    #[test]
    fn plan_carries_base_hash() {
        let schema = schema();
        let document = resolve(&schema, DocumentBuilder::new());
        let plan = DefaultModelMutationPlanner::new().plan_model_mutations(
            &schema,
            &document,
            &[],
            &MutationArgumentContainer::new(),
        );
        assert!(plan.is_empty());
        assert_eq!(plan.base_hash(), document.content_hash());
    }

    #[test]
    fn unmatched_location_behaviors() {
        let schema = schema();
        let document = resolve(&schema, DocumentBuilder::new());
        let port = TypedProperty::from_schema(&schema, "Server", "port").unwrap();
        let request = ModelMutationRequest::new(in_servers(), ModelMutation::unset_property(port));
        let planner = DefaultModelMutationPlanner::new();
        let args = MutationArgumentContainer::new();

        let plan = planner.plan_model_mutation(&schema, &document, &request, &args);
        assert!(plan.document_mutations().is_empty());
        assert_eq!(
            plan.unsuccessful_model_mutations()[0].failure_reasons(),
            &[ModelMutationFailureReason::ScopeLocationNotMatched]
        );

        let ignored = request.with_if_not_found(IfNotFoundBehavior::Ignore);
        assert!(planner.plan_model_mutation(&schema, &document, &ignored, &args).is_empty());
    }

    #[test]
    fn later_request_sees_queued_block() {
        let schema = schema();
        let document = resolve(&schema, DocumentBuilder::new().element("server", |s| s));
        let tls = TypedFunction::from_schema(&schema, "Server", "tls").unwrap();
        let request = ModelMutationRequest::new(
            in_servers(),
            ModelMutation::add_configuring_block_if_absent(tls).unwrap(),
        );

        let plan = DefaultModelMutationPlanner::new().plan_model_mutations(
            &schema,
            &document,
            &[request.clone(), request],
            &MutationArgumentContainer::new(),
        );
        assert_eq!(plan.count_of(MutationKind::Insert), 1);
        assert!(plan.is_successful());
    }

    #[test]
    fn later_unset_sees_queued_set() {
        let schema = schema();
        let document = resolve(&schema, DocumentBuilder::new().element("server", |s| s));
        let port = TypedProperty::from_schema(&schema, "Server", "port").unwrap();
        let requests = [
            ModelMutationRequest::new(
                in_servers(),
                ModelMutation::set_property_value(port.clone(), ValueNode::int(8080)),
            ),
            ModelMutationRequest::new(in_servers(), ModelMutation::unset_property(port)),
        ];

        let plan = DefaultModelMutationPlanner::new().plan_model_mutations(
            &schema,
            &document,
            &requests,
            &MutationArgumentContainer::new(),
        );
        assert!(plan.is_successful());
        assert_eq!(
            plan.document_mutations()[1],
            DocumentMutation::RemoveNode { target: NodeId::new(2) }
        );
    }

    #[test]
    fn tracking_disabled_plans_against_snapshot_only() {
        let schema = schema();
        let document = resolve(&schema, DocumentBuilder::new().element("server", |s| s));
        let port = TypedProperty::from_schema(&schema, "Server", "port").unwrap();
        let requests = [
            ModelMutationRequest::new(
                in_servers(),
                ModelMutation::set_property_value(port.clone(), ValueNode::int(8080)),
            ),
            ModelMutationRequest::new(in_servers(), ModelMutation::unset_property(port)),
        ];
        let planner = DefaultModelMutationPlanner::with_config(
            PlannerConfig::new().with_pending_edit_tracking(false),
        );

        let plan = planner.plan_model_mutations(
            &schema,
            &document,
            &requests,
            &MutationArgumentContainer::new(),
        );
        assert_eq!(plan.document_mutations().len(), 1);
        assert_eq!(
            plan.unsuccessful_model_mutations()[0].failure_reasons(),
            &[ModelMutationFailureReason::TargetPropertyNotFound]
        );
        assert_eq!(
            plan.unsuccessful_model_mutations()[0].scope(),
            Some(ScopeRef::Element(NodeId::new(1)))
        );
    }
}
