//! Planning results
//!
//! A [`ModelMutationPlan`] carries the ordered document edits and every
//! per-scope failure, against the snapshot identified by its base hash.

use crate::request::ModelMutationRequest;
use dcl_document::{DocumentHash, DocumentMutation, ElementPath, MutationKind, ScopeRef};
use dcl_schema::TypeName;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Why a mutation could not be applied
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ModelMutationFailureReason {
    /// Unset of a property with no assignment in the scope
    TargetPropertyNotFound,

    /// Location matched no scope
    ScopeLocationNotMatched,

    /// Set of an assigned property with [`IfPresentBehavior::FailAndReport`](crate::IfPresentBehavior::FailAndReport)
    TargetAlreadyPresent,

    /// Scope does not configure the member's declaring type
    ScopeTypeMismatch {
        /// Type declaring the targeted member
        expected: TypeName,
        /// Type configured by the scope, if resolved
        actual: Option<TypeName>,
    },

    /// Provider failed to produce a node
    ArgumentEvaluationFailed {
        /// Provider error
        message: String,
    },

    /// No node id is left above the document's highest id
    NodeIdsExhausted,
}

impl Display for ModelMutationFailureReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetPropertyNotFound => f.write_str("target property not found"),
            Self::ScopeLocationNotMatched => f.write_str("scope location not matched"),
            Self::TargetAlreadyPresent => f.write_str("target already present"),
            Self::ScopeTypeMismatch { expected, actual } => match actual {
                Some(actual) => write!(f, "scope configures {actual}, not {expected}"),
                None => write!(f, "scope is unresolved, expected {expected}"),
            },
            Self::ArgumentEvaluationFailed { message } => {
                write!(f, "argument evaluation failed: {message}")
            }
            Self::NodeIdsExhausted => f.write_str("node ids exhausted"),
        }
    }
}

/// Request that failed, in one scope or as a whole
///
/// # Invariants
/// - `reasons` is never empty
#[derive(Debug, Clone)]
pub struct UnsuccessfulModelMutation {
    request: ModelMutationRequest,
    scope: Option<ScopeRef>,
    scope_path: Option<ElementPath>,
    reasons: Vec<ModelMutationFailureReason>,
}

impl UnsuccessfulModelMutation {
    /// Failure of the whole request, before any scope was matched
    #[must_use]
    pub fn unmatched(request: ModelMutationRequest) -> Self {
        Self {
            request,
            scope: None,
            scope_path: None,
            reasons: vec![ModelMutationFailureReason::ScopeLocationNotMatched],
        }
    }

    /// Failure in one matched scope
    #[must_use]
    pub fn in_scope(
        request: ModelMutationRequest,
        scope: ScopeRef,
        scope_path: ElementPath,
        reason: ModelMutationFailureReason,
    ) -> Self {
        Self {
            request,
            scope: Some(scope),
            scope_path: Some(scope_path),
            reasons: vec![reason],
        }
    }

    /// Add another reason
    #[must_use]
    pub fn with_reason(mut self, reason: ModelMutationFailureReason) -> Self {
        self.reasons.push(reason);
        self
    }

    /// Failed request
    #[inline]
    #[must_use]
    pub fn request(&self) -> &ModelMutationRequest {
        &self.request
    }

    /// Scope the failure occurred in; `None` if no scope matched
    #[inline]
    #[must_use]
    pub fn scope(&self) -> Option<ScopeRef> {
        self.scope
    }

    /// Element path of [`scope`](Self::scope)
    #[inline]
    #[must_use]
    pub fn scope_path(&self) -> Option<&ElementPath> {
        self.scope_path.as_ref()
    }

    /// Failure reasons, never empty
    #[inline]
    #[must_use]
    pub fn failure_reasons(&self) -> &[ModelMutationFailureReason] {
        &self.reasons
    }
}

impl Display for UnsuccessfulModelMutation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let reasons: Vec<String> = self.reasons.iter().map(ToString::to_string).collect();
        write!(f, "{}: {}", self.request.mutation, reasons.join(", "))?;
        match &self.scope_path {
            Some(path) => write!(f, " in scope `{path}`"),
            None => write!(f, " at {}", self.request.location),
        }
    }
}

/// Result of planning one or more requests
#[derive(Debug, Clone)]
pub struct ModelMutationPlan {
    document_mutations: Vec<DocumentMutation>,
    unsuccessful_model_mutations: Vec<UnsuccessfulModelMutation>,
    base_hash: DocumentHash,
}

impl ModelMutationPlan {
    /// Plan from parts
    #[must_use]
    pub fn new(
        base_hash: DocumentHash,
        document_mutations: Vec<DocumentMutation>,
        unsuccessful_model_mutations: Vec<UnsuccessfulModelMutation>,
    ) -> Self {
        Self {
            document_mutations,
            unsuccessful_model_mutations,
            base_hash,
        }
    }

    /// Plan with no edits and no failures
    #[inline]
    #[must_use]
    pub fn empty(base_hash: DocumentHash) -> Self {
        Self::new(base_hash, Vec::new(), Vec::new())
    }

    /// Ordered edits
    #[inline]
    #[must_use]
    pub fn document_mutations(&self) -> &[DocumentMutation] {
        &self.document_mutations
    }

    /// Failures, in request order
    #[inline]
    #[must_use]
    pub fn unsuccessful_model_mutations(&self) -> &[UnsuccessfulModelMutation] {
        &self.unsuccessful_model_mutations
    }

    /// Hash of the snapshot the plan was computed against
    #[inline]
    #[must_use]
    pub fn base_hash(&self) -> DocumentHash {
        self.base_hash
    }

    /// Whether no failure was reported
    #[inline]
    #[must_use]
    pub fn is_successful(&self) -> bool {
        self.unsuccessful_model_mutations.is_empty()
    }

    /// Whether the plan changes nothing and reports nothing
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.document_mutations.is_empty() && self.unsuccessful_model_mutations.is_empty()
    }

    /// Number of edits of `kind`
    #[must_use]
    pub fn count_of(&self, kind: MutationKind) -> usize {
        self.document_mutations.iter().filter(|m| m.kind() == kind).count()
    }

    /// Split into edits and failures
    #[must_use]
    pub fn into_parts(self) -> (Vec<DocumentMutation>, Vec<UnsuccessfulModelMutation>) {
        (self.document_mutations, self.unsuccessful_model_mutations)
    }

    pub(crate) fn push_edits(&mut self, edits: impl IntoIterator<Item = DocumentMutation>) {
        self.document_mutations.extend(edits);
    }

    pub(crate) fn push_failure(&mut self, failure: UnsuccessfulModelMutation) {
        self.unsuccessful_model_mutations.push(failure);
    }
}
