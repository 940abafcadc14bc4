//! Planner configuration

use crate::error::ConfigError;
use crate::location::ScopeLocation;
use crate::request::{IfNotFoundBehavior, ModelMutation, ModelMutationRequest};
use serde::{Deserialize, Serialize};

/// Which assignments an unset removes when a property occurs several times
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccurrenceSelection {
    /// Every occurrence
    #[default]
    All,
    /// The first occurrence in document order
    First,
}

/// Planner configuration
///
/// Every field has a default, so partial TOML or JSON documents are
/// accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Occurrences removed by an unset
    pub unset_occurrences: OccurrenceSelection,

    /// Not-found behavior of requests built by [`new_request`](Self::new_request)
    pub default_if_not_found: IfNotFoundBehavior,

    /// Whether later requests of a batch observe edits queued by earlier ones
    pub track_pending_edits: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            unset_occurrences: OccurrenceSelection::All,
            default_if_not_found: IfNotFoundBehavior::FailAndReport,
            track_pending_edits: true,
        }
    }
}

impl PlannerConfig {
    /// Default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set unset occurrence selection
    #[inline]
    #[must_use]
    pub fn with_unset_occurrences(mut self, selection: OccurrenceSelection) -> Self {
        self.unset_occurrences = selection;
        self
    }

    /// Set default not-found behavior
    #[inline]
    #[must_use]
    pub fn with_default_if_not_found(mut self, behavior: IfNotFoundBehavior) -> Self {
        self.default_if_not_found = behavior;
        self
    }

    /// Enable or disable pending-edit tracking
    #[inline]
    #[must_use]
    pub fn with_pending_edit_tracking(mut self, enabled: bool) -> Self {
        self.track_pending_edits = enabled;
        self
    }

    /// Parse from TOML
    ///
    /// # Errors
    /// Returns error if the input is not valid TOML for this structure
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Parse from JSON
    ///
    /// # Errors
    /// Returns error if the input is not valid JSON for this structure
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Request using this configuration's not-found behavior
    #[must_use]
    pub fn new_request(&self, location: ScopeLocation, mutation: ModelMutation) -> ModelMutationRequest {
        ModelMutationRequest::new(location, mutation).with_if_not_found(self.default_if_not_found)
    }
}
