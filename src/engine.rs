// Copyright 2025 Cowboy AI, LLC.

//! Field composition engine
//!
//! Combines a primary model with its joined models into one candidate field
//! list, detects concept collisions across the models, and applies the user's
//! field selection. The engine holds no state besides its configuration: every
//! operation takes its full input and returns a new value, so one engine can
//! serve any number of callers concurrently.
//!
//! ```text
//! CompositionRequest ──generate──► [CandidateField] ──detect──► [ConceptCollision]
//!                                        │                             │
//!                                        │                         resolve
//!                                        ▼                             ▼
//!                               apply selection              collapse collisions
//!                                        │                             │
//!                                        ▼                             ▼
//!                                 [SelectedField]             [CandidateField]
//! ```

use std::collections::{HashMap, HashSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::candidate::{CandidateField, SelectedField};
use crate::collision::{self, ConceptCollision};
use crate::config::CompositionConfig;
use crate::errors::CompositionResult;
use crate::field::Field;
use crate::identifiers::{FieldId, ModelId};
use crate::join::CompositionRequest;
use crate::model::ModelCatalog;

/// Result of one "generate fields" action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    /// Request the composition was generated from
    pub request: CompositionRequest,
    /// Candidate fields in composition order
    pub candidates: Vec<CandidateField>,
    /// Concept collisions among the candidates
    pub collisions: Vec<ConceptCollision>,
}

/// Stateless engine composing candidate fields from joined models
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldCompositionEngine {
    config: CompositionConfig,
}

impl FieldCompositionEngine {
    /// Create an engine with the given configuration
    pub fn new(config: CompositionConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &CompositionConfig {
        &self.config
    }

    /// Produce the candidate field list for a request
    ///
    /// Primary model fields come first in declaration order, then each joined
    /// model's fields in join order. `Unused` fields are skipped. Calling this
    /// twice with the same input yields equal lists.
    pub fn generate_candidate_fields(
        &self,
        catalog: &ModelCatalog,
        request: &CompositionRequest,
    ) -> CompositionResult<Vec<CandidateField>> {
        let models = request.resolve(catalog)?;

        let candidates: Vec<CandidateField> = models
            .iter()
            .flat_map(|model| {
                model
                    .fields
                    .iter()
                    .filter(|field| self.is_candidate(field))
                    .map(move |field| CandidateField::from_field(model, field))
            })
            .collect();

        debug!(
            primary = %request.primary_model_id,
            joins = request.joins.len(),
            candidates = candidates.len(),
            "generated candidate fields"
        );
        Ok(candidates)
    }

    fn is_candidate(&self, field: &Field) -> bool {
        field.is_composable() && (self.config.include_derived_fields || !field.source.is_derived())
    }

    /// Detect concept collisions among candidates
    ///
    /// The default dominant member of each collision is the first one drawn
    /// from `primary_model_id`, or the first member when none is.
    pub fn detect_concept_collisions(
        &self,
        candidates: &[CandidateField],
        primary_model_id: &ModelId,
    ) -> Vec<ConceptCollision> {
        let collisions = collision::detect_concept_collisions(candidates, primary_model_id);
        debug!(
            primary = %primary_model_id,
            candidates = candidates.len(),
            collisions = collisions.len(),
            "detected concept collisions"
        );
        collisions
    }

    /// Choose another dominant member for a collision
    pub fn resolve_collision(
        &self,
        collision: &ConceptCollision,
        chosen_field_id: &FieldId,
    ) -> CompositionResult<ConceptCollision> {
        let resolved = collision.resolve(chosen_field_id).inspect_err(|err| {
            debug!(concept = %collision.concept_id(), %err, "collision resolution rejected");
        })?;
        trace!(
            concept = %resolved.concept_id(),
            dominant = %resolved.dominant_field_id(),
            "collision resolved"
        );
        Ok(resolved)
    }

    /// Keep the selected candidates, in candidate order, with their effective alias
    ///
    /// The alias is the override for the field id when present and non-empty,
    /// otherwise the candidate's default alias.
    pub fn apply_field_selection(
        &self,
        candidates: &[CandidateField],
        selected_field_ids: &HashSet<FieldId>,
        alias_overrides: &HashMap<FieldId, String>,
    ) -> Vec<SelectedField> {
        let selected: Vec<SelectedField> = candidates
            .iter()
            .filter(|c| selected_field_ids.contains(c.field_id()))
            .map(|c| SelectedField {
                alias: self
                    .alias_override(alias_overrides, c.field_id())
                    .unwrap_or_else(|| c.default_alias.clone()),
                candidate: c.clone(),
            })
            .collect();

        debug!(
            candidates = candidates.len(),
            selected = selected.len(),
            overrides = alias_overrides.len(),
            "applied field selection"
        );
        selected
    }

    fn alias_override(
        &self,
        alias_overrides: &HashMap<FieldId, String>,
        field_id: &FieldId,
    ) -> Option<String> {
        let alias = alias_overrides.get(field_id)?;
        let alias = if self.config.trim_alias_overrides {
            alias.trim()
        } else {
            alias.as_str()
        };
        (!alias.is_empty()).then(|| alias.to_string())
    }

    /// Generate candidates and detect their collisions in one step
    pub fn compose(
        &self,
        catalog: &ModelCatalog,
        request: &CompositionRequest,
    ) -> CompositionResult<Composition> {
        let candidates = self.generate_candidate_fields(catalog, request)?;
        let collisions = self.detect_concept_collisions(&candidates, &request.primary_model_id);
        Ok(Composition {
            request: request.clone(),
            candidates,
            collisions,
        })
    }

    /// Drop every non-dominant collision member, keeping candidate order
    ///
    /// Members are matched by (origin model, field id).
    pub fn collapse_collisions(
        &self,
        candidates: &[CandidateField],
        collisions: &[ConceptCollision],
    ) -> Vec<CandidateField> {
        let dominated: HashSet<(&ModelId, &FieldId)> = collisions
            .iter()
            .flat_map(|c| c.dominated())
            .map(|m| (&m.origin_model_id, m.field_id()))
            .collect();

        candidates
            .iter()
            .filter(|c| !dominated.contains(&(&c.origin_model_id, c.field_id())))
            .cloned()
            .collect()
    }
}
