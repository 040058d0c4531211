// Copyright 2025 Cowboy AI, LLC.

//! Caller-owned editing state of one composition session
//!
//! The engine is stateless; the dataset editor still needs to remember what
//! the user picked between actions. A [`CompositionDraft`] is that memory as
//! an immutable value: every edit consumes the draft and returns the next one,
//! and all computation is delegated to [`FieldCompositionEngine`].

use std::collections::{HashMap, HashSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::candidate::{CandidateField, SelectedField};
use crate::collision::ConceptCollision;
use crate::engine::{Composition, FieldCompositionEngine};
use crate::errors::{CompositionError, CompositionResult};
use crate::identifiers::{ConceptId, FieldId};
use crate::join::CompositionRequest;
use crate::model::ModelCatalog;

/// Selections, alias overrides and dominant choices for one composition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompositionDraft {
    composition: Composition,
    selected_field_ids: HashSet<FieldId>,
    alias_overrides: HashMap<FieldId, String>,
}

impl CompositionDraft {
    /// Start a draft with every candidate selected and no alias overrides
    pub fn generate(
        engine: &FieldCompositionEngine,
        catalog: &ModelCatalog,
        request: &CompositionRequest,
    ) -> CompositionResult<Self> {
        let composition = engine.compose(catalog, request)?;
        let selected_field_ids = composition
            .candidates
            .iter()
            .map(|c| c.field_id().clone())
            .collect();

        Ok(Self {
            composition,
            selected_field_ids,
            alias_overrides: HashMap::new(),
        })
    }

    /// Recompute the draft after the request changed
    ///
    /// Alias overrides are reset. Fields that were already candidates keep
    /// their selection state, new fields start selected, vanished fields are
    /// dropped. Dominant choices survive when the concept still collides and
    /// the chosen field is still a member.
    pub fn regenerate(
        self,
        engine: &FieldCompositionEngine,
        catalog: &ModelCatalog,
        request: &CompositionRequest,
    ) -> CompositionResult<Self> {
        let mut composition = engine.compose(catalog, request)?;

        let previous: HashSet<&FieldId> = self
            .composition
            .candidates
            .iter()
            .map(|c| c.field_id())
            .collect();
        let selected_field_ids: HashSet<FieldId> = composition
            .candidates
            .iter()
            .map(|c| c.field_id())
            .filter(|id| !previous.contains(id) || self.selected_field_ids.contains(*id))
            .cloned()
            .collect();

        let chosen: HashMap<&ConceptId, &FieldId> = self
            .composition
            .collisions
            .iter()
            .map(|c| (c.concept_id(), c.dominant_field_id()))
            .collect();
        composition.collisions = composition
            .collisions
            .into_iter()
            .map(|collision| match chosen.get(collision.concept_id()) {
                Some(field_id) if collision.has_member(field_id.as_str()) => {
                    collision.resolve(field_id).unwrap_or(collision)
                }
                _ => collision,
            })
            .collect();

        debug!(
            primary = %request.primary_model_id,
            candidates = composition.candidates.len(),
            selected = selected_field_ids.len(),
            "regenerated composition draft"
        );

        Ok(Self {
            composition,
            selected_field_ids,
            alias_overrides: HashMap::new(),
        })
    }

    /// Request the draft was generated from
    pub fn request(&self) -> &CompositionRequest {
        &self.composition.request
    }

    /// Candidate fields in composition order
    pub fn candidates(&self) -> &[CandidateField] {
        &self.composition.candidates
    }

    /// Concept collisions with the current dominant choices
    pub fn collisions(&self) -> &[ConceptCollision] {
        &self.composition.collisions
    }

    /// Whether a field id is selected
    pub fn is_selected(&self, field_id: &str) -> bool {
        self.selected_field_ids.contains(field_id)
    }

    /// Alias override for a field id, if any
    pub fn alias_override(&self, field_id: &str) -> Option<&str> {
        self.alias_overrides.get(field_id).map(String::as_str)
    }

    /// Make another member the dominant field of a concept's collision
    ///
    /// Fails with [`CompositionError::UnknownConcept`] when no collision
    /// carries `concept_id`, and with [`CompositionError::InvalidSelection`]
    /// when `field_id` does not name exactly one of its members.
    pub fn choose_dominant(
        mut self,
        concept_id: &ConceptId,
        field_id: &FieldId,
    ) -> CompositionResult<Self> {
        let slot = self
            .composition
            .collisions
            .iter_mut()
            .find(|c| c.concept_id() == concept_id)
            .ok_or_else(|| CompositionError::UnknownConcept(concept_id.clone()))?;
        *slot = slot.resolve(field_id)?;
        Ok(self)
    }

    /// Add a candidate to the selection
    pub fn select(mut self, field_id: &FieldId) -> CompositionResult<Self> {
        self.require_candidate(field_id)?;
        self.selected_field_ids.insert(field_id.clone());
        Ok(self)
    }

    /// Remove a field from the selection
    pub fn deselect(mut self, field_id: &FieldId) -> Self {
        self.selected_field_ids.remove(field_id);
        self
    }

    /// Set the alias override of a candidate
    pub fn set_alias_override(
        mut self,
        field_id: &FieldId,
        alias: impl Into<String>,
    ) -> CompositionResult<Self> {
        self.require_candidate(field_id)?;
        self.alias_overrides.insert(field_id.clone(), alias.into());
        Ok(self)
    }

    /// Drop the alias override of a field
    pub fn clear_alias_override(mut self, field_id: &FieldId) -> Self {
        self.alias_overrides.remove(field_id);
        self
    }

    /// Selected fields with their effective aliases, in candidate order
    pub fn selected_fields(&self, engine: &FieldCompositionEngine) -> Vec<SelectedField> {
        engine.apply_field_selection(
            &self.composition.candidates,
            &self.selected_field_ids,
            &self.alias_overrides,
        )
    }

    fn require_candidate(&self, field_id: &FieldId) -> CompositionResult<()> {
        if self
            .composition
            .candidates
            .iter()
            .any(|c| c.field_id() == field_id)
        {
            Ok(())
        } else {
            Err(CompositionError::InvalidSelection(field_id.clone()))
        }
    }
}
