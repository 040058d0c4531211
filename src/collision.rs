// Copyright 2025 Cowboy AI, LLC.

//! Concept collisions between candidate fields
//!
//! Two or more candidates that share a concept id describe the same business
//! notion; the user keeps one of them as the dominant representative. A
//! collision is an immutable value: choosing another dominant field produces a
//! new collision.

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::trace;

use crate::candidate::CandidateField;
use crate::errors::{CompositionError, CompositionResult};
use crate::identifiers::{ConceptId, FieldId, ModelId};

/// Candidates sharing one concept id
///
/// Always holds two or more members, all carrying `concept_id`, and a
/// dominant field id naming one of them. Deserialization enforces the same
/// rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConceptCollision {
    concept_id: ConceptId,
    members: Vec<CandidateField>,
    dominant_field_id: FieldId,
}

/// Wire shape of a collision before its rules are checked
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCollision {
    concept_id: ConceptId,
    members: Vec<CandidateField>,
    dominant_field_id: FieldId,
}

impl ConceptCollision {
    /// Build a collision from members sharing `concept_id`
    ///
    /// Returns `None` when fewer than two members are given. The dominant
    /// field defaults to the first member drawn from `primary_model_id`, or
    /// to the first member when none is.
    pub fn from_members(
        concept_id: ConceptId,
        members: Vec<CandidateField>,
        primary_model_id: &ModelId,
    ) -> Option<Self> {
        if members.len() < 2 {
            return None;
        }

        let dominant = members
            .iter()
            .find(|m| m.is_from(primary_model_id))
            .unwrap_or(&members[0]);
        let dominant_field_id = dominant.field_id().clone();

        Some(Self {
            concept_id,
            members,
            dominant_field_id,
        })
    }

    fn from_raw(raw: RawCollision) -> CompositionResult<Self> {
        let RawCollision {
            concept_id,
            members,
            dominant_field_id,
        } = raw;

        if members.len() < 2 {
            return Err(CompositionError::InvariantViolation(format!(
                "collision on {concept_id} has {} members, needs at least two",
                members.len()
            )));
        }
        if let Some(stray) = members
            .iter()
            .find(|m| m.concept_id() != Some(&concept_id))
        {
            return Err(CompositionError::InvariantViolation(format!(
                "member {} of collision on {concept_id} carries another concept",
                stray.qualified_label()
            )));
        }
        if !members.iter().any(|m| *m.field_id() == dominant_field_id) {
            return Err(CompositionError::InvalidSelection(dominant_field_id));
        }

        Ok(Self {
            concept_id,
            members,
            dominant_field_id,
        })
    }

    /// Shared concept id
    pub fn concept_id(&self) -> &ConceptId {
        &self.concept_id
    }

    /// Members in candidate order (always two or more)
    pub fn members(&self) -> &[CandidateField] {
        &self.members
    }

    /// Field id of the dominant member
    pub fn dominant_field_id(&self) -> &FieldId {
        &self.dominant_field_id
    }

    /// The dominant member
    ///
    /// Field ids are only unique per model. A default dominant id may be
    /// shared by several members; the first of them in candidate order is
    /// the dominant one, which is the primary's member when there is one.
    pub fn dominant(&self) -> &CandidateField {
        &self.members[self.dominant_index()]
    }

    fn dominant_index(&self) -> usize {
        self.members
            .iter()
            .position(|m| *m.field_id() == self.dominant_field_id)
            .unwrap_or(0)
    }

    /// Whether a field id belongs to one of the members
    pub fn has_member(&self, field_id: &str) -> bool {
        self.members.iter().any(|m| m.field_id().as_str() == field_id)
    }

    /// Members other than the dominant one, in candidate order
    pub fn dominated(&self) -> impl Iterator<Item = &CandidateField> {
        let dominant = self.dominant_index();
        self.members
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != dominant)
            .map(|(_, m)| m)
    }

    /// Copy of this collision with another dominant member
    ///
    /// The chosen id must name exactly one member. An id carried by members
    /// of several models cannot tell them apart and is rejected with
    /// [`CompositionError::InvalidSelection`], unless it already is the
    /// dominant id, in which case the collision is returned unchanged.
    pub fn resolve(&self, chosen_field_id: &FieldId) -> CompositionResult<Self> {
        let matching = self
            .members
            .iter()
            .filter(|m| m.field_id() == chosen_field_id)
            .count();

        match matching {
            0 => Err(CompositionError::InvalidSelection(chosen_field_id.clone())),
            1 => Ok(Self {
                dominant_field_id: chosen_field_id.clone(),
                ..self.clone()
            }),
            _ if *chosen_field_id == self.dominant_field_id => Ok(self.clone()),
            _ => {
                trace!(
                    concept = %self.concept_id,
                    field = %chosen_field_id,
                    members = matching,
                    "ambiguous dominant choice"
                );
                Err(CompositionError::InvalidSelection(chosen_field_id.clone()))
            }
        }
    }
}

impl<'de> Deserialize<'de> for ConceptCollision {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawCollision::deserialize(deserializer)?;
        Self::from_raw(raw).map_err(serde::de::Error::custom)
    }
}

/// Group candidates by concept id and keep the groups with two or more members
///
/// Collisions come out in the order their concept id is first met scanning
/// `candidates` left to right; members keep their relative input order.
/// Candidates without a concept id are ignored.
pub fn detect_concept_collisions(
    candidates: &[CandidateField],
    primary_model_id: &ModelId,
) -> Vec<ConceptCollision> {
    let mut groups: IndexMap<&ConceptId, Vec<&CandidateField>> = IndexMap::new();
    for candidate in candidates {
        if let Some(concept_id) = candidate.concept_id() {
            groups.entry(concept_id).or_default().push(candidate);
        }
    }

    groups
        .into_iter()
        .filter_map(|(concept_id, members)| {
            trace!(concept = %concept_id, members = members.len(), "concept group");
            ConceptCollision::from_members(
                concept_id.clone(),
                members.into_iter().cloned().collect(),
                primary_model_id,
            )
        })
        .collect()
}

/// Choose another dominant member for a collision
pub fn resolve_collision(
    collision: &ConceptCollision,
    chosen_field_id: &FieldId,
) -> CompositionResult<ConceptCollision> {
    collision.resolve(chosen_field_id)
}
