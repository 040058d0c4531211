// Copyright 2025 Cowboy AI, LLC.

//! Counters describing a candidate list

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::candidate::CandidateField;
use crate::collision::ConceptCollision;
use crate::field::FieldRole;
use crate::identifiers::ModelId;

/// Field counts for the header of the dataset editor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionSummary {
    /// Number of candidates
    pub total: usize,
    /// Candidates per role
    pub by_role: BTreeMap<FieldRole, usize>,
    /// Candidates per origin model, in first-encounter order
    pub by_origin: IndexMap<ModelId, usize>,
    /// Candidates backed by an expression
    pub derived: usize,
    /// Number of concept collisions
    pub collisions: usize,
}

impl CompositionSummary {
    /// Summarize candidates and their collisions
    pub fn of(candidates: &[CandidateField], collisions: &[ConceptCollision]) -> Self {
        let mut summary = Self {
            total: candidates.len(),
            collisions: collisions.len(),
            ..Self::default()
        };

        for candidate in candidates {
            *summary.by_role.entry(candidate.role()).or_insert(0) += 1;
            *summary
                .by_origin
                .entry(candidate.origin_model_id.clone())
                .or_insert(0) += 1;
            if candidate.field.source.is_derived() {
                summary.derived += 1;
            }
        }

        summary
    }

    /// Count for one role (zero when absent)
    pub fn role_count(&self, role: FieldRole) -> usize {
        self.by_role.get(&role).copied().unwrap_or(0)
    }
}
