// Copyright 2025 Cowboy AI, LLC.

//! Candidate and selected fields of a composition

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::field::{Field, FieldRole};
use crate::identifiers::{ConceptId, FieldId, ModelId};
use crate::model::Model;

/// A field eligible for the composed dataset, tagged with its provenance
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CandidateField {
    /// The underlying model field
    #[serde(flatten)]
    pub field: Field,
    /// Model the field was drawn from
    pub origin_model_id: ModelId,
    /// Display name of the origin model
    pub origin_model_name: String,
    /// Alias shown in the selection form; starts as the business name
    pub default_alias: String,
}

impl CandidateField {
    /// Stamp a model field with its origin
    pub fn from_field(model: &Model, field: &Field) -> Self {
        Self {
            field: field.clone(),
            origin_model_id: model.model_id.clone(),
            origin_model_name: model.name.clone(),
            default_alias: field.business_name.clone(),
        }
    }

    /// Field id within the origin model
    pub fn field_id(&self) -> &FieldId {
        &self.field.field_id
    }

    /// Concept the field represents, if any
    pub fn concept_id(&self) -> Option<&ConceptId> {
        self.field.concept_id.as_ref()
    }

    /// Business role
    pub fn role(&self) -> FieldRole {
        self.field.role
    }

    /// Whether the candidate was drawn from the given model
    pub fn is_from(&self, model_id: &ModelId) -> bool {
        self.origin_model_id == *model_id
    }

    /// Label combining origin model and alias, e.g. `Sales.Unit Price`
    pub fn qualified_label(&self) -> String {
        format!("{}.{}", self.origin_model_name, self.default_alias)
    }
}

/// A candidate kept by the user's selection, with its effective alias
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectedField {
    /// The selected candidate
    #[serde(flatten)]
    pub candidate: CandidateField,
    /// Override alias if one was given, otherwise the default alias
    pub alias: String,
}

impl SelectedField {
    /// Field id within the origin model
    pub fn field_id(&self) -> &FieldId {
        self.candidate.field_id()
    }

    /// Model the field was drawn from
    pub fn origin_model_id(&self) -> &ModelId {
        &self.candidate.origin_model_id
    }
}
