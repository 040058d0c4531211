// Copyright 2025 Cowboy AI, LLC.

//! Data models and the catalog that holds them
//!
//! A model is a named, reusable set of fields drawn from (or computed over) a
//! single physical data source. Field order is significant: it is the default
//! display order of every composition the model takes part in.

use std::collections::HashSet;

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::{CompositionError, CompositionResult};
use crate::field::Field;
use crate::identifiers::{FieldId, ModelId};

/// A named, independently defined data model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Catalog-wide identifier
    pub model_id: ModelId,
    /// Display name
    pub name: String,
    /// Fields in declaration order
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Model {
    /// Create a model without fields
    pub fn new(model_id: impl Into<ModelId>, name: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Append several fields, keeping their order
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Look up a field by id
    pub fn field(&self, field_id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.field_id.as_str() == field_id)
    }

    /// Fields that take part in composition, in declaration order
    pub fn composable_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_composable())
    }

    /// Check that field ids are unique within the model
    pub fn validate(&self) -> CompositionResult<()> {
        let mut seen: HashSet<&FieldId> = HashSet::with_capacity(self.fields.len());
        for field in &self.fields {
            if !seen.insert(&field.field_id) {
                return Err(CompositionError::DuplicateField {
                    model_id: self.model_id.clone(),
                    field_id: field.field_id.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Lookup of all known models, keyed by id, in registration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelCatalog {
    models: IndexMap<ModelId, Model>,
}

impl ModelCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            models: IndexMap::new(),
        }
    }

    /// Build a catalog from models, validating each one
    pub fn from_models(models: impl IntoIterator<Item = Model>) -> CompositionResult<Self> {
        let mut catalog = Self::new();
        for model in models {
            catalog.insert(model)?;
        }
        Ok(catalog)
    }

    /// Insert or replace a model after validating it
    ///
    /// Returns the model previously registered under the same id.
    pub fn insert(&mut self, model: Model) -> CompositionResult<Option<Model>> {
        model.validate()?;
        Ok(self.models.insert(model.model_id.clone(), model))
    }

    /// Remove a model, keeping the order of the others
    pub fn remove(&mut self, model_id: &str) -> Option<Model> {
        self.models.shift_remove(model_id)
    }

    /// Get a model by id
    pub fn get(&self, model_id: &str) -> Option<&Model> {
        self.models.get(model_id)
    }

    /// Get a model by id or signal `UnknownModel`
    pub fn require(&self, model_id: &ModelId) -> CompositionResult<&Model> {
        self.models
            .get(model_id)
            .ok_or_else(|| CompositionError::UnknownModel(model_id.clone()))
    }

    /// Check whether a model is registered
    pub fn contains(&self, model_id: &str) -> bool {
        self.models.contains_key(model_id)
    }

    /// Number of registered models
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Models in registration order
    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.models.values()
    }
}
