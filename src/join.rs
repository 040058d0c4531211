// Copyright 2025 Cowboy AI, LLC.

//! Joins and composition requests
//!
//! A composition request names one primary model and the secondary models
//! joined to it. Join type and condition are carried as metadata only; the
//! presence of a join is what brings a model's fields into scope.

use std::collections::HashSet;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CompositionError, CompositionResult};
use crate::identifiers::ModelId;
use crate::model::{Model, ModelCatalog};

/// Kind of relational join between the primary and a secondary model
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum JoinType {
    /// Keep every primary row
    #[default]
    Left,
    /// Keep every secondary row
    Right,
    /// Keep matching rows only
    Inner,
    /// Keep all rows of both sides
    Full,
}

impl JoinType {
    /// SQL keyword used when displaying the join
    pub fn keyword(&self) -> &'static str {
        match self {
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Inner => "INNER JOIN",
            JoinType::Full => "FULL JOIN",
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Relationship from the primary model to one secondary model
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct JoinSpec {
    /// Model joined to the primary
    pub secondary_model_id: ModelId,
    /// Join kind (metadata only)
    #[serde(default)]
    pub join_type: JoinType,
    /// Opaque join condition text
    #[serde(default)]
    pub join_condition: String,
}

impl JoinSpec {
    /// Create a join spec
    pub fn new(
        secondary_model_id: impl Into<ModelId>,
        join_type: JoinType,
        join_condition: impl Into<String>,
    ) -> Self {
        Self {
            secondary_model_id: secondary_model_id.into(),
            join_type,
            join_condition: join_condition.into(),
        }
    }

    /// Left join with the given condition
    pub fn left(secondary_model_id: impl Into<ModelId>, join_condition: impl Into<String>) -> Self {
        Self::new(secondary_model_id, JoinType::Left, join_condition)
    }

    /// Inner join with the given condition
    pub fn inner(
        secondary_model_id: impl Into<ModelId>,
        join_condition: impl Into<String>,
    ) -> Self {
        Self::new(secondary_model_id, JoinType::Inner, join_condition)
    }
}

/// Input to the composition engine, rebuilt on every user action
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompositionRequest {
    /// Model whose fields come first and win collisions by default
    pub primary_model_id: ModelId,
    /// Joined models in declaration order
    #[serde(default)]
    pub joins: Vec<JoinSpec>,
}

impl CompositionRequest {
    /// Create a request with no joins
    pub fn new(primary_model_id: impl Into<ModelId>) -> Self {
        Self {
            primary_model_id: primary_model_id.into(),
            joins: Vec::new(),
        }
    }

    /// Append a join
    pub fn with_join(mut self, join: JoinSpec) -> Self {
        self.joins.push(join);
        self
    }

    /// Model ids in composition order: primary first, then joins in order
    pub fn model_ids(&self) -> impl Iterator<Item = &ModelId> {
        std::iter::once(&self.primary_model_id)
            .chain(self.joins.iter().map(|j| &j.secondary_model_id))
    }

    /// Resolve every referenced model against the catalog
    ///
    /// Checks run in order: the primary must exist, then each join in
    /// declaration order must not target the primary, must not repeat an
    /// earlier secondary, and must exist. The first failure is returned.
    /// On success the models are returned in composition order.
    pub fn resolve<'a>(&self, catalog: &'a ModelCatalog) -> CompositionResult<Vec<&'a Model>> {
        let primary = catalog.require(&self.primary_model_id).inspect_err(|err| {
            debug!(primary = %self.primary_model_id, %err, "composition request rejected");
        })?;

        let mut models = Vec::with_capacity(self.joins.len() + 1);
        models.push(primary);

        let mut seen: HashSet<&ModelId> = HashSet::with_capacity(self.joins.len());
        for join in &self.joins {
            let secondary = &join.secondary_model_id;
            let checked = if *secondary == self.primary_model_id {
                Err(CompositionError::invalid_join(format!(
                    "model {secondary} cannot be joined to itself as a secondary"
                )))
            } else if !seen.insert(secondary) {
                Err(CompositionError::invalid_join(format!(
                    "model {secondary} is joined more than once"
                )))
            } else {
                catalog.require(secondary)
            };

            let model = checked.inspect_err(|err| {
                debug!(primary = %self.primary_model_id, %err, "composition request rejected");
            })?;
            models.push(model);
        }

        Ok(models)
    }

    /// Check the request against the catalog without keeping the resolved models
    pub fn validate(&self, catalog: &ModelCatalog) -> CompositionResult<()> {
        self.resolve(catalog).map(|_| ())
    }
}
