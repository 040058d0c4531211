// Copyright 2025 Cowboy AI, LLC.

//! Fields of a data model
//!
//! A field is either a physical column or a value derived from other physical
//! columns of the same model. Every field carries a business role; `Unused`
//! fields never take part in composition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::identifiers::{ConceptId, FieldId};

/// Where a field's value comes from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "sourceKind")]
pub enum SourceKind {
    /// Maps 1:1 to a column of the model's source table
    Physical {
        /// Column name in the source table
        #[serde(rename = "physicalName")]
        physical_name: String,
    },
    /// Computed from other physical fields of the same model
    Derived {
        /// Opaque expression text; never parsed or evaluated here
        expression: String,
    },
}

impl SourceKind {
    /// Check if this is a physical column
    pub fn is_physical(&self) -> bool {
        matches!(self, SourceKind::Physical { .. })
    }

    /// Check if this is a derived value
    pub fn is_derived(&self) -> bool {
        matches!(self, SourceKind::Derived { .. })
    }
}

/// Business role of a field within its model
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum FieldRole {
    /// Key of an analysis dimension (e.g. region, product code)
    DimensionKey,
    /// Numeric measure (e.g. unit price)
    MetricValue,
    /// Descriptive attribute carried along for display
    Descriptive,
    /// Excluded from every composition
    Unused,
}

impl FieldRole {
    /// All roles in declaration order
    pub const ALL: [FieldRole; 4] = [
        FieldRole::DimensionKey,
        FieldRole::MetricValue,
        FieldRole::Descriptive,
        FieldRole::Unused,
    ];

    /// Whether fields with this role take part in composition
    pub fn is_composable(&self) -> bool {
        !matches!(self, FieldRole::Unused)
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            FieldRole::DimensionKey => "Dimension",
            FieldRole::MetricValue => "Metric",
            FieldRole::Descriptive => "Attribute",
            FieldRole::Unused => "Unused",
        }
    }
}

/// One column or derived value within a model
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Identifier, unique within the owning model
    pub field_id: FieldId,
    /// Physical column or derived expression
    #[serde(flatten)]
    pub source: SourceKind,
    /// Human-readable label
    pub business_name: String,
    /// Business role
    pub role: FieldRole,
    /// Abstract concept this field represents, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concept_id: Option<ConceptId>,
}

impl Field {
    /// Create a field backed by a physical column
    pub fn physical(
        field_id: impl Into<FieldId>,
        physical_name: impl Into<String>,
        business_name: impl Into<String>,
        role: FieldRole,
    ) -> Self {
        Self {
            field_id: field_id.into(),
            source: SourceKind::Physical {
                physical_name: physical_name.into(),
            },
            business_name: business_name.into(),
            role,
            concept_id: None,
        }
    }

    /// Create a field computed from an expression
    pub fn derived(
        field_id: impl Into<FieldId>,
        expression: impl Into<String>,
        business_name: impl Into<String>,
        role: FieldRole,
    ) -> Self {
        Self {
            field_id: field_id.into(),
            source: SourceKind::Derived {
                expression: expression.into(),
            },
            business_name: business_name.into(),
            role,
            concept_id: None,
        }
    }

    /// Tag the field with a business concept
    pub fn with_concept(mut self, concept_id: impl Into<ConceptId>) -> Self {
        self.concept_id = Some(concept_id.into());
        self
    }

    /// Column name when the field is physical
    pub fn physical_name(&self) -> Option<&str> {
        match &self.source {
            SourceKind::Physical { physical_name } => Some(physical_name),
            SourceKind::Derived { .. } => None,
        }
    }

    /// Expression text when the field is derived
    pub fn expression(&self) -> Option<&str> {
        match &self.source {
            SourceKind::Derived { expression } => Some(expression),
            SourceKind::Physical { .. } => None,
        }
    }

    /// Whether this field takes part in composition
    pub fn is_composable(&self) -> bool {
        self.role.is_composable()
    }
}
