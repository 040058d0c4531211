// Copyright 2025 Cowboy AI, LLC.

//! Composition configuration

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CompositionResult;

/// Options controlling candidate generation and alias handling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CompositionConfig {
    /// Emit derived (expression-backed) fields as candidates
    pub include_derived_fields: bool,
    /// Trim alias overrides and treat whitespace-only overrides as absent
    pub trim_alias_overrides: bool,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            include_derived_fields: true,
            trim_alias_overrides: false,
        }
    }
}

impl CompositionConfig {
    /// Parse a configuration from JSON; missing keys take their defaults
    pub fn from_json(json: &str) -> CompositionResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set whether derived fields are emitted
    pub fn with_derived_fields(mut self, include: bool) -> Self {
        self.include_derived_fields = include;
        self
    }

    /// Set whether alias overrides are trimmed
    pub fn with_trimmed_aliases(mut self, trim: bool) -> Self {
        self.trim_alias_overrides = trim;
        self
    }
}
