// Copyright 2025 Cowboy AI, LLC.

//! Identifier types for models, fields, and business concepts
//!
//! All identifiers are opaque strings supplied by the catalog that defines the
//! models. They carry no structure of their own; equality is plain string
//! equality.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create from a string
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the identifier, returning the underlying string
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_identifier!(
    /// Model ID - identifies a data model in the catalog
    ///
    /// Models are independently defined units; the id is unique across the
    /// catalog that owns them.
    ModelId
);

string_identifier!(
    /// Field ID - only meaningful within its owning model
    ///
    /// Two models may declare fields with the same id. A candidate field is
    /// identified globally by the pair (origin model id, field id).
    FieldId
);

string_identifier!(
    /// Concept ID - identifies an abstract business concept
    ///
    /// Fields from different models that share a concept id represent the same
    /// dimension or metric (e.g. a canonical "unit price").
    ConceptId
);
