// Copyright 2025 Cowboy AI, LLC.

//! # Dataset Composition
//!
//! Field provenance and concept-collision resolution for composing a dataset
//! from one primary data model and zero or more joined data models.
//!
//! This crate provides the building blocks of the dataset editor's
//! "generate fields" action:
//! - **Models and Fields**: catalog of data models with typed, role-tagged fields
//! - **Composition Requests**: a primary model plus ordered joins
//! - **Candidate Fields**: the unified field list, tagged with origin model
//! - **Concept Collisions**: candidates sharing a business concept, with a dominant pick
//! - **Selection**: the user's chosen fields with their effective aliases
//! - **Drafts**: caller-owned editing state threaded through the pure operations
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every operation takes its full input and returns a new value
//! 2. **Stable Order**: primary fields first, then joined models in join order
//! 3. **Explicit Concepts**: collisions are driven by `conceptId`, never by name matching
//! 4. **Typed Payloads**: every value has a concrete shape with explicit optionality
//!
//! ## Example
//!
//! ```
//! use dataset_composition::{
//!     CompositionRequest, Field, FieldCompositionEngine, FieldRole, JoinSpec, Model,
//!     ModelCatalog,
//! };
//!
//! let catalog = ModelCatalog::from_models([
//!     Model::new("sales", "Sales").with_fields([
//!         Field::physical("sku", "sku", "SKU", FieldRole::DimensionKey),
//!         Field::physical("price", "unit_price", "Unit Price", FieldRole::MetricValue)
//!             .with_concept("unit_price"),
//!     ]),
//!     Model::new("competitor", "Competitor").with_fields([
//!         Field::physical("comp_price", "price", "Competitor Price", FieldRole::MetricValue)
//!             .with_concept("unit_price"),
//!     ]),
//! ])?;
//!
//! let request = CompositionRequest::new("sales")
//!     .with_join(JoinSpec::left("competitor", "sales.sku = competitor.sku"));
//!
//! let engine = FieldCompositionEngine::default();
//! let composition = engine.compose(&catalog, &request)?;
//!
//! assert_eq!(composition.candidates.len(), 3);
//! assert_eq!(composition.collisions[0].dominant_field_id().as_str(), "price");
//! # Ok::<(), dataset_composition::CompositionError>(())
//! ```

#![warn(missing_docs)]

mod candidate;
mod collision;
mod config;
mod draft;
mod engine;
mod errors;
mod field;
mod identifiers;
mod join;
mod model;
mod summary;

pub use candidate::{CandidateField, SelectedField};
pub use collision::{detect_concept_collisions, resolve_collision, ConceptCollision};
pub use config::CompositionConfig;
pub use draft::CompositionDraft;
pub use engine::{Composition, FieldCompositionEngine};
pub use errors::{CompositionError, CompositionResult};
pub use field::{Field, FieldRole, SourceKind};
pub use identifiers::{ConceptId, FieldId, ModelId};
pub use join::{CompositionRequest, JoinSpec, JoinType};
pub use model::{Model, ModelCatalog};
pub use summary::CompositionSummary;
