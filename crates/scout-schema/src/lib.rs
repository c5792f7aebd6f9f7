//! # scout-schema
//!
//! Declarative schema loading, validation, and lookup for scout.
//!
//! This crate provides:
//! - `SchemaRegistry`: the validated, immutable set of queryable fields, filter
//!   definitions, and display columns, built once at startup
//! - `SchemaDocument`: the TOML document the registry is loaded from
//! - `RecordValidator`: JSON Schema validation of raw ingest records
//!
//! ## Architecture
//!
//! Record types are defined in `scout-core` with `#[derive(JsonSchema)]`.
//! The registry is passed by reference (usually behind an `Arc`) into the
//! query builder and search executor; nothing in it changes after `load`.

pub mod document;
pub mod error;
pub mod registry;
pub mod validate;

pub use document::{
    DisplayColumn, FieldDescriptor, FilterDescriptor, SchemaDocument, StoreDescriptor,
};
pub use error::SchemaError;
pub use registry::{DEFAULT_SCHEMA, SchemaRegistry};
pub use validate::RecordValidator;
