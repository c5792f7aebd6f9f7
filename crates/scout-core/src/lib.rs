//! # scout-core
//!
//! Core types shared across all scout crates.
//!
//! This crate provides the foundational data contracts of the catalog:
//! - Project records as returned by search and accepted by ingestion
//! - Relationship graph payloads (nodes, edges, summaries)
//! - Closed enums for schema value kinds, filter operators, node and edge kinds
//! - Project identity keys and the identity storage columns

pub mod entities;
pub mod enums;
pub mod identity;
