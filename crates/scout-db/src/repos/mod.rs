//! Repository modules. Each adds methods to `CatalogService` via `impl
//! CatalogService` blocks.

pub mod project;
