use anyhow::Context;
use scout_config::ScoutConfig;
use scout_schema::{DisplayColumn, FieldDescriptor, FilterDescriptor, SchemaRegistry, StoreDescriptor};
use serde::Serialize;

use crate::bootstrap::load_registry;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

/// The active schema as printed by `scout schema`.
#[derive(Debug, Serialize)]
struct SchemaView<'a> {
    store: &'a StoreDescriptor,
    fields: &'a [FieldDescriptor],
    filters: Vec<&'a FilterDescriptor>,
    display_columns: &'a [DisplayColumn],
}

impl<'a> SchemaView<'a> {
    fn new(registry: &'a SchemaRegistry) -> Self {
        Self {
            store: registry.store(),
            fields: registry.fields(),
            filters: registry.enabled_filters().collect(),
            display_columns: registry.display_columns(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CheckResponse {
    path: String,
    valid: bool,
    fields: usize,
    filters: usize,
    enabled_filters: usize,
    display_columns: usize,
}

impl CheckResponse {
    fn new(path: String, registry: &SchemaRegistry) -> Self {
        Self {
            path,
            valid: true,
            fields: registry.fields().len(),
            filters: registry.filters().len(),
            enabled_filters: registry.enabled_filters().count(),
            display_columns: registry.display_columns().len(),
        }
    }
}

/// Handle `scout schema`. Needs no database.
pub fn handle(args: &SchemaArgs, config: &ScoutConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    if let Some(path) = &args.check {
        let registry = SchemaRegistry::from_path(path)
            .with_context(|| format!("schema file {} is invalid", path.display()))?;
        return output(
            &CheckResponse::new(path.display().to_string(), &registry),
            flags.format,
        );
    }

    let registry = load_registry(config)?;
    output(&SchemaView::new(&registry), flags.format)
}
