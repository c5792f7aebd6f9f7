use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create the catalog database (or migrate an existing one).
    Init,
    /// Load enriched project records from a JSON file, replacing the catalog.
    Ingest(IngestArgs),
    /// Filter the catalog and print matching projects.
    Search(SearchArgs),
    /// Filter the catalog and print the student/project/library graph.
    Graph(GraphArgs),
    /// Show the active schema or check a schema file.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct IngestArgs {
    /// JSON file holding an array of project records.
    pub file: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct SearchArgs {
    /// Filter as `name=value`. Lists are comma separated, ranges use `from..to`.
    #[arg(short = 'f', long = "filter", value_name = "NAME=VALUE")]
    pub filters: Vec<String>,

    /// Field to return (repeatable). Defaults to the schema's display columns.
    #[arg(long = "field", value_name = "NAME")]
    pub fields: Vec<String>,
}

#[derive(Clone, Debug, Args)]
pub struct GraphArgs {
    /// Filter as `name=value`. Lists are comma separated, ranges use `from..to`.
    #[arg(short = 'f', long = "filter", value_name = "NAME=VALUE")]
    pub filters: Vec<String>,

    /// Print counts, components, and the most used libraries instead of the graph.
    #[arg(long)]
    pub summary: bool,

    /// Number of libraries listed in the summary.
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Validate this schema file instead of printing the active schema.
    #[arg(long, value_name = "PATH")]
    pub check: Option<PathBuf>,
}
