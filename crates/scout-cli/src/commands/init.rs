use serde::Serialize;

use crate::bootstrap::AppContext;
use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Debug, Serialize)]
struct InitResponse<'a> {
    database: &'a str,
    projects: u64,
}

/// Handle `scout init`. Opening the context already ran the migrations.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let projects = ctx.service.count_projects().await?;
    tracing::info!(database = %ctx.config.database.path, projects, "catalog ready");
    output(
        &InitResponse {
            database: &ctx.config.database.path,
            projects,
        },
        flags.format,
    )
}
