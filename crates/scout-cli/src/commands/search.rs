use scout_search::SearchEngine;

use crate::bootstrap::AppContext;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::SearchArgs;
use crate::commands::shared::filters::parse_filters;
use crate::commands::shared::limit::effective_limit;
use crate::output::output;

/// Handle `scout search`.
pub async fn handle(args: &SearchArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let input = parse_filters(&ctx.registry, &args.filters)?;
    let fields: Vec<&str> = args.fields.iter().map(String::as_str).collect();
    let limit = effective_limit(flags.limit, ctx.config.search.page_size);

    let engine = SearchEngine::new(ctx.registry.clone(), ctx.service.db(), ctx.limits());
    let records = engine.search(&input, &fields, limit).await?;
    output(&records, flags.format)
}
