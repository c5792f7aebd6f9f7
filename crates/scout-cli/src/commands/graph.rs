use scout_search::SearchEngine;

use crate::bootstrap::AppContext;
use crate::cli::root_commands::GraphArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::filters::parse_filters;
use crate::commands::shared::limit::effective_limit;
use crate::output::output;

/// Handle `scout graph`.
pub async fn handle(args: &GraphArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let input = parse_filters(&ctx.registry, &args.filters)?;
    let limit = effective_limit(flags.limit, ctx.config.search.page_size);

    let engine = SearchEngine::new(ctx.registry.clone(), ctx.service.db(), ctx.limits());
    let graph = engine.graph(&input, limit).await?;

    if args.summary {
        return output(&graph.analyze(args.top), flags.format);
    }

    let graph = graph.to_graph();
    if flags.format == OutputFormat::Table {
        // Nodes and edges as two tables.
        output(&graph.nodes, flags.format)?;
        println!();
        return output(&graph.edges, flags.format);
    }
    output(&graph, flags.format)
}
