use std::sync::Arc;

use anyhow::Context;
use scout_config::ScoutConfig;
use scout_db::CatalogService;
use scout_schema::SchemaRegistry;
use scout_search::ExecutorLimits;

use crate::cli::GlobalFlags;

/// Load layered configuration, honouring `--config` when given.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<ScoutConfig> {
    let config = match &flags.config {
        Some(path) => ScoutConfig::load_from_file(path)
            .with_context(|| format!("failed to load config file {}", path.display()))?,
        None => ScoutConfig::load_with_dotenv().context("failed to load configuration")?,
    };
    tracing::debug!(database = %config.database.path, "configuration loaded");
    Ok(config)
}

/// Build the schema registry named by the config, or the built-in one.
pub fn load_registry(config: &ScoutConfig) -> anyhow::Result<SchemaRegistry> {
    match config.schema.custom_path() {
        Some(path) => SchemaRegistry::from_path(&path)
            .with_context(|| format!("invalid schema file {}", path.display())),
        None => SchemaRegistry::builtin().context("built-in schema is invalid"),
    }
}

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: ScoutConfig,
    pub registry: Arc<SchemaRegistry>,
    pub service: CatalogService,
}

impl AppContext {
    /// Load the schema and open (migrating if needed) the catalog database.
    pub async fn init(config: ScoutConfig) -> anyhow::Result<Self> {
        let registry = Arc::new(load_registry(&config)?);
        let service = CatalogService::new_local(&config.database.path)
            .await
            .with_context(|| format!("failed to open catalog at {}", config.database.path))?;
        Ok(Self {
            config,
            registry,
            service,
        })
    }

    /// Executor bounds taken from `[search]` and `[database]`.
    #[must_use]
    pub fn limits(&self) -> ExecutorLimits {
        ExecutorLimits {
            max_rows: usize::try_from(self.config.search.max_rows).unwrap_or(usize::MAX),
            timeout: self.config.database.timeout(),
        }
    }
}
