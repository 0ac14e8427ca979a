use std::sync::Arc;

use supplybot_agent::{
    composer::{ComposeError, ResponseComposer},
    llm::HuggingFaceClient,
    runtime::AgentRuntime,
};
use supplybot_core::config::{AppConfig, ConfigError};
use supplybot_core::QueryRouter;
use supplybot_db::{DbPool, SqlSupplyChainRepository, StoreInitError, SupplyChainStore};
use thiserror::Error;
use tracing::info;

pub type SupplyChainRuntime = AgentRuntime<SqlSupplyChainRepository, HuggingFaceClient>;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub runtime: Arc<SupplyChainRuntime>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreInitError),
    #[error("text-generation client setup failed: {0:#}")]
    Llm(anyhow::Error),
    #[error(transparent)]
    Prompt(#[from] ComposeError),
}

#[cfg(test)]
pub async fn bootstrap(
    options: supplybot_core::config::LoadOptions,
) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let client = HuggingFaceClient::from_config(&config.llm).map_err(BootstrapError::Llm)?;
    let composer = ResponseComposer::with_standard_prompt(client)?;
    info!(
        event_name = "system.bootstrap.llm_ready",
        correlation_id = "bootstrap",
        model = %config.llm.model,
        max_new_tokens = config.llm.max_new_tokens,
        "text-generation client configured"
    );

    let store = SupplyChainStore::open(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await?;
    let db_pool = store.pool().clone();
    info!(
        event_name = "system.bootstrap.database_ready",
        correlation_id = "bootstrap",
        "supply chain store initialized"
    );

    let runtime = AgentRuntime::new(QueryRouter::with_lookup(store.into_lookup()), composer);

    Ok(Application { config, db_pool, runtime: Arc::new(runtime) })
}

#[cfg(test)]
mod tests {
    use supplybot_core::config::{ConfigOverrides, LoadOptions};
    use supplybot_core::RouteOutcome;

    use crate::bootstrap::bootstrap;

    fn options(database_url: &str, api_key: &str) -> LoadOptions {
        LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some(database_url.to_string()),
                llm_api_key: Some(api_key.to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }
    }

    #[tokio::test]
    async fn bootstrap_fails_fast_with_blank_api_key() {
        let result = bootstrap(options("sqlite::memory:", "   ")).await;

        let message = result.err().expect("bootstrap should fail").to_string();
        assert!(message.contains("llm.api_key"));
    }

    #[tokio::test]
    async fn bootstrap_seeds_store_and_wires_router() {
        let app = bootstrap(options("sqlite::memory:", "hf_test"))
            .await
            .expect("bootstrap should succeed with valid overrides");

        let (rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM supply_chain")
            .fetch_one(&app.db_pool)
            .await
            .expect("count rows");
        assert_eq!(rows, 3);

        let outcome = app.runtime.router().route("Where is my order 456").await;
        assert_eq!(outcome, RouteOutcome::Data("Pending".to_string()));

        app.db_pool.close().await;
    }
}
