use crate::commands::{block_on, load_config, CommandResult, EXIT_STORE};
use supplybot_core::QueryRouter;
use supplybot_db::SupplyChainStore;

/// Routes `query` against the configured store. The text-generation model is
/// not called, so the output is the raw data string (or a guidance reply).
pub fn run(query: &str) -> CommandResult {
    let config = match load_config("ask") {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let result = block_on("ask", async {
        let store = SupplyChainStore::open(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| error.to_string())?;

        let router = QueryRouter::with_lookup(store.lookup().clone());
        let text = router.route_text(query).await;
        store.close().await;
        Ok::<String, String>(text)
    });

    match result {
        Ok(Ok(text)) => CommandResult::success("ask", text),
        Ok(Err(message)) => CommandResult::failure("ask", "store_init", message, EXIT_STORE),
        Err(failure) => failure,
    }
}
