use crate::commands::{block_on, load_config, CommandResult, EXIT_STORE};
use supplybot_db::SupplyChainStore;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup {
    Stock(String),
    Order(i64),
    Price(String),
}

pub fn run(lookup: Lookup) -> CommandResult {
    let config = match load_config("lookup") {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let result = block_on("lookup", async {
        let store = SupplyChainStore::open(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| error.to_string())?;

        let text = match &lookup {
            Lookup::Stock(product) => store.check_stock(product).await,
            Lookup::Order(order_id) => store.check_order_status(*order_id).await,
            Lookup::Price(product) => store.check_price(product).await,
        };
        store.close().await;
        Ok::<String, String>(text)
    });

    match result {
        Ok(Ok(text)) => CommandResult::success("lookup", text),
        Ok(Err(message)) => CommandResult::failure("lookup", "store_init", message, EXIT_STORE),
        Err(failure) => failure,
    }
}
