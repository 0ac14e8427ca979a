use supplybot_core::{QueryRouter, RouteOutcome, FALLBACK_ORDER_ID};
use supplybot_db::{connect_with_settings, SqlSupplyChainRepository, SupplyChainStore};

type ScenarioResult<T = ()> = Result<T, String>;

macro_rules! require_eq {
    ($left:expr, $right:expr) => {
        if $left != $right {
            return Err(format!(
                "assertion failed: `left == right` (`{:?}` != `{:?}`)",
                $left,
                $right
            ));
        }
    };
}

async fn seeded_router() -> ScenarioResult<QueryRouter<SqlSupplyChainRepository>> {
    let pool = connect_with_settings("sqlite::memory:", 2, 5)
        .await
        .map_err(|error| format!("connect failed: {error}"))?;
    SupplyChainStore::initialize(&pool).await.map_err(|error| format!("init failed: {error}"))?;
    Ok(QueryRouter::with_lookup(SqlSupplyChainRepository::new(pool)))
}

#[tokio::test]
async fn stock_scenario_uses_the_stored_product_name() -> ScenarioResult {
    let router = seeded_router().await?;
    require_eq!(
        router.route("stock of ProductY").await,
        RouteOutcome::Data("ProductY is out of stock.".to_string())
    );
    Ok(())
}

#[tokio::test]
async fn price_scenario_reports_the_change() -> ScenarioResult {
    let router = seeded_router().await?;
    require_eq!(
        router.route("price of ProductX").await,
        RouteOutcome::Data("The price of ProductX has changed from $9.99 to $10.99.".to_string())
    );
    Ok(())
}

#[tokio::test]
async fn order_scenario_returns_bare_status() -> ScenarioResult {
    let router = seeded_router().await?;
    require_eq!(router.route("order 456").await, RouteOutcome::Data("Pending".to_string()));
    Ok(())
}

#[tokio::test]
async fn order_without_digits_resolves_the_fallback_sample_order() -> ScenarioResult {
    let router = seeded_router().await?;
    require_eq!(FALLBACK_ORDER_ID.0, 123);
    require_eq!(router.route("order status").await, RouteOutcome::Data("Shipped".to_string()));
    Ok(())
}

#[tokio::test]
async fn general_info_scenario_combines_lookups() -> ScenarioResult {
    let router = seeded_router().await?;
    require_eq!(
        router.route_text("Tell me about ProductZ").await,
        "ProductZ has 100 units in stock. The price of ProductZ has changed from $14.99 to $15.50. Order #789 is Pending."
            .to_string()
    );
    Ok(())
}

#[tokio::test]
async fn concurrent_readers_share_the_store() -> ScenarioResult {
    let router = std::sync::Arc::new(seeded_router().await?);

    let handles = ["stock of ProductX", "price of productz", "order 789", "about producty"]
        .into_iter()
        .map(|query| {
            let router = router.clone();
            tokio::spawn(async move { router.route_text(query).await })
        })
        .collect::<Vec<_>>();

    let mut answers = Vec::new();
    for handle in handles {
        answers.push(handle.await.map_err(|error| format!("task failed: {error}"))?);
    }

    require_eq!(answers[0], "ProductX has 50 units in stock.".to_string());
    require_eq!(answers[2], "Pending".to_string());
    require_eq!(
        answers[3],
        "ProductY is out of stock. The price of ProductY is $5.99 (no recent changes). Order #456 is Pending."
            .to_string()
    );
    Ok(())
}
