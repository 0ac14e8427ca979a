use std::str::FromStr;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use supplybot_core::{
    LookupError, OrderId, OrderLookup, PriceLookup, ProductName, ProductOrder, ProductRecord,
    StockLevel, SupplyLookup,
};

use super::RepositoryError;
use crate::DbPool;

type RecordRow = (String, i64, i64, String, String, String);

const SELECT_RECORD: &str = "SELECT product_name, stock_quantity, order_id, order_status,
        current_price, old_price
     FROM supply_chain";

#[derive(Clone)]
pub struct SqlSupplyChainRepository {
    pool: DbPool,
}

impl SqlSupplyChainRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub async fn find_by_name(
        &self,
        product: &ProductName,
    ) -> Result<Option<ProductRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, RecordRow>(&format!(
            "{SELECT_RECORD} WHERE LOWER(product_name) = ?1"
        ))
        .bind(product.lookup_key())
        .fetch_optional(&self.pool)
        .await?;

        row.map(decode_record).transpose()
    }
}

fn decode_record(row: RecordRow) -> Result<ProductRecord, RepositoryError> {
    let (product_name, stock_quantity, order_id, order_status, current_price, old_price) = row;
    Ok(ProductRecord {
        current_price: decode_price(&product_name, "current_price", &current_price)?,
        old_price: decode_price(&product_name, "old_price", &old_price)?,
        product_name: ProductName(product_name),
        stock_quantity,
        order_id: OrderId(order_id),
        order_status,
    })
}

fn decode_price(product: &str, column: &str, value: &str) -> Result<Decimal, RepositoryError> {
    Decimal::from_str(value.trim()).map_err(|error| {
        RepositoryError::Decode(format!("{column} `{value}` for {product} is not a decimal: {error}"))
    })
}

fn log_failure(operation: &'static str, error: &RepositoryError) {
    warn!(event_name = "db.supply_chain.lookup_failed", operation, error = %error, "lookup failed");
}

#[async_trait]
impl SupplyLookup for SqlSupplyChainRepository {
    async fn stock(&self, product: &ProductName) -> Result<StockLevel, LookupError> {
        debug!(event_name = "db.supply_chain.stock", product = %product.0, "querying stock");
        let record = self.find_by_name(product).await.map_err(|error| {
            log_failure("stock", &error);
            LookupError::from(error)
        })?;

        Ok(match record {
            Some(record) => StockLevel::from_quantity(record.product_name, record.stock_quantity),
            None => StockLevel::Unknown { product: product.clone() },
        })
    }

    async fn order_status(&self, order_id: OrderId) -> Result<OrderLookup, LookupError> {
        debug!(event_name = "db.supply_chain.order_status", order_id = order_id.0, "querying order");
        let status = sqlx::query_scalar::<_, String>(
            "SELECT order_status FROM supply_chain WHERE order_id = ?1 ORDER BY rowid LIMIT 1",
        )
        .bind(order_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            let error = RepositoryError::from(error);
            log_failure("order_status", &error);
            LookupError::from(error)
        })?;

        Ok(match status {
            Some(status) => OrderLookup::Found { order_id, status },
            None => OrderLookup::NotFound { order_id },
        })
    }

    async fn price(&self, product: &ProductName) -> Result<PriceLookup, LookupError> {
        debug!(event_name = "db.supply_chain.price", product = %product.0, "querying price");
        let record = self.find_by_name(product).await.map_err(|error| {
            log_failure("price", &error);
            LookupError::from(error)
        })?;

        Ok(match record {
            Some(record) => {
                PriceLookup::from_prices(record.product_name, record.current_price, record.old_price)
            }
            None => PriceLookup::Unknown { product: product.clone() },
        })
    }

    async fn order_for_product(
        &self,
        product: &ProductName,
    ) -> Result<Option<ProductOrder>, LookupError> {
        let row = sqlx::query_as::<_, (i64, String)>(
            "SELECT order_id, order_status FROM supply_chain WHERE LOWER(product_name) = ?1",
        )
        .bind(product.lookup_key())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            let error = RepositoryError::from(error);
            log_failure("order_for_product", &error);
            LookupError::from(error)
        })?;

        Ok(row.map(|(order_id, status)| ProductOrder { order_id: OrderId(order_id), status }))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use supplybot_core::{
        LookupError, OrderId, OrderLookup, PriceLookup, ProductName, StockLevel, SupplyLookup,
    };

    use super::SqlSupplyChainRepository;
    use crate::fixtures::SampleDataset;
    use crate::{connect_with_settings, migrations};

    async fn seeded_repository() -> SqlSupplyChainRepository {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        SampleDataset::ensure_seeded(&pool).await.expect("seed");
        SqlSupplyChainRepository::new(pool)
    }

    fn name(value: &str) -> ProductName {
        ProductName(value.to_string())
    }

    #[tokio::test]
    async fn stock_lookup_ignores_case() {
        let repo = seeded_repository().await;

        let upper = repo.stock(&name("PRODUCTX")).await.expect("upper");
        let lower = repo.stock(&name("productx")).await.expect("lower");

        assert_eq!(upper, lower);
        assert_eq!(
            upper,
            StockLevel::InStock { product: name("ProductX"), quantity: 50 }
        );
        assert_eq!(upper.to_string(), "ProductX has 50 units in stock.");
    }

    #[tokio::test]
    async fn zero_stock_is_out_of_stock() {
        let repo = seeded_repository().await;
        let level = repo.stock(&name("producty")).await.expect("stock");
        assert_eq!(level.to_string(), "ProductY is out of stock.");
    }

    #[tokio::test]
    async fn missing_product_has_no_stock_data() {
        let repo = seeded_repository().await;
        let level = repo.stock(&name("gizmo")).await.expect("stock");
        assert_eq!(level, StockLevel::Unknown { product: name("gizmo") });
    }

    #[tokio::test]
    async fn order_lookup_matches_exact_id() {
        let repo = seeded_repository().await;

        assert_eq!(
            repo.order_status(OrderId(456)).await.expect("order"),
            OrderLookup::Found { order_id: OrderId(456), status: "Pending".to_string() }
        );
        assert_eq!(
            repo.order_status(OrderId(4567)).await.expect("order"),
            OrderLookup::NotFound { order_id: OrderId(4567) }
        );
    }

    #[tokio::test]
    async fn price_lookup_distinguishes_changed_and_unchanged() {
        let repo = seeded_repository().await;

        assert_eq!(
            repo.price(&name("productz")).await.expect("price"),
            PriceLookup::Changed {
                product: name("ProductZ"),
                old: Decimal::new(1499, 2),
                current: Decimal::new(1550, 2),
            }
        );
        assert_eq!(
            repo.price(&name("producty")).await.expect("price").to_string(),
            "The price of ProductY is $5.99 (no recent changes)."
        );
        assert_eq!(
            repo.price(&name("gizmo")).await.expect("price").to_string(),
            "No pricing data for gizmo."
        );
    }

    #[tokio::test]
    async fn order_for_product_returns_attached_order() {
        let repo = seeded_repository().await;

        let order = repo.order_for_product(&name("ProductZ")).await.expect("order");
        assert_eq!(order.map(|order| order.to_string()), Some("Order #789 is Pending.".to_string()));
        assert_eq!(repo.order_for_product(&name("gizmo")).await.expect("order"), None);
    }

    #[tokio::test]
    async fn malformed_price_surfaces_decode_error() {
        let repo = seeded_repository().await;
        sqlx::query("UPDATE supply_chain SET current_price = 'n/a' WHERE product_name = 'ProductX'")
            .execute(repo.pool())
            .await
            .expect("corrupt price");

        let result = repo.price(&name("productx")).await;
        assert!(matches!(result, Err(LookupError::Decode(_))));
    }

    #[tokio::test]
    async fn closed_pool_reports_storage_error() {
        let repo = seeded_repository().await;
        repo.pool().close().await;

        let result = repo.stock(&name("productx")).await;
        assert!(matches!(result, Err(LookupError::Storage(_))));
    }
}
