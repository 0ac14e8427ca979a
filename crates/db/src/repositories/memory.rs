use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use supplybot_core::{
    LookupError, OrderId, OrderLookup, PriceLookup, ProductName, ProductOrder, ProductRecord,
    StockLevel, SupplyLookup,
};

use crate::fixtures::SampleDataset;

#[derive(Default)]
struct Inventory {
    /// Keyed by lower-cased product name.
    records: HashMap<String, ProductRecord>,
    /// Keys in insertion order, scanned for order-id lookups.
    insertion_order: Vec<String>,
}

impl Inventory {
    fn find(&self, product: &ProductName) -> Option<&ProductRecord> {
        self.records.get(&product.lookup_key())
    }
}

#[derive(Default)]
pub struct InMemorySupplyChainRepository {
    inventory: RwLock<Inventory>,
}

impl InMemorySupplyChainRepository {
    pub fn with_sample_data() -> Self {
        Self::from_records(SampleDataset::records())
    }

    /// Builds the inventory in iteration order. A later record whose name
    /// matches an earlier one case-insensitively is skipped.
    fn from_records(records: impl IntoIterator<Item = ProductRecord>) -> Self {
        let mut inventory = Inventory::default();
        for record in records {
            let key = record.product_name.lookup_key();
            if inventory.records.contains_key(&key) {
                continue;
            }
            inventory.insertion_order.push(key.clone());
            inventory.records.insert(key, record);
        }

        Self { inventory: RwLock::new(inventory) }
    }

    async fn find(&self, product: &ProductName) -> Option<ProductRecord> {
        self.inventory.read().await.find(product).cloned()
    }
}

#[async_trait]
impl SupplyLookup for InMemorySupplyChainRepository {
    async fn stock(&self, product: &ProductName) -> Result<StockLevel, LookupError> {
        Ok(match self.find(product).await {
            Some(record) => StockLevel::from_quantity(record.product_name, record.stock_quantity),
            None => StockLevel::Unknown { product: product.clone() },
        })
    }

    async fn order_status(&self, order_id: OrderId) -> Result<OrderLookup, LookupError> {
        let inventory = self.inventory.read().await;
        let status = inventory
            .insertion_order
            .iter()
            .filter_map(|key| inventory.records.get(key))
            .find(|record| record.order_id == order_id)
            .map(|record| record.order_status.clone());

        Ok(match status {
            Some(status) => OrderLookup::Found { order_id, status },
            None => OrderLookup::NotFound { order_id },
        })
    }

    async fn price(&self, product: &ProductName) -> Result<PriceLookup, LookupError> {
        Ok(match self.find(product).await {
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
        Ok(self
            .find(product)
            .await
            .map(|record| ProductOrder { order_id: record.order_id, status: record.order_status }))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use supplybot_core::{
        OrderId, OrderLookup, ProductName, ProductRecord, StockLevel, SupplyLookup,
    };

    use super::InMemorySupplyChainRepository;

    fn record(name: &str, order_id: i64, status: &str) -> ProductRecord {
        ProductRecord {
            product_name: ProductName(name.to_string()),
            stock_quantity: 3,
            order_id: OrderId(order_id),
            order_status: status.to_string(),
            current_price: Decimal::new(100, 2),
            old_price: Decimal::new(100, 2),
        }
    }

    #[tokio::test]
    async fn sample_data_matches_seeded_rows() {
        let repo = InMemorySupplyChainRepository::with_sample_data();

        assert_eq!(repo.inventory.read().await.records.len(), 3);
        assert_eq!(
            repo.stock(&ProductName("productx".to_string())).await.expect("stock"),
            StockLevel::InStock { product: ProductName("ProductX".to_string()), quantity: 50 }
        );
    }

    #[tokio::test]
    async fn case_insensitive_duplicate_keeps_first_record() {
        let repo = InMemorySupplyChainRepository::from_records([
            record("Widget", 1, "Pending"),
            record("WIDGET", 2, "Shipped"),
        ]);

        {
            let inventory = repo.inventory.read().await;
            assert_eq!(inventory.records.len(), 1);
            assert_eq!(inventory.insertion_order, vec!["widget".to_string()]);
        }
        assert_eq!(
            repo.order_status(OrderId(2)).await.expect("order"),
            OrderLookup::NotFound { order_id: OrderId(2) }
        );
    }

    #[tokio::test]
    async fn shared_order_id_resolves_to_first_inserted_row() {
        let repo = InMemorySupplyChainRepository::from_records([
            record("Widget", 7, "Pending"),
            record("Gadget", 7, "Shipped"),
        ]);

        assert_eq!(
            repo.order_status(OrderId(7)).await.expect("order"),
            OrderLookup::Found { order_id: OrderId(7), status: "Pending".to_string() }
        );
    }

    #[tokio::test]
    async fn concurrent_readers_see_consistent_inventory() {
        let repo = std::sync::Arc::new(InMemorySupplyChainRepository::with_sample_data());

        let handles = (0..8)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.order_status(OrderId(456)).await })
            })
            .collect::<Vec<_>>();

        for handle in handles {
            assert_eq!(
                handle.await.expect("join").expect("order"),
                OrderLookup::Found { order_id: OrderId(456), status: "Pending".to_string() }
            );
        }
    }
}
