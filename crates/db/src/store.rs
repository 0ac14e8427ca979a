//! Text-level facade over the supply-chain lookups.
//!
//! Every `check_*` method answers with a sentence and never fails: storage
//! errors are folded into a `Database error: ...` string.

use thiserror::Error;
use tracing::info;

use supplybot_core::{render_soft, OrderId, ProductName, SupplyLookup};

use crate::connection::{connect_with_settings, DbPool};
use crate::fixtures::{SampleDataset, SeedResult};
use crate::migrations;
use crate::repositories::{RepositoryError, SqlSupplyChainRepository};

#[derive(Debug, Error)]
pub enum StoreInitError {
    #[error("database connection failed: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("sample data seeding failed: {0}")]
    Seed(#[source] RepositoryError),
}

pub struct SupplyChainStore<L = SqlSupplyChainRepository> {
    lookup: L,
}

impl SupplyChainStore<SqlSupplyChainRepository> {
    /// Connects, applies migrations and seeds sample rows if the table is empty.
    pub async fn open(
        database_url: &str,
        max_connections: u32,
        timeout_secs: u64,
    ) -> Result<Self, StoreInitError> {
        let pool = connect_with_settings(database_url, max_connections, timeout_secs)
            .await
            .map_err(StoreInitError::Connect)?;
        Self::initialize(&pool).await?;
        Ok(Self::new(SqlSupplyChainRepository::new(pool)))
    }

    /// Idempotent schema + seed step for an existing pool.
    pub async fn initialize(pool: &DbPool) -> Result<SeedResult, StoreInitError> {
        migrations::run_pending(pool).await.map_err(StoreInitError::Migration)?;
        let seed = SampleDataset::ensure_seeded(pool).await.map_err(StoreInitError::Seed)?;
        info!(
            event_name = "db.store.initialized",
            seeded = seed.was_seeded(),
            total_rows = seed.total_rows,
            "supply chain store ready"
        );
        Ok(seed)
    }

    pub fn pool(&self) -> &DbPool {
        self.lookup.pool()
    }

    pub async fn close(self) {
        self.lookup.pool().close().await;
    }
}

impl<L> SupplyChainStore<L>
where
    L: SupplyLookup,
{
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    pub fn into_lookup(self) -> L {
        self.lookup
    }

    pub async fn check_stock(&self, product: &str) -> String {
        render_soft(self.lookup.stock(&ProductName(product.to_string())).await)
    }

    pub async fn check_order_status(&self, order_id: i64) -> String {
        render_soft(self.lookup.order_status(OrderId(order_id)).await)
    }

    pub async fn check_price(&self, product: &str) -> String {
        render_soft(self.lookup.price(&ProductName(product.to_string())).await)
    }
}
