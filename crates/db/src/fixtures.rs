use rust_decimal::Decimal;
use tracing::info;

use supplybot_core::{OrderId, ProductName, ProductRecord};

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

struct SampleRow {
    product_name: &'static str,
    stock_quantity: i64,
    order_id: i64,
    order_status: &'static str,
    current_price: &'static str,
    old_price: &'static str,
}

const SAMPLE_ROWS: &[SampleRow] = &[
    SampleRow {
        product_name: "ProductX",
        stock_quantity: 50,
        order_id: 123,
        order_status: "Shipped",
        current_price: "10.99",
        old_price: "9.99",
    },
    SampleRow {
        product_name: "ProductY",
        stock_quantity: 0,
        order_id: 456,
        order_status: "Pending",
        current_price: "5.99",
        old_price: "5.99",
    },
    SampleRow {
        product_name: "ProductZ",
        stock_quantity: 100,
        order_id: 789,
        order_status: "Pending",
        current_price: "15.50",
        old_price: "14.99",
    },
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedResult {
    /// Rows written by this call; zero when the table already had data.
    pub inserted: usize,
    pub total_rows: i64,
}

impl SeedResult {
    pub fn was_seeded(&self) -> bool {
        self.inserted > 0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}

/// Fixed sample rows loaded on first start.
pub struct SampleDataset;

impl SampleDataset {
    pub fn records() -> Vec<ProductRecord> {
        SAMPLE_ROWS
            .iter()
            .map(|row| ProductRecord {
                product_name: ProductName(row.product_name.to_string()),
                stock_quantity: row.stock_quantity,
                order_id: OrderId(row.order_id),
                order_status: row.order_status.to_string(),
                current_price: parse_fixture_price(row.current_price),
                old_price: parse_fixture_price(row.old_price),
            })
            .collect()
    }

    /// Inserts the sample rows only when the table is empty. The emptiness check
    /// and the inserts run in one transaction.
    pub async fn ensure_seeded(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;

        let existing: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM supply_chain").fetch_one(&mut *tx).await?;

        if existing > 0 {
            tx.rollback().await?;
            info!(
                event_name = "db.seed.skipped",
                existing_rows = existing,
                "supply_chain already populated, skipping sample data"
            );
            return Ok(SeedResult { inserted: 0, total_rows: existing });
        }

        for row in SAMPLE_ROWS {
            sqlx::query(
                "INSERT INTO supply_chain
                    (product_name, stock_quantity, order_id, order_status, current_price, old_price)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(row.product_name)
            .bind(row.stock_quantity)
            .bind(row.order_id)
            .bind(row.order_status)
            .bind(row.current_price)
            .bind(row.old_price)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        info!(event_name = "db.seed.inserted", inserted = SAMPLE_ROWS.len(), "sample data loaded");
        Ok(SeedResult { inserted: SAMPLE_ROWS.len(), total_rows: SAMPLE_ROWS.len() as i64 })
    }

    /// Checks that every sample product is present.
    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::with_capacity(SAMPLE_ROWS.len());

        for row in SAMPLE_ROWS {
            let present: i64 = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM supply_chain WHERE LOWER(product_name) = LOWER(?1))",
            )
            .bind(row.product_name)
            .fetch_one(pool)
            .await?;
            checks.push((row.product_name, present == 1));
        }

        let all_present = checks.iter().all(|(_, present)| *present);
        Ok(VerificationResult { all_present, checks })
    }
}

fn parse_fixture_price(value: &str) -> Decimal {
    value.parse().unwrap_or(Decimal::ZERO)
}
