//! Typed results of the three supply-chain lookups.
//!
//! Each outcome renders the sentence handed to the response composer through
//! `Display`, so callers that only need text can `to_string()` it while
//! internal callers can still branch on the variant.

use std::fmt;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use super::product::{OrderId, ProductName};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("{0}")]
    Storage(String),
    #[error("stored record is malformed: {0}")]
    Decode(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StockLevel {
    InStock { product: ProductName, quantity: i64 },
    OutOfStock { product: ProductName },
    Unknown { product: ProductName },
}

impl StockLevel {
    pub fn from_quantity(product: ProductName, quantity: i64) -> Self {
        if quantity > 0 {
            Self::InStock { product, quantity }
        } else {
            Self::OutOfStock { product }
        }
    }
}

impl fmt::Display for StockLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InStock { product, quantity } => {
                write!(f, "{} has {quantity} units in stock.", product.0)
            }
            Self::OutOfStock { product } => write!(f, "{} is out of stock.", product.0),
            Self::Unknown { product } => write!(f, "No data available for {}.", product.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrderLookup {
    Found { order_id: OrderId, status: String },
    NotFound { order_id: OrderId },
}

impl fmt::Display for OrderLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found { status, .. } => f.write_str(status),
            Self::NotFound { order_id } => write!(f, "Order #{order_id} not found."),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PriceLookup {
    Changed { product: ProductName, old: Decimal, current: Decimal },
    Unchanged { product: ProductName, current: Decimal },
    Unknown { product: ProductName },
}

impl PriceLookup {
    pub fn from_prices(product: ProductName, current: Decimal, old: Decimal) -> Self {
        if current != old {
            Self::Changed { product, old, current }
        } else {
            Self::Unchanged { product, current }
        }
    }
}

impl fmt::Display for PriceLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Changed { product, old, current } => {
                write!(f, "The price of {} has changed from ${old} to ${current}.", product.0)
            }
            Self::Unchanged { product, current } => {
                write!(f, "The price of {} is ${current} (no recent changes).", product.0)
            }
            Self::Unknown { product } => write!(f, "No pricing data for {}.", product.0),
        }
    }
}

/// Order attached to a product row, used by the general-info summary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductOrder {
    pub order_id: OrderId,
    pub status: String,
}

impl fmt::Display for ProductOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Order #{} is {}.", self.order_id, self.status)
    }
}

/// Read-only access paths over the supply-chain table.
///
/// Product lookups are case-insensitive; order lookups match the id exactly.
#[async_trait]
pub trait SupplyLookup: Send + Sync {
    async fn stock(&self, product: &ProductName) -> Result<StockLevel, LookupError>;

    async fn order_status(&self, order_id: OrderId) -> Result<OrderLookup, LookupError>;

    async fn price(&self, product: &ProductName) -> Result<PriceLookup, LookupError>;

    async fn order_for_product(
        &self,
        product: &ProductName,
    ) -> Result<Option<ProductOrder>, LookupError>;
}

/// Renders a lookup result as text, turning storage failures into a
/// descriptive sentence instead of an error.
pub fn render_soft<T: fmt::Display>(result: Result<T, LookupError>) -> String {
    match result {
        Ok(value) => value.to_string(),
        Err(error) => format!("Database error: {error}"),
    }
}
