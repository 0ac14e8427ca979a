use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductName(pub String);

impl ProductName {
    /// Lookup key used for case-insensitive matching.
    pub fn lookup_key(&self) -> String {
        self.0.to_lowercase()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub i64);

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of the supply-chain table. Records are written once by the seed
/// fixtures and only read afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub product_name: ProductName,
    pub stock_quantity: i64,
    pub order_id: OrderId,
    pub order_status: String,
    pub current_price: Decimal,
    pub old_price: Decimal,
}
