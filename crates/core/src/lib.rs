pub mod config;
pub mod domain;
pub mod errors;
pub mod extract;
pub mod router;

pub use domain::lookup::{
    render_soft, LookupError, OrderLookup, PriceLookup, ProductOrder, StockLevel, SupplyLookup,
};
pub use domain::product::{OrderId, ProductName, ProductRecord};
pub use errors::{ApplicationError, InterfaceError};
pub use extract::{EntityExtractor, HeuristicExtractor, OrderIdExtraction, FALLBACK_ORDER_ID};
pub use router::{QueryIntent, QueryRouter, RouteOutcome};
