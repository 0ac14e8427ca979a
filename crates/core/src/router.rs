//! Keyword-driven dispatch from a free-text query to one supply-chain lookup.
//!
//! Trigger keywords are tested case-insensitively in a fixed order and the
//! first match wins:
//!
//! 1. `stock` - stock level for the extracted product
//! 2. `order` - order status for the extracted order id
//! 3. `price` - current vs. previous price for the extracted product
//! 4. anything else - combined stock, price and order summary

use tracing::{debug, info};

use crate::domain::lookup::{render_soft, StockLevel, SupplyLookup};
use crate::domain::product::ProductName;
use crate::extract::{EntityExtractor, HeuristicExtractor, OrderIdExtraction};

pub const MISSING_PRODUCT_REPLY: &str = "Please provide a valid product name.";
pub const INVALID_ORDER_REPLY: &str = "Please provide a valid order ID.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryIntent {
    Stock,
    OrderStatus,
    Price,
    GeneralInfo,
}

impl QueryIntent {
    pub fn detect(query: &str) -> Self {
        let lowered = query.to_lowercase();
        if lowered.contains("stock") {
            Self::Stock
        } else if lowered.contains("order") {
            Self::OrderStatus
        } else if lowered.contains("price") {
            Self::Price
        } else {
            Self::GeneralInfo
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stock => "stock",
            Self::OrderStatus => "order_status",
            Self::Price => "price",
            Self::GeneralInfo => "general_info",
        }
    }
}

/// Result of routing one query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Unphrased data string, to be worded by the response composer.
    Data(String),
    /// Final guidance or apology text, returned to the caller as-is.
    Reply(String),
}

impl RouteOutcome {
    pub fn into_text(self) -> String {
        match self {
            Self::Data(text) | Self::Reply(text) => text,
        }
    }
}

#[derive(Clone, Debug)]
pub struct QueryRouter<L, E = HeuristicExtractor> {
    lookup: L,
    extractor: E,
}

impl<L> QueryRouter<L, HeuristicExtractor>
where
    L: SupplyLookup,
{
    pub fn with_lookup(lookup: L) -> Self {
        Self::new(lookup, HeuristicExtractor)
    }
}

impl<L, E> QueryRouter<L, E>
where
    L: SupplyLookup,
    E: EntityExtractor,
{
    pub fn new(lookup: L, extractor: E) -> Self {
        Self { lookup, extractor }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Routes a query and returns the resulting text, whichever kind it is.
    pub async fn route_text(&self, query: &str) -> String {
        self.route(query).await.into_text()
    }

    pub async fn route(&self, query: &str) -> RouteOutcome {
        let intent = QueryIntent::detect(query);
        debug!(event_name = "router.intent_detected", intent = intent.as_str(), "query intent detected");

        let outcome = match intent {
            QueryIntent::Stock => self.route_stock(query).await,
            QueryIntent::OrderStatus => self.route_order(query).await,
            QueryIntent::Price => self.route_price(query).await,
            QueryIntent::GeneralInfo => self.route_general(query).await,
        };

        info!(
            event_name = "router.routed",
            intent = intent.as_str(),
            direct_reply = matches!(outcome, RouteOutcome::Reply(_)),
            "query routed"
        );
        outcome
    }

    async fn route_stock(&self, query: &str) -> RouteOutcome {
        let Some(product) = self.extract_product(query) else {
            return RouteOutcome::Reply(MISSING_PRODUCT_REPLY.to_string());
        };

        match self.lookup.stock(&product).await {
            Ok(StockLevel::Unknown { product }) => RouteOutcome::Reply(format!(
                "Sorry, I couldn't find any information about {}.",
                product.0
            )),
            result => RouteOutcome::Data(render_soft(result)),
        }
    }

    async fn route_order(&self, query: &str) -> RouteOutcome {
        let extraction = self.extractor.order_id(query);
        let order_id = match &extraction {
            OrderIdExtraction::Parsed(order_id) => *order_id,
            OrderIdExtraction::Fallback(order_id) => {
                debug!(
                    event_name = "router.order_id_fallback",
                    order_id = order_id.0,
                    "no digits in order query, using fallback order id"
                );
                *order_id
            }
            OrderIdExtraction::Invalid(raw) => {
                debug!(event_name = "router.order_id_invalid", raw = %raw, "order id out of range");
                return RouteOutcome::Reply(INVALID_ORDER_REPLY.to_string());
            }
        };

        RouteOutcome::Data(render_soft(self.lookup.order_status(order_id).await))
    }

    async fn route_price(&self, query: &str) -> RouteOutcome {
        let Some(product) = self.extract_product(query) else {
            return RouteOutcome::Reply(MISSING_PRODUCT_REPLY.to_string());
        };

        RouteOutcome::Data(render_soft(self.lookup.price(&product).await))
    }

    async fn route_general(&self, query: &str) -> RouteOutcome {
        let Some(product) = self.extract_product(query) else {
            return RouteOutcome::Reply(MISSING_PRODUCT_REPLY.to_string());
        };

        let stock = render_soft(self.lookup.stock(&product).await);
        let price = render_soft(self.lookup.price(&product).await);
        let order = match self.lookup.order_for_product(&product).await {
            Ok(Some(order)) => order.to_string(),
            Ok(None) => "No order data available.".to_string(),
            Err(error) => render_soft::<String>(Err(error)),
        };

        RouteOutcome::Data(format!("{stock} {price} {order}"))
    }

    fn extract_product(&self, query: &str) -> Option<ProductName> {
        let product = self.extractor.product_name(query);
        debug!(
            event_name = "router.product_extracted",
            product = product.as_ref().map(|name| name.0.as_str()).unwrap_or("<none>"),
            "product name extracted"
        );
        product
    }
}
