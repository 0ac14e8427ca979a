//! Entity extraction from free-text queries.
//!
//! The router only depends on [`EntityExtractor`]; the token heuristics live in
//! [`HeuristicExtractor`] and can be swapped for a real entity recogniser.

use crate::domain::product::{OrderId, ProductName};

/// Order id substituted when an order query carries no digits.
pub const FALLBACK_ORDER_ID: OrderId = OrderId(123);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrderIdExtraction {
    Parsed(OrderId),
    Fallback(OrderId),
    Invalid(String),
}

pub trait EntityExtractor: Send + Sync {
    fn product_name(&self, query: &str) -> Option<ProductName>;

    fn order_id(&self, query: &str) -> OrderIdExtraction;
}

#[derive(Clone, Debug, Default)]
pub struct HeuristicExtractor;

impl HeuristicExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl EntityExtractor for HeuristicExtractor {
    /// Token after the first standalone "of", else the last token. Trailing
    /// `?` and `.` are stripped and the result is lower-cased.
    fn product_name(&self, query: &str) -> Option<ProductName> {
        let tokens = query.split_whitespace().collect::<Vec<_>>();

        let candidate = match tokens.iter().position(|token| token.eq_ignore_ascii_case("of")) {
            Some(index) => tokens.get(index + 1).copied(),
            None => tokens.last().copied(),
        }?;

        let product = candidate.trim_end_matches(['?', '.']).to_lowercase();
        (!product.is_empty()).then_some(ProductName(product))
    }

    /// Concatenates every all-digit token; falls back to [`FALLBACK_ORDER_ID`]
    /// when there are none.
    fn order_id(&self, query: &str) -> OrderIdExtraction {
        let digits = query
            .split_whitespace()
            .filter(|token| token.chars().all(|ch| ch.is_ascii_digit()))
            .collect::<String>();

        if digits.is_empty() {
            return OrderIdExtraction::Fallback(FALLBACK_ORDER_ID);
        }

        match digits.parse::<i64>() {
            Ok(value) => OrderIdExtraction::Parsed(OrderId(value)),
            Err(_) => OrderIdExtraction::Invalid(digits),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EntityExtractor, HeuristicExtractor, OrderIdExtraction, FALLBACK_ORDER_ID};
    use crate::domain::product::OrderId;

    fn product(query: &str) -> Option<String> {
        HeuristicExtractor::new().product_name(query).map(|name| name.0)
    }

    #[test]
    fn takes_token_after_of_and_strips_punctuation() {
        assert_eq!(product("What is the stock of ProductX?"), Some("productx".to_string()));
        assert_eq!(product("price of ProductZ."), Some("productz".to_string()));
    }

    #[test]
    fn uses_last_token_without_of() {
        assert_eq!(product("Tell me about ProductZ"), Some("productz".to_string()));
        assert_eq!(product("stock ProductY?."), Some("producty".to_string()));
    }

    #[test]
    fn of_must_be_a_whole_word() {
        assert_eq!(product("profit for ProductX"), Some("productx".to_string()));
    }

    #[test]
    fn extraction_fails_without_a_usable_token() {
        assert_eq!(product(""), None);
        assert_eq!(product("   "), None);
        assert_eq!(product("what is the stock of"), None);
        assert_eq!(product("stock ?"), None);
    }

    #[test]
    fn order_digits_are_concatenated() {
        let extractor = HeuristicExtractor::new();
        assert_eq!(extractor.order_id("order 456"), OrderIdExtraction::Parsed(OrderId(456)));
        assert_eq!(extractor.order_id("order 4 56"), OrderIdExtraction::Parsed(OrderId(456)));
        assert_eq!(extractor.order_id("order #456"), OrderIdExtraction::Fallback(OrderId(123)));
    }

    #[test]
    fn order_query_without_digits_uses_fallback_id() {
        let extraction = HeuristicExtractor::new().order_id("order status");
        assert_eq!(extraction, OrderIdExtraction::Fallback(FALLBACK_ORDER_ID));
        assert_eq!(FALLBACK_ORDER_ID, OrderId(123));
    }

    #[test]
    fn digits_with_trailing_punctuation_are_not_an_order_number() {
        let extractor = HeuristicExtractor::new();
        assert_eq!(
            extractor.order_id("Where is my order 456?"),
            OrderIdExtraction::Fallback(FALLBACK_ORDER_ID)
        );
        assert_eq!(
            extractor.order_id("Where is my order 456"),
            OrderIdExtraction::Parsed(OrderId(456))
        );
    }

    #[test]
    fn oversized_order_number_is_invalid() {
        let extraction = HeuristicExtractor::new().order_id("order 99999999999999999999999");
        assert_eq!(
            extraction,
            OrderIdExtraction::Invalid("99999999999999999999999".to_string())
        );
    }
}
