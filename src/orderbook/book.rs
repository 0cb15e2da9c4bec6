//! Core per-symbol order book: price indexing and order placement.

use super::level::PriceLevel;
use super::order::{Order, OrderId, Side};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::trace;

/// The order book for a single symbol.
///
/// Each side is an ordered map from price to [`PriceLevel`]: iterating
/// `asks` forward yields the lowest price first, iterating `bids` backward
/// yields the highest price first. The map doubles as the price→level
/// lookup table, and `order_locations` maps every resting order id to the
/// `(price, side)` it can be found under, giving constant-time
/// cancellation.
///
/// The book is **not** concurrency-safe on its own; [`MatchingEngine`]
/// serializes access through one reader-writer lock per symbol.
///
/// [`MatchingEngine`]: crate::MatchingEngine
#[derive(Debug)]
pub struct OrderBook {
    /// The symbol this book belongs to.
    pub(super) symbol: String,

    /// Bid side price levels, keyed by price. Best bid is the last key.
    pub(super) bids: BTreeMap<i64, PriceLevel>,

    /// Ask side price levels, keyed by price. Best ask is the first key.
    pub(super) asks: BTreeMap<i64, PriceLevel>,

    /// Resting order id → (price, side) holding it.
    pub(super) order_locations: HashMap<OrderId, (i64, Side)>,

    /// Price of the most recent trade in this book, if any.
    pub(super) last_trade_price: Option<i64>,
}

impl OrderBook {
    /// Create an empty order book for the given symbol.
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            order_locations: HashMap::new(),
            last_trade_price: None,
        }
    }

    /// The symbol of this order book.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The best (highest) bid price, if any.
    #[must_use]
    pub fn best_bid(&self) -> Option<i64> {
        self.bids.keys().next_back().copied()
    }

    /// The best (lowest) ask price, if any.
    #[must_use]
    pub fn best_ask(&self) -> Option<i64> {
        self.asks.keys().next().copied()
    }

    /// The spread (best ask − best bid), when both sides are populated.
    #[must_use]
    pub fn spread(&self) -> Option<i64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    /// The mid price (average of best bid and best ask).
    #[must_use]
    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid as f64 + ask as f64) / 2.0),
            _ => None,
        }
    }

    /// The price of the most recent trade in this book, if any.
    #[must_use]
    pub fn last_trade_price(&self) -> Option<i64> {
        self.last_trade_price
    }

    /// Number of orders currently resting in this book.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.order_locations.len()
    }

    /// Whether an order with this id currently rests in the book.
    #[must_use]
    pub fn contains_order(&self, order_id: &str) -> bool {
        self.order_locations.contains_key(order_id)
    }

    /// The resting orders at a specific price, in arrival order.
    ///
    /// Returns an empty vector when no level exists at that price.
    #[must_use]
    pub fn get_orders_at_price(&self, price: i64, side: Side) -> Vec<Arc<Order>> {
        let levels = match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        };
        levels
            .get(&price)
            .map(|level| level.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Place a limit order's unfilled remainder in the book.
    ///
    /// Finds or creates the level at the order's price on the order's own
    /// side, enqueues at the tail, and records the order's location.
    pub(super) fn add_order(&mut self, order: Arc<Order>) {
        let (price, side) = (order.price, order.side);
        trace!(
            "book {}: resting order {} {} {}@{}",
            self.symbol,
            order.id,
            side,
            order.remaining(),
            price
        );

        let levels = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        let order_id = order.id.clone();
        levels
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price))
            .enqueue(order);
        self.order_locations.insert(order_id, (price, side));
    }

    /// Detach an order from the book by id.
    ///
    /// Removes the order from its level, drops the location entry, and
    /// deletes the level if it drained. Returns `false` when the id is not
    /// resting here. The order's status is untouched: status transitions
    /// belong to the engine, this only removes the book's reference.
    pub fn cancel_order(&mut self, order_id: &str) -> bool {
        let Some((price, side)) = self.order_locations.remove(order_id) else {
            return false;
        };

        let levels = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        if let Some(level) = levels.get_mut(&price) {
            level.remove(order_id);
            if level.is_empty() {
                levels.remove(&price);
            }
        }

        trace!("book {}: detached order {}", self.symbol, order_id);
        true
    }
}
