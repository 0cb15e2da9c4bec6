//! Executed trades and trade event notification.

use crate::utils::current_time_millis;
use super::order::OrderId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// A single executed trade.
///
/// Trades are immutable and emitted in the order they are produced. The
/// execution price is always the resting order's price: the maker prices
/// the fill, never the aggressor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Fresh, globally unique identifier for this trade.
    pub trade_id: Uuid,
    /// The incoming order that initiated the match.
    pub aggressor_order_id: OrderId,
    /// The resting order taken from the book.
    pub resting_order_id: OrderId,
    /// Execution price in minor units (the resting order's price).
    pub price: i64,
    /// Executed quantity. Always positive.
    pub quantity: u64,
    /// Execution time, milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl Trade {
    pub(super) fn new(
        aggressor_order_id: OrderId,
        resting_order_id: OrderId,
        price: i64,
        quantity: u64,
    ) -> Self {
        Self {
            trade_id: Uuid::new_v4(),
            aggressor_order_id,
            resting_order_id,
            price,
            quantity,
            timestamp: current_time_millis(),
        }
    }
}

/// The trades produced by one submission, batched for listeners.
#[derive(Debug, Clone)]
pub struct TradeEvent {
    /// The symbol the trades executed on.
    pub symbol: String,
    /// The trades, in emission order.
    pub trades: Vec<Trade>,
    /// When the batch was published, milliseconds since the Unix epoch.
    pub timestamp: u64,
}

/// Callback invoked by the engine after a submission produced trades.
///
/// Listeners run outside the symbol lock and must not call back into the
/// engine for the same symbol synchronously if they need bounded latency.
pub type TradeListener = Arc<dyn Fn(&TradeEvent) + Send + Sync>;
