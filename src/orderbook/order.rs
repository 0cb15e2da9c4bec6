//! The order record and its value types.
//!
//! An [`Order`] is shared between the engine's global directory and, while
//! it rests, exactly one price level. Its identity fields are immutable;
//! the two fields mutated after submission (`filled` and `status`) are
//! atomics so directory readers never observe torn state.

use crate::utils::current_time_millis;
use crossbeam::atomic::AtomicCell;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Opaque order identifier, unique across the engine's lifetime.
///
/// Identifiers are caller-supplied; [`OrderId::random`] generates a
/// UUID-backed one for callers that do not bring their own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Wrap an externally supplied identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh UUID v4 identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The identifier as a string slice.
    #[must_use]
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for OrderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// Lets maps keyed by OrderId be probed with a plain &str.
impl Borrow<str> for OrderId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// The side of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    /// Bid side.
    Buy,
    /// Ask side.
    Sell,
}

impl Side {
    /// The side an incoming order of this side matches against.
    #[must_use]
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// The execution style of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Executes at `price` or better; the unfilled remainder rests.
    Limit,
    /// Executes at the best available prices and never rests. The `price`
    /// field of a market order is ignored.
    Market,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Limit => write!(f, "LIMIT"),
            OrderType::Market => write!(f, "MARKET"),
        }
    }
}

/// Lifecycle status of an order.
///
/// `Filled` and `Cancelled` are terminal: no further fills or transitions
/// occur once either is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Accepted by the engine; no fills yet.
    Accepted,
    /// At least one fill occurred; remaining quantity is still positive.
    PartialFill,
    /// Fully executed.
    Filled,
    /// Cancelled before being fully executed.
    Cancelled,
}

impl OrderStatus {
    /// Whether this status admits no further transitions.
    #[must_use]
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Filled | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Accepted => write!(f, "ACCEPTED"),
            OrderStatus::PartialFill => write!(f, "PARTIAL_FILL"),
            OrderStatus::Filled => write!(f, "FILLED"),
            OrderStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// A single order in the matching engine.
///
/// Prices are integer minor units (e.g. cents); quantities are whole units.
/// The engine requires callers to enforce: non-empty symbol, positive
/// quantity, `price > 0` for limit orders, and identifier uniqueness.
#[derive(Debug)]
pub struct Order {
    /// Unique identifier.
    pub id: OrderId,
    /// Trading symbol this order belongs to.
    pub symbol: String,
    /// Buy or sell.
    pub side: Side,
    /// Limit or market.
    pub order_type: OrderType,
    /// Limit price in minor units. Ignored for market orders.
    pub price: i64,
    /// Original quantity.
    pub quantity: u64,
    /// Submission time, milliseconds since the Unix epoch.
    pub timestamp: u64,

    /// Quantity executed so far. Always `<= quantity`.
    filled: AtomicU64,
    /// Current lifecycle status.
    status: AtomicCell<OrderStatus>,
}

impl Order {
    /// Create an order with an explicit type and price.
    pub fn new(
        id: impl Into<OrderId>,
        symbol: impl Into<String>,
        side: Side,
        order_type: OrderType,
        price: i64,
        quantity: u64,
    ) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            side,
            order_type,
            price,
            quantity,
            timestamp: current_time_millis(),
            filled: AtomicU64::new(0),
            status: AtomicCell::new(OrderStatus::Accepted),
        }
    }

    /// Create a limit order.
    pub fn limit(
        id: impl Into<OrderId>,
        symbol: impl Into<String>,
        side: Side,
        price: i64,
        quantity: u64,
    ) -> Self {
        Self::new(id, symbol, side, OrderType::Limit, price, quantity)
    }

    /// Create a market order. The price field is zero and never consulted.
    pub fn market(
        id: impl Into<OrderId>,
        symbol: impl Into<String>,
        side: Side,
        quantity: u64,
    ) -> Self {
        Self::new(id, symbol, side, OrderType::Market, 0, quantity)
    }

    /// Quantity executed so far.
    #[must_use]
    pub fn filled_quantity(&self) -> u64 {
        self.filled.load(Ordering::SeqCst)
    }

    /// Unfilled quantity (`quantity - filled`).
    #[must_use]
    pub fn remaining(&self) -> u64 {
        self.quantity.saturating_sub(self.filled_quantity())
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> OrderStatus {
        self.status.load()
    }

    /// Record an execution of `quantity` units against this order.
    ///
    /// Callers hold the owning symbol's write lock; the fill never exceeds
    /// the remaining quantity.
    pub(crate) fn fill(&self, quantity: u64) {
        self.filled.fetch_add(quantity, Ordering::SeqCst);
    }

    pub(crate) fn set_status(&self, status: OrderStatus) {
        self.status.store(status);
    }

    /// An immutable point-in-time copy of this order.
    #[must_use]
    pub fn snapshot(&self) -> OrderSnapshot {
        OrderSnapshot {
            id: self.id.clone(),
            symbol: self.symbol.clone(),
            side: self.side,
            order_type: self.order_type,
            price: self.price,
            quantity: self.quantity,
            filled_quantity: self.filled_quantity(),
            status: self.status(),
            timestamp: self.timestamp,
        }
    }
}

impl Serialize for Order {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Order", 9)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("symbol", &self.symbol)?;
        state.serialize_field("side", &self.side)?;
        state.serialize_field("type", &self.order_type)?;
        state.serialize_field("price", &self.price)?;
        state.serialize_field("quantity", &self.quantity)?;
        state.serialize_field("filled_quantity", &self.filled_quantity())?;
        state.serialize_field("status", &self.status())?;
        state.serialize_field("timestamp", &self.timestamp)?;
        state.end()
    }
}

/// Defensive copy of an [`Order`] returned to status queriers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    /// Unique identifier.
    pub id: OrderId,
    /// Trading symbol.
    pub symbol: String,
    /// Buy or sell.
    pub side: Side,
    /// Limit or market.
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Limit price in minor units.
    pub price: i64,
    /// Original quantity.
    pub quantity: u64,
    /// Quantity executed at snapshot time.
    pub filled_quantity: u64,
    /// Status at snapshot time.
    pub status: OrderStatus,
    /// Submission time, milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl OrderSnapshot {
    /// Unfilled quantity at snapshot time.
    #[must_use]
    pub fn remaining(&self) -> u64 {
        self.quantity.saturating_sub(self.filled_quantity)
    }
}
