//! Convenience re-exports for common usage.
//!
//! ```
//! use matchbook_rs::prelude::*;
//!
//! let engine = MatchingEngine::new();
//! let result = engine.submit(Order::limit("b1", "AAPL", Side::Buy, 15_000, 100));
//! assert!(result.is_ok());
//! ```

pub use crate::orderbook::book::OrderBook;
pub use crate::orderbook::engine::{MatchingEngine, SubmitResult};
pub use crate::orderbook::error::EngineError;
pub use crate::orderbook::order::{
    Order, OrderId, OrderSnapshot, OrderStatus, OrderType, Side,
};
pub use crate::orderbook::router::{TradeRouterStd, TradeRouterTokio};
pub use crate::orderbook::snapshot::{AggregatedLevel, BookSnapshot};
pub use crate::orderbook::trade::{Trade, TradeEvent, TradeListener};
pub use crate::utils::current_time_millis;
