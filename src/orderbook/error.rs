//! Matching engine error types.

use super::order::{OrderStatus, Side};
use std::fmt;

/// Errors surfaced by the matching engine.
#[derive(Debug)]
#[non_exhaustive]
pub enum EngineError {
    /// A market order asked for more quantity than the opposite side of
    /// the book holds. The order was not inserted and leaves no residue
    /// in the engine.
    InsufficientLiquidity {
        /// Side of the rejected market order.
        side: Side,
        /// Quantity requested.
        requested: u64,
        /// Quantity available on the opposite side.
        available: u64,
    },

    /// The identifier is unknown to the engine.
    OrderNotFound(String),

    /// Cancellation was requested for an order already filled or
    /// cancelled. The order was not mutated.
    AlreadyTerminal {
        /// The order that could not be cancelled.
        order_id: String,
        /// The terminal status it was found in.
        status: OrderStatus,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InsufficientLiquidity {
                side,
                requested,
                available,
            } => {
                write!(
                    f,
                    "insufficient liquidity for {side} order: requested {requested}, available {available}"
                )
            }
            EngineError::OrderNotFound(id) => write!(f, "order not found: {id}"),
            EngineError::AlreadyTerminal { order_id, status } => {
                write!(f, "cannot cancel order {order_id}: already {status}")
            }
        }
    }
}

impl std::error::Error for EngineError {}
