//! # Multi-Symbol Order Matching Engine
//!
//! An in-memory, multi-symbol central limit order book (CLOB) with
//! price-time priority matching for limit and market orders, partial
//! fills, constant-time cancellation and aggregated depth snapshots.
//!
//! ## Key Features
//!
//! - **Price-time priority**: better prices match first; at equal price,
//!   earlier arrivals match first. The execution price is always the
//!   resting order's price (maker pricing).
//! - **Limit and market orders**: limit remainders rest in the book;
//!   market orders are all-or-nothing, verified against available
//!   liquidity before any fill so a rejection leaves the book untouched.
//! - **Per-symbol lock sharding**: one reader-writer lock per symbol, so
//!   traffic on independent symbols never contends. Books are created
//!   lazily with double-checked locking on first use.
//! - **Global order directory**: every order ever submitted stays
//!   queryable by id, including filled and cancelled ones. Status reads
//!   return defensive copies.
//! - **Trade event routing**: an optional listener receives each
//!   submission's trades after the symbol lock is released, with ready-made
//!   routers for std and Tokio channels.
//!
//! ## Usage
//!
//! ```
//! use matchbook_rs::prelude::*;
//!
//! let engine = MatchingEngine::new();
//!
//! // Seed the ask side, then cross it.
//! engine
//!     .submit(Order::limit("s1", "AAPL", Side::Sell, 15_050, 1_000))
//!     .unwrap();
//! let result = engine
//!     .submit(Order::limit("b1", "AAPL", Side::Buy, 15_050, 500))
//!     .unwrap();
//!
//! assert_eq!(result.trades.len(), 1);
//! assert_eq!(result.trades[0].price, 15_050);
//! assert_eq!(result.order.status(), OrderStatus::Filled);
//!
//! // The resting order was partially consumed.
//! let maker = engine.order_status("s1").unwrap();
//! assert_eq!(maker.status, OrderStatus::PartialFill);
//! assert_eq!(maker.remaining(), 500);
//!
//! // Aggregated depth, best price first.
//! let depth = engine.book_snapshot("AAPL", 10);
//! assert_eq!(depth.asks[0].price, 15_050);
//! assert_eq!(depth.asks[0].quantity, 500);
//! ```
//!
//! ## Concurrency Model
//!
//! Within one symbol, all state transitions are totally ordered by that
//! symbol's write lock; trades emitted from a single submission are
//! contiguous and ordered as produced. Across symbols there is no global
//! ordering. Order records are shared between the directory and the book
//! holding them, with the two mutable fields (filled quantity and status)
//! kept in atomics so concurrent status readers never observe torn state.
//!
//! The core has no suspension points and exposes no cancellation tokens;
//! deadlines belong to the boundary that calls it. Prices are integer
//! minor units (e.g. cents) to avoid floating-point drift.

pub mod orderbook;
pub mod prelude;
mod utils;

pub use orderbook::book::OrderBook;
pub use orderbook::engine::{MatchingEngine, SubmitResult};
pub use orderbook::error::EngineError;
pub use orderbook::level::PriceLevel;
pub use orderbook::order::{Order, OrderId, OrderSnapshot, OrderStatus, OrderType, Side};
pub use orderbook::router::{TradeRouterStd, TradeRouterTokio};
pub use orderbook::snapshot::{AggregatedLevel, BookSnapshot};
pub use orderbook::trade::{Trade, TradeEvent, TradeListener};
pub use utils::current_time_millis;
