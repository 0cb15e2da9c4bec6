//! Multi-symbol matching engine: symbol sharding, lock discipline, and the
//! global order directory.

use crate::utils::current_time_millis;
use super::book::OrderBook;
use super::error::EngineError;
use super::order::{Order, OrderId, OrderSnapshot, OrderStatus, OrderType};
use super::snapshot::BookSnapshot;
use super::trade::{Trade, TradeEvent, TradeListener};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// The outcome of a successful submission.
#[derive(Debug, Clone)]
pub struct SubmitResult {
    /// The submitted order, reflecting its post-match fill and status.
    pub order: Arc<Order>,
    /// Trades produced by this submission, in emission order.
    pub trades: Vec<Trade>,
    /// Whether a limit order's remainder was placed in the book.
    pub order_in_book: bool,
    /// Whether the submission was a market order.
    pub is_market_order: bool,
}

/// Thread-safe, multi-symbol matching engine.
///
/// One reader-writer lock per symbol serializes all matching, cancellation
/// and snapshot traffic for that symbol while leaving other symbols
/// untouched; a global lock guards only the symbol→book map itself and is
/// taken in write mode solely for first-use creation. The order directory
/// maps every identifier ever submitted to its order record and retains
/// terminal orders indefinitely for status queries.
///
/// ```
/// use matchbook_rs::prelude::*;
///
/// let engine = MatchingEngine::new();
/// engine
///     .submit(Order::limit("s1", "AAPL", Side::Sell, 15_050, 100))
///     .unwrap();
/// let result = engine
///     .submit(Order::limit("b1", "AAPL", Side::Buy, 15_050, 40))
///     .unwrap();
///
/// assert_eq!(result.trades.len(), 1);
/// assert_eq!(result.trades[0].price, 15_050);
/// assert_eq!(engine.order_status("s1").unwrap().filled_quantity, 40);
/// ```
pub struct MatchingEngine {
    /// Per-symbol books, each behind its own reader-writer lock. The outer
    /// lock is read-held on the fast path and write-held only to create a
    /// book for a symbol seen for the first time.
    books: RwLock<HashMap<String, Arc<RwLock<OrderBook>>>>,

    /// Global directory of every order ever submitted, keyed by id.
    orders: DashMap<OrderId, Arc<Order>>,

    /// Invoked with each submission's trades after the symbol lock drops.
    trade_listener: Option<TradeListener>,
}

impl MatchingEngine {
    /// Create an engine with no books; books appear lazily per symbol.
    pub fn new() -> Self {
        Self {
            books: RwLock::new(HashMap::new()),
            orders: DashMap::new(),
            trade_listener: None,
        }
    }

    /// Create an engine that notifies `trade_listener` of executed trades.
    pub fn with_trade_listener(trade_listener: TradeListener) -> Self {
        Self {
            books: RwLock::new(HashMap::new()),
            orders: DashMap::new(),
            trade_listener: Some(trade_listener),
        }
    }

    /// Set or replace the trade listener.
    pub fn set_trade_listener(&mut self, trade_listener: TradeListener) {
        self.trade_listener = Some(trade_listener);
    }

    /// Remove the trade listener.
    pub fn remove_trade_listener(&mut self) {
        self.trade_listener = None;
    }

    /// Fetch the book for `symbol`, creating it on first use.
    ///
    /// Double-checked: probe under the read lock, and only on a miss
    /// re-acquire in write mode and re-probe before inserting, so racing
    /// first users agree on a single book.
    fn book(&self, symbol: &str) -> Arc<RwLock<OrderBook>> {
        {
            let books = self.books.read();
            if let Some(book) = books.get(symbol) {
                return Arc::clone(book);
            }
        }

        let mut books = self.books.write();
        let book = books.entry(symbol.to_string()).or_insert_with(|| {
            debug!("creating order book for symbol {}", symbol);
            Arc::new(RwLock::new(OrderBook::new(symbol)))
        });
        Arc::clone(book)
    }

    /// Submit an order for matching.
    ///
    /// The order is registered in the global directory, then processed
    /// under its symbol's write lock. A market order is checked against
    /// available opposite-side liquidity first; on rejection it is removed
    /// from the directory and the book is left untouched.
    ///
    /// # Errors
    /// [`EngineError::InsufficientLiquidity`] when a market order asks for
    /// more than the opposite side holds.
    pub fn submit(&self, order: Order) -> Result<SubmitResult, EngineError> {
        let order = Arc::new(order);
        let is_market_order = order.order_type == OrderType::Market;

        let book = self.book(&order.symbol);
        self.orders.insert(order.id.clone(), Arc::clone(&order));

        let (trades, order_in_book) = {
            let mut book = book.write();

            if is_market_order {
                if let Err(err) = book.check_market_liquidity(&order) {
                    // Reject without residue: the directory entry goes too.
                    self.orders.remove(order.id.as_str());
                    return Err(err);
                }
            }

            book.process_order(&order)
        };

        if !trades.is_empty() {
            if let Some(listener) = &self.trade_listener {
                listener(&TradeEvent {
                    symbol: order.symbol.clone(),
                    trades: trades.clone(),
                    timestamp: current_time_millis(),
                });
            }
        }

        trace!(
            "engine: submitted {} on {}: {} trade(s), status {}",
            order.id,
            order.symbol,
            trades.len(),
            order.status()
        );
        Ok(SubmitResult {
            order,
            trades,
            order_in_book,
            is_market_order,
        })
    }

    /// Cancel an order by id.
    ///
    /// The status check and the transition to `CANCELLED` happen in a
    /// single critical section on the directory entry, so a concurrent
    /// fill cannot slip between them. Only then is the symbol's write lock
    /// taken to detach the order from its book; the detach result is
    /// ignored because the book may legitimately have evicted the order
    /// already, and the status set here is authoritative.
    ///
    /// # Errors
    /// [`EngineError::OrderNotFound`] for an unknown id,
    /// [`EngineError::AlreadyTerminal`] when the order was already filled
    /// or cancelled.
    pub fn cancel(&self, order_id: &str) -> Result<OrderSnapshot, EngineError> {
        let order = {
            let Some(entry) = self.orders.get_mut(order_id) else {
                return Err(EngineError::OrderNotFound(order_id.to_string()));
            };
            let status = entry.status();
            if status.is_terminal() {
                return Err(EngineError::AlreadyTerminal {
                    order_id: order_id.to_string(),
                    status,
                });
            }
            entry.set_status(OrderStatus::Cancelled);
            Arc::clone(entry.value())
        };

        let book = self.book(&order.symbol);
        book.write().cancel_order(order_id);

        debug!("engine: cancelled {} on {}", order_id, order.symbol);
        Ok(order.snapshot())
    }

    /// Look up an order's current state by id.
    ///
    /// Returns a defensive copy; the live record is never handed out for
    /// reading.
    ///
    /// # Errors
    /// [`EngineError::OrderNotFound`] for an unknown id.
    pub fn order_status(&self, order_id: &str) -> Result<OrderSnapshot, EngineError> {
        self.orders
            .get(order_id)
            .map(|entry| entry.snapshot())
            .ok_or_else(|| EngineError::OrderNotFound(order_id.to_string()))
    }

    /// Aggregated snapshot of one symbol's book, taken under its read
    /// lock. `depth` limits the number of levels per side; `0` means all.
    ///
    /// An unknown symbol yields an empty snapshot (and lazily creates the
    /// empty book, as submission would).
    #[must_use]
    pub fn book_snapshot(&self, symbol: &str, depth: usize) -> BookSnapshot {
        let book = self.book(symbol);
        let guard = book.read();
        guard.snapshot(depth)
    }

    /// The symbols an order book currently exists for.
    #[must_use]
    pub fn symbols(&self) -> Vec<String> {
        self.books.read().keys().cloned().collect()
    }

    /// Whether a book exists for `symbol`.
    #[must_use]
    pub fn has_book(&self, symbol: &str) -> bool {
        self.books.read().contains_key(symbol)
    }

    /// Number of order books in this engine.
    #[must_use]
    pub fn book_count(&self) -> usize {
        self.books.read().len()
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}
