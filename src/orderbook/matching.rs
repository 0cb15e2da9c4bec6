//! The matching algorithm: price-time priority over the book's ordered
//! price levels, plus the market-order liquidity pre-check.

use super::book::OrderBook;
use super::error::EngineError;
use super::order::{Order, OrderId, OrderStatus, OrderType, Side};
use super::trade::Trade;
use std::sync::Arc;
use tracing::trace;

impl OrderBook {
    /// Process an incoming order against this book.
    ///
    /// Matches the order against the opposite side first. A limit order
    /// with remaining quantity afterwards is placed in the book on its own
    /// side (status `PARTIAL_FILL` if any fill occurred, else it stays
    /// `ACCEPTED`); a fully executed order is marked `FILLED`. Market
    /// orders never rest: the engine's liquidity pre-check guarantees a
    /// market order reaching this point fills completely.
    ///
    /// Returns the trades in emission order and whether the order was
    /// placed in the book.
    pub fn process_order(&mut self, order: &Arc<Order>) -> (Vec<Trade>, bool) {
        let trades = self.match_order(order);

        let mut order_in_book = false;
        if order.order_type == OrderType::Limit && order.remaining() > 0 {
            self.add_order(Arc::clone(order));
            order_in_book = true;
            if order.filled_quantity() > 0 {
                order.set_status(OrderStatus::PartialFill);
            }
        } else if order.remaining() == 0 {
            order.set_status(OrderStatus::Filled);
        }

        trace!(
            "book {}: processed {} with {} trade(s), in_book={}",
            self.symbol,
            order.id,
            trades.len(),
            order_in_book
        );
        (trades, order_in_book)
    }

    /// Walk the opposite side best-price-first, consuming resting orders
    /// until the aggressor is exhausted or no crossing level remains.
    fn match_order(&mut self, incoming: &Arc<Order>) -> Vec<Trade> {
        let mut trades = Vec::new();

        while incoming.remaining() > 0 {
            // Re-query the best level each pass: the previous pass may
            // have drained and deleted it.
            let best_price = match incoming.side {
                Side::Buy => self.best_ask(),
                Side::Sell => self.best_bid(),
            };
            let Some(best_price) = best_price else { break };

            if incoming.order_type == OrderType::Limit {
                let crosses = match incoming.side {
                    Side::Buy => incoming.price >= best_price,
                    Side::Sell => incoming.price <= best_price,
                };
                if !crosses {
                    break;
                }
            }

            self.match_at_level(incoming, best_price, &mut trades);
        }

        if let Some(last) = trades.last() {
            self.last_trade_price = Some(last.price);
        }
        trades
    }

    /// Consume resting orders at one price level in FIFO order.
    ///
    /// Every trade executes at the resting order's price. Fully filled
    /// resting orders leave the level and the location map; a drained
    /// level leaves the price index.
    fn match_at_level(&mut self, incoming: &Arc<Order>, price: i64, trades: &mut Vec<Trade>) {
        let levels = match incoming.side {
            Side::Buy => &mut self.asks,
            Side::Sell => &mut self.bids,
        };
        let Some(level) = levels.get_mut(&price) else {
            return;
        };

        let mut filled_ids: Vec<OrderId> = Vec::new();
        while incoming.remaining() > 0 {
            let Some(resting) = level.front() else { break };

            let fill = incoming.remaining().min(resting.remaining());
            trades.push(Trade::new(
                incoming.id.clone(),
                resting.id.clone(),
                resting.price,
                fill,
            ));

            incoming.fill(fill);
            resting.fill(fill);

            if resting.remaining() == 0 {
                resting.set_status(OrderStatus::Filled);
                level.remove(resting.id.as_str());
                filled_ids.push(resting.id.clone());
            } else {
                // Partially filled maker stays at the head of the queue.
                resting.set_status(OrderStatus::PartialFill);
            }
        }

        if level.is_empty() {
            levels.remove(&price);
        }
        for id in &filled_ids {
            self.order_locations.remove(id.as_str());
        }
    }

    /// Total remaining quantity available to an incoming order of `side`,
    /// scanning the opposite side in best-price order and stopping as soon
    /// as `requested` is covered. The book is not mutated.
    #[must_use]
    pub fn available_liquidity(&self, side: Side, requested: u64) -> u64 {
        let mut total = 0u64;
        match side {
            Side::Buy => {
                for level in self.asks.values() {
                    for order in level.iter() {
                        total = total.saturating_add(order.remaining());
                        if total >= requested {
                            return total;
                        }
                    }
                }
            }
            Side::Sell => {
                for level in self.bids.values().rev() {
                    for order in level.iter() {
                        total = total.saturating_add(order.remaining());
                        if total >= requested {
                            return total;
                        }
                    }
                }
            }
        }
        total
    }

    /// Verify that a market order can be filled in full.
    ///
    /// A market order is all-or-nothing here: rejecting it up front keeps
    /// the book untouched instead of leaving it half-consumed by a partial
    /// walk the caller never asked for.
    pub fn check_market_liquidity(&self, order: &Order) -> Result<(), EngineError> {
        let available = self.available_liquidity(order.side, order.quantity);
        if available < order.quantity {
            return Err(EngineError::InsufficientLiquidity {
                side: order.side,
                requested: order.quantity,
                available,
            });
        }
        Ok(())
    }
}
