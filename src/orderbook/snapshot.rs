//! Aggregated order book snapshots for market data.

use crate::utils::current_time_millis;
use super::book::OrderBook;
use super::level::PriceLevel;
use serde::{Deserialize, Serialize};

/// One price level collapsed to its price and total remaining quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedLevel {
    /// The level's price in minor units.
    pub price: i64,
    /// Sum of the remaining quantities of every order at the level.
    pub quantity: u64,
}

/// An aggregated view of one book at a point in time.
///
/// Bids are ordered by price descending, asks ascending. Levels whose
/// aggregate remaining quantity is zero are omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSnapshot {
    /// The symbol the snapshot was taken from.
    pub symbol: String,
    /// When the snapshot was taken, milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// Bid levels, best (highest) price first.
    pub bids: Vec<AggregatedLevel>,
    /// Ask levels, best (lowest) price first.
    pub asks: Vec<AggregatedLevel>,
}

impl BookSnapshot {
    /// The best bid level, if any.
    #[must_use]
    pub fn best_bid(&self) -> Option<AggregatedLevel> {
        self.bids.first().copied()
    }

    /// The best ask level, if any.
    #[must_use]
    pub fn best_ask(&self) -> Option<AggregatedLevel> {
        self.asks.first().copied()
    }

    /// Total quantity across all included bid levels.
    #[must_use]
    pub fn total_bid_volume(&self) -> u64 {
        self.bids
            .iter()
            .fold(0u64, |total, level| total.saturating_add(level.quantity))
    }

    /// Total quantity across all included ask levels.
    #[must_use]
    pub fn total_ask_volume(&self) -> u64 {
        self.asks
            .iter()
            .fold(0u64, |total, level| total.saturating_add(level.quantity))
    }

    /// Whether both sides are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}

impl OrderBook {
    /// Build an aggregated snapshot of this book.
    ///
    /// Walks each side in best-price order, summing the remaining
    /// quantities of every order at each level. `depth` limits the number
    /// of levels per side; `0` means all levels.
    #[must_use]
    pub fn snapshot(&self, depth: usize) -> BookSnapshot {
        BookSnapshot {
            symbol: self.symbol.clone(),
            timestamp: current_time_millis(),
            bids: aggregate(self.bids.values().rev(), depth),
            asks: aggregate(self.asks.values(), depth),
        }
    }
}

fn aggregate<'a>(
    levels: impl Iterator<Item = &'a PriceLevel>,
    depth: usize,
) -> Vec<AggregatedLevel> {
    let mut out = Vec::new();
    for level in levels {
        if depth > 0 && out.len() >= depth {
            break;
        }
        let quantity = level.total_remaining();
        // A level only transiently aggregates to zero; skip it for safety.
        if quantity == 0 {
            continue;
        }
        out.push(AggregatedLevel {
            price: level.price(),
            quantity,
        });
    }
    out
}
