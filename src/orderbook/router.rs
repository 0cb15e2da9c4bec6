//! Trade event routing over channels.
//!
//! A router owns the channel plumbing between a [`MatchingEngine`] and a
//! consumer: hand [`TradeRouterStd::listener`] (or the Tokio variant) to
//! the engine, then start the processor to drain events off the hot path.
//! Both variants log consumed events; applications needing more wire their
//! own [`TradeListener`] instead.
//!
//! [`MatchingEngine`]: crate::MatchingEngine

use super::trade::{TradeEvent, TradeListener};
use std::sync::Arc;
use tracing::{error, info};

/// Trade event router using standard library mpsc channels.
pub struct TradeRouterStd {
    /// Sender handed out to listeners.
    sender: std::sync::mpsc::Sender<TradeEvent>,
    /// Receiver for trade events (taken when the processor starts).
    receiver: Option<std::sync::mpsc::Receiver<TradeEvent>>,
}

impl TradeRouterStd {
    /// Create a router backed by a standard library mpsc channel.
    pub fn new() -> Self {
        let (sender, receiver) = std::sync::mpsc::channel();
        Self {
            sender,
            receiver: Some(receiver),
        }
    }

    /// A listener that forwards trade events into this router's channel.
    pub fn listener(&self) -> TradeListener {
        let sender = self.sender.clone();
        Arc::new(move |event: &TradeEvent| {
            if let Err(e) = sender.send(event.clone()) {
                error!("failed to forward trade event for {}: {}", event.symbol, e);
            }
        })
    }

    /// Start the trade event processor in a separate thread.
    ///
    /// The processor runs until every sender (the router and all listeners
    /// cloned from it) has been dropped.
    pub fn start_processor(&mut self) -> std::thread::JoinHandle<()> {
        let receiver = self
            .receiver
            .take()
            .expect("trade processor already started");

        std::thread::spawn(move || {
            info!("trade processor started");
            while let Ok(event) = receiver.recv() {
                process_trade_event(&event);
            }
            info!("trade processor stopped");
        })
    }
}

impl Default for TradeRouterStd {
    fn default() -> Self {
        Self::new()
    }
}

/// Trade event router using Tokio mpsc channels.
pub struct TradeRouterTokio {
    /// Sender handed out to listeners.
    sender: tokio::sync::mpsc::UnboundedSender<TradeEvent>,
    /// Receiver for trade events (taken when the processor starts).
    receiver: Option<tokio::sync::mpsc::UnboundedReceiver<TradeEvent>>,
}

impl TradeRouterTokio {
    /// Create a router backed by a Tokio unbounded mpsc channel.
    pub fn new() -> Self {
        let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();
        Self {
            sender,
            receiver: Some(receiver),
        }
    }

    /// A listener that forwards trade events into this router's channel.
    ///
    /// Sending on an unbounded channel never blocks, so the listener is
    /// safe to call from the engine's submit path.
    pub fn listener(&self) -> TradeListener {
        let sender = self.sender.clone();
        Arc::new(move |event: &TradeEvent| {
            if let Err(e) = sender.send(event.clone()) {
                error!("failed to forward trade event for {}: {}", event.symbol, e);
            }
        })
    }

    /// Start the trade event processor as an async task.
    pub fn start_processor(&mut self) -> tokio::task::JoinHandle<()> {
        let mut receiver = self
            .receiver
            .take()
            .expect("trade processor already started");

        tokio::spawn(async move {
            info!("trade processor started (tokio)");
            while let Some(event) = receiver.recv().await {
                process_trade_event(&event);
            }
            info!("trade processor stopped (tokio)");
        })
    }
}

impl Default for TradeRouterTokio {
    fn default() -> Self {
        Self::new()
    }
}

fn process_trade_event(event: &TradeEvent) {
    info!(
        "processing {} trade(s) for {}",
        event.trades.len(),
        event.symbol
    );
    for trade in &event.trades {
        info!(
            "  trade {}: {} units at {} (resting {})",
            trade.trade_id, trade.quantity, trade.price, trade.resting_order_id
        );
    }
}
