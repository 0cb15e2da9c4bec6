//! End-to-end matching scenarios through the engine's public surface.

use matchbook_rs::prelude::*;

fn setup_engine() -> MatchingEngine {
    MatchingEngine::new()
}

#[test]
fn test_full_match_at_resting_price() {
    let engine = setup_engine();

    engine
        .submit(Order::limit("s1", "AAPL", Side::Sell, 15_050, 1_000))
        .unwrap();
    engine
        .submit(Order::limit("b1", "AAPL", Side::Buy, 15_045, 500))
        .unwrap();

    let result = engine
        .submit(Order::limit("b2", "AAPL", Side::Buy, 15_050, 500))
        .unwrap();

    assert_eq!(result.trades.len(), 1);
    assert_eq!(result.trades[0].price, 15_050);
    assert_eq!(result.trades[0].quantity, 500);
    assert_eq!(result.trades[0].resting_order_id.as_str(), "s1");
    assert_eq!(result.trades[0].aggressor_order_id.as_str(), "b2");
    assert_eq!(result.order.status(), OrderStatus::Filled);
    assert!(!result.order_in_book);
    assert!(!result.is_market_order);

    let maker = engine.order_status("s1").unwrap();
    assert_eq!(maker.status, OrderStatus::PartialFill);
    assert_eq!(maker.remaining(), 500);
}

#[test]
fn test_walk_multiple_price_levels() {
    let engine = setup_engine();

    engine
        .submit(Order::limit("s1", "AAPL", Side::Sell, 15_050, 300))
        .unwrap();
    engine
        .submit(Order::limit("s2", "AAPL", Side::Sell, 15_052, 400))
        .unwrap();
    engine
        .submit(Order::limit("s3", "AAPL", Side::Sell, 15_055, 600))
        .unwrap();
    engine
        .submit(Order::limit("b1", "AAPL", Side::Buy, 15_045, 500))
        .unwrap();

    let result = engine
        .submit(Order::limit("b2", "AAPL", Side::Buy, 15_053, 800))
        .unwrap();

    assert_eq!(result.trades.len(), 2);
    assert_eq!(result.trades[0].price, 15_050);
    assert_eq!(result.trades[0].quantity, 300);
    assert_eq!(result.trades[0].resting_order_id.as_str(), "s1");
    assert_eq!(result.trades[1].price, 15_052);
    assert_eq!(result.trades[1].quantity, 400);
    assert_eq!(result.trades[1].resting_order_id.as_str(), "s2");

    assert_eq!(result.order.status(), OrderStatus::PartialFill);
    assert_eq!(result.order.filled_quantity(), 700);
    assert_eq!(result.order.remaining(), 100);
    assert!(result.order_in_book);

    // Consumed makers are filled; s3 is untouched; the remainder is the
    // new best bid.
    assert_eq!(
        engine.order_status("s1").unwrap().status,
        OrderStatus::Filled
    );
    assert_eq!(
        engine.order_status("s2").unwrap().status,
        OrderStatus::Filled
    );
    assert_eq!(engine.order_status("s3").unwrap().remaining(), 600);

    let depth = engine.book_snapshot("AAPL", 1);
    assert_eq!(depth.bids[0].price, 15_053);
    assert_eq!(depth.bids[0].quantity, 100);
    assert_eq!(depth.asks[0].price, 15_055);
}

#[test]
fn test_fifo_at_a_single_price() {
    let engine = setup_engine();

    engine
        .submit(Order::limit("s1", "AAPL", Side::Sell, 15_050, 200))
        .unwrap();
    engine
        .submit(Order::limit("s2", "AAPL", Side::Sell, 15_050, 300))
        .unwrap();
    engine
        .submit(Order::limit("s3", "AAPL", Side::Sell, 15_050, 400))
        .unwrap();

    let result = engine
        .submit(Order::limit("b1", "AAPL", Side::Buy, 15_050, 500))
        .unwrap();

    assert_eq!(result.trades.len(), 2);
    assert_eq!(result.trades[0].resting_order_id.as_str(), "s1");
    assert_eq!(result.trades[0].quantity, 200);
    assert_eq!(result.trades[1].resting_order_id.as_str(), "s2");
    assert_eq!(result.trades[1].quantity, 300);
    assert_eq!(result.order.status(), OrderStatus::Filled);

    let untouched = engine.order_status("s3").unwrap();
    assert_eq!(untouched.status, OrderStatus::Accepted);
    assert_eq!(untouched.remaining(), 400);
}

#[test]
fn test_market_order_walks_book() {
    let engine = setup_engine();

    engine
        .submit(Order::limit("s1", "AAPL", Side::Sell, 15_050, 200))
        .unwrap();
    engine
        .submit(Order::limit("s2", "AAPL", Side::Sell, 15_052, 300))
        .unwrap();
    engine
        .submit(Order::limit("s3", "AAPL", Side::Sell, 15_055, 400))
        .unwrap();

    let result = engine
        .submit(Order::market("m1", "AAPL", Side::Buy, 600))
        .unwrap();

    assert!(result.is_market_order);
    assert!(!result.order_in_book);
    assert_eq!(result.trades.len(), 3);
    assert_eq!(result.trades.iter().map(|t| t.quantity).sum::<u64>(), 600);
    assert_eq!(result.order.status(), OrderStatus::Filled);

    let tail = engine.order_status("s3").unwrap();
    assert_eq!(tail.status, OrderStatus::PartialFill);
    assert_eq!(tail.remaining(), 300);
}

#[test]
fn test_market_order_rejected_on_insufficient_liquidity() {
    let engine = setup_engine();

    engine
        .submit(Order::limit("s1", "AAPL", Side::Sell, 15_050, 100))
        .unwrap();
    engine
        .submit(Order::limit("b1", "AAPL", Side::Buy, 15_045, 500))
        .unwrap();

    let err = engine
        .submit(Order::market("m1", "AAPL", Side::Buy, 500))
        .unwrap_err();
    match err {
        EngineError::InsufficientLiquidity {
            side,
            requested,
            available,
        } => {
            assert_eq!(side, Side::Buy);
            assert_eq!(requested, 500);
            assert_eq!(available, 100);
        }
        other => panic!("expected InsufficientLiquidity, got {other}"),
    }

    // No residue: book unchanged, order absent from the directory.
    assert_eq!(engine.order_status("s1").unwrap().remaining(), 100);
    assert_eq!(engine.order_status("b1").unwrap().remaining(), 500);
    assert!(matches!(
        engine.order_status("m1"),
        Err(EngineError::OrderNotFound(_))
    ));

    let depth = engine.book_snapshot("AAPL", 0);
    assert_eq!(depth.asks[0].quantity, 100);
    assert_eq!(depth.bids[0].quantity, 500);
}

#[test]
fn test_cancellation_semantics() {
    let engine = setup_engine();

    engine
        .submit(Order::limit("x", "AAPL", Side::Buy, 10_000, 100))
        .unwrap();

    let cancelled = engine.cancel("x").unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert!(engine.book_snapshot("AAPL", 0).is_empty());

    assert!(matches!(
        engine.cancel("x"),
        Err(EngineError::AlreadyTerminal { .. })
    ));

    // A matching sell trades with nothing.
    let result = engine
        .submit(Order::limit("s", "AAPL", Side::Sell, 10_000, 100))
        .unwrap();
    assert!(result.trades.is_empty());
}

#[test]
fn test_far_side_limit_that_fully_fills_is_filled() {
    let engine = setup_engine();
    engine
        .submit(Order::limit("s1", "AAPL", Side::Sell, 15_050, 500))
        .unwrap();

    // Same status whether the order rested first or crossed immediately.
    let result = engine
        .submit(Order::limit("b1", "AAPL", Side::Buy, 16_000, 500))
        .unwrap();
    assert_eq!(result.order.status(), OrderStatus::Filled);
    assert!(!result.order_in_book);
}

#[test]
fn test_price_priority_beats_arrival_order() {
    let engine = setup_engine();

    // Worse price arrives first.
    engine
        .submit(Order::limit("s-worse", "AAPL", Side::Sell, 15_060, 100))
        .unwrap();
    engine
        .submit(Order::limit("s-better", "AAPL", Side::Sell, 15_050, 100))
        .unwrap();

    let result = engine
        .submit(Order::limit("b1", "AAPL", Side::Buy, 15_060, 100))
        .unwrap();
    assert_eq!(result.trades.len(), 1);
    assert_eq!(result.trades[0].resting_order_id.as_str(), "s-better");
    assert_eq!(result.trades[0].price, 15_050);
}

#[test]
fn test_symbols_are_independent_books() {
    let engine = setup_engine();

    engine
        .submit(Order::limit("a1", "AAPL", Side::Sell, 15_050, 100))
        .unwrap();
    engine
        .submit(Order::limit("m1", "MSFT", Side::Buy, 15_050, 100))
        .unwrap();

    // The MSFT bid cannot fill against the AAPL ask despite crossing prices.
    assert!(engine
        .submit(Order::limit("m2", "MSFT", Side::Buy, 15_060, 50))
        .unwrap()
        .trades
        .is_empty());

    assert_eq!(engine.book_snapshot("AAPL", 0).asks.len(), 1);
    assert_eq!(engine.book_snapshot("MSFT", 0).bids.len(), 2);
}

#[test]
fn test_trade_listener_receives_batches() {
    use std::sync::mpsc;

    let (sender, receiver) = mpsc::channel::<TradeEvent>();
    let listener: TradeListener = std::sync::Arc::new(move |event| {
        let _ = sender.send(event.clone());
    });
    let engine = MatchingEngine::with_trade_listener(listener);

    engine
        .submit(Order::limit("s1", "AAPL", Side::Sell, 15_050, 200))
        .unwrap();
    engine
        .submit(Order::limit("s2", "AAPL", Side::Sell, 15_052, 300))
        .unwrap();
    engine
        .submit(Order::limit("b1", "AAPL", Side::Buy, 15_052, 500))
        .unwrap();

    // One event for the one submission that traded, both fills batched.
    let event = receiver.recv_timeout(std::time::Duration::from_secs(1)).unwrap();
    assert_eq!(event.symbol, "AAPL");
    assert_eq!(event.trades.len(), 2);
    assert!(receiver.try_recv().is_err());
}

#[test]
fn test_directory_invariants_after_mixed_traffic() {
    let engine = setup_engine();

    engine
        .submit(Order::limit("s1", "AAPL", Side::Sell, 15_050, 300))
        .unwrap();
    engine
        .submit(Order::limit("b1", "AAPL", Side::Buy, 15_050, 100))
        .unwrap();
    engine
        .submit(Order::limit("b2", "AAPL", Side::Buy, 15_049, 100))
        .unwrap();
    engine.cancel("b2").unwrap();
    engine
        .submit(Order::market("m1", "AAPL", Side::Sell, 100))
        .unwrap_err();

    for id in ["s1", "b1", "b2"] {
        let order = engine.order_status(id).unwrap();
        assert!(order.filled_quantity <= order.quantity);
    }

    let s1 = engine.order_status("s1").unwrap();
    assert_eq!(s1.status, OrderStatus::PartialFill);
    assert_eq!(s1.filled_quantity, 100);

    let b2 = engine.order_status("b2").unwrap();
    assert_eq!(b2.status, OrderStatus::Cancelled);
    assert_eq!(b2.filled_quantity, 0);
}
