//! A continuous double-auction limit order matching engine with price-time priority.
//!
//! ## Architecture
//!
//! The engine is split into a few small pieces:
//!
//! 1. `Order` and `Trade`: the records flowing in and out of the book
//! 2. `PriceLevel`: a FIFO queue of resting orders sharing one price and side
//! 3. `OrderBook`: two price-ordered maps of levels plus the matching algorithm
//! 4. `TradeSink`: an append-only destination injected into the book at construction
//!
//! An incoming order is crossed against the opposite side, best price first and
//! oldest order first within a price. Trades always execute at the resting
//! (maker) order's price. Whatever is left of the order rests at its own limit
//! price, joining the back of its level's queue. Only then are the produced
//! trades handed to the sink, in the order they occurred.
//!
//! ## Example Usage
//!
//! ```rust
//! use limit_order_book::{Order, OrderBook, TradeLog};
//! use std::sync::Arc;
//!
//! // The trade log is shared between the book (writer) and any readers
//! let trade_log = Arc::new(TradeLog::new());
//! let mut order_book = OrderBook::new(Arc::clone(&trade_log));
//!
//! // Resting liquidity on both sides
//! order_book.submit(Order::buy("you", 100, 10).unwrap()).unwrap();
//! order_book.submit(Order::sell("me", 110, 10).unwrap()).unwrap();
//! assert_eq!((order_book.best_bid(), order_book.best_ask()), (Some(100), Some(110)));
//!
//! // A crossing buy trades at the resting ask price, not at its own limit
//! let trades = order_book.submit(Order::buy("them", 115, 4).unwrap()).unwrap();
//! assert_eq!(trades[0].price, 110);
//! assert_eq!(trade_log.len(), 1);
//!
//! // Snapshots list both sides best price first
//! let snapshot = order_book.snapshot();
//! assert_eq!(snapshot.asks[0].total, 6);
//! ```
//!
//! The book itself is a plain single-writer structure. When several threads
//! submit orders, wrap it in a `SharedOrderBook`, which serializes whole
//! submissions behind one `RwLock` while letting readers query concurrently.
//!
//! Levels live in `BTreeMap`s keyed by price, so locating or opening a level is
//! $O(\log{N})$ in the number of distinct prices, and the best price on each side
//! is read from the first or last key.

mod config;
mod error;
mod order_book;
mod price_level;
mod shared;
mod sink;
mod trade;
mod types;

// Re-export public API
pub use config::OrderBookConfig;
pub use error::{ConfigError, OrderError, SinkError, SubmitError};
pub use order_book::OrderBook;
pub use price_level::PriceLevel;
pub use shared::SharedOrderBook;
pub use sink::{JsonLinesSink, TradeCounter, TradeLog, TradeSink};
pub use trade::{valid_trade, Trade};
pub use types::{
    BookSnapshot, LevelSummary, Order, OrderRequest, Price, Quantity, Side, TickSize, Volume,
};

// Re-export commonly used external dependencies
pub use rust_decimal::Decimal;
