use crate::error::SubmitError;
use crate::order_book::OrderBook;
use crate::sink::TradeSink;
use crate::trade::Trade;
use crate::types::{BookSnapshot, Order, OrderRequest, Price};
use parking_lot::RwLock;
use std::sync::Arc;

/// A cloneable handle that lets several producers and readers share one book.
///
/// Every submission holds the write lock for the whole call, so matching,
/// insertion and sink delivery of one order never interleave with another.
/// Queries take the read lock and may run concurrently with each other.
///
/// ## Examples
///
/// ```
/// use limit_order_book::{Order, OrderBook, SharedOrderBook, Trade};
/// use std::thread;
///
/// let shared_book = SharedOrderBook::new(OrderBook::new(Vec::<Trade>::new()));
///
/// let producer = shared_book.clone();
/// thread::spawn(move || {
///     producer.submit(Order::sell("me", 110, 10).unwrap()).unwrap();
/// })
/// .join()
/// .unwrap();
///
/// assert_eq!(shared_book.best_ask(), Some(110));
/// ```
#[derive(Debug)]
pub struct SharedOrderBook<S = Vec<Trade>> {
    order_book: Arc<RwLock<OrderBook<S>>>,
}

impl<S> Clone for SharedOrderBook<S> {
    fn clone(&self) -> Self {
        Self {
            order_book: Arc::clone(&self.order_book),
        }
    }
}

impl<S: TradeSink> SharedOrderBook<S> {
    /// Wraps a book so it can be cloned across threads.
    pub fn new(order_book: OrderBook<S>) -> Self {
        Self {
            order_book: Arc::new(RwLock::new(order_book)),
        }
    }

    /// Submits an order under the write lock.
    pub fn submit(&self, order: Order) -> Result<Vec<Trade>, SubmitError> {
        self.order_book.write().submit(order)
    }

    /// Validates and submits a raw request under the write lock.
    pub fn submit_request(&self, request: OrderRequest) -> Result<Vec<Trade>, SubmitError> {
        self.order_book.write().submit_request(request)
    }

    /// Best bid, under the read lock.
    pub fn best_bid(&self) -> Option<Price> {
        self.order_book.read().best_bid()
    }

    /// Best ask, under the read lock.
    pub fn best_ask(&self) -> Option<Price> {
        self.order_book.read().best_ask()
    }

    /// Snapshot of both sides, under the read lock.
    pub fn snapshot(&self) -> BookSnapshot {
        self.order_book.read().snapshot()
    }

    /// Runs `read` against the book while holding the read lock.
    pub fn with_read<R>(&self, read: impl FnOnce(&OrderBook<S>) -> R) -> R {
        let order_book = self.order_book.read();
        read(&*order_book)
    }
}

impl<S: TradeSink> From<OrderBook<S>> for SharedOrderBook<S> {
    fn from(order_book: OrderBook<S>) -> Self {
        Self::new(order_book)
    }
}
