use crate::error::SinkError;
use crate::trade::Trade;
use crate::types::Volume;
use parking_lot::RwLock;
use std::io::Write;
use std::sync::Arc;

/// Append-only destination for the trades produced by an `OrderBook`.
///
/// The book calls `append` once per trade, in matching order, only after its
/// own state already reflects the trade. Sinks cannot mutate or remove trades.
pub trait TradeSink {
    /// Records one trade. An error stops delivery of the remaining trades.
    fn append(&mut self, trade: &Trade) -> Result<(), SinkError>;
}

impl TradeSink for Vec<Trade> {
    fn append(&mut self, trade: &Trade) -> Result<(), SinkError> {
        self.push(trade.clone());
        Ok(())
    }
}

impl<S: TradeSink + ?Sized> TradeSink for &mut S {
    fn append(&mut self, trade: &Trade) -> Result<(), SinkError> {
        (**self).append(trade)
    }
}

impl<S: TradeSink + ?Sized> TradeSink for Box<S> {
    fn append(&mut self, trade: &Trade) -> Result<(), SinkError> {
        (**self).append(trade)
    }
}

/// A shared, append-only trade log.
///
/// The book holds an `Arc<TradeLog>` as its sink while any number of readers
/// (a presentation layer, for instance) keep their own clone of the `Arc`.
/// The log is protected by a `RwLock`, so readers never block each other and
/// only wait for the brief append performed by the writer.
///
/// ## Examples
///
/// ```
/// use limit_order_book::{Order, OrderBook, TradeLog};
/// use std::sync::Arc;
///
/// let trade_log = Arc::new(TradeLog::new());
/// let mut order_book = OrderBook::new(Arc::clone(&trade_log));
///
/// order_book.submit(Order::sell("alice", 100, 10).unwrap()).unwrap();
/// order_book.submit(Order::buy("bob", 100, 4).unwrap()).unwrap();
///
/// assert_eq!(trade_log.len(), 1);
/// assert_eq!(trade_log.total_volume(), 4);
/// ```
#[derive(Debug, Default)]
pub struct TradeLog {
    trades: RwLock<Vec<Trade>>,
}

impl TradeLog {
    /// Creates a new empty trade log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a trade; the write lock is held only for the push.
    pub fn record(&self, trade: Trade) {
        self.trades.write().push(trade);
    }

    /// Clones every recorded trade, oldest first.
    pub fn trades(&self) -> Vec<Trade> {
        self.trades.read().clone()
    }

    /// Clones the `count` most recent trades, newest first.
    pub fn recent(&self, count: usize) -> Vec<Trade> {
        self.trades.read().iter().rev().take(count).cloned().collect()
    }

    /// Number of recorded trades.
    pub fn len(&self) -> usize {
        self.trades.read().len()
    }

    /// Whether no trade has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.trades.read().is_empty()
    }

    /// Sum of traded quantity across the whole log.
    pub fn total_volume(&self) -> Volume {
        self.trades
            .read()
            .iter()
            .map(|trade| Volume::from(trade.quantity))
            .sum()
    }
}

impl TradeSink for Arc<TradeLog> {
    fn append(&mut self, trade: &Trade) -> Result<(), SinkError> {
        self.record(trade.clone());
        Ok(())
    }
}

/// Keeps only the number of trades and the traded volume.
///
/// Meant for throughput runs where storing every trade would dominate the cost.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TradeCounter {
    /// Number of trades appended
    pub trades: u64,
    /// Sum of their quantities
    pub volume: Volume,
}

impl TradeSink for TradeCounter {
    fn append(&mut self, trade: &Trade) -> Result<(), SinkError> {
        self.trades += 1;
        self.volume += Volume::from(trade.quantity);
        Ok(())
    }
}

/// Writes every trade as one JSON object per line.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    /// Wraps a writer; nothing is written until the first trade.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Borrows the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Unwraps the sink, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TradeSink for JsonLinesSink<W> {
    fn append(&mut self, trade: &Trade) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, trade)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}
