use crate::trade::Trade;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while turning raw input into a valid `Order`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("unknown side: {0:?} (expected \"buy\" or \"sell\")")]
    UnknownSide(String),

    #[error("invalid order: quantity must be positive, got {0}")]
    InvalidQuantity(i64),

    #[error("invalid order: price must not be negative, got {0}")]
    InvalidPrice(Decimal),

    #[error("invalid order: price {price} is not a multiple of tick size {tick_size}")]
    OffTick { price: Decimal, tick_size: Decimal },
}

/// Errors raised while building an `OrderBookConfig`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("tick size must be positive, got {0}")]
    InvalidTickSize(Decimal),
}

/// Failure reported by a `TradeSink` implementation.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("trade sink I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("trade serialization failure: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("trade sink rejected trade: {0}")]
    Rejected(String),
}

/// Errors returned by `OrderBook::submit` and `OrderBook::submit_request`.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    InvalidOrder(#[from] OrderError),

    /// The book state already reflects every trade in `trades`; only the
    /// first `delivered` of them reached the sink.
    #[error("trade sink failed after delivering {delivered} of {total} trades", total = .trades.len())]
    Sink {
        #[source]
        source: SinkError,
        trades: Vec<Trade>,
        delivered: usize,
    },
}
