use crate::types::TickSize;
use serde::{Deserialize, Serialize};

/// Configuration for a single `OrderBook`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderBookConfig {
    /// Label used in log fields and snapshots
    pub symbol: String,
    /// Increment used to convert request prices into ticks
    pub tick_size: TickSize,
}

impl OrderBookConfig {
    /// Sets the symbol.
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    /// Sets the tick size used by `submit_request`.
    pub fn with_tick_size(mut self, tick_size: TickSize) -> Self {
        self.tick_size = tick_size;
        self
    }
}

impl Default for OrderBookConfig {
    fn default() -> Self {
        Self {
            symbol: "BOOK".to_string(),
            tick_size: TickSize::default(),
        }
    }
}
