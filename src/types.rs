use crate::error::{ConfigError, OrderError};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Price expressed in whole ticks.
pub type Price = u64;

/// Order and trade quantity.
pub type Quantity = u64;

/// Sum of many quantities (level depth, traded volume). Wide enough that adding
/// any number of `Quantity` values a book can hold never overflows.
pub type Volume = u128;

/// Represents the side of an order in the order book.
///
/// - `Buy` orders rest on the bid side
/// - `Sell` orders rest on the ask side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Traders willing to purchase at or below a given price
    Buy,
    /// Traders willing to sell at or above a given price
    Sell,
}

impl Side {
    /// Returns the side an order of this side trades against.
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl FromStr for Side {
    type Err = OrderError;

    /// Parses `"buy"` or `"sell"` in any letter case.
    ///
    /// ```
    /// use limit_order_book::Side;
    ///
    /// assert_eq!("BUY".parse::<Side>().unwrap(), Side::Buy);
    /// assert_eq!("sell".parse::<Side>().unwrap(), Side::Sell);
    /// assert!("hold".parse::<Side>().is_err());
    /// ```
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        if token.eq_ignore_ascii_case("buy") {
            Ok(Side::Buy)
        } else if token.eq_ignore_ascii_case("sell") {
            Ok(Side::Sell)
        } else {
            Err(OrderError::UnknownSide(token.to_string()))
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => f.write_str("BUY"),
            Side::Sell => f.write_str("SELL"),
        }
    }
}

/// A single limit order, either incoming or resting in the book.
///
/// Identity (owner, side, price, quantity, creation time) is fixed at construction.
/// Only the matching algorithm advances `filled`, and it never passes `quantity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    owner: String,
    side: Side,
    price: Price,
    quantity: Quantity,
    filled: Quantity,
    created_at: DateTime<Utc>,
}

impl Order {
    /// Creates a new unfilled order.
    ///
    /// ## Errors
    ///
    /// Returns `OrderError::InvalidQuantity` when `quantity` is zero.
    ///
    /// ## Examples
    ///
    /// ```
    /// use limit_order_book::{Order, Side};
    ///
    /// let order = Order::new("alice", Side::Buy, 100, 25).unwrap();
    /// assert_eq!(order.unfilled(), 25);
    /// assert!(Order::new("alice", Side::Buy, 100, 0).is_err());
    /// ```
    pub fn new(
        owner: impl Into<String>,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Result<Self, OrderError> {
        if quantity == 0 {
            return Err(OrderError::InvalidQuantity(0));
        }

        Ok(Self {
            owner: owner.into(),
            side,
            price,
            quantity,
            filled: 0,
            created_at: Utc::now(),
        })
    }

    /// Creates a new buy order.
    pub fn buy(owner: impl Into<String>, price: Price, quantity: Quantity) -> Result<Self, OrderError> {
        Self::new(owner, Side::Buy, price, quantity)
    }

    /// Creates a new sell order.
    pub fn sell(owner: impl Into<String>, price: Price, quantity: Quantity) -> Result<Self, OrderError> {
        Self::new(owner, Side::Sell, price, quantity)
    }

    /// Who placed the order.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Book side the order trades from.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Limit price in ticks.
    pub fn price(&self) -> Price {
        self.price
    }

    /// Original quantity requested at submission.
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Quantity already traded.
    pub fn filled(&self) -> Quantity {
        self.filled
    }

    /// Quantity still open for matching (`quantity - filled`).
    pub fn unfilled(&self) -> Quantity {
        self.quantity - self.filled
    }

    /// Whether nothing is left to match.
    pub fn is_filled(&self) -> bool {
        self.unfilled() == 0
    }

    /// When the order was constructed.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub(crate) fn fill(&mut self, quantity: Quantity) {
        debug_assert!(quantity <= self.unfilled(), "fill exceeds unfilled quantity");
        self.filled += quantity;
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}@{}", self.owner, self.side, self.quantity, self.price)
    }
}

/// Positive price increment used to convert display prices into ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct TickSize(Decimal);

impl TickSize {
    /// Creates a tick size, rejecting zero and negative increments.
    pub fn new(step: Decimal) -> Result<Self, ConfigError> {
        if step <= Decimal::ZERO {
            return Err(ConfigError::InvalidTickSize(step));
        }
        Ok(Self(step.normalize()))
    }

    /// The price increment one tick represents.
    pub fn step(&self) -> Decimal {
        self.0
    }

    /// Converts a display price into whole ticks.
    ///
    /// ## Examples
    ///
    /// ```
    /// use limit_order_book::{Decimal, TickSize};
    ///
    /// let tick_size = TickSize::new(Decimal::new(5, 2)).unwrap(); // 0.05
    /// assert_eq!(tick_size.to_ticks(Decimal::new(10015, 2)).unwrap(), 2003);
    /// assert!(tick_size.to_ticks(Decimal::new(10012, 2)).is_err());
    /// ```
    pub fn to_ticks(&self, price: Decimal) -> Result<Price, OrderError> {
        if price < Decimal::ZERO {
            return Err(OrderError::InvalidPrice(price));
        }

        let ticks = price
            .checked_div(self.0)
            .ok_or(OrderError::InvalidPrice(price))?;
        if !ticks.fract().is_zero() {
            return Err(OrderError::OffTick {
                price,
                tick_size: self.0,
            });
        }

        ticks.to_u64().ok_or(OrderError::InvalidPrice(price))
    }

    /// Converts whole ticks back into a display price.
    ///
    /// Returns `None` when the result does not fit in a `Decimal`.
    pub fn to_decimal(&self, ticks: Price) -> Option<Decimal> {
        Decimal::from(ticks).checked_mul(self.0)
    }
}

impl Default for TickSize {
    fn default() -> Self {
        Self(Decimal::ONE)
    }
}

impl TryFrom<Decimal> for TickSize {
    type Error = ConfigError;

    fn try_from(step: Decimal) -> Result<Self, Self::Error> {
        Self::new(step)
    }
}

impl From<TickSize> for Decimal {
    fn from(tick_size: TickSize) -> Self {
        tick_size.0
    }
}

/// Untrusted order fields as handed over by a request-handling layer.
///
/// Nothing here is validated until `into_order` is called.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub owner: String,
    pub side: String,
    pub price: Decimal,
    pub quantity: i64,
}

impl OrderRequest {
    /// Validates the request and converts its price into ticks.
    ///
    /// ## Errors
    ///
    /// - `OrderError::UnknownSide` when `side` is neither buy nor sell
    /// - `OrderError::InvalidPrice` for negative prices
    /// - `OrderError::OffTick` when the price is not a multiple of `tick_size`
    /// - `OrderError::InvalidQuantity` for zero or negative quantities
    pub fn into_order(self, tick_size: &TickSize) -> Result<Order, OrderError> {
        let side = self.side.parse::<Side>()?;
        let price = tick_size.to_ticks(self.price)?;
        let quantity = u64::try_from(self.quantity)
            .ok()
            .filter(|quantity| *quantity > 0)
            .ok_or(OrderError::InvalidQuantity(self.quantity))?;

        Order::new(self.owner, side, price, quantity)
    }
}

/// Aggregated view of one price level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSummary {
    pub price: Price,
    /// Sum of unfilled quantity across every order at this price
    pub total: Volume,
}

/// Read-only picture of the book, both sides listed best price first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub symbol: String,
    pub best_bid: Option<Price>,
    pub best_ask: Option<Price>,
    pub asks: Vec<LevelSummary>,
    pub bids: Vec<LevelSummary>,
}
