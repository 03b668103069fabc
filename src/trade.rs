use crate::types::{Order, Price, Quantity, Side};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable record of one match between a seller and a buyer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Owner of the order on the sell side of the match
    pub seller: String,
    /// Owner of the order on the buy side of the match
    pub buyer: String,
    pub quantity: Quantity,
    /// Always the resting (maker) order's price
    pub price: Price,
    /// Side of the incoming order that triggered the match
    pub taker_side: Side,
    pub executed_at: DateTime<Utc>,
}

/// Checks whether `sell` and `buy` can trade with each other right now.
///
/// Both orders must sit on the expected side, the prices must overlap
/// (`sell.price <= buy.price`) and neither order may be exhausted.
pub fn valid_trade(sell: &Order, buy: &Order) -> bool {
    if sell.side() != Side::Sell || buy.side() != Side::Buy {
        return false;
    }

    if sell.price() > buy.price() {
        return false;
    }

    sell.unfilled() > 0 && buy.unfilled() > 0
}

impl Trade {
    /// Matches an incoming order against a resting one.
    ///
    /// The incoming order is tried as the seller first, then as the buyer. When
    /// neither assignment is valid no trade happens and both orders are left
    /// untouched. Otherwise both orders are filled by the smaller of their
    /// unfilled quantities, and the trade executes at the resting order's price,
    /// even when the incoming limit would have accepted a better one.
    ///
    /// ## Examples
    ///
    /// ```
    /// use limit_order_book::{Order, Trade};
    ///
    /// let mut incoming = Order::buy("taker", 105, 200).unwrap();
    /// let mut resting = Order::sell("maker", 100, 100).unwrap();
    ///
    /// let trade = Trade::create(&mut incoming, &mut resting).unwrap();
    /// assert_eq!((trade.quantity, trade.price), (100, 100));
    /// assert_eq!((trade.seller.as_str(), trade.buyer.as_str()), ("maker", "taker"));
    /// assert_eq!(incoming.unfilled(), 100);
    /// assert!(resting.is_filled());
    /// ```
    pub fn create(incoming: &mut Order, resting: &mut Order) -> Option<Trade> {
        let (seller, buyer) = if valid_trade(incoming, resting) {
            (incoming.owner().to_string(), resting.owner().to_string())
        } else if valid_trade(resting, incoming) {
            (resting.owner().to_string(), incoming.owner().to_string())
        } else {
            return None;
        };

        let quantity = incoming.unfilled().min(resting.unfilled());
        incoming.fill(quantity);
        resting.fill(quantity);

        Some(Trade {
            seller,
            buyer,
            quantity,
            price: resting.price(),
            taker_side: incoming.side(),
            executed_at: Utc::now(),
        })
    }
}
