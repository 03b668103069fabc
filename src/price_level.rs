//! FIFO queue of resting orders that share one price and one side.

use crate::trade::Trade;
use crate::types::{Order, Price, Side, Volume};
use std::collections::VecDeque;

/// All resting orders at one price on one side, held in arrival order.
///
/// The unfilled total is maintained incrementally, so reading it never walks the queue.
/// Every queued order has unfilled quantity left; the owning book drops the level
/// as soon as the queue empties.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    price: Price,
    side: Side,
    orders: VecDeque<Order>,
    total: Volume,
}

impl PriceLevel {
    /// Creates an empty level.
    pub fn new(price: Price, side: Side) -> Self {
        Self {
            price,
            side,
            orders: VecDeque::new(),
            total: 0,
        }
    }

    /// Appends an order at the back of the queue (time priority).
    pub fn push_back(&mut self, order: Order) {
        debug_assert_eq!(order.price(), self.price);
        debug_assert_eq!(order.side(), self.side);
        debug_assert!(!order.is_filled(), "filled orders never rest");

        self.total += Volume::from(order.unfilled());
        self.orders.push_back(order);
    }

    /// The oldest order at this level.
    pub fn head(&self) -> Option<&Order> {
        self.orders.front()
    }

    /// Tries to trade `incoming` against the head of the queue.
    ///
    /// On a match the level total shrinks by the traded quantity and a head that
    /// became fully filled is dequeued. Returns `None` when the head cannot trade
    /// with `incoming` (or the level is empty), leaving everything untouched.
    pub fn match_head(&mut self, incoming: &mut Order) -> Option<Trade> {
        let head = self.orders.front_mut()?;
        let trade = Trade::create(incoming, head)?;

        let head_filled = head.is_filled();
        self.total -= Volume::from(trade.quantity);
        if head_filled {
            self.orders.pop_front();
        }

        Some(trade)
    }

    /// Price shared by every order in the queue.
    pub fn price(&self) -> Price {
        self.price
    }

    /// Side shared by every order in the queue.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Sum of unfilled quantity across the queue.
    pub fn total(&self) -> Volume {
        self.total
    }

    /// Number of resting orders.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether the queue has no orders left.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Resting orders, oldest first.
    pub fn orders(&self) -> impl Iterator<Item = &Order> + '_ {
        self.orders.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Quantity;

    fn sell(owner: &str, quantity: Quantity) -> Order {
        Order::sell(owner, 100, quantity).unwrap()
    }

    #[test]
    fn test_push_back_keeps_arrival_order_and_total() {
        let mut level = PriceLevel::new(100, Side::Sell);
        level.push_back(sell("first", 10));
        level.push_back(sell("second", 20));
        level.push_back(sell("third", 30));

        assert_eq!(level.len(), 3);
        assert_eq!(level.total(), 60);
        assert_eq!(level.head().unwrap().owner(), "first");

        let owners: Vec<&str> = level.orders().map(Order::owner).collect();
        assert_eq!(owners, ["first", "second", "third"]);
    }

    #[test]
    fn test_partial_match_keeps_head() {
        let mut level = PriceLevel::new(100, Side::Sell);
        level.push_back(sell("maker", 50));

        let mut incoming = Order::buy("taker", 100, 20).unwrap();
        let trade = level.match_head(&mut incoming).unwrap();

        assert_eq!(trade.quantity, 20);
        assert_eq!(level.len(), 1);
        assert_eq!(level.total(), 30);
        assert_eq!(level.head().unwrap().unfilled(), 30);
        assert!(incoming.is_filled());
    }

    #[test]
    fn test_full_match_dequeues_head() {
        let mut level = PriceLevel::new(100, Side::Sell);
        level.push_back(sell("first", 10));
        level.push_back(sell("second", 10));

        let mut incoming = Order::buy("taker", 100, 15).unwrap();
        let trade = level.match_head(&mut incoming).unwrap();

        assert_eq!(trade.seller, "first");
        assert_eq!(level.len(), 1);
        assert_eq!(level.head().unwrap().owner(), "second");
        assert_eq!(level.total(), 10);
        assert_eq!(incoming.unfilled(), 5);
    }

    #[test]
    fn test_no_match_leaves_level_untouched() {
        let mut level = PriceLevel::new(100, Side::Sell);
        level.push_back(sell("maker", 10));

        let mut incoming = Order::buy("taker", 99, 10).unwrap();
        assert!(level.match_head(&mut incoming).is_none());
        assert_eq!(level.total(), 10);
        assert_eq!(incoming.unfilled(), 10);
    }

    #[test]
    fn test_total_holds_more_than_one_quantity() {
        let mut level = PriceLevel::new(100, Side::Sell);
        level.push_back(sell("first", u64::MAX));
        level.push_back(sell("second", u64::MAX));

        assert_eq!(level.total(), 2 * Volume::from(u64::MAX));

        let mut incoming = Order::buy("taker", 100, u64::MAX).unwrap();
        let trade = level.match_head(&mut incoming).unwrap();

        assert_eq!(trade.quantity, u64::MAX);
        assert_eq!(level.head().unwrap().owner(), "second");
        assert_eq!(level.total(), Volume::from(u64::MAX));
    }

    #[test]
    fn test_empty_level_has_no_match() {
        let mut level = PriceLevel::new(100, Side::Buy);
        let mut incoming = Order::sell("taker", 100, 10).unwrap();

        assert!(level.match_head(&mut incoming).is_none());
        assert!(level.is_empty());
    }
}
